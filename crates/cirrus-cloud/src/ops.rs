//! The five resource operations.
//!
//! Each one is a single pass-through to the provider: no retries, no
//! precondition checks, no local state between invocations. The fixed
//! policy lives here: the SSH-from-anywhere ingress rule, the `EC2`
//! prefix for auto-generated instance tags, and the listing placeholders.

use crate::error::{CloudError, Result};
use crate::naming::generate_name;
use crate::provider::{
    ComputeProvider, IngressRule, InstanceSummary, KeyPairMaterial, RunInstanceRequest,
};

/// Prefix for auto-generated instance Name tags.
const AUTO_TAG_PREFIX: &str = "EC2";

/// Description attached to groups created by this tool.
const GROUP_DESCRIPTION: &str = "Cirrus auto SG";

/// The only rule this tool ever authorizes: inbound SSH from anywhere.
fn ssh_from_anywhere() -> IngressRule {
    IngressRule {
        protocol: "tcp".to_string(),
        from_port: 22,
        to_port: 22,
        cidr: "0.0.0.0/0".to_string(),
    }
}

/// Create a key pair. The returned material is the only copy of the
/// secret; it cannot be fetched again.
pub async fn create_key_pair(
    provider: &dyn ComputeProvider,
    name: &str,
) -> Result<KeyPairMaterial> {
    tracing::info!(name, "creating key pair");
    provider.create_key_pair(name).await
}

/// Create a security group and open SSH ingress on it, returning the
/// group ID.
///
/// If the ingress call fails the group is left behind; there is no
/// rollback. The error names the group ID so the operator can clean it
/// up by hand.
pub async fn create_access_group(provider: &dyn ComputeProvider, name: &str) -> Result<String> {
    tracing::info!(name, "creating security group");
    let group_id = provider
        .create_security_group(name, GROUP_DESCRIPTION)
        .await?;

    provider
        .authorize_ingress(&group_id, &ssh_from_anywhere())
        .await
        .map_err(|e| {
            CloudError::Api(format!(
                "group {group_id} was created but opening SSH ingress failed: {e}"
            ))
        })?;

    Ok(group_id)
}

/// Launch one instance, returning its ID. A blank display name gets an
/// auto-generated `EC2-<timestamp>` tag.
pub async fn launch_instance(
    provider: &dyn ComputeProvider,
    key_name: &str,
    group_id: &str,
    display_name: &str,
) -> Result<String> {
    let name_tag = if display_name.is_empty() {
        generate_name(AUTO_TAG_PREFIX)
    } else {
        display_name.to_string()
    };

    tracing::info!(key_name, group_id, name_tag = name_tag.as_str(), "launching instance");
    provider
        .run_instance(&RunInstanceRequest {
            key_name: key_name.to_string(),
            security_group_id: group_id.to_string(),
            name_tag,
        })
        .await
}

/// List every instance visible to the account, with the display
/// placeholders applied. An empty account yields an empty vec.
pub async fn list_instances(provider: &dyn ComputeProvider) -> Result<Vec<InstanceSummary>> {
    let records = provider.describe_instances().await?;
    Ok(records.into_iter().map(InstanceSummary::from).collect())
}

/// Ask the provider to start an instance. Fire-and-forget: success means
/// the request was accepted, not that the instance reached "running".
pub async fn start_instance(provider: &dyn ComputeProvider, instance_id: &str) -> Result<()> {
    tracing::info!(instance_id, "starting instance");
    provider.start_instance(instance_id).await
}

/// Ask the provider to stop an instance. Fire-and-forget.
pub async fn stop_instance(provider: &dyn ComputeProvider, instance_id: &str) -> Result<()> {
    tracing::info!(instance_id, "stopping instance");
    provider.stop_instance(instance_id).await
}

/// Ask the provider to terminate an instance. Fire-and-forget.
pub async fn terminate_instance(provider: &dyn ComputeProvider, instance_id: &str) -> Result<()> {
    tracing::info!(instance_id, "terminating instance");
    provider.terminate_instance(instance_id).await
}
