//! Compute provider trait definition

use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Placeholder shown when an instance carries no Name tag.
pub const NO_NAME: &str = "No Name";

/// Placeholder shown when an instance has no public address.
pub const NO_ADDRESS: &str = "-";

/// One authenticated handle onto a compute control plane, bound to a
/// single region.
///
/// The methods below are the tool's entire remote surface. Implementations
/// issue exactly one API call per method; they do not retry and do not
/// validate preconditions beyond what the remote API itself enforces.
/// Authoritative state always lives on the remote side.
#[async_trait]
pub trait ComputeProvider: Send + Sync {
    /// The region this handle is bound to (display only).
    fn region(&self) -> &str;

    /// Create a key pair. The secret material is returned here and is
    /// never retrievable again.
    async fn create_key_pair(&self, name: &str) -> Result<KeyPairMaterial>;

    /// Create an empty security group, returning its ID.
    async fn create_security_group(&self, name: &str, description: &str) -> Result<String>;

    /// Add one ingress rule to an existing group.
    async fn authorize_ingress(&self, group_id: &str, rule: &IngressRule) -> Result<()>;

    /// Launch exactly one instance, returning its ID.
    async fn run_instance(&self, request: &RunInstanceRequest) -> Result<String>;

    /// Enumerate every instance visible to the account, in the order the
    /// provider reports them.
    async fn describe_instances(&self) -> Result<Vec<InstanceRecord>>;

    async fn start_instance(&self, instance_id: &str) -> Result<()>;

    async fn stop_instance(&self, instance_id: &str) -> Result<()>;

    async fn terminate_instance(&self, instance_id: &str) -> Result<()>;
}

/// A freshly created key pair. `material` is the one-time secret; the
/// caller is responsible for persisting it.
#[derive(Debug, Clone)]
pub struct KeyPairMaterial {
    pub name: String,
    pub material: String,
}

/// One ingress rule for a security group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngressRule {
    pub protocol: String,
    pub from_port: i32,
    pub to_port: i32,
    pub cidr: String,
}

/// Parameters for launching one instance. Machine image and size are not
/// parameters; the provider adapter compiles them in.
#[derive(Debug, Clone)]
pub struct RunInstanceRequest {
    pub key_name: String,
    pub security_group_id: String,
    /// Value of the Name tag. Always set; callers auto-generate it when
    /// the operator leaves it blank.
    pub name_tag: String,
}

/// Raw per-instance data as the provider reports it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InstanceRecord {
    pub id: String,
    pub instance_type: String,
    /// Lifecycle state name (e.g. "pending", "running", "stopped").
    pub state: String,
    pub public_ip: Option<String>,
    /// Value of the Name tag, if tagged.
    pub name: Option<String>,
}

/// Display-ready instance row with the listing placeholders applied.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InstanceSummary {
    pub id: String,
    pub instance_type: String,
    pub state: String,
    pub public_ip: String,
    pub name: String,
}

impl From<InstanceRecord> for InstanceSummary {
    fn from(record: InstanceRecord) -> Self {
        Self {
            id: record.id,
            instance_type: record.instance_type,
            state: record.state,
            public_ip: record.public_ip.unwrap_or_else(|| NO_ADDRESS.to_string()),
            name: record.name.unwrap_or_else(|| NO_NAME.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_fills_placeholders() {
        let summary: InstanceSummary = InstanceRecord {
            id: "i-0abc".to_string(),
            instance_type: "t2.micro".to_string(),
            state: "running".to_string(),
            public_ip: None,
            name: None,
        }
        .into();

        assert_eq!(summary.public_ip, NO_ADDRESS);
        assert_eq!(summary.name, NO_NAME);
    }

    #[test]
    fn summary_keeps_present_values() {
        let summary: InstanceSummary = InstanceRecord {
            id: "i-0abc".to_string(),
            instance_type: "t2.micro".to_string(),
            state: "running".to_string(),
            public_ip: Some("13.235.1.2".to_string()),
            name: Some("web".to_string()),
        }
        .into();

        assert_eq!(summary.public_ip, "13.235.1.2");
        assert_eq!(summary.name, "web");
    }
}
