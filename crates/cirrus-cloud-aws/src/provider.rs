//! EC2-backed compute provider

use async_trait::async_trait;
use aws_sdk_ec2::error::DisplayErrorContext;
use aws_sdk_ec2::types::{
    InstanceType, IpPermission, IpRange, ResourceType, Tag, TagSpecification,
};
use cirrus_cloud::{
    CloudError, ComputeProvider, IngressRule, InstanceRecord, KeyPairMaterial, Result,
    RunInstanceRequest,
};

/// Region every resource is created in.
pub const REGION: &str = "ap-south-1";

/// Amazon Linux 2 in ap-south-1 (Mumbai).
pub const AMAZON_LINUX_AMI: &str = "ami-0a7cf821b91bcccbc";

/// Machine size for every launch.
pub const MACHINE_SIZE: &str = "t2.micro";

/// One EC2 client bound to a single region.
pub struct AwsCompute {
    client: aws_sdk_ec2::Client,
    region: String,
}

impl AwsCompute {
    /// Load credentials from the SDK default chain and bind a client to
    /// `region`. Does not talk to AWS; authentication problems surface
    /// on the first call.
    pub async fn connect(region: &str) -> Self {
        let config = aws_config::defaults(aws_config::BehaviorVersion::latest())
            .region(aws_config::Region::new(region.to_string()))
            .load()
            .await;

        Self {
            client: aws_sdk_ec2::Client::new(&config),
            region: region.to_string(),
        }
    }
}

/// Collapse any SDK failure into the single error the tool knows about,
/// keeping the SDK's full human-readable rendering.
fn api_error(err: impl std::error::Error) -> CloudError {
    CloudError::Api(format!("{}", DisplayErrorContext(err)))
}

/// Flatten one EC2 instance into the record the core understands.
fn summarize(instance: &aws_sdk_ec2::types::Instance) -> InstanceRecord {
    let name = instance
        .tags()
        .iter()
        .find(|t| t.key() == Some("Name"))
        .and_then(|t| t.value())
        .map(str::to_string);

    InstanceRecord {
        id: instance.instance_id().unwrap_or_default().to_string(),
        instance_type: instance
            .instance_type()
            .map(|t| t.as_str().to_string())
            .unwrap_or_default(),
        state: instance
            .state()
            .and_then(|s| s.name())
            .map(|n| n.as_str().to_string())
            .unwrap_or_default(),
        public_ip: instance.public_ip_address().map(str::to_string),
        name,
    }
}

#[async_trait]
impl ComputeProvider for AwsCompute {
    fn region(&self) -> &str {
        &self.region
    }

    async fn create_key_pair(&self, name: &str) -> Result<KeyPairMaterial> {
        tracing::debug!(name, "ec2 CreateKeyPair");
        let out = self
            .client
            .create_key_pair()
            .key_name(name)
            .send()
            .await
            .map_err(api_error)?;

        let material = out
            .key_material()
            .ok_or(CloudError::MissingField("key material"))?
            .to_string();

        Ok(KeyPairMaterial {
            name: out.key_name().unwrap_or(name).to_string(),
            material,
        })
    }

    async fn create_security_group(&self, name: &str, description: &str) -> Result<String> {
        tracing::debug!(name, "ec2 CreateSecurityGroup");
        let out = self
            .client
            .create_security_group()
            .group_name(name)
            .description(description)
            .send()
            .await
            .map_err(api_error)?;

        Ok(out
            .group_id()
            .ok_or(CloudError::MissingField("group id"))?
            .to_string())
    }

    async fn authorize_ingress(&self, group_id: &str, rule: &IngressRule) -> Result<()> {
        tracing::debug!(group_id, ?rule, "ec2 AuthorizeSecurityGroupIngress");
        let permission = IpPermission::builder()
            .ip_protocol(rule.protocol.as_str())
            .from_port(rule.from_port)
            .to_port(rule.to_port)
            .ip_ranges(IpRange::builder().cidr_ip(rule.cidr.as_str()).build())
            .build();

        self.client
            .authorize_security_group_ingress()
            .group_id(group_id)
            .ip_permissions(permission)
            .send()
            .await
            .map_err(api_error)?;

        Ok(())
    }

    async fn run_instance(&self, request: &RunInstanceRequest) -> Result<String> {
        tracing::debug!(name_tag = request.name_tag.as_str(), "ec2 RunInstances");
        let tags = TagSpecification::builder()
            .resource_type(ResourceType::Instance)
            .tags(
                Tag::builder()
                    .key("Name")
                    .value(request.name_tag.as_str())
                    .build(),
            )
            .build();

        let out = self
            .client
            .run_instances()
            .image_id(AMAZON_LINUX_AMI)
            .instance_type(InstanceType::from(MACHINE_SIZE))
            .key_name(request.key_name.as_str())
            .security_group_ids(request.security_group_id.as_str())
            .min_count(1)
            .max_count(1)
            .tag_specifications(tags)
            .send()
            .await
            .map_err(api_error)?;

        Ok(out
            .instances()
            .first()
            .and_then(|i| i.instance_id())
            .ok_or(CloudError::MissingField("instance id"))?
            .to_string())
    }

    async fn describe_instances(&self) -> Result<Vec<InstanceRecord>> {
        tracing::debug!("ec2 DescribeInstances");
        let out = self
            .client
            .describe_instances()
            .send()
            .await
            .map_err(api_error)?;

        let mut records = Vec::new();
        for reservation in out.reservations() {
            for instance in reservation.instances() {
                records.push(summarize(instance));
            }
        }
        Ok(records)
    }

    async fn start_instance(&self, instance_id: &str) -> Result<()> {
        tracing::debug!(instance_id, "ec2 StartInstances");
        self.client
            .start_instances()
            .instance_ids(instance_id)
            .send()
            .await
            .map_err(api_error)?;
        Ok(())
    }

    async fn stop_instance(&self, instance_id: &str) -> Result<()> {
        tracing::debug!(instance_id, "ec2 StopInstances");
        self.client
            .stop_instances()
            .instance_ids(instance_id)
            .send()
            .await
            .map_err(api_error)?;
        Ok(())
    }

    async fn terminate_instance(&self, instance_id: &str) -> Result<()> {
        tracing::debug!(instance_id, "ec2 TerminateInstances");
        self.client
            .terminate_instances()
            .instance_ids(instance_id)
            .send()
            .await
            .map_err(api_error)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aws_sdk_ec2::types::{Instance, InstanceState, InstanceStateName};

    #[test]
    fn summarize_reads_name_tag_and_public_ip() {
        let instance = Instance::builder()
            .instance_id("i-0123456789abcdef0")
            .instance_type(InstanceType::T2Micro)
            .state(
                InstanceState::builder()
                    .name(InstanceStateName::Running)
                    .build(),
            )
            .public_ip_address("13.235.1.2")
            .tags(Tag::builder().key("env").value("dev").build())
            .tags(Tag::builder().key("Name").value("web").build())
            .build();

        let record = summarize(&instance);
        assert_eq!(record.id, "i-0123456789abcdef0");
        assert_eq!(record.instance_type, "t2.micro");
        assert_eq!(record.state, "running");
        assert_eq!(record.public_ip.as_deref(), Some("13.235.1.2"));
        assert_eq!(record.name.as_deref(), Some("web"));
    }

    #[test]
    fn summarize_leaves_missing_fields_empty() {
        let instance = Instance::builder()
            .instance_id("i-0fedcba9876543210")
            .instance_type(InstanceType::T2Micro)
            .state(
                InstanceState::builder()
                    .name(InstanceStateName::Pending)
                    .build(),
            )
            .build();

        let record = summarize(&instance);
        assert_eq!(record.public_ip, None);
        assert_eq!(record.name, None);
    }
}
