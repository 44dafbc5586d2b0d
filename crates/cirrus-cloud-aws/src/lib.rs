//! AWS EC2 provider for Cirrus
//!
//! Implements [`cirrus_cloud::ComputeProvider`] with one `aws-sdk-ec2`
//! client bound to a fixed region. Credentials come from the SDK's
//! default chain (environment, shared config, instance profile); a bad
//! credential setup is not detected here, it surfaces on the first call.
//!
//! Region, machine image and machine size are compiled-in constants, not
//! configuration.

pub mod provider;

pub use provider::{AwsCompute, AMAZON_LINUX_AMI, MACHINE_SIZE, REGION};
