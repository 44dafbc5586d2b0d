//! Cirrus compute core
//!
//! Provider abstraction and resource operations for the Cirrus console.
//! The [`ComputeProvider`] trait is the seam between the operations and a
//! concrete control plane; `cirrus-cloud-aws` implements it against EC2,
//! and the [`mock`] module (feature `mock`, always on for tests) provides
//! an in-memory implementation.
//!
//! The operations in [`ops`] are deliberately thin: one remote call each,
//! no retries, no local state. The tool re-queries the provider every
//! time; nothing is persisted between invocations.

pub mod error;
pub mod naming;
pub mod ops;
pub mod provider;

#[cfg(any(test, feature = "mock"))]
pub mod mock;

// Re-exports
pub use error::{CloudError, Result};
pub use provider::{
    ComputeProvider, IngressRule, InstanceRecord, InstanceSummary, KeyPairMaterial,
    RunInstanceRequest, NO_ADDRESS, NO_NAME,
};
