//! Resource client capability used by the health checks

pub mod models;
pub mod snapshot;
pub mod timeout;

use async_trait::async_trait;
use thiserror::Error;

pub use models::{DataDisk, ProvisioningRecord, ResourceDescription};
pub use snapshot::{Snapshot, SnapshotClient, VmRecord};
pub use timeout::TimeoutClient;

/// Failure reported by a [`ResourceClient`]. The display text is what
/// ends up after `"Error: "` in a diagnostic message.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ClientError {
    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Request timed out: {0}")]
    Timeout(String),

    #[error("Request throttled: {0}")]
    Throttled(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Request failed: {0}")]
    Request(String),
}

impl ClientError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, ClientError::NotFound(_))
    }
}

pub type ClientResult<T> = std::result::Result<T, ClientError>;

/// Queries against the cloud provider for one subscription.
///
/// Implementations are expected to be already authenticated. Calls are
/// issued one at a time by the evaluator, never concurrently for a single
/// evaluation.
#[async_trait]
pub trait ResourceClient: Send + Sync {
    /// Instance view status codes, e.g. `PowerState/running`.
    async fn instance_statuses(&self, resource_group: &str, name: &str) -> ClientResult<Vec<String>>;

    async fn resource_description(&self, resource_group: &str, name: &str) -> ClientResult<ResourceDescription>;

    async fn disk_provisioning_state(&self, disk_id: &str) -> ClientResult<ProvisioningRecord>;

    async fn nic_provisioning_state(&self, resource_group: &str, nic_name: &str) -> ClientResult<ProvisioningRecord>;
}

/// Extracts the interface name from a full NIC resource id.
pub fn nic_name_from_id(nic_id: &str) -> ClientResult<&str> {
    match nic_id.rsplit('/').next() {
        Some(name) if !name.is_empty() => Ok(name),
        _ => Err(ClientError::InvalidResponse(format!(
            "network interface id '{}' has no name segment",
            nic_id
        ))),
    }
}
