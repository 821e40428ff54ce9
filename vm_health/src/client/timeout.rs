//! Per-call deadline for any resource client

use super::models::{ProvisioningRecord, ResourceDescription};
use super::{ClientError, ClientResult, ResourceClient};
use async_trait::async_trait;
use std::future::Future;
use std::time::Duration;
use tokio::time;
use tracing::warn;

/// Wraps a client so every call fails with [`ClientError::Timeout`] once
/// `timeout` has elapsed.
pub struct TimeoutClient<C> {
    inner: C,
    timeout: Duration,
}

impl<C: ResourceClient> TimeoutClient<C> {
    pub fn new(inner: C, timeout: Duration) -> Self {
        Self { inner, timeout }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    async fn bounded<T, F>(&self, operation: &str, call: F) -> ClientResult<T>
    where
        F: Future<Output = ClientResult<T>> + Send,
    {
        match time::timeout(self.timeout, call).await {
            Ok(result) => result,
            Err(_) => {
                warn!(operation, timeout_ms = self.timeout.as_millis() as u64, "Resource client call timed out");
                Err(ClientError::Timeout(format!(
                    "{} did not complete within {:?}",
                    operation, self.timeout
                )))
            }
        }
    }
}

#[async_trait]
impl<C: ResourceClient> ResourceClient for TimeoutClient<C> {
    async fn instance_statuses(&self, resource_group: &str, name: &str) -> ClientResult<Vec<String>> {
        self.bounded("instance_statuses", self.inner.instance_statuses(resource_group, name))
            .await
    }

    async fn resource_description(&self, resource_group: &str, name: &str) -> ClientResult<ResourceDescription> {
        self.bounded("resource_description", self.inner.resource_description(resource_group, name))
            .await
    }

    async fn disk_provisioning_state(&self, disk_id: &str) -> ClientResult<ProvisioningRecord> {
        self.bounded("disk_provisioning_state", self.inner.disk_provisioning_state(disk_id))
            .await
    }

    async fn nic_provisioning_state(&self, resource_group: &str, nic_name: &str) -> ClientResult<ProvisioningRecord> {
        self.bounded("nic_provisioning_state", self.inner.nic_provisioning_state(resource_group, nic_name))
            .await
    }
}
