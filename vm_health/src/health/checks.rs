//! Virtual machine sub-checks and the types they report with

use crate::client::{nic_name_from_id, ClientError, ClientResult, ResourceClient};
use crate::identity::{CheckMetadata, ResourceIdentity};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Instant;
use tracing::debug;

/// Substring of the instance status code reported for a running VM.
pub const POWER_STATE_RUNNING: &str = "PowerState/running";

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum HealthStatus {
    Healthy,
    Unhealthy,
}

impl HealthStatus {
    pub fn is_healthy(&self) -> bool {
        *self == HealthStatus::Healthy
    }
}

impl std::fmt::Display for HealthStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HealthStatus::Healthy => write!(f, "healthy"),
            HealthStatus::Unhealthy => write!(f, "unhealthy"),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum CheckName {
    #[serde(rename = "powerStateCheck")]
    PowerState,
    #[serde(rename = "diskHealthCheck")]
    Disks,
    #[serde(rename = "networkInterfaceCheck")]
    NetworkInterfaces,
}

impl CheckName {
    /// Evaluation order, cheapest and most fundamental first.
    pub const ORDER: [CheckName; 3] = [
        CheckName::PowerState,
        CheckName::Disks,
        CheckName::NetworkInterfaces,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CheckName::PowerState => "powerStateCheck",
            CheckName::Disks => "diskHealthCheck",
            CheckName::NetworkInterfaces => "networkInterfaceCheck",
        }
    }
}

impl std::fmt::Display for CheckName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why a sub-check ended the way it did.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum CheckOutcome {
    Passed,
    /// The provider answered and reported an unhealthy state.
    Failed,
    /// The resource or one of its sub-resources does not exist.
    NotFound,
    /// Any other client failure: auth, transport, throttling, bad payload.
    ClientError,
}

impl CheckOutcome {
    pub fn is_error(&self) -> bool {
        matches!(self, CheckOutcome::NotFound | CheckOutcome::ClientError)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CheckResult {
    pub check: CheckName,
    pub outcome: CheckOutcome,
    pub message: String,
    pub response_time_ms: u64,
}

impl CheckResult {
    pub fn passed(check: CheckName, message: impl Into<String>) -> Self {
        Self::new(check, CheckOutcome::Passed, message.into())
    }

    pub fn failed(check: CheckName, message: impl Into<String>) -> Self {
        Self::new(check, CheckOutcome::Failed, message.into())
    }

    pub fn errored(check: CheckName, error: &ClientError) -> Self {
        let outcome = if error.is_not_found() {
            CheckOutcome::NotFound
        } else {
            CheckOutcome::ClientError
        };
        Self::new(check, outcome, format!("Error: {}", error))
    }

    fn new(check: CheckName, outcome: CheckOutcome, message: String) -> Self {
        Self {
            check,
            outcome,
            message,
            response_time_ms: 0,
        }
    }

    fn timed(mut self, start: Instant) -> Self {
        self.response_time_ms = start.elapsed().as_millis() as u64;
        self
    }

    pub fn is_healthy(&self) -> bool {
        self.outcome == CheckOutcome::Passed
    }
}

/// Passes iff any instance status carries the running power state.
pub async fn check_power_state(client: &dyn ResourceClient, identity: &ResourceIdentity) -> CheckResult {
    let start = Instant::now();

    let result = match client
        .instance_statuses(identity.resource_group(), identity.name())
        .await
    {
        Ok(statuses) => {
            if statuses.iter().any(|code| code.contains(POWER_STATE_RUNNING)) {
                CheckResult::passed(CheckName::PowerState, "VM is running.")
            } else {
                debug!(resource = %identity, ?statuses, "No running power state reported");
                CheckResult::failed(CheckName::PowerState, "VM is not running.")
            }
        }
        Err(e) => CheckResult::errored(CheckName::PowerState, &e),
    };

    result.timed(start)
}

/// Passes iff every managed data disk is provisioned. Stops at the first
/// disk that is not.
pub async fn check_disks(client: &dyn ResourceClient, identity: &ResourceIdentity) -> CheckResult {
    let start = Instant::now();

    let result = match first_unhealthy_disk(client, identity).await {
        Ok(None) => CheckResult::passed(CheckName::Disks, "All disks are healthy."),
        Ok(Some(name)) => CheckResult::failed(CheckName::Disks, format!("Disk {} is not healthy.", name)),
        Err(e) => CheckResult::errored(CheckName::Disks, &e),
    };

    result.timed(start)
}

async fn first_unhealthy_disk(
    client: &dyn ResourceClient,
    identity: &ResourceIdentity,
) -> ClientResult<Option<String>> {
    let description = client
        .resource_description(identity.resource_group(), identity.name())
        .await?;

    for disk in &description.data_disks {
        let Some(disk_id) = disk.managed_disk_id.as_deref() else {
            debug!(resource = %identity, disk = %disk.name, "Skipping unmanaged data disk");
            continue;
        };

        let record = client.disk_provisioning_state(disk_id).await?;
        if !record.is_succeeded() {
            debug!(
                resource = %identity,
                disk = %record.name,
                state = %record.provisioning_state,
                "Data disk not provisioned"
            );
            return Ok(Some(record.name));
        }
    }

    Ok(None)
}

/// Passes iff every attached network interface is provisioned. Stops at
/// the first interface that is not.
pub async fn check_nics(client: &dyn ResourceClient, identity: &ResourceIdentity) -> CheckResult {
    let start = Instant::now();

    let result = match first_unhealthy_nic(client, identity).await {
        Ok(None) => CheckResult::passed(CheckName::NetworkInterfaces, "All NICs are healthy."),
        Ok(Some(name)) => {
            CheckResult::failed(CheckName::NetworkInterfaces, format!("NIC {} is not healthy.", name))
        }
        Err(e) => CheckResult::errored(CheckName::NetworkInterfaces, &e),
    };

    result.timed(start)
}

async fn first_unhealthy_nic(
    client: &dyn ResourceClient,
    identity: &ResourceIdentity,
) -> ClientResult<Option<String>> {
    let description = client
        .resource_description(identity.resource_group(), identity.name())
        .await?;

    for nic_id in &description.network_interface_ids {
        let nic_name = nic_name_from_id(nic_id)?;
        let record = client
            .nic_provisioning_state(identity.resource_group(), nic_name)
            .await?;
        if !record.is_succeeded() {
            debug!(
                resource = %identity,
                nic = %record.name,
                state = %record.provisioning_state,
                "Network interface not provisioned"
            );
            return Ok(Some(record.name));
        }
    }

    Ok(None)
}

/// What a health-check registry needs from a registered check.
#[async_trait::async_trait]
pub trait HealthCheck: Send + Sync {
    fn identifier(&self) -> &str;
    fn metadata(&self) -> &CheckMetadata;
    async fn check_health(&self) -> HealthStatus;
    /// Last message per check name. Entries for checks skipped in the most
    /// recent run are left from earlier runs.
    fn status_messages(&self) -> BTreeMap<String, String>;
}
