//! Composite health check for a single cloud virtual machine.
//!
//! A [`VmHealthCheck`] combines power state, data disk provisioning and
//! network interface provisioning into one [`HealthStatus`], keeping a
//! human readable message per check for the reporting side. Provider
//! access goes through the [`ResourceClient`] trait.

pub mod client;
pub mod config;
pub mod error;
pub mod health;
pub mod identity;

pub use client::{
    ClientError, DataDisk, ProvisioningRecord, ResourceClient, ResourceDescription, Snapshot,
    SnapshotClient, TimeoutClient, VmRecord,
};
pub use crate::config::AppConfig;
pub use error::{HealthError, Result};
pub use health::{
    evaluate_resource, CheckName, CheckOutcome, CheckResult, Diagnostic, DiagnosticMessages,
    Evaluation, HealthCheck, HealthReport, HealthStatus, VmHealthCheck,
};
pub use identity::{CheckMetadata, ResourceIdentity};

use std::sync::Arc;
use tracing::info;

/// Builds the client described by `config`: a snapshot-backed client,
/// wrapped with a per-call deadline unless the timeout is disabled.
pub fn client_from_config(config: &crate::config::ClientConfig) -> Result<Arc<dyn ResourceClient>> {
    let snapshot = SnapshotClient::from_path(&config.snapshot_path)?;

    let client: Arc<dyn ResourceClient> = match config.request_timeout() {
        Some(timeout) => {
            info!("Resource client calls bounded to {:?}", timeout);
            Arc::new(TimeoutClient::new(snapshot, timeout))
        }
        None => Arc::new(snapshot),
    };

    Ok(client)
}

/// Loads identity and client from `config` and builds the health check.
pub fn health_check_from_config(config: &AppConfig) -> Result<VmHealthCheck> {
    let identity = config.identity()?;
    let client = client_from_config(&config.client)?;
    Ok(VmHealthCheck::new(identity, client))
}
