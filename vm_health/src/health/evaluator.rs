//! Composite virtual machine health evaluation

use super::checks::{
    check_disks, check_nics, check_power_state, CheckName, CheckOutcome, CheckResult,
    HealthCheck, HealthStatus,
};
use super::diagnostics::DiagnosticMessages;
use crate::client::ResourceClient;
use crate::identity::{CheckMetadata, ResourceIdentity};
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, info, warn};

/// Result of one pass over the sub-checks.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Evaluation {
    pub status: HealthStatus,
    /// Only the checks that ran, in the order they ran.
    pub results: Vec<CheckResult>,
}

impl Evaluation {
    pub fn result(&self, check: CheckName) -> Option<&CheckResult> {
        self.results.iter().find(|r| r.check == check)
    }

    pub fn ran(&self, check: CheckName) -> bool {
        self.result(check).is_some()
    }
}

/// Runs power state, disk and NIC checks in that order and stops at the
/// first one that does not pass.
pub async fn evaluate_resource(client: &dyn ResourceClient, identity: &ResourceIdentity) -> Evaluation {
    let mut results = Vec::with_capacity(CheckName::ORDER.len());

    for check in CheckName::ORDER {
        let result = match check {
            CheckName::PowerState => check_power_state(client, identity).await,
            CheckName::Disks => check_disks(client, identity).await,
            CheckName::NetworkInterfaces => check_nics(client, identity).await,
        };

        match result.outcome {
            CheckOutcome::Passed => {
                debug!(resource = %identity, check = %check, "Check passed in {}ms", result.response_time_ms);
            }
            CheckOutcome::Failed => {
                warn!(resource = %identity, check = %check, "Check failed: {}", result.message);
            }
            CheckOutcome::NotFound | CheckOutcome::ClientError => {
                error!(resource = %identity, check = %check, "Check could not complete: {}", result.message);
            }
        }

        let healthy = result.is_healthy();
        results.push(result);

        if !healthy {
            let skipped = &CheckName::ORDER[results.len()..];
            if !skipped.is_empty() {
                debug!(resource = %identity, ?skipped, "Skipping remaining checks");
            }
            return Evaluation {
                status: HealthStatus::Unhealthy,
                results,
            };
        }
    }

    Evaluation {
        status: HealthStatus::Healthy,
        results,
    }
}

/// Snapshot of a check's state after an evaluation, for reporting.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthReport {
    pub identifier: String,
    pub metadata: CheckMetadata,
    pub status: HealthStatus,
    pub cycle: u64,
    pub messages: BTreeMap<String, String>,
    pub generated_at: DateTime<Utc>,
}

/// Health check for one virtual machine.
///
/// Construction does no I/O. Each [`evaluate`](Self::evaluate) queries the
/// resource client and updates the diagnostics of the checks that ran.
/// Overlapping calls on the same instance are serialized.
pub struct VmHealthCheck {
    identity: ResourceIdentity,
    metadata: CheckMetadata,
    client: Arc<dyn ResourceClient>,
    diagnostics: RwLock<DiagnosticMessages>,
    cycles: AtomicU64,
    evaluation_gate: tokio::sync::Mutex<()>,
}

impl VmHealthCheck {
    pub fn new(identity: ResourceIdentity, client: Arc<dyn ResourceClient>) -> Self {
        let metadata = identity.metadata();
        Self {
            identity,
            metadata,
            client,
            diagnostics: RwLock::new(DiagnosticMessages::new()),
            cycles: AtomicU64::new(0),
            evaluation_gate: tokio::sync::Mutex::new(()),
        }
    }

    pub fn identity(&self) -> &ResourceIdentity {
        &self.identity
    }

    pub fn metadata(&self) -> &CheckMetadata {
        &self.metadata
    }

    /// Number of completed evaluations.
    pub fn cycles(&self) -> u64 {
        self.cycles.load(Ordering::Acquire)
    }

    pub fn diagnostics(&self) -> DiagnosticMessages {
        self.diagnostics.read().clone()
    }

    pub async fn evaluate(&self) -> HealthStatus {
        let _gate = self.evaluation_gate.lock().await;
        self.run_cycle().await.0
    }

    /// Evaluates and captures the resulting state without letting another
    /// evaluation slip in between.
    pub async fn evaluate_report(&self) -> HealthReport {
        let _gate = self.evaluation_gate.lock().await;
        let (status, cycle) = self.run_cycle().await;

        HealthReport {
            identifier: self.identity.name().to_string(),
            metadata: self.metadata.clone(),
            status,
            cycle,
            messages: self.diagnostics.read().to_status_messages(),
            generated_at: Utc::now(),
        }
    }

    // Caller must hold the evaluation gate.
    async fn run_cycle(&self) -> (HealthStatus, u64) {
        let cycle = self.cycles.load(Ordering::Acquire) + 1;
        let start = Instant::now();

        info!(resource = %self.identity, cycle, "Running virtual machine health checks");

        let evaluation = evaluate_resource(self.client.as_ref(), &self.identity).await;

        {
            let mut diagnostics = self.diagnostics.write();
            for result in &evaluation.results {
                diagnostics.record(result, cycle);
            }
        }
        self.cycles.store(cycle, Ordering::Release);

        info!(
            resource = %self.identity,
            cycle,
            checks_run = evaluation.results.len(),
            "Health evaluation completed in {:?} - Overall status: {}",
            start.elapsed(),
            evaluation.status
        );

        (evaluation.status, cycle)
    }
}

#[async_trait::async_trait]
impl HealthCheck for VmHealthCheck {
    fn identifier(&self) -> &str {
        self.identity.name()
    }

    fn metadata(&self) -> &CheckMetadata {
        &self.metadata
    }

    async fn check_health(&self) -> HealthStatus {
        self.evaluate().await
    }

    fn status_messages(&self) -> BTreeMap<String, String> {
        self.diagnostics.read().to_status_messages()
    }
}
