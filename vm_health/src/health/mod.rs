pub mod checks;
pub mod diagnostics;
pub mod evaluator;


pub use checks::{
    check_disks, check_nics, check_power_state, CheckName, CheckOutcome, CheckResult, HealthCheck,
    HealthStatus, POWER_STATE_RUNNING,
};
pub use diagnostics::{Diagnostic, DiagnosticMessages};
pub use evaluator::{evaluate_resource, Evaluation, HealthReport, VmHealthCheck};
