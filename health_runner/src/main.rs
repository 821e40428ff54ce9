//! One-shot health evaluation for a single virtual machine

use anyhow::Result;
use std::process::ExitCode;
use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};
use vm_health::{health_check_from_config, AppConfig, CheckName, HealthStatus};

#[tokio::main]
async fn main() -> Result<ExitCode> {
    init_tracing();

    let config = AppConfig::load()
        .map_err(|e| anyhow::anyhow!("Failed to load configuration: {}", e))?;

    info!("Configuration loaded successfully");
    info!(
        "Monitoring VM '{}' in resource group '{}' ({})",
        config.resource.name, config.resource.resource_group, config.resource.region
    );
    info!("Resource snapshot: {}", config.client.snapshot_path.display());

    let check = health_check_from_config(&config)
        .map_err(|e| anyhow::anyhow!("Failed to initialize health check: {}", e))?;

    let report = check.evaluate_report().await;
    let diagnostics = check.diagnostics();

    for name in CheckName::ORDER {
        match diagnostics.get(name) {
            Some(diagnostic) if diagnostic.cycle == report.cycle => {
                info!(check = %name, outcome = ?diagnostic.outcome, "{}", diagnostic.message);
            }
            _ => info!(check = %name, "Not evaluated"),
        }
    }

    info!(report = %serde_json::to_string(&report)?, "Health report");

    match report.status {
        HealthStatus::Healthy => {
            info!("VM '{}' is healthy", report.identifier);
            Ok(ExitCode::SUCCESS)
        }
        HealthStatus::Unhealthy => {
            warn!("VM '{}' is unhealthy", report.identifier);
            Ok(ExitCode::FAILURE)
        }
    }
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| {
            let default_level = if cfg!(debug_assertions) {
                "debug"
            } else {
                "info"
            };

            default_filter(default_level).into()
        });

    let fmt_layer = fmt::layer()
        .with_target(true)
        .with_file(true)
        .with_line_number(true);

    let is_json = std::env::var("LOG_FORMAT")
        .map(|v| v.to_lowercase() == "json")
        .unwrap_or(false);

    if is_json {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt_layer.json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt_layer.pretty())
            .init();
    }
}

// The binary's crate name is also `vm_health`, so one directive covers
// both the binary and the library.
fn default_filter(level: &str) -> String {
    format!("vm_health={}", level)
}
