// src/main.rs
use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::info;

use uptime_probe::{
    config,
    health::{CheckTargets, HealthCheckRunner},
    statuspage::StatusReporter,
    tracking::{Dsn, SentryTracker},
};

/// One invocation per process. Arguments passed by the trigger are ignored.
#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("uptime_probe=debug".parse()?)
                .add_directive("reqwest=info".parse()?),
        )
        .init();

    // Load configuration
    let settings = config::load_settings()?;

    let dsn: Dsn = settings.sentry_dsn.parse()?;
    let tracker = Arc::new(SentryTracker::new(dsn).context("Failed to create error tracker")?);

    let reporter = StatusReporter::new(
        settings.statuspage_url.clone(),
        settings.statuspage_token.clone(),
    )
    .context("Failed to create status page client")?;

    let runner = HealthCheckRunner::new(CheckTargets::from_settings(&settings), reporter, tracker)
        .context("Failed to create probe client")?;

    info!("Starting health check run");
    if let Some(outcomes) = runner.invoke().await {
        for outcome in outcomes {
            info!(
                check = outcome.target,
                status = %outcome.status,
                elapsed_ms = outcome.elapsed.as_millis() as u64,
                "Check finished"
            );
        }
    }

    Ok(())
}
