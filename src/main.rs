// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use anyhow::{bail, Context, Result};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use machine_api_e2e::config::Config;
use machine_api_e2e::kubernetes::load_client;
use machine_api_e2e::scenarios::Suite;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    info!("Starting machine API operator end-to-end suite");

    // Load configuration
    let config = Config::from_env()?;
    info!(
        "Configuration loaded: namespace={}, cluster_operator={}",
        config.namespace, config.cluster_operator
    );

    // Create Kubernetes client
    let client = load_client()
        .await
        .context("Failed to connect to the cluster under test")?;

    let report = Suite::new(client, config).run_all().await;

    info!(
        "Ran {} scenarios: {} passed, {} failed",
        report.passed.len() + report.failed.len(),
        report.passed.len(),
        report.failed.len()
    );
    for (scenario, reason) in &report.failed {
        error!("FAILED: {}: {}", scenario, reason);
    }

    if !report.is_success() {
        bail!("{} scenario(s) failed", report.failed.len());
    }
    Ok(())
}
