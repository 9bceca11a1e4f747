// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Client creation for the cluster under test

use crate::error::{E2eError, Result};
use kube::{Client, Config as KConfig};
use tracing::{debug, info, instrument};

/// Create a Kubernetes client for the cluster under test.
///
/// Configuration is inferred from `KUBECONFIG`, the default kubeconfig
/// location or the in-cluster service account, in that order.
#[instrument]
pub async fn load_client() -> Result<Client> {
    let config = KConfig::infer()
        .await
        .map_err(|e| E2eError::ClientError(format!("Failed to infer config: {}", e)))?;

    debug!("Using cluster URL {}", config.cluster_url);

    let client = Client::try_from(config)
        .map_err(|e| E2eError::ClientError(format!("Failed to create client: {}", e)))?;

    info!("Connected to Kubernetes cluster");
    Ok(client)
}
