// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! ClusterOperator status predicate

use super::settle;
use crate::kubernetes::{poll_immediate, PollSchedule};
use crate::types::cluster_operator::ClusterOperator;
use kube::{Api, Client};
use tracing::{info, instrument, warn};

/// Wait until the named ClusterOperator is available and settled
#[instrument(skip(client))]
pub async fn is_status_available(client: &Client, name: &str) -> bool {
    let operators: Api<ClusterOperator> = Api::all(client.clone());
    let operators = &operators;

    let outcome = poll_immediate(
        &format!("cluster operator {:?} to become available", name),
        PollSchedule::SHORT,
        || async move {
            let operator = match operators.get(name).await {
                Ok(operator) => operator,
                Err(e) => {
                    warn!("Error querying api for ClusterOperator {:?}: {}, retrying...", name, e);
                    return Ok(false);
                }
            };

            if !operator.is_available() {
                warn!(
                    "ClusterOperator {:?} is not available (available: {}, progressing: {}, degraded: {})",
                    name,
                    operator.condition_status("Available").unwrap_or("Unknown"),
                    operator.condition_status("Progressing").unwrap_or("Unknown"),
                    operator.condition_status("Degraded").unwrap_or("Unknown"),
                );
                return Ok(false);
            }

            info!("ClusterOperator {:?} is available", name);
            Ok(true)
        },
    )
    .await;

    settle("is_status_available", outcome)
}
