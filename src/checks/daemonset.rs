// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! DaemonSet accessors and predicates

use super::{render_yaml, settle};
use crate::error::Result;
use crate::kubernetes::{poll_immediate, resource, PollSchedule};
use k8s_openapi::api::apps::v1::DaemonSet;
use kube::{Api, Client, ResourceExt};
use tracing::{debug, info, instrument, warn};

fn daemonsets(client: &Client, namespace: &str) -> Api<DaemonSet> {
    Api::namespaced(client.clone(), namespace)
}

/// Get a DaemonSet by name and namespace
pub async fn get_daemonset(client: &Client, name: &str, namespace: &str) -> Result<DaemonSet> {
    resource::get(&daemonsets(client, namespace), name).await
}

/// Delete the given DaemonSet
pub async fn delete_daemonset(client: &Client, daemonset: &DaemonSet) -> Result<()> {
    let api = match daemonset.namespace() {
        Some(namespace) => daemonsets(client, &namespace),
        None => Api::default_namespaced(client.clone()),
    };
    resource::delete(&api, &daemonset.name_any()).await
}

/// Replace the named DaemonSet with `updated`
pub async fn update_daemonset(
    client: &Client,
    name: &str,
    namespace: &str,
    updated: &DaemonSet,
) -> Result<()> {
    resource::update(&daemonsets(client, namespace), name, updated).await
}

/// Wait until the DaemonSet has one or more ready pods
#[instrument(skip(client))]
pub async fn is_daemonset_available(client: &Client, name: &str, namespace: &str) -> bool {
    let outcome = poll_immediate(
        &format!("daemonset {:?} to become available", name),
        PollSchedule::LONG,
        || async move {
            let daemonset = match get_daemonset(client, name, namespace).await {
                Ok(daemonset) => daemonset,
                Err(e) => {
                    warn!("Error getting daemonset: {}", e);
                    return Ok(false);
                }
            };

            let ready = daemonset.status.as_ref().map_or(0, |s| s.number_ready);
            if ready < 1 {
                warn!(
                    "DaemonSet {:?} is not available. Status: {}",
                    name,
                    daemonset_info(&daemonset)
                );
                return Ok(false);
            }

            info!(
                "DaemonSet {:?} is available. Status: {}",
                name,
                daemonset_info(&daemonset)
            );
            Ok(true)
        },
    )
    .await;

    settle("is_daemonset_available", outcome)
}

/// Wait until the live DaemonSet spec equals the spec of `expected`
#[instrument(skip(client, expected))]
pub async fn is_daemonset_synced(
    client: &Client,
    expected: &DaemonSet,
    name: &str,
    namespace: &str,
) -> bool {
    let outcome = poll_immediate(
        &format!("daemonset {:?} spec to sync", name),
        PollSchedule::MEDIUM,
        || async move {
            let daemonset = match get_daemonset(client, name, namespace).await {
                Ok(daemonset) => daemonset,
                Err(e) => {
                    warn!("Error getting daemonset: {}", e);
                    return Ok(false);
                }
            };

            if daemonset.spec != expected.spec {
                warn!("DaemonSet {:?} is not updated. Spec is not equal to expected", name);
                debug!("Expected spec:\n{}", render_yaml(&expected.spec));
                debug!("Actual spec:\n{}", render_yaml(&daemonset.spec));
                return Ok(false);
            }

            info!("DaemonSet {:?} is updated. Spec is matched", name);
            Ok(true)
        },
    )
    .await;

    settle("is_daemonset_synced", outcome)
}

fn daemonset_info(daemonset: &DaemonSet) -> String {
    let status = daemonset.status.clone().unwrap_or_default();
    format!(
        "(desired: {}, updated: {}, available: {}, unavailable: {})",
        status.desired_number_scheduled,
        status.updated_number_scheduled.unwrap_or(0),
        status.number_available.unwrap_or(0),
        status.number_unavailable.unwrap_or(0),
    )
}
