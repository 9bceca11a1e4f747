// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Deployment accessors and predicates

use super::{render_yaml, settle};
use crate::error::Result;
use crate::kubernetes::{poll_immediate, resource, PollSchedule};
use k8s_openapi::api::apps::v1::Deployment;
use kube::{Api, Client, ResourceExt};
use tracing::{debug, info, instrument, warn};

fn deployments(client: &Client, namespace: &str) -> Api<Deployment> {
    Api::namespaced(client.clone(), namespace)
}

/// Get a Deployment by name and namespace
pub async fn get_deployment(client: &Client, name: &str, namespace: &str) -> Result<Deployment> {
    resource::get(&deployments(client, namespace), name).await
}

/// Delete the given Deployment
pub async fn delete_deployment(client: &Client, deployment: &Deployment) -> Result<()> {
    let api = match deployment.namespace() {
        Some(namespace) => deployments(client, &namespace),
        None => Api::default_namespaced(client.clone()),
    };
    resource::delete(&api, &deployment.name_any()).await
}

/// Replace the named Deployment with `updated`
pub async fn update_deployment(
    client: &Client,
    name: &str,
    namespace: &str,
    updated: &Deployment,
) -> Result<()> {
    resource::update(&deployments(client, namespace), name, updated).await
}

/// Wait until the Deployment has at least one available replica
#[instrument(skip(client))]
pub async fn is_deployment_available(client: &Client, name: &str, namespace: &str) -> bool {
    let outcome = poll_immediate(
        &format!("deployment {:?} to become available", name),
        PollSchedule::LONG,
        || async move {
            let deployment = match get_deployment(client, name, namespace).await {
                Ok(deployment) => deployment,
                Err(e) => {
                    warn!("Error getting deployment: {}", e);
                    return Ok(false);
                }
            };

            if !deployment_is_available(&deployment) {
                warn!(
                    "Deployment {:?} is not available. Status: {}",
                    name,
                    deployment_info(&deployment)
                );
                return Ok(false);
            }

            info!(
                "Deployment {:?} is available. Status: {}",
                name,
                deployment_info(&deployment)
            );
            Ok(true)
        },
    )
    .await;

    settle("is_deployment_available", outcome)
}

/// Wait until the live Deployment spec equals the spec of `expected`
#[instrument(skip(client, expected))]
pub async fn is_deployment_synced(
    client: &Client,
    expected: &Deployment,
    name: &str,
    namespace: &str,
) -> bool {
    let outcome = poll_immediate(
        &format!("deployment {:?} spec to sync", name),
        PollSchedule::MEDIUM,
        || async move {
            let deployment = match get_deployment(client, name, namespace).await {
                Ok(deployment) => deployment,
                Err(e) => {
                    warn!("Error getting deployment: {}", e);
                    return Ok(false);
                }
            };

            if deployment.spec != expected.spec {
                warn!("Deployment {:?} is not updated. Spec is not equal to expected", name);
                debug!("Expected spec:\n{}", render_yaml(&expected.spec));
                debug!("Actual spec:\n{}", render_yaml(&deployment.spec));
                return Ok(false);
            }

            info!("Deployment {:?} is updated. Spec is matched", name);
            Ok(true)
        },
    )
    .await;

    settle("is_deployment_synced", outcome)
}

/// At least one available replica and no Available condition other than True
fn deployment_is_available(deployment: &Deployment) -> bool {
    let Some(status) = deployment.status.as_ref() else {
        return false;
    };

    let condition_ok = status.conditions.as_ref().is_none_or(|conditions| {
        conditions
            .iter()
            .filter(|c| c.type_ == "Available")
            .all(|c| c.status == "True")
    });

    status.available_replicas.unwrap_or(0) >= 1 && condition_ok
}

fn deployment_info(deployment: &Deployment) -> String {
    let status = deployment.status.clone().unwrap_or_default();
    format!(
        "(replicas: {}, updated: {}, ready: {}, available: {}, unavailable: {})",
        status.replicas.unwrap_or(0),
        status.updated_replicas.unwrap_or(0),
        status.ready_replicas.unwrap_or(0),
        status.available_replicas.unwrap_or(0),
        status.unavailable_replicas.unwrap_or(0),
    )
}
