// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Admission webhook configurations the operator is expected to maintain

use super::compare::is_derivative;
use super::{render_yaml, settle};
use crate::constants::webhooks::*;
use crate::error::Result;
use crate::kubernetes::{poll_immediate, resource, PollSchedule};
use k8s_openapi::api::admissionregistration::v1::{
    MutatingWebhook, MutatingWebhookConfiguration, RuleWithOperations, ServiceReference,
    ValidatingWebhook, ValidatingWebhookConfiguration, WebhookClientConfig,
};
use kube::{api::ObjectMeta, Api, Client, ResourceExt};
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::{debug, info, instrument, warn};

const FAILURE_POLICY: &str = "Ignore";
const SIDE_EFFECTS: &str = "None";
const ADMISSION_REVIEW_VERSION: &str = "v1beta1";

/// The MutatingWebhookConfiguration the operator should keep in place
pub fn default_mutating_webhook_configuration(namespace: &str) -> MutatingWebhookConfiguration {
    MutatingWebhookConfiguration {
        metadata: configuration_metadata(),
        webhooks: Some(vec![
            mutating_webhook(MACHINE_MUTATING_HOOK, MACHINE_MUTATING_PATH, "machines", namespace),
            mutating_webhook(
                MACHINESET_MUTATING_HOOK,
                MACHINESET_MUTATING_PATH,
                "machinesets",
                namespace,
            ),
        ]),
    }
}

/// The ValidatingWebhookConfiguration the operator should keep in place
pub fn default_validating_webhook_configuration(namespace: &str) -> ValidatingWebhookConfiguration {
    ValidatingWebhookConfiguration {
        metadata: configuration_metadata(),
        webhooks: Some(vec![
            validating_webhook(
                MACHINE_VALIDATING_HOOK,
                MACHINE_VALIDATING_PATH,
                "machines",
                namespace,
            ),
            validating_webhook(
                MACHINESET_VALIDATING_HOOK,
                MACHINESET_VALIDATING_PATH,
                "machinesets",
                namespace,
            ),
        ]),
    }
}

fn configuration_metadata() -> ObjectMeta {
    ObjectMeta {
        name: Some(CONFIGURATION_NAME.to_string()),
        annotations: Some(BTreeMap::from([(
            INJECT_CA_BUNDLE_ANNOTATION.to_string(),
            "true".to_string(),
        )])),
        ..Default::default()
    }
}

fn mutating_webhook(name: &str, path: &str, resource: &str, namespace: &str) -> MutatingWebhook {
    MutatingWebhook {
        name: name.to_string(),
        admission_review_versions: vec![ADMISSION_REVIEW_VERSION.to_string()],
        client_config: client_config(path, namespace),
        failure_policy: Some(FAILURE_POLICY.to_string()),
        side_effects: SIDE_EFFECTS.to_string(),
        rules: Some(vec![rule(resource, &["CREATE"])]),
        ..Default::default()
    }
}

fn validating_webhook(
    name: &str,
    path: &str,
    resource: &str,
    namespace: &str,
) -> ValidatingWebhook {
    ValidatingWebhook {
        name: name.to_string(),
        admission_review_versions: vec![ADMISSION_REVIEW_VERSION.to_string()],
        client_config: client_config(path, namespace),
        failure_policy: Some(FAILURE_POLICY.to_string()),
        side_effects: SIDE_EFFECTS.to_string(),
        rules: Some(vec![rule(resource, &["CREATE", "UPDATE"])]),
        ..Default::default()
    }
}

fn client_config(path: &str, namespace: &str) -> WebhookClientConfig {
    WebhookClientConfig {
        service: Some(ServiceReference {
            name: SERVICE_NAME.to_string(),
            namespace: namespace.to_string(),
            path: Some(path.to_string()),
            port: Some(SERVICE_PORT),
        }),
        ..Default::default()
    }
}

fn rule(resource: &str, operations: &[&str]) -> RuleWithOperations {
    RuleWithOperations {
        api_groups: Some(vec![API_GROUP.to_string()]),
        api_versions: Some(vec![API_VERSION.to_string()]),
        resources: Some(vec![resource.to_string()]),
        operations: Some(operations.iter().map(|op| op.to_string()).collect()),
        ..Default::default()
    }
}

/// Get a MutatingWebhookConfiguration, retrying until it can be read
pub async fn get_mutating_webhook_configuration(
    client: &Client,
    name: &str,
) -> Result<MutatingWebhookConfiguration> {
    resource::get(&Api::all(client.clone()), name).await
}

/// Get a ValidatingWebhookConfiguration, retrying until it can be read
pub async fn get_validating_webhook_configuration(
    client: &Client,
    name: &str,
) -> Result<ValidatingWebhookConfiguration> {
    resource::get(&Api::all(client.clone()), name).await
}

/// Delete the MutatingWebhookConfiguration named in `configuration`'s metadata
pub async fn delete_mutating_webhook_configuration(
    client: &Client,
    configuration: &MutatingWebhookConfiguration,
) -> Result<()> {
    let api: Api<MutatingWebhookConfiguration> = Api::all(client.clone());
    resource::delete(&api, &configuration.name_any()).await
}

/// Delete the ValidatingWebhookConfiguration named in `configuration`'s metadata
pub async fn delete_validating_webhook_configuration(
    client: &Client,
    configuration: &ValidatingWebhookConfiguration,
) -> Result<()> {
    let api: Api<ValidatingWebhookConfiguration> = Api::all(client.clone());
    resource::delete(&api, &configuration.name_any()).await
}

/// Replace the live configuration named like `updated` with `updated`
pub async fn update_mutating_webhook_configuration(
    client: &Client,
    updated: &MutatingWebhookConfiguration,
) -> Result<()> {
    resource::update(&Api::all(client.clone()), &updated.name_any(), updated).await
}

/// Replace the live configuration named like `updated` with `updated`
pub async fn update_validating_webhook_configuration(
    client: &Client,
    updated: &ValidatingWebhookConfiguration,
) -> Result<()> {
    resource::update(&Api::all(client.clone()), &updated.name_any(), updated).await
}

/// Wait until the live MutatingWebhookConfiguration matches the default one
#[instrument(skip(client))]
pub async fn is_mutating_webhook_configuration_synced(client: &Client, namespace: &str) -> bool {
    let expected = default_mutating_webhook_configuration(namespace);
    let expected = &expected;
    let outcome = poll_immediate(
        "mutating webhook configuration to sync",
        PollSchedule::MEDIUM,
        || async move {
            let live = match get_mutating_webhook_configuration(client, CONFIGURATION_NAME).await {
                Ok(live) => live,
                Err(e) => {
                    warn!("Error getting mutating webhook configuration: {}", e);
                    return Ok(false);
                }
            };
            webhooks_synced("MutatingWebhookConfiguration", &expected.webhooks, &live.webhooks)
        },
    )
    .await;

    settle("is_mutating_webhook_configuration_synced", outcome)
}

/// Wait until the live ValidatingWebhookConfiguration matches the default one
#[instrument(skip(client))]
pub async fn is_validating_webhook_configuration_synced(client: &Client, namespace: &str) -> bool {
    let expected = default_validating_webhook_configuration(namespace);
    let expected = &expected;
    let outcome = poll_immediate(
        "validating webhook configuration to sync",
        PollSchedule::MEDIUM,
        || async move {
            let live =
                match get_validating_webhook_configuration(client, CONFIGURATION_NAME).await {
                    Ok(live) => live,
                    Err(e) => {
                        warn!("Error getting validating webhook configuration: {}", e);
                        return Ok(false);
                    }
                };
            webhooks_synced("ValidatingWebhookConfiguration", &expected.webhooks, &live.webhooks)
        },
    )
    .await;

    settle("is_validating_webhook_configuration_synced", outcome)
}

/// The live webhooks agree with every field the expected webhooks set.
///
/// caBundle is injected by the cluster and never set in the defaults, so it
/// does not take part in the comparison.
fn webhooks_synced<W: Serialize>(kind: &str, expected: &W, live: &W) -> Result<bool> {
    let expected_value = serde_json::to_value(expected)?;
    let live_value = serde_json::to_value(live)?;

    if !is_derivative(&expected_value, &live_value) {
        warn!("{} {:?} is not synced with the expected webhooks", kind, CONFIGURATION_NAME);
        debug!("Expected webhooks:\n{}", render_yaml(expected));
        return Ok(false);
    }

    info!("{} {:?} is synced", kind, CONFIGURATION_NAME);
    Ok(true)
}
