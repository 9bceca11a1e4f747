// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Scenarios for the resources the machine API operator owns

use super::{expect, step, Suite};
use crate::checks::*;
use crate::constants::resources::{
    CONTROLLERS_DEPLOYMENT, OPERATOR_DEPLOYMENT, TERMINATION_HANDLER_DAEMONSET,
};
use crate::constants::webhooks::CONFIGURATION_NAME;
use crate::error::{E2eError, Result};
use crate::kubernetes::{poll_immediate, PollSchedule};
use k8s_openapi::api::admissionregistration::v1::WebhookClientConfig;
use k8s_openapi::ByteString;
use std::future::Future;
use tracing::warn;

/// caBundle written over the injected one
const PERTURBED_CA_BUNDLE: &[u8] = b"test";

/// A supported review version that differs from the managed one
const PERTURBED_REVIEW_VERSION: &str = "v1";

/// Seconds added to the termination handler's minReadySeconds
const PERTURBED_MIN_READY_SECONDS: i32 = 30;

impl Suite {
    pub(super) async fn operator_available(&self) -> Result<()> {
        expect(
            is_deployment_available(&self.client, OPERATOR_DEPLOYMENT, self.namespace()).await,
            format!("deployment {:?} should be available", OPERATOR_DEPLOYMENT),
        )
    }

    pub(super) async fn reconcile_controllers_deployment(&self) -> Result<()> {
        let (client, name, namespace) = (&self.client, CONTROLLERS_DEPLOYMENT, self.namespace());
        let initial = get_deployment(client, name, namespace).await?;

        step(format!("checking deployment {:?} is available", name));
        self.expect_deployment_available(name).await?;

        step(format!("deleting deployment {:?}", name));
        delete_deployment(client, &initial).await?;

        step(format!("checking deployment {:?} is available again", name));
        self.expect_deployment_available(name).await?;

        step(format!("checking deployment {:?} spec matches", name));
        expect(
            is_deployment_synced(client, &initial, name, namespace).await,
            format!("deployment {:?} spec should match the initial spec", name),
        )
    }

    pub(super) async fn maintain_deployment_spec(&self) -> Result<()> {
        let (client, name, namespace) = (&self.client, CONTROLLERS_DEPLOYMENT, self.namespace());
        let initial = get_deployment(client, name, namespace).await?;

        step(format!("checking deployment {:?} is available", name));
        self.expect_deployment_available(name).await?;

        let mut changed = initial.clone();
        if let Some(spec) = changed.spec.as_mut() {
            spec.replicas = Some(0);
        }

        step(format!("updating deployment {:?}", name));
        update_deployment(client, name, namespace, &changed).await?;

        step(format!("checking deployment {:?} spec matches", name));
        expect(
            is_deployment_synced(client, &initial, name, namespace).await,
            format!("deployment {:?} spec should be restored", name),
        )?;

        step(format!("checking deployment {:?} is available again", name));
        self.expect_deployment_available(name).await
    }

    pub(super) async fn reconcile_termination_handler_daemonset(&self) -> Result<()> {
        let (client, name, namespace) =
            (&self.client, TERMINATION_HANDLER_DAEMONSET, self.namespace());
        let initial = get_daemonset(client, name, namespace).await?;

        step(format!("checking daemonSet {:?} is available", name));
        self.expect_daemonset_available(name).await?;

        step(format!("deleting daemonSet {:?}", name));
        delete_daemonset(client, &initial).await?;

        step(format!("checking daemonSet {:?} is available again", name));
        self.expect_daemonset_available(name).await?;

        step(format!("checking daemonSet {:?} spec matches", name));
        expect(
            is_daemonset_synced(client, &initial, name, namespace).await,
            format!("daemonSet {:?} spec should match the initial spec", name),
        )
    }

    pub(super) async fn maintain_termination_handler_daemonset_spec(&self) -> Result<()> {
        let (client, name, namespace) =
            (&self.client, TERMINATION_HANDLER_DAEMONSET, self.namespace());
        let initial = get_daemonset(client, name, namespace).await?;

        step(format!("checking daemonSet {:?} is available", name));
        self.expect_daemonset_available(name).await?;

        // The selector is immutable in apps/v1, so drift is introduced elsewhere
        let mut changed = initial.clone();
        if let Some(spec) = changed.spec.as_mut() {
            spec.min_ready_seconds =
                Some(spec.min_ready_seconds.unwrap_or(0) + PERTURBED_MIN_READY_SECONDS);
        }

        step(format!("updating daemonSet {:?}", name));
        update_daemonset(client, name, namespace, &changed).await?;

        step(format!("checking daemonSet {:?} spec matches", name));
        expect(
            is_daemonset_synced(client, &initial, name, namespace).await,
            format!("daemonSet {:?} spec should be restored", name),
        )?;

        step(format!("checking daemonSet {:?} is available again", name));
        self.expect_daemonset_available(name).await
    }

    pub(super) async fn reconcile_mutating_webhook_configuration(&self) -> Result<()> {
        self.expect_mutating_synced().await
    }

    pub(super) async fn reconcile_validating_webhook_configuration(&self) -> Result<()> {
        self.expect_validating_synced().await
    }

    pub(super) async fn recover_validating_webhook_configuration_deletion(&self) -> Result<()> {
        step("deleting validating webhook configuration");
        delete_validating_webhook_configuration(
            &self.client,
            &default_validating_webhook_configuration(self.namespace()),
        )
        .await?;

        self.expect_validating_synced().await
    }

    pub(super) async fn recover_mutating_webhook_configuration_deletion(&self) -> Result<()> {
        step("deleting mutating webhook configuration");
        delete_mutating_webhook_configuration(
            &self.client,
            &default_mutating_webhook_configuration(self.namespace()),
        )
        .await?;

        self.expect_mutating_synced().await
    }

    pub(super) async fn maintain_mutating_webhook_configuration_spec(&self) -> Result<()> {
        let initial = get_mutating_webhook_configuration(&self.client, CONFIGURATION_NAME).await?;

        let mut to_update = initial.clone();
        for webhook in to_update.webhooks.iter_mut().flatten() {
            webhook.client_config.ca_bundle = Some(ByteString(PERTURBED_CA_BUNDLE.to_vec()));
            webhook.admission_review_versions = vec![PERTURBED_REVIEW_VERSION.to_string()];
        }

        step("updating mutating webhook configuration");
        update_mutating_webhook_configuration(&self.client, &to_update).await?;

        self.expect_mutating_synced().await?;

        step("checking mutating webhook caBundles are restored");
        let client = &self.client;
        wait_for_ca_bundles(
            "mutating webhook configuration",
            &ca_bundles(initial.webhooks.iter().flatten().map(|w| &w.client_config)),
            || async move {
                let live = get_mutating_webhook_configuration(client, CONFIGURATION_NAME).await?;
                Ok::<_, E2eError>(ca_bundles(live.webhooks.iter().flatten().map(|w| &w.client_config)))
            },
        )
        .await
    }

    pub(super) async fn maintain_validating_webhook_configuration_spec(&self) -> Result<()> {
        let initial =
            get_validating_webhook_configuration(&self.client, CONFIGURATION_NAME).await?;

        let mut to_update = initial.clone();
        for webhook in to_update.webhooks.iter_mut().flatten() {
            webhook.client_config.ca_bundle = Some(ByteString(PERTURBED_CA_BUNDLE.to_vec()));
            webhook.admission_review_versions = vec![PERTURBED_REVIEW_VERSION.to_string()];
        }

        step("updating validating webhook configuration");
        update_validating_webhook_configuration(&self.client, &to_update).await?;

        self.expect_validating_synced().await?;

        step("checking validating webhook caBundles are restored");
        let client = &self.client;
        wait_for_ca_bundles(
            "validating webhook configuration",
            &ca_bundles(initial.webhooks.iter().flatten().map(|w| &w.client_config)),
            || async move {
                let live = get_validating_webhook_configuration(client, CONFIGURATION_NAME).await?;
                Ok::<_, E2eError>(ca_bundles(live.webhooks.iter().flatten().map(|w| &w.client_config)))
            },
        )
        .await
    }

    async fn expect_deployment_available(&self, name: &str) -> Result<()> {
        expect(
            is_deployment_available(&self.client, name, self.namespace()).await,
            format!("deployment {:?} should be available", name),
        )
    }

    async fn expect_daemonset_available(&self, name: &str) -> Result<()> {
        expect(
            is_daemonset_available(&self.client, name, self.namespace()).await,
            format!("daemonSet {:?} should be available", name),
        )
    }

    async fn expect_mutating_synced(&self) -> Result<()> {
        expect(
            is_mutating_webhook_configuration_synced(&self.client, self.namespace()).await,
            "mutating webhook configuration should be synced",
        )
    }

    async fn expect_validating_synced(&self) -> Result<()> {
        expect(
            is_validating_webhook_configuration_synced(&self.client, self.namespace()).await,
            "validating webhook configuration should be synced",
        )
    }
}

fn ca_bundles<'a>(
    configs: impl Iterator<Item = &'a WebhookClientConfig>,
) -> Vec<Option<ByteString>> {
    configs.map(|config| config.ca_bundle.clone()).collect()
}

/// Poll until every webhook carries the caBundle it had before the update.
///
/// Webhook sync ignores caBundle, so the injector may still be rewriting it
/// after the configuration itself has been restored.
async fn wait_for_ca_bundles<F, Fut>(
    kind: &str,
    initial: &[Option<ByteString>],
    mut current: F,
) -> Result<()>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<Vec<Option<ByteString>>>>,
{
    let outcome = poll_immediate(
        &format!("{} caBundles to be restored", kind),
        PollSchedule::SHORT,
        || {
            let live = current();
            async move {
                let live = match live.await {
                    Ok(live) => live,
                    Err(e) => {
                        warn!("Error getting {}: {}", kind, e);
                        return Ok(false);
                    }
                };

                match expect_ca_bundles_preserved(initial, &live) {
                    Ok(()) => Ok(true),
                    Err(e) => {
                        warn!("{}: {}", kind, e);
                        Ok(false)
                    }
                }
            }
        },
    )
    .await;

    outcome.map_err(|e| match e {
        E2eError::Timeout { timeout, .. } => E2eError::Assertion(format!(
            "caBundles of the {} were not restored within {:?}",
            kind, timeout
        )),
        other => other,
    })
}

/// Every webhook keeps the caBundle it had before the update, position by position
fn expect_ca_bundles_preserved(
    initial: &[Option<ByteString>],
    updated: &[Option<ByteString>],
) -> Result<()> {
    expect(
        initial.len() == updated.len(),
        format!(
            "webhook count changed from {} to {}",
            initial.len(),
            updated.len()
        ),
    )?;

    for (i, (before, after)) in initial.iter().zip(updated).enumerate() {
        expect(
            before == after,
            format!("caBundle of webhook {} was not restored", i),
        )?;
    }

    Ok(())
}
