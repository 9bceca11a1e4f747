// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Declarative end-to-end scenarios against a live machine API operator.
//!
//! Each scenario perturbs cluster state and asserts the operator heals it.
//! A failed expectation surfaces as [`E2eError::Assertion`].

mod operator;
mod status;

use crate::checks::is_status_available;
use crate::config::Config;
use crate::error::{E2eError, Result};
use kube::Client;
use std::fmt;
use tracing::{error, info, instrument};

/// Groups of scenarios sharing a setup
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Group {
    OperatorDeployment,
    ClusterOperatorStatus,
}

impl Group {
    pub fn description(&self) -> &'static str {
        match self {
            Group::OperatorDeployment => "[Feature:Operators] Machine API operator deployment should",
            Group::ClusterOperatorStatus => {
                "[Feature:Operators] Machine API cluster operator status should"
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scenario {
    OperatorAvailable,
    ReconcileControllersDeployment,
    MaintainDeploymentSpec,
    ReconcileTerminationHandlerDaemonSet,
    MaintainTerminationHandlerDaemonSetSpec,
    ReconcileMutatingWebhookConfiguration,
    ReconcileValidatingWebhookConfiguration,
    RecoverValidatingWebhookConfigurationDeletion,
    RecoverMutatingWebhookConfigurationDeletion,
    MaintainMutatingWebhookConfigurationSpec,
    MaintainValidatingWebhookConfigurationSpec,
    ClusterOperatorAvailable,
}

impl Scenario {
    pub const ALL: [Scenario; 12] = [
        Scenario::OperatorAvailable,
        Scenario::ReconcileControllersDeployment,
        Scenario::MaintainDeploymentSpec,
        Scenario::ReconcileTerminationHandlerDaemonSet,
        Scenario::MaintainTerminationHandlerDaemonSetSpec,
        Scenario::ReconcileMutatingWebhookConfiguration,
        Scenario::ReconcileValidatingWebhookConfiguration,
        Scenario::RecoverValidatingWebhookConfigurationDeletion,
        Scenario::RecoverMutatingWebhookConfigurationDeletion,
        Scenario::MaintainMutatingWebhookConfigurationSpec,
        Scenario::MaintainValidatingWebhookConfigurationSpec,
        Scenario::ClusterOperatorAvailable,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Scenario::OperatorAvailable | Scenario::ClusterOperatorAvailable => "be available",
            Scenario::ReconcileControllersDeployment => "reconcile controllers deployment",
            Scenario::MaintainDeploymentSpec => "maintains deployment spec",
            Scenario::ReconcileTerminationHandlerDaemonSet => {
                "reconcile termination handler daemonSet"
            }
            Scenario::MaintainTerminationHandlerDaemonSetSpec => {
                "maintains termination handler daemonSet spec"
            }
            Scenario::ReconcileMutatingWebhookConfiguration => {
                "reconcile mutating webhook configuration"
            }
            Scenario::ReconcileValidatingWebhookConfiguration => {
                "reconcile validating webhook configuration"
            }
            Scenario::RecoverValidatingWebhookConfigurationDeletion => {
                "recover after validating webhook configuration deletion"
            }
            Scenario::RecoverMutatingWebhookConfigurationDeletion => {
                "recover after mutating webhook configuration deletion"
            }
            Scenario::MaintainMutatingWebhookConfigurationSpec => {
                "maintains spec after mutating webhook configuration change and preserve caBundle"
            }
            Scenario::MaintainValidatingWebhookConfigurationSpec => {
                "maintains spec after validating webhook configuration change and preserve caBundle"
            }
        }
    }

    pub fn group(&self) -> Group {
        match self {
            Scenario::ClusterOperatorAvailable => Group::ClusterOperatorStatus,
            _ => Group::OperatorDeployment,
        }
    }
}

impl fmt::Display for Scenario {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.group().description(), self.name())
    }
}

/// Outcome of running a set of scenarios
#[derive(Debug, Default)]
pub struct Report {
    pub passed: Vec<Scenario>,
    pub failed: Vec<(Scenario, String)>,
}

impl Report {
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Scenario runner bound to one cluster
pub struct Suite {
    client: Client,
    config: Config,
}

impl Suite {
    pub fn new(client: Client, config: Config) -> Self {
        Self { client, config }
    }

    fn namespace(&self) -> &str {
        &self.config.namespace
    }

    /// Setup shared by the operator deployment scenarios
    pub async fn before_each(&self) -> Result<()> {
        expect(
            is_status_available(&self.client, &self.config.cluster_operator).await,
            format!(
                "cluster operator {:?} should be available",
                self.config.cluster_operator
            ),
        )
    }

    #[instrument(skip_all, fields(scenario = %scenario))]
    pub async fn run(&self, scenario: Scenario) -> Result<()> {
        info!("Running scenario");

        if scenario.group() == Group::OperatorDeployment {
            self.before_each().await?;
        }

        match scenario {
            Scenario::OperatorAvailable => self.operator_available().await,
            Scenario::ReconcileControllersDeployment => {
                self.reconcile_controllers_deployment().await
            }
            Scenario::MaintainDeploymentSpec => self.maintain_deployment_spec().await,
            Scenario::ReconcileTerminationHandlerDaemonSet => {
                self.reconcile_termination_handler_daemonset().await
            }
            Scenario::MaintainTerminationHandlerDaemonSetSpec => {
                self.maintain_termination_handler_daemonset_spec().await
            }
            Scenario::ReconcileMutatingWebhookConfiguration => {
                self.reconcile_mutating_webhook_configuration().await
            }
            Scenario::ReconcileValidatingWebhookConfiguration => {
                self.reconcile_validating_webhook_configuration().await
            }
            Scenario::RecoverValidatingWebhookConfigurationDeletion => {
                self.recover_validating_webhook_configuration_deletion().await
            }
            Scenario::RecoverMutatingWebhookConfigurationDeletion => {
                self.recover_mutating_webhook_configuration_deletion().await
            }
            Scenario::MaintainMutatingWebhookConfigurationSpec => {
                self.maintain_mutating_webhook_configuration_spec().await
            }
            Scenario::MaintainValidatingWebhookConfigurationSpec => {
                self.maintain_validating_webhook_configuration_spec().await
            }
            Scenario::ClusterOperatorAvailable => self.cluster_operator_available().await,
        }
    }

    /// Run every scenario in order, continuing past failures
    pub async fn run_all(&self) -> Report {
        let mut report = Report::default();

        for scenario in Scenario::ALL {
            match self.run(scenario).await {
                Ok(()) => {
                    info!("PASS: {}", scenario);
                    report.passed.push(scenario);
                }
                Err(e) => {
                    error!("FAIL: {}: {}", scenario, e);
                    report.failed.push((scenario, e.to_string()));
                }
            }
        }

        report
    }
}

fn expect(condition: bool, message: impl Into<String>) -> Result<()> {
    if condition {
        Ok(())
    } else {
        Err(E2eError::Assertion(message.into()))
    }
}

fn step(description: impl fmt::Display) {
    info!("STEP: {}", description);
}
