// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Machine API operator scenarios against a live cluster.
//!
//! These tests need a cluster running the machine API operator and are
//! ignored by default. Point `KUBECONFIG` at the cluster and run:
//!
//! ```bash
//! cargo test --test operators -- --ignored --test-threads=1
//! ```
//!
//! Scenarios delete and modify operator-managed resources, so they must not
//! run concurrently.

use machine_api_e2e::config::Config;
use machine_api_e2e::kubernetes::load_client;
use machine_api_e2e::scenarios::{Scenario, Suite};

async fn run(scenario: Scenario) {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();

    let config = Config::from_env().expect("suite configuration");
    let client = load_client().await.expect("cluster client");

    if let Err(e) = Suite::new(client, config).run(scenario).await {
        panic!("{}: {}", scenario, e);
    }
}

mod machine_api_operator_deployment {
    use super::*;

    #[tokio::test]
    #[ignore = "requires a cluster running the machine API operator"]
    async fn be_available() {
        run(Scenario::OperatorAvailable).await;
    }

    #[tokio::test]
    #[ignore = "requires a cluster running the machine API operator"]
    async fn reconcile_controllers_deployment() {
        run(Scenario::ReconcileControllersDeployment).await;
    }

    #[tokio::test]
    #[ignore = "requires a cluster running the machine API operator"]
    async fn maintains_deployment_spec() {
        run(Scenario::MaintainDeploymentSpec).await;
    }

    #[tokio::test]
    #[ignore = "requires a cluster running the machine API operator"]
    async fn reconcile_termination_handler_daemonset() {
        run(Scenario::ReconcileTerminationHandlerDaemonSet).await;
    }

    #[tokio::test]
    #[ignore = "requires a cluster running the machine API operator"]
    async fn maintains_termination_handler_daemonset_spec() {
        run(Scenario::MaintainTerminationHandlerDaemonSetSpec).await;
    }

    #[tokio::test]
    #[ignore = "requires a cluster running the machine API operator"]
    async fn reconcile_mutating_webhook_configuration() {
        run(Scenario::ReconcileMutatingWebhookConfiguration).await;
    }

    #[tokio::test]
    #[ignore = "requires a cluster running the machine API operator"]
    async fn reconcile_validating_webhook_configuration() {
        run(Scenario::ReconcileValidatingWebhookConfiguration).await;
    }

    #[tokio::test]
    #[ignore = "requires a cluster running the machine API operator"]
    async fn recover_after_validating_webhook_configuration_deletion() {
        run(Scenario::RecoverValidatingWebhookConfigurationDeletion).await;
    }

    #[tokio::test]
    #[ignore = "requires a cluster running the machine API operator"]
    async fn recover_after_mutating_webhook_configuration_deletion() {
        run(Scenario::RecoverMutatingWebhookConfigurationDeletion).await;
    }

    #[tokio::test]
    #[ignore = "requires a cluster running the machine API operator"]
    async fn maintains_mutating_webhook_spec_and_preserves_ca_bundle() {
        run(Scenario::MaintainMutatingWebhookConfigurationSpec).await;
    }

    #[tokio::test]
    #[ignore = "requires a cluster running the machine API operator"]
    async fn maintains_validating_webhook_spec_and_preserves_ca_bundle() {
        run(Scenario::MaintainValidatingWebhookConfigurationSpec).await;
    }
}

mod machine_api_cluster_operator_status {
    use super::*;

    #[tokio::test]
    #[ignore = "requires a cluster running the machine API operator"]
    async fn be_available() {
        run(Scenario::ClusterOperatorAvailable).await;
    }
}
