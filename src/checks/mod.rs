// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Retried accessors and state predicates for the resources the machine API
//! operator manages.
//!
//! Accessors return a `Result` once their poll schedule is exhausted.
//! Predicates fold the outcome into a `bool` and log why a check failed.

pub mod cluster_operator;
pub mod compare;
pub mod daemonset;
pub mod deployment;
pub mod webhooks;

pub use cluster_operator::is_status_available;
pub use daemonset::{
    delete_daemonset, get_daemonset, is_daemonset_available, is_daemonset_synced,
    update_daemonset,
};
pub use deployment::{
    delete_deployment, get_deployment, is_deployment_available, is_deployment_synced,
    update_deployment,
};
pub use webhooks::{
    default_mutating_webhook_configuration, default_validating_webhook_configuration,
    delete_mutating_webhook_configuration, delete_validating_webhook_configuration,
    get_mutating_webhook_configuration, get_validating_webhook_configuration,
    is_mutating_webhook_configuration_synced, is_validating_webhook_configuration_synced,
    update_mutating_webhook_configuration, update_validating_webhook_configuration,
};

use crate::error::Result;
use serde::Serialize;
use tracing::error;

/// Collapse a poll outcome into a predicate result
fn settle(check: &str, outcome: Result<()>) -> bool {
    match outcome {
        Ok(()) => true,
        Err(e) => {
            error!("Error checking {}: {}", check, e);
            false
        }
    }
}

/// Render an object as YAML for diagnostics
fn render_yaml<T: Serialize>(value: &T) -> String {
    serde_yaml::to_string(value).unwrap_or_else(|e| format!("<unrenderable: {}>", e))
}
