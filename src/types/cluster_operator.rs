// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use kube::CustomResource;
use serde::{Deserialize, Serialize};

/// Condition types reported by every ClusterOperator
pub mod condition_types {
    pub const AVAILABLE: &str = "Available";
    pub const PROGRESSING: &str = "Progressing";
    pub const DEGRADED: &str = "Degraded";
}

#[derive(CustomResource, Serialize, Deserialize, Clone, Debug, Default, schemars::JsonSchema)]
#[kube(group = "config.openshift.io", version = "v1", kind = "ClusterOperator")]
#[kube(status = "ClusterOperatorStatus")]
pub struct ClusterOperatorSpec {}

impl ClusterOperator {
    /// Status of the condition with the given type, if reported
    pub fn condition_status(&self, condition_type: &str) -> Option<&str> {
        self.status
            .as_ref()
            .and_then(|s| s.conditions.as_ref())
            .and_then(|conditions| {
                conditions
                    .iter()
                    .find(|c| c.condition_type == condition_type)
            })
            .map(|c| c.status.as_str())
    }

    /// Check the operator is not unavailable, degraded or progressing.
    ///
    /// A missing condition counts as neither true nor false.
    pub fn is_available(&self) -> bool {
        self.condition_status(condition_types::AVAILABLE) != Some("False")
            && self.condition_status(condition_types::DEGRADED) != Some("True")
            && self.condition_status(condition_types::PROGRESSING) != Some("True")
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, schemars::JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ClusterOperatorStatus {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conditions: Option<Vec<ClusterOperatorCondition>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub versions: Option<Vec<OperandVersion>>,
}

#[derive(Serialize, Deserialize, Clone, Debug, schemars::JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ClusterOperatorCondition {
    #[serde(rename = "type")]
    pub condition_type: String,
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_transition_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

#[derive(Serialize, Deserialize, Clone, Debug, schemars::JsonSchema)]
pub struct OperandVersion {
    pub name: String,
    pub version: String,
}
