// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

/// Namespace the machine API components run in unless overridden
pub const DEFAULT_NAMESPACE: &str = "openshift-machine-api";

/// ClusterOperator reporting the machine API status
pub const DEFAULT_CLUSTER_OPERATOR: &str = "machine-api";

/// Resources owned by, or making up, the machine API operator
pub mod resources {
    /// The operator's own deployment
    pub const OPERATOR_DEPLOYMENT: &str = "machine-api-operator";
    /// Deployment the operator manages
    pub const CONTROLLERS_DEPLOYMENT: &str = "machine-api-controllers";
    /// DaemonSet the operator manages
    pub const TERMINATION_HANDLER_DAEMONSET: &str = "machine-api-termination-handler";
}

/// Admission webhook configuration managed by the operator
pub mod webhooks {
    /// Name shared by the mutating and validating configurations
    pub const CONFIGURATION_NAME: &str = "machine-api";
    pub const SERVICE_NAME: &str = "machine-api-operator-webhook";
    pub const SERVICE_PORT: i32 = 443;
    pub const INJECT_CA_BUNDLE_ANNOTATION: &str = "service.beta.openshift.io/inject-cabundle";

    pub const API_GROUP: &str = "machine.openshift.io";
    pub const API_VERSION: &str = "v1beta1";

    pub const MACHINE_MUTATING_HOOK: &str = "default.machine.machine.openshift.io";
    pub const MACHINE_MUTATING_PATH: &str = "/mutate-machine-openshift-io-v1beta1-machine";
    pub const MACHINESET_MUTATING_HOOK: &str = "default.machineset.machine.openshift.io";
    pub const MACHINESET_MUTATING_PATH: &str = "/mutate-machine-openshift-io-v1beta1-machineset";

    pub const MACHINE_VALIDATING_HOOK: &str = "validation.machine.machine.openshift.io";
    pub const MACHINE_VALIDATING_PATH: &str = "/validate-machine-openshift-io-v1beta1-machine";
    pub const MACHINESET_VALIDATING_HOOK: &str = "validation.machineset.machine.openshift.io";
    pub const MACHINESET_VALIDATING_PATH: &str = "/validate-machine-openshift-io-v1beta1-machineset";
}

/// Polling intervals and timeouts
pub mod poll {
    use std::time::Duration;

    pub const RETRY_SHORT: Duration = Duration::from_secs(1);
    pub const WAIT_SHORT: Duration = Duration::from_secs(60);
    pub const WAIT_MEDIUM: Duration = Duration::from_secs(3 * 60);
    pub const WAIT_LONG: Duration = Duration::from_secs(15 * 60);
}
