// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use anyhow::{bail, Result};
use std::env::{self, VarError};

use crate::constants::{DEFAULT_CLUSTER_OPERATOR, DEFAULT_NAMESPACE};

/// Suite configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    /// Namespace the machine API operator and its operands run in
    pub namespace: String,
    /// Name of the ClusterOperator reporting the machine API status
    pub cluster_operator: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            namespace: DEFAULT_NAMESPACE.to_string(),
            cluster_operator: DEFAULT_CLUSTER_OPERATOR.to_string(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        let namespace = var_or("MACHINE_API_NAMESPACE", DEFAULT_NAMESPACE)?;
        let cluster_operator = var_or("MACHINE_API_CLUSTER_OPERATOR", DEFAULT_CLUSTER_OPERATOR)?;

        Ok(Config {
            namespace,
            cluster_operator,
        })
    }
}

fn var_or(key: &str, default: &str) -> Result<String> {
    match env::var(key) {
        Ok(value) if !value.is_empty() => Ok(value),
        Ok(_) | Err(VarError::NotPresent) => Ok(default.to_string()),
        Err(VarError::NotUnicode(_)) => bail!("{} environment variable is not valid unicode", key),
    }
}
