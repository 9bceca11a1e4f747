// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum E2eError {
    #[error("Kubernetes API error: {0}")]
    KubeError(#[from] kube::Error),

    #[error("Failed to load client: {0}")]
    ClientError(String),

    #[error("Timed out after {timeout:?} waiting to {operation}")]
    Timeout { operation: String, timeout: Duration },

    #[error("Expectation failed: {0}")]
    Assertion(String),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, E2eError>;
