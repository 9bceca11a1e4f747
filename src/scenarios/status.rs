// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use super::Suite;
use crate::error::Result;

impl Suite {
    pub(super) async fn cluster_operator_available(&self) -> Result<()> {
        self.before_each().await
    }
}
