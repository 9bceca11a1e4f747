// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Kubernetes utilities for client creation, polling and retried resource access.

pub mod client;
pub mod poll;
pub mod resource;

pub use client::load_client;
pub use poll::{poll_immediate, poll_until, PollSchedule};
