// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Fixed-interval polling with a bounded timeout.
//!
//! Conditions are evaluated immediately and then once per interval. A
//! condition reports "not yet" with `Ok(None)`/`Ok(false)`, which is also how
//! transient API errors are swallowed; returning `Err` aborts the poll at once.

use crate::constants::poll::{RETRY_SHORT, WAIT_LONG, WAIT_MEDIUM, WAIT_SHORT};
use crate::error::{E2eError, Result};
use std::future::Future;
use std::time::Duration;
use tokio::time::{sleep, Instant};
use tracing::debug;

/// How often to evaluate a condition and how long to keep trying
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollSchedule {
    pub interval: Duration,
    pub timeout: Duration,
}

impl PollSchedule {
    pub const SHORT: PollSchedule = PollSchedule::new(RETRY_SHORT, WAIT_SHORT);
    pub const MEDIUM: PollSchedule = PollSchedule::new(RETRY_SHORT, WAIT_MEDIUM);
    pub const LONG: PollSchedule = PollSchedule::new(RETRY_SHORT, WAIT_LONG);

    pub const fn new(interval: Duration, timeout: Duration) -> Self {
        Self { interval, timeout }
    }
}

/// Poll `condition` until it yields a value, fails, or `schedule.timeout` elapses.
pub async fn poll_until<T, F, Fut>(
    operation: &str,
    schedule: PollSchedule,
    mut condition: F,
) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<Option<T>>>,
{
    let deadline = Instant::now() + schedule.timeout;
    let mut attempt = 0u32;

    loop {
        attempt += 1;

        if let Some(value) = condition().await? {
            return Ok(value);
        }

        let now = Instant::now();
        if now >= deadline {
            return Err(E2eError::Timeout {
                operation: operation.to_string(),
                timeout: schedule.timeout,
            });
        }

        debug!(operation, attempt, "Condition not met yet, polling again");
        sleep(schedule.interval.min(deadline - now)).await;
    }
}

/// Poll a boolean `condition` until it holds, fails, or `schedule.timeout` elapses.
pub async fn poll_immediate<F, Fut>(
    operation: &str,
    schedule: PollSchedule,
    mut condition: F,
) -> Result<()>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<bool>>,
{
    poll_until(operation, schedule, || {
        let fut = condition();
        async move { Ok(fut.await?.then_some(())) }
    })
    .await
}
