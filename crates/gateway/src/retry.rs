//! Bounded, fixed-delay retry for upstream calls.
//!
//! Only transient failures (connect errors, timeouts) are retried. A
//! response from the upstream, whatever its status, ends the loop at once.

use std::fmt;
use std::future::Future;
use std::time::Duration;

use axum::http::StatusCode;
use serde_json::Value;
use tokio::time::sleep;
use tracing::{debug, error, warn};

use crate::observability::{RETRIES_EXHAUSTED_TOTAL, RETRIES_TOTAL};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransientKind {
    Connect,
    Timeout,
}

impl fmt::Display for TransientKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransientKind::Connect => f.write_str("connection failure"),
            TransientKind::Timeout => f.write_str("timeout"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind}: {message}")]
pub struct TransientFailure {
    pub kind: TransientKind,
    pub message: String,
}

impl TransientFailure {
    pub fn connect(message: impl Into<String>) -> Self {
        Self { kind: TransientKind::Connect, message: message.into() }
    }

    pub fn timeout(message: impl Into<String>) -> Self {
        Self { kind: TransientKind::Timeout, message: message.into() }
    }
}

/// Result of one upstream call, or of a whole retried sequence.
#[derive(Debug, Clone, PartialEq)]
pub enum CallOutcome<T> {
    Success(T),
    TransientFailure(TransientFailure),
    /// The upstream answered (or the exchange failed in a way retrying cannot fix).
    ApplicationFailure { status: StatusCode, body: Value },
}

impl<T> CallOutcome<T> {
    pub fn is_success(&self) -> bool {
        matches!(self, CallOutcome::Success(_))
    }
}

#[derive(Debug, Clone)]
pub struct RetryPolicy {
    max_attempts: u32,
    delay: Duration,
}

impl RetryPolicy {
    /// `max_attempts` counts the first call; zero is treated as one.
    pub fn new(max_attempts: u32, delay: Duration) -> Self {
        Self { max_attempts: max_attempts.max(1), delay }
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Constant delay, no backoff and no jitter.
    pub async fn wait_before_retry(&self, attempt: u32) {
        debug!("Retrying in {:?} (attempt {})", self.delay, attempt);
        sleep(self.delay).await;
    }
}

/// Run `operation` until it yields anything but a transient failure, at most
/// `policy.max_attempts()` times. When every attempt fails transiently the
/// last failure is returned as is.
pub async fn call_with_retry<F, Fut, T>(policy: &RetryPolicy, mut operation: F) -> CallOutcome<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = CallOutcome<T>>,
{
    let max_attempts = policy.max_attempts();
    let mut attempt = 1;

    loop {
        match operation().await {
            CallOutcome::TransientFailure(failure) if attempt < max_attempts => {
                warn!(attempt, max_attempts, error = %failure, "upstream attempt failed, retrying");
                RETRIES_TOTAL.inc();
                attempt += 1;
                policy.wait_before_retry(attempt).await;
            }
            CallOutcome::TransientFailure(failure) => {
                error!(attempts = attempt, error = %failure, "all upstream attempts failed");
                RETRIES_EXHAUSTED_TOTAL.inc();
                return CallOutcome::TransientFailure(failure);
            }
            outcome => {
                if attempt > 1 {
                    debug!("Upstream call settled after {} attempts", attempt);
                }
                return outcome;
            }
        }
    }
}
