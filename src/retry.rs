//! Retry policies for git transport operations.
//!
//! Only transient failures are retried. Before retry number `n` (starting at
//! 1) the operation waits `delay_unit * 2^n`.

use std::future::Future;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

use backon::{ExponentialBuilder, Retryable};

use crate::error::TransferError;

/// Attempts allowed for the initial clone.
pub const CLONE_ATTEMPTS: usize = 5;
/// Attempts allowed for the push that follows a fresh clone.
pub const PUSH_ATTEMPTS: usize = 5;
/// Attempts allowed for the push of a resumed transfer.
pub const RESUME_PUSH_ATTEMPTS: usize = 2;

pub const DEFAULT_DELAY_UNIT: Duration = Duration::from_secs(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first one.
    pub max_attempts: usize,
    pub delay_unit: Duration,
}

impl RetryPolicy {
    pub fn new(max_attempts: usize, delay_unit: Duration) -> Self {
        Self {
            max_attempts,
            delay_unit,
        }
    }

    pub fn clone_repository(delay_unit: Duration) -> Self {
        Self::new(CLONE_ATTEMPTS, delay_unit)
    }

    pub fn push_after_clone(delay_unit: Duration) -> Self {
        Self::new(PUSH_ATTEMPTS, delay_unit)
    }

    pub fn push_on_resume(delay_unit: Duration) -> Self {
        Self::new(RESUME_PUSH_ATTEMPTS, delay_unit)
    }

    fn retries(&self) -> usize {
        self.max_attempts.saturating_sub(1)
    }

    #[must_use]
    pub fn into_backoff(self) -> ExponentialBuilder {
        let max_delay = self.delay_unit * 2u32.pow(self.max_attempts.max(1) as u32);

        ExponentialBuilder::default()
            .with_min_delay(self.delay_unit * 2)
            .with_max_delay(max_delay)
            .with_factor(2.0)
            .with_max_times(self.retries())
    }
}

/// Runs `operation` under `policy`, retrying while it fails transiently.
///
/// `label` names the operation and repository in log lines.
pub async fn with_retry<T, F, Fut>(
    operation: F,
    policy: RetryPolicy,
    label: &str,
) -> Result<T, TransferError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, TransferError>>,
{
    let attempt = AtomicU32::new(1);

    operation
        .retry(policy.into_backoff())
        .when(TransferError::is_transient)
        .notify(|err, dur| {
            let current = attempt.fetch_add(1, Ordering::SeqCst);
            tracing::warn!(
                attempt = current,
                max_attempts = policy.max_attempts,
                delay = ?dur,
                "{} failed transiently, retrying: {}",
                label,
                err
            );
        })
        .await
}
