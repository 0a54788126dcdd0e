//! Retry an async operation until it succeeds, fails for good, or runs out of time

use std::{future::Future, time::Duration};

use tokio::time::{sleep, Instant};

use crate::logging::warn;

/// First wait between attempts
const INITIAL_BACKOFF: Duration = Duration::from_millis(500);
/// Longest wait between attempts
const MAX_BACKOFF: Duration = Duration::from_secs(10);

/// The result of a single attempt that didn't succeed
#[derive(Debug)]
pub enum RetryError<E> {
    /// Worth trying again
    Retryable(E),
    /// Give up immediately
    NonRetryable(E),
}

/// Why [`retry_with_timeout`] gave up
#[derive(Debug)]
pub enum RetryFailure<E> {
    /// An attempt failed with a non-retryable error
    Failed(E),
    /// Time ran out. Holds the last retryable error.
    TimedOut(E),
}

/// Run `attempt` until it returns `Ok`, a non-retryable error, or `timeout`
/// elapses. Waits between attempts start at 500ms and double up to 10s.
pub async fn retry_with_timeout<T, E, F, Fut>(
    timeout: Duration,
    mut attempt: F,
) -> Result<T, RetryFailure<E>>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, RetryError<E>>>,
    E: std::fmt::Display,
{
    let deadline = Instant::now() + timeout;
    let mut backoff = INITIAL_BACKOFF;

    loop {
        match attempt().await {
            Ok(val) => return Ok(val),
            Err(RetryError::NonRetryable(e)) => return Err(RetryFailure::Failed(e)),
            Err(RetryError::Retryable(e)) => {
                let now = Instant::now();
                if now >= deadline {
                    return Err(RetryFailure::TimedOut(e));
                }
                let wait = backoff.min(deadline - now);
                warn!("{e}; retrying in {wait:?}");
                sleep(wait).await;
                backoff = (backoff * 2).min(MAX_BACKOFF);
            }
        }
    }
}
