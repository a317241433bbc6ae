/// Bounded retry with transient/terminal classification
use std::fmt;
use std::future::Future;
use std::time::Duration;
use tracing::warn;

/// Classifies a failure as worth another attempt or not
///
/// Only transient conditions (network errors, upstream 5xx) should return
/// `true`. Terminal outcomes stop the loop on the first occurrence.
pub trait Retryable {
    fn is_transient(&self) -> bool;
}

/// Bounded attempts with a fixed pause between them
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryConfig {
    /// Total attempts including the first one
    pub max_attempts: u32,
    /// Pause after every failed attempt except the last
    pub delay: Duration,
}

impl RetryConfig {
    pub fn fixed(max_attempts: u32, delay: Duration) -> Self {
        Self {
            max_attempts,
            delay,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum RetryError<E> {
    #[error("gave up after {attempts} attempts: {last}")]
    Exhausted { attempts: u32, last: E },
    #[error("non-retryable failure: {0}")]
    Permanent(E),
}

/// Run `f` until it succeeds, fails terminally, or the attempt budget is spent
///
/// `f` receives the 1-based attempt number.
pub async fn with_retry<F, Fut, T, E>(config: &RetryConfig, mut f: F) -> Result<T, RetryError<E>>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: Retryable + fmt::Display,
{
    let max_attempts = config.max_attempts.max(1);
    let mut attempt = 0;

    loop {
        attempt += 1;

        match f(attempt).await {
            Ok(result) => return Ok(result),
            Err(e) if !e.is_transient() => return Err(RetryError::Permanent(e)),
            Err(e) if attempt >= max_attempts => {
                warn!(attempts = attempt, error = %e, "Max attempts reached");
                return Err(RetryError::Exhausted { attempts: attempt, last: e });
            }
            Err(e) => {
                warn!(
                    attempt,
                    max_attempts,
                    delay_ms = config.delay.as_millis() as u64,
                    error = %e,
                    "Attempt failed, retrying"
                );

                tokio::time::sleep(config.delay).await;
            }
        }
    }
}
