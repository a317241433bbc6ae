/// Deadlines for async operations
use std::future::Future;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq)]
pub struct TimeoutConfig {
    pub duration: Duration,
}

#[derive(Debug, thiserror::Error, PartialEq)]
#[error("deadline of {0:?} elapsed")]
pub struct Elapsed(pub Duration);

/// Run `future` to completion or give up after `duration`
///
/// The inner future is dropped when the deadline fires, which cancels any
/// retry loop or in-flight request it owns.
pub async fn with_timeout<F, T>(duration: Duration, future: F) -> Result<T, Elapsed>
where
    F: Future<Output = T>,
{
    tokio::time::timeout(duration, future)
        .await
        .map_err(|_| Elapsed(duration))
}
