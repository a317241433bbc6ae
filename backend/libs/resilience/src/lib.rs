/// Resilience helpers for upstream calls
///
/// - **Retry**: bounded attempts, transient/terminal classification via [`Retryable`]
/// - **Timeout**: overall deadline that cancels whatever it wraps
/// - **Presets**: pre-tuned settings per upstream kind
///
/// # Example: HTTP lookup with retry under a deadline
///
/// ```rust,no_run
/// use resilience::{presets, with_retry, with_timeout, Retryable};
///
/// #[derive(Debug)]
/// struct Flaky;
/// impl std::fmt::Display for Flaky {
///     fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
///         f.write_str("flaky")
///     }
/// }
/// impl Retryable for Flaky {
///     fn is_transient(&self) -> bool { true }
/// }
///
/// #[tokio::main]
/// async fn main() {
///     let config = presets::http_upstream_config();
///     let result = with_timeout(config.timeout.duration, with_retry(&config.retry, |_attempt| async {
///         // Your HTTP call here
///         Ok::<_, Flaky>(())
///     }))
///     .await;
/// }
/// ```

pub mod presets;
pub mod retry;
pub mod timeout;

pub use presets::{http_upstream_config, ServiceConfig};
pub use retry::{with_retry, RetryConfig, RetryError, Retryable};
pub use timeout::{with_timeout, Elapsed, TimeoutConfig};
