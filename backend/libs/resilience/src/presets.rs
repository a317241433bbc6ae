/// Preset configurations for upstream calls
use crate::retry::RetryConfig;
use crate::timeout::TimeoutConfig;
use std::time::Duration;

/// Deadline plus retry policy for one kind of upstream
#[derive(Debug, Clone, PartialEq)]
pub struct ServiceConfig {
    /// Overall deadline covering every attempt and pause
    pub timeout: TimeoutConfig,
    pub retry: RetryConfig,
}

/// HTTP record lookups against an institutional API
///
/// - Retry: 3 attempts, fixed 500ms pause
/// - Deadline: 35s (three 10s attempts plus pauses, with headroom)
pub fn http_upstream_config() -> ServiceConfig {
    ServiceConfig {
        timeout: TimeoutConfig {
            duration: Duration::from_secs(35),
        },
        retry: RetryConfig::fixed(3, Duration::from_millis(500)),
    }
}
