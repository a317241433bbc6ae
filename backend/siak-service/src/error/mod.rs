use resilience::Retryable;
use thiserror::Error;

/// Failure of a single upstream attempt
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("internal server error: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("internal server error: HTTP request failed with status code: {0}")]
    UpstreamStatus(u16),

    #[error("internal server error: {0}")]
    Body(#[source] reqwest::Error),

    #[error("internal server error: {0}")]
    Malformed(#[from] serde_json::Error),
}

impl Retryable for FetchError {
    fn is_transient(&self) -> bool {
        matches!(
            self,
            FetchError::Transport(_) | FetchError::UpstreamStatus(_) | FetchError::Body(_)
        )
    }
}

/// Errors while wiring the service together at startup
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("Token verifier error: {0}")]
    Token(#[from] grpc_jwt_propagation::TokenError),

    #[error("Authorization table error: {0}")]
    RoleTable(#[from] grpc_jwt_propagation::RoleTableError),

    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),

    #[error("Static source error: {0}")]
    StaticSource(#[from] crate::upstream::StaticSourceError),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn malformed() -> FetchError {
        serde_json::from_str::<Vec<u8>>("{").unwrap_err().into()
    }

    #[test]
    fn test_status_codes_are_transient() {
        assert!(FetchError::UpstreamStatus(500).is_transient());
        assert!(FetchError::UpstreamStatus(404).is_transient());
    }

    #[test]
    fn test_malformed_body_is_terminal() {
        assert!(!malformed().is_transient());
    }
}
