//! HTTP client for the SIAK student-records API

use super::{BiodataSource, FetchOutcome};
use crate::error::FetchError;
use crate::models::MhsBiodata;
use async_trait::async_trait;
use resilience::{with_retry, RetryConfig, RetryError};
use serde::Serialize;
use std::time::Duration;

#[derive(Serialize)]
struct NimQuery<'a> {
    nim: &'a str,
}

/// SIAK API client
///
/// Holds one connection pool for the life of the process. Each lookup is a
/// `POST` with the student id as JSON body, retried on transport errors,
/// non-200 answers and unreadable bodies.
#[derive(Clone)]
pub struct SiakApiClient {
    http: reqwest::Client,
    url: String,
    api_key: String,
    retry: RetryConfig,
}

impl std::fmt::Debug for SiakApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SiakApiClient")
            .field("url", &self.url)
            .field("retry", &self.retry)
            .finish_non_exhaustive()
    }
}

impl SiakApiClient {
    pub fn new(
        url: impl Into<String>,
        api_key: impl Into<String>,
        attempt_timeout: Duration,
        retry: RetryConfig,
    ) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder().timeout(attempt_timeout).build()?;

        Ok(Self {
            http,
            url: url.into(),
            api_key: api_key.into(),
            retry,
        })
    }

    /// One round-trip; `Ok(None)` means the upstream answered with no records
    async fn attempt(&self, nim: &str) -> Result<Option<MhsBiodata>, FetchError> {
        let response = self
            .http
            .post(&self.url)
            .header("Api-Key", &self.api_key)
            .json(&NimQuery { nim })
            .send()
            .await
            .map_err(FetchError::Transport)?;

        let status = response.status();
        if status != reqwest::StatusCode::OK {
            return Err(FetchError::UpstreamStatus(status.as_u16()));
        }

        let body = response.bytes().await.map_err(FetchError::Body)?;
        let records: Vec<MhsBiodata> = serde_json::from_slice(&body)?;

        Ok(records.into_iter().next())
    }
}

#[async_trait]
impl BiodataSource for SiakApiClient {
    #[tracing::instrument(skip(self))]
    async fn fetch(&self, nim: &str) -> FetchOutcome {
        match with_retry(&self.retry, |_| self.attempt(nim)).await {
            Ok(Some(record)) => FetchOutcome::Found(record),
            Ok(None) => {
                tracing::warn!("Resource not found upstream");
                FetchOutcome::NotFound
            }
            Err(RetryError::Exhausted { attempts, last }) => {
                tracing::error!(attempts, error = %last, "Maximum retries reached");
                FetchOutcome::PermanentFailure(last.to_string())
            }
            Err(RetryError::Permanent(e)) => {
                tracing::error!(nim = %nim, error = %e, "Upstream answered with an unusable body");
                FetchOutcome::PermanentFailure(e.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client(server: &MockServer) -> SiakApiClient {
        SiakApiClient::new(
            format!("{}/api/mhs", server.uri()),
            "test-key",
            Duration::from_secs(2),
            RetryConfig::fixed(3, Duration::from_millis(500)),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_found_sends_expected_request() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/mhs"))
            .and(header("Api-Key", "test-key"))
            .and(header("content-type", "application/json"))
            .and(body_json(serde_json::json!({ "nim": "12345" })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
                { "NIM": "12345", "NAMA": "Budi", "TGLSIDANG": "2024-01-01", "KODESTATUS": "2" },
                { "NIM": "12345", "NAMA": "Duplicate" }
            ])))
            .expect(1)
            .mount(&server)
            .await;

        match client(&server).fetch("12345").await {
            FetchOutcome::Found(record) => {
                assert_eq!(record.nama, "Budi");
                assert_eq!(record.kode_status, "2");
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_empty_array_is_not_found_without_retry() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
            .expect(1)
            .mount(&server)
            .await;

        assert_eq!(client(&server).fetch("00000").await, FetchOutcome::NotFound);
    }

    #[tokio::test]
    async fn test_malformed_body_is_not_retried() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
            .expect(1)
            .mount(&server)
            .await;

        assert!(matches!(
            client(&server).fetch("12345").await,
            FetchOutcome::PermanentFailure(_)
        ));
    }

    #[tokio::test]
    async fn test_null_fields_still_found() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([{
                "NIM": "12345",
                "NAMA": "Budi",
                "TGLSIDANG": "2024-01-01",
                "KODESTATUS": "2",
                "EMAIL": null,
                "HP": null
            }])))
            .expect(1)
            .mount(&server)
            .await;

        match client(&server).fetch("12345").await {
            FetchOutcome::Found(record) => {
                assert_eq!(record.nama, "Budi");
                assert_eq!(record.email, "");
                assert_eq!(record.hp, "");
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_truncated_body_is_retried() {
        use std::sync::atomic::{AtomicU32, Ordering};
        use std::sync::Arc;
        use tokio::io::{AsyncReadExt, AsyncWriteExt};
        use tokio::net::TcpListener;

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let accepted = Arc::new(AtomicU32::new(0));
        let counter = accepted.clone();

        // Promise more bytes than are sent, then hang up
        tokio::spawn(async move {
            while let Ok((mut socket, _)) = listener.accept().await {
                counter.fetch_add(1, Ordering::SeqCst);
                let mut buf = [0u8; 4096];
                let _ = socket.read(&mut buf).await;
                let _ = socket
                    .write_all(
                        b"HTTP/1.1 200 OK\r\ncontent-type: application/json\r\ncontent-length: 512\r\n\r\n[{\"NIM\"",
                    )
                    .await;
                let _ = socket.shutdown().await;
            }
        });

        let client = SiakApiClient::new(
            format!("http://{addr}/api/mhs"),
            "k",
            Duration::from_secs(2),
            RetryConfig::fixed(3, Duration::from_millis(10)),
        )
        .unwrap();

        assert!(matches!(
            client.fetch("12345").await,
            FetchOutcome::PermanentFailure(_)
        ));
        assert_eq!(accepted.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_server_error_retried_three_times() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500))
            .expect(3)
            .mount(&server)
            .await;

        let start = std::time::Instant::now();
        let outcome = client(&server).fetch("12345").await;

        assert_eq!(
            outcome,
            FetchOutcome::PermanentFailure(
                "internal server error: HTTP request failed with status code: 500".to_string()
            )
        );
        // Two pauses between three attempts
        assert!(start.elapsed() >= Duration::from_millis(1000));
    }

    #[tokio::test]
    async fn test_recovers_after_transient_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(503))
            .up_to_n_times(1)
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!([{ "NIM": "12345" }])),
            )
            .expect(1)
            .mount(&server)
            .await;

        assert!(matches!(
            client(&server).fetch("12345").await,
            FetchOutcome::Found(_)
        ));
    }

    #[tokio::test]
    async fn test_unreachable_upstream_is_permanent_after_budget() {
        // Nothing listens on port 9 (discard) in the test environment
        let client = SiakApiClient::new(
            "http://127.0.0.1:9/api/mhs",
            "k",
            Duration::from_millis(200),
            RetryConfig::fixed(2, Duration::from_millis(10)),
        )
        .unwrap();

        assert!(matches!(
            client.fetch("12345").await,
            FetchOutcome::PermanentFailure(_)
        ));
    }
}
