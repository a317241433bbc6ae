//! Server assembly shared by the binary and the end-to-end tests

use crate::authorization;
use crate::config::{Config, SourceConfig};
use crate::error::StartupError;
use crate::grpc::siak::mhs_biodata_api_service_server::MhsBiodataApiServiceServer;
use crate::grpc::MhsBiodataApiHandler;
use crate::upstream::{BiodataSource, SiakApiClient, StaticSource};
use grpc_jwt_propagation::{AuthGate, AuthLayer, TokenVerifier};
use resilience::RetryConfig;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio_stream::wrappers::TcpListenerStream;
use tonic::transport::Server;

pub struct App {
    handler: MhsBiodataApiHandler,
    gate: AuthGate,
    request_timeout: Duration,
}

impl App {
    pub fn new(handler: MhsBiodataApiHandler, gate: AuthGate, request_timeout: Duration) -> Self {
        Self {
            handler,
            gate,
            request_timeout,
        }
    }

    pub fn from_config(config: &Config) -> Result<Self, StartupError> {
        let verifier = Arc::new(TokenVerifier::new(
            &config.jwt.secret,
            config.jwt.token_lifetime,
        )?);

        let table = Arc::new(authorization::role_table(config.unlisted_routes)?);
        tracing::info!(
            restricted_routes = table.len(),
            unlisted_routes = %table.unlisted_policy(),
            "Authorization table loaded"
        );

        let upstream = &config.upstream;
        let source: Arc<dyn BiodataSource> = match &upstream.source {
            SourceConfig::Http { url, api_key } => {
                tracing::info!(url = %url, max_attempts = upstream.max_attempts, "Using SIAK API source");
                Arc::new(SiakApiClient::new(
                    url.clone(),
                    api_key.clone(),
                    upstream.attempt_timeout,
                    RetryConfig::fixed(upstream.max_attempts, upstream.retry_delay),
                )?)
            }
            SourceConfig::Static { path } => {
                tracing::warn!(path = %path.display(), "Using static fallback source");
                Arc::new(StaticSource::from_path(path)?)
            }
        };

        Ok(Self::new(
            MhsBiodataApiHandler::new(source, upstream.fetch_deadline),
            authorization::auth_gate(verifier, table),
            config.request_timeout,
        ))
    }

    /// Serve on `incoming` until `signal` resolves
    pub async fn serve_with_shutdown<F>(
        self,
        incoming: TcpListenerStream,
        signal: F,
    ) -> Result<(), tonic::transport::Error>
    where
        F: Future<Output = ()>,
    {
        let (mut health_reporter, health_service) = tonic_health::server::health_reporter();
        health_reporter
            .set_serving::<MhsBiodataApiServiceServer<MhsBiodataApiHandler>>()
            .await;

        Server::builder()
            .timeout(self.request_timeout)
            .layer(AuthLayer::new(self.gate))
            .add_service(health_service)
            .add_service(MhsBiodataApiServiceServer::new(self.handler))
            .serve_with_incoming_shutdown(incoming, signal)
            .await
    }
}
