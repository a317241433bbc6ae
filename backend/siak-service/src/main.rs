use anyhow::Context;
use siak_service::{logging::init_tracing, App, Config};
use tokio::net::TcpListener;
use tokio_stream::wrappers::TcpListenerStream;

async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};

        match signal(SignalKind::terminate()) {
            Ok(mut terminate) => {
                tokio::select! {
                    _ = tokio::signal::ctrl_c() => {},
                    _ = terminate.recv() => {},
                }
            }
            Err(e) => {
                tracing::warn!("Failed to install SIGTERM handler: {}", e);
                let _ = tokio::signal::ctrl_c().await;
            }
        }
    }

    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }

    tracing::info!("Shutdown signal received");
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    let config = Config::from_env().context("Failed to load configuration")?;

    init_tracing(config.log_format);

    tracing::info!(
        service = %config.service_name,
        grpc_port = %config.grpc_port,
        "Configuration loaded"
    );

    let app = App::from_config(&config).context("Failed to initialize service")?;

    let grpc_addr = format!("0.0.0.0:{}", config.grpc_port);
    let listener = TcpListener::bind(&grpc_addr)
        .await
        .with_context(|| format!("Failed to bind {grpc_addr}"))?;

    tracing::info!("🚀 SIAK Service is running");
    tracing::info!("   gRPC: {}", grpc_addr);

    app.serve_with_shutdown(TcpListenerStream::new(listener), shutdown_signal())
        .await
        .context("gRPC server error")?;

    tracing::info!("SIAK Service stopped");
    Ok(())
}
