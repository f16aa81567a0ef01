#![doc = include_str!("../README.md")]

mod server;

use clap::Parser;
use ff_like_core::codec::Codec;
use server::config::{CliArgs, ServerConfig};
use server::credentials::RemoteCredentialStore;
use server::dispatch::HttpExecutor;
use server::service::{handler::LikeService, router};
use server::telemetry::init_telemetry;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::signal;

// Using mimalloc for better performance under contention, especially in musl
// environments.
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load from .env
    let _ = dotenvy::dotenv();
    let args = CliArgs::parse();
    let config = ServerConfig::try_from(args)?;

    let providers = init_telemetry()?;

    if config.access_key.is_none() {
        tracing::warn!("ACCESS_KEY is not set; every /like request will be denied");
    }

    let store = RemoteCredentialStore::new(
        reqwest::Client::builder().build()?,
        config.token_base_url.clone(),
    );
    let executor = HttpExecutor::new(HttpExecutor::build_client(
        &config.release_version,
        config.accept_invalid_certs,
    )?);
    let service = LikeService::new(
        config.access_key.clone(),
        Arc::new(store),
        Arc::new(executor),
        Codec::default(),
        config.max_batch,
    );

    let listener = TcpListener::bind(&config.server_addr).await?;
    log_startup_info(&config);

    axum::serve(listener, router(service))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    providers.shutdown();
    tracing::info!("Service shut down successfully");
    Ok(())
}

fn log_startup_info(config: &ServerConfig) {
    tracing::info!(
        "Starting like service on {} (batch cap {}, release {}, tokens from {})",
        config.server_addr,
        config.max_batch,
        config.release_version,
        config.token_base_url
    );
    if config.accept_invalid_certs {
        tracing::warn!("Upstream TLS certificate verification is disabled");
    }
}

async fn shutdown_signal() {
    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    tokio::select! {
        () = ctrl_c => tracing::info!("Received Ctrl+C signal"),
        () = terminate => tracing::info!("Received SIGTERM signal"),
    }

    tracing::info!("Shutdown signal received, draining in-flight requests...");
}
