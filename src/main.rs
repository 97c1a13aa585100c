//! Route aggregator HTTP service entry point

use anyhow::Result;
use route_aggregator::{
    config,
    network::HttpClient,
    web::{create_router, AppState},
};
use std::net::SocketAddr;
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[tokio::main]
async fn main() -> Result<()> {
    FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    info!("Starting route-aggregator v{}", route_aggregator::VERSION);

    let settings = config::load()?;

    let client = HttpClient::with_settings(&settings.outgoing)?;
    info!("HTTP client initialized");

    let state = AppState::new(&settings, client);
    info!(
        "Response cache TTL {}s, {} providers",
        settings.cache.ttl_seconds,
        state.search.provider_count()
    );

    let app = create_router(state);

    let addr = SocketAddr::new(
        settings.server.bind_address.parse()?,
        settings.server.port,
    );

    info!("Starting server on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
