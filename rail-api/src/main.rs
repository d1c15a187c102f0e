use rail_api::{app, AppState, Settings};
use rail_store::{Config, HttpRouteRepository};
use std::net::SocketAddr;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "rail_api=debug,rail_order=debug,tower_http=debug,axum::rejection=trace".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::load()?;
    tracing::info!("Starting rail booking API on port {}", config.server.port);
    tracing::info!(backend = %config.backend.base_url, "Using route backend");

    let repo = HttpRouteRepository::new(&config.backend)?;
    let state = AppState::new(Arc::new(repo), Settings::from_config(&config));

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app(state)).await?;
    Ok(())
}
