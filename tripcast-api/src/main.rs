use anyhow::Context;
use std::net::SocketAddr;
use tripcast_api::{app, AppState};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tripcast_api=debug,tripcast_offer=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = tripcast_store::Config::load().context("Failed to load config")?;
    tracing::info!(
        "Starting Tripcast API on port {} (FX {} {}/{})",
        config.server.port,
        config.pricing.fx_rate,
        config.pricing.display_currency,
        config.pricing.base_currency
    );

    let app = app(AppState::with_mock_provider(&config));

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
