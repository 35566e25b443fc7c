mod compose;
mod config;
mod errors;
mod export;
mod gateways;
mod layout;
mod markup;
mod routes;
mod shortcuts;
mod state;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::gateways::chat::ChatClient;
use crate::gateways::image::ImageClient;
use crate::gateways::publish::PublishClient;
use crate::gateways::scrape::ScrapeClient;
use crate::layout::measure::CharMetricMeasurer;
use crate::routes::build_router;
use crate::shortcuts::ShortcutStore;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Cardpress API v{}", env!("CARGO_PKG_VERSION"));

    // Upstream gateway clients. The image gateway rides on the chat
    // credentials; each stays unconfigured (503) until its env vars are set.
    let chat = ChatClient::new(config.chat_base.clone(), config.chat_api_key.clone());
    let image = ImageClient::new(config.chat_base.clone(), config.chat_api_key.clone());
    let scraper = ScrapeClient::new(config.scraper_base.clone(), config.scraper_api_key.clone());
    let publisher = PublishClient::new(config.publish_base.clone(), config.publish_api_key.clone());
    info!(
        chat = config.chat_base.is_some(),
        scraper = config.scraper_base.is_some(),
        publisher = config.publish_base.is_some(),
        "Gateway clients initialized"
    );

    let shortcuts = Arc::new(ShortcutStore::load(&config.data_dir)?);
    info!("Shortcut store loaded from {}", config.data_dir.display());

    let state = AppState {
        chat,
        image,
        scraper,
        publisher,
        measurer: Arc::new(CharMetricMeasurer),
        shortcuts,
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: tighten CORS in production

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
