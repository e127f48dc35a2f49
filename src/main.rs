use std::sync::Arc;

use healthman::{
    advisor::Advisor,
    app::{build_router, AppState},
    config::AppConfig,
    upstream::GeminiClient,
};
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // -----------------------------
    // Logging
    // -----------------------------
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // -----------------------------
    // Configuration
    // -----------------------------
    let config = AppConfig::from_env()?;

    // -----------------------------
    // Shared state / Dependencies
    // -----------------------------
    let gemini = GeminiClient::new(&config.gemini)?;
    info!(
        model = config.gemini.model.as_str(),
        endpoint = gemini.endpoint(),
        "upstream configured"
    );
    let state = AppState {
        advisor: Advisor::new(Arc::new(gemini)),
    };

    let app = build_router(state);

    let addr = config.addr;
    info!("HTTP listening on http://{addr}");
    info!("form page at http://{addr}/");
    info!("proxy at http://{addr}/fetch-recommendations and /fetch-exercise-plan");

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app.into_make_service()).await?;

    Ok(())
}
