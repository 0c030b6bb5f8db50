use std::sync::Arc;

use solar_lead_relay::{config::Config, handlers::AppState, server};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Main entry point for the application.
///
/// Initializes tracing, loads configuration, builds the partner client and
/// starts the Axum server.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "solar_lead_relay=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;
    let app_state = Arc::new(AppState::new(&config)?);
    tracing::info!(
        "Partner client initialized: {}",
        app_state.partner.url()
    );

    server::serve(app_state, config.port).await
}
