//! MAXbuddy Backend
//!
//! REST backend persisting contact requests and users to a JSON file.

use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use maxbuddy_backend::config::{Config, LogFormat};
use maxbuddy_backend::db::{JsonFileStore, Repository};
use maxbuddy_backend::{create_router, AppState};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration
    let config = Config::from_env();

    // Initialize logging
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    let registry = tracing_subscriber::registry().with(env_filter);
    match config.log_format {
        LogFormat::Json => registry.with(tracing_subscriber::fmt::layer().json()).init(),
        LogFormat::Text => registry.with(tracing_subscriber::fmt::layer()).init(),
    }

    tracing::info!("Starting MAXbuddy Backend");
    for fallback in &config.fallbacks {
        tracing::warn!("{}", fallback);
    }

    // Initialize the data file
    let store = JsonFileStore::new(&config.data_path);
    tracing::info!("Data path: {:?}", store.path());
    store.init().await?;

    let state = AppState {
        repo: Repository::new(Arc::new(store)),
    };

    let app = create_router(state);

    // Start server
    let bind_addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(bind_addr).await?;
    tracing::info!("Server listening on {}", bind_addr);
    tracing::info!("API available at http://{}/api", bind_addr);

    axum::serve(listener, app).await?;

    Ok(())
}
