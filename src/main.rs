use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use tracing_subscriber::EnvFilter;

mod api;
mod bdd;
mod error;
mod settings;
mod stories;

use api::routes::{create_router, AppState};
use settings::Settings;
use stories::StoryStore;

#[tokio::main]
async fn main() {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Configuration from environment
    let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
    let port: u16 = std::env::var("PORT")
        .unwrap_or_else(|_| "3000".to_string())
        .parse()
        .expect("PORT must be a number");
    let stories_dir = std::env::var("STORIES_DIR").unwrap_or_else(|_| "./stories".to_string());
    let settings_file = std::env::var("SETTINGS_FILE").ok().map(PathBuf::from);

    let settings = match &settings_file {
        Some(path) if path.exists() => match Settings::load(path) {
            Ok(settings) => settings,
            Err(e) => {
                tracing::error!("Failed to load settings from {}: {}", path.display(), e);
                std::process::exit(1);
            }
        },
        Some(path) => {
            tracing::warn!("Settings file {} not found, using defaults", path.display());
            Settings::default()
        }
        None => Settings::default(),
    };

    let addr: SocketAddr = format!("{}:{}", host, port)
        .parse()
        .expect("Invalid address");

    tracing::info!("Story spec server v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!("Starting server on http://{}", addr);
    tracing::info!("Stories directory: {}", stories_dir);
    tracing::info!("Keyword language: {}", settings.language);

    let state = match AppState::new(settings, settings_file, StoryStore::new(stories_dir.into())) {
        Ok(state) => Arc::new(state),
        Err(e) => {
            tracing::error!("Invalid settings: {}", e);
            std::process::exit(1);
        }
    };

    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .await
        .expect("Server error");
}
