use axum::{
    http::{header, Method},
    routing::{get, post},
    Router,
};
use std::path::PathBuf;
use std::sync::{Arc, RwLock};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers;
use crate::bdd::StoryFormatter;
use crate::error::AppError;
use crate::settings::{Settings, SettingsError};
use crate::stories::StoryStore;

struct ActiveSettings {
    settings: Settings,
    formatter: Arc<StoryFormatter>,
}

pub struct AppState {
    pub stories: StoryStore,
    settings_file: Option<PathBuf>,
    active: RwLock<ActiveSettings>,
}

impl AppState {
    pub fn new(
        settings: Settings,
        settings_file: Option<PathBuf>,
        stories: StoryStore,
    ) -> Result<Self, SettingsError> {
        let formatter = Arc::new(StoryFormatter::new(&settings)?);

        Ok(Self {
            stories,
            settings_file,
            active: RwLock::new(ActiveSettings {
                settings,
                formatter,
            }),
        })
    }

    pub fn formatter(&self) -> Arc<StoryFormatter> {
        let active = self.active.read().unwrap_or_else(|e| e.into_inner());
        Arc::clone(&active.formatter)
    }

    pub fn settings(&self) -> Settings {
        let active = self.active.read().unwrap_or_else(|e| e.into_inner());
        active.settings.clone()
    }

    /// Validate and activate new settings, persisting them when a settings
    /// file is configured.
    pub fn apply_settings(&self, settings: Settings) -> Result<(), AppError> {
        let formatter = Arc::new(StoryFormatter::new(&settings)?);

        // Held across save and swap so the file always matches what is served
        let mut active = self.active.write().unwrap_or_else(|e| e.into_inner());

        if let Some(path) = &self.settings_file {
            settings.save(path)?;
            tracing::info!("Saved settings to {}", path.display());
        }

        tracing::info!("Activated settings for language '{}'", settings.language);
        *active = ActiveSettings {
            settings,
            formatter,
        };

        Ok(())
    }
}

pub fn create_router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::PUT])
        .allow_headers([header::CONTENT_TYPE]);

    let api_routes = Router::new()
        .route("/format", post(handlers::format))
        .route("/stories", get(handlers::list_stories))
        .route("/stories/:id", get(handlers::get_story))
        .route("/stories/:id/spec", get(handlers::story_spec))
        .route(
            "/settings",
            get(handlers::get_settings).put(handlers::put_settings),
        )
        .route("/health", get(handlers::health));

    Router::new()
        .nest("/api", api_routes)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
