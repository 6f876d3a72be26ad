use axum::{
    extract::{Path, Query, State},
    Json,
};
use std::sync::Arc;

use super::{
    FormatRequest, FormatResponse, HealthResponse, SpecResponse, StoriesResponse, StoryQuery,
};
use crate::api::routes::AppState;
use crate::error::AppError;
use crate::settings::Settings;
use crate::stories::Story;

pub(crate) const MAX_STORY_LEN: usize = 100_000;

pub async fn format(
    State(state): State<Arc<AppState>>,
    Json(request): Json<FormatRequest>,
) -> Result<Json<FormatResponse>, AppError> {
    // Validate input
    if request.story.is_empty() {
        return Err(AppError::BadRequest("Story cannot be empty".into()));
    }

    if request.story.chars().count() > MAX_STORY_LEN {
        return Err(AppError::BadRequest(format!(
            "Story too long (max {} chars)",
            MAX_STORY_LEN
        )));
    }

    let code = state.formatter().parse(&request.story, &request.story_id);
    Ok(Json(FormatResponse { code }))
}

pub async fn list_stories(
    State(state): State<Arc<AppState>>,
    Query(query): Query<StoryQuery>,
) -> Result<Json<StoriesResponse>, AppError> {
    let stories = match query.q.as_deref() {
        Some(q) => state.stories.search(q)?,
        None => state.stories.list()?,
    };
    Ok(Json(StoriesResponse { stories }))
}

pub async fn get_story(
    State(state): State<Arc<AppState>>,
    Path(story_id): Path<String>,
) -> Result<Json<Story>, AppError> {
    Ok(Json(state.stories.get(&story_id)?))
}

pub async fn story_spec(
    State(state): State<Arc<AppState>>,
    Path(story_id): Path<String>,
) -> Result<Json<SpecResponse>, AppError> {
    let story = state.stories.get(&story_id)?;
    let code = state.formatter().parse(&story.description, &story.id);

    Ok(Json(SpecResponse {
        story_id: story.id,
        code,
    }))
}

pub async fn get_settings(State(state): State<Arc<AppState>>) -> Json<Settings> {
    Json(state.settings())
}

pub async fn put_settings(
    State(state): State<Arc<AppState>>,
    Json(settings): Json<Settings>,
) -> Result<Json<Settings>, AppError> {
    state.apply_settings(settings.clone())?;
    Ok(Json(settings))
}

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}
