pub mod handlers;
pub mod routes;

use serde::{Deserialize, Serialize};

use crate::stories::StorySummary;

#[derive(Debug, Deserialize)]
pub struct FormatRequest {
    pub story: String,
    #[serde(default)]
    pub story_id: String,
}

#[derive(Debug, Serialize)]
pub struct FormatResponse {
    pub code: String,
}

#[derive(Debug, Deserialize)]
pub struct StoryQuery {
    pub q: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct StoriesResponse {
    pub stories: Vec<StorySummary>,
}

#[derive(Debug, Serialize)]
pub struct SpecResponse {
    pub story_id: String,
    pub code: String,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}
