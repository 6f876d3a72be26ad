use serde::{Deserialize, Deserializer, Serialize};
use std::fs::File;
use std::path::{Path, PathBuf};

use crate::bdd::renderer::normalize_story_id;
use crate::error::AppError;

/// A user story as exported from a project tracker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Story {
    #[serde(default, deserialize_with = "string_or_number")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub labels: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StorySummary {
    pub id: String,
    pub name: String,
}

// Trackers hand out numeric ids
fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(s) => Ok(s),
        serde_json::Value::Number(n) => Ok(n.to_string()),
        serde_json::Value::Null => Ok(String::new()),
        other => Err(serde::de::Error::custom(format!(
            "expected string or number id, got {}",
            other
        ))),
    }
}

impl Story {
    pub fn load(stories_dir: &Path, story_id: &str) -> Result<Self, AppError> {
        let path = stories_dir.join(format!("{}.json", story_id));

        if !path.exists() {
            return Err(AppError::StoryNotFound(story_id.to_string()));
        }

        let mut story: Story = serde_json::from_reader(File::open(&path)?)?;
        if story.id.is_empty() {
            story.id = story_id.to_string();
        }

        Ok(story)
    }

    pub fn summary(&self) -> StorySummary {
        StorySummary {
            id: self.id.clone(),
            name: self.name.clone(),
        }
    }

    fn matches(&self, query: &str) -> bool {
        let query = query.trim().to_lowercase();

        if query.is_empty() {
            return true;
        }

        if let Some(label) = query.strip_prefix("label:") {
            let label = label.trim();
            return self.labels.iter().any(|l| l.to_lowercase() == label);
        }

        self.name.to_lowercase().contains(&query)
            || self.description.to_lowercase().contains(&query)
            || self.labels.iter().any(|l| l.to_lowercase().contains(&query))
    }
}

/// Stories read from a directory of `<id>.json` files.
///
/// Nothing is cached; every call goes to disk.
pub struct StoryStore {
    stories_dir: PathBuf,
}

impl StoryStore {
    pub fn new(stories_dir: PathBuf) -> Self {
        Self { stories_dir }
    }

    pub fn get(&self, story_id: &str) -> Result<Story, AppError> {
        let id = normalize_story_id(story_id.trim());

        if id.is_empty() || !id.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_') {
            return Err(AppError::BadRequest(format!("Invalid story id '{}'", story_id)));
        }

        Story::load(&self.stories_dir, id)
    }

    pub fn list(&self) -> Result<Vec<StorySummary>, AppError> {
        Ok(self.all()?.iter().map(Story::summary).collect())
    }

    /// Stories whose name, description or labels contain `query`.
    ///
    /// `label:<name>` matches a label exactly. Case is ignored.
    pub fn search(&self, query: &str) -> Result<Vec<StorySummary>, AppError> {
        Ok(self
            .all()?
            .iter()
            .filter(|story| story.matches(query))
            .map(Story::summary)
            .collect())
    }

    fn all(&self) -> Result<Vec<Story>, AppError> {
        let mut stories = Vec::new();

        if !self.stories_dir.exists() {
            return Ok(stories);
        }

        for entry in std::fs::read_dir(&self.stories_dir)? {
            let entry = entry?;
            let path = entry.path();

            if path.extension().map(|e| e == "json").unwrap_or(false) {
                let Some(id) = path.file_stem().map(|s| s.to_string_lossy().to_string()) else {
                    continue;
                };

                match Story::load(&self.stories_dir, &id) {
                    Ok(story) => stories.push(story),
                    Err(e) => tracing::warn!("Skipping story file {}: {}", path.display(), e),
                }
            }
        }

        stories.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(stories)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn store_with(files: &[(&str, &str)]) -> (TempDir, StoryStore) {
        let dir = tempfile::tempdir().unwrap();
        for (name, content) in files {
            std::fs::write(dir.path().join(name), content).unwrap();
        }
        let store = StoryStore::new(dir.path().to_path_buf());
        (dir, store)
    }

    fn sample() -> (TempDir, StoryStore) {
        store_with(&[
            (
                "101.json",
                r#"{"id": 101, "name": "Login", "description": "Given a user\nThen welcome", "labels": ["auth"]}"#,
            ),
            (
                "102.json",
                r#"{"id": "102", "name": "Logout", "description": "When leaving\nThen bye", "labels": ["session"]}"#,
            ),
            ("103.json", r#"{"name": "Billing"}"#),
            ("notes.txt", "not a story"),
            ("broken.json", "{"),
        ])
    }

    #[test]
    fn gets_story_with_numeric_id() {
        let (_dir, store) = sample();
        let story = store.get("101").unwrap();
        assert_eq!(story.id, "101");
        assert_eq!(story.name, "Login");
        assert_eq!(story.labels, vec!["auth"]);
    }

    #[test]
    fn accepts_hash_prefixed_id() {
        let (_dir, store) = sample();
        assert_eq!(store.get("#102").unwrap().name, "Logout");
    }

    #[test]
    fn fills_missing_id_from_file_name() {
        let (_dir, store) = sample();
        let story = store.get("103").unwrap();
        assert_eq!(story.id, "103");
        assert_eq!(story.description, "");
    }

    #[test]
    fn unknown_story_is_not_found() {
        let (_dir, store) = sample();
        assert!(matches!(store.get("999"), Err(AppError::StoryNotFound(id)) if id == "999"));
    }

    #[test]
    fn rejects_path_like_ids() {
        let (_dir, store) = sample();
        assert!(matches!(store.get("../secret"), Err(AppError::BadRequest(_))));
        assert!(matches!(store.get("#"), Err(AppError::BadRequest(_))));
    }

    #[test]
    fn lists_sorted_and_skips_bad_files() {
        let (_dir, store) = sample();
        let ids: Vec<_> = store.list().unwrap().into_iter().map(|s| s.id).collect();
        assert_eq!(ids, vec!["101", "102", "103"]);
    }

    #[test]
    fn missing_directory_lists_nothing() {
        let store = StoryStore::new(PathBuf::from("/nonexistent/stories/dir"));
        assert!(store.list().unwrap().is_empty());
    }

    #[test]
    fn searches_text_and_labels() {
        let (_dir, store) = sample();

        let by_name: Vec<_> = store.search("log").unwrap().into_iter().map(|s| s.id).collect();
        assert_eq!(by_name, vec!["101", "102"]);

        let by_description = store.search("WELCOME").unwrap();
        assert_eq!(by_description.len(), 1);
        assert_eq!(by_description[0].id, "101");

        let by_label = store.search("label:session").unwrap();
        assert_eq!(by_label.len(), 1);
        assert_eq!(by_label[0].name, "Logout");

        assert!(store.search("label:sess").unwrap().is_empty());
        assert_eq!(store.search("  ").unwrap().len(), 3);
    }
}
