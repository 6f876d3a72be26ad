use serde::{Deserialize, Serialize};
use std::fs::File;
use std::path::{Path, PathBuf};

use crate::bdd::template::TemplateError;
use crate::bdd::Keywords;

#[derive(thiserror::Error, Debug)]
pub enum SettingsError {
    #[error("Settings file not found: {0}")]
    NotFound(PathBuf),

    #[error("Unknown language preset '{0}' (expected one of: {})", LANGUAGES.join(", "))]
    UnknownLanguage(String),

    #[error("Invalid {name}: {source}")]
    Template {
        name: &'static str,
        #[source]
        source: TemplateError,
    },

    #[error("Invalid {name}: {reason}")]
    InvalidTemplate { name: &'static str, reason: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

/// One keyword or a list of synonyms.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum KeywordList {
    One(String),
    Many(Vec<String>),
}

impl KeywordList {
    pub fn to_vec(&self) -> Vec<String> {
        match self {
            KeywordList::One(word) => vec![word.clone()],
            KeywordList::Many(words) => words.clone(),
        }
    }
}

/// Formatter settings as stored in the settings file.
///
/// `language` picks the keyword preset; any `word_*` key overrides that
/// category of the preset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default = "default_language")]
    pub language: String,

    #[serde(rename = "word_Given", default, skip_serializing_if = "Option::is_none")]
    pub word_given: Option<KeywordList>,

    #[serde(rename = "word_And", default, skip_serializing_if = "Option::is_none")]
    pub word_and: Option<KeywordList>,

    #[serde(rename = "word_When", default, skip_serializing_if = "Option::is_none")]
    pub word_when: Option<KeywordList>,

    #[serde(rename = "word_Then", default, skip_serializing_if = "Option::is_none")]
    pub word_then: Option<KeywordList>,

    #[serde(default = "default_describe_template")]
    pub describe_template: String,

    #[serde(default = "default_it_template")]
    pub it_template: String,
}

fn default_language() -> String {
    "en".to_string()
}

fn default_describe_template() -> String {
    "describe('{0}', function() {{{1}}});".to_string()
}

fn default_it_template() -> String {
    "it('{0} #{1}', function() {2});\n".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            language: default_language(),
            word_given: None,
            word_and: None,
            word_when: None,
            word_then: None,
            describe_template: default_describe_template(),
            it_template: default_it_template(),
        }
    }
}

/// Built-in keyword presets by language code.
pub fn preset(language: &str) -> Option<Keywords> {
    match language {
        "en" => Some(Keywords::new(["Given"], ["And"], ["When", "But"], ["Then"])),
        "es" => Some(Keywords::new(["Dado"], ["Y"], ["Cuando", "Pero"], ["Entonces"])),
        _ => None,
    }
}

pub const LANGUAGES: &[&str] = &["en", "es"];

impl Settings {
    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        if !path.exists() {
            return Err(SettingsError::NotFound(path.to_path_buf()));
        }

        let settings = serde_json::from_reader(File::open(path)?)?;
        Ok(settings)
    }

    pub fn save(&self, path: &Path) -> Result<(), SettingsError> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        serde_json::to_writer_pretty(File::create(path)?, self)?;
        Ok(())
    }

    /// Resolve the keyword preset with per-category overrides applied.
    pub fn keywords(&self) -> Result<Keywords, SettingsError> {
        let mut keywords = preset(&self.language)
            .ok_or_else(|| SettingsError::UnknownLanguage(self.language.clone()))?;

        if let Some(words) = &self.word_given {
            keywords.given = words.to_vec();
        }
        if let Some(words) = &self.word_and {
            keywords.and = words.to_vec();
        }
        if let Some(words) = &self.word_when {
            keywords.when = words.to_vec();
        }
        if let Some(words) = &self.word_then {
            keywords.then = words.to_vec();
        }

        Ok(keywords)
    }
}
