pub mod classifier;
pub mod renderer;
pub mod template;

pub use classifier::{Classification, Keywords};
use template::Template;

use crate::settings::{Settings, SettingsError};

/// Turns Given/When/Then stories into nested `describe`/`it` scaffolding.
///
/// A formatter holds configuration only. Every call to [`StoryFormatter::parse`]
/// works on its own buffers, so one instance can serve concurrent callers.
#[derive(Debug, Clone)]
pub struct StoryFormatter {
    keywords: Keywords,
    describe_template: Template,
    it_template: Template,
}

impl StoryFormatter {
    pub fn new(settings: &Settings) -> Result<Self, SettingsError> {
        let keywords = settings.keywords()?;
        let describe_template = Template::parse(&settings.describe_template).map_err(|source| {
            SettingsError::Template {
                name: "describe_template",
                source,
            }
        })?;
        let it_template =
            Template::parse(&settings.it_template).map_err(|source| SettingsError::Template {
                name: "it_template",
                source,
            })?;

        Self::from_parts(keywords, describe_template, it_template)
    }

    pub fn from_parts(
        keywords: Keywords,
        describe_template: Template,
        it_template: Template,
    ) -> Result<Self, SettingsError> {
        // describe: (line, inner content), the inner slot is left open while nesting
        if describe_template.slot_count(0) == 0 {
            return Err(SettingsError::InvalidTemplate {
                name: "describe_template",
                reason: "line slot 0 is never used".into(),
            });
        }
        let holes = describe_template.slot_count(1);
        if holes != 1 {
            return Err(SettingsError::InvalidTemplate {
                name: "describe_template",
                reason: format!("inner content slot must appear exactly once, found {}", holes),
            });
        }
        if describe_template.max_slot() > Some(1) {
            return Err(SettingsError::InvalidTemplate {
                name: "describe_template",
                reason: "only slots 0 (line) and 1 (inner content) are available".into(),
            });
        }
        if describe_template.converts_integers() {
            return Err(SettingsError::InvalidTemplate {
                name: "describe_template",
                reason: "integer conversion is not supported for describe lines".into(),
            });
        }

        // it: (line, story id, empty body)
        if it_template.max_slot() > Some(2) {
            return Err(SettingsError::InvalidTemplate {
                name: "it_template",
                reason: "only slots 0 (line), 1 (story id) and 2 (body) are available".into(),
            });
        }

        Ok(Self {
            keywords,
            describe_template,
            it_template,
        })
    }

    pub fn classify(&self, story: &str) -> Classification {
        classifier::classify(story, &self.keywords)
    }

    /// Render a story as spec scaffolding.
    ///
    /// A story without describe lines renders as the bare `it` block.
    pub fn parse(&self, story: &str, story_id: &str) -> String {
        let Classification {
            describe_lines,
            it_lines,
            unclassified,
        } = self.classify(story);

        tracing::debug!(
            "Story {}: {} describe, {} it, {} ignored",
            story_id,
            describe_lines.len(),
            it_lines.len(),
            unclassified
        );

        let its = renderer::render_its(
            &it_lines,
            story_id,
            describe_lines.len(),
            &self.it_template,
        );

        match renderer::render_describes(&describe_lines, &self.describe_template) {
            Some(skeleton) => skeleton.fill(&its),
            None => its,
        }
    }
}
