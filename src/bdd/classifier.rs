/// Keyword synonyms for each step category of a story.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Keywords {
    pub given: Vec<String>,
    pub and: Vec<String>,
    pub when: Vec<String>,
    pub then: Vec<String>,
}

impl Keywords {
    pub fn new<S: Into<String>>(
        given: impl IntoIterator<Item = S>,
        and: impl IntoIterator<Item = S>,
        when: impl IntoIterator<Item = S>,
        then: impl IntoIterator<Item = S>,
    ) -> Self {
        fn collect<S: Into<String>>(words: impl IntoIterator<Item = S>) -> Vec<String> {
            words.into_iter().map(Into::into).collect()
        }

        Self {
            given: collect(given),
            and: collect(and),
            when: collect(when),
            then: collect(then),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    Given,
    AndAsGiven,
    When,
    /// An `And` after the first `When`: an assertion like `Then`.
    AndAsWhen,
    Then,
    Unclassified,
}

impl LineKind {
    pub fn is_describe(self) -> bool {
        matches!(self, LineKind::Given | LineKind::AndAsGiven | LineKind::When)
    }

    pub fn is_it(self) -> bool {
        matches!(self, LineKind::AndAsWhen | LineKind::Then)
    }
}

/// Story lines split into outer `describe` lines and inner `it` lines.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Classification {
    pub describe_lines: Vec<String>,
    pub it_lines: Vec<String>,
    pub unclassified: usize,
}

/// Whether `line` starts with one of `words` followed by a space.
///
/// Words are trimmed first; a blank word never matches.
fn starts_with_any(line: &str, words: &[String]) -> bool {
    words.iter().map(|w| w.trim()).any(|word| {
        !word.is_empty()
            && line
                .strip_prefix(word)
                .map(|rest| rest.starts_with(' '))
                .unwrap_or(false)
    })
}

pub fn classify_line(line: &str, keywords: &Keywords, found_when: bool) -> LineKind {
    if starts_with_any(line, &keywords.given) {
        LineKind::Given
    } else if starts_with_any(line, &keywords.and) {
        if found_when {
            LineKind::AndAsWhen
        } else {
            LineKind::AndAsGiven
        }
    } else if starts_with_any(line, &keywords.when) {
        LineKind::When
    } else if starts_with_any(line, &keywords.then) {
        LineKind::Then
    } else {
        LineKind::Unclassified
    }
}

pub fn classify(story: &str, keywords: &Keywords) -> Classification {
    let mut result = Classification::default();
    let mut found_when = false;

    for line in story.split('\n') {
        let kind = classify_line(line, keywords, found_when);

        if kind == LineKind::When {
            found_when = true;
        }

        if kind.is_describe() {
            result.describe_lines.push(line.to_string());
        } else if kind.is_it() {
            result.it_lines.push(line.to_string());
        } else {
            result.unclassified += 1;
        }
    }

    result
}
