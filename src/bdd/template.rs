//! Positional text templates used for `describe` and `it` blocks.
//!
//! A pattern containing `%s` is read printf-style: every `%s` is the next
//! positional slot, `%%` is a literal percent sign and braces are plain text.
//! Any other pattern is read brace-style: `{}`, `{1}` or `{1:>8d}`, with
//! `{{` and `}}` standing for literal braces.

use lazy_static::lazy_static;
use regex::Regex;

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum TemplateError {
    #[error("Single '{brace}' encountered at byte {position}")]
    UnmatchedBrace { brace: char, position: usize },

    #[error("Invalid format spec '{0}'")]
    InvalidSpec(String),

    #[error("Cannot switch between automatic and manual slot numbering")]
    MixedNumbering,

    #[error("Slot {index} has no value ({given} given)")]
    MissingValue { index: usize, given: usize },

    #[error("Value '{0}' is not an integer")]
    NotAnInteger(String),

    #[error("Slot {index} must appear exactly once, found {count}")]
    HoleCount { index: usize, count: usize },
}

lazy_static! {
    static ref BRACE_REGEX: Regex = Regex::new(
        r"(?x)
        \{\{|               # Escaped open brace
        \}\}|               # Escaped close brace
        \{([^{}]*)\}|       # Slot: {}, {1}, {1:>8d}
        [{}]                # Stray brace
        "
    )
    .unwrap();
    static ref PRINTF_REGEX: Regex = Regex::new(r"%%|%s").unwrap();
    static ref SLOT_REGEX: Regex = Regex::new(r"^(\d*)(?::(.*))?$").unwrap();
    static ref SPEC_REGEX: Regex = Regex::new(r"^(?:(.)?([<>^]))?(\d*)([sd]?)$").unwrap();
}

/// Widest padding a format spec may ask for.
pub const MAX_WIDTH: usize = 4096;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Align {
    Left,
    Right,
    Center,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Conversion {
    Str,
    Int,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct FormatSpec {
    fill: char,
    align: Option<Align>,
    width: usize,
    conversion: Conversion,
}

impl Default for FormatSpec {
    fn default() -> Self {
        Self {
            fill: ' ',
            align: None,
            width: 0,
            conversion: Conversion::Str,
        }
    }
}

impl FormatSpec {
    fn parse(spec: &str) -> Result<Self, TemplateError> {
        let cap = SPEC_REGEX
            .captures(spec)
            .ok_or_else(|| TemplateError::InvalidSpec(spec.to_string()))?;

        let fill = cap
            .get(1)
            .and_then(|m| m.as_str().chars().next())
            .unwrap_or(' ');
        let align = cap.get(2).map(|m| match m.as_str() {
            "<" => Align::Left,
            ">" => Align::Right,
            _ => Align::Center,
        });
        let width = match cap.get(3).map(|m| m.as_str()).unwrap_or("") {
            "" => 0,
            digits => digits
                .parse::<usize>()
                .ok()
                .filter(|width| *width <= MAX_WIDTH)
                .ok_or_else(|| TemplateError::InvalidSpec(spec.to_string()))?,
        };
        let conversion = match cap.get(4).map(|m| m.as_str()) {
            Some("d") => Conversion::Int,
            _ => Conversion::Str,
        };

        Ok(Self {
            fill,
            align,
            width,
            conversion,
        })
    }

    fn apply(&self, value: &str) -> Result<String, TemplateError> {
        let text = match self.conversion {
            Conversion::Str => value.to_string(),
            Conversion::Int => value
                .parse::<i64>()
                .map_err(|_| TemplateError::NotAnInteger(value.to_string()))?
                .to_string(),
        };

        let len = text.chars().count();
        if len >= self.width {
            return Ok(text);
        }

        // Strings align left and integers right unless told otherwise
        let missing = self.width - len;
        let align = self.align.unwrap_or(match self.conversion {
            Conversion::Str => Align::Left,
            Conversion::Int => Align::Right,
        });
        let pad = |n: usize| std::iter::repeat(self.fill).take(n).collect::<String>();

        Ok(match align {
            Align::Left => text + &pad(missing),
            Align::Right => pad(missing) + &text,
            Align::Center => {
                let left = missing / 2;
                pad(left) + &text + &pad(missing - left)
            }
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Segment {
    Literal(String),
    Slot { index: usize, spec: FormatSpec },
}

/// Rendered text with a single open hole, split around it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Skeleton {
    pub head: String,
    pub tail: String,
}

impl Skeleton {
    /// Place `inner` into this skeleton's hole on its own indented line.
    ///
    /// The hole of the result is the hole of `inner`.
    pub fn nest(self, inner: Skeleton, inner_indent: &str, outer_indent: &str) -> Skeleton {
        Skeleton {
            head: format!("{}\n{}{}", self.head, inner_indent, inner.head),
            tail: format!("{}\n{}{}", inner.tail, outer_indent, self.tail),
        }
    }

    pub fn fill(&self, body: &str) -> String {
        let mut output = String::with_capacity(self.head.len() + body.len() + self.tail.len());
        output.push_str(&self.head);
        output.push_str(body);
        output.push_str(&self.tail);
        output
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Template {
    pattern: String,
    segments: Vec<Segment>,
}

impl Template {
    pub fn parse(pattern: &str) -> Result<Self, TemplateError> {
        let segments = if pattern.contains("%s") {
            parse_printf(pattern)
        } else {
            parse_braces(pattern)?
        };

        Ok(Self {
            pattern: pattern.to_string(),
            segments,
        })
    }

    /// Highest slot index referenced by the pattern.
    pub fn max_slot(&self) -> Option<usize> {
        self.slots().map(|(index, _)| index).max()
    }

    pub fn slot_count(&self, index: usize) -> usize {
        self.slots().filter(|(i, _)| *i == index).count()
    }

    pub fn converts_integers(&self) -> bool {
        self.slots()
            .any(|(_, spec)| spec.conversion == Conversion::Int)
    }

    pub fn render(&self, values: &[&str]) -> Result<String, TemplateError> {
        let mut output = String::with_capacity(self.pattern.len());

        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => output.push_str(text),
                Segment::Slot { index, spec } => {
                    output.push_str(&format_slot(values, *index, spec)?);
                }
            }
        }

        Ok(output)
    }

    /// Render every slot except `hole`, which is left open.
    ///
    /// The hole slot must appear exactly once in the pattern. Its value in
    /// `values`, if any, is ignored.
    pub fn render_around(&self, values: &[&str], hole: usize) -> Result<Skeleton, TemplateError> {
        let count = self.slot_count(hole);
        if count != 1 {
            return Err(TemplateError::HoleCount { index: hole, count });
        }

        let mut skeleton = Skeleton::default();
        let mut past_hole = false;

        for segment in &self.segments {
            let target = if past_hole {
                &mut skeleton.tail
            } else {
                &mut skeleton.head
            };

            match segment {
                Segment::Literal(text) => target.push_str(text),
                Segment::Slot { index, .. } if *index == hole => past_hole = true,
                Segment::Slot { index, spec } => {
                    target.push_str(&format_slot(values, *index, spec)?);
                }
            }
        }

        Ok(skeleton)
    }

    fn slots(&self) -> impl Iterator<Item = (usize, &FormatSpec)> {
        self.segments.iter().filter_map(|segment| match segment {
            Segment::Slot { index, spec } => Some((*index, spec)),
            Segment::Literal(_) => None,
        })
    }
}

fn format_slot(values: &[&str], index: usize, spec: &FormatSpec) -> Result<String, TemplateError> {
    let value = values.get(index).ok_or(TemplateError::MissingValue {
        index,
        given: values.len(),
    })?;
    spec.apply(value)
}

fn flush_literal(segments: &mut Vec<Segment>, literal: &mut String) {
    if !literal.is_empty() {
        segments.push(Segment::Literal(std::mem::take(literal)));
    }
}

fn parse_printf(pattern: &str) -> Vec<Segment> {
    let mut segments = Vec::new();
    let mut literal = String::new();
    let mut last_end = 0;
    let mut next_index = 0;

    for m in PRINTF_REGEX.find_iter(pattern) {
        literal.push_str(&pattern[last_end..m.start()]);

        if m.as_str() == "%%" {
            literal.push('%');
        } else {
            flush_literal(&mut segments, &mut literal);
            segments.push(Segment::Slot {
                index: next_index,
                spec: FormatSpec::default(),
            });
            next_index += 1;
        }

        last_end = m.end();
    }

    literal.push_str(&pattern[last_end..]);
    flush_literal(&mut segments, &mut literal);

    segments
}

fn parse_braces(pattern: &str) -> Result<Vec<Segment>, TemplateError> {
    let mut segments = Vec::new();
    let mut literal = String::new();
    let mut last_end = 0;
    let mut next_auto = 0;
    let mut used_auto = false;
    let mut used_manual = false;

    for cap in BRACE_REGEX.captures_iter(pattern) {
        let Some(m) = cap.get(0) else {
            continue;
        };

        literal.push_str(&pattern[last_end..m.start()]);

        match m.as_str() {
            "{{" => literal.push('{'),
            "}}" => literal.push('}'),
            "{" | "}" => {
                return Err(TemplateError::UnmatchedBrace {
                    brace: m.as_str().chars().next().unwrap_or('{'),
                    position: m.start(),
                });
            }
            _ => {
                let inner = cap.get(1).map(|g| g.as_str()).unwrap_or("");
                let (index, spec) = parse_slot(inner)?;

                let index = match index {
                    Some(index) => {
                        used_manual = true;
                        index
                    }
                    None => {
                        used_auto = true;
                        next_auto += 1;
                        next_auto - 1
                    }
                };

                if used_auto && used_manual {
                    return Err(TemplateError::MixedNumbering);
                }

                flush_literal(&mut segments, &mut literal);
                segments.push(Segment::Slot { index, spec });
            }
        }

        last_end = m.end();
    }

    literal.push_str(&pattern[last_end..]);
    flush_literal(&mut segments, &mut literal);

    Ok(segments)
}

fn parse_slot(inner: &str) -> Result<(Option<usize>, FormatSpec), TemplateError> {
    let cap = SLOT_REGEX
        .captures(inner)
        .ok_or_else(|| TemplateError::InvalidSpec(inner.to_string()))?;

    let index = match cap.get(1).map(|m| m.as_str()).unwrap_or("") {
        "" => None,
        digits => Some(
            digits
                .parse()
                .map_err(|_| TemplateError::InvalidSpec(inner.to_string()))?,
        ),
    };

    let spec = match cap.get(2) {
        Some(spec) => FormatSpec::parse(spec.as_str())?,
        None => FormatSpec::default(),
    };

    Ok((index, spec))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(pattern: &str, values: &[&str]) -> Result<String, TemplateError> {
        Template::parse(pattern)?.render(values)
    }

    #[test]
    fn renders_auto_numbered_slots() {
        assert_eq!(render("{} and {}", &["a", "b"]).unwrap(), "a and b");
    }

    #[test]
    fn renders_explicit_slots_in_any_order() {
        assert_eq!(render("{1}-{0}-{1}", &["a", "b"]).unwrap(), "b-a-b");
    }

    #[test]
    fn renders_escaped_braces() {
        assert_eq!(
            render("function() {{{0}}}", &["body"]).unwrap(),
            "function() {body}"
        );
    }

    #[test]
    fn renders_printf_style_with_literal_braces() {
        assert_eq!(
            render("describe('%s', function() {%s});", &["X", ""]).unwrap(),
            "describe('X', function() {});"
        );
    }

    #[test]
    fn printf_style_keeps_percent_escape() {
        assert_eq!(render("%s is 100%%", &["it"]).unwrap(), "it is 100%");
    }

    #[test]
    fn pads_with_width_and_alignment() {
        assert_eq!(render("[{0:5}]", &["ab"]).unwrap(), "[ab   ]");
        assert_eq!(render("[{0:>5}]", &["ab"]).unwrap(), "[   ab]");
        assert_eq!(render("[{0:*^6}]", &["ab"]).unwrap(), "[**ab**]");
        assert_eq!(render("[{0:4d}]", &["42"]).unwrap(), "[  42]");
    }

    #[test]
    fn integer_conversion_rejects_text() {
        assert_eq!(
            render("#{0:d}", &["abc"]),
            Err(TemplateError::NotAnInteger("abc".to_string()))
        );
        assert_eq!(render("#{0:d}", &["123"]).unwrap(), "#123");
    }

    #[test]
    fn missing_value_is_an_error() {
        assert_eq!(
            render("{0} {3}", &["a"]),
            Err(TemplateError::MissingValue { index: 3, given: 1 })
        );
    }

    #[test]
    fn rejects_stray_braces() {
        assert!(matches!(
            Template::parse("function() {"),
            Err(TemplateError::UnmatchedBrace { brace: '{', .. })
        ));
        assert!(matches!(
            Template::parse("}"),
            Err(TemplateError::UnmatchedBrace { brace: '}', position: 0 })
        ));
    }

    #[test]
    fn rejects_mixed_numbering() {
        assert_eq!(
            Template::parse("{} {0}"),
            Err(TemplateError::MixedNumbering)
        );
    }

    #[test]
    fn rejects_oversized_width() {
        assert!(matches!(
            Template::parse("it('{0:99999999999999}')"),
            Err(TemplateError::InvalidSpec(spec)) if spec == "99999999999999"
        ));
        assert!(matches!(
            Template::parse(&format!("{{0:>{}}}", MAX_WIDTH + 1)),
            Err(TemplateError::InvalidSpec(_))
        ));

        let widest = Template::parse(&format!("{{0:{}}}", MAX_WIDTH)).unwrap();
        assert_eq!(widest.render(&["x"]).unwrap().len(), MAX_WIDTH);
    }

    #[test]
    fn rejects_unknown_spec() {
        assert!(matches!(
            Template::parse("{0:x}"),
            Err(TemplateError::InvalidSpec(_))
        ));
        assert!(matches!(
            Template::parse("{name}"),
            Err(TemplateError::InvalidSpec(_))
        ));
    }

    #[test]
    fn reports_slot_usage() {
        let template = Template::parse("{0} {1} {1:d}").unwrap();
        assert_eq!(template.max_slot(), Some(1));
        assert_eq!(template.slot_count(1), 2);
        assert!(template.converts_integers());

        let plain = Template::parse("no slots").unwrap();
        assert_eq!(plain.max_slot(), None);
        assert!(!plain.converts_integers());
    }

    #[test]
    fn render_around_leaves_hole_open() {
        let template = Template::parse("describe('{0}', () => {{{1}}});").unwrap();
        let skeleton = template.render_around(&["Given X"], 1).unwrap();
        assert_eq!(skeleton.head, "describe('Given X', () => {");
        assert_eq!(skeleton.tail, "});");
        assert_eq!(skeleton.fill("BODY"), "describe('Given X', () => {BODY});");
    }

    #[test]
    fn render_around_requires_single_hole() {
        let twice = Template::parse("{0} {1} {1}").unwrap();
        assert_eq!(
            twice.render_around(&["a"], 1),
            Err(TemplateError::HoleCount { index: 1, count: 2 })
        );

        let never = Template::parse("{0}").unwrap();
        assert_eq!(
            never.render_around(&["a"], 1),
            Err(TemplateError::HoleCount { index: 1, count: 0 })
        );
    }

    #[test]
    fn hole_content_is_never_reinterpreted() {
        let template = Template::parse("<%s>%s</%s>").unwrap();
        let skeleton = template.render_around(&["a", "", "b"], 1).unwrap();
        assert_eq!(skeleton.fill("100% {0}"), "<a>100% {0}</b>");
    }

    #[test]
    fn nest_indents_inner_skeleton() {
        let outer = Skeleton {
            head: "outer{".to_string(),
            tail: "}".to_string(),
        };
        let inner = Skeleton {
            head: "inner{".to_string(),
            tail: "}".to_string(),
        };
        let nested = outer.nest(inner, "  ", "");
        assert_eq!(nested.fill("X"), "outer{\n  inner{X}\n}");
    }
}
