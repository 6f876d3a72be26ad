use super::template::{Skeleton, Template};

/// Spaces per nesting level.
pub const WITH_SPACE_LENGTH: usize = 2;

fn indent(depth: usize) -> String {
    " ".repeat(depth * WITH_SPACE_LENGTH)
}

/// Strip one leading `#` from a story id.
pub fn normalize_story_id(story_id: &str) -> &str {
    story_id.strip_prefix('#').unwrap_or(story_id)
}

/// Fold describe lines into nested blocks, last line innermost.
///
/// Returns `None` when there is nothing to nest. The returned skeleton's hole
/// sits inside the innermost block.
pub fn render_describes(lines: &[String], template: &Template) -> Option<Skeleton> {
    let mut result: Option<Skeleton> = None;

    for (depth, line) in lines.iter().enumerate().rev() {
        let level = match template.render_around(&[line.as_str()], 1) {
            Ok(level) => level,
            Err(e) => {
                tracing::warn!("Skipping describe line {:?}: {}", line, e);
                continue;
            }
        };

        result = Some(match result.take() {
            None => level,
            Some(inner) => level.nest(inner, &indent(depth + 1), &indent(depth)),
        });
    }

    result
}

/// Render each line as a sibling `it` block at the given nesting depth.
///
/// The output always starts with a newline. Lines the template cannot render
/// are left out.
pub fn render_its(lines: &[String], story_id: &str, depth: usize, template: &Template) -> String {
    let story_id = normalize_story_id(story_id);
    let space = indent(depth);
    let body = format!("{{\n{}  }}", space);
    let mut output = String::from("\n");

    for line in lines {
        match template.render(&[line.as_str(), story_id, body.as_str()]) {
            Ok(rendered) => {
                output.push_str(&space);
                output.push_str(&rendered);
            }
            Err(e) => tracing::warn!("Skipping it line {:?}: {}", line, e),
        }
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn describe() -> Template {
        Template::parse("d({0}){{{1}}}").unwrap()
    }

    fn it() -> Template {
        Template::parse("it({0} #{1}) {2}\n").unwrap()
    }

    #[test]
    fn innermost_block_wraps_last_line() {
        let skeleton = render_describes(&lines(&["L0", "L1", "L2"]), &describe()).unwrap();
        assert_eq!(
            skeleton.fill("X"),
            "d(L0){\n  d(L1){\n    d(L2){X}\n  }\n}"
        );
    }

    #[test]
    fn single_describe_has_no_padding() {
        let skeleton = render_describes(&lines(&["Given X"]), &describe()).unwrap();
        assert_eq!(skeleton.fill("X"), "d(Given X){X}");
    }

    #[test]
    fn no_describe_lines_gives_no_skeleton() {
        assert_eq!(render_describes(&[], &describe()), None);
    }

    #[test]
    fn describe_lines_keep_percent_signs() {
        let skeleton = render_describes(&lines(&["Given 50% off"]), &describe()).unwrap();
        assert_eq!(skeleton.fill("%s"), "d(Given 50% off){%s}");
    }

    #[test]
    fn describe_level_that_fails_is_skipped() {
        let strict = Template::parse("d({0:d}){{{1}}}").unwrap();
        let skeleton = render_describes(&lines(&["1", "word", "3"]), &strict).unwrap();
        assert_eq!(skeleton.fill("X"), "d(1){\n  d(3){X}\n}");
    }

    #[test]
    fn renders_its_at_depth() {
        let output = render_its(&lines(&["Then a", "And b"]), "7", 2, &it());
        assert_eq!(
            output,
            "\n    it(Then a #7) {\n      }\n    it(And b #7) {\n      }\n"
        );
    }

    #[test]
    fn strips_one_hash_from_story_id() {
        let with_hash = render_its(&lines(&["Then a"]), "#123", 1, &it());
        let without = render_its(&lines(&["Then a"]), "123", 1, &it());
        assert_eq!(with_hash, without);
        assert!(with_hash.contains("#123)"));

        assert_eq!(normalize_story_id("##5"), "#5");
        assert_eq!(normalize_story_id("#"), "");
        assert_eq!(normalize_story_id(""), "");
    }

    #[test]
    fn empty_it_list_is_single_newline() {
        assert_eq!(render_its(&[], "1", 3, &it()), "\n");
    }

    #[test]
    fn skips_lines_that_fail_to_render() {
        let numeric = Template::parse("it({0:d});").unwrap();
        let output = render_its(&lines(&["12", "Then oops", "34"]), "1", 0, &numeric);
        assert_eq!(output, "\nit(12);it(34);");
    }

    #[test]
    fn unformattable_story_id_drops_its_but_not_the_render() {
        let numeric_id = Template::parse("it('{0}', {1:d});").unwrap();
        let output = render_its(&lines(&["Then a", "Then b"]), "#abc", 1, &numeric_id);
        assert_eq!(output, "\n");
    }
}
