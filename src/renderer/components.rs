use std::sync::LazyLock;

use regex::Regex;

static WHITESPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").expect("valid regex"));
static EXTRA_LINE_BREAKS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n\n\n+").expect("valid regex"));

/// Collapse every whitespace run, line breaks included, to a single space.
pub fn collapse_whitespace(text: &str) -> String {
    WHITESPACE.replace_all(text, " ").into_owned()
}

/// Collapse three or more consecutive line breaks to one blank line.
///
/// Runs once over a finished document; running it per node would collapse
/// breaks that only become adjacent after template substitution.
pub fn remove_redundant_line_breaks(markdown: &str) -> String {
    EXTRA_LINE_BREAKS.replace_all(markdown, "\n\n").into_owned()
}

/// Turn the raw text of a `code` element into fenced-block content: empty
/// lines dropped, the first line's indentation removed from every line.
pub fn to_code_block(raw: &str) -> String {
    let lines: Vec<&str> = raw
        .split('\n')
        .map(|line| line.trim_end_matches('\r'))
        .filter(|line| !line.trim().is_empty())
        .collect();
    let Some(first) = lines.first() else {
        return String::new();
    };

    let indent = first.len() - first.trim_start_matches(' ').len();
    lines
        .iter()
        .map(|line| {
            let removable = line.len() - line.trim_start_matches(' ').len();
            &line[removable.min(indent)..]
        })
        .collect::<Vec<_>>()
        .join("\n")
        .trim_end()
        .to_string()
}

/// GitHub-style heading anchor: lowercase, punctuation dropped, spaces to `-`.
pub fn slugify(text: &str) -> String {
    text.trim()
        .chars()
        .filter_map(|c| match c {
            ' ' => Some('-'),
            c if c.is_alphanumeric() || c == '-' || c == '_' => Some(c),
            _ => None,
        })
        .flat_map(char::to_lowercase)
        .collect()
}

/// Upper-case the first character.
pub fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collapses_wrapped_source_lines() {
        assert_eq!(
            collapse_whitespace("Gets the\n            value  of\tthe widget."),
            "Gets the value of the widget."
        );
    }

    #[test]
    fn three_blank_lines_become_one() {
        assert_eq!(remove_redundant_line_breaks("a\n\n\n\nb\n\nc\n"), "a\n\nb\n\nc\n");
    }

    #[test]
    fn post_processing_is_idempotent() {
        let once = remove_redundant_line_breaks("# T\n\n\n\n\n|a|\n\n\n");
        assert_eq!(remove_redundant_line_breaks(&once), once);
    }

    #[test]
    fn code_block_dedents_by_first_line() {
        let raw = "\n            var x = 1;\n              x++;\n\n        ";
        assert_eq!(to_code_block(raw), "var x = 1;\n  x++;");
    }

    #[test]
    fn empty_code_block() {
        assert_eq!(to_code_block("\n   \n"), "");
    }

    #[test]
    fn slug_matches_heading_anchors() {
        assert_eq!(slugify("Baz(int x, String y)"), "bazint-x-string-y");
        assert_eq!(slugify("Run()"), "run");
    }

    #[test]
    fn capitalizes_first_letter() {
        assert_eq!(capitalize("value"), "Value");
        assert_eq!(capitalize(""), "");
    }
}
