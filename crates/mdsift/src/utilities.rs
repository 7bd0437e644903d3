//! Shared text helpers.

use once_cell::sync::Lazy;
use regex::Regex;
use url::Url;

static NON_FILENAME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^a-zA-Z0-9_-]").expect("filename charset regex"));
static UNDERSCORE_RUNS: Lazy<Regex> = Lazy::new(|| Regex::new(r"_+").expect("underscore regex"));

/// Line-start tokens that would otherwise be read as Markdown structure.
/// Escaping is positional on purpose: inline prose must survive verbatim.
static LINE_START_ESCAPES: Lazy<Vec<(Regex, &'static str)>> = Lazy::new(|| {
    vec![
        (
            Regex::new(r"(?m)^(#{1,6} )").expect("heading escape regex"),
            r"\$1",
        ),
        (Regex::new(r"(?m)^-").expect("dash escape regex"), r"\-"),
        (Regex::new(r"(?m)^\+ ").expect("plus escape regex"), r"\+ "),
        (Regex::new(r"(?m)^(=+)").expect("setext escape regex"), r"\$1"),
        (Regex::new(r"(?m)^>").expect("quote escape regex"), r"\>"),
        (
            Regex::new(r"(?m)^(\d+)\. ").expect("ordered escape regex"),
            r"${1}\. ",
        ),
        (Regex::new(r"(?m)^(~~~)").expect("fence escape regex"), r"\$1"),
    ]
});

/// Escape text so it cannot start a Markdown block construct.
pub fn escape_markdown(text: &str) -> String {
    LINE_START_ESCAPES
        .iter()
        .fold(text.to_string(), |acc, (pattern, replacement)| {
            pattern.replace_all(&acc, *replacement).into_owned()
        })
}

/// Collapse every whitespace run to a single space.
pub fn collapse_whitespace(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut prev_was_whitespace = false;

    for c in s.chars() {
        if c.is_whitespace() {
            if !prev_was_whitespace {
                result.push(' ');
                prev_was_whitespace = true;
            }
        } else {
            result.push(c);
            prev_was_whitespace = false;
        }
    }

    result
}

/// Trim an optional attribute value, treating blank as absent.
pub fn clean_attribute(value: Option<&str>) -> String {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .unwrap_or_default()
}

/// Reduce a name to a safe filename stem: `[a-zA-Z0-9_-]` only, underscore
/// runs collapsed, at most 100 characters.
pub fn sanitize_filename(name: &str) -> String {
    let replaced = NON_FILENAME.replace_all(name, "_");
    let collapsed = UNDERSCORE_RUNS.replace_all(&replaced, "_");
    collapsed.chars().take(100).collect()
}

/// Host of a URL with any `www.` prefix removed; `"output"` when the input
/// is not a parseable URL with a host.
pub fn domain_from_url(url: &str) -> String {
    match Url::parse(url) {
        Ok(parsed) => match parsed.host_str() {
            Some(host) => host.strip_prefix("www.").unwrap_or(host).to_string(),
            None => "output".to_string(),
        },
        Err(_) => "output".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_markdown_line_starts() {
        assert_eq!(escape_markdown("- item"), "\\- item");
        assert_eq!(escape_markdown("+ item"), "\\+ item");
        assert_eq!(escape_markdown("# heading"), "\\# heading");
        assert_eq!(escape_markdown("> quote"), "\\> quote");
        assert_eq!(escape_markdown("1. step"), "1\\. step");
        assert_eq!(escape_markdown("==="), "\\===");
    }

    #[test]
    fn test_escape_markdown_keeps_prose() {
        assert_eq!(escape_markdown("a-b and 3.14"), "a-b and 3.14");
        assert_eq!(escape_markdown("[Image: logo]"), "[Image: logo]");
    }

    #[test]
    fn test_collapse_whitespace() {
        assert_eq!(collapse_whitespace("a\n\t  b"), "a b");
        assert_eq!(collapse_whitespace("  x  "), " x ");
    }

    #[test]
    fn test_clean_attribute() {
        assert_eq!(clean_attribute(Some("  x  ")), "x");
        assert_eq!(clean_attribute(Some("   ")), "");
        assert_eq!(clean_attribute(None), "");
    }

    #[test]
    fn test_sanitize_filename() {
        assert_eq!(sanitize_filename("my file name"), "my_file_name");
        assert_eq!(sanitize_filename("file<>:\"/\\|?*name"), "file_name");
        assert_eq!(sanitize_filename("a..b"), "a_b");
    }

    #[test]
    fn test_sanitize_filename_truncates() {
        let long = "a".repeat(200);
        assert_eq!(sanitize_filename(&long).len(), 100);
    }

    #[test]
    fn test_sanitize_filename_charset() {
        let out = sanitize_filename("файл文件αρχείο end");
        assert!(out.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'));
    }

    #[test]
    fn test_domain_from_url() {
        assert_eq!(domain_from_url("https://www.example.com/page"), "example.com");
        assert_eq!(domain_from_url("https://docs.python.org/3/"), "docs.python.org");
        assert_eq!(domain_from_url("http://localhost:3000/path"), "localhost");
        assert_eq!(domain_from_url("not a url"), "output");
    }
}
