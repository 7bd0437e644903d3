//! HTML parsing and subtree projection.
//!
//! Parsing is delegated to `scraper` (html5ever underneath), which is
//! error-tolerant: any input yields a document. Projection queries the
//! configured CSS selector against that document and hands back an owned
//! clone of the matched subtree. An invalid or non-matching selector is a
//! fallback to `<body>`, never an error.

use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};

use crate::node::{Element, Node};

/// Reported as the selector in use when the requested one matched nothing.
pub const BODY_FALLBACK: &str = "body (fallback)";

static BODY: Lazy<Selector> = Lazy::new(|| Selector::parse("body").expect("body selector"));

/// A projected subtree plus the selector that actually produced it.
#[derive(Debug, Clone)]
pub struct Projection {
    pub root: Element,
    pub selector_used: String,
}

/// Parse an HTML string into a document.
pub fn parse_document(html: &str) -> Html {
    Html::parse_document(html)
}

/// Select the conversion root. Falls back to the document body (and reports
/// that) when `selector` is invalid or matches nothing.
pub fn project(document: &Html, selector: &str) -> Projection {
    match Selector::parse(selector) {
        Ok(compiled) => {
            if let Some(target) = document.select(&compiled).next() {
                return Projection {
                    root: clone_subtree(target),
                    selector_used: selector.to_string(),
                };
            }
        }
        Err(_) => {
            tracing::debug!(selector, "selector did not parse, treating as non-match");
        }
    }

    let body = document
        .select(&BODY)
        .next()
        .unwrap_or_else(|| document.root_element());
    Projection {
        root: clone_subtree(body),
        selector_used: BODY_FALLBACK.to_string(),
    }
}

/// Copy a parsed element into the owned working tree.
fn clone_subtree(element: ElementRef) -> Element {
    let mut node = Element::with_attrs(element.value().name(), element.value().attrs());

    for child in element.children() {
        match child.value() {
            scraper::Node::Text(text) => {
                let text: &str = &text.text;
                node.push(Node::Text(text.to_string()));
            }
            scraper::Node::Element(_) => {
                if let Some(child_element) = ElementRef::wrap(child) {
                    node.push(Node::Element(clone_subtree(child_element)));
                }
            }
            scraper::Node::Comment(comment) => {
                let comment: &str = comment;
                node.push(Node::Comment(comment.to_string()));
            }
            _ => {}
        }
    }

    node
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_project_matching_selector() {
        let document = parse_document(
            r#"<html><body><div id="main">Main</div><div id="side">Side</div></body></html>"#,
        );
        let projection = project(&document, "#main");
        assert_eq!(projection.selector_used, "#main");
        assert_eq!(projection.root.text_content(), "Main");
    }

    #[test]
    fn test_project_non_matching_selector_falls_back() {
        let document = parse_document("<html><body><p>Content</p></body></html>");
        let projection = project(&document, "#nonexistent");
        assert_eq!(projection.selector_used, BODY_FALLBACK);
        assert_eq!(projection.root.tag, "body");
        assert!(projection.root.text_content().contains("Content"));
    }

    #[test]
    fn test_project_invalid_selector_falls_back() {
        let document = parse_document("<html><body><p>Content</p></body></html>");
        let projection = project(&document, "][not-a-selector");
        assert_eq!(projection.selector_used, BODY_FALLBACK);
        assert!(projection.root.text_content().contains("Content"));
    }

    #[test]
    fn test_clone_preserves_attributes_and_comments() {
        let document =
            parse_document(r#"<body><a href="/x" title="T">link</a><!-- note --></body>"#);
        let projection = project(&document, "body");
        let a = projection.root.child_elements().next().expect("anchor");
        assert_eq!(a.attr("href"), Some("/x"));
        assert_eq!(a.attr("title"), Some("T"));
        assert!(projection
            .root
            .children
            .iter()
            .any(|c| matches!(c, Node::Comment(text) if text.contains("note"))));
    }

    #[test]
    fn test_projection_is_an_independent_copy() {
        let document = parse_document("<html><body><p>Keep me</p></body></html>");
        let mut first = project(&document, "body");
        first.root.children.clear();

        let second = project(&document, "body");
        assert!(second.root.text_content().contains("Keep me"));
    }
}
