//! Owned document tree.
//!
//! Every conversion works on a private clone of the selected subtree, so the
//! in-place passes (noise removal, media stripping, link stripping, URL
//! resolution) never touch the caller-visible parsed document. The tree is
//! deliberately minimal: elements, text, comments.

use indexmap::IndexMap;

/// A node in the working tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Element(Element),
    Text(String),
    Comment(String),
}

impl Node {
    /// View this node as an element, if it is one.
    pub fn as_element(&self) -> Option<&Element> {
        match self {
            Node::Element(el) => Some(el),
            _ => None,
        }
    }

    pub fn is_text(&self) -> bool {
        matches!(self, Node::Text(_))
    }
}

/// An element with a lowercase tag name, ordered attributes and children.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Element {
    pub tag: String,
    pub attrs: IndexMap<String, String>,
    pub children: Vec<Node>,
}

impl Element {
    pub fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_lowercase(),
            attrs: IndexMap::new(),
            children: Vec::new(),
        }
    }

    pub fn with_attrs<'a, I>(tag: &str, attrs: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        Self {
            tag: tag.to_lowercase(),
            attrs: attrs
                .into_iter()
                .map(|(name, value)| (name.to_lowercase(), value.to_string()))
                .collect(),
            children: Vec::new(),
        }
    }

    pub fn push(&mut self, child: Node) {
        self.children.push(child);
    }

    /// Get an attribute value by (lowercase) name.
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs.get(name).map(String::as_str)
    }

    pub fn has_attr(&self, name: &str) -> bool {
        self.attrs.contains_key(name)
    }

    /// Set or replace an attribute.
    pub fn set_attr(&mut self, name: &str, value: &str) {
        self.attrs.insert(name.to_lowercase(), value.to_string());
    }

    /// Whitespace-separated entries of the `class` attribute.
    pub fn classes(&self) -> impl Iterator<Item = &str> {
        self.attr("class").unwrap_or("").split_whitespace()
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes().any(|c| c == class)
    }

    /// Direct element children, in order.
    pub fn child_elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(Node::as_element)
    }

    /// Concatenated text of this subtree, markup collapsed away.
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        for child in &self.children {
            match child {
                Node::Text(text) => out.push_str(text),
                Node::Element(el) => el.collect_text(out),
                Node::Comment(_) => {}
            }
        }
    }

    /// All descendant elements with the given tag, in document order.
    pub fn find_all(&self, tag: &str) -> Vec<&Element> {
        let mut out = Vec::new();
        self.collect_tags(&[tag], &mut out);
        out
    }

    /// All descendant elements matching any of the given tags, in document order.
    pub fn find_any(&self, tags: &[&str]) -> Vec<&Element> {
        let mut out = Vec::new();
        self.collect_tags(tags, &mut out);
        out
    }

    fn collect_tags<'a>(&'a self, tags: &[&str], out: &mut Vec<&'a Element>) {
        for child in self.child_elements() {
            if tags.contains(&child.tag.as_str()) {
                out.push(child);
            }
            child.collect_tags(tags, out);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn a_with_link() -> Element {
        let mut a = Element::with_attrs("a", vec![("href", "https://example.com")]);
        a.push(Node::Text("Link".to_string()));
        a
    }

    #[test]
    fn test_create_element() {
        let el = Element::new("DIV");
        assert_eq!(el.tag, "div");
        assert!(el.children.is_empty());
    }

    #[test]
    fn test_attributes() {
        let a = a_with_link();
        assert_eq!(a.attr("href"), Some("https://example.com"));
        assert_eq!(a.attr("class"), None);
        assert!(a.has_attr("href"));
    }

    #[test]
    fn test_set_attr_replaces() {
        let mut a = a_with_link();
        a.set_attr("href", "https://other.test");
        assert_eq!(a.attr("href"), Some("https://other.test"));
        assert_eq!(a.attrs.len(), 1);
    }

    #[test]
    fn test_classes() {
        let el = Element::with_attrs("div", vec![("class", "hero  wide dark")]);
        assert_eq!(el.classes().collect::<Vec<_>>(), vec!["hero", "wide", "dark"]);
        assert!(el.has_class("wide"));
        assert!(!el.has_class("narrow"));
    }

    #[test]
    fn test_text_content() {
        let mut div = Element::new("div");
        div.push(Node::Text("Hello ".to_string()));
        let mut span = Element::new("span");
        span.push(Node::Text("World".to_string()));
        div.push(Node::Element(span));
        div.push(Node::Comment("ignored".to_string()));

        assert_eq!(div.text_content(), "Hello World");
    }

    #[test]
    fn test_find_all_document_order() {
        let mut table = Element::new("table");
        let mut tr1 = Element::new("tr");
        tr1.push(Node::Element(Element::new("td")));
        let mut tr2 = Element::new("tr");
        tr2.push(Node::Element(Element::new("th")));
        tr2.push(Node::Element(Element::new("td")));
        table.push(Node::Element(tr1));
        table.push(Node::Element(tr2));

        assert_eq!(table.find_all("tr").len(), 2);
        assert_eq!(table.find_any(&["td", "th"]).len(), 3);
        let cells = table.find_all("tr")[1].find_any(&["td", "th"]);
        assert_eq!(cells[0].tag, "th");
        assert_eq!(cells[1].tag, "td");
    }
}
