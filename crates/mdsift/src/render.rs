//! The Markdown rendering engine.
//!
//! A recursive descent over the working tree: children render first, then
//! the first matching rule turns the node plus its rendered content into a
//! Markdown fragment. Fragments concatenate in document order; a final pass
//! trims newline padding and collapses runs of three or more newlines.

use crate::node::{Element, Node};
use crate::rules::{Context, Rule, Rules};
use crate::utilities::{collapse_whitespace, escape_markdown};

/// Heading style options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HeadingStyle {
    /// ATX style, prefixed with `#`.
    #[default]
    Atx,
    /// Setext style, underlined with `=` or `-` for levels 1 and 2.
    Setext,
}

/// Code block style options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CodeBlockStyle {
    /// Fenced code blocks (```).
    #[default]
    Fenced,
    /// Indented code blocks (4 spaces).
    Indented,
}

/// Options for the renderer.
#[derive(Debug, Clone)]
pub struct RenderOptions {
    pub heading_style: HeadingStyle,

    /// Horizontal rule string.
    pub hr: String,

    /// Bullet list marker.
    pub bullet_list_marker: char,

    pub code_block_style: CodeBlockStyle,

    /// Fence string for fenced code blocks.
    pub fence: String,

    /// Emphasis delimiter.
    pub em_delimiter: char,

    /// Strong delimiter.
    pub strong_delimiter: String,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            heading_style: HeadingStyle::Atx,
            hr: "* * *".to_string(),
            bullet_list_marker: '*',
            code_block_style: CodeBlockStyle::Fenced,
            fence: "```".to_string(),
            em_delimiter: '*',
            strong_delimiter: "**".to_string(),
        }
    }
}

/// Rule-driven tree-to-Markdown renderer.
pub struct MarkdownRenderer {
    options: RenderOptions,
    rules: Rules,
}

impl MarkdownRenderer {
    /// Create a renderer with default options.
    pub fn new() -> Self {
        Self {
            options: RenderOptions::default(),
            rules: Rules::new(),
        }
    }

    /// Create a renderer with custom options.
    pub fn with_options(options: RenderOptions) -> Self {
        Self {
            options,
            rules: Rules::new(),
        }
    }

    /// Add an override rule.
    pub fn add_rule(&mut self, key: &str, rule: Rule) -> &mut Self {
        self.rules.add(key, rule);
        self
    }

    pub fn options(&self) -> &RenderOptions {
        &self.options
    }

    /// Render the children of `root` (the subtree's inner content) to
    /// Markdown.
    pub fn render(&self, root: &Element) -> String {
        let rendered = self.render_children(root);
        post_process(&rendered)
    }

    fn render_children(&self, el: &Element) -> String {
        let mut out = String::new();
        let mut li_ordinal = 0usize;

        for child in &el.children {
            match child {
                Node::Text(text) => {
                    let collapsed = collapse_whitespace(text);
                    // Inter-block whitespace carries no content.
                    if collapsed.trim().is_empty() && (out.is_empty() || out.ends_with('\n')) {
                        continue;
                    }
                    out.push_str(&escape_markdown(&collapsed));
                }
                Node::Element(c) => {
                    if c.tag == "li" {
                        li_ordinal += 1;
                    }
                    let ctx = Context {
                        parent: Some(el),
                        ordinal: li_ordinal,
                    };
                    out.push_str(&self.render_element(c, &ctx));
                }
                Node::Comment(_) => {}
            }
        }

        out
    }

    fn render_element(&self, el: &Element, ctx: &Context) -> String {
        let content = self.render_children(el);

        match self.rules.for_node(el, ctx, &self.options) {
            Some(rule) => rule.replace(el, &content, ctx, &self.options),
            None => content,
        }
    }
}

impl Default for MarkdownRenderer {
    fn default() -> Self {
        Self::new()
    }
}

/// Trim newline padding and cap consecutive newlines at two.
fn post_process(output: &str) -> String {
    let result = output.trim_matches('\n');

    let mut newline_count = 0;
    let mut processed = String::with_capacity(result.len());

    for c in result.chars() {
        if c == '\n' {
            newline_count += 1;
            if newline_count <= 2 {
                processed.push(c);
            }
        } else {
            newline_count = 0;
            processed.push(c);
        }
    }

    processed
}
