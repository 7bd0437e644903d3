//! The conversion pipeline.
//!
//! `convert` wires the passes together: project the configured selector,
//! clean and transform the owned clone, render it to Markdown, align tables,
//! and normalize whitespace. Each invocation is independent; the only shared
//! state is the immutable default renderer, built once and reused.

use indexmap::IndexMap;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use crate::html;
use crate::meta;
use crate::noise;
use crate::render::MarkdownRenderer;
use crate::tables::align_markdown_tables;
use crate::transform;

static NEWLINE_RUNS: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n{3,}").expect("newline regex"));

static DEFAULT_RENDERER: Lazy<MarkdownRenderer> = Lazy::new(MarkdownRenderer::new);

/// Conversion configuration.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConvertOptions {
    /// CSS selector naming the conversion root.
    pub selector: String,

    /// Base URL for resolving relative `href`/`src` attributes.
    pub base_url: Option<String>,

    /// Re-align pipe tables after rendering.
    pub align_tables: bool,

    /// Remove boilerplate before rendering.
    pub clean_noise: bool,

    /// Drop media elements (images keep an `[Image: alt]` marker).
    pub strip_media: bool,

    /// Keep hyperlinks; when false, anchors collapse to their text.
    pub preserve_links: bool,

    /// Extract head metadata into the result.
    pub extract_meta: bool,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            selector: "body".to_string(),
            base_url: None,
            align_tables: true,
            clean_noise: true,
            strip_media: false,
            preserve_links: true,
            extract_meta: false,
        }
    }
}

/// Size figures for a conversion's Markdown output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Stats {
    pub characters: usize,
    pub words: usize,
    pub lines: usize,
}

/// The outcome of one conversion. Immutable once produced.
#[derive(Debug, Clone, Serialize)]
pub struct Conversion {
    pub markdown: String,
    pub metadata: IndexMap<String, String>,
    /// The selector actually used, `"body (fallback)"` when the requested
    /// one matched nothing.
    pub selector: String,
    pub stats: Stats,
}

/// Convert an HTML document to Markdown.
pub fn convert(input: &str, options: &ConvertOptions) -> Conversion {
    let document = html::parse_document(input);

    let metadata = if options.extract_meta {
        meta::extract_metadata(&document)
    } else {
        IndexMap::new()
    };

    let mut projection = html::project(&document, &options.selector);

    if let Some(base) = &options.base_url {
        transform::resolve_urls(&mut projection.root, base);
    }
    if options.clean_noise {
        noise::remove_noise(&mut projection.root);
    }
    if options.strip_media {
        transform::strip_media(&mut projection.root);
    }
    if !options.preserve_links {
        transform::strip_links(&mut projection.root);
    }

    let mut markdown = DEFAULT_RENDERER.render(&projection.root);
    if options.align_tables {
        markdown = align_markdown_tables(&markdown);
    }
    let markdown = NEWLINE_RUNS
        .replace_all(&markdown, "\n\n")
        .trim()
        .to_string();

    let stats = Stats {
        characters: markdown.chars().count(),
        words: markdown.split_whitespace().count(),
        lines: markdown.split('\n').count(),
    };

    Conversion {
        markdown,
        metadata,
        selector: projection.selector_used,
        stats,
    }
}
