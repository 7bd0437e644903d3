//! # mdsift
//!
//! Convert HTML documents to clean, LLM-ready Markdown.
//!
//! The pipeline selects a subtree via CSS selector (falling back to the
//! document body), strips boilerplate and unwanted media from a private
//! clone, renders it through a rule-based Markdown engine with GFM
//! extensions, and column-aligns any pipe tables in the output.
//!
//! ## Design
//!
//! Parsing is delegated to [`scraper`]; the conversion core starts once a
//! DOM tree exists. Every mutating pass runs on an owned copy of the
//! selected subtree, so concurrent conversions are safe and the caller's
//! document is never touched. Rendering dispatches over an ordered rule
//! table: overrides first, GFM defaults after, first match wins.
//!
//! ## Example
//!
//! ```rust
//! use mdsift::{convert, ConvertOptions};
//!
//! let result = convert(
//!     "<html><body><h1>Hello World</h1><p>Some text.</p></body></html>",
//!     &ConvertOptions::default(),
//! );
//! assert!(result.markdown.contains("# Hello World"));
//! assert_eq!(result.selector, "body");
//! ```

pub mod html;
pub mod meta;
pub mod node;
pub mod noise;
pub mod pipeline;
pub mod render;
pub mod rules;
pub mod tables;
pub mod transform;
pub mod utilities;

pub use html::{parse_document, project, Projection, BODY_FALLBACK};
pub use node::{Element, Node};
pub use pipeline::{convert, Conversion, ConvertOptions, Stats};
pub use render::{CodeBlockStyle, HeadingStyle, MarkdownRenderer, RenderOptions};
pub use rules::{Context, Filter, Rule, Rules};
pub use tables::align_markdown_tables;
pub use utilities::{domain_from_url, sanitize_filename};
