//! Rule and filter types for the rendering engine.

use crate::node::Element;
use crate::render::RenderOptions;

/// Context handed to filters and replacement functions alongside the node:
/// the parent element and the node's 1-based position among `li` siblings
/// (0 for anything that is not a list item).
#[derive(Debug, Clone, Copy, Default)]
pub struct Context<'a> {
    pub parent: Option<&'a Element>,
    pub ordinal: usize,
}

impl Context<'_> {
    pub fn parent_tag(&self) -> Option<&str> {
        self.parent.map(|p| p.tag.as_str())
    }
}

/// Type alias for filter predicates.
pub type FilterFn = Box<dyn Fn(&Element, &Context, &RenderOptions) -> bool + Send + Sync>;

/// Type alias for replacement functions.
pub type ReplacementFn =
    Box<dyn Fn(&Element, &str, &Context, &RenderOptions) -> String + Send + Sync>;

/// A filter determines which elements a rule applies to.
pub enum Filter {
    /// Match a single tag name.
    Tag(&'static str),
    /// Match any of multiple tag names.
    Tags(&'static [&'static str]),
    /// Match using a predicate function.
    Predicate(FilterFn),
}

impl Filter {
    pub fn predicate<F>(f: F) -> Self
    where
        F: Fn(&Element, &Context, &RenderOptions) -> bool + Send + Sync + 'static,
    {
        Filter::Predicate(Box::new(f))
    }

    /// Check whether this filter matches an element.
    pub fn matches(&self, el: &Element, ctx: &Context, options: &RenderOptions) -> bool {
        match self {
            Filter::Tag(tag) => el.tag == *tag,
            Filter::Tags(tags) => tags.contains(&el.tag.as_str()),
            Filter::Predicate(f) => f(el, ctx, options),
        }
    }
}

/// A rule pairs a filter with a replacement producing a Markdown fragment
/// from the node and its already-rendered children.
pub struct Rule {
    pub filter: Filter,
    pub replacement: ReplacementFn,
}

impl Rule {
    pub fn new<F>(filter: Filter, replacement: F) -> Self
    where
        F: Fn(&Element, &str, &Context, &RenderOptions) -> String + Send + Sync + 'static,
    {
        Self {
            filter,
            replacement: Box::new(replacement),
        }
    }

    /// Create a rule that matches a single tag.
    pub fn for_tag<F>(tag: &'static str, replacement: F) -> Self
    where
        F: Fn(&Element, &str, &Context, &RenderOptions) -> String + Send + Sync + 'static,
    {
        Self::new(Filter::Tag(tag), replacement)
    }

    /// Create a rule that matches multiple tags.
    pub fn for_tags<F>(tags: &'static [&'static str], replacement: F) -> Self
    where
        F: Fn(&Element, &str, &Context, &RenderOptions) -> String + Send + Sync + 'static,
    {
        Self::new(Filter::Tags(tags), replacement)
    }

    /// Apply this rule's replacement.
    pub fn replace(
        &self,
        el: &Element,
        content: &str,
        ctx: &Context,
        options: &RenderOptions,
    ) -> String {
        (self.replacement)(el, content, ctx, options)
    }
}
