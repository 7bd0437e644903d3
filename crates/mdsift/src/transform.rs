//! In-place content transforms on the working tree.
//!
//! Two independent passes (media stripping, link stripping) plus relative
//! URL resolution. Each operates on the owned clone produced by projection.

use url::Url;

use crate::node::{Element, Node};

const MEDIA_TAGS: &[&str] = &["img", "video", "audio", "picture", "figure", "canvas"];

/// Remove media elements. An image with non-empty alt text leaves a plain
/// `[Image: <alt>]` marker behind; everything else vanishes outright.
pub fn strip_media(el: &mut Element) {
    let mut i = 0;
    while i < el.children.len() {
        let action = match &el.children[i] {
            Node::Element(c) if MEDIA_TAGS.contains(&c.tag.as_str()) => {
                match c.attr("alt") {
                    Some(alt) if c.tag == "img" && !alt.is_empty() => {
                        Some(Some(format!("[Image: {alt}]")))
                    }
                    _ => Some(None),
                }
            }
            _ => None,
        };

        match action {
            Some(Some(marker)) => {
                el.children[i] = Node::Text(marker);
                i += 1;
            }
            Some(None) => {
                el.children.remove(i);
            }
            None => {
                if let Node::Element(c) = &mut el.children[i] {
                    strip_media(c);
                }
                i += 1;
            }
        }
    }
}

/// Replace every anchor with its visible text, dropping the hyperlink.
pub fn strip_links(el: &mut Element) {
    for child in &mut el.children {
        if let Node::Element(c) = child {
            if c.tag == "a" {
                *child = Node::Text(c.text_content());
            } else {
                strip_links(c);
            }
        }
    }
}

/// Rewrite every `href` and `src` under `el` to an absolute URL against
/// `base_url`. Attributes that fail to resolve keep their original value;
/// the skip is traced, never fatal. Returns the number of rewrites.
pub fn resolve_urls(el: &mut Element, base_url: &str) -> usize {
    let Ok(base) = Url::parse(base_url) else {
        tracing::debug!(base_url, "base url did not parse, skipping resolution");
        return 0;
    };

    let mut resolved = 0;
    resolve_walk(el, &base, &mut resolved);
    resolved
}

fn resolve_walk(el: &mut Element, base: &Url, resolved: &mut usize) {
    for name in ["href", "src"] {
        let joined = el.attr(name).map(|value| base.join(value));
        match joined {
            Some(Ok(absolute)) => {
                el.set_attr(name, absolute.as_str());
                *resolved += 1;
            }
            Some(Err(err)) => {
                tracing::debug!(%err, attribute = name, "leaving unresolvable url untouched");
            }
            None => {}
        }
    }

    for child in &mut el.children {
        if let Node::Element(c) = child {
            resolve_walk(c, base, resolved);
        }
    }
}
