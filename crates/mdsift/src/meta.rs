//! Metadata extraction from the document head.

use indexmap::IndexMap;
use once_cell::sync::Lazy;
use scraper::{Html, Selector};

/// `<meta>` names and properties worth carrying along. Colons become
/// underscores in the output keys (`og:title` → `og_title`).
const META_FIELDS: &[&str] = &[
    "description",
    "author",
    "keywords",
    "og:title",
    "og:description",
    "og:image",
    "twitter:title",
    "twitter:description",
];

static TITLE: Lazy<Selector> = Lazy::new(|| Selector::parse("title").expect("title selector"));
static CANONICAL: Lazy<Selector> =
    Lazy::new(|| Selector::parse(r#"link[rel="canonical"]"#).expect("canonical selector"));
static FIRST_H1: Lazy<Selector> = Lazy::new(|| Selector::parse("h1").expect("h1 selector"));

static META_SELECTORS: Lazy<Vec<(String, Selector)>> = Lazy::new(|| {
    META_FIELDS
        .iter()
        .map(|name| {
            let selector = Selector::parse(&format!(
                r#"meta[name="{name}"], meta[property="{name}"]"#
            ))
            .expect("meta selector");
            (name.replace(':', "_"), selector)
        })
        .collect()
});

/// Pull the fixed metadata set out of a parsed document. Fields absent from
/// the document are omitted, never inserted as placeholders.
pub fn extract_metadata(document: &Html) -> IndexMap<String, String> {
    let mut meta = IndexMap::new();

    if let Some(title) = document.select(&TITLE).next() {
        meta.insert(
            "title".to_string(),
            title.text().collect::<String>().trim().to_string(),
        );
    }

    for (key, selector) in META_SELECTORS.iter() {
        if let Some(tag) = document.select(selector).next() {
            if let Some(content) = tag.value().attr("content") {
                meta.insert(key.clone(), content.to_string());
            }
        }
    }

    if let Some(canonical) = document.select(&CANONICAL).next() {
        if let Some(href) = canonical.value().attr("href") {
            meta.insert("canonical".to_string(), href.to_string());
        }
    }

    if let Some(h1) = document.select(&FIRST_H1).next() {
        meta.insert(
            "h1".to_string(),
            h1.text().collect::<String>().trim().to_string(),
        );
    }

    meta
}
