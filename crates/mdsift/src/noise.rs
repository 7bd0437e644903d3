//! Boilerplate removal.
//!
//! A fixed, ordered denylist of page chrome (ads, navigation, footers,
//! cookie banners) applied entry by entry to the working tree, followed by a
//! pass dropping elements hidden inline. The rules are explicit tagged
//! variants rather than selector strings, so a pass can skip nothing and
//! throw nothing; what it removes is counted and traced.

use crate::node::{Element, Node};

/// One denylist entry.
#[derive(Debug, Clone, Copy)]
enum NoiseRule {
    Tag(&'static str),
    Class(&'static str),
    Id(&'static str),
    Role(&'static str),
    /// A `header` with no `article` ancestor. In-article headers are content.
    BareHeader,
}

const NOISE_RULES: &[NoiseRule] = &[
    NoiseRule::Tag("script"),
    NoiseRule::Tag("style"),
    NoiseRule::Tag("noscript"),
    NoiseRule::Tag("iframe"),
    NoiseRule::Tag("svg"),
    NoiseRule::Class("ad"),
    NoiseRule::Class("ads"),
    NoiseRule::Class("advertisement"),
    NoiseRule::Class("social-share"),
    NoiseRule::Class("nav"),
    NoiseRule::Tag("nav"),
    NoiseRule::Tag("footer"),
    NoiseRule::Class("footer"),
    NoiseRule::BareHeader,
    NoiseRule::Class("sidebar"),
    NoiseRule::Class("cookie-banner"),
    NoiseRule::Class("popup"),
    NoiseRule::Class("modal"),
    NoiseRule::Role("banner"),
    NoiseRule::Role("navigation"),
    NoiseRule::Class("comments"),
    NoiseRule::Id("comments"),
    NoiseRule::Class("related-posts"),
];

/// Strip boilerplate and hidden elements from the working tree, in place.
/// Returns the number of elements removed.
pub fn remove_noise(root: &mut Element) -> usize {
    let mut removed = 0;
    for rule in NOISE_RULES {
        removed += apply_rule(root, rule, false);
    }
    removed += remove_hidden(root);
    tracing::debug!(removed, "noise removal finished");
    removed
}

fn rule_matches(rule: &NoiseRule, el: &Element, in_article: bool) -> bool {
    match rule {
        NoiseRule::Tag(tag) => el.tag == *tag,
        NoiseRule::Class(class) => el.has_class(class),
        NoiseRule::Id(id) => el.attr("id") == Some(*id),
        NoiseRule::Role(role) => el.attr("role") == Some(*role),
        NoiseRule::BareHeader => el.tag == "header" && !in_article,
    }
}

fn apply_rule(el: &mut Element, rule: &NoiseRule, in_article: bool) -> usize {
    let in_article = in_article || el.tag == "article";
    let mut removed = 0;

    el.children.retain(|child| match child {
        Node::Element(c) if rule_matches(rule, c, in_article) => {
            removed += 1;
            false
        }
        _ => true,
    });

    for child in &mut el.children {
        if let Node::Element(c) = child {
            removed += apply_rule(c, rule, in_article);
        }
    }

    removed
}

fn is_hidden(el: &Element) -> bool {
    if el.has_attr("hidden") {
        return true;
    }
    el.attr("style")
        .is_some_and(|style| style.contains("display:none") || style.contains("display: none"))
}

fn remove_hidden(el: &mut Element) -> usize {
    let mut removed = 0;

    el.children.retain(|child| match child {
        Node::Element(c) if is_hidden(c) => {
            removed += 1;
            false
        }
        _ => true,
    });

    for child in &mut el.children {
        if let Node::Element(c) = child {
            removed += remove_hidden(c);
        }
    }

    removed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::html::{parse_document, project};

    fn cleaned(html: &str) -> Element {
        let document = parse_document(html);
        let mut projection = project(&document, "body");
        remove_noise(&mut projection.root);
        projection.root
    }

    #[test]
    fn test_removes_script_and_style() {
        let root = cleaned("<body><script>alert(1)</script><style>p{}</style><p>Content</p></body>");
        assert_eq!(root.text_content().trim(), "Content");
    }

    #[test]
    fn test_removes_nav_and_footer() {
        let root = cleaned("<body><nav>Menu</nav><p>Content</p><footer>Copyright</footer></body>");
        let text = root.text_content();
        assert!(!text.contains("Menu"));
        assert!(!text.contains("Copyright"));
        assert!(text.contains("Content"));
    }

    #[test]
    fn test_removes_class_and_role_noise() {
        let root = cleaned(
            r#"<body><div class="sidebar">Side</div><div role="banner">Banner</div>
            <div id="comments">Replies</div><p>Content</p></body>"#,
        );
        let text = root.text_content();
        assert!(!text.contains("Side"));
        assert!(!text.contains("Banner"));
        assert!(!text.contains("Replies"));
        assert!(text.contains("Content"));
    }

    #[test]
    fn test_bare_header_removed_article_header_kept() {
        let root = cleaned(
            "<body><header>Top Nav</header><article><header>Byline</header><p>Story</p></article></body>",
        );
        let text = root.text_content();
        assert!(!text.contains("Top Nav"));
        assert!(text.contains("Byline"));
        assert!(text.contains("Story"));
    }

    #[test]
    fn test_removes_hidden_elements() {
        let root = cleaned(
            r#"<body><div style="display:none">A</div><div style="color:red; display: none">B</div>
            <div hidden>C</div><p>Visible</p></body>"#,
        );
        let text = root.text_content();
        assert!(!text.contains('A'));
        assert!(!text.contains('B'));
        assert!(!text.contains('C'));
        assert!(text.contains("Visible"));
    }

    #[test]
    fn test_counts_removals() {
        let document = parse_document("<body><nav>a</nav><footer>b</footer><p>c</p></body>");
        let mut projection = project(&document, "body");
        assert_eq!(remove_noise(&mut projection.root), 2);
    }
}
