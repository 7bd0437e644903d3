//! The default GFM-flavoured ruleset.
//!
//! Standard conventions: ATX headings, `**bold**`/`*italic*`, fenced code
//! blocks, `> ` blockquotes, ordered and unordered lists, plus strikethrough
//! and task-list markers. Table handling lives in the overrides module.

use super::{Filter, Rule};
use crate::render::{CodeBlockStyle, HeadingStyle};
use crate::utilities::clean_attribute;

/// Build the default ruleset, in match order.
pub fn default_rules() -> Vec<Rule> {
    vec![
        paragraph(),
        line_break(),
        heading(),
        blockquote(),
        list(),
        list_item(),
        indented_code_block(),
        fenced_code_block(),
        inline_code(),
        horizontal_rule(),
        link(),
        image(),
        emphasis(),
        strong(),
        strikethrough(),
        task_list_marker(),
    ]
}

fn paragraph() -> Rule {
    Rule::for_tag("p", |_, content, _, _| format!("\n\n{}\n\n", content.trim()))
}

fn line_break() -> Rule {
    Rule::for_tag("br", |_, _, _, _| "  \n".to_string())
}

fn heading() -> Rule {
    Rule::for_tags(&["h1", "h2", "h3", "h4", "h5", "h6"], |el, content, _, options| {
        let level: usize = el.tag[1..].parse().unwrap_or(1);

        let content = content.trim();
        if content.is_empty() {
            return String::new();
        }

        match options.heading_style {
            HeadingStyle::Setext if level <= 2 => {
                let underline = if level == 1 { "=" } else { "-" };
                format!("\n\n{}\n{}\n\n", content, underline.repeat(content.chars().count()))
            }
            _ => format!("\n\n{} {}\n\n", "#".repeat(level), content),
        }
    })
}

fn blockquote() -> Rule {
    Rule::for_tag("blockquote", |_, content, _, _| {
        let content = content.trim();
        if content.is_empty() {
            return String::new();
        }
        let quoted: Vec<String> = content.lines().map(|line| format!("> {line}")).collect();
        format!("\n\n{}\n\n", quoted.join("\n"))
    })
}

fn list() -> Rule {
    Rule::for_tags(&["ul", "ol"], |_, content, ctx, _| {
        let content = content.trim();

        // Nested lists sit flush under their parent item.
        if ctx.parent_tag() == Some("li") {
            format!("\n{content}")
        } else {
            format!("\n\n{content}\n\n")
        }
    })
}

fn list_item() -> Rule {
    Rule::for_tag("li", |_, content, ctx, options| {
        let content = content
            .trim()
            .replace("\n\n\n", "\n\n")
            .replace('\n', "\n    ");

        let prefix = if ctx.parent_tag() == Some("ol") {
            let start = ctx
                .parent
                .and_then(|p| p.attr("start"))
                .and_then(|s| s.parse::<usize>().ok());
            let number = start.map_or(ctx.ordinal, |s| s + ctx.ordinal - 1);
            format!("{number}.  ")
        } else {
            format!("{}   ", options.bullet_list_marker)
        };

        format!("{prefix}{content}\n")
    })
}

fn has_code_child(el: &crate::node::Element) -> bool {
    el.child_elements().any(|c| c.tag == "code")
}

fn indented_code_block() -> Rule {
    Rule::new(
        Filter::predicate(|el, _, options| {
            el.tag == "pre"
                && has_code_child(el)
                && matches!(options.code_block_style, CodeBlockStyle::Indented)
        }),
        |el, _, _, _| {
            let code = el
                .child_elements()
                .find(|c| c.tag == "code")
                .map(|c| c.text_content())
                .unwrap_or_default();

            let indented: Vec<String> = code.lines().map(|line| format!("    {line}")).collect();
            format!("\n\n{}\n\n", indented.join("\n"))
        },
    )
}

fn fenced_code_block() -> Rule {
    Rule::new(
        Filter::predicate(|el, _, options| {
            el.tag == "pre"
                && has_code_child(el)
                && matches!(options.code_block_style, CodeBlockStyle::Fenced)
        }),
        |el, _, _, options| {
            let Some(code) = el.child_elements().find(|c| c.tag == "code") else {
                return String::new();
            };

            let language = code
                .attr("class")
                .unwrap_or("")
                .split_whitespace()
                .find_map(|c| c.strip_prefix("language-"))
                .unwrap_or("");

            let fence = &options.fence;
            format!(
                "\n\n{}{}\n{}\n{}\n\n",
                fence,
                language,
                code.text_content().trim_end(),
                fence
            )
        },
    )
}

fn inline_code() -> Rule {
    Rule::new(
        Filter::predicate(|el, ctx, _| el.tag == "code" && ctx.parent_tag() != Some("pre")),
        |el, _, _, _| {
            let content = el.text_content();
            if content.is_empty() {
                return String::new();
            }

            // Delimit with one more backtick than the longest run inside.
            let max_run = content
                .chars()
                .fold((0usize, 0usize), |(max, current), c| {
                    if c == '`' {
                        (max.max(current + 1), current + 1)
                    } else {
                        (max, 0)
                    }
                })
                .0;
            let backticks = "`".repeat((max_run + 1).max(1));

            let needs_space = content.starts_with('`')
                || content.ends_with('`')
                || content.starts_with(' ')
                || content.ends_with(' ');

            if needs_space && max_run > 0 {
                format!("{backticks} {content} {backticks}")
            } else {
                format!("{backticks}{content}{backticks}")
            }
        },
    )
}

fn horizontal_rule() -> Rule {
    Rule::for_tag("hr", |_, _, _, options| format!("\n\n{}\n\n", options.hr))
}

fn link() -> Rule {
    Rule::new(
        Filter::predicate(|el, _, _| el.tag == "a" && el.has_attr("href")),
        |el, content, _, _| {
            let href = clean_attribute(el.attr("href"));
            let title = el.attr("title");

            if href.is_empty() && title.is_none() {
                return content.to_string();
            }

            let title_part = title.map(|t| format!(" \"{t}\"")).unwrap_or_default();
            format!("[{content}]({href}{title_part})")
        },
    )
}

fn image() -> Rule {
    Rule::for_tag("img", |el, _, _, _| {
        let alt = clean_attribute(el.attr("alt"));
        let src = clean_attribute(el.attr("src"));
        let title = el.attr("title");

        if src.is_empty() {
            return String::new();
        }

        let title_part = title.map(|t| format!(" \"{t}\"")).unwrap_or_default();
        format!("![{alt}]({src}{title_part})")
    })
}

fn emphasis() -> Rule {
    Rule::for_tags(&["em", "i"], |_, content, _, options| {
        if content.trim().is_empty() {
            return String::new();
        }
        let delimiter = options.em_delimiter;
        format!("{delimiter}{content}{delimiter}")
    })
}

fn strong() -> Rule {
    Rule::for_tags(&["strong", "b"], |_, content, _, options| {
        if content.trim().is_empty() {
            return String::new();
        }
        let delimiter = &options.strong_delimiter;
        format!("{delimiter}{content}{delimiter}")
    })
}

fn strikethrough() -> Rule {
    Rule::for_tags(&["del", "s", "strike"], |_, content, _, _| {
        if content.trim().is_empty() {
            return String::new();
        }
        format!("~~{content}~~")
    })
}

fn task_list_marker() -> Rule {
    Rule::new(
        Filter::predicate(|el, ctx, _| {
            el.tag == "input"
                && el.attr("type") == Some("checkbox")
                && ctx.parent_tag() == Some("li")
        }),
        |el, _, _, _| {
            if el.has_attr("checked") {
                "[x] ".to_string()
            } else {
                "[ ] ".to_string()
            }
        },
    )
}
