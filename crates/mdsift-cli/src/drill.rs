//! Interactive selector drilling.
//!
//! A small REPL over the parsed document: list the current element's
//! children, drill into one by number, go back up, and accept the current
//! element as the conversion root. All navigation state lives in an explicit
//! session object.

use std::io::{self, BufRead, Write as _};
use std::path::Path;

use anyhow::Result;
use colored::Colorize;
use mdsift::{convert, ConvertOptions};
use scraper::{ElementRef, Html, Selector};

use crate::output::{self, Format};
use crate::Status;

const SKIP_TAGS: &[&str] = &["script", "style", "noscript", "meta", "link"];
const PREVIEW_CHARS: usize = 40;

struct ChildEntry<'a> {
    element: ElementRef<'a>,
    selector: String,
    label: String,
    text_preview: String,
    child_count: usize,
}

struct PathStep {
    selector: String,
    label: String,
}

/// Navigation state: the document, the element stack (body at the bottom),
/// and the selector path accumulated so far.
struct DrillSession<'a> {
    stack: Vec<ElementRef<'a>>,
    path: Vec<PathStep>,
}

impl<'a> DrillSession<'a> {
    fn new(root: ElementRef<'a>) -> Self {
        Self {
            stack: vec![root],
            path: Vec::new(),
        }
    }

    fn current(&self) -> ElementRef<'a> {
        *self.stack.last().expect("stack always holds the root")
    }

    fn drill(&mut self, entry: &ChildEntry<'a>) {
        self.stack.push(entry.element);
        self.path.push(PathStep {
            selector: entry.selector.clone(),
            label: entry.label.clone(),
        });
    }

    fn back(&mut self) -> bool {
        if self.path.is_empty() {
            return false;
        }
        self.stack.pop();
        self.path.pop();
        true
    }

    fn path_display(&self) -> String {
        if self.path.is_empty() {
            "body".to_string()
        } else {
            format!(
                "body > {}",
                self.path
                    .iter()
                    .map(|p| p.label.as_str())
                    .collect::<Vec<_>>()
                    .join(" > ")
            )
        }
    }

    fn accepted_selector(&self) -> String {
        if self.path.is_empty() {
            "body".to_string()
        } else {
            self.path
                .iter()
                .map(|p| p.selector.as_str())
                .collect::<Vec<_>>()
                .join(" ")
        }
    }
}

/// Run the drill REPL and, on accept, convert the chosen element.
pub fn run(
    html: &str,
    mut options: ConvertOptions,
    format: Format,
    output_path: Option<&Path>,
    source_url: Option<&str>,
    status: Status,
) -> Result<()> {
    let document = Html::parse_document(html);
    let body_selector = Selector::parse("body").expect("body selector");
    let root = document
        .select(&body_selector)
        .next()
        .unwrap_or_else(|| document.root_element());

    let mut session = DrillSession::new(root);

    println!("{}", "\n=== Interactive Selector Drilling ===\n".cyan());
    println!("{}", "Navigate through the DOM by selecting child elements.".dimmed());
    println!(
        "{}",
        "Commands: number to drill, [b]ack, [a]ccept, [q]uit\n".dimmed()
    );

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    loop {
        println!(
            "{}{}",
            "\nCurrent: ".white(),
            session.path_display().yellow()
        );

        let children = child_entries(session.current());
        if children.is_empty() {
            println!(
                "{}",
                "  No child elements. Press [b] to go back or [a] to accept.".dimmed()
            );
        } else {
            println!("{}", format!("  {} child element(s):\n", children.len()).dimmed());
            for (i, child) in children.iter().enumerate() {
                let count = if child.child_count > 0 {
                    format!(" ({} children)", child.child_count).blue().to_string()
                } else {
                    String::new()
                };
                let preview = if child.text_preview.is_empty() {
                    String::new()
                } else {
                    format!(" \"{}\"", child.text_preview).dimmed().to_string()
                };
                println!("{} {}{}{}", format!("  [{i}]").green(), child.label, count, preview);
            }
        }

        print!("\n{}", "Select: ".cyan());
        io::stdout().flush()?;

        let Some(line) = lines.next() else {
            return Ok(());
        };
        let command = line?.trim().to_lowercase();

        match command.as_str() {
            "q" | "quit" => {
                println!("{}", "Aborted.".yellow());
                return Ok(());
            }
            "b" | "back" => {
                if session.back() {
                    println!("{}", "  Went back one level.".dimmed());
                } else {
                    println!("{}", "  Already at root.".dimmed());
                }
            }
            "a" | "accept" => {
                let final_selector = session.accepted_selector();
                println!("{}", format!("\nAccepted selector: {final_selector}").green());

                options.selector = "body".to_string();
                let mut result = convert(&session.current().html(), &options);
                result.selector = final_selector;

                status.success(&format!(
                    "Converted: {} chars, {} words",
                    result.stats.characters, result.stats.words
                ));

                let formatted = output::format_result(&result, &options, source_url, format)?;
                if let Some(path) = output::write_output(&formatted, output_path)? {
                    status.success(&format!("Saved to {}", path.display()));
                }
                return Ok(());
            }
            "" => {}
            _ => match command.parse::<usize>() {
                Ok(n) if n < children.len() => {
                    let label = children[n].label.clone();
                    session.drill(&children[n]);
                    println!("{}", format!("  Drilled into: {label}").dimmed());
                }
                _ => {
                    println!(
                        "{}",
                        "  Invalid input. Enter a number, [b]ack, [a]ccept, or [q]uit.".red()
                    );
                }
            },
        }
    }
}

/// Direct element children worth listing, with display labels and the
/// selector fragment each contributes to the accepted path.
fn child_entries(parent: ElementRef) -> Vec<ChildEntry> {
    let mut entries = Vec::new();
    let mut position = 0usize;

    for child in parent.children() {
        let Some(el) = ElementRef::wrap(child) else {
            continue;
        };
        position += 1;

        let tag = el.value().name().to_string();
        if SKIP_TAGS.contains(&tag.as_str()) {
            continue;
        }

        let id = el.value().attr("id").filter(|v| !v.is_empty());
        let first_class = el.value().classes().next();

        let (selector, label) = if let Some(id) = id {
            (format!("#{id}"), format!("#{id}"))
        } else if let Some(class) = first_class {
            (format!(".{class}"), format!(".{class}"))
        } else {
            (
                format!("{tag}:nth-child({position})"),
                format!("{tag}[{position}]"),
            )
        };

        let text: String = el.text().collect();
        let trimmed = text.trim();
        let mut preview: String = trimmed.chars().take(PREVIEW_CHARS).collect();
        if trimmed.chars().count() > PREVIEW_CHARS {
            preview.push_str("...");
        }
        let text_preview = preview.split_whitespace().collect::<Vec<_>>().join(" ");

        let child_count = el.children().filter(|c| ElementRef::wrap(*c).is_some()).count();

        entries.push(ChildEntry {
            element: el,
            selector,
            label,
            text_preview,
            child_count,
        });
    }

    entries
}
