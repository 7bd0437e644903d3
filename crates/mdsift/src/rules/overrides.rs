//! Overriding rules, checked before the default ruleset.

use super::{Filter, Rule};
use crate::node::Element;

/// `span`, `font` and `small` contribute nothing themselves; their rendered
/// content passes straight through.
pub fn transparent_containers() -> Rule {
    Rule::for_tags(&["span", "font", "small"], |_, content, _, _| {
        content.to_string()
    })
}

/// Flatten tables to plain pipe rows.
///
/// Every `tr` descendant contributes a row; every `td`/`th` descendant of a
/// row contributes its collapsed text as one cell. Rows shorter than the
/// widest row are right-padded so the grid is rectangular; rowspan/colspan
/// structure is not reconstructed. A table with no usable rows renders as
/// nothing.
pub fn flatten_tables() -> Rule {
    Rule::new(Filter::Tag("table"), |el, _, _, _| {
        let mut rows: Vec<Vec<String>> = Vec::new();

        for tr in el.find_all("tr") {
            let cells: Vec<String> = tr
                .find_any(&["td", "th"])
                .iter()
                .map(|cell| flatten_cell(cell))
                .collect();
            if !cells.is_empty() {
                rows.push(cells);
            }
        }

        if rows.is_empty() {
            return String::new();
        }

        let col_count = rows.iter().map(Vec::len).max().unwrap_or(0);

        let mut md = String::from("\n\n");
        for (idx, row) in rows.iter_mut().enumerate() {
            row.resize(col_count, String::new());
            md.push_str("| ");
            md.push_str(&row.join(" | "));
            md.push_str(" |\n");
            if idx == 0 {
                md.push_str("| ");
                md.push_str(&vec!["---"; col_count].join(" | "));
                md.push_str(" |\n");
            }
        }
        md.push('\n');
        md
    })
}

fn flatten_cell(cell: &Element) -> String {
    let text = cell.text_content();
    let collapsed = text.split_whitespace().collect::<Vec<_>>().join(" ");
    collapsed.replace('|', "\\|")
}
