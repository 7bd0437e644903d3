//! Pipe-table alignment.
//!
//! A single line scan buffers contiguous `|`-led lines into a block; any
//! other line flushes the block through [`format_table`] and passes through
//! unchanged. Reformatting pads every cell to its column's width so tables
//! read cleanly as text.

use once_cell::sync::Lazy;
use regex::Regex;

/// A separator row is one whose first cell is only colons, dashes and
/// whitespace. Alignment colons are normalized away on output.
static SEPARATOR_ROW: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[:\-\s]+$").expect("separator row regex"));

/// Minimum column width, so a separator is never shorter than `---`.
const MIN_COLUMN_WIDTH: usize = 3;

/// Rewrite every pipe-table block in `markdown` with column-aligned cells.
/// Non-table lines are untouched. Idempotent.
pub fn align_markdown_tables(markdown: &str) -> String {
    let mut result: Vec<String> = Vec::new();
    let mut buffer: Vec<String> = Vec::new();

    for line in markdown.split('\n') {
        if line.trim_start().starts_with('|') {
            buffer.push(line.trim().to_string());
        } else {
            if !buffer.is_empty() {
                result.push(format_table(&buffer));
                buffer.clear();
            }
            result.push(line.to_string());
        }
    }

    if !buffer.is_empty() {
        result.push(format_table(&buffer));
    }

    result.join("\n")
}

/// Reformat one block of raw pipe lines.
fn format_table(rows: &[String]) -> String {
    let matrix: Vec<Vec<String>> = rows.iter().map(|row| split_cells(row)).collect();

    if matrix.is_empty() {
        return rows.join("\n");
    }

    // Column count comes from the first row; width is the longest cell in
    // that column across all rows, floored at the separator width.
    let col_widths: Vec<usize> = (0..matrix[0].len())
        .map(|col| {
            matrix
                .iter()
                .map(|row| row.get(col).map_or(0, |cell| cell.chars().count()))
                .max()
                .unwrap_or(0)
                .max(MIN_COLUMN_WIDTH)
        })
        .collect();

    matrix
        .iter()
        .map(|row| {
            let is_separator = row
                .first()
                .is_some_and(|cell| SEPARATOR_ROW.is_match(cell));
            let cells: Vec<String> = row
                .iter()
                .enumerate()
                .map(|(i, cell)| match col_widths.get(i) {
                    Some(&width) if is_separator => "-".repeat(width),
                    Some(&width) => pad_cell(cell, width),
                    None => cell.clone(),
                })
                .collect();
            format!("| {} |", cells.join(" | "))
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Split a raw pipe line into trimmed cells, dropping the empty fragments
/// produced by the leading and trailing pipes.
fn split_cells(row: &str) -> Vec<String> {
    let parts: Vec<&str> = row.split('|').map(str::trim).collect();
    if parts.len() <= 2 {
        return Vec::new();
    }
    parts[1..parts.len() - 1]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

fn pad_cell(cell: &str, width: usize) -> String {
    let len = cell.chars().count();
    if len >= width {
        cell.to_string()
    } else {
        format!("{}{}", cell, " ".repeat(width - len))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aligns_simple_table() {
        let md = "| A | Longer |\n| --- | --- |\n| 1 | 2 |";
        assert_eq!(
            align_markdown_tables(md),
            "| A   | Longer |\n| --- | ------ |\n| 1   | 2      |"
        );
    }

    #[test]
    fn test_minimum_column_width() {
        let md = "| A |\n| - |\n| 1 |";
        assert_eq!(align_markdown_tables(md), "| A   |\n| --- |\n| 1   |");
    }

    #[test]
    fn test_alignment_colons_normalized() {
        let md = "| A | B |\n| :-- | --: |\n| 1 | 2 |";
        let aligned = align_markdown_tables(md);
        assert!(aligned.contains("| --- | --- |"));
        assert!(!aligned.contains(':'));
    }

    #[test]
    fn test_preserves_non_table_content() {
        let md = "# Heading\n\nSome text\n\n| A |\n| --- |\n| 1 |";
        let aligned = align_markdown_tables(md);
        assert!(aligned.contains("# Heading"));
        assert!(aligned.contains("Some text"));
    }

    #[test]
    fn test_handles_multiple_tables() {
        let md = "| A |\n| --- |\n| 1 |\n\nText\n\n| B |\n| --- |\n| 2 |";
        let aligned = align_markdown_tables(md);
        assert!(aligned.contains("| A   |"));
        assert!(aligned.contains("| B   |"));
        assert!(aligned.contains("Text"));
    }

    #[test]
    fn test_flushes_trailing_block() {
        let md = "Intro\n| A | B |";
        assert_eq!(align_markdown_tables(md), "Intro\n| A   | B   |");
    }

    #[test]
    fn test_idempotent() {
        let md = "before\n| Name | Age |\n| --- | --- |\n| John Longname | 3 |\nafter";
        let once = align_markdown_tables(md);
        let twice = align_markdown_tables(&once);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_indented_table_lines_are_trimmed_into_block() {
        let md = "  | A | B |\n  | --- | --- |";
        let aligned = align_markdown_tables(md);
        assert!(aligned.starts_with("| A   | B   |"));
    }
}
