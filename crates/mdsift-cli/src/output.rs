//! Result formatting and output writing.

use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context as _, Result};
use chrono::Utc;
use mdsift::{sanitize_filename, Conversion, ConvertOptions};
use serde::Serialize;

/// Output format selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Format {
    Md,
    Json,
}

impl Format {
    pub fn extension(self) -> &'static str {
        match self {
            Format::Md => ".md",
            Format::Json => ".json",
        }
    }
}

/// JSON envelope around a conversion: the result itself, provenance, and an
/// echo of the options that produced it.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Report<'a> {
    #[serde(flatten)]
    result: &'a Conversion,
    source_url: Option<&'a str>,
    timestamp: String,
    options: &'a ConvertOptions,
}

/// Render a conversion in the requested output format.
pub fn format_result(
    result: &Conversion,
    options: &ConvertOptions,
    source_url: Option<&str>,
    format: Format,
) -> Result<String> {
    match format {
        Format::Md => Ok(result.markdown.clone()),
        Format::Json => {
            let report = Report {
                result,
                source_url,
                timestamp: Utc::now().to_rfc3339(),
                options,
            };
            serde_json::to_string_pretty(&report).context("serializing conversion report")
        }
    }
}

/// Write to the given file, or to stdout when no path is set. Returns the
/// path written, if any.
pub fn write_output(content: &str, output: Option<&Path>) -> Result<Option<PathBuf>> {
    match output {
        None => {
            std::io::stdout()
                .write_all(content.as_bytes())
                .context("writing to stdout")?;
            Ok(None)
        }
        Some(path) => {
            std::fs::write(path, content)
                .with_context(|| format!("writing {}", path.display()))?;
            Ok(Some(path.to_path_buf()))
        }
    }
}

/// Write one batch result into the output directory, creating it as needed.
pub fn write_batch_file(
    dir: &Path,
    filename: &str,
    content: &str,
    format: Format,
) -> Result<PathBuf> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("creating output directory {}", dir.display()))?;
    let path = dir.join(format!("{}{}", sanitize_filename(filename), format.extension()));
    std::fs::write(&path, content).with_context(|| format!("writing {}", path.display()))?;
    Ok(path)
}
