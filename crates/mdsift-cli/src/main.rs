//! mdsift command line interface.

mod drill;
mod fetch;
mod output;

use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context as _, Result};
use chrono::Utc;
use clap::{CommandFactory, Parser};
use colored::Colorize;
use futures::StreamExt;
use mdsift::{convert, domain_from_url, ConvertOptions};
use tracing_subscriber::EnvFilter;

use crate::output::Format;

const EXAMPLES: &str = "\
Examples:
  # Convert a webpage
  mdsift https://example.com

  # Extract a specific section and save to file
  mdsift https://docs.python.org/3/tutorial/ -s \"#content\" -o tutorial.md

  # Convert a local HTML file
  mdsift page.html --format json

  # Pipe HTML from stdin
  curl -s https://example.com | mdsift -

  # Batch process multiple URLs
  mdsift --batch urls.txt -o ./output/

  # Interactive selector drilling
  mdsift https://example.com --interactive
";

/// HTML to Markdown converter optimized for LLM/RAG workflows.
#[derive(Debug, Parser)]
#[command(name = "mdsift", version, after_help = EXAMPLES)]
struct Cli {
    /// URL, file path, or - for stdin
    input: Option<String>,

    /// Output file or directory (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// CSS selector to extract
    #[arg(short, long, default_value = "body")]
    selector: String,

    /// Output format
    #[arg(short, long, value_enum, default_value = "md")]
    format: Format,

    /// Disable noise removal
    #[arg(long)]
    no_clean: bool,

    /// Disable table alignment
    #[arg(long)]
    no_tables: bool,

    /// Strip hyperlinks
    #[arg(long)]
    no_links: bool,

    /// Remove images/video
    #[arg(long)]
    strip_media: bool,

    /// Include metadata extraction
    #[arg(long)]
    meta: bool,

    /// Process URLs from file (one per line)
    #[arg(long, value_name = "FILE")]
    batch: Option<PathBuf>,

    /// Batch concurrency limit
    #[arg(long, default_value_t = 3)]
    concurrency: usize,

    /// Interactive selector drilling mode
    #[arg(short, long)]
    interactive: bool,

    /// Suppress progress output
    #[arg(short, long)]
    quiet: bool,
}

/// Stderr progress reporting, silenced by `--quiet`.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Status {
    quiet: bool,
}

impl Status {
    pub(crate) fn info(&self, message: &str) {
        if !self.quiet {
            eprintln!("{} {message}", "ℹ".blue());
        }
    }

    pub(crate) fn success(&self, message: &str) {
        if !self.quiet {
            eprintln!("{} {message}", "✓".green());
        }
    }

    pub(crate) fn warn(&self, message: &str) {
        if !self.quiet {
            eprintln!("{} {message}", "⚠".yellow());
        }
    }

    pub(crate) fn error(&self, message: &str) {
        if !self.quiet {
            eprintln!("{} {message}", "✗".red());
        }
    }
}

struct PageInput {
    html: String,
    base_url: Option<String>,
    source_url: Option<String>,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let status = Status { quiet: cli.quiet };

    if let Err(err) = run(cli, status).await {
        status.error(&format!("{err:#}"));
        std::process::exit(1);
    }
}

async fn run(cli: Cli, status: Status) -> Result<()> {
    if let Some(batch) = cli.batch.clone() {
        return process_batch(&cli, &batch, status).await;
    }

    let Some(input) = cli.input.clone() else {
        Cli::command().print_help()?;
        return Ok(());
    };

    if cli.interactive {
        let page = read_input(&input, status).await?;
        let options = convert_options(&cli, page.base_url.clone());
        return drill::run(
            &page.html,
            options,
            cli.format,
            cli.output.as_deref(),
            page.source_url.as_deref(),
            status,
        );
    }

    process_single(&cli, &input, status).await
}

fn convert_options(cli: &Cli, base_url: Option<String>) -> ConvertOptions {
    ConvertOptions {
        selector: cli.selector.clone(),
        base_url,
        align_tables: !cli.no_tables,
        clean_noise: !cli.no_clean,
        strip_media: cli.strip_media,
        preserve_links: !cli.no_links,
        extract_meta: cli.meta,
    }
}

async fn read_input(source: &str, status: Status) -> Result<PageInput> {
    if source == "-" {
        let mut html = String::new();
        std::io::stdin()
            .read_to_string(&mut html)
            .context("reading stdin")?;
        return Ok(PageInput {
            html,
            base_url: None,
            source_url: None,
        });
    }

    if source.starts_with("http://") || source.starts_with("https://") {
        status.info(&format!("Fetching {source}..."));
        let fetcher = fetch::Fetcher::new(fetch::FetchOptions::default())?;
        let page = fetcher.fetch(source).await?;
        status.success(&format!("Fetched {:.1} KB", page.html.len() as f64 / 1024.0));
        return Ok(PageInput {
            html: page.html,
            base_url: Some(page.final_url),
            source_url: Some(source.to_string()),
        });
    }

    let path = Path::new(source);
    if !path.exists() {
        bail!("File not found: {source}");
    }
    status.info(&format!("Reading {source}..."));
    let html = std::fs::read_to_string(path).with_context(|| format!("reading {source}"))?;
    Ok(PageInput {
        html,
        base_url: None,
        source_url: None,
    })
}

async fn process_single(cli: &Cli, source: &str, status: Status) -> Result<()> {
    let page = read_input(source, status).await?;
    let options = convert_options(cli, page.base_url.clone());

    let result = convert(&page.html, &options);
    status.success(&format!(
        "Converted: {} chars, {} words",
        result.stats.characters, result.stats.words
    ));

    let formatted = output::format_result(&result, &options, page.source_url.as_deref(), cli.format)?;
    if let Some(path) = output::write_output(&formatted, cli.output.as_deref())? {
        status.success(&format!("Saved to {}", path.display()));
    }
    Ok(())
}

/// Batch-file lines worth fetching: non-empty, not comments, http(s) only.
fn parse_batch_list(content: &str) -> Vec<String> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#') && line.starts_with("http"))
        .map(String::from)
        .collect()
}

async fn process_batch(cli: &Cli, batch_file: &Path, status: Status) -> Result<()> {
    let content = std::fs::read_to_string(batch_file)
        .with_context(|| format!("Batch file not found: {}", batch_file.display()))?;

    let urls = parse_batch_list(&content);
    if urls.is_empty() {
        bail!("No valid URLs found in batch file");
    }

    status.info(&format!(
        "Processing {} URLs with concurrency {}...",
        urls.len(),
        cli.concurrency
    ));

    let output_dir = cli
        .output
        .clone()
        .unwrap_or_else(|| PathBuf::from("./mdsift-output"));

    let fetcher = fetch::Fetcher::new(fetch::FetchOptions::default())?;
    let mut pages = std::pin::pin!(fetcher.fetch_many(&urls, cli.concurrency));

    let total = urls.len();
    let mut index = 0usize;
    let mut succeeded = 0usize;

    while let Some((url, outcome)) = pages.next().await {
        index += 1;
        let page = match outcome {
            Ok(page) => {
                status.success(&format!("[{index}/{total}] Fetched: {url}"));
                page
            }
            Err(err) => {
                status.error(&format!("[{index}/{total}] Failed: {url} - {err}"));
                continue;
            }
        };

        let options = convert_options(cli, Some(page.final_url.clone()));
        let result = convert(&page.html, &options);

        match output::format_result(&result, &options, Some(&url), cli.format) {
            Ok(formatted) => {
                let filename = format!("{}_{}", domain_from_url(&url), Utc::now().timestamp_millis());
                let path =
                    output::write_batch_file(&output_dir, &filename, &formatted, cli.format)?;
                status.success(&format!("Saved to {}", path.display()));
                succeeded += 1;
            }
            Err(err) => {
                status.warn(&format!("Conversion failed for {url}: {err}"));
            }
        }
    }

    status.info(&format!("Batch complete: {succeeded}/{total} URLs converted"));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_batch_list_filters() {
        let content = "https://a.test/page\n# comment\n\nnot-a-url\nhttp://b.test\n  https://c.test  \n";
        assert_eq!(
            parse_batch_list(content),
            vec!["https://a.test/page", "http://b.test", "https://c.test"]
        );
    }

    #[test]
    fn test_cli_defaults() {
        let cli = Cli::parse_from(["mdsift", "page.html"]);
        assert_eq!(cli.selector, "body");
        assert_eq!(cli.format, Format::Md);
        assert_eq!(cli.concurrency, 3);
        assert!(!cli.no_clean);
        assert!(!cli.strip_media);
    }

    #[test]
    fn test_cli_flag_polarity() {
        let cli = Cli::parse_from(["mdsift", "page.html", "--no-clean", "--no-links", "--meta"]);
        let options = convert_options(&cli, None);
        assert!(!options.clean_noise);
        assert!(!options.preserve_links);
        assert!(options.align_tables);
        assert!(options.extract_meta);
    }
}
