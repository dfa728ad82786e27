//! Subcommands and the batch plumbing they share.

pub mod config;
pub mod gstr1;
pub mod gstr3b;

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use clap::ValueEnum;
use console::style;
use glob::glob;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, error, warn};

use gstx_core::export::Cell;
use gstx_core::gst::combine::unique_name;
use gstx_core::models::config::GstxConfig;

/// Output format of an extraction run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Multi-sheet Excel workbook
    Xlsx,
    /// JSON report
    Json,
    /// CSV of the primary sheet
    Csv,
}

/// Load the configuration from `-c`, else the default file, else defaults.
pub fn load_config(config_path: Option<&str>) -> anyhow::Result<GstxConfig> {
    if let Some(path) = config_path {
        return Ok(GstxConfig::from_file(Path::new(path))?);
    }

    let default_path = config::default_config_path();
    if default_path.exists() {
        debug!("Using config {}", default_path.display());
        Ok(GstxConfig::from_file(&default_path)?)
    } else {
        Ok(GstxConfig::default())
    }
}

/// Expand paths and glob patterns into PDF files, keeping input order.
pub fn expand_inputs(inputs: &[String]) -> anyhow::Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for input in inputs {
        for path in glob(input)?.filter_map(|r| r.ok()) {
            let is_pdf = path
                .extension()
                .and_then(|e| e.to_str())
                .is_some_and(|e| e.eq_ignore_ascii_case("pdf"));
            if is_pdf && !files.contains(&path) {
                files.push(path);
            }
        }
    }

    if files.is_empty() {
        anyhow::bail!("No PDF files found for: {}", inputs.join(", "));
    }

    Ok(files)
}

/// Name a document is keyed by in every report.
pub fn document_name(path: &Path) -> String {
    path.file_name()
        .and_then(|s| s.to_str())
        .map(str::to_string)
        .unwrap_or_else(|| path.display().to_string())
}

/// A document that could not be processed.
pub struct Failure {
    pub path: PathBuf,
    pub error: String,
}

/// Successful results and failures of a batch run.
pub struct BatchOutcome<T> {
    pub results: Vec<T>,
    pub failures: Vec<Failure>,
    pub elapsed: Duration,
}

/// Run `process` over each file in order with a progress bar.
///
/// Each file is handed its document name, made unique within the run so
/// two `april.pdf` from different folders stay two documents. Without
/// `continue_on_error` the first failure aborts the run.
pub fn run_batch<T, F>(
    files: &[PathBuf],
    continue_on_error: bool,
    mut process: F,
) -> anyhow::Result<BatchOutcome<T>>
where
    F: FnMut(&str, &[u8]) -> gstx_core::Result<T>,
{
    let start = Instant::now();

    eprintln!(
        "{} Found {} files to process",
        style("ℹ").blue(),
        files.len()
    );

    let progress = ProgressBar::new(files.len() as u64);
    progress.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files")?
            .progress_chars("=>-"),
    );

    let mut results = Vec::with_capacity(files.len());
    let mut failures = Vec::new();
    let mut names: Vec<String> = Vec::with_capacity(files.len());

    for path in files {
        let name = unique_name(&document_name(path), |n| names.iter().any(|taken| taken == n));
        names.push(name.clone());
        let outcome = fs::read(path)
            .map_err(gstx_core::GstxError::from)
            .and_then(|bytes| process(&name, &bytes));

        match outcome {
            Ok(result) => results.push(result),
            Err(e) => {
                let error_msg = e.to_string();
                if continue_on_error {
                    warn!("Failed to process {}: {}", path.display(), error_msg);
                    failures.push(Failure {
                        path: path.clone(),
                        error: error_msg,
                    });
                } else {
                    progress.abandon();
                    error!("Failed to process {}: {}", path.display(), error_msg);
                    anyhow::bail!("Processing {} failed: {}", path.display(), error_msg);
                }
            }
        }

        progress.inc(1);
    }

    progress.finish_with_message("Complete");

    Ok(BatchOutcome {
        results,
        failures,
        elapsed: start.elapsed(),
    })
}

/// Print the closing summary of a batch run.
pub fn print_summary<T>(outcome: &BatchOutcome<T>) {
    eprintln!();
    eprintln!(
        "{} Processed {} files in {:?}",
        style("✓").green(),
        outcome.results.len() + outcome.failures.len(),
        outcome.elapsed
    );
    eprintln!(
        "   {} successful, {} failed",
        style(outcome.results.len()).green(),
        style(outcome.failures.len()).red()
    );

    if !outcome.failures.is_empty() {
        eprintln!();
        eprintln!("{}", style("Failed files:").red());
        for failure in &outcome.failures {
            eprintln!("  - {}: {}", failure.path.display(), failure.error);
        }
    }
}

/// Render rows of cells as CSV under `headers`.
pub fn format_csv<'a, I>(headers: &[&str], rows: I) -> anyhow::Result<String>
where
    I: IntoIterator<Item = Vec<Cell<'a>>>,
{
    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record(headers)?;
    for cells in rows {
        wtr.write_record(cells.iter().map(ToString::to_string))?;
    }
    let data = String::from_utf8(wtr.into_inner()?)?;
    Ok(data)
}

/// Write text output to a file, or stdout when no path is given.
pub fn write_text_output(output: Option<&Path>, content: &str) -> anyhow::Result<()> {
    match output {
        Some(path) => {
            fs::write(path, content)?;
            eprintln!("{} Wrote {}", style("✓").green(), path.display());
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(content.as_bytes())?;
            if !content.ends_with('\n') {
                writeln!(stdout)?;
            }
        }
    }
    Ok(())
}
