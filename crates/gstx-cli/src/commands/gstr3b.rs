//! GSTR-3B command - extract details and tables, combine them per document.

use std::path::PathBuf;

use clap::Args;
use console::style;
use serde::Serialize;

use gstx_core::export::{combined_cells, write_gstr3b_workbook};
use gstx_core::gst::{Gstr3bBatch, Gstr3bDocument, ReturnParser};
use gstx_core::models::report::CombinedRow;

use super::{expand_inputs, format_csv, load_config, print_summary, run_batch, OutputFormat};

/// Arguments for the gstr3b command.
#[derive(Args)]
pub struct Gstr3bArgs {
    /// Input PDF files or glob patterns
    #[arg(required = true)]
    inputs: Vec<String>,

    /// Output file (xlsx defaults to the configured path, json/csv to stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "xlsx")]
    format: OutputFormat,

    /// Continue on error
    #[arg(long)]
    continue_on_error: bool,
}

#[derive(Serialize)]
struct Gstr3bReport<'a> {
    documents: &'a [Gstr3bDocument],
    combined: Vec<CombinedRow>,
}

pub fn run(args: Gstr3bArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let config = load_config(config_path)?;
    let files = expand_inputs(&args.inputs)?;
    let parser = ReturnParser::from_config(&config);

    let outcome = run_batch(&files, args.continue_on_error, |name, bytes| {
        parser.process_gstr3b(name, bytes)
    })?;

    let mut batch = Gstr3bBatch::new();
    for document in &outcome.results {
        for warning in &document.warnings {
            eprintln!("{} {}: {}", style("!").yellow(), document.file_name, warning);
        }
        batch.push(document);
    }

    match args.format {
        OutputFormat::Xlsx => {
            let path = args.output.clone().unwrap_or_else(|| config.export.gstr3b_path.clone());
            write_gstr3b_workbook(&path, &batch, &config.export)?;
            eprintln!("{} Wrote {}", style("✓").green(), path.display());
        }
        OutputFormat::Json => {
            let report = Gstr3bReport {
                documents: &outcome.results,
                combined: batch.combined(),
            };
            super::write_text_output(
                args.output.as_deref(),
                &serde_json::to_string_pretty(&report)?,
            )?;
        }
        OutputFormat::Csv => {
            let combined = batch.combined();
            let csv = format_csv(&CombinedRow::columns(), combined.iter().map(combined_cells))?;
            super::write_text_output(args.output.as_deref(), &csv)?;
        }
    }

    print_summary(&outcome);
    Ok(())
}
