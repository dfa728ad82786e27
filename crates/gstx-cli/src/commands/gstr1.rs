//! GSTR-1 command - summarize total liability across returns.

use std::path::PathBuf;

use clap::Args;
use console::style;
use serde::Serialize;

use gstx_core::export::{gstr1_cells, write_gstr1_workbook};
use gstx_core::gst::filter::filter_choices;
use gstx_core::gst::{Gstr1Filter, ReturnParser, Selection};
use gstx_core::models::report::Gstr1Row;

use super::{expand_inputs, format_csv, load_config, print_summary, run_batch, OutputFormat};

/// Arguments for the gstr1 command.
#[derive(Args)]
pub struct Gstr1Args {
    /// Input PDF files or glob patterns
    #[arg(required = true)]
    inputs: Vec<String>,

    /// Output file (xlsx defaults to the configured path, json/csv to stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "xlsx")]
    format: OutputFormat,

    /// Keep only these GSTINs
    #[arg(long)]
    gstin: Vec<String>,

    /// Keep only these states
    #[arg(long)]
    state: Vec<String>,

    /// Keep only these legal names
    #[arg(long)]
    legal_name: Vec<String>,

    /// Keep only these tax periods
    #[arg(long)]
    month: Vec<String>,

    /// Keep only these financial years
    #[arg(long)]
    year: Vec<String>,

    /// List the values each filter can take instead of writing output
    #[arg(long)]
    list_values: bool,

    /// Continue on error
    #[arg(long)]
    continue_on_error: bool,
}

impl Gstr1Args {
    fn filter(&self) -> Gstr1Filter {
        Gstr1Filter::new()
            .with_gstin(Selection::only(self.gstin.iter().cloned()))
            .with_state(Selection::only(self.state.iter().cloned()))
            .with_legal_name(Selection::only(self.legal_name.iter().cloned()))
            .with_month(Selection::only(self.month.iter().cloned()))
            .with_financial_year(Selection::only(self.year.iter().cloned()))
    }
}

#[derive(Serialize)]
struct Gstr1Report<'a> {
    all: &'a [Gstr1Row],
    filtered: &'a [Gstr1Row],
}

pub fn run(args: Gstr1Args, config_path: Option<&str>) -> anyhow::Result<()> {
    let config = load_config(config_path)?;
    let files = expand_inputs(&args.inputs)?;
    let parser = ReturnParser::from_config(&config);

    let outcome = run_batch(&files, args.continue_on_error, |name, bytes| {
        parser.process_gstr1(name, bytes)
    })?;

    for row in &outcome.results {
        for warning in &row.warnings {
            eprintln!("{} {}: {}", style("!").yellow(), row.file_name, warning);
        }
    }

    if args.list_values {
        super::write_text_output(None, &format_choices(&outcome.results))?;
        print_summary(&outcome);
        return Ok(());
    }

    let filter = args.filter();
    let filtered = filter.apply(&outcome.results);
    if !filter.is_unrestricted() {
        eprintln!(
            "{} {} of {} rows match the filters",
            style("ℹ").blue(),
            filtered.len(),
            outcome.results.len()
        );
    }

    match args.format {
        OutputFormat::Xlsx => {
            let path = args.output.clone().unwrap_or_else(|| config.export.gstr1_path.clone());
            write_gstr1_workbook(&path, &outcome.results, &filtered, &config.export)?;
            eprintln!("{} Wrote {}", style("✓").green(), path.display());
        }
        OutputFormat::Json => {
            let report = Gstr1Report {
                all: &outcome.results,
                filtered: &filtered,
            };
            super::write_text_output(
                args.output.as_deref(),
                &serde_json::to_string_pretty(&report)?,
            )?;
        }
        OutputFormat::Csv => {
            let csv = format_csv(&Gstr1Row::COLUMNS, filtered.iter().map(gstr1_cells))?;
            super::write_text_output(args.output.as_deref(), &csv)?;
        }
    }

    print_summary(&outcome);
    Ok(())
}

/// One `--<filter>` heading per column, its values indented below.
fn format_choices(rows: &[Gstr1Row]) -> String {
    let mut out = String::new();
    for (name, values) in filter_choices(rows) {
        out.push_str(&format!("--{}\n", name));
        for value in values {
            out.push_str(&format!("  {}\n", value));
        }
    }
    out
}
