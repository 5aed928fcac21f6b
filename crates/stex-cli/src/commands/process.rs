//! Process command - extract transactions from a single statement PDF.

use std::path::PathBuf;
use std::time::Instant;

use clap::Args;
use console::style;
use tracing::info;

use stex_core::Engine;

use super::{OutputFormat, open_output, write_csv};

/// Arguments for the process command.
#[derive(Args)]
pub struct ProcessArgs {
    /// Input statement PDF
    #[arg(required = true)]
    input: PathBuf,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "csv")]
    format: OutputFormat,

    /// Include bank, strategy, and diagnostics in JSON output
    #[arg(long)]
    report: bool,

    /// Directory with OCR models (det.onnx, latin_rec.onnx, latin_dict.txt)
    #[arg(short, long)]
    model_dir: Option<PathBuf>,
}

pub fn run(args: ProcessArgs) -> anyhow::Result<()> {
    let start = Instant::now();

    if !args.input.exists() {
        anyhow::bail!("Input file not found: {}", args.input.display());
    }

    info!("Processing file: {}", args.input.display());

    let mut engine = Engine::new();
    if let Some(dir) = &args.model_dir {
        engine = engine.with_ocr_model_dir(dir);
    }

    let report = engine.parse_with_report(&args.input)?;
    let out = open_output(args.output.as_ref())?;

    match args.format {
        OutputFormat::Json if args.report => {
            serde_json::to_writer_pretty(out, &report)?;
        }
        OutputFormat::Json => {
            serde_json::to_writer_pretty(out, &report.transactions)?;
        }
        OutputFormat::Csv => {
            write_csv(&report.transactions, out)?;
        }
        OutputFormat::Text => {
            print_summary(&report, start.elapsed().as_millis());
        }
    }

    Ok(())
}

fn print_summary(report: &stex_core::ParseReport, elapsed_ms: u128) {
    println!(
        "{} {} transaction(s) from {} via {} in {}ms",
        style("Extracted").green().bold(),
        report.transactions.len(),
        report.bank,
        report.strategy_used,
        elapsed_ms,
    );
    for t in &report.transactions {
        match t.balance {
            Some(balance) => {
                println!("  {}  {:>12}  {:>12}  {}", t.date, t.amount, balance, t.description)
            }
            None => println!("  {}  {:>12}  {:>13}  {}", t.date, t.amount, "", t.description),
        }
    }
    if !report.issues.is_empty() {
        println!("{}", style("Issues:").yellow().bold());
        for issue in &report.issues {
            println!("  - {issue}");
        }
    }
}
