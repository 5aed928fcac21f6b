//! Batch command - process every PDF matching a glob pattern.

use std::path::PathBuf;

use clap::Args;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::warn;

use stex_core::Engine;

use super::{OutputFormat, open_output, write_csv};

/// Arguments for the batch command.
#[derive(Args)]
pub struct BatchArgs {
    /// Glob pattern for input PDFs (e.g. "statements/*.pdf")
    #[arg(required = true)]
    pattern: String,

    /// Output directory (default: next to each input, `.csv`/`.json`)
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "csv")]
    format: OutputFormat,

    /// Directory with OCR models
    #[arg(short, long)]
    model_dir: Option<PathBuf>,

    /// Stop on the first failing file instead of continuing
    #[arg(long)]
    fail_fast: bool,
}

pub fn run(args: BatchArgs) -> anyhow::Result<()> {
    let inputs: Vec<PathBuf> = glob::glob(&args.pattern)?
        .filter_map(|entry| entry.ok())
        .filter(|p| p.extension().map(|e| e.eq_ignore_ascii_case("pdf")).unwrap_or(false))
        .collect();

    if inputs.is_empty() {
        anyhow::bail!("No PDF files match: {}", args.pattern);
    }

    if let Some(dir) = &args.output_dir {
        std::fs::create_dir_all(dir)?;
    }

    let mut engine = Engine::new();
    if let Some(dir) = &args.model_dir {
        engine = engine.with_ocr_model_dir(dir);
    }

    let bar = ProgressBar::new(inputs.len() as u64);
    bar.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} {msg}")?
            .progress_chars("##-"),
    );

    let mut ok = 0usize;
    let mut failed = 0usize;
    let mut total_transactions = 0usize;

    for input in &inputs {
        bar.set_message(
            input.file_name().map(|n| n.to_string_lossy().into_owned()).unwrap_or_default(),
        );

        match engine.parse_with_report(input) {
            Ok(report) => {
                total_transactions += report.transactions.len();
                let out_path = output_path(input, args.output_dir.as_ref(), args.format);
                let out = open_output(Some(&out_path))?;
                match args.format {
                    OutputFormat::Json => serde_json::to_writer_pretty(out, &report)?,
                    OutputFormat::Csv | OutputFormat::Text => {
                        write_csv(&report.transactions, out)?
                    }
                }
                ok += 1;
            }
            Err(e) => {
                warn!("{}: {}", input.display(), e);
                failed += 1;
                if args.fail_fast {
                    bar.finish_and_clear();
                    return Err(e.into());
                }
            }
        }
        bar.inc(1);
    }

    bar.finish_and_clear();
    println!(
        "{} {ok} file(s), {total_transactions} transaction(s); {failed} failed",
        style("Processed").green().bold(),
    );

    Ok(())
}

fn output_path(input: &PathBuf, output_dir: Option<&PathBuf>, format: OutputFormat) -> PathBuf {
    let extension = match format {
        OutputFormat::Json => "json",
        OutputFormat::Csv | OutputFormat::Text => "csv",
    };
    let mut name = input.file_stem().map(|s| s.to_os_string()).unwrap_or_default();
    name.push(".");
    name.push(extension);
    match output_dir {
        Some(dir) => dir.join(name),
        None => input.with_extension(extension),
    }
}
