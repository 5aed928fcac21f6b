//! CLI subcommands.

pub mod batch;
pub mod process;

use std::io::Write;
use std::path::PathBuf;

use stex_core::Transaction;

/// Output format shared by the subcommands.
#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON array of transactions (or the full report with --report)
    Json,
    /// CSV: Date, Description, Amount, Balance
    Csv,
    /// Human-readable summary
    Text,
}

/// Write transactions as CSV: ISO dates, two fractional digits, no
/// currency symbols, empty cell for a missing balance.
pub fn write_csv(transactions: &[Transaction], writer: impl Write) -> anyhow::Result<()> {
    let mut csv = csv::Writer::from_writer(writer);
    csv.write_record(["Date", "Description", "Amount", "Balance"])?;
    for t in transactions {
        csv.write_record([
            t.date.to_string(),
            t.description.clone(),
            format!("{:.2}", t.amount),
            t.balance.map(|b| format!("{b:.2}")).unwrap_or_default(),
        ])?;
    }
    csv.flush()?;
    Ok(())
}

/// Resolve the output sink: a file when given, stdout otherwise.
pub fn open_output(path: Option<&PathBuf>) -> anyhow::Result<Box<dyn Write>> {
    match path {
        Some(path) => Ok(Box::new(std::fs::File::create(path)?)),
        None => Ok(Box::new(std::io::stdout())),
    }
}
