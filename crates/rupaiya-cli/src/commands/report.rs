//! Report command - spending summary for a statement.

use std::fs;
use std::path::PathBuf;

use chrono::Local;
use clap::Args;
use console::style;
use tracing::debug;

use rupaiya_core::analysis::{SpendingAnalysis, render_report};
use rupaiya_core::sample::{SAMPLE_SIZE, sample_transactions};

use super::{extract_statement, load_config, spinner};

/// Arguments for the report command.
#[derive(Args)]
pub struct ReportArgs {
    /// Statement file (PDF, or plain text with --text)
    #[arg(required_unless_present = "sample")]
    input: Option<PathBuf>,

    /// Report on a built-in sample ledger instead of a statement
    #[arg(long, conflicts_with = "input")]
    sample: bool,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Treat the input as already-extracted text
    #[arg(long)]
    text: bool,

    /// Emit the aggregates as JSON instead of the text report
    #[arg(long)]
    json: bool,
}

pub async fn run(args: ReportArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let config = load_config(config_path)?;

    let transactions = match &args.input {
        Some(input) if !args.sample => {
            let pb = spinner("Analyzing statement...");
            let outcome = extract_statement(input, args.text, &config).await;
            pb.finish_and_clear();
            outcome?.transactions
        }
        _ => {
            let today = Local::now().date_naive();
            debug!("Using {} sample transactions ending {}", SAMPLE_SIZE, today);
            sample_transactions(today, SAMPLE_SIZE, &config.categories)
        }
    };

    let analysis = SpendingAnalysis::new(&transactions, &config.categories);
    let output = if args.json {
        serde_json::to_string_pretty(&analysis)?
    } else {
        render_report(&analysis)
    };

    if let Some(output_path) = &args.output {
        fs::write(output_path, &output)?;
        println!(
            "{} Report written to {}",
            style("✓").green(),
            output_path.display()
        );
    } else {
        println!("{}", output);
    }

    Ok(())
}
