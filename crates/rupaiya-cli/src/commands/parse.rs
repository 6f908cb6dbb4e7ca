//! Parse command - extract transactions from a single statement.

use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use clap::Args;
use console::style;
use tracing::debug;

use rupaiya_core::Category;

use super::{OutputFormat, extract_statement, format_transactions, load_config, spinner};

/// Arguments for the parse command.
#[derive(Args)]
pub struct ParseArgs {
    /// Statement file (PDF, or plain text with --text)
    #[arg(required = true)]
    input: PathBuf,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Treat the input as already-extracted text
    #[arg(long)]
    text: bool,

    /// List lines that looked like transactions but were skipped
    #[arg(long)]
    show_skipped: bool,

    /// Only keep transactions in this category (e.g. "Dining Out")
    #[arg(long, value_parser = parse_category)]
    category: Option<Category>,
}

fn parse_category(label: &str) -> Result<Category, String> {
    Category::from_label(label).ok_or_else(|| {
        let known: Vec<&str> = Category::ALL.iter().map(|c| c.label()).collect();
        format!("unknown category {:?} (expected one of: {})", label, known.join(", "))
    })
}

pub async fn run(args: ParseArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();
    let config = load_config(config_path)?;

    let pb = spinner("Extracting transactions...");
    let outcome = extract_statement(&args.input, args.text, &config).await;
    pb.finish_and_clear();
    let mut outcome = outcome?;

    if let Some(category) = args.category {
        outcome.transactions.retain(|t| t.category == category);
        debug!(
            "{} transactions left in category {}",
            outcome.transactions.len(),
            category
        );
    }

    let output = format_transactions(&outcome.transactions, args.format)?;

    if let Some(output_path) = &args.output {
        fs::write(output_path, &output)?;
        println!(
            "{} {} transactions written to {}",
            style("✓").green(),
            outcome.transactions.len(),
            output_path.display()
        );
    } else {
        println!("{}", output);
    }

    if args.show_skipped {
        eprintln!();
        eprintln!(
            "{} {} lines skipped by the {} extractor",
            style("ℹ").blue(),
            outcome.diagnostics.len(),
            outcome.strategy
        );
        for d in &outcome.diagnostics {
            eprintln!("  line {:>4} {:?}: {}", d.line_number + 1, d.reason, d.line);
        }
    }

    debug!("Total processing time: {:?}", start.elapsed());

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_category_label() {
        assert_eq!(parse_category("dining out"), Ok(Category::DiningOut));
        assert_eq!(parse_category("Rent/Housing"), Ok(Category::RentHousing));
        assert!(parse_category("Pets").unwrap_err().contains("Dining Out"));
    }
}
