//! Subcommands and the helpers they share.

pub mod batch;
pub mod config;
pub mod parse;
pub mod report;

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, info};

use rupaiya_core::models::config::RupaiyaConfig;
use rupaiya_core::models::transaction::Transaction;
use rupaiya_core::pdf::{PDF_MIME, PdfExtractor, PdfProcessor, validate_mime};
use rupaiya_core::statement::rules::format_inr;
use rupaiya_core::{PdfError, PipelineOutcome, RupaiyaError, StatementPipeline};

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output
    Json,
    /// CSV output
    Csv,
    /// Plain text table
    Text,
}

impl OutputFormat {
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Json => "json",
            OutputFormat::Csv => "csv",
            OutputFormat::Text => "txt",
        }
    }
}

/// Default configuration file location.
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("rupaiya")
        .join("config.json")
}

/// Explicit `--config` file, else the default file if present, else defaults.
pub fn load_config(config_path: Option<&str>) -> anyhow::Result<RupaiyaConfig> {
    if let Some(path) = config_path {
        return Ok(RupaiyaConfig::from_file(Path::new(path))?);
    }

    let default_path = default_config_path();
    if default_path.exists() {
        debug!("Loading config from {}", default_path.display());
        Ok(RupaiyaConfig::from_file(&default_path)?)
    } else {
        Ok(RupaiyaConfig::default())
    }
}

/// MIME type declared by the file extension. Nothing else is inspected.
pub fn mime_for(path: &Path) -> &'static str {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    match extension.as_str() {
        "pdf" => PDF_MIME,
        "txt" | "text" => "text/plain",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        _ => "application/octet-stream",
    }
}

/// Run the pipeline over a statement file.
///
/// Plain-text input (`--text` or a `.txt` file) skips the PDF layer.
pub async fn extract_statement(
    path: &Path,
    force_text: bool,
    config: &RupaiyaConfig,
) -> anyhow::Result<PipelineOutcome> {
    if !path.exists() {
        anyhow::bail!("Input file not found: {}", path.display());
    }

    let mime = mime_for(path);
    info!("Processing {} ({})", path.display(), mime);

    if force_text || mime == "text/plain" {
        let text = fs::read_to_string(path)?;
        let pipeline = StatementPipeline::new(config);
        return Ok(pipeline.run_text(&text)?);
    }

    validate_mime(mime)?;
    let data = fs::read(path)?;
    let config = config.clone();

    // lopdf and pdf-extract are blocking
    let outcome = tokio::task::spawn_blocking(move || process_pdf(&data, &config)).await??;
    Ok(outcome)
}

fn process_pdf(data: &[u8], config: &RupaiyaConfig) -> anyhow::Result<PipelineOutcome> {
    let mut extractor = PdfExtractor::with_config(&config.pdf);
    extractor.load(data).map_err(RupaiyaError::from)?;
    debug!("PDF has {} pages", extractor.page_count());

    let pages = extractor.text_layer().map_err(RupaiyaError::from)?;
    let pipeline = StatementPipeline::new(config);
    Ok(pipeline.run_pages(&pages)?)
}

/// User-facing message for errors whose Display is too technical.
pub fn user_hint(error: &anyhow::Error) -> Option<&'static str> {
    let error = error.downcast_ref::<RupaiyaError>()?;
    match error {
        e if e.is_unsupported_format() => Some(
            "No transactions could be extracted from this statement. \
             Please try a different statement, export it as text and use --text, \
             or explore the report with sample data: rupaiya report --sample",
        ),
        RupaiyaError::Pdf(PdfError::NoTextLayer { .. }) => Some(
            "This PDF has no text layer (scanned statement). \
             Download a text PDF from your bank, or try rupaiya report --sample.",
        ),
        RupaiyaError::Pdf(_) => Some(
            "Failed to read the PDF. Please check that the file is a valid, unencrypted PDF.",
        ),
        RupaiyaError::InvalidInputFormat { .. } => {
            Some("Only PDF statements are supported. Use --text for plain-text statements.")
        }
        _ => None,
    }
}

pub fn spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.green} [{elapsed_precise}] {msg}") {
        pb.set_style(style);
    }
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

pub fn format_transactions(
    transactions: &[Transaction],
    format: OutputFormat,
) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(transactions)?),
        OutputFormat::Csv => format_csv(transactions),
        OutputFormat::Text => Ok(format_text(transactions)),
    }
}

fn format_csv(transactions: &[Transaction]) -> anyhow::Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);

    wtr.write_record([
        "id",
        "date",
        "description",
        "amount",
        "direction",
        "merchant",
        "category",
    ])?;

    for t in transactions {
        let date = t.date_string();
        let amount = t.amount.to_string();
        wtr.write_record([
            t.id.as_str(),
            date.as_str(),
            t.description.as_str(),
            amount.as_str(),
            if t.is_debit() { "debit" } else { "credit" },
            t.merchant.as_str(),
            t.category.label(),
        ])?;
    }

    let data = String::from_utf8(wtr.into_inner()?)?;
    Ok(data)
}

fn format_text(transactions: &[Transaction]) -> String {
    let mut output = String::new();

    for t in transactions {
        output.push_str(&format!(
            "{}  {:>15}  {:<24}  {:<14}  {}\n",
            t.date_string(),
            format_inr(t.amount),
            t.merchant,
            t.category.label(),
            t.description
        ));
    }
    output.push_str(&format!("\n{} transactions\n", transactions.len()));

    output
}
