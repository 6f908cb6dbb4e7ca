//! Core library for Indian bank statement analysis.
//!
//! This crate provides:
//! - PDF text extraction behind the [`TextExtractor`] capability
//! - Line reconstruction from page text
//! - Transaction extraction with a bank-specific and a generic strategy
//! - Merchant resolution and keyword categorization
//! - Spending aggregates, saving recommendations and a text report
//! - A built-in sample ledger for trying the report without a statement

pub mod analysis;
pub mod error;
pub mod models;
pub mod pdf;
pub mod sample;
pub mod statement;
pub mod text;

pub use analysis::{SpendingAnalysis, render_report};
pub use error::{ExtractionError, PdfError, Result, RupaiyaError};
pub use models::category::{Category, CategoryRule, CategoryTable};
pub use models::config::RupaiyaConfig;
pub use models::transaction::{Direction, Transaction};
pub use pdf::{PdfExtractor, PdfProcessor, PdfType, TextExtractor, validate_mime};
pub use sample::{SAMPLE_SIZE, sample_transactions};
pub use statement::{
    ParseDiagnostic, PipelineOutcome, PipelineState, SkipReason, StatementExtractor,
    StatementPipeline,
};
pub use text::{LineNormalizer, PageText, TextFragment};
