//! Bank statement transaction extraction.

mod axis;
mod generic;
mod pipeline;
pub mod rules;

pub use axis::AxisExtractor;
pub use generic::GenericExtractor;
pub use pipeline::{PipelineOutcome, PipelineState, StatementPipeline};

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::category::CategoryTable;
use crate::models::config::ExtractionConfig;
use crate::models::transaction::Transaction;
use crate::text::collapse_whitespace;
use rules::MerchantResolver;
use rules::patterns::BALANCE_MARKER;

/// Why a dated line did not become a transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SkipReason {
    /// Date-shaped text that is not a calendar date.
    InvalidDate,
    /// Amount-shaped text that does not parse.
    InvalidAmount,
    /// No amount on the line.
    MissingAmount,
    /// Opening/closing balance or a bare balance figure.
    BalanceOnly,
}

/// A line dropped during extraction. Recorded, never fatal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParseDiagnostic {
    /// Zero-based index into the normalized line sequence.
    pub line_number: usize,
    pub line: String,
    pub reason: SkipReason,
}

/// Records and diagnostics produced by one strategy.
#[derive(Debug, Clone, Default)]
pub struct ExtractorOutput {
    /// Sorted by date, oldest first.
    pub transactions: Vec<Transaction>,
    pub diagnostics: Vec<ParseDiagnostic>,
}

impl ExtractorOutput {
    pub fn len(&self) -> usize {
        self.transactions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }

    pub(crate) fn skip(&mut self, line_number: usize, line: &str, reason: SkipReason) {
        tracing::debug!("Skipping line {} ({:?}): {}", line_number, reason, line);
        self.diagnostics.push(ParseDiagnostic {
            line_number,
            line: line.to_string(),
            reason,
        });
    }

    pub(crate) fn finish(mut self) -> Self {
        self.transactions.sort_by_key(|t| t.date);
        self
    }
}

/// A statement layout strategy.
pub trait StatementExtractor: Send + Sync {
    /// Short name, also used as the identifier prefix.
    fn name(&self) -> &'static str;

    /// Decode normalized lines into transactions.
    fn extract(&self, lines: &[String]) -> ExtractorOutput;
}

/// Fills in description, merchant, category and identifier for decoded rows.
#[derive(Debug, Clone)]
pub(crate) struct RecordBuilder {
    merchants: MerchantResolver,
    categories: CategoryTable,
    description_placeholder: String,
}

impl RecordBuilder {
    pub(crate) fn new(config: &ExtractionConfig, categories: CategoryTable) -> Self {
        Self {
            merchants: MerchantResolver::new(config.merchant_placeholder.clone()),
            categories,
            description_placeholder: config.description_placeholder.clone(),
        }
    }

    pub(crate) fn build(
        &self,
        prefix: &str,
        sequence: usize,
        date: NaiveDate,
        raw_description: &str,
        amount: Decimal,
    ) -> Transaction {
        let cleaned = collapse_whitespace(raw_description);
        let merchant = self.merchants.resolve(&cleaned);
        let category = self.categories.categorize(&cleaned);
        let description = if cleaned.is_empty() {
            self.description_placeholder.clone()
        } else {
            cleaned
        };

        Transaction {
            id: format!("{}-{}", prefix, sequence),
            date,
            description,
            amount,
            merchant,
            category,
        }
    }
}

/// Balance rows carry no transaction of their own.
pub(crate) fn is_balance_only(description: &str, amount_count: usize) -> bool {
    BALANCE_MARKER.is_match(description) || (description.trim().is_empty() && amount_count <= 1)
}
