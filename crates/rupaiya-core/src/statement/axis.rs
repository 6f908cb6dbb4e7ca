//! Axis-style column layout: Tran Date | Chq No | Particulars | Debit | Credit | Balance.
//!
//! Extracted text loses the empty debit or credit cell, so a row usually
//! reads `DD-MM-YYYY [chq] PARTICULARS AMOUNT BALANCE`.

use rust_decimal::Decimal;
use tracing::{debug, trace};

use super::rules::patterns::LEADING_REFERENCE;
use super::rules::{
    AmountExtractor, DateExtractor, DirectionInput, DirectionResolver, FieldExtractor, cut_span,
};
use super::{ExtractorOutput, RecordBuilder, SkipReason, StatementExtractor, is_balance_only};
use crate::models::category::CategoryTable;
use crate::models::config::ExtractionConfig;
use crate::models::transaction::Direction;
use crate::text::collapse_whitespace;

const HEADER_KEYWORDS: &[&str] = &["transaction date", "particulars", "debit", "credit", "balance"];
const MIN_HEADER_KEYWORDS: usize = 3;

/// Bank-specific extractor for Axis-style statements.
pub struct AxisExtractor {
    dates: DateExtractor,
    amounts: AmountExtractor,
    direction: DirectionResolver,
    builder: RecordBuilder,
}

impl AxisExtractor {
    pub fn new(config: &ExtractionConfig, categories: CategoryTable) -> Self {
        Self {
            dates: DateExtractor::day_first(),
            amounts: AmountExtractor::new(),
            direction: DirectionResolver::new(config.single_amount_default),
            builder: RecordBuilder::new(config, categories),
        }
    }

    /// Index of the first row to decode: after a header line, else the
    /// first dated line.
    fn table_start(&self, lines: &[String]) -> Option<usize> {
        if let Some(header) = lines.iter().position(|l| is_header(l)) {
            debug!("Axis header found at line {}", header);
            return Some(header + 1);
        }
        lines.iter().position(|l| self.dates.is_match(l))
    }
}

impl Default for AxisExtractor {
    fn default() -> Self {
        Self::new(&ExtractionConfig::default(), CategoryTable::default())
    }
}

impl StatementExtractor for AxisExtractor {
    fn name(&self) -> &'static str {
        "axis"
    }

    fn extract(&self, lines: &[String]) -> ExtractorOutput {
        let mut output = ExtractorOutput::default();
        let Some(start) = self.table_start(lines) else {
            debug!("No Axis table found in {} lines", lines.len());
            return output;
        };

        let mut previous_balance: Option<Decimal> = None;

        for (line_number, line) in lines.iter().enumerate().skip(start) {
            let Some(hit) = self.dates.first(line) else {
                continue;
            };
            let Some(date) = hit.date else {
                output.skip(line_number, line, SkipReason::InvalidDate);
                continue;
            };

            let rest = collapse_whitespace(&cut_span(line, hit.position.0, hit.position.1));
            let rest = LEADING_REFERENCE.replace(&rest, "").into_owned();

            let found = self.amounts.extract_all(&rest);
            if found.len() < self.amounts.count_candidates(&rest) {
                output.skip(line_number, line, SkipReason::InvalidAmount);
                continue;
            }
            let Some(first) = found.first() else {
                output.skip(line_number, line, SkipReason::MissingAmount);
                continue;
            };

            let (head, explicit) = split_sign(&rest[..first.start()]);
            let description = collapse_whitespace(head);
            let amounts: Vec<Decimal> = found.iter().map(|m| m.value).collect();

            if is_balance_only(&description, amounts.len()) {
                previous_balance = amounts.last().copied();
                output.skip(line_number, line, SkipReason::BalanceOnly);
                continue;
            }

            let input = DirectionInput {
                description: &description,
                amounts: &amounts,
                explicit,
                previous_balance,
            };
            let Some(resolution) = self.direction.resolve(&input) else {
                continue;
            };
            trace!("Line {} resolved by {:?}", line_number, resolution.rule);

            if amounts.len() >= 2 {
                previous_balance = amounts.last().copied();
            }

            let sequence = output.transactions.len();
            output.transactions.push(self.builder.build(
                self.name(),
                sequence,
                date,
                &description,
                resolution.signed_amount(),
            ));
        }

        debug!(
            "Axis extractor: {} transactions, {} skipped lines",
            output.transactions.len(),
            output.diagnostics.len()
        );
        output.finish()
    }
}

/// Separate a minus sign written directly before the first amount.
fn split_sign(head: &str) -> (&str, Option<Direction>) {
    match head.strip_suffix('-') {
        Some(rest) if rest.is_empty() || rest.ends_with(char::is_whitespace) => {
            (rest, Some(Direction::Debit))
        }
        _ => (head, None),
    }
}

fn is_header(line: &str) -> bool {
    let lower = line.to_lowercase();
    HEADER_KEYWORDS.iter().filter(|k| lower.contains(*k)).count() >= MIN_HEADER_KEYWORDS
}
