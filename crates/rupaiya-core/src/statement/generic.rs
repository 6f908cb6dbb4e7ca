//! Format-agnostic fallback extractor.
//!
//! Accepts any line carrying a loose date and at least one loose amount
//! token. Everything left after removing the date and the amounts is the
//! description.

use tracing::{debug, trace};

use super::rules::amounts::{LooseAmount, loose_amount_token};
use super::rules::patterns::{HEADER_AMOUNT_WORD, HEADER_DATE_WORD, HEADER_DESCRIPTION_WORD};
use super::rules::{DateExtractor, DirectionInput, DirectionResolver, cut_span};
use super::{ExtractorOutput, RecordBuilder, SkipReason, StatementExtractor, is_balance_only};
use crate::models::category::CategoryTable;
use crate::models::config::ExtractionConfig;
use crate::models::transaction::Direction;
use crate::text::collapse_whitespace;

/// Fallback extractor for layouts no specific extractor recognizes.
pub struct GenericExtractor {
    dates: DateExtractor,
    direction: DirectionResolver,
    builder: RecordBuilder,
}

impl GenericExtractor {
    pub fn new(config: &ExtractionConfig, categories: CategoryTable) -> Self {
        Self {
            dates: DateExtractor::loose(),
            direction: DirectionResolver::new(config.single_amount_default),
            builder: RecordBuilder::new(config, categories),
        }
    }
}

impl Default for GenericExtractor {
    fn default() -> Self {
        Self::new(&ExtractionConfig::default(), CategoryTable::default())
    }
}

impl StatementExtractor for GenericExtractor {
    fn name(&self) -> &'static str {
        "generic"
    }

    fn extract(&self, lines: &[String]) -> ExtractorOutput {
        let mut output = ExtractorOutput::default();
        let header = lines.iter().position(|l| is_header(l));
        let start = match header {
            Some(header) => {
                debug!("Generic header found at line {}", header);
                header + 1
            }
            None => 0,
        };
        // Without a table header, whole numbers are too often page counts,
        // years or PIN codes.
        let allow_integers = header.is_some();

        for (line_number, line) in lines.iter().enumerate().skip(start) {
            let Some(hit) = self.dates.first(line) else {
                continue;
            };
            let Some(date) = hit.date else {
                output.skip(line_number, line, SkipReason::InvalidDate);
                continue;
            };

            let rest = collapse_whitespace(&cut_span(line, hit.position.0, hit.position.1));
            let row = split_row(&rest, allow_integers);

            let Some(chosen) = row.chosen() else {
                output.skip(line_number, line, SkipReason::MissingAmount);
                continue;
            };
            let Some(magnitude) = chosen.value else {
                output.skip(line_number, line, SkipReason::InvalidAmount);
                continue;
            };

            let description = row.words.join(" ");
            if is_balance_only(&description, 1) {
                output.skip(line_number, line, SkipReason::BalanceOnly);
                continue;
            }

            let explicit = if chosen.negative {
                Some(Direction::Debit)
            } else {
                row.marker
            };
            let amounts = [magnitude];
            let input = DirectionInput {
                description: &description,
                amounts: &amounts,
                explicit,
                previous_balance: None,
            };
            let Some(resolution) = self.direction.resolve(&input) else {
                continue;
            };
            trace!("Line {} resolved by {:?}", line_number, resolution.rule);

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
            "Generic extractor: {} transactions, {} skipped lines",
            output.transactions.len(),
            output.diagnostics.len()
        );
        output.finish()
    }
}

/// A dated line split into description words and amount tokens.
#[derive(Debug, Default)]
struct Row {
    words: Vec<String>,
    amounts: Vec<LooseAmount>,
    /// Trailing `Dr`/`Cr` column marker.
    marker: Option<Direction>,
}

impl Row {
    /// First amount with decimals, else the last amount on the line.
    fn chosen(&self) -> Option<&LooseAmount> {
        self.amounts
            .iter()
            .find(|a| a.has_decimals)
            .or_else(|| self.amounts.last())
    }
}

/// Ungrouped integers longer than this are references, not amounts.
const MAX_INTEGER_DIGITS: usize = 5;

fn split_row(rest: &str, allow_integers: bool) -> Row {
    let mut row = Row::default();
    let tokens: Vec<&str> = rest.split_whitespace().collect();
    let has_decimal_amount = tokens
        .iter()
        .filter_map(|t| loose_amount_token(t))
        .any(|a| a.has_decimals);
    let integers_are_amounts = allow_integers && !has_decimal_amount;

    for token in tokens {
        match token.to_ascii_lowercase().as_str() {
            "dr" | "dr." => {
                row.marker = Some(Direction::Debit);
                continue;
            }
            "cr" | "cr." => {
                row.marker = Some(Direction::Credit);
                continue;
            }
            _ => {}
        }

        match loose_amount_token(token) {
            Some(amount) if amount.has_decimals => row.amounts.push(amount),
            Some(amount) if integers_are_amounts && !is_reference_number(token) => {
                row.amounts.push(amount)
            }
            _ => row.words.push(token.to_string()),
        }
    }
    row
}

fn is_reference_number(token: &str) -> bool {
    !token.contains(',') && token.chars().filter(char::is_ascii_digit).count() > MAX_INTEGER_DIGITS
}

fn is_header(line: &str) -> bool {
    HEADER_DATE_WORD.is_match(line)
        && HEADER_DESCRIPTION_WORD.is_match(line)
        && HEADER_AMOUNT_WORD.is_match(line)
}
