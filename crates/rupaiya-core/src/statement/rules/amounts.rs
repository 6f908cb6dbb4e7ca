//! Amount extraction for statement rows.

use rust_decimal::Decimal;
use std::str::FromStr;

use super::patterns::{AMOUNT_LOOSE_TOKEN, AMOUNT_TWO_DECIMALS};
use super::{ExtractionMatch, FieldExtractor};

/// Column amount extractor (digit groups with exactly two decimals).
pub struct AmountExtractor;

impl AmountExtractor {
    pub fn new() -> Self {
        Self
    }

    /// Number of amount-shaped substrings, parseable or not.
    pub fn count_candidates(&self, text: &str) -> usize {
        AMOUNT_TWO_DECIMALS.find_iter(text).count()
    }
}

impl Default for AmountExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for AmountExtractor {
    type Output = ExtractionMatch<Decimal>;

    fn extract(&self, text: &str) -> Option<Self::Output> {
        self.extract_all(text).into_iter().next()
    }

    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        AMOUNT_TWO_DECIMALS
            .find_iter(text)
            .filter_map(|m| {
                let amount = parse_amount(m.as_str())?;
                Some(ExtractionMatch::new(amount, m.start(), m.end(), m.as_str()))
            })
            .collect()
    }
}

/// A whole whitespace token that reads as a loose amount.
#[derive(Debug, Clone, PartialEq)]
pub struct LooseAmount {
    /// Parsed value; `None` when the token has the right shape but does not
    /// fit a decimal.
    pub value: Option<Decimal>,
    pub negative: bool,
    pub has_decimals: bool,
}

/// Check a single token against the loose amount shape.
pub fn loose_amount_token(token: &str) -> Option<LooseAmount> {
    let caps = AMOUNT_LOOSE_TOKEN.captures(token)?;
    let number = &caps[1];
    Some(LooseAmount {
        value: parse_amount(number).map(|v| v.abs()),
        negative: number.starts_with('-'),
        has_decimals: number.contains('.'),
    })
}

/// Parse an amount such as "1,25,000.00", "-450" or "₹99.50".
pub fn parse_amount(s: &str) -> Option<Decimal> {
    let cleaned: String = s
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.' || *c == '-')
        .collect();

    if cleaned.is_empty() || cleaned == "-" {
        return None;
    }

    Decimal::from_str(&cleaned).ok()
}

/// Format an amount with Indian digit grouping and the rupee sign
/// (₹1,23,456.00).
pub fn format_inr(amount: Decimal) -> String {
    let s = format!("{:.2}", amount.abs().round_dp(2));
    let (integer_part, decimal_part) = s.split_once('.').unwrap_or((s.as_str(), "00"));

    let digits: Vec<char> = integer_part.chars().collect();
    let mut groups: Vec<String> = Vec::new();
    let mut end = digits.len();

    // Last three digits form the first group, then pairs.
    let first = end.saturating_sub(3);
    groups.push(digits[first..end].iter().collect());
    end = first;
    while end > 0 {
        let start = end.saturating_sub(2);
        groups.push(digits[start..end].iter().collect());
        end = start;
    }
    groups.reverse();

    let sign = if amount.is_sign_negative() && !amount.is_zero() { "-" } else { "" };
    format!("{}₹{}.{}", sign, groups.join(","), decimal_part)
}
