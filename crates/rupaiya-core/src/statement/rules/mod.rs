//! Rule-based field extractors for bank statement lines.

pub mod amounts;
pub mod dates;
pub mod direction;
pub mod merchant;
pub mod patterns;

pub use amounts::{AmountExtractor, format_inr, parse_amount};
pub use dates::{DateExtractor, DateHit, DateStyle, normalize_date};
pub use direction::{DirectionInput, DirectionResolver, DirectionRule, Resolution};
pub use merchant::MerchantResolver;

/// Trait for field extractors.
pub trait FieldExtractor {
    /// The type of value this extractor produces.
    type Output;

    /// Extract the field from text.
    fn extract(&self, text: &str) -> Option<Self::Output>;

    /// Extract all occurrences of the field.
    fn extract_all(&self, text: &str) -> Vec<Self::Output>;
}

/// An extracted value with its location in the source line.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractionMatch<T> {
    /// Extracted value.
    pub value: T,
    /// Byte span in the source text.
    pub position: (usize, usize),
    /// Source text that was matched.
    pub source: String,
}

impl<T> ExtractionMatch<T> {
    pub fn new(value: T, start: usize, end: usize, source: impl Into<String>) -> Self {
        Self {
            value,
            position: (start, end),
            source: source.into(),
        }
    }

    pub fn start(&self) -> usize {
        self.position.0
    }

    pub fn end(&self) -> usize {
        self.position.1
    }
}

/// Remove a byte span from a line, leaving a single space in its place.
pub fn cut_span(line: &str, start: usize, end: usize) -> String {
    format!("{} {}", &line[..start], &line[end..])
}
