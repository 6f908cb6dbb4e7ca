//! Merchant name resolution from transaction descriptions.

use regex::Regex;

use super::patterns::{IMPS_REFERENCE, PERSON_NAME, UPI_REFERENCE};
use crate::text::collapse_whitespace;

/// Brand names that identify a merchant segment even when it is upper-cased.
const KNOWN_MERCHANTS: &[&str] = &[
    "amazon", "apollo", "airtel", "bigbasket", "bookmyshow", "dmart", "flipkart",
    "hotstar", "jio", "makemytrip", "medplus", "myntra", "netflix", "ola",
    "paytm", "reliance", "swiggy", "uber", "zerodha", "zomato",
];

/// Slash-delimited payment reference schemes.
struct ReferenceScheme {
    pattern: &'static Regex,
    /// Segment taken when no segment qualifies by content.
    fallback_index: usize,
}

/// Derives a short merchant name from a cleaned description.
#[derive(Debug, Clone)]
pub struct MerchantResolver {
    placeholder: String,
}

impl MerchantResolver {
    pub fn new(placeholder: impl Into<String>) -> Self {
        Self {
            placeholder: placeholder.into(),
        }
    }

    /// Resolve a merchant; never returns an empty string.
    pub fn resolve(&self, description: &str) -> String {
        let description = collapse_whitespace(description);
        if description.is_empty() {
            return self.placeholder.clone();
        }

        let schemes = [
            ReferenceScheme {
                pattern: &*UPI_REFERENCE,
                fallback_index: 2,
            },
            ReferenceScheme {
                pattern: &*IMPS_REFERENCE,
                fallback_index: 3,
            },
        ];

        for scheme in &schemes {
            if let Some(m) = scheme.pattern.find(&description) {
                if let Some(name) = from_reference(&description[m.start()..], scheme.fallback_index) {
                    return name;
                }
            }
        }

        if let Some(m) = PERSON_NAME.find(&description) {
            return m.as_str().to_string();
        }

        description
            .split_whitespace()
            .take(3)
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl Default for MerchantResolver {
    fn default() -> Self {
        Self::new("Unknown Merchant")
    }
}

fn from_reference(reference: &str, fallback_index: usize) -> Option<String> {
    let segments: Vec<&str> = reference.split('/').map(str::trim).collect();

    let qualified = segments.iter().skip(1).find(|segment| {
        !is_reference_code(segment) && (is_known_merchant(segment) || !is_all_uppercase(segment))
    });
    if let Some(segment) = qualified {
        return Some(segment.to_string());
    }

    if let Some(segment) = segments.get(fallback_index).filter(|s| !s.is_empty()) {
        return Some(segment.to_string());
    }

    segments
        .iter()
        .skip(1)
        .find(|s| !is_reference_code(s))
        .map(|s| s.to_string())
}

/// Digits or too few letters: bank codes, method codes and reference numbers.
fn is_reference_code(segment: &str) -> bool {
    let letters = segment.chars().filter(|c| c.is_alphabetic()).count();
    letters < 2 || segment.chars().any(|c| c.is_ascii_digit())
}

fn is_all_uppercase(segment: &str) -> bool {
    segment
        .chars()
        .filter(|c| c.is_alphabetic())
        .all(|c| c.is_uppercase())
}

fn is_known_merchant(segment: &str) -> bool {
    let lower = segment.to_lowercase();
    KNOWN_MERCHANTS.iter().any(|m| lower.contains(m))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upi_known_merchant() {
        let resolver = MerchantResolver::default();
        assert_eq!(resolver.resolve("UPI/P2M/ZOMATO/ref123"), "ZOMATO");
    }

    #[test]
    fn test_upi_proper_cased_name() {
        let resolver = MerchantResolver::default();
        assert_eq!(
            resolver.resolve("UPI/P2A/Rahul Kumar/HDFC/987654321"),
            "Rahul Kumar"
        );
    }

    #[test]
    fn test_upi_positional_fallback() {
        let resolver = MerchantResolver::default();
        assert_eq!(
            resolver.resolve("UPI/P2A/RAHUL KUMAR/HDFC BANK/987654321"),
            "RAHUL KUMAR"
        );
    }

    #[test]
    fn test_imps_reference() {
        let resolver = MerchantResolver::default();
        assert_eq!(
            resolver.resolve("IMPS/P2A/412345678901/Anita Sharma/SBIN"),
            "Anita Sharma"
        );
        assert_eq!(
            resolver.resolve("IMPS/P2A/412345678901/ANITA SHARMA/SBIN"),
            "ANITA SHARMA"
        );
    }

    #[test]
    fn test_person_name_in_free_text() {
        let resolver = MerchantResolver::default();
        assert_eq!(resolver.resolve("Transfer to John Smith ref 42"), "John Smith");
        assert_eq!(resolver.resolve("NEFT from John Smith"), "John Smith");
    }

    #[test]
    fn test_first_tokens_fallback() {
        let resolver = MerchantResolver::default();
        assert_eq!(resolver.resolve("NEFT-HDFC0001 ACME CORP PAYROLL"), "NEFT-HDFC0001 ACME CORP");
        assert_eq!(resolver.resolve("CASH"), "CASH");
    }

    #[test]
    fn test_never_empty() {
        let resolver = MerchantResolver::default();
        assert_eq!(resolver.resolve("   "), "Unknown Merchant");
        for d in ["UPI/", "UPI/123/456", "IMPS//", "x", "/"] {
            assert!(!resolver.resolve(d).is_empty(), "empty merchant for {d:?}");
        }
    }
}
