//! Common regex patterns for bank statement extraction.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // Day-first dates: 12-03-2024, 1/4/24
    pub static ref DATE_DAY_FIRST: Regex = Regex::new(
        r"\b(\d{1,2})[-/](\d{1,2})[-/](\d{2,4})\b"
    ).unwrap();

    // Loose dates: DD/MM/YYYY, YYYY/MM/DD, DD-MM-YY
    pub static ref DATE_LOOSE: Regex = Regex::new(
        r"\b(\d{1,4})[-/](\d{1,2})[-/](\d{1,4})\b"
    ).unwrap();

    // Column amounts with exactly two decimals: 450.00, 1,25,000.00, 10,500.00
    pub static ref AMOUNT_TWO_DECIMALS: Regex = Regex::new(
        r"\b\d+(?:,\d{2,3})*\.\d{2}\b"
    ).unwrap();

    // Whole-token loose amount: -1,234.50, 450, ₹99.00
    pub static ref AMOUNT_LOOSE_TOKEN: Regex = Regex::new(
        r"^(?:₹|Rs\.?|INR)?(-?(?:\d{1,3}(?:,\d{2,3})+|\d+)(?:\.\d{2})?)$"
    ).unwrap();

    // Cheque/reference number at line start
    pub static ref LEADING_REFERENCE: Regex = Regex::new(
        r"^\d{6,}\s+"
    ).unwrap();

    // Generic header: every group has to appear somewhere on the line
    pub static ref HEADER_DATE_WORD: Regex = Regex::new(
        r"(?i)\b(?:date|txn\s+date|value\s+date|posting\s+date)\b"
    ).unwrap();

    pub static ref HEADER_DESCRIPTION_WORD: Regex = Regex::new(
        r"(?i)\b(?:description|particulars|narration|details|remarks)\b"
    ).unwrap();

    pub static ref HEADER_AMOUNT_WORD: Regex = Regex::new(
        r"(?i)\b(?:amount|debit|credit|withdrawals?|deposits?|dr|cr)\b"
    ).unwrap();

    // Opening/closing balance rows
    pub static ref BALANCE_MARKER: Regex = Regex::new(
        r"(?i)\b(?:opening|closing)\s+balance\b|\bbalance\s+(?:b/f|c/f|forward)\b|\b(?:brought|carried)\s+forward\b"
    ).unwrap();

    // Direction keywords
    pub static ref DEBIT_KEYWORDS: Regex = Regex::new(
        r"(?i)\b(?:debit(?:ed)?|withdrawal|payment|atm)\b|\bupi/p2m\b"
    ).unwrap();

    pub static ref CREDIT_KEYWORDS: Regex = Regex::new(
        r"(?i)\b(?:credit(?:ed)?|deposit|salary|refund)\b"
    ).unwrap();

    pub static ref PURCHASE_HINTS: Regex = Regex::new(
        r"(?i)\b(?:purchase|pos|upi|imps|neft|bill|order|ecom)\b"
    ).unwrap();

    // Payment references
    pub static ref UPI_REFERENCE: Regex = Regex::new(
        r"(?i)\bUPI/"
    ).unwrap();

    pub static ref IMPS_REFERENCE: Regex = Regex::new(
        r"(?i)\bIMPS/"
    ).unwrap();

    // "John Smith"
    pub static ref PERSON_NAME: Regex = Regex::new(
        r"\b[A-Z][a-z]+\s+[A-Z][a-z]+\b"
    ).unwrap();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_day_first_ignores_iso_dates() {
        assert!(DATE_DAY_FIRST.is_match("12-03-2024"));
        assert!(DATE_DAY_FIRST.is_match("1/4/24"));
        assert!(!DATE_DAY_FIRST.is_match("2024-03-12"));
        assert!(DATE_LOOSE.is_match("2024-03-12"));
    }

    #[test]
    fn test_amount_two_decimals() {
        let found: Vec<&str> = AMOUNT_TWO_DECIMALS
            .find_iter("UPI/P2M/ZOMATO/ref123 450.00 1,25,000.00")
            .map(|m| m.as_str())
            .collect();
        assert_eq!(found, vec!["450.00", "1,25,000.00"]);
    }

    #[test]
    fn test_loose_token() {
        assert!(AMOUNT_LOOSE_TOKEN.is_match("-1,234.50"));
        assert!(AMOUNT_LOOSE_TOKEN.is_match("₹99.00"));
        assert!(AMOUNT_LOOSE_TOKEN.is_match("450"));
        assert!(!AMOUNT_LOOSE_TOKEN.is_match("ref123"));
        assert!(!AMOUNT_LOOSE_TOKEN.is_match("12.5"));
    }

    #[test]
    fn test_direction_keywords_use_word_boundaries() {
        assert!(DEBIT_KEYWORDS.is_match("ATM WDL MG ROAD"));
        assert!(!DEBIT_KEYWORDS.is_match("Dental treatment"));
        assert!(CREDIT_KEYWORDS.is_match("Salary Credit"));
    }
}
