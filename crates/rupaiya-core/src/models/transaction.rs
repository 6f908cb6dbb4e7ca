//! Transaction record produced by the statement extractors.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::category::Category;

/// Money flow from the statement holder's perspective.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Outflow; stored as a negative amount.
    Debit,
    /// Inflow; stored as a positive amount.
    Credit,
}

impl Direction {
    /// Apply this direction to an unsigned magnitude.
    pub fn apply(self, magnitude: Decimal) -> Decimal {
        match self {
            Direction::Debit => -magnitude.abs(),
            Direction::Credit => magnitude.abs(),
        }
    }
}

/// A single ledger entry recovered from statement text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// Identifier, unique within one extraction run (e.g. `axis-3`).
    pub id: String,

    /// Booking date, serialized as `YYYY-MM-DD`.
    pub date: NaiveDate,

    /// Cleaned description; never empty.
    pub description: String,

    /// Signed amount: negative = debit, positive = credit.
    pub amount: Decimal,

    /// Short merchant name derived from the description; never empty.
    pub merchant: String,

    /// Spending category; `Others` when nothing matched.
    pub category: Category,
}

impl Transaction {
    /// Direction encoded in the amount sign. Zero counts as credit.
    pub fn direction(&self) -> Direction {
        if self.amount.is_sign_negative() && !self.amount.is_zero() {
            Direction::Debit
        } else {
            Direction::Credit
        }
    }

    pub fn is_debit(&self) -> bool {
        self.direction() == Direction::Debit
    }

    /// Canonical `YYYY-MM-DD` date string.
    pub fn date_string(&self) -> String {
        self.date.format("%Y-%m-%d").to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn sample(amount: &str) -> Transaction {
        Transaction {
            id: "axis-0".to_string(),
            date: NaiveDate::from_ymd_opt(2024, 3, 12).unwrap(),
            description: "UPI/P2M/ZOMATO/ref123".to_string(),
            amount: Decimal::from_str(amount).unwrap(),
            merchant: "ZOMATO".to_string(),
            category: Category::DiningOut,
        }
    }

    #[test]
    fn test_direction_from_sign() {
        assert_eq!(sample("-450.00").direction(), Direction::Debit);
        assert_eq!(sample("450.00").direction(), Direction::Credit);
        assert_eq!(sample("0.00").direction(), Direction::Credit);
    }

    #[test]
    fn test_direction_apply() {
        let m = Decimal::from_str("12.50").unwrap();
        assert_eq!(Direction::Debit.apply(m), Decimal::from_str("-12.50").unwrap());
        assert_eq!(Direction::Credit.apply(-m), m);
    }

    #[test]
    fn test_serializes_canonical_date() {
        let json = serde_json::to_value(sample("-450.00")).unwrap();
        assert_eq!(json["date"], "2024-03-12");
        assert_eq!(json["category"], "Dining Out");
        assert_eq!(sample("1").date_string(), "2024-03-12");
    }
}
