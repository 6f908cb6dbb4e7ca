//! Built-in sample ledger for exploring reports without a statement.

use chrono::{Days, NaiveDate};
use rust_decimal::Decimal;

use crate::models::category::CategoryTable;
use crate::models::transaction::Transaction;

const SAMPLE_MERCHANTS: &[&str] = &[
    "BigBasket",
    "Swiggy",
    "Zomato",
    "Amazon",
    "Flipkart",
    "Netflix",
    "Airtel",
    "Uber",
    "Apollo Pharmacy",
    "HDFC Credit Card",
    "TATA CLiQ",
    "Reliance Mart",
    "BookMyShow",
    "MakeMyTrip",
    "Myntra",
];

/// Default number of sample transactions.
pub const SAMPLE_SIZE: usize = 100;

/// Span of the sample ledger, ending at `end`.
const SAMPLE_DAYS: u64 = 182;

/// Deterministic debit-only ledger spread over the six months before `end`.
///
/// Amounts run from ₹100 to ₹5,099 and descriptions read
/// `Payment to <merchant>`, categorized through `table`. Newest first, like
/// pipeline output.
pub fn sample_transactions(end: NaiveDate, count: usize, table: &CategoryTable) -> Vec<Transaction> {
    let mut transactions: Vec<Transaction> = (0..count)
        .map(|i| {
            let merchant = SAMPLE_MERCHANTS[(i * 7) % SAMPLE_MERCHANTS.len()];
            let description = format!("Payment to {}", merchant);
            let days_back = (i as u64 * 37) % SAMPLE_DAYS;
            let rupees = 100 + (i as i64 * 1237) % 5000;

            Transaction {
                id: format!("sample-{}", i),
                date: end.checked_sub_days(Days::new(days_back)).unwrap_or(end),
                category: table.categorize(&description),
                description,
                amount: -Decimal::new(rupees * 100, 2),
                merchant: merchant.to_string(),
            }
        })
        .collect();

    transactions.sort_by(|a, b| b.date.cmp(&a.date));
    transactions
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::SpendingAnalysis;
    use crate::models::category::{Category, CategoryRule};

    fn end() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 30).unwrap()
    }

    #[test]
    fn test_sample_is_deterministic_and_sorted() {
        let table = CategoryTable::default();
        let a = sample_transactions(end(), SAMPLE_SIZE, &table);
        let b = sample_transactions(end(), SAMPLE_SIZE, &table);

        assert_eq!(a.len(), SAMPLE_SIZE);
        assert_eq!(a, b);
        assert!(a.windows(2).all(|w| w[0].date >= w[1].date));
        assert!(a.iter().all(|t| t.is_debit()));
        assert!(a.iter().all(|t| t.date <= end() && t.date > NaiveDate::from_ymd_opt(2023, 12, 30).unwrap()));
        assert!(a.iter().all(|t| {
            let magnitude = t.amount.abs();
            magnitude >= Decimal::new(100, 0) && magnitude < Decimal::new(5100, 0)
        }));
    }

    #[test]
    fn test_sample_categorized_through_table() {
        let table = CategoryTable::default();
        let sample = sample_transactions(end(), 15, &table);
        let swiggy = sample.iter().find(|t| t.merchant == "Swiggy").unwrap();
        assert_eq!(swiggy.category, Category::DiningOut);

        let custom = CategoryTable::new(vec![CategoryRule {
            category: Category::Travel,
            keywords: vec!["payment".to_string()],
            color: "#000000".to_string(),
        }]);
        let sample = sample_transactions(end(), 15, &custom);
        assert!(sample.iter().all(|t| t.category == Category::Travel));
    }

    #[test]
    fn test_sample_feeds_analysis() {
        let table = CategoryTable::default();
        let sample = sample_transactions(end(), SAMPLE_SIZE, &table);
        let analysis = SpendingAnalysis::new(&sample, &table);

        assert_eq!(analysis.summary.transaction_count, SAMPLE_SIZE);
        assert!(analysis.summary.total_spending > Decimal::ZERO);
        assert!(!analysis.recommendations.is_empty());
    }
}
