//! Spending aggregates folded over extracted transactions.
//!
//! Only debits count as spending; totals are magnitudes.

mod report;

pub use report::render_report;

use chrono::Datelike;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::models::category::{Category, CategoryTable};
use crate::models::transaction::Transaction;
use crate::statement::rules::format_inr;

/// Merchants kept by [`merchant_totals`].
pub const TOP_MERCHANTS: usize = 5;
/// Recommendations kept by [`saving_recommendations`].
pub const MAX_RECOMMENDATIONS: usize = 5;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryTotal {
    pub category: Category,
    pub total: Decimal,
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MerchantTotal {
    pub merchant: String,
    pub total: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlySpending {
    /// "Mar 2024"
    pub month: String,
    pub amount: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SavingRecommendation {
    pub id: String,
    pub title: String,
    pub description: String,
    pub potential_savings: Decimal,
    pub category: Category,
}

/// Headline figures for a statement.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpendingSummary {
    pub total_spending: Decimal,
    /// Sum over the returned recommendations.
    pub potential_savings: Decimal,
    pub transaction_count: usize,
}

/// Everything the report needs, computed in one pass over the inputs.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpendingAnalysis {
    pub summary: SpendingSummary,
    pub categories: Vec<CategoryTotal>,
    pub merchants: Vec<MerchantTotal>,
    pub monthly: Vec<MonthlySpending>,
    pub recommendations: Vec<SavingRecommendation>,
}

impl SpendingAnalysis {
    pub fn new(transactions: &[Transaction], table: &CategoryTable) -> Self {
        let categories = category_totals(transactions, table);
        let recommendations = recommendations_from(&categories);
        let summary = SpendingSummary {
            total_spending: total_spending(transactions),
            potential_savings: recommendations.iter().map(|r| r.potential_savings).sum(),
            transaction_count: transactions.len(),
        };

        Self {
            summary,
            categories,
            merchants: merchant_totals(transactions),
            monthly: monthly_spending(transactions),
            recommendations,
        }
    }
}

/// Total outflow.
pub fn total_spending(transactions: &[Transaction]) -> Decimal {
    debits(transactions).map(|t| t.amount.abs()).sum()
}

/// Spend per category in first-seen order.
pub fn category_totals(transactions: &[Transaction], table: &CategoryTable) -> Vec<CategoryTotal> {
    fold_by(debits(transactions), |t| t.category)
        .into_iter()
        .map(|(category, total)| CategoryTotal {
            category,
            total,
            color: table.color(category).to_string(),
        })
        .collect()
}

/// Top merchants by spend, largest first.
pub fn merchant_totals(transactions: &[Transaction]) -> Vec<MerchantTotal> {
    let mut totals: Vec<MerchantTotal> = fold_by(debits(transactions), |t| t.merchant.clone())
        .into_iter()
        .map(|(merchant, total)| MerchantTotal { merchant, total })
        .collect();

    totals.sort_by(|a, b| b.total.cmp(&a.total));
    totals.truncate(TOP_MERCHANTS);
    totals
}

/// Spend per calendar month, oldest first.
pub fn monthly_spending(transactions: &[Transaction]) -> Vec<MonthlySpending> {
    let mut months = fold_by(debits(transactions), |t| (t.date.year(), t.date.month()));
    months.sort_by_key(|(key, _)| *key);

    months
        .into_iter()
        .filter_map(|((year, month), amount)| {
            let first = chrono::NaiveDate::from_ymd_opt(year, month, 1)?;
            Some(MonthlySpending {
                month: first.format("%b %Y").to_string(),
                amount,
            })
        })
        .collect()
}

/// Threshold rules over category shares of total spend.
pub fn saving_recommendations(
    transactions: &[Transaction],
    table: &CategoryTable,
) -> Vec<SavingRecommendation> {
    recommendations_from(&category_totals(transactions, table))
}

struct SavingRule {
    id: &'static str,
    category: Category,
    /// Share of total spend (percent) the category must exceed.
    threshold_pct: i64,
    /// Share of the category spend (percent) that could be saved.
    savings_pct: i64,
    title: &'static str,
    /// `{amount}` is replaced with the formatted category spend.
    template: &'static str,
}

const SAVING_RULES: &[SavingRule] = &[
    SavingRule {
        id: "1",
        category: Category::DiningOut,
        threshold_pct: 10,
        savings_pct: 50,
        title: "Reduce Eating Out",
        template: "You're spending {amount} on dining out. Try cooking at home more often to save up to 50% on food expenses.",
    },
    SavingRule {
        id: "2",
        category: Category::Entertainment,
        threshold_pct: 8,
        savings_pct: 30,
        title: "Share Subscription Costs",
        template: "Share your OTT subscriptions with family members or look for combo plans to reduce your {amount} entertainment expenses.",
    },
    SavingRule {
        id: "3",
        category: Category::Transport,
        threshold_pct: 15,
        savings_pct: 40,
        title: "Optimize Transport Costs",
        template: "Consider carpooling or using public transport more often to reduce your {amount} transportation expenses.",
    },
    SavingRule {
        id: "4",
        category: Category::Shopping,
        threshold_pct: 10,
        savings_pct: 30,
        title: "Plan Your Shopping",
        template: "You spent {amount} on shopping. Wait for seasonal sales and create a shopping list to avoid impulse purchases.",
    },
    SavingRule {
        id: "5",
        category: Category::Utilities,
        threshold_pct: 10,
        savings_pct: 20,
        title: "Reduce Utility Bills",
        template: "Your utility bills amount to {amount}. Consider switching to energy-efficient appliances and being mindful of power consumption.",
    },
];

/// Below this many specific tips the general budget tip is added.
const MIN_SPECIFIC_RECOMMENDATIONS: usize = 3;

fn recommendations_from(categories: &[CategoryTotal]) -> Vec<SavingRecommendation> {
    let total: Decimal = categories.iter().map(|c| c.total).sum();
    let spent_on = |category: Category| {
        categories
            .iter()
            .find(|c| c.category == category)
            .map(|c| c.total)
            .unwrap_or_default()
    };

    let mut recommendations: Vec<SavingRecommendation> = SAVING_RULES
        .iter()
        .filter_map(|rule| {
            let spent = spent_on(rule.category);
            if spent <= total * percent(rule.threshold_pct) {
                return None;
            }
            Some(SavingRecommendation {
                id: rule.id.to_string(),
                title: rule.title.to_string(),
                description: rule.template.replace("{amount}", &format_inr(spent)),
                potential_savings: (spent * percent(rule.savings_pct)).round_dp(2),
                category: rule.category,
            })
        })
        .collect();

    if recommendations.len() < MIN_SPECIFIC_RECOMMENDATIONS {
        recommendations.push(SavingRecommendation {
            id: "6".to_string(),
            title: "Create a Monthly Budget".to_string(),
            description: format!(
                "Setting up a monthly budget for each category can help you track and reduce your overall expenses of {}.",
                format_inr(total)
            ),
            potential_savings: (total * percent(10)).round_dp(2),
            category: Category::Others,
        });
    }

    recommendations.truncate(MAX_RECOMMENDATIONS);
    recommendations
}

fn percent(p: i64) -> Decimal {
    Decimal::new(p, 2)
}

fn debits(transactions: &[Transaction]) -> impl Iterator<Item = &Transaction> {
    transactions.iter().filter(|t| t.is_debit())
}

/// Sum magnitudes per key, keeping first-seen key order.
fn fold_by<'a, K, F>(transactions: impl Iterator<Item = &'a Transaction>, key: F) -> Vec<(K, Decimal)>
where
    K: PartialEq,
    F: Fn(&Transaction) -> K,
{
    let mut totals: Vec<(K, Decimal)> = Vec::new();
    for transaction in transactions {
        let k = key(transaction);
        let amount = transaction.amount.abs();
        match totals.iter_mut().find(|(existing, _)| *existing == k) {
            Some((_, total)) => *total += amount,
            None => totals.push((k, amount)),
        }
    }
    totals
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;
    use std::str::FromStr;

    pub(crate) fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    pub(crate) fn tx(date: &str, merchant: &str, amount: &str, category: Category) -> Transaction {
        Transaction {
            id: format!("t-{}-{}", date, merchant),
            date: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
            description: format!("Payment to {}", merchant),
            amount: dec(amount),
            merchant: merchant.to_string(),
            category,
        }
    }

    pub(crate) fn sample() -> Vec<Transaction> {
        vec![
            tx("2024-03-02", "Swiggy", "-600.00", Category::DiningOut),
            tx("2024-03-05", "BigBasket", "-2000.00", Category::Groceries),
            tx("2024-03-09", "Zomato", "-400.00", Category::DiningOut),
            tx("2024-02-20", "Uber", "-1000.00", Category::Transport),
            tx("2024-03-01", "ACME CORP", "50000.00", Category::Others),
        ]
    }

    #[test]
    fn test_total_spending_ignores_credits() {
        assert_eq!(total_spending(&sample()), dec("4000.00"));
    }

    #[test]
    fn test_category_totals_first_seen_order() {
        let totals = category_totals(&sample(), &CategoryTable::default());
        let summary: Vec<(Category, Decimal)> = totals.iter().map(|c| (c.category, c.total)).collect();
        assert_eq!(
            summary,
            vec![
                (Category::DiningOut, dec("1000.00")),
                (Category::Groceries, dec("2000.00")),
                (Category::Transport, dec("1000.00")),
            ]
        );
        assert_eq!(totals[0].color, CategoryTable::default().color(Category::DiningOut));
    }

    #[test]
    fn test_category_color_fallback() {
        let table = CategoryTable::new(Vec::new());
        let totals = category_totals(&sample(), &table);
        assert!(totals.iter().all(|c| c.color == "#CCCCCC"));
    }

    #[test]
    fn test_merchant_totals_top_five_descending() {
        let mut transactions = sample();
        for (i, m) in ["A", "B", "C", "D"].iter().enumerate() {
            transactions.push(tx("2024-03-10", m, &format!("-{}.00", i + 1), Category::Others));
        }
        let totals = merchant_totals(&transactions);
        assert_eq!(totals.len(), TOP_MERCHANTS);
        assert_eq!(totals[0].merchant, "BigBasket");
        assert_eq!(totals[1].merchant, "Uber");
        assert!(totals.windows(2).all(|w| w[0].total >= w[1].total));
        assert!(!totals.iter().any(|m| m.merchant == "ACME CORP"));
    }

    #[test]
    fn test_monthly_spending_chronological() {
        let monthly = monthly_spending(&sample());
        assert_eq!(
            monthly,
            vec![
                MonthlySpending {
                    month: "Feb 2024".to_string(),
                    amount: dec("1000.00"),
                },
                MonthlySpending {
                    month: "Mar 2024".to_string(),
                    amount: dec("3000.00"),
                },
            ]
        );
    }

    #[test]
    fn test_recommendations_thresholds() {
        // Dining 25%, transport 25%: both fire, so the budget tip is added.
        let recs = saving_recommendations(&sample(), &CategoryTable::default());
        let titles: Vec<&str> = recs.iter().map(|r| r.title.as_str()).collect();
        assert_eq!(
            titles,
            vec!["Reduce Eating Out", "Optimize Transport Costs", "Create a Monthly Budget"]
        );
        assert_eq!(recs[0].potential_savings, dec("500.00"));
        assert_eq!(recs[1].potential_savings, dec("400.00"));
        assert_eq!(recs[2].potential_savings, dec("400.00"));
        assert!(recs[0].description.contains("₹1,000.00"));
    }

    #[test]
    fn test_recommendations_capped() {
        let transactions = vec![
            tx("2024-03-01", "Swiggy", "-100.00", Category::DiningOut),
            tx("2024-03-01", "Netflix", "-100.00", Category::Entertainment),
            tx("2024-03-01", "Uber", "-100.00", Category::Transport),
            tx("2024-03-01", "Myntra", "-100.00", Category::Shopping),
            tx("2024-03-01", "Airtel", "-100.00", Category::Utilities),
        ];
        let recs = saving_recommendations(&transactions, &CategoryTable::default());
        assert_eq!(recs.len(), MAX_RECOMMENDATIONS);
        assert!(recs.iter().all(|r| r.title != "Create a Monthly Budget"));
    }

    #[test]
    fn test_no_spending_gets_budget_tip_only() {
        let recs = saving_recommendations(&[], &CategoryTable::default());
        assert_eq!(recs.len(), 1);
        assert_eq!(recs[0].potential_savings, Decimal::ZERO);
    }

    #[test]
    fn test_analysis_summary() {
        let analysis = SpendingAnalysis::new(&sample(), &CategoryTable::default());
        assert_eq!(analysis.summary.total_spending, dec("4000.00"));
        assert_eq!(analysis.summary.potential_savings, dec("1300.00"));
        assert_eq!(analysis.summary.transaction_count, 5);
    }
}
