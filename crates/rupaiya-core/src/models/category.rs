//! Spending categories and the ordered keyword table used to assign them.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Fallback chart color for categories missing from a table.
pub const DEFAULT_COLOR: &str = "#CCCCCC";

/// Closed set of spending categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Groceries,
    #[serde(rename = "Dining Out")]
    DiningOut,
    Entertainment,
    Utilities,
    Transport,
    Healthcare,
    Education,
    Shopping,
    Travel,
    #[serde(rename = "Rent/Housing")]
    RentHousing,
    Investments,
    Insurance,
    Others,
}

impl Category {
    /// All categories in canonical order.
    pub const ALL: [Category; 13] = [
        Category::Groceries,
        Category::DiningOut,
        Category::Entertainment,
        Category::Utilities,
        Category::Transport,
        Category::Healthcare,
        Category::Education,
        Category::Shopping,
        Category::Travel,
        Category::RentHousing,
        Category::Investments,
        Category::Insurance,
        Category::Others,
    ];

    /// Display label.
    pub fn label(&self) -> &'static str {
        match self {
            Category::Groceries => "Groceries",
            Category::DiningOut => "Dining Out",
            Category::Entertainment => "Entertainment",
            Category::Utilities => "Utilities",
            Category::Transport => "Transport",
            Category::Healthcare => "Healthcare",
            Category::Education => "Education",
            Category::Shopping => "Shopping",
            Category::Travel => "Travel",
            Category::RentHousing => "Rent/Housing",
            Category::Investments => "Investments",
            Category::Insurance => "Insurance",
            Category::Others => "Others",
        }
    }

    /// Parse a display label (case-insensitive).
    pub fn from_label(s: &str) -> Option<Self> {
        let s = s.trim();
        Self::ALL
            .iter()
            .copied()
            .find(|c| c.label().eq_ignore_ascii_case(s))
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One row of the category table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryRule {
    pub category: Category,
    /// Lower-case substrings; any hit assigns the category.
    pub keywords: Vec<String>,
    /// Chart color (hex).
    pub color: String,
}

impl CategoryRule {
    fn new(category: Category, keywords: &[&str], color: &str) -> Self {
        Self {
            category,
            keywords: keywords.iter().map(|k| k.to_string()).collect(),
            color: color.to_string(),
        }
    }

    fn matches(&self, lower: &str) -> bool {
        self.keywords
            .iter()
            .any(|k| !k.is_empty() && lower.contains(k.as_str()))
    }
}

/// Ordered keyword table. The first matching rule wins, so order matters
/// where keyword sets overlap ("amazon prime" vs "amazon").
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CategoryTable {
    rules: Vec<CategoryRule>,
}

impl CategoryTable {
    /// Build a table from explicit rules, keeping their order.
    pub fn new(rules: Vec<CategoryRule>) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &[CategoryRule] {
        &self.rules
    }

    /// Assign a category to a free-text description.
    pub fn categorize(&self, description: &str) -> Category {
        let lower = description.to_lowercase();
        self.rules
            .iter()
            .find(|rule| rule.matches(&lower))
            .map(|rule| rule.category)
            .unwrap_or(Category::Others)
    }

    /// Chart color for a category, falling back to [`DEFAULT_COLOR`].
    pub fn color(&self, category: Category) -> &str {
        self.rules
            .iter()
            .find(|rule| rule.category == category)
            .map(|rule| rule.color.as_str())
            .unwrap_or(DEFAULT_COLOR)
    }
}

impl Default for CategoryTable {
    fn default() -> Self {
        use Category::*;

        Self::new(vec![
            CategoryRule::new(Groceries, &["bigbasket", "grofer", "dmart", "grocery"], "#FF9F6B"),
            CategoryRule::new(DiningOut, &["swiggy", "zomato", "restaurant", "cafe"], "#FFC857"),
            CategoryRule::new(
                Entertainment,
                &["netflix", "amazon prime", "hotstar", "movie", "bookmyshow"],
                "#58C7B4",
            ),
            CategoryRule::new(
                Utilities,
                &["electricity", "water", "gas", "broadband", "jio", "airtel"],
                "#6E59A5",
            ),
            CategoryRule::new(
                Transport,
                &["uber", "ola", "metro", "petrol", "diesel", "train"],
                "#E5DEFF",
            ),
            CategoryRule::new(
                Healthcare,
                &["hospital", "pharmacy", "doctor", "apollo", "medplus"],
                "#A9DEF9",
            ),
            CategoryRule::new(
                Education,
                &["school", "college", "tuition", "course", "fee"],
                "#D4A5A5",
            ),
            CategoryRule::new(
                Shopping,
                &["myntra", "amazon", "flipkart", "mall", "retail"],
                "#77DD77",
            ),
            CategoryRule::new(
                Travel,
                &["hotel", "flight", "makemytrip", "yatra", "travel"],
                "#FFD4B8",
            ),
            CategoryRule::new(
                RentHousing,
                &["rent", "housing", "apartment", "maintenance"],
                "#CFBAF0",
            ),
            CategoryRule::new(
                Investments,
                &["mutual fund", "stock", "zerodha", "groww", "investment"],
                "#B4F8C8",
            ),
            CategoryRule::new(Insurance, &["insurance", "lic", "policy"], "#FBE7C6"),
            CategoryRule::new(Others, &[], "#FFAEBC"),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_match_wins() {
        let table = CategoryTable::default();
        assert_eq!(table.categorize("Amazon Prime renewal"), Category::Entertainment);
        assert_eq!(table.categorize("AMAZON PAY INDIA"), Category::Shopping);
    }

    #[test]
    fn test_case_insensitive() {
        let table = CategoryTable::default();
        assert_eq!(table.categorize("UPI/P2M/ZOMATO/ref123"), Category::DiningOut);
        assert_eq!(table.categorize("bigbasket order"), Category::Groceries);
    }

    #[test]
    fn test_total_and_deterministic() {
        let table = CategoryTable::default();
        assert_eq!(table.categorize(""), Category::Others);
        assert_eq!(table.categorize("Salary Credit"), Category::Others);
        for _ in 0..3 {
            assert_eq!(table.categorize("Uber trip"), Category::Transport);
        }
    }

    #[test]
    fn test_custom_table() {
        let table = CategoryTable::new(vec![CategoryRule::new(
            Category::Investments,
            &["salary"],
            "#000000",
        )]);
        assert_eq!(table.categorize("Salary Credit"), Category::Investments);
        assert_eq!(table.categorize("Zomato"), Category::Others);
        assert_eq!(table.color(Category::Investments), "#000000");
        assert_eq!(table.color(Category::Travel), DEFAULT_COLOR);
    }

    #[test]
    fn test_labels_round_trip() {
        for c in Category::ALL {
            assert_eq!(Category::from_label(c.label()), Some(c));
        }
        assert_eq!(Category::from_label("rent/housing"), Some(Category::RentHousing));
        assert_eq!(Category::from_label("Pets"), None);
    }
}
