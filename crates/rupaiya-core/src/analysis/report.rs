//! Plain-text spending report.

use super::SpendingAnalysis;
use crate::statement::rules::format_inr;

const TITLE: &str = "RUPAIYA - FINANCIAL REPORT";

/// Render labeled report sections separated by blank lines.
pub fn render_report(analysis: &SpendingAnalysis) -> String {
    let mut lines = vec![TITLE.to_string(), underline(TITLE, '=')];

    section(&mut lines, "SUMMARY");
    lines.push(format!(
        "Total Spending: {}",
        format_inr(analysis.summary.total_spending)
    ));
    lines.push(format!(
        "Potential Savings: {}",
        format_inr(analysis.summary.potential_savings)
    ));
    lines.push(format!("Transactions: {}", analysis.summary.transaction_count));

    section(&mut lines, "SPENDING BY CATEGORY");
    lines.extend(
        analysis
            .categories
            .iter()
            .map(|c| format!("{}: {}", c.category, format_inr(c.total))),
    );

    section(&mut lines, "TOP MERCHANTS");
    lines.extend(
        analysis
            .merchants
            .iter()
            .map(|m| format!("{}: {}", m.merchant, format_inr(m.total))),
    );

    section(&mut lines, "RECOMMENDATIONS");
    for (i, rec) in analysis.recommendations.iter().enumerate() {
        if i > 0 {
            lines.push(String::new());
        }
        lines.push(format!(
            "{}: Save up to {}",
            rec.title,
            format_inr(rec.potential_savings)
        ));
        lines.push(rec.description.clone());
    }

    lines.push(String::new());
    lines.join("\n")
}

fn section(lines: &mut Vec<String>, heading: &str) {
    lines.push(String::new());
    lines.push(heading.to_string());
    lines.push(underline(heading, '-'));
}

fn underline(heading: &str, c: char) -> String {
    c.to_string().repeat(heading.chars().count())
}
