//! Logical line reconstruction from page text.

use tracing::trace;

use super::{PageText, TextFragment};
use crate::models::config::NormalizerConfig;

/// Turns page text into ordered, trimmed, non-empty lines.
#[derive(Debug, Clone)]
pub struct LineNormalizer {
    row_tolerance: f32,
}

impl LineNormalizer {
    pub fn new(config: &NormalizerConfig) -> Self {
        Self {
            row_tolerance: config.row_tolerance,
        }
    }

    /// Override the row tolerance.
    pub fn with_row_tolerance(mut self, tolerance: f32) -> Self {
        self.row_tolerance = tolerance;
        self
    }

    /// Normalize pages in page order into one line sequence.
    pub fn normalize_pages(&self, pages: &[PageText]) -> Vec<String> {
        let mut lines = Vec::new();
        for (index, page) in pages.iter().enumerate() {
            let page_lines = match page {
                PageText::Plain(text) => self.normalize_text(text),
                PageText::Positioned(fragments) => self.normalize_fragments(fragments),
            };
            trace!("Page {} produced {} lines", index + 1, page_lines.len());
            lines.extend(page_lines);
        }
        lines
    }

    /// Split flat text on newlines.
    pub fn normalize_text(&self, text: &str) -> Vec<String> {
        text.lines()
            .map(collapse_whitespace)
            .filter(|l| !l.is_empty())
            .collect()
    }

    /// Rebuild rows from positioned fragments: top-to-bottom, then
    /// left-to-right within a row.
    pub fn normalize_fragments(&self, fragments: &[TextFragment]) -> Vec<String> {
        let mut sorted: Vec<&TextFragment> = fragments
            .iter()
            .filter(|f| !f.text.trim().is_empty())
            .filter(|f| {
                let placed = f.x.is_finite() && f.y.is_finite();
                if !placed {
                    trace!("Dropping unplaced fragment {:?}", f.text);
                }
                placed
            })
            .collect();

        sorted.sort_by(|a, b| b.y.total_cmp(&a.y).then(a.x.total_cmp(&b.x)));

        // Rows are anchored on their first fragment's y.
        let mut rows: Vec<Vec<&TextFragment>> = Vec::new();
        let mut anchor_y = f32::NAN;

        for fragment in sorted {
            if rows.is_empty() || (fragment.y - anchor_y).abs() > self.row_tolerance {
                anchor_y = fragment.y;
                rows.push(Vec::new());
            }
            if let Some(row) = rows.last_mut() {
                row.push(fragment);
            }
        }

        rows.into_iter()
            .map(|mut row| {
                row.sort_by(|a, b| a.x.total_cmp(&b.x));
                let joined = row.iter().map(|f| f.text.as_str()).collect::<Vec<_>>().join(" ");
                collapse_whitespace(&joined)
            })
            .filter(|l| !l.is_empty())
            .collect()
    }
}

impl Default for LineNormalizer {
    fn default() -> Self {
        Self::new(&NormalizerConfig::default())
    }
}

/// Trim and collapse whitespace runs to single spaces.
pub fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}
