//! Configuration structures for the statement pipeline.

use serde::{Deserialize, Serialize};

use super::category::CategoryTable;
use crate::error::{Result, RupaiyaError};
use super::transaction::Direction;

/// Main configuration for the rupaiya pipeline.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RupaiyaConfig {
    /// PDF processing configuration.
    pub pdf: PdfConfig,

    /// Line reconstruction configuration.
    pub normalizer: NormalizerConfig,

    /// Transaction extraction configuration.
    pub extraction: ExtractionConfig,

    /// Ordered category keyword table.
    pub categories: CategoryTable,
}

/// PDF processing configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PdfConfig {
    /// Maximum pages to read (0 = unlimited).
    pub max_pages: usize,

    /// Minimum text length to consider PDF as text-based.
    pub min_text_length: usize,
}

impl Default for PdfConfig {
    fn default() -> Self {
        Self {
            max_pages: 0,
            min_text_length: 50,
        }
    }
}

/// Line reconstruction configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NormalizerConfig {
    /// Vertical distance above which two fragments belong to different rows.
    pub row_tolerance: f32,
}

impl Default for NormalizerConfig {
    fn default() -> Self {
        Self { row_tolerance: 5.0 }
    }
}

/// Transaction extraction configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Primary results below this count trigger the fallback strategy.
    pub min_primary_records: usize,

    /// Direction for rows with one amount and no direction keyword.
    pub single_amount_default: Direction,

    /// Description used when a row yields no text.
    pub description_placeholder: String,

    /// Merchant used when the description is empty.
    pub merchant_placeholder: String,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            min_primary_records: 2,
            single_amount_default: Direction::Credit,
            description_placeholder: "Unknown Transaction".to_string(),
            merchant_placeholder: "Unknown Merchant".to_string(),
        }
    }
}

impl RupaiyaConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &std::path::Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content)
            .map_err(|e| RupaiyaError::Config(format!("{}: {}", path.display(), e)))
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &std::path::Path) -> Result<()> {
        let content =
            serde_json::to_string_pretty(self).map_err(|e| RupaiyaError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }
}
