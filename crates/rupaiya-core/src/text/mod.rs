//! Page text representation and line reconstruction.

mod normalizer;

pub use normalizer::{LineNormalizer, collapse_whitespace};

use serde::{Deserialize, Serialize};

/// A piece of text placed on a page.
///
/// `y` grows upwards (PDF user space), so larger `y` means higher on the page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextFragment {
    pub text: String,
    pub x: f32,
    pub y: f32,
}

impl TextFragment {
    pub fn new(text: impl Into<String>, x: f32, y: f32) -> Self {
        Self {
            text: text.into(),
            x,
            y,
        }
    }
}

/// Text recovered from one page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PageText {
    /// Flat text with newlines, no coordinates.
    Plain(String),
    /// Positioned fragments in arbitrary order.
    Positioned(Vec<TextFragment>),
}

impl PageText {
    /// True when the page carries no visible text.
    pub fn is_blank(&self) -> bool {
        match self {
            PageText::Plain(text) => text.trim().is_empty(),
            PageText::Positioned(fragments) => fragments.iter().all(|f| f.text.trim().is_empty()),
        }
    }
}
