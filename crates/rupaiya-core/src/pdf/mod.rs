//! PDF text layer.
//!
//! The statement pipeline only depends on [`TextExtractor`]; [`PdfExtractor`]
//! is the lopdf-backed implementation. A scanned-document (OCR) extractor can
//! implement the same trait.

mod extractor;

pub use extractor::PdfExtractor;

use crate::error::{PdfError, RupaiyaError};
use crate::text::PageText;

/// The only MIME type accepted at the input boundary.
pub const PDF_MIME: &str = "application/pdf";

/// Type of PDF content.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PdfType {
    /// Contains extractable text.
    Text,
    /// Contains only images (scanned statement).
    Image,
    /// Empty or unreadable.
    Empty,
}

/// Result type for PDF operations.
pub type Result<T> = std::result::Result<T, PdfError>;

/// Capability the statement pipeline needs from a document reader.
pub trait TextExtractor {
    /// Extract text page by page, in page order.
    fn extract_pages(&self, data: &[u8]) -> Result<Vec<PageText>>;
}

/// Trait for PDF processing implementations.
pub trait PdfProcessor {
    /// Load a PDF from bytes.
    fn load(&mut self, data: &[u8]) -> Result<()>;

    /// Get the number of pages in the PDF.
    fn page_count(&self) -> u32;

    /// Page text of a document with a text layer; scanned or blank
    /// documents are an error.
    fn text_layer(&self) -> Result<Vec<PageText>>;

    /// Extract text from the entire PDF.
    fn extract_text(&self) -> Result<String>;

    /// Extract text from a specific page (1-indexed).
    fn extract_page_text(&self, page: u32) -> Result<String>;
}

/// Check the declared MIME type. No content sniffing.
pub fn validate_mime(mime: &str) -> std::result::Result<(), RupaiyaError> {
    if mime == PDF_MIME {
        Ok(())
    } else {
        Err(RupaiyaError::InvalidInputFormat {
            mime: mime.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_mime() {
        assert!(validate_mime("application/pdf").is_ok());

        let err = validate_mime("image/png").unwrap_err();
        assert!(matches!(err, RupaiyaError::InvalidInputFormat { ref mime } if mime == "image/png"));

        // Exact equality only.
        assert!(validate_mime("Application/PDF").is_err());
        assert!(validate_mime("application/pdf; charset=binary").is_err());
    }
}
