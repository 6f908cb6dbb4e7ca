//! Error types for the rupaiya-core library.

use thiserror::Error;

/// Main error type for the rupaiya library.
#[derive(Error, Debug)]
pub enum RupaiyaError {
    /// The input is not a PDF document.
    #[error("invalid input format: expected application/pdf, got {mime:?}")]
    InvalidInputFormat { mime: String },

    /// Text-layer extraction from the document failed.
    #[error("PDF error: {0} (check that the file is a valid, unencrypted PDF)")]
    Pdf(#[from] PdfError),

    /// Transaction extraction error.
    #[error("extraction error: {0}")]
    Extraction(#[from] ExtractionError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Errors related to PDF processing.
#[derive(Error, Debug)]
pub enum PdfError {
    /// Failed to open/parse the PDF file.
    #[error("failed to parse PDF: {0}")]
    Parse(String),

    /// Failed to extract text from PDF.
    #[error("failed to extract text: {0}")]
    TextExtraction(String),

    /// The PDF is encrypted and cannot be processed.
    #[error("PDF is encrypted")]
    Encrypted,

    /// The PDF is empty or has no pages.
    #[error("PDF has no pages")]
    NoPages,

    /// Invalid page number requested.
    #[error("invalid page number: {0}")]
    InvalidPage(u32),

    /// The document has no usable text layer (scanned or blank).
    #[error("no text layer found ({images} embedded images)")]
    NoTextLayer { images: usize },
}

/// Errors related to transaction extraction.
#[derive(Error, Debug)]
pub enum ExtractionError {
    /// Every strategy ran over readable text and none produced a record.
    #[error("no transactions found: unsupported statement format")]
    NoTransactionsFound,

    /// A strategy could not run at all.
    #[error("strategy {name} failed: {reason}")]
    Strategy { name: String, reason: String },
}

impl RupaiyaError {
    /// True when the document was readable but no heuristic recognised it.
    pub fn is_unsupported_format(&self) -> bool {
        matches!(
            self,
            RupaiyaError::Extraction(ExtractionError::NoTransactionsFound)
        )
    }
}

/// Result type for the rupaiya library.
pub type Result<T> = std::result::Result<T, RupaiyaError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pdf_error_mentions_integrity_hint() {
        let err = RupaiyaError::from(PdfError::TextExtraction("bad xref".to_string()));
        let msg = err.to_string();
        assert!(msg.contains("bad xref"));
        assert!(msg.contains("valid, unencrypted PDF"));
    }

    #[test]
    fn test_unsupported_format_is_distinct_from_pdf_failure() {
        let none = RupaiyaError::from(ExtractionError::NoTransactionsFound);
        assert!(none.is_unsupported_format());

        let broken = RupaiyaError::from(PdfError::NoPages);
        assert!(!broken.is_unsupported_format());
    }
}
