//! PDF text extraction using lopdf and pdf-extract.

use lopdf::{Document, Object};
use tracing::{debug, trace, warn};

use super::{PdfProcessor, PdfType, Result, TextExtractor};
use crate::error::PdfError;
use crate::models::config::PdfConfig;
use crate::text::PageText;

/// PDF content extractor using lopdf.
pub struct PdfExtractor {
    document: Option<Document>,
    raw_data: Vec<u8>,
    /// Maximum pages to read (0 = unlimited).
    max_pages: usize,
    /// Minimum text length to consider the PDF text-based.
    min_text_length: usize,
}

impl PdfExtractor {
    /// Create a new PDF extractor.
    pub fn new() -> Self {
        Self::with_config(&PdfConfig::default())
    }

    pub fn with_config(config: &PdfConfig) -> Self {
        Self {
            document: None,
            raw_data: Vec::new(),
            max_pages: config.max_pages,
            min_text_length: config.min_text_length,
        }
    }

    fn document(&self) -> Result<&Document> {
        self.document
            .as_ref()
            .ok_or_else(|| PdfError::Parse("No document loaded".to_string()))
    }

    /// Page numbers to read, honouring `max_pages`.
    fn page_numbers(&self) -> Vec<u32> {
        let count = self.page_count();
        let limit = if self.max_pages == 0 {
            count
        } else {
            count.min(self.max_pages as u32)
        };
        (1..=limit).collect()
    }

    /// Text of every page in page order. Falls back to pdf-extract's
    /// whole-document text when lopdf yields nothing.
    pub fn page_texts(&self) -> Result<Vec<PageText>> {
        self.document()?;

        let mut pages = Vec::new();
        for page in self.page_numbers() {
            let text = match self.extract_page_text(page) {
                Ok(text) => text,
                Err(e) => {
                    warn!("Failed to extract text from page {}: {}", page, e);
                    String::new()
                }
            };
            trace!("Page {}: {} chars", page, text.len());
            pages.push(PageText::Plain(text));
        }

        if pages.iter().all(PageText::is_blank) {
            debug!("lopdf produced no text, falling back to pdf-extract");
            let text = self.extract_text()?;
            return Ok(vec![PageText::Plain(text)]);
        }

        Ok(pages)
    }

    fn classify(&self, pages: &[PageText]) -> PdfType {
        let text_len: usize = pages.iter().map(page_len).sum();
        let images = self.count_images();

        let pdf_type = if text_len > self.min_text_length {
            PdfType::Text
        } else if images > 0 {
            PdfType::Image
        } else {
            PdfType::Empty
        };

        debug!(
            "PDF analysis: {} chars text, {} images -> {:?}",
            text_len, images, pdf_type
        );
        pdf_type
    }

    fn count_images(&self) -> usize {
        let Ok(doc) = self.document() else {
            return 0;
        };

        doc.objects
            .values()
            .filter(|object| is_image_xobject(object))
            .count()
    }
}

impl Default for PdfExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl PdfProcessor for PdfExtractor {
    fn load(&mut self, data: &[u8]) -> Result<()> {
        let mut doc = Document::load_mem(data).map_err(|e| PdfError::Parse(e.to_string()))?;

        // Handle PDFs with empty password encryption
        if doc.is_encrypted() {
            if doc.decrypt("").is_err() {
                return Err(PdfError::Encrypted);
            }
            debug!("Decrypted PDF with empty password");

            // pdf_extract needs the decrypted bytes
            let mut decrypted_data = Vec::new();
            doc.save_to(&mut decrypted_data)
                .map_err(|e| PdfError::Parse(format!("Failed to save decrypted PDF: {}", e)))?;
            self.raw_data = decrypted_data;
        } else {
            self.raw_data = data.to_vec();
        }

        let page_count = doc.get_pages().len();
        if page_count == 0 {
            return Err(PdfError::NoPages);
        }

        debug!("Loaded PDF with {} pages", page_count);
        self.document = Some(doc);
        Ok(())
    }

    fn page_count(&self) -> u32 {
        self.document
            .as_ref()
            .map(|doc| doc.get_pages().len() as u32)
            .unwrap_or(0)
    }

    /// Reads every page once and classifies the result.
    fn text_layer(&self) -> Result<Vec<PageText>> {
        let pages = self.page_texts()?;
        match self.classify(&pages) {
            PdfType::Text => Ok(pages),
            PdfType::Image | PdfType::Empty => Err(PdfError::NoTextLayer {
                images: self.count_images(),
            }),
        }
    }

    fn extract_text(&self) -> Result<String> {
        pdf_extract::extract_text_from_mem(&self.raw_data)
            .map_err(|e| PdfError::TextExtraction(e.to_string()))
    }

    fn extract_page_text(&self, page: u32) -> Result<String> {
        let doc = self.document()?;
        if !doc.get_pages().contains_key(&page) {
            return Err(PdfError::InvalidPage(page));
        }

        doc.extract_text(&[page])
            .map_err(|e| PdfError::TextExtraction(e.to_string()))
    }
}

impl TextExtractor for PdfExtractor {
    /// Loads a fresh document per call; `self` only supplies the limits.
    fn extract_pages(&self, data: &[u8]) -> Result<Vec<PageText>> {
        let mut loaded = PdfExtractor {
            document: None,
            raw_data: Vec::new(),
            max_pages: self.max_pages,
            min_text_length: self.min_text_length,
        };
        loaded.load(data)?;

        let pages = loaded.page_texts()?;
        debug!("Extracted text from {} pages", pages.len());
        Ok(pages)
    }
}

fn is_image_xobject(object: &Object) -> bool {
    let Object::Stream(stream) = object else {
        return false;
    };
    stream
        .dict
        .get(b"Subtype")
        .and_then(|subtype| subtype.as_name())
        .map(|name| name == b"Image")
        .unwrap_or(false)
}

fn page_len(page: &PageText) -> usize {
    match page {
        PageText::Plain(text) => text.trim().len(),
        PageText::Positioned(fragments) => fragments.iter().map(|f| f.text.len()).sum(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::text::TextFragment;

    #[test]
    fn test_pdf_extractor_new() {
        let extractor = PdfExtractor::new();
        assert!(extractor.document.is_none());
        assert_eq!(extractor.page_count(), 0);
    }

    #[test]
    fn test_text_layer_keeps_pdf_errors() {
        let extractor = PdfExtractor::new();
        let err = crate::error::RupaiyaError::from(extractor.text_layer().unwrap_err());
        assert!(matches!(err, crate::error::RupaiyaError::Pdf(PdfError::Parse(_))));
        assert!(err.to_string().contains("valid, unencrypted PDF"));
    }

    #[test]
    fn test_classify_by_text_length() {
        let extractor = PdfExtractor::with_config(&PdfConfig {
            min_text_length: 10,
            ..Default::default()
        });
        let blank = vec![PageText::Plain("  ".to_string()), PageText::Plain("short".to_string())];
        assert_eq!(extractor.classify(&blank), PdfType::Empty);

        let text = vec![
            PageText::Plain("Tran Date Particulars".to_string()),
            PageText::Positioned(vec![TextFragment::new("12-03-2024", 0.0, 0.0)]),
        ];
        assert_eq!(extractor.classify(&text), PdfType::Text);
    }

    #[test]
    fn test_garbage_is_parse_error() {
        let mut extractor = PdfExtractor::new();
        let err = extractor.load(b"definitely not a pdf").unwrap_err();
        assert!(matches!(err, PdfError::Parse(_)));

        let err = PdfExtractor::new().extract_pages(b"%PDF-garbage").unwrap_err();
        assert!(matches!(err, PdfError::Parse(_)));
    }

    #[test]
    fn test_page_text_requires_document() {
        let extractor = PdfExtractor::new();
        assert!(matches!(extractor.extract_page_text(1), Err(PdfError::Parse(_))));
    }

    #[test]
    fn test_max_pages_from_config() {
        let extractor = PdfExtractor::with_config(&PdfConfig {
            max_pages: 3,
            ..Default::default()
        });
        assert_eq!(extractor.max_pages, 3);
        assert!(extractor.page_numbers().is_empty());
    }
}
