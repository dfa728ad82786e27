//! PDF text extraction using lopdf and pdf-extract.

use lopdf::Document;
use tracing::{debug, warn};

use super::{PdfProcessor, PdfType, Result};
use crate::error::PdfError;

/// Minimum number of non-whitespace characters for a document to count as
/// having a text layer.
const MIN_TEXT_CHARS: usize = 50;

/// PDF content extractor using lopdf.
pub struct PdfExtractor {
    document: Option<Document>,
    raw_data: Vec<u8>,
}

/// Extracted content from a PDF.
#[derive(Debug, Clone)]
pub struct PdfContent {
    /// Type of PDF content.
    pub pdf_type: PdfType,
    /// Text of all pages joined by newlines.
    pub text: String,
    /// Pages with their content.
    pub pages: Vec<PdfPage>,
}

/// Content from a single PDF page.
#[derive(Debug, Clone)]
pub struct PdfPage {
    /// Page number (1-indexed).
    pub number: u32,
    /// Extracted text from this page.
    pub text: String,
}

impl PdfContent {
    /// Build content from already-extracted page texts, in page order.
    pub fn from_pages<I, S>(pages: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let pages: Vec<PdfPage> = pages
            .into_iter()
            .enumerate()
            .map(|(i, text)| PdfPage {
                number: i as u32 + 1,
                text: text.into(),
            })
            .collect();

        let text = pages
            .iter()
            .map(|p| p.text.as_str())
            .filter(|t| !t.trim().is_empty())
            .collect::<Vec<_>>()
            .join("\n");

        let text_chars = text.chars().filter(|c| !c.is_whitespace()).count();
        let pdf_type = if text_chars >= MIN_TEXT_CHARS {
            PdfType::Text
        } else {
            PdfType::Empty
        };

        Self {
            pdf_type,
            text,
            pages,
        }
    }

    /// Text of the first page that has any text at all.
    pub fn first_text_page(&self) -> Option<&str> {
        self.pages
            .iter()
            .map(|p| p.text.as_str())
            .find(|t| !t.trim().is_empty())
    }
}

impl PdfExtractor {
    /// Create a new PDF extractor.
    pub fn new() -> Self {
        Self {
            document: None,
            raw_data: Vec::new(),
        }
    }

    /// Per-page text of the loaded document.
    pub fn page_texts(&self) -> Result<Vec<String>> {
        if self.document.is_none() {
            return Err(PdfError::Parse("No document loaded".to_string()));
        }
        pdf_extract::extract_text_from_mem_by_pages(&self.raw_data)
            .map_err(|e| PdfError::TextExtraction(e.to_string()))
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

        // Portal downloads are sometimes encrypted with an empty user password
        if doc.is_encrypted() {
            if doc.decrypt("").is_err() {
                return Err(PdfError::Encrypted);
            }
            debug!("Decrypted PDF with empty password");

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

    /// Extract all page content from the loaded PDF.
    ///
    /// A document whose text layer cannot be decoded yields empty pages
    /// rather than an error, so the extractors downstream fall back to
    /// their defaults.
    fn extract_all(&self) -> Result<PdfContent> {
        let page_count = self.page_count();
        if page_count == 0 {
            return Err(PdfError::NoPages);
        }

        let texts = match self.page_texts() {
            Ok(texts) => texts,
            Err(PdfError::TextExtraction(msg)) => {
                warn!("No usable text layer: {}", msg);
                vec![String::new(); page_count as usize]
            }
            Err(e) => return Err(e),
        };

        let content = PdfContent::from_pages(texts);
        debug!(
            "PDF analysis: {} pages, {} chars text -> {:?}",
            page_count,
            content.text.len(),
            content.pdf_type
        );

        Ok(content)
    }
}
