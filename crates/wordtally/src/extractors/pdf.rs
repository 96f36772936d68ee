//! PDF text extraction with lopdf.
//!
//! Pages are read one at a time in page order. A page whose content stream
//! cannot be interpreted, or which carries no text layer (scanned images),
//! contributes nothing; only a document lopdf cannot load fails the file.

use crate::Result;
use crate::extractors::TextExtractor;
use lopdf::Document;

#[derive(Debug, Default, Clone, Copy)]
pub struct PdfExtractor;

impl PdfExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl TextExtractor for PdfExtractor {
    fn name(&self) -> &str {
        "pdf-extractor"
    }

    fn extensions(&self) -> &[&str] {
        &["pdf"]
    }

    fn extract(&self, content: &[u8]) -> Result<String> {
        let document = Document::load_mem(content)?;
        let pages = document.get_pages();

        let mut texts = Vec::with_capacity(pages.len());
        for page_number in pages.keys() {
            match document.extract_text(&[*page_number]) {
                Ok(text) => {
                    let text = text.trim();
                    if !text.is_empty() {
                        texts.push(text.to_string());
                    }
                }
                Err(e) => {
                    tracing::debug!(page = page_number, error = %e, "Skipping unreadable PDF page");
                }
            }
        }

        tracing::debug!(pages = pages.len(), pages_with_text = texts.len(), "Extracted PDF text");
        Ok(texts.join("\n"))
    }
}
