//! Plain text extractor.

use crate::Result;
use crate::extractors::TextExtractor;
use crate::text::encoding;

/// Plain text extractor.
///
/// Extracts content from plain text files (.txt), recovering the encoding with
/// [`encoding::resolve`].
#[derive(Debug, Default, Clone, Copy)]
pub struct PlainTextExtractor;

impl PlainTextExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl TextExtractor for PlainTextExtractor {
    fn name(&self) -> &str {
        "plain-text-extractor"
    }

    fn extensions(&self) -> &[&str] {
        &["txt"]
    }

    #[tracing::instrument(skip(self, content), fields(content.size_bytes = content.len()))]
    fn extract(&self, content: &[u8]) -> Result<String> {
        let decoded = encoding::resolve(content)?;
        if let Some(label) = decoded.encoding {
            tracing::debug!(encoding = label, "Decoded plain text");
        }
        Ok(decoded.text)
    }
}
