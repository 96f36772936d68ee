//! Built-in text extractors.
//!
//! Each extractor turns the complete bytes of one file into a single flat text
//! blob. Extraction is all-or-nothing: an extractor returns everything it could
//! read, or an error for the whole file.

use crate::Result;

pub mod docx;
pub mod markdown;
pub mod pdf;
pub mod text;

pub use docx::DocxExtractor;
pub use markdown::MarkdownExtractor;
pub use pdf::PdfExtractor;
pub use text::PlainTextExtractor;

/// Capability shared by all format extractors.
pub trait TextExtractor: Send + Sync {
    /// Stable identifier used in logs.
    fn name(&self) -> &str;

    /// Handled extensions, lowercase and without the leading dot.
    fn extensions(&self) -> &[&str];

    /// Extract all readable text from `content`.
    fn extract(&self, content: &[u8]) -> Result<String>;
}
