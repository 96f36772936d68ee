//! Supported document formats and the extension registry.
//!
//! The set of formats is closed: each [`DocumentFormat`] variant owns exactly one
//! built-in extractor, and extensions are matched case-insensitively.
//!
//! ```rust
//! use wordtally::core::formats::DocumentFormat;
//!
//! assert_eq!(DocumentFormat::from_extension(".PDF"), Some(DocumentFormat::Pdf));
//! assert_eq!(DocumentFormat::from_extension(".rtf"), None);
//! ```

use crate::extractors::{DocxExtractor, MarkdownExtractor, PdfExtractor, PlainTextExtractor, TextExtractor};

/// Extensions accepted by folder scans, including the leading dot.
pub const SUPPORTED_EXTENSIONS: &[&str] = &[".docx", ".pdf", ".txt", ".md"];

static DOCX: DocxExtractor = DocxExtractor;
static PDF: PdfExtractor = PdfExtractor;
static PLAIN_TEXT: PlainTextExtractor = PlainTextExtractor;
static MARKDOWN: MarkdownExtractor = MarkdownExtractor;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DocumentFormat {
    Docx,
    Pdf,
    PlainText,
    Markdown,
}

impl DocumentFormat {
    pub const ALL: [DocumentFormat; 4] = [
        DocumentFormat::Docx,
        DocumentFormat::Pdf,
        DocumentFormat::PlainText,
        DocumentFormat::Markdown,
    ];

    /// Look up a format by extension. The leading dot is optional.
    pub fn from_extension(extension: &str) -> Option<Self> {
        let extension = extension.trim_start_matches('.').to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|format| format.extractor().extensions().contains(&extension.as_str()))
    }

    /// Look up a format from a file name.
    pub fn from_filename(filename: &str) -> Option<Self> {
        Self::from_extension(&crate::types::file_extension(filename))
    }

    pub fn extractor(self) -> &'static dyn TextExtractor {
        match self {
            DocumentFormat::Docx => &DOCX,
            DocumentFormat::Pdf => &PDF,
            DocumentFormat::PlainText => &PLAIN_TEXT,
            DocumentFormat::Markdown => &MARKDOWN,
        }
    }
}

/// Whether `filename` has one of the [`SUPPORTED_EXTENSIONS`].
pub fn is_supported_file(filename: &str) -> bool {
    DocumentFormat::from_filename(filename).is_some()
}
