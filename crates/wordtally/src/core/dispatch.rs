//! Single-file processing: format dispatch, extraction and counting.
//!
//! [`process_file`] is total. Every problem with an individual file, from an
//! unknown extension to a corrupt container or a panicking parser, is rendered
//! into the returned [`FileResult`] instead of being propagated.

use crate::core::formats::DocumentFormat;
use crate::core::io;
use crate::error::{Result, TallyError};
use crate::extractors::TextExtractor;
use crate::text::count_words;
use crate::types::{FileResult, SourceContent, SourceFile};
use std::any::Any;
use std::borrow::Cow;
use std::panic::{self, AssertUnwindSafe};

/// Extract and count one file.
///
/// Unsupported extensions fail without the content being read.
pub fn process_file(file: &SourceFile) -> FileResult {
    let file_type = file.extension();

    let Some(format) = DocumentFormat::from_extension(&file_type) else {
        tracing::warn!(filename = %file.filename, "Unsupported format");
        return FileResult::failure(&file.filename, file_type.clone(), TallyError::UnsupportedFormat(file_type));
    };

    let content: Cow<'_, [u8]> = match &file.content {
        SourceContent::Bytes(bytes) => Cow::Borrowed(bytes.as_slice()),
        SourceContent::Path(path) => match io::read_file_sync(path) {
            Ok(bytes) => Cow::Owned(bytes),
            Err(e) => {
                tracing::warn!(filename = %file.filename, error = %e, "Failed to read file");
                return FileResult::failure(&file.filename, file_type, e);
            }
        },
    };

    let extractor = format.extractor();
    match extract_guarded(extractor, &content) {
        Ok(text) => {
            let count = count_words(&text);
            tracing::debug!(
                filename = %file.filename,
                extractor = extractor.name(),
                count,
                "Counted file"
            );
            FileResult::success(&file.filename, file_type, count)
        }
        Err(e) if e.is_per_file() => {
            tracing::warn!(
                filename = %file.filename,
                extractor = extractor.name(),
                error = %e,
                "Extraction failed"
            );
            FileResult::failure(&file.filename, file_type, e)
        }
        Err(e) => {
            tracing::error!(
                filename = %file.filename,
                extractor = extractor.name(),
                error = ?e,
                "Unexpected error during extraction"
            );
            FileResult::failure(&file.filename, file_type, e)
        }
    }
}

/// Run an extractor, turning a panic inside a parser into an error.
fn extract_guarded(extractor: &dyn TextExtractor, content: &[u8]) -> Result<String> {
    panic::catch_unwind(AssertUnwindSafe(|| extractor.extract(content))).unwrap_or_else(|payload| {
        Err(TallyError::Other(format!(
            "extraction task failed: {}",
            panic_message(&*payload)
        )))
    })
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(message) = payload.downcast_ref::<&str>() {
        *message
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.as_str()
    } else {
        "panic"
    }
}
