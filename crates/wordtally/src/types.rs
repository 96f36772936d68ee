//! Input and result types shared by the pipeline.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Status string of a file whose text was extracted and counted.
pub const SUCCESS_STATUS: &str = "success";

/// Prefix of the status string of a file that could not be processed.
pub const FAILURE_PREFIX: &str = "failure: ";

/// Where a [`SourceFile`]'s bytes come from.
#[derive(Debug, Clone)]
pub enum SourceContent {
    /// Content already held in memory (uploads, tests).
    Bytes(Vec<u8>),
    /// Content read from disk when the file is processed.
    Path(PathBuf),
}

/// One input of a batch.
///
/// `filename` is used for extension detection and display; it need not match the
/// name on disk for path-backed files.
#[derive(Debug, Clone)]
pub struct SourceFile {
    pub filename: String,
    pub content: SourceContent,
}

impl SourceFile {
    /// Wrap in-memory content under the given display name.
    pub fn from_bytes(filename: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            filename: filename.into(),
            content: SourceContent::Bytes(bytes.into()),
        }
    }

    /// Reference a file on disk. Its bytes are read once, by the worker that processes it.
    pub fn from_path(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        let filename = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.to_string_lossy().into_owned());

        Self {
            filename,
            content: SourceContent::Path(path.to_path_buf()),
        }
    }

    /// Wrap uploaded content. Folder uploads declare names such as `dir/sub/a.txt`;
    /// only the last path component is kept.
    pub fn from_upload(declared_name: &str, bytes: impl Into<Vec<u8>>) -> Self {
        let filename = declared_name.rsplit(['/', '\\']).next().unwrap_or(declared_name);
        Self::from_bytes(filename, bytes)
    }

    /// Lowercased extension including the leading dot, or an empty string.
    pub fn extension(&self) -> String {
        file_extension(&self.filename)
    }
}

/// Lowercased extension of `filename` including the leading dot (`"report.PDF"` -> `".pdf"`).
///
/// Names without a dot, and dotfiles such as `.profile`, have no extension.
pub fn file_extension(filename: &str) -> String {
    let name = filename.rsplit(['/', '\\']).next().unwrap_or(filename);
    match name.rfind('.') {
        Some(idx) if idx > 0 && idx + 1 < name.len() => name[idx..].to_lowercase(),
        _ => String::new(),
    }
}

/// The outcome for one input file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileResult {
    pub filename: String,
    pub file_type: String,
    pub count: u64,
    pub status: String,
}

impl FileResult {
    pub fn success(filename: impl Into<String>, file_type: impl Into<String>, count: u64) -> Self {
        Self {
            filename: filename.into(),
            file_type: file_type.into(),
            count,
            status: SUCCESS_STATUS.to_string(),
        }
    }

    /// A failed file always reports a count of zero.
    pub fn failure(filename: impl Into<String>, file_type: impl Into<String>, reason: impl std::fmt::Display) -> Self {
        Self {
            filename: filename.into(),
            file_type: file_type.into(),
            count: 0,
            status: format!("{}{}", FAILURE_PREFIX, reason),
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == SUCCESS_STATUS
    }

    /// The human-readable reason of a failed file.
    pub fn failure_reason(&self) -> Option<&str> {
        self.status.strip_prefix(FAILURE_PREFIX)
    }
}

/// Aggregate of one batch, sorted by filename.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchResult {
    pub results: Vec<FileResult>,
    pub count: usize,
}

impl BatchResult {
    /// Sort `results` by filename (byte-wise) and record their number.
    pub fn from_results(mut results: Vec<FileResult>) -> Self {
        results.sort_by(|a, b| a.filename.cmp(&b.filename));
        let count = results.len();
        Self { results, count }
    }

    /// Sum of the counts of all files.
    pub fn total_count(&self) -> u64 {
        self.results.iter().map(|r| r.count).sum()
    }

    pub fn success_count(&self) -> usize {
        self.results.iter().filter(|r| r.is_success()).count()
    }

    pub fn failure_count(&self) -> usize {
        self.count - self.success_count()
    }
}
