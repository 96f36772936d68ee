//! Error types for wordtally.
//!
//! Every fallible operation in the crate returns [`TallyError`]. The variants fall
//! into two groups:
//!
//! **Per-file errors** never leave the dispatcher. They are rendered into the
//! `status` column of a [`FileResult`](crate::types::FileResult):
//! - `Parsing` - the format-specific parser rejected the file (corrupt container, bad XML)
//! - `EncodingUnresolved` - no candidate encoding could decode a plain-text file
//! - `UnsupportedFormat` - the extension is not registered
//! - `Timeout` - extraction exceeded the configured per-file deadline
//!
//! **Batch-level errors** are returned to the caller of the batch API:
//! - `NoValidFiles` - empty input, or nothing qualified after filtering
//! - `Validation` - bad folder path or configuration value
//! - `Io` - system errors while scanning or loading configuration (always bubble up)
//!
//! # Example
//!
//! ```rust
//! use wordtally::{TallyError, Result};
//!
//! fn load(path: &str) -> Result<Vec<u8>> {
//!     let bytes = std::fs::read(path)?;
//!     if bytes.is_empty() {
//!         return Err(TallyError::validation(format!("File is empty: {}", path)));
//!     }
//!     Ok(bytes)
//! }
//! ```
use thiserror::Error;

/// Result type alias using `TallyError`.
pub type Result<T> = std::result::Result<T, TallyError>;

/// Main error type for all wordtally operations.
#[derive(Debug, Error)]
pub enum TallyError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{message}")]
    Parsing {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("encoding undetectable")]
    EncodingUnresolved,

    #[error("unsupported format {0}")]
    UnsupportedFormat(String),

    #[error("Validation error: {message}")]
    Validation {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("Serialization error: {message}")]
    Serialization {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("no valid files: {0}")]
    NoValidFiles(String),

    #[error("extraction timed out after {seconds}s")]
    Timeout { seconds: u64 },

    #[error("{0}")]
    Other(String),
}

impl From<serde_json::Error> for TallyError {
    fn from(err: serde_json::Error) -> Self {
        TallyError::Serialization {
            message: err.to_string(),
            source: Some(Box::new(err)),
        }
    }
}

impl From<toml::de::Error> for TallyError {
    fn from(err: toml::de::Error) -> Self {
        TallyError::Serialization {
            message: err.to_string(),
            source: Some(Box::new(err)),
        }
    }
}

impl From<zip::result::ZipError> for TallyError {
    fn from(err: zip::result::ZipError) -> Self {
        TallyError::Parsing {
            message: format!("DOCX container could not be opened: {}", err),
            source: Some(Box::new(err)),
        }
    }
}

impl From<roxmltree::Error> for TallyError {
    fn from(err: roxmltree::Error) -> Self {
        TallyError::Parsing {
            message: format!("DOCX XML is malformed: {}", err),
            source: Some(Box::new(err)),
        }
    }
}

impl From<lopdf::Error> for TallyError {
    fn from(err: lopdf::Error) -> Self {
        TallyError::Parsing {
            message: format!("Invalid PDF: {}", err),
            source: None,
        }
    }
}

macro_rules! error_constructor {
    ($name:ident, $variant:ident) => {
        pastey::paste! {
            #[doc = "Create a " $variant " error"]
            pub fn $name<S: Into<String>>(message: S) -> Self {
                Self::$variant {
                    message: message.into(),
                    source: None,
                }
            }

            #[doc = "Create a " $variant " error with source"]
            pub fn [<$name _with_source>]<S: Into<String>, E: std::error::Error + Send + Sync + 'static>(
                message: S,
                source: E,
            ) -> Self {
                Self::$variant {
                    message: message.into(),
                    source: Some(Box::new(source)),
                }
            }
        }
    };
}

impl TallyError {
    error_constructor!(parsing, Parsing);
    error_constructor!(validation, Validation);
    error_constructor!(serialization, Serialization);

    /// Whether this error describes a single file rather than the whole batch.
    pub fn is_per_file(&self) -> bool {
        matches!(
            self,
            TallyError::Parsing { .. }
                | TallyError::EncodingUnresolved
                | TallyError::UnsupportedFormat(_)
                | TallyError::Timeout { .. }
        )
    }
}
