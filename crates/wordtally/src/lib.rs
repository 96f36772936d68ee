//! wordtally - word counting for mixed Chinese/Latin documents
//!
//! wordtally extracts the readable text of `.docx`, `.pdf`, `.txt` and `.md` files
//! and counts it with a rule suited to estimating editorial or translation work:
//! every CJK ideograph is one word, and every whitespace-delimited run of other
//! characters is one more.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use wordtally::{process_batch_sync, scan_folder, TallyConfig};
//!
//! # fn main() -> wordtally::Result<()> {
//! let config = TallyConfig::default();
//! let files = scan_folder("manuscripts", &config)?;
//! let batch = process_batch_sync(files, &config)?;
//! for row in &batch.results {
//!     println!("{}\t{}\t{}", row.filename, row.count, row.status);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Architecture
//!
//! - **Core Module** (`core`): format dispatch, batch orchestration, folder scanning, config loading
//! - **Extractors** (`extractors`): one text extractor per supported format
//! - **Text** (`text`): encoding recovery and the word counting rule
//!
//! A single unreadable file never fails a batch. It is reported as a row with a
//! count of zero and a `failure: <reason>` status.

#![deny(unsafe_code)]

pub mod core;
pub mod error;
pub mod extractors;
pub mod text;
pub mod types;

pub use error::{Result, TallyError};
pub use types::*;

pub use core::batch::{process_batch, process_batch_sync};
pub use core::config::TallyConfig;
pub use core::dispatch::process_file;
pub use core::formats::{DocumentFormat, SUPPORTED_EXTENSIONS};
pub use core::io::{is_lock_file, is_supported_file, normalize_folder_input, scan_folder};

pub use text::{count_words, resolve};
