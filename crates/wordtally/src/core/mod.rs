//! Pipeline orchestration.
//!
//! - **Formats**: the closed registry mapping extensions to extractors
//! - **Dispatch**: processing of a single file into a [`FileResult`](crate::types::FileResult)
//! - **Batch**: concurrent processing of many files with per-file failure containment
//! - **I/O**: folder scanning and input normalization
//! - **Configuration**: loading and discovering [`TallyConfig`]
//!
//! # Example
//!
//! ```rust,no_run
//! use wordtally::core::{io, batch};
//! use wordtally::TallyConfig;
//!
//! # async fn example() -> wordtally::Result<()> {
//! let config = TallyConfig::default();
//! let files = io::scan_folder(io::normalize_folder_input("\"./manuscripts\""), &config)?;
//! let batch = batch::process_batch(files, &config).await?;
//! println!("{} files, {} words", batch.count, batch.total_count());
//! # Ok(())
//! # }
//! ```

pub mod batch;
pub mod config;
pub mod dispatch;
pub mod formats;
pub mod io;

pub use batch::{process_batch, process_batch_sync};
pub use config::TallyConfig;
pub use dispatch::process_file;
pub use formats::{DocumentFormat, SUPPORTED_EXTENSIONS};
pub use io::{is_lock_file, is_supported_file, normalize_folder_input, scan_folder};
