//! Batch entry points.
//!
//! Files are processed on tokio's blocking pool. A semaphore bounds how many run
//! at once, each file can be given a deadline, and the results are always
//! returned sorted by filename regardless of completion order.

use crate::core::config::TallyConfig;
use crate::core::dispatch::process_file;
use crate::error::TallyError;
use crate::types::{BatchResult, FileResult, SourceFile};
use crate::Result;
use once_cell::sync::Lazy;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};
use tokio::task::JoinSet;

/// Global Tokio runtime for synchronous operations.
///
/// Lazily initialized on first use and shared by all sync wrappers. Creation only
/// fails when the process cannot spawn threads at all.
static GLOBAL_RUNTIME: Lazy<tokio::runtime::Runtime> = Lazy::new(|| {
    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .expect("Failed to create global Tokio runtime - system may be out of resources")
});

/// Process a batch of files and aggregate the results.
///
/// At most `config.concurrency()` files are extracted at the same time. When
/// `config.file_timeout_secs` is set, a file still running after the deadline
/// is reported as timed out. The abandoned extraction finishes in the background
/// and its output is discarded, but it keeps its concurrency slot until it
/// returns.
///
/// # Errors
///
/// - `TallyError::NoValidFiles` if `files` is empty
/// - `TallyError::Validation` if `config` is invalid
///
/// Problems with individual files never fail the batch; they become failure rows.
#[tracing::instrument(skip(files, config), fields(batch_size = files.len()))]
pub async fn process_batch(files: Vec<SourceFile>, config: &TallyConfig) -> Result<BatchResult> {
    if files.is_empty() {
        return Err(TallyError::NoValidFiles("no files were provided".to_string()));
    }
    config.validate()?;

    let semaphore = Arc::new(Semaphore::new(config.concurrency()));
    let timeout = config.file_timeout_secs;
    let mut tasks = JoinSet::new();

    for file in files {
        let semaphore = Arc::clone(&semaphore);

        tasks.spawn(async move {
            let permit = semaphore.acquire_owned().await.ok();
            run_one(file, timeout, permit).await
        });
    }

    let mut results = Vec::with_capacity(tasks.len());
    while let Some(task_result) = tasks.join_next().await {
        match task_result {
            Ok(result) => results.push(result),
            Err(join_err) => return Err(TallyError::Other(format!("Task panicked: {}", join_err))),
        }
    }

    let batch = BatchResult::from_results(results);
    tracing::info!(
        files = batch.count,
        succeeded = batch.success_count(),
        failed = batch.failure_count(),
        total = batch.total_count(),
        "Batch finished"
    );
    Ok(batch)
}

/// Synchronous wrapper for [`process_batch`].
///
/// Uses the global runtime, so it must not be called from within an async context.
pub fn process_batch_sync(files: Vec<SourceFile>, config: &TallyConfig) -> Result<BatchResult> {
    GLOBAL_RUNTIME.block_on(process_batch(files, config))
}

async fn run_one(file: SourceFile, timeout_secs: Option<u64>, permit: Option<OwnedSemaphorePermit>) -> FileResult {
    let filename = file.filename.clone();
    let file_type = file.extension();
    run_guarded(filename, file_type, timeout_secs, permit, move || process_file(&file)).await
}

/// Run `work` on the blocking pool under an optional deadline.
///
/// The permit moves into the blocking task and is released only when `work`
/// returns, even if the deadline passed long before. A deadline or a panic
/// becomes a failure row for `filename`.
async fn run_guarded<F>(
    filename: String,
    file_type: String,
    timeout_secs: Option<u64>,
    permit: Option<OwnedSemaphorePermit>,
    work: F,
) -> FileResult
where
    F: FnOnce() -> FileResult + Send + 'static,
{
    let handle = tokio::task::spawn_blocking(move || {
        let _permit = permit;
        work()
    });

    let joined = match timeout_secs {
        Some(seconds) => match tokio::time::timeout(Duration::from_secs(seconds), handle).await {
            Ok(joined) => joined,
            Err(_) => {
                tracing::warn!(filename = %filename, seconds, "Extraction timed out");
                return FileResult::failure(filename, file_type, TallyError::Timeout { seconds });
            }
        },
        None => handle.await,
    };

    joined.unwrap_or_else(|join_err| {
        tracing::warn!(filename = %filename, error = %join_err, "Extraction task failed");
        FileResult::failure(filename, file_type, format!("extraction task failed: {}", join_err))
    })
}
