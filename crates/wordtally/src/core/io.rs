//! Folder scanning and file I/O utilities.

use crate::core::config::TallyConfig;
use crate::core::formats;
use crate::types::SourceFile;
use crate::{Result, TallyError};
use std::path::{Path, PathBuf};

pub use crate::core::formats::is_supported_file;

/// Prefix of the owner/lock files word processors leave next to open documents.
pub const LOCK_FILE_PREFIX: &str = "~$";

/// Read a file synchronously.
///
/// # Errors
///
/// Returns `TallyError::Io` for I/O errors.
pub fn read_file_sync(path: impl AsRef<Path>) -> Result<Vec<u8>> {
    std::fs::read(path.as_ref()).map_err(TallyError::Io)
}

/// Whether `filename` is an editor lock file such as `~$report.docx`.
pub fn is_lock_file(filename: &str) -> bool {
    filename.starts_with(LOCK_FILE_PREFIX)
}

/// Clean up a folder path typed or pasted by a user.
///
/// Surrounding whitespace is trimmed, then one pair of matching single or double
/// quotes (as added by drag-and-drop in many shells) is removed.
pub fn normalize_folder_input(input: &str) -> String {
    let trimmed = input.trim();

    for quote in ['"', '\''] {
        if trimmed.len() >= 2
            && let Some(inner) = trimmed.strip_prefix(quote).and_then(|s| s.strip_suffix(quote))
        {
            return inner.to_string();
        }
    }

    trimmed.to_string()
}

/// Collect the countable files of a folder.
///
/// Only files with a supported extension are kept and lock files (`~$` prefix)
/// are skipped. Subdirectories are descended into when `config.recursive` is set.
/// The returned files are sorted by path.
///
/// # Errors
///
/// - `TallyError::Validation` if `folder` is not a directory
/// - `TallyError::NoValidFiles` if nothing qualifies
/// - `TallyError::Io` if the directory cannot be read
pub fn scan_folder(folder: impl AsRef<Path>, config: &TallyConfig) -> Result<Vec<SourceFile>> {
    let folder = folder.as_ref();

    let mut paths = traverse_directory(folder, config.recursive, |path| {
        path.file_name()
            .and_then(|name| name.to_str())
            .is_some_and(|name| !is_lock_file(name) && formats::is_supported_file(name))
    })?;
    paths.sort();

    if paths.is_empty() {
        return Err(TallyError::NoValidFiles(format!(
            "{} contains no {} files",
            folder.display(),
            formats::SUPPORTED_EXTENSIONS.join("/")
        )));
    }

    tracing::debug!(folder = %folder.display(), files = paths.len(), "Scanned folder");
    Ok(paths.into_iter().map(SourceFile::from_path).collect())
}

/// Traverse a directory and return all file paths accepted by `filter`.
///
/// # Errors
///
/// Returns `TallyError::Validation` if `dir` is not a directory and
/// `TallyError::Io` for I/O errors.
pub fn traverse_directory<F>(dir: impl AsRef<Path>, recursive: bool, filter: F) -> Result<Vec<PathBuf>>
where
    F: Fn(&Path) -> bool,
{
    let dir = dir.as_ref();
    let mut files = Vec::new();

    if !dir.is_dir() {
        return Err(TallyError::validation(format!(
            "Path is not a directory: {}",
            dir.display()
        )));
    }

    traverse_directory_impl(dir, recursive, &filter, &mut files)?;
    Ok(files)
}

fn traverse_directory_impl<F>(dir: &Path, recursive: bool, filter: &F, files: &mut Vec<PathBuf>) -> Result<()>
where
    F: Fn(&Path) -> bool,
{
    let entries = std::fs::read_dir(dir).map_err(TallyError::Io)?;

    for entry in entries {
        let entry = entry.map_err(TallyError::Io)?;
        let path = entry.path();

        if path.is_file() {
            if filter(&path) {
                files.push(path);
            }
        } else if path.is_dir() && recursive {
            traverse_directory_impl(&path, recursive, filter, files)?;
        }
    }

    Ok(())
}
