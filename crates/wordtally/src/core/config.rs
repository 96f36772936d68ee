//! Configuration loading and management.
//!
//! [`TallyConfig`] controls how a batch is run. It can be built programmatically,
//! loaded from TOML or JSON, or discovered as `wordtally.toml` in the current
//! directory or one of its parents.

use crate::{Result, TallyError};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Name of the file searched by [`TallyConfig::discover`].
pub const CONFIG_FILE_NAME: &str = "wordtally.toml";

/// Batch configuration.
///
/// # Example
///
/// ```rust
/// use wordtally::TallyConfig;
///
/// let config = TallyConfig {
///     max_concurrent_files: Some(4),
///     ..Default::default()
/// };
/// assert_eq!(config.concurrency(), 4);
/// assert_eq!(TallyConfig::default().concurrency(), 1);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TallyConfig {
    /// Files processed at the same time (None = one at a time)
    #[serde(default)]
    pub max_concurrent_files: Option<usize>,

    /// Per-file extraction deadline in seconds (None = no deadline)
    #[serde(default)]
    pub file_timeout_secs: Option<u64>,

    /// Descend into subdirectories when scanning a folder
    #[serde(default)]
    pub recursive: bool,
}

impl TallyConfig {
    /// Number of files processed concurrently; never less than one.
    pub fn concurrency(&self) -> usize {
        self.max_concurrent_files.unwrap_or(1).max(1)
    }

    /// Process as many files at once as there are logical CPUs.
    pub fn with_cpu_concurrency(mut self) -> Self {
        self.max_concurrent_files = Some(num_cpus::get());
        self
    }

    /// Reject values that cannot describe a runnable batch.
    pub fn validate(&self) -> Result<()> {
        if self.max_concurrent_files == Some(0) {
            return Err(TallyError::validation("max_concurrent_files must be at least 1"));
        }
        if self.file_timeout_secs == Some(0) {
            return Err(TallyError::validation("file_timeout_secs must be at least 1"));
        }
        Ok(())
    }

    /// Load configuration from a TOML file.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = read_config(path)?;

        let config: Self = toml::from_str(&content)
            .map_err(|e| TallyError::serialization_with_source(format!("Invalid TOML in {}", path.display()), e))?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a JSON file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = read_config(path)?;

        let config: Self = serde_json::from_str(&content)
            .map_err(|e| TallyError::serialization_with_source(format!("Invalid JSON in {}", path.display()), e))?;
        config.validate()?;
        Ok(config)
    }

    /// Load a config file, choosing the format by extension (`.json`, otherwise TOML).
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => Self::from_json_file(path),
            _ => Self::from_toml_file(path),
        }
    }

    /// Discover `wordtally.toml` in the current directory and its parents.
    ///
    /// # Returns
    ///
    /// - `Some(config)` if found
    /// - `None` if no config file found
    pub fn discover() -> Result<Option<Self>> {
        let current = std::env::current_dir().map_err(TallyError::Io)?;
        Self::discover_from(&current)
    }

    /// Like [`TallyConfig::discover`], starting at `start` instead of the current directory.
    pub fn discover_from(start: &Path) -> Result<Option<Self>> {
        for dir in start.ancestors() {
            let candidate = dir.join(CONFIG_FILE_NAME);
            if candidate.is_file() {
                tracing::debug!(path = %candidate.display(), "Discovered configuration file");
                return Ok(Some(Self::from_toml_file(candidate)?));
            }
        }

        Ok(None)
    }
}

fn read_config(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).map_err(|e| {
        TallyError::validation_with_source(format!("Failed to read config file {}: {}", path.display(), e), e)
    })
}
