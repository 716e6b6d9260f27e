//! File-based configuration source.

use std::path::{Path, PathBuf};

use super::source::{flatten_table, ConfigEntry, ConfigSource};
use super::ConfigError;

/// A configuration source that loads selector entries from a TOML file.
///
/// Top-level keys and table headers are selector fragments, so a file can
/// carry wildcards and patterns as quoted keys:
///
/// ```toml
/// "block1/seed" = [4, 5, 6]
///
/// ["//"]
/// seed = [1, 2, 3]
/// "W.*/init_width" = 0.01
/// ```
///
/// Files can be marked as required or optional. Required files that don't exist
/// cause an error; optional files that don't exist are silently skipped.
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
    required: bool,
}

impl FileSource {
    /// Creates a new file source.
    ///
    /// If `required` is true, the build will fail if the file doesn't exist.
    pub fn new(path: impl AsRef<Path>, required: bool) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            required,
        }
    }
}

impl ConfigSource for FileSource {
    fn entries(&self) -> Result<Vec<ConfigEntry>, ConfigError> {
        match load_config_file(&self.path, self.required)? {
            Some(table) => flatten_table(table, &[]),
            None => {
                tracing::debug!(
                    path = %self.path.display(),
                    "optional config file not found, skipping"
                );
                Ok(vec![])
            }
        }
    }
}

/// Loads and parses a TOML config file.
///
/// Returns `Ok(None)` if the file doesn't exist and `required` is false.
fn load_config_file(path: &Path, required: bool) -> Result<Option<toml::Table>, ConfigError> {
    match std::fs::read_to_string(path) {
        Ok(contents) => {
            let table = toml::from_str(&contents).map_err(|e| ConfigError::ParseError {
                path: path.to_path_buf(),
                source: e,
            })?;
            Ok(Some(table))
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            if required {
                Err(ConfigError::FileNotFound(path.to_path_buf()))
            } else {
                Ok(None)
            }
        }
        Err(e) => Err(ConfigError::ReadError {
            path: path.to_path_buf(),
            source: e,
        }),
    }
}
