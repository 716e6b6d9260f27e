use std::path::PathBuf;
use thiserror::Error;

use super::Specificity;

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    #[error("invalid selector fragment '{fragment}': {reason}")]
    InvalidSelector {
        fragment: String,
        reason: &'static str,
    },

    #[error("invalid path fragment '{fragment}': {reason}")]
    InvalidPath {
        fragment: String,
        reason: &'static str,
    },

    #[error("selector segment '{fragment}' is not a valid pattern: {source}")]
    InvalidPattern {
        fragment: String,
        source: regex::Error,
    },

    #[error("cannot set reserved key: {0}")]
    ReservedKey(String),

    #[error("selector must not end with a // wildcard: {0}")]
    TrailingWildcard(String),

    #[error("key not found: {0}")]
    KeyNotFound(String),

    #[error(
        "selectors {} match path '{path}' with the same specificity of {specificity}",
        .selectors.join(" and ")
    )]
    AmbiguousSpecificity {
        path: String,
        selectors: Vec<String>,
        specificity: Specificity,
    },

    #[error("cannot splice configuration located at '{location}' under '{selector}'")]
    LocatedSplice { selector: String, location: String },

    #[error("required config file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("failed to read config file '{path}': {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file '{path}': {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("unsupported {kind} value under selector '{selector}'")]
    UnsupportedValue { selector: String, kind: &'static str },

    #[error("failed to deserialize value at '{path}': {source}")]
    Deserialize {
        path: String,
        source: toml::de::Error,
    },
}

impl ConfigError {
    pub(crate) fn selector(fragment: impl Into<String>, reason: &'static str) -> Self {
        Self::InvalidSelector {
            fragment: fragment.into(),
            reason,
        }
    }

    pub(crate) fn path(fragment: impl Into<String>, reason: &'static str) -> Self {
        Self::InvalidPath {
            fragment: fragment.into(),
            reason,
        }
    }
}
