//! Error types for layer construction and resolution

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while building the layer store. All of these are fatal at
/// startup and abort initialization.
#[derive(Debug, Error)]
pub enum ConstructionError {
    /// The store was sealed before this append
    #[error("Cannot append to a sealed layer store")]
    StoreSealed,

    /// A block carried a glob pattern that does not compile
    #[error("Invalid pattern '{pattern}': {message}")]
    InvalidPattern { pattern: String, message: String },

    /// A rule references a plugin no applicable layer registers
    #[error("Rule '{rule}' in layer {block_index} references unregistered plugin '{plugin}'")]
    UnknownPlugin {
        rule: String,
        plugin: String,
        block_index: usize,
    },

    /// Configuration loading or parse errors
    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    /// File system I/O errors
    #[error("IO error for path '{path}': {source}")]
    IoError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ConstructionError {
    /// Create a configuration error
    pub fn config_error(message: impl Into<String>) -> Self {
        Self::ConfigError {
            message: message.into(),
        }
    }

    /// Create an IO error with path context
    pub fn io_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::IoError {
            path: path.into(),
            source,
        }
    }
}

/// Outcomes of `resolve` that do not produce an effective configuration.
///
/// None of these abort resolution of other files. `Ignored` is not a
/// failure at all; it is a terminal state callers must branch on.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolutionError {
    /// The path is withdrawn from resolution by an ignore pattern
    #[error("Path is excluded by an ignore pattern")]
    Ignored,

    /// No layer's include patterns cover the path; the caller decides
    /// whether this is an error or "use defaults"
    #[error("No configuration layer covers the path")]
    NoApplicableLayer,

    /// A layer carried a malformed rule setting
    #[error("Invalid setting for rule '{rule}' in layer {block_index}: {message}")]
    Validation {
        rule: String,
        block_index: usize,
        message: String,
    },
}

impl ResolutionError {
    pub fn is_ignored(&self) -> bool {
        matches!(self, Self::Ignored)
    }
}
