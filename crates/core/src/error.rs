//! Error types for the generator core.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that abort a generation step.
///
/// Problems local to a single schema are not represented here: they are
/// logged and the walk moves on to the next schema.
#[derive(Debug, Error)]
pub enum GenError {
    /// The input YAML could not be read.
    #[error("Input file '{}' could not be read: {source}", path.display())]
    MissingInputFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The input could not be parsed as a YAML stream.
    #[error("Failed to parse YAML '{}': {source}", path.display())]
    Yaml {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    /// The configuration file is unreadable or invalid.
    #[error("Invalid configuration '{}': {message}", path.display())]
    Config { path: PathBuf, message: String },

    /// A filesystem operation failed.
    #[error("I/O error on '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A hook template failed to render.
    #[error("Template '{name}' failed to render: {message}")]
    Template { name: String, message: String },
}

/// Result alias used across the core crate.
pub type Result<T> = std::result::Result<T, GenError>;
