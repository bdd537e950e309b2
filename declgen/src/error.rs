use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Failures that stop a generation run.
///
/// Per-file scan failures are not part of this type; they are collected as
/// [`crate::ScanFailure`] and the run continues.
#[derive(Debug, Error)]
pub enum GenError {
    #[error("cannot read '{}': {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("cannot write '{}': {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("cannot walk '{}': {source}", path.display())]
    Walk {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },

    #[error("an output path is required (pass --output <path>)")]
    MissingOutputPath,

    #[error("invalid config '{}': {message}", path.display())]
    InvalidConfig { path: PathBuf, message: String },

    #[error("invalid test prefix: {0}")]
    Pattern(#[from] regex::Error),
}
