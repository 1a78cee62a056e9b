//! Style sheet errors.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while loading a style sheet.
#[derive(Debug, Error)]
pub enum StyleError {
    /// The style file could not be read
    #[error("Failed to read style {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The document is not valid style JSON
    #[error("Invalid style document: {0}")]
    Json(#[from] serde_json::Error),

    /// A layer references an id that was not declared before it
    #[error("Style layer '{layer}' references unknown layer '{reference}'")]
    UnknownRef { layer: String, reference: String },
}
