//! Run-level error types.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that abort a relink run.
///
/// Manifest errors are raised while the mapping is built, so no page has
/// been touched yet. A `FileAccess` error during the tree walk leaves pages
/// that were already rewritten in place; rerunning is safe because those
/// pages no longer match.
#[derive(Debug, Error)]
pub enum RelinkError {
    #[error("manifest line {line} is malformed (expected `<path> : permalink: <url>`): `{content}`")]
    MalformedManifestLine { line: usize, content: String },

    #[error("permalink on manifest line {line} does not contain `{marker}`: `{url}`")]
    UnrecognizedPermalinkFormat {
        line: usize,
        url: String,
        marker: String,
    },

    #[error("failed to read or write `{}`", .path.display())]
    FileAccess {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to build link pattern")]
    InvalidPattern(#[from] regex::Error),
}

impl RelinkError {
    /// Wrap an I/O error with the path it happened on.
    pub fn file_access(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::FileAccess {
            path: path.into(),
            source,
        }
    }
}
