//! Error types for capstan-processor.

use std::path::PathBuf;

use thiserror::Error;

use capstan_core::ResourceError;
use capstan_renderer::RenderError;

/// Errors from asset discovery and reading.
#[derive(Debug, Error)]
pub enum SourceError {
    /// The requested path or asset does not exist in the source.
    #[error("asset or path `{name}` not found")]
    NotFound { name: String },

    /// I/O failure while reading an existing path.
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Convenience constructor for [`SourceError::Read`].
pub(crate) fn read_err(path: impl Into<PathBuf>, source: std::io::Error) -> SourceError {
    SourceError::Read {
        path: path.into(),
        source,
    }
}

/// All errors that can arise from template processing.
///
/// A failure in any one asset aborts the whole multi-asset operation; no
/// partial collections are returned.
#[derive(Debug, Error)]
pub enum ProcessError {
    /// Asset discovery or read failure.
    #[error(transparent)]
    Source(#[from] SourceError),

    /// Rendering failure — missing value, template syntax, or engine.
    #[error(transparent)]
    Render(#[from] RenderError),

    /// A rendered document failed to decode.
    #[error("asset `{asset}` document {index}: {source}")]
    Decode {
        asset: String,
        index: usize,
        #[source]
        source: ResourceError,
    },
}
