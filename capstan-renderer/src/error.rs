//! Error types for capstan-renderer.

use thiserror::Error;

/// All errors that can arise from template rendering.
#[derive(Debug, Error)]
pub enum RenderError {
    /// Strict-mode failure: the template referenced a value path the
    /// supplied value set does not define.
    #[error("asset `{asset}`: no value supplied for `{path}`")]
    MissingValue { asset: String, path: String },

    /// Malformed template syntax, independent of values.
    #[error("asset `{asset}`: template syntax error: {source}")]
    Syntax {
        asset: String,
        #[source]
        source: tera::Error,
    },

    /// Any other engine failure while rendering.
    #[error("asset `{asset}`: render failed: {source}")]
    Engine {
        asset: String,
        #[source]
        source: tera::Error,
    },

    /// The caller's value set could not form a render context.
    #[error("value set is not renderable: {0}")]
    Values(#[source] tera::Error),
}

impl RenderError {
    pub(crate) fn syntax(asset: &str, source: tera::Error) -> Self {
        RenderError::Syntax {
            asset: asset.to_string(),
            source,
        }
    }
}
