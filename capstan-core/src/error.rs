//! Error types for capstan-core.

use thiserror::Error;

/// All errors that can arise from decoding or inspecting resources.
#[derive(Debug, Error)]
pub enum ResourceError {
    /// Malformed YAML — includes line/column context from serde_yaml.
    #[error("YAML parse error: {0}")]
    Parse(#[source] serde_yaml::Error),

    /// Well-formed YAML whose top level is not a mapping.
    #[error("document is {found}, expected a mapping")]
    NotAMapping { found: &'static str },

    /// YAML serialization error while re-encoding a resource.
    #[error("YAML serialization error: {0}")]
    Serialize(#[source] serde_yaml::Error),

    /// A required field was absent or not a string.
    #[error("field `{path}` is missing or not a string")]
    FieldMissing { path: String },
}
