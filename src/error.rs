//! Error types for world generation and export.

/// Errors surfaced by the generator and its exporters.
///
/// Generation itself can only fail on structurally invalid parameters;
/// everything else is I/O around it.
#[derive(Debug, thiserror::Error)]
pub enum WorldGenError {
    /// A parameter failed validation before generation started.
    #[error("invalid parameter `{field}`: {reason}")]
    InvalidParams { field: &'static str, reason: String },

    /// Reading or writing a file failed.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    /// Parsing or serializing JSON failed.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// Encoding an image failed.
    #[error("image error: {0}")]
    Image(#[from] image::ImageError),
}

impl WorldGenError {
    pub(crate) fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        WorldGenError::InvalidParams { field, reason: reason.into() }
    }
}

pub type Result<T> = std::result::Result<T, WorldGenError>;
