/// Crate-wide result alias.
pub type OrreryResult<T> = Result<T, OrreryError>;

/// Errors surfaced by track loading, rendering, and encoding.
#[derive(thiserror::Error, Debug)]
pub enum OrreryError {
    /// Invalid input (track sheet, canvas, range, options).
    #[error("validation error: {0}")]
    Validation(String),

    /// Rasterization failed.
    #[error("render error: {0}")]
    Render(String),

    /// A frame sink failed to accept or finalize frames.
    #[error("encode error: {0}")]
    Encode(String),

    /// Malformed JSON.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Any other error, usually I/O with context attached.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl OrreryError {
    /// Build a [`OrreryError::Validation`].
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`OrreryError::Render`].
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    /// Build a [`OrreryError::Encode`].
    pub fn encode(msg: impl Into<String>) -> Self {
        Self::Encode(msg.into())
    }

    /// Build a [`OrreryError::Serde`].
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
