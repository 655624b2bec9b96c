/// Convenience result type used across rasterkit.
pub type RasterkitResult<T> = Result<T, RasterkitError>;

/// Top-level error taxonomy used by every operation.
///
/// Out-of-range interactive parameters are clamped, never reported here.
#[derive(thiserror::Error, Debug)]
pub enum RasterkitError {
    /// The input is not a supported image (or PDF) type; nothing was processed.
    #[error("invalid input type: {0}")]
    InvalidInputType(String),

    /// The input bytes could not be decoded.
    #[error("decode error: {0}")]
    Decode(String),

    /// The encoder produced no output.
    #[error("encode error: {0}")]
    Encode(String),

    /// Structurally invalid data, such as a pixel buffer whose length does not match its size.
    #[error("validation error: {0}")]
    Validation(String),

    /// Errors when serializing or deserializing job files.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl RasterkitError {
    /// Build a [`RasterkitError::InvalidInputType`] value.
    pub fn invalid_input_type(msg: impl Into<String>) -> Self {
        Self::InvalidInputType(msg.into())
    }

    /// Build a [`RasterkitError::Decode`] value.
    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }

    /// Build a [`RasterkitError::Encode`] value.
    pub fn encode(msg: impl Into<String>) -> Self {
        Self::Encode(msg.into())
    }

    /// Build a [`RasterkitError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`RasterkitError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }

    /// Message suitable for showing to the user after a failed operation.
    pub fn user_message(&self) -> String {
        match self {
            Self::InvalidInputType(_) => "Please select a supported file.".to_string(),
            Self::Decode(_) => "The file could not be read. It may be corrupt.".to_string(),
            Self::Encode(_) => "Processing failed while saving the result.".to_string(),
            other => format!("Processing failed: {other}"),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
