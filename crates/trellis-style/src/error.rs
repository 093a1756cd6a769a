//! Error types for the styling system.

/// Result type alias for style operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur during style resolution.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// No mapping exists for the requested style token.
    ///
    /// Raised to the caller rather than silently falling back to a default;
    /// a missing token is an integration bug, not a styling preference.
    #[error("no style mapping for token '{token}'")]
    UnmappedToken { token: String },

    /// A color literal could not be parsed.
    #[error("invalid color '{value}': {message}")]
    InvalidColor { value: String, message: String },
}

impl Error {
    /// Creates an unmapped-token error.
    pub fn unmapped_token(token: impl Into<String>) -> Self {
        Self::UnmappedToken {
            token: token.into(),
        }
    }

    /// Creates an invalid-color error.
    pub fn invalid_color(value: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidColor {
            value: value.into(),
            message: message.into(),
        }
    }
}
