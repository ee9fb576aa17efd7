//! Error types shared across Toonport crates.

/// Top-level error type for Toonport operations.
#[derive(Debug, thiserror::Error)]
pub enum ToonportError {
    #[error("Render error: {message}")]
    Render { message: String },

    #[error("Document error: {message}")]
    Document { message: String },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// Result type alias using ToonportError.
pub type ToonportResult<T> = Result<T, ToonportError>;

impl ToonportError {
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render {
            message: msg.into(),
        }
    }

    pub fn document(msg: impl Into<String>) -> Self {
        Self::Document {
            message: msg.into(),
        }
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_error_message() {
        let err = ToonportError::render("layer 'Ink' vanished");
        assert_eq!(err.to_string(), "Render error: layer 'Ink' vanished");
    }

    #[test]
    fn test_io_error_is_transparent() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "nope");
        let err: ToonportError = io.into();
        assert_eq!(err.to_string(), "nope");
    }
}
