//! Error types for backend API operations.

/// Result type alias for backend API operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Backend API error types.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// HTTP transport error.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON parsing error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Error reported by the backend.
    #[error("API error ({status}): {message}")]
    Api {
        /// HTTP status code of the failed response.
        status: u16,
        /// Error message from the response body, or the status reason.
        message: String,
    },

    /// No auth token is installed; the session must be re-established.
    #[error("Session expired. Please log in again.")]
    SessionExpired,

    /// URL parsing error.
    #[error("URL error: {0}")]
    Url(#[from] url::ParseError),
}

impl Error {
    /// Creates an API error from a status code and message.
    #[must_use]
    pub fn api(status: u16, message: impl Into<String>) -> Self {
        Self::Api {
            status,
            message: message.into(),
        }
    }

    /// Whether this error means the user has to log in again.
    ///
    /// True for a locally detected missing token and for a `401` reported
    /// by the backend.
    #[must_use]
    pub const fn is_session_expired(&self) -> bool {
        matches!(self, Self::SessionExpired | Self::Api { status: 401, .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_expired_detection() {
        assert!(Error::SessionExpired.is_session_expired());
        assert!(Error::api(401, "Unauthorized").is_session_expired());
        assert!(!Error::api(500, "boom").is_session_expired());
    }

    #[test]
    fn api_error_display() {
        let error = Error::api(422, "missing subject");
        assert_eq!(error.to_string(), "API error (422): missing subject");
    }
}
