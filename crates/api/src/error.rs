//! Errors returned by the spa API client.
//!
//! Every failure is terminal for its request: no retry, no backoff. Callers
//! turn an [`ApiError`] into a toast with [`ApiError::user_message`].

use thiserror::Error;

use crate::token::TokenStoreError;

/// Toast text for failures the user cannot act on.
pub const GENERIC_ERROR_MESSAGE: &str = "An unexpected error occurred. Please try again.";

/// Errors that can occur when talking to the spa API.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request could not complete (DNS, connect, TLS, reset, ...).
    #[error("HTTP error: {0}")]
    Network(#[from] reqwest::Error),

    /// The response was not JSON, e.g. an HTML error page from a proxy.
    #[error("Expected JSON response, got {content_type} (HTTP {status})")]
    NotJson { status: u16, content_type: String },

    /// The API reported a failure, either through a non-2xx status or a
    /// `status: false` body.
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// The body was JSON but not the expected shape.
    #[error("JSON parse error: {0}")]
    Decode(#[from] serde_json::Error),

    /// A bearer-only endpoint was called without a stored token.
    #[error("Not signed in")]
    Unauthenticated,

    /// An endpoint or redirect URL could not be built.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// The token store could not be read or written.
    #[error("Token store error: {0}")]
    TokenStore(#[from] TokenStoreError),
}

impl ApiError {
    /// Text to show the user.
    ///
    /// API-reported messages are shown verbatim. Transport, content-type and
    /// decoding failures collapse to a generic message.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Api { message, .. } => message.clone(),
            Self::Unauthenticated => "Please sign in to continue.".to_string(),
            Self::Network(_)
            | Self::NotJson { .. }
            | Self::Decode(_)
            | Self::InvalidUrl(_)
            | Self::TokenStore(_) => GENERIC_ERROR_MESSAGE.to_string(),
        }
    }

    /// HTTP status reported by the API, if any.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } | Self::NotJson { status, .. } => Some(*status),
            Self::Network(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// The API rejected the bearer token.
    #[must_use]
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthenticated) || self.status() == Some(401)
    }
}

/// Result type alias for `ApiError`.
pub type Result<T> = std::result::Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_message_is_verbatim() {
        let err = ApiError::Api {
            status: 422,
            message: "The email has already been taken.".to_string(),
        };
        assert_eq!(err.user_message(), "The email has already been taken.");
        assert_eq!(err.status(), Some(422));
    }

    #[test]
    fn test_not_json_is_generic() {
        let err = ApiError::NotJson {
            status: 502,
            content_type: "text/html".to_string(),
        };
        assert_eq!(err.user_message(), GENERIC_ERROR_MESSAGE);
        assert_eq!(
            err.to_string(),
            "Expected JSON response, got text/html (HTTP 502)"
        );
    }

    #[test]
    fn test_unauthorized_detection() {
        assert!(ApiError::Unauthenticated.is_unauthorized());
        assert!(
            ApiError::Api {
                status: 401,
                message: "Unauthenticated.".to_string()
            }
            .is_unauthorized()
        );
        assert!(
            !ApiError::Api {
                status: 500,
                message: "boom".to_string()
            }
            .is_unauthorized()
        );
    }
}
