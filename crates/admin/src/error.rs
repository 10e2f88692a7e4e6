//! Dashboard error type.

use thiserror::Error;

use serenity_api::ApiError;
use serenity_core::validation::FieldErrors;

/// Errors from dashboard actions.
#[derive(Debug, Error)]
pub enum AdminError {
    /// The form failed client-side validation; no request was sent.
    #[error("Invalid input: {0}")]
    Validation(FieldErrors),

    /// The API call failed, or no token is stored.
    #[error(transparent)]
    Api(#[from] ApiError),
}

impl From<FieldErrors> for AdminError {
    fn from(errors: FieldErrors) -> Self {
        Self::Validation(errors)
    }
}

impl AdminError {
    /// The request was refused for lack of a valid token.
    #[must_use]
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Api(e) if e.is_unauthorized())
    }

    #[must_use]
    pub const fn field_errors(&self) -> Option<&FieldErrors> {
        match self {
            Self::Validation(errors) => Some(errors),
            Self::Api(_) => None,
        }
    }
}

/// Result type alias for `AdminError`.
pub type Result<T> = std::result::Result<T, AdminError>;
