//! Errors returned by page actions.
//!
//! Failures are toasted before they are returned. Validation errors are not:
//! they belong next to the fields, via [`PageError::field_errors`].

use thiserror::Error;

use serenity_api::ApiError;
use serenity_core::validation::FieldErrors;

/// Why a page action did not complete.
#[derive(Debug, Error)]
pub enum PageError {
    /// The form failed client-side validation; no request was sent.
    #[error("Invalid input: {0}")]
    Validation(FieldErrors),

    /// The API call failed.
    #[error(transparent)]
    Api(#[from] ApiError),

    /// Checkout was attempted with nothing in the cart.
    #[error("Your cart is empty")]
    EmptyCart,

    /// The referenced item is not in the loaded data.
    #[error("Not found: {0}")]
    NotFound(String),
}

impl From<FieldErrors> for PageError {
    fn from(errors: FieldErrors) -> Self {
        Self::Validation(errors)
    }
}

impl PageError {
    /// Field-level messages, when validation failed.
    #[must_use]
    pub const fn field_errors(&self) -> Option<&FieldErrors> {
        match self {
            Self::Validation(errors) => Some(errors),
            _ => None,
        }
    }

    /// Text for the toast body.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Api(err) => err.user_message(),
            other => other.to_string(),
        }
    }
}

/// Result type alias for `PageError`.
pub type Result<T> = std::result::Result<T, PageError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_error_display() {
        assert_eq!(PageError::EmptyCart.to_string(), "Your cart is empty");
        assert_eq!(
            PageError::NotFound("service 9".to_string()).to_string(),
            "Not found: service 9"
        );
    }

    #[test]
    fn test_api_error_message_passes_through() {
        let err = PageError::from(ApiError::Api {
            status: 422,
            message: "Email is required".to_string(),
        });
        assert_eq!(err.user_message(), "Email is required");
        assert!(err.field_errors().is_none());
    }

    #[test]
    fn test_validation_exposes_fields() {
        let mut errors = FieldErrors::new();
        errors.add("email", "please enter a valid email address");
        let err = PageError::from(errors);
        assert_eq!(
            err.field_errors().and_then(|e| e.get("email")),
            Some("please enter a valid email address")
        );
    }
}
