//! Public contact form.

use tracing::instrument;

use serenity_core::validation::{ContactForm, FieldErrors, Validate};

use crate::error::PageError;
use crate::state::AppState;

#[derive(Debug)]
pub struct ContactPage {
    state: AppState,
    /// Current form input.
    pub form: ContactForm,
    errors: FieldErrors,
}

impl ContactPage {
    #[must_use]
    pub fn new(state: &AppState) -> Self {
        Self {
            state: state.clone(),
            form: ContactForm::default(),
            errors: FieldErrors::new(),
        }
    }

    /// Messages from the last failed validation.
    #[must_use]
    pub const fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    /// Validate and send the form. On success the form is reset.
    ///
    /// # Errors
    ///
    /// Returns `PageError::Validation` (no request sent) or `PageError::Api`.
    #[instrument(skip(self), fields(email = %self.form.email))]
    pub async fn submit(&mut self) -> Result<(), PageError> {
        if let Err(errors) = self.form.validate() {
            self.errors = errors.clone();
            return Err(PageError::Validation(errors));
        }
        self.errors = FieldErrors::new();

        let notifier = self.state.notifier();
        if let Err(err) = self.state.client().submit_contact(&self.form).await {
            notifier.api_failure("Failed to send message", &err);
            return Err(err.into());
        }

        notifier.success(
            "Message sent",
            "Thank you for reaching out. We will get back to you shortly.",
        );
        self.form = ContactForm::default();
        Ok(())
    }
}
