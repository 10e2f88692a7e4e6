//! Ebook purchase: validate, ask the API for a checkout URL, hand it back.

use tracing::instrument;

use serenity_api::PaymentRedirect;
use serenity_core::validation::{EbookOrder, FieldErrors, Validate};

use crate::error::PageError;
use crate::state::AppState;

#[derive(Debug)]
pub struct EbookPage {
    state: AppState,
    pub order: EbookOrder,
    errors: FieldErrors,
}

impl EbookPage {
    #[must_use]
    pub fn new(state: &AppState) -> Self {
        Self {
            state: state.clone(),
            order: EbookOrder::default(),
            errors: FieldErrors::new(),
        }
    }

    #[must_use]
    pub const fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    /// Start the purchase. Opening the returned URL is the caller's job.
    ///
    /// # Errors
    ///
    /// Returns `PageError::Validation` (no request sent) or `PageError::Api`.
    #[instrument(skip(self), fields(email = %self.order.email))]
    pub async fn purchase(&mut self) -> Result<PaymentRedirect, PageError> {
        if let Err(errors) = self.order.validate() {
            self.errors = errors.clone();
            return Err(PageError::Validation(errors));
        }
        self.errors = FieldErrors::new();

        let notifier = self.state.notifier();
        match self.state.client().purchase_ebook(&self.order).await {
            Ok(redirect) => {
                notifier.info("Redirecting to payment", "Complete your purchase to get the ebook.");
                Ok(redirect)
            }
            Err(err) => {
                notifier.api_failure("Payment could not be started", &err);
                Err(err.into())
            }
        }
    }
}
