//! Reservation checkout: contact details plus the cart, paid through the
//! provider's hosted checkout.

use tracing::{info, instrument};

use serenity_api::{PaymentItem, PaymentRedirect, ReservationPayment};
use serenity_core::validation::{FieldErrors, ReservationForm, Validate};

use crate::error::PageError;
use crate::state::AppState;

#[derive(Debug)]
pub struct ReservationPage {
    state: AppState,
    pub form: ReservationForm,
    errors: FieldErrors,
}

impl ReservationPage {
    #[must_use]
    pub fn new(state: &AppState) -> Self {
        Self {
            state: state.clone(),
            form: ReservationForm::default(),
            errors: FieldErrors::new(),
        }
    }

    #[must_use]
    pub const fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    /// Submit the reservation. On success the cart is emptied and the
    /// checkout URL returned.
    ///
    /// # Errors
    ///
    /// Returns `PageError::EmptyCart` or `PageError::Validation` without a
    /// request, or `PageError::Api` if the payment cannot be started.
    #[instrument(skip(self), fields(email = %self.form.email))]
    pub async fn submit(&mut self) -> Result<PaymentRedirect, PageError> {
        let notifier = self.state.notifier();
        let cart = self.state.cart().snapshot();
        if cart.is_empty() {
            let err = PageError::EmptyCart;
            notifier.error("Reservation failed", err.to_string());
            return Err(err);
        }
        if let Err(errors) = self.form.validate() {
            self.errors = errors.clone();
            return Err(PageError::Validation(errors));
        }
        self.errors = FieldErrors::new();

        let payment = ReservationPayment {
            name: self.form.name.trim().to_string(),
            email: self.form.email.trim().to_lowercase(),
            phone: self.form.phone.trim().to_string(),
            date: self.form.date.trim().to_string(),
            time: self.form.time.trim().to_string(),
            notes: self
                .form
                .notes
                .as_deref()
                .map(str::trim)
                .filter(|n| !n.is_empty())
                .map(str::to_owned),
            items: cart
                .lines()
                .into_iter()
                .map(|line| PaymentItem {
                    id: line.item.id,
                    title: line.item.title,
                    quantity: line.quantity,
                    unit_price: line.item.price,
                })
                .collect(),
            amount: cart.total(),
        };

        match self.state.client().initialize_payment(&payment).await {
            Ok(redirect) => {
                info!(amount = %payment.amount, items = payment.items.len(), "Reservation payment started");
                self.state.cart().clear();
                notifier.success("Reservation received", "Complete your payment to confirm.");
                Ok(redirect)
            }
            Err(err) => {
                notifier.api_failure("Reservation failed", &err);
                Err(err.into())
            }
        }
    }
}
