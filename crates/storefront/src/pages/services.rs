//! Services listing with search and price filters.

use tracing::instrument;

use serenity_api::{LoadOutcome, Resource, ServicesSource};
use serenity_core::models::ServiceFilter;
use serenity_core::types::ServiceId;
use serenity_core::validation::FieldErrors;

use super::cards::{ServiceCard, service_cart_item};
use super::report_load;
use crate::error::PageError;
use crate::state::AppState;

const LOAD_FAILED: &str = "Failed to load services";

#[derive(Debug)]
pub struct ServicesPage {
    state: AppState,
    services: Resource<ServicesSource>,
    filter: ServiceFilter,
}

impl ServicesPage {
    #[must_use]
    pub fn new(state: &AppState) -> Self {
        Self {
            state: state.clone(),
            services: Resource::new(
                "services",
                ServicesSource(state.client().clone()),
                state.min_loading(),
            ),
            filter: ServiceFilter::default(),
        }
    }

    /// Load with the current filter.
    #[instrument(skip(self))]
    pub async fn mount(&self) -> LoadOutcome {
        let outcome = self.services.load(self.filter.clone()).await;
        report_load(self.state.notifier(), LOAD_FAILED, &outcome);
        outcome
    }

    /// Replace the filter and reload.
    ///
    /// # Errors
    ///
    /// Returns `PageError::Validation` without sending a request when the
    /// minimum price is above the maximum.
    #[instrument(skip(self))]
    pub async fn apply_filter(&mut self, filter: ServiceFilter) -> Result<LoadOutcome, PageError> {
        if filter.is_inverted() {
            let mut errors = FieldErrors::new();
            errors.add(
                "max_price",
                "Maximum price must be greater than the minimum price",
            );
            return Err(PageError::Validation(errors));
        }
        self.filter = filter;
        Ok(self.mount().await)
    }

    #[must_use]
    pub const fn filter(&self) -> &ServiceFilter {
        &self.filter
    }

    #[must_use]
    pub const fn resource(&self) -> &Resource<ServicesSource> {
        &self.services
    }

    #[must_use]
    pub fn cards(&self) -> Vec<ServiceCard> {
        let client = self.state.client();
        self.services
            .with_state(|s| s.data.iter().map(|x| ServiceCard::new(x, client)).collect())
    }

    /// Put one unit of a loaded service in the cart.
    ///
    /// # Errors
    ///
    /// Returns `PageError::NotFound` if the service is not in the current
    /// listing.
    pub fn add_to_cart(&self, id: &ServiceId) -> Result<(), PageError> {
        let item = self
            .services
            .with_state(|s| s.data.iter().find(|x| &x.id == id).map(service_cart_item));
        let notifier = self.state.notifier();
        let Some(item) = item else {
            let err = PageError::NotFound(format!("service {id}"));
            notifier.error("Could not add to cart", err.to_string());
            return Err(err);
        };
        notifier.success("Added to cart", format!("{} was added to your cart", item.title));
        self.state.cart().add_to_cart(item);
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serenity_core::types::Price;

    use super::*;
    use crate::cart::CartMode;
    use crate::state::test_support::offline_state;

    #[tokio::test]
    async fn test_inverted_price_range_is_rejected_without_request() {
        let (state, mut toasts) = offline_state(CartMode::Slots);
        let mut page = ServicesPage::new(&state);

        let err = page
            .apply_filter(ServiceFilter {
                search: None,
                min_price: Some(Price::from_naira(50_000)),
                max_price: Some(Price::from_naira(10_000)),
            })
            .await
            .unwrap_err();

        assert!(err.field_errors().unwrap().get("max_price").is_some());
        assert_eq!(page.filter(), &ServiceFilter::default());
        assert!(page.resource().snapshot().is_loading());
        assert!(toasts.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_unreachable_api_becomes_error_toast() {
        let (state, mut toasts) = offline_state(CartMode::Slots);
        let page = ServicesPage::new(&state);

        let outcome = page.mount().await;

        assert!(matches!(outcome.error(), Some(serenity_api::ApiError::Network(_))));
        let toast = toasts.try_recv().unwrap();
        assert_eq!(toast.title, LOAD_FAILED);
        assert_eq!(toast.message, serenity_api::GENERIC_ERROR_MESSAGE);
        assert!(page.resource().snapshot().is_error());
    }

    #[tokio::test]
    async fn test_add_unknown_service_is_not_found() {
        let (state, mut toasts) = offline_state(CartMode::Slots);
        let page = ServicesPage::new(&state);
        let err = page.add_to_cart(&ServiceId::new("404")).unwrap_err();
        assert!(matches!(err, PageError::NotFound(_)));
        assert!(state.cart().is_empty());
        assert_eq!(toasts.try_recv().unwrap().title, "Could not add to cart");
    }
}
