//! Packages listing.

use tracing::instrument;

use serenity_api::{LoadOutcome, PackagesSource, Resource};
use serenity_core::types::PackageId;

use super::cards::{PackageCard, package_cart_item};
use super::report_load;
use crate::error::PageError;
use crate::state::AppState;

#[derive(Debug)]
pub struct PackagesPage {
    state: AppState,
    packages: Resource<PackagesSource>,
}

impl PackagesPage {
    #[must_use]
    pub fn new(state: &AppState) -> Self {
        Self {
            state: state.clone(),
            packages: Resource::new(
                "packages",
                PackagesSource(state.client().clone()),
                state.min_loading(),
            ),
        }
    }

    #[instrument(skip(self))]
    pub async fn mount(&self) -> LoadOutcome {
        let outcome = self.packages.load(()).await;
        report_load(self.state.notifier(), "Failed to load packages", &outcome);
        outcome
    }

    #[must_use]
    pub const fn resource(&self) -> &Resource<PackagesSource> {
        &self.packages
    }

    #[must_use]
    pub fn cards(&self) -> Vec<PackageCard> {
        let client = self.state.client();
        self.packages
            .with_state(|s| s.data.iter().map(|p| PackageCard::new(p, client)).collect())
    }

    /// Put one unit of a loaded package in the cart.
    ///
    /// # Errors
    ///
    /// Returns `PageError::NotFound` if the package is not in the current
    /// listing.
    pub fn add_to_cart(&self, id: &PackageId) -> Result<(), PageError> {
        let item = self
            .packages
            .with_state(|s| s.data.iter().find(|p| &p.id == id).map(package_cart_item));
        let notifier = self.state.notifier();
        let Some(item) = item else {
            let err = PageError::NotFound(format!("package {id}"));
            notifier.error("Could not add to cart", err.to_string());
            return Err(err);
        };
        notifier.success("Added to cart", format!("{} was added to your cart", item.title));
        self.state.cart().add_to_cart(item);
        Ok(())
    }
}
