//! Landing page: featured services and packages plus recent testimonials.

use serenity_api::{
    LoadOutcome, PackagesSource, Resource, ServicesSource, TestimonialsSource,
};
use serenity_core::models::ServiceFilter;
use tracing::instrument;

use super::cards::{PackageCard, ServiceCard, TestimonialCard};
use super::report_load;
use crate::state::AppState;

/// Cards shown in each featured strip.
pub const FEATURED_COUNT: usize = 3;

#[derive(Debug)]
pub struct HomePage {
    state: AppState,
    services: Resource<ServicesSource>,
    packages: Resource<PackagesSource>,
    testimonials: Resource<TestimonialsSource>,
}

impl HomePage {
    #[must_use]
    pub fn new(state: &AppState) -> Self {
        let client = state.client().clone();
        let min = state.min_loading();
        Self {
            state: state.clone(),
            services: Resource::new("services", ServicesSource(client.clone()), min),
            packages: Resource::new("packages", PackagesSource(client.clone()), min),
            testimonials: Resource::new("testimonials", TestimonialsSource(client), min),
        }
    }

    /// Load all three sections concurrently.
    #[instrument(skip(self))]
    pub async fn mount(&self) -> [LoadOutcome; 3] {
        let (services, packages, testimonials) = tokio::join!(
            self.services.load(ServiceFilter::default()),
            self.packages.load(()),
            self.testimonials.load(1),
        );

        let notifier = self.state.notifier();
        report_load(notifier, "Failed to load services", &services);
        report_load(notifier, "Failed to load packages", &packages);
        report_load(notifier, "Failed to load testimonials", &testimonials);

        [services, packages, testimonials]
    }

    #[must_use]
    pub fn featured_services(&self) -> Vec<ServiceCard> {
        let client = self.state.client();
        self.services.with_state(|s| {
            s.data
                .iter()
                .take(FEATURED_COUNT)
                .map(|service| ServiceCard::new(service, client))
                .collect()
        })
    }

    #[must_use]
    pub fn featured_packages(&self) -> Vec<PackageCard> {
        let client = self.state.client();
        self.packages.with_state(|s| {
            s.data
                .iter()
                .take(FEATURED_COUNT)
                .map(|package| PackageCard::new(package, client))
                .collect()
        })
    }

    #[must_use]
    pub fn testimonials(&self) -> Vec<TestimonialCard> {
        let client = self.state.client();
        self.testimonials.with_state(|s| {
            s.data
                .iter()
                .map(|t| TestimonialCard::new(t, client))
                .collect()
        })
    }

    #[must_use]
    pub const fn services(&self) -> &Resource<ServicesSource> {
        &self.services
    }

    #[must_use]
    pub const fn packages(&self) -> &Resource<PackagesSource> {
        &self.packages
    }

    #[must_use]
    pub const fn testimonial_resource(&self) -> &Resource<TestimonialsSource> {
        &self.testimonials
    }
}
