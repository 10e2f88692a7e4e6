//! Dashboard overview: how many of each record exist.

use serde::Serialize;
use tracing::instrument;

use serenity_api::ApiError;
use serenity_core::models::{Listing, ServiceFilter};
use serenity_storefront::{AppState, Notifier};

/// Record counts. `None` where the count could not be fetched.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Overview {
    pub services: Option<u64>,
    pub packages: Option<u64>,
    pub blogs: Option<u64>,
    pub testimonials: Option<u64>,
    pub contacts: Option<u64>,
    pub unread_contacts: Option<u64>,
}

#[derive(Debug, Clone)]
pub struct Dashboard {
    state: AppState,
}

impl Dashboard {
    #[must_use]
    pub fn new(state: &AppState) -> Self {
        Self {
            state: state.clone(),
        }
    }

    /// Fetch every count concurrently. Failures are toasted and leave that
    /// count empty.
    #[instrument(skip(self))]
    pub async fn overview(&self) -> Overview {
        let client = self.state.client();
        let notifier = self.state.notifier();
        let service_filter = ServiceFilter::default();
        let (services, packages, blogs, testimonials, contacts) = tokio::join!(
            client.list_services(&service_filter),
            client.list_packages(),
            client.list_blogs(),
            client.list_testimonials(1),
            client.list_contacts(),
        );

        let unread_contacts = contacts.as_ref().ok().map(|listing| {
            listing.items.iter().filter(|m| !m.is_read).count() as u64
        });

        Overview {
            services: total(notifier, "services", services),
            packages: total(notifier, "packages", packages),
            blogs: total(notifier, "blogs", blogs),
            testimonials: total(notifier, "testimonials", testimonials),
            contacts: total(notifier, "contacts", contacts),
            unread_contacts,
        }
    }
}

fn total<T>(notifier: &Notifier, name: &str, result: Result<Listing<T>, ApiError>) -> Option<u64> {
    match result {
        Ok(listing) => Some(listing.page.total),
        Err(err) => {
            notifier.api_failure(&format!("Failed to count {name}"), &err);
            None
        }
    }
}
