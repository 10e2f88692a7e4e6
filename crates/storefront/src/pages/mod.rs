//! Public page controllers.
//!
//! A page owns its [`Resource`](serenity_api::Resource)s, loads them on
//! [`mount`](home::HomePage::mount) and turns failures into toasts. Dropping
//! a page closes its resources, so late responses are discarded.

pub mod blog;
pub mod cards;
pub mod cart_drawer;
pub mod contact;
pub mod ebook;
pub mod home;
pub mod packages;
pub mod reservation;
pub mod services;

pub use blog::BlogPage;
pub use cart_drawer::{CartDrawer, CartLineView, CartView};
pub use contact::ContactPage;
pub use ebook::EbookPage;
pub use home::HomePage;
pub use packages::PackagesPage;
pub use reservation::ReservationPage;
pub use services::ServicesPage;

use serenity_api::LoadOutcome;

use crate::notify::Notifier;

/// Toast a failed load under `action`.
pub(crate) fn report_load(notifier: &Notifier, action: &str, outcome: &LoadOutcome) {
    if let Some(err) = outcome.error() {
        notifier.api_failure(action, err);
    }
}
