//! Client for the Serenity Spa REST API.
//!
//! - [`ApiClient`]: one method per endpoint, bearer token from a
//!   [`TokenStore`].
//! - [`Resource`]: the loading/loaded/error lifecycle every page uses.
//! - [`ApiError`]: the error taxonomy and the toast text for each failure.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod client;
pub mod config;
pub mod envelope;
pub mod error;
pub mod resource;
pub mod sources;
pub mod token;

pub use client::{ApiClient, PaymentItem, PaymentRedirect, ReservationPayment};
pub use config::{ApiConfig, ConfigError};
pub use error::{ApiError, GENERIC_ERROR_MESSAGE};
pub use resource::{LoadOutcome, Resource, ResourceSource};
pub use sources::{
    BlogsSource, ContactsSource, PackagesSource, ServicesSource, TestimonialsSource,
};
pub use token::{FileTokenStore, MemoryTokenStore, TOKEN_KEY, TokenStore, TokenStoreError};
