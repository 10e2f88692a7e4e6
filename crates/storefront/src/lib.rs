//! Serenity Spa storefront.
//!
//! The public side of the site as page controllers: catalog listings, blog,
//! contact form, ebook purchase, the cart and reservation checkout. Each page
//! holds its own state and reports outcomes as toasts; rendering is left to
//! the caller.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod config;
pub mod error;
pub mod notify;
pub mod pages;
pub mod state;

pub use cart::{Cart, CartItem, CartLine, CartMode, CartStore};
pub use config::StorefrontConfig;
pub use error::PageError;
pub use notify::{Notifier, Toast, ToastLevel, ToastReceiver};
pub use state::AppState;
