//! Serenity Core - Shared types library.
//!
//! This crate provides common types used across all Serenity Spa components:
//! - `api` - HTTP client for the remote spa API
//! - `storefront` - Public pages, cart and reservation flow
//! - `admin` - Dashboard for services, packages, blogs, testimonials and contacts
//! - `cli` - Command-line front end
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no HTTP
//! clients. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype ids, prices, emails and resource status
//! - [`models`] - Catalog and content records returned by the API
//! - [`format`] - Currency and timestamp formatting
//! - [`validation`] - Client-side form validation

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod format;
pub mod models;
pub mod types;
pub mod validation;

pub use format::{excerpt, format_currency, format_date, format_timestamp};
pub use types::*;
