//! Serenity Spa dashboard.
//!
//! Page controllers for staff: sign-in, an overview of record counts, and a
//! generic [`AdminCollection`] for services, packages, blog posts,
//! testimonials and contact messages.
//!
//! The API enforces permissions; here a stored bearer token is all that
//! separates signed-in from signed-out.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod auth;
pub mod collection;
pub mod components;
pub mod dashboard;
pub mod error;
pub mod kinds;

pub use auth::AuthSession;
pub use collection::{AdminCollection, AdminKind, CreateKind, UpdateKind};
pub use dashboard::{Dashboard, Overview};
pub use error::AdminError;
pub use kinds::{Blogs, Contacts, Packages, Services, Testimonials};
