//! Records returned by the spa API.
//!
//! Field names follow the API's snake_case JSON. Optional and
//! sometimes-missing fields carry `#[serde(default)]` so one sparse record
//! does not fail a whole listing.

use std::borrow::Cow;

use serde::{Deserialize, Serialize};

use crate::types::{BlogId, ContactId, PackageId, Price, ServiceId, TestimonialId};

/// A bookable spa service (massage, facial, ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Service {
    pub id: ServiceId,
    #[serde(alias = "name")]
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub price: Price,
    /// Relative image path, resolved against the image base URL.
    #[serde(default)]
    pub image: Option<String>,
    /// Free-form duration label, e.g. "60 mins".
    #[serde(default)]
    pub duration: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
}

/// A bundle of services sold at one price.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Package {
    pub id: PackageId,
    #[serde(alias = "name")]
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub price: Price,
    #[serde(default)]
    pub image: Option<String>,
    /// Bullet points shown on the package card.
    #[serde(default)]
    pub features: Vec<String>,
    #[serde(default)]
    pub created_at: Option<String>,
}

/// A blog post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Blog {
    pub id: BlogId,
    pub title: String,
    #[serde(default)]
    pub short_description: String,
    /// Post body. The API stores it URL-encoded; see [`Blog::decoded_body`].
    #[serde(default)]
    pub body: String,
    #[serde(default)]
    pub cover_image: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
}

/// A customer testimonial.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Testimonial {
    pub id: TestimonialId,
    pub name: String,
    #[serde(alias = "content")]
    pub message: String,
    #[serde(default)]
    pub rating: Option<u8>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
}

/// A message left through the contact form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactMessage {
    pub id: ContactId,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub subject: Option<String>,
    pub message: String,
    #[serde(default)]
    pub is_read: bool,
    #[serde(default)]
    pub created_at: Option<String>,
}

/// Pagination metadata for paginated listings (testimonials).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageInfo {
    pub current_page: u32,
    pub last_page: u32,
    pub total: u64,
}

impl PageInfo {
    /// Metadata for a single page holding `total` rows.
    #[must_use]
    pub const fn single(total: u64) -> Self {
        Self {
            current_page: 1,
            last_page: 1,
            total,
        }
    }

    #[must_use]
    pub const fn has_next(&self) -> bool {
        self.current_page < self.last_page
    }

    #[must_use]
    pub const fn has_previous(&self) -> bool {
        self.current_page > 1
    }
}

/// Filters for the services listing. Unset fields are not sent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ServiceFilter {
    pub search: Option<String>,
    pub min_price: Option<Price>,
    pub max_price: Option<Price>,
}

impl ServiceFilter {
    /// Query parameters for `GET /services`.
    ///
    /// Blank searches are dropped so an emptied search box lists everything.
    #[must_use]
    pub fn query(&self) -> Vec<(&'static str, String)> {
        let mut query = Vec::new();
        if let Some(search) = self.search.as_deref().map(str::trim)
            && !search.is_empty()
        {
            query.push(("search", search.to_owned()));
        }
        if let Some(min) = self.min_price {
            query.push(("min_price", min.amount().normalize().to_string()));
        }
        if let Some(max) = self.max_price {
            query.push(("max_price", max.amount().normalize().to_string()));
        }
        query
    }

    /// `min_price` is above `max_price`.
    #[must_use]
    pub fn is_inverted(&self) -> bool {
        matches!((self.min_price, self.max_price), (Some(min), Some(max)) if min > max)
    }
}

/// One page of rows from a list endpoint.
///
/// Unpaginated endpoints report a single page holding every row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Listing<T> {
    pub items: Vec<T>,
    pub page: PageInfo,
}

impl<T> Listing<T> {
    /// A single-page listing.
    #[must_use]
    pub fn unpaged(items: Vec<T>) -> Self {
        let page = PageInfo::single(items.len() as u64);
        Self { items, page }
    }
}

impl Blog {
    /// The post body with URL-encoding undone.
    ///
    /// Bodies are sent percent-encoded on create. Anything that fails to
    /// decode is returned verbatim.
    #[must_use]
    pub fn decoded_body(&self) -> String {
        urlencoding::decode(&self.body).map_or_else(|_| self.body.clone(), Cow::into_owned)
    }
}
