//! Card view models shared by the listing pages.
//!
//! Prices go through `format_currency`, images through
//! [`ApiClient::image_url`], dates through `format_date`.

use serde::Serialize;

use serenity_api::ApiClient;
use serenity_core::models::{Blog, Package, Service, Testimonial};
use serenity_core::types::{BlogId, ItemId, PackageId, ServiceId, TestimonialId};
use serenity_core::{excerpt, format_date};

use crate::cart::CartItem;

/// Longest description shown on a catalog or blog card.
pub const CARD_EXCERPT_CHARS: usize = 120;

/// Longest testimonial quote shown on a card.
pub const QUOTE_EXCERPT_CHARS: usize = 180;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ServiceCard {
    pub id: ServiceId,
    pub title: String,
    pub summary: String,
    pub price: String,
    pub duration: Option<String>,
    pub image_url: Option<String>,
}

impl ServiceCard {
    #[must_use]
    pub fn new(service: &Service, client: &ApiClient) -> Self {
        Self {
            id: service.id.clone(),
            title: service.title.clone(),
            summary: excerpt(&service.description, CARD_EXCERPT_CHARS),
            price: service.price.display(),
            duration: service.duration.clone(),
            image_url: resolve_image(client, service.image.as_deref()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PackageCard {
    pub id: PackageId,
    pub title: String,
    pub summary: String,
    pub price: String,
    pub features: Vec<String>,
    pub image_url: Option<String>,
}

impl PackageCard {
    #[must_use]
    pub fn new(package: &Package, client: &ApiClient) -> Self {
        Self {
            id: package.id.clone(),
            title: package.title.clone(),
            summary: excerpt(&package.description, CARD_EXCERPT_CHARS),
            price: package.price.display(),
            features: package.features.clone(),
            image_url: resolve_image(client, package.image.as_deref()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BlogCard {
    pub id: BlogId,
    pub title: String,
    pub summary: String,
    pub date: Option<String>,
    pub cover_url: Option<String>,
}

impl BlogCard {
    #[must_use]
    pub fn new(blog: &Blog, client: &ApiClient) -> Self {
        let summary = if blog.short_description.trim().is_empty() {
            excerpt(&blog.decoded_body(), CARD_EXCERPT_CHARS)
        } else {
            excerpt(&blog.short_description, CARD_EXCERPT_CHARS)
        };
        Self {
            id: blog.id.clone(),
            title: blog.title.clone(),
            summary,
            date: blog.created_at.as_deref().map(format_date),
            cover_url: resolve_image(client, blog.cover_image.as_deref()),
        }
    }
}

/// Full blog post for the detail view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BlogDetail {
    pub id: BlogId,
    pub title: String,
    pub date: Option<String>,
    pub cover_url: Option<String>,
    /// Decoded post body.
    pub body: String,
}

impl BlogDetail {
    #[must_use]
    pub fn new(blog: &Blog, client: &ApiClient) -> Self {
        Self {
            id: blog.id.clone(),
            title: blog.title.clone(),
            date: blog.created_at.as_deref().map(format_date),
            cover_url: resolve_image(client, blog.cover_image.as_deref()),
            body: blog.decoded_body(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TestimonialCard {
    pub id: TestimonialId,
    pub name: String,
    pub quote: String,
    pub rating: Option<u8>,
    pub date: Option<String>,
    pub image_url: Option<String>,
}

impl TestimonialCard {
    #[must_use]
    pub fn new(testimonial: &Testimonial, client: &ApiClient) -> Self {
        Self {
            id: testimonial.id.clone(),
            name: testimonial.name.clone(),
            quote: excerpt(&testimonial.message, QUOTE_EXCERPT_CHARS),
            rating: testimonial.rating,
            date: testimonial.created_at.as_deref().map(format_date),
            image_url: resolve_image(client, testimonial.image.as_deref()),
        }
    }
}

/// Cart entry for a service, captured at its current price.
#[must_use]
pub fn service_cart_item(service: &Service) -> CartItem {
    CartItem {
        id: ItemId::from(service.id.clone()),
        title: service.title.clone(),
        price: service.price,
        image: service.image.clone(),
    }
}

/// Cart entry for a package, captured at its current price.
#[must_use]
pub fn package_cart_item(package: &Package) -> CartItem {
    CartItem {
        id: ItemId::from(package.id.clone()),
        title: package.title.clone(),
        price: package.price,
        image: package.image.clone(),
    }
}

pub(crate) fn resolve_image(client: &ApiClient, path: Option<&str>) -> Option<String> {
    path.map(str::trim)
        .filter(|p| !p.is_empty())
        .map(|p| client.image_url(p))
}
