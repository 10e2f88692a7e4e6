//! [`ResourceSource`] implementations for each list endpoint.

use std::future::Future;

use serenity_core::models::{
    Blog, ContactMessage, Listing, Package, Service, ServiceFilter, Testimonial,
};

use crate::client::ApiClient;
use crate::error::ApiError;
use crate::resource::ResourceSource;

/// `GET /services` with a [`ServiceFilter`].
#[derive(Debug, Clone)]
pub struct ServicesSource(pub ApiClient);

impl ResourceSource for ServicesSource {
    type Item = Service;
    type Params = ServiceFilter;

    fn fetch(
        &self,
        filter: ServiceFilter,
    ) -> impl Future<Output = Result<Listing<Service>, ApiError>> + Send {
        async move { self.0.list_services(&filter).await }
    }
}

/// `GET /packages`.
#[derive(Debug, Clone)]
pub struct PackagesSource(pub ApiClient);

impl ResourceSource for PackagesSource {
    type Item = Package;
    type Params = ();

    fn fetch(&self, (): ()) -> impl Future<Output = Result<Listing<Package>, ApiError>> + Send {
        self.0.list_packages()
    }
}

/// `GET /blogs`.
#[derive(Debug, Clone)]
pub struct BlogsSource(pub ApiClient);

impl ResourceSource for BlogsSource {
    type Item = Blog;
    type Params = ();

    fn fetch(&self, (): ()) -> impl Future<Output = Result<Listing<Blog>, ApiError>> + Send {
        self.0.list_blogs()
    }
}

/// `GET /testimonials?page=N`. Page `0` is read as the first page.
#[derive(Debug, Clone)]
pub struct TestimonialsSource(pub ApiClient);

impl ResourceSource for TestimonialsSource {
    type Item = Testimonial;
    type Params = u32;

    fn fetch(
        &self,
        page: u32,
    ) -> impl Future<Output = Result<Listing<Testimonial>, ApiError>> + Send {
        self.0.list_testimonials(page)
    }
}

/// `GET /contact` (bearer).
#[derive(Debug, Clone)]
pub struct ContactsSource(pub ApiClient);

impl ResourceSource for ContactsSource {
    type Item = ContactMessage;
    type Params = ();

    fn fetch(
        &self,
        (): (),
    ) -> impl Future<Output = Result<Listing<ContactMessage>, ApiError>> + Send {
        self.0.list_contacts()
    }
}
