//! The record kinds managed from the dashboard.

use std::future::Future;

use serenity_api::{
    ApiClient, ApiError, BlogsSource, ContactsSource, LoadOutcome, PackagesSource, ServicesSource,
    TestimonialsSource,
};
use serenity_core::models::{Blog, ContactMessage, Package, PageInfo, Service, Testimonial};
use serenity_core::types::{BlogId, ContactId, PackageId, ServiceId, TestimonialId};
use serenity_core::validation::{BlogForm, CatalogForm, ContactUpdate, TestimonialForm};
use serenity_core::{excerpt, format_timestamp};

use crate::collection::{AdminCollection, AdminKind, CreateKind, UpdateKind};
use crate::components::TableColumn;

/// Width of free-text cells in listings.
const CELL_CHARS: usize = 48;

fn date_cell(created_at: Option<&str>) -> String {
    created_at.map(format_timestamp).unwrap_or_default()
}

// =============================================================================
// Services
// =============================================================================

#[derive(Debug)]
pub struct Services;

impl AdminKind for Services {
    const NAME: &'static str = "services";
    const LABEL: &'static str = "Service";

    type Source = ServicesSource;
    type Id = ServiceId;

    fn source(client: ApiClient) -> ServicesSource {
        ServicesSource(client)
    }

    fn columns() -> Vec<TableColumn> {
        vec![
            TableColumn::new("id", "ID"),
            TableColumn::new("title", "Title"),
            TableColumn::new("price", "Price"),
            TableColumn::new("duration", "Duration"),
        ]
    }

    fn row(service: &Service) -> Vec<String> {
        vec![
            service.id.to_string(),
            service.title.clone(),
            service.price.display(),
            service.duration.clone().unwrap_or_default(),
        ]
    }

    fn delete(client: &ApiClient, id: &ServiceId) -> impl Future<Output = Result<(), ApiError>> + Send {
        client.delete_service(id)
    }
}

impl CreateKind for Services {
    type CreateForm = CatalogForm;

    fn create(client: &ApiClient, form: &CatalogForm) -> impl Future<Output = Result<(), ApiError>> + Send {
        client.create_service(form)
    }
}

impl UpdateKind for Services {
    type UpdateForm = CatalogForm;

    fn update(
        client: &ApiClient,
        id: &ServiceId,
        form: &CatalogForm,
    ) -> impl Future<Output = Result<(), ApiError>> + Send {
        client.update_service(id, form)
    }
}

// =============================================================================
// Packages
// =============================================================================

#[derive(Debug)]
pub struct Packages;

impl AdminKind for Packages {
    const NAME: &'static str = "packages";
    const LABEL: &'static str = "Package";

    type Source = PackagesSource;
    type Id = PackageId;

    fn source(client: ApiClient) -> PackagesSource {
        PackagesSource(client)
    }

    fn columns() -> Vec<TableColumn> {
        vec![
            TableColumn::new("id", "ID"),
            TableColumn::new("title", "Title"),
            TableColumn::new("price", "Price"),
            TableColumn::new("features", "Features"),
        ]
    }

    fn row(package: &Package) -> Vec<String> {
        vec![
            package.id.to_string(),
            package.title.clone(),
            package.price.display(),
            package.features.len().to_string(),
        ]
    }

    fn delete(client: &ApiClient, id: &PackageId) -> impl Future<Output = Result<(), ApiError>> + Send {
        client.delete_package(id)
    }
}

impl CreateKind for Packages {
    type CreateForm = CatalogForm;

    fn create(client: &ApiClient, form: &CatalogForm) -> impl Future<Output = Result<(), ApiError>> + Send {
        client.create_package(form)
    }
}

impl UpdateKind for Packages {
    type UpdateForm = CatalogForm;

    fn update(
        client: &ApiClient,
        id: &PackageId,
        form: &CatalogForm,
    ) -> impl Future<Output = Result<(), ApiError>> + Send {
        client.update_package(id, form)
    }
}

// =============================================================================
// Blogs
// =============================================================================

#[derive(Debug)]
pub struct Blogs;

impl AdminKind for Blogs {
    const NAME: &'static str = "blogs";
    const LABEL: &'static str = "Post";

    type Source = BlogsSource;
    type Id = BlogId;

    fn source(client: ApiClient) -> BlogsSource {
        BlogsSource(client)
    }

    fn columns() -> Vec<TableColumn> {
        vec![
            TableColumn::new("id", "ID"),
            TableColumn::new("title", "Title"),
            TableColumn::new("summary", "Summary"),
            TableColumn::new("created_at", "Created"),
        ]
    }

    fn row(blog: &Blog) -> Vec<String> {
        vec![
            blog.id.to_string(),
            blog.title.clone(),
            excerpt(&blog.short_description, CELL_CHARS),
            date_cell(blog.created_at.as_deref()),
        ]
    }

    fn delete(client: &ApiClient, id: &BlogId) -> impl Future<Output = Result<(), ApiError>> + Send {
        client.delete_blog(id)
    }
}

impl CreateKind for Blogs {
    type CreateForm = BlogForm;

    fn create(client: &ApiClient, form: &BlogForm) -> impl Future<Output = Result<(), ApiError>> + Send {
        client.create_blog(form)
    }
}

// =============================================================================
// Testimonials
// =============================================================================

#[derive(Debug)]
pub struct Testimonials;

impl AdminKind for Testimonials {
    const NAME: &'static str = "testimonials";
    const LABEL: &'static str = "Testimonial";

    type Source = TestimonialsSource;
    type Id = TestimonialId;

    fn source(client: ApiClient) -> TestimonialsSource {
        TestimonialsSource(client)
    }

    fn columns() -> Vec<TableColumn> {
        vec![
            TableColumn::new("id", "ID"),
            TableColumn::new("name", "Name"),
            TableColumn::new("rating", "Rating"),
            TableColumn::new("message", "Message"),
        ]
    }

    fn row(testimonial: &Testimonial) -> Vec<String> {
        vec![
            testimonial.id.to_string(),
            testimonial.name.clone(),
            testimonial.rating.map(|r| r.to_string()).unwrap_or_default(),
            excerpt(&testimonial.message, CELL_CHARS),
        ]
    }

    fn delete(
        client: &ApiClient,
        id: &TestimonialId,
    ) -> impl Future<Output = Result<(), ApiError>> + Send {
        client.delete_testimonial(id)
    }
}

impl CreateKind for Testimonials {
    type CreateForm = TestimonialForm;

    fn create(
        client: &ApiClient,
        form: &TestimonialForm,
    ) -> impl Future<Output = Result<(), ApiError>> + Send {
        client.create_testimonial(form)
    }
}

impl UpdateKind for Testimonials {
    type UpdateForm = TestimonialForm;

    fn update(
        client: &ApiClient,
        id: &TestimonialId,
        form: &TestimonialForm,
    ) -> impl Future<Output = Result<(), ApiError>> + Send {
        client.update_testimonial(id, form)
    }
}

impl AdminCollection<Testimonials> {
    /// Load page `page` (1-based). Writes refetch the page last shown.
    pub async fn go_to_page(&self, page: u32) -> LoadOutcome {
        self.load(page.max(1)).await
    }

    /// Pagination of the last successful load.
    #[must_use]
    pub fn page_info(&self) -> Option<PageInfo> {
        self.resource().with_state(|s| s.page)
    }

    /// Current page number, 1 before any load.
    #[must_use]
    pub fn current_page(&self) -> u32 {
        self.resource().last_params().max(1)
    }
}

// =============================================================================
// Contacts
// =============================================================================

#[derive(Debug)]
pub struct Contacts;

impl AdminKind for Contacts {
    const NAME: &'static str = "contacts";
    const LABEL: &'static str = "Message";

    type Source = ContactsSource;
    type Id = ContactId;

    fn source(client: ApiClient) -> ContactsSource {
        ContactsSource(client)
    }

    fn columns() -> Vec<TableColumn> {
        vec![
            TableColumn::new("id", "ID"),
            TableColumn::new("name", "Name"),
            TableColumn::new("email", "Email"),
            TableColumn::new("subject", "Subject"),
            TableColumn::new("read", "Read"),
            TableColumn::new("created_at", "Received"),
        ]
    }

    fn row(message: &ContactMessage) -> Vec<String> {
        vec![
            message.id.to_string(),
            message.name.clone(),
            message.email.clone(),
            message
                .subject
                .as_deref()
                .map(|s| excerpt(s, CELL_CHARS))
                .unwrap_or_default(),
            if message.is_read { "yes" } else { "no" }.to_string(),
            date_cell(message.created_at.as_deref()),
        ]
    }

    fn delete(client: &ApiClient, id: &ContactId) -> impl Future<Output = Result<(), ApiError>> + Send {
        client.delete_contact(id)
    }
}

impl UpdateKind for Contacts {
    type UpdateForm = ContactUpdate;

    fn update(
        client: &ApiClient,
        id: &ContactId,
        form: &ContactUpdate,
    ) -> impl Future<Output = Result<(), ApiError>> + Send {
        client.update_contact(id, form)
    }
}

#[cfg(test)]
mod tests {
    use serenity_core::types::Price;

    use super::*;

    #[test]
    fn test_service_row_matches_columns() {
        let service = Service {
            id: ServiceId::new("4"),
            title: "Aromatherapy".to_string(),
            description: String::new(),
            price: Price::from_naira(18_000),
            image: None,
            duration: Some("60 mins".to_string()),
            created_at: None,
        };
        let row = Services::row(&service);
        assert_eq!(row.len(), Services::columns().len());
        assert_eq!(row[2], "₦18,000");
    }

    #[test]
    fn test_contact_row_read_flag() {
        let message = ContactMessage {
            id: ContactId::new("9"),
            name: "Ada".to_string(),
            email: "ada@example.com".to_string(),
            phone: None,
            subject: None,
            message: "Hello".to_string(),
            is_read: true,
            created_at: Some("2024-01-02T15:04:05Z".to_string()),
        };
        let row = Contacts::row(&message);
        assert_eq!(row.len(), Contacts::columns().len());
        assert_eq!(row[4], "yes");
        assert_eq!(row[5], "02/01/24 03:04:05pm");
    }
}
