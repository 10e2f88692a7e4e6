//! HTTP client for the spa's REST API.
//!
//! One method per endpoint. Reads go through [`envelope::unwrap_list`] so
//! page controllers see a [`Listing`] whatever envelope the endpoint uses.
//! Write endpoints that need a bearer token fail with
//! [`ApiError::Unauthenticated`] before any request when none is stored.

use std::sync::Arc;

use reqwest::header::{ACCEPT, CONTENT_TYPE, HeaderMap, HeaderValue};
use reqwest::multipart::{Form, Part};
use reqwest::{Method, RequestBuilder};
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use tracing::{debug, error, instrument, warn};
use url::Url;

use serenity_core::models::{
    Blog, ContactMessage, Listing, Package, Service, ServiceFilter, Testimonial,
};
use serenity_core::types::{BlogId, ContactId, ItemId, PackageId, Price, ServiceId, TestimonialId};
use serenity_core::validation::{
    BlogForm, CatalogForm, ContactForm, ContactUpdate, EbookOrder, FileUpload, LoginForm,
    RegisterForm, TestimonialForm,
};

use crate::config::ApiConfig;
use crate::envelope;
use crate::error::{ApiError, GENERIC_ERROR_MESSAGE};
use crate::token::TokenStore;

/// Keys the auth endpoints have been seen to return the token under.
const TOKEN_FIELDS: &[&str] = &["token", "access_token", "authToken"];

/// Longest response body excerpt written to the logs.
const LOG_BODY_LIMIT: usize = 500;

/// Whether a request carries the bearer token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Auth {
    /// Never attach a token.
    None,
    /// Attach the token when one is stored.
    Optional,
    /// Fail with `Unauthenticated` when no token is stored.
    Required,
}

/// Where a payment flow continues.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentRedirect {
    /// Provider checkout page to open in a browser.
    pub authorization_url: Url,
    /// Provider reference, when the API returns one.
    pub reference: Option<String>,
}

/// One cart line sent with a reservation payment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PaymentItem {
    /// Sent as `kind` and `id` fields.
    #[serde(flatten)]
    pub id: ItemId,
    pub title: String,
    pub quantity: u32,
    pub unit_price: Price,
}

/// Body of `POST /payments/initialize`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReservationPayment {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub date: String,
    pub time: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub items: Vec<PaymentItem>,
    pub amount: Price,
}

/// Catalog kinds that share the create/update/delete contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Catalog {
    Services,
    Packages,
}

impl Catalog {
    const fn path(self) -> &'static str {
        match self {
            Self::Services => "services",
            Self::Packages => "packages",
        }
    }
}

// =============================================================================
// Client
// =============================================================================

struct ClientInner {
    http: reqwest::Client,
    base_url: Url,
    image_base_url: Url,
    tokens: Arc<dyn TokenStore>,
}

/// Client for the spa API.
///
/// Cheap to clone; clones share the connection pool and token store.
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<ClientInner>,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.inner.base_url.as_str())
            .field("image_base_url", &self.inner.image_base_url.as_str())
            .field("tokens", &self.inner.tokens)
            .finish_non_exhaustive()
    }
}

impl ApiClient {
    /// Create a client for the configured API.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Network` if the HTTP client cannot be built.
    pub fn new(config: &ApiConfig, tokens: Arc<dyn TokenStore>) -> Result<Self, ApiError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .user_agent(concat!("serenity-spa/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            inner: Arc::new(ClientInner {
                http,
                base_url: config.base_url.clone(),
                image_base_url: config.image_base_url.clone(),
                tokens,
            }),
        })
    }

    /// The token store requests are authorized from.
    #[must_use]
    pub fn tokens(&self) -> &Arc<dyn TokenStore> {
        &self.inner.tokens
    }

    /// Whether a bearer token is stored.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::TokenStore` if the store cannot be read.
    pub fn has_token(&self) -> Result<bool, ApiError> {
        Ok(self.inner.tokens.load()?.is_some())
    }

    /// Absolute URL of an image path returned by the API.
    ///
    /// Absolute `http(s)` URLs pass through; relative paths are joined to the
    /// image base with exactly one slash.
    #[must_use]
    pub fn image_url(&self, path: &str) -> String {
        join_path(&self.inner.image_base_url, path)
    }

    /// Absolute URL of an endpoint path.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::InvalidUrl` if the joined URL does not parse.
    pub fn endpoint(&self, path: &str) -> Result<Url, ApiError> {
        Ok(Url::parse(&join_path(&self.inner.base_url, path))?)
    }

    // =========================================================================
    // Request plumbing
    // =========================================================================

    fn request(&self, method: Method, path: &str) -> Result<RequestBuilder, ApiError> {
        Ok(self.inner.http.request(method, self.endpoint(path)?))
    }

    fn authorize(&self, request: RequestBuilder, auth: Auth) -> Result<RequestBuilder, ApiError> {
        if auth == Auth::None {
            return Ok(request);
        }
        match self.inner.tokens.load()? {
            Some(token) => Ok(request.bearer_auth(token.expose_secret())),
            None if auth == Auth::Required => Err(ApiError::Unauthenticated),
            None => Ok(request),
        }
    }

    /// Send a request and return its JSON body.
    ///
    /// An empty 2xx body (e.g. `204 No Content`) yields `Value::Null`.
    async fn execute(&self, request: RequestBuilder, auth: Auth) -> Result<Value, ApiError> {
        let response = self.authorize(request, auth)?.send().await?;
        let status = response.status();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_owned();
        let text = response.text().await?;

        if text.trim().is_empty() {
            if status.is_success() {
                return Ok(Value::Null);
            }
            warn!(status = %status, "API returned an empty error response");
            return Err(ApiError::Api {
                status: status.as_u16(),
                message: GENERIC_ERROR_MESSAGE.to_string(),
            });
        }

        if !is_json(&content_type) {
            error!(
                status = %status,
                content_type = %content_type,
                body = %truncate(&text, LOG_BODY_LIMIT),
                "API returned a non-JSON response"
            );
            return Err(ApiError::NotJson {
                status: status.as_u16(),
                content_type,
            });
        }

        let body: Value = serde_json::from_str(&text).map_err(|e| {
            error!(
                status = %status,
                error = %e,
                body = %truncate(&text, LOG_BODY_LIMIT),
                "Failed to parse API response"
            );
            ApiError::Decode(e)
        })?;

        if !status.is_success() {
            let message =
                envelope::message_of(&body).unwrap_or_else(|| GENERIC_ERROR_MESSAGE.to_string());
            warn!(status = %status, message = %message, "API request failed");
            return Err(ApiError::Api {
                status: status.as_u16(),
                message,
            });
        }

        if let Some(message) = envelope::reported_failure(&body) {
            warn!(status = %status, message = %message, "API reported failure");
            return Err(ApiError::Api {
                status: status.as_u16(),
                message,
            });
        }

        Ok(body)
    }

    async fn get_list<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
        auth: Auth,
    ) -> Result<Listing<T>, ApiError> {
        let request = self.request(Method::GET, path)?.query(query);
        let body = self.execute(request, auth).await?;
        let listing = envelope::unwrap_list(body)?;
        debug!(path, rows = listing.items.len(), "Fetched list");
        Ok(listing)
    }

    async fn send_json(
        &self,
        method: Method,
        path: &str,
        body: &impl Serialize,
        auth: Auth,
    ) -> Result<Value, ApiError> {
        let request = self.request(method, path)?.json(body);
        self.execute(request, auth).await
    }

    async fn send_multipart(
        &self,
        method: Method,
        path: &str,
        form: Form,
    ) -> Result<Value, ApiError> {
        let request = self.request(method, path)?.multipart(form);
        self.execute(request, Auth::Required).await
    }

    async fn delete(&self, path: &str) -> Result<(), ApiError> {
        let request = self.request(Method::DELETE, path)?;
        self.execute(request, Auth::Required).await?;
        Ok(())
    }

    // =========================================================================
    // Catalog
    // =========================================================================

    /// `GET /services`, with only the set filters sent.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the request fails or the rows do not decode.
    #[instrument(skip(self))]
    pub async fn list_services(&self, filter: &ServiceFilter) -> Result<Listing<Service>, ApiError> {
        self.get_list("services", &filter.query(), Auth::None).await
    }

    /// `GET /packages`.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the request fails or the rows do not decode.
    #[instrument(skip(self))]
    pub async fn list_packages(&self) -> Result<Listing<Package>, ApiError> {
        self.get_list("packages", &[], Auth::None).await
    }

    /// `POST /services`.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Unauthenticated` without a token, or the API error.
    #[instrument(skip(self, form), fields(title = %form.title))]
    pub async fn create_service(&self, form: &CatalogForm) -> Result<(), ApiError> {
        self.write_catalog(Catalog::Services, None, form).await
    }

    /// `PUT /services/{id}`.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Unauthenticated` without a token, or the API error.
    #[instrument(skip(self, form), fields(id = %id))]
    pub async fn update_service(&self, id: &ServiceId, form: &CatalogForm) -> Result<(), ApiError> {
        self.write_catalog(Catalog::Services, Some(id.as_str()), form).await
    }

    /// `DELETE /services/{id}`.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Unauthenticated` without a token, or the API error.
    #[instrument(skip(self), fields(id = %id))]
    pub async fn delete_service(&self, id: &ServiceId) -> Result<(), ApiError> {
        self.delete(&format!("services/{id}")).await
    }

    /// `POST /packages`.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Unauthenticated` without a token, or the API error.
    #[instrument(skip(self, form), fields(title = %form.title))]
    pub async fn create_package(&self, form: &CatalogForm) -> Result<(), ApiError> {
        self.write_catalog(Catalog::Packages, None, form).await
    }

    /// `PUT /packages/{id}`.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Unauthenticated` without a token, or the API error.
    #[instrument(skip(self, form), fields(id = %id))]
    pub async fn update_package(&self, id: &PackageId, form: &CatalogForm) -> Result<(), ApiError> {
        self.write_catalog(Catalog::Packages, Some(id.as_str()), form).await
    }

    /// `DELETE /packages/{id}`.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Unauthenticated` without a token, or the API error.
    #[instrument(skip(self), fields(id = %id))]
    pub async fn delete_package(&self, id: &PackageId) -> Result<(), ApiError> {
        self.delete(&format!("packages/{id}")).await
    }

    async fn write_catalog(
        &self,
        kind: Catalog,
        id: Option<&str>,
        form: &CatalogForm,
    ) -> Result<(), ApiError> {
        let path = id.map_or_else(
            || kind.path().to_string(),
            |id| format!("{}/{id}", kind.path()),
        );

        match (&form.image, id) {
            (Some(image), _) => {
                let mut multipart = Form::new()
                    .text("title", form.title.trim().to_string())
                    .text("description", form.description.trim().to_string())
                    .text("price", form.price.trim().to_string());
                if let Some(duration) = &form.duration {
                    multipart = multipart.text("duration", duration.clone());
                }
                for feature in &form.features {
                    multipart = multipart.text("features[]", feature.clone());
                }
                multipart = multipart.part("image", file_part(image)?);
                if id.is_some() {
                    // Multipart bodies are only parsed on POST; the API
                    // honours a method override field instead.
                    multipart = multipart.text("_method", "PUT");
                }
                self.send_multipart(Method::POST, &path, multipart).await?;
            }
            (None, _) => {
                let body = json!({
                    "title": form.title.trim(),
                    "description": form.description.trim(),
                    "price": form.price.trim(),
                    "duration": form.duration,
                    "features": form.features,
                });
                let method = if id.is_some() { Method::PUT } else { Method::POST };
                self.send_json(method, &path, &body, Auth::Required).await?;
            }
        }
        Ok(())
    }

    // =========================================================================
    // Blogs
    // =========================================================================

    /// `GET /blogs`.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the request fails or the rows do not decode.
    #[instrument(skip(self))]
    pub async fn list_blogs(&self) -> Result<Listing<Blog>, ApiError> {
        self.get_list("blogs", &[], Auth::None).await
    }

    /// `GET /blogs/{id}`.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the request fails or the post does not decode.
    #[instrument(skip(self), fields(id = %id))]
    pub async fn get_blog(&self, id: &BlogId) -> Result<Blog, ApiError> {
        let request = self.request(Method::GET, &format!("blogs/{id}"))?;
        let body = self.execute(request, Auth::None).await?;
        envelope::unwrap_item(body)
    }

    /// `POST /blogs` as multipart. The body text is URL-encoded before upload.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Unauthenticated` without a token, or the API error.
    #[instrument(skip(self, form), fields(title = %form.title))]
    pub async fn create_blog(&self, form: &BlogForm) -> Result<(), ApiError> {
        let mut multipart = Form::new()
            .text("title", form.title.trim().to_string())
            .text("short_description", form.short_description.trim().to_string())
            .text("body", urlencoding::encode(&form.body).into_owned());
        if let Some(cover) = &form.cover_image {
            multipart = multipart.part("cover_image", file_part(cover)?);
        }
        self.send_multipart(Method::POST, "blogs", multipart).await?;
        Ok(())
    }

    /// `DELETE /blogs/{id}`.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Unauthenticated` without a token, or the API error.
    #[instrument(skip(self), fields(id = %id))]
    pub async fn delete_blog(&self, id: &BlogId) -> Result<(), ApiError> {
        self.delete(&format!("blogs/{id}")).await
    }

    // =========================================================================
    // Testimonials
    // =========================================================================

    /// `GET /testimonials?page=N`. The token is attached when one is stored.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the request fails or the rows do not decode.
    #[instrument(skip(self))]
    pub async fn list_testimonials(&self, page: u32) -> Result<Listing<Testimonial>, ApiError> {
        let page = page.max(1);
        self.get_list("testimonials", &[("page", page.to_string())], Auth::Optional)
            .await
    }

    /// `POST /testimonials` as multipart.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Unauthenticated` without a token, or the API error.
    #[instrument(skip(self, form), fields(name = %form.name))]
    pub async fn create_testimonial(&self, form: &TestimonialForm) -> Result<(), ApiError> {
        let multipart = testimonial_multipart(form)?;
        self.send_multipart(Method::POST, "testimonials", multipart).await?;
        Ok(())
    }

    /// `PUT /testimonials/{id}`.
    ///
    /// With a new image the update is sent as a multipart `POST` carrying
    /// `_method=PUT`; without one it is a plain JSON `PUT`.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Unauthenticated` without a token, or the API error.
    #[instrument(skip(self, form), fields(id = %id))]
    pub async fn update_testimonial(
        &self,
        id: &TestimonialId,
        form: &TestimonialForm,
    ) -> Result<(), ApiError> {
        let path = format!("testimonials/{id}");
        if form.image.is_some() {
            let multipart = testimonial_multipart(form)?.text("_method", "PUT");
            self.send_multipart(Method::POST, &path, multipart).await?;
        } else {
            let body = json!({
                "name": form.name.trim(),
                "message": form.message.trim(),
                "rating": form.rating,
            });
            self.send_json(Method::PUT, &path, &body, Auth::Required).await?;
        }
        Ok(())
    }

    /// `DELETE /testimonials/{id}`.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Unauthenticated` without a token, or the API error.
    #[instrument(skip(self), fields(id = %id))]
    pub async fn delete_testimonial(&self, id: &TestimonialId) -> Result<(), ApiError> {
        self.delete(&format!("testimonials/{id}")).await
    }

    // =========================================================================
    // Contact
    // =========================================================================

    /// `GET /contact`. Dashboard only.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Unauthenticated` without a token, or the API error.
    #[instrument(skip(self))]
    pub async fn list_contacts(&self) -> Result<Listing<ContactMessage>, ApiError> {
        self.get_list("contact", &[], Auth::Required).await
    }

    /// `POST /contact` from the public contact form.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the API rejects the message.
    #[instrument(skip(self, form), fields(email = %form.email))]
    pub async fn submit_contact(&self, form: &ContactForm) -> Result<(), ApiError> {
        self.send_json(Method::POST, "contact", form, Auth::None).await?;
        Ok(())
    }

    /// `PUT /contact/{id}`.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Unauthenticated` without a token, or the API error.
    #[instrument(skip(self), fields(id = %id))]
    pub async fn update_contact(&self, id: &ContactId, update: &ContactUpdate) -> Result<(), ApiError> {
        self.send_json(Method::PUT, &format!("contact/{id}"), update, Auth::Required)
            .await?;
        Ok(())
    }

    /// `DELETE /contact/{id}`.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Unauthenticated` without a token, or the API error.
    #[instrument(skip(self), fields(id = %id))]
    pub async fn delete_contact(&self, id: &ContactId) -> Result<(), ApiError> {
        self.delete(&format!("contact/{id}")).await
    }

    // =========================================================================
    // Payments
    // =========================================================================

    /// `POST /ebook`; returns the provider checkout URL.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the API rejects the order or omits the URL.
    #[instrument(skip(self, order), fields(email = %order.email, payment_type = %order.payment_type))]
    pub async fn purchase_ebook(&self, order: &EbookOrder) -> Result<PaymentRedirect, ApiError> {
        let body = self.send_json(Method::POST, "ebook", order, Auth::None).await?;
        payment_redirect(&body)
    }

    /// `POST /payments/initialize` for a reservation; returns the provider
    /// checkout URL.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the API rejects the payment or omits the URL.
    #[instrument(skip(self, reservation), fields(email = %reservation.email, amount = %reservation.amount))]
    pub async fn initialize_payment(
        &self,
        reservation: &ReservationPayment,
    ) -> Result<PaymentRedirect, ApiError> {
        let body = self
            .send_json(Method::POST, "payments/initialize", reservation, Auth::Optional)
            .await?;
        payment_redirect(&body)
    }

    // =========================================================================
    // Auth
    // =========================================================================

    /// `POST /auth/login`; stores the returned token.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the credentials are rejected or no token is
    /// returned.
    #[instrument(skip(self, form), fields(email = %form.email))]
    pub async fn login(&self, form: &LoginForm) -> Result<(), ApiError> {
        let response = self.send_json(Method::POST, "auth/login", form, Auth::None).await?;
        self.store_token(&response)
    }

    /// `POST /auth/register`; stores the returned token when there is one.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the API rejects the registration.
    #[instrument(skip(self, form), fields(email = %form.email))]
    pub async fn register(&self, form: &RegisterForm) -> Result<(), ApiError> {
        let response = self
            .send_json(Method::POST, "auth/register", form, Auth::None)
            .await?;
        if envelope::find_string(&response, TOKEN_FIELDS).is_some() {
            self.store_token(&response)?;
        }
        Ok(())
    }

    /// `POST /auth/logout`. The local token is cleared even if the request
    /// fails.
    ///
    /// # Errors
    ///
    /// Returns the request error, or `ApiError::TokenStore` if the token
    /// cannot be cleared.
    #[instrument(skip(self))]
    pub async fn logout(&self) -> Result<(), ApiError> {
        let result = match self.request(Method::POST, "auth/logout") {
            Ok(request) => self.execute(request, Auth::Required).await.map(|_| ()),
            Err(e) => Err(e),
        };
        self.inner.tokens.clear()?;
        result
    }

    fn store_token(&self, body: &Value) -> Result<(), ApiError> {
        let token = envelope::find_string(body, TOKEN_FIELDS)
            .ok_or_else(|| missing_field("token"))?;
        self.inner.tokens.save(&SecretString::from(token))?;
        debug!("Stored bearer token");
        Ok(())
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

fn join_path(base: &Url, path: &str) -> String {
    let path = path.trim();
    if path.starts_with("http://") || path.starts_with("https://") {
        return path.to_string();
    }
    format!(
        "{}/{}",
        base.as_str().trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

fn is_json(content_type: &str) -> bool {
    content_type
        .split(';')
        .next()
        .is_some_and(|essence| essence.trim().to_ascii_lowercase().ends_with("json"))
}

fn truncate(text: &str, limit: usize) -> &str {
    text.char_indices()
        .nth(limit)
        .map_or(text, |(idx, _)| text.get(..idx).unwrap_or(text))
}

fn missing_field(name: &'static str) -> ApiError {
    ApiError::Decode(<serde_json::Error as serde::de::Error>::missing_field(name))
}

fn payment_redirect(body: &Value) -> Result<PaymentRedirect, ApiError> {
    let url = envelope::find_string(body, &["authorization_url"])
        .ok_or_else(|| missing_field("authorization_url"))?;
    Ok(PaymentRedirect {
        authorization_url: Url::parse(&url)?,
        reference: envelope::find_string(body, &["reference"]),
    })
}

fn file_part(upload: &FileUpload) -> Result<Part, ApiError> {
    Ok(Part::bytes(upload.bytes.clone())
        .file_name(upload.file_name.clone())
        .mime_str(&upload.content_type)?)
}

fn testimonial_multipart(form: &TestimonialForm) -> Result<Form, ApiError> {
    let mut multipart = Form::new()
        .text("name", form.name.trim().to_string())
        .text("message", form.message.trim().to_string());
    if let Some(rating) = form.rating {
        multipart = multipart.text("rating", rating.to_string());
    }
    if let Some(image) = &form.image {
        multipart = multipart.part("image", file_part(image)?);
    }
    Ok(multipart)
}
