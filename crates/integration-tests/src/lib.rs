//! Integration tests for the Serenity Spa client.
//!
//! [`StubApi`] is an in-process `axum` stand-in for the spa API, bound to an
//! ephemeral port. Tests point a real [`AppState`] at it and drive the page
//! controllers end to end through `reqwest`.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p serenity-integration-tests
//! ```
//!
//! # Stub behaviour
//!
//! - `GET /api/services` answers `{"data": [...]}`, packages a bare array,
//!   blogs an empty paginated envelope, testimonials a paginated envelope
//!   with [`TESTIMONIALS_PER_PAGE`] rows per page.
//! - Writes and the contact inbox need `Authorization: Bearer` with
//!   [`VALID_TOKEN`]; [`VALID_PASSWORD`] is the only accepted login.
//! - [`StubApi::fail`] and [`StubApi::serve_html`] override one route.

#![allow(clippy::expect_used, clippy::missing_panics_doc)]

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::extract::{Multipart, Path, Query, RawQuery, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::{delete, get, post};
use axum::{Json, Router};
use serde_json::{Value, json};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use url::Url;

use serenity_api::{ApiConfig, MemoryTokenStore, TokenStore};
use serenity_storefront::{AppState, CartMode, StorefrontConfig, ToastReceiver};

/// Bearer token issued by the stub's login route.
pub const VALID_TOKEN: &str = "tok-serenity";

/// Password the stub accepts for any email.
pub const VALID_PASSWORD: &str = "correct horse";

/// Rows per testimonials page.
pub const TESTIMONIALS_PER_PAGE: usize = 2;

/// Checkout URL returned by the payment routes.
pub const CHECKOUT_URL: &str = "https://checkout.example.com/pay/SRN-1";

/// How one route misbehaves.
#[derive(Debug, Clone)]
enum Override {
    Fail { status: StatusCode, message: String },
    Html,
}

/// Records held by the stub, plus what it has been sent.
#[derive(Debug, Default)]
pub struct StubState {
    pub services: Vec<Value>,
    pub packages: Vec<Value>,
    pub testimonials: Vec<Value>,
    pub contacts: Vec<Value>,
    /// Raw query string of every `GET /api/services`.
    pub service_queries: Vec<String>,
    /// Bodies sent to `/api/payments/initialize` and `/api/ebook`.
    pub payments: Vec<Value>,
    /// `(path, Authorization header)` of every authenticated route hit.
    pub authorizations: Vec<(String, Option<String>)>,
    overrides: HashMap<&'static str, Override>,
    next_id: u64,
}

impl StubState {
    fn seeded() -> Self {
        Self {
            services: vec![
                json!({
                    "id": 1,
                    "title": "Swedish Massage",
                    "description": "Full body relaxation massage",
                    "price": "25000.00",
                    "image": "services/swedish.jpg",
                    "duration": "60 mins"
                }),
                json!({
                    "id": 2,
                    "title": "Deep Cleansing Facial",
                    "description": "Cleanse, exfoliate, mask",
                    "price": 15000,
                    "image": null,
                    "duration": "45 mins"
                }),
            ],
            packages: vec![json!({
                "id": "p1",
                "name": "Couples Retreat",
                "description": "Side by side treatments",
                "price": 60000,
                "features": ["Massage", "Facial", "Sauna"]
            })],
            testimonials: vec![
                json!({"id": 1, "name": "Ngozi", "message": "Best massage in Lagos", "rating": 5}),
                json!({"id": 2, "name": "Tunde", "content": "Very relaxing", "rating": 4}),
                json!({"id": 3, "name": "Amaka", "message": "Lovely staff"}),
            ],
            contacts: vec![json!({
                "id": 1,
                "name": "Ada",
                "email": "ada@example.com",
                "message": "Do you open on Sundays?",
                "is_read": false,
                "created_at": "2024-01-02T15:04:05Z"
            })],
            next_id: 100,
            ..Self::default()
        }
    }

    fn next_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }
}

type Shared = Arc<Mutex<StubState>>;

/// A running stub API. Stops when dropped.
#[derive(Debug)]
pub struct StubApi {
    addr: SocketAddr,
    state: Shared,
    server: JoinHandle<()>,
}

impl StubApi {
    /// Bind to `127.0.0.1:0` and start serving seeded data.
    pub async fn start() -> Self {
        let state: Shared = Arc::new(Mutex::new(StubState::seeded()));
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind stub listener");
        let addr = listener.local_addr().expect("stub address");
        let app = router(state.clone());
        let server = tokio::spawn(async move {
            axum::serve(listener, app).await.expect("stub server");
        });
        Self {
            addr,
            state,
            server,
        }
    }

    #[must_use]
    pub fn api_url(&self) -> Url {
        Url::parse(&format!("http://{}/api", self.addr)).expect("api url")
    }

    #[must_use]
    pub fn storage_url(&self) -> Url {
        Url::parse(&format!("http://{}/storage", self.addr)).expect("storage url")
    }

    /// App state wired to this stub, with no minimum loading time and an
    /// in-memory token store.
    #[must_use]
    pub fn app(&self, mode: CartMode) -> TestApp {
        let api = ApiConfig::new(self.api_url(), self.storage_url()).without_loading_delay();
        let tokens = Arc::new(MemoryTokenStore::new());
        let (state, toasts) = AppState::with_token_store(
            StorefrontConfig::new(api, mode),
            tokens.clone() as Arc<dyn TokenStore>,
        )
        .expect("app state");
        TestApp {
            state,
            toasts,
            tokens,
        }
    }

    /// Inspect or edit the stub's records.
    pub fn with<R>(&self, f: impl FnOnce(&mut StubState) -> R) -> R {
        f(&mut self.state.lock().expect("stub state"))
    }

    /// Make `route` answer `status` with a JSON `message`.
    pub fn fail(&self, route: &'static str, status: u16, message: &str) {
        let status = StatusCode::from_u16(status).expect("status code");
        self.with(|s| {
            s.overrides.insert(
                route,
                Override::Fail {
                    status,
                    message: message.to_string(),
                },
            )
        });
    }

    /// Make `route` answer with an HTML error page.
    pub fn serve_html(&self, route: &'static str) {
        self.with(|s| s.overrides.insert(route, Override::Html));
    }

    /// Undo any override on `route`.
    pub fn restore(&self, route: &'static str) {
        self.with(|s| s.overrides.remove(route));
    }
}

impl Drop for StubApi {
    fn drop(&mut self) {
        self.server.abort();
    }
}

/// Client side of a test: the app state, its toast tray and token store.
#[derive(Debug)]
pub struct TestApp {
    pub state: AppState,
    pub toasts: ToastReceiver,
    pub tokens: Arc<MemoryTokenStore>,
}

impl TestApp {
    /// Every toast raised so far.
    pub fn drain_toasts(&mut self) -> Vec<serenity_storefront::Toast> {
        std::iter::from_fn(|| self.toasts.try_recv().ok()).collect()
    }

    /// Store [`VALID_TOKEN`] as if the user had signed in.
    pub fn sign_in(&self) {
        self.tokens
            .save(&secrecy::SecretString::from(VALID_TOKEN.to_string()))
            .expect("save token");
    }
}

// =============================================================================
// Routes
// =============================================================================

fn router(state: Shared) -> Router {
    Router::new()
        .route("/api/services", get(list_services))
        .route("/api/packages", get(list_packages))
        .route("/api/blogs", get(list_blogs))
        .route("/api/blogs/{id}", get(show_blog))
        .route("/api/testimonials", get(list_testimonials).post(create_testimonial))
        .route("/api/testimonials/{id}", delete(delete_testimonial))
        .route("/api/contact", get(list_contacts).post(submit_contact))
        .route("/api/contact/{id}", delete(delete_contact).put(update_contact))
        .route("/api/ebook", post(start_payment))
        .route("/api/payments/initialize", post(start_payment))
        .route("/api/auth/login", post(login))
        .route("/api/auth/logout", post(logout))
        .with_state(state)
}

fn lock(state: &Shared) -> std::sync::MutexGuard<'_, StubState> {
    state.lock().expect("stub state")
}

fn message(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "message": message }))).into_response()
}

fn overridden(stub: &StubState, route: &str) -> Option<Response> {
    stub.overrides.get(route).map(|o| match o {
        Override::Fail { status, message: text } => message(*status, text),
        Override::Html => (
            StatusCode::BAD_GATEWAY,
            [(header::CONTENT_TYPE, "text/html; charset=utf-8")],
            "<html><body><h1>502 Bad Gateway</h1></body></html>",
        )
            .into_response(),
    })
}

/// Record the Authorization header and reject anything but the valid token.
fn authorize(stub: &mut StubState, path: &str, headers: &HeaderMap) -> Option<Response> {
    let auth = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned);
    let ok = auth.as_deref() == Some(&format!("Bearer {VALID_TOKEN}"));
    stub.authorizations.push((path.to_string(), auth));
    (!ok).then(|| message(StatusCode::UNAUTHORIZED, "Unauthenticated."))
}

async fn list_services(State(state): State<Shared>, RawQuery(query): RawQuery) -> Response {
    let mut stub = lock(&state);
    stub.service_queries.push(query.unwrap_or_default());
    if let Some(response) = overridden(&stub, "services") {
        return response;
    }
    Json(json!({ "data": stub.services })).into_response()
}

async fn list_packages(State(state): State<Shared>) -> Response {
    let stub = lock(&state);
    if let Some(response) = overridden(&stub, "packages") {
        return response;
    }
    Json(Value::Array(stub.packages.clone())).into_response()
}

async fn list_blogs(State(state): State<Shared>) -> Response {
    let stub = lock(&state);
    if let Some(response) = overridden(&stub, "blogs") {
        return response;
    }
    Json(json!({
        "data": { "data": [], "current_page": 1, "last_page": 1, "total": 0 }
    }))
    .into_response()
}

async fn show_blog(Path(_id): Path<String>) -> Response {
    message(StatusCode::NOT_FOUND, "Post not found.")
}

async fn list_testimonials(
    State(state): State<Shared>,
    Query(query): Query<HashMap<String, String>>,
) -> Response {
    let stub = lock(&state);
    if let Some(response) = overridden(&stub, "testimonials") {
        return response;
    }
    let page: usize = query
        .get("page")
        .and_then(|p| p.parse().ok())
        .unwrap_or(1)
        .max(1);
    let total = stub.testimonials.len();
    let last_page = total.div_ceil(TESTIMONIALS_PER_PAGE).max(1);
    let rows: Vec<Value> = stub
        .testimonials
        .iter()
        .skip((page - 1) * TESTIMONIALS_PER_PAGE)
        .take(TESTIMONIALS_PER_PAGE)
        .cloned()
        .collect();
    Json(json!({
        "data": {
            "data": rows,
            "current_page": page,
            "last_page": last_page,
            "total": total
        }
    }))
    .into_response()
}

async fn create_testimonial(
    State(state): State<Shared>,
    headers: HeaderMap,
    mut multipart: Multipart,
) -> Response {
    let rejected = authorize(&mut lock(&state), "testimonials", &headers);
    if let Some(response) = rejected {
        return response;
    }

    let mut fields = serde_json::Map::new();
    while let Ok(Some(field)) = multipart.next_field().await {
        let name = field.name().unwrap_or_default().to_string();
        if let Some(file_name) = field.file_name().map(str::to_owned) {
            let _ = field.bytes().await;
            fields.insert(name, Value::String(format!("testimonials/{file_name}")));
        } else if let Ok(text) = field.text().await {
            let value = if name == "rating" {
                text.parse::<u64>().map_or(Value::String(text), Value::from)
            } else {
                Value::String(text)
            };
            fields.insert(name, value);
        }
    }

    let mut stub = lock(&state);
    let id = stub.next_id();
    fields.insert("id".to_string(), Value::from(id));
    let record = Value::Object(fields);
    stub.testimonials.push(record.clone());
    (StatusCode::CREATED, Json(json!({ "data": record }))).into_response()
}

async fn delete_testimonial(
    State(state): State<Shared>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> StatusCode {
    let mut stub = lock(&state);
    if authorize(&mut stub, "testimonials", &headers).is_some() {
        return StatusCode::UNAUTHORIZED;
    }
    stub.testimonials.retain(|t| t["id"].to_string() != id);
    StatusCode::NO_CONTENT
}

async fn list_contacts(State(state): State<Shared>, headers: HeaderMap) -> Response {
    let mut stub = lock(&state);
    if let Some(response) = authorize(&mut stub, "contact", &headers) {
        return response;
    }
    Json(json!({ "data": stub.contacts })).into_response()
}

async fn submit_contact(State(state): State<Shared>, Json(mut body): Json<Value>) -> Response {
    let mut stub = lock(&state);
    if let Some(response) = overridden(&stub, "contact") {
        return response;
    }
    let id = stub.next_id();
    body["id"] = Value::from(id);
    body["is_read"] = Value::Bool(false);
    stub.contacts.push(body);
    Json(json!({ "status": true, "message": "Message received" })).into_response()
}

async fn update_contact(
    State(state): State<Shared>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> Response {
    let mut stub = lock(&state);
    if let Some(response) = authorize(&mut stub, "contact", &headers) {
        return response;
    }
    let is_read = body["is_read"].as_bool().unwrap_or_default();
    match stub.contacts.iter_mut().find(|c| c["id"].to_string() == id) {
        Some(contact) => {
            contact["is_read"] = Value::Bool(is_read);
            Json(json!({ "data": contact })).into_response()
        }
        None => message(StatusCode::NOT_FOUND, "Message not found."),
    }
}

async fn delete_contact(
    State(state): State<Shared>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> StatusCode {
    let mut stub = lock(&state);
    if authorize(&mut stub, "contact", &headers).is_some() {
        return StatusCode::UNAUTHORIZED;
    }
    stub.contacts.retain(|c| c["id"].to_string() != id);
    StatusCode::NO_CONTENT
}

async fn start_payment(State(state): State<Shared>, Json(body): Json<Value>) -> Response {
    let mut stub = lock(&state);
    if let Some(response) = overridden(&stub, "payments") {
        return response;
    }
    stub.payments.push(body);
    Json(json!({
        "status": true,
        "message": "Authorization URL created",
        "data": { "authorization_url": CHECKOUT_URL, "reference": "SRN-1" }
    }))
    .into_response()
}

async fn login(Json(body): Json<Value>) -> Response {
    if body["password"].as_str() == Some(VALID_PASSWORD) {
        Json(json!({ "data": { "token": VALID_TOKEN } })).into_response()
    } else {
        message(StatusCode::UNAUTHORIZED, "Invalid credentials")
    }
}

async fn logout(State(state): State<Shared>, headers: HeaderMap) -> Response {
    let mut stub = lock(&state);
    if let Some(response) = authorize(&mut stub, "auth/logout", &headers) {
        return response;
    }
    Json(json!({ "message": "Logged out" })).into_response()
}
