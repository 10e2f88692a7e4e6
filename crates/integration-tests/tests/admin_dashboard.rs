//! Dashboard sign-in and refetch-after-write CRUD against the stub API.

#![allow(clippy::unwrap_used)]

use secrecy::{ExposeSecret, SecretString};
use serenity_admin::{AdminCollection, AdminError, AuthSession, Contacts, Dashboard, Testimonials};
use serenity_api::{ApiError, TokenStore};
use serenity_core::types::{ContactId, TestimonialId};
use serenity_core::validation::{ContactUpdate, FileUpload, LoginForm, TestimonialForm};
use serenity_integration_tests::{StubApi, VALID_PASSWORD, VALID_TOKEN};
use serenity_storefront::{CartMode, ToastLevel};

fn testimonial(name: &str) -> TestimonialForm {
    TestimonialForm {
        name: name.to_string(),
        message: "Came in stressed, left floating".to_string(),
        rating: Some(5),
        image: None,
    }
}

// ============================================================================
// Auth
// ============================================================================

#[tokio::test]
async fn test_login_stores_token() {
    let stub = StubApi::start().await;
    let mut app = stub.app(CartMode::Slots);
    let session = AuthSession::new(&app.state);
    assert!(!session.is_authenticated());

    let form = LoginForm {
        email: "staff@serenity.example".to_string(),
        password: VALID_PASSWORD.to_string(),
    };
    session.login(&form).await.unwrap();

    assert!(session.is_authenticated());
    let token = app.tokens.load().unwrap().unwrap();
    assert_eq!(token.expose_secret(), VALID_TOKEN);
    assert_eq!(app.drain_toasts()[0].title, "Signed in");
}

#[tokio::test]
async fn test_rejected_login_stores_nothing() {
    let stub = StubApi::start().await;
    let mut app = stub.app(CartMode::Slots);
    let session = AuthSession::new(&app.state);

    let form = LoginForm {
        email: "staff@serenity.example".to_string(),
        password: "wrong".to_string(),
    };
    let err = session.login(&form).await.unwrap_err();

    assert!(err.is_unauthorized());
    assert!(!session.is_authenticated());
    let toast = app.drain_toasts().remove(0);
    assert_eq!(toast.level, ToastLevel::Error);
    assert_eq!(toast.message, "Invalid credentials");
}

#[tokio::test]
async fn test_logout_clears_token() {
    let stub = StubApi::start().await;
    let app = stub.app(CartMode::Slots);
    app.sign_in();
    let session = AuthSession::new(&app.state);

    session.logout().await.unwrap();

    assert!(!session.is_authenticated());
    let (path, auth) = stub.with(|s| s.authorizations.last().cloned()).unwrap();
    assert_eq!(path, "auth/logout");
    assert_eq!(auth.as_deref(), Some(format!("Bearer {VALID_TOKEN}").as_str()));
}

#[tokio::test]
async fn test_logout_with_expired_token_counts_as_signed_out() {
    let stub = StubApi::start().await;
    let mut app = stub.app(CartMode::Slots);
    app.tokens
        .save(&SecretString::from("expired".to_string()))
        .unwrap();
    let session = AuthSession::new(&app.state);

    session.logout().await.unwrap();

    assert!(!session.is_authenticated());
    let (path, auth) = stub.with(|s| s.authorizations.last().cloned()).unwrap();
    assert_eq!(path, "auth/logout");
    assert_eq!(auth.as_deref(), Some("Bearer expired"));
    let toasts = app.drain_toasts();
    assert_eq!(toasts.len(), 1);
    assert_eq!(toasts[0].level, ToastLevel::Success);
    assert_eq!(toasts[0].title, "Signed out");
}

// ============================================================================
// Testimonials
// ============================================================================

#[tokio::test]
async fn test_create_testimonial_refetches() {
    let stub = StubApi::start().await;
    let mut app = stub.app(CartMode::Slots);
    app.sign_in();
    let page = AdminCollection::<Testimonials>::new(&app.state);
    assert!(page.mount().await.is_loaded());
    assert_eq!(page.page_info().unwrap().total, 3);

    let mut form = testimonial("Kemi");
    form.image = Some(FileUpload {
        file_name: "kemi.png".to_string(),
        content_type: "image/png".to_string(),
        bytes: vec![0x89, b'P', b'N', b'G'],
    });
    page.create(&form).await.unwrap();

    let info = page.page_info().unwrap();
    assert_eq!(info.total, 4);
    assert_eq!(info.last_page, 2);

    let stored = stub.with(|s| s.testimonials.last().cloned()).unwrap();
    assert_eq!(stored["name"], "Kemi");
    assert_eq!(stored["rating"], 5);
    assert_eq!(stored["image"], "testimonials/kemi.png");

    let toast = app.drain_toasts().remove(0);
    assert_eq!(toast.level, ToastLevel::Success);
    assert_eq!(toast.title, "Testimonial created");
}

#[tokio::test]
async fn test_write_refetches_current_page() {
    let stub = StubApi::start().await;
    let app = stub.app(CartMode::Slots);
    app.sign_in();
    let page = AdminCollection::<Testimonials>::new(&app.state);
    assert!(page.go_to_page(2).await.is_loaded());
    assert_eq!(page.snapshot().data.len(), 1);

    page.create(&testimonial("Femi")).await.unwrap();

    assert_eq!(page.current_page(), 2);
    let names: Vec<String> = page.snapshot().data.iter().map(|t| t.name.clone()).collect();
    assert_eq!(names, vec!["Amaka", "Femi"]);
}

#[tokio::test]
async fn test_create_without_token_sends_nothing() {
    let stub = StubApi::start().await;
    let mut app = stub.app(CartMode::Slots);
    let page = AdminCollection::<Testimonials>::new(&app.state);
    assert!(page.mount().await.is_loaded());

    let err = page.create(&testimonial("Kemi")).await.unwrap_err();

    assert!(matches!(err, AdminError::Api(ApiError::Unauthenticated)));
    assert_eq!(stub.with(|s| s.testimonials.len()), 3);
    assert!(stub.with(|s| s.authorizations.is_empty()));
    assert_eq!(page.snapshot().data.len(), 2);
    assert_eq!(app.drain_toasts()[0].title, "Failed to create testimonial");
}

#[tokio::test]
async fn test_delete_testimonial() {
    let stub = StubApi::start().await;
    let app = stub.app(CartMode::Slots);
    app.sign_in();
    let page = AdminCollection::<Testimonials>::new(&app.state);
    assert!(page.mount().await.is_loaded());

    page.delete(&TestimonialId::new("1")).await.unwrap();

    assert_eq!(page.page_info().unwrap().total, 2);
    assert_eq!(page.snapshot().data[0].name, "Tunde");
}

// ============================================================================
// Contacts and overview
// ============================================================================

#[tokio::test]
async fn test_mark_contact_read() {
    let stub = StubApi::start().await;
    let app = stub.app(CartMode::Slots);
    app.sign_in();
    let page = AdminCollection::<Contacts>::new(&app.state);
    assert!(page.mount().await.is_loaded());
    assert!(!page.snapshot().data[0].is_read);

    page.update(&ContactId::new("1"), &ContactUpdate { is_read: true })
        .await
        .unwrap();

    assert!(page.snapshot().data[0].is_read);
    assert!(page.table().render().contains("yes"));
}

#[tokio::test]
async fn test_contacts_need_token() {
    let stub = StubApi::start().await;
    let app = stub.app(CartMode::Slots);
    let page = AdminCollection::<Contacts>::new(&app.state);

    let outcome = page.mount().await;

    assert!(matches!(outcome.error(), Some(ApiError::Unauthenticated)));
}

#[tokio::test]
async fn test_overview_counts() {
    let stub = StubApi::start().await;
    let mut app = stub.app(CartMode::Slots);
    app.sign_in();

    let overview = Dashboard::new(&app.state).overview().await;

    assert_eq!(overview.services, Some(2));
    assert_eq!(overview.packages, Some(1));
    assert_eq!(overview.blogs, Some(0));
    assert_eq!(overview.testimonials, Some(3));
    assert_eq!(overview.contacts, Some(1));
    assert_eq!(overview.unread_contacts, Some(1));
    assert!(app.drain_toasts().is_empty());
}

#[tokio::test]
async fn test_overview_without_token_leaves_contacts_empty() {
    let stub = StubApi::start().await;
    let mut app = stub.app(CartMode::Slots);

    let overview = Dashboard::new(&app.state).overview().await;

    assert_eq!(overview.services, Some(2));
    assert_eq!(overview.contacts, None);
    assert_eq!(overview.unread_contacts, None);
    let toasts = app.drain_toasts();
    assert_eq!(toasts.len(), 1);
    assert_eq!(toasts[0].title, "Failed to count contacts");
}
