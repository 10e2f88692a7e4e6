//! Cart, reservation checkout, contact form and ebook purchase end to end.

#![allow(clippy::unwrap_used)]

use serenity_core::types::{ItemId, PackageId, Price, ServiceId};
use serenity_integration_tests::{CHECKOUT_URL, StubApi, TestApp};
use serenity_storefront::pages::{
    CartDrawer, ContactPage, EbookPage, PackagesPage, ReservationPage, ServicesPage,
};
use serenity_storefront::{CartMode, PageError, ToastLevel};

async fn services_page(app: &TestApp) -> ServicesPage {
    let page = ServicesPage::new(&app.state);
    assert!(page.mount().await.is_loaded());
    page
}

fn fill_reservation(page: &mut ReservationPage) {
    page.form.name = "Ada Obi".to_string();
    page.form.email = "Ada@Example.com ".to_string();
    page.form.phone = "08030000000".to_string();
    page.form.date = "2024-06-01".to_string();
    page.form.time = "14:00".to_string();
}

// ============================================================================
// Cart
// ============================================================================

#[tokio::test]
async fn test_adding_twice_gives_quantity_two_in_both_modes() {
    for mode in [CartMode::Slots, CartMode::Merged] {
        let stub = StubApi::start().await;
        let app = stub.app(mode);
        let page = services_page(&app).await;

        page.add_to_cart(&ServiceId::new("1")).unwrap();
        page.add_to_cart(&ServiceId::new("1")).unwrap();

        let view = CartDrawer::new(&app.state).view();
        assert_eq!(view.count, 2, "{mode}");
        assert_eq!(view.lines.len(), 1, "{mode}");
        assert_eq!(view.lines[0].quantity, 2, "{mode}");
        assert_eq!(view.lines[0].line_total, "₦50,000", "{mode}");
        assert_eq!(view.total, "₦50,000", "{mode}");
        assert_eq!(
            app.state.cart().snapshot().entries().len(),
            if mode == CartMode::Slots { 2 } else { 1 },
            "{mode}"
        );
    }
}

#[tokio::test]
async fn test_mixed_cart_totals() {
    let stub = StubApi::start().await;
    let app = stub.app(CartMode::Slots);
    let services = services_page(&app).await;
    let packages = PackagesPage::new(&app.state);
    assert!(packages.mount().await.is_loaded());

    services.add_to_cart(&ServiceId::new("2")).unwrap();
    packages.add_to_cart(&PackageId::new("p1")).unwrap();

    let cart = app.state.cart();
    assert_eq!(cart.cart_total(), Price::from_naira(75_000));
    assert_eq!(cart.cart_count(), 2);

    let drawer = CartDrawer::new(&app.state);
    drawer.reduce(&ItemId::package("p1"));
    assert_eq!(cart.cart_total(), Price::from_naira(15_000));
}

#[tokio::test]
async fn test_unknown_service_is_not_added() {
    let stub = StubApi::start().await;
    let mut app = stub.app(CartMode::Slots);
    let page = services_page(&app).await;

    let err = page.add_to_cart(&ServiceId::new("99")).unwrap_err();

    assert!(matches!(err, PageError::NotFound(_)));
    assert!(app.state.cart().is_empty());
    let toasts = app.drain_toasts();
    assert_eq!(toasts.last().unwrap().level, ToastLevel::Error);
}

// ============================================================================
// Reservation
// ============================================================================

#[tokio::test]
async fn test_reservation_pays_and_clears_cart() {
    let stub = StubApi::start().await;
    let mut app = stub.app(CartMode::Merged);
    let services = services_page(&app).await;
    services.add_to_cart(&ServiceId::new("1")).unwrap();
    services.add_to_cart(&ServiceId::new("1")).unwrap();
    services.add_to_cart(&ServiceId::new("2")).unwrap();
    app.drain_toasts();

    let mut page = ReservationPage::new(&app.state);
    fill_reservation(&mut page);
    let redirect = page.submit().await.unwrap();

    assert_eq!(redirect.authorization_url.as_str(), CHECKOUT_URL);
    assert_eq!(redirect.reference.as_deref(), Some("SRN-1"));
    assert!(app.state.cart().is_empty());

    let payment = stub.with(|s| s.payments.clone()).pop().unwrap();
    assert_eq!(payment["email"], "ada@example.com");
    assert_eq!(payment["items"].as_array().unwrap().len(), 2);
    assert_eq!(payment["items"][0]["quantity"], 2);
    assert_eq!(payment["items"][0]["kind"], "service");
    assert_eq!(payment["items"][0]["id"], "1");
    assert!(payment["amount"].as_str().unwrap().starts_with("65000"));
    assert!(payment.get("notes").is_none());

    let toasts = app.drain_toasts();
    assert_eq!(toasts.len(), 1);
    assert_eq!(toasts[0].level, ToastLevel::Success);
}

#[tokio::test]
async fn test_reservation_with_empty_cart_sends_nothing() {
    let stub = StubApi::start().await;
    let mut app = stub.app(CartMode::Slots);
    let mut page = ReservationPage::new(&app.state);
    fill_reservation(&mut page);

    let err = page.submit().await.unwrap_err();

    assert!(matches!(err, PageError::EmptyCart));
    assert!(stub.with(|s| s.payments.is_empty()));
    assert_eq!(app.drain_toasts()[0].message, "Your cart is empty");
}

#[tokio::test]
async fn test_failed_payment_keeps_cart() {
    let stub = StubApi::start().await;
    let mut app = stub.app(CartMode::Slots);
    let services = services_page(&app).await;
    services.add_to_cart(&ServiceId::new("2")).unwrap();
    app.drain_toasts();
    stub.fail("payments", 422, "The date field must be a future date.");

    let mut page = ReservationPage::new(&app.state);
    fill_reservation(&mut page);
    let err = page.submit().await.unwrap_err();

    assert!(matches!(err, PageError::Api(_)));
    assert_eq!(app.state.cart().cart_count(), 1);
    assert_eq!(
        app.drain_toasts()[0].message,
        "The date field must be a future date."
    );
}

// ============================================================================
// Contact and ebook
// ============================================================================

#[tokio::test]
async fn test_contact_submit_resets_form() {
    let stub = StubApi::start().await;
    let mut app = stub.app(CartMode::Slots);
    let mut page = ContactPage::new(&app.state);
    page.form.name = "Bisi".to_string();
    page.form.email = "bisi@example.com".to_string();
    page.form.message = "Can I book for four people?".to_string();

    page.submit().await.unwrap();

    assert!(page.form.name.is_empty());
    let stored = stub.with(|s| s.contacts.last().cloned()).unwrap();
    assert_eq!(stored["message"], "Can I book for four people?");
    assert_eq!(app.drain_toasts()[0].title, "Message sent");
}

#[tokio::test]
async fn test_invalid_contact_is_not_sent() {
    let stub = StubApi::start().await;
    let app = stub.app(CartMode::Slots);
    let mut page = ContactPage::new(&app.state);
    page.form.email = "not-an-email".to_string();

    let err = page.submit().await.unwrap_err();

    let errors = err.field_errors().unwrap();
    assert!(errors.get("email").is_some());
    assert!(errors.get("message").is_some());
    assert_eq!(stub.with(|s| s.contacts.len()), 1);
}

#[tokio::test]
async fn test_ebook_purchase_returns_checkout() {
    let stub = StubApi::start().await;
    let app = stub.app(CartMode::Slots);
    let mut page = EbookPage::new(&app.state);
    page.order.name = "Chidi".to_string();
    page.order.email = "chidi@example.com".to_string();
    page.order.payment_type = "card".to_string();

    let redirect = page.purchase().await.unwrap();

    assert_eq!(redirect.authorization_url.as_str(), CHECKOUT_URL);
    let order = stub.with(|s| s.payments.clone()).pop().unwrap();
    assert_eq!(order["payment_type"], "card");
}
