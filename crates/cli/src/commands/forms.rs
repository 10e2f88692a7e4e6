//! Public forms: contact, ebook purchase and reservation checkout.

use clap::Args;

use serenity_api::PaymentRedirect;
use serenity_core::types::{PackageId, ServiceId};
use serenity_storefront::AppState;
use serenity_storefront::pages::{
    CartDrawer, ContactPage, EbookPage, PackagesPage, ReservationPage, ServicesPage,
};

use super::{CliError, loaded};
use crate::output;

#[derive(Args, Debug)]
pub struct ContactArgs {
    #[arg(short, long)]
    pub name: String,

    #[arg(short, long)]
    pub email: String,

    #[arg(short, long)]
    pub phone: Option<String>,

    #[arg(short, long)]
    pub subject: Option<String>,

    #[arg(short, long)]
    pub message: String,
}

#[derive(Args, Debug)]
pub struct EbookArgs {
    #[arg(short, long)]
    pub name: String,

    #[arg(short, long)]
    pub email: String,

    /// Payment option understood by the API
    #[arg(long, default_value = "card")]
    pub payment_type: String,
}

#[derive(Args, Debug)]
pub struct ReserveArgs {
    /// Service or package id; repeat to book more than one
    #[arg(short, long = "item", required = true)]
    pub items: Vec<String>,

    #[arg(short, long)]
    pub name: String,

    #[arg(short, long)]
    pub email: String,

    #[arg(short, long)]
    pub phone: String,

    /// Reservation date, YYYY-MM-DD
    #[arg(long)]
    pub date: String,

    /// Reservation time, HH:MM
    #[arg(long)]
    pub time: String,

    #[arg(long)]
    pub notes: Option<String>,
}

pub async fn contact(state: &AppState, args: ContactArgs) -> Result<(), Box<dyn std::error::Error>> {
    let mut page = ContactPage::new(state);
    page.form.name = args.name;
    page.form.email = args.email;
    page.form.phone = args.phone;
    page.form.subject = args.subject;
    page.form.message = args.message;

    page.submit().await?;
    output::line("Message sent.");
    Ok(())
}

pub async fn ebook(state: &AppState, args: EbookArgs) -> Result<(), Box<dyn std::error::Error>> {
    let mut page = EbookPage::new(state);
    page.order.name = args.name;
    page.order.email = args.email;
    page.order.payment_type = args.payment_type;

    let redirect = page.purchase().await?;
    print_redirect(&redirect);
    Ok(())
}

/// Load the catalog, put each requested item in the cart, show the cart and
/// start the payment.
pub async fn reserve(state: &AppState, args: ReserveArgs) -> Result<(), Box<dyn std::error::Error>> {
    let services = ServicesPage::new(state);
    let packages = PackagesPage::new(state);
    let (service_load, package_load) = tokio::join!(services.mount(), packages.mount());
    loaded(service_load)?;
    loaded(package_load)?;

    for id in &args.items {
        if services.cards().iter().any(|c| c.id.as_str() == id) {
            services.add_to_cart(&ServiceId::new(id.as_str()))?;
        } else if packages.cards().iter().any(|c| c.id.as_str() == id) {
            packages.add_to_cart(&PackageId::new(id.as_str()))?;
        } else {
            return Err(CliError::UnknownItem(id.clone()).into());
        }
    }

    print_cart(state);

    let mut page = ReservationPage::new(state);
    page.form.name = args.name;
    page.form.email = args.email;
    page.form.phone = args.phone;
    page.form.date = args.date;
    page.form.time = args.time;
    page.form.notes = args.notes;

    let redirect = page.submit().await?;
    output::blank();
    print_redirect(&redirect);
    Ok(())
}

fn print_cart(state: &AppState) {
    let view = CartDrawer::new(state).view();
    for line in &view.lines {
        output::line(format!(
            "{:>3} x {}  {} = {}",
            line.quantity, line.title, line.unit_price, line.line_total
        ));
    }
    output::field("Items", view.count);
    output::field("Total", &view.total);
}

fn print_redirect(redirect: &PaymentRedirect) {
    output::field("Pay at", &redirect.authorization_url);
    if let Some(reference) = &redirect.reference {
        output::field("Reference", reference);
    }
}
