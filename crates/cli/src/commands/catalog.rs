//! Public listings: services, packages, blog and testimonials.

use clap::Args;
use rust_decimal::Decimal;

use serenity_admin::components::{DataTable, TableColumn};
use serenity_api::{Resource, TestimonialsSource};
use serenity_core::models::ServiceFilter;
use serenity_core::types::{BlogId, Price};
use serenity_storefront::AppState;
use serenity_storefront::pages::cards::TestimonialCard;
use serenity_storefront::pages::{BlogPage, PackagesPage, ServicesPage};

use super::loaded;
use crate::output;

#[derive(Args, Debug, Default)]
pub struct ServicesArgs {
    /// Match against title and description
    #[arg(short, long)]
    pub search: Option<String>,

    /// Lowest price in naira
    #[arg(long)]
    pub min_price: Option<Decimal>,

    /// Highest price in naira
    #[arg(long)]
    pub max_price: Option<Decimal>,
}

impl ServicesArgs {
    fn filter(self) -> ServiceFilter {
        ServiceFilter {
            search: self.search,
            min_price: self.min_price.map(Price::new),
            max_price: self.max_price.map(Price::new),
        }
    }
}

pub async fn services(state: &AppState, args: ServicesArgs) -> Result<(), Box<dyn std::error::Error>> {
    let mut page = ServicesPage::new(state);
    loaded(page.apply_filter(args.filter()).await?)?;

    let table = page.cards().into_iter().fold(
        DataTable::new(vec![
            TableColumn::new("id", "ID"),
            TableColumn::new("title", "Title"),
            TableColumn::new("price", "Price"),
            TableColumn::new("duration", "Duration"),
        ])
        .empty_title("No services match"),
        |table, card| {
            table.row(vec![
                card.id.to_string(),
                card.title,
                card.price,
                card.duration.unwrap_or_default(),
            ])
        },
    );
    output::table(&table);
    Ok(())
}

pub async fn packages(state: &AppState) -> Result<(), Box<dyn std::error::Error>> {
    let page = PackagesPage::new(state);
    loaded(page.mount().await)?;

    let table = page.cards().into_iter().fold(
        DataTable::new(vec![
            TableColumn::new("id", "ID"),
            TableColumn::new("title", "Title"),
            TableColumn::new("price", "Price"),
            TableColumn::new("features", "Includes"),
        ])
        .empty_title("No packages yet"),
        |table, card| {
            table.row(vec![
                card.id.to_string(),
                card.title,
                card.price,
                card.features.join(", "),
            ])
        },
    );
    output::table(&table);
    Ok(())
}

pub async fn blogs(state: &AppState) -> Result<(), Box<dyn std::error::Error>> {
    let page = BlogPage::new(state);
    loaded(page.mount().await)?;

    let table = page.cards().into_iter().fold(
        DataTable::new(vec![
            TableColumn::new("id", "ID"),
            TableColumn::new("date", "Date"),
            TableColumn::new("title", "Title"),
        ])
        .empty_title("No posts yet"),
        |table, card| table.row(vec![card.id.to_string(), card.date.unwrap_or_default(), card.title]),
    );
    output::table(&table);
    Ok(())
}

pub async fn blog(state: &AppState, id: String) -> Result<(), Box<dyn std::error::Error>> {
    let page = BlogPage::new(state);
    let post = page.open(&BlogId::new(id)).await?;

    output::line(&post.title);
    if let Some(date) = &post.date {
        output::line(date);
    }
    if let Some(cover) = &post.cover_url {
        output::line(cover);
    }
    output::blank();
    output::line(&post.body);
    Ok(())
}

pub async fn testimonials(state: &AppState, page: u32) -> Result<(), Box<dyn std::error::Error>> {
    let resource = Resource::new(
        "testimonials",
        TestimonialsSource(state.client().clone()),
        state.min_loading(),
    );
    let outcome = resource.load(page.max(1)).await;
    if let Some(err) = outcome.error() {
        state.notifier().api_failure("Failed to load testimonials", err);
    }
    loaded(outcome)?;

    let client = state.client();
    let (cards, page_info) = resource.with_state(|s| {
        (
            s.data.iter().map(|t| TestimonialCard::new(t, client)).collect::<Vec<_>>(),
            s.page,
        )
    });
    if cards.is_empty() {
        output::line("No testimonials yet");
        return Ok(());
    }
    for card in cards {
        let stars = card.rating.map(|r| "*".repeat(usize::from(r))).unwrap_or_default();
        output::line(format!("{} {stars}", card.name).trim_end());
        output::line(format!("  \"{}\"", card.quote));
    }
    if let Some(info) = page_info {
        output::blank();
        output::line(format!("Page {} of {}", info.current_page, info.last_page));
    }
    Ok(())
}
