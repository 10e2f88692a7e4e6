//! Serenity Spa CLI - browse the catalog, book, and manage the dashboard.
//!
//! # Usage
//!
//! ```bash
//! # Browse
//! spa services --search massage --max-price 30000
//! spa packages
//! spa blog 12
//!
//! # Book two services and pay
//! spa reserve --item 3 --item 3 --item 7 -n "Ada Obi" -e ada@example.com \
//!     -p 08030000000 --date 2024-06-01 --time 14:00
//!
//! # Dashboard
//! spa login -e staff@example.com --password secret
//! spa admin dashboard
//! spa admin testimonials create -n Ngozi -m "Lovely" --rating 5
//! spa admin services delete 4
//! ```
//!
//! # Environment Variables
//!
//! - `SERENITY_API_BASE_URL`, `SERENITY_IMAGE_BASE_URL` - required
//! - `SERENITY_MIN_LOADING_MS`, `SERENITY_TOKEN_FILE`, `SERENITY_CART_MODE`
//! - `SERENITY_LOG_FORMAT=json` - structured logs on stderr
//! - `RUST_LOG` - log filter, default `serenity=info`

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use serenity_storefront::{AppState, StorefrontConfig};

mod commands;
mod output;

use commands::admin::AdminCommand;

#[derive(Parser)]
#[command(name = "spa")]
#[command(author, version, about = "Serenity Spa storefront and dashboard")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List services, optionally filtered
    Services(commands::catalog::ServicesArgs),
    /// List packages
    Packages,
    /// List blog posts
    Blogs,
    /// Show one blog post
    Blog {
        /// Post id
        id: String,
    },
    /// List testimonials
    Testimonials {
        /// Page number (1-based)
        #[arg(long, default_value_t = 1)]
        page: u32,
    },
    /// Send a message through the contact form
    Contact(commands::forms::ContactArgs),
    /// Buy the ebook and print the payment link
    Ebook(commands::forms::EbookArgs),
    /// Fill a cart and start a reservation payment
    Reserve(commands::forms::ReserveArgs),
    /// Sign in to the dashboard
    Login(commands::session::LoginArgs),
    /// Create a dashboard account
    Register(commands::session::RegisterArgs),
    /// Sign out and forget the stored token
    Logout,
    /// Dashboard management
    Admin {
        #[command(subcommand)]
        action: AdminCommand,
    },
}

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();
    init_tracing();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        output::error(e.as_ref());
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

/// Logs go to stderr so command output can be piped.
fn init_tracing() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "serenity=info,spa=info".into());

    let json = std::env::var("SERENITY_LOG_FORMAT").is_ok_and(|v| v.eq_ignore_ascii_case("json"));
    let json_layer = json.then(|| {
        tracing_subscriber::fmt::layer()
            .json()
            .flatten_event(true)
            .with_writer(std::io::stderr)
    });
    let text_layer = (!json).then(|| tracing_subscriber::fmt::layer().with_writer(std::io::stderr));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(json_layer)
        .with(text_layer)
        .init();
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let config = StorefrontConfig::from_env()?;
    let (state, mut toasts) = AppState::new(config)?;

    let result = dispatch(&state, cli.command).await;
    output::drain_toasts(&mut toasts);
    result
}

async fn dispatch(state: &AppState, command: Commands) -> Result<(), Box<dyn std::error::Error>> {
    match command {
        Commands::Services(args) => commands::catalog::services(state, args).await?,
        Commands::Packages => commands::catalog::packages(state).await?,
        Commands::Blogs => commands::catalog::blogs(state).await?,
        Commands::Blog { id } => commands::catalog::blog(state, id).await?,
        Commands::Testimonials { page } => commands::catalog::testimonials(state, page).await?,
        Commands::Contact(args) => commands::forms::contact(state, args).await?,
        Commands::Ebook(args) => commands::forms::ebook(state, args).await?,
        Commands::Reserve(args) => commands::forms::reserve(state, args).await?,
        Commands::Login(args) => commands::session::login(state, args).await?,
        Commands::Register(args) => commands::session::register(state, args).await?,
        Commands::Logout => commands::session::logout(state).await?,
        Commands::Admin { action } => commands::admin::run(state, action).await?,
    }
    Ok(())
}
