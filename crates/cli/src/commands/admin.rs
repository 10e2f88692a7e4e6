//! Dashboard commands.
//!
//! # Usage
//!
//! ```bash
//! spa admin dashboard
//! spa admin services list
//! spa admin packages delete 3
//! spa admin testimonials list --page 2
//! spa admin testimonials create -n Ngozi -m "Best massage in Lagos" --rating 5 --image ngozi.jpg
//! spa admin contacts mark-read 11
//! ```
//!
//! Writes and the contact inbox need a stored token from `spa login`.

use std::path::{Path, PathBuf};

use clap::Subcommand;

use serenity_admin::{
    AdminCollection, AdminKind, Blogs, Contacts, Dashboard, Packages, Services, Testimonials,
};
use serenity_core::validation::{ContactUpdate, FileUpload, TestimonialForm};
use serenity_storefront::AppState;

use super::{CliError, loaded};
use crate::output;

#[derive(Subcommand)]
pub enum AdminCommand {
    /// Record counts
    Dashboard,
    /// Manage services
    Services {
        #[command(subcommand)]
        action: RecordAction,
    },
    /// Manage packages
    Packages {
        #[command(subcommand)]
        action: RecordAction,
    },
    /// Manage blog posts
    Blogs {
        #[command(subcommand)]
        action: RecordAction,
    },
    /// Manage testimonials
    Testimonials {
        #[command(subcommand)]
        action: TestimonialAction,
    },
    /// Manage contact messages
    Contacts {
        #[command(subcommand)]
        action: ContactAction,
    },
}

#[derive(Subcommand)]
pub enum RecordAction {
    /// List all records
    List,
    /// Delete one record
    Delete { id: String },
}

#[derive(Subcommand)]
pub enum TestimonialAction {
    /// List one page of testimonials
    List {
        #[arg(long, default_value_t = 1)]
        page: u32,
    },
    /// Delete one testimonial
    Delete { id: String },
    /// Add a testimonial
    Create {
        #[arg(short, long)]
        name: String,

        #[arg(short, long)]
        message: String,

        /// 1 to 5
        #[arg(short, long)]
        rating: Option<u8>,

        /// Photo to upload
        #[arg(short, long)]
        image: Option<PathBuf>,
    },
}

#[derive(Subcommand)]
pub enum ContactAction {
    /// List contact messages
    List,
    /// Delete one message
    Delete { id: String },
    /// Mark a message as read
    MarkRead { id: String },
    /// Mark a message as unread
    MarkUnread { id: String },
}

pub async fn run(state: &AppState, command: AdminCommand) -> Result<(), Box<dyn std::error::Error>> {
    match command {
        AdminCommand::Dashboard => dashboard(state).await,
        AdminCommand::Services { action } => record::<Services>(state, action).await,
        AdminCommand::Packages { action } => record::<Packages>(state, action).await,
        AdminCommand::Blogs { action } => record::<Blogs>(state, action).await,
        AdminCommand::Testimonials { action } => testimonials(state, action).await,
        AdminCommand::Contacts { action } => contacts(state, action).await,
    }
}

async fn dashboard(state: &AppState) -> Result<(), Box<dyn std::error::Error>> {
    let overview = Dashboard::new(state).overview().await;
    let count = |n: Option<u64>| n.map_or_else(|| "-".to_string(), |n| n.to_string());

    output::field("Services", count(overview.services));
    output::field("Packages", count(overview.packages));
    output::field("Posts", count(overview.blogs));
    output::field("Reviews", count(overview.testimonials));
    output::field("Messages", count(overview.contacts));
    output::field("Unread", count(overview.unread_contacts));
    Ok(())
}

async fn record<K>(state: &AppState, action: RecordAction) -> Result<(), Box<dyn std::error::Error>>
where
    K: AdminKind,
    K::Id: From<String>,
{
    let page = AdminCollection::<K>::new(state);
    match action {
        RecordAction::List => list(&page).await,
        RecordAction::Delete { id } => {
            page.delete(&<K::Id as From<String>>::from(id)).await?;
            Ok(())
        }
    }
}

async fn list<K: AdminKind>(page: &AdminCollection<K>) -> Result<(), Box<dyn std::error::Error>> {
    loaded(page.mount().await)?;
    output::table(&page.table());
    Ok(())
}

async fn testimonials(
    state: &AppState,
    action: TestimonialAction,
) -> Result<(), Box<dyn std::error::Error>> {
    let page = AdminCollection::<Testimonials>::new(state);
    match action {
        TestimonialAction::List { page: number } => {
            loaded(page.go_to_page(number).await)?;
            output::table(&page.table());
            if let Some(info) = page.page_info() {
                output::blank();
                output::line(format!(
                    "Page {} of {} ({} total)",
                    info.current_page, info.last_page, info.total
                ));
            }
        }
        TestimonialAction::Delete { id } => page.delete(&id.into()).await?,
        TestimonialAction::Create {
            name,
            message,
            rating,
            image,
        } => {
            let image = match image {
                Some(path) => Some(read_upload(&path).await?),
                None => None,
            };
            let form = TestimonialForm {
                name,
                message,
                rating,
                image,
            };
            page.create(&form).await?;
        }
    }
    Ok(())
}

async fn contacts(state: &AppState, action: ContactAction) -> Result<(), Box<dyn std::error::Error>> {
    let page = AdminCollection::<Contacts>::new(state);
    match action {
        ContactAction::List => list(&page).await?,
        ContactAction::Delete { id } => page.delete(&id.into()).await?,
        ContactAction::MarkRead { id } => page.update(&id.into(), &ContactUpdate { is_read: true }).await?,
        ContactAction::MarkUnread { id } => {
            page.update(&id.into(), &ContactUpdate { is_read: false }).await?;
        }
    }
    Ok(())
}

/// Read a file for upload, guessing its type from the extension.
async fn read_upload(path: &Path) -> Result<FileUpload, CliError> {
    let bytes = tokio::fs::read(path)
        .await
        .map_err(|source| CliError::ReadFile {
            path: path.to_path_buf(),
            source,
        })?;
    let file_name = path
        .file_name()
        .map_or_else(|| "upload".to_string(), |n| n.to_string_lossy().into_owned());

    Ok(FileUpload {
        content_type: content_type(path).to_string(),
        file_name,
        bytes,
    })
}

fn content_type(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .map(|e| e.to_string_lossy().to_ascii_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "webp" => "image/webp",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_content_type_from_extension() {
        assert_eq!(content_type(Path::new("ngozi.JPG")), "image/jpeg");
        assert_eq!(content_type(Path::new("cover.webp")), "image/webp");
        assert_eq!(content_type(Path::new("notes")), "application/octet-stream");
    }

    #[tokio::test]
    async fn test_read_upload_missing_file() {
        let err = read_upload(Path::new("/nonexistent/serenity.png")).await.unwrap_err();
        assert!(matches!(err, CliError::ReadFile { .. }));
    }
}
