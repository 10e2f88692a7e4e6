//! Blog listing and post detail.

use tracing::instrument;

use serenity_api::{BlogsSource, LoadOutcome, Resource};
use serenity_core::types::BlogId;

use super::cards::{BlogCard, BlogDetail};
use super::report_load;
use crate::error::PageError;
use crate::state::AppState;

#[derive(Debug)]
pub struct BlogPage {
    state: AppState,
    blogs: Resource<BlogsSource>,
}

impl BlogPage {
    #[must_use]
    pub fn new(state: &AppState) -> Self {
        Self {
            state: state.clone(),
            blogs: Resource::new(
                "blogs",
                BlogsSource(state.client().clone()),
                state.min_loading(),
            ),
        }
    }

    #[instrument(skip(self))]
    pub async fn mount(&self) -> LoadOutcome {
        let outcome = self.blogs.load(()).await;
        report_load(self.state.notifier(), "Failed to load blog posts", &outcome);
        outcome
    }

    #[must_use]
    pub const fn resource(&self) -> &Resource<BlogsSource> {
        &self.blogs
    }

    #[must_use]
    pub fn cards(&self) -> Vec<BlogCard> {
        let client = self.state.client();
        self.blogs
            .with_state(|s| s.data.iter().map(|b| BlogCard::new(b, client)).collect())
    }

    /// Fetch one post for the detail view.
    ///
    /// # Errors
    ///
    /// Returns `PageError::Api` if the post cannot be fetched.
    #[instrument(skip(self), fields(id = %id))]
    pub async fn open(&self, id: &BlogId) -> Result<BlogDetail, PageError> {
        let client = self.state.client();
        match client.get_blog(id).await {
            Ok(blog) => Ok(BlogDetail::new(&blog, client)),
            Err(err) => {
                self.state.notifier().api_failure("Failed to load post", &err);
                Err(err.into())
            }
        }
    }
}
