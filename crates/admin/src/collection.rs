//! Generic dashboard page for one kind of record.
//!
//! Every write follows the same contract: validate, send, toast, then
//! refetch the whole list. A failed write toasts the error and leaves the
//! loaded list as it was.

use std::fmt::Display;
use std::future::Future;

use tracing::{info, instrument};

use serenity_api::{ApiClient, ApiError, LoadOutcome, Resource, ResourceSource};
use serenity_core::types::ResourceState;
use serenity_core::validation::Validate;
use serenity_storefront::AppState;

use crate::components::{DataTable, TableColumn};
use crate::error::AdminError;

type ItemOf<K> = <<K as AdminKind>::Source as ResourceSource>::Item;
type ParamsOf<K> = <<K as AdminKind>::Source as ResourceSource>::Params;

/// A record type managed from the dashboard.
pub trait AdminKind: Send + Sync + 'static {
    /// Plural name, used for the resource and in messages ("services").
    const NAME: &'static str;
    /// Singular label for toasts ("Service").
    const LABEL: &'static str;

    type Source: ResourceSource;
    type Id: Display + Send + Sync;

    fn source(client: ApiClient) -> Self::Source;

    /// Listing columns.
    fn columns() -> Vec<TableColumn>;

    /// One formatted row per record, matching [`columns`](Self::columns).
    fn row(item: &ItemOf<Self>) -> Vec<String>;

    fn delete(client: &ApiClient, id: &Self::Id)
    -> impl Future<Output = Result<(), ApiError>> + Send;
}

/// Kinds that can be created from the dashboard.
pub trait CreateKind: AdminKind {
    type CreateForm: Validate + Send + Sync;

    fn create(
        client: &ApiClient,
        form: &Self::CreateForm,
    ) -> impl Future<Output = Result<(), ApiError>> + Send;
}

/// Kinds that can be edited from the dashboard.
pub trait UpdateKind: AdminKind {
    type UpdateForm: Validate + Send + Sync;

    fn update(
        client: &ApiClient,
        id: &Self::Id,
        form: &Self::UpdateForm,
    ) -> impl Future<Output = Result<(), ApiError>> + Send;
}

/// Dashboard page listing one kind of record.
pub struct AdminCollection<K: AdminKind> {
    state: AppState,
    resource: Resource<K::Source>,
}

impl<K: AdminKind> std::fmt::Debug for AdminCollection<K> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminCollection")
            .field("kind", &K::NAME)
            .field("resource", &self.resource)
            .finish_non_exhaustive()
    }
}

impl<K: AdminKind> AdminCollection<K> {
    #[must_use]
    pub fn new(state: &AppState) -> Self {
        Self {
            state: state.clone(),
            resource: Resource::new(
                K::NAME,
                K::source(state.client().clone()),
                state.min_loading(),
            ),
        }
    }

    /// Initial load.
    pub async fn mount(&self) -> LoadOutcome {
        self.load(ParamsOf::<K>::default()).await
    }

    /// Reload with the parameters of the last load.
    pub async fn refresh(&self) -> LoadOutcome {
        self.load(self.resource.last_params()).await
    }

    pub(crate) async fn load(&self, params: ParamsOf<K>) -> LoadOutcome {
        let outcome = self.resource.load(params).await;
        if let Some(err) = outcome.error() {
            self.state
                .notifier()
                .api_failure(&format!("Failed to load {}", K::NAME), err);
        }
        outcome
    }

    #[must_use]
    pub const fn resource(&self) -> &Resource<K::Source> {
        &self.resource
    }

    #[must_use]
    pub fn snapshot(&self) -> ResourceState<ItemOf<K>>
    where
        ItemOf<K>: Clone,
    {
        self.resource.snapshot()
    }

    /// The loaded records as a table.
    #[must_use]
    pub fn table(&self) -> DataTable {
        let rows: Vec<Vec<String>> = self
            .resource
            .with_state(|s| s.data.iter().map(K::row).collect());
        rows.into_iter().fold(
            DataTable::new(K::columns()).empty_title(format!("No {} yet", K::NAME)),
            DataTable::row,
        )
    }

    /// Delete one record and refetch.
    ///
    /// # Errors
    ///
    /// Returns the API error; the loaded list is left untouched.
    #[instrument(skip(self, id), fields(kind = K::NAME, id = %id))]
    pub async fn delete(&self, id: &K::Id) -> Result<(), AdminError> {
        let result = K::delete(self.state.client(), id).await;
        self.finish_write(result, "deleted", "delete").await
    }

    /// Toast the outcome of a write and refetch on success.
    async fn finish_write(
        &self,
        result: Result<(), ApiError>,
        done: &str,
        verb: &str,
    ) -> Result<(), AdminError> {
        let notifier = self.state.notifier();
        match result {
            Ok(()) => {
                info!(kind = K::NAME, action = verb, "Dashboard write succeeded");
                let label = K::LABEL.to_lowercase();
                notifier.success(
                    format!("{} {done}", K::LABEL),
                    format!("The {label} was {done}."),
                );
                self.refresh().await;
                Ok(())
            }
            Err(err) => {
                let action = format!("Failed to {verb} {}", K::LABEL.to_lowercase());
                notifier.api_failure(&action, &err);
                Err(err.into())
            }
        }
    }
}

impl<K: CreateKind> AdminCollection<K> {
    /// Validate, create, then refetch.
    ///
    /// # Errors
    ///
    /// Returns `AdminError::Validation` without a request, or the API error.
    #[instrument(skip(self, form), fields(kind = K::NAME))]
    pub async fn create(&self, form: &K::CreateForm) -> Result<(), AdminError> {
        form.validate()?;
        let result = K::create(self.state.client(), form).await;
        self.finish_write(result, "created", "create").await
    }
}

impl<K: UpdateKind> AdminCollection<K> {
    /// Validate, update, then refetch.
    ///
    /// # Errors
    ///
    /// Returns `AdminError::Validation` without a request, or the API error.
    #[instrument(skip(self, id, form), fields(kind = K::NAME, id = %id))]
    pub async fn update(&self, id: &K::Id, form: &K::UpdateForm) -> Result<(), AdminError> {
        form.validate()?;
        let result = K::update(self.state.client(), id, form).await;
        self.finish_write(result, "updated", "update").await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use serenity_api::{ApiConfig, MemoryTokenStore};
    use serenity_core::types::TestimonialId;
    use serenity_core::validation::TestimonialForm;
    use serenity_storefront::{CartMode, StorefrontConfig, ToastLevel, ToastReceiver};
    use url::Url;

    use super::*;
    use crate::kinds::Testimonials;

    fn offline_state() -> (AppState, ToastReceiver) {
        let api = ApiConfig::new(
            Url::parse("http://127.0.0.1:9/api").unwrap(),
            Url::parse("http://127.0.0.1:9/storage").unwrap(),
        )
        .without_loading_delay();
        AppState::with_token_store(
            StorefrontConfig::new(api, CartMode::Slots),
            Arc::new(MemoryTokenStore::new()),
        )
        .unwrap()
    }

    fn form() -> TestimonialForm {
        TestimonialForm {
            name: "Ngozi".to_string(),
            message: "Best massage in Lagos".to_string(),
            rating: Some(5),
            image: None,
        }
    }

    #[tokio::test]
    async fn test_create_without_token_is_unauthenticated() {
        let (state, mut toasts) = offline_state();
        let page = AdminCollection::<Testimonials>::new(&state);

        let err = page.create(&form()).await.unwrap_err();

        assert!(matches!(err, AdminError::Api(ApiError::Unauthenticated)));
        assert!(err.is_unauthorized());
        let toast = toasts.try_recv().unwrap();
        assert_eq!(toast.level, ToastLevel::Error);
        assert_eq!(toast.title, "Failed to create testimonial");
        assert_eq!(toast.message, "Please sign in to continue.");
        assert!(page.snapshot().is_loading());
    }

    #[tokio::test]
    async fn test_invalid_form_sends_nothing() {
        let (state, mut toasts) = offline_state();
        let page = AdminCollection::<Testimonials>::new(&state);
        let mut form = form();
        form.rating = Some(9);

        let err = page.create(&form).await.unwrap_err();

        assert!(err.field_errors().unwrap().get("rating").is_some());
        assert!(toasts.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_delete_without_token_leaves_state() {
        let (state, _toasts) = offline_state();
        let page = AdminCollection::<Testimonials>::new(&state);
        let err = page.delete(&TestimonialId::new("1")).await.unwrap_err();
        assert!(err.is_unauthorized());
        assert_eq!(page.current_page(), 1);
    }

    #[test]
    fn test_empty_table_names_kind() {
        let (state, _toasts) = offline_state();
        let page = AdminCollection::<Testimonials>::new(&state);
        assert_eq!(page.table().render(), "No testimonials yet");
    }
}
