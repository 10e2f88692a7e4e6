//! Fetch lifecycle shared by every page that shows API data.
//!
//! A [`Resource`] wraps a [`ResourceSource`] and publishes a
//! [`ResourceState`] through a `watch` channel. Each load:
//!
//! 1. enters `Loading` (keeping data, or clearing it on a hard refresh);
//! 2. calls the source once;
//! 3. holds `Loading` until the configured minimum has elapsed;
//! 4. settles in `Loaded` or `Error`, unless a newer load has started or the
//!    resource was closed, in which case the response is dropped.

use std::future::Future;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{Instant, sleep};
use tracing::{debug, warn};

use serenity_core::models::Listing;
use serenity_core::types::ResourceState;

use crate::error::ApiError;

/// Something a [`Resource`] can fetch a list from.
pub trait ResourceSource: Send + Sync + 'static {
    type Item: Send + Sync + 'static;
    /// Query parameters for one fetch (filters, page number, ...).
    type Params: Clone + Default + Send + Sync + 'static;

    /// Fetch one listing. Called once per load.
    fn fetch(
        &self,
        params: Self::Params,
    ) -> impl Future<Output = Result<Listing<Self::Item>, ApiError>> + Send;
}

/// How a load ended.
#[derive(Debug)]
pub enum LoadOutcome {
    /// Data replaced with this many rows.
    Loaded(usize),
    /// The source failed; the state now carries the user message.
    Failed(ApiError),
    /// A newer load started, or the resource was closed, before this one
    /// finished. The state was not touched.
    Discarded,
}

impl LoadOutcome {
    #[must_use]
    pub const fn is_loaded(&self) -> bool {
        matches!(self, Self::Loaded(_))
    }

    /// The error, if the load failed.
    #[must_use]
    pub const fn error(&self) -> Option<&ApiError> {
        match self {
            Self::Failed(e) => Some(e),
            _ => None,
        }
    }
}

struct Shared<S: ResourceSource> {
    name: &'static str,
    source: S,
    state: watch::Sender<ResourceState<S::Item>>,
    generation: AtomicU64,
    closed: AtomicBool,
    min_loading: Duration,
    last_params: Mutex<Option<S::Params>>,
}

impl<S: ResourceSource> Shared<S> {
    /// Enter `Loading` and claim a generation. `None` once closed.
    fn start(&self, params: &S::Params, clear: bool) -> Option<u64> {
        if self.closed.load(Ordering::Acquire) {
            return None;
        }
        let generation = self.generation.fetch_add(1, Ordering::AcqRel) + 1;
        *self
            .last_params
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = Some(params.clone());
        self.state.send_modify(|state| state.begin(clear));
        Some(generation)
    }

    async fn complete(&self, generation: u64, params: S::Params) -> LoadOutcome {
        let started = Instant::now();
        let result = self.source.fetch(params).await;

        let elapsed = started.elapsed();
        if elapsed < self.min_loading {
            sleep(self.min_loading - elapsed).await;
        }

        if self.closed.load(Ordering::Acquire) {
            debug!(resource = self.name, generation, "Dropping response for closed resource");
            return LoadOutcome::Discarded;
        }
        let current = self.generation.load(Ordering::Acquire);
        if current != generation {
            debug!(
                resource = self.name,
                generation, current, "Dropping stale response"
            );
            return LoadOutcome::Discarded;
        }

        match result {
            Ok(listing) => {
                let rows = listing.items.len();
                self.state.send_modify(|state| state.succeed(listing));
                debug!(resource = self.name, rows, "Resource loaded");
                LoadOutcome::Loaded(rows)
            }
            Err(err) => {
                warn!(resource = self.name, error = %err, "Resource load failed");
                let message = err.user_message();
                self.state.send_modify(|state| state.fail(message));
                LoadOutcome::Failed(err)
            }
        }
    }

    async fn run(&self, params: S::Params, clear: bool) -> LoadOutcome {
        match self.start(&params, clear) {
            Some(generation) => self.complete(generation, params).await,
            None => LoadOutcome::Discarded,
        }
    }
}

/// A remotely fetched list with a loading/loaded/error lifecycle.
///
/// Dropping the resource closes it: responses still in flight are discarded.
pub struct Resource<S: ResourceSource> {
    inner: Arc<Shared<S>>,
}

impl<S: ResourceSource> std::fmt::Debug for Resource<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Resource")
            .field("name", &self.inner.name)
            .field("status", &self.inner.state.borrow().status)
            .field("generation", &self.inner.generation.load(Ordering::Relaxed))
            .field("closed", &self.is_closed())
            .finish_non_exhaustive()
    }
}

impl<S: ResourceSource> Resource<S> {
    /// A resource in its initial `Loading` state. Nothing is fetched until
    /// [`load`](Self::load) is called.
    pub fn new(name: &'static str, source: S, min_loading: Duration) -> Self {
        let (state, _) = watch::channel(ResourceState::loading());
        Self {
            inner: Arc::new(Shared {
                name,
                source,
                state,
                generation: AtomicU64::new(0),
                closed: AtomicBool::new(false),
                min_loading,
                last_params: Mutex::new(None),
            }),
        }
    }

    /// Load with `params`, keeping current data visible while loading.
    pub async fn load(&self, params: S::Params) -> LoadOutcome {
        self.inner.run(params, false).await
    }

    /// Load with `params` after clearing current data.
    pub async fn hard_refresh(&self, params: S::Params) -> LoadOutcome {
        self.inner.run(params, true).await
    }

    /// Load again with the parameters of the last load.
    pub async fn refetch(&self) -> LoadOutcome {
        self.load(self.last_params()).await
    }

    /// Start a load in the background.
    ///
    /// The generation is claimed before this returns, so a later call always
    /// supersedes an earlier one regardless of task scheduling.
    pub fn spawn_load(&self, params: S::Params) -> JoinHandle<LoadOutcome> {
        let generation = self.inner.start(&params, false);
        let shared = Arc::clone(&self.inner);
        tokio::spawn(async move {
            match generation {
                Some(generation) => shared.complete(generation, params).await,
                None => LoadOutcome::Discarded,
            }
        })
    }

    /// Parameters of the most recent load, or the default before any load.
    #[must_use]
    pub fn last_params(&self) -> S::Params {
        self.inner
            .last_params
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
            .unwrap_or_default()
    }

    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<ResourceState<S::Item>> {
        self.inner.state.subscribe()
    }

    /// Clone of the current state.
    #[must_use]
    pub fn snapshot(&self) -> ResourceState<S::Item>
    where
        S::Item: Clone,
    {
        self.inner.state.borrow().clone()
    }

    /// Read the current state without cloning.
    pub fn with_state<R>(&self, f: impl FnOnce(&ResourceState<S::Item>) -> R) -> R {
        f(&self.inner.state.borrow())
    }

    #[must_use]
    pub fn name(&self) -> &'static str {
        self.inner.name
    }

    #[must_use]
    pub fn source(&self) -> &S {
        &self.inner.source
    }

    /// Stop accepting responses. Further loads are no-ops.
    pub fn close(&self) {
        if !self.inner.closed.swap(true, Ordering::AcqRel) {
            debug!(resource = self.inner.name, "Resource closed");
        }
    }

    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.inner.closed.load(Ordering::Acquire)
    }
}

impl<S: ResourceSource> Drop for Resource<S> {
    fn drop(&mut self) {
        self.close();
    }
}
