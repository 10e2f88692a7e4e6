//! Lifecycle state of a remotely fetched collection.
//!
//! Every page that shows API data goes through the same three states:
//! `Loading` (skeleton), then either `Loaded` (possibly empty) or `Error`.

use serde::{Deserialize, Serialize};

use crate::models::{Listing, PageInfo};

/// Status of a remote resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ResourceStatus {
    #[default]
    Loading,
    Loaded,
    Error,
}

impl std::fmt::Display for ResourceStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Loading => write!(f, "loading"),
            Self::Loaded => write!(f, "loaded"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// Snapshot of a remote resource: status, current data, and the error
/// message when the last load failed.
///
/// `data` survives a failed load; only a hard refresh clears it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceState<T> {
    pub status: ResourceStatus,
    pub data: Vec<T>,
    pub error: Option<String>,
    /// Pagination of the last successful load.
    pub page: Option<PageInfo>,
}

impl<T> Default for ResourceState<T> {
    fn default() -> Self {
        Self::loading()
    }
}

impl<T> ResourceState<T> {
    /// Initial state on mount.
    #[must_use]
    pub const fn loading() -> Self {
        Self {
            status: ResourceStatus::Loading,
            data: Vec::new(),
            error: None,
            page: None,
        }
    }

    #[must_use]
    pub const fn is_loading(&self) -> bool {
        matches!(self.status, ResourceStatus::Loading)
    }

    #[must_use]
    pub const fn is_error(&self) -> bool {
        matches!(self.status, ResourceStatus::Error)
    }

    /// Loaded successfully with no rows, i.e. the page shows its empty state.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        matches!(self.status, ResourceStatus::Loaded) && self.data.is_empty()
    }

    /// Enter `Loading`, keeping or dropping current data.
    pub fn begin(&mut self, clear: bool) {
        self.status = ResourceStatus::Loading;
        self.error = None;
        if clear {
            self.data.clear();
            self.page = None;
        }
    }

    /// Replace data after a successful load.
    pub fn succeed(&mut self, listing: Listing<T>) {
        self.status = ResourceStatus::Loaded;
        self.data = listing.items;
        self.page = Some(listing.page);
        self.error = None;
    }

    /// Record a failed load. Existing data is left in place.
    pub fn fail(&mut self, message: impl Into<String>) {
        self.status = ResourceStatus::Error;
        self.error = Some(message.into());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_state_is_loading() {
        let state = ResourceState::<u8>::default();
        assert!(state.is_loading());
        assert!(state.data.is_empty());
        assert!(state.error.is_none());
    }

    #[test]
    fn test_empty_loaded_is_not_error() {
        let mut state = ResourceState::<u8>::loading();
        state.succeed(Listing::unpaged(vec![]));
        assert!(state.is_empty());
        assert!(!state.is_error());
    }

    #[test]
    fn test_fail_keeps_data() {
        let mut state = ResourceState::loading();
        state.succeed(Listing::unpaged(vec![1, 2]));
        state.begin(false);
        state.fail("boom");
        assert!(state.is_error());
        assert_eq!(state.data, vec![1, 2]);
        assert_eq!(state.error.as_deref(), Some("boom"));
    }

    #[test]
    fn test_begin_clear_drops_data() {
        let mut state = ResourceState::loading();
        state.succeed(Listing::unpaged(vec![1]));
        state.begin(true);
        assert!(state.data.is_empty());
        assert!(state.page.is_none());
        assert!(state.is_loading());
    }

    #[test]
    fn test_status_display() {
        assert_eq!(ResourceStatus::Loaded.to_string(), "loaded");
    }
}
