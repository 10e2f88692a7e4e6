//! Application state shared across page controllers.

use std::sync::Arc;
use std::time::Duration;

use serenity_api::{ApiClient, ApiError, FileTokenStore, TokenStore};

use crate::cart::CartStore;
use crate::config::StorefrontConfig;
use crate::notify::{self, Notifier, ToastReceiver};

/// Application state shared across all pages.
///
/// This struct is cheaply cloneable via `Arc` and provides access to the API
/// client, the cart and the toast channel.
#[derive(Debug, Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

#[derive(Debug)]
struct AppStateInner {
    config: StorefrontConfig,
    client: ApiClient,
    cart: CartStore,
    notifier: Notifier,
}

impl AppState {
    /// Create state backed by the configured token file.
    ///
    /// Returns the state and the receiving end of its toast channel.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: StorefrontConfig) -> Result<(Self, ToastReceiver), ApiError> {
        let tokens = Arc::new(FileTokenStore::new(&config.api.token_file));
        Self::with_token_store(config, tokens)
    }

    /// Create state with an explicit token store.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn with_token_store(
        config: StorefrontConfig,
        tokens: Arc<dyn TokenStore>,
    ) -> Result<(Self, ToastReceiver), ApiError> {
        let client = ApiClient::new(&config.api, tokens)?;
        let cart = CartStore::new(config.cart_mode);
        let (notifier, toasts) = notify::channel();

        Ok((
            Self {
                inner: Arc::new(AppStateInner {
                    config,
                    client,
                    cart,
                    notifier,
                }),
            },
            toasts,
        ))
    }

    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    #[must_use]
    pub fn client(&self) -> &ApiClient {
        &self.inner.client
    }

    #[must_use]
    pub fn cart(&self) -> &CartStore {
        &self.inner.cart
    }

    #[must_use]
    pub fn notifier(&self) -> &Notifier {
        &self.inner.notifier
    }

    /// Minimum time a resource is held in `loading`.
    #[must_use]
    pub fn min_loading(&self) -> Duration {
        self.inner.config.api.min_loading
    }
}
