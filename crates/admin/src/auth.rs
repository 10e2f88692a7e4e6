//! Dashboard sign-in.
//!
//! Being signed in means holding a bearer token; the API decides what the
//! token may do.

use tracing::{debug, instrument, warn};

use serenity_core::validation::{LoginForm, RegisterForm, Validate};
use serenity_storefront::AppState;

use crate::error::AdminError;

#[derive(Debug, Clone)]
pub struct AuthSession {
    state: AppState,
}

impl AuthSession {
    #[must_use]
    pub fn new(state: &AppState) -> Self {
        Self {
            state: state.clone(),
        }
    }

    /// Whether a token is stored. An unreadable store counts as signed out.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.state.client().has_token().unwrap_or_else(|e| {
            warn!(error = %e, "Could not read token store");
            false
        })
    }

    /// Sign in and store the token.
    ///
    /// # Errors
    ///
    /// Returns `AdminError::Validation` without a request, or the API error.
    #[instrument(skip(self, form), fields(email = %form.email))]
    pub async fn login(&self, form: &LoginForm) -> Result<(), AdminError> {
        form.validate()?;
        let notifier = self.state.notifier();
        match self.state.client().login(form).await {
            Ok(()) => {
                notifier.success("Signed in", "Welcome back.");
                Ok(())
            }
            Err(err) => {
                notifier.api_failure("Login failed", &err);
                Err(err.into())
            }
        }
    }

    /// Create an account, storing the token if the API returns one.
    ///
    /// # Errors
    ///
    /// Returns `AdminError::Validation` without a request, or the API error.
    #[instrument(skip(self, form), fields(email = %form.email))]
    pub async fn register(&self, form: &RegisterForm) -> Result<(), AdminError> {
        form.validate()?;
        let notifier = self.state.notifier();
        match self.state.client().register(form).await {
            Ok(()) => {
                notifier.success("Account created", "Your account is ready.");
                Ok(())
            }
            Err(err) => {
                notifier.api_failure("Registration failed", &err);
                Err(err.into())
            }
        }
    }

    /// Sign out. The local token is always cleared. A 401 means the server
    /// already considers the token dead and counts as signed out; any other
    /// server-side failure is reported but does not keep the session alive.
    ///
    /// # Errors
    ///
    /// Returns the API error when the server could not be told.
    #[instrument(skip(self))]
    pub async fn logout(&self) -> Result<(), AdminError> {
        let notifier = self.state.notifier();
        match self.state.client().logout().await {
            Ok(()) => {
                notifier.success("Signed out", "You have been signed out.");
                Ok(())
            }
            Err(err) if err.is_unauthorized() => {
                debug!(error = %err, "Token already rejected by the server");
                notifier.success("Signed out", "You have been signed out.");
                Ok(())
            }
            Err(err) => {
                notifier.api_failure("Sign out incomplete", &err);
                Err(err.into())
            }
        }
    }
}
