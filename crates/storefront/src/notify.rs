//! Toast notifications.
//!
//! Pages push [`Toast`]s through a cloneable [`Notifier`]; whoever holds the
//! [`ToastReceiver`] (the CLI, a test) decides how to show them.

use std::fmt;

use serde::Serialize;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use serenity_api::ApiError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ToastLevel {
    Success,
    Error,
    Info,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Toast {
    pub level: ToastLevel,
    pub title: String,
    pub message: String,
}

impl fmt::Display for Toast {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.title, self.message)
    }
}

/// Receiving end of the toast channel.
pub type ToastReceiver = mpsc::UnboundedReceiver<Toast>;

/// Sending end of the toast channel.
#[derive(Debug, Clone)]
pub struct Notifier {
    tx: mpsc::UnboundedSender<Toast>,
}

/// Create a connected notifier and receiver.
#[must_use]
pub fn channel() -> (Notifier, ToastReceiver) {
    let (tx, rx) = mpsc::unbounded_channel();
    (Notifier { tx }, rx)
}

impl Notifier {
    pub fn success(&self, title: impl Into<String>, message: impl Into<String>) {
        self.push(ToastLevel::Success, title.into(), message.into());
    }

    pub fn info(&self, title: impl Into<String>, message: impl Into<String>) {
        self.push(ToastLevel::Info, title.into(), message.into());
    }

    pub fn error(&self, title: impl Into<String>, message: impl Into<String>) {
        self.push(ToastLevel::Error, title.into(), message.into());
    }

    /// Error toast for a failed API call, titled with the action that failed.
    pub fn api_failure(&self, action: &str, err: &ApiError) {
        self.error(action, err.user_message());
    }

    fn push(&self, level: ToastLevel, title: String, message: String) {
        match level {
            ToastLevel::Error => warn!(title = %title, message = %message, "Toast"),
            ToastLevel::Success | ToastLevel::Info => {
                info!(title = %title, message = %message, "Toast");
            }
        }
        if self
            .tx
            .send(Toast {
                level,
                title,
                message,
            })
            .is_err()
        {
            debug!("Toast receiver dropped");
        }
    }
}
