//! CLI command implementations.

pub mod admin;
pub mod catalog;
pub mod forms;
pub mod session;

use std::path::PathBuf;

use serenity_api::{ApiError, LoadOutcome};
use thiserror::Error;

/// Errors raised by the CLI itself rather than the pages it drives.
#[derive(Debug, Error)]
pub enum CliError {
    /// A file named on the command line could not be read.
    #[error("Could not read {path}: {source}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// An id passed to `reserve` matches no service or package.
    #[error("No service or package with id {0}")]
    UnknownItem(String),
}

/// Turn a failed load into an error; the page has already toasted it.
pub(crate) fn loaded(outcome: LoadOutcome) -> Result<(), ApiError> {
    match outcome {
        LoadOutcome::Failed(err) => Err(err),
        LoadOutcome::Loaded(_) | LoadOutcome::Discarded => Ok(()),
    }
}
