//! Shared error types for the services crate.

use thiserror::Error;

use kyu_core::SelectorError;
use kyu_core::model::ConfigError;

/// Errors emitted by session services.
///
/// Commands that are merely out of turn (answering twice, skipping a running
/// question) are not errors; the session ignores them and reports `false`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SessionError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Selector(#[from] SelectorError),
    #[error("session runner has stopped")]
    Closed,
}
