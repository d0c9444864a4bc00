//! Error types for todo list operations.

use crate::notification::Notification;
use checklist_runtime::StoreError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Failure reported by the hosted backend or its client library.
///
/// Carries the human-readable message shown to the user.
#[derive(Debug, Error, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[error("{message}")]
pub struct RemoteError {
    /// Human-readable message
    pub message: String,
}

impl RemoteError {
    /// Create a remote error from a message
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl From<reqwest::Error> for RemoteError {
    fn from(error: reqwest::Error) -> Self {
        Self::new(error.to_string())
    }
}

/// Errors surfaced by the todo list.
///
/// Every remote failure is caught where the call is made and recorded as
/// one of the `*Failure` variants; the collection is left untouched.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TodoError {
    /// Fetching the user's todos failed.
    #[error("Failed to load todos: {0}")]
    LoadFailure(RemoteError),

    /// Creating a todo failed.
    #[error("Failed to add todo: {0}")]
    CreateFailure(RemoteError),

    /// Updating a todo failed.
    #[error("Failed to update todo: {0}")]
    UpdateFailure(RemoteError),

    /// Deleting a todo failed.
    #[error("Failed to delete todo: {0}")]
    DeleteFailure(RemoteError),

    /// Signing out failed.
    #[error("Failed to sign out: {0}")]
    SignOutFailure(RemoteError),

    /// Input rejected before any remote call was made.
    #[error("Invalid request: {0}")]
    Validation(String),

    /// The store refused the action (for example during shutdown).
    #[error("Todo store unavailable: {0}")]
    Store(String),
}

impl TodoError {
    /// User-facing notification for this error
    #[must_use]
    pub fn notification(&self) -> Notification {
        match self {
            // Load failures never show the backend message
            Self::LoadFailure(_) => Notification::error("Failed to load todos"),
            Self::CreateFailure(error) => Notification::error_or(error, "Failed to add todo"),
            Self::UpdateFailure(error) => Notification::error_or(error, "Failed to update todo"),
            Self::DeleteFailure(error) => Notification::error_or(error, "Failed to delete todo"),
            Self::SignOutFailure(error) => Notification::error_or(error, "Failed to sign out"),
            Self::Validation(reason) => Notification::error(reason.clone()),
            Self::Store(reason) => Notification::error(reason.clone()),
        }
    }

    /// The wrapped backend error, if this error came from a remote call
    #[must_use]
    pub const fn remote(&self) -> Option<&RemoteError> {
        match self {
            Self::LoadFailure(error)
            | Self::CreateFailure(error)
            | Self::UpdateFailure(error)
            | Self::DeleteFailure(error)
            | Self::SignOutFailure(error) => Some(error),
            Self::Validation(_) | Self::Store(_) => None,
        }
    }
}

impl From<StoreError> for TodoError {
    fn from(error: StoreError) -> Self {
        Self::Store(error.to_string())
    }
}

/// Configuration loading errors
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// A required variable is not set.
    #[error("Missing required environment variable {0}")]
    Missing(&'static str),

    /// A variable is set but cannot be used.
    #[error("Invalid value for {name}: {reason}")]
    Invalid {
        /// Variable name
        name: &'static str,
        /// Why the value was rejected
        reason: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notification::NotificationKind;

    #[test]
    fn load_failure_uses_fixed_message() {
        let error = TodoError::LoadFailure(RemoteError::new("JWT expired"));
        let notification = error.notification();
        assert_eq!(notification.kind, NotificationKind::Error);
        assert_eq!(notification.title, "Error");
        assert_eq!(notification.description, "Failed to load todos");
    }

    #[test]
    fn mutation_failures_show_backend_message() {
        let error = TodoError::CreateFailure(RemoteError::new("permission denied"));
        assert_eq!(error.notification().description, "permission denied");
        assert_eq!(error.remote(), Some(&RemoteError::new("permission denied")));
    }

    #[test]
    fn blank_backend_message_falls_back() {
        let error = TodoError::DeleteFailure(RemoteError::new(""));
        assert_eq!(error.notification().description, "Failed to delete todo");
    }

    #[test]
    fn store_errors_convert() {
        let error = TodoError::from(StoreError::ShutdownInProgress);
        assert_eq!(error, TodoError::Store("Store is shutting down".to_string()));
        assert!(error.remote().is_none());
    }
}
