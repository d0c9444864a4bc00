//! Transient user-facing notifications.
//!
//! One notification is emitted after every completed mutation attempt,
//! success or failure, and when loading fails. Nothing in the todo list
//! depends on whether a notification is delivered.

use crate::error::RemoteError;
use crate::types::TodoPatch;
use serde::{Deserialize, Serialize};

/// Severity of a notification
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    /// Confirmation of a successful operation
    Info,
    /// A failed operation
    Error,
}

/// A toast-style message for the user
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    /// Short headline
    pub title: String,
    /// One-sentence body
    pub description: String,
    /// Severity
    pub kind: NotificationKind,
}

impl Notification {
    /// Informational notification
    #[must_use]
    pub fn info(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            kind: NotificationKind::Info,
        }
    }

    /// Error notification titled "Error"
    #[must_use]
    pub fn error(description: impl Into<String>) -> Self {
        Self {
            title: "Error".to_string(),
            description: description.into(),
            kind: NotificationKind::Error,
        }
    }

    /// Error notification showing the backend message, or `fallback` when it is blank
    #[must_use]
    pub fn error_or(error: &RemoteError, fallback: &str) -> Self {
        if error.message.trim().is_empty() {
            Self::error(fallback)
        } else {
            Self::error(error.message.clone())
        }
    }

    /// A todo was created
    #[must_use]
    pub fn todo_added() -> Self {
        Self::info("Todo added", "Your new todo has been created.")
    }

    /// A todo was updated; the wording depends on what the patch changed
    #[must_use]
    pub fn todo_updated(patch: &TodoPatch) -> Self {
        match patch.completed {
            Some(true) => Self::info("Todo completed", "Great job on completing this task!"),
            Some(false) => Self::info("Todo reopened", "Task moved back to pending."),
            None => Self::info("Todo updated", "Your changes have been saved."),
        }
    }

    /// A todo was deleted
    #[must_use]
    pub fn todo_deleted() -> Self {
        Self::info("Todo deleted", "The todo has been removed.")
    }

    /// Returns `true` for error notifications
    #[must_use]
    pub fn is_error(&self) -> bool {
        self.kind == NotificationKind::Error
    }
}

impl std::fmt::Display for Notification {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.title, self.description)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn update_wording_follows_patch() {
        assert_eq!(Notification::todo_updated(&TodoPatch::completion(true)).title, "Todo completed");
        assert_eq!(Notification::todo_updated(&TodoPatch::completion(false)).title, "Todo reopened");
        assert_eq!(
            Notification::todo_updated(&TodoPatch::content("x".to_string(), None)).title,
            "Todo updated"
        );
    }

    #[test]
    fn display_joins_title_and_description() {
        assert_eq!(
            Notification::todo_deleted().to_string(),
            "Todo deleted: The todo has been removed."
        );
        assert!(!Notification::todo_added().is_error());
        assert!(Notification::error("boom").is_error());
    }
}
