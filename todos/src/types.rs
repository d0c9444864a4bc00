//! Domain types for the todo list.
//!
//! A todo belongs to exactly one user. Identifiers and timestamps are
//! assigned by the hosted backend; the client never invents them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Opaque identifier of a todo, assigned by the remote store
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TodoId(String);

impl TodoId {
    /// Wraps a backend-assigned identifier
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the identifier as a string slice
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for TodoId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TodoId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for TodoId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Identifier of an authenticated user
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    /// Wraps a backend-assigned user identifier
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the identifier as a string slice
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for UserId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// A single todo record as stored by the backend
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Todo {
    /// Unique identifier
    pub id: TodoId,
    /// Display title, never blank
    pub title: String,
    /// Optional free-form details; `None` is distinct from an empty string
    pub description: Option<String>,
    /// Whether the todo is done
    pub completed: bool,
    /// When the backend created the record
    pub created_at: DateTime<Utc>,
    /// When the backend last modified the record
    pub updated_at: DateTime<Utc>,
    /// Owner of the record
    pub user_id: UserId,
}

/// Insert payload for a new todo
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewTodo {
    /// Trimmed, non-blank title
    pub title: String,
    /// Trimmed description, absent when blank
    pub description: Option<String>,
    /// Owner of the new record
    pub user_id: UserId,
    /// Always `false` on creation
    pub completed: bool,
}

impl NewTodo {
    /// Builds an insert payload, normalizing the title and description
    ///
    /// Returns `None` when the title is blank.
    #[must_use]
    pub fn new(title: &str, description: Option<&str>, user_id: UserId) -> Option<Self> {
        Some(Self {
            title: normalize_title(title)?,
            description: description.and_then(normalize_description),
            user_id,
            completed: false,
        })
    }
}

/// Partial update of a todo
///
/// Only the fields that are `Some` are sent to the backend. For
/// `description`, `Some(None)` clears the stored value.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct TodoPatch {
    /// New title
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// New description (`Some(None)` clears it)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<Option<String>>,
    /// New completion flag
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed: Option<bool>,
}

impl TodoPatch {
    /// Patch that only flips the completion flag
    #[must_use]
    pub const fn completion(completed: bool) -> Self {
        Self {
            title: None,
            description: None,
            completed: Some(completed),
        }
    }

    /// Patch that replaces title and description
    #[must_use]
    pub const fn content(title: String, description: Option<String>) -> Self {
        Self {
            title: Some(title),
            description: Some(description),
            completed: None,
        }
    }

    /// Returns `true` when the patch would change nothing
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.title.is_none() && self.description.is_none() && self.completed.is_none()
    }

    /// Returns `true` when the patch sets a title that is blank after trimming
    #[must_use]
    pub fn has_blank_title(&self) -> bool {
        self.title.as_deref().is_some_and(|title| title.trim().is_empty())
    }

    /// Merges exactly the present fields into `todo`
    pub fn apply_to(&self, todo: &mut Todo) {
        if let Some(title) = &self.title {
            todo.title.clone_from(title);
        }
        if let Some(description) = &self.description {
            todo.description.clone_from(description);
        }
        if let Some(completed) = self.completed {
            todo.completed = completed;
        }
    }
}

/// Trims a title, rejecting blank input
#[must_use]
pub fn normalize_title(title: &str) -> Option<String> {
    let trimmed = title.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// Trims a description, mapping blank input to "absent"
#[must_use]
pub fn normalize_description(description: &str) -> Option<String> {
    let trimmed = description.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn todo() -> Todo {
        Todo {
            id: TodoId::new("t1"),
            title: "Buy milk".to_string(),
            description: Some("2 litres".to_string()),
            completed: false,
            created_at: Utc::now(),
            updated_at: Utc::now(),
            user_id: UserId::new("u1"),
        }
    }

    #[test]
    fn new_todo_normalizes_input() {
        let new = NewTodo::new("  Buy milk ", Some("   "), UserId::new("u1")).unwrap();
        assert_eq!(new.title, "Buy milk");
        assert_eq!(new.description, None);
        assert!(!new.completed);

        assert!(NewTodo::new(" \t ", None, UserId::new("u1")).is_none());
    }

    #[test]
    fn patch_applies_only_present_fields() {
        let mut todo = todo();
        TodoPatch::completion(true).apply_to(&mut todo);
        assert!(todo.completed);
        assert_eq!(todo.title, "Buy milk");
        assert_eq!(todo.description.as_deref(), Some("2 litres"));

        TodoPatch::content("Buy oat milk".to_string(), None).apply_to(&mut todo);
        assert_eq!(todo.title, "Buy oat milk");
        assert_eq!(todo.description, None);
        assert!(todo.completed);
    }

    #[test]
    fn patch_serializes_exact_subset() {
        let json = serde_json::to_value(TodoPatch::completion(true)).unwrap();
        assert_eq!(json, serde_json::json!({ "completed": true }));

        let json = serde_json::to_value(TodoPatch::content("A".to_string(), None)).unwrap();
        assert_eq!(json, serde_json::json!({ "title": "A", "description": null }));

        assert!(TodoPatch::default().is_empty());
    }

    #[test]
    fn blank_title_patch_is_detected() {
        assert!(TodoPatch::content("  ".to_string(), None).has_blank_title());
        assert!(!TodoPatch::completion(false).has_blank_title());
    }

    #[test]
    fn todo_deserializes_backend_row() {
        let row = serde_json::json!({
            "id": "7f0c",
            "title": "Write report",
            "description": null,
            "completed": true,
            "created_at": "2025-03-01T10:00:00+00:00",
            "updated_at": "2025-03-02T10:00:00+00:00",
            "user_id": "u1"
        });

        let todo: Todo = serde_json::from_value(row).unwrap();
        assert_eq!(todo.id, TodoId::new("7f0c"));
        assert_eq!(todo.description, None);
        assert!(todo.completed);
    }
}
