//! View filters and derived views over the todo collection.
//!
//! Everything here is a pure projection: the authoritative collection is
//! never modified.

use crate::types::Todo;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;

/// Which todos the list shows
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TodoFilter {
    /// Every todo
    #[default]
    All,
    /// Todos not yet completed
    Pending,
    /// Completed todos
    Completed,
}

impl TodoFilter {
    /// All filters, in display order
    pub const ALL: [Self; 3] = [Self::All, Self::Pending, Self::Completed];

    /// Returns `true` if `todo` belongs in this view
    #[must_use]
    pub const fn matches(self, todo: &Todo) -> bool {
        match self {
            Self::All => true,
            Self::Pending => !todo.completed,
            Self::Completed => todo.completed,
        }
    }

    /// Lowercase name used on the command line
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Pending => "pending",
            Self::Completed => "completed",
        }
    }

    /// Empty-state text for this view when it shows nothing
    ///
    /// `collection_empty` distinguishes "no todos at all" from "nothing
    /// matches the filter". The `All` view is only empty when the
    /// collection is.
    #[must_use]
    pub const fn empty_message(self, collection_empty: bool) -> EmptyState {
        match self {
            Self::Pending if !collection_empty => EmptyState {
                headline: "No pending todos",
                hint: "All caught up! No pending tasks.",
            },
            Self::Completed if !collection_empty => EmptyState {
                headline: "No completed todos",
                hint: "No completed tasks yet. Keep going!",
            },
            _ => EmptyState {
                headline: "No todos yet",
                hint: "Create your first todo above to get started!",
            },
        }
    }
}

impl std::fmt::Display for TodoFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unknown filter name
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unknown filter '{0}', expected one of: all, pending, completed")]
pub struct ParseFilterError(String);

impl FromStr for TodoFilter {
    type Err = ParseFilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(Self::All),
            "pending" => Ok(Self::Pending),
            "completed" => Ok(Self::Completed),
            _ => Err(ParseFilterError(s.to_string())),
        }
    }
}

/// Headline and hint shown when a view has no rows
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EmptyState {
    /// Short headline
    pub headline: &'static str,
    /// Encouraging hint
    pub hint: &'static str,
}

/// Order-preserving subset of `todos` matching `filter`
#[must_use]
pub fn visible(todos: &[Todo], filter: TodoFilter) -> Vec<&Todo> {
    todos.iter().filter(|todo| filter.matches(todo)).collect()
}

/// Counts over the whole collection, independent of any filter
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TodoCounts {
    /// Number of todos
    pub total: usize,
    /// Number of todos not completed
    pub pending: usize,
    /// Number of completed todos
    pub completed: usize,
}

impl TodoCounts {
    /// Count `todos`
    #[must_use]
    pub fn of(todos: &[Todo]) -> Self {
        let completed = todos.iter().filter(|todo| todo.completed).count();
        Self {
            total: todos.len(),
            pending: todos.len() - completed,
            completed,
        }
    }

    /// Count belonging to the view selected by `filter`
    #[must_use]
    pub const fn for_filter(&self, filter: TodoFilter) -> usize {
        match filter {
            TodoFilter::All => self.total,
            TodoFilter::Pending => self.pending,
            TodoFilter::Completed => self.completed,
        }
    }
}
