//! # Checklist Todos
//!
//! A personal todo list backed by a hosted backend (authentication plus a
//! row-level-secured `todos` table), built on the Checklist reducer
//! architecture.
//!
//! ## Architecture
//!
//! ```text
//! Action → TodoListReducer → (TodoListState, Effects) → RemoteStore / AuthProvider → Events
//! ```
//!
//! - **Confirm-then-apply**: the collection changes only after the remote
//!   store confirms a write. Failures leave it untouched and are reported
//!   through the [`Notifier`](providers::Notifier) and as a typed
//!   [`TodoError`].
//! - **Derived views**: filtering and counts are pure projections
//!   ([`filter`]).
//! - **Editors and form**: per-item edit drafts ([`editor`]) and the
//!   creation form ([`form`]) live in the controller state.
//! - **Session**: an explicit [`SessionContext`](session::SessionContext)
//!   passed to the environment, with sign-in and sign-out announced on
//!   [`SessionEvents`](session::SessionEvents).
//!
//! ## Example
//!
//! ```rust,ignore
//! use checklist_todos::{TodoClient, TodoEnvironment};
//!
//! let client = TodoClient::new(TodoEnvironment::new(backend.clone(), backend, notifier, session));
//! client.load().await?;
//! let todo = client.create("Buy milk", Some("2 litres")).await?;
//! client.toggle_completed(&todo.id).await?;
//! ```

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![deny(clippy::todo)]
#![deny(clippy::unimplemented)]
#![cfg_attr(test, allow(clippy::unwrap_used, clippy::expect_used, clippy::panic))]

// Public modules
pub mod actions;
pub mod client;
pub mod config;
pub mod editor;
pub mod environment;
pub mod error;
pub mod filter;
pub mod form;
pub mod notification;
pub mod providers;
pub mod reducer;
pub mod session;
pub mod state;
pub mod types;

#[cfg(feature = "test-utils")]
pub mod mocks;

// Re-export main types for convenience
pub use actions::{TodoListAction, UpdateOrigin};
pub use client::{TodoClient, TodoStore};
pub use config::{BackendConfig, Credentials, SavedSession};
pub use environment::TodoEnvironment;
pub use error::{ConfigError, RemoteError, TodoError};
pub use filter::{TodoCounts, TodoFilter};
pub use notification::{Notification, NotificationKind};
pub use reducer::TodoListReducer;
pub use state::TodoListState;
pub use types::{NewTodo, Todo, TodoId, TodoPatch, UserId};
