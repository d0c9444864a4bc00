//! Actions of the todo list controller.
//!
//! Commands express intent and may issue remote calls. Events carry the
//! outcome of a remote call back into the reducer; only events change the
//! collection.

use crate::error::RemoteError;
use crate::filter::TodoFilter;
use crate::types::{Todo, TodoId, TodoPatch};

/// What triggered an update
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UpdateOrigin {
    /// Issued directly by the caller
    Direct,
    /// Saving the item editor
    Editor,
    /// Completion toggle
    Toggle,
}

/// Todo list actions
#[derive(Clone, Debug, PartialEq)]
pub enum TodoListAction {
    // Commands
    /// Fetch the session user's todos
    Load,
    /// Change the view filter
    SetFilter {
        /// New filter
        filter: TodoFilter,
    },
    /// Create a todo
    Create {
        /// Title (trimmed before sending)
        title: String,
        /// Optional description (trimmed, blank means absent)
        description: Option<String>,
    },
    /// Update a subset of a todo's fields
    Update {
        /// Target todo
        id: TodoId,
        /// Fields to change
        patch: TodoPatch,
        /// Who asked
        origin: UpdateOrigin,
    },
    /// Delete a todo
    Delete {
        /// Target todo
        id: TodoId,
    },
    /// Flip a todo's completion flag
    ToggleCompleted {
        /// Target todo
        id: TodoId,
    },
    /// Start editing an item
    BeginEdit {
        /// Target todo
        id: TodoId,
    },
    /// Change the title draft of an item being edited
    EditTitle {
        /// Target todo
        id: TodoId,
        /// New draft
        title: String,
    },
    /// Change the description draft of an item being edited
    EditDescription {
        /// Target todo
        id: TodoId,
        /// New draft
        description: String,
    },
    /// Save the drafts of an item being edited
    SaveEdit {
        /// Target todo
        id: TodoId,
    },
    /// Discard the drafts of an item being edited
    CancelEdit {
        /// Target todo
        id: TodoId,
    },
    /// Change the creation form's title draft
    FormTitleChanged {
        /// New draft
        title: String,
    },
    /// Change the creation form's description draft
    FormDescriptionChanged {
        /// New draft
        description: String,
    },
    /// Submit the creation form
    SubmitForm,
    /// End the session
    SignOut,

    // Events
    /// Todos fetched
    Loaded {
        /// Fetched records
        todos: Vec<Todo>,
    },
    /// Fetching failed
    LoadFailed {
        /// Backend error
        error: RemoteError,
    },
    /// The remote store created a todo
    Created {
        /// Stored record
        todo: Todo,
    },
    /// Creating failed
    CreateFailed {
        /// Backend error
        error: RemoteError,
    },
    /// The remote store applied an update
    Updated {
        /// Target todo
        id: TodoId,
        /// Fields changed
        patch: TodoPatch,
        /// Who asked
        origin: UpdateOrigin,
    },
    /// Updating failed
    UpdateFailed {
        /// Target todo
        id: TodoId,
        /// Who asked
        origin: UpdateOrigin,
        /// Backend error
        error: RemoteError,
    },
    /// The remote store deleted a todo
    Deleted {
        /// Target todo
        id: TodoId,
    },
    /// Deleting failed
    DeleteFailed {
        /// Target todo
        id: TodoId,
        /// Backend error
        error: RemoteError,
    },
    /// The auth provider ended the session
    SignedOut,
    /// Signing out failed
    SignOutFailed {
        /// Backend error
        error: RemoteError,
    },
}

impl TodoListAction {
    /// Returns `true` for actions expressing intent
    #[must_use]
    pub const fn is_command(&self) -> bool {
        !self.is_event()
    }

    /// Returns `true` for actions reporting a remote outcome
    #[must_use]
    pub const fn is_event(&self) -> bool {
        matches!(
            self,
            Self::Loaded { .. }
                | Self::LoadFailed { .. }
                | Self::Created { .. }
                | Self::CreateFailed { .. }
                | Self::Updated { .. }
                | Self::UpdateFailed { .. }
                | Self::Deleted { .. }
                | Self::DeleteFailed { .. }
                | Self::SignedOut
                | Self::SignOutFailed { .. }
        )
    }
}
