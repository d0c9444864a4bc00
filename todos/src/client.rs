//! Async facade over the todo list store.
//!
//! Each operation sends one action, waits until its whole effect cascade
//! has settled (remote call, outcome event, notification), and reports the
//! outcome as a `Result`.
//!
//! ```ignore
//! let client = TodoClient::new(environment);
//! client.load().await?;
//! let todo = client.create("Buy milk", None).await?;
//! client.toggle_completed(&todo.id).await?;
//! ```

use crate::actions::{TodoListAction, UpdateOrigin};
use crate::editor::ItemEditor;
use crate::environment::TodoEnvironment;
use crate::error::TodoError;
use crate::filter::{TodoCounts, TodoFilter};
use crate::form::CreationForm;
use crate::providers::{AuthProvider, Notifier, RemoteStore};
use crate::reducer::TodoListReducer;
use crate::session::SessionContext;
use crate::state::TodoListState;
use crate::types::{Todo, TodoId, TodoPatch};
use checklist_runtime::Store;
use std::sync::Arc;
use std::time::Duration;

/// Store running the todo list reducer
pub type TodoStore<S, A, N> =
    Store<TodoListState, TodoListAction, TodoEnvironment<S, A, N>, TodoListReducer<S, A, N>>;

/// Todo list client.
///
/// Operations are meant to be issued one at a time; the outcome of an
/// operation is read from the shared `last_error` once its cascade settles.
pub struct TodoClient<S, A, N>
where
    S: RemoteStore + Clone + 'static,
    A: AuthProvider + Clone + 'static,
    N: Notifier + Clone + 'static,
{
    store: TodoStore<S, A, N>,
}

impl<S, A, N> TodoClient<S, A, N>
where
    S: RemoteStore + Clone + 'static,
    A: AuthProvider + Clone + 'static,
    N: Notifier + Clone + 'static,
{
    /// Create a client for the session in `environment`
    ///
    /// The collection starts empty and loading; call [`TodoClient::load`].
    #[must_use]
    pub fn new(environment: TodoEnvironment<S, A, N>) -> Self {
        Self {
            store: Store::new(TodoListState::new(), TodoListReducer::new(), environment),
        }
    }

    /// The underlying store
    #[must_use]
    pub const fn store(&self) -> &TodoStore<S, A, N> {
        &self.store
    }

    /// The session this client serves
    #[must_use]
    pub fn session(&self) -> Arc<SessionContext> {
        Arc::clone(&self.store.environment().session)
    }

    /// Fetch the session user's todos, replacing the collection
    ///
    /// Returns the number of todos held.
    ///
    /// # Errors
    ///
    /// Returns [`TodoError::LoadFailure`] if fetching failed; the collection
    /// is unchanged.
    pub async fn load(&self) -> Result<usize, TodoError> {
        self.dispatch(TodoListAction::Load).await?;
        Ok(self.store.state(|state| state.todos.len()).await)
    }

    /// Create a todo and return the stored record
    ///
    /// # Errors
    ///
    /// Returns [`TodoError::Validation`] for a blank title or while another
    /// create is in flight, and [`TodoError::CreateFailure`] if the remote
    /// store rejected the insert.
    pub async fn create(&self, title: &str, description: Option<&str>) -> Result<Todo, TodoError> {
        self.dispatch(TodoListAction::Create {
            title: title.to_string(),
            description: description.map(str::to_string),
        })
        .await?;
        self.newest().await
    }

    /// Apply `patch` to the todo with `id`
    ///
    /// # Errors
    ///
    /// Returns [`TodoError::Validation`] for an unknown id or a blank title,
    /// and [`TodoError::UpdateFailure`] if the remote store rejected it.
    pub async fn update(&self, id: &TodoId, patch: TodoPatch) -> Result<(), TodoError> {
        self.dispatch(TodoListAction::Update {
            id: id.clone(),
            patch,
            origin: UpdateOrigin::Direct,
        })
        .await
    }

    /// Flip the completion flag of the todo with `id`
    ///
    /// Returns the confirmed completion flag.
    ///
    /// # Errors
    ///
    /// Returns [`TodoError::Validation`] for an unknown id and
    /// [`TodoError::UpdateFailure`] if the remote store rejected it.
    pub async fn toggle_completed(&self, id: &TodoId) -> Result<bool, TodoError> {
        self.dispatch(TodoListAction::ToggleCompleted { id: id.clone() })
            .await?;
        self.store
            .state(|state| state.get(id).map(|todo| todo.completed))
            .await
            .ok_or_else(|| TodoError::Validation(format!("Todo {id} not found")))
    }

    /// Delete the todo with `id`
    ///
    /// # Errors
    ///
    /// Returns [`TodoError::Validation`] for an unknown id and
    /// [`TodoError::DeleteFailure`] if the remote store rejected it.
    pub async fn delete(&self, id: &TodoId) -> Result<(), TodoError> {
        self.dispatch(TodoListAction::Delete { id: id.clone() }).await
    }

    /// Change the view filter
    ///
    /// # Errors
    ///
    /// Returns [`TodoError::Store`] if the store is shutting down.
    pub async fn set_filter(&self, filter: TodoFilter) -> Result<(), TodoError> {
        self.dispatch(TodoListAction::SetFilter { filter }).await
    }

    /// Start editing the todo with `id`
    ///
    /// # Errors
    ///
    /// Returns [`TodoError::Validation`] for an unknown id.
    pub async fn begin_edit(&self, id: &TodoId) -> Result<(), TodoError> {
        self.dispatch(TodoListAction::BeginEdit { id: id.clone() }).await
    }

    /// Replace the title draft of the todo being edited
    ///
    /// # Errors
    ///
    /// Returns [`TodoError::Validation`] if the todo is not being edited.
    pub async fn edit_title(&self, id: &TodoId, title: &str) -> Result<(), TodoError> {
        self.dispatch(TodoListAction::EditTitle {
            id: id.clone(),
            title: title.to_string(),
        })
        .await
    }

    /// Replace the description draft of the todo being edited
    ///
    /// # Errors
    ///
    /// Returns [`TodoError::Validation`] if the todo is not being edited.
    pub async fn edit_description(&self, id: &TodoId, description: &str) -> Result<(), TodoError> {
        self.dispatch(TodoListAction::EditDescription {
            id: id.clone(),
            description: description.to_string(),
        })
        .await
    }

    /// Save the drafts of the todo being edited
    ///
    /// # Errors
    ///
    /// Returns [`TodoError::Validation`] for a blank title draft (the item
    /// stays in editing) and [`TodoError::UpdateFailure`] if the remote store
    /// rejected the save (drafts are kept).
    pub async fn save_edit(&self, id: &TodoId) -> Result<(), TodoError> {
        self.dispatch(TodoListAction::SaveEdit { id: id.clone() }).await
    }

    /// Discard the drafts of the todo being edited
    ///
    /// # Errors
    ///
    /// Returns [`TodoError::Store`] if the store is shutting down.
    pub async fn cancel_edit(&self, id: &TodoId) -> Result<(), TodoError> {
        self.dispatch(TodoListAction::CancelEdit { id: id.clone() }).await
    }

    /// Replace the creation form's title draft
    ///
    /// # Errors
    ///
    /// Returns [`TodoError::Store`] if the store is shutting down.
    pub async fn set_form_title(&self, title: &str) -> Result<(), TodoError> {
        self.dispatch(TodoListAction::FormTitleChanged {
            title: title.to_string(),
        })
        .await
    }

    /// Replace the creation form's description draft
    ///
    /// # Errors
    ///
    /// Returns [`TodoError::Store`] if the store is shutting down.
    pub async fn set_form_description(&self, description: &str) -> Result<(), TodoError> {
        self.dispatch(TodoListAction::FormDescriptionChanged {
            description: description.to_string(),
        })
        .await
    }

    /// Submit the creation form and return the stored record
    ///
    /// The form is cleared on success and keeps its drafts on failure.
    ///
    /// # Errors
    ///
    /// Returns [`TodoError::Validation`] for a blank title draft and
    /// [`TodoError::CreateFailure`] if the remote store rejected the insert.
    pub async fn submit_form(&self) -> Result<Todo, TodoError> {
        self.dispatch(TodoListAction::SubmitForm).await?;
        self.newest().await
    }

    /// End the session
    ///
    /// On success the collection is cleared and the session emits
    /// [`SessionEvent::SignedOut`](crate::session::SessionEvent::SignedOut).
    ///
    /// # Errors
    ///
    /// Returns [`TodoError::SignOutFailure`] if the auth provider refused;
    /// everything is kept.
    pub async fn sign_out(&self) -> Result<(), TodoError> {
        self.dispatch(TodoListAction::SignOut).await
    }

    /// Stop accepting operations and wait for in-flight effects
    ///
    /// # Errors
    ///
    /// Returns [`TodoError::Store`] if effects are still running after `timeout`.
    pub async fn shutdown(&self, timeout: Duration) -> Result<(), TodoError> {
        self.store.shutdown(timeout).await?;
        Ok(())
    }

    /// The whole collection, newest first
    pub async fn todos(&self) -> Vec<Todo> {
        self.store.state(|state| state.todos.clone()).await
    }

    /// Todos shown under the active filter
    pub async fn visible(&self) -> Vec<Todo> {
        self.store
            .state(|state| state.visible().into_iter().cloned().collect())
            .await
    }

    /// Counts over the whole collection
    pub async fn counts(&self) -> TodoCounts {
        self.store.state(TodoListState::counts).await
    }

    /// The active view filter
    pub async fn filter(&self) -> TodoFilter {
        self.store.state(|state| state.filter).await
    }

    /// Edit state of the todo with `id` (`Viewing` when not being edited)
    pub async fn editor(&self, id: &TodoId) -> ItemEditor {
        self.store
            .state(|state| state.editor(id).cloned().unwrap_or_default())
            .await
    }

    /// The creation form's drafts
    pub async fn form(&self) -> CreationForm {
        self.store.state(|state| state.form.clone()).await
    }

    /// `true` until the first load outcome
    pub async fn is_loading(&self) -> bool {
        self.store.state(|state| state.loading).await
    }

    /// `true` while a create is in flight
    pub async fn is_creating(&self) -> bool {
        self.store.state(|state| state.creating).await
    }

    /// Error of the most recent failed operation
    pub async fn last_error(&self) -> Option<TodoError> {
        self.store.state(|state| state.last_error.clone()).await
    }

    async fn dispatch(&self, action: TodoListAction) -> Result<(), TodoError> {
        let mut handle = self.store.send(action).await?;
        handle.wait().await;

        match self.last_error().await {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }

    async fn newest(&self) -> Result<Todo, TodoError> {
        self.store
            .state(|state| state.todos.first().cloned())
            .await
            .ok_or_else(|| TodoError::Store("Created todo missing from the collection".to_string()))
    }
}

impl<S, A, N> Clone for TodoClient<S, A, N>
where
    S: RemoteStore + Clone + 'static,
    A: AuthProvider + Clone + 'static,
    N: Notifier + Clone + 'static,
{
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
        }
    }
}
