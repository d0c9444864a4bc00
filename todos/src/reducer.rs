//! Todo list reducer.
//!
//! Applies the confirm-then-apply policy: commands validate input and issue
//! exactly one remote call as an effect; the collection only changes when
//! the outcome event comes back. Every completed mutation attempt is
//! followed by a notification effect.
//!
//! `last_error` is cleared by every command and overwritten by every
//! outcome event, so it always describes the latest settled operation.
//! Once signed out, outcome events are dropped without touching state.
//!
//! # Flow
//!
//! ```text
//! Create ──► insert() ──► Created ──► prepend + "Todo added"
//!                    └──► CreateFailed ──► last_error + "Error"
//! ```

use crate::actions::{TodoListAction, UpdateOrigin};
use crate::editor::ItemEditor;
use crate::environment::TodoEnvironment;
use crate::error::TodoError;
use crate::notification::Notification;
use crate::providers::{AuthProvider, Notifier, RemoteStore};
use crate::state::TodoListState;
use crate::types::{NewTodo, Todo, TodoId, TodoPatch, normalize_description};
use checklist_core::effect::Effect;
use checklist_core::reducer::Reducer;
use checklist_core::{SmallVec, smallvec};
use std::collections::HashSet;

type Effects = SmallVec<[Effect<TodoListAction>; 4]>;

/// Todo list reducer.
#[derive(Debug, Clone)]
pub struct TodoListReducer<S, A, N> {
    /// Phantom data to hold type parameters.
    _phantom: std::marker::PhantomData<(S, A, N)>,
}

impl<S, A, N> TodoListReducer<S, A, N> {
    /// Create a new reducer.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            _phantom: std::marker::PhantomData,
        }
    }
}

impl<S, A, N> Default for TodoListReducer<S, A, N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S, A, N> Reducer for TodoListReducer<S, A, N>
where
    S: RemoteStore + Clone + 'static,
    A: AuthProvider + Clone + 'static,
    N: Notifier + Clone + 'static,
{
    type State = TodoListState;
    type Action = TodoListAction;
    type Environment = TodoEnvironment<S, A, N>;

    #[allow(clippy::too_many_lines)] // One arm per action
    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> Effects {
        if action.is_command() {
            state.last_error = None;
            if state.signed_out && needs_session(&action) {
                return reject(state, "Not signed in");
            }
        } else if state.signed_out {
            // Outcomes of calls still in flight when the session ended
            tracing::debug!(?action, "Dropping outcome after sign-out");
            return smallvec![Effect::None];
        }

        match action {
            // ═══════════════════════════════════════════════════════════════
            // Load
            // ═══════════════════════════════════════════════════════════════
            TodoListAction::Load => {
                let store = env.store.clone();
                let owner = env.session.user_id().clone();

                smallvec![Effect::future(async move {
                    match store.list_by_owner(&owner).await {
                        Ok(todos) => Some(TodoListAction::Loaded { todos }),
                        Err(error) => Some(TodoListAction::LoadFailed { error }),
                    }
                })]
            },

            TodoListAction::Loaded { todos } => {
                state.loading = false;
                state.last_error = None;
                state.todos = owned_unique_newest_first(todos, env);

                let todos = &state.todos;
                state
                    .editors
                    .retain(|id, _| todos.iter().any(|todo| &todo.id == id));

                tracing::debug!(count = state.todos.len(), "Todos loaded");
                smallvec![Effect::None]
            },

            TodoListAction::LoadFailed { error } => {
                state.loading = false;
                tracing::error!(error = %error, "Failed to load todos");
                fail(state, env, TodoError::LoadFailure(error))
            },

            // ═══════════════════════════════════════════════════════════════
            // Create
            // ═══════════════════════════════════════════════════════════════
            TodoListAction::Create { title, description } => {
                create(state, env, &title, description.as_deref(), false)
            },

            TodoListAction::SubmitForm => match state.form.submission() {
                Some((title, description)) => {
                    create(state, env, &title, description.as_deref(), true)
                },
                None => reject(state, "Title cannot be empty"),
            },

            TodoListAction::Created { todo } => {
                state.creating = false;
                state.last_error = None;
                if state.form.submitting {
                    state.form.clear();
                }

                tracing::info!(id = %todo.id, "Todo created");
                state.todos.retain(|existing| existing.id != todo.id);
                state.todos.insert(0, todo);

                smallvec![notify(env, Notification::todo_added())]
            },

            TodoListAction::CreateFailed { error } => {
                state.creating = false;
                state.form.submit_failed();
                tracing::error!(error = %error, "Failed to create todo");
                fail(state, env, TodoError::CreateFailure(error))
            },

            // ═══════════════════════════════════════════════════════════════
            // Update
            // ═══════════════════════════════════════════════════════════════
            TodoListAction::Update { id, patch, origin } => update(state, env, id, patch, origin),

            TodoListAction::ToggleCompleted { id } => {
                let Some(todo) = state.get(&id) else {
                    return reject(state, format!("Todo {id} not found"));
                };
                let patch = TodoPatch::completion(!todo.completed);
                update(state, env, id, patch, UpdateOrigin::Toggle)
            },

            TodoListAction::Updated { id, patch, origin } => {
                state.last_error = None;
                match state.todos.iter_mut().find(|todo| todo.id == id) {
                    Some(todo) => patch.apply_to(todo),
                    None => tracing::warn!(%id, "Update confirmed for a todo no longer held"),
                }
                if origin == UpdateOrigin::Editor {
                    state.editors.remove(&id);
                }

                tracing::info!(%id, ?origin, "Todo updated");
                smallvec![notify(env, Notification::todo_updated(&patch))]
            },

            TodoListAction::UpdateFailed { id, origin, error } => {
                if origin == UpdateOrigin::Editor {
                    if let Some(editor) = state.editors.get_mut(&id) {
                        editor.save_failed();
                    }
                }

                tracing::error!(%id, error = %error, "Failed to update todo");
                fail(state, env, TodoError::UpdateFailure(error))
            },

            // ═══════════════════════════════════════════════════════════════
            // Delete
            // ═══════════════════════════════════════════════════════════════
            TodoListAction::Delete { id } => {
                if !state.exists(&id) {
                    return reject(state, format!("Todo {id} not found"));
                }

                let store = env.store.clone();
                smallvec![Effect::future(async move {
                    match store.delete_by_id(&id).await {
                        Ok(()) => Some(TodoListAction::Deleted { id }),
                        Err(error) => Some(TodoListAction::DeleteFailed { id, error }),
                    }
                })]
            },

            TodoListAction::Deleted { id } => {
                state.last_error = None;
                state.todos.retain(|todo| todo.id != id);
                state.editors.remove(&id);

                tracing::info!(%id, "Todo deleted");
                smallvec![notify(env, Notification::todo_deleted())]
            },

            TodoListAction::DeleteFailed { id, error } => {
                tracing::error!(%id, error = %error, "Failed to delete todo");
                fail(state, env, TodoError::DeleteFailure(error))
            },

            // ═══════════════════════════════════════════════════════════════
            // Item editor
            // ═══════════════════════════════════════════════════════════════
            TodoListAction::BeginEdit { id } => {
                let Some(todo) = state.get(&id) else {
                    return reject(state, format!("Todo {id} not found"));
                };
                if !state.is_editing(&id) {
                    let editor = ItemEditor::begin(todo);
                    state.editors.insert(id, editor);
                }
                smallvec![Effect::None]
            },

            TodoListAction::EditTitle { id, title } => match state.editors.get_mut(&id) {
                Some(editor) => {
                    editor.set_title(title);
                    smallvec![Effect::None]
                },
                None => reject(state, format!("Todo {id} is not being edited")),
            },

            TodoListAction::EditDescription { id, description } => {
                match state.editors.get_mut(&id) {
                    Some(editor) => {
                        editor.set_description(description);
                        smallvec![Effect::None]
                    },
                    None => reject(state, format!("Todo {id} is not being edited")),
                }
            },

            TodoListAction::SaveEdit { id } => {
                let saved = match state.editors.get_mut(&id) {
                    None => Err(format!("Todo {id} is not being edited")),
                    Some(editor) if editor.is_saving() => {
                        Err("A save is already in progress".to_string())
                    },
                    Some(editor) => editor
                        .start_save()
                        .ok_or_else(|| "Title cannot be empty".to_string()),
                };

                match saved {
                    Ok(patch) => update(state, env, id, patch, UpdateOrigin::Editor),
                    Err(reason) => reject(state, reason),
                }
            },

            TodoListAction::CancelEdit { id } => {
                state.editors.remove(&id);
                smallvec![Effect::None]
            },

            // ═══════════════════════════════════════════════════════════════
            // Creation form and filter
            // ═══════════════════════════════════════════════════════════════
            TodoListAction::FormTitleChanged { title } => {
                state.form.set_title(title);
                smallvec![Effect::None]
            },

            TodoListAction::FormDescriptionChanged { description } => {
                state.form.set_description(description);
                smallvec![Effect::None]
            },

            TodoListAction::SetFilter { filter } => {
                state.filter = filter;
                smallvec![Effect::None]
            },

            // ═══════════════════════════════════════════════════════════════
            // Sign-out
            // ═══════════════════════════════════════════════════════════════
            TodoListAction::SignOut => {
                let auth = env.auth.clone();

                smallvec![Effect::future(async move {
                    match auth.sign_out().await {
                        Ok(()) => Some(TodoListAction::SignedOut),
                        Err(error) => Some(TodoListAction::SignOutFailed { error }),
                    }
                })]
            },

            TodoListAction::SignedOut => {
                state.todos.clear();
                state.editors.clear();
                state.form.clear();
                state.creating = false;
                state.loading = false;
                state.signed_out = true;
                state.last_error = None;

                // No notification: the shell reacts to the session event
                let session = env.session.clone();
                smallvec![Effect::future(async move {
                    session.end();
                    None
                })]
            },

            TodoListAction::SignOutFailed { error } => {
                tracing::error!(error = %error, "Failed to sign out");
                fail(state, env, TodoError::SignOutFailure(error))
            },
        }
    }
}

/// Commands that talk to the backend
const fn needs_session(action: &TodoListAction) -> bool {
    matches!(
        action,
        TodoListAction::Load
            | TodoListAction::Create { .. }
            | TodoListAction::SubmitForm
            | TodoListAction::Update { .. }
            | TodoListAction::ToggleCompleted { .. }
            | TodoListAction::SaveEdit { .. }
            | TodoListAction::Delete { .. }
            | TodoListAction::SignOut
    )
}

fn create<S, A, N>(
    state: &mut TodoListState,
    env: &TodoEnvironment<S, A, N>,
    title: &str,
    description: Option<&str>,
    from_form: bool,
) -> Effects
where
    S: RemoteStore + Clone + 'static,
    A: AuthProvider + Clone,
    N: Notifier + Clone,
{
    if state.creating {
        return reject(state, "A todo is already being created");
    }
    let Some(new) = NewTodo::new(title, description, env.session.user_id().clone()) else {
        return reject(state, "Title cannot be empty");
    };

    state.creating = true;
    if from_form {
        state.form.submitting = true;
    }

    let store = env.store.clone();
    smallvec![Effect::future(async move {
        match store.insert(&new).await {
            Ok(todo) => Some(TodoListAction::Created { todo }),
            Err(error) => Some(TodoListAction::CreateFailed { error }),
        }
    })]
}

fn update<S, A, N>(
    state: &mut TodoListState,
    env: &TodoEnvironment<S, A, N>,
    id: TodoId,
    patch: TodoPatch,
    origin: UpdateOrigin,
) -> Effects
where
    S: RemoteStore + Clone + 'static,
    A: AuthProvider + Clone,
    N: Notifier + Clone,
{
    if !state.exists(&id) {
        return reject(state, format!("Todo {id} not found"));
    }
    if patch.has_blank_title() {
        return reject(state, "Title cannot be empty");
    }
    if patch.is_empty() {
        tracing::debug!(%id, "Empty patch, nothing to update");
        return smallvec![Effect::None];
    }

    let patch = normalized(patch);
    let store = env.store.clone();
    smallvec![Effect::future(async move {
        match store.update_by_id(&id, &patch).await {
            Ok(()) => Some(TodoListAction::Updated { id, patch, origin }),
            Err(error) => Some(TodoListAction::UpdateFailed { id, origin, error }),
        }
    })]
}

/// Trims a patch's title and maps a blank description to "absent"
fn normalized(patch: TodoPatch) -> TodoPatch {
    TodoPatch {
        title: patch.title.map(|title| title.trim().to_string()),
        description: patch
            .description
            .map(|description| description.as_deref().and_then(normalize_description)),
        completed: patch.completed,
    }
}

/// Session-owned records, first occurrence of each id, newest first
fn owned_unique_newest_first<S, A, N>(todos: Vec<Todo>, env: &TodoEnvironment<S, A, N>) -> Vec<Todo>
where
    S: RemoteStore + Clone,
    A: AuthProvider + Clone,
    N: Notifier + Clone,
{
    let owner = env.session.user_id();
    let mut seen = HashSet::with_capacity(todos.len());
    let mut kept = Vec::with_capacity(todos.len());

    for todo in todos {
        if &todo.user_id != owner {
            tracing::warn!(id = %todo.id, "Dropping todo owned by another user");
            continue;
        }
        if !seen.insert(todo.id.clone()) {
            tracing::warn!(id = %todo.id, "Dropping duplicate todo");
            continue;
        }
        kept.push(todo);
    }

    // Stable: equal timestamps keep the backend's order
    kept.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    kept
}

fn reject(state: &mut TodoListState, reason: impl Into<String>) -> Effects {
    let reason = reason.into();
    tracing::warn!(%reason, "Rejected todo command");
    state.last_error = Some(TodoError::Validation(reason));
    smallvec![Effect::None]
}

fn fail<S, A, N>(state: &mut TodoListState, env: &TodoEnvironment<S, A, N>, error: TodoError) -> Effects
where
    S: RemoteStore + Clone,
    A: AuthProvider + Clone,
    N: Notifier + Clone + 'static,
{
    let notification = error.notification();
    state.last_error = Some(error);
    smallvec![notify(env, notification)]
}

fn notify<S, A, N>(env: &TodoEnvironment<S, A, N>, notification: Notification) -> Effect<TodoListAction>
where
    S: RemoteStore + Clone,
    A: AuthProvider + Clone,
    N: Notifier + Clone + 'static,
{
    let notifier = env.notifier.clone();
    Effect::future(async move {
        notifier.notify(notification);
        None
    })
}
