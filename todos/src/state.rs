//! State owned by the todo list controller.

use crate::editor::ItemEditor;
use crate::error::TodoError;
use crate::filter::{self, TodoCounts, TodoFilter};
use crate::form::CreationForm;
use crate::types::{Todo, TodoId};
use std::collections::HashMap;

/// The signed-in user's todo list
///
/// `todos` is the authoritative collection, newest first, ids unique.
/// It only changes once the remote store has confirmed a write.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TodoListState {
    /// Authoritative collection
    pub todos: Vec<Todo>,
    /// Active view filter
    pub filter: TodoFilter,
    /// `true` until the first load outcome arrives
    pub loading: bool,
    /// A create is in flight
    pub creating: bool,
    /// "New todo" form drafts
    pub form: CreationForm,
    /// Items currently being edited; absent means viewing
    pub editors: HashMap<TodoId, ItemEditor>,
    /// Outcome of the most recent failed command
    pub last_error: Option<TodoError>,
    /// The session has ended
    pub signed_out: bool,
}

impl TodoListState {
    /// Fresh state for a new session
    #[must_use]
    pub fn new() -> Self {
        Self {
            todos: Vec::new(),
            filter: TodoFilter::All,
            loading: true,
            creating: false,
            form: CreationForm::default(),
            editors: HashMap::new(),
            last_error: None,
            signed_out: false,
        }
    }

    /// Look up a todo by id
    #[must_use]
    pub fn get(&self, id: &TodoId) -> Option<&Todo> {
        self.todos.iter().find(|todo| &todo.id == id)
    }

    /// Index of a todo by id
    #[must_use]
    pub fn position(&self, id: &TodoId) -> Option<usize> {
        self.todos.iter().position(|todo| &todo.id == id)
    }

    /// Returns `true` if the collection holds `id`
    #[must_use]
    pub fn exists(&self, id: &TodoId) -> bool {
        self.position(id).is_some()
    }

    /// Todos shown under the active filter
    #[must_use]
    pub fn visible(&self) -> Vec<&Todo> {
        filter::visible(&self.todos, self.filter)
    }

    /// Counts over the whole collection
    #[must_use]
    pub fn counts(&self) -> TodoCounts {
        TodoCounts::of(&self.todos)
    }

    /// Edit state of an item, if it is being edited
    #[must_use]
    pub fn editor(&self, id: &TodoId) -> Option<&ItemEditor> {
        self.editors.get(id)
    }

    /// Returns `true` while the item is being edited
    #[must_use]
    pub fn is_editing(&self, id: &TodoId) -> bool {
        self.editors.get(id).is_some_and(ItemEditor::is_editing)
    }
}

impl Default for TodoListState {
    fn default() -> Self {
        Self::new()
    }
}
