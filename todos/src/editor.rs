//! Per-item edit state.
//!
//! An item is either being viewed or being edited. While editing, the
//! title and description drafts live here until they are saved or
//! discarded. A failed save keeps the drafts.

use crate::types::{Todo, TodoPatch, normalize_description, normalize_title};

/// Draft values of an item being edited
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EditDraft {
    /// Title draft
    pub title: String,
    /// Description draft; empty means "no description"
    pub description: String,
}

impl EditDraft {
    /// Drafts initialised from the current record
    #[must_use]
    pub fn from_todo(todo: &Todo) -> Self {
        Self {
            title: todo.title.clone(),
            description: todo.description.clone().unwrap_or_default(),
        }
    }

    /// Patch that saves this draft, or `None` if the title is blank
    #[must_use]
    pub fn to_patch(&self) -> Option<TodoPatch> {
        let title = normalize_title(&self.title)?;
        Some(TodoPatch::content(
            title,
            normalize_description(&self.description),
        ))
    }
}

/// Edit state of one item
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum ItemEditor {
    /// Showing the stored values
    #[default]
    Viewing,
    /// Editing drafts
    Editing {
        /// Current drafts
        draft: EditDraft,
        /// A save is in flight
        saving: bool,
    },
}

impl ItemEditor {
    /// Enter editing with drafts taken from `todo`
    #[must_use]
    pub fn begin(todo: &Todo) -> Self {
        Self::Editing {
            draft: EditDraft::from_todo(todo),
            saving: false,
        }
    }

    /// Returns `true` while editing
    #[must_use]
    pub const fn is_editing(&self) -> bool {
        matches!(self, Self::Editing { .. })
    }

    /// Returns `true` while a save is in flight
    #[must_use]
    pub const fn is_saving(&self) -> bool {
        matches!(self, Self::Editing { saving: true, .. })
    }

    /// Current drafts, if editing
    #[must_use]
    pub const fn draft(&self) -> Option<&EditDraft> {
        match self {
            Self::Editing { draft, .. } => Some(draft),
            Self::Viewing => None,
        }
    }

    /// Replace the title draft; ignored while viewing
    pub fn set_title(&mut self, title: String) {
        if let Self::Editing { draft, .. } = self {
            draft.title = title;
        }
    }

    /// Replace the description draft; ignored while viewing
    pub fn set_description(&mut self, description: String) {
        if let Self::Editing { draft, .. } = self {
            draft.description = description;
        }
    }

    /// Mark a save as in flight and return its patch
    ///
    /// Returns `None` (and stays unchanged) when not editing, when a save is
    /// already in flight, or when the title draft is blank.
    pub fn start_save(&mut self) -> Option<TodoPatch> {
        match self {
            Self::Editing { draft, saving } if !*saving => {
                let patch = draft.to_patch()?;
                *saving = true;
                Some(patch)
            },
            _ => None,
        }
    }

    /// The save failed; keep editing with the drafts intact
    pub fn save_failed(&mut self) {
        if let Self::Editing { saving, .. } = self {
            *saving = false;
        }
    }

    /// The save succeeded or the edit was cancelled
    pub fn finish(&mut self) {
        *self = Self::Viewing;
    }
}
