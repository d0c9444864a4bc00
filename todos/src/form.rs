//! Draft state of the "new todo" form.

use crate::types::{normalize_description, normalize_title};

/// Creation form drafts
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CreationForm {
    /// Title draft
    pub title: String,
    /// Description draft
    pub description: String,
    /// A create from this form is in flight
    pub submitting: bool,
}

impl CreationForm {
    /// Replace the title draft
    pub fn set_title(&mut self, title: String) {
        self.title = title;
    }

    /// Replace the description draft
    pub fn set_description(&mut self, description: String) {
        self.description = description;
    }

    /// Normalized title and description to submit
    ///
    /// Returns `None` for a blank title.
    #[must_use]
    pub fn submission(&self) -> Option<(String, Option<String>)> {
        let title = normalize_title(&self.title)?;
        Some((title, normalize_description(&self.description)))
    }

    /// Reset after a confirmed create
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Keep the drafts after a failed create
    pub fn submit_failed(&mut self) {
        self.submitting = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn submission_normalizes_drafts() {
        let mut form = CreationForm::default();
        form.set_title("  Buy milk ".to_string());
        form.set_description(" ".to_string());
        assert_eq!(form.submission(), Some(("Buy milk".to_string(), None)));

        form.set_title("\t".to_string());
        assert_eq!(form.submission(), None);
    }

    #[test]
    fn clear_and_failure() {
        let mut form = CreationForm {
            title: "A".to_string(),
            description: "B".to_string(),
            submitting: true,
        };

        form.submit_failed();
        assert_eq!(form.title, "A");
        assert!(!form.submitting);

        form.clear();
        assert_eq!(form, CreationForm::default());
    }
}
