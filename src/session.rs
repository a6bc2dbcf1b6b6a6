use crate::error::Result;
use crate::repository::SnippetRepository;
use crate::storage::{Change, IgnoreReason, SnippetStore};
use tracing::debug;

/// Whether the form is creating a new snippet or rewriting an existing row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EditSession {
    #[default]
    Idle,
    Editing(usize),
}

impl EditSession {
    pub fn editing(&self) -> Option<usize> {
        match self {
            EditSession::Idle => None,
            EditSession::Editing(index) => Some(*index),
        }
    }

    /// Start editing the row at `index` and return its text for the form.
    ///
    /// An out-of-range index leaves the session as it was.
    pub fn load_for_edit<R: SnippetRepository>(
        &mut self,
        store: &SnippetStore<R>,
        index: usize,
    ) -> Result<Option<String>> {
        let text = store.copy(index)?;
        if text.is_some() {
            debug!(index, "editing snippet");
            *self = EditSession::Editing(index);
        }
        Ok(text)
    }

    /// Submit the form: update the row being edited, or add when idle.
    pub fn submit<R: SnippetRepository>(
        &mut self,
        store: &mut SnippetStore<R>,
        text: impl Into<String>,
    ) -> Result<Change> {
        let change = match *self {
            EditSession::Idle => store.add(text)?,
            EditSession::Editing(index) => store.update(index, text)?,
        };

        match change {
            // keep the row selected so the text can be fixed
            Change::Ignored(IgnoreReason::EmptyText) => {}
            Change::Applied | Change::Ignored(IgnoreReason::IndexOutOfRange { .. }) => {
                *self = EditSession::Idle
            }
        }
        Ok(change)
    }

    pub fn cancel(&mut self) {
        *self = EditSession::Idle;
    }

    /// Keep the session on the same row after `index` was deleted.
    pub fn on_delete(&mut self, index: usize) {
        if let EditSession::Editing(editing) = *self {
            if editing == index {
                *self = EditSession::Idle;
            } else if editing > index {
                *self = EditSession::Editing(editing - 1);
            }
        }
    }
}
