use crate::clipboard::Clipboard;
use crate::error::Result;
use crate::events::{PanelMessage, PanelReply};
use crate::models::Snippet;
use crate::repository::SnippetRepository;
use crate::session::EditSession;
use crate::storage::{Change, IgnoreReason, SnippetStore};
use tracing::debug;

/// Dispatches panel messages onto the store, the edit session and the clipboard.
pub struct Panel<R, C> {
    store: SnippetStore<R>,
    session: EditSession,
    clipboard: C,
}

impl<R: SnippetRepository, C: Clipboard> Panel<R, C> {
    pub fn new(store: SnippetStore<R>, clipboard: C) -> Self {
        Self {
            store,
            session: EditSession::default(),
            clipboard,
        }
    }

    pub fn store(&self) -> &SnippetStore<R> {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut SnippetStore<R> {
        &mut self.store
    }

    pub fn session(&self) -> EditSession {
        self.session
    }

    pub fn clipboard(&self) -> &C {
        &self.clipboard
    }

    pub fn snippets(&self) -> Result<Vec<Snippet>> {
        self.store.get_all()
    }

    /// Current list and edit state, for a full re-render.
    pub fn refresh(&self) -> Result<PanelReply> {
        Ok(PanelReply::Refresh {
            snippets: self.store.get_all()?,
            editing: self.session.editing(),
        })
    }

    /// Drop any in-progress edit, e.g. when the form is dismissed.
    pub fn cancel_edit(&mut self) {
        self.session.cancel();
    }

    pub fn handle(&mut self, message: PanelMessage) -> Result<PanelReply> {
        debug!(?message, "panel message");
        match message {
            PanelMessage::AddSnippet { value } => {
                let change = self.session.submit(&mut self.store, value)?;
                self.after_mutation(change)
            }
            PanelMessage::EditSnippet { index, value } => {
                let change = self.store.update(index, value)?;
                if change.is_applied() && self.session.editing() == Some(index) {
                    self.session.cancel();
                }
                self.after_mutation(change)
            }
            PanelMessage::DeleteSnippet { index } => {
                let change = self.store.delete(index)?;
                if change.is_applied() {
                    self.session.on_delete(index);
                }
                self.after_mutation(change)
            }
            PanelMessage::CopySnippet { index } => match self.store.copy(index)? {
                Some(value) => {
                    self.clipboard.set_text(&value)?;
                    Ok(PanelReply::Copied { index, value })
                }
                None => self.out_of_range(index),
            },
            PanelMessage::LoadSnippet { index } => {
                match self.session.load_for_edit(&self.store, index)? {
                    Some(value) => Ok(PanelReply::Load { index, value }),
                    None => self.out_of_range(index),
                }
            }
        }
    }

    fn after_mutation(&self, change: Change) -> Result<PanelReply> {
        match change {
            Change::Applied => self.refresh(),
            Change::Ignored(reason) => Ok(PanelReply::Ignored { reason }),
        }
    }

    fn out_of_range(&self, index: usize) -> Result<PanelReply> {
        let len = self.store.get_all()?.len();
        Ok(PanelReply::Ignored {
            reason: IgnoreReason::IndexOutOfRange { index, len },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clipboard::MemoryClipboard;
    use crate::repository::MemoryRepository;

    fn panel_with(texts: &[&str]) -> Panel<MemoryRepository, MemoryClipboard> {
        Panel::new(
            SnippetStore::new(MemoryRepository::with_snippets(texts.iter().copied())),
            MemoryClipboard::new(),
        )
    }

    fn refreshed(texts: &[&str], editing: Option<usize>) -> PanelReply {
        PanelReply::Refresh {
            snippets: texts.iter().map(|t| Snippet::new(*t)).collect(),
            editing,
        }
    }

    #[test]
    fn add_replies_with_refresh() {
        let mut panel = panel_with(&[]);
        let reply = panel
            .handle(PanelMessage::AddSnippet { value: "foo".into() })
            .unwrap();
        assert_eq!(reply, refreshed(&["foo"], None));
    }

    #[test]
    fn load_then_add_updates_loaded_row() {
        let mut panel = panel_with(&["a", "b"]);

        let reply = panel.handle(PanelMessage::LoadSnippet { index: 1 }).unwrap();
        assert_eq!(
            reply,
            PanelReply::Load {
                index: 1,
                value: "b".into()
            }
        );
        assert_eq!(panel.session(), EditSession::Editing(1));

        let reply = panel
            .handle(PanelMessage::AddSnippet { value: "c".into() })
            .unwrap();
        assert_eq!(reply, refreshed(&["a", "c"], None));
    }

    #[test]
    fn copy_hands_text_to_clipboard() {
        let mut panel = panel_with(&["alpha", "beta"]);
        let reply = panel.handle(PanelMessage::CopySnippet { index: 1 }).unwrap();

        assert_eq!(
            reply,
            PanelReply::Copied {
                index: 1,
                value: "beta".into()
            }
        );
        assert_eq!(panel.clipboard().contents(), Some("beta"));
    }

    #[test]
    fn copy_out_of_range_leaves_clipboard_alone() {
        let mut panel = panel_with(&["alpha"]);
        let reply = panel.handle(PanelMessage::CopySnippet { index: 3 }).unwrap();

        assert_eq!(
            reply,
            PanelReply::Ignored {
                reason: IgnoreReason::IndexOutOfRange { index: 3, len: 1 }
            }
        );
        assert!(panel.clipboard().history().is_empty());
    }

    #[test]
    fn delete_keeps_session_on_same_row() {
        let mut panel = panel_with(&["a", "b", "c"]);
        panel.handle(PanelMessage::LoadSnippet { index: 2 }).unwrap();

        let reply = panel.handle(PanelMessage::DeleteSnippet { index: 0 }).unwrap();
        assert_eq!(reply, refreshed(&["b", "c"], Some(1)));

        panel
            .handle(PanelMessage::AddSnippet { value: "C".into() })
            .unwrap();
        assert_eq!(panel.store().repository().texts(), vec!["b", "C"]);
    }

    #[test]
    fn delete_out_of_range_is_ignored() {
        let mut panel = panel_with(&["a", "b"]);
        let reply = panel.handle(PanelMessage::DeleteSnippet { index: 5 }).unwrap();

        assert!(matches!(reply, PanelReply::Ignored { .. }));
        assert_eq!(panel.store().repository().texts(), vec!["a", "b"]);
    }

    #[test]
    fn direct_edit_clears_matching_session() {
        let mut panel = panel_with(&["a", "b"]);
        panel.handle(PanelMessage::LoadSnippet { index: 0 }).unwrap();

        let reply = panel
            .handle(PanelMessage::EditSnippet {
                index: 0,
                value: "A".into(),
            })
            .unwrap();
        assert_eq!(reply, refreshed(&["A", "b"], None));
    }

    #[test]
    fn direct_edit_of_other_row_keeps_session() {
        let mut panel = panel_with(&["a", "b"]);
        panel.handle(PanelMessage::LoadSnippet { index: 0 }).unwrap();

        let reply = panel
            .handle(PanelMessage::EditSnippet {
                index: 1,
                value: "B".into(),
            })
            .unwrap();
        assert_eq!(reply, refreshed(&["a", "B"], Some(0)));
    }

    #[test]
    fn cancel_edit_makes_next_submit_an_add() {
        let mut panel = panel_with(&["a"]);
        panel.handle(PanelMessage::LoadSnippet { index: 0 }).unwrap();
        panel.cancel_edit();

        panel
            .handle(PanelMessage::AddSnippet { value: "b".into() })
            .unwrap();
        assert_eq!(panel.store().repository().texts(), vec!["a", "b"]);
    }
}
