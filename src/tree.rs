//! Clickable list rows: one row per snippet, activating a row copies it.

use crate::clipboard::Clipboard;
use crate::error::Result;
use crate::events::{PanelMessage, PanelReply};
use crate::models::Snippet;
use crate::panel::Panel;
use crate::repository::SnippetRepository;
use serde::{Deserialize, Serialize};

/// Command a row triggers when activated.
pub const COPY_COMMAND: &str = "snippetCopier.copy";

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct SnippetItem {
    pub index: usize,
    pub label: String,
    pub tooltip: String,
    pub command: String,
}

impl SnippetItem {
    pub fn new(index: usize, snippet: &Snippet) -> Self {
        let label = if snippet.is_multiline() {
            format!("{} …", snippet.first_line())
        } else {
            snippet.text.clone()
        };

        Self {
            index,
            label,
            tooltip: format!("Click to copy: {}", snippet.text),
            command: COPY_COMMAND.to_string(),
        }
    }

    /// Run the row's command against `panel`.
    pub fn activate<R, C>(&self, panel: &mut Panel<R, C>) -> Result<PanelReply>
    where
        R: SnippetRepository,
        C: Clipboard,
    {
        panel.handle(PanelMessage::CopySnippet { index: self.index })
    }
}

pub fn tree_items(snippets: &[Snippet]) -> Vec<SnippetItem> {
    snippets
        .iter()
        .enumerate()
        .map(|(index, snippet)| SnippetItem::new(index, snippet))
        .collect()
}
