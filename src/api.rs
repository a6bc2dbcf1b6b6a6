use crate::clipboard::Clipboard;
use crate::error::{Result, SnippetError};
use crate::events::{PanelMessage, PanelReply};
use crate::models::Snippet;
use crate::panel::Panel;
use crate::repository::SnippetRepository;
use crate::tree::{tree_items, SnippetItem};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex};

/// Panel shared between request handlers; the lock serializes messages.
pub type SharedPanel<R, C> = Arc<Mutex<Panel<R, C>>>;

pub fn share<R, C>(panel: Panel<R, C>) -> SharedPanel<R, C> {
    Arc::new(Mutex::new(panel))
}

#[derive(Serialize, Deserialize, Debug)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn error(message: String) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message),
        }
    }

    fn from_result(result: Result<T>, context: &str) -> Self {
        match result {
            Ok(data) => Self::success(data),
            Err(e) => Self::error(format!("{}: {}", context, e)),
        }
    }
}

fn with_panel<R, C, T>(
    panel: &SharedPanel<R, C>,
    f: impl FnOnce(&mut Panel<R, C>) -> Result<T>,
) -> Result<T> {
    let mut guard = panel.lock().map_err(|_| SnippetError::StatePoisoned)?;
    f(&mut guard)
}

// Get all snippets
pub fn api_get_snippets<R, C>(panel: &SharedPanel<R, C>) -> ApiResponse<Vec<Snippet>>
where
    R: SnippetRepository,
    C: Clipboard,
{
    ApiResponse::from_result(
        with_panel(panel, |panel| panel.snippets()),
        "Failed to load snippets",
    )
}

// Get the clickable rows
pub fn api_get_tree<R, C>(panel: &SharedPanel<R, C>) -> ApiResponse<Vec<SnippetItem>>
where
    R: SnippetRepository,
    C: Clipboard,
{
    ApiResponse::from_result(
        with_panel(panel, |panel| panel.snippets().map(|s| tree_items(&s))),
        "Failed to load snippets",
    )
}

// Dispatch a form message
pub fn api_handle_message<R, C>(
    panel: &SharedPanel<R, C>,
    message: PanelMessage,
) -> ApiResponse<PanelReply>
where
    R: SnippetRepository,
    C: Clipboard,
{
    ApiResponse::from_result(
        with_panel(panel, |panel| panel.handle(message)),
        "Failed to handle message",
    )
}
