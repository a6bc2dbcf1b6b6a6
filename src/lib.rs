//! snippet-copier - keep short text snippets in a settings file and copy them
//! to the clipboard from a terminal panel, the command line, or a local HTTP
//! endpoint that speaks the panel message protocol.

pub mod api;
pub mod cli;
pub mod clipboard;
pub mod commands;
pub mod config;
pub mod error;
pub mod events;
pub mod models;
pub mod panel;
pub mod repository;
pub mod server;
pub mod session;
pub mod storage;
pub mod tree;
pub mod ui;

use tracing_subscriber::EnvFilter;

// Re-export
pub use api::{ApiResponse, SharedPanel};
pub use cli::{Commands, SnippetCopier};
pub use clipboard::{Clipboard, MemoryClipboard, SystemClipboard};
pub use config::{get_config_dir, get_settings_file_path, AppConfig};
pub use error::{Result, SnippetError};
pub use events::{PanelMessage, PanelReply};
pub use models::Snippet;
pub use panel::Panel;
pub use repository::{JsonSettingsRepository, MemoryRepository, SnippetRepository};
pub use server::start_api_server;
pub use session::EditSession;
pub use storage::{Change, IgnoreReason, SnippetStore};
pub use tree::{tree_items, SnippetItem};
pub use ui::display_snippet_panel;

/// Log to stderr, filtered by `RUST_LOG` (default `warn`).
pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}
