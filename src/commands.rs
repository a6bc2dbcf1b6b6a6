use crate::cli::Commands;
use crate::clipboard::SystemClipboard;
use crate::config::AppConfig;
use crate::error::Result;
use crate::events::{PanelMessage, PanelReply};
use crate::panel::Panel;
use crate::repository::JsonSettingsRepository;
use crate::server::start_api_server;
use crate::storage::SnippetStore;
use crate::tree::tree_items;
use crate::ui::display_snippet_panel;

type CliPanel = Panel<JsonSettingsRepository, SystemClipboard>;

pub fn handle_command(config: &AppConfig, command: Option<Commands>) -> Result<()> {
    match command {
        Some(command) => handle_subcommand(config, command),
        None => display_snippet_panel(config), // Default: open the panel when no command provided
    }
}

fn handle_subcommand(config: &AppConfig, command: Commands) -> Result<()> {
    match command {
        Commands::List => list_snippets(&open_panel(config)),
        Commands::Add { text } => dispatch(
            config,
            PanelMessage::AddSnippet { value: text },
            "Snippet added successfully",
        ),
        Commands::Update { index, text } => dispatch(
            config,
            PanelMessage::EditSnippet { index, value: text },
            "Snippet updated successfully",
        ),
        Commands::Delete { index } => dispatch(
            config,
            PanelMessage::DeleteSnippet { index },
            "Snippet deleted successfully",
        ),
        Commands::Copy { index } => dispatch_with(
            open_panel_with(config, SystemClipboard::until_replaced()),
            PanelMessage::CopySnippet { index },
            "Snippet copied",
        ),
        Commands::Path => {
            println!("{}", config.settings_path.display());
            Ok(())
        }
        Commands::Ui => display_snippet_panel(config),
        Commands::Serve { port } => handle_serve_command(&config.clone().with_port(port)),
    }
}

fn open_panel(config: &AppConfig) -> CliPanel {
    open_panel_with(config, SystemClipboard::new())
}

fn open_panel_with(config: &AppConfig, clipboard: SystemClipboard) -> CliPanel {
    let store = SnippetStore::new(JsonSettingsRepository::new(&config.settings_path));
    Panel::new(store, clipboard)
}

fn dispatch(config: &AppConfig, message: PanelMessage, success: &str) -> Result<()> {
    dispatch_with(open_panel(config), message, success)
}

fn dispatch_with(mut panel: CliPanel, message: PanelMessage, success: &str) -> Result<()> {
    let reply = panel.handle(message)?;

    match reply {
        PanelReply::Refresh { .. } => println!("{}", success),
        other => {
            if let Some(status) = other.status_message() {
                println!("{}", status);
            }
        }
    }
    Ok(())
}

fn list_snippets(panel: &CliPanel) -> Result<()> {
    let snippets = panel.snippets()?;
    if snippets.is_empty() {
        println!("No snippets found. Add one with: snippet-copier add <text>");
        return Ok(());
    }

    for item in tree_items(&snippets) {
        println!("{:>3}  {}", item.index, item.label);
    }
    Ok(())
}

fn handle_serve_command(config: &AppConfig) -> Result<()> {
    // Start API server only in a properly configured runtime
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    // Block the current thread with the server
    runtime.block_on(start_api_server(config))
}
