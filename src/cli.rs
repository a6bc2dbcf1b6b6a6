use crate::config::DEFAULT_API_PORT;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    version = env!("CARGO_PKG_VERSION"),
    about = "snippet-copier - keep short text snippets at hand",
    long_about = "snippet-copier stores short text snippets in a settings file and copies them to the clipboard."
)]
pub struct SnippetCopier {
    #[clap(
        long,
        global = true,
        value_name = "PATH",
        help = "Settings file holding the snippet list"
    )]
    pub settings: Option<PathBuf>,

    #[clap(subcommand)]
    pub commands: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List all snippets with their index
    List,
    /// Append a snippet to the end of the list
    Add {
        #[clap(help = "The snippet text")]
        text: String,
    },
    /// Replace the snippet at an index
    Update {
        #[clap(help = "Index of the snippet to replace")]
        index: usize,

        #[clap(help = "New snippet text")]
        text: String,
    },
    /// Delete the snippet at an index
    Delete {
        #[clap(help = "Index of the snippet to delete")]
        index: usize,
    },
    /// Copy the snippet at an index to the clipboard
    ///
    /// On Linux the command keeps serving the text until another program
    /// takes the clipboard over.
    Copy {
        #[clap(help = "Index of the snippet to copy")]
        index: usize,
    },
    /// Show the settings file in use
    Path,
    /// Open the interactive snippet panel
    Ui,
    /// Serve the panel message API on localhost
    Serve {
        #[clap(long, short, default_value_t = DEFAULT_API_PORT, help = "Port to listen on")]
        port: u16,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        SnippetCopier::command().debug_assert();
    }

    #[test]
    fn parses_update_with_global_settings() {
        let args = SnippetCopier::parse_from([
            "snippet-copier",
            "update",
            "1",
            "new text",
            "--settings",
            "/tmp/s.json",
        ]);

        assert_eq!(args.settings, Some(PathBuf::from("/tmp/s.json")));
        match args.commands {
            Some(Commands::Update { index, text }) => {
                assert_eq!(index, 1);
                assert_eq!(text, "new text");
            }
            _ => panic!("expected update command"),
        }
    }

    #[test]
    fn serve_defaults_port() {
        let args = SnippetCopier::parse_from(["snippet-copier", "serve"]);
        assert!(matches!(
            args.commands,
            Some(Commands::Serve { port: DEFAULT_API_PORT })
        ));
    }
}
