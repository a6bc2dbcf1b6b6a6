use clap::Parser;
use snippet_copier::commands::handle_command;
use snippet_copier::{init_logging, AppConfig, SnippetCopier};
use std::process;

fn main() {
    init_logging();

    let args = SnippetCopier::parse();
    let config = AppConfig::resolve(args.settings.as_deref());

    if let Err(e) = handle_command(&config, args.commands) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}
