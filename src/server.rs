use crate::api::{api_get_snippets, api_get_tree, api_handle_message, share, SharedPanel};
use crate::clipboard::{Clipboard, SystemClipboard};
use crate::config::AppConfig;
use crate::error::Result;
use crate::events::PanelMessage;
use crate::panel::Panel;
use crate::repository::{JsonSettingsRepository, SnippetRepository};
use crate::storage::SnippetStore;
use std::convert::Infallible;
use std::net::SocketAddr;
use tracing::info;
use warp::{Filter, Rejection, Reply};

fn with_panel<R, C>(
    panel: SharedPanel<R, C>,
) -> impl Filter<Extract = (SharedPanel<R, C>,), Error = Infallible> + Clone
where
    R: SnippetRepository + Send + 'static,
    C: Clipboard + Send + 'static,
{
    warp::any().map(move || panel.clone())
}

/// Browser origins allowed to call the API: the server's own loopback address.
pub fn local_origins(port: u16) -> [String; 2] {
    [
        format!("http://127.0.0.1:{}", port),
        format!("http://localhost:{}", port),
    ]
}

/// HTTP routes for the form surface served on `port`.
///
/// Requests from any other browser origin are refused with 403; requests
/// without an `Origin` header (curl, the CLI) pass through.
pub fn routes<R, C>(
    panel: SharedPanel<R, C>,
    port: u16,
) -> impl Filter<Extract = (impl Reply,), Error = Rejection> + Clone
where
    R: SnippetRepository + Send + 'static,
    C: Clipboard + Send + 'static,
{
    let origins = local_origins(port);
    let cors = warp::cors()
        .allow_origins(origins.iter().map(String::as_str))
        .allow_headers(vec!["Content-Type"])
        .allow_methods(vec!["GET", "POST"]);

    let get_snippets = warp::path!("api" / "snippets")
        .and(warp::get())
        .and(with_panel(panel.clone()))
        .map(|panel: SharedPanel<R, C>| warp::reply::json(&api_get_snippets(&panel)));

    let get_tree = warp::path!("api" / "tree")
        .and(warp::get())
        .and(with_panel(panel.clone()))
        .map(|panel: SharedPanel<R, C>| warp::reply::json(&api_get_tree(&panel)));

    let post_message = warp::path!("api" / "message")
        .and(warp::post())
        .and(warp::body::json())
        .and(with_panel(panel))
        .map(|message: PanelMessage, panel: SharedPanel<R, C>| {
            warp::reply::json(&api_handle_message(&panel, message))
        });

    // Health check endpoint
    let health = warp::path!("health").map(|| "snippet-copier API is running");

    get_snippets
        .or(get_tree)
        .or(post_message)
        .or(health)
        .with(cors)
}

/// Serve the snippets in the configured settings file until the process is stopped.
pub async fn start_api_server(config: &AppConfig) -> Result<()> {
    let addr = SocketAddr::from(([127, 0, 0, 1], config.api_port));

    let mut store = SnippetStore::new(JsonSettingsRepository::new(&config.settings_path));
    store.on_change(|snippets| info!(count = snippets.len(), "snippet list changed"));
    let panel = share(Panel::new(store, SystemClipboard::new()));

    println!("Serving snippets from {}", config.settings_path.display());
    println!("API listening on http://{}", addr);
    info!(%addr, "starting API server");

    warp::serve(routes(panel, config.api_port)).run(addr).await;

    Ok(())
}
