use std::env;
use std::path::{Path, PathBuf};

/// Settings namespace the snippet list lives under.
pub const NAMESPACE: &str = "snippetCopier";
/// Key inside the namespace that holds the ordered list of strings.
pub const SNIPPETS_KEY: &str = "snippets";
pub const SETTINGS_FILENAME: &str = "settings.json";
pub const DEFAULT_API_PORT: u16 = 3000;

pub const SETTINGS_ENV: &str = "SNIPPET_COPIER_SETTINGS";
pub const HOME_ENV: &str = "SNIPPET_COPIER_HOME";

/// Fully qualified settings key, e.g. `snippetCopier.snippets`.
pub fn snippets_setting_key() -> String {
    format!("{}.{}", NAMESPACE, SNIPPETS_KEY)
}

/// Get the snippet-copier configuration directory
pub fn get_config_dir() -> PathBuf {
    if let Ok(dir) = env::var(HOME_ENV) {
        return PathBuf::from(dir);
    }

    env::var("HOME")
        .map(|home| PathBuf::from(home).join(".snippet-copier"))
        .unwrap_or_else(|_| PathBuf::from(".snippet-copier"))
}

/// Get the path to the settings file
pub fn get_settings_file_path() -> PathBuf {
    match env::var(SETTINGS_ENV) {
        Ok(path) if !path.trim().is_empty() => PathBuf::from(path),
        _ => get_config_dir().join(SETTINGS_FILENAME),
    }
}

/// Runtime configuration shared by the command-line, terminal and HTTP surfaces.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub settings_path: PathBuf,
    pub api_port: u16,
}

impl AppConfig {
    /// Resolve the configuration; an explicit settings path wins over the environment.
    pub fn resolve(settings_override: Option<&Path>) -> Self {
        let settings_path = settings_override
            .map(Path::to_path_buf)
            .unwrap_or_else(get_settings_file_path);

        Self {
            settings_path,
            api_port: DEFAULT_API_PORT,
        }
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.api_port = port;
        self
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::resolve(None)
    }
}
