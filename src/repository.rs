//! Persistence for the snippet list.
//!
//! The list is owned by a key-value settings store. The store only ever reads
//! the whole list and writes the whole list back, so a repository is nothing
//! more than those two operations.

use crate::config::snippets_setting_key;
use crate::error::{Result, SnippetError};
use crate::models::Snippet;
use serde::Deserialize;
use serde_json::{Map, Value};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::debug;

pub trait SnippetRepository {
    /// Read the full, current list.
    fn read(&self) -> Result<Vec<Snippet>>;

    /// Replace the persisted list with `snippets`.
    fn write(&mut self, snippets: &[Snippet]) -> Result<()>;
}

/// Snippets stored under `snippetCopier.snippets` in a flat JSON settings object.
///
/// Every other key in the file is left untouched on write.
#[derive(Debug, Clone)]
pub struct JsonSettingsRepository {
    path: PathBuf,
    key: String,
}

impl JsonSettingsRepository {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            key: snippets_setting_key(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load_settings(&self) -> Result<Map<String, Value>> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Map::new()),
            Err(e) => return Err(e.into()),
        };

        // Handle empty settings file
        if content.trim().is_empty() {
            return Ok(Map::new());
        }

        match serde_json::from_str::<Value>(&content)? {
            Value::Object(map) => Ok(map),
            other => Err(SnippetError::InvalidConfig(format!(
                "{} must contain a JSON object, found {}",
                self.path.display(),
                value_kind(&other)
            ))),
        }
    }
}

impl SnippetRepository for JsonSettingsRepository {
    fn read(&self) -> Result<Vec<Snippet>> {
        let settings = self.load_settings()?;
        let Some(value) = settings.get(&self.key) else {
            return Ok(vec![]);
        };

        let texts = Vec::<String>::deserialize(value).map_err(|_| {
            SnippetError::InvalidConfig(format!(
                "'{}' must be an array of strings, found {}",
                self.key,
                value_kind(value)
            ))
        })?;

        debug!(path = %self.path.display(), count = texts.len(), "read snippets");
        Ok(texts.into_iter().map(Snippet::new).collect())
    }

    fn write(&mut self, snippets: &[Snippet]) -> Result<()> {
        let mut settings = self.load_settings()?;
        settings.insert(self.key.clone(), serde_json::to_value(snippets)?);

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }

        let mut serialized = serde_json::to_string_pretty(&Value::Object(settings))?;
        serialized.push('\n');
        fs::write(&self.path, serialized)?;

        debug!(path = %self.path.display(), count = snippets.len(), "wrote snippets");
        Ok(())
    }
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array with non-string items",
        Value::Object(_) => "an object",
    }
}

/// In-memory repository for tests and throwaway panels.
#[derive(Debug, Clone, Default)]
pub struct MemoryRepository {
    snippets: Vec<Snippet>,
    writes: usize,
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_snippets<I, S>(texts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            snippets: texts.into_iter().map(Snippet::new).collect(),
            writes: 0,
        }
    }

    /// Number of writes performed so far.
    pub fn writes(&self) -> usize {
        self.writes
    }

    pub fn texts(&self) -> Vec<&str> {
        self.snippets.iter().map(|s| s.text.as_str()).collect()
    }
}

impl SnippetRepository for MemoryRepository {
    fn read(&self) -> Result<Vec<Snippet>> {
        Ok(self.snippets.clone())
    }

    fn write(&mut self, snippets: &[Snippet]) -> Result<()> {
        self.snippets = snippets.to_vec();
        self.writes += 1;
        Ok(())
    }
}
