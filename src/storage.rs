use crate::error::Result;
use crate::models::Snippet;
use crate::repository::SnippetRepository;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, info, warn};

/// Why a mutation left the list untouched.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum IgnoreReason {
    IndexOutOfRange { index: usize, len: usize },
    EmptyText,
}

impl fmt::Display for IgnoreReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IgnoreReason::IndexOutOfRange { index, len } => {
                write!(f, "No snippet at index {} (list has {})", index, len)
            }
            IgnoreReason::EmptyText => write!(f, "Snippet text is empty"),
        }
    }
}

/// Outcome of a mutation. Ignored mutations do not write or notify.
#[must_use]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Change {
    Applied,
    Ignored(IgnoreReason),
}

impl Change {
    pub fn is_applied(&self) -> bool {
        matches!(self, Change::Applied)
    }
}

pub type ChangeListener = Box<dyn FnMut(&[Snippet]) + Send>;

/// Ordered snippet list backed by a repository.
///
/// Every operation re-reads the list, so nothing is cached between calls.
pub struct SnippetStore<R> {
    repository: R,
    listeners: Vec<ChangeListener>,
}

impl<R: SnippetRepository> SnippetStore<R> {
    pub fn new(repository: R) -> Self {
        Self {
            repository,
            listeners: Vec::new(),
        }
    }

    pub fn repository(&self) -> &R {
        &self.repository
    }

    /// Register a callback run with the new list after every applied mutation.
    pub fn on_change<F>(&mut self, listener: F)
    where
        F: FnMut(&[Snippet]) + Send + 'static,
    {
        self.listeners.push(Box::new(listener));
    }

    pub fn get_all(&self) -> Result<Vec<Snippet>> {
        let snippets = self.repository.read()?;
        debug!(count = snippets.len(), "loaded snippet list");
        Ok(snippets)
    }

    pub fn get(&self, index: usize) -> Result<Option<Snippet>> {
        Ok(self.get_all()?.into_iter().nth(index))
    }

    /// Append `text` at the end of the list.
    pub fn add(&mut self, text: impl Into<String>) -> Result<Change> {
        let text = text.into();
        if text.is_empty() {
            return Ok(ignored("add", IgnoreReason::EmptyText));
        }

        let mut snippets = self.get_all()?;
        snippets.push(Snippet::new(text));
        self.commit("add", &snippets)
    }

    /// Replace the snippet at `index`.
    pub fn update(&mut self, index: usize, text: impl Into<String>) -> Result<Change> {
        let text = text.into();
        if text.is_empty() {
            return Ok(ignored("update", IgnoreReason::EmptyText));
        }

        let mut snippets = self.get_all()?;
        let len = snippets.len();
        match snippets.get_mut(index) {
            Some(entry) => entry.text = text,
            None => return Ok(ignored("update", IgnoreReason::IndexOutOfRange { index, len })),
        }
        self.commit("update", &snippets)
    }

    /// Remove the snippet at `index`; later snippets shift down by one.
    pub fn delete(&mut self, index: usize) -> Result<Change> {
        let mut snippets = self.get_all()?;
        let len = snippets.len();
        if index >= len {
            return Ok(ignored("delete", IgnoreReason::IndexOutOfRange { index, len }));
        }

        snippets.remove(index);
        self.commit("delete", &snippets)
    }

    /// Text at `index`, for the caller to hand to a clipboard.
    pub fn copy(&self, index: usize) -> Result<Option<String>> {
        Ok(self.get(index)?.map(|snippet| snippet.text))
    }

    fn commit(&mut self, operation: &str, snippets: &[Snippet]) -> Result<Change> {
        self.repository.write(snippets)?;
        info!(operation, count = snippets.len(), "snippet list saved");

        for listener in &mut self.listeners {
            listener(snippets);
        }
        Ok(Change::Applied)
    }
}

fn ignored(operation: &str, reason: IgnoreReason) -> Change {
    warn!(operation, %reason, "snippet mutation ignored");
    Change::Ignored(reason)
}
