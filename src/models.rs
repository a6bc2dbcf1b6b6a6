use serde::{Deserialize, Serialize};
use std::fmt;

/// A single stored text snippet. It has no identity beyond its position in the list.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(transparent)]
pub struct Snippet {
    pub text: String,
}

impl Snippet {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    /// First line of the text, used wherever a row has one line to show.
    pub fn first_line(&self) -> &str {
        self.text.lines().next().unwrap_or("")
    }

    pub fn is_multiline(&self) -> bool {
        self.text.lines().nth(1).is_some()
    }
}

impl From<&str> for Snippet {
    fn from(text: &str) -> Self {
        Self::new(text)
    }
}

impl From<String> for Snippet {
    fn from(text: String) -> Self {
        Self::new(text)
    }
}

impl fmt::Display for Snippet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}
