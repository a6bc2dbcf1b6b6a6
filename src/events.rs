//! Messages exchanged between a panel surface and the [`Panel`](crate::panel::Panel).

use crate::models::Snippet;
use crate::storage::IgnoreReason;
use serde::{Deserialize, Serialize};

/// Everything a form or list surface can ask for.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(tag = "command", rename_all = "camelCase")]
pub enum PanelMessage {
    /// Submit the form; adds, or updates the row loaded for editing.
    AddSnippet { value: String },
    EditSnippet { index: usize, value: String },
    DeleteSnippet { index: usize },
    CopySnippet { index: usize },
    /// Prefill the form with a row and switch it to edit mode.
    LoadSnippet { index: usize },
}

/// What the surface should do in response.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(tag = "command", rename_all = "camelCase")]
pub enum PanelReply {
    /// Re-render from this list.
    Refresh {
        snippets: Vec<Snippet>,
        editing: Option<usize>,
    },
    Load { index: usize, value: String },
    Copied { index: usize, value: String },
    Ignored { reason: IgnoreReason },
}

impl PanelReply {
    /// One-line status text for the surface, if the reply warrants one.
    pub fn status_message(&self) -> Option<String> {
        match self {
            PanelReply::Refresh { .. } => None,
            PanelReply::Load { index, .. } => Some(format!("Editing snippet {}", index)),
            PanelReply::Copied { value, .. } => Some(format!("Copied: {}", value)),
            PanelReply::Ignored { reason } => Some(reason.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn messages_use_command_tags() {
        let cases = [
            (
                json!({"command": "addSnippet", "value": "hi"}),
                PanelMessage::AddSnippet { value: "hi".into() },
            ),
            (
                json!({"command": "editSnippet", "index": 2, "value": "x"}),
                PanelMessage::EditSnippet {
                    index: 2,
                    value: "x".into(),
                },
            ),
            (
                json!({"command": "deleteSnippet", "index": 0}),
                PanelMessage::DeleteSnippet { index: 0 },
            ),
            (
                json!({"command": "copySnippet", "index": 1}),
                PanelMessage::CopySnippet { index: 1 },
            ),
            (
                json!({"command": "loadSnippet", "index": 3}),
                PanelMessage::LoadSnippet { index: 3 },
            ),
        ];

        for (raw, expected) in cases {
            let parsed: PanelMessage = serde_json::from_value(raw).unwrap();
            assert_eq!(parsed, expected);
        }
    }

    #[test]
    fn unknown_command_is_rejected() {
        let result = serde_json::from_value::<PanelMessage>(json!({"command": "renameSnippet"}));
        assert!(result.is_err());
    }

    #[test]
    fn ignored_reply_shape() {
        let reply = PanelReply::Ignored {
            reason: IgnoreReason::IndexOutOfRange { index: 5, len: 2 },
        };
        assert_eq!(
            serde_json::to_value(&reply).unwrap(),
            json!({"command": "ignored", "reason": {"kind": "indexOutOfRange", "index": 5, "len": 2}})
        );
    }

    #[test]
    fn status_messages() {
        let copied = PanelReply::Copied {
            index: 0,
            value: "foo".into(),
        };
        assert_eq!(copied.status_message().as_deref(), Some("Copied: foo"));

        let refresh = PanelReply::Refresh {
            snippets: vec![],
            editing: None,
        };
        assert_eq!(refresh.status_message(), None);
    }
}
