use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The single free-form note kept per user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Note {
    pub content: String,
    pub updated_at: DateTime<Utc>,
    /// Image data URL of a captured signature.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signature: Option<String>,
}

impl Note {
    /// Replaces the content of `existing`, or starts a new note.
    ///
    /// Fields not being written, like the signature, are merged from the
    /// existing note.
    pub fn upsert(existing: Option<Note>, content: String, now: DateTime<Utc>) -> Note {
        Note {
            content,
            updated_at: now,
            signature: existing.and_then(|n| n.signature),
        }
    }
}
