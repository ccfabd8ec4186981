//! Annotation Note
//!
//! Notes are free-floating annotations attached to a node. They are
//! leaves: they have no children and never take part in the parent/child
//! tree.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A single annotation record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    /// Unique identifier within the owning node's note list
    pub id: String,

    /// Rich-text body, opaque to the engine
    pub body: String,

    /// Background accent, free-form
    pub color: String,

    /// Creation timestamp
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
}

impl Note {
    /// Create a note with an auto-generated UUID and the current time.
    pub fn new(body: String, color: String) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            body,
            color,
            created_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_note_creation() {
        let note = Note::new("remember this".to_string(), "#fde68a".to_string());

        assert!(!note.id.is_empty());
        assert_eq!(note.body, "remember this");
        assert_eq!(note.color, "#fde68a");
    }

    #[test]
    fn test_notes_get_distinct_ids() {
        let a = Note::new("a".to_string(), "#fff".to_string());
        let b = Note::new("b".to_string(), "#fff".to_string());
        assert_ne!(a.id, b.id);
    }
}
