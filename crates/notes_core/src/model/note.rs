//! Note domain model.
//!
//! # Responsibility
//! - Define the canonical `Note` record and its create payload `NewNote`.
//! - Validate user-entered content before it can reach the service.
//!
//! # Invariants
//! - `NoteId` is assigned by the service and echoed back verbatim.
//! - `NewNote::content` is trimmed and non-empty.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Opaque note identifier assigned by the remote service.
///
/// Services differ in whether ids are numbers or strings; both shapes are
/// accepted and serialized back in the same shape they arrived in.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NoteId {
    Number(u64),
    Text(String),
}

impl Display for NoteId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Number(value) => write!(f, "{value}"),
            Self::Text(value) => f.write_str(value),
        }
    }
}

impl From<u64> for NoteId {
    fn from(value: u64) -> Self {
        Self::Number(value)
    }
}

impl From<&str> for NoteId {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for NoteId {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

/// A note as acknowledged by the remote service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    pub id: NoteId,
    pub content: String,
    #[serde(default)]
    pub important: bool,
}

impl Note {
    pub fn new(id: impl Into<NoteId>, content: impl Into<String>, important: bool) -> Self {
        Self {
            id: id.into(),
            content: content.into(),
            important,
        }
    }

    /// Returns a copy with the importance flag flipped.
    ///
    /// `id` and `content` are preserved unchanged.
    pub fn with_importance_flipped(&self) -> Self {
        Self {
            important: !self.important,
            ..self.clone()
        }
    }
}

/// Create payload. Carries no id; the service assigns one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewNote {
    pub content: String,
    pub important: bool,
}

impl NewNote {
    /// Builds a create payload from raw user input.
    ///
    /// # Errors
    /// - `ValidationError::EmptyContent` when `content` is empty after trimming.
    pub fn try_new(content: &str, important: bool) -> Result<Self, ValidationError> {
        let trimmed = content.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::EmptyContent);
        }
        Ok(Self {
            content: trimmed.to_string(),
            important,
        })
    }
}

/// Invalid user input, rejected before any remote call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    EmptyContent,
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyContent => f.write_str("Note content cannot be empty"),
        }
    }
}

impl Error for ValidationError {}

#[cfg(test)]
mod tests {
    use super::{NewNote, Note, NoteId, ValidationError};

    #[test]
    fn note_id_accepts_numbers_and_strings() {
        let numeric: Note =
            serde_json::from_str(r#"{"id":7,"content":"a","important":true}"#).unwrap();
        assert_eq!(numeric.id, NoteId::Number(7));

        let textual: Note =
            serde_json::from_str(r#"{"id":"6f2a","content":"b","important":false}"#).unwrap();
        assert_eq!(textual.id, NoteId::Text("6f2a".to_string()));
        assert_eq!(textual.id.to_string(), "6f2a");
    }

    #[test]
    fn note_id_keeps_wire_shape_on_serialize() {
        let note = Note::new(3, "x", false);
        let json = serde_json::to_value(&note).unwrap();
        assert_eq!(json["id"], serde_json::json!(3));
    }

    #[test]
    fn missing_importance_defaults_to_false() {
        let note: Note = serde_json::from_str(r#"{"id":1,"content":"a"}"#).unwrap();
        assert!(!note.important);
    }

    #[test]
    fn flip_preserves_id_and_content() {
        let note = Note::new(1, "buy milk", false);
        let flipped = note.with_importance_flipped();
        assert!(flipped.important);
        assert_eq!(flipped.id, note.id);
        assert_eq!(flipped.content, note.content);
    }

    #[test]
    fn new_note_trims_and_rejects_blank_content() {
        let draft = NewNote::try_new("  call mom \n", true).unwrap();
        assert_eq!(draft.content, "call mom");

        assert_eq!(
            NewNote::try_new(" \t\n", false).unwrap_err(),
            ValidationError::EmptyContent
        );
        assert_eq!(
            ValidationError::EmptyContent.to_string(),
            "Note content cannot be empty"
        );
    }

    #[test]
    fn new_note_serializes_without_id() {
        let draft = NewNote::try_new("a", false).unwrap();
        let json = serde_json::to_value(&draft).unwrap();
        assert!(json.get("id").is_none());
    }
}
