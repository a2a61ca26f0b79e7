//! In-memory note store snapshots.
//!
//! # Responsibility
//! - Hold the ordered note list that the view renders.
//! - Produce a fresh immutable snapshot for every mutation.
//!
//! # Invariants
//! - Order is the service-provided order; creates append at the end.
//! - Ids are unique within one snapshot.
//! - A snapshot is never mutated after construction.

use crate::model::note::{Note, NoteId};
use std::collections::HashSet;
use std::sync::Arc;

/// Immutable, cheaply clonable snapshot of the note list.
#[derive(Debug, Clone, Default)]
pub struct NoteStore {
    notes: Arc<[Note]>,
}

impl NoteStore {
    /// Builds a snapshot from service-ordered notes.
    ///
    /// Later duplicates of an id are dropped so the first occurrence wins.
    pub fn from_notes(notes: impl IntoIterator<Item = Note>) -> Self {
        let mut seen = HashSet::new();
        let notes: Vec<Note> = notes
            .into_iter()
            .filter(|note| seen.insert(note.id.clone()))
            .collect();
        Self {
            notes: notes.into(),
        }
    }

    /// Returns a snapshot holding exactly `notes`.
    pub fn replace_all(&self, notes: impl IntoIterator<Item = Note>) -> Self {
        Self::from_notes(notes)
    }

    /// Returns a snapshot with `note` appended.
    ///
    /// If the id is already present the existing entry is replaced in place.
    pub fn append(&self, note: Note) -> Self {
        if self.find(&note.id).is_some() {
            let id = note.id.clone();
            return self.replace(&id, note);
        }
        let mut notes = self.notes.to_vec();
        notes.push(note);
        Self {
            notes: notes.into(),
        }
    }

    /// Returns a snapshot where the note with `id` is swapped for `note`.
    ///
    /// Unknown ids leave the content unchanged.
    pub fn replace(&self, id: &NoteId, note: Note) -> Self {
        let notes: Vec<Note> = self
            .notes
            .iter()
            .map(|current| {
                if &current.id == id {
                    note.clone()
                } else {
                    current.clone()
                }
            })
            .collect();
        Self {
            notes: notes.into(),
        }
    }

    /// Returns a snapshot without the note with `id`.
    pub fn remove(&self, id: &NoteId) -> Self {
        let notes: Vec<Note> = self
            .notes
            .iter()
            .filter(|note| &note.id != id)
            .cloned()
            .collect();
        Self {
            notes: notes.into(),
        }
    }

    pub fn find(&self, id: &NoteId) -> Option<&Note> {
        self.notes.iter().find(|note| &note.id == id)
    }

    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Note> {
        self.notes.iter()
    }

    pub fn len(&self) -> usize {
        self.notes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    /// Whether both snapshots share the same backing allocation.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.notes, &other.notes)
    }
}

impl<'a> IntoIterator for &'a NoteStore {
    type Item = &'a Note;
    type IntoIter = std::slice::Iter<'a, Note>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
