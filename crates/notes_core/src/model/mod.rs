//! Domain model for the notes client.
//!
//! # Responsibility
//! - Define the note shape exchanged with the remote note service.
//! - Keep identifiers opaque so the client never invents or rewrites them.
//!
//! # Invariants
//! - Every stored note carries a server-assigned `NoteId`.
//! - Note content is never sent to the service empty.

pub mod note;
