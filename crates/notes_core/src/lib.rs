//! Core of the notes client.
//! This crate owns the note store, the sync policy against the remote note
//! service, and the notification and view models built on top of them.

pub mod config;
pub mod logging;
pub mod model;
pub mod notify;
pub mod remote;
pub mod store;
pub mod sync;
pub mod view;

pub use config::{ClientConfig, ConfigError, ImportancePolicy};
pub use logging::{init_logging, logging_status, LogLevel, LoggingError};
pub use model::note::{NewNote, Note, NoteId, ValidationError};
pub use notify::{NotificationEvent, Notifier, DEFAULT_NOTIFICATION_TTL};
pub use remote::{HttpNoteRemote, NoteRemote, RemoteError, RemoteResult};
pub use store::NoteStore;
pub use sync::{Confirm, IntentKind, IntentOutcome, IntentPhase, SyncController, SyncError};
pub use view::{Filter, NotesView};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
