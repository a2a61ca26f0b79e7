//! Sync controller: the only writer of the note store.
//!
//! # Responsibility
//! - Load, create, toggle and delete notes against a `NoteRemote`.
//! - Publish every new store snapshot to view subscribers.
//! - Report failures through the notification channel.
//!
//! # Invariants
//! - Create inserts only the service-returned note (the service owns ids).
//! - Toggle calls the service before touching the store; any failure is
//!   read as "already removed remotely" and drops the note locally.
//! - Delete failures leave the store unchanged.
//! - Note content is never written to logs, only its length.

use super::intent::{IntentKind, IntentOutcome, IntentTicket};
use crate::config::{ClientConfig, ImportancePolicy};
use crate::model::note::{NewNote, Note, NoteId};
use crate::notify::Notifier;
use crate::remote::{NoteRemote, RemoteError};
use crate::store::NoteStore;
use async_trait::async_trait;
use log::{error, info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tokio::sync::watch;

/// Controller-level failure returned to the caller.
///
/// Remote failures of user intents never show up here; they become
/// notifications.
#[derive(Debug)]
pub enum SyncError {
    /// Initial fetch failed; nothing can be rendered.
    Load(RemoteError),
    /// Intent referenced an id the store does not hold. Contract violation
    /// on the caller's side; returned rather than panicking.
    NotFound(NoteId),
}

impl Display for SyncError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Load(err) => write!(f, "failed to load notes: {err}"),
            Self::NotFound(id) => write!(f, "note not found in local store: {id}"),
        }
    }
}

impl Error for SyncError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Load(err) => Some(err),
            Self::NotFound(_) => None,
        }
    }
}

/// Blocking yes/no question addressed to the user.
#[async_trait]
pub trait Confirm: Send + Sync {
    async fn confirm(&self, prompt: &str) -> bool;
}

/// Mediates every mutation between the note store and the remote service.
pub struct SyncController<R: NoteRemote> {
    remote: R,
    store: watch::Sender<NoteStore>,
    notifier: Notifier,
    notification_ttl: Duration,
    importance: ImportancePolicy,
    in_flight: AtomicUsize,
}

impl<R: NoteRemote> SyncController<R> {
    /// Creates a controller with an empty store and a fresh notifier.
    pub fn new(remote: R, config: &ClientConfig) -> Self {
        Self::with_notifier(remote, config, Notifier::new())
    }

    /// Creates a controller that reports into an existing notifier.
    pub fn with_notifier(remote: R, config: &ClientConfig, notifier: Notifier) -> Self {
        let (store, _) = watch::channel(NoteStore::default());
        Self {
            remote,
            store,
            notifier,
            notification_ttl: config.notification_ttl,
            importance: config.importance,
            in_flight: AtomicUsize::new(0),
        }
    }

    /// Current store snapshot.
    pub fn snapshot(&self) -> NoteStore {
        self.store.borrow().clone()
    }

    /// Receiver that observes every published snapshot.
    pub fn subscribe(&self) -> watch::Receiver<NoteStore> {
        self.store.subscribe()
    }

    pub fn notifier(&self) -> &Notifier {
        &self.notifier
    }

    pub fn remote(&self) -> &R {
        &self.remote
    }

    /// Number of intents currently waiting on the service.
    pub fn in_flight(&self) -> usize {
        self.in_flight.load(Ordering::SeqCst)
    }

    /// Replaces the store with the service's full note list.
    ///
    /// # Errors
    /// - `SyncError::Load` when the fetch fails. No retry is attempted.
    pub async fn load(&self) -> Result<usize, SyncError> {
        let ticket = IntentTicket::begin(IntentKind::Load, &self.in_flight);
        match self.remote.fetch_all().await {
            Ok(notes) => {
                let store = NoteStore::from_notes(notes);
                let count = store.len();
                self.store.send_replace(store);
                info!(
                    "event=notes_loaded module=sync intent_id={} count={count}",
                    ticket.id()
                );
                ticket.commit();
                Ok(count)
            }
            Err(err) => {
                error!(
                    "event=notes_load_failed module=sync intent_id={} kind={} status={:?} error={err}",
                    ticket.id(),
                    err.kind(),
                    err.status()
                );
                ticket.fail();
                Err(SyncError::Load(err))
            }
        }
    }

    /// Creates a note from raw user input.
    ///
    /// Blank input is rejected locally with a notification and no remote
    /// call. On success the service-returned note is appended.
    pub async fn create(&self, content: &str) -> IntentOutcome {
        let draft = match NewNote::try_new(content, self.importance.pick()) {
            Ok(draft) => draft,
            Err(err) => {
                info!("event=intent_rejected module=sync intent=create reason=empty_content");
                self.notify(err.to_string());
                return IntentOutcome::Rejected;
            }
        };

        let ticket = IntentTicket::begin(IntentKind::Create, &self.in_flight);
        match self.remote.create(&draft).await {
            Ok(note) => {
                info!(
                    "event=note_created module=sync intent_id={} note_id={} content_len={} important={}",
                    ticket.id(),
                    note.id,
                    note.content.chars().count(),
                    note.important
                );
                self.store.send_modify(|store| *store = store.append(note));
                ticket.commit();
                IntentOutcome::Committed
            }
            Err(err) => {
                warn!(
                    "event=note_create_failed module=sync intent_id={} kind={} status={:?} error={err}",
                    ticket.id(),
                    err.kind(),
                    err.status()
                );
                self.notify(format!(
                    "Failed to create '{}' due to server error.",
                    draft.content
                ));
                ticket.fail();
                IntentOutcome::Failed
            }
        }
    }

    /// Flips the importance flag of one note.
    ///
    /// # Errors
    /// - `SyncError::NotFound` when `id` is not in the store.
    pub async fn toggle_importance(&self, id: &NoteId) -> Result<IntentOutcome, SyncError> {
        let current = self.require(id)?;
        let changed = current.with_importance_flipped();

        let ticket = IntentTicket::begin(IntentKind::Toggle, &self.in_flight);
        match self.remote.update(id, &changed).await {
            Ok(returned) => {
                info!(
                    "event=note_updated module=sync intent_id={} note_id={id} important={}",
                    ticket.id(),
                    returned.important
                );
                self.store
                    .send_modify(|store| *store = store.replace(id, returned));
                ticket.commit();
                Ok(IntentOutcome::Committed)
            }
            Err(err) => {
                warn!(
                    "event=note_update_failed module=sync intent_id={} note_id={id} kind={} status={:?} error={err} action=drop_local",
                    ticket.id(),
                    err.kind(),
                    err.status()
                );
                self.notify(format!(
                    "Note '{}' was already removed from server",
                    current.content
                ));
                self.store.send_modify(|store| *store = store.remove(id));
                ticket.fail();
                Ok(IntentOutcome::Failed)
            }
        }
    }

    /// Deletes one note after the user confirmed.
    ///
    /// # Errors
    /// - `SyncError::NotFound` when `id` is not in the store.
    pub async fn delete<C>(&self, id: &NoteId, confirm: &C) -> Result<IntentOutcome, SyncError>
    where
        C: Confirm + ?Sized,
    {
        let current = self.require(id)?;
        let prompt = format!("Delete {}?", current.content);
        if !confirm.confirm(&prompt).await {
            info!("event=intent_declined module=sync intent=delete note_id={id}");
            return Ok(IntentOutcome::Declined);
        }

        let ticket = IntentTicket::begin(IntentKind::Delete, &self.in_flight);
        match self.remote.delete(id).await {
            Ok(()) => {
                info!(
                    "event=note_deleted module=sync intent_id={} note_id={id}",
                    ticket.id()
                );
                self.store.send_modify(|store| *store = store.remove(id));
                ticket.commit();
                Ok(IntentOutcome::Committed)
            }
            Err(err) => {
                warn!(
                    "event=note_delete_failed module=sync intent_id={} note_id={id} kind={} status={:?} error={err}",
                    ticket.id(),
                    err.kind(),
                    err.status()
                );
                self.notify(format!(
                    "Failed to delete '{}' due to server error.",
                    current.content
                ));
                ticket.fail();
                Ok(IntentOutcome::Failed)
            }
        }
    }

    /// Looks up `id` in the latest snapshot.
    ///
    /// A miss is a view/controller desynchronization. It is reported loudly
    /// (an `error` log line plus `SyncError::NotFound` to the caller) but never
    /// panics, in any build: a front-end that keeps reading input while
    /// requests are outstanding can resolve a row just before a concurrent
    /// toggle failure drops that note.
    fn require(&self, id: &NoteId) -> Result<Note, SyncError> {
        match self.store.borrow().find(id) {
            Some(note) => Ok(note.clone()),
            None => {
                error!("event=note_lookup_failed module=sync note_id={id} status=error");
                Err(SyncError::NotFound(id.clone()))
            }
        }
    }

    fn notify(&self, message: String) {
        self.notifier.show(message, self.notification_ttl);
    }
}
