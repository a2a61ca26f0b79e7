//! Single-slot, auto-expiring user notifications.
//!
//! # Responsibility
//! - Hold at most one user-facing message at a time.
//! - Clear that message after its time-to-live unless a newer one replaced it.
//!
//! # Invariants
//! - `show` aborts the previous expiry task before scheduling a new one.
//! - An expiry task only clears the message it was scheduled for
//!   (generation check), so a stale timer can never wipe a newer message.
//! - Exactly one `Cleared` event fires per visible message that goes away.

use log::{debug, warn};
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;

/// Time-to-live used for every controller-driven notification.
pub const DEFAULT_NOTIFICATION_TTL: Duration = Duration::from_millis(5000);

const EVENT_CHANNEL_CAPACITY: usize = 32;

/// Change observed on the notification slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotificationEvent {
    Shown(String),
    Cleared,
}

#[derive(Default)]
struct Slot {
    message: Option<String>,
    generation: u64,
    expiry: Option<JoinHandle<()>>,
}

/// Notification channel shared between the controller and the view.
///
/// Clones share the same slot.
#[derive(Clone)]
pub struct Notifier {
    slot: Arc<Mutex<Slot>>,
    events: broadcast::Sender<NotificationEvent>,
}

impl Default for Notifier {
    fn default() -> Self {
        Self::new()
    }
}

impl Notifier {
    pub fn new() -> Self {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            slot: Arc::new(Mutex::new(Slot::default())),
            events,
        }
    }

    /// Shows `message`, replacing any current one, and clears it after `ttl`.
    ///
    /// The deadline is fixed at call time, not when the expiry task first runs.
    /// Outside a tokio runtime no expiry task can be scheduled; the message
    /// then stays until `clear` or the next `show`.
    pub fn show(&self, message: impl Into<String>, ttl: Duration) {
        let message = message.into();
        let mut slot = self.slot.lock();
        if let Some(previous) = slot.expiry.take() {
            previous.abort();
        }
        slot.generation = slot.generation.wrapping_add(1);
        slot.message = Some(message.clone());

        let generation = slot.generation;
        slot.expiry = match tokio::runtime::Handle::try_current() {
            Ok(runtime) => {
                let deadline = tokio::time::Instant::now() + ttl;
                let shared = Arc::clone(&self.slot);
                let events = self.events.clone();
                Some(runtime.spawn(async move {
                    tokio::time::sleep_until(deadline).await;
                    let mut slot = shared.lock();
                    if slot.generation != generation {
                        return;
                    }
                    slot.expiry = None;
                    if slot.message.take().is_some() {
                        debug!("event=notification_expired module=notify generation={generation}");
                        let _ = events.send(NotificationEvent::Cleared);
                    }
                }))
            }
            Err(err) => {
                warn!(
                    "event=notification_timer_unavailable module=notify generation={generation} error={err}"
                );
                None
            }
        };
        drop(slot);

        debug!(
            "event=notification_shown module=notify generation={generation} ttl_ms={}",
            ttl.as_millis()
        );
        let _ = self.events.send(NotificationEvent::Shown(message));
    }

    /// Cancels the pending expiry and removes the message immediately.
    pub fn clear(&self) {
        let mut slot = self.slot.lock();
        if let Some(expiry) = slot.expiry.take() {
            expiry.abort();
        }
        slot.generation = slot.generation.wrapping_add(1);
        let had_message = slot.message.take().is_some();
        drop(slot);

        if had_message {
            let _ = self.events.send(NotificationEvent::Cleared);
        }
    }

    /// Returns the currently visible message, if any.
    pub fn current(&self) -> Option<String> {
        self.slot.lock().message.clone()
    }

    pub fn subscribe(&self) -> broadcast::Receiver<NotificationEvent> {
        self.events.subscribe()
    }
}
