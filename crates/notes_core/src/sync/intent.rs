//! Per-intent lifecycle tracking.

use log::debug;
use std::fmt::{Display, Formatter};
use std::sync::atomic::{AtomicUsize, Ordering};
use uuid::Uuid;

/// User-triggered operation routed through the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntentKind {
    Load,
    Create,
    Toggle,
    Delete,
}

impl IntentKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Load => "load",
            Self::Create => "create",
            Self::Toggle => "toggle",
            Self::Delete => "delete",
        }
    }
}

/// `Idle -> Pending -> {Committed, Failed} -> Idle`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntentPhase {
    Idle,
    Pending,
    Committed,
    Failed,
}

impl Display for IntentPhase {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Idle => "idle",
            Self::Pending => "pending",
            Self::Committed => "committed",
            Self::Failed => "failed",
        })
    }
}

/// Result of one intent as seen by the view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntentOutcome {
    /// Service confirmed; the store reflects the change.
    Committed,
    /// Remote call failed; a notification was shown.
    Failed,
    /// Input was invalid; no remote call was made.
    Rejected,
    /// The user declined the confirmation prompt.
    Declined,
}

/// In-flight marker for one intent.
///
/// Holds the controller's pending counter up until dropped, so an intent
/// future that is dropped mid-call still returns the counter to its prior
/// value.
pub(crate) struct IntentTicket<'a> {
    id: Uuid,
    kind: IntentKind,
    in_flight: &'a AtomicUsize,
    phase: IntentPhase,
}

impl<'a> IntentTicket<'a> {
    pub(crate) fn begin(kind: IntentKind, in_flight: &'a AtomicUsize) -> Self {
        let ticket = Self {
            id: Uuid::new_v4(),
            kind,
            in_flight,
            phase: IntentPhase::Pending,
        };
        in_flight.fetch_add(1, Ordering::SeqCst);
        ticket.log_transition(IntentPhase::Idle, IntentPhase::Pending);
        ticket
    }

    pub(crate) fn id(&self) -> Uuid {
        self.id
    }

    pub(crate) fn commit(mut self) {
        self.settle(IntentPhase::Committed);
    }

    pub(crate) fn fail(mut self) {
        self.settle(IntentPhase::Failed);
    }

    fn settle(&mut self, outcome: IntentPhase) {
        self.log_transition(self.phase, outcome);
        self.phase = outcome;
    }

    fn log_transition(&self, from: IntentPhase, to: IntentPhase) {
        debug!(
            "event=intent_transition module=sync intent={} id={} from={} to={}",
            self.kind.as_str(),
            self.id,
            from,
            to
        );
    }
}

impl Drop for IntentTicket<'_> {
    fn drop(&mut self) {
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        self.log_transition(self.phase, IntentPhase::Idle);
    }
}
