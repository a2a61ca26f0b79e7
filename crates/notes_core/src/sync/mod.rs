//! Synchronization between the local note store and the remote service.
//!
//! # Responsibility
//! - Turn user intents into remote calls and reconcile the store with the
//!   service's answer.
//! - Convert every remote failure into a user-facing notification.
//!
//! # Invariants
//! - The store only changes after the service confirmed the change, except
//!   for the toggle-failure path which drops the note locally.
//! - No intent is retried automatically.
//! - Intents on the same id are not serialized; the last response to arrive
//!   wins.

pub mod controller;
pub mod intent;

pub use controller::{Confirm, SyncController, SyncError};
pub use intent::{IntentKind, IntentOutcome, IntentPhase};
