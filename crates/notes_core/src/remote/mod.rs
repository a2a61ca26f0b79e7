//! Remote note service contract.
//!
//! # Responsibility
//! - Define the CRUD surface the sync controller depends on.
//! - Classify remote failures without interpreting them.
//!
//! # Invariants
//! - Implementations never touch local state; reconciliation belongs to
//!   `sync::SyncController`.
//! - Every call either returns the service's representation or an error.

pub mod http;

use crate::model::note::{NewNote, Note, NoteId};
use async_trait::async_trait;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub use http::HttpNoteRemote;

pub type RemoteResult<T> = Result<T, RemoteError>;

/// Failure talking to the remote note service.
#[derive(Debug)]
pub enum RemoteError {
    /// Connection, timeout or other transport-level failure.
    Transport(reqwest::Error),
    /// Service answered with a non-success status.
    Status { status: u16, body: String },
    /// Success status but the body was not the expected JSON shape.
    Decode(serde_json::Error),
    /// A request URL could not be derived from the base URL.
    InvalidUrl(String),
}

impl RemoteError {
    /// Short, log-safe classification label.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Transport(_) => "transport",
            Self::Status { .. } => "status",
            Self::Decode(_) => "decode",
            Self::InvalidUrl(_) => "invalid_url",
        }
    }

    /// HTTP status when the service answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl Display for RemoteError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Transport(err) => write!(f, "note service unreachable: {err}"),
            Self::Status { status, body } if body.is_empty() => {
                write!(f, "note service returned HTTP {status}")
            }
            Self::Status { status, body } => {
                write!(f, "note service returned HTTP {status}: {body}")
            }
            Self::Decode(err) => write!(f, "unexpected note service response: {err}"),
            Self::InvalidUrl(details) => write!(f, "invalid note service url: {details}"),
        }
    }
}

impl Error for RemoteError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Transport(err) => Some(err),
            Self::Decode(err) => Some(err),
            Self::Status { .. } | Self::InvalidUrl(_) => None,
        }
    }
}

impl From<reqwest::Error> for RemoteError {
    fn from(value: reqwest::Error) -> Self {
        Self::Transport(value)
    }
}

impl From<serde_json::Error> for RemoteError {
    fn from(value: serde_json::Error) -> Self {
        Self::Decode(value)
    }
}

/// CRUD operations over the `notes` collection resource.
#[async_trait]
pub trait NoteRemote: Send + Sync {
    /// `GET /notes`
    async fn fetch_all(&self) -> RemoteResult<Vec<Note>>;
    /// `POST /notes`; the service assigns the id.
    async fn create(&self, note: &NewNote) -> RemoteResult<Note>;
    /// `PUT /notes/{id}` with the full note body.
    async fn update(&self, id: &NoteId, note: &Note) -> RemoteResult<Note>;
    /// `DELETE /notes/{id}`
    async fn delete(&self, id: &NoteId) -> RemoteResult<()>;
}

#[async_trait]
impl<T: NoteRemote + ?Sized> NoteRemote for std::sync::Arc<T> {
    async fn fetch_all(&self) -> RemoteResult<Vec<Note>> {
        (**self).fetch_all().await
    }

    async fn create(&self, note: &NewNote) -> RemoteResult<Note> {
        (**self).create(note).await
    }

    async fn update(&self, id: &NoteId, note: &Note) -> RemoteResult<Note> {
        (**self).update(id, note).await
    }

    async fn delete(&self, id: &NoteId) -> RemoteResult<()> {
        (**self).delete(id).await
    }
}
