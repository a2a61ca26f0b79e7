//! HTTP implementation of the note service contract.
//!
//! # Responsibility
//! - Map `NoteRemote` calls onto conventional REST requests.
//! - Turn non-success statuses and malformed bodies into `RemoteError`.
//!
//! # Invariants
//! - Request URLs are derived from the configured base by appending path
//!   segments, so a base path such as `/api` is preserved.
//! - Error bodies are flattened and capped before they reach logs or UI.

use super::{NoteRemote, RemoteError, RemoteResult};
use crate::config::ClientConfig;
use crate::model::note::{NewNote, Note, NoteId};
use async_trait::async_trait;
use log::debug;
use reqwest::{Client, Response, Url};
use serde::de::DeserializeOwned;

const NOTES_SEGMENT: &str = "notes";
const MAX_ERROR_BODY_CHARS: usize = 200;

/// `reqwest`-backed note service client.
#[derive(Debug, Clone)]
pub struct HttpNoteRemote {
    base_url: Url,
    client: Client,
}

impl HttpNoteRemote {
    /// Builds a client for the service rooted at `config.base_url`.
    ///
    /// # Errors
    /// - `RemoteError::Transport` when the HTTP client cannot be constructed.
    pub fn new(config: &ClientConfig) -> RemoteResult<Self> {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .build()?;
        Ok(Self::with_client(config.base_url.clone(), client))
    }

    /// Builds a client around an existing `reqwest::Client`.
    pub fn with_client(base_url: Url, client: Client) -> Self {
        Self { base_url, client }
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn collection_url(&self) -> RemoteResult<Url> {
        self.url_with_segments(&[NOTES_SEGMENT])
    }

    fn note_url(&self, id: &NoteId) -> RemoteResult<Url> {
        let id = id.to_string();
        self.url_with_segments(&[NOTES_SEGMENT, id.as_str()])
    }

    fn url_with_segments(&self, segments: &[&str]) -> RemoteResult<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| RemoteError::InvalidUrl(format!("`{}` cannot be a base", self.base_url)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }
}

#[async_trait]
impl NoteRemote for HttpNoteRemote {
    async fn fetch_all(&self) -> RemoteResult<Vec<Note>> {
        let url = self.collection_url()?;
        debug!("event=remote_request module=remote method=GET url={url}");
        let response = self.client.get(url).send().await?;
        read_json(response).await
    }

    async fn create(&self, note: &NewNote) -> RemoteResult<Note> {
        let url = self.collection_url()?;
        debug!("event=remote_request module=remote method=POST url={url}");
        let response = self.client.post(url).json(note).send().await?;
        read_json(response).await
    }

    async fn update(&self, id: &NoteId, note: &Note) -> RemoteResult<Note> {
        let url = self.note_url(id)?;
        debug!("event=remote_request module=remote method=PUT url={url}");
        let response = self.client.put(url).json(note).send().await?;
        read_json(response).await
    }

    async fn delete(&self, id: &NoteId) -> RemoteResult<()> {
        let url = self.note_url(id)?;
        debug!("event=remote_request module=remote method=DELETE url={url}");
        let response = self.client.delete(url).send().await?;
        ensure_success(response).await.map(|_| ())
    }
}

async fn ensure_success(response: Response) -> RemoteResult<String> {
    let status = response.status();
    let body = response.text().await?;
    if !status.is_success() {
        return Err(RemoteError::Status {
            status: status.as_u16(),
            body: flatten_body(&body),
        });
    }
    Ok(body)
}

async fn read_json<T: DeserializeOwned>(response: Response) -> RemoteResult<T> {
    let body = ensure_success(response).await?;
    Ok(serde_json::from_str(&body)?)
}

fn flatten_body(body: &str) -> String {
    let flattened = body.split_whitespace().collect::<Vec<_>>().join(" ");
    if flattened.chars().count() <= MAX_ERROR_BODY_CHARS {
        return flattened;
    }
    let mut capped: String = flattened.chars().take(MAX_ERROR_BODY_CHARS).collect();
    capped.push_str("...");
    capped
}
