use std::sync::Arc;

use tokio::sync::mpsc;

use crate::config::DeepgramConfig;
use crate::live::listen::ListenSession;
use crate::protocol::UrlSource;
use crate::protocol::listen::{ListenEvent, ListenOptions, PrerecordedResponse};
use crate::transport::rest::RestClient;
use crate::transport::{query, ws};
use crate::{Error, Result};

const LISTEN_PATH: &str = "listen";
const DEFAULT_AUDIO_CONTENT_TYPE: &str = "application/octet-stream";

/// Speech-to-text: prerecorded transcription over REST, live transcription
/// over WebSocket.
#[derive(Clone, Debug)]
pub struct Listen {
    config: Arc<DeepgramConfig>,
    rest: RestClient,
}

impl Listen {
    pub(crate) const fn new(config: Arc<DeepgramConfig>, rest: RestClient) -> Self {
        Self { config, rest }
    }

    /// Transcribe audio the server fetches from `url`.
    ///
    /// # Errors
    /// Returns an error if the request fails or the response does not decode.
    pub async fn transcribe_url(
        &self,
        url: impl Into<String>,
        options: &ListenOptions,
    ) -> Result<PrerecordedResponse> {
        let query = query::pairs(options)?;
        let source = UrlSource { url: url.into() };
        self.rest.post(LISTEN_PATH, &query, &source).await
    }

    /// Transcribe an audio buffer uploaded as the request body. Pass the
    /// media type when you know it; otherwise the server sniffs the bytes.
    ///
    /// # Errors
    /// Returns an error if the buffer is empty, the request fails, or the
    /// response does not decode.
    pub async fn transcribe_buffer(
        &self,
        audio: impl Into<Vec<u8>>,
        content_type: Option<&str>,
        options: &ListenOptions,
    ) -> Result<PrerecordedResponse> {
        let audio = audio.into();
        if audio.is_empty() {
            return Err(Error::Validation("audio must not be empty".into()));
        }
        let query = query::pairs(options)?;
        let content_type = content_type.unwrap_or(DEFAULT_AUDIO_CONTENT_TYPE);
        self.rest
            .post_raw(LISTEN_PATH, &query, content_type, audio)
            .await
    }

    /// Open a live transcription session. Options travel in the connection
    /// URL's query string; every inbound event lands on `events` in arrival
    /// order, ending with a single `Closed`.
    ///
    /// # Errors
    /// Returns an error if the handshake fails.
    pub async fn live(
        &self,
        options: &ListenOptions,
        events: mpsc::Sender<ListenEvent>,
    ) -> Result<ListenSession> {
        let query = query::pairs(options)?;
        let stream = ws::connect(&self.config, LISTEN_PATH, &query).await?;
        Ok(ListenSession::start(stream, events).await)
    }
}
