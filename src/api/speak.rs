use std::sync::Arc;

use tokio::sync::mpsc;

use crate::config::DeepgramConfig;
use crate::live::speak::SpeakSession;
use crate::protocol::TextSource;
use crate::protocol::speak::{SpeakEvent, SpeakOptions};
use crate::transport::rest::RestClient;
use crate::transport::{query, ws};
use crate::{Error, Result};

const SPEAK_PATH: &str = "speak";

/// Text-to-speech: one-shot synthesis over REST, incremental synthesis over
/// WebSocket.
#[derive(Clone, Debug)]
pub struct Speak {
    config: Arc<DeepgramConfig>,
    rest: RestClient,
}

impl Speak {
    pub(crate) const fn new(config: Arc<DeepgramConfig>, rest: RestClient) -> Self {
        Self { config, rest }
    }

    /// Synthesize `text` in one request and return the encoded audio bytes.
    ///
    /// # Errors
    /// Returns an error if the text is empty or the request fails.
    pub async fn synthesize(
        &self,
        text: impl Into<String>,
        options: &SpeakOptions,
    ) -> Result<Vec<u8>> {
        let text = text.into();
        if text.is_empty() {
            return Err(Error::Validation("text must not be empty".into()));
        }
        let query = query::pairs(options)?;
        let source = TextSource { text };
        self.rest.post_for_bytes(SPEAK_PATH, &query, &source).await
    }

    /// Open a live synthesis session. Audio comes back on `events` as raw
    /// binary chunks interleaved with lifecycle events, ending with a single
    /// `Closed`.
    ///
    /// # Errors
    /// Returns an error if the handshake fails.
    pub async fn live(
        &self,
        options: &SpeakOptions,
        events: mpsc::Sender<SpeakEvent>,
    ) -> Result<SpeakSession> {
        let query = query::pairs(options)?;
        let stream = ws::connect(&self.config, SPEAK_PATH, &query).await?;
        Ok(SpeakSession::start(stream, events).await)
    }
}
