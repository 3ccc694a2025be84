use tokio::sync::mpsc;
use tokio_tungstenite::tungstenite::protocol::Message;

use super::{Handle, LiveCodec, SocketTransport, spawn};
use crate::protocol::CloseReason;
use crate::protocol::speak::{SpeakCommand, SpeakControl, SpeakEvent};
use crate::{Error, Result};

pub(crate) struct SpeakCodec;

impl LiveCodec for SpeakCodec {
    type Command = SpeakCommand;
    type Event = SpeakEvent;

    fn encode(command: SpeakCommand) -> Result<Message> {
        let control = match command {
            SpeakCommand::Text(text) => {
                if text.is_empty() {
                    return Err(Error::Validation("text must not be empty".into()));
                }
                SpeakControl::Speak { text }
            }
            SpeakCommand::Flush => SpeakControl::Flush,
            SpeakCommand::Clear => SpeakControl::Clear,
            SpeakCommand::Close => SpeakControl::Close,
        };
        Ok(Message::Text(serde_json::to_string(&control)?.into()))
    }

    fn close_command() -> SpeakCommand {
        SpeakCommand::Close
    }

    fn decode_text(text: &str) -> SpeakEvent {
        SpeakEvent::from_frame(text)
    }

    fn decode_binary(bytes: Vec<u8>) -> Option<SpeakEvent> {
        Some(SpeakEvent::Audio(bytes))
    }

    fn closed_event(reason: CloseReason) -> SpeakEvent {
        SpeakEvent::Closed(reason)
    }
}

/// One live synthesis stream. Text goes in, raw audio frames come back on
/// the event sink interleaved with lifecycle events.
#[derive(Clone)]
pub struct SpeakSession {
    handle: Handle<SpeakCommand>,
}

impl SpeakSession {
    pub(crate) async fn start<T>(transport: T, events: mpsc::Sender<SpeakEvent>) -> Self
    where
        T: SocketTransport + 'static,
    {
        let _ = events.send(SpeakEvent::Open).await;
        Self {
            handle: spawn::<SpeakCodec, T>(transport, events),
        }
    }

    /// Queue text for synthesis. Empty input is rejected before it reaches
    /// the wire.
    ///
    /// # Errors
    /// Returns an error if the text is empty, the session is closed, or the
    /// write fails.
    pub async fn send_text(&self, text: impl Into<String>) -> Result<()> {
        self.handle.send(SpeakCommand::Text(text.into())).await
    }

    /// Send any outbound command.
    ///
    /// # Errors
    /// Returns an error if the session is closed or the write fails.
    pub async fn send(&self, command: SpeakCommand) -> Result<()> {
        self.handle.send(command).await
    }

    /// Force synthesis of everything queued so far. The server answers with
    /// a `Flushed` event once the audio is out.
    ///
    /// # Errors
    /// Returns an error if the session is closed or the write fails.
    pub async fn flush(&self) -> Result<()> {
        self.handle.send(SpeakCommand::Flush).await
    }

    /// Drop queued text and in-flight audio, for barge-in.
    ///
    /// # Errors
    /// Returns an error if the session is closed or the write fails.
    pub async fn clear(&self) -> Result<()> {
        self.handle.send(SpeakCommand::Clear).await
    }

    /// Close the stream. Safe to call more than once.
    ///
    /// # Errors
    /// Currently infallible; the signature leaves room for close-time
    /// transport errors.
    pub async fn close(&self) -> Result<()> {
        self.handle.close().await
    }

    #[must_use]
    pub fn is_open(&self) -> bool {
        self.handle.is_open()
    }
}
