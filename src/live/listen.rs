use tokio::sync::mpsc;
use tokio_tungstenite::tungstenite::protocol::Message;

use super::{Handle, LiveCodec, SocketTransport, spawn};
use crate::Result;
use crate::protocol::CloseReason;
use crate::protocol::listen::{ListenCommand, ListenControl, ListenEvent};

pub(crate) struct ListenCodec;

impl LiveCodec for ListenCodec {
    type Command = ListenCommand;
    type Event = ListenEvent;

    fn encode(command: ListenCommand) -> Result<Message> {
        match command {
            ListenCommand::Audio(audio) => Ok(Message::Binary(audio.into())),
            ListenCommand::KeepAlive => control_frame(&ListenControl::KeepAlive),
            ListenCommand::CloseStream => control_frame(&ListenControl::CloseStream),
        }
    }

    fn close_command() -> ListenCommand {
        ListenCommand::CloseStream
    }

    fn decode_text(text: &str) -> ListenEvent {
        ListenEvent::from_frame(text)
    }

    // The transcription endpoint never sends binary downstream.
    fn decode_binary(_bytes: Vec<u8>) -> Option<ListenEvent> {
        None
    }

    fn closed_event(reason: CloseReason) -> ListenEvent {
        ListenEvent::Closed(reason)
    }
}

fn control_frame(control: &ListenControl) -> Result<Message> {
    Ok(Message::Text(serde_json::to_string(control)?.into()))
}

/// One live transcription stream.
///
/// Cheap to clone; clones drive the same connection. Events arrive on the
/// sink passed to [`crate::api::Listen::live`].
#[derive(Clone)]
pub struct ListenSession {
    handle: Handle<ListenCommand>,
}

impl ListenSession {
    pub(crate) async fn start<T>(transport: T, events: mpsc::Sender<ListenEvent>) -> Self
    where
        T: SocketTransport + 'static,
    {
        let _ = events.send(ListenEvent::Open).await;
        Self {
            handle: spawn::<ListenCodec, T>(transport, events),
        }
    }

    /// Send one chunk of audio as a single binary frame, byte for byte.
    ///
    /// # Errors
    /// Returns an error if the session is closed or the write fails.
    pub async fn send_audio(&self, audio: impl Into<Vec<u8>>) -> Result<()> {
        self.handle.send(ListenCommand::Audio(audio.into())).await
    }

    /// Send any outbound command.
    ///
    /// # Errors
    /// Returns an error if the session is closed or the write fails.
    pub async fn send(&self, command: ListenCommand) -> Result<()> {
        self.handle.send(command).await
    }

    /// Reset the server's idle timeout by hand. The session already does
    /// this on its own every 30 seconds.
    ///
    /// # Errors
    /// Returns an error if the session is closed or the write fails.
    pub async fn keep_alive(&self) -> Result<()> {
        self.handle.send(ListenCommand::KeepAlive).await
    }

    /// Finish the stream and close the connection. Safe to call more than
    /// once.
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;
    use crate::live::KEEPALIVE_INTERVAL;
    use crate::live::testing::MockTransport;
    use serde_json::json;
    use std::time::Duration;

    fn text_frame(value: &serde_json::Value) -> Result<Option<Message>> {
        Ok(Some(Message::Text(value.to_string().into())))
    }

    #[tokio::test]
    async fn audio_goes_out_as_one_binary_frame() {
        let (transport, _in_tx, mut out_rx) = MockTransport::pair(8);
        let (event_tx, _event_rx) = mpsc::channel(8);
        let session = ListenSession::start(transport, event_tx).await;

        session.send_audio(vec![1u8, 2, 3]).await.unwrap();

        let frame = out_rx.recv().await.unwrap();
        match frame {
            Message::Binary(payload) => assert_eq!(payload.as_ref(), &[1u8, 2, 3]),
            other => panic!("unexpected frame: {other:?}"),
        }
    }

    #[tokio::test]
    async fn malformed_frame_becomes_event_and_session_survives() {
        let (transport, in_tx, _out_rx) = MockTransport::pair(8);
        let (event_tx, mut event_rx) = mpsc::channel(8);
        let session = ListenSession::start(transport, event_tx).await;

        let speech_started = json!({"type": "SpeechStarted", "channel": [0], "timestamp": 0.5});
        in_tx.send(text_frame(&speech_started)).await.unwrap();
        in_tx
            .send(Ok(Some(Message::Text("{not json".into()))))
            .await
            .unwrap();
        in_tx.send(text_frame(&speech_started)).await.unwrap();

        assert!(matches!(event_rx.recv().await, Some(ListenEvent::Open)));
        assert!(matches!(
            event_rx.recv().await,
            Some(ListenEvent::SpeechStarted { .. })
        ));
        match event_rx.recv().await {
            Some(ListenEvent::DecodeError { raw, .. }) => assert_eq!(raw, "{not json"),
            other => panic!("unexpected event: {other:?}"),
        }
        assert!(matches!(
            event_rx.recv().await,
            Some(ListenEvent::SpeechStarted { .. })
        ));
        assert!(session.is_open());
    }

    #[tokio::test]
    async fn server_error_event_does_not_close_the_session() {
        let (transport, in_tx, _out_rx) = MockTransport::pair(8);
        let (event_tx, mut event_rx) = mpsc::channel(8);
        let session = ListenSession::start(transport, event_tx).await;

        in_tx
            .send(text_frame(&json!({"type": "Error", "message": "boom"})))
            .await
            .unwrap();

        assert!(matches!(event_rx.recv().await, Some(ListenEvent::Open)));
        match event_rx.recv().await {
            Some(ListenEvent::Error(error)) => {
                assert_eq!(error.message.as_deref(), Some("boom"));
            }
            other => panic!("unexpected event: {other:?}"),
        }
        assert!(session.is_open());
    }

    #[tokio::test]
    async fn unrecognized_type_surfaces_as_unhandled() {
        let (transport, in_tx, _out_rx) = MockTransport::pair(8);
        let (event_tx, mut event_rx) = mpsc::channel(8);
        let _session = ListenSession::start(transport, event_tx).await;

        in_tx
            .send(text_frame(&json!({"type": "FutureFeature", "x": 1})))
            .await
            .unwrap();

        assert!(matches!(event_rx.recv().await, Some(ListenEvent::Open)));
        match event_rx.recv().await {
            Some(ListenEvent::Unhandled(raw)) => {
                assert_eq!(raw["type"], "FutureFeature");
                assert_eq!(raw["x"], 1);
            }
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[tokio::test]
    async fn close_is_idempotent_and_yields_one_terminal_event() {
        let (transport, _in_tx, mut out_rx) = MockTransport::pair(8);
        let (event_tx, mut event_rx) = mpsc::channel(8);
        let session = ListenSession::start(transport, event_tx).await;

        session.close().await.unwrap();
        session.close().await.unwrap();

        assert!(matches!(event_rx.recv().await, Some(ListenEvent::Open)));
        assert!(matches!(
            event_rx.recv().await,
            Some(ListenEvent::Closed(CloseReason::Requested))
        ));
        assert!(event_rx.recv().await.is_none());
        assert!(!session.is_open());

        let frame = out_rx.recv().await.unwrap();
        match frame {
            Message::Text(text) => assert_eq!(&*text, r#"{"type":"CloseStream"}"#),
            other => panic!("unexpected frame: {other:?}"),
        }
        assert!(matches!(out_rx.recv().await, Some(Message::Close(None))));
    }

    #[tokio::test]
    async fn send_after_close_reports_connection_closed() {
        let (transport, _in_tx, _out_rx) = MockTransport::pair(8);
        let (event_tx, _event_rx) = mpsc::channel(8);
        let session = ListenSession::start(transport, event_tx).await;

        session.close().await.unwrap();

        let err = session.send_audio(vec![1u8, 2, 3]).await.unwrap_err();
        assert!(matches!(err, Error::ConnectionClosed));
    }

    #[tokio::test]
    async fn failed_write_is_the_callers_error_and_not_a_disconnect() {
        let (transport, _in_tx, out_rx) = MockTransport::pair(8);
        let (event_tx, mut event_rx) = mpsc::channel(8);
        let session = ListenSession::start(transport, event_tx).await;

        // Writes fail once the far side of the socket is gone.
        drop(out_rx);
        assert!(session.send_audio(vec![1u8, 2, 3]).await.is_err());

        assert!(session.is_open());
        assert!(matches!(event_rx.recv().await, Some(ListenEvent::Open)));
        assert!(matches!(
            event_rx.try_recv(),
            Err(mpsc::error::TryRecvError::Empty)
        ));
    }

    #[tokio::test]
    async fn close_returns_even_when_the_sink_is_full() {
        let (transport, _in_tx, _out_rx) = MockTransport::pair(8);
        let (event_tx, mut event_rx) = mpsc::channel(1);
        let session = ListenSession::start(transport, event_tx).await;

        // The undrained Open event leaves the sink with no free capacity.
        tokio::time::timeout(Duration::from_secs(5), session.close())
            .await
            .expect("close should not wait for the sink to drain")
            .unwrap();
        assert!(!session.is_open());

        assert!(matches!(event_rx.recv().await, Some(ListenEvent::Open)));
        assert!(matches!(
            event_rx.recv().await,
            Some(ListenEvent::Closed(CloseReason::Requested))
        ));
        assert!(event_rx.recv().await.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn keepalive_fires_on_schedule_and_stops_after_close() {
        let (transport, _in_tx, mut out_rx) = MockTransport::pair(8);
        let (event_tx, mut event_rx) = mpsc::channel(8);
        let started = tokio::time::Instant::now();
        let session = ListenSession::start(transport, event_tx).await;

        let frame = out_rx.recv().await.unwrap();
        match frame {
            Message::Text(text) => assert_eq!(&*text, r#"{"type":"KeepAlive"}"#),
            other => panic!("unexpected frame: {other:?}"),
        }
        assert_eq!(started.elapsed(), KEEPALIVE_INTERVAL);

        session.close().await.unwrap();
        assert!(matches!(event_rx.recv().await, Some(ListenEvent::Open)));
        assert!(matches!(
            event_rx.recv().await,
            Some(ListenEvent::Closed(CloseReason::Requested))
        ));

        // Drain the close frames, then confirm the timer is gone.
        assert!(matches!(out_rx.recv().await, Some(Message::Text(_))));
        assert!(matches!(out_rx.recv().await, Some(Message::Close(None))));
        assert!(out_rx.recv().await.is_none());
    }

    #[tokio::test]
    async fn server_close_frame_reports_code_and_reason() {
        let (transport, in_tx, _out_rx) = MockTransport::pair(8);
        let (event_tx, mut event_rx) = mpsc::channel(8);
        let session = ListenSession::start(transport, event_tx).await;

        use tokio_tungstenite::tungstenite::protocol::frame::coding::CloseCode;
        use tokio_tungstenite::tungstenite::protocol::frame::CloseFrame;
        in_tx
            .send(Ok(Some(Message::Close(Some(CloseFrame {
                code: CloseCode::Away,
                reason: "going away".into(),
            })))))
            .await
            .unwrap();

        assert!(matches!(event_rx.recv().await, Some(ListenEvent::Open)));
        match event_rx.recv().await {
            Some(ListenEvent::Closed(CloseReason::Server { code, reason })) => {
                assert_eq!(code, 1001);
                assert_eq!(reason, "going away");
            }
            other => panic!("unexpected event: {other:?}"),
        }
        assert!(!session.is_open());
    }
}
