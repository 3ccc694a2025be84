use tokio::sync::mpsc;
use tokio_tungstenite::tungstenite::protocol::Message;

use super::{Handle, LiveCodec, SocketTransport, spawn};
use crate::Result;
use crate::protocol::CloseReason;
use crate::protocol::agent::{
    AgentCommand, AgentControl, AgentEvent, AgentSettings, InjectedMessage,
};

pub(crate) struct AgentCodec;

impl LiveCodec for AgentCodec {
    type Command = AgentCommand;
    type Event = AgentEvent;

    fn encode(command: AgentCommand) -> Result<Message> {
        let control = match command {
            AgentCommand::Audio(audio) => return Ok(Message::Binary(audio.into())),
            AgentCommand::Text(content) => AgentControl::UserText { content },
            AgentCommand::FunctionCallResponse {
                function_call_id,
                output,
            } => AgentControl::FunctionCallResponse {
                function_call_id,
                output,
            },
            AgentCommand::InjectMessage(message) => AgentControl::InjectMessage { message },
            AgentCommand::UpdateSettings(settings) => AgentControl::SettingsUpdate(settings),
            AgentCommand::KeepAlive => AgentControl::KeepAlive,
            AgentCommand::Close => AgentControl::Close,
        };
        Ok(Message::Text(serde_json::to_string(&control)?.into()))
    }

    fn close_command() -> AgentCommand {
        AgentCommand::Close
    }

    fn decode_text(text: &str) -> AgentEvent {
        AgentEvent::from_frame(text)
    }

    fn decode_binary(bytes: Vec<u8>) -> Option<AgentEvent> {
        Some(AgentEvent::Audio(bytes))
    }

    fn closed_event(reason: CloseReason) -> AgentEvent {
        AgentEvent::Closed(reason)
    }
}

/// One voice-agent conversation.
///
/// The protocol requires the full settings payload as the first outbound
/// frame, so [`AgentSession::start`] writes it before the command loop even
/// exists; no caller command can jump ahead of it.
#[derive(Clone)]
pub struct AgentSession {
    handle: Handle<AgentCommand>,
}

impl AgentSession {
    pub(crate) async fn start<T>(
        mut transport: T,
        settings: AgentSettings,
        events: mpsc::Sender<AgentEvent>,
    ) -> Result<Self>
    where
        T: SocketTransport + 'static,
    {
        let control = AgentControl::Settings(Box::new(settings));
        let frame = Message::Text(serde_json::to_string(&control)?.into());
        transport.send(frame).await?;
        let _ = events.send(AgentEvent::Open).await;
        Ok(Self {
            handle: spawn::<AgentCodec, T>(transport, events),
        })
    }

    /// Send one chunk of caller audio as a single binary frame.
    ///
    /// # Errors
    /// Returns an error if the session is closed or the write fails.
    pub async fn send_audio(&self, audio: impl Into<Vec<u8>>) -> Result<()> {
        self.handle.send(AgentCommand::Audio(audio.into())).await
    }

    /// Send end-user text input, handled as if it had been spoken.
    ///
    /// # Errors
    /// Returns an error if the session is closed or the write fails.
    pub async fn send_text(&self, text: impl Into<String>) -> Result<()> {
        self.handle.send(AgentCommand::Text(text.into())).await
    }

    /// Answer a [`crate::protocol::agent::FunctionCallRequest`]. The server
    /// matches the answer to the call by `function_call_id`; `output` is a
    /// JSON-encoded result.
    ///
    /// # Errors
    /// Returns an error if the session is closed or the write fails.
    pub async fn respond(
        &self,
        function_call_id: impl Into<String>,
        output: impl Into<String>,
    ) -> Result<()> {
        self.handle
            .send(AgentCommand::FunctionCallResponse {
                function_call_id: function_call_id.into(),
                output: output.into(),
            })
            .await
    }

    /// Place a message into the conversation out of turn.
    ///
    /// # Errors
    /// Returns an error if the session is closed or the write fails.
    pub async fn inject(&self, role: impl Into<String>, content: impl Into<String>) -> Result<()> {
        self.handle
            .send(AgentCommand::InjectMessage(InjectedMessage {
                role: role.into(),
                content: content.into(),
            }))
            .await
    }

    /// Reconfigure the running conversation. The payload replaces the
    /// settings wholesale; the server confirms with `SettingsApplied`.
    ///
    /// # Errors
    /// Returns an error if the session is closed or the write fails.
    pub async fn update_settings(&self, settings: AgentSettings) -> Result<()> {
        self.handle
            .send(AgentCommand::UpdateSettings(Box::new(settings)))
            .await
    }

    /// Send any outbound command.
    ///
    /// # Errors
    /// Returns an error if the session is closed or the write fails.
    pub async fn send(&self, command: AgentCommand) -> Result<()> {
        self.handle.send(command).await
    }

    /// Reset the server's idle timeout by hand. The session already does
    /// this on its own every 30 seconds.
    ///
    /// # Errors
    /// Returns an error if the session is closed or the write fails.
    pub async fn keep_alive(&self) -> Result<()> {
        self.handle.send(AgentCommand::KeepAlive).await
    }

    /// End the conversation. Safe to call more than once.
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
    use crate::live::testing::MockTransport;
    use crate::protocol::agent::AgentConfig;

    fn greeting_settings() -> AgentSettings {
        AgentSettings {
            audio: None,
            agent: AgentConfig {
                greeting: Some("hi".to_string()),
                ..AgentConfig::default()
            },
        }
    }

    #[tokio::test]
    async fn settings_frame_always_leads_even_under_immediate_send() {
        let (transport, _in_tx, mut out_rx) = MockTransport::pair(8);
        let (event_tx, _event_rx) = mpsc::channel(8);
        let session = AgentSession::start(transport, greeting_settings(), event_tx)
            .await
            .unwrap();

        session.send_audio(vec![1u8, 2, 3]).await.unwrap();

        match out_rx.recv().await.unwrap() {
            Message::Text(text) => {
                assert_eq!(&*text, r#"{"type":"Settings","agent":{"greeting":"hi"}}"#);
            }
            other => panic!("unexpected frame: {other:?}"),
        }
        assert!(matches!(out_rx.recv().await, Some(Message::Binary(_))));
    }

    #[tokio::test]
    async fn function_call_round_trip_uses_the_request_id() {
        let (transport, in_tx, mut out_rx) = MockTransport::pair(8);
        let (event_tx, mut event_rx) = mpsc::channel(8);
        let session = AgentSession::start(transport, greeting_settings(), event_tx)
            .await
            .unwrap();

        let frame = r#"{"type":"FunctionCallRequest","function_name":"get_weather","function_call_id":"fc_1","input":"{\"city\":\"Oslo\"}"}"#;
        in_tx
            .send(Ok(Some(Message::Text(frame.into()))))
            .await
            .unwrap();

        assert!(matches!(event_rx.recv().await, Some(AgentEvent::Open)));
        let request = match event_rx.recv().await {
            Some(AgentEvent::FunctionCallRequest(request)) => request,
            other => panic!("unexpected event: {other:?}"),
        };
        assert_eq!(request.function_name, "get_weather");
        assert_eq!(request.input, r#"{"city":"Oslo"}"#);

        session
            .respond(request.function_call_id, r#"{"celsius":12}"#)
            .await
            .unwrap();

        let _settings = out_rx.recv().await.unwrap();
        match out_rx.recv().await.unwrap() {
            Message::Text(text) => {
                assert_eq!(
                    &*text,
                    r#"{"type":"FunctionCallResponse","function_call_id":"fc_1","output":"{\"celsius\":12}"}"#
                );
            }
            other => panic!("unexpected frame: {other:?}"),
        }
    }

    #[tokio::test]
    async fn update_settings_reuses_the_settings_payload_shape() {
        let (transport, _in_tx, mut out_rx) = MockTransport::pair(8);
        let (event_tx, _event_rx) = mpsc::channel(8);
        let session = AgentSession::start(transport, greeting_settings(), event_tx)
            .await
            .unwrap();

        let mut updated = greeting_settings();
        updated.agent.greeting = Some("welcome back".to_string());
        session.update_settings(updated).await.unwrap();

        let _settings = out_rx.recv().await.unwrap();
        match out_rx.recv().await.unwrap() {
            Message::Text(text) => {
                assert_eq!(
                    &*text,
                    r#"{"type":"SettingsUpdate","agent":{"greeting":"welcome back"}}"#
                );
            }
            other => panic!("unexpected frame: {other:?}"),
        }
    }

    #[tokio::test]
    async fn conversation_text_and_injection_refusal_decode() {
        let (transport, in_tx, _out_rx) = MockTransport::pair(8);
        let (event_tx, mut event_rx) = mpsc::channel(8);
        let _session = AgentSession::start(transport, greeting_settings(), event_tx)
            .await
            .unwrap();

        in_tx
            .send(Ok(Some(Message::Text(
                r#"{"type":"ConversationText","role":"assistant","content":"Hello!"}"#.into(),
            ))))
            .await
            .unwrap();
        in_tx
            .send(Ok(Some(Message::Text(
                r#"{"type":"InjectionRefused","message":"agent is speaking"}"#.into(),
            ))))
            .await
            .unwrap();

        assert!(matches!(event_rx.recv().await, Some(AgentEvent::Open)));
        match event_rx.recv().await {
            Some(AgentEvent::ConversationText { role, content }) => {
                assert_eq!(role, "assistant");
                assert_eq!(content, "Hello!");
            }
            other => panic!("unexpected event: {other:?}"),
        }
        match event_rx.recv().await {
            Some(AgentEvent::InjectionRefused { message }) => {
                assert_eq!(message.as_deref(), Some("agent is speaking"));
            }
            other => panic!("unexpected event: {other:?}"),
        }
    }
}
