use serde::{Deserialize, Serialize};

use super::{ArbitraryJson, CloseReason, JsonSchema};
use crate::Result;
use crate::error::ServerError;

/// Full agent session configuration.
///
/// Sent whole as the very first frame after the handshake, and re-sent whole
/// for [`AgentCommand::UpdateSettings`]. There is no partial update on the
/// wire.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct AgentSettings {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub audio: Option<AudioSetup>,
    pub agent: AgentConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct AudioSetup {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub input: Option<AudioFormat>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<AudioFormat>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct AudioFormat {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub encoding: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sample_rate: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub container: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bitrate: Option<u32>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct AgentConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub listen: Option<ListenSetup>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub think: Option<ThinkSetup>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub speak: Option<SpeakSetup>,
    /// Spoken by the agent as soon as the settings apply.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub greeting: Option<String>,
}

/// Transcription half of the agent. The provider block is open-ended JSON;
/// its accepted keys vary by provider and change faster than this crate.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ListenSetup {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider: Option<ArbitraryJson>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
}

/// Reasoning half of the agent.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ThinkSetup {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider: Option<ArbitraryJson>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prompt: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub functions: Option<Vec<FunctionDef>>,
}

/// Synthesis half of the agent.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct SpeakSetup {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider: Option<ArbitraryJson>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
}

/// A function the agent's reasoning model may call.
///
/// Without an `endpoint` the call comes back over the socket as a
/// [`FunctionCallRequest`] for this client to answer; with one, the server
/// calls the endpoint itself.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FunctionDef {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub parameters: JsonSchema,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<FunctionEndpoint>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FunctionEndpoint {
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub headers: Option<ArbitraryJson>,
}

impl FunctionDef {
    #[must_use]
    pub fn new(name: impl Into<String>, parameters: JsonSchema) -> Self {
        Self {
            name: name.into(),
            description: None,
            parameters,
            endpoint: None,
        }
    }

    /// Define a client-side function whose parameters schema is derived from
    /// `TArgs`.
    ///
    /// # Errors
    /// Returns an error if the derived schema fails to serialize.
    pub fn for_args<TArgs: schemars::JsonSchema>(
        name: impl Into<String>,
        description: impl Into<String>,
    ) -> Result<Self> {
        let schema = schemars::schema_for!(TArgs);
        Ok(Self {
            name: name.into(),
            description: Some(description.into()),
            parameters: serde_json::to_value(schema)?,
            endpoint: None,
        })
    }
}

/// A function call the server wants this client to execute.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FunctionCallRequest {
    pub function_name: String,
    pub function_call_id: String,
    /// JSON-encoded arguments. Parsing them is the caller's concern.
    #[serde(default)]
    pub input: String,
}

/// Everything an agent session delivers to its sink, in arrival order.
/// Agent speech arrives as binary frames interleaved with the JSON events.
#[derive(Debug, Clone)]
pub enum AgentEvent {
    /// The socket is connected and the settings frame has been sent.
    Open,
    /// One chunk of agent speech, exactly as received.
    Audio(Vec<u8>),
    Welcome { request_id: String },
    /// The settings (initial or updated) took effect.
    SettingsApplied,
    /// A transcript line from either side of the conversation.
    ConversationText { role: String, content: String },
    UserStartedSpeaking,
    AgentThinking { content: Option<String> },
    AgentStartedSpeaking,
    AgentAudioDone,
    FunctionCallRequest(FunctionCallRequest),
    /// The server declined an [`AgentCommand::InjectMessage`].
    InjectionRefused { message: Option<String> },
    /// Server-reported error. The session stays open.
    Error(ServerError),
    /// A text frame that was not valid JSON, with the offending payload.
    DecodeError { message: String, raw: String },
    /// A frame whose `"type"` this build does not recognize.
    Unhandled(ArbitraryJson),
    /// Terminal: the connection is gone. Exactly one per session.
    Closed(CloseReason),
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type")]
enum AgentFrame {
    Welcome {
        #[serde(default)]
        request_id: String,
    },
    SettingsApplied,
    ConversationText {
        role: String,
        content: String,
    },
    UserStartedSpeaking,
    AgentThinking {
        content: Option<String>,
    },
    AgentStartedSpeaking,
    AgentAudioDone,
    FunctionCallRequest(FunctionCallRequest),
    InjectionRefused {
        message: Option<String>,
    },
    Error(ServerError),
}

impl From<AgentFrame> for AgentEvent {
    fn from(frame: AgentFrame) -> Self {
        match frame {
            AgentFrame::Welcome { request_id } => Self::Welcome { request_id },
            AgentFrame::SettingsApplied => Self::SettingsApplied,
            AgentFrame::ConversationText { role, content } => {
                Self::ConversationText { role, content }
            }
            AgentFrame::UserStartedSpeaking => Self::UserStartedSpeaking,
            AgentFrame::AgentThinking { content } => Self::AgentThinking { content },
            AgentFrame::AgentStartedSpeaking => Self::AgentStartedSpeaking,
            AgentFrame::AgentAudioDone => Self::AgentAudioDone,
            AgentFrame::FunctionCallRequest(request) => Self::FunctionCallRequest(request),
            AgentFrame::InjectionRefused { message } => Self::InjectionRefused { message },
            AgentFrame::Error(error) => Self::Error(error),
        }
    }
}

impl AgentEvent {
    /// Decode one inbound text frame. Never fails: malformed JSON becomes
    /// [`AgentEvent::DecodeError`], an unrecognized or undecodable `"type"`
    /// becomes [`AgentEvent::Unhandled`].
    #[must_use]
    pub fn from_frame(text: &str) -> Self {
        match serde_json::from_str::<ArbitraryJson>(text) {
            Ok(value) => match AgentFrame::deserialize(value.clone()) {
                Ok(frame) => frame.into(),
                Err(err) => {
                    tracing::debug!("Unrecognized agent frame: {err}");
                    Self::Unhandled(value)
                }
            },
            Err(err) => Self::DecodeError {
                message: err.to_string(),
                raw: text.to_string(),
            },
        }
    }
}

/// Message injected into the conversation out of turn.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct InjectedMessage {
    pub role: String,
    pub content: String,
}

/// Commands an agent session accepts.
#[derive(Debug, Clone)]
pub enum AgentCommand {
    /// Caller audio, forwarded as one binary frame, byte for byte.
    Audio(Vec<u8>),
    /// End-user text input, handled as if it had been spoken.
    Text(String),
    /// Answer a [`FunctionCallRequest`]; `output` is a JSON-encoded result.
    FunctionCallResponse {
        function_call_id: String,
        output: String,
    },
    /// Place a message into the conversation out of turn.
    InjectMessage(InjectedMessage),
    /// Replace the session configuration with a full settings payload.
    UpdateSettings(Box<AgentSettings>),
    /// Manual keepalive; the session also sends one automatically every
    /// 30 seconds.
    KeepAlive,
    /// Close the conversation server-side.
    Close,
}

/// Wire shape of the JSON control frames. The initial `Settings` frame and
/// `SettingsUpdate` carry the same payload under different tags.
#[derive(Debug, Serialize)]
#[serde(tag = "type")]
pub(crate) enum AgentControl {
    Settings(Box<AgentSettings>),
    SettingsUpdate(Box<AgentSettings>),
    UserText {
        content: String,
    },
    FunctionCallResponse {
        function_call_id: String,
        output: String,
    },
    InjectMessage {
        message: InjectedMessage,
    },
    KeepAlive,
    Close,
}
