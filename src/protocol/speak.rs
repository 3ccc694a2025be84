use serde::{Deserialize, Serialize};

use super::{ArbitraryJson, CloseReason};
use crate::error::ServerError;

/// Query options shared by live and single-shot synthesis.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SpeakOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub encoding: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub container: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sample_rate: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bit_rate: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SpeakMetadata {
    #[serde(default)]
    pub request_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model_version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model_uuid: Option<String>,
}

/// Everything a live synthesis session delivers to its sink, in arrival
/// order. Synthesized audio arrives as binary frames interleaved with the
/// JSON control traffic.
#[derive(Debug, Clone)]
pub enum SpeakEvent {
    /// The socket is connected and the session is live.
    Open,
    /// One chunk of synthesized audio, exactly as received.
    Audio(Vec<u8>),
    Metadata(SpeakMetadata),
    /// All text up to the flush has been synthesized and sent.
    Flushed { sequence_id: u64 },
    /// Buffered text was discarded.
    Cleared { sequence_id: u64 },
    /// Non-fatal server warning.
    Warning { description: String, code: Option<String> },
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
enum SpeakFrame {
    Metadata(SpeakMetadata),
    Flushed {
        #[serde(default)]
        sequence_id: u64,
    },
    Cleared {
        #[serde(default)]
        sequence_id: u64,
    },
    Warning {
        #[serde(default)]
        description: String,
        code: Option<String>,
    },
    Error(ServerError),
}

impl From<SpeakFrame> for SpeakEvent {
    fn from(frame: SpeakFrame) -> Self {
        match frame {
            SpeakFrame::Metadata(metadata) => Self::Metadata(metadata),
            SpeakFrame::Flushed { sequence_id } => Self::Flushed { sequence_id },
            SpeakFrame::Cleared { sequence_id } => Self::Cleared { sequence_id },
            SpeakFrame::Warning { description, code } => Self::Warning { description, code },
            SpeakFrame::Error(error) => Self::Error(error),
        }
    }
}

impl SpeakEvent {
    /// Decode one inbound text frame. Never fails: malformed JSON becomes
    /// [`SpeakEvent::DecodeError`], an unrecognized or undecodable `"type"`
    /// becomes [`SpeakEvent::Unhandled`].
    #[must_use]
    pub fn from_frame(text: &str) -> Self {
        match serde_json::from_str::<ArbitraryJson>(text) {
            Ok(value) => match SpeakFrame::deserialize(value.clone()) {
                Ok(frame) => frame.into(),
                Err(err) => {
                    tracing::debug!("Unrecognized speak frame: {err}");
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

/// Commands a live synthesis session accepts.
#[derive(Debug, Clone)]
pub enum SpeakCommand {
    /// Queue text for synthesis. Empty text is a validation error.
    Text(String),
    /// Force synthesis of everything queued so far.
    Flush,
    /// Discard everything queued but not yet synthesized.
    Clear,
    /// Close the stream server-side.
    Close,
}

/// Wire shape of the JSON control frames.
#[derive(Debug, Serialize)]
#[serde(tag = "type")]
pub(crate) enum SpeakControl {
    Speak { text: String },
    Flush,
    Clear,
    Close,
}
