use serde::{Deserialize, Serialize};

use super::{ArbitraryJson, CloseReason};
use crate::error::ServerError;

/// Query options shared by live and prerecorded transcription.
///
/// Unset fields are omitted from the query string; list fields join with
/// commas. Fields the current server build does not recognize are its problem
/// to ignore, not ours to filter.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListenOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub punctuate: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub smart_format: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interim_results: Option<bool>,
    /// Milliseconds of trailing silence before a speech-final result, or 0 to
    /// disable endpointing.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub endpointing: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub utterance_end_ms: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vad_events: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub diarize: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub multichannel: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alternatives: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profanity_filter: Option<bool>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub redact: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub keywords: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub search: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub replace: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tag: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub callback: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub encoding: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub channels: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sample_rate: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filler_words: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub numerals: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detect_language: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub paragraphs: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub utterances: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summarize: Option<String>,
}

/// One transcript chunk (`{"type":"Results"}`).
///
/// `is_final` and `speech_final` pass through exactly as the server sent
/// them; interpreting the interim-result lifecycle is the caller's business.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TranscriptResult {
    #[serde(default)]
    pub channel_index: Vec<u32>,
    #[serde(default)]
    pub duration: f64,
    #[serde(default)]
    pub start: f64,
    #[serde(default)]
    pub is_final: bool,
    #[serde(default)]
    pub speech_final: bool,
    pub channel: TranscriptChannel,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<ArbitraryJson>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from_finalize: Option<bool>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct TranscriptChannel {
    #[serde(default)]
    pub alternatives: Vec<TranscriptAlternative>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detected_language: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TranscriptAlternative {
    pub transcript: String,
    #[serde(default)]
    pub confidence: f64,
    #[serde(default)]
    pub words: Vec<Word>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub paragraphs: Option<ArbitraryJson>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summaries: Option<ArbitraryJson>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Word {
    pub word: String,
    pub start: f64,
    pub end: f64,
    #[serde(default)]
    pub confidence: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub punctuated_word: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub speaker: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
}

/// Session metadata frame, typically the last thing before the server closes.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LiveMetadata {
    #[serde(default)]
    pub request_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sha256: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub channels: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub models: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model_info: Option<ArbitraryJson>,
}

/// Voice activity onset (`{"type":"SpeechStarted"}`), sent when `vad_events`
/// is enabled.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SpeechStarted {
    #[serde(default)]
    pub channel: Vec<u32>,
    #[serde(default)]
    pub timestamp: f64,
}

/// End-of-utterance marker, sent when `utterance_end_ms` is enabled.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UtteranceEnd {
    #[serde(default)]
    pub channel: Vec<u32>,
    #[serde(default)]
    pub last_word_end: f64,
}

/// Everything a live transcription session delivers to its sink, in arrival
/// order.
#[derive(Debug, Clone)]
pub enum ListenEvent {
    /// The socket is connected and the session is live.
    Open,
    Results(Box<TranscriptResult>),
    Metadata(LiveMetadata),
    SpeechStarted(SpeechStarted),
    UtteranceEnd(UtteranceEnd),
    /// Server-reported error. The session stays open.
    Error(ServerError),
    /// A text frame that was not valid JSON, with the offending payload.
    /// The session stays open.
    DecodeError { message: String, raw: String },
    /// A frame whose `"type"` this build does not recognize.
    Unhandled(ArbitraryJson),
    /// Terminal: the connection is gone. Exactly one per session.
    Closed(CloseReason),
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type")]
enum ListenFrame {
    Results(Box<TranscriptResult>),
    Metadata(LiveMetadata),
    SpeechStarted(SpeechStarted),
    UtteranceEnd(UtteranceEnd),
    Error(ServerError),
}

impl From<ListenFrame> for ListenEvent {
    fn from(frame: ListenFrame) -> Self {
        match frame {
            ListenFrame::Results(results) => Self::Results(results),
            ListenFrame::Metadata(metadata) => Self::Metadata(metadata),
            ListenFrame::SpeechStarted(speech) => Self::SpeechStarted(speech),
            ListenFrame::UtteranceEnd(utterance) => Self::UtteranceEnd(utterance),
            ListenFrame::Error(error) => Self::Error(error),
        }
    }
}

impl ListenEvent {
    /// Decode one inbound text frame. Never fails: malformed JSON becomes
    /// [`ListenEvent::DecodeError`], an unrecognized or undecodable `"type"`
    /// becomes [`ListenEvent::Unhandled`].
    #[must_use]
    pub fn from_frame(text: &str) -> Self {
        match serde_json::from_str::<ArbitraryJson>(text) {
            Ok(value) => match ListenFrame::deserialize(value.clone()) {
                Ok(frame) => frame.into(),
                Err(err) => {
                    tracing::debug!("Unrecognized listen frame: {err}");
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

/// Commands a live transcription session accepts.
#[derive(Debug, Clone)]
pub enum ListenCommand {
    /// Raw audio chunk, forwarded as one binary frame, byte for byte.
    Audio(Vec<u8>),
    /// Manual keepalive; the session also sends one automatically every
    /// 30 seconds.
    KeepAlive,
    /// Ask the server to flush final results and close the stream.
    CloseStream,
}

/// Wire shape of the JSON control frames.
#[derive(Debug, Serialize)]
#[serde(tag = "type")]
pub(crate) enum ListenControl {
    KeepAlive,
    CloseStream,
}

/// `POST /v1/listen` response envelope.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PrerecordedResponse {
    pub metadata: PrerecordedMetadata,
    pub results: PrerecordedResults,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PrerecordedMetadata {
    #[serde(default)]
    pub request_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transaction_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sha256: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created: Option<String>,
    #[serde(default)]
    pub duration: f64,
    #[serde(default)]
    pub channels: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub models: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model_info: Option<ArbitraryJson>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary_info: Option<ArbitraryJson>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PrerecordedResults {
    #[serde(default)]
    pub channels: Vec<TranscriptChannel>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub utterances: Option<Vec<Utterance>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<ArbitraryJson>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Utterance {
    pub start: f64,
    pub end: f64,
    #[serde(default)]
    pub confidence: f64,
    #[serde(default)]
    pub channel: u32,
    pub transcript: String,
    #[serde(default)]
    pub words: Vec<Word>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub speaker: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}
