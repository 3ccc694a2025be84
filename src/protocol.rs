pub mod agent;
pub mod listen;
pub mod manage;
pub mod read;
pub mod speak;

use serde::{Deserialize, Serialize};

/// Free-form JSON payloads where the protocol is open-ended.
pub type ArbitraryJson = serde_json::Value;

/// JSON-schema documents carried in agent function definitions.
pub type JsonSchema = serde_json::Value;

/// Why a live session stopped. Delivered exactly once, inside the terminal
/// `Closed` event of each session's event union.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CloseReason {
    /// `close()` was called locally.
    Requested,
    /// The server completed a close handshake.
    Server { code: u16, reason: String },
    /// The stream ended without a close frame.
    Dropped,
    /// The transport failed mid-read.
    Error(String),
}

/// JSON body pointing the server at hosted media or text.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UrlSource {
    pub url: String,
}

/// JSON body carrying inline text to synthesize or analyze.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TextSource {
    pub text: String,
}
