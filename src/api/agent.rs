use std::sync::Arc;

use tokio::sync::mpsc;

use crate::Result;
use crate::config::DeepgramConfig;
use crate::live::agent::AgentSession;
use crate::protocol::agent::{AgentEvent, AgentSettings};
use crate::transport::ws;

const AGENT_PATH: &str = "agent";

/// Voice agent: a full speech-in, speech-out conversation over one
/// WebSocket.
#[derive(Clone, Debug)]
pub struct Agent {
    config: Arc<DeepgramConfig>,
}

impl Agent {
    pub(crate) const fn new(config: Arc<DeepgramConfig>) -> Self {
        Self { config }
    }

    /// Start a conversation. The agent takes no query options; `settings`
    /// goes out whole as the first frame, before any caller command. Events
    /// land on `events` in arrival order, ending with a single `Closed`.
    ///
    /// # Errors
    /// Returns an error if the handshake fails or the settings frame cannot
    /// be written.
    pub async fn converse(
        &self,
        settings: AgentSettings,
        events: mpsc::Sender<AgentEvent>,
    ) -> Result<AgentSession> {
        let stream = ws::connect(&self.config, AGENT_PATH, &[]).await?;
        AgentSession::start(stream, settings, events).await
    }
}
