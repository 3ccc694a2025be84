#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::multiple_crate_versions)]

pub mod api;
pub mod config;
pub mod error;
pub mod live;
pub mod protocol;
pub mod transport;

pub use api::{Agent, Listen, Manage, Read, Speak};
pub use config::{ConfigBuilder, Credential, DeepgramConfig};
pub use error::{Error, Result, ServerError};
pub use live::agent::AgentSession;
pub use live::listen::ListenSession;
pub use live::speak::SpeakSession;
pub use protocol::CloseReason;
pub use protocol::agent::{
    AgentCommand, AgentConfig, AgentEvent, AgentSettings, AudioFormat, AudioSetup,
    FunctionCallRequest, FunctionDef, FunctionEndpoint, InjectedMessage, ListenSetup, SpeakSetup,
    ThinkSetup,
};
pub use protocol::listen::{
    ListenCommand, ListenEvent, ListenOptions, PrerecordedResponse, TranscriptResult,
};
pub use protocol::read::{AnalyzeResponse, ReadOptions};
pub use protocol::speak::{SpeakCommand, SpeakEvent, SpeakOptions};

use std::sync::Arc;

use transport::rest::RestClient;

/// Entry point to every Deepgram product.
///
/// One client holds the resolved configuration and a shared HTTP connection
/// pool; the product accessors are cheap and can be called per request.
///
/// ```no_run
/// use dg_voice_rs::{Deepgram, ListenOptions};
/// use tokio::sync::mpsc;
///
/// # async fn run() -> dg_voice_rs::Result<()> {
/// let dg = Deepgram::from_env()?;
/// let options = ListenOptions {
///     model: Some("nova-2".into()),
///     punctuate: Some(true),
///     ..Default::default()
/// };
/// let (tx, mut rx) = mpsc::channel(64);
/// let session = dg.listen().live(&options, tx).await?;
/// session.send_audio(vec![0u8; 3200]).await?;
/// while let Some(event) = rx.recv().await {
///     println!("{event:?}");
/// }
/// # Ok(())
/// # }
/// ```
#[must_use]
#[derive(Clone, Debug)]
pub struct Deepgram {
    config: Arc<DeepgramConfig>,
    rest: RestClient,
}

impl Deepgram {
    /// Start configuring a client by hand.
    pub fn builder() -> ConfigBuilder {
        DeepgramConfig::builder()
    }

    /// Build a client from an explicit configuration.
    ///
    /// # Errors
    /// Returns an error if a configured header is invalid or the HTTP client
    /// cannot be constructed.
    pub fn new(config: DeepgramConfig) -> Result<Self> {
        let config = Arc::new(config);
        let rest = RestClient::new(Arc::clone(&config))?;
        Ok(Self { config, rest })
    }

    /// Build a client for the given API key, with defaults for everything
    /// else.
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn from_api_key(key: impl Into<String>) -> Result<Self> {
        Self::new(DeepgramConfig::builder().api_key(key).build()?)
    }

    /// Build a client from `DEEPGRAM_ACCESS_TOKEN` or `DEEPGRAM_API_KEY`.
    ///
    /// # Errors
    /// Returns an error if neither variable is set or the HTTP client cannot
    /// be constructed.
    pub fn from_env() -> Result<Self> {
        Self::new(DeepgramConfig::builder().build()?)
    }

    /// Speech-to-text.
    pub fn listen(&self) -> Listen {
        Listen::new(Arc::clone(&self.config), self.rest.clone())
    }

    /// Text-to-speech.
    pub fn speak(&self) -> Speak {
        Speak::new(Arc::clone(&self.config), self.rest.clone())
    }

    /// Text intelligence.
    pub fn read(&self) -> Read {
        Read::new(self.rest.clone())
    }

    /// Voice agent.
    pub fn agent(&self) -> Agent {
        Agent::new(Arc::clone(&self.config))
    }

    /// Project administration.
    pub fn manage(&self) -> Manage {
        Manage::new(self.rest.clone())
    }

    /// The resolved configuration this client runs with.
    #[must_use]
    pub fn config(&self) -> &DeepgramConfig {
        &self.config
    }
}
