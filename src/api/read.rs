use crate::protocol::read::{AnalyzeResponse, ReadOptions};
use crate::protocol::{TextSource, UrlSource};
use crate::transport::query;
use crate::transport::rest::RestClient;
use crate::{Error, Result};

const READ_PATH: &str = "read";

/// Text intelligence: summarization, topics, intents, and sentiment over
/// REST.
#[derive(Clone, Debug)]
pub struct Read {
    rest: RestClient,
}

impl Read {
    pub(crate) const fn new(rest: RestClient) -> Self {
        Self { rest }
    }

    /// Analyze text sent in the request body.
    ///
    /// # Errors
    /// Returns an error if the text is empty, the request fails, or the
    /// response does not decode.
    pub async fn analyze_text(
        &self,
        text: impl Into<String>,
        options: &ReadOptions,
    ) -> Result<AnalyzeResponse> {
        let text = text.into();
        if text.is_empty() {
            return Err(Error::Validation("text must not be empty".into()));
        }
        let query = query::pairs(options)?;
        let source = TextSource { text };
        self.rest.post(READ_PATH, &query, &source).await
    }

    /// Analyze text the server fetches from `url`.
    ///
    /// # Errors
    /// Returns an error if the request fails or the response does not decode.
    pub async fn analyze_url(
        &self,
        url: impl Into<String>,
        options: &ReadOptions,
    ) -> Result<AnalyzeResponse> {
        let query = query::pairs(options)?;
        let source = UrlSource { url: url.into() };
        self.rest.post(READ_PATH, &query, &source).await
    }
}
