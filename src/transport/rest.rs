use std::sync::Arc;
use std::time::Duration;

use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, RequestBuilder, Response};
use serde::Serialize;
use serde::de::DeserializeOwned;
use url::Url;

use crate::config::DeepgramConfig;
use crate::{Error, Result};

const DEFAULT_POOL_IDLE_TIMEOUT: Duration = Duration::from_secs(90);

/// Single-attempt REST executor for the `Deepgram` API.
///
/// Owns one connection pool; every call is exactly one request. Non-2xx
/// responses become [`Error::Api`] with the body preserved, timeouts become
/// [`Error::Timeout`], undecodable bodies become [`Error::Json`].
#[derive(Clone, Debug)]
pub struct RestClient {
    client: Client,
    config: Arc<DeepgramConfig>,
}

impl RestClient {
    /// Build the underlying HTTP client from the shared configuration.
    ///
    /// # Errors
    /// Returns an error if a configured header is invalid or the client
    /// cannot be constructed.
    pub fn new(config: Arc<DeepgramConfig>) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout())
            .pool_idle_timeout(DEFAULT_POOL_IDLE_TIMEOUT)
            .default_headers(config.header_map()?)
            .build()?;
        Ok(Self { client, config })
    }

    /// # Errors
    /// Returns an error if the request fails or the body does not decode.
    pub async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(String, String)],
    ) -> Result<T> {
        let req = self.client.get(self.url(path, query)?);
        self.run_json(req).await
    }

    /// POST a JSON body and decode a JSON response.
    ///
    /// # Errors
    /// Returns an error if the request fails or the body does not decode.
    pub async fn post<T, B>(&self, path: &str, query: &[(String, String)], body: &B) -> Result<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let req = self.client.post(self.url(path, query)?).json(body);
        self.run_json(req).await
    }

    /// POST a raw payload (audio upload) and decode a JSON response.
    ///
    /// # Errors
    /// Returns an error if the request fails or the body does not decode.
    pub async fn post_raw<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(String, String)],
        content_type: &str,
        body: Vec<u8>,
    ) -> Result<T> {
        let req = self
            .client
            .post(self.url(path, query)?)
            .header(CONTENT_TYPE, content_type)
            .body(body);
        self.run_json(req).await
    }

    /// POST a JSON body and return the raw response bytes (synthesized audio).
    ///
    /// # Errors
    /// Returns an error if the request fails.
    pub async fn post_for_bytes<B>(
        &self,
        path: &str,
        query: &[(String, String)],
        body: &B,
    ) -> Result<Vec<u8>>
    where
        B: Serialize + ?Sized,
    {
        let req = self.client.post(self.url(path, query)?).json(body);
        let res = self.run(req).await?;
        let bytes = res.bytes().await.map_err(|e| self.transport_error(e))?;
        Ok(bytes.to_vec())
    }

    /// # Errors
    /// Returns an error if the request fails or the body does not decode.
    pub async fn patch<T, B>(&self, path: &str, body: &B) -> Result<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let req = self.client.patch(self.url(path, &[])?).json(body);
        self.run_json(req).await
    }

    /// # Errors
    /// Returns an error if the request fails or the body does not decode.
    pub async fn delete<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let req = self.client.delete(self.url(path, &[])?);
        self.run_json(req).await
    }

    fn url(&self, path: &str, query: &[(String, String)]) -> Result<Url> {
        let mut url = self.config.rest_url(path)?;
        if !query.is_empty() {
            url.query_pairs_mut()
                .extend_pairs(query.iter().map(|(k, v)| (k.as_str(), v.as_str())));
        }
        Ok(url)
    }

    async fn run_json<T: DeserializeOwned>(&self, req: RequestBuilder) -> Result<T> {
        let res = self.run(req).await?;
        let body = res.text().await.map_err(|e| self.transport_error(e))?;
        Ok(serde_json::from_str(&body)?)
    }

    async fn run(&self, req: RequestBuilder) -> Result<Response> {
        let res = req.send().await.map_err(|e| self.transport_error(e))?;
        let status = res.status();
        if status.is_success() {
            return Ok(res);
        }
        let body = res.text().await.unwrap_or_default();
        tracing::warn!(status = %status, "Deepgram rejected the request");
        Err(Error::Api {
            status: status.as_u16(),
            body,
        })
    }

    fn transport_error(&self, err: reqwest::Error) -> Error {
        if err.is_timeout() {
            Error::Timeout(self.config.timeout())
        } else {
            Error::Http(err)
        }
    }
}
