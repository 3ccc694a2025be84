use std::time::Duration;

use reqwest::header::{self, HeaderMap, HeaderName, HeaderValue};
use url::Url;

use crate::{Error, Result};

pub const DEFAULT_BASE_URL: &str = "https://api.deepgram.com";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
pub const DEFAULT_API_VERSION: &str = "v1";

/// `User-Agent` presented on every REST and WebSocket request.
pub const USER_AGENT: &str = concat!(
    "dg-voice-rs/",
    env!("CARGO_PKG_VERSION"),
    " rust/",
    env!("CARGO_PKG_RUST_VERSION"),
);

const ENV_ACCESS_TOKEN: &str = "DEEPGRAM_ACCESS_TOKEN";
const ENV_API_KEY: &str = "DEEPGRAM_API_KEY";

/// Credential presented on every request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Credential {
    /// Project API key, sent as `Authorization: Token <key>`.
    ApiKey(String),
    /// OAuth access token, sent as `Authorization: Bearer <token>`.
    /// Takes priority over an API key when both are supplied.
    AccessToken(String),
}

impl Credential {
    #[must_use]
    pub fn header_value(&self) -> String {
        match self {
            Self::ApiKey(key) => format!("Token {key}"),
            Self::AccessToken(token) => format!("Bearer {token}"),
        }
    }
}

/// Validated transport configuration shared by every product surface.
///
/// Construct through [`DeepgramConfig::builder`]; construction resolves the
/// credential (explicit value, then `DEEPGRAM_ACCESS_TOKEN`, then
/// `DEEPGRAM_API_KEY`) and normalizes the base endpoint.
#[derive(Debug, Clone)]
pub struct DeepgramConfig {
    credential: Credential,
    base_url: Url,
    api_version: String,
    timeout: Duration,
    headers: Vec<(String, String)>,
}

impl DeepgramConfig {
    #[must_use]
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::new()
    }

    #[must_use]
    pub const fn credential(&self) -> &Credential {
        &self.credential
    }

    #[must_use]
    pub const fn timeout(&self) -> Duration {
        self.timeout
    }

    #[must_use]
    pub fn api_version(&self) -> &str {
        &self.api_version
    }

    #[must_use]
    pub const fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// REST endpoint for `path`, e.g. `listen` or `projects/{id}/keys`.
    pub fn rest_url(&self, path: &str) -> Result<Url> {
        let scheme = match self.base_url.scheme() {
            "ws" => "http",
            "wss" => "https",
            s => s,
        };
        self.endpoint_url(scheme, path)
    }

    /// WebSocket endpoint for `path`, with `http(s)` rewritten to `ws(s)`.
    pub fn websocket_url(&self, path: &str) -> Result<Url> {
        let scheme = match self.base_url.scheme() {
            "http" | "ws" => "ws",
            _ => "wss",
        };
        self.endpoint_url(scheme, path)
    }

    /// Standard headers plus caller extras; extras override the defaults.
    pub fn header_map(&self) -> Result<HeaderMap> {
        let mut map = HeaderMap::new();
        map.insert(
            header::AUTHORIZATION,
            HeaderValue::from_str(&self.credential.header_value())?,
        );
        map.insert(header::USER_AGENT, HeaderValue::from_static(USER_AGENT));
        map.insert(header::ACCEPT, HeaderValue::from_static("application/json"));
        for (name, value) in &self.headers {
            let name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|e| Error::Config(format!("invalid header name {name:?}: {e}")))?;
            map.insert(name, HeaderValue::from_str(value)?);
        }
        Ok(map)
    }

    fn endpoint_url(&self, scheme: &str, path: &str) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.set_scheme(scheme).map_err(|()| {
            Error::Config(format!("cannot use scheme {scheme:?} with {}", self.base_url))
        })?;
        let prefix = url.path().trim_end_matches('/').to_string();
        url.set_path(&format!("{prefix}/{}/{path}", self.api_version));
        Ok(url)
    }
}

#[derive(Debug, Default)]
pub struct ConfigBuilder {
    api_key: Option<String>,
    access_token: Option<String>,
    base_url: Option<String>,
    api_version: Option<String>,
    timeout: Option<Duration>,
    headers: Vec<(String, String)>,
}

impl ConfigBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    #[must_use]
    pub fn access_token(mut self, token: impl Into<String>) -> Self {
        self.access_token = Some(token.into());
        self
    }

    #[must_use]
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    #[must_use]
    pub fn api_version(mut self, version: impl Into<String>) -> Self {
        self.api_version = Some(version.into());
        self
    }

    #[must_use]
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    #[must_use]
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Resolve the credential and normalize the endpoint.
    ///
    /// # Errors
    /// Returns [`Error::Auth`] when no credential is supplied explicitly or
    /// through the environment, [`Error::Config`] for an unusable base URL.
    pub fn build(self) -> Result<DeepgramConfig> {
        self.build_with(&|key| std::env::var(key).ok())
    }

    fn build_with(self, env: &dyn Fn(&str) -> Option<String>) -> Result<DeepgramConfig> {
        let credential = self.resolve_credential(env)?;
        let base_url = normalize_base_url(self.base_url.as_deref().unwrap_or(DEFAULT_BASE_URL))?;
        Ok(DeepgramConfig {
            credential,
            base_url,
            api_version: self
                .api_version
                .unwrap_or_else(|| DEFAULT_API_VERSION.to_string()),
            timeout: self.timeout.unwrap_or(DEFAULT_TIMEOUT),
            headers: self.headers,
        })
    }

    fn resolve_credential(&self, env: &dyn Fn(&str) -> Option<String>) -> Result<Credential> {
        if let Some(token) = &self.access_token {
            return Ok(Credential::AccessToken(token.clone()));
        }
        if let Some(key) = &self.api_key {
            return Ok(Credential::ApiKey(key.clone()));
        }
        if let Some(token) = env(ENV_ACCESS_TOKEN) {
            return Ok(Credential::AccessToken(token));
        }
        if let Some(key) = env(ENV_API_KEY) {
            return Ok(Credential::ApiKey(key));
        }
        Err(Error::Auth(format!(
            "no credential supplied; pass an API key or access token, or set {ENV_ACCESS_TOKEN} or {ENV_API_KEY}"
        )))
    }
}

fn normalize_base_url(raw: &str) -> Result<Url> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(Error::Config("base URL is empty".to_string()));
    }
    let with_scheme = if trimmed.contains("://") {
        trimmed.to_string()
    } else {
        format!("https://{trimmed}")
    };
    let mut url = Url::parse(&with_scheme)?;
    match url.scheme() {
        "http" | "https" | "ws" | "wss" => {}
        s => {
            return Err(Error::Config(format!("unsupported scheme {s:?} in base URL")));
        }
    }
    let path = url.path().trim_end_matches('/').to_string();
    url.set_path(&path);
    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn explicit_access_token_beats_api_key() {
        let config = ConfigBuilder::new()
            .api_key("key")
            .access_token("token")
            .build_with(&no_env)
            .unwrap();
        assert_eq!(
            config.credential(),
            &Credential::AccessToken("token".to_string())
        );
        assert_eq!(config.credential().header_value(), "Bearer token");
    }

    #[test]
    fn api_key_formats_token_header() {
        let config = ConfigBuilder::new()
            .api_key("abc123")
            .build_with(&no_env)
            .unwrap();
        assert_eq!(config.credential().header_value(), "Token abc123");
    }

    #[test]
    fn explicit_credential_beats_environment() {
        let env = |key: &str| match key {
            ENV_ACCESS_TOKEN => Some("env-token".to_string()),
            ENV_API_KEY => Some("env-key".to_string()),
            _ => None,
        };
        let config = ConfigBuilder::new().api_key("mine").build_with(&env).unwrap();
        assert_eq!(config.credential(), &Credential::ApiKey("mine".to_string()));
    }

    #[test]
    fn environment_token_beats_environment_key() {
        let env = |key: &str| match key {
            ENV_ACCESS_TOKEN => Some("env-token".to_string()),
            ENV_API_KEY => Some("env-key".to_string()),
            _ => None,
        };
        let config = ConfigBuilder::new().build_with(&env).unwrap();
        assert_eq!(
            config.credential(),
            &Credential::AccessToken("env-token".to_string())
        );
    }

    #[test]
    fn missing_credential_is_an_auth_error() {
        match ConfigBuilder::new().build_with(&no_env) {
            Err(Error::Auth(_)) => {}
            other => panic!("expected Auth error, got {other:?}"),
        }
    }

    #[test]
    fn base_url_is_trimmed_and_scheme_defaulted() {
        let config = ConfigBuilder::new()
            .api_key("k")
            .base_url("  api.example.com/proxy/  ")
            .build_with(&no_env)
            .unwrap();
        let url = config.rest_url("listen").unwrap();
        assert_eq!(url.as_str(), "https://api.example.com/proxy/v1/listen");
    }

    #[test]
    fn websocket_url_rewrites_scheme() {
        let config = ConfigBuilder::new()
            .api_key("k")
            .build_with(&no_env)
            .unwrap();
        let url = config.websocket_url("agent").unwrap();
        assert_eq!(url.as_str(), "wss://api.deepgram.com/v1/agent");

        let plain = ConfigBuilder::new()
            .api_key("k")
            .base_url("http://localhost:8080")
            .build_with(&no_env)
            .unwrap();
        let url = plain.websocket_url("listen").unwrap();
        assert_eq!(url.as_str(), "ws://localhost:8080/v1/listen");
    }

    #[test]
    fn rejects_non_http_scheme() {
        match ConfigBuilder::new()
            .api_key("k")
            .base_url("ftp://example.com")
            .build_with(&no_env)
        {
            Err(Error::Config(_)) => {}
            other => panic!("expected Config error, got {other:?}"),
        }
    }

    #[test]
    fn caller_headers_override_defaults() {
        let config = ConfigBuilder::new()
            .api_key("k")
            .header("User-Agent", "custom-agent/1.0")
            .header("X-Extra", "1")
            .build_with(&no_env)
            .unwrap();
        let map = config.header_map().unwrap();
        assert_eq!(map.get(header::USER_AGENT).unwrap(), "custom-agent/1.0");
        assert_eq!(map.get("X-Extra").unwrap(), "1");
        assert_eq!(map.get(header::AUTHORIZATION).unwrap(), "Token k");
    }

    #[test]
    fn api_version_overrides_path_segment() {
        let config = ConfigBuilder::new()
            .api_key("k")
            .api_version("v2")
            .build_with(&no_env)
            .unwrap();
        let url = config.rest_url("speak").unwrap();
        assert_eq!(url.as_str(), "https://api.deepgram.com/v2/speak");
    }
}
