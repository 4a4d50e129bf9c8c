use std::time::Duration;

use serde::{Serialize, de::DeserializeOwned};

use crate::{config::Config, error::TavilyError};

/// Connect timeout applied to the underlying HTTP client
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// Tavily API client
///
/// The client is generic over a [`Config`] implementation that provides authentication
/// and API configuration. Each call issues exactly one HTTP request bounded by the
/// timeout passed in by the caller; there are no internal retries.
#[derive(Debug, Clone)]
pub struct Client<C: Config> {
    http: reqwest::Client,
    config: C,
}

impl Client<crate::config::TavilyConfig> {
    /// Creates a new client with configuration read from the environment
    ///
    /// - `TAVILY_API_KEY` for API key authentication
    /// - `TAVILY_BASE_URL` for a custom API base URL
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(crate::config::TavilyConfig::new())
    }
}

impl<C: Config + Default> Default for Client<C> {
    fn default() -> Self {
        Self::with_config(C::default())
    }
}

impl<C: Config> Client<C> {
    /// Creates a new client with the given configuration.
    #[must_use]
    pub fn with_config(config: C) -> Self {
        let http = reqwest::Client::builder()
            .connect_timeout(DEFAULT_CONNECT_TIMEOUT)
            .build()
            .unwrap_or_else(|e| {
                tracing::warn!("Falling back to default reqwest client: {e}");
                reqwest::Client::new()
            });
        Self { http, config }
    }

    /// Replaces the HTTP client with a custom one
    #[must_use]
    pub fn with_http_client(mut self, http: reqwest::Client) -> Self {
        self.http = http;
        self
    }

    /// Returns a reference to the client's configuration
    #[must_use]
    pub const fn config(&self) -> &C {
        &self.config
    }

    pub(crate) async fn post<I, O>(
        &self,
        path: &str,
        body: &I,
        timeout: Duration,
    ) -> Result<O, TavilyError>
    where
        I: Serialize + Sync,
        O: DeserializeOwned,
    {
        let request = self.http.post(self.config.url(path)).json(body);
        self.execute(request, timeout).await
    }

    pub(crate) async fn get<O>(&self, path: &str, timeout: Duration) -> Result<O, TavilyError>
    where
        O: DeserializeOwned,
    {
        let request = self.http.get(self.config.url(path));
        self.execute(request, timeout).await
    }

    async fn execute<O>(
        &self,
        request: reqwest::RequestBuilder,
        timeout: Duration,
    ) -> Result<O, TavilyError>
    where
        O: DeserializeOwned,
    {
        // Validate auth before any request
        self.config.validate_auth()?;
        let headers = self.config.headers()?;

        let response = request
            .headers(headers)
            .timeout(timeout)
            .send()
            .await
            .map_err(|e| TavilyError::from_transport(e, timeout))?;

        let status = response.status();
        let bytes: bytes::Bytes = response
            .bytes()
            .await
            .map_err(|e| TavilyError::from_transport(e, timeout))?;

        if !status.is_success() {
            return Err(crate::error::deserialize_api_error(status, &bytes));
        }

        serde_json::from_slice(&bytes).map_err(|e| crate::error::map_deser(&e, &bytes))
    }
}
