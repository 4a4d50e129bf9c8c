use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use secrecy::{ExposeSecret, SecretString};

/// Default Tavily API base URL
pub const TAVILY_DEFAULT_BASE: &str = "https://api.tavily.com";
/// Environment variable holding the API key
pub const ENV_API_KEY: &str = "TAVILY_API_KEY";
/// Environment variable overriding the API base URL
pub const ENV_BASE_URL: &str = "TAVILY_BASE_URL";

/// Configuration for the Tavily client
///
/// Debug output automatically redacts `api_key` via [`SecretString`].
#[derive(Clone, Debug)]
pub struct TavilyConfig {
    api_base: String,
    api_key: Option<SecretString>,
}

impl Default for TavilyConfig {
    fn default() -> Self {
        let api_key = env_trimmed(ENV_API_KEY).map(SecretString::from);
        let api_base = env_trimmed(ENV_BASE_URL).unwrap_or_else(|| TAVILY_DEFAULT_BASE.into());
        Self { api_base, api_key }
    }
}

fn env_trimmed(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl TavilyConfig {
    /// Creates a configuration from the environment
    ///
    /// Reads `TAVILY_API_KEY` and `TAVILY_BASE_URL` (defaults to `https://api.tavily.com`).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the API base URL
    #[must_use]
    pub fn with_api_base(mut self, base: impl Into<String>) -> Self {
        self.api_base = base.into();
        self
    }

    /// Sets the API key
    #[must_use]
    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(SecretString::from(key.into()));
        self
    }

    /// Sets the API key from an already wrapped secret
    #[must_use]
    pub fn with_secret_key(mut self, key: SecretString) -> Self {
        self.api_key = Some(key);
        self
    }

    /// Returns the configured API base URL
    #[must_use]
    pub fn api_base(&self) -> &str {
        &self.api_base
    }
}

/// Configuration trait for the Tavily client
///
/// Implement this trait to provide custom authentication and API configuration.
pub trait Config: Send + Sync {
    /// Returns HTTP headers to include in requests
    ///
    /// # Errors
    ///
    /// Returns an error if header values contain invalid characters.
    fn headers(&self) -> Result<HeaderMap, crate::error::TavilyError>;

    /// Constructs the full URL for an API endpoint
    fn url(&self, path: &str) -> String;

    /// Validates that authentication credentials are present.
    ///
    /// # Errors
    ///
    /// Returns an error if authentication is not properly configured.
    fn validate_auth(&self) -> Result<(), crate::error::TavilyError>;
}

impl Config for TavilyConfig {
    fn headers(&self) -> Result<HeaderMap, crate::error::TavilyError> {
        use crate::error::TavilyError;

        let mut h = HeaderMap::new();

        if let Some(secret) = &self.api_key {
            let key = secret.expose_secret().trim();
            if !key.is_empty() {
                h.insert(
                    AUTHORIZATION,
                    HeaderValue::from_str(&format!("Bearer {key}"))
                        .map_err(|_| TavilyError::Config("Invalid API key value".into()))?,
                );
            }
        }

        Ok(h)
    }

    fn url(&self, path: &str) -> String {
        let base = self.api_base.trim_end_matches('/');
        let path = path.trim_start_matches('/');
        format!("{base}/{path}")
    }

    fn validate_auth(&self) -> Result<(), crate::error::TavilyError> {
        match &self.api_key {
            Some(secret) if !secret.expose_secret().trim().is_empty() => Ok(()),
            _ => Err(crate::error::TavilyError::Config(
                "Missing Tavily credentials: set TAVILY_API_KEY environment variable".into(),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::EnvGuard;
    use serial_test::serial;

    #[test]
    #[serial(env)]
    fn config_reads_env_vars() {
        let _env = EnvGuard::new()
            .set(ENV_API_KEY, "tvly-test-123")
            .set(ENV_BASE_URL, "https://proxy.internal");

        let cfg = TavilyConfig::new();
        assert_eq!(cfg.api_base(), "https://proxy.internal");

        let h = cfg.headers().unwrap();
        assert_eq!(
            h.get(AUTHORIZATION).unwrap().to_str().unwrap(),
            "Bearer tvly-test-123"
        );
    }

    #[test]
    #[serial(env)]
    fn config_defaults_base_url() {
        let _env = EnvGuard::new().set(ENV_API_KEY, "k").remove(ENV_BASE_URL);

        let cfg = TavilyConfig::new();
        assert_eq!(cfg.api_base(), TAVILY_DEFAULT_BASE);
    }

    #[test]
    #[serial(env)]
    fn missing_key_fails_validation() {
        let _env = EnvGuard::new().remove(ENV_API_KEY);

        let cfg = TavilyConfig::new();
        let err = cfg.validate_auth().unwrap_err();
        assert!(err.to_string().contains("TAVILY_API_KEY"));
    }

    #[test]
    fn whitespace_keys_are_rejected() {
        for key in ["", "   ", "\n"] {
            let cfg = TavilyConfig::new().with_api_key(key);
            assert!(cfg.validate_auth().is_err(), "key {key:?} should be rejected");
        }
        let cfg = TavilyConfig::new().with_api_key("  tvly-padded  ");
        assert!(cfg.validate_auth().is_ok());
        let h = cfg.headers().unwrap();
        assert_eq!(
            h.get(AUTHORIZATION).unwrap().to_str().unwrap(),
            "Bearer tvly-padded"
        );
    }

    #[test]
    fn url_joins_without_double_slashes() {
        let cfg = TavilyConfig::new().with_api_base("http://localhost:9000/");
        assert_eq!(cfg.url("/search"), "http://localhost:9000/search");
        assert_eq!(cfg.url("usage"), "http://localhost:9000/usage");
    }

    #[test]
    fn debug_output_redacts_api_key() {
        let cfg = TavilyConfig::new().with_api_key("tvly-super-secret");
        let debug_str = format!("{cfg:?}");
        assert!(!debug_str.contains("tvly-super-secret"));
        assert!(debug_str.contains("[REDACTED]"), "got: {debug_str}");
    }
}
