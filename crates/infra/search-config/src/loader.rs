//! Configuration loader with JSON file layer and env overrides.
//!
//! The loading process:
//! 1. Pick the file: explicit `--config` path, else `./tavily-mcp.json` if it exists
//! 2. Deserialize once into typed `SearchServerConfig` (defaults fill gaps)
//! 3. Apply env var overrides (highest precedence)
//! 4. Run advisory validation

use crate::{types::SearchServerConfig, validation::AdvisoryWarning};
use anyhow::{Context, Result};
use secrecy::{ExposeSecret, SecretString};
use serde_json::Value;
use std::path::{Path, PathBuf};

/// Filename for the local config.
pub const LOCAL_FILE: &str = "tavily-mcp.json";

/// Result of loading configuration.
#[derive(Debug)]
pub struct LoadedConfig {
    /// The loaded configuration.
    pub config: SearchServerConfig,

    /// Advisory warnings from validation.
    pub warnings: Vec<AdvisoryWarning>,

    /// The file that was read, if any.
    pub source: Option<PathBuf>,
}

/// Load configuration.
///
/// An explicit `path` must exist. Without one, `<local_dir>/tavily-mcp.json`
/// is read when present and silently skipped otherwise.
pub fn load(path: Option<&Path>, local_dir: &Path) -> Result<LoadedConfig> {
    let source = match path {
        Some(p) => {
            anyhow::ensure!(p.exists(), "Config file not found: {}", p.display());
            Some(p.to_path_buf())
        }
        None => Some(local_dir.join(LOCAL_FILE)).filter(|p| p.exists()),
    };

    let mut cfg: SearchServerConfig = match &source {
        Some(p) => {
            let v = read_json_object(p)?;
            serde_json::from_value(v)
                .with_context(|| format!("Failed to deserialize config {}", p.display()))?
        }
        None => SearchServerConfig::default(),
    };

    apply_env_overrides(&mut cfg)?;

    let warnings = crate::validation::validate(&cfg);
    for w in &warnings {
        tracing::warn!("{w}");
    }

    Ok(LoadedConfig {
        config: cfg,
        warnings,
        source,
    })
}

impl SearchServerConfig {
    /// The Tavily API key, or an error explaining how to set it.
    pub fn require_api_key(&self) -> Result<SecretString> {
        match &self.tavily.api_key {
            Some(k) if !k.expose_secret().trim().is_empty() => Ok(k.clone()),
            _ => anyhow::bail!(
                "TAVILY_API_KEY is not set. Export your Tavily API key (tvly-...) before starting the server"
            ),
        }
    }
}

/// Apply environment variable overrides to the config.
fn apply_env_overrides(cfg: &mut SearchServerConfig) -> Result<()> {
    // Tavily service
    if let Some(k) = env_trimmed("TAVILY_API_KEY") {
        cfg.tavily.api_key = Some(SecretString::from(k));
    }
    if let Some(v) = env_trimmed("TAVILY_BASE_URL") {
        cfg.tavily.base_url = v;
    }

    // Server bind
    if let Some(v) = env_trimmed("MCP_HOST") {
        cfg.server.host = v;
    }
    if let Some(v) = env_trimmed("MCP_PORT") {
        cfg.server.port = v
            .parse()
            .with_context(|| format!("MCP_PORT must be a port number, got '{v}'"))?;
    }
    if let Some(v) = env_trimmed("MCP_BEARER_TOKEN") {
        cfg.server.bearer_token = Some(SecretString::from(v));
    }

    // Logging overrides
    if let Some(v) = env_trimmed("TAVILY_MCP_LOG_LEVEL") {
        cfg.logging.level = v;
    }
    if let Some(v) = env_trimmed("TAVILY_MCP_LOG_JSON") {
        cfg.logging.json = v.to_lowercase() == "true" || v == "1";
    }

    Ok(())
}

/// Helper to read and normalize an env var (trim + filter empty).
fn env_trimmed(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn read_json_object(path: &Path) -> Result<Value> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file {}", path.display()))?;

    let v: Value = serde_json::from_str(&raw)
        .with_context(|| format!("Invalid JSON in {}", path.display()))?;

    match v {
        Value::Object(_) => Ok(v),
        _ => anyhow::bail!("Config root must be a JSON object: {}", path.display()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use tempfile::TempDir;

    const ENV_KEYS: [&str; 7] = [
        "TAVILY_API_KEY",
        "TAVILY_BASE_URL",
        "MCP_HOST",
        "MCP_PORT",
        "MCP_BEARER_TOKEN",
        "TAVILY_MCP_LOG_LEVEL",
        "TAVILY_MCP_LOG_JSON",
    ];

    fn clear_env() {
        for k in ENV_KEYS {
            // SAFETY: This test runs serially via #[serial] to avoid data races
            unsafe { std::env::remove_var(k) };
        }
    }

    #[test]
    #[serial]
    fn test_load_no_file_returns_defaults() {
        clear_env();
        let temp = TempDir::new().unwrap();
        let loaded = load(None, temp.path()).unwrap();

        assert!(loaded.source.is_none());
        assert_eq!(loaded.config.server.port, 7000);
        assert_eq!(loaded.config.tavily.base_url, "https://api.tavily.com");
        assert!(loaded.warnings.is_empty());
    }

    #[test]
    #[serial]
    fn test_local_file_is_picked_up() {
        clear_env();
        let temp = TempDir::new().unwrap();
        std::fs::write(
            temp.path().join(LOCAL_FILE),
            r#"{"server": {"port": 8123}, "health": {"slow_threshold_ms": 1500}}"#,
        )
        .unwrap();

        let loaded = load(None, temp.path()).unwrap();
        assert_eq!(loaded.source, Some(temp.path().join(LOCAL_FILE)));
        assert_eq!(loaded.config.server.port, 8123);
        assert_eq!(loaded.config.health.slow_threshold_ms, 1500);
        assert_eq!(loaded.config.server.host, "0.0.0.0");
    }

    #[test]
    #[serial]
    fn test_explicit_path_must_exist() {
        clear_env();
        let temp = TempDir::new().unwrap();
        let missing = temp.path().join("nope.json");
        let err = load(Some(&missing), temp.path()).unwrap_err();
        assert!(err.to_string().contains("not found"));
    }

    #[test]
    #[serial]
    fn test_non_object_root_rejected() {
        clear_env();
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("cfg.json");
        std::fs::write(&path, "[1, 2, 3]").unwrap();
        let err = load(Some(&path), temp.path()).unwrap_err();
        assert!(err.to_string().contains("JSON object"));
    }

    #[test]
    #[serial]
    fn test_env_overrides_file() {
        clear_env();
        let temp = TempDir::new().unwrap();
        std::fs::write(
            temp.path().join(LOCAL_FILE),
            r#"{"server": {"host": "127.0.0.1", "port": 8123}, "logging": {"level": "warn"}}"#,
        )
        .unwrap();

        // SAFETY: This test runs serially via #[serial] to avoid data races
        unsafe {
            std::env::set_var("MCP_PORT", " 9001 ");
            std::env::set_var("TAVILY_API_KEY", "tvly-env");
            std::env::set_var("TAVILY_MCP_LOG_LEVEL", "debug");
            std::env::set_var("TAVILY_MCP_LOG_JSON", "1");
        }

        let loaded = load(None, temp.path()).unwrap();
        clear_env();

        assert_eq!(loaded.config.server.host, "127.0.0.1");
        assert_eq!(loaded.config.server.port, 9001);
        assert_eq!(loaded.config.logging.level, "debug");
        assert!(loaded.config.logging.json);
        assert_eq!(
            loaded.config.require_api_key().unwrap().expose_secret(),
            "tvly-env"
        );
    }

    #[test]
    #[serial]
    fn test_invalid_port_is_an_error() {
        clear_env();
        let temp = TempDir::new().unwrap();
        // SAFETY: This test runs serially via #[serial] to avoid data races
        unsafe { std::env::set_var("MCP_PORT", "seven-thousand") };

        let err = load(None, temp.path()).unwrap_err();
        clear_env();
        assert!(err.to_string().contains("MCP_PORT"));
    }

    #[test]
    #[serial]
    fn test_missing_api_key_is_fatal() {
        clear_env();
        let temp = TempDir::new().unwrap();
        let loaded = load(None, temp.path()).unwrap();
        let err = loaded.config.require_api_key().unwrap_err();
        assert!(err.to_string().contains("TAVILY_API_KEY"));
    }
}
