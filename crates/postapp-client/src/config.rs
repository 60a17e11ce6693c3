//! Client configuration loaded from environment variables.
//!
//! Every setting has a default, so the client runs against the built-in
//! mock backend with no configuration at all.

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use postapp_shared::constants::{DEFAULT_DAILY_GOAL, DEFAULT_HTTP_PORT, DEFAULT_READ_DWELL_MS};

/// Which remote data service the client talks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backend {
    /// In-process service seeded with sample posts.
    Mock,
    /// REST backend at [`ClientConfig::server_url`].
    Http,
}

impl FromStr for Backend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mock" => Ok(Self::Mock),
            "http" | "rest" => Ok(Self::Http),
            other => Err(format!("unknown backend: {other}")),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Env: `POSTAPP_BACKEND` (`mock` or `http`)
    /// Default: `mock`
    pub backend: Backend,

    /// Base URL of the REST backend.
    /// Env: `POSTAPP_SERVER_URL`
    /// Default: `http://127.0.0.1:8080`
    pub server_url: String,

    /// Local database holding the reading goal. `None` uses the platform
    /// data directory.
    /// Env: `POSTAPP_DB_PATH`
    pub db_path: Option<PathBuf>,

    /// Goal used when no reading goal has been stored yet. Always positive.
    /// Env: `POSTAPP_DAILY_GOAL`
    /// Default: `5`
    pub daily_goal: u32,

    /// How long a post must stay open before it counts as read.
    /// Env: `POSTAPP_READ_DWELL_MS`
    /// Default: `500`
    pub read_dwell: Duration,

    /// Artificial delay added to every mock backend call.
    /// Env: `POSTAPP_MOCK_LATENCY_MS`
    /// Default: `0`
    pub mock_latency: Duration,

    /// Per-request timeout for the REST backend.
    /// Env: `POSTAPP_HTTP_TIMEOUT_SECS`
    /// Default: `10`
    pub http_timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            backend: Backend::Mock,
            server_url: format!("http://127.0.0.1:{DEFAULT_HTTP_PORT}"),
            db_path: None,
            daily_goal: DEFAULT_DAILY_GOAL,
            read_dwell: Duration::from_millis(DEFAULT_READ_DWELL_MS),
            mock_latency: Duration::ZERO,
            http_timeout: Duration::from_secs(10),
        }
    }
}

impl ClientConfig {
    /// Load configuration from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) with an arbitrary variable source.
    pub fn from_vars(var: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(val) = var("POSTAPP_BACKEND") {
            match val.parse() {
                Ok(backend) => config.backend = backend,
                Err(e) => tracing::warn!(error = %e, "Invalid POSTAPP_BACKEND, using mock"),
            }
        }

        if let Some(url) = var("POSTAPP_SERVER_URL") {
            if !url.trim().is_empty() {
                config.server_url = url.trim().to_string();
            }
        }

        if let Some(path) = var("POSTAPP_DB_PATH") {
            if !path.is_empty() {
                config.db_path = Some(PathBuf::from(path));
            }
        }

        match parse_var::<u32>(&var, "POSTAPP_DAILY_GOAL") {
            Some(0) => tracing::warn!("POSTAPP_DAILY_GOAL must be positive, using default"),
            Some(n) => config.daily_goal = n,
            None => {}
        }
        if let Some(ms) = parse_var::<u64>(&var, "POSTAPP_READ_DWELL_MS") {
            config.read_dwell = Duration::from_millis(ms);
        }
        if let Some(ms) = parse_var::<u64>(&var, "POSTAPP_MOCK_LATENCY_MS") {
            config.mock_latency = Duration::from_millis(ms);
        }
        if let Some(secs) = parse_var::<u64>(&var, "POSTAPP_HTTP_TIMEOUT_SECS") {
            config.http_timeout = Duration::from_secs(secs);
        }

        config
    }
}

fn parse_var<T: FromStr>(var: &impl Fn(&str) -> Option<String>, key: &str) -> Option<T> {
    let val = var(key)?;
    match val.trim().parse() {
        Ok(parsed) => Some(parsed),
        Err(_) => {
            tracing::warn!(key, value = %val, "Invalid value, using default");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn vars(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_default_config() {
        let config = ClientConfig::from_vars(vars(&[]));
        assert_eq!(config.backend, Backend::Mock);
        assert_eq!(config.daily_goal, 5);
        assert_eq!(config.read_dwell, Duration::from_millis(500));
        assert_eq!(config.server_url, "http://127.0.0.1:8080");
        assert!(config.db_path.is_none());
    }

    #[test]
    fn test_overrides() {
        let config = ClientConfig::from_vars(vars(&[
            ("POSTAPP_BACKEND", "HTTP"),
            ("POSTAPP_SERVER_URL", "http://example.test/api/"),
            ("POSTAPP_DB_PATH", "/tmp/postapp.db"),
            ("POSTAPP_DAILY_GOAL", "3"),
            ("POSTAPP_READ_DWELL_MS", "0"),
        ]));
        assert_eq!(config.backend, Backend::Http);
        assert_eq!(config.server_url, "http://example.test/api/");
        assert_eq!(config.db_path, Some(PathBuf::from("/tmp/postapp.db")));
        assert_eq!(config.daily_goal, 3);
        assert_eq!(config.read_dwell, Duration::ZERO);
    }

    #[test]
    fn test_invalid_values_fall_back() {
        let config = ClientConfig::from_vars(vars(&[
            ("POSTAPP_BACKEND", "carrier-pigeon"),
            ("POSTAPP_DAILY_GOAL", "-1"),
            ("POSTAPP_HTTP_TIMEOUT_SECS", "soon"),
        ]));
        assert_eq!(config.backend, Backend::Mock);
        assert_eq!(config.daily_goal, 5);
        assert_eq!(config.http_timeout, Duration::from_secs(10));

        let config = ClientConfig::from_vars(vars(&[("POSTAPP_DAILY_GOAL", "0")]));
        assert_eq!(config.daily_goal, 5);
    }
}
