use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Gateway configuration, built once at startup and shared read-only.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ProxyConfig {
    pub listen: ListenConfig,
    pub upstream: UpstreamConfig,
    pub retry: RetryConfig,
    pub timeout: TimeoutConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ListenConfig {
    pub host: String,
    pub port: u16,
}

/// Where the item store lives. `url` wins when it is an http(s) URL,
/// otherwise the address is composed from `host` and `port`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UpstreamConfig {
    pub url: String,
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
    pub max_attempts: u32,
    pub delay_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TimeoutConfig {
    pub request_timeout_ms: u64,
}

impl Default for ListenConfig {
    fn default() -> Self {
        Self { host: "0.0.0.0".to_string(), port: 5001 }
    }
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            url: "http://localhost:5000".to_string(),
            host: "item-store".to_string(),
            port: 5000,
        }
    }
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self { max_attempts: 3, delay_ms: 1000 }
    }
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { request_timeout_ms: 10_000 }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("cannot read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid config file: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("{key} has an invalid value: {value:?}")]
    InvalidEnv { key: &'static str, value: String },
    #[error("{0}")]
    Invalid(&'static str),
}

impl ProxyConfig {
    pub fn load_from_file(path: &str) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: ProxyConfig = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// Optional JSON file (`GATEWAY_CONFIG`, default `gateway.json`), then environment.
    pub fn load() -> Result<Self, ConfigError> {
        let path = std::env::var("GATEWAY_CONFIG").unwrap_or_else(|_| "gateway.json".to_string());
        let mut config = if std::path::Path::new(&path).exists() {
            Self::load_from_file(&path)?
        } else {
            Self::default()
        };
        config.apply_env_with(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// A zero timeout would fail every upstream call before it is sent.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.timeout.request_timeout_ms == 0 {
            return Err(ConfigError::Invalid("request timeout must be positive"));
        }
        if self.listen.port == 0 {
            return Err(ConfigError::Invalid("listen port must be in 1..=65535"));
        }
        Ok(())
    }

    pub fn apply_env_with<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(host) = lookup("HOST") { self.listen.host = host; }
        if let Some(port) = lookup("PORT") { self.listen.port = parse_env("PORT", port)?; }
        if let Some(url) = lookup("ITEM_STORE_URL") { self.upstream.url = url; }
        if let Some(host) = lookup("ITEM_STORE_HOST") { self.upstream.host = host; }
        if let Some(port) = lookup("ITEM_STORE_PORT") { self.upstream.port = parse_env("ITEM_STORE_PORT", port)?; }
        if let Some(secs) = lookup("REQUEST_TIMEOUT_SECS") {
            let parsed: u64 = parse_env("REQUEST_TIMEOUT_SECS", secs.clone())?;
            if parsed == 0 {
                return Err(ConfigError::InvalidEnv { key: "REQUEST_TIMEOUT_SECS", value: secs });
            }
            self.timeout.request_timeout_ms = parsed.saturating_mul(1000);
        }
        if let Some(n) = lookup("MAX_RETRIES") { self.retry.max_attempts = parse_env("MAX_RETRIES", n)?; }
        if let Some(ms) = lookup("RETRY_DELAY_MS") { self.retry.delay_ms = parse_env("RETRY_DELAY_MS", ms)?; }
        Ok(())
    }

    /// Base URL of the item store, without a trailing slash.
    pub fn upstream_base_url(&self) -> String {
        let url = self.upstream.url.trim();
        if url.starts_with("http") {
            url.trim_end_matches('/').to_string()
        } else {
            format!("http://{}:{}", self.upstream.host, self.upstream.port)
        }
    }

    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.listen.host, self.listen.port)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.timeout.request_timeout_ms)
    }

    pub fn retry_delay(&self) -> Duration {
        Duration::from_millis(self.retry.delay_ms)
    }
}

fn parse_env<T: std::str::FromStr>(key: &'static str, value: String) -> Result<T, ConfigError> {
    value.trim().parse::<T>().map_err(|_| ConfigError::InvalidEnv { key, value })
}
