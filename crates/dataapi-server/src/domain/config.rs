//! Server configuration with validation.
//!
//! Every section deserializes with defaults so a partial file (or no file)
//! yields a runnable configuration. The operating mode is read once at
//! construction and never changes afterwards.

use serde::{Deserialize, Serialize};
use std::env;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::time::Duration;

/// Default listen port for the HTTP API.
pub const DEFAULT_PORT: u16 = 8080;

/// Operating mode.
///
/// `Release` enforces the configured CORS allow-list. `Debug` accepts any
/// origin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServerMode {
    Release,
    #[default]
    Debug,
}

impl ServerMode {
    pub fn is_release(&self) -> bool {
        matches!(self, ServerMode::Release)
    }
}

impl std::str::FromStr for ServerMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "release" => Ok(ServerMode::Release),
            "debug" | "test" => Ok(ServerMode::Debug),
            other => Err(ConfigError::Invalid(format!("unknown server mode: {}", other))),
        }
    }
}

/// Main Data API configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DataApiConfig {
    /// Address the HTTP API listens on
    pub socket_addr: SocketAddr,
    /// Operating mode
    pub server_mode: ServerMode,
    /// CORS configuration
    pub cors: CorsConfig,
    /// Server timeouts
    pub timeouts: TimeoutConfig,
    /// Logging configuration
    pub logging: LoggingConfig,
    /// Optional address for the Prometheus `/metrics` listener
    pub metrics_addr: Option<SocketAddr>,
}

impl Default for DataApiConfig {
    fn default() -> Self {
        Self {
            socket_addr: SocketAddr::new(IpAddr::V4(Ipv4Addr::UNSPECIFIED), DEFAULT_PORT),
            server_mode: ServerMode::default(),
            cors: CorsConfig::default(),
            timeouts: TimeoutConfig::default(),
            logging: LoggingConfig::default(),
            metrics_addr: None,
        }
    }
}

impl DataApiConfig {
    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(metrics_addr) = self.metrics_addr {
            if metrics_addr == self.socket_addr && metrics_addr.port() != 0 {
                return Err(ConfigError::DuplicateAddress(metrics_addr));
            }
        }

        for (name, value) in [("read", self.timeouts.read), ("write", self.timeouts.write)] {
            if value.is_zero() {
                return Err(ConfigError::InvalidTimeout(format!("{} timeout cannot be 0", name)));
            }
        }

        if self.server_mode.is_release() {
            if self.cors.allowed_origins.is_empty() {
                return Err(ConfigError::InvalidCors(
                    "release mode requires at least one allowed origin".into(),
                ));
            }
            if self.cors.allowed_origins.iter().any(|o| o == "*") {
                return Err(ConfigError::InvalidCors(
                    "wildcard origin cannot be combined with credentials in release mode".into(),
                ));
            }
        }

        Ok(())
    }

    /// Build configuration from `DATAAPI_*` environment variables.
    ///
    /// - `DATAAPI_SOCKET_ADDR`: listen address (default: 0.0.0.0:8080)
    /// - `DATAAPI_SERVER_MODE`: `release` or `debug` (default: debug)
    /// - `DATAAPI_ALLOW_ORIGINS`: comma separated origin allow-list
    /// - `DATAAPI_METRICS_ADDR`: Prometheus listener address (default: disabled)
    /// - `DATAAPI_LOG_LEVEL`: tracing filter directive (default: info)
    /// - `DATAAPI_JSON_LOGS`: emit JSON logs (default: false)
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Ok(addr) = env::var("DATAAPI_SOCKET_ADDR") {
            config.socket_addr = parse_addr("DATAAPI_SOCKET_ADDR", &addr)?;
        }
        if let Ok(mode) = env::var("DATAAPI_SERVER_MODE") {
            config.server_mode = mode.parse()?;
        }
        if let Ok(origins) = env::var("DATAAPI_ALLOW_ORIGINS") {
            config.cors.allowed_origins = origins
                .split(',')
                .map(str::trim)
                .filter(|o| !o.is_empty())
                .map(str::to_string)
                .collect();
        }
        if let Ok(addr) = env::var("DATAAPI_METRICS_ADDR") {
            config.metrics_addr = Some(parse_addr("DATAAPI_METRICS_ADDR", &addr)?);
        }
        if let Ok(level) = env::var("DATAAPI_LOG_LEVEL") {
            config.logging.level = level;
        }
        if let Ok(json) = env::var("DATAAPI_JSON_LOGS") {
            config.logging.json = matches!(json.trim(), "1" | "true" | "yes");
        }

        config.validate()?;
        Ok(config)
    }
}

fn parse_addr(var: &str, value: &str) -> Result<SocketAddr, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::Invalid(format!("{}: invalid socket address {:?}", var, value)))
}

/// CORS configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CorsConfig {
    /// Origins allowed in release mode
    pub allowed_origins: Vec<String>,
    /// Allowed methods
    pub allowed_methods: Vec<String>,
    /// Allow credentials
    pub allow_credentials: bool,
    /// Max age for preflight cache, in seconds
    pub max_age: u64,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origins: Vec::new(),
            allowed_methods: ["GET", "POST", "HEAD", "OPTIONS"]
                .iter()
                .map(|m| m.to_string())
                .collect(),
            allow_credentials: true,
            max_age: 43200, // 12 hours
        }
    }
}

/// Server timeout configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Bound on reading a request body
    #[serde(with = "humantime_serde")]
    pub read: Duration,
    /// Whole-request deadline
    #[serde(with = "humantime_serde")]
    pub write: Duration,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            read: Duration::from_secs(5),
            write: Duration::from_secs(20),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive used when `RUST_LOG` is unset
    pub level: String,
    /// Emit JSON formatted logs
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

/// Configuration errors
#[derive(Debug, Clone, thiserror::Error)]
pub enum ConfigError {
    /// API and metrics listeners share an address
    #[error("metrics listener cannot share the API address {0}")]
    DuplicateAddress(SocketAddr),
    /// Invalid timeout value
    #[error("invalid timeout: {0}")]
    InvalidTimeout(String),
    /// Invalid CORS policy
    #[error("invalid cors policy: {0}")]
    InvalidCors(String),
    /// General configuration error
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Duration (de)serialization as `"5s"`, `"500ms"`, `"2m"` or plain seconds.
mod humantime_serde {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        if duration.subsec_millis() != 0 {
            serializer.serialize_str(&format!("{}ms", duration.as_millis()))
        } else {
            serializer.serialize_str(&format!("{}s", duration.as_secs()))
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        parse_duration(&s).map_err(serde::de::Error::custom)
    }

    pub(super) fn parse_duration(s: &str) -> Result<Duration, &'static str> {
        let s = s.trim();
        // "ms" must be checked before "s" and "m"
        if let Some(ms) = s.strip_suffix("ms") {
            ms.trim()
                .parse::<u64>()
                .map(Duration::from_millis)
                .map_err(|_| "invalid milliseconds")
        } else if let Some(secs) = s.strip_suffix('s') {
            secs.trim()
                .parse::<u64>()
                .map(Duration::from_secs)
                .map_err(|_| "invalid seconds")
        } else if let Some(mins) = s.strip_suffix('m') {
            mins.trim()
                .parse::<u64>()
                .ok()
                .and_then(|m| m.checked_mul(60))
                .map(Duration::from_secs)
                .ok_or("invalid minutes")
        } else {
            s.parse::<u64>()
                .map(Duration::from_secs)
                .map_err(|_| "invalid duration format")
        }
    }
}
