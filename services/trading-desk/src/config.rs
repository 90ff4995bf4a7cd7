//! Desk configuration
//!
//! Loaded from a TOML file with environment variable overrides. Every
//! field has a default, so an empty file describes the reference wiring:
//! four input feeds on ports 1234/1236/1237/1242 and six output sinks on
//! 1235 and 1238-1241/1243, all on localhost.

use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;
use thiserror::Error;

/// A named stream served by a peer on `port`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct StreamEndpoint {
    /// Stream name sent in the handshake, the file path on the peer side
    pub name: String,
    pub port: u16,
}

impl StreamEndpoint {
    pub fn new(name: impl Into<String>, port: u16) -> Self {
        Self {
            name: name.into(),
            port,
        }
    }
}

/// Input feeds, drained in the order trades, market data, prices, inquiries
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct FeedsConfig {
    pub prices: StreamEndpoint,
    pub trades: StreamEndpoint,
    pub market_data: StreamEndpoint,
    pub inquiries: StreamEndpoint,
}

impl Default for FeedsConfig {
    fn default() -> Self {
        Self {
            prices: StreamEndpoint::new("./data/prices.txt", 1234),
            trades: StreamEndpoint::new("./data/trades.txt", 1236),
            market_data: StreamEndpoint::new("./data/marketdata.txt", 1237),
            inquiries: StreamEndpoint::new("./data/inquiries.txt", 1242),
        }
    }
}

/// Output sinks
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SinksConfig {
    pub gui: StreamEndpoint,
    pub executions: StreamEndpoint,
    pub positions: StreamEndpoint,
    pub risk: StreamEndpoint,
    pub streaming: StreamEndpoint,
    pub all_inquiries: StreamEndpoint,
}

impl Default for SinksConfig {
    fn default() -> Self {
        Self {
            gui: StreamEndpoint::new("./output/gui.txt", 1235),
            executions: StreamEndpoint::new("./output/executions.txt", 1238),
            positions: StreamEndpoint::new("./output/positions.txt", 1239),
            risk: StreamEndpoint::new("./output/risk.txt", 1240),
            streaming: StreamEndpoint::new("./output/streaming.txt", 1241),
            all_inquiries: StreamEndpoint::new("./output/allinquiries.txt", 1243),
        }
    }
}

/// GUI rate limit
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct GuiConfig {
    /// Minimum interval between two published prices
    pub throttle_ms: u64,
    /// Hard cap on prices published over the process lifetime
    pub max_publishes: u32,
}

impl Default for GuiConfig {
    fn default() -> Self {
        Self {
            throttle_ms: 300,
            max_publishes: 100,
        }
    }
}

/// Desk configuration
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct DeskConfig {
    /// Host running the feed peers
    pub host: String,

    pub feeds: FeedsConfig,

    pub sinks: SinksConfig,

    pub gui: GuiConfig,

    /// Default tracing directive; `RUST_LOG` takes precedence
    pub log_level: String,
}

impl Default for DeskConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            feeds: FeedsConfig::default(),
            sinks: SinksConfig::default(),
            gui: GuiConfig::default(),
            log_level: "info".to_string(),
        }
    }
}

impl DeskConfig {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Apply `DESK_HOST`, `DESK_LOG_LEVEL` and `DESK_GUI_THROTTLE_MS`
    pub fn with_env_override(self) -> Self {
        self.with_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from an arbitrary variable lookup
    pub fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(host) = lookup("DESK_HOST") {
            self.host = host;
        }

        if let Some(log_level) = lookup("DESK_LOG_LEVEL") {
            self.log_level = log_level;
        }

        if let Some(throttle) = lookup("DESK_GUI_THROTTLE_MS") {
            if let Ok(throttle) = throttle.parse() {
                self.gui.throttle_ms = throttle;
            }
        }

        self
    }

    /// Every endpoint with a label, feeds first
    pub fn endpoints(&self) -> Vec<(&'static str, &StreamEndpoint)> {
        vec![
            ("feeds.prices", &self.feeds.prices),
            ("feeds.trades", &self.feeds.trades),
            ("feeds.market_data", &self.feeds.market_data),
            ("feeds.inquiries", &self.feeds.inquiries),
            ("sinks.gui", &self.sinks.gui),
            ("sinks.executions", &self.sinks.executions),
            ("sinks.positions", &self.sinks.positions),
            ("sinks.risk", &self.sinks.risk),
            ("sinks.streaming", &self.sinks.streaming),
            ("sinks.all_inquiries", &self.sinks.all_inquiries),
        ]
    }

    /// `host:port` for an endpoint
    pub fn address(&self, endpoint: &StreamEndpoint) -> String {
        format!("{}:{}", self.host, endpoint.port)
    }

    /// Validate the configuration, reporting every problem at once
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut errors = Vec::new();

        let valid_log_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_log_levels.contains(&self.log_level.to_lowercase().as_str()) {
            errors.push(format!(
                "Invalid log_level '{}'. Valid values: {:?}",
                self.log_level, valid_log_levels
            ));
        }

        if self.host.trim().is_empty() {
            errors.push("host cannot be empty".to_string());
        }

        let mut ports: BTreeMap<u16, &str> = BTreeMap::new();
        for (label, endpoint) in self.endpoints() {
            if endpoint.name.trim().is_empty() {
                errors.push(format!("{}.name cannot be empty", label));
            }
            if endpoint.port == 0 {
                errors.push(format!("{}.port must be greater than 0", label));
                continue;
            }
            if let Some(first) = ports.insert(endpoint.port, label) {
                errors.push(format!(
                    "{}.port {} is already used by {}",
                    label, endpoint.port, first
                ));
            }
        }

        if self.gui.max_publishes == 0 {
            errors.push("gui.max_publishes must be greater than 0".to_string());
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Validation(errors))
        }
    }
}

/// Configuration error type
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("IO error reading {path}: {reason}")]
    Io { path: String, reason: String },

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Validation errors: {}", .0.join("; "))]
    Validation(Vec<String>),
}
