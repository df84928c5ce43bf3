//! Forwarder configuration
//!
//! Resolution order, each layer overriding the previous one:
//! 1. Fallback constants (`127.0.0.1`, port 0, disabled)
//! 2. Build-time values (`UDP_LOG_HOST`, `UDP_LOG_PORT`, `UDP_LOG_ENABLED`
//!    captured with `option_env!`)
//! 3. Runtime environment, same variable names
//!
//! A TOML file (`[forwarder]` table) can be loaded instead with `load()`.
//!
//! Every source follows the same rule: a non-zero port enables forwarding
//! unless `enabled` is given explicitly. Port 0 always means disabled,
//! whatever `enabled` says.

use crate::constants::{DEFAULT_HOST, DISABLED_PORT, ENV_ENABLED, ENV_HOST, ENV_PORT};
use crate::error::{ForwarderError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::warn;

// =============================================================================
// File Configuration
// =============================================================================

/// Configuration file layout
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub forwarder: ForwarderConfig,
}

// =============================================================================
// Forwarder Configuration
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "ForwarderTable")]
pub struct ForwarderConfig {
    /// Explicit enable flag
    pub enabled: bool,

    /// Destination hostname or literal address
    pub host: String,

    /// Destination UDP port (0 = disabled)
    pub port: u16,
}

impl Default for ForwarderConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            host: DEFAULT_HOST.to_string(),
            port: DISABLED_PORT,
        }
    }
}

/// `[forwarder]` table as written, before the enable rule is applied
#[derive(Debug, Deserialize)]
#[serde(default)]
struct ForwarderTable {
    enabled: Option<bool>,
    host: String,
    port: u16,
}

impl Default for ForwarderTable {
    fn default() -> Self {
        Self {
            enabled: None,
            host: DEFAULT_HOST.to_string(),
            port: DISABLED_PORT,
        }
    }
}

impl From<ForwarderTable> for ForwarderConfig {
    fn from(table: ForwarderTable) -> Self {
        Self {
            enabled: table.enabled.unwrap_or(table.port != DISABLED_PORT),
            host: table.host,
            port: table.port,
        }
    }
}

impl ForwarderConfig {
    /// Enabled config pointing at `host:port`
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            enabled: true,
            host: host.into(),
            port,
        }
    }

    /// Disabled config
    pub fn disabled() -> Self {
        Self::default()
    }

    /// Values baked in at compile time
    pub fn from_build() -> Self {
        // option_env! only accepts literals; names match constants::ENV_*
        Self::default().with_overrides(|key: &str| {
            let value = match key {
                ENV_HOST => option_env!("UDP_LOG_HOST"),
                ENV_PORT => option_env!("UDP_LOG_PORT"),
                ENV_ENABLED => option_env!("UDP_LOG_ENABLED"),
                _ => None,
            };
            value.map(String::from)
        })
    }

    /// Build-time values overridden by the process environment
    pub fn from_env() -> Self {
        Self::from_build().with_overrides(|key: &str| std::env::var(key).ok())
    }

    /// Apply `UDP_LOG_*` overrides from `lookup`
    ///
    /// Setting a non-zero port without an explicit enable flag enables the
    /// forwarder. Unparseable values are ignored with a warning.
    pub fn with_overrides<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(host) = lookup(ENV_HOST).filter(|h| !h.trim().is_empty()) {
            self.host = host.trim().to_string();
        }

        if let Some(raw) = lookup(ENV_PORT) {
            match raw.trim().parse::<u16>() {
                Ok(port) => {
                    self.port = port;
                    self.enabled = port != DISABLED_PORT;
                }
                Err(e) => warn!("Ignoring {}={:?}: {}", ENV_PORT, raw, e),
            }
        }

        if let Some(raw) = lookup(ENV_ENABLED) {
            match parse_flag(&raw) {
                Some(flag) => self.enabled = flag,
                None => warn!("Ignoring {}={:?}: not a boolean", ENV_ENABLED, raw),
            }
        }

        self
    }

    /// Whether lines should actually be forwarded
    pub fn is_active(&self) -> bool {
        self.enabled && self.port != DISABLED_PORT
    }

    /// Check an active config can be used to build a forwarder
    pub fn validate(&self) -> Result<()> {
        if !self.is_active() {
            return Ok(());
        }
        if self.host.trim().is_empty() {
            return Err(ForwarderError::ConfigValidation {
                field: "host",
                reason: "empty host".into(),
            });
        }
        if self.host.chars().any(char::is_whitespace) {
            return Err(ForwarderError::ConfigValidation {
                field: "host",
                reason: format!("'{}' contains whitespace", self.host),
            });
        }
        Ok(())
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

// =============================================================================
// Loading
// =============================================================================

/// Parse a TOML config document
pub fn parse(content: &str, path: &Path) -> Result<Config> {
    toml::from_str(content).map_err(|e| ForwarderError::ConfigParse {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })
}

/// Load config from a TOML file
pub fn load(path: &Path) -> Result<Config> {
    let content = fs::read_to_string(path).map_err(|e| ForwarderError::ConfigRead {
        path: path.to_path_buf(),
        source: e,
    })?;
    parse(&content, path)
}

// ============================================================================
// Tests
// ============================================================================
