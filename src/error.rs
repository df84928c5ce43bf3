//! Centralized error types for the forwarder
//!
//! All forwarder errors are represented by the `ForwarderError` enum.
//! Use `Result<T>` as shorthand for `std::result::Result<T, ForwarderError>`.
//!
//! None of these ever reach callers of `global::send`: they are returned by
//! the construction APIs and otherwise only written to the local log.

use std::fmt;
use std::net::SocketAddr;
use std::path::PathBuf;

/// All forwarder errors
#[derive(Debug)]
pub enum ForwarderError {
    // === Configuration ===
    /// Invalid config value
    ConfigValidation { field: &'static str, reason: String },
    /// Config file could not be read
    ConfigRead {
        path: PathBuf,
        source: std::io::Error,
    },
    /// Config file is not valid TOML for this schema
    ConfigParse { path: PathBuf, reason: String },

    // === Resolution ===
    /// Destination host lookup failed
    Resolve {
        host: String,
        source: std::io::Error,
    },
    /// Destination host resolved to nothing
    NoAddress { host: String },

    // === Network ===
    /// Failed to create or bind the outbound UDP socket
    SocketBind {
        addr: SocketAddr,
        source: std::io::Error,
    },
    /// Failed to send one datagram
    Transmit {
        addr: SocketAddr,
        source: std::io::Error,
    },

    // === Worker ===
    /// Tokio runtime creation failed
    Runtime { source: std::io::Error },
    /// Worker thread could not be started
    WorkerSpawn { source: std::io::Error },
    /// Forwarder was shut down; line not queued
    Closed,
}

impl std::error::Error for ForwarderError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::ConfigRead { source, .. }
            | Self::Resolve { source, .. }
            | Self::SocketBind { source, .. }
            | Self::Transmit { source, .. }
            | Self::Runtime { source }
            | Self::WorkerSpawn { source } => Some(source),
            _ => None,
        }
    }
}

impl fmt::Display for ForwarderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ConfigValidation { field, reason } => {
                write!(f, "Invalid {}: {}", field, reason)
            }
            Self::ConfigRead { path, source } => {
                write!(f, "Cannot read config {}: {}", path.display(), source)
            }
            Self::ConfigParse { path, reason } => {
                write!(f, "Invalid config {}: {}", path.display(), reason)
            }
            Self::Resolve { host, source } => {
                write!(f, "Cannot resolve host {}: {}", host, source)
            }
            Self::NoAddress { host } => write!(f, "No address found for host {}", host),
            Self::SocketBind { addr, source } => {
                write!(f, "Cannot bind UDP socket on {}: {}", addr, source)
            }
            Self::Transmit { addr, source } => {
                write!(f, "Can't send UDP message to {}: {}", addr, source)
            }
            Self::Runtime { source } => write!(f, "Failed to create runtime: {}", source),
            Self::WorkerSpawn { source } => {
                write!(f, "Failed to start worker thread: {}", source)
            }
            Self::Closed => write!(f, "Forwarder is shut down"),
        }
    }
}

/// Alias for Result with ForwarderError
pub type Result<T> = std::result::Result<T, ForwarderError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;
    use std::io;

    #[test]
    fn test_display_includes_context() {
        let err = ForwarderError::Resolve {
            host: "collector.invalid".into(),
            source: io::Error::new(io::ErrorKind::Other, "lookup failed"),
        };
        let text = err.to_string();
        assert!(text.contains("collector.invalid"));
        assert!(text.contains("lookup failed"));
    }

    #[test]
    fn test_source_chain() {
        let err = ForwarderError::Transmit {
            addr: "127.0.0.1:9".parse().unwrap(),
            source: io::Error::new(io::ErrorKind::Other, "unreachable"),
        };
        assert!(err.source().is_some());
        assert!(ForwarderError::Closed.source().is_none());
        assert!(ForwarderError::NoAddress { host: "x".into() }
            .source()
            .is_none());
    }
}
