//! Fire-and-forget UDP log forwarding
//!
//! Sends text log lines as UDP datagrams to a remote collector from a single
//! background worker. Callers never block on the network and never see an
//! error; lost lines are simply lost.
//!
//! - [`global`]: process-wide lazily-initialized forwarder (`send`, `shutdown`)
//! - [`UdpLogForwarder`]: owned instance for embedding or tests
//! - [`ForwarderConfig`]: build-time, environment or TOML configuration

pub mod config;
pub mod constants;
pub mod error;
pub mod forwarder;
pub mod global;
pub mod line;
pub mod logging;
pub mod stats;

pub use config::{Config, ForwarderConfig};
pub use error::{ForwarderError, Result};
pub use forwarder::UdpLogForwarder;
pub use global::{send, send_untagged, shutdown};
pub use line::LogLine;
pub use stats::StatsSnapshot;
