//! Process-wide forwarder
//!
//! Lifecycle:
//!
//! ```text
//!   Uninitialized ──first send──► Initializing ──ok──► Ready ──shutdown()──► (closed)
//!                                      │
//!                                      └─disabled / error──► Disabled (terminal)
//! ```
//!
//! Initialization runs inside `OnceLock::get_or_init`, so concurrent first
//! use opens exactly one socket and one worker. Nothing in this module ever
//! returns an error or panics: failures end up in the local log.

use crate::config::ForwarderConfig;
use crate::forwarder::UdpLogForwarder;
use crate::line::LogLine;
use crate::stats::StatsSnapshot;
use std::net::SocketAddr;
use std::sync::OnceLock;
use tracing::{debug, error};

/// Tag used for the forwarder's own diagnostics
const TAG: &str = "UdpLog";

enum State {
    Ready(UdpLogForwarder),
    Disabled,
}

static CONFIG: OnceLock<ForwarderConfig> = OnceLock::new();
static STATE: OnceLock<State> = OnceLock::new();

/// Install the configuration used at first `send`
///
/// Returns `false` if a configuration was already installed or the
/// forwarder is already initialized; the existing one stays in effect.
/// Without this call, `ForwarderConfig::from_env()` is used.
pub fn configure(config: ForwarderConfig) -> bool {
    if STATE.get().is_some() {
        return false;
    }
    CONFIG.set(config).is_ok()
}

/// Send `"<tag>: <message>\n"` to the configured collector
pub fn send(tag: &str, message: &str) {
    dispatch(message, || LogLine::tagged(tag, message));
}

/// Send `"<message>\n"` to the configured collector
pub fn send_untagged(message: &str) {
    dispatch(message, || LogLine::untagged(message));
}

fn dispatch(message: &str, line: impl FnOnce() -> LogLine) {
    match state() {
        State::Ready(forwarder) => forwarder.enqueue(line()),
        State::Disabled => {
            debug!(target: TAG, "Logger isn't enabled, skip message: {}", message);
        }
    }
}

fn state() -> &'static State {
    STATE.get_or_init(|| {
        let config = CONFIG.get_or_init(ForwarderConfig::from_env);
        initialize(config)
    })
}

fn initialize(config: &ForwarderConfig) -> State {
    if !config.is_active() {
        debug!(target: TAG, "UDP log disabled by configuration");
        return State::Disabled;
    }

    match UdpLogForwarder::spawn(config) {
        Ok(forwarder) => State::Ready(forwarder),
        Err(e) => {
            error!(target: TAG, "Can't initialize UdpLog: {}", e);
            State::Disabled
        }
    }
}

/// Drain pending lines, stop the worker and close the socket
///
/// Explicit teardown hook for process exit. Statics are never dropped, so
/// without this call queued lines may be lost when the process ends. Later
/// sends are dropped silently.
pub fn shutdown() {
    if let Some(State::Ready(forwarder)) = STATE.get() {
        forwarder.shutdown();
    }
}

/// The running forwarder, if initialized and enabled
pub fn forwarder() -> Option<&'static UdpLogForwarder> {
    match STATE.get() {
        Some(State::Ready(forwarder)) => Some(forwarder),
        _ => None,
    }
}

/// True once initialization ended in the Disabled state
pub fn is_disabled() -> bool {
    matches!(STATE.get(), Some(State::Disabled))
}

/// Local address of the shared socket
pub fn local_addr() -> Option<SocketAddr> {
    forwarder().map(UdpLogForwarder::local_addr)
}

pub fn stats() -> Option<StatsSnapshot> {
    forwarder().map(UdpLogForwarder::stats)
}

/// Format and send through the process-wide forwarder
///
/// ```ignore
/// udp_log!("RNCK:Call", "state changed to {}", state);
/// ```
#[macro_export]
macro_rules! udp_log {
    ($tag:expr, $($arg:tt)*) => {
        $crate::global::send($tag, &format!($($arg)*))
    };
}
