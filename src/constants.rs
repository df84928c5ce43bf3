//! Crate-wide constants
//!
//! Centralized constants to avoid duplication and ensure consistency.

// =============================================================================
// Destination
// =============================================================================

/// Host used when neither the build nor the environment provides one
pub const DEFAULT_HOST: &str = "127.0.0.1";

/// Port 0 is the "disabled" sentinel: nothing can listen there
pub const DISABLED_PORT: u16 = 0;

// =============================================================================
// Environment
// =============================================================================

/// Destination host (build-time via `option_env!`, runtime via `std::env`)
pub const ENV_HOST: &str = "UDP_LOG_HOST";

/// Destination port
pub const ENV_PORT: &str = "UDP_LOG_PORT";

/// Explicit enable flag ("1"/"true"/"yes"/"on" or "0"/"false"/"no"/"off")
pub const ENV_ENABLED: &str = "UDP_LOG_ENABLED";

// =============================================================================
// Worker
// =============================================================================

/// Name of the dedicated transmit thread
pub const WORKER_THREAD_NAME: &str = "udp-log";

/// Line terminator appended to every forwarded line
pub const LINE_TERMINATOR: char = '\n';

/// Separator between tag and message
pub const TAG_SEPARATOR: &str = ": ";
