//! Command-line interface definition using clap
//!
//! Provides structured argument parsing with automatic help generation.

use clap::Parser;
use std::path::PathBuf;

// =============================================================================
// CLI Definition
// =============================================================================

/// Forward log lines to a UDP collector
///
/// Sends MESSAGE, or each line read from stdin when no MESSAGE is given.
#[derive(Parser, Debug, Default)]
#[command(name = "udplog")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose debug output
    #[arg(short, long)]
    pub verbose: bool,

    /// TOML config file with a [forwarder] table (default: build-time/env values)
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Collector host (overrides config)
    #[arg(long, value_name = "HOST")]
    pub host: Option<String>,

    /// Collector UDP port, 0 disables (overrides config)
    #[arg(short, long, value_name = "PORT")]
    pub port: Option<u16>,

    /// Don't send anything
    #[arg(long)]
    pub disabled: bool,

    /// Tag prefixed to every line as "TAG: "
    #[arg(short, long, value_name = "TAG")]
    pub tag: Option<String>,

    /// Message to send (words are joined with spaces)
    #[arg(value_name = "MESSAGE", trailing_var_arg = true)]
    pub message: Vec<String>,
}

// =============================================================================
// Tests
// =============================================================================
