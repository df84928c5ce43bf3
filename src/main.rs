//! udplog - send log lines to a UDP collector
//!
//! Usage:
//!   udplog --host 10.0.2.2 --port 64000 -t MyApp "call started"
//!   some-command | udplog --port 64000 -t MyApp
//!   udplog --config udp-log.toml

mod cli;

use clap::Parser;
use cli::Cli;
use std::io::{self, BufRead};
use std::process::ExitCode;
use tracing::{debug, warn};
use udp_log::{config, global, ForwarderConfig, Result};

fn main() -> ExitCode {
    let cli = Cli::parse();
    udp_log::logging::init_tracing(cli.verbose);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("udplog: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<()> {
    let config = resolve_config(cli)?;
    config.validate()?;
    global::configure(config);

    let tag = cli.tag.as_deref();
    if cli.message.is_empty() {
        forward_lines(io::stdin().lock(), |line| forward(tag, line));
    } else {
        forward(tag, &cli.message.join(" "));
    }

    global::shutdown();
    if let Some(stats) = global::stats() {
        debug!(
            "{} sent, {} dropped, {} bytes",
            stats.sent, stats.dropped, stats.bytes_sent
        );
    }
    Ok(())
}

/// Config file (or build/env defaults) with command-line overrides applied
fn resolve_config(cli: &Cli) -> Result<ForwarderConfig> {
    let mut config = match &cli.config {
        Some(path) => config::load(path)?.forwarder,
        None => ForwarderConfig::from_env(),
    };

    if let Some(host) = &cli.host {
        config.host = host.clone();
    }
    if let Some(port) = cli.port {
        config.port = port;
        config.enabled = true;
    }
    if cli.disabled {
        config.enabled = false;
    }
    Ok(config)
}

/// Hand each input line to `sink` until EOF or a read error
///
/// Lines are split on `\n` (a trailing `\r` is removed too) and decoded
/// lossily, so invalid UTF-8 never ends the stream.
fn forward_lines<R: BufRead>(mut reader: R, mut sink: impl FnMut(&str)) {
    let mut buf = Vec::new();
    loop {
        buf.clear();
        match reader.read_until(b'\n', &mut buf) {
            Ok(0) => break,
            Ok(_) => {
                if buf.last() == Some(&b'\n') {
                    buf.pop();
                    if buf.last() == Some(&b'\r') {
                        buf.pop();
                    }
                }
                sink(&String::from_utf8_lossy(&buf));
            }
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => {
                warn!("Stopped reading stdin: {}", e);
                break;
            }
        }
    }
}

fn forward(tag: Option<&str>, message: &str) {
    match tag {
        Some(tag) => global::send(tag, message),
        None => global::send_untagged(message),
    }
}
