//! UDP log forwarder
//!
//! Owns one outbound UDP socket and one worker thread. Callers format and
//! enqueue lines; the worker is the only one touching the socket.
//!
//! ```text
//!   caller threads            worker thread "udp-log"
//!   ──────────────            ───────────────────────
//!   send(tag, msg)
//!     └─ LogLine ──► unbounded mpsc ──► send_to(dest) ──► UDP datagram
//! ```
//!
//! The worker drives a current-thread tokio runtime of its own, so the
//! forwarder works from hosts that have no runtime at all.

use crate::config::ForwarderConfig;
use crate::constants::WORKER_THREAD_NAME;
use crate::error::{ForwarderError, Result};
use crate::line::LogLine;
use crate::stats::{Stats, StatsSnapshot};
use parking_lot::{Mutex, RwLock};
use socket2::{Domain, Protocol, Socket, Type};
use std::io;
use std::net::{Ipv4Addr, Ipv6Addr, SocketAddr, ToSocketAddrs};
use std::sync::mpsc as std_mpsc;
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use tokio::net::UdpSocket;
use tokio::runtime::Runtime;
use tokio::sync::mpsc;
use tracing::{debug, error, warn};

/// Fire-and-forget UDP log forwarder
///
/// Lines are sent in enqueue order, at most once each. Transmission errors
/// are logged locally and the line is dropped.
///
/// Dropping the forwarder (or calling `shutdown()`) drains the queue, stops
/// the worker and closes the socket.
///
/// # Example
///
/// ```ignore
/// let forwarder = UdpLogForwarder::spawn(&ForwarderConfig::new("127.0.0.1", 64000))?;
/// forwarder.send("RNCK:UdpLog", "hello"); // "RNCK:UdpLog: hello\n"
/// ```
pub struct UdpLogForwarder {
    /// Producer side; `None` once shut down
    tx: RwLock<Option<mpsc::UnboundedSender<LogLine>>>,
    worker: Mutex<Option<JoinHandle<()>>>,
    destination: SocketAddr,
    local_addr: SocketAddr,
    stats: Arc<Stats>,
}

impl UdpLogForwarder {
    /// Validate `config`, resolve its destination once and start the worker
    ///
    /// The config must be active; disabled configs are handled by the caller.
    pub fn spawn(config: &ForwarderConfig) -> Result<Self> {
        config.validate()?;
        if !config.is_active() {
            return Err(ForwarderError::ConfigValidation {
                field: "enabled",
                reason: "forwarder is disabled".into(),
            });
        }
        let destination = resolve(&config.host, config.port)?;
        Self::spawn_to(destination)
    }

    /// Start a forwarder for an already-resolved destination
    pub fn spawn_to(destination: SocketAddr) -> Result<Self> {
        let std_socket = create_outbound_socket(destination)?;
        let local_addr = std_socket
            .local_addr()
            .map_err(|source| ForwarderError::SocketBind {
                addr: unspecified_for(destination),
                source,
            })?;

        let (tx, rx) = mpsc::unbounded_channel::<LogLine>();
        let (ready_tx, ready_rx) = std_mpsc::sync_channel::<Result<()>>(1);
        let stats = Arc::new(Stats::new());
        let worker_stats = stats.clone();

        // The runtime is created and dropped on the worker thread only, so a
        // caller running inside an async context never drops a runtime
        let worker = thread::Builder::new()
            .name(WORKER_THREAD_NAME.to_string())
            .spawn(move || {
                let (runtime, socket) = match start_runtime(std_socket, local_addr) {
                    Ok(started) => {
                        let _ = ready_tx.send(Ok(()));
                        started
                    }
                    Err(e) => {
                        let _ = ready_tx.send(Err(e));
                        return;
                    }
                };
                runtime.block_on(run_worker(socket, destination, rx, worker_stats));
            })
            .map_err(|source| ForwarderError::WorkerSpawn { source })?;

        let started = ready_rx.recv().unwrap_or_else(|_| {
            Err(ForwarderError::WorkerSpawn {
                source: io::Error::new(io::ErrorKind::Other, "worker exited during startup"),
            })
        });
        if let Err(e) = started {
            let _ = worker.join();
            return Err(e);
        }

        debug!("UDP log forwarder {} -> {}", local_addr, destination);

        Ok(Self {
            tx: RwLock::new(Some(tx)),
            worker: Mutex::new(Some(worker)),
            destination,
            local_addr,
            stats,
        })
    }

    /// Queue `"<tag>: <message>\n"`
    pub fn send(&self, tag: &str, message: &str) {
        self.enqueue(LogLine::tagged(tag, message));
    }

    /// Queue `"<message>\n"`
    pub fn send_untagged(&self, message: &str) {
        self.enqueue(LogLine::untagged(message));
    }

    /// Queue a preformatted line, dropping it silently if shut down
    pub fn enqueue(&self, line: LogLine) {
        if let Err(e) = self.try_enqueue(line) {
            debug!("{}, skip message", e);
        }
    }

    /// Queue a preformatted line
    ///
    /// Only fails with `ForwarderError::Closed`. Never waits on the network.
    pub fn try_enqueue(&self, line: LogLine) -> Result<()> {
        let guard = self.tx.read();
        let sent = match guard.as_ref() {
            Some(tx) => tx.send(line).is_ok(),
            None => false,
        };

        if sent {
            self.stats.add_enqueued();
            Ok(())
        } else {
            self.stats.add_dropped();
            Err(ForwarderError::Closed)
        }
    }

    /// Close the queue, wait for queued lines to be sent and release the socket
    ///
    /// Idempotent. Later sends are dropped.
    pub fn shutdown(&self) {
        // Worker exits once the last sender is gone and the queue is empty
        drop(self.tx.write().take());

        if let Some(handle) = self.worker.lock().take() {
            if handle.join().is_err() {
                error!("UDP log worker panicked");
            }
        }
    }

    pub fn is_closed(&self) -> bool {
        self.tx.read().is_none()
    }

    /// Cached destination address
    pub fn destination(&self) -> SocketAddr {
        self.destination
    }

    /// Local address of the outbound socket (OS-assigned port)
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    pub fn stats(&self) -> StatsSnapshot {
        self.stats.snapshot()
    }
}

impl Drop for UdpLogForwarder {
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// Build the worker's runtime and register the socket with its reactor
fn start_runtime(
    std_socket: std::net::UdpSocket,
    local_addr: SocketAddr,
) -> Result<(Runtime, UdpSocket)> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_io()
        .build()
        .map_err(|source| ForwarderError::Runtime { source })?;

    let socket = {
        let _guard = runtime.enter();
        UdpSocket::from_std(std_socket)
    }
    .map_err(|source| ForwarderError::SocketBind {
        addr: local_addr,
        source,
    })?;

    Ok((runtime, socket))
}

/// Worker loop: one datagram per line until the channel closes
async fn run_worker(
    socket: UdpSocket,
    destination: SocketAddr,
    mut rx: mpsc::UnboundedReceiver<LogLine>,
    stats: Arc<Stats>,
) {
    while let Some(line) = rx.recv().await {
        match socket.send_to(line.as_bytes(), destination).await {
            Ok(len) => stats.add_sent(len),
            Err(source) => {
                // Local log only: never loop back into the forwarder
                stats.add_dropped();
                warn!(
                    "{}",
                    ForwarderError::Transmit {
                        addr: destination,
                        source
                    }
                );
            }
        }
    }
    debug!("UDP log worker stopped");
}

/// Resolve `host:port` once, preferring IPv4
pub fn resolve(host: &str, port: u16) -> Result<SocketAddr> {
    let addrs: Vec<SocketAddr> = (host, port)
        .to_socket_addrs()
        .map_err(|source| ForwarderError::Resolve {
            host: host.to_string(),
            source,
        })?
        .collect();

    addrs
        .iter()
        .find(|a| a.is_ipv4())
        .or_else(|| addrs.first())
        .copied()
        .ok_or_else(|| ForwarderError::NoAddress {
            host: host.to_string(),
        })
}

fn unspecified_for(destination: SocketAddr) -> SocketAddr {
    match destination {
        SocketAddr::V4(_) => SocketAddr::from((Ipv4Addr::UNSPECIFIED, 0)),
        SocketAddr::V6(_) => SocketAddr::from((Ipv6Addr::UNSPECIFIED, 0)),
    }
}

/// Create a non-blocking UDP socket on an ephemeral port matching the
/// destination's address family
fn create_outbound_socket(destination: SocketAddr) -> Result<std::net::UdpSocket> {
    let bind_addr = unspecified_for(destination);
    let map_err = |e| ForwarderError::SocketBind {
        addr: bind_addr,
        source: e,
    };

    let socket = Socket::new(
        Domain::for_address(destination),
        Type::DGRAM,
        Some(Protocol::UDP),
    )
    .map_err(map_err)?;
    socket.set_nonblocking(true).map_err(map_err)?;
    socket.bind(&bind_addr.into()).map_err(map_err)?;

    Ok(socket.into())
}
