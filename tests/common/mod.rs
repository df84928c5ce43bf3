//! Shared helpers for integration tests

#![allow(dead_code)]

use std::io;
use std::net::UdpSocket;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing::subscriber::DefaultGuard;

/// Localhost receiver standing in for the remote collector
pub struct Collector {
    socket: UdpSocket,
}

impl Collector {
    pub fn bind() -> Self {
        let socket = UdpSocket::bind("127.0.0.1:0").unwrap();
        socket
            .set_read_timeout(Some(Duration::from_secs(2)))
            .unwrap();
        Self { socket }
    }

    pub fn port(&self) -> u16 {
        self.socket.local_addr().unwrap().port()
    }

    /// Next datagram as text with the sender's port
    pub fn recv(&self) -> (String, u16) {
        let mut buf = [0u8; 65536];
        let (len, from) = self.socket.recv_from(&mut buf).expect("datagram");
        (String::from_utf8(buf[..len].to_vec()).unwrap(), from.port())
    }

    pub fn recv_line(&self) -> String {
        self.recv().0
    }

    /// True if nothing arrives within `wait`
    pub fn is_silent(&self, wait: Duration) -> bool {
        self.socket.set_read_timeout(Some(wait)).unwrap();
        let mut buf = [0u8; 64];
        let silent = self.socket.recv_from(&mut buf).is_err();
        self.socket
            .set_read_timeout(Some(Duration::from_secs(2)))
            .unwrap();
        silent
    }
}

/// In-memory sink for tracing output
#[derive(Clone, Default)]
pub struct Captured(Arc<Mutex<Vec<u8>>>);

impl Captured {
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

impl io::Write for Captured {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Capture debug-level events emitted on the current thread
pub fn capture_logs() -> (Captured, DefaultGuard) {
    let captured = Captured::default();
    let writer = captured.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_ansi(false)
        .with_writer(move || writer.clone())
        .finish();
    (captured, tracing::subscriber::set_default(subscriber))
}
