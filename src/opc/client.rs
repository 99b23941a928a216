//! TCP client for the controller process
//!
//! Owns at most one connection to the controller. Connection handling is
//! lazy: the first `send` dials, and any transport failure tears the
//! connection down so the next `send` re-dials. The client never retries
//! within a single `send` and never blocks waiting for a reply (the
//! set-pixel-colors command has none).
//!
//! The client is not internally synchronized; callers sharing one instance
//! across threads must serialize access themselves.

use crate::color::Color;
use crate::opc::packet;
use crate::opc::FrameSink;
use log::{debug, warn};
use std::io::Write;
use std::net::TcpStream;

/// Streaming client holding the one live connection to the controller
pub struct OpcClient {
    addr: String,
    stream: Option<TcpStream>,
}

impl OpcClient {
    /// Create a client for the given controller endpoint. Does not connect;
    /// the first `send` does.
    pub fn new(host: &str, port: u16) -> Self {
        OpcClient {
            addr: format!("{}:{}", host, port),
            stream: None,
        }
    }

    /// Controller endpoint this client talks to
    pub fn addr(&self) -> &str {
        &self.addr
    }

    /// Whether a connection is currently held
    pub fn is_connected(&self) -> bool {
        self.stream.is_some()
    }

    /// Dial the controller if no connection is held.
    pub fn connect(&mut self) -> std::io::Result<()> {
        if self.stream.is_none() {
            let stream = TcpStream::connect(&self.addr)?;
            // Frames are small and latency-sensitive; don't let Nagle batch them.
            stream.set_nodelay(true)?;
            debug!("Connected to controller at {}", self.addr);
            self.stream = Some(stream);
        }
        Ok(())
    }

    fn write_frame(&mut self, bytes: &[u8]) -> std::io::Result<()> {
        self.connect()?;
        match self.stream.as_mut() {
            Some(stream) => stream.write_all(bytes),
            None => Err(std::io::Error::new(
                std::io::ErrorKind::NotConnected,
                "connection unavailable",
            )),
        }
    }
}

impl FrameSink for OpcClient {
    fn send(&mut self, frame: &[Color], channel: u8) -> bool {
        let bytes = packet::encode(frame, channel);
        match self.write_frame(&bytes) {
            Ok(()) => true,
            Err(e) => {
                warn!("Frame send to {} failed: {}", self.addr, e);
                // Drop the dead connection; the next send re-dials.
                self.stream = None;
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;
    use std::net::TcpListener;
    use std::thread;

    #[test]
    fn test_send_is_lazy_and_writes_encoded_frame() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();

        let reader = thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let mut buf = vec![0u8; 10];
            stream.read_exact(&mut buf).unwrap();
            buf
        });

        let mut client = OpcClient::new("127.0.0.1", port);
        assert!(!client.is_connected());

        let frame = vec![Color::new(255, 0, 170); 2];
        assert!(client.send(&frame, 0));
        assert!(client.is_connected());

        let received = reader.join().unwrap();
        assert_eq!(received, packet::encode(&frame, 0));
    }

    #[test]
    fn test_send_returns_false_when_refused() {
        // Bind then drop to get a port with no listener.
        let port = {
            let listener = TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap().port()
        };

        let mut client = OpcClient::new("127.0.0.1", port);
        assert!(!client.send(&[Color::BLACK], 0));
        // Failed send must not leave a half-open connection behind.
        assert!(!client.is_connected());
    }
}
