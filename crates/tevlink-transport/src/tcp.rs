use std::io::ErrorKind;
use std::net::{Shutdown, TcpStream, ToSocketAddrs};
use std::time::Duration;

use tracing::{debug, warn};

use crate::error::{Result, TransportError};
use crate::traits::{send_all, Transport};

/// Host tev listens on unless told otherwise.
pub const DEFAULT_HOST: &str = "127.0.0.1";

/// Port tev listens on unless told otherwise.
pub const DEFAULT_PORT: u16 = 14158;

/// TCP transport to a tev instance.
///
/// Construction never touches the network; the stream is opened by
/// [`Transport::connect`]. Every resolved address is tried in order and the
/// last failure is reported if none accepts.
pub struct TcpTransport {
    host: String,
    port: u16,
    connect_timeout: Option<Duration>,
    write_timeout: Option<Duration>,
    stream: Option<TcpStream>,
}

impl TcpTransport {
    /// Create an unconnected transport for `host:port`.
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            connect_timeout: None,
            write_timeout: None,
            stream: None,
        }
    }

    /// Bound each connection attempt. `None` uses the OS default.
    pub fn with_connect_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Bound each blocking write. `None` blocks indefinitely.
    pub fn with_write_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.write_timeout = timeout;
        self
    }

    /// `host:port`, with IPv6 literals bracketed.
    pub fn addr(&self) -> String {
        if self.host.contains(':') && !self.host.starts_with('[') {
            format!("[{}]:{}", self.host, self.port)
        } else {
            format!("{}:{}", self.host, self.port)
        }
    }

    fn open_stream(&self) -> Result<TcpStream> {
        let host = self.host.trim_start_matches('[').trim_end_matches(']');
        let addrs = (host, self.port)
            .to_socket_addrs()
            .map_err(|source| TransportError::Resolve {
                addr: self.addr(),
                source,
            })?;

        let mut last_err = None;
        for addr in addrs {
            let attempt = match self.connect_timeout {
                Some(timeout) => TcpStream::connect_timeout(&addr, timeout),
                None => TcpStream::connect(addr),
            };
            match attempt {
                Ok(stream) => {
                    debug!(%addr, "connected to tev");
                    return Ok(stream);
                }
                Err(err) => {
                    debug!(%addr, error = %err, "connect attempt failed");
                    last_err = Some(err);
                }
            }
        }

        Err(TransportError::Connect {
            addr: self.addr(),
            source: last_err.unwrap_or_else(|| {
                std::io::Error::new(ErrorKind::NotFound, "host resolved to no addresses")
            }),
        })
    }
}

impl Default for TcpTransport {
    fn default() -> Self {
        Self::new(DEFAULT_HOST, DEFAULT_PORT)
    }
}

impl Transport for TcpTransport {
    fn connect(&mut self) -> Result<()> {
        if self.stream.is_some() {
            return Ok(());
        }

        let stream = self.open_stream()?;
        stream.set_nodelay(true)?;
        stream.set_write_timeout(self.write_timeout)?;
        self.stream = Some(stream);
        Ok(())
    }

    fn disconnect(&mut self) -> Result<()> {
        let Some(stream) = self.stream.take() else {
            return Ok(());
        };

        match stream.shutdown(Shutdown::Both) {
            Ok(()) => {}
            // The viewer already hung up; the socket is closed either way.
            Err(err) if err.kind() == ErrorKind::NotConnected => {}
            Err(err) => return Err(TransportError::Io(err)),
        }
        debug!(addr = %self.addr(), "disconnected from tev");
        Ok(())
    }

    fn is_connected(&self) -> bool {
        self.stream.is_some()
    }

    fn send_bytes(&mut self, buf: &[u8]) -> Result<()> {
        let stream = self.stream.as_mut().ok_or(TransportError::NotConnected)?;

        if let Err(err) = send_all(stream, buf) {
            // A partially written frame leaves the stream unusable for the viewer.
            warn!(addr = %self.addr(), error = %err, "send failed, dropping connection");
            self.stream = None;
            return Err(err);
        }
        Ok(())
    }
}

impl std::fmt::Debug for TcpTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TcpTransport")
            .field("addr", &self.addr())
            .field("connected", &self.stream.is_some())
            .finish()
    }
}
