use std::io::{ErrorKind, Write};

use crate::error::{Result, TransportError};

/// A reliable, ordered byte stream to the viewer.
///
/// The client session owns exactly one transport and is its only user. Implementations
/// must either hand every byte of a `send_bytes` buffer to the stream or return an error;
/// they never report success for a partial send.
pub trait Transport {
    /// Open the stream. Connecting an already-connected transport is a no-op.
    fn connect(&mut self) -> Result<()>;

    /// Close the stream. Disconnecting an unconnected transport is a no-op.
    fn disconnect(&mut self) -> Result<()>;

    /// Whether the stream is currently open.
    fn is_connected(&self) -> bool;

    /// Send the whole buffer, blocking until it is accepted or the stream fails.
    fn send_bytes(&mut self, buf: &[u8]) -> Result<()>;
}

impl<T: Transport + ?Sized> Transport for Box<T> {
    fn connect(&mut self) -> Result<()> {
        (**self).connect()
    }

    fn disconnect(&mut self) -> Result<()> {
        (**self).disconnect()
    }

    fn is_connected(&self) -> bool {
        (**self).is_connected()
    }

    fn send_bytes(&mut self, buf: &[u8]) -> Result<()> {
        (**self).send_bytes(buf)
    }
}

/// Write `buf` completely to `inner` and flush it.
///
/// Interrupted writes are retried. A zero-length write means the peer is gone and is
/// reported as [`TransportError::ConnectionClosed`] with the number of bytes that made it out.
pub fn send_all<W: Write + ?Sized>(inner: &mut W, buf: &[u8]) -> Result<()> {
    let mut offset = 0usize;
    while offset < buf.len() {
        match inner.write(&buf[offset..]) {
            Ok(0) => {
                return Err(TransportError::ConnectionClosed {
                    sent: offset,
                    len: buf.len(),
                })
            }
            Ok(n) => offset += n,
            Err(err) if err.kind() == ErrorKind::Interrupted => continue,
            Err(err) => return Err(TransportError::Io(err)),
        }
    }

    loop {
        match inner.flush() {
            Ok(()) => return Ok(()),
            Err(err) if err.kind() == ErrorKind::Interrupted => continue,
            Err(err) => return Err(TransportError::Io(err)),
        }
    }
}
