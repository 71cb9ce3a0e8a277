/// Errors that can occur in transport operations.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// The host name could not be resolved to any socket address.
    #[error("failed to resolve {addr}: {source}")]
    Resolve {
        addr: String,
        source: std::io::Error,
    },

    /// Every resolved address refused or failed the connection attempt.
    #[error("failed to connect to {addr}: {source}")]
    Connect {
        addr: String,
        source: std::io::Error,
    },

    /// An I/O error occurred on the transport stream.
    #[error("transport I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The peer stopped accepting bytes before the whole buffer was sent.
    #[error("connection closed after {sent} of {len} bytes")]
    ConnectionClosed { sent: usize, len: usize },

    /// The transport has no open stream.
    #[error("transport is not connected")]
    NotConnected,

    /// The platform network subsystem failed to initialize.
    #[error("failed to initialize network subsystem: {0}")]
    Init(String),
}

pub type Result<T> = std::result::Result<T, TransportError>;
