use std::fmt;

use tevlink_frame::FrameError;
use tevlink_transport::TransportError;

/// Errors that can occur in session operations.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// The session has no connection and does not connect implicitly.
    #[error("not connected to the viewer")]
    NotConnected,

    /// Transport-level error (resolution, connect, or send).
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    /// A caller-supplied argument was rejected before any byte was sent.
    #[error("invalid argument: {0}")]
    Argument(#[from] FrameError),

    /// The viewer address string could not be parsed.
    #[error("invalid viewer address {0:?}")]
    InvalidAddress(String),
}

impl ClientError {
    /// The coarse failure category of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            ClientError::NotConnected | ClientError::Transport(TransportError::NotConnected) => {
                ErrorKind::NotConnected
            }
            ClientError::Transport(_) => ErrorKind::TransportError,
            ClientError::Argument(_) | ClientError::InvalidAddress(_) => ErrorKind::ArgumentError,
        }
    }
}

/// Outcome category recorded as a session's last error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ErrorKind {
    #[default]
    Ok,
    NotConnected,
    TransportError,
    ArgumentError,
}

impl ErrorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorKind::Ok => "ok",
            ErrorKind::NotConnected => "not-connected",
            ErrorKind::TransportError => "transport-error",
            ErrorKind::ArgumentError => "argument-error",
        }
    }

    pub fn is_ok(self) -> bool {
        self == ErrorKind::Ok
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub type Result<T> = std::result::Result<T, ClientError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_follow_error_source() {
        assert_eq!(ClientError::NotConnected.kind(), ErrorKind::NotConnected);
        assert_eq!(
            ClientError::from(TransportError::NotConnected).kind(),
            ErrorKind::NotConnected
        );
        assert_eq!(
            ClientError::from(TransportError::ConnectionClosed { sent: 3, len: 9 }).kind(),
            ErrorKind::TransportError
        );
        assert_eq!(
            ClientError::from(FrameError::NoChannels).kind(),
            ErrorKind::ArgumentError
        );
        assert_eq!(
            ClientError::InvalidAddress("::x".into()).kind(),
            ErrorKind::ArgumentError
        );
    }

    #[test]
    fn kind_display() {
        assert_eq!(ErrorKind::default(), ErrorKind::Ok);
        assert_eq!(ErrorKind::ArgumentError.to_string(), "argument-error");
    }
}
