//! Byte-stream transport for the tev remote-control protocol.
//!
//! This is the lowest layer of tevlink. It provides:
//! - the [`Transport`] trait the client session sends frames through
//! - [`TcpTransport`], the conventional TCP implementation
//! - [`NetworkBootstrap`], the process-wide, reference-counted network setup
//!
//! Frames handed to a transport are sent whole or not at all from the caller's
//! point of view; partial sends surface as errors.

pub mod bootstrap;
pub mod error;
pub mod tcp;
pub mod traits;

pub use bootstrap::{BootstrapLease, NetworkBootstrap, NetworkSubsystem, PlatformNetwork};
pub use error::{Result, TransportError};
pub use tcp::{TcpTransport, DEFAULT_HOST, DEFAULT_PORT};
pub use traits::Transport;
