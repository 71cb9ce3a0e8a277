//! Session-level command facade for the tev remote-control protocol.
//!
//! This is the "just works" layer. Create a [`Client`], connect it to a running
//! viewer, and issue commands; every call returns its outcome directly and also
//! records it as the session's last error state.

pub mod client;
pub mod config;
pub mod error;

pub use client::Client;
pub use config::ClientConfig;
pub use error::{ClientError, ErrorKind, Result};
