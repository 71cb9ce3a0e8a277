//! Remote control for the tev image viewer.
//!
//! tevlink drives a running tev instance over its TCP control protocol: open,
//! reload and close image files, create images from memory, stream pixel data
//! into them, and draw vector-graphics overlays on top.
//!
//! # Crate Structure
//!
//! - [`transport`]: Byte-stream transport and process network bootstrap
//! - [`frame`]: Packet encoding, channel layouts, vector-graphics commands
//! - [`client`]: Session-level command facade (behind `client` feature)
//!
//! ```no_run
//! use tevlink::client::{Client, ClientConfig};
//!
//! let mut tev = Client::connect_to(&ClientConfig::default())?;
//! tev.open_image("/tmp/render.exr", "", true)?;
//! # Ok::<(), tevlink::client::ClientError>(())
//! ```

/// Re-export transport types.
pub mod transport {
    pub use tevlink_transport::*;
}

/// Re-export frame types.
pub mod frame {
    pub use tevlink_frame::*;
}

/// Re-export client types (requires `client` feature).
#[cfg(feature = "client")]
pub mod client {
    pub use tevlink_client::*;
}
