//! Length-prefixed packet encoding for the tev remote-control protocol.
//!
//! This is the core of tevlink. Every message sent to the viewer is one frame:
//! - a 4-byte native-endian total length (prefix included)
//! - a 1-byte [`PacketKind`] tag
//! - the kind-specific payload
//!
//! All validation happens before the first byte is written, so an encode either
//! yields a complete [`Frame`] or an error; there are no partial frames.

pub mod codec;
pub mod error;
pub mod kind;
pub mod layout;
pub mod packet;
pub mod reader;
pub mod vg;
pub mod writer;

pub use codec::{decode_frame, Frame, LENGTH_PREFIX_SIZE, MAX_FRAME_SIZE};
pub use error::{FrameError, Result};
pub use kind::PacketKind;
pub use layout::{
    default_channel_names, interleaved_channels, required_data_len, resolve_channel_names,
    resolve_channels, ChannelDescriptor, ImageRegion, DEFAULT_CHANNEL_NAMES,
};
pub use packet::{
    encode_close_image, encode_create_image, encode_open_image, encode_reload_image,
    encode_update_image, encode_vector_graphics, Packet,
};
pub use reader::{ByteReader, FrameReader};
pub use vg::{Color, Pos, Size, VgCommand, VgKind, Winding, MAX_VG_PAYLOAD};
pub use writer::{ByteWriter, WireScalar};
