use crate::kind::PacketKind;
use crate::vg::VgKind;

/// Errors that can occur while encoding or decoding frames.
#[derive(Debug, thiserror::Error)]
pub enum FrameError {
    /// Image or region width/height is zero.
    #[error("image width and height must be greater than 0 (got {width}x{height})")]
    EmptyImage { width: u32, height: u32 },

    /// A dimension or count does not fit the 32-bit signed wire field.
    #[error("{field} {value} exceeds the 32-bit wire range")]
    DimensionOutOfRange { field: &'static str, value: u64 },

    /// The channel list is empty.
    #[error("image must have at least one channel")]
    NoChannels,

    /// Defaults only cover R, G, B, A.
    #[error("channel names, offsets, and strides cannot be inferred for images with more than 4 channels (got {0})")]
    CannotInferChannels(usize),

    /// Explicit names/offsets/strides disagree with the channel count.
    #[error("channel layout mismatch: {count} channels but {names} names, {offsets} offsets, {strides} strides")]
    ChannelLayoutMismatch {
        count: usize,
        names: usize,
        offsets: usize,
        strides: usize,
    },

    /// Explicit channel names disagree with the channel count.
    #[error("channel count is {count} but {names} channel names were given")]
    ChannelNameCount { count: usize, names: usize },

    /// Offsets and strides address forward into the buffer only.
    #[error("channel {channel}: offset {offset} and stride {stride} must not be negative")]
    NegativeLayout {
        channel: String,
        offset: i64,
        stride: i64,
    },

    /// The pixel buffer is not exactly as long as the channel layout requires.
    #[error("image data size does not match specified dimensions, offset, and stride (expected {expected} floats, got {actual})")]
    PixelDataSize { expected: usize, actual: usize },

    /// The channel layout addresses more samples than fit in memory.
    #[error("channel layout overflows the addressable buffer size")]
    LayoutOverflow,

    /// Strings are nul-terminated on the wire, so they cannot contain nul.
    #[error("{field} contains an interior nul byte")]
    InteriorNul { field: &'static str },

    /// A vector-graphics payload length disagrees with its command kind.
    #[error("{kind:?} takes {expected} payload floats, got {actual}")]
    VgPayloadLength {
        kind: VgKind,
        expected: usize,
        actual: usize,
    },

    /// The encoded frame does not fit the 32-bit length prefix.
    #[error("frame too large ({size} bytes, max {max})")]
    FrameTooLarge { size: usize, max: usize },

    /// The frame ended in the middle of a field.
    #[error("frame truncated ({needed} more bytes needed)")]
    Truncated { needed: usize },

    /// The length prefix cannot describe a valid frame.
    #[error("invalid frame length {declared}")]
    InvalidLength { declared: usize },

    /// The length prefix disagrees with the number of bytes in the frame.
    #[error("length prefix {declared} does not match frame size {actual}")]
    LengthMismatch { declared: usize, actual: usize },

    /// The packet kind byte is not in the catalog.
    #[error("unknown packet kind {0}")]
    UnknownPacketKind(u8),

    /// The packet kind is only understood by older viewers and is never emitted.
    #[error("packet kind {0:?} is reserved for legacy viewers")]
    LegacyPacket(PacketKind),

    /// The vector-graphics command tag is not in the catalog.
    #[error("unknown vector graphics command {0}")]
    UnknownVgCommand(i8),

    /// A string ran to the end of the frame without a terminator.
    #[error("string field is missing its nul terminator")]
    UnterminatedString,

    /// A string field is not UTF-8.
    #[error("string field is not valid UTF-8: {0}")]
    InvalidUtf8(#[from] std::str::Utf8Error),

    /// Bytes remained after the last field of the packet.
    #[error("{0} trailing bytes after packet payload")]
    TrailingBytes(usize),

    /// An I/O error occurred while reading frames.
    #[error("frame I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The stream closed before a complete frame was received.
    #[error("connection closed (incomplete frame)")]
    ConnectionClosed,
}

impl FrameError {
    /// Whether this error rejects caller-supplied arguments (as opposed to a
    /// malformed or unreadable frame).
    pub fn is_argument_error(&self) -> bool {
        matches!(
            self,
            FrameError::EmptyImage { .. }
                | FrameError::DimensionOutOfRange { .. }
                | FrameError::NoChannels
                | FrameError::CannotInferChannels(_)
                | FrameError::ChannelLayoutMismatch { .. }
                | FrameError::ChannelNameCount { .. }
                | FrameError::NegativeLayout { .. }
                | FrameError::PixelDataSize { .. }
                | FrameError::LayoutOverflow
                | FrameError::InteriorNul { .. }
                | FrameError::VgPayloadLength { .. }
                | FrameError::FrameTooLarge { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, FrameError>;
