//! Packet kinds.
//!
//! The viewer dispatches on the raw tag byte, so values are frozen in order of
//! introduction and never renumbered. Superseded encodings of "open" and "update"
//! keep their numbers reserved; only the newest variant of each is emitted.

use crate::error::FrameError;

#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PacketKind {
    /// Open by path with the channel selector folded into the path. Legacy.
    OpenImage = 0,
    ReloadImage = 1,
    CloseImage = 2,
    /// Single-channel update. Legacy.
    UpdateImage = 3,
    CreateImage = 4,
    /// Multi-channel, tightly interleaved update. Legacy.
    UpdateImageMultiChannel = 5,
    /// Update with per-channel offsets and strides.
    UpdateImageStrided = 6,
    /// Open with a separate channel selector string.
    OpenImageWithSelector = 7,
    VectorGraphics = 8,
}

impl PacketKind {
    /// Every kind in tag order.
    pub const ALL: [PacketKind; 9] = [
        PacketKind::OpenImage,
        PacketKind::ReloadImage,
        PacketKind::CloseImage,
        PacketKind::UpdateImage,
        PacketKind::CreateImage,
        PacketKind::UpdateImageMultiChannel,
        PacketKind::UpdateImageStrided,
        PacketKind::OpenImageWithSelector,
        PacketKind::VectorGraphics,
    ];

    pub fn as_u8(self) -> u8 {
        self as u8
    }

    pub fn from_u8(tag: u8) -> Option<Self> {
        Self::ALL.get(usize::from(tag)).copied()
    }

    /// Returns true if the kind is reserved for older viewers and never emitted.
    pub fn is_legacy(self) -> bool {
        matches!(
            self,
            PacketKind::OpenImage | PacketKind::UpdateImage | PacketKind::UpdateImageMultiChannel
        )
    }

    /// Returns a human-readable name for the kind.
    pub fn name(self) -> &'static str {
        match self {
            PacketKind::OpenImage => "open-image-v1",
            PacketKind::ReloadImage => "reload-image",
            PacketKind::CloseImage => "close-image",
            PacketKind::UpdateImage => "update-image-v1",
            PacketKind::CreateImage => "create-image",
            PacketKind::UpdateImageMultiChannel => "update-image-v2",
            PacketKind::UpdateImageStrided => "update-image",
            PacketKind::OpenImageWithSelector => "open-image",
            PacketKind::VectorGraphics => "vector-graphics",
        }
    }
}

impl TryFrom<u8> for PacketKind {
    type Error = FrameError;

    fn try_from(tag: u8) -> Result<Self, Self::Error> {
        Self::from_u8(tag).ok_or(FrameError::UnknownPacketKind(tag))
    }
}
