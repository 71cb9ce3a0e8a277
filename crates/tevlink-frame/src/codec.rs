use bytes::{Bytes, BytesMut};

use crate::error::{FrameError, Result};
use crate::kind::PacketKind;

/// Size of the total-length prefix.
pub const LENGTH_PREFIX_SIZE: usize = 4;

/// Smallest possible frame: prefix plus kind tag.
pub const MIN_FRAME_SIZE: usize = LENGTH_PREFIX_SIZE + 1;

/// Largest frame the 32-bit length prefix can describe.
pub const MAX_FRAME_SIZE: usize = u32::MAX as usize;

/// One complete, immutable wire message.
///
/// Wire format:
/// ```text
/// ┌──────────────┬──────────┬──────────────────────────┐
/// │ Length (4B)  │ Kind(1B) │ Payload                  │
/// │ native-endian│          │ (Length - 5 bytes)       │
/// │ incl. itself │          │                          │
/// └──────────────┴──────────┴──────────────────────────┘
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    kind: PacketKind,
    bytes: Bytes,
}

impl Frame {
    /// Wrap bytes produced by [`ByteWriter`](crate::ByteWriter), whose prefix is
    /// already patched.
    pub(crate) fn from_encoded(kind: PacketKind, bytes: Bytes) -> Self {
        Self { kind, bytes }
    }

    /// Validate and wrap a complete frame received from elsewhere.
    ///
    /// # Panics
    ///
    /// Panics if `bytes` is empty: a frame cannot be built from nothing.
    pub fn from_bytes(bytes: impl Into<Bytes>) -> Result<Self> {
        let bytes = bytes.into();
        assert!(!bytes.is_empty(), "a frame cannot be built from zero bytes");

        if bytes.len() < MIN_FRAME_SIZE {
            return Err(FrameError::Truncated {
                needed: MIN_FRAME_SIZE - bytes.len(),
            });
        }
        let declared = read_prefix(&bytes);
        if declared != bytes.len() {
            return Err(FrameError::LengthMismatch {
                declared,
                actual: bytes.len(),
            });
        }
        let kind = PacketKind::try_from(bytes[LENGTH_PREFIX_SIZE])?;
        Ok(Self { kind, bytes })
    }

    pub fn kind(&self) -> PacketKind {
        self.kind
    }

    /// The whole frame, prefix included.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Everything after the kind tag.
    pub fn payload(&self) -> &[u8] {
        &self.bytes[MIN_FRAME_SIZE..]
    }

    /// The total wire size of this frame.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Always false: a frame holds at least its prefix and kind.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn into_bytes(self) -> Bytes {
        self.bytes
    }
}

fn read_prefix(src: &[u8]) -> usize {
    let mut prefix = [0u8; LENGTH_PREFIX_SIZE];
    prefix.copy_from_slice(&src[..LENGTH_PREFIX_SIZE]);
    u32::from_ne_bytes(prefix) as usize
}

/// Decode a frame from a buffer.
///
/// Returns `Ok(None)` if the buffer doesn't contain a complete frame yet.
/// On success, consumes the frame bytes from the buffer.
pub fn decode_frame(src: &mut BytesMut, max_frame_size: usize) -> Result<Option<Frame>> {
    if src.len() < LENGTH_PREFIX_SIZE {
        return Ok(None); // Need more data
    }

    let declared = read_prefix(src);
    if declared < MIN_FRAME_SIZE {
        return Err(FrameError::InvalidLength { declared });
    }
    if declared > max_frame_size {
        return Err(FrameError::FrameTooLarge {
            size: declared,
            max: max_frame_size,
        });
    }
    if src.len() < declared {
        return Ok(None); // Need more data
    }

    let bytes = src.split_to(declared).freeze();
    Frame::from_bytes(bytes).map(Some)
}

#[cfg(test)]
mod tests {
    use bytes::BufMut;

    use super::*;
    use crate::writer::ByteWriter;

    fn close_frame(name: &str) -> Frame {
        let mut writer = ByteWriter::new(PacketKind::CloseImage);
        writer.put_str("image name", name).unwrap();
        writer.finish().unwrap()
    }

    #[test]
    fn decode_roundtrip() {
        let frame = close_frame("img");
        let mut buf = BytesMut::from(frame.as_bytes());

        let decoded = decode_frame(&mut buf, MAX_FRAME_SIZE).unwrap().unwrap();
        assert_eq!(decoded, frame);
        assert_eq!(decoded.kind(), PacketKind::CloseImage);
        assert_eq!(decoded.payload(), b"img\0");
        assert!(buf.is_empty());
    }

    #[test]
    fn decode_incomplete_prefix() {
        let mut buf = BytesMut::from(&[0x09, 0x00][..]);
        assert!(decode_frame(&mut buf, MAX_FRAME_SIZE).unwrap().is_none());
        assert_eq!(buf.len(), 2);
    }

    #[test]
    fn decode_incomplete_payload() {
        let frame = close_frame("hello");
        let mut buf = BytesMut::from(&frame.as_bytes()[..frame.len() - 2]);
        assert!(decode_frame(&mut buf, MAX_FRAME_SIZE).unwrap().is_none());
    }

    #[test]
    fn decode_multiple_frames() {
        let mut buf = BytesMut::new();
        buf.put_slice(close_frame("first").as_bytes());
        buf.put_slice(close_frame("second").as_bytes());

        let f1 = decode_frame(&mut buf, MAX_FRAME_SIZE).unwrap().unwrap();
        let f2 = decode_frame(&mut buf, MAX_FRAME_SIZE).unwrap().unwrap();
        assert_eq!(f1.payload(), b"first\0");
        assert_eq!(f2.payload(), b"second\0");
        assert!(buf.is_empty());
    }

    #[test]
    fn decode_rejects_impossible_length() {
        let mut buf = BytesMut::new();
        buf.put_u32_ne(3);
        buf.put_u8(0);
        assert!(matches!(
            decode_frame(&mut buf, MAX_FRAME_SIZE),
            Err(FrameError::InvalidLength { declared: 3 })
        ));
    }

    #[test]
    fn decode_enforces_max_size() {
        let frame = close_frame("a-rather-long-image-name");
        let mut buf = BytesMut::from(frame.as_bytes());
        assert!(matches!(
            decode_frame(&mut buf, 8),
            Err(FrameError::FrameTooLarge { max: 8, .. })
        ));
    }

    #[test]
    fn from_bytes_checks_prefix_and_kind() {
        let mut good = BytesMut::new();
        good.put_u32_ne(6);
        good.put_u8(PacketKind::CloseImage.as_u8());
        good.put_u8(0);
        assert!(Frame::from_bytes(good.clone().freeze()).is_ok());

        let mut mismatched = good.clone();
        mismatched.put_u8(0);
        assert!(matches!(
            Frame::from_bytes(mismatched.freeze()),
            Err(FrameError::LengthMismatch {
                declared: 6,
                actual: 7
            })
        ));

        let mut unknown = BytesMut::new();
        unknown.put_u32_ne(5);
        unknown.put_u8(42);
        assert!(matches!(
            Frame::from_bytes(unknown.freeze()),
            Err(FrameError::UnknownPacketKind(42))
        ));

        assert!(matches!(
            Frame::from_bytes(vec![1u8, 0]),
            Err(FrameError::Truncated { needed: 3 })
        ));
    }

    #[test]
    #[should_panic(expected = "zero bytes")]
    fn from_bytes_panics_on_empty_input() {
        let _ = Frame::from_bytes(Vec::<u8>::new());
    }
}
