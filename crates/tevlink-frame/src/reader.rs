use std::io::{ErrorKind, Read};

use bytes::BytesMut;

use crate::codec::{decode_frame, Frame, MAX_FRAME_SIZE};
use crate::error::{FrameError, Result};

const INITIAL_BUFFER_CAPACITY: usize = 8 * 1024;
const READ_CHUNK_SIZE: usize = 64 * 1024;

/// Cursor over a packet payload, mirroring [`ByteWriter`](crate::ByteWriter).
pub struct ByteReader<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> ByteReader<'a> {
    pub fn new(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    fn take(&mut self, len: usize) -> Result<&'a [u8]> {
        let remaining = self.remaining();
        if remaining < len {
            return Err(FrameError::Truncated {
                needed: len - remaining,
            });
        }
        let bytes = &self.buf[self.pos..self.pos + len];
        self.pos += len;
        Ok(bytes)
    }

    fn take_array<const N: usize>(&mut self) -> Result<[u8; N]> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.take(N)?);
        Ok(out)
    }

    pub fn u8(&mut self) -> Result<u8> {
        Ok(self.take_array::<1>()?[0])
    }

    pub fn i8(&mut self) -> Result<i8> {
        Ok(i8::from_ne_bytes(self.take_array()?))
    }

    /// Any non-zero byte reads as true.
    pub fn bool(&mut self) -> Result<bool> {
        Ok(self.u8()? != 0)
    }

    pub fn u32(&mut self) -> Result<u32> {
        Ok(u32::from_ne_bytes(self.take_array()?))
    }

    pub fn i64(&mut self) -> Result<i64> {
        Ok(i64::from_ne_bytes(self.take_array()?))
    }

    pub fn f32(&mut self) -> Result<f32> {
        Ok(f32::from_ne_bytes(self.take_array()?))
    }

    /// Bytes up to the next nul, which is consumed.
    pub fn str(&mut self) -> Result<&'a str> {
        let rest = &self.buf[self.pos..];
        let end = rest
            .iter()
            .position(|b| *b == 0)
            .ok_or(FrameError::UnterminatedString)?;
        let value = std::str::from_utf8(&rest[..end])?;
        self.pos += end + 1;
        Ok(value)
    }

    pub fn i64_seq(&mut self, count: usize) -> Result<Vec<i64>> {
        (0..count).map(|_| self.i64()).collect()
    }

    /// `count` floats in native byte order.
    pub fn f32_seq(&mut self, count: usize) -> Result<Vec<f32>> {
        let byte_len = count
            .checked_mul(std::mem::size_of::<f32>())
            .ok_or(FrameError::LayoutOverflow)?;
        let bytes = self.take(byte_len)?;
        Ok(bytes
            .chunks_exact(std::mem::size_of::<f32>())
            .map(|chunk| {
                let mut raw = [0u8; 4];
                raw.copy_from_slice(chunk);
                f32::from_ne_bytes(raw)
            })
            .collect())
    }

    pub fn remaining(&self) -> usize {
        self.buf.len() - self.pos
    }

    /// Fail if anything is left after the last field.
    pub fn finish(&self) -> Result<()> {
        match self.remaining() {
            0 => Ok(()),
            extra => Err(FrameError::TrailingBytes(extra)),
        }
    }
}

/// Reads complete frames from any `Read` stream.
///
/// Partial reads are buffered; callers only ever see complete frames.
pub struct FrameReader<T> {
    inner: T,
    buf: BytesMut,
    max_frame_size: usize,
}

impl<T: Read> FrameReader<T> {
    /// Create a new frame reader accepting frames up to the protocol maximum.
    pub fn new(inner: T) -> Self {
        Self::with_max_frame_size(inner, MAX_FRAME_SIZE)
    }

    /// Create a new frame reader with an explicit frame size limit.
    pub fn with_max_frame_size(inner: T, max_frame_size: usize) -> Self {
        Self {
            inner,
            buf: BytesMut::with_capacity(INITIAL_BUFFER_CAPACITY),
            max_frame_size,
        }
    }

    /// Read the next complete frame (blocking).
    ///
    /// Returns `Ok(None)` on a clean EOF between frames and
    /// `Err(FrameError::ConnectionClosed)` on EOF inside a frame.
    pub fn read_frame(&mut self) -> Result<Option<Frame>> {
        loop {
            if let Some(frame) = decode_frame(&mut self.buf, self.max_frame_size)? {
                return Ok(Some(frame));
            }

            let mut chunk = [0u8; READ_CHUNK_SIZE];
            let read = match self.inner.read(&mut chunk) {
                Ok(n) => n,
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) => return Err(FrameError::Io(err)),
            };

            if read == 0 {
                if self.buf.is_empty() {
                    return Ok(None);
                }
                return Err(FrameError::ConnectionClosed);
            }

            self.buf.extend_from_slice(&chunk[..read]);
        }
    }

    /// Borrow the underlying stream.
    pub fn get_ref(&self) -> &T {
        &self.inner
    }

    /// Consume the reader and return the inner stream.
    pub fn into_inner(self) -> T {
        self.inner
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;
    use crate::kind::PacketKind;
    use crate::writer::ByteWriter;

    fn frame_bytes(name: &str) -> Vec<u8> {
        let mut writer = ByteWriter::new(PacketKind::CloseImage);
        writer.put_str("image name", name).unwrap();
        writer.finish().unwrap().as_bytes().to_vec()
    }

    #[test]
    fn reads_fields_in_order() {
        let mut writer = ByteWriter::new(PacketKind::CreateImage);
        writer.put_bool(true).put(7u32).put(-9i64).put(2.5f32).put(-3i8);
        writer.put_str("image name", "név").unwrap();
        writer.put_seq(&[0.5f32, 1.5]);
        let frame = writer.finish().unwrap();

        let mut reader = ByteReader::new(frame.payload());
        assert!(reader.bool().unwrap());
        assert_eq!(reader.u32().unwrap(), 7);
        assert_eq!(reader.i64().unwrap(), -9);
        assert_eq!(reader.f32().unwrap(), 2.5);
        assert_eq!(reader.i8().unwrap(), -3);
        assert_eq!(reader.str().unwrap(), "név");
        assert_eq!(reader.f32_seq(2).unwrap(), vec![0.5, 1.5]);
        reader.finish().unwrap();
    }

    #[test]
    fn truncated_and_trailing_fields() {
        let mut reader = ByteReader::new(&[1, 2]);
        assert!(matches!(
            reader.u32(),
            Err(FrameError::Truncated { needed: 2 })
        ));
        assert_eq!(reader.u8().unwrap(), 1);
        assert!(matches!(reader.finish(), Err(FrameError::TrailingBytes(1))));
    }

    #[test]
    fn unterminated_string() {
        let mut reader = ByteReader::new(b"abc");
        assert!(matches!(
            reader.str(),
            Err(FrameError::UnterminatedString)
        ));
    }

    #[test]
    fn stream_yields_frames_then_none() {
        let mut wire = frame_bytes("one");
        wire.extend(frame_bytes("two"));

        let mut reader = FrameReader::new(Cursor::new(wire));
        let f1 = reader.read_frame().unwrap().unwrap();
        let f2 = reader.read_frame().unwrap().unwrap();
        assert_eq!(f1.payload(), b"one\0");
        assert_eq!(f2.payload(), b"two\0");
        assert!(reader.read_frame().unwrap().is_none());
    }

    #[test]
    fn eof_mid_frame_is_connection_closed() {
        let wire = frame_bytes("cut-short");
        let mut reader = FrameReader::new(Cursor::new(wire[..wire.len() - 3].to_vec()));
        assert!(matches!(
            reader.read_frame(),
            Err(FrameError::ConnectionClosed)
        ));
    }

    #[test]
    fn handles_one_byte_reads() {
        let wire = frame_bytes("slow");
        let mut reader = FrameReader::new(OneByte { data: wire, pos: 0 });
        let frame = reader.read_frame().unwrap().unwrap();
        assert_eq!(frame.payload(), b"slow\0");
    }

    struct OneByte {
        data: Vec<u8>,
        pos: usize,
    }

    impl Read for OneByte {
        fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
            if self.pos >= self.data.len() || buf.is_empty() {
                return Ok(0);
            }
            buf[0] = self.data[self.pos];
            self.pos += 1;
            Ok(1)
        }
    }
}
