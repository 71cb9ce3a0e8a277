use bytes::{BufMut, BytesMut};

use crate::codec::{Frame, LENGTH_PREFIX_SIZE, MAX_FRAME_SIZE};
use crate::error::{FrameError, Result};
use crate::kind::PacketKind;

const INITIAL_BUFFER_CAPACITY: usize = 256;

/// A fixed-width value with a native-endian wire encoding.
pub trait WireScalar: Copy {
    fn put(self, buf: &mut BytesMut);
}

macro_rules! wire_scalar {
    ($($ty:ty => $put:ident),* $(,)?) => {
        $(
            impl WireScalar for $ty {
                fn put(self, buf: &mut BytesMut) {
                    buf.$put(self);
                }
            }
        )*
    };
}

wire_scalar! {
    u8 => put_u8,
    i8 => put_i8,
    u32 => put_u32_ne,
    i32 => put_i32_ne,
    u64 => put_u64_ne,
    i64 => put_i64_ne,
    f32 => put_f32_ne,
}

/// Booleans are one byte: 1 for true, 0 for false.
impl WireScalar for bool {
    fn put(self, buf: &mut BytesMut) {
        buf.put_u8(u8::from(self));
    }
}

/// Accumulates one frame in encounter order.
///
/// The length prefix is written as a placeholder when the writer is created and
/// patched once in [`finish`](Self::finish); nothing else is ever rewritten.
#[derive(Debug)]
pub struct ByteWriter {
    kind: PacketKind,
    buf: BytesMut,
}

impl ByteWriter {
    /// Start a frame of `kind`.
    pub fn new(kind: PacketKind) -> Self {
        Self::with_capacity(kind, INITIAL_BUFFER_CAPACITY)
    }

    /// Start a frame of `kind`, reserving room for `payload` more bytes.
    pub fn with_capacity(kind: PacketKind, payload: usize) -> Self {
        let mut buf = BytesMut::with_capacity(LENGTH_PREFIX_SIZE + 1 + payload);
        buf.put_u32_ne(0);
        buf.put_u8(kind.as_u8());
        Self { kind, buf }
    }

    pub fn put<T: WireScalar>(&mut self, value: T) -> &mut Self {
        value.put(&mut self.buf);
        self
    }

    pub fn put_bool(&mut self, value: bool) -> &mut Self {
        self.put(value)
    }

    /// Raw bytes followed by one nul terminator.
    pub fn put_str(&mut self, field: &'static str, value: &str) -> Result<&mut Self> {
        if value.as_bytes().contains(&0) {
            return Err(FrameError::InteriorNul { field });
        }
        self.buf.put_slice(value.as_bytes());
        self.buf.put_u8(0);
        Ok(self)
    }

    /// Each element by its scalar encoding, with no count prefix.
    pub fn put_seq<T: WireScalar>(&mut self, values: &[T]) -> &mut Self {
        for value in values {
            value.put(&mut self.buf);
        }
        self
    }

    /// Each string nul-terminated, with no count prefix.
    pub fn put_strs<S: AsRef<str>>(&mut self, field: &'static str, values: &[S]) -> Result<&mut Self> {
        for value in values {
            self.put_str(field, value.as_ref())?;
        }
        Ok(self)
    }

    /// Bulk bytes appended verbatim.
    pub fn put_raw(&mut self, bytes: &[u8]) -> &mut Self {
        self.buf.put_slice(bytes);
        self
    }

    /// Bulk floats in native byte order, copied as one block.
    pub fn put_f32_raw(&mut self, values: &[f32]) -> &mut Self {
        self.put_raw(bytemuck::cast_slice(values))
    }

    /// Bytes written so far, prefix and kind included.
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Patch the length prefix and seal the frame.
    pub fn finish(mut self) -> Result<Frame> {
        let size = self.buf.len();
        if size > MAX_FRAME_SIZE {
            return Err(FrameError::FrameTooLarge {
                size,
                max: MAX_FRAME_SIZE,
            });
        }
        self.buf[..LENGTH_PREFIX_SIZE].copy_from_slice(&(size as u32).to_ne_bytes());
        Ok(Frame::from_encoded(self.kind, self.buf.freeze()))
    }
}
