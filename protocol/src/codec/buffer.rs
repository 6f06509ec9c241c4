//! # Byte Cursor
//!
//! A growable byte buffer with a single read/write offset. Every wire type in
//! the crate is written into and read out of one of these.
//!
//! ## Layout rules
//!
//! - Fixed-width integers are big-endian.
//! - Writes past the current capacity grow the buffer to at least twice its
//!   size, so incremental serialization stays amortized O(1) per byte.
//! - Reads past the end of the backing storage fail; nothing is truncated.
//!
//! A `ByteBuffer` owns its storage exclusively. It is not synchronized: share
//! it across threads only behind your own lock.

use super::CodecError;

/// Encodes a signed integer so that small magnitudes of either sign map to
/// small unsigned values: `0 -> 0, -1 -> 1, 1 -> 2, -2 -> 3, ...`.
pub fn zigzag_encode(value: i64) -> u64 {
    ((value << 1) ^ (value >> 63)) as u64
}

/// Inverse of [`zigzag_encode`].
pub fn zigzag_decode(value: u64) -> i64 {
    ((value >> 1) as i64) ^ -((value & 1) as i64)
}

/// Owned byte storage plus a cursor.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ByteBuffer {
    buf: Vec<u8>,
    offset: usize,
}

impl ByteBuffer {
    /// Creates a zero-filled buffer with the given capacity and offset 0.
    pub fn alloc(capacity: usize) -> Self {
        Self {
            buf: vec![0u8; capacity],
            offset: 0,
        }
    }

    /// Wraps existing bytes for reading. The offset starts at 0.
    pub fn from(bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            buf: bytes.into(),
            offset: 0,
        }
    }

    /// Size of the backing storage.
    pub fn capacity(&self) -> usize {
        self.buf.len()
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Moves the cursor. Any position in `[0, capacity]` is valid.
    pub fn set_offset(&mut self, offset: usize) -> Result<(), CodecError> {
        if offset > self.capacity() {
            return Err(CodecError::OffsetOutOfBounds {
                offset,
                capacity: self.capacity(),
            });
        }
        self.offset = offset;
        Ok(())
    }

    pub fn reset_offset(&mut self) -> &mut Self {
        self.offset = 0;
        self
    }

    /// Bytes between the cursor and the end of the storage.
    pub fn remaining(&self) -> usize {
        self.capacity() - self.offset
    }

    /// Everything written so far: the bytes before the cursor.
    pub fn shared_view(&self) -> &[u8] {
        &self.buf[..self.offset]
    }

    /// Consumes the buffer, keeping only the bytes before the cursor.
    pub fn into_vec(mut self) -> Vec<u8> {
        self.buf.truncate(self.offset);
        self.buf
    }

    /// Grows the storage to `max(capacity * 2, new_capacity)`.
    pub fn resize(&mut self, new_capacity: usize) -> &mut Self {
        let new_capacity = new_capacity.max(self.capacity() * 2);
        self.buf.resize(new_capacity, 0);
        self
    }

    /// Ensures the total capacity is at least `capacity`.
    pub fn reserve_exact(&mut self, capacity: usize) -> &mut Self {
        if self.capacity() < capacity {
            self.resize(capacity);
        }
        self
    }

    /// Ensures `additional` bytes can be written at the cursor.
    pub fn reserve(&mut self, additional: usize) -> &mut Self {
        self.reserve_exact(self.offset + additional)
    }

    fn take(&mut self, len: usize) -> Result<&[u8], CodecError> {
        let end = self
            .offset
            .checked_add(len)
            .filter(|end| *end <= self.capacity())
            .ok_or(CodecError::OutOfBounds {
                offset: self.offset,
                len,
                capacity: self.capacity(),
            })?;
        let start = self.offset;
        self.offset = end;
        Ok(&self.buf[start..end])
    }

    fn take_array<const N: usize>(&mut self) -> Result<[u8; N], CodecError> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.take(N)?);
        Ok(out)
    }

    pub fn read_bytes(&mut self, len: usize) -> Result<Vec<u8>, CodecError> {
        self.take(len).map(<[u8]>::to_vec)
    }

    pub fn write_bytes(&mut self, value: &[u8]) -> &mut Self {
        self.reserve(value.len());
        self.buf[self.offset..self.offset + value.len()].copy_from_slice(value);
        self.offset += value.len();
        self
    }

    /// Runs `encode` against a scratch buffer and copies the result in only
    /// when it succeeds. On error this buffer is left exactly as it was.
    pub fn write_staged<E>(
        &mut self,
        encode: impl FnOnce(&mut ByteBuffer) -> Result<(), E>,
    ) -> Result<(), E> {
        let mut scratch = ByteBuffer::alloc(0);
        encode(&mut scratch)?;
        self.write_bytes(scratch.shared_view());
        Ok(())
    }

    /// Reads `len` bytes as UTF-8.
    pub fn read_utf8_string(&mut self, len: usize) -> Result<String, CodecError> {
        let offset = self.offset;
        let bytes = self.read_bytes(len)?;
        String::from_utf8(bytes).map_err(|_| CodecError::InvalidUtf8 { offset })
    }

    pub fn write_utf8_string(&mut self, value: &str) -> &mut Self {
        self.write_bytes(value.as_bytes())
    }

    pub fn read_u8(&mut self) -> Result<u8, CodecError> {
        Ok(self.take_array::<1>()?[0])
    }

    pub fn write_u8(&mut self, value: u8) -> &mut Self {
        self.write_bytes(&[value])
    }

    pub fn read_u16(&mut self) -> Result<u16, CodecError> {
        self.take_array().map(u16::from_be_bytes)
    }

    pub fn write_u16(&mut self, value: u16) -> &mut Self {
        self.write_bytes(&value.to_be_bytes())
    }

    pub fn read_u32(&mut self) -> Result<u32, CodecError> {
        self.take_array().map(u32::from_be_bytes)
    }

    pub fn write_u32(&mut self, value: u32) -> &mut Self {
        self.write_bytes(&value.to_be_bytes())
    }

    pub fn read_u64(&mut self) -> Result<u64, CodecError> {
        self.take_array().map(u64::from_be_bytes)
    }

    pub fn write_u64(&mut self, value: u64) -> &mut Self {
        self.write_bytes(&value.to_be_bytes())
    }

    /// Reads a zig-zag encoded varint, 7 bits per byte, least significant
    /// group first. At most ten groups are accepted.
    pub fn read_var_i64_zigzag(&mut self) -> Result<i64, CodecError> {
        let mut shift = 0u32;
        let mut result = 0u64;

        loop {
            if shift > 63 {
                return Err(CodecError::VarIntOverflow);
            }

            let byte = self.read_u8()?;
            // Bits shifted past 64 on the tenth group are dropped.
            result |= u64::from(byte & 0x7f) << shift;
            if byte & 0x80 == 0 {
                break;
            }

            shift += 7;
        }

        Ok(zigzag_decode(result))
    }

    pub fn write_var_i64_zigzag(&mut self, value: i64) -> &mut Self {
        let mut value = zigzag_encode(value);
        loop {
            let mut byte = (value & 0x7f) as u8;
            value >>= 7;
            if value != 0 {
                byte |= 0x80;
            }
            self.write_u8(byte);
            if value == 0 {
                break;
            }
        }
        self
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
