//! Byte sinks and sources
//!
//! Counter groups encode through `DataOutput` and decode through
//! `DataInput`. Both traits are object safe so groups can be driven through
//! `&mut dyn DataOutput` by an outer container.

use std::io::{Read, Write};

use bytes::{Buf, BufMut, Bytes, BytesMut};
use tally_core::{TallyError, TallyResult};

use crate::varint::{decode_vlong_size, encode_vlong, is_negative_prefix, MAX_VLONG_SIZE};

/// Ordered byte sink
pub trait DataOutput {
    /// Write a single byte
    fn write_u8(&mut self, byte: u8) -> TallyResult<()>;

    /// Write a run of bytes
    fn write_bytes(&mut self, bytes: &[u8]) -> TallyResult<()> {
        for &b in bytes {
            self.write_u8(b)?;
        }
        Ok(())
    }

    /// Write a variable-length signed 64-bit value
    fn write_vlong(&mut self, value: i64) -> TallyResult<()> {
        let mut buf = [0u8; MAX_VLONG_SIZE];
        let n = encode_vlong(value, &mut buf);
        self.write_bytes(&buf[..n])
    }

    /// Write a variable-length signed 32-bit value
    fn write_vint(&mut self, value: i32) -> TallyResult<()> {
        self.write_vlong(value as i64)
    }
}

/// Ordered byte source
pub trait DataInput {
    /// Read a single byte
    fn read_u8(&mut self) -> TallyResult<u8>;

    /// Read a variable-length signed 64-bit value
    ///
    /// A source that runs dry after the prefix byte reports the encoded
    /// length as `expected` and the bytes already consumed as `actual`.
    fn read_vlong(&mut self) -> TallyResult<i64> {
        let first = self.read_u8()?;
        let len = decode_vlong_size(first);
        if len == 1 {
            return Ok(first as i8 as i64);
        }

        let mut value: i64 = 0;
        for read in 1..len {
            let byte = self.read_u8().map_err(|e| match e {
                TallyError::BufferTooShort { .. } => TallyError::BufferTooShort {
                    expected: len,
                    actual: read,
                },
                other => other,
            })?;
            value = (value << 8) | byte as i64;
        }

        Ok(if is_negative_prefix(first) { !value } else { value })
    }

    /// Read a variable-length value that must fit in 32 bits
    fn read_vint(&mut self) -> TallyResult<i32> {
        let value = self.read_vlong()?;
        i32::try_from(value).map_err(|_| TallyError::VarIntOverflow(value))
    }
}

impl DataOutput for Vec<u8> {
    fn write_u8(&mut self, byte: u8) -> TallyResult<()> {
        self.push(byte);
        Ok(())
    }

    fn write_bytes(&mut self, bytes: &[u8]) -> TallyResult<()> {
        self.extend_from_slice(bytes);
        Ok(())
    }
}

impl DataOutput for BytesMut {
    fn write_u8(&mut self, byte: u8) -> TallyResult<()> {
        self.put_u8(byte);
        Ok(())
    }

    fn write_bytes(&mut self, bytes: &[u8]) -> TallyResult<()> {
        self.put_slice(bytes);
        Ok(())
    }
}

impl DataInput for &[u8] {
    fn read_u8(&mut self) -> TallyResult<u8> {
        read_buf_u8(self)
    }
}

impl DataInput for Bytes {
    fn read_u8(&mut self) -> TallyResult<u8> {
        read_buf_u8(self)
    }
}

/// Single-byte read; an exhausted buffer is one byte short.
fn read_buf_u8<B: Buf>(buf: &mut B) -> TallyResult<u8> {
    if !buf.has_remaining() {
        return Err(TallyError::BufferTooShort {
            expected: 1,
            actual: 0,
        });
    }
    Ok(buf.get_u8())
}

/// `DataOutput` over any `std::io::Write`
///
/// Write errors surface unchanged as [`TallyError::Io`].
#[derive(Debug)]
pub struct IoOutput<W> {
    inner: W,
}

impl<W: Write> IoOutput<W> {
    pub fn new(inner: W) -> Self {
        IoOutput { inner }
    }

    pub fn get_ref(&self) -> &W {
        &self.inner
    }

    pub fn into_inner(self) -> W {
        self.inner
    }
}

impl<W: Write> DataOutput for IoOutput<W> {
    fn write_u8(&mut self, byte: u8) -> TallyResult<()> {
        self.inner.write_all(&[byte])?;
        Ok(())
    }

    fn write_bytes(&mut self, bytes: &[u8]) -> TallyResult<()> {
        self.inner.write_all(bytes)?;
        Ok(())
    }
}

/// `DataInput` over any `std::io::Read`
///
/// Read errors, including a truncated stream, surface unchanged as
/// [`TallyError::Io`].
#[derive(Debug)]
pub struct IoInput<R> {
    inner: R,
}

impl<R: Read> IoInput<R> {
    pub fn new(inner: R) -> Self {
        IoInput { inner }
    }

    pub fn into_inner(self) -> R {
        self.inner
    }
}

impl<R: Read> DataInput for IoInput<R> {
    fn read_u8(&mut self) -> TallyResult<u8> {
        let mut byte = [0u8; 1];
        self.inner.read_exact(&mut byte)?;
        Ok(byte[0])
    }
}
