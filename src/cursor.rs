//! Sequential big-endian access to a byte buffer.
//!
//! [`ByteCursor`] keeps a single offset that every read or write advances by the
//! width of the value. Nested encoders and decoders share one cursor by `&mut`
//! so sibling and parent steps resume at the right position.

use anyhow::{anyhow, Result};
use byteorder::{BigEndian, ByteOrder};

use crate::Error;

/// Offset-tracking reader/writer over a byte buffer.
///
/// Reads past the end fail with [`Error::MalformedEncoding`]; writes past the end
/// are a sizing bug in the caller and fail with a plain error.
///
/// # Examples
///
/// ```
/// # fn main() -> anyhow::Result<()> {
/// use trie_encodings::ByteCursor;
///
/// let mut cur = ByteCursor::new(vec![0u8; 5]);
/// cur.set_u8(1)?;
/// cur.set_u32(0x01020304)?;
/// assert_eq!(cur.offset(), 5);
///
/// let mut cur = ByteCursor::new(cur.into_inner());
/// assert_eq!(cur.get_u8()?, 1);
/// assert_eq!(cur.get_u32()?, 0x01020304);
/// assert!(cur.get_u8().is_err());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct ByteCursor<B> {
    buf: B,
    offset: usize,
}

impl<B> ByteCursor<B>
where
    B: AsRef<[u8]>,
{
    /// Creates a cursor at offset 0.
    pub const fn new(buf: B) -> Self {
        Self { buf, offset: 0 }
    }

    /// Returns the current offset.
    #[inline(always)]
    pub const fn offset(&self) -> usize {
        self.offset
    }

    /// Moves the cursor to `offset`.
    pub fn seek(&mut self, offset: usize) {
        self.offset = offset;
    }

    /// Returns the length of the underlying buffer.
    #[inline(always)]
    pub fn len(&self) -> usize {
        self.buf.as_ref().len()
    }

    /// Checks if the underlying buffer is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the number of bytes after the cursor.
    pub fn remaining(&self) -> usize {
        self.len().saturating_sub(self.offset)
    }

    /// Gets the underlying buffer.
    pub fn get_ref(&self) -> &B {
        &self.buf
    }

    /// Converts into the underlying buffer.
    pub fn into_inner(self) -> B {
        self.buf
    }

    /// Reads one byte and advances by 1.
    #[inline(always)]
    pub fn get_u8(&mut self) -> Result<u8> {
        let x = self.take(1)?[0];
        Ok(x)
    }

    /// Reads a big-endian `u32` and advances by 4.
    #[inline(always)]
    pub fn get_u32(&mut self) -> Result<u32> {
        let x = BigEndian::read_u32(self.take(4)?);
        Ok(x)
    }

    fn take(&mut self, width: usize) -> Result<&[u8]> {
        let start = self.offset;
        let end = start
            .checked_add(width)
            .filter(|&end| end <= self.len())
            .ok_or_else(|| {
                Error::malformed(format!(
                    "cannot read {width} bytes at offset {start} of a {}-byte buffer",
                    self.len()
                ))
            })?;
        self.offset = end;
        Ok(&self.buf.as_ref()[start..end])
    }
}

impl<B> ByteCursor<B>
where
    B: AsRef<[u8]> + AsMut<[u8]>,
{
    /// Writes one byte and advances by 1.
    #[inline(always)]
    pub fn set_u8(&mut self, x: u8) -> Result<()> {
        self.take_mut(1)?[0] = x;
        Ok(())
    }

    /// Writes `x` as a big-endian `u32` and advances by 4.
    #[inline(always)]
    pub fn set_u32(&mut self, x: u32) -> Result<()> {
        BigEndian::write_u32(self.take_mut(4)?, x);
        Ok(())
    }

    fn take_mut(&mut self, width: usize) -> Result<&mut [u8]> {
        let start = self.offset;
        let len = self.len();
        if len < start + width {
            return Err(anyhow!(
                "offset+width must be no greater than the buffer length={len}, but got {}.",
                start + width
            ));
        }
        self.offset += width;
        Ok(&mut self.buf.as_mut()[start..start + width])
    }
}
