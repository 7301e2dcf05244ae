//! Big-endian serialization of the 32-bit words and counters.

use std::io::{ErrorKind, Read, Write};

use anyhow::Result;
use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};

use super::Serializable;
use crate::Error;

impl Serializable for u32 {
    fn serialize_into<W: Write>(&self, mut writer: W) -> Result<usize> {
        writer.write_u32::<BigEndian>(*self)?;
        Ok(std::mem::size_of::<Self>())
    }

    fn deserialize_from<R: Read>(mut reader: R) -> Result<Self> {
        reader.read_u32::<BigEndian>().map_err(|e| {
            if e.kind() == ErrorKind::UnexpectedEof {
                anyhow::Error::from(Error::malformed("stream ended while reading u32"))
            } else {
                anyhow::Error::from(e)
            }
        })
    }

    fn size_in_bytes(&self) -> usize {
        std::mem::size_of::<Self>()
    }

    fn size_of() -> Option<usize> {
        Some(std::mem::size_of::<Self>())
    }
}
