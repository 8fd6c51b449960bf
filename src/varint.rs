//! Canonical three-form variable-length integer, and length-prefixed byte blobs
//! built on top of it.
//!
//! A varint occupies 1, 3 or 5 bytes depending on its leading byte, and every
//! encoding must be the shortest one that represents the value: a decoder
//! that accepts a non-minimal form would let two different byte strings
//! represent the same logical value, which breaks hash-chaining over the
//! encoded bytes. `0xff` is reserved outright.

use crate::error::{Result, VerifyError};
use crate::serializer::{Reader, Writer};

/// Read a canonical varint, returning the decoded value.
pub fn read_varint(reader: &mut Reader) -> Result<u32> {
    let tag = reader.read_u8()?;
    match tag {
        0xff => Err(VerifyError::Encoding),
        0xfe => {
            let v = reader.read_u32()?;
            if v <= 0xffff {
                return Err(VerifyError::Encoding);
            }
            Ok(v)
        }
        0xfd => {
            let v = reader.read_u16()? as u32;
            if v < 0xfd {
                return Err(VerifyError::Encoding);
            }
            Ok(v)
        }
        small => Ok(small as u32),
    }
}

/// Write `value` using the shortest of the three canonical forms.
pub fn write_varint(writer: &mut Writer, value: u32) {
    if value < 0xfd {
        writer.write_u8(value as u8);
    } else if value <= 0xffff {
        writer.write_u8(0xfd);
        writer.write_u16(value as u16);
    } else {
        writer.write_u8(0xfe);
        writer.write_u32(value);
    }
}

/// Number of bytes `write_varint` would emit for `value`.
pub fn varint_size(value: u32) -> usize {
    if value < 0xfd {
        1
    } else if value <= 0xffff {
        3
    } else {
        5
    }
}

/// Read a varint-prefixed blob without copying; the slice borrows from the
/// reader's underlying buffer.
pub fn read_varbytes_light<'a>(reader: &mut Reader<'a>) -> Result<&'a [u8]> {
    let len = read_varint(reader)? as usize;
    reader.read_bytes_ref(len)
}

/// Read a varint-prefixed blob into a freshly allocated, owned buffer.
pub fn read_varbytes_owned(reader: &mut Reader) -> Result<Vec<u8>> {
    let len = read_varint(reader)? as usize;
    reader.read_bytes(len)
}

/// Write a varint-prefixed blob.
pub fn write_varbytes(writer: &mut Writer, data: &[u8]) {
    write_varint(writer, data.len() as u32);
    writer.write_bytes(data);
}
