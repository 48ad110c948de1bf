//! Little-endian byte reader and Bitcoin CompactSize varints.

use crate::domain::errors::BundleError;

/// Cursor over a borrowed byte slice.
#[derive(Debug, Clone)]
pub struct ByteReader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> ByteReader<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    /// Bytes consumed between `start` and the current position.
    pub fn consumed_since(&self, start: usize) -> &'a [u8] {
        &self.data[start..self.pos]
    }

    pub fn read_bytes(&mut self, len: usize) -> Result<&'a [u8], BundleError> {
        if self.remaining() < len {
            return Err(BundleError::UnexpectedEof {
                needed: len,
                remaining: self.remaining(),
            });
        }
        let slice = &self.data[self.pos..self.pos + len];
        self.pos += len;
        Ok(slice)
    }

    pub fn read_array<const N: usize>(&mut self) -> Result<[u8; N], BundleError> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.read_bytes(N)?);
        Ok(out)
    }

    pub fn read_u8(&mut self) -> Result<u8, BundleError> {
        Ok(self.read_array::<1>()?[0])
    }

    pub fn read_u16_le(&mut self) -> Result<u16, BundleError> {
        Ok(u16::from_le_bytes(self.read_array()?))
    }

    pub fn read_u32_le(&mut self) -> Result<u32, BundleError> {
        Ok(u32::from_le_bytes(self.read_array()?))
    }

    pub fn read_u64_le(&mut self) -> Result<u64, BundleError> {
        Ok(u64::from_le_bytes(self.read_array()?))
    }

    /// Read a CompactSize integer.
    pub fn read_varint(&mut self) -> Result<u64, BundleError> {
        match self.read_u8()? {
            0xfd => Ok(self.read_u16_le()? as u64),
            0xfe => Ok(self.read_u32_le()? as u64),
            0xff => self.read_u64_le(),
            n => Ok(n as u64),
        }
    }

    /// Read a varint element count, rejecting counts that could not possibly
    /// fit in the remaining input (each element is at least `min_item_size`).
    pub fn read_count(&mut self, what: &'static str, min_item_size: usize) -> Result<usize, BundleError> {
        let count = self.read_varint()?;
        let max = (self.remaining() / min_item_size.max(1)) as u64;
        if count > max {
            return Err(BundleError::CountTooLarge { what, count });
        }
        Ok(count as usize)
    }

    /// Read a varint-length-prefixed byte string.
    pub fn read_var_bytes(&mut self) -> Result<&'a [u8], BundleError> {
        let len = self.read_varint()?;
        if len > self.remaining() as u64 {
            return Err(BundleError::UnexpectedEof {
                needed: usize::try_from(len).unwrap_or(usize::MAX),
                remaining: self.remaining(),
            });
        }
        self.read_bytes(len as usize)
    }
}

/// Append a CompactSize integer.
pub fn write_varint(out: &mut Vec<u8>, n: u64) {
    match n {
        0..=0xfc => out.push(n as u8),
        0xfd..=0xffff => {
            out.push(0xfd);
            out.extend_from_slice(&(n as u16).to_le_bytes());
        }
        0x1_0000..=0xffff_ffff => {
            out.push(0xfe);
            out.extend_from_slice(&(n as u32).to_le_bytes());
        }
        _ => {
            out.push(0xff);
            out.extend_from_slice(&n.to_le_bytes());
        }
    }
}

/// Append a varint-length-prefixed byte string.
pub fn write_var_bytes(out: &mut Vec<u8>, bytes: &[u8]) {
    write_varint(out, bytes.len() as u64);
    out.extend_from_slice(bytes);
}
