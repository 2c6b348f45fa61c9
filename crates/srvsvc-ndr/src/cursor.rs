//! Primitive reader over an NDR stub.
//!
//! Every read aligns first, checks the padded length against the buffer and
//! only then moves, so the offset never decreases and never passes the end
//! of the buffer, even on failure.

use crate::drep::DataRepresentation;
use crate::pointer::ArrayHeader;
use crate::{NdrError, Result, U32_ALIGN};

#[derive(Debug, Clone, Copy)]
pub struct Cursor<'a> {
    data: &'a [u8],
    offset: usize,
    drep: DataRepresentation,
}

impl<'a> Cursor<'a> {
    pub fn new(data: &'a [u8], offset: usize, drep: DataRepresentation) -> Result<Self> {
        if offset > data.len() {
            return Err(NdrError::Truncated {
                offset: data.len(),
                needed: offset - data.len(),
                available: 0,
            });
        }
        Ok(Self { data, offset, drep })
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn remaining(&self) -> usize {
        self.data.len() - self.offset
    }

    pub fn drep(&self) -> DataRepresentation {
        self.drep
    }

    /// Offset the next read aligned to `align` would start at, clamped to the
    /// buffer end. Does not move the cursor.
    pub fn aligned(&self, align: usize) -> usize {
        (self.offset + padding(self.offset, align)).min(self.data.len())
    }

    fn take(&mut self, align: usize, len: usize) -> Result<&'a [u8]> {
        let pad = padding(self.offset, align);
        let needed = pad + len;
        if needed > self.remaining() {
            return Err(NdrError::Truncated {
                offset: self.offset,
                needed,
                available: self.remaining(),
            });
        }
        let start = self.offset + pad;
        self.offset = start + len;
        Ok(&self.data[start..start + len])
    }

    pub fn read_u32(&mut self) -> Result<u32> {
        let bytes = self.take(U32_ALIGN, 4)?;
        Ok(self
            .drep
            .decode_u32([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }

    /// Reads the max count / offset / actual count triple that precedes a
    /// conformant varying array.
    pub fn read_conformance(&mut self) -> Result<ArrayHeader> {
        let at = self.aligned(U32_ALIGN);
        let max_count = self.read_u32()?;
        let first = self.read_u32()?;
        let actual_count = self.read_u32()?;
        if u64::from(first) + u64::from(actual_count) > u64::from(max_count) {
            return Err(NdrError::InvalidConformance {
                offset: at,
                max_count,
                first,
                actual_count,
            });
        }
        Ok(ArrayHeader {
            max_count,
            offset: first,
            actual_count,
        })
    }

    /// Reads `count` UTF-16 code units. Trailing NULs are dropped and
    /// unpaired surrogates are replaced.
    pub fn read_utf16(&mut self, count: u32) -> Result<String> {
        let bytes = self.take(2, utf16_len(count, self.offset)?)?;
        let mut units: Vec<u16> = bytes
            .chunks_exact(2)
            .map(|pair| self.drep.decode_u16([pair[0], pair[1]]))
            .collect();
        while units.last() == Some(&0) {
            units.pop();
        }
        Ok(String::from_utf16_lossy(&units))
    }

    /// Reads a conformant varying UTF-16 string: header, then its units.
    pub fn read_string(&mut self) -> Result<(ArrayHeader, String)> {
        let header = self.read_conformance()?;
        let text = self.read_utf16(header.actual_count)?;
        Ok((header, text))
    }

    /// Advances past `count` UTF-16 code units without decoding them.
    pub fn skip_utf16(&mut self, count: u32) -> Result<()> {
        let len = utf16_len(count, self.offset)?;
        self.take(2, len)?;
        Ok(())
    }
}

fn padding(offset: usize, align: usize) -> usize {
    match offset % align {
        0 => 0,
        rem => align - rem,
    }
}

fn utf16_len(count: u32, offset: usize) -> Result<usize> {
    (count as usize)
        .checked_mul(2)
        .ok_or(NdrError::Truncated {
            offset,
            needed: usize::MAX,
            available: 0,
        })
}
