//! Stub construction helpers for dissector integration tests.
//!
//! `StubBuilder` writes NDR the way a real marshaller would: scalars aligned
//! to four bytes from the start of the buffer, referent ids counting up from
//! `0x00020000`, strings as max count / offset / actual count followed by
//! NUL-terminated UTF-16.

use srvsvc_dissector::{Direction, Dissection, Dissector, Exchange, Frame};
use srvsvc_ndr::DataRepresentation;

pub const FIRST_REFERENT_ID: u32 = 0x0002_0000;

#[derive(Debug, Clone)]
pub struct StubBuilder {
    buf: Vec<u8>,
    start: usize,
    big_endian: bool,
    next_id: u32,
}

impl Default for StubBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[allow(dead_code)]
impl StubBuilder {
    pub fn new() -> Self {
        Self {
            buf: Vec::new(),
            start: 0,
            big_endian: false,
            next_id: FIRST_REFERENT_ID,
        }
    }

    pub fn big_endian() -> Self {
        Self {
            big_endian: true,
            ..Self::new()
        }
    }

    /// Puts `n` bytes of unrelated data in front of the body.
    pub fn with_prefix(mut self, n: usize) -> Self {
        self.buf.extend(std::iter::repeat(0xCC).take(n));
        self.start = n;
        self
    }

    fn align(&mut self) {
        while self.buf.len() % 4 != 0 {
            self.buf.push(0);
        }
    }

    pub fn u32(mut self, value: u32) -> Self {
        self.align();
        let bytes = if self.big_endian {
            value.to_be_bytes()
        } else {
            value.to_le_bytes()
        };
        self.buf.extend_from_slice(&bytes);
        self
    }

    /// Non-null pointer header with the next referent id.
    pub fn pointer(mut self) -> Self {
        let id = self.next_id;
        self.next_id += 4;
        self.u32(id)
    }

    pub fn null(self) -> Self {
        self.u32(0)
    }

    pub fn string(self, text: &str) -> Self {
        let units: Vec<u16> = text.encode_utf16().chain(std::iter::once(0)).collect();
        let count = units.len() as u32;
        let mut this = self.u32(count).u32(0).u32(count);
        for unit in units {
            let bytes = if this.big_endian {
                unit.to_be_bytes()
            } else {
                unit.to_le_bytes()
            };
            this.buf.extend_from_slice(&bytes);
        }
        this
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn build(self) -> Vec<u8> {
        self.buf
    }

    pub fn frame(self, opnum: u16, direction: Direction) -> Frame {
        let drep = if self.big_endian {
            DataRepresentation::BIG_ENDIAN
        } else {
            DataRepresentation::LITTLE_ENDIAN
        };
        let start = self.start;
        Frame::new(self.buf, opnum, direction)
            .with_offset(start)
            .with_drep(drep)
    }
}

/// Decodes `frame` with the default profile and a fresh exchange.
#[allow(dead_code)]
pub fn dissect(frame: &Frame) -> Dissection {
    Dissector::default().dissect(frame, &mut Exchange::new())
}

/// Text field value by filter name.
#[allow(dead_code)]
pub fn text<'a>(d: &'a Dissection, abbrev: &str) -> Option<&'a str> {
    d.tree.find(abbrev).and_then(|n| n.as_text())
}

/// Integer field value by filter name.
#[allow(dead_code)]
pub fn uint(d: &Dissection, abbrev: &str) -> Option<u32> {
    d.tree.find(abbrev).and_then(|n| n.as_u32())
}
