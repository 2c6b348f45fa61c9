//! DCE/RPC data representation label (C706 §14.1).
//!
//! Four bytes carried in every PDU header. Byte 0 holds the integer
//! representation in its high nibble and the character set in its low
//! nibble; byte 1 is the floating point format. Bytes 2-3 are reserved.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ByteOrder {
    Big,
    Little,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DataRepresentation([u8; 4]);

impl DataRepresentation {
    /// Little endian, ASCII, IEEE floats: what Windows peers send.
    pub const LITTLE_ENDIAN: DataRepresentation = DataRepresentation([0x10, 0x00, 0x00, 0x00]);

    /// Big endian, ASCII, IEEE floats.
    pub const BIG_ENDIAN: DataRepresentation = DataRepresentation([0x00, 0x00, 0x00, 0x00]);

    pub fn from_bytes(bytes: [u8; 4]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> [u8; 4] {
        self.0
    }

    pub fn byte_order(&self) -> ByteOrder {
        if self.0[0] & 0xF0 == 0x10 {
            ByteOrder::Little
        } else {
            ByteOrder::Big
        }
    }

    pub fn decode_u16(&self, bytes: [u8; 2]) -> u16 {
        match self.byte_order() {
            ByteOrder::Little => u16::from_le_bytes(bytes),
            ByteOrder::Big => u16::from_be_bytes(bytes),
        }
    }

    pub fn decode_u32(&self, bytes: [u8; 4]) -> u32 {
        match self.byte_order() {
            ByteOrder::Little => u32::from_le_bytes(bytes),
            ByteOrder::Big => u32::from_be_bytes(bytes),
        }
    }
}

impl Default for DataRepresentation {
    fn default() -> Self {
        Self::LITTLE_ENDIAN
    }
}

impl From<ByteOrder> for DataRepresentation {
    fn from(order: ByteOrder) -> Self {
        match order {
            ByteOrder::Little => Self::LITTLE_ENDIAN,
            ByteOrder::Big => Self::BIG_ENDIAN,
        }
    }
}
