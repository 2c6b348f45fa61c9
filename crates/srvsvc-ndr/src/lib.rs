//! srvsvc-ndr -- NDR stub reading for DCE/RPC dissectors.
//!
//! Decode direction only. Offsets are relative to the start of the stub
//! buffer, which is also the origin for NDR alignment.
//!
//! Embedded pointers are decoded in two runs: a conformant run that records
//! referent ids and array headers without emitting anything, then a deferred
//! run that walks the same bytes again and emits into a [`FieldTree`].

pub mod cursor;
pub mod drep;
pub mod field;
pub mod layout;
pub mod pointer;
pub mod string;
pub mod tree;

pub use cursor::Cursor;
pub use drep::{ByteOrder, DataRepresentation};
pub use field::{Base, FieldInfo, FieldKind};
pub use layout::{Layout, Member};
pub use pointer::{
    conformant_run, decode_pointer, deferred_run, ArrayHeader, PointerKind, PointerScan,
    Referent, Scan,
};
pub use string::ConformantString;
pub use tree::{FieldTree, FieldValue, Node, NodeId};

/// Alignment of NDR 32-bit scalars, conformance headers and referent ids.
pub const U32_ALIGN: usize = 4;

/// Size in bytes of a pointer header (referent id) on the wire.
pub const POINTER_HEADER_LEN: usize = 4;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NdrError {
    #[error("truncated buffer: need {needed} bytes at offset {offset}, {available} available")]
    Truncated {
        offset: usize,
        needed: usize,
        available: usize,
    },
    #[error("null reference pointer at offset {offset}")]
    NullReference { offset: usize },
    #[error(
        "invalid conformance at offset {offset}: max {max_count}, offset {first}, actual {actual_count}"
    )]
    InvalidConformance {
        offset: usize,
        max_count: u32,
        first: u32,
        actual_count: u32,
    },
    #[error("conformant and deferred runs disagree at offset {offset}: {detail}")]
    PhaseMismatch { offset: usize, detail: &'static str },
}

impl NdrError {
    /// Stub offset at which the fault was detected.
    pub fn offset(&self) -> usize {
        match self {
            NdrError::Truncated { offset, .. }
            | NdrError::NullReference { offset }
            | NdrError::InvalidConformance { offset, .. }
            | NdrError::PhaseMismatch { offset, .. } => *offset,
        }
    }

    /// True when the input simply ran out of bytes.
    pub fn is_truncation(&self) -> bool {
        matches!(self, NdrError::Truncated { .. })
    }
}

pub type Result<T> = std::result::Result<T, NdrError>;
