//! srvsvc-dissector -- decoder for the DCE/RPC server service (`\PIPE\srvsvc`).
//!
//! The caller owns the transport: it hands over the stub bytes of one frame,
//! already reassembled, with the opnum, direction and data representation
//! from the RPC header. [`Dissector::dissect`] looks the opnum up in
//! [`ops::OPERATIONS`], runs the body decoder and returns the field tree.
//!
//! State that a response needs from its request lives in an [`Exchange`]
//! passed in by the caller, one per request/response pair.

pub mod calls;
pub mod exchange;
pub mod fields;
pub mod info;
pub mod ops;
pub mod profile;

use std::fmt;
use std::str::FromStr;

use bytes::Bytes;
use serde::Serialize;
use srvsvc_ndr::{Cursor, DataRepresentation, FieldTree, NdrError};

pub use exchange::Exchange;
pub use info::{ServerInfoLevel, ShareInfoLevel};
pub use profile::LayoutProfile;

/// Interface UUID.
pub const SRVSVC_UUID: &str = "4b324fc8-1670-01d3-1278-5a47bf6ee188";
pub const SRVSVC_VERSION: u16 = 3;
pub const PROTOCOL_NAME: &str = "Microsoft Server Service";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DissectError {
    #[error("unknown direction {0:?}, expected request or response")]
    UnknownDirection(String),
    #[error("unknown layout profile {0:?}")]
    UnknownProfile(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Request,
    Response,
}

impl Direction {
    pub fn as_str(self) -> &'static str {
        match self {
            Direction::Request => "request",
            Direction::Response => "response",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Direction {
    type Err = DissectError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "request" | "req" | "call" => Ok(Direction::Request),
            "response" | "resp" | "reply" => Ok(Direction::Response),
            _ => Err(DissectError::UnknownDirection(s.to_string())),
        }
    }
}

/// One stub as handed over by the RPC layer.
#[derive(Debug, Clone)]
pub struct Frame {
    pub data: Bytes,
    /// Offset of the first body byte. Alignment is relative to 0.
    pub offset: usize,
    pub drep: DataRepresentation,
    pub opnum: u16,
    pub direction: Direction,
}

impl Frame {
    /// Little-endian frame whose body starts at offset 0.
    pub fn new(data: impl Into<Bytes>, opnum: u16, direction: Direction) -> Self {
        Self {
            data: data.into(),
            offset: 0,
            drep: DataRepresentation::default(),
            opnum,
            direction,
        }
    }

    pub fn with_offset(mut self, offset: usize) -> Self {
        self.offset = offset;
        self
    }

    pub fn with_drep(mut self, drep: DataRepresentation) -> Self {
        self.drep = drep;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Body decoded to the end.
    Decoded,
    /// Operation known, no decoder for this direction.
    NotDecoded,
    UnknownOpcode,
    /// Decoding stopped at a fault. The tree holds what came before it.
    Malformed(NdrError),
}

/// Result of decoding one frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dissection {
    pub opnum: u16,
    pub direction: Direction,
    pub tree: FieldTree,
    pub start: usize,
    /// Offset just past the last byte consumed.
    pub offset: usize,
    pub outcome: Outcome,
}

impl Dissection {
    pub fn consumed(&self) -> usize {
        self.offset - self.start
    }

    pub fn is_malformed(&self) -> bool {
        matches!(self.outcome, Outcome::Malformed(_))
    }

    pub fn error(&self) -> Option<&NdrError> {
        match &self.outcome {
            Outcome::Malformed(e) => Some(e),
            _ => None,
        }
    }

    /// The single note a frame display would carry, if any.
    pub fn diagnostic(&self) -> Option<String> {
        match &self.outcome {
            Outcome::Decoded | Outcome::NotDecoded => None,
            Outcome::UnknownOpcode => Some(format!("Unknown operation {}", self.opnum)),
            Outcome::Malformed(e) => Some(format!("Malformed packet: {e}")),
        }
    }
}

/// SRVSVC decoder. Holds nothing but its layout profile, so one instance can
/// be shared between threads.
#[derive(Debug, Clone, Copy)]
pub struct Dissector {
    profile: &'static LayoutProfile,
}

impl Default for Dissector {
    fn default() -> Self {
        Self::new(profile::default_profile())
    }
}

impl Dissector {
    pub fn new(profile: &'static LayoutProfile) -> Self {
        Self { profile }
    }

    pub fn with_profile_name(name: &str) -> Result<Self, DissectError> {
        profile::by_name(name)
            .map(Self::new)
            .ok_or_else(|| DissectError::UnknownProfile(name.to_string()))
    }

    pub fn profile(&self) -> &'static LayoutProfile {
        self.profile
    }

    /// Decodes one frame.
    ///
    /// Never panics on malformed input: faults end up in
    /// [`Outcome::Malformed`] and the tree keeps every field emitted before
    /// the fault.
    pub fn dissect(&self, frame: &Frame, exchange: &mut Exchange) -> Dissection {
        let start = frame.offset;
        let op = ops::lookup(frame.opnum);
        let label = match op {
            Some(op) => format!("{PROTOCOL_NAME}, {} {}", op.name, frame.direction),
            None => format!("{PROTOCOL_NAME}, opnum {} {}", frame.opnum, frame.direction),
        };
        let mut tree = FieldTree::new(label);
        let root = tree.root();
        tree.set_range(root, start..start);
        let finish = |tree: FieldTree, offset: usize, outcome: Outcome| Dissection {
            opnum: frame.opnum,
            direction: frame.direction,
            tree,
            start,
            offset,
            outcome,
        };

        let Some(op) = op else {
            tracing::debug!(opnum = frame.opnum, "srvsvc: unknown operation");
            tree.add_item(root, format!("Unknown operation {}", frame.opnum), None, start..start);
            return finish(tree, start, Outcome::UnknownOpcode);
        };
        exchange.bind(frame.opnum);

        let Some(decoder) = op.decoder(frame.direction) else {
            tracing::debug!(op = op.name, direction = %frame.direction, "srvsvc: body not decoded");
            return finish(tree, start, Outcome::NotDecoded);
        };

        let cur = match Cursor::new(&frame.data, start, frame.drep) {
            Ok(cur) => cur,
            Err(e) => {
                tracing::warn!(op = op.name, error = %e, "srvsvc: body offset outside stub");
                return finish(tree, start, Outcome::Malformed(e));
            }
        };

        let mut body = calls::Body {
            cur,
            tree,
            parent: root,
            exchange,
            profile: self.profile,
        };
        let result = decoder(&mut body);
        let offset = body.cur.offset();
        let mut tree = body.tree;
        tree.set_range(root, start..offset);

        let outcome = match result {
            Ok(()) => {
                tracing::debug!(
                    op = op.name,
                    direction = %frame.direction,
                    start,
                    end = offset,
                    fields = tree.field_count(),
                    "srvsvc: decoded body"
                );
                Outcome::Decoded
            }
            Err(e) => {
                tracing::warn!(
                    op = op.name,
                    direction = %frame.direction,
                    offset = e.offset(),
                    error = %e,
                    "srvsvc: malformed body"
                );
                Outcome::Malformed(e)
            }
        };
        finish(tree, offset, outcome)
    }
}
