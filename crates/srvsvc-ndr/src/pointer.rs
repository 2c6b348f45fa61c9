//! Two-phase pointer decoding.
//!
//! A [`Referent`] is anything an NDR pointer can point at. Decoding a
//! referent takes two walks over the same bytes:
//!
//! 1. **Conformant run** ([`Referent::scan`]): on a copy of the cursor, read
//!    every embedded pointer's referent id and every conformant array header,
//!    descend into non-null referents, emit nothing. The result is a [`Scan`].
//! 2. **Deferred run** ([`Referent::emit`]): from the same start offset on the
//!    real cursor, emit fields. The referent ids captured in the scan decide
//!    which deferred referents exist and are checked against the bytes.
//!
//! Both walks must end at the same offset.
//!
//! Embedded pointers put their referent id in the structure's fixed part;
//! the pointed-to content follows the whole fixed part, in member order.
//! Top-level `ref` pointers have no wire representation at all.

use crate::cursor::Cursor;
use crate::tree::{FieldTree, FieldValue, NodeId};
use crate::{NdrError, Result, POINTER_HEADER_LEN, U32_ALIGN};

/// Pointer attribute from the IDL.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerKind {
    /// `[ref]`: never null.
    Ref,
    /// `[unique]`: may be null.
    Unique,
    /// `[ptr]`: may be null. Decoded exactly like `unique`.
    Full,
}

impl PointerKind {
    pub fn is_nullable(self) -> bool {
        !matches!(self, PointerKind::Ref)
    }

    pub fn name(self) -> &'static str {
        match self {
            PointerKind::Ref => "ref",
            PointerKind::Unique => "unique",
            PointerKind::Full => "ptr",
        }
    }
}

/// Conformance header of a conformant varying array.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArrayHeader {
    pub max_count: u32,
    pub offset: u32,
    pub actual_count: u32,
}

/// Result of a conformant run over one referent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Scan {
    pub start: usize,
    /// End offset. `None` when the run faulted or did not happen.
    pub end: Option<usize>,
    /// Array headers in wire order.
    pub arrays: Vec<ArrayHeader>,
    /// Embedded pointers in member order.
    pub pointers: Vec<PointerScan>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PointerScan {
    pub referent_id: u32,
    /// Scan of the pointed-to referent, present once it has been visited.
    pub target: Option<Scan>,
}

impl Scan {
    pub fn new(start: usize) -> Self {
        Self {
            start,
            ..Default::default()
        }
    }

    pub fn is_complete(&self) -> bool {
        self.end.is_some()
    }

    pub fn array(&self, index: usize) -> Option<&ArrayHeader> {
        self.arrays.get(index)
    }

    pub fn pointer(&self, index: usize) -> Option<&PointerScan> {
        self.pointers.get(index)
    }

    fn target(&self, index: usize) -> Option<&Scan> {
        self.pointers.get(index).and_then(|p| p.target.as_ref())
    }
}

pub trait Referent {
    /// Conformant run. Advances `cur` exactly as [`Referent::emit`] would and
    /// records what it finds into `scan`, which the caller created at the
    /// start offset.
    fn scan(&self, cur: &mut Cursor<'_>, scan: &mut Scan) -> Result<()>;

    /// Deferred run. `scan` comes from the conformant run over the same bytes
    /// and may be partial if that run faulted; anything it lacks is read from
    /// the wire unchecked.
    fn emit(
        &self,
        cur: &mut Cursor<'_>,
        scan: &Scan,
        tree: &mut FieldTree,
        parent: NodeId,
    ) -> Result<()>;
}

/// Runs the conformant run of `referent` from the current offset. The scan is
/// returned even when the run faults so the deferred run can replay up to
/// the fault.
pub fn conformant_run<R: Referent + ?Sized>(
    referent: &R,
    cur: &mut Cursor<'_>,
) -> (Scan, Result<()>) {
    let mut scan = Scan::new(cur.offset());
    let result = referent.scan(cur, &mut scan);
    if result.is_ok() {
        scan.end = Some(cur.offset());
    }
    (scan, result)
}

/// Runs the deferred run of `referent` and checks it ends where the
/// conformant run did.
pub fn deferred_run<R: Referent + ?Sized>(
    referent: &R,
    cur: &mut Cursor<'_>,
    scan: &Scan,
    tree: &mut FieldTree,
    parent: NodeId,
) -> Result<()> {
    if cur.offset() != scan.start {
        return Err(NdrError::PhaseMismatch {
            offset: cur.offset(),
            detail: "deferred run starts away from conformant run",
        });
    }
    referent.emit(cur, scan, tree, parent)?;
    match scan.end {
        Some(end) if end != cur.offset() => Err(NdrError::PhaseMismatch {
            offset: cur.offset(),
            detail: "deferred run ends away from conformant run",
        }),
        _ => Ok(()),
    }
}

/// Decodes a top-level pointer and its referent.
///
/// Unique and full pointers read a referent id; zero means null and nothing
/// more is read. Top-level ref pointers read nothing and the referent follows
/// inline. Returns the pointer's tree node, whose range is extended over the
/// referent.
pub fn decode_pointer<R: Referent + ?Sized>(
    cur: &mut Cursor<'_>,
    tree: &mut FieldTree,
    parent: NodeId,
    kind: PointerKind,
    label: &str,
    referent: &R,
) -> Result<NodeId> {
    let start = cur.aligned(U32_ALIGN);
    let node = match kind {
        PointerKind::Ref => tree.add_item(parent, label, None, start..start),
        PointerKind::Unique | PointerKind::Full => {
            let id = cur.read_u32()?;
            tracing::trace!(offset = start, kind = kind.name(), referent_id = id, "ndr: top-level pointer");
            let value = if id == 0 {
                FieldValue::Null
            } else {
                FieldValue::Referent(id)
            };
            let node = tree.add_item(parent, label, Some(value), start..cur.offset());
            if id == 0 {
                return Ok(node);
            }
            node
        }
    };

    let mut dry = *cur;
    let (scan, scanned) = conformant_run(referent, &mut dry);
    if let Err(e) = &scanned {
        tracing::trace!(error = %e, "ndr: conformant run faulted, replaying deferred run");
    }
    let emitted = deferred_run(referent, cur, &scan, tree, node);
    tree.extend_to(node, cur.offset());
    emitted?;
    scanned?;
    Ok(node)
}

/// Conformant run of an embedded pointer header: reads the referent id and
/// records it. Returns the id.
pub fn scan_embedded(cur: &mut Cursor<'_>, kind: PointerKind, scan: &mut Scan) -> Result<u32> {
    let at = cur.aligned(U32_ALIGN);
    let id = cur.read_u32()?;
    scan.pointers.push(PointerScan {
        referent_id: id,
        target: None,
    });
    if id == 0 && !kind.is_nullable() {
        return Err(NdrError::NullReference { offset: at });
    }
    Ok(id)
}

/// Conformant run of the deferred referent of embedded pointer `index`.
/// Null pointers are skipped.
pub fn scan_deferred<R: Referent + ?Sized>(
    referent: &R,
    cur: &mut Cursor<'_>,
    scan: &mut Scan,
    index: usize,
) -> Result<()> {
    let Some(pointer) = scan.pointers.get(index) else {
        return Ok(());
    };
    if pointer.referent_id == 0 {
        return Ok(());
    }
    let (nested, result) = conformant_run(referent, cur);
    scan.pointers[index].target = Some(nested);
    result
}

/// Deferred run of an embedded pointer header. Adds a node labelled `label`
/// and returns it with the referent id read from the wire.
pub fn emit_embedded(
    cur: &mut Cursor<'_>,
    kind: PointerKind,
    label: &str,
    scan: &Scan,
    index: usize,
    tree: &mut FieldTree,
    parent: NodeId,
) -> Result<(NodeId, u32)> {
    let at = cur.aligned(U32_ALIGN);
    let id = cur.read_u32()?;
    if let Some(expected) = scan.pointer(index) {
        if expected.referent_id != id {
            return Err(NdrError::PhaseMismatch {
                offset: at,
                detail: "referent id differs between runs",
            });
        }
    }
    let value = if id == 0 {
        FieldValue::Null
    } else {
        FieldValue::Referent(id)
    };
    let node = tree.add_item(parent, label, Some(value), at..at + POINTER_HEADER_LEN);
    if id == 0 && !kind.is_nullable() {
        return Err(NdrError::NullReference { offset: at });
    }
    Ok((node, id))
}

/// Deferred run of the referent of embedded pointer `index`, attached under
/// `node`. Null pointers emit nothing.
pub fn emit_deferred<R: Referent + ?Sized>(
    referent: &R,
    cur: &mut Cursor<'_>,
    scan: &Scan,
    index: usize,
    referent_id: u32,
    tree: &mut FieldTree,
    node: NodeId,
) -> Result<()> {
    if referent_id == 0 {
        return Ok(());
    }
    let unverified;
    let nested = match scan.target(index) {
        Some(nested) => nested,
        None => {
            unverified = Scan::new(cur.offset());
            &unverified
        }
    };
    let result = deferred_run(referent, cur, nested, tree, node);
    tree.extend_to(node, cur.offset());
    result
}
