//! Flat NDR structures described as static member lists.
//!
//! A [`Layout`] is a sequence of 32-bit scalars and embedded pointers to
//! strings. Its fixed part is every member in order (scalars and referent
//! ids); string content for non-null pointers follows the fixed part in
//! member order.

use crate::cursor::Cursor;
use crate::field::FieldInfo;
use crate::pointer::{
    emit_deferred, emit_embedded, scan_deferred, scan_embedded, PointerKind, Referent, Scan,
};
use crate::string::ConformantString;
use crate::tree::{FieldTree, FieldValue, NodeId};
use crate::{Result, U32_ALIGN};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Member {
    Uint32(&'static FieldInfo),
    /// Embedded pointer to a conformant varying string.
    Pointer {
        kind: PointerKind,
        label: &'static str,
        field: &'static FieldInfo,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Layout {
    pub name: &'static str,
    pub members: &'static [Member],
}

impl Layout {
    /// Bytes occupied by the fixed part.
    pub const fn fixed_len(&self) -> usize {
        self.members.len() * 4
    }

    pub fn pointer_count(&self) -> usize {
        self.members
            .iter()
            .filter(|m| matches!(m, Member::Pointer { .. }))
            .count()
    }
}

impl Referent for Layout {
    fn scan(&self, cur: &mut Cursor<'_>, scan: &mut Scan) -> Result<()> {
        let mut targets = Vec::new();
        for member in self.members {
            match member {
                Member::Uint32(_) => {
                    cur.read_u32()?;
                }
                Member::Pointer { kind, field, .. } => {
                    scan_embedded(cur, *kind, scan)?;
                    targets.push(ConformantString::new(*field));
                }
            }
        }
        for (index, target) in targets.iter().enumerate() {
            scan_deferred(target, cur, scan, index)?;
        }
        Ok(())
    }

    fn emit(
        &self,
        cur: &mut Cursor<'_>,
        scan: &Scan,
        tree: &mut FieldTree,
        parent: NodeId,
    ) -> Result<()> {
        let mut deferred = Vec::new();
        for member in self.members {
            match member {
                Member::Uint32(field) => {
                    let start = cur.aligned(U32_ALIGN);
                    let value = cur.read_u32()?;
                    tree.add_field(parent, *field, FieldValue::Uint32(value), start..cur.offset());
                }
                Member::Pointer { kind, label, field } => {
                    let index = deferred.len();
                    let (node, id) = emit_embedded(cur, *kind, label, scan, index, tree, parent)?;
                    deferred.push((ConformantString::new(*field), id, node));
                }
            }
        }
        for (index, (target, id, node)) in deferred.iter().enumerate() {
            emit_deferred(target, cur, scan, index, *id, tree, *node)?;
        }
        tree.extend_to(parent, cur.offset());
        Ok(())
    }
}
