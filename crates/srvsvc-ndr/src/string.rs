//! Conformant varying UTF-16 strings (`[string] wchar_t *`).

use crate::cursor::Cursor;
use crate::field::FieldInfo;
use crate::pointer::{Referent, Scan};
use crate::tree::{FieldTree, FieldValue, NodeId};
use crate::{NdrError, Result, U32_ALIGN};

/// String referent. Emits one text field carrying `field`.
#[derive(Debug, Clone, Copy)]
pub struct ConformantString {
    pub field: &'static FieldInfo,
}

impl ConformantString {
    pub fn new(field: &'static FieldInfo) -> Self {
        Self { field }
    }
}

impl Referent for ConformantString {
    fn scan(&self, cur: &mut Cursor<'_>, scan: &mut Scan) -> Result<()> {
        let header = cur.read_conformance()?;
        scan.arrays.push(header);
        cur.skip_utf16(header.actual_count)
    }

    fn emit(
        &self,
        cur: &mut Cursor<'_>,
        scan: &Scan,
        tree: &mut FieldTree,
        parent: NodeId,
    ) -> Result<()> {
        let start = cur.aligned(U32_ALIGN);
        let (header, text) = cur.read_string()?;
        if let Some(expected) = scan.array(0) {
            if *expected != header {
                return Err(NdrError::PhaseMismatch {
                    offset: start,
                    detail: "array header differs between runs",
                });
            }
        }
        tree.add_field(parent, self.field, FieldValue::Text(text), start..cur.offset());
        Ok(())
    }
}
