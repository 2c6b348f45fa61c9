//! Static field metadata. Presentation only; decoding never consults it.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    Uint32,
    String,
}

/// Display base for integer fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Base {
    None,
    Dec,
    Hex,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FieldInfo {
    /// Label shown in the tree.
    pub name: &'static str,
    /// Dotted filter name, e.g. `srvsvc.server`.
    pub abbrev: &'static str,
    pub kind: FieldKind,
    pub base: Base,
    pub blurb: &'static str,
}

impl FieldInfo {
    pub fn format_u32(&self, value: u32) -> String {
        match self.base {
            Base::Hex => format!("{value:#010x}"),
            Base::Dec | Base::None => value.to_string(),
        }
    }
}
