//! Decoded field tree.
//!
//! Arena of nodes addressed by [`NodeId`]. Node 0 is the root. Subtree nodes
//! (pointers, containers) are added before their content is known and have
//! their range end moved once the content has been decoded.

use std::ops::Range;

use serde::Serialize;

use crate::field::FieldInfo;

pub type NodeId = usize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum FieldValue {
    Uint32(u32),
    Text(String),
    /// Non-null pointer header.
    Referent(u32),
    /// Null pointer header.
    Null,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    pub field: Option<&'static FieldInfo>,
    pub label: String,
    pub value: Option<FieldValue>,
    pub range: Range<usize>,
    pub children: Vec<NodeId>,
}

impl Node {
    pub fn abbrev(&self) -> Option<&'static str> {
        self.field.map(|f| f.abbrev)
    }

    pub fn as_u32(&self) -> Option<u32> {
        match self.value {
            Some(FieldValue::Uint32(v)) => Some(v),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match &self.value {
            Some(FieldValue::Text(s)) => Some(s),
            _ => None,
        }
    }

    pub fn is_null_pointer(&self) -> bool {
        self.value == Some(FieldValue::Null)
    }

    /// One-line rendering, e.g. `Platform id: 0x000001f4`.
    pub fn display(&self) -> String {
        match (&self.value, self.field) {
            (None, _) => self.label.clone(),
            (Some(FieldValue::Uint32(v)), Some(field)) => {
                format!("{}: {}", self.label, field.format_u32(*v))
            }
            (Some(FieldValue::Uint32(v)), None) => format!("{}: {v}", self.label),
            (Some(FieldValue::Text(s)), _) => format!("{}: {s}", self.label),
            (Some(FieldValue::Referent(id)), _) => {
                format!("{} (referent id {id:#010x})", self.label)
            }
            (Some(FieldValue::Null), _) => format!("{}: (NULL pointer)", self.label),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldTree {
    nodes: Vec<Node>,
}

impl FieldTree {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            nodes: vec![Node {
                field: None,
                label: label.into(),
                value: None,
                range: 0..0,
                children: Vec::new(),
            }],
        }
    }

    pub fn root(&self) -> NodeId {
        0
    }

    fn push(&mut self, parent: NodeId, node: Node) -> NodeId {
        let id = self.nodes.len();
        self.nodes.push(node);
        self.nodes[parent].children.push(id);
        id
    }

    pub fn add_field(
        &mut self,
        parent: NodeId,
        field: &'static FieldInfo,
        value: FieldValue,
        range: Range<usize>,
    ) -> NodeId {
        self.push(
            parent,
            Node {
                field: Some(field),
                label: field.name.to_string(),
                value: Some(value),
                range,
                children: Vec::new(),
            },
        )
    }

    /// Adds a labelled node with an optional value and no field metadata.
    pub fn add_item(
        &mut self,
        parent: NodeId,
        label: impl Into<String>,
        value: Option<FieldValue>,
        range: Range<usize>,
    ) -> NodeId {
        self.push(
            parent,
            Node {
                field: None,
                label: label.into(),
                value,
                range,
                children: Vec::new(),
            },
        )
    }

    pub fn set_range(&mut self, id: NodeId, range: Range<usize>) {
        self.nodes[id].range = range;
    }

    /// Moves the end of a node's range forward to `end`.
    pub fn extend_to(&mut self, id: NodeId, end: usize) {
        let range = &mut self.nodes[id].range;
        if end > range.end {
            range.end = end;
        }
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id]
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.len() == 1
    }

    /// Nodes in depth-first pre-order, root first.
    pub fn walk(&self) -> Vec<NodeId> {
        let mut out = Vec::with_capacity(self.nodes.len());
        let mut stack = vec![self.root()];
        while let Some(id) = stack.pop() {
            out.push(id);
            stack.extend(self.nodes[id].children.iter().rev());
        }
        out
    }

    /// First node carrying the field with filter name `abbrev`.
    pub fn find(&self, abbrev: &str) -> Option<&Node> {
        self.walk()
            .into_iter()
            .map(|id| &self.nodes[id])
            .find(|n| n.abbrev() == Some(abbrev))
    }

    pub fn find_all(&self, abbrev: &str) -> Vec<&Node> {
        self.walk()
            .into_iter()
            .map(|id| &self.nodes[id])
            .filter(|n| n.abbrev() == Some(abbrev))
            .collect()
    }

    /// First node whose label is exactly `label`.
    pub fn find_label(&self, label: &str) -> Option<&Node> {
        self.walk()
            .into_iter()
            .map(|id| &self.nodes[id])
            .find(|n| n.label == label)
    }

    /// Number of nodes carrying field metadata.
    pub fn field_count(&self) -> usize {
        self.nodes.iter().filter(|n| n.field.is_some()).count()
    }

    /// Indented text rendering, two spaces per level.
    pub fn render_text(&self) -> String {
        let mut out = String::new();
        self.render_node(self.root(), 0, &mut out);
        out
    }

    fn render_node(&self, id: NodeId, depth: usize, out: &mut String) {
        let node = &self.nodes[id];
        let range = &node.range;
        out.push_str(&"  ".repeat(depth));
        out.push_str(&node.display());
        out.push_str(&format!("  [{}..{}]\n", range.start, range.end));
        for child in &node.children {
            self.render_node(*child, depth + 1, out);
        }
    }

    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self.view(self.root())).unwrap_or(serde_json::Value::Null)
    }

    fn view(&self, id: NodeId) -> NodeView<'_> {
        let node = &self.nodes[id];
        NodeView {
            field: node.abbrev(),
            label: &node.label,
            value: node.value.as_ref(),
            offset: node.range.start,
            length: node.range.end.saturating_sub(node.range.start),
            children: node.children.iter().map(|c| self.view(*c)).collect(),
        }
    }
}

#[derive(Serialize)]
struct NodeView<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    field: Option<&'static str>,
    label: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    value: Option<&'a FieldValue>,
    offset: usize,
    length: usize,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    children: Vec<NodeView<'a>>,
}
