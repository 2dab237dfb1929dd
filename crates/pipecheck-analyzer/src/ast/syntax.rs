use pipecheck_common::Position;
use serde::Deserialize;

/// Structural kind of a syntax node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(from = "String")]
pub enum NodeKind {
    /// Plain or quoted scalar written inline.
    StringScalar,
    /// `|` or `>` scalar spanning following indented lines.
    BlockScalar,
    Mapping,
    Sequence,
    Other,
}

impl From<String> for NodeKind {
    fn from(kind: String) -> Self {
        match kind.as_str() {
            "string_scalar" => NodeKind::StringScalar,
            "block_scalar" => NodeKind::BlockScalar,
            "block_mapping" | "flow_mapping" | "mapping" => NodeKind::Mapping,
            "block_sequence" | "flow_sequence" | "sequence" => NodeKind::Sequence,
            _ => NodeKind::Other,
        }
    }
}

/// A node of the concrete syntax tree.
#[derive(Debug, Clone, Deserialize)]
pub struct SyntaxNode {
    pub kind: NodeKind,
    pub start: Position,
    pub end: Position,
    /// Raw source text covered by the node.
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub children: Vec<SyntaxNode>,
}

/// Concrete syntax tree of one document.
#[derive(Debug, Clone, Deserialize)]
pub struct SyntaxTree {
    pub root: SyntaxNode,
}

impl SyntaxNode {
    pub fn new(kind: NodeKind, start: Position, end: Position, text: impl Into<String>) -> Self {
        Self {
            kind,
            start,
            end,
            text: text.into(),
            children: Vec::new(),
        }
    }

    pub fn with_children(mut self, children: Vec<SyntaxNode>) -> Self {
        self.children = children;
        self
    }
}

impl SyntaxTree {
    pub fn new(root: SyntaxNode) -> Self {
        Self { root }
    }

    /// All nodes of `kind`, in pre-order (document order).
    pub fn nodes_of_kind(&self, kind: NodeKind) -> Vec<&SyntaxNode> {
        let mut found = Vec::new();
        let mut stack = vec![&self.root];
        while let Some(node) = stack.pop() {
            if node.kind == kind {
                found.push(node);
            }
            // Reverse so the leftmost child is visited first.
            stack.extend(node.children.iter().rev());
        }
        found
    }
}
