//! Syntax nodes as handed over by the host front end.
//!
//! Nodes live in a flat arena keyed by [`NodeId`]; parents refer to their
//! children by id. The engine never walks the tree recursively, it visits
//! every node once in arena order.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Identifier of a node within one [`SyntaxTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub u32);

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Source span of a node, 1-indexed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Span {
    pub line: usize,
    pub column: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_line: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_column: Option<usize>,
}

impl Span {
    pub fn new(line: usize, column: usize) -> Self {
        Self {
            line,
            column,
            end_line: None,
            end_column: None,
        }
    }
}

/// The kinds of node a rule can register for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Invocation,
    MemberAccess,
    Identifier,
    Literal,
    FieldDeclaration,
    PropertyDeclaration,
    MethodDeclaration,
    Other,
}

impl std::fmt::Display for NodeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            NodeKind::Invocation => "invocation",
            NodeKind::MemberAccess => "member access",
            NodeKind::Identifier => "identifier",
            NodeKind::Literal => "literal",
            NodeKind::FieldDeclaration => "field declaration",
            NodeKind::PropertyDeclaration => "property declaration",
            NodeKind::MethodDeclaration => "method declaration",
            NodeKind::Other => "other",
        };
        f.write_str(name)
    }
}

/// Shape-specific payload of a node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum NodeShape {
    /// `callee(arguments...)`
    Invocation {
        callee: NodeId,
        #[serde(default)]
        arguments: Vec<NodeId>,
    },
    /// `receiver.name`
    MemberAccess { receiver: NodeId, name: String },
    Identifier { name: String },
    Literal,
    FieldDeclaration { name: String },
    PropertyDeclaration { name: String },
    MethodDeclaration { name: String },
    Other,
}

impl NodeShape {
    pub fn kind(&self) -> NodeKind {
        match self {
            NodeShape::Invocation { .. } => NodeKind::Invocation,
            NodeShape::MemberAccess { .. } => NodeKind::MemberAccess,
            NodeShape::Identifier { .. } => NodeKind::Identifier,
            NodeShape::Literal => NodeKind::Literal,
            NodeShape::FieldDeclaration { .. } => NodeKind::FieldDeclaration,
            NodeShape::PropertyDeclaration { .. } => NodeKind::PropertyDeclaration,
            NodeShape::MethodDeclaration { .. } => NodeKind::MethodDeclaration,
            NodeShape::Other => NodeKind::Other,
        }
    }

    /// Ids of the nodes this one refers to.
    pub fn children(&self) -> Vec<NodeId> {
        match self {
            NodeShape::Invocation { callee, arguments } => {
                let mut ids = Vec::with_capacity(arguments.len() + 1);
                ids.push(*callee);
                ids.extend(arguments.iter().copied());
                ids
            }
            NodeShape::MemberAccess { receiver, .. } => vec![*receiver],
            _ => Vec::new(),
        }
    }
}

/// A single syntax node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxNode {
    pub id: NodeId,
    pub span: Span,
    /// Source text of the node, when the host provides it.
    pub text: Option<String>,
    pub shape: NodeShape,
}

impl SyntaxNode {
    pub fn new(id: NodeId, span: Span, shape: NodeShape) -> Self {
        Self {
            id,
            span,
            text: None,
            shape,
        }
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn kind(&self) -> NodeKind {
        self.shape.kind()
    }

    /// Best human-readable name for this node, used in finding messages.
    pub fn display_name(&self) -> &str {
        match &self.shape {
            NodeShape::Identifier { name }
            | NodeShape::FieldDeclaration { name }
            | NodeShape::PropertyDeclaration { name }
            | NodeShape::MethodDeclaration { name } => name,
            NodeShape::MemberAccess { name, .. } if self.text.is_none() => name,
            _ => self.text.as_deref().unwrap_or("expression"),
        }
    }
}

/// All nodes of one analysed file.
#[derive(Debug, Clone, Default)]
pub struct SyntaxTree {
    file: PathBuf,
    nodes: Vec<SyntaxNode>,
    index: HashMap<NodeId, usize>,
}

impl SyntaxTree {
    /// Build a tree from nodes, rejecting duplicate ids and dangling child
    /// references.
    pub fn new(file: impl Into<PathBuf>, nodes: Vec<SyntaxNode>) -> Result<Self, String> {
        let mut index = HashMap::with_capacity(nodes.len());
        for (pos, node) in nodes.iter().enumerate() {
            if index.insert(node.id, pos).is_some() {
                return Err(format!("duplicate node id {}", node.id));
            }
        }

        for node in &nodes {
            for child in node.shape.children() {
                if !index.contains_key(&child) {
                    return Err(format!("node {} refers to unknown node {}", node.id, child));
                }
            }
        }

        Ok(Self {
            file: file.into(),
            nodes,
            index,
        })
    }

    pub fn file(&self) -> &Path {
        &self.file
    }

    pub fn get(&self, id: NodeId) -> Option<&SyntaxNode> {
        self.index.get(&id).map(|&pos| &self.nodes[pos])
    }

    pub fn nodes(&self) -> &[SyntaxNode] {
        &self.nodes
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}
