//! Semantic snapshots: a JSON export of one file's syntax and resolved
//! semantics, produced by a host front end.
//!
//! ```json
//! {
//!   "file": "src/Orders.cs",
//!   "types": {
//!     "System.Collections.Generic.List`1": {
//!       "interfaces": ["System.Collections.Generic.IList`1", "System.Collections.IList"]
//!     }
//!   },
//!   "nodes": [
//!     { "id": 1, "kind": "identifier", "name": "orders",
//!       "type": { "kind": "named", "name": "System.Collections.Generic.List`1" } },
//!     { "id": 2, "kind": "member_access", "receiver": 1, "name": "First" },
//!     { "id": 3, "kind": "invocation", "callee": 2, "span": { "line": 12, "column": 9 },
//!       "symbol": { "kind": "method", "name": "First",
//!                   "containing_type": "System.Linq.Enumerable" } }
//!   ]
//! }
//! ```

use super::{NodeId, NodeShape, ResolvedType, SemanticModel, Span, Symbol, SyntaxNode, SyntaxTree};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet, VecDeque};
use std::path::PathBuf;

/// File name suffix of semantic snapshots.
pub const SNAPSHOT_SUFFIX: &str = ".semantic.json";

/// Declared supertypes of a named type.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeEntry {
    /// Directly declared interfaces.
    #[serde(default)]
    pub interfaces: Vec<String>,
    /// Base class, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base: Option<String>,
}

/// One node as it appears in the snapshot file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnapshotNode {
    pub id: NodeId,
    #[serde(default)]
    pub span: Span,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(flatten)]
    pub shape: NodeShape,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub symbol: Option<Symbol>,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub ty: Option<ResolvedType>,
}

/// The deserialized form of a `*.semantic.json` file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot {
    /// Source file the nodes were taken from.
    pub file: PathBuf,
    #[serde(default)]
    pub types: BTreeMap<String, TypeEntry>,
    #[serde(default)]
    pub nodes: Vec<SnapshotNode>,
}

impl Snapshot {
    pub fn from_json(content: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(content)
    }

    /// Split into the syntax the engine visits and the model it queries.
    pub fn into_parts(self) -> Result<(SyntaxTree, SnapshotModel), String> {
        let mut model = SnapshotModel {
            type_table: self.types.into_iter().collect(),
            ..SnapshotModel::default()
        };

        let mut nodes = Vec::with_capacity(self.nodes.len());
        for node in self.nodes {
            if let Some(symbol) = node.symbol {
                model.symbols.insert(node.id, symbol);
            }
            if let Some(ty) = node.ty {
                model.types.insert(node.id, ty);
            }
            nodes.push(SyntaxNode {
                id: node.id,
                span: node.span,
                text: node.text,
                shape: node.shape,
            });
        }

        let tree = SyntaxTree::new(self.file, nodes)?;
        Ok((tree, model))
    }
}

/// A [`SemanticModel`] answering from snapshot data.
#[derive(Debug, Clone, Default)]
pub struct SnapshotModel {
    symbols: HashMap<NodeId, Symbol>,
    types: HashMap<NodeId, ResolvedType>,
    type_table: HashMap<String, TypeEntry>,
}

impl SnapshotModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_symbol(mut self, node: NodeId, symbol: Symbol) -> Self {
        self.symbols.insert(node, symbol);
        self
    }

    pub fn with_type_of(mut self, node: NodeId, ty: ResolvedType) -> Self {
        self.types.insert(node, ty);
        self
    }

    pub fn with_named_type(
        mut self,
        name: impl Into<String>,
        interfaces: &[&str],
        base: Option<&str>,
    ) -> Self {
        self.type_table.insert(
            name.into(),
            TypeEntry {
                interfaces: interfaces.iter().map(|s| s.to_string()).collect(),
                base: base.map(str::to_string),
            },
        );
        self
    }
}

impl SemanticModel for SnapshotModel {
    fn symbol(&self, node: NodeId) -> Option<Symbol> {
        self.symbols.get(&node).cloned()
    }

    fn type_of(&self, node: NodeId) -> Option<ResolvedType> {
        self.types.get(&node).cloned()
    }

    /// Breadth-first closure over base types and interface inheritance.
    /// Cycles in malformed snapshots are cut by the expanded set.
    fn all_interfaces(&self, type_name: &str) -> Vec<String> {
        let mut interfaces = Vec::new();
        let mut recorded: HashSet<&str> = HashSet::new();
        let mut expanded: HashSet<&str> = HashSet::new();
        let mut queue: VecDeque<&str> = VecDeque::new();

        expanded.insert(type_name);
        queue.push_back(type_name);

        while let Some(current) = queue.pop_front() {
            let Some(entry) = self.type_table.get(current) else {
                continue;
            };

            for interface in &entry.interfaces {
                if interface != type_name && recorded.insert(interface) {
                    interfaces.push(interface.clone());
                }
                if expanded.insert(interface) {
                    queue.push_back(interface);
                }
            }

            if let Some(base) = &entry.base {
                if expanded.insert(base) {
                    queue.push_back(base);
                }
            }
        }

        interfaces
    }
}
