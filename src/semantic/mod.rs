//! The host boundary: what the engine needs to know about a program.
//!
//! The front end that parses and type-checks source code is not part of this
//! crate. It hands the engine a [`SyntaxTree`] plus a [`SemanticModel`] that
//! answers three questions: which symbol a node resolves to, which static type
//! an expression has, and which interfaces a named type implements.
//! [`snapshot`] provides a model backed by a JSON export of that information.

pub mod snapshot;
mod syntax;

pub use snapshot::{Snapshot, SnapshotModel};
pub use syntax::{NodeId, NodeKind, NodeShape, Span, SyntaxNode, SyntaxTree};

use serde::{Deserialize, Serialize};

/// A statically resolved type at a call site.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ResolvedType {
    /// An array of any rank; arrays have no nominal interface list.
    Array { element: Box<ResolvedType> },
    /// A class, struct or interface identified by its canonical full name.
    Named { name: String },
    /// A generic type parameter whose concrete type is unknown here.
    TypeParameter { name: String },
    Dynamic,
    /// The front end could not resolve the type.
    Error,
}

impl ResolvedType {
    pub fn named(name: impl Into<String>) -> Self {
        ResolvedType::Named { name: name.into() }
    }

    pub fn array_of(element: ResolvedType) -> Self {
        ResolvedType::Array {
            element: Box::new(element),
        }
    }

    pub fn is_array(&self) -> bool {
        matches!(self, ResolvedType::Array { .. })
    }

    /// Type parameters, `dynamic` and error types carry no usable shape.
    pub fn is_opaque(&self) -> bool {
        matches!(
            self,
            ResolvedType::TypeParameter { .. } | ResolvedType::Dynamic | ResolvedType::Error
        )
    }
}

impl std::fmt::Display for ResolvedType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ResolvedType::Array { element } => write!(f, "{}[]", element),
            ResolvedType::Named { name } | ResolvedType::TypeParameter { name } => {
                f.write_str(name)
            }
            ResolvedType::Dynamic => f.write_str("dynamic"),
            ResolvedType::Error => f.write_str("?"),
        }
    }
}

/// A method as resolved by the front end.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MethodSymbol {
    /// Simple name, without type arguments.
    pub name: String,
    /// Full name of the declaring type.
    #[serde(default)]
    pub containing_type: Option<String>,
    /// Parameters of the resolved overload as seen at the call site; an
    /// extension method called with receiver syntax does not count its
    /// receiver.
    #[serde(default)]
    pub parameter_count: usize,
    /// `None` for methods returning nothing.
    #[serde(default)]
    pub return_type: Option<ResolvedType>,
}

/// What a node refers to (for expressions) or declares (for declarations).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Symbol {
    Method(MethodSymbol),
    Field {
        name: String,
        #[serde(rename = "type")]
        ty: ResolvedType,
    },
    Property {
        name: String,
        #[serde(rename = "type")]
        ty: ResolvedType,
    },
    Local {
        name: String,
        #[serde(rename = "type")]
        ty: ResolvedType,
    },
    Parameter {
        name: String,
        #[serde(rename = "type")]
        ty: ResolvedType,
    },
}

impl Symbol {
    pub fn name(&self) -> &str {
        match self {
            Symbol::Method(method) => &method.name,
            Symbol::Field { name, .. }
            | Symbol::Property { name, .. }
            | Symbol::Local { name, .. }
            | Symbol::Parameter { name, .. } => name,
        }
    }

    pub fn as_method(&self) -> Option<&MethodSymbol> {
        match self {
            Symbol::Method(method) => Some(method),
            _ => None,
        }
    }
}

/// Semantic queries the engine issues against the host.
///
/// Every query may fail; the engine treats `None` as "not a match" and never
/// as an error.
pub trait SemanticModel {
    /// Resolve the symbol for `node`. Ambiguous or dynamic bindings return
    /// `None`.
    fn symbol(&self, node: NodeId) -> Option<Symbol>;

    /// Static type of the expression `node`.
    fn type_of(&self, node: NodeId) -> Option<ResolvedType>;

    /// Full names of every interface the named type implements, including
    /// those inherited through base types and other interfaces.
    fn all_interfaces(&self, type_name: &str) -> Vec<String>;
}
