use crate::capability::CapabilityTable;
use crate::semantic::{NodeId, SemanticModel, SyntaxNode, SyntaxTree};
use std::path::Path;

/// Context passed to rules during analysis
pub struct AnalysisContext<'a> {
    pub file_path: &'a Path,
    pub tree: &'a SyntaxTree,
    pub model: &'a dyn SemanticModel,
    pub capabilities: &'a CapabilityTable,
    /// Full name of the sequence-operations facade type.
    pub facade: &'a str,
}

impl<'a> AnalysisContext<'a> {
    pub fn new(
        tree: &'a SyntaxTree,
        model: &'a dyn SemanticModel,
        capabilities: &'a CapabilityTable,
        facade: &'a str,
    ) -> Self {
        Self {
            file_path: tree.file(),
            tree,
            model,
            capabilities,
            facade,
        }
    }

    /// Look up a node of the current tree.
    pub fn node(&self, id: NodeId) -> Option<&'a SyntaxNode> {
        self.tree.get(id)
    }
}
