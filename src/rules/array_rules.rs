//! Declaration rules: members that expose a mutable array in their signature.

use super::{format_message, Explanation, Finding, Rule, RuleId, Severity};
use crate::engine::AnalysisContext;
use crate::semantic::{NodeKind, Symbol, SyntaxNode};

/// The kind of declaration an [`ArrayDeclarationRule`] inspects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Declaration {
    Field,
    Property,
    /// A method's return type; methods returning nothing are skipped.
    MethodReturn,
}

impl Declaration {
    fn node_kinds(self) -> &'static [NodeKind] {
        match self {
            Declaration::Field => &[NodeKind::FieldDeclaration],
            Declaration::Property => &[NodeKind::PropertyDeclaration],
            Declaration::MethodReturn => &[NodeKind::MethodDeclaration],
        }
    }

    /// Whether `symbol` is this kind of declaration with an array type.
    fn declares_array(self, symbol: &Symbol) -> bool {
        match (self, symbol) {
            (Declaration::Field, Symbol::Field { ty, .. })
            | (Declaration::Property, Symbol::Property { ty, .. }) => ty.is_array(),
            (Declaration::MethodReturn, Symbol::Method(method)) => method
                .return_type
                .as_ref()
                .is_some_and(|ty| ty.is_array()),
            _ => false,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ArrayDeclarationRule {
    pub id: RuleId,
    pub name: &'static str,
    pub description: &'static str,
    pub declaration: Declaration,
    /// Message with a `{0}` slot for the declared name.
    pub message: &'static str,
    pub explanation: Explanation,
}

impl Rule for ArrayDeclarationRule {
    fn id(&self) -> RuleId {
        self.id
    }

    fn name(&self) -> &'static str {
        self.name
    }

    fn description(&self) -> &'static str {
        self.description
    }

    fn default_severity(&self) -> Severity {
        Severity::Warning
    }

    fn node_kinds(&self) -> &'static [NodeKind] {
        self.declaration.node_kinds()
    }

    fn explanation(&self) -> Option<&Explanation> {
        Some(&self.explanation)
    }

    fn check(&self, node: &SyntaxNode, ctx: &AnalysisContext<'_>) -> Option<Finding> {
        let symbol = ctx.model.symbol(node.id)?;
        if !self.declaration.declares_array(&symbol) {
            return None;
        }

        Some(Finding::at_node(
            self,
            ctx,
            node,
            format_message(self.message, symbol.name()),
        ))
    }
}

pub const ARRAY_PROPERTY: ArrayDeclarationRule = ArrayDeclarationRule {
    id: RuleId::new(1),
    name: "array-property",
    description: "Property exposes an array; callers can mutate its elements",
    declaration: Declaration::Property,
    message: "The '{0}' property has an array type; expose an IReadOnlyList<T> instead",
    explanation: Explanation {
        why: "An array handed out by a property can be written to by every caller. A\n\
              read-only list interface keeps indexing and Count without that exposure.",
        bad: "public int[] Scores { get; }",
        good: "public IReadOnlyList<int> Scores { get; }",
        suggestion: "Expose an IReadOnlyList<T>",
    },
};

pub const ARRAY_FIELD: ArrayDeclarationRule = ArrayDeclarationRule {
    id: RuleId::new(2),
    name: "array-field",
    description: "Field holds an array; prefer a read-only list",
    declaration: Declaration::Field,
    message: "The '{0}' field has an array type; store an IReadOnlyList<T> instead",
    explanation: Explanation {
        why: "Array fields are mutable element by element even when the field is readonly.",
        bad: "private readonly string[] names;",
        good: "private readonly IReadOnlyList<string> names;",
        suggestion: "Store an IReadOnlyList<T>",
    },
};

pub const ARRAY_RETURN: ArrayDeclarationRule = ArrayDeclarationRule {
    id: RuleId::new(3),
    name: "array-return",
    description: "Method returns an array instead of a read-only list",
    declaration: Declaration::MethodReturn,
    message: "The '{0}' method returns an array instead of an IReadOnlyList<T>",
    explanation: Explanation {
        why: "Returning an array commits the method to allocating one and lets callers modify\n\
              what it returned.",
        bad: "public Order[] OpenOrders() => orders.Where(IsOpen).ToArray();",
        good: "public IReadOnlyList<Order> OpenOrders() => orders.Where(IsOpen).ToList();",
        suggestion: "Return an IReadOnlyList<T>",
    },
};

/// Every built-in declaration rule.
pub const ALL: &[ArrayDeclarationRule] = &[ARRAY_PROPERTY, ARRAY_FIELD, ARRAY_RETURN];

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capability::CapabilityTable;
    use crate::semantic::{
        MethodSymbol, NodeId, NodeShape, ResolvedType, SnapshotModel, Span, SyntaxTree,
    };

    fn declaration(shape: NodeShape) -> SyntaxTree {
        SyntaxTree::new("Scores.cs", vec![SyntaxNode::new(NodeId(1), Span::new(3, 5), shape)]).unwrap()
    }

    fn run(rule: &ArrayDeclarationRule, tree: &SyntaxTree, symbol: Symbol) -> Option<Finding> {
        let model = SnapshotModel::new().with_symbol(NodeId(1), symbol);
        let table = CapabilityTable::default();
        let ctx = AnalysisContext::new(tree, &model, &table, "System.Linq.Enumerable");
        rule.check(tree.get(NodeId(1)).unwrap(), &ctx)
    }

    fn int_array() -> ResolvedType {
        ResolvedType::array_of(ResolvedType::named("System.Int32"))
    }

    #[test]
    fn test_array_field() {
        let tree = declaration(NodeShape::FieldDeclaration {
            name: "scores".to_string(),
        });
        let finding = run(
            &ARRAY_FIELD,
            &tree,
            Symbol::Field {
                name: "scores".to_string(),
                ty: int_array(),
            },
        )
        .unwrap();
        assert_eq!(finding.rule_id, RuleId::new(2));
        assert_eq!(
            finding.message,
            "The 'scores' field has an array type; store an IReadOnlyList<T> instead"
        );
        assert_eq!(finding.line, 3);

        let list_field = Symbol::Field {
            name: "scores".to_string(),
            ty: ResolvedType::named("System.Collections.Generic.List`1"),
        };
        assert!(run(&ARRAY_FIELD, &tree, list_field).is_none());
    }

    #[test]
    fn test_array_property() {
        let tree = declaration(NodeShape::PropertyDeclaration {
            name: "Scores".to_string(),
        });
        let property = Symbol::Property {
            name: "Scores".to_string(),
            ty: int_array(),
        };
        assert!(run(&ARRAY_PROPERTY, &tree, property.clone()).is_some());
        // a property symbol is not a field
        assert!(run(&ARRAY_FIELD, &tree, property).is_none());
    }

    #[test]
    fn test_array_return() {
        let tree = declaration(NodeShape::MethodDeclaration {
            name: "OpenOrders".to_string(),
        });
        let returning = |return_type| {
            Symbol::Method(MethodSymbol {
                name: "OpenOrders".to_string(),
                containing_type: Some("Shop.OrderBook".to_string()),
                parameter_count: 0,
                return_type,
            })
        };

        let finding = run(&ARRAY_RETURN, &tree, returning(Some(int_array()))).unwrap();
        assert!(finding.message.contains("'OpenOrders'"));
        assert!(run(&ARRAY_RETURN, &tree, returning(None)).is_none());
        assert!(run(
            &ARRAY_RETURN,
            &tree,
            returning(Some(ResolvedType::named("System.Int32")))
        )
        .is_none());
    }

    #[test]
    fn test_unresolved_declaration() {
        let tree = declaration(NodeShape::FieldDeclaration {
            name: "scores".to_string(),
        });
        let model = SnapshotModel::new();
        let table = CapabilityTable::default();
        let ctx = AnalysisContext::new(&tree, &model, &table, "System.Linq.Enumerable");
        assert!(ARRAY_FIELD.check(tree.get(NodeId(1)).unwrap(), &ctx).is_none());
    }
}
