//! Call-site rules: a sequence operation invoked through the facade where the
//! receiver already offers a cheaper native member.
//!
//! Every rule here is one [`RedundantCallRule`] value; the shared matcher in
//! [`crate::matcher`] does the work.

use super::{format_message, Explanation, Finding, Rule, RuleId, Severity};
use crate::capability::{Capability, CapabilityPredicate};
use crate::engine::AnalysisContext;
use crate::matcher::match_call;
use crate::semantic::{NodeKind, SyntaxNode};

const INVOCATION: &[NodeKind] = &[NodeKind::Invocation];
const MEMBER_ACCESS: &[NodeKind] = &[NodeKind::MemberAccess];

/// A rule flagging facade calls to `operations` on receivers satisfying
/// `predicate`.
#[derive(Debug, Clone, Copy)]
pub struct RedundantCallRule {
    pub id: RuleId,
    pub name: &'static str,
    pub description: &'static str,
    pub operations: &'static [&'static str],
    pub predicate: CapabilityPredicate,
    pub node_kinds: &'static [NodeKind],
    /// Message with a `{0}` slot for the receiver expression.
    pub message: &'static str,
    pub explanation: Explanation,
}

impl Rule for RedundantCallRule {
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
        self.node_kinds
    }

    fn explanation(&self) -> Option<&Explanation> {
        Some(&self.explanation)
    }

    fn check(&self, node: &SyntaxNode, ctx: &AnalysisContext<'_>) -> Option<Finding> {
        let site = self
            .operations
            .iter()
            .find_map(|operation| match_call(ctx, node, operation, self.predicate))?;

        let subject = ctx
            .node(site.receiver)
            .map(SyntaxNode::display_name)
            .unwrap_or("expression");

        Some(Finding::at_node(
            self,
            ctx,
            node,
            format_message(self.message, subject),
        ))
    }
}

pub const DISTINCT_ON_SEQUENCE: RedundantCallRule = RedundantCallRule {
    id: RuleId::new(4),
    name: "distinct-on-sequence",
    description: "Distinct() rebuilds a set on every call; keep the values in a set-based collection",
    operations: &["Distinct"],
    predicate: CapabilityPredicate::Has(Capability::Iterable),
    node_kinds: MEMBER_ACCESS,
    message: "'{0}' calls Distinct(), which is O(n) on every call; store the values in a HashSet<T> instead",
    explanation: Explanation {
        why: "Distinct() walks the whole sequence and hashes every element each time it is\n\
              enumerated. A HashSet<T> keeps elements unique as they are added, with O(1)\n\
              additions and lookups.",
        bad: "var tags = post.Tags.Distinct().ToList();",
        good: "var tags = new HashSet<string>(post.Tags);",
        suggestion: "Keep the values in a HashSet<T>",
    },
};

pub const ELEMENT_AT_ON_LIST: RedundantCallRule = RedundantCallRule {
    id: RuleId::new(5),
    name: "element-at-on-list",
    description: "ElementAt()/ElementAtOrDefault() on an indexed list; use the indexer",
    operations: &["ElementAt", "ElementAtOrDefault"],
    predicate: CapabilityPredicate::Has(Capability::Indexed),
    node_kinds: INVOCATION,
    message: "'{0}' is an IList calling ElementAt() or ElementAtOrDefault(); use the indexer instead",
    explanation: Explanation {
        why: "The facade has to type-test the receiver before it can use the indexer. Calling\n\
              the indexer directly skips the dispatch and states the intent.",
        bad: "var third = orders.ElementAt(2);",
        good: "var third = orders[2];",
        suggestion: "Use the indexer",
    },
};

pub const FIRST_ON_LIST: RedundantCallRule = RedundantCallRule {
    id: RuleId::new(6),
    name: "first-on-list",
    description: "First()/FirstOrDefault() on an indexed list; use the indexer",
    operations: &["First", "FirstOrDefault"],
    predicate: CapabilityPredicate::Has(Capability::Indexed),
    node_kinds: INVOCATION,
    message: "'{0}' is an IList calling First() or FirstOrDefault(); use indexing instead",
    explanation: Explanation {
        why: "An indexed list reaches its first element in constant time. The facade call adds\n\
              an interface dispatch and, for FirstOrDefault, hides the empty case.",
        bad: "var head = orders.First();",
        good: "var head = orders[0];",
        suggestion: "Use orders[0] (check Count for the empty case)",
    },
};

pub const LAST_ON_LIST: RedundantCallRule = RedundantCallRule {
    id: RuleId::new(7),
    name: "last-on-list",
    description: "Last()/LastOrDefault() on an indexed list; index the final element",
    operations: &["Last", "LastOrDefault"],
    predicate: CapabilityPredicate::Has(Capability::Indexed),
    node_kinds: INVOCATION,
    message: "'{0}' is an IList calling Last() or LastOrDefault(); use indexing with Count - 1 instead",
    explanation: Explanation {
        why: "Indexing with Count - 1 is constant time on any indexed list. The facade call\n\
              only avoids enumeration when its runtime type test succeeds.",
        bad: "var tail = orders.Last();",
        good: "var tail = orders[orders.Count - 1];",
        suggestion: "Index with Count - 1",
    },
};

pub const LONG_COUNT_ON_COLLECTION: RedundantCallRule = RedundantCallRule {
    id: RuleId::new(8),
    name: "long-count-on-collection",
    description: "LongCount() on a collection that already knows its count",
    operations: &["LongCount"],
    predicate: CapabilityPredicate::Has(Capability::Countable),
    node_kinds: INVOCATION,
    message: "'{0}' is an ICollection calling LongCount(); use the Count property instead",
    explanation: Explanation {
        why: "LongCount() enumerates the whole sequence. A collection stores its count and\n\
              returns it in constant time.",
        bad: "long total = orders.LongCount();",
        good: "long total = orders.Count;",
        suggestion: "Use the Count property",
    },
};

pub const SINGLE_ON_COLLECTION: RedundantCallRule = RedundantCallRule {
    id: RuleId::new(9),
    name: "single-on-collection",
    description: "Single()/SingleOrDefault() on a collection; check Count instead",
    operations: &["Single", "SingleOrDefault"],
    predicate: CapabilityPredicate::Has(Capability::Countable),
    node_kinds: INVOCATION,
    message: "'{0}' is an ICollection calling Single() or SingleOrDefault(); it should use the Count property instead",
    explanation: Explanation {
        why: "Single() enumerates until it has proved there is exactly one element. A\n\
              collection can answer that with its stored count.",
        bad: "var only = orders.Single();",
        good: "if (orders.Count == 1) { var only = orders[0]; }",
        suggestion: "Check the Count property",
    },
};

pub const CONTAINS_ON_SEQUENCE: RedundantCallRule = RedundantCallRule {
    id: RuleId::new(10),
    name: "contains-on-sequence",
    description: "Contains() through the facade is a linear scan; use a set or dictionary",
    operations: &["Contains"],
    predicate: CapabilityPredicate::Has(Capability::Iterable),
    node_kinds: INVOCATION,
    message: "'{0}' is an IEnumerable calling Contains(), which is O(n); use a HashSet<T> or Dictionary<TKey, TValue> for O(1) lookups",
    explanation: Explanation {
        why: "The facade's Contains() compares every element until it finds a match. Hash-based\n\
              collections answer membership in constant time.",
        bad: "if (allowedIds.Contains(id)) { ... }",
        good: "var allowed = new HashSet<int>(allowedIds);\nif (allowed.Contains(id)) { ... }",
        suggestion: "Use a HashSet<T> or Dictionary<TKey, TValue>",
    },
};

pub const COUNT_ON_COLLECTION: RedundantCallRule = RedundantCallRule {
    id: RuleId::new(11),
    name: "count-on-collection",
    description: "Count() on a collection that already knows its count",
    operations: &["Count"],
    predicate: CapabilityPredicate::Has(Capability::Countable),
    node_kinds: INVOCATION,
    message: "'{0}' is an ICollection calling Count(); use the Count property instead",
    explanation: Explanation {
        why: "Count() goes through an interface type test on every call. Arrays expose Length\n\
              and collections expose Count directly.",
        bad: "int n = orders.Count();",
        good: "int n = orders.Count; // or values.Length for arrays",
        suggestion: "Use the Count or Length property",
    },
};

pub const TO_ARRAY_ON_NON_ARRAY: RedundantCallRule = RedundantCallRule {
    id: RuleId::new(1003),
    name: "to-array-on-non-array",
    description: "ToArray() on a sequence that is not an array copies every element",
    operations: &["ToArray"],
    predicate: CapabilityPredicate::IsNotArray,
    node_kinds: INVOCATION,
    message: "'{0}' is a non-array sequence calling ToArray(), which copies every element",
    explanation: Explanation {
        why: "ToArray() allocates and fills a new array. When the result is only enumerated\n\
              or read, the source sequence can usually be used as it is.",
        bad: "foreach (var o in orders.Where(IsOpen).ToArray()) { ... }",
        good: "foreach (var o in orders.Where(IsOpen)) { ... }",
        suggestion: "Enumerate the source directly",
    },
};

pub const TO_LIST_ON_NON_LIST: RedundantCallRule = RedundantCallRule {
    id: RuleId::new(1004),
    name: "to-list-on-non-list",
    description: "ToList() on a sequence without indexed access copies every element",
    operations: &["ToList"],
    predicate: CapabilityPredicate::Lacks(Capability::Indexed),
    node_kinds: INVOCATION,
    message: "'{0}' is a non-list sequence calling ToList(), which copies every element",
    explanation: Explanation {
        why: "ToList() allocates a list and grows it while enumerating the source. Materialise\n\
              only when the result is mutated or enumerated more than once.",
        bad: "var open = orders.Where(IsOpen).ToList();\nreturn open.Any();",
        good: "return orders.Any(IsOpen);",
        suggestion: "Enumerate the source directly",
    },
};

/// Every built-in call-site rule.
pub const ALL: &[RedundantCallRule] = &[
    DISTINCT_ON_SEQUENCE,
    ELEMENT_AT_ON_LIST,
    FIRST_ON_LIST,
    LAST_ON_LIST,
    LONG_COUNT_ON_COLLECTION,
    SINGLE_ON_COLLECTION,
    CONTAINS_ON_SEQUENCE,
    COUNT_ON_COLLECTION,
    TO_ARRAY_ON_NON_ARRAY,
    TO_LIST_ON_NON_LIST,
];

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capability::CapabilityTable;
    use crate::semantic::{
        MethodSymbol, NodeId, NodeShape, ResolvedType, SnapshotModel, Span, Symbol, SyntaxTree,
    };

    const FACADE: &str = "System.Linq.Enumerable";
    const LIST: &str = "System.Collections.Generic.List`1";
    const STREAM: &str = "Shop.OrderStream";

    fn tree(operation: &str, receiver_text: &str) -> SyntaxTree {
        SyntaxTree::new(
            "Orders.cs",
            vec![
                SyntaxNode::new(
                    NodeId(1),
                    Span::new(7, 13),
                    NodeShape::Identifier {
                        name: receiver_text.to_string(),
                    },
                ),
                SyntaxNode::new(
                    NodeId(2),
                    Span::new(7, 13),
                    NodeShape::MemberAccess {
                        receiver: NodeId(1),
                        name: operation.to_string(),
                    },
                ),
                SyntaxNode::new(
                    NodeId(3),
                    Span {
                        line: 7,
                        column: 13,
                        end_line: Some(7),
                        end_column: Some(30),
                    },
                    NodeShape::Invocation {
                        callee: NodeId(2),
                        arguments: Vec::new(),
                    },
                ),
            ],
        )
        .unwrap()
    }

    fn model(operation: &str, receiver: ResolvedType, parameter_count: usize) -> SnapshotModel {
        SnapshotModel::new()
            .with_named_type(
                LIST,
                &[
                    "System.Collections.IList",
                    "System.Collections.ICollection",
                    "System.Collections.IEnumerable",
                ],
                None,
            )
            .with_named_type(STREAM, &["System.Collections.IEnumerable"], None)
            .with_type_of(NodeId(1), receiver)
            .with_symbol(
                NodeId(3),
                Symbol::Method(MethodSymbol {
                    name: operation.to_string(),
                    containing_type: Some(FACADE.to_string()),
                    parameter_count,
                    return_type: None,
                }),
            )
    }

    fn run(rule: &RedundantCallRule, tree: &SyntaxTree, model: &SnapshotModel) -> Option<Finding> {
        let table = CapabilityTable::default();
        let ctx = AnalysisContext::new(tree, model, &table, FACADE);
        rule.check(tree.get(NodeId(3)).unwrap(), &ctx)
    }

    #[test]
    fn test_contains_on_plain_sequence() {
        let tree = tree("Contains", "allowedIds");
        let model = model("Contains", ResolvedType::named(STREAM), 1);

        let finding = run(&CONTAINS_ON_SEQUENCE, &tree, &model).unwrap();
        assert_eq!(finding.rule_id.to_string(), "COL0010");
        assert_eq!(finding.severity, Severity::Warning);
        assert!(finding.message.starts_with("'allowedIds' is an IEnumerable calling Contains()"));
        assert_eq!(finding.line, 7);
        assert_eq!(finding.column, 13);
        assert_eq!(finding.end_column, Some(30));
        assert!(finding.suggestion.is_some());
    }

    #[test]
    fn test_first_and_first_or_default() {
        for operation in ["First", "FirstOrDefault"] {
            let tree = tree(operation, "orders");
            let model = model(operation, ResolvedType::named(LIST), 0);
            let finding = run(&FIRST_ON_LIST, &tree, &model).unwrap();
            assert!(finding.message.contains("'orders'"));
        }
    }

    #[test]
    fn test_first_on_plain_sequence_is_fine() {
        let tree = tree("First", "stream");
        let model = model("First", ResolvedType::named(STREAM), 0);
        assert!(run(&FIRST_ON_LIST, &tree, &model).is_none());
    }

    #[test]
    fn test_count_on_array() {
        let tree = tree("Count", "values");
        let model = model(
            "Count",
            ResolvedType::array_of(ResolvedType::named("System.Int32")),
            0,
        );
        assert!(run(&COUNT_ON_COLLECTION, &tree, &model).is_some());
    }

    #[test]
    fn test_count_with_predicate_is_fine() {
        let tree = tree("Count", "orders");
        let model = model("Count", ResolvedType::named(LIST), 1);
        assert!(run(&COUNT_ON_COLLECTION, &tree, &model).is_none());
    }

    #[test]
    fn test_to_array_and_to_list() {
        let tree_array = tree("ToArray", "stream");
        let on_stream = model("ToArray", ResolvedType::named(STREAM), 0);
        assert!(run(&TO_ARRAY_ON_NON_ARRAY, &tree_array, &on_stream).is_some());

        let on_array = model(
            "ToArray",
            ResolvedType::array_of(ResolvedType::named("System.Int32")),
            0,
        );
        assert!(run(&TO_ARRAY_ON_NON_ARRAY, &tree_array, &on_array).is_none());

        let tree_list = tree("ToList", "stream");
        let on_stream = model("ToList", ResolvedType::named(STREAM), 0);
        assert!(run(&TO_LIST_ON_NON_LIST, &tree_list, &on_stream).is_some());

        let on_list = model("ToList", ResolvedType::named(LIST), 0);
        assert!(run(&TO_LIST_ON_NON_LIST, &tree_list, &on_list).is_none());
    }

    #[test]
    fn test_generic_receiver_is_never_flagged() {
        let generic = ResolvedType::TypeParameter {
            name: "TSource".to_string(),
        };
        let tree = tree("ToList", "source");
        let model = model("ToList", generic, 0);
        assert!(run(&TO_LIST_ON_NON_LIST, &tree, &model).is_none());
    }

    #[test]
    fn test_catalogue_is_consistent() {
        for rule in ALL {
            assert_eq!(rule.message.matches("{0}").count(), 1, "{}", rule.name);
            assert!(!rule.operations.is_empty());
            assert!(!rule.node_kinds.is_empty());
            assert_eq!(rule.default_severity(), Severity::Warning);
        }
        assert_eq!(DISTINCT_ON_SEQUENCE.node_kinds, &[NodeKind::MemberAccess]);
    }
}
