//! Redundant-call matching.
//!
//! One matcher serves every call-site rule. A rule supplies an operation
//! name and a [`CapabilityPredicate`]; the matcher applies, in order and
//! short-circuiting:
//!
//! 1. node shape (invocation or member access)
//! 2. method resolution
//! 3. name and arity
//! 4. facade membership of the declaring type
//! 5. receiver type resolution
//! 6. the capability predicate
//!
//! Any failed step is "no match". Nothing here returns an error.

use crate::capability::CapabilityPredicate;
use crate::engine::AnalysisContext;
use crate::semantic::{NodeId, NodeShape, ResolvedType, SyntaxNode};

/// Operations whose parameterised overloads are still candidates.
pub const ARITY_EXEMPT_OPERATIONS: &[&str] = &["Contains", "ElementAt", "ElementAtOrDefault"];

/// Which overloads of an operation a rule considers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArityPolicy {
    /// Only the overload without parameters.
    ZeroArguments,
    /// Any overload.
    Any,
}

impl ArityPolicy {
    pub fn for_operation(operation: &str) -> Self {
        if ARITY_EXEMPT_OPERATIONS.contains(&operation) {
            ArityPolicy::Any
        } else {
            ArityPolicy::ZeroArguments
        }
    }

    pub fn admits(self, parameter_count: usize) -> bool {
        match self {
            ArityPolicy::ZeroArguments => parameter_count == 0,
            ArityPolicy::Any => true,
        }
    }
}

/// A call that passed every matcher step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallSite {
    pub operation: String,
    pub parameter_count: usize,
    pub declaring_type: String,
    /// The expression the operation is invoked on.
    pub receiver: NodeId,
    pub receiver_type: ResolvedType,
}

/// Run every matcher step for `operation` against `node`.
pub fn match_call(
    ctx: &AnalysisContext<'_>,
    node: &SyntaxNode,
    operation: &str,
    predicate: CapabilityPredicate,
) -> Option<CallSite> {
    let receiver = receiver_of(ctx, node)?;

    let symbol = ctx.model.symbol(node.id)?;
    let method = symbol.as_method()?;

    if method.name != operation {
        return None;
    }
    if !ArityPolicy::for_operation(operation).admits(method.parameter_count) {
        return None;
    }

    let declaring_type = method.containing_type.as_deref()?;
    if declaring_type != ctx.facade {
        return None;
    }

    let receiver_type = ctx.model.type_of(receiver)?;
    if !predicate.evaluate(ctx.capabilities, ctx.model, &receiver_type) {
        return None;
    }

    Some(CallSite {
        operation: method.name.clone(),
        parameter_count: method.parameter_count,
        declaring_type: declaring_type.to_string(),
        receiver,
        receiver_type,
    })
}

/// Boolean form of [`match_call`].
pub fn matches(
    ctx: &AnalysisContext<'_>,
    node: &SyntaxNode,
    operation: &str,
    predicate: CapabilityPredicate,
) -> bool {
    match_call(ctx, node, operation, predicate).is_some()
}

/// Left-hand side of the member access that names the operation.
fn receiver_of(ctx: &AnalysisContext<'_>, node: &SyntaxNode) -> Option<NodeId> {
    match &node.shape {
        NodeShape::Invocation { callee, .. } => match &ctx.node(*callee)?.shape {
            NodeShape::MemberAccess { receiver, .. } => Some(*receiver),
            _ => None,
        },
        NodeShape::MemberAccess { receiver, .. } => Some(*receiver),
        _ => None,
    }
}
