//! The set of rules an engine runs.
//!
//! A [`RuleRegistry`] is assembled once through [`RuleRegistryBuilder`] and is
//! read-only afterwards. Building fails if two rules claim the same id.
//!
//! # Adding rules
//!
//! ```rust,ignore
//! use collection_lint::rules::registry::RuleRegistryBuilder;
//!
//! let registry = RuleRegistryBuilder::new()
//!     .with_builtin_rules()
//!     .with_rule(Box::new(MyRule))
//!     .build()?;
//! ```

use super::{array_rules, redundant_call, Rule, RuleId};
use crate::error::{Error, Result};
use crate::semantic::NodeKind;
use std::collections::HashMap;

/// Immutable, id-indexed rule set.
pub struct RuleRegistry {
    rules: Vec<Box<dyn Rule>>,
    index: HashMap<RuleId, usize>,
    by_kind: HashMap<NodeKind, Vec<usize>>,
}

impl std::fmt::Debug for RuleRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RuleRegistry")
            .field("rules", &self.rule_ids().collect::<Vec<_>>())
            .finish()
    }
}

impl RuleRegistry {
    /// Registry of every built-in rule.
    pub fn builtin() -> Result<Self> {
        RuleRegistryBuilder::new().with_builtin_rules().build()
    }

    /// Build a registry from `rules`, failing on the first repeated id.
    pub fn from_rules(rules: Vec<Box<dyn Rule>>) -> Result<Self> {
        let mut index: HashMap<RuleId, usize> = HashMap::with_capacity(rules.len());
        let mut by_kind: HashMap<NodeKind, Vec<usize>> = HashMap::new();

        for (pos, rule) in rules.iter().enumerate() {
            if !rule.id().is_four_digit() {
                return Err(Error::RuleIdOutOfRange {
                    number: rule.id().number(),
                    max: RuleId::MAX_NUMBER,
                    rule: rule.name(),
                });
            }
            if let Some(&existing) = index.get(&rule.id()) {
                return Err(Error::DuplicateRuleId {
                    id: rule.id(),
                    existing: rules[existing].name(),
                    rejected: rule.name(),
                });
            }
            index.insert(rule.id(), pos);
            for &kind in rule.node_kinds() {
                by_kind.entry(kind).or_default().push(pos);
            }
        }

        log::debug!("registered {} rules", rules.len());
        Ok(Self {
            rules,
            index,
            by_kind,
        })
    }

    /// All rules, in registration order.
    pub fn rules(&self) -> &[Box<dyn Rule>] {
        &self.rules
    }

    pub fn get(&self, id: RuleId) -> Option<&dyn Rule> {
        self.index.get(&id).map(|&pos| self.rules[pos].as_ref())
    }

    pub fn has_rule(&self, id: RuleId) -> bool {
        self.index.contains_key(&id)
    }

    pub fn rule_ids(&self) -> impl Iterator<Item = RuleId> + '_ {
        self.rules.iter().map(|rule| rule.id())
    }

    /// Rules registered for nodes of `kind`.
    pub fn rules_for(&self, kind: NodeKind) -> impl Iterator<Item = &dyn Rule> + '_ {
        self.by_kind
            .get(&kind)
            .into_iter()
            .flatten()
            .map(|&pos| self.rules[pos].as_ref())
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

/// Collects rules before validating them as a [`RuleRegistry`].
#[derive(Default)]
pub struct RuleRegistryBuilder {
    rules: Vec<Box<dyn Rule>>,
}

impl RuleRegistryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add all built-in rules.
    pub fn with_builtin_rules(mut self) -> Self {
        self.rules.extend(builtin_rules());
        self
    }

    /// Add a custom rule.
    pub fn with_rule(mut self, rule: Box<dyn Rule>) -> Self {
        self.rules.push(rule);
        self
    }

    pub fn build(self) -> Result<RuleRegistry> {
        RuleRegistry::from_rules(self.rules)
    }
}

fn builtin_rules() -> Vec<Box<dyn Rule>> {
    let mut rules: Vec<Box<dyn Rule>> =
        Vec::with_capacity(array_rules::ALL.len() + redundant_call::ALL.len());
    rules.extend(
        array_rules::ALL
            .iter()
            .map(|rule| Box::new(*rule) as Box<dyn Rule>),
    );
    rules.extend(
        redundant_call::ALL
            .iter()
            .map(|rule| Box::new(*rule) as Box<dyn Rule>),
    );
    rules
}

/// Get all built-in rules
pub fn all_rules() -> Vec<Box<dyn Rule>> {
    builtin_rules()
}

/// Get a built-in rule by its id (e.g. "COL0010")
pub fn get_rule(id: &str) -> Option<Box<dyn Rule>> {
    let id: RuleId = id.parse().ok()?;
    all_rules().into_iter().find(|rule| rule.id() == id)
}

/// Whether `id` names a built-in rule.
pub fn has_rule(id: &str) -> bool {
    get_rule(id).is_some()
}
