//! Capability classification of receiver types.
//!
//! A capability is a structural trait of a collection type, identified by a
//! single well-known interface. Capabilities are checked independently; no
//! subset relation between them is assumed.

use crate::error::{Error, Result};
use crate::semantic::{ResolvedType, SemanticModel};
use serde::{Deserialize, Serialize};

/// Structural traits a receiver type may expose.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Capability {
    /// Can be enumerated.
    Iterable,
    /// Knows its element count without enumerating.
    Countable,
    /// Supports positional access in constant time.
    Indexed,
}

impl Capability {
    pub const ALL: [Capability; 3] = [
        Capability::Iterable,
        Capability::Countable,
        Capability::Indexed,
    ];

    /// Full name of the interface that defines this capability unless
    /// configured otherwise.
    pub fn default_interface(self) -> &'static str {
        match self {
            Capability::Iterable => "System.Collections.IEnumerable",
            Capability::Countable => "System.Collections.ICollection",
            Capability::Indexed => "System.Collections.IList",
        }
    }
}

impl std::fmt::Display for Capability {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Capability::Iterable => write!(f, "iterable"),
            Capability::Countable => write!(f, "countable"),
            Capability::Indexed => write!(f, "indexed"),
        }
    }
}

/// Maps each capability to its defining interface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapabilityTable {
    iterable: String,
    countable: String,
    indexed: String,
}

impl Default for CapabilityTable {
    fn default() -> Self {
        Self {
            iterable: Capability::Iterable.default_interface().to_string(),
            countable: Capability::Countable.default_interface().to_string(),
            indexed: Capability::Indexed.default_interface().to_string(),
        }
    }
}

impl CapabilityTable {
    /// Build a table, refusing empty names and two capabilities defined by
    /// the same interface.
    pub fn new(
        iterable: impl Into<String>,
        countable: impl Into<String>,
        indexed: impl Into<String>,
    ) -> Result<Self> {
        let table = Self {
            iterable: iterable.into(),
            countable: countable.into(),
            indexed: indexed.into(),
        };

        for (pos, &first) in Capability::ALL.iter().enumerate() {
            let interface = table.interface(first);
            if interface.trim().is_empty() {
                return Err(Error::config(format!(
                    "capability '{}' has an empty interface name",
                    first
                )));
            }
            for &second in &Capability::ALL[pos + 1..] {
                if table.interface(second) == interface {
                    return Err(Error::DuplicateCapability {
                        first,
                        second,
                        interface: interface.to_string(),
                    });
                }
            }
        }

        Ok(table)
    }

    pub fn interface(&self, capability: Capability) -> &str {
        match capability {
            Capability::Iterable => &self.iterable,
            Capability::Countable => &self.countable,
            Capability::Indexed => &self.indexed,
        }
    }

    /// Whether `ty` exposes `capability`.
    ///
    /// Arrays expose every capability regardless of element type. Named types
    /// are looked up through their flattened interface list. Type parameters,
    /// `dynamic` and error types expose nothing.
    pub fn has_capability(
        &self,
        model: &dyn SemanticModel,
        ty: &ResolvedType,
        capability: Capability,
    ) -> bool {
        match ty {
            ResolvedType::Array { .. } => true,
            ResolvedType::Named { name } => {
                let wanted = self.interface(capability);
                model
                    .all_interfaces(name)
                    .iter()
                    .any(|interface| interface == wanted)
            }
            ResolvedType::TypeParameter { .. } | ResolvedType::Dynamic | ResolvedType::Error => {
                false
            }
        }
    }
}

/// Condition a rule places on the receiver type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CapabilityPredicate {
    Has(Capability),
    Lacks(Capability),
    IsArray,
    IsNotArray,
}

impl CapabilityPredicate {
    /// Opaque types never satisfy any predicate, negated ones included: an
    /// unknown type is not evidence that a capability is missing.
    pub fn evaluate(
        self,
        table: &CapabilityTable,
        model: &dyn SemanticModel,
        ty: &ResolvedType,
    ) -> bool {
        if ty.is_opaque() {
            return false;
        }

        match self {
            CapabilityPredicate::Has(capability) => table.has_capability(model, ty, capability),
            CapabilityPredicate::Lacks(capability) => !table.has_capability(model, ty, capability),
            CapabilityPredicate::IsArray => ty.is_array(),
            CapabilityPredicate::IsNotArray => !ty.is_array(),
        }
    }
}

impl std::fmt::Display for CapabilityPredicate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CapabilityPredicate::Has(capability) => write!(f, "is {}", capability),
            CapabilityPredicate::Lacks(capability) => write!(f, "is not {}", capability),
            CapabilityPredicate::IsArray => write!(f, "is an array"),
            CapabilityPredicate::IsNotArray => write!(f, "is not an array"),
        }
    }
}
