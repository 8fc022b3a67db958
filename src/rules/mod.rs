pub mod array_rules;
pub mod redundant_call;
pub mod registry;

use crate::engine::AnalysisContext;
use crate::semantic::{NodeKind, SyntaxNode};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::path::PathBuf;

/// Severity levels for findings
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    #[default]
    Info,
    Warning,
    Error,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Info => write!(f, "info"),
            Severity::Warning => write!(f, "warning"),
            Severity::Error => write!(f, "error"),
        }
    }
}

impl std::str::FromStr for Severity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "info" => Ok(Severity::Info),
            "warning" | "warn" => Ok(Severity::Warning),
            "error" | "deny" => Ok(Severity::Error),
            _ => Err(format!("Unknown severity: {}", s)),
        }
    }
}

#[cfg(feature = "cli")]
impl clap::ValueEnum for Severity {
    fn value_variants<'a>() -> &'a [Self] {
        &[Severity::Info, Severity::Warning, Severity::Error]
    }

    fn to_possible_value(&self) -> Option<clap::builder::PossibleValue> {
        match self {
            Severity::Info => Some(clap::builder::PossibleValue::new("info")),
            Severity::Warning => Some(clap::builder::PossibleValue::new("warning")),
            Severity::Error => Some(clap::builder::PossibleValue::new("error")),
        }
    }
}

/// Alphabetic prefix shared by every rule id.
pub const RULE_ID_PREFIX: &str = "COL";

/// Stable rule identifier, rendered as `COL` plus a four digit number.
///
/// Ids are the contract with suppression files and documentation; a number
/// is never reused for a different rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RuleId(u16);

impl RuleId {
    /// Largest number that still renders as four digits.
    pub const MAX_NUMBER: u16 = 9999;

    pub const fn new(number: u16) -> Self {
        debug_assert!(number <= Self::MAX_NUMBER, "rule ids have four digits");
        Self(number)
    }

    /// Whether the id renders as `COL` plus exactly four digits.
    pub const fn is_four_digit(self) -> bool {
        self.0 <= Self::MAX_NUMBER
    }

    pub const fn number(self) -> u16 {
        self.0
    }
}

impl std::fmt::Display for RuleId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{:04}", RULE_ID_PREFIX, self.0)
    }
}

impl std::str::FromStr for RuleId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s
            .get(..RULE_ID_PREFIX.len())
            .filter(|prefix| prefix.eq_ignore_ascii_case(RULE_ID_PREFIX))
            .map(|_| &s[RULE_ID_PREFIX.len()..])
            .ok_or_else(|| format!("Rule id '{}' must start with {}", s, RULE_ID_PREFIX))?;

        if digits.len() != 4 || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(format!(
                "Rule id '{}' must be {} followed by four digits",
                s, RULE_ID_PREFIX
            ));
        }

        digits
            .parse()
            .map(RuleId)
            .map_err(|e| format!("Invalid rule id '{}': {}", s, e))
    }
}

impl Serialize for RuleId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for RuleId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// A finding reported by a rule
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Finding {
    pub rule_id: RuleId,
    pub severity: Severity,
    pub message: String,
    pub file_path: PathBuf,
    pub line: usize,
    pub column: usize,
    pub end_line: Option<usize>,
    pub end_column: Option<usize>,
    pub suggestion: Option<String>,
}

impl Finding {
    /// Create a finding located at `node`.
    pub fn at_node(
        rule: &dyn Rule,
        ctx: &AnalysisContext<'_>,
        node: &SyntaxNode,
        message: String,
    ) -> Self {
        Self {
            rule_id: rule.id(),
            severity: rule.default_severity(),
            message,
            file_path: ctx.file_path.to_path_buf(),
            line: node.span.line,
            column: node.span.column,
            end_line: node.span.end_line,
            end_column: node.span.end_column,
            suggestion: rule.explanation().map(|e| e.suggestion.to_string()),
        }
    }
}

/// Substitute `{0}` in a message template.
pub fn format_message(template: &str, subject: &str) -> String {
    template.replace("{0}", subject)
}

/// Long-form documentation shown by `explain`.
#[derive(Debug, Clone, Copy)]
pub struct Explanation {
    pub why: &'static str,
    pub bad: &'static str,
    pub good: &'static str,
    /// One-line fix hint attached to findings.
    pub suggestion: &'static str,
}

/// The Rule trait - implement this to add new checks
pub trait Rule: Send + Sync {
    /// Unique identifier for this rule
    fn id(&self) -> RuleId;

    /// Human-readable name (e.g., "contains-on-sequence")
    fn name(&self) -> &'static str;

    /// Description of what this rule checks
    fn description(&self) -> &'static str;

    /// Default severity level
    fn default_severity(&self) -> Severity;

    /// Node kinds this rule is run against
    fn node_kinds(&self) -> &'static [NodeKind];

    fn explanation(&self) -> Option<&Explanation> {
        None
    }

    /// Check one node
    fn check(&self, node: &SyntaxNode, ctx: &AnalysisContext<'_>) -> Option<Finding>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rule_id_display() {
        assert_eq!(RuleId::new(2).to_string(), "COL0002");
        assert_eq!(RuleId::new(1004).to_string(), "COL1004");
    }

    #[test]
    fn test_rule_id_four_digit_bound() {
        assert!(RuleId::new(RuleId::MAX_NUMBER).is_four_digit());
        assert_eq!(RuleId::new(RuleId::MAX_NUMBER).to_string(), "COL9999");
        assert!(!RuleId(10_000).is_four_digit());
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "rule ids have four digits")]
    fn test_rule_id_new_rejects_five_digits() {
        let _ = RuleId::new(std::hint::black_box(10_000));
    }

    #[test]
    fn test_rule_id_parse() {
        assert_eq!("COL0010".parse::<RuleId>(), Ok(RuleId::new(10)));
        assert_eq!("col1003".parse::<RuleId>(), Ok(RuleId::new(1003)));
        assert!("COL10".parse::<RuleId>().is_err());
        assert!("XYZ0010".parse::<RuleId>().is_err());
        assert!("COL00a1".parse::<RuleId>().is_err());
        assert!("".parse::<RuleId>().is_err());
        assert!("COL+123".parse::<RuleId>().is_err());
    }

    #[test]
    fn test_rule_id_serde() {
        let json = serde_json::to_string(&RuleId::new(6)).unwrap();
        assert_eq!(json, "\"COL0006\"");
        let back: RuleId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, RuleId::new(6));
        assert!(serde_json::from_str::<RuleId>("\"first-on-list\"").is_err());
    }

    #[test]
    fn test_severity_parse() {
        assert_eq!("warn".parse::<Severity>(), Ok(Severity::Warning));
        assert_eq!("deny".parse::<Severity>(), Ok(Severity::Error));
        assert!("loud".parse::<Severity>().is_err());
        assert!(Severity::Error > Severity::Warning);
    }

    #[test]
    fn test_format_message() {
        assert_eq!(
            format_message("'{0}' calls Count()", "orders"),
            "'orders' calls Count()"
        );
        assert_eq!(format_message("no slot", "orders"), "no slot");
    }
}
