//! Suppression file support.
//!
//! Findings are suppressed by rule id from `collection-lint.suppressions.toml`:
//!
//! ```toml
//! [[suppress]]
//! rule = "COL0010"
//! file = "src/Orders.cs"   # optional, matched against the end of the path
//! line = 42                # optional
//! justification = "membership test runs once at startup"
//! ```
//!
//! An entry without `file` applies everywhere; one without `line` applies to
//! the whole file.

use crate::error::{Error, Result};
use crate::rules::{registry, Finding, RuleId};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Name of the suppression file looked up next to the config.
pub const SUPPRESSIONS_FILE_NAME: &str = "collection-lint.suppressions.toml";

#[derive(Debug, Default, Deserialize)]
struct SuppressionFile {
    #[serde(default)]
    suppress: Vec<RawSuppression>,
}

#[derive(Debug, Deserialize)]
struct RawSuppression {
    rule: String,
    #[serde(default)]
    file: Option<PathBuf>,
    #[serde(default)]
    line: Option<usize>,
    #[serde(default)]
    justification: Option<String>,
}

/// One accepted suppression entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Suppression {
    pub rule: RuleId,
    pub file: Option<PathBuf>,
    pub line: Option<usize>,
    pub justification: Option<String>,
}

impl Suppression {
    fn covers(&self, finding: &Finding) -> bool {
        if self.rule != finding.rule_id {
            return false;
        }
        if let Some(file) = &self.file {
            if !finding.file_path.ends_with(file) {
                return false;
            }
        }
        self.line.is_none_or(|line| line == finding.line)
    }
}

/// All suppressions in effect for a run.
#[derive(Debug, Clone, Default)]
pub struct SuppressionSet {
    entries: Vec<Suppression>,
}

impl SuppressionSet {
    pub fn new(entries: Vec<Suppression>) -> Self {
        Self { entries }
    }

    /// Parse suppression file content. Entries naming a malformed or unknown
    /// rule id are skipped with a warning.
    pub fn from_toml(content: &str, origin: &Path) -> Result<Self> {
        let file: SuppressionFile =
            toml::from_str(content).map_err(|e| Error::parse(origin, e.to_string()))?;

        let mut entries = Vec::with_capacity(file.suppress.len());
        for raw in file.suppress {
            let rule = match raw.rule.parse::<RuleId>() {
                Ok(rule) if registry::has_rule(&raw.rule) => rule,
                Ok(_) => {
                    log::warn!(
                        "Unknown rule '{}' in {} (entry ignored)",
                        raw.rule,
                        origin.display()
                    );
                    continue;
                }
                Err(e) => {
                    log::warn!("{} in {} (entry ignored)", e, origin.display());
                    continue;
                }
            };

            if raw.justification.as_deref().is_none_or(|j| j.trim().is_empty()) {
                log::debug!("suppression of {} in {} has no justification", rule, origin.display());
            }

            entries.push(Suppression {
                rule,
                file: raw.file,
                line: raw.line,
                justification: raw.justification,
            });
        }

        Ok(Self { entries })
    }

    /// Load a suppression file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = crate::engine::read_file_secure(path)?;
        Self::from_toml(&content, path)
    }

    /// Load `collection-lint.suppressions.toml` from `dir` if present.
    pub fn load_from_dir(dir: &Path) -> Result<Self> {
        let path = dir.join(SUPPRESSIONS_FILE_NAME);
        if path.is_file() {
            Self::load(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Check if a finding should be suppressed.
    pub fn is_suppressed(&self, finding: &Finding) -> bool {
        self.entries.iter().any(|entry| entry.covers(finding))
    }

    pub fn entries(&self) -> &[Suppression] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
