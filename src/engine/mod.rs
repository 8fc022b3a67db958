//! Analysis engine - coordinates snapshot discovery and rule execution.

mod cancel;
mod context;
mod file_analyzer;

pub use cancel::CancellationToken;
pub use context::AnalysisContext;
pub use file_analyzer::{load_snapshot, read_file_secure};

use crate::capability::CapabilityTable;
use crate::discovery::{discover_snapshot_files, DiscoveryOptions};
use crate::error::{Error, Result};
use crate::rules::registry::RuleRegistry;
use crate::rules::{Finding, RuleId, Severity};
use crate::semantic::{SemanticModel, SyntaxTree};
use crate::suppression::SuppressionSet;
use crate::Config;
use rayon::prelude::*;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// A configured, immutable rule engine.
///
/// Construction validates the capability table and the rule registry, so a
/// collision never surfaces once analysis has started.
#[derive(Debug)]
pub struct Engine {
    registry: RuleRegistry,
    capabilities: CapabilityTable,
    facade: String,
    /// Effective severity of every enabled rule.
    severities: HashMap<RuleId, Severity>,
    suppressions: SuppressionSet,
}

impl Engine {
    /// Engine running the built-in rules.
    pub fn new(config: &Config) -> Result<Self> {
        Self::with_registry(config, RuleRegistry::builtin()?)
    }

    pub fn with_registry(config: &Config, registry: RuleRegistry) -> Result<Self> {
        let capabilities = config.semantics.capabilities.table()?;

        let facade = config.semantics.facade.trim();
        if facade.is_empty() {
            return Err(Error::config("semantics.facade must not be empty"));
        }

        let severities: HashMap<RuleId, Severity> = registry
            .rules()
            .iter()
            .filter_map(|rule| {
                config
                    .rule_severity(rule.id(), rule.default_severity())
                    .map(|severity| (rule.id(), severity))
            })
            .collect();

        log::debug!(
            "engine ready: {} of {} rules enabled, facade {}",
            severities.len(),
            registry.len(),
            facade
        );

        Ok(Self {
            registry,
            capabilities,
            facade: facade.to_string(),
            severities,
            suppressions: SuppressionSet::default(),
        })
    }

    pub fn with_suppressions(mut self, suppressions: SuppressionSet) -> Self {
        self.suppressions = suppressions;
        self
    }

    /// Disable every rule not named in `ids`.
    pub fn restrict_to(mut self, ids: &[RuleId]) -> Self {
        self.severities.retain(|id, _| ids.contains(id));
        self
    }

    pub fn registry(&self) -> &RuleRegistry {
        &self.registry
    }

    pub fn is_enabled(&self, id: RuleId) -> bool {
        self.severities.contains_key(&id)
    }

    /// Analyze every snapshot under `path`.
    pub fn analyze(&self, path: &Path) -> Result<Vec<Finding>> {
        self.analyze_with_cancel(path, &CancellationToken::new())
    }

    /// Analyze every snapshot under `path` in parallel. Files that fail to
    /// load are logged and skipped; cancellation aborts the whole run.
    pub fn analyze_with_cancel(
        &self,
        path: &Path,
        cancel: &CancellationToken,
    ) -> Result<Vec<Finding>> {
        let files = discover_snapshot_files(path, &DiscoveryOptions::secure());

        let results: Vec<(PathBuf, Result<Vec<Finding>>)> = files
            .into_par_iter()
            .map(|file| {
                let result = if cancel.is_cancelled() {
                    Err(Error::Cancelled)
                } else {
                    self.analyze_file(&file, cancel)
                };
                (file, result)
            })
            .collect();

        let mut findings = Vec::new();
        for (file, result) in results {
            match result {
                Ok(file_findings) => findings.extend(file_findings),
                Err(Error::Cancelled) => return Err(Error::Cancelled),
                Err(e) => log::warn!("Failed to analyze {}: {}", file.display(), e),
            }
        }

        Ok(findings)
    }

    /// Analyze a single snapshot file.
    pub fn analyze_file(&self, file: &Path, cancel: &CancellationToken) -> Result<Vec<Finding>> {
        let (tree, model) = load_snapshot(file)?;
        log::debug!("analyzing {} ({} nodes)", file.display(), tree.len());
        self.analyze_tree(&tree, &model, cancel)
    }

    /// Visit every node of `tree` once and run the enabled rules registered
    /// for its kind.
    ///
    /// Returns [`Error::Cancelled`] as soon as `cancel` fires; findings
    /// gathered so far are dropped.
    pub fn analyze_tree(
        &self,
        tree: &SyntaxTree,
        model: &dyn SemanticModel,
        cancel: &CancellationToken,
    ) -> Result<Vec<Finding>> {
        let ctx = AnalysisContext::new(tree, model, &self.capabilities, &self.facade);
        let mut findings = Vec::new();

        for node in tree.nodes() {
            if cancel.is_cancelled() {
                log::debug!("analysis of {} cancelled", tree.file().display());
                return Err(Error::Cancelled);
            }

            for rule in self.registry.rules_for(node.kind()) {
                let Some(&severity) = self.severities.get(&rule.id()) else {
                    continue;
                };

                let Some(mut finding) = file_analyzer::check_node(rule, node, &ctx) else {
                    continue;
                };
                finding.severity = severity;

                if self.suppressions.is_suppressed(&finding) {
                    log::debug!(
                        "suppressed {} at {}:{}",
                        finding.rule_id,
                        finding.file_path.display(),
                        finding.line
                    );
                    continue;
                }
                findings.push(finding);
            }
        }

        Ok(findings)
    }
}
