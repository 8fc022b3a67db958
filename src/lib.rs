//! collection-lint: flag linear-time sequence calls where a constant-time
//! collection member exists.
//!
//! The engine works on semantic snapshots exported by a compiler front end:
//! a syntax arena plus resolved symbols, static types and interface lists.
//! Each built-in rule asks one shared matcher whether a call site invokes a
//! sequence-facade operation on a receiver that already offers a cheaper
//! native member.

pub mod capability;
pub mod config;
pub mod discovery;
pub mod engine;
pub mod error;
pub mod matcher;
pub mod reporter;
pub mod rules;
pub mod semantic;
pub mod suppression;

pub use config::Config;
pub use engine::{AnalysisContext, CancellationToken, Engine};
pub use error::{Error, Result};
pub use rules::{Finding, Rule, RuleId, Severity};

/// Run analysis on a directory of snapshots
pub fn analyze(path: &std::path::Path, config: &Config) -> anyhow::Result<Vec<Finding>> {
    let engine = Engine::new(config)?;
    Ok(engine.analyze(path)?)
}
