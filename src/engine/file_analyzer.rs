//! Per-file plumbing shared by the engine: reading snapshots safely and
//! running one rule against one node without letting it take the run down.

use crate::discovery::MAX_FILE_SIZE;
use crate::engine::context::AnalysisContext;
use crate::error::{Error, Result};
use crate::rules::{Finding, Rule};
use crate::semantic::{Snapshot, SnapshotModel, SyntaxNode, SyntaxTree};
use std::any::Any;
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Best-effort text of a panic payload.
fn panic_message(payload: &(dyn Any + Send)) -> String {
    payload
        .downcast_ref::<&str>()
        .map(|s| (*s).to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "(unknown panic payload)".to_string())
}

fn invalid_input(file_path: &Path, message: String) -> Error {
    Error::io(
        file_path,
        std::io::Error::new(std::io::ErrorKind::InvalidInput, message),
    )
}

/// Read a snapshot through a single open handle.
///
/// The regular-file and size checks use the handle's metadata, so the file
/// cannot be swapped between the check and the read. The read itself is
/// capped at [`MAX_FILE_SIZE`] in case the file grows meanwhile.
pub fn read_file_secure(file_path: &Path) -> Result<String> {
    let file = File::open(file_path).map_err(|e| Error::io(file_path, e))?;
    let metadata = file.metadata().map_err(|e| Error::io(file_path, e))?;

    if !metadata.is_file() {
        return Err(invalid_input(file_path, "not a regular file".to_string()));
    }
    if metadata.len() > MAX_FILE_SIZE {
        return Err(invalid_input(
            file_path,
            format!(
                "file too large: {} bytes (max: {} bytes)",
                metadata.len(),
                MAX_FILE_SIZE
            ),
        ));
    }

    let mut content = String::with_capacity(metadata.len() as usize);
    file.take(MAX_FILE_SIZE)
        .read_to_string(&mut content)
        .map_err(|e| Error::io(file_path, e))?;
    Ok(content)
}

/// Read and validate a `*.semantic.json` file.
pub fn load_snapshot(file_path: &Path) -> Result<(SyntaxTree, SnapshotModel)> {
    let content = read_file_secure(file_path)?;
    let snapshot =
        Snapshot::from_json(&content).map_err(|e| Error::parse(file_path, e.to_string()))?;
    snapshot
        .into_parts()
        .map_err(|message| Error::parse(file_path, message))
}

/// Run `rule` on `node`, turning a panic into "no finding".
pub fn check_node(
    rule: &dyn Rule,
    node: &SyntaxNode,
    ctx: &AnalysisContext<'_>,
) -> Option<Finding> {
    match std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| rule.check(node, ctx))) {
        Ok(finding) => finding,
        Err(panic_payload) => {
            log::warn!(
                "Rule '{}' panicked on node {} in {}: {}",
                rule.id(),
                node.id,
                ctx.file_path.display(),
                panic_message(&*panic_payload)
            );
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capability::CapabilityTable;
    use crate::rules::{RuleId, Severity};
    use crate::semantic::{NodeId, NodeKind, NodeShape, Span};
    use tempfile::TempDir;

    struct PanickingRule;

    impl Rule for PanickingRule {
        fn id(&self) -> RuleId {
            RuleId::new(9000)
        }

        fn name(&self) -> &'static str {
            "panicking"
        }

        fn description(&self) -> &'static str {
            "always panics"
        }

        fn default_severity(&self) -> Severity {
            Severity::Warning
        }

        fn node_kinds(&self) -> &'static [NodeKind] {
            &[NodeKind::Literal]
        }

        fn check(&self, _node: &SyntaxNode, _ctx: &AnalysisContext<'_>) -> Option<Finding> {
            panic!("boom")
        }
    }

    #[test]
    fn test_read_file_secure_success() {
        let tmp = TempDir::new().unwrap();
        let file_path = tmp.path().join("Orders.semantic.json");
        std::fs::write(&file_path, "{}").unwrap();

        let content = read_file_secure(&file_path).unwrap();
        assert_eq!(content, "{}");
    }

    #[test]
    fn test_read_file_secure_not_found() {
        let result = read_file_secure(Path::new("/nonexistent/file.semantic.json"));
        assert!(matches!(result, Err(Error::Io { .. })));
    }

    #[test]
    fn test_read_file_secure_directory() {
        let tmp = TempDir::new().unwrap();
        let result = read_file_secure(tmp.path());
        assert!(result.is_err());
    }

    #[test]
    fn test_load_snapshot_reports_parse_errors() {
        let tmp = TempDir::new().unwrap();
        let file_path = tmp.path().join("Broken.semantic.json");

        std::fs::write(&file_path, "{ not json").unwrap();
        assert!(matches!(load_snapshot(&file_path), Err(Error::Parse { .. })));

        std::fs::write(
            &file_path,
            r#"{"file": "a.cs", "nodes": [{"id": 1, "kind": "literal"}, {"id": 1, "kind": "literal"}]}"#,
        )
        .unwrap();
        match load_snapshot(&file_path) {
            Err(Error::Parse { message, .. }) => assert!(message.contains("duplicate node id")),
            other => panic!("expected parse error, got {other:?}"),
        }
    }

    #[test]
    fn test_check_node_isolates_panics() {
        let tree = SyntaxTree::new(
            "a.cs",
            vec![SyntaxNode::new(NodeId(1), Span::new(1, 1), NodeShape::Literal)],
        )
        .unwrap();
        let model = SnapshotModel::new();
        let table = CapabilityTable::default();
        let ctx = AnalysisContext::new(&tree, &model, &table, "System.Linq.Enumerable");

        assert!(check_node(&PanickingRule, tree.get(NodeId(1)).unwrap(), &ctx).is_none());
    }
}
