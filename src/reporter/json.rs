use crate::rules::Finding;
use anyhow::Result;

pub fn report(findings: &[Finding]) -> Result<()> {
    println!("{}", format(findings)?);
    Ok(())
}

/// Format findings as JSON string without printing.
pub fn format(findings: &[Finding]) -> Result<String> {
    Ok(serde_json::to_string_pretty(findings)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::{RuleId, Severity};
    use std::path::PathBuf;

    fn finding(rule: u16, severity: Severity, message: &str) -> Finding {
        Finding {
            rule_id: RuleId::new(rule),
            message: message.to_string(),
            severity,
            file_path: PathBuf::from("src/Orders.cs"),
            line: 10,
            column: 5,
            end_line: Some(10),
            end_column: Some(22),
            suggestion: Some("Use the Count property".to_string()),
        }
    }

    #[test]
    fn test_format_empty_findings() {
        let result = format(&[]).unwrap();
        assert_eq!(result, "[]");
    }

    #[test]
    fn test_format_single_finding() {
        let result = format(&[finding(11, Severity::Warning, "Test message")]).unwrap();

        assert!(result.contains(r#""rule_id": "COL0011""#));
        assert!(result.contains(r#""message": "Test message""#));
        assert!(result.contains(r#""severity": "warning""#));
        assert!(result.contains(r#""line": 10"#));
        assert!(result.contains(r#""end_column": 22"#));
        assert!(result.contains(r#""suggestion": "Use the Count property""#));
    }

    #[test]
    fn test_format_multiple_findings() {
        let result = format(&[
            finding(6, Severity::Error, "First"),
            finding(1004, Severity::Info, "Second"),
        ])
        .unwrap();

        let parsed: serde_json::Value = serde_json::from_str(&result).unwrap();
        let items = parsed.as_array().unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0]["rule_id"], "COL0006");
        assert_eq!(items[0]["severity"], "error");
        assert_eq!(items[1]["rule_id"], "COL1004");
        assert_eq!(items[1]["severity"], "info");
    }
}
