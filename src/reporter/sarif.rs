use crate::rules::{registry, Finding, RuleId, Severity};
use anyhow::Result;
use serde::Serialize;

/// SARIF (Static Analysis Results Interchange Format) output for code scanning
pub fn report(findings: &[Finding]) -> Result<()> {
    println!("{}", format(findings)?);
    Ok(())
}

/// Format findings as a SARIF 2.1.0 log without printing.
pub fn format(findings: &[Finding]) -> Result<String> {
    let sarif = SarifReport::from_findings(findings);
    Ok(serde_json::to_string_pretty(&sarif)?)
}

#[derive(Serialize)]
struct SarifReport {
    #[serde(rename = "$schema")]
    schema: &'static str,
    version: &'static str,
    runs: Vec<SarifRun>,
}

#[derive(Serialize)]
struct SarifRun {
    tool: SarifTool,
    results: Vec<SarifResult>,
}

#[derive(Serialize)]
struct SarifTool {
    driver: SarifDriver,
}

#[derive(Serialize)]
struct SarifDriver {
    name: &'static str,
    version: &'static str,
    rules: Vec<SarifRule>,
}

#[derive(Serialize)]
struct SarifRule {
    id: String,
    name: String,
    #[serde(rename = "shortDescription")]
    short_description: SarifMessage,
}

#[derive(Serialize)]
struct SarifResult {
    #[serde(rename = "ruleId")]
    rule_id: String,
    level: &'static str,
    message: SarifMessage,
    locations: Vec<SarifLocation>,
}

#[derive(Serialize)]
struct SarifMessage {
    text: String,
}

#[derive(Serialize)]
struct SarifLocation {
    #[serde(rename = "physicalLocation")]
    physical_location: SarifPhysicalLocation,
}

#[derive(Serialize)]
struct SarifPhysicalLocation {
    #[serde(rename = "artifactLocation")]
    artifact_location: SarifArtifactLocation,
    region: SarifRegion,
}

#[derive(Serialize)]
struct SarifArtifactLocation {
    uri: String,
}

#[derive(Serialize)]
struct SarifRegion {
    #[serde(rename = "startLine")]
    start_line: usize,
    #[serde(rename = "startColumn")]
    start_column: usize,
    #[serde(rename = "endLine", skip_serializing_if = "Option::is_none")]
    end_line: Option<usize>,
    #[serde(rename = "endColumn", skip_serializing_if = "Option::is_none")]
    end_column: Option<usize>,
}

impl SarifRule {
    fn describe(id: RuleId, fallback: &str) -> Self {
        match registry::get_rule(&id.to_string()) {
            Some(rule) => SarifRule {
                id: id.to_string(),
                name: rule.name().to_string(),
                short_description: SarifMessage {
                    text: rule.description().to_string(),
                },
            },
            None => SarifRule {
                id: id.to_string(),
                name: id.to_string(),
                short_description: SarifMessage {
                    text: fallback.to_string(),
                },
            },
        }
    }
}

impl SarifReport {
    fn from_findings(findings: &[Finding]) -> Self {
        let mut rules: Vec<SarifRule> = Vec::new();
        let mut seen_rules = std::collections::HashSet::new();

        for f in findings {
            if seen_rules.insert(f.rule_id) {
                rules.push(SarifRule::describe(f.rule_id, &f.message));
            }
        }

        let results: Vec<SarifResult> = findings
            .iter()
            .map(|f| SarifResult {
                rule_id: f.rule_id.to_string(),
                level: match f.severity {
                    Severity::Error => "error",
                    Severity::Warning => "warning",
                    Severity::Info => "note",
                },
                message: SarifMessage {
                    text: f.message.clone(),
                },
                locations: vec![SarifLocation {
                    physical_location: SarifPhysicalLocation {
                        artifact_location: SarifArtifactLocation {
                            uri: f.file_path.to_string_lossy().replace('\\', "/"),
                        },
                        region: SarifRegion {
                            start_line: f.line,
                            start_column: f.column,
                            end_line: f.end_line,
                            end_column: f.end_column,
                        },
                    },
                }],
            })
            .collect();

        SarifReport {
            schema: "https://raw.githubusercontent.com/oasis-tcs/sarif-spec/master/Schemata/sarif-schema-2.1.0.json",
            version: "2.1.0",
            runs: vec![SarifRun {
                tool: SarifTool {
                    driver: SarifDriver {
                        name: "collection-lint",
                        version: env!("CARGO_PKG_VERSION"),
                        rules,
                    },
                },
                results,
            }],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn finding(rule: u16, line: usize) -> Finding {
        Finding {
            rule_id: RuleId::new(rule),
            severity: Severity::Warning,
            message: format!("finding on line {line}"),
            file_path: PathBuf::from("src/Orders.cs"),
            line,
            column: 3,
            end_line: None,
            end_column: None,
            suggestion: None,
        }
    }

    #[test]
    fn test_sarif_shape() {
        let output = format(&[finding(10, 4), finding(10, 9), finding(6, 12)]).unwrap();
        let sarif: serde_json::Value = serde_json::from_str(&output).unwrap();

        assert_eq!(sarif["version"], "2.1.0");
        let run = &sarif["runs"][0];
        assert_eq!(run["tool"]["driver"]["name"], "collection-lint");

        let rules = run["tool"]["driver"]["rules"].as_array().unwrap();
        assert_eq!(rules.len(), 2);
        assert_eq!(rules[0]["id"], "COL0010");
        assert_eq!(rules[0]["name"], "contains-on-sequence");

        let results = run["results"].as_array().unwrap();
        assert_eq!(results.len(), 3);
        assert_eq!(results[2]["ruleId"], "COL0006");
        assert_eq!(results[2]["level"], "warning");
        let region = &results[0]["locations"][0]["physicalLocation"]["region"];
        assert_eq!(region["startLine"], 4);
        assert!(region.get("endLine").is_none());
    }

    #[test]
    fn test_unknown_rule_uses_message() {
        let output = format(&[finding(4242, 1)]).unwrap();
        let sarif: serde_json::Value = serde_json::from_str(&output).unwrap();
        let rule = &sarif["runs"][0]["tool"]["driver"]["rules"][0];
        assert_eq!(rule["name"], "COL4242");
        assert_eq!(rule["shortDescription"]["text"], "finding on line 1");
    }
}
