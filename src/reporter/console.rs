use crate::rules::{Finding, Severity};
use colored::Colorize;

pub fn report(findings: &[Finding]) {
    if findings.is_empty() {
        println!("{}", "No redundant collection calls found.".green());
        return;
    }

    let (error_count, warning_count, info_count) = count_by_severity(findings);

    for finding in findings {
        print_finding(finding);
    }

    println!();
    print!("Found ");
    if error_count > 0 {
        print!("{}", format!("{} error(s)", error_count).red());
    }
    if warning_count > 0 {
        if error_count > 0 {
            print!(", ");
        }
        print!("{}", format!("{} warning(s)", warning_count).yellow());
    }
    if info_count > 0 {
        if error_count > 0 || warning_count > 0 {
            print!(", ");
        }
        print!("{}", format!("{} info(s)", info_count).blue());
    }
    println!();
}

fn print_finding(f: &Finding) {
    let severity_str = match f.severity {
        Severity::Error => "error".red().bold(),
        Severity::Warning => "warning".yellow().bold(),
        Severity::Info => "info".blue().bold(),
    };

    let rule_id = format!("[{}]", f.rule_id).dimmed();

    println!("{}{} {} {}", severity_str, ":".bold(), f.message, rule_id);

    println!(
        "  {} {}:{}:{}",
        "-->".blue(),
        f.file_path.display(),
        f.line,
        f.column,
    );

    if let Some(suggestion) = &f.suggestion {
        println!("  {} {}", "help:".cyan(), suggestion);
    }

    println!();
}

/// Format a finding as a plain text string (no colors) for testing.
#[cfg(test)]
fn format_finding_plain(f: &Finding) -> String {
    let mut result = format!(
        "{}: {} [{}]\n  --> {}:{}:{}\n",
        f.severity,
        f.message,
        f.rule_id,
        f.file_path.display(),
        f.line,
        f.column
    );

    if let Some(suggestion) = &f.suggestion {
        result.push_str(&format!("  help: {}\n", suggestion));
    }

    result
}

/// Count findings by severity as (errors, warnings, infos).
pub fn count_by_severity(findings: &[Finding]) -> (usize, usize, usize) {
    findings
        .iter()
        .fold((0, 0, 0), |(errors, warnings, infos), f| match f.severity {
            Severity::Error => (errors + 1, warnings, infos),
            Severity::Warning => (errors, warnings + 1, infos),
            Severity::Info => (errors, warnings, infos + 1),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::RuleId;
    use std::path::PathBuf;

    fn make_finding(rule: u16, severity: Severity, suggestion: Option<&str>) -> Finding {
        Finding {
            rule_id: RuleId::new(rule),
            message: format!("Test message for {}", RuleId::new(rule)),
            severity,
            file_path: PathBuf::from("Orders.cs"),
            line: 10,
            column: 5,
            end_line: None,
            end_column: None,
            suggestion: suggestion.map(|s| s.to_string()),
        }
    }

    #[test]
    fn test_count_by_severity() {
        let findings = vec![
            make_finding(1, Severity::Error, None),
            make_finding(2, Severity::Error, None),
            make_finding(3, Severity::Warning, None),
            make_finding(4, Severity::Info, None),
            make_finding(5, Severity::Info, None),
            make_finding(6, Severity::Info, None),
        ];

        assert_eq!(count_by_severity(&findings), (2, 1, 3));
    }

    #[test]
    fn test_count_empty() {
        assert_eq!(count_by_severity(&[]), (0, 0, 0));
    }

    #[test]
    fn test_format_finding_error() {
        let result = format_finding_plain(&make_finding(10, Severity::Error, None));

        assert!(result.contains("error:"));
        assert!(result.contains("[COL0010]"));
        assert!(result.contains("Orders.cs:10:5"));
    }

    #[test]
    fn test_format_finding_warning() {
        let result = format_finding_plain(&make_finding(1003, Severity::Warning, None));

        assert!(result.contains("warning:"));
        assert!(result.contains("[COL1003]"));
    }

    #[test]
    fn test_format_finding_with_suggestion() {
        let finding = make_finding(6, Severity::Warning, Some("Use orders[0]"));
        assert!(format_finding_plain(&finding).contains("help: Use orders[0]"));
    }

    #[test]
    fn test_format_finding_without_suggestion() {
        let finding = make_finding(6, Severity::Warning, None);
        assert!(!format_finding_plain(&finding).contains("help:"));
    }
}
