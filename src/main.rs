use anyhow::Result;
use clap::{Parser, Subcommand};
use collection_lint::rules::registry;
use collection_lint::rules::RuleId;
use collection_lint::suppression::SuppressionSet;
use collection_lint::{Config, Engine, Finding, Severity};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Instant;

#[derive(Parser)]
#[command(name = "collection-lint")]
#[command(about = "Flag linear-time sequence calls where a constant-time collection member exists")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Path to analyze (defaults to current directory)
    #[arg(short, long, default_value = ".")]
    path: PathBuf,

    /// Output format (defaults to [output] format in the config, then console)
    #[arg(short, long, global = true)]
    format: Option<OutputFormat>,

    /// Minimum severity to report
    #[arg(long, global = true, default_value = "info")]
    min_severity: Severity,

    /// Fail if any finding meets this severity
    #[arg(long, global = true)]
    fail_on: Option<Severity>,

    /// Specific rules to run (comma-separated ids, e.g. COL0006,COL0010)
    #[arg(long, global = true)]
    rules: Option<String>,

    /// Suppression file (defaults to collection-lint.suppressions.toml next to the config)
    #[arg(long, global = true)]
    suppressions: Option<PathBuf>,

    /// Show timing information for performance debugging
    #[arg(long, global = true)]
    timing: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze semantic snapshots (default)
    Check {
        /// Snapshot file or directory to analyze
        #[arg(default_value = ".")]
        path: PathBuf,
    },
    /// Initialize collection-lint.toml config
    Init,
    /// List available rules
    Rules,
    /// Explain a specific rule in detail
    Explain {
        /// Rule ID to explain (e.g., "COL0010")
        rule_id: String,
    },
}

#[derive(Clone, Copy, Default, clap::ValueEnum)]
enum OutputFormat {
    #[default]
    Console,
    Json,
    Sarif,
}

struct CheckOptions<'a> {
    format: Option<OutputFormat>,
    min_severity: Severity,
    fail_on: Option<Severity>,
    rules: Option<&'a str>,
    suppressions: Option<&'a Path>,
    timing: bool,
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    if let Err(e) = run() {
        eprintln!("Error: {e}");
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    let options = CheckOptions {
        format: cli.format,
        min_severity: cli.min_severity,
        fail_on: cli.fail_on,
        rules: cli.rules.as_deref(),
        suppressions: cli.suppressions.as_deref(),
        timing: cli.timing,
    };

    match &cli.command {
        Some(Commands::Check { path }) => run_check(path, &options),
        None => run_check(&cli.path, &options),
        Some(Commands::Init) => run_init(&cli.path),
        Some(Commands::Rules) => run_list_rules(),
        Some(Commands::Explain { rule_id }) => run_explain(rule_id),
    }
}

/// Parse a comma-separated list of rule ids, rejecting unknown ones.
fn parse_rule_filter(filter: &str) -> Result<Vec<RuleId>> {
    filter
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            let id: RuleId = s.parse().map_err(anyhow::Error::msg)?;
            if !registry::has_rule(s) {
                anyhow::bail!("Unknown rule: {}", id);
            }
            Ok(id)
        })
        .collect()
}

fn run_check(path: &Path, options: &CheckOptions<'_>) -> Result<()> {
    let config = Config::load_or_default(path)?;
    match config.output.color.as_str() {
        "always" => colored::control::set_override(true),
        "never" => colored::control::set_override(false),
        _ => {}
    }

    let suppressions = match options.suppressions {
        Some(file) => SuppressionSet::load(file)?,
        None => SuppressionSet::load_from_dir(Config::search_dir(path))?,
    };

    let mut engine = Engine::new(&config)?.with_suppressions(suppressions);
    if let Some(filter) = options.rules {
        engine = engine.restrict_to(&parse_rule_filter(filter)?);
    }

    let start = Instant::now();
    let findings = engine.analyze(path)?;
    let analysis_time = start.elapsed();

    let findings: Vec<Finding> = findings
        .into_iter()
        .filter(|f| f.severity >= options.min_severity)
        .collect();

    let format = options
        .format
        .or_else(|| config_format(&config))
        .unwrap_or_default();

    match format {
        OutputFormat::Console => collection_lint::reporter::console::report(&findings),
        OutputFormat::Json => collection_lint::reporter::json::report(&findings)?,
        OutputFormat::Sarif => collection_lint::reporter::sarif::report(&findings)?,
    }

    if options.timing {
        use colored::Colorize;
        eprintln!();
        eprintln!("{}", "Timing:".bold());
        eprintln!("  Analysis time: {:?}", analysis_time);
        eprintln!("  Findings:      {}", findings.len());
    }

    if let Some(fail_severity) = options.fail_on {
        let failing = findings
            .iter()
            .filter(|f| f.severity >= fail_severity)
            .count();
        if failing > 0 {
            anyhow::bail!(
                "Found {} finding(s) at or above {} severity",
                failing,
                fail_severity
            );
        }
    }

    Ok(())
}

/// Output format named in the config file, used when `--format` is absent.
fn config_format(config: &Config) -> Option<OutputFormat> {
    match config.output.format.as_str() {
        "json" => Some(OutputFormat::Json),
        "sarif" => Some(OutputFormat::Sarif),
        "console" => Some(OutputFormat::Console),
        other => {
            log::warn!("Unknown output format '{}' in config, using console", other);
            None
        }
    }
}

fn run_init(path: &Path) -> Result<()> {
    let config_path = path.join(collection_lint::config::CONFIG_FILE_NAME);
    if config_path.exists() {
        anyhow::bail!("{} already exists", collection_lint::config::CONFIG_FILE_NAME);
    }
    std::fs::write(&config_path, Config::default_toml())?;
    println!("Created {}", config_path.display());
    Ok(())
}

fn run_list_rules() -> Result<()> {
    println!("Available rules:\n");
    for rule in registry::all_rules() {
        println!(
            "  {}  {:<26} [{}] {}",
            rule.id(),
            rule.name(),
            rule.default_severity(),
            rule.description()
        );
    }
    println!("\nUse `collection-lint explain <rule-id>` for detailed information.");
    Ok(())
}

fn run_explain(rule_id: &str) -> Result<()> {
    use colored::Colorize;

    let Some(rule) = registry::get_rule(rule_id) else {
        eprintln!("{} Unknown rule: {}", "error:".red().bold(), rule_id);
        eprintln!("\nAvailable rules:");
        for r in registry::all_rules() {
            eprintln!("  {}  {}", r.id(), r.name());
        }
        anyhow::bail!("Unknown rule: {}", rule_id);
    };

    println!("{}", rule.name().bold().underline());
    println!("Rule ID: {}", rule.id().to_string().cyan());
    println!("Severity: {}", rule.default_severity());
    println!();
    println!("{}", rule.description());
    println!();

    match rule.explanation() {
        Some(explanation) => {
            println!("{}", "Why it matters:".yellow().bold());
            for line in explanation.why.lines() {
                println!("  {}", line);
            }
            println!();
            println!("{}", "Bad:".red().bold());
            for line in explanation.bad.lines() {
                println!("  {}", line);
            }
            println!();
            println!("{}", "Good:".green().bold());
            for line in explanation.good.lines() {
                println!("  {}", line);
            }
        }
        None => println!("No detailed explanation available for this rule."),
    }

    println!();
    println!("{}", "Suppression:".yellow().bold());
    println!("  # {}", collection_lint::suppression::SUPPRESSIONS_FILE_NAME);
    println!("  [[suppress]]");
    println!("  rule = \"{}\"", rule.id());
    println!("  file = \"path/to/File.cs\"");
    println!("  justification = \"...\"");
    Ok(())
}
