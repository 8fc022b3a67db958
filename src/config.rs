use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::path::Path;

use crate::capability::{Capability, CapabilityTable};
use crate::rules::{registry, RuleId};
use crate::Severity;

/// Name of the project config file.
pub const CONFIG_FILE_NAME: &str = "collection-lint.toml";

/// Maximum config file size (1 MB) - prevents memory exhaustion from malformed files
const MAX_CONFIG_SIZE: u64 = 1024 * 1024;

/// Facade type whose members are checked unless configured otherwise.
pub const DEFAULT_FACADE: &str = "System.Linq.Enumerable";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Severity overrides keyed by rule id (e.g. `COL0010 = "deny"`).
    #[serde(default)]
    pub rules: HashMap<String, RuleSeverity>,

    #[serde(default)]
    pub output: OutputConfig,

    #[serde(default)]
    pub semantics: SemanticsConfig,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum RuleSeverity {
    Deny,
    Warn,
    Allow,
}

impl From<RuleSeverity> for Option<Severity> {
    fn from(rs: RuleSeverity) -> Option<Severity> {
        match rs {
            RuleSeverity::Deny => Some(Severity::Error),
            RuleSeverity::Warn => Some(Severity::Warning),
            RuleSeverity::Allow => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(default = "default_format")]
    pub format: String,

    #[serde(default = "default_color")]
    pub color: String,
}

fn default_format() -> String {
    "console".to_string()
}

fn default_color() -> String {
    "auto".to_string()
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: default_format(),
            color: default_color(),
        }
    }
}

/// Names the engine matches resolved symbols against.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SemanticsConfig {
    #[serde(default = "default_facade")]
    pub facade: String,

    #[serde(default)]
    pub capabilities: CapabilityConfig,
}

fn default_facade() -> String {
    DEFAULT_FACADE.to_string()
}

impl Default for SemanticsConfig {
    fn default() -> Self {
        Self {
            facade: default_facade(),
            capabilities: CapabilityConfig::default(),
        }
    }
}

/// Defining interface per capability.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CapabilityConfig {
    #[serde(default = "default_iterable")]
    pub iterable: String,

    #[serde(default = "default_countable")]
    pub countable: String,

    #[serde(default = "default_indexed")]
    pub indexed: String,
}

fn default_iterable() -> String {
    Capability::Iterable.default_interface().to_string()
}

fn default_countable() -> String {
    Capability::Countable.default_interface().to_string()
}

fn default_indexed() -> String {
    Capability::Indexed.default_interface().to_string()
}

impl Default for CapabilityConfig {
    fn default() -> Self {
        Self {
            iterable: default_iterable(),
            countable: default_countable(),
            indexed: default_indexed(),
        }
    }
}

impl CapabilityConfig {
    /// Validate into a [`CapabilityTable`].
    pub fn table(&self) -> crate::error::Result<CapabilityTable> {
        CapabilityTable::new(&self.iterable, &self.countable, &self.indexed)
    }
}

impl Config {
    /// Directory searched for [`CONFIG_FILE_NAME`] when analyzing `path`.
    pub fn search_dir(path: &Path) -> &Path {
        match path.parent() {
            Some(parent) if path.is_file() => parent,
            _ => path,
        }
    }

    /// Read `collection-lint.toml` next to `path`, falling back to defaults
    /// when there is none. A missing `path` is an error.
    pub fn load_or_default(path: &Path) -> anyhow::Result<Self> {
        anyhow::ensure!(path.exists(), "Path does not exist: {}", path.display());

        let config_path = Self::search_dir(path).join(CONFIG_FILE_NAME);
        if !config_path.is_file() {
            return Ok(Config::default());
        }
        Self::load(&config_path)
    }

    /// Read and parse one config file.
    pub fn load(config_path: &Path) -> anyhow::Result<Self> {
        let size = std::fs::metadata(config_path)?.len();
        anyhow::ensure!(
            size <= MAX_CONFIG_SIZE,
            "Config file too large ({} bytes, max {} bytes): {}",
            size,
            MAX_CONFIG_SIZE,
            config_path.display()
        );

        let config = Self::from_toml(&std::fs::read_to_string(config_path)?)
            .map_err(|e| e.context(format!("in {}", config_path.display())))?;
        log::debug!("loaded config from {}", config_path.display());
        Ok(config)
    }

    /// Parse config text, warning about rule ids that name no built-in rule.
    pub fn from_toml(content: &str) -> anyhow::Result<Self> {
        let config: Config = toml::from_str(content)?;
        Self::validate_rule_ids(&config)?;
        Ok(config)
    }

    /// Unknown ids are only warned about. Two spellings of one id (`COL0010`
    /// and `col0010`) are rejected, since neither can be preferred.
    fn validate_rule_ids(config: &Config) -> anyhow::Result<()> {
        let mut spellings: BTreeMap<RuleId, Vec<&str>> = BTreeMap::new();
        for key in config.rules.keys() {
            if let Ok(id) = key.parse::<RuleId>() {
                spellings.entry(id).or_default().push(key);
            }
            if !registry::has_rule(key) {
                log::warn!("Unknown rule '{}' in {} (will be ignored)", key, CONFIG_FILE_NAME);
            }
        }

        for (id, mut keys) in spellings {
            if keys.len() > 1 {
                keys.sort_unstable();
                anyhow::bail!(
                    "Rule {} is configured more than once in [rules]: {}",
                    id,
                    keys.join(", ")
                );
            }
        }
        Ok(())
    }

    /// Get the effective severity for a rule; `None` means disabled.
    pub fn rule_severity(&self, rule_id: RuleId, default: Severity) -> Option<Severity> {
        // lowest key wins if a hand-built config holds several spellings
        let configured = self
            .rules
            .iter()
            .filter(|(key, _)| key.parse::<RuleId>().is_ok_and(|id| id == rule_id))
            .min_by_key(|(key, _)| key.as_str())
            .map(|(_, severity)| *severity);

        match configured {
            Some(severity) => severity.into(),
            None => Some(default),
        }
    }

    /// Generate default TOML config
    pub fn default_toml() -> &'static str {
        r#"# collection-lint configuration

[rules]
# Set rule severity: "deny" (error), "warn" (warning), "allow" (ignore)
# COL0010 = "deny"   # contains-on-sequence
# COL1004 = "allow"  # to-list-on-non-list

[output]
format = "console"  # "console", "json", "sarif"
color = "auto"      # "auto", "always", "never"

[semantics]
facade = "System.Linq.Enumerable"

[semantics.capabilities]
iterable = "System.Collections.IEnumerable"
countable = "System.Collections.ICollection"
indexed = "System.Collections.IList"
"#
    }
}
