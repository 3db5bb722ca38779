//! Configuration types for the style checker.

use crate::types::Severity;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Top-level configuration for a check run.
///
/// Rule ids in any field match either a rule code (`CS101`) or a rule
/// name (`identifier-case`). The core never reads configuration files
/// itself; drivers load TOML text and hand it to [`Config::parse`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Rules to enable. `None` enables every registered rule.
    #[serde(default)]
    pub rules: Option<BTreeSet<String>>,

    /// Per-rule severity overrides.
    #[serde(default)]
    pub severity_overrides: BTreeMap<String, Severity>,

    /// Glob patterns for identifiers exempt from the naming rules
    /// (e.g. `"BOOST_*"`).
    #[serde(default)]
    pub ignore_patterns: BTreeSet<String>,
}

impl Config {
    /// Creates a new default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is invalid.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::Parse {
            message: e.to_string(),
        })
    }

    /// Checks if a rule is enabled, by code or name.
    #[must_use]
    pub fn is_rule_enabled(&self, code: &str, name: &str) -> bool {
        self.rules
            .as_ref()
            .map_or(true, |enabled| enabled.contains(code) || enabled.contains(name))
    }

    /// Gets the severity override for a rule, by code or name.
    #[must_use]
    pub fn severity_override(&self, code: &str, name: &str) -> Option<Severity> {
        self.severity_overrides
            .get(code)
            .or_else(|| self.severity_overrides.get(name))
            .copied()
    }
}

/// Compiled identifier allow-list.
///
/// Identifiers matching any pattern are exempt from the naming rule
/// family. Patterns are compiled once at checker build time.
#[derive(Debug, Clone, Default)]
pub struct AllowList {
    patterns: Vec<glob::Pattern>,
}

impl AllowList {
    /// Compiles the `ignore_patterns` of a configuration.
    ///
    /// # Errors
    ///
    /// Returns an error for a malformed glob pattern.
    pub fn compile(config: &Config) -> Result<Self, ConfigError> {
        let mut patterns = Vec::with_capacity(config.ignore_patterns.len());
        for pattern in &config.ignore_patterns {
            let compiled = glob::Pattern::new(pattern).map_err(|e| ConfigError::Pattern {
                pattern: pattern.clone(),
                message: e.to_string(),
            })?;
            patterns.push(compiled);
        }
        Ok(Self { patterns })
    }

    /// Whether `identifier` matches any allow-list pattern.
    #[must_use]
    pub fn matches(&self, identifier: &str) -> bool {
        self.patterns.iter().any(|p| p.matches(identifier))
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Parse error in config content.
    #[error("Failed to parse config: {message}")]
    Parse {
        /// Parse error message.
        message: String,
    },

    /// Invalid identifier allow-list pattern.
    #[error("Invalid ignore pattern `{pattern}`: {message}")]
    Pattern {
        /// The offending pattern.
        pattern: String,
        /// Underlying glob error message.
        message: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_enables_everything() {
        let config = Config::default();
        assert!(config.is_rule_enabled("CS101", "identifier-case"));
        assert!(config.severity_override("CS101", "identifier-case").is_none());
    }

    #[test]
    fn parse_config() {
        let toml = r#"
rules = ["identifier-case", "CS302"]
ignore_patterns = ["BOOST_*"]

[severity_overrides]
identifier-case = "warning"
"#;

        let config = Config::parse(toml).expect("valid config");
        assert!(config.is_rule_enabled("CS101", "identifier-case"));
        assert!(config.is_rule_enabled("CS302", "missing-noexcept"));
        assert!(!config.is_rule_enabled("CS201", "anonymous-namespace"));
        assert_eq!(
            config.severity_override("CS101", "identifier-case"),
            Some(Severity::Warning)
        );
    }

    #[test]
    fn parse_rejects_bad_toml() {
        assert!(Config::parse("rules = [").is_err());
    }

    #[test]
    fn enabled_matches_code_or_name() {
        let mut config = Config::default();
        config.rules = Some(["CS101".to_string()].into_iter().collect());
        assert!(config.is_rule_enabled("CS101", "identifier-case"));
        assert!(!config.is_rule_enabled("CS102", "type-alias-suffix"));
    }

    #[test]
    fn allowlist_matches_globs() {
        let mut config = Config::default();
        config.ignore_patterns.insert("BOOST_*".to_string());
        config.ignore_patterns.insert("PI".to_string());
        let allowlist = AllowList::compile(&config).expect("valid patterns");
        assert!(allowlist.matches("BOOST_FOREACH"));
        assert!(allowlist.matches("PI"));
        assert!(!allowlist.matches("get_value"));
    }

    #[test]
    fn allowlist_rejects_bad_pattern() {
        let mut config = Config::default();
        config.ignore_patterns.insert("[".to_string());
        assert!(matches!(
            AllowList::compile(&config),
            Err(ConfigError::Pattern { .. })
        ));
    }
}
