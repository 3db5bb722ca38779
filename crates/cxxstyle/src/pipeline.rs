//! Default checking pipeline.
//!
//! Convenience entry points that wire every built-in rule into a
//! [`Checker`]. Callers wanting a subset assemble their own via
//! [`Checker::builder`].

use std::path::PathBuf;

use cxxstyle_core::{CheckResult, Checker, CheckerBuilder, CheckerError, Config, SourceFile};
use cxxstyle_rules::{all_rules, project_rules, Preset};

/// Builds a checker from a preset and a configuration.
///
/// # Errors
///
/// Returns an error when the configuration's ignore patterns do not
/// compile.
pub fn checker(preset: Preset, config: Config) -> Result<Checker, CheckerError> {
    let mut builder = Checker::builder().config(config);
    for rule in preset.rules() {
        builder = builder.rule_box(rule);
    }
    for rule in preset.project_rules() {
        builder = builder.project_rule_box(rule);
    }
    builder.build()
}

/// Checks in-memory sources with every built-in rule and a default
/// configuration.
///
/// # Errors
///
/// Returns an error when the checker cannot be built.
pub fn check_sources(sources: &[SourceFile]) -> Result<CheckResult, CheckerError> {
    Ok(default_builder().build()?.check_sources(sources))
}

/// Reads and checks files with every built-in rule and a default
/// configuration. Unreadable files become diagnostics, not errors.
///
/// # Errors
///
/// Returns an error when the checker cannot be built.
pub fn check_paths(paths: &[PathBuf]) -> Result<CheckResult, CheckerError> {
    Ok(default_builder().build()?.check_paths(paths))
}

fn default_builder() -> CheckerBuilder {
    let mut builder = Checker::builder();
    for rule in all_rules() {
        builder = builder.rule_box(rule);
    }
    for rule in project_rules() {
        builder = builder.project_rule_box(rule);
    }
    builder
}
