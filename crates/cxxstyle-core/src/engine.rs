//! Core checker for orchestrating rule execution.

use crate::aggregate::DiagnosticAggregator;
use crate::config::{AllowList, Config, ConfigError};
use crate::context::{FileContext, NamespaceTable, ProjectContext};
use crate::model::{DeclDetail, TranslationUnit};
use crate::rule::{ProjectRule, ProjectRuleBox, Rule, RuleBox};
use crate::types::{CheckResult, Diagnostic, Location, Severity, SourceFile};
use crate::utils::allowance;

use rayon::prelude::*;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Code and name of the diagnostic emitted for unreadable input files.
const UNREADABLE_FILE: (&str, &str) = ("CS001", "unreadable-file");
/// Code and name of the diagnostic emitted for regions the builder
/// degraded to opaque.
const UNPARSEABLE_REGION: (&str, &str) = ("CS002", "unparseable-region");

/// Errors that can occur while constructing a checker.
///
/// Checking itself never fails: unreadable files and unparseable
/// regions become diagnostics, not errors.
#[derive(Debug, Error)]
pub enum CheckerError {
    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

/// Shared flag to cancel an in-flight check run.
///
/// Cancellation is observed between files: files already being checked
/// finish, remaining files are skipped, and the result is marked
/// [`CheckResult::interrupted`].
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    /// Creates a new, unset flag.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests cancellation.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    /// Whether cancellation has been requested.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Builder for configuring a [`Checker`].
#[derive(Default)]
pub struct CheckerBuilder {
    rules: Vec<RuleBox>,
    project_rules: Vec<ProjectRuleBox>,
    config: Option<Config>,
    cancel: Option<CancelFlag>,
}

impl CheckerBuilder {
    /// Creates a new builder with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a per-file rule to the checker.
    #[must_use]
    pub fn rule<R: Rule + 'static>(mut self, rule: R) -> Self {
        self.rules.push(Box::new(rule));
        self
    }

    /// Adds a boxed per-file rule to the checker.
    #[must_use]
    pub fn rule_box(mut self, rule: RuleBox) -> Self {
        self.rules.push(rule);
        self
    }

    /// Adds a project-wide rule to the checker.
    #[must_use]
    pub fn project_rule<R: ProjectRule + 'static>(mut self, rule: R) -> Self {
        self.project_rules.push(Box::new(rule));
        self
    }

    /// Adds a boxed project-wide rule to the checker.
    #[must_use]
    pub fn project_rule_box(mut self, rule: ProjectRuleBox) -> Self {
        self.project_rules.push(rule);
        self
    }

    /// Sets the configuration.
    #[must_use]
    pub fn config(mut self, config: Config) -> Self {
        self.config = Some(config);
        self
    }

    /// Sets the cancellation flag observed between files.
    #[must_use]
    pub fn cancel_flag(mut self, flag: CancelFlag) -> Self {
        self.cancel = Some(flag);
        self
    }

    /// Builds the checker, compiling the identifier allow-list.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration contains an invalid
    /// ignore pattern.
    pub fn build(self) -> Result<Checker, CheckerError> {
        let config = self.config.unwrap_or_default();
        let allowlist = AllowList::compile(&config)?;

        Ok(Checker {
            rules: self.rules,
            project_rules: self.project_rules,
            config,
            allowlist,
            cancel: self.cancel.unwrap_or_default(),
        })
    }
}

/// Per-file output carried back from the parallel phase.
struct FileOutcome {
    diagnostics: Vec<Diagnostic>,
    namespaces: NamespaceTable,
}

/// The main checker that orchestrates rule execution.
///
/// Use [`Checker::builder()`] to construct an instance. Files are
/// checked in parallel; results are merged in input order, so output
/// is deterministic regardless of thread scheduling.
pub struct Checker {
    rules: Vec<RuleBox>,
    project_rules: Vec<ProjectRuleBox>,
    config: Config,
    allowlist: AllowList,
    cancel: CancelFlag,
}

impl Checker {
    /// Creates a new builder for configuring a checker.
    #[must_use]
    pub fn builder() -> CheckerBuilder {
        CheckerBuilder::new()
    }

    /// Returns the number of registered rules.
    #[must_use]
    pub fn rule_count(&self) -> usize {
        self.rules.len() + self.project_rules.len()
    }

    /// Returns a handle to this checker's cancellation flag.
    #[must_use]
    pub fn cancel_flag(&self) -> CancelFlag {
        self.cancel.clone()
    }

    /// Checks sources already in memory.
    #[must_use]
    pub fn check_sources(&self, sources: &[SourceFile]) -> CheckResult {
        self.run(sources, Vec::new())
    }

    /// Reads and checks files from disk.
    ///
    /// Files that cannot be read (missing, permission denied, not
    /// UTF-8) produce an [`UNREADABLE_FILE`] diagnostic instead of
    /// failing the run.
    #[must_use]
    pub fn check_paths(&self, paths: &[PathBuf]) -> CheckResult {
        let mut sources = Vec::with_capacity(paths.len());
        let mut pre = Vec::new();

        for path in paths {
            match std::fs::read_to_string(path) {
                Ok(text) => sources.push(SourceFile::new(path.clone(), text)),
                Err(e) => {
                    warn!("Failed to read {}: {}", path.display(), e);
                    if self
                        .config
                        .is_rule_enabled(UNREADABLE_FILE.0, UNREADABLE_FILE.1)
                    {
                        pre.push(Diagnostic::new(
                            UNREADABLE_FILE.0,
                            UNREADABLE_FILE.1,
                            Severity::Error,
                            Location::new(path.clone(), 1, 1),
                            format!("Cannot read file: {e}"),
                        ));
                    }
                }
            }
        }

        let pre = self.apply_severity_overrides(pre);
        self.run(&sources, pre)
    }

    /// Runs all rules over `sources` and merges results.
    fn run(&self, sources: &[SourceFile], pre: Vec<Diagnostic>) -> CheckResult {
        info!(
            "Checking {} files with {} rules",
            sources.len(),
            self.rule_count()
        );

        let outcomes: Vec<Option<FileOutcome>> = sources
            .par_iter()
            .map(|source| {
                if self.cancel.is_cancelled() {
                    None
                } else {
                    Some(self.check_file(source))
                }
            })
            .collect();

        let mut aggregator = DiagnosticAggregator::new();
        aggregator.add_all(pre);

        let mut namespaces = NamespaceTable::new();
        let mut files_checked = 0;
        let mut interrupted = false;
        for outcome in outcomes {
            match outcome {
                Some(outcome) => {
                    files_checked += 1;
                    aggregator.add_all(outcome.diagnostics);
                    namespaces.merge(outcome.namespaces);
                }
                None => interrupted = true,
            }
        }

        // Project rules see only what the completed files contributed.
        let project_ctx = ProjectContext::new(namespaces);
        let by_path: HashMap<&Path, &str> = sources
            .iter()
            .map(|s| (s.path.as_path(), s.text.as_str()))
            .collect();

        for rule in &self.project_rules {
            if !self.config.is_rule_enabled(rule.code(), rule.name()) {
                debug!("Skipping disabled rule: {}", rule.name());
                continue;
            }

            let diagnostics = rule.check_project(&project_ctx);
            let mut diagnostics = self.apply_severity_overrides(diagnostics);
            diagnostics.retain(|d| {
                by_path
                    .get(d.location.file.as_path())
                    .map_or(true, |content| !is_suppressed(content, d))
            });
            aggregator.add_all(diagnostics);
        }

        let diagnostics = aggregator.finish();
        info!(
            "Check complete: {} diagnostics in {} files",
            diagnostics.len(),
            files_checked
        );

        CheckResult {
            diagnostics,
            files_checked,
            interrupted,
        }
    }

    /// Checks a single file with every enabled per-file rule.
    fn check_file(&self, source: &SourceFile) -> FileOutcome {
        debug!("Checking: {}", source.path.display());

        let unit = TranslationUnit::parse(&source.text);
        let ctx = FileContext::new(&source.path, &source.text, &self.allowlist);

        let mut diagnostics = Vec::new();

        if self
            .config
            .is_rule_enabled(UNPARSEABLE_REGION.0, UNPARSEABLE_REGION.1)
        {
            for region in unit.opaque_regions() {
                diagnostics.push(Diagnostic::new(
                    UNPARSEABLE_REGION.0,
                    UNPARSEABLE_REGION.1,
                    Severity::Warning,
                    ctx.location(region.pos, 0),
                    "Region could not be analyzed; checks are skipped here",
                ));
            }
        }

        for rule in &self.rules {
            if !self.config.is_rule_enabled(rule.code(), rule.name()) {
                debug!("Skipping disabled rule: {}", rule.name());
                continue;
            }

            diagnostics.extend(rule.check(&ctx, &unit));
        }

        let mut diagnostics = self.apply_severity_overrides(diagnostics);
        diagnostics.retain(|d| !is_suppressed(&source.text, d));

        FileOutcome {
            diagnostics,
            namespaces: collect_namespaces(&ctx, &unit),
        }
    }

    /// Applies severity overrides from configuration.
    fn apply_severity_overrides(&self, mut diagnostics: Vec<Diagnostic>) -> Vec<Diagnostic> {
        for d in &mut diagnostics {
            if let Some(severity) = self.config.severity_override(&d.code, &d.rule) {
                d.severity = severity;
            }
        }
        diagnostics
    }
}

/// Whether a suppression comment covers this diagnostic. Directives
/// may name the rule or its code.
fn is_suppressed(content: &str, diagnostic: &Diagnostic) -> bool {
    allowance::check_allow_comment(content, diagnostic.location.line, &diagnostic.rule).is_allowed()
        || allowance::check_allow_comment(content, diagnostic.location.line, &diagnostic.code)
            .is_allowed()
}

/// Records every named namespace path opened in the unit.
fn collect_namespaces(ctx: &FileContext<'_>, unit: &TranslationUnit) -> NamespaceTable {
    let mut table = NamespaceTable::new();
    unit.tree.walk(&mut |decl| {
        if let DeclDetail::Namespace {
            anonymous: false,
            is_alias: false,
            ..
        } = decl.detail
        {
            if decl.name.is_empty() || decl.namespace_path.iter().any(String::is_empty) {
                return;
            }
            let mut path = decl.namespace_path.clone();
            path.push(decl.name.clone());
            table.record(path, ctx.location(decl.pos, decl.name.len()));
        }
    });
    table
}
