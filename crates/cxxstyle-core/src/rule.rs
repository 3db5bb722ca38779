//! Rule traits for defining style rules.

use crate::context::{FileContext, ProjectContext};
use crate::model::TranslationUnit;
use crate::types::{Diagnostic, Severity};

/// A per-file style rule based on the declaration tree.
///
/// Implement this trait to create rules that analyze individual source
/// files. Rules receive the built declaration tree and can walk it, or
/// drop down to raw tokens via [`crate::tokenize`] for layout checks.
///
/// # Example
///
/// ```ignore
/// use cxxstyle_core::{Rule, FileContext, TranslationUnit, Diagnostic};
///
/// pub struct NoLongFiles;
///
/// impl Rule for NoLongFiles {
///     fn name(&self) -> &'static str { "no-long-files" }
///     fn code(&self) -> &'static str { "CS900" }
///
///     fn check(&self, ctx: &FileContext<'_>, _unit: &TranslationUnit) -> Vec<Diagnostic> {
///         let mut diagnostics = Vec::new();
///         if ctx.content.lines().count() > 2000 {
///             // ...
///         }
///         diagnostics
///     }
/// }
/// ```
pub trait Rule: Send + Sync {
    /// Returns the kebab-case name of this rule (e.g., "identifier-case").
    fn name(&self) -> &'static str;

    /// Returns the rule code (e.g., "CS101").
    fn code(&self) -> &'static str;

    /// Returns a brief description of what this rule checks.
    fn description(&self) -> &'static str {
        ""
    }

    /// Returns the default severity for diagnostics from this rule.
    fn default_severity(&self) -> Severity {
        Severity::Error
    }

    /// Checks a single file and returns any diagnostics found.
    ///
    /// # Arguments
    ///
    /// * `ctx` - Context about the file being checked
    /// * `unit` - The declaration tree built from the file
    ///
    /// # Returns
    ///
    /// A vector of diagnostics found in this file.
    fn check(&self, ctx: &FileContext<'_>, unit: &TranslationUnit) -> Vec<Diagnostic>;
}

/// Type alias for boxed Rule trait objects.
pub type RuleBox = Box<dyn Rule>;

/// A project-wide style rule based on cross-file analysis.
///
/// Implement this trait to create rules that need to see the whole
/// project at once rather than one file at a time, such as checks over
/// the full set of namespace paths.
///
/// # Example
///
/// ```ignore
/// use cxxstyle_core::{ProjectRule, ProjectContext, Diagnostic, Severity};
///
/// pub struct MaxNamespaceDepth;
///
/// impl ProjectRule for MaxNamespaceDepth {
///     fn name(&self) -> &'static str { "max-namespace-depth" }
///     fn code(&self) -> &'static str { "CS901" }
///
///     fn check_project(&self, ctx: &ProjectContext) -> Vec<Diagnostic> {
///         ctx.namespaces
///             .iter()
///             .filter(|(path, _)| path.len() > 4)
///             .map(|(path, loc)| {
///                 Diagnostic::new(
///                     self.code(),
///                     self.name(),
///                     Severity::Warning,
///                     loc.clone(),
///                     format!("Namespace `{}` is nested too deeply", path.join("::")),
///                 )
///             })
///             .collect()
///     }
/// }
/// ```
pub trait ProjectRule: Send + Sync {
    /// Returns the kebab-case name of this rule.
    fn name(&self) -> &'static str;

    /// Returns the rule code (e.g., "CS202").
    fn code(&self) -> &'static str;

    /// Returns a brief description of what this rule checks.
    fn description(&self) -> &'static str {
        ""
    }

    /// Returns the default severity for diagnostics from this rule.
    fn default_severity(&self) -> Severity {
        Severity::Error
    }

    /// Checks the project and returns any diagnostics found.
    ///
    /// # Arguments
    ///
    /// * `ctx` - Context aggregated over every checked file
    ///
    /// # Returns
    ///
    /// A vector of diagnostics found in the project.
    fn check_project(&self, ctx: &ProjectContext) -> Vec<Diagnostic>;
}

/// Type alias for boxed `ProjectRule` trait objects.
pub type ProjectRuleBox = Box<dyn ProjectRule>;
