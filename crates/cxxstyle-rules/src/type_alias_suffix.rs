//! Rule requiring a `_t` suffix on type aliases.
//!
//! # Rationale
//!
//! Aliases read like types at use sites. The `_t` suffix marks them as
//! such, so `meters_t distance` is unambiguous where `meters distance`
//! is not.
//!
//! # Suppression
//!
//! - `// cxxstyle: allow(type-alias-suffix)` comment
//! - `ignore_patterns` config globs

use cxxstyle_core::{
    DeclKind, Diagnostic, FileContext, Replacement, Rule, Severity, Suggestion, TranslationUnit,
};

/// Rule code for type-alias-suffix.
pub const CODE: &str = "CS102";

/// Rule name for type-alias-suffix.
pub const NAME: &str = "type-alias-suffix";

/// Requires `using` aliases and `typedef`s to end in `_t`.
#[derive(Debug, Clone)]
pub struct TypeAliasSuffix {
    /// Custom severity.
    pub severity: Severity,
}

impl Default for TypeAliasSuffix {
    fn default() -> Self {
        Self::new()
    }
}

impl TypeAliasSuffix {
    /// Creates a new rule with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self {
            severity: Severity::Error,
        }
    }

    /// Sets the severity level.
    #[must_use]
    pub fn severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }
}

impl Rule for TypeAliasSuffix {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn description(&self) -> &'static str {
        "Requires type aliases to carry a _t suffix"
    }

    fn default_severity(&self) -> Severity {
        self.severity
    }

    fn check(&self, ctx: &FileContext<'_>, unit: &TranslationUnit) -> Vec<Diagnostic> {
        let mut diagnostics = Vec::new();

        unit.tree.walk(&mut |decl| {
            if decl.kind() != DeclKind::TypeAlias {
                return;
            }
            let name = decl.name.as_str();
            if name.is_empty() || name.ends_with("_t") || ctx.is_identifier_allowed(name) {
                return;
            }

            let location = ctx.location(decl.pos, name.len());
            let fixed = format!("{name}_t");
            diagnostics.push(
                Diagnostic::new(
                    CODE,
                    NAME,
                    self.severity,
                    location.clone(),
                    format!("Type alias `{name}` does not end in `_t`"),
                )
                .with_suggestion(Suggestion::with_fix(
                    format!("Rename to `{fixed}`"),
                    Replacement::new(location, fixed),
                )),
            );
        });

        diagnostics
    }
}
