//! Rule forbidding anonymous namespaces.
//!
//! # Rationale
//!
//! Anonymous namespaces hide symbols from the linker but also from
//! readers and debuggers, and they make the enclosing file the only
//! possible unit of reuse. The guide prefers named `detail` namespaces
//! or `static` for internal linkage.
//!
//! # Suppression
//!
//! - `// cxxstyle: allow(anonymous-namespace)` comment

use cxxstyle_core::{
    DeclDetail, Diagnostic, FileContext, Rule, Severity, Suggestion, TranslationUnit,
};

/// Rule code for anonymous-namespace.
pub const CODE: &str = "CS201";

/// Rule name for anonymous-namespace.
pub const NAME: &str = "anonymous-namespace";

/// Flags every anonymous namespace.
#[derive(Debug, Clone)]
pub struct AnonymousNamespace {
    /// Custom severity.
    pub severity: Severity,
}

impl Default for AnonymousNamespace {
    fn default() -> Self {
        Self::new()
    }
}

impl AnonymousNamespace {
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

impl Rule for AnonymousNamespace {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn description(&self) -> &'static str {
        "Forbids anonymous namespaces"
    }

    fn default_severity(&self) -> Severity {
        self.severity
    }

    fn check(&self, ctx: &FileContext<'_>, unit: &TranslationUnit) -> Vec<Diagnostic> {
        let mut diagnostics = Vec::new();

        unit.tree.walk(&mut |decl| {
            if !matches!(decl.detail, DeclDetail::Namespace { anonymous: true, .. }) {
                return;
            }

            diagnostics.push(
                Diagnostic::new(
                    CODE,
                    NAME,
                    self.severity,
                    ctx.location(decl.pos, "namespace".len()),
                    "Anonymous namespace is not allowed",
                )
                .with_suggestion(Suggestion::new(
                    "Use a named namespace (e.g. `detail`) or mark helpers `static`",
                )),
            );
        });

        diagnostics
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cxxstyle_core::AllowList;
    use std::path::Path;

    fn check_code(code: &str) -> Vec<Diagnostic> {
        let unit = TranslationUnit::parse(code);
        let allowlist = AllowList::default();
        let ctx = FileContext::new(Path::new("test.cpp"), code, &allowlist);
        AnonymousNamespace::new().check(&ctx, &unit)
    }

    #[test]
    fn test_named_namespaces_pass() {
        let diagnostics = check_code("namespace kmx { namespace detail { int x; } }\n");
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn test_detects_anonymous_namespace() {
        let diagnostics = check_code("namespace { int x; }\n");
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].code, CODE);
        assert_eq!(diagnostics[0].location.line, 1);
    }

    #[test]
    fn test_detects_nested_anonymous_namespace() {
        let diagnostics = check_code("namespace kmx {\nnamespace {\nint x;\n}\n}\n");
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].location.line, 2);
    }

    #[test]
    fn test_each_occurrence_flagged() {
        let diagnostics = check_code("namespace { int a; }\nnamespace { int b; }\n");
        assert_eq!(diagnostics.len(), 2);
    }
}
