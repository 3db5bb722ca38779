//! Rule requiring an explicit exception specification.
//!
//! # Rationale
//!
//! `noexcept` is part of the contract: callers move-construct, pick
//! algorithms, and reason about rollback based on it. The guide makes
//! the contract explicit on every function, so `noexcept(false)` marks
//! a considered decision rather than an omission.
//!
//! Deleted functions have no behavior and are exempt. Defaulted
//! functions are not: their generated specification depends on members
//! and bases, and the guide wants the intent written down.
//!
//! # Suppression
//!
//! - `// cxxstyle: allow(missing-noexcept)` comment

use cxxstyle_core::{
    DeclKind, Diagnostic, FileContext, Rule, Severity, Suggestion, TranslationUnit,
};

/// Rule code for missing-noexcept.
pub const CODE: &str = "CS302";

/// Rule name for missing-noexcept.
pub const NAME: &str = "missing-noexcept";

/// Requires every function to carry `noexcept` or `noexcept(false)`.
#[derive(Debug, Clone)]
pub struct MissingNoexcept {
    /// Custom severity.
    pub severity: Severity,
}

impl Default for MissingNoexcept {
    fn default() -> Self {
        Self::new()
    }
}

impl MissingNoexcept {
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

impl Rule for MissingNoexcept {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn description(&self) -> &'static str {
        "Requires an explicit noexcept specification on every function"
    }

    fn default_severity(&self) -> Severity {
        self.severity
    }

    fn check(&self, ctx: &FileContext<'_>, unit: &TranslationUnit) -> Vec<Diagnostic> {
        let mut diagnostics = Vec::new();

        unit.tree.walk(&mut |decl| {
            if decl.kind() != DeclKind::Function {
                return;
            }
            let Some(info) = decl.as_function() else {
                return;
            };
            if info.exception.is_some() || info.is_deleted {
                return;
            }

            let label = if decl.name.is_empty() {
                "Function".to_string()
            } else {
                format!("`{}`", decl.name)
            };
            diagnostics.push(
                Diagnostic::new(
                    CODE,
                    NAME,
                    self.severity,
                    ctx.location(decl.pos, decl.name.len()),
                    format!("{label} has no exception specification"),
                )
                .with_suggestion(Suggestion::new(
                    "Add `noexcept`, or `noexcept(false)` if it may throw",
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
        MissingNoexcept::new().check(&ctx, &unit)
    }

    #[test]
    fn test_specified_functions_pass() {
        let diagnostics = check_code(
            r"
void a() noexcept;
void b() noexcept(false);
template <typename T> void c(T v) noexcept(noexcept(v.release()));
",
        );
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn test_detects_missing_specification() {
        let diagnostics = check_code("double distance(double lat, double lon);\n");
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].code, CODE);
        assert!(diagnostics[0].message.contains("`distance`"));
    }

    #[test]
    fn test_members_and_special_functions_checked() {
        let diagnostics = check_code(
            r"
class widget {
public:
    widget();
    ~widget();
    bool operator==(const widget& other) const;
};
",
        );
        assert_eq!(diagnostics.len(), 3);
    }

    #[test]
    fn test_deleted_exempt_defaulted_not() {
        let diagnostics = check_code(
            r"
class widget {
public:
    widget(const widget&) = delete;
    widget(widget&&) = default;
};
",
        );
        assert_eq!(diagnostics.len(), 1);
    }

    #[test]
    fn test_one_diagnostic_per_function() {
        let diagnostics = check_code("void First_Bad_Name();\n");
        // Naming problems are another rule's business; exactly one here.
        assert_eq!(diagnostics.len(), 1);
    }
}
