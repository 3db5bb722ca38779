//! Rule requiring `PascalCase` template parameters.
//!
//! # Rationale
//!
//! Template parameters stand in for types and values supplied by the
//! caller. `PascalCase` keeps them visually distinct from the
//! `lower_snake_case` world around them, so `ValueType` in a body is
//! immediately recognizable as a parameter.
//!
//! # Suppression
//!
//! - `// cxxstyle: allow(template-parameter-case)` comment
//! - `ignore_patterns` config globs

use cxxstyle_core::utils::{is_pascal_case, to_pascal_case};
use cxxstyle_core::{
    DeclKind, Diagnostic, FileContext, Replacement, Rule, Severity, Suggestion, TranslationUnit,
};

/// Rule code for template-parameter-case.
pub const CODE: &str = "CS104";

/// Rule name for template-parameter-case.
pub const NAME: &str = "template-parameter-case";

/// Requires `PascalCase` for template parameters.
#[derive(Debug, Clone)]
pub struct TemplateParameterCase {
    /// Custom severity.
    pub severity: Severity,
}

impl Default for TemplateParameterCase {
    fn default() -> Self {
        Self::new()
    }
}

impl TemplateParameterCase {
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

impl Rule for TemplateParameterCase {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn description(&self) -> &'static str {
        "Requires PascalCase for template parameters"
    }

    fn default_severity(&self) -> Severity {
        self.severity
    }

    fn check(&self, ctx: &FileContext<'_>, unit: &TranslationUnit) -> Vec<Diagnostic> {
        let mut diagnostics = Vec::new();

        unit.tree.walk(&mut |decl| {
            if decl.kind() != DeclKind::TemplateParameter {
                return;
            }
            let name = decl.name.as_str();
            if name.is_empty() || is_pascal_case(name) || ctx.is_identifier_allowed(name) {
                return;
            }

            let location = ctx.location(decl.pos, name.len());
            let pascal = to_pascal_case(name);
            let mut diagnostic = Diagnostic::new(
                CODE,
                NAME,
                self.severity,
                location.clone(),
                format!("Template parameter `{name}` is not PascalCase"),
            );
            if !pascal.is_empty() && pascal != name {
                diagnostic = diagnostic.with_suggestion(Suggestion::with_fix(
                    format!("Rename to `{pascal}`"),
                    Replacement::new(location, pascal),
                ));
            }
            diagnostics.push(diagnostic);
        });

        diagnostics
    }
}
