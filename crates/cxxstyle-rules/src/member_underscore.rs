//! Rule requiring a trailing underscore on private data members.
//!
//! # Rationale
//!
//! Inside member functions, `count_` is visibly a member and `count` a
//! local or parameter. The suffix removes shadowing mistakes in
//! constructors (`count_ = count`) without the noise of an `m_` prefix.
//!
//! Only private members carry the marker; public members of plain
//! structs are part of the type's surface and keep clean names.
//!
//! # Suppression
//!
//! - `// cxxstyle: allow(member-underscore)` comment
//! - `ignore_patterns` config globs

use cxxstyle_core::{
    Diagnostic, FileContext, Replacement, Rule, Severity, Suggestion, TranslationUnit, Visibility,
};

/// Rule code for member-underscore.
pub const CODE: &str = "CS103";

/// Rule name for member-underscore.
pub const NAME: &str = "member-underscore";

/// Requires private data members to end in `_`.
#[derive(Debug, Clone)]
pub struct MemberUnderscore {
    /// Custom severity.
    pub severity: Severity,
}

impl Default for MemberUnderscore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemberUnderscore {
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

impl Rule for MemberUnderscore {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn description(&self) -> &'static str {
        "Requires private data members to end in an underscore"
    }

    fn default_severity(&self) -> Severity {
        self.severity
    }

    fn check(&self, ctx: &FileContext<'_>, unit: &TranslationUnit) -> Vec<Diagnostic> {
        let mut diagnostics = Vec::new();

        unit.tree.walk(&mut |decl| {
            let Some(info) = decl.as_variable() else {
                return;
            };
            if !info.is_member || decl.visibility != Visibility::Private {
                return;
            }
            let name = decl.name.as_str();
            if name.is_empty() || name.ends_with('_') || ctx.is_identifier_allowed(name) {
                return;
            }

            let location = ctx.location(decl.pos, name.len());
            let fixed = format!("{name}_");
            diagnostics.push(
                Diagnostic::new(
                    CODE,
                    NAME,
                    self.severity,
                    location.clone(),
                    format!("Private member `{name}` does not end in `_`"),
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
