//! Rule forbidding tab characters in whitespace.
//!
//! # Rationale
//!
//! Indentation and alignment use spaces only, so a file renders the
//! same everywhere. Tabs inside string or character literals are
//! content, not whitespace, and are left alone. A line is reported at
//! most once however many tabs it carries.
//!
//! # Suppression
//!
//! - `// cxxstyle: allow(tab-indentation)` comment

use std::collections::BTreeMap;

use cxxstyle_core::{
    Diagnostic, FileContext, Rule, Severity, SourcePos, Suggestion, TranslationUnit,
};

/// Rule code for tab-indentation.
pub const CODE: &str = "CS403";

/// Rule name for tab-indentation.
pub const NAME: &str = "tab-indentation";

/// Flags lines whose leading or interior whitespace contains a tab.
#[derive(Debug, Clone)]
pub struct TabIndentation {
    /// Custom severity.
    pub severity: Severity,
}

impl Default for TabIndentation {
    fn default() -> Self {
        Self::new()
    }
}

impl TabIndentation {
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

impl Rule for TabIndentation {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn description(&self) -> &'static str {
        "Forbids tab characters in leading and interior whitespace"
    }

    fn default_severity(&self) -> Severity {
        self.severity
    }

    fn check(&self, ctx: &FileContext<'_>, unit: &TranslationUnit) -> Vec<Diagnostic> {
        // First tab found on each offending line.
        let mut lines: BTreeMap<usize, SourcePos> = BTreeMap::new();

        let mut run_start = 0usize;
        let mut run_line = 1usize;
        let mut run_column = 1usize;
        for tok in &unit.tokens {
            if tok.leading.tabs > 0 {
                let run = &ctx.content[run_start..tok.pos.offset];
                let mut line = run_line;
                let mut column = run_column;
                for (at, ch) in run.char_indices() {
                    match ch {
                        '\n' => {
                            line += 1;
                            column = 1;
                        }
                        '\t' => {
                            lines
                                .entry(line)
                                .or_insert_with(|| SourcePos::new(line, column, run_start + at));
                            column += 1;
                        }
                        _ => column += 1,
                    }
                }
            }
            run_start = tok.pos.offset + tok.text.len();
            run_line = tok.end_line();
            run_column = match tok.text.rfind('\n') {
                Some(last) => tok.text.len() - last,
                None => tok.pos.column + tok.text.len(),
            };
        }

        lines
            .into_values()
            .map(|pos| {
                Diagnostic::new(
                    CODE,
                    NAME,
                    self.severity,
                    ctx.location(pos, 1),
                    "Tab character in whitespace",
                )
                .with_suggestion(Suggestion::new("Indent with spaces"))
            })
            .collect()
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
        TabIndentation::new().check(&ctx, &unit)
    }

    #[test]
    fn test_space_indentation_passes() {
        let diagnostics = check_code("void f() noexcept\n{\n    act();\n}\n");
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn test_tab_indentation_is_flagged() {
        let diagnostics = check_code("void f() noexcept\n{\n\tact();\n}\n");
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].code, CODE);
        assert_eq!(diagnostics[0].location.line, 3);
        assert_eq!(diagnostics[0].location.column, 1);
    }

    #[test]
    fn test_one_diagnostic_per_line() {
        let diagnostics = check_code("void f() noexcept\n{\n\t\tint x\t= 1;\n}\n");
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].location.line, 3);
    }

    #[test]
    fn test_each_offending_line_reported() {
        let diagnostics = check_code("void f() noexcept\n{\n\ta();\n\tb();\n}\n");
        assert_eq!(diagnostics.len(), 2);
        assert_eq!(diagnostics[0].location.line, 3);
        assert_eq!(diagnostics[1].location.line, 4);
    }

    #[test]
    fn test_tab_inside_string_literal_ignored() {
        let diagnostics = check_code("const char* sep = \"a\tb\";\n");
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn test_interior_tab_is_flagged() {
        let diagnostics = check_code("int x = 1;\tint y = 2;\n");
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].location.line, 1);
        assert_eq!(diagnostics[0].location.column, 11);
    }
}
