//! Rule forbidding braces around single-statement control bodies.
//!
//! # Rationale
//!
//! A control-structure body holding exactly one statement reads better
//! without the brace ceremony. Bodies with two or more statements keep
//! their braces (and the placement rule governs those); empty braced
//! bodies are deliberate and stay untouched. `try`/`catch` and
//! `switch` need their braces grammatically and are never flagged.
//!
//! # Suppression
//!
//! - `// cxxstyle: allow(single-statement-braces)` comment

use cxxstyle_core::utils::{matching_close, next_significant, statement_count};
use cxxstyle_core::{
    Diagnostic, FileContext, Rule, Severity, Suggestion, Token, TranslationUnit,
};

/// Rule code for single-statement-braces.
pub const CODE: &str = "CS402";

/// Rule name for single-statement-braces.
pub const NAME: &str = "single-statement-braces";

/// Flags braced control bodies that contain exactly one statement.
#[derive(Debug, Clone)]
pub struct SingleStatementBraces {
    /// Custom severity.
    pub severity: Severity,
}

impl Default for SingleStatementBraces {
    fn default() -> Self {
        Self::new()
    }
}

impl SingleStatementBraces {
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

impl Rule for SingleStatementBraces {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn description(&self) -> &'static str {
        "Forbids braces around a control body with exactly one statement"
    }

    fn default_severity(&self) -> Severity {
        self.severity
    }

    fn check(&self, ctx: &FileContext<'_>, unit: &TranslationUnit) -> Vec<Diagnostic> {
        let mut diagnostics = Vec::new();
        let tokens = &unit.tokens;

        for (index, tok) in tokens.iter().enumerate() {
            let body = if tok.is_keyword("if") || tok.is_keyword("for") || tok.is_keyword("while")
            {
                body_after_condition(tokens, index)
            } else if tok.is_keyword("else") {
                body_after_else(tokens, index)
            } else if tok.is_keyword("do") {
                next_significant(tokens, index + 1)
            } else {
                None
            };

            let Some(open) = body else {
                continue;
            };
            if !tokens[open].is_punct("{") || statement_count(tokens, open) != 1 {
                continue;
            }

            diagnostics.push(
                Diagnostic::new(
                    CODE,
                    NAME,
                    self.severity,
                    ctx.location(tokens[open].pos, 1),
                    format!("Braces around the single-statement `{}` body", tok.text),
                )
                .with_suggestion(Suggestion::new("Remove the braces")),
            );
        }

        diagnostics
    }
}

/// Index of the body token following a parenthesized condition, as in
/// `if (...)`, `for (...)` or `while (...)`.
fn body_after_condition(tokens: &[Token], keyword: usize) -> Option<usize> {
    let mut open = next_significant(tokens, keyword + 1)?;
    // `if constexpr (...)`
    if tokens[open].is_keyword("constexpr") {
        open = next_significant(tokens, open + 1)?;
    }
    if !tokens[open].is_punct("(") {
        return None;
    }
    let close = matching_close(tokens, open)?;
    next_significant(tokens, close + 1)
}

/// Index of the body token of an `else`, skipping `else if` chains.
fn body_after_else(tokens: &[Token], keyword: usize) -> Option<usize> {
    let body = next_significant(tokens, keyword + 1)?;
    if tokens[body].is_keyword("if") {
        return None;
    }
    Some(body)
}
