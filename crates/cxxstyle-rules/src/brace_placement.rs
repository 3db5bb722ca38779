//! Rule enforcing brace placement for multi-statement scopes.
//!
//! # Rationale
//!
//! The opening brace of a scope with two or more statements goes alone
//! on its own line, indented like the statement that owns the scope.
//! Scopes with fewer statements are left to the single-statement rule
//! and to taste. A trailing comment may share the brace's line; any
//! other token disqualifies it.
//!
//! # Suppression
//!
//! - `// cxxstyle: allow(brace-placement)` comment

use cxxstyle_core::utils::{next_significant, statement_count};
use cxxstyle_core::{
    Diagnostic, FileContext, Rule, Severity, Suggestion, Token, TranslationUnit,
};

/// Rule code for brace-placement.
pub const CODE: &str = "CS401";

/// Rule name for brace-placement.
pub const NAME: &str = "brace-placement";

/// Flags opening braces of multi-statement scopes that are not alone
/// on their own line at the enclosing indentation.
#[derive(Debug, Clone)]
pub struct BracePlacement {
    /// Custom severity.
    pub severity: Severity,
}

impl Default for BracePlacement {
    fn default() -> Self {
        Self::new()
    }
}

impl BracePlacement {
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

impl Rule for BracePlacement {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn description(&self) -> &'static str {
        "Requires the opening brace of a multi-statement scope on its own line"
    }

    fn default_severity(&self) -> Severity {
        self.severity
    }

    fn check(&self, ctx: &FileContext<'_>, unit: &TranslationUnit) -> Vec<Diagnostic> {
        let mut diagnostics = Vec::new();
        let tokens = &unit.tokens;

        for (index, tok) in tokens.iter().enumerate() {
            if !tok.is_punct("{") || statement_count(tokens, index) < 2 {
                continue;
            }

            if !tok.starts_line() || !rest_of_line_is_comment(tokens, index) {
                diagnostics.push(
                    Diagnostic::new(
                        CODE,
                        NAME,
                        self.severity,
                        ctx.location(tok.pos, 1),
                        "Opening brace of a multi-statement scope must be alone on its own line",
                    )
                    .with_suggestion(Suggestion::new("Move the brace to its own line")),
                );
                continue;
            }

            if let Some(expected) = statement_column(tokens, index) {
                if tok.pos.column != expected {
                    diagnostics.push(
                        Diagnostic::new(
                            CODE,
                            NAME,
                            self.severity,
                            ctx.location(tok.pos, 1),
                            format!(
                                "Opening brace must match its statement's indentation (expected column {expected})"
                            ),
                        )
                        .with_suggestion(Suggestion::new(
                            "Align the brace with the start of its statement",
                        )),
                    );
                }
            }
        }

        diagnostics
    }
}

/// Whether everything after `open` on the brace's line is a comment.
fn rest_of_line_is_comment(tokens: &[Token], open: usize) -> bool {
    let line = tokens[open].pos.line;
    tokens[open + 1..]
        .iter()
        .take_while(|tok| tok.pos.line == line)
        .all(|tok| !tok.kind.is_significant())
}

/// Column of the first token on the line where the statement owning
/// the brace at `open` begins.
///
/// Walks backward over balanced groups to the previous statement
/// boundary (`;`, `}`, an enclosing opener, or an access label), then
/// forward to the statement's first token.
fn statement_column(tokens: &[Token], open: usize) -> Option<usize> {
    let mut parens = 0usize;
    let mut brackets = 0usize;
    let mut braces = 0usize;
    let mut boundary = None;
    let mut i = open;

    while i > 0 {
        i -= 1;
        let tok = &tokens[i];
        if !tok.kind.is_significant() {
            continue;
        }
        if tok.is_punct(")") {
            parens += 1;
        } else if tok.is_punct("]") {
            brackets += 1;
        } else if tok.is_punct("}") {
            if parens == 0 && brackets == 0 && braces == 0 {
                boundary = Some(i);
                break;
            }
            braces += 1;
        } else if tok.is_punct("(") {
            if parens == 0 {
                boundary = Some(i);
                break;
            }
            parens -= 1;
        } else if tok.is_punct("[") {
            if brackets == 0 {
                boundary = Some(i);
                break;
            }
            brackets -= 1;
        } else if tok.is_punct("{") {
            if braces == 0 {
                boundary = Some(i);
                break;
            }
            braces -= 1;
        } else if parens == 0 && brackets == 0 && braces == 0 {
            if tok.is_punct(";") {
                boundary = Some(i);
                break;
            }
            if tok.is_punct(":") && follows_access_specifier(tokens, i) {
                boundary = Some(i);
                break;
            }
        }
    }

    let owner = match boundary {
        Some(at) => next_significant(tokens, at + 1)?,
        None => next_significant(tokens, 0)?,
    };
    if owner >= open {
        // The brace itself starts the statement (a bare block).
        return Some(tokens[open].pos.column);
    }
    Some(line_start_column(tokens, owner))
}

/// Whether the `:` at `index` terminates an access specifier label.
fn follows_access_specifier(tokens: &[Token], index: usize) -> bool {
    let mut i = index;
    while i > 0 {
        i -= 1;
        let tok = &tokens[i];
        if !tok.kind.is_significant() {
            continue;
        }
        return ["public", "private", "protected"]
            .iter()
            .any(|kw| tok.is_keyword(kw));
    }
    false
}

/// Column of the first token on `index`'s line.
fn line_start_column(tokens: &[Token], index: usize) -> usize {
    let line = tokens[index].pos.line;
    let mut first = index;
    while first > 0 && tokens[first - 1].pos.line == line {
        first -= 1;
    }
    tokens[first].pos.column
}
