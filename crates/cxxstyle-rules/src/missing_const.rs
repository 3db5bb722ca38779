//! Rule suggesting `const` for bindings that are never modified.
//!
//! # Rationale
//!
//! A `const` binding is one less thing to track while reading. The
//! rule flags a variable or parameter only when its whole visible
//! scope is in front of the checker and no occurrence in that scope
//! could possibly write to it: no assignment or compound assignment,
//! no increment or decrement, no address-taken, no element or member
//! access, no appearance as a call argument, no stream extraction.
//!
//! Anything the checker cannot rule out counts as a possible write, so
//! the rule misses real candidates rather than flagging false ones.
//! Bindings whose scope extends beyond the file (public members,
//! external globals) are never eligible.
//!
//! # Suppression
//!
//! - `// cxxstyle: allow(missing-const)` comment

use cxxstyle_core::{
    Diagnostic, FileContext, Rule, Severity, Suggestion, Token, TokenRange, TranslationUnit,
};

/// Rule code for missing-const.
pub const CODE: &str = "CS301";

/// Rule name for missing-const.
pub const NAME: &str = "missing-const";

/// Operators whose left operand is written to.
const ASSIGN_OPS: &[&str] = &[
    "=", "+=", "-=", "*=", "/=", "%=", "&=", "|=", "^=", "<<=", ">>=",
];

/// Flags never-modified bindings that lack `const`.
#[derive(Debug, Clone)]
pub struct MissingConst {
    /// Custom severity.
    pub severity: Severity,
}

impl Default for MissingConst {
    fn default() -> Self {
        Self::new()
    }
}

impl MissingConst {
    /// Creates a new rule with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self {
            severity: Severity::Warning,
        }
    }

    /// Sets the severity level.
    #[must_use]
    pub fn severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }
}

impl Rule for MissingConst {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn description(&self) -> &'static str {
        "Suggests const for bindings with no possible write site"
    }

    fn default_severity(&self) -> Severity {
        self.severity
    }

    fn check(&self, ctx: &FileContext<'_>, unit: &TranslationUnit) -> Vec<Diagnostic> {
        let mut diagnostics = Vec::new();
        let tokens = &unit.tokens;

        unit.tree.walk(&mut |decl| {
            if let Some(info) = decl.as_variable() {
                let Some(scope) = info.mutation_scope else {
                    return;
                };
                let name = decl.name.as_str();
                if name.is_empty()
                    || decl.qualifiers.is_const
                    || decl.qualifiers.is_constexpr
                    || ctx.is_identifier_allowed(name)
                {
                    return;
                }
                if may_be_written(tokens, scope, name, Some(decl.pos.offset)) {
                    return;
                }

                diagnostics.push(
                    Diagnostic::new(
                        CODE,
                        NAME,
                        self.severity,
                        ctx.location(decl.pos, name.len()),
                        format!("Variable `{name}` is never modified"),
                    )
                    .with_suggestion(Suggestion::new("Declare it `const`")),
                );
            } else if let Some(info) = decl.as_function() {
                // Parameters are only eligible when the body is here.
                let Some(body) = info.body else {
                    return;
                };
                for param in &info.params {
                    let Some(name) = param.name.as_deref() else {
                        continue;
                    };
                    if param.is_const || ctx.is_identifier_allowed(name) {
                        continue;
                    }
                    if may_be_written(tokens, body, name, None) {
                        continue;
                    }

                    diagnostics.push(
                        Diagnostic::new(
                            CODE,
                            NAME,
                            self.severity,
                            ctx.location(param.pos, name.len()),
                            format!("Parameter `{name}` is never modified"),
                        )
                        .with_suggestion(Suggestion::new("Declare it `const`")),
                    );
                }
            }
        });

        diagnostics
    }
}

/// Whether any occurrence of `name` inside `scope` could write to the
/// binding. `defining_offset` is the byte offset of the declaration's
/// own name token, which does not count as a use.
fn may_be_written(
    tokens: &[Token],
    scope: TokenRange,
    name: &str,
    defining_offset: Option<usize>,
) -> bool {
    let end = scope.end.min(tokens.len());
    for index in scope.start..end {
        let tok = &tokens[index];
        if !tok.is_identifier() || tok.text != name {
            continue;
        }
        if defining_offset == Some(tok.pos.offset) {
            continue;
        }
        if occurrence_may_write(tokens, scope, index) {
            return true;
        }
    }
    false
}

/// Judges a single occurrence. Errs toward "may write".
fn occurrence_may_write(tokens: &[Token], scope: TokenRange, index: usize) -> bool {
    if let Some(next) = next_significant(tokens, index + 1, scope.end.min(tokens.len())) {
        let tok = &tokens[next];
        if ASSIGN_OPS.iter().any(|op| tok.is_punct(op)) {
            return true;
        }
        // Element, member, and call accesses may all mutate through
        // the binding. A stream on the left of `<<` or `>>` is
        // written to as well.
        if ["++", "--", "[", ".", "->", "(", "<<", ">>"]
            .iter()
            .any(|op| tok.is_punct(op))
        {
            return true;
        }
    }

    if let Some(prev) = prev_significant(tokens, index, scope.start) {
        let tok = &tokens[prev];
        if ["++", "--", "&", ">>"].iter().any(|op| tok.is_punct(op)) {
            return true;
        }
        // Call arguments may bind to non-const references.
        if tok.is_punct("(") {
            return callee_precedes(tokens, scope, prev);
        }
        if tok.is_punct(",") {
            return enclosing_call(tokens, scope, index);
        }
    }

    false
}

/// Whether the token before an opening parenthesis looks like a
/// callee, which makes the parenthesis an argument list rather than
/// grouping.
fn callee_precedes(tokens: &[Token], scope: TokenRange, open: usize) -> bool {
    let Some(prev) = prev_significant(tokens, open, scope.start) else {
        return false;
    };
    let tok = &tokens[prev];
    tok.is_identifier() || tok.is_punct(">") || tok.is_punct(")") || tok.is_punct("]")
}

/// Walks back from a comma-separated occurrence to the unmatched
/// opening bracket and reports whether it is a call argument list.
fn enclosing_call(tokens: &[Token], scope: TokenRange, index: usize) -> bool {
    let mut parens = 0usize;
    let mut brackets = 0usize;
    let mut braces = 0usize;
    let mut i = index;

    while i > scope.start {
        i -= 1;
        let tok = &tokens[i];
        if tok.is_punct(")") {
            parens += 1;
        } else if tok.is_punct("]") {
            brackets += 1;
        } else if tok.is_punct("}") {
            braces += 1;
        } else if tok.is_punct("(") {
            if parens == 0 {
                return callee_precedes(tokens, scope, i);
            }
            parens -= 1;
        } else if tok.is_punct("[") {
            if brackets == 0 {
                return false;
            }
            brackets -= 1;
        } else if tok.is_punct("{") {
            if braces == 0 {
                // Brace-enclosed initializer lists copy their
                // elements.
                return false;
            }
            braces -= 1;
        } else if tok.is_punct(";") && parens == 0 && brackets == 0 && braces == 0 {
            return false;
        }
    }

    false
}

fn next_significant(tokens: &[Token], mut index: usize, end: usize) -> Option<usize> {
    while index < end {
        if tokens[index].kind.is_significant() {
            return Some(index);
        }
        index += 1;
    }
    None
}

fn prev_significant(tokens: &[Token], index: usize, start: usize) -> Option<usize> {
    let mut i = index;
    while i > start {
        i -= 1;
        if tokens[i].kind.is_significant() {
            return Some(i);
        }
    }
    None
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
        MissingConst::new().check(&ctx, &unit)
    }

    #[test]
    fn test_read_only_local_is_flagged() {
        let diagnostics = check_code("int f() {\n    int base = 5;\n    return base + 1;\n}\n");
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].code, CODE);
        assert_eq!(diagnostics[0].severity, Severity::Warning);
        assert!(diagnostics[0].message.contains("`base`"));
    }

    #[test]
    fn test_assigned_local_passes() {
        let diagnostics = check_code("int f() {\n    int total = 0;\n    total += 2;\n    return total;\n}\n");
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn test_incremented_loop_variable_passes() {
        let diagnostics =
            check_code("int f(int n) {\n    int sum = 0;\n    for (int i = 0; i < n; ++i) {\n        sum += i;\n    }\n    return sum;\n}\n");
        // `n` is only read, so it is the single candidate.
        assert_eq!(diagnostics.len(), 1);
        assert!(diagnostics[0].message.contains("`n`"));
    }

    #[test]
    fn test_call_argument_blocks_flagging() {
        let diagnostics = check_code("void g(int& out);\nvoid f() {\n    int slot = 0;\n    g(slot);\n}\n");
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn test_address_taken_blocks_flagging() {
        let diagnostics = check_code("void observe(int* slot);\nvoid f() {\n    int x = 0;\n    observe(&x);\n}\n");
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn test_stream_extraction_blocks_flagging() {
        let diagnostics = check_code("void f(std::istream& in) {\n    int value = 0;\n    in >> value;\n}\n");
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn test_member_access_blocks_flagging() {
        let diagnostics = check_code("void f(widget& w) {\n    w.refresh();\n}\n");
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn test_read_only_parameter_is_flagged() {
        let diagnostics = check_code("int twice(int value) {\n    return value * 2;\n}\n");
        assert_eq!(diagnostics.len(), 1);
        assert!(diagnostics[0].message.contains("Parameter `value`"));
    }

    #[test]
    fn test_declaration_only_parameters_skipped() {
        let diagnostics = check_code("int twice(int value);\n");
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn test_const_bindings_skipped() {
        let diagnostics = check_code(
            "int f() {\n    const int base = 5;\n    constexpr int scale = 2;\n    return base * scale;\n}\n",
        );
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn test_public_member_not_eligible() {
        let diagnostics = check_code("struct point {\n    double x;\n};\n");
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn test_unwritten_private_member_is_flagged() {
        let diagnostics = check_code(
            "class widget {\n    int limit_;\npublic:\n    int get() const noexcept { return limit_; }\n};\n",
        );
        assert_eq!(diagnostics.len(), 1);
        assert!(diagnostics[0].message.contains("`limit_`"));
    }

    #[test]
    fn test_assigned_private_member_passes() {
        let diagnostics = check_code(
            "class widget {\n    int count_;\npublic:\n    void bump() noexcept { count_ += 1; }\n};\n",
        );
        assert!(diagnostics.is_empty());
    }
}
