//! Token-stream helpers for brace-delimited scopes.
//!
//! Formatting rules work on the raw token stream rather than the
//! declaration tree. These helpers answer the two questions they all
//! share: where does a bracketed group end, and how many top-level
//! statements does a braced scope contain.

use crate::token::{Token, TokenKind};

/// Returns the index of the first significant token at or after
/// `index`.
#[must_use]
pub fn next_significant(tokens: &[Token], mut index: usize) -> Option<usize> {
    while index < tokens.len() {
        if tokens[index].kind.is_significant() {
            return Some(index);
        }
        index += 1;
    }
    None
}

/// Returns the index of the closer matching the opening `(`, `[` or
/// `{` at `open`, or `None` when the group never closes.
///
/// Only brackets of the same shape are balanced against each other,
/// which is enough for token streams where strings and comments are
/// already single tokens.
#[must_use]
pub fn matching_close(tokens: &[Token], open: usize) -> Option<usize> {
    let opener = tokens.get(open)?;
    let close = match opener.text.as_str() {
        "(" => ")",
        "[" => "]",
        "{" => "}",
        _ => return None,
    };
    if opener.kind != TokenKind::Punct {
        return None;
    }

    let mut depth = 0usize;
    for (index, tok) in tokens.iter().enumerate().skip(open) {
        if tok.is_punct(&opener.text) {
            depth += 1;
        } else if tok.is_punct(close) {
            depth -= 1;
            if depth == 0 {
                return Some(index);
            }
        }
    }
    None
}

/// Counts the top-level statements inside the braced scope opening at
/// `open`.
///
/// A statement is a `;` at nesting depth zero (semicolons inside
/// parentheses, as in a `for` header, do not count) or a nested braced
/// group that stands on its own. Groups that continue an enclosing
/// construct (`else`, `while` of a do-loop, `catch`) or sit inside an
/// expression or declarator list are not counted separately; their
/// chain is counted once.
#[must_use]
pub fn statement_count(tokens: &[Token], open: usize) -> usize {
    let Some(close) = matching_close(tokens, open) else {
        return 0;
    };

    let mut count = 0usize;
    let mut grouping = 0usize;
    let mut index = open + 1;
    while index < close {
        let tok = &tokens[index];
        if tok.is_punct("(") || tok.is_punct("[") {
            grouping += 1;
        } else if tok.is_punct(")") || tok.is_punct("]") {
            grouping = grouping.saturating_sub(1);
        } else if tok.is_punct(";") && grouping == 0 {
            count += 1;
        } else if tok.is_punct("{") && grouping == 0 {
            let Some(end) = matching_close(tokens, index) else {
                break;
            };
            if group_is_statement(tokens, end) {
                count += 1;
            }
            index = end;
        }
        index += 1;
    }
    count
}

/// Whether the group closing at `close` ends a statement of its own.
fn group_is_statement(tokens: &[Token], close: usize) -> bool {
    let Some(next) = next_significant(tokens, close + 1) else {
        return true;
    };
    let tok = &tokens[next];
    if tok.is_punct(";") || tok.is_punct(",") || tok.is_punct(")") || tok.is_punct("]") {
        // The terminator or enclosing expression accounts for it.
        return false;
    }
    !(tok.is_keyword("else") || tok.is_keyword("while") || tok.is_keyword("catch"))
}
