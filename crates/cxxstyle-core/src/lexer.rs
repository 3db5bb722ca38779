//! Hand-rolled scanner that turns C++ source text into a token stream.
//!
//! The scanner is tolerant by construction: there is no error path. Input
//! that is not valid C++ degrades to [`TokenKind::Unknown`] tokens or to
//! literals that simply run to the end of the line or file. Preprocessor
//! directives are not interpreted; each one becomes a single opaque
//! [`TokenKind::Directive`] token covering the logical line, including
//! backslash continuations.

use crate::token::{is_reserved, CommentKind, LiteralKind, SourcePos, Token, TokenKind, Whitespace};

/// Three-character operators, tried before shorter matches.
const PUNCT3: &[&str] = &["<<=", ">>=", "->*", "...", "<=>"];

/// Two-character operators.
const PUNCT2: &[&str] = &[
    "::", "->", "++", "--", "<<", ">>", "<=", ">=", "==", "!=", "&&", "||", "+=", "-=", "*=",
    "/=", "%=", "&=", "|=", "^=", ".*", "##",
];

/// Single-character punctuation.
const PUNCT1: &str = "{}()[];,<>=!&|^~+-*/%.?:#";

/// Encoding prefixes that may precede a string literal.
const STRING_PREFIXES: &[&str] = &["L", "u8", "u", "U", "R", "LR", "u8R", "uR", "UR"];

/// Encoding prefixes that may precede a character literal.
const CHAR_PREFIXES: &[&str] = &["L", "u8", "u", "U"];

/// Streaming C++ lexer.
///
/// Implements [`Iterator`], yielding every token in the file followed by a
/// single [`TokenKind::Eof`] sentinel. Use [`tokenize`] to collect the whole
/// stream at once.
pub struct Lexer {
    chars: Vec<char>,
    pos: usize,
    offset: usize,
    line: usize,
    column: usize,
    first_token: bool,
    emitted_eof: bool,
}

impl Lexer {
    /// Creates a lexer over `source`.
    pub fn new(source: &str) -> Self {
        Self {
            chars: source.chars().collect(),
            pos: 0,
            offset: 0,
            line: 1,
            column: 1,
            first_token: true,
            emitted_eof: false,
        }
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn peek_at(&self, n: usize) -> Option<char> {
        self.chars.get(self.pos + n).copied()
    }

    fn advance(&mut self) -> Option<char> {
        let c = self.chars.get(self.pos).copied()?;
        self.pos += 1;
        self.offset += c.len_utf8();
        if c == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(c)
    }

    fn text_from(&self, start: usize) -> String {
        self.chars[start..self.pos].iter().collect()
    }

    fn skip_whitespace(&mut self) -> Whitespace {
        let mut ws = Whitespace::default();
        while let Some(c) = self.peek() {
            match c {
                ' ' => ws.spaces += 1,
                '\t' => ws.tabs += 1,
                '\n' => ws.newlines += 1,
                '\r' => {}
                _ => break,
            }
            self.advance();
        }
        ws
    }

    fn next_token(&mut self) -> Token {
        let leading = self.skip_whitespace();
        let first_on_line = leading.newlines > 0 || self.first_token;
        self.first_token = false;
        let pos = SourcePos::new(self.line, self.column, self.offset);

        let Some(c) = self.peek() else {
            return Token {
                kind: TokenKind::Eof,
                text: String::new(),
                pos,
                leading,
            };
        };

        let start = self.pos;
        let kind = match c {
            '/' if self.peek_at(1) == Some('/') => self.read_line_comment(),
            '/' if self.peek_at(1) == Some('*') => self.read_block_comment(),
            '#' if first_on_line => self.read_directive(),
            '"' => {
                self.advance();
                self.read_quoted('"');
                TokenKind::Literal(LiteralKind::Str)
            }
            '\'' => {
                self.advance();
                self.read_quoted('\'');
                TokenKind::Literal(LiteralKind::Char)
            }
            c if c.is_ascii_digit() => self.read_number(),
            c if is_ident_start(c) => self.read_word(start),
            _ => self.read_punct_or_unknown(),
        };

        Token {
            kind,
            text: self.text_from(start),
            pos,
            leading,
        }
    }

    fn read_line_comment(&mut self) -> TokenKind {
        self.advance();
        self.advance();
        let kind = match self.peek() {
            Some('/') | Some('!') => CommentKind::DocLine,
            _ => CommentKind::Line,
        };
        while let Some(c) = self.peek() {
            if c == '\n' {
                break;
            }
            self.advance();
        }
        TokenKind::Comment(kind)
    }

    fn read_block_comment(&mut self) -> TokenKind {
        self.advance();
        self.advance();
        // `/**/` is an ordinary empty comment, not a doc comment.
        let doc = match self.peek() {
            Some('*') => self.peek_at(1) != Some('/'),
            Some('!') => true,
            _ => false,
        };
        while let Some(c) = self.advance() {
            if c == '*' && self.peek() == Some('/') {
                self.advance();
                break;
            }
        }
        TokenKind::Comment(if doc {
            CommentKind::DocBlock
        } else {
            CommentKind::Block
        })
    }

    fn read_directive(&mut self) -> TokenKind {
        let mut last_nonblank = '#';
        while let Some(c) = self.peek() {
            if c == '\n' {
                if last_nonblank != '\\' {
                    break;
                }
                last_nonblank = ' ';
                self.advance();
                continue;
            }
            self.advance();
            if !matches!(c, ' ' | '\t' | '\r') {
                last_nonblank = c;
            }
        }
        TokenKind::Directive
    }

    /// Consumes a quoted literal body. The opening quote is already
    /// consumed. Stops after the closing quote, or before a newline, or at
    /// end of input, whichever comes first.
    fn read_quoted(&mut self, quote: char) {
        while let Some(c) = self.peek() {
            if c == '\n' {
                break;
            }
            self.advance();
            if c == '\\' {
                self.advance();
            } else if c == quote {
                break;
            }
        }
    }

    /// Consumes a raw string literal body. The lexer sits on the opening
    /// quote after an `R`-suffixed prefix. An unterminated raw string runs
    /// to the end of input.
    fn read_raw_string(&mut self) {
        self.advance();
        let mut delim = String::new();
        while let Some(c) = self.peek() {
            if c == '(' {
                self.advance();
                break;
            }
            if c == '\n' || c == '"' || c == '\\' {
                // Malformed delimiter. Fall back to quoted scanning.
                self.read_quoted('"');
                return;
            }
            delim.push(c);
            self.advance();
        }
        let closer: Vec<char> = delim.chars().chain(['"']).collect();
        while let Some(c) = self.advance() {
            if c == ')' && self.chars[self.pos..].starts_with(closer.as_slice()) {
                for _ in 0..closer.len() {
                    self.advance();
                }
                break;
            }
        }
    }

    fn read_number(&mut self) -> TokenKind {
        let mut prev = ' ';
        while let Some(c) = self.peek() {
            let keep = c.is_ascii_alphanumeric()
                || c == '.'
                || (c == '\'' && self.peek_at(1).is_some_and(|n| n.is_ascii_alphanumeric()))
                || ((c == '+' || c == '-') && matches!(prev, 'e' | 'E' | 'p' | 'P'));
            if !keep {
                break;
            }
            prev = c;
            self.advance();
        }
        TokenKind::Literal(LiteralKind::Number)
    }

    fn read_word(&mut self, start: usize) -> TokenKind {
        while let Some(c) = self.peek() {
            if !is_ident_continue(c) {
                break;
            }
            self.advance();
        }
        let word = self.text_from(start);
        if self.peek() == Some('"') && STRING_PREFIXES.contains(&word.as_str()) {
            if word.ends_with('R') {
                self.read_raw_string();
            } else {
                self.advance();
                self.read_quoted('"');
            }
            return TokenKind::Literal(LiteralKind::Str);
        }
        if self.peek() == Some('\'') && CHAR_PREFIXES.contains(&word.as_str()) {
            self.advance();
            self.read_quoted('\'');
            return TokenKind::Literal(LiteralKind::Char);
        }
        if is_reserved(&word) {
            TokenKind::Keyword
        } else {
            TokenKind::Identifier
        }
    }

    fn read_punct_or_unknown(&mut self) -> TokenKind {
        let probe: String = (0..3).filter_map(|n| self.peek_at(n)).collect();
        for len in (1..=probe.chars().count().min(3)).rev() {
            let candidate: String = probe.chars().take(len).collect();
            let hit = match len {
                3 => PUNCT3.contains(&candidate.as_str()),
                2 => PUNCT2.contains(&candidate.as_str()),
                _ => candidate.chars().all(|c| PUNCT1.contains(c)),
            };
            if hit {
                for _ in 0..len {
                    self.advance();
                }
                return TokenKind::Punct;
            }
        }
        self.advance();
        TokenKind::Unknown
    }
}

impl Iterator for Lexer {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        if self.emitted_eof {
            return None;
        }
        let tok = self.next_token();
        if tok.kind == TokenKind::Eof {
            self.emitted_eof = true;
        }
        Some(tok)
    }
}

fn is_ident_start(c: char) -> bool {
    c == '_' || c.is_ascii_alphabetic() || !c.is_ascii() && c.is_alphabetic()
}

fn is_ident_continue(c: char) -> bool {
    c == '_' || c.is_ascii_alphanumeric() || !c.is_ascii() && c.is_alphanumeric()
}

/// Lexes `source` to completion. The result always ends with exactly one
/// [`TokenKind::Eof`] token and is never empty.
pub fn tokenize(source: &str) -> Vec<Token> {
    Lexer::new(source).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<TokenKind> {
        tokenize(source).into_iter().map(|t| t.kind).collect()
    }

    fn texts(source: &str) -> Vec<String> {
        tokenize(source)
            .into_iter()
            .filter(|t| t.kind != TokenKind::Eof)
            .map(|t| t.text)
            .collect()
    }

    #[test]
    fn simple_declaration() {
        assert_eq!(
            kinds("int x = 42;"),
            vec![
                TokenKind::Keyword,
                TokenKind::Identifier,
                TokenKind::Punct,
                TokenKind::Literal(LiteralKind::Number),
                TokenKind::Punct,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn empty_input_yields_single_eof() {
        let tokens = tokenize("");
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].kind, TokenKind::Eof);
    }

    #[test]
    fn comment_classification() {
        let source = "// a\n/// b\n//! c\n/* d */\n/** e */\n/*! f */\n/**/";
        let comment_kinds: Vec<CommentKind> = tokenize(source)
            .into_iter()
            .filter_map(|t| match t.kind {
                TokenKind::Comment(k) => Some(k),
                _ => None,
            })
            .collect();
        assert_eq!(
            comment_kinds,
            vec![
                CommentKind::Line,
                CommentKind::DocLine,
                CommentKind::DocLine,
                CommentKind::Block,
                CommentKind::DocBlock,
                CommentKind::DocBlock,
                CommentKind::Block,
            ]
        );
    }

    #[test]
    fn directive_swallows_continuation_lines() {
        let source = "#define PLUS(a, b) \\\n    ((a) + (b))\nint x;";
        let tokens = tokenize(source);
        assert_eq!(tokens[0].kind, TokenKind::Directive);
        assert!(tokens[0].text.contains('\n'));
        assert_eq!(tokens[1].text, "int");
        assert_eq!(tokens[1].pos.line, 3);
    }

    #[test]
    fn directive_must_start_its_line() {
        let tokens = tokenize("int a; # not_a_directive");
        assert!(tokens.iter().all(|t| t.kind != TokenKind::Directive));
        let tokens = tokenize("  #include <vector>");
        assert_eq!(tokens[0].kind, TokenKind::Directive);
    }

    #[test]
    fn raw_string_with_delimiter() {
        let tokens = tokenize(r####"auto s = R"xy(a )" b)xy";"####);
        assert_eq!(tokens[3].kind, TokenKind::Literal(LiteralKind::Str));
        assert_eq!(tokens[3].text, r####"R"xy(a )" b)xy""####);
        assert!(tokens[4].is_punct(";"));
    }

    #[test]
    fn unterminated_string_stops_at_newline() {
        let tokens = tokenize("auto s = \"abc\nint y;");
        assert_eq!(tokens[3].kind, TokenKind::Literal(LiteralKind::Str));
        assert_eq!(tokens[3].text, "\"abc");
        assert_eq!(tokens[4].text, "int");
        assert_eq!(tokens[4].pos.line, 2);
    }

    #[test]
    fn unterminated_block_comment_runs_to_eof() {
        let tokens = tokenize("int x; /* never closed\nstill comment");
        assert_eq!(tokens[3].kind, TokenKind::Comment(CommentKind::Block));
        assert_eq!(tokens[4].kind, TokenKind::Eof);
    }

    #[test]
    fn unknown_bytes_do_not_stop_the_lexer() {
        let tokens = tokenize("int @ x; $ \u{1}");
        let unknown = tokens
            .iter()
            .filter(|t| t.kind == TokenKind::Unknown)
            .count();
        assert_eq!(unknown, 3);
        assert_eq!(tokens.last().map(|t| t.kind), Some(TokenKind::Eof));
    }

    #[test]
    fn leading_whitespace_counts() {
        let tokens = tokenize("\tint  x;\n y;");
        assert_eq!(tokens[0].leading.tabs, 1);
        assert_eq!(tokens[1].leading.spaces, 2);
        let y = &tokens[3];
        assert_eq!(y.text, "y");
        assert_eq!(y.leading.newlines, 1);
        assert_eq!(y.leading.spaces, 1);
    }

    #[test]
    fn indented_first_token_starts_its_line() {
        let tokens = tokenize("  int x;");
        assert!(tokens[0].starts_line());
        assert!(!tokens[1].starts_line());
    }

    #[test]
    fn longest_punct_match_wins() {
        assert_eq!(
            texts("x <<= 2; a->b; p->*q; f(v, ...); a<=>b"),
            vec![
                "x", "<<=", "2", ";", "a", "->", "b", ";", "p", "->*", "q", ";", "f", "(", "v",
                ",", "...", ")", ";", "a", "<=>", "b",
            ]
        );
    }

    #[test]
    fn line_and_column_tracking() {
        let tokens = tokenize("ab\n cd");
        assert_eq!((tokens[0].pos.line, tokens[0].pos.column), (1, 1));
        assert_eq!((tokens[1].pos.line, tokens[1].pos.column), (2, 2));
    }

    #[test]
    fn contextual_keywords_stay_identifiers() {
        assert_eq!(
            kinds("final override namespace"),
            vec![
                TokenKind::Identifier,
                TokenKind::Identifier,
                TokenKind::Keyword,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn encoding_prefixed_literals() {
        let tokens = tokenize("u8\"x\" L'a'");
        assert_eq!(tokens[0].kind, TokenKind::Literal(LiteralKind::Str));
        assert_eq!(tokens[0].text, "u8\"x\"");
        assert_eq!(tokens[1].kind, TokenKind::Literal(LiteralKind::Char));
        assert_eq!(tokens[1].text, "L'a'");
    }

    #[test]
    fn number_forms_lex_as_single_tokens() {
        assert_eq!(
            texts("0xFF 1'000 3.14f 1e-9 0b1010"),
            vec!["0xFF", "1'000", "3.14f", "1e-9", "0b1010"]
        );
    }

    #[test]
    fn escaped_quote_stays_inside_string() {
        let tokens = tokenize(r#"auto s = "a\"b";"#);
        assert_eq!(tokens[3].text, r#""a\"b""#);
        assert!(tokens[4].is_punct(";"));
    }
}
