//! Token types produced by the C++ lexer.

/// A position in source text: 1-based line and column, byte offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct SourcePos {
    /// 1-based line number.
    pub line: usize,
    /// 1-based column number, counted in characters.
    pub column: usize,
    /// Byte offset from the start of the file.
    pub offset: usize,
}

impl SourcePos {
    /// Creates a position.
    pub fn new(line: usize, column: usize, offset: usize) -> Self {
        Self {
            line,
            column,
            offset,
        }
    }
}

/// Whitespace immediately preceding a token, summarized by kind.
///
/// Layout rules need to know how a token was indented without re-reading
/// the source, so the lexer keeps counts instead of the raw text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Whitespace {
    /// Number of space characters since the previous token.
    pub spaces: usize,
    /// Number of tab characters since the previous token.
    pub tabs: usize,
    /// Number of line breaks since the previous token.
    pub newlines: usize,
}

/// Flavor of a comment token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommentKind {
    /// `// ...`
    Line,
    /// `/* ... */`
    Block,
    /// `/// ...` or `//! ...`
    DocLine,
    /// `/** ... */` or `/*! ... */`
    DocBlock,
}

impl CommentKind {
    /// Whether this comment is a documentation comment.
    pub fn is_doc(self) -> bool {
        matches!(self, Self::DocLine | Self::DocBlock)
    }
}

/// Flavor of a literal token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LiteralKind {
    /// Integer or floating-point literal, including suffixes.
    Number,
    /// String literal, including raw and encoding-prefixed forms.
    Str,
    /// Character literal.
    Char,
}

/// Token classification for C++ source.
///
/// The lexer never fails: bytes it cannot classify come out as `Unknown`
/// tokens and lexing continues at the next character.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// Identifier, including contextual keywords like `final` and `override`.
    Identifier,
    /// Reserved C++ keyword.
    Keyword,
    /// Operator or punctuation, longest-match (`::`, `->`, `<<=`, ...).
    Punct,
    /// Literal (number, string, character).
    Literal(LiteralKind),
    /// Comment, preserved as a token so layout and doc rules can see it.
    Comment(CommentKind),
    /// Preprocessor directive, one opaque token per logical line.
    Directive,
    /// A character that fits no other class.
    Unknown,
    /// End of input. Emitted exactly once, as the final token.
    Eof,
}

impl TokenKind {
    /// Whether this token participates in declaration structure.
    ///
    /// Comments and preprocessor directives are preserved in the stream but
    /// skipped by the model builder.
    pub fn is_significant(self) -> bool {
        !matches!(self, Self::Comment(_) | Self::Directive | Self::Eof)
    }
}

/// A token produced by [`crate::lexer::Lexer`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    /// Classification.
    pub kind: TokenKind,
    /// Raw text, exactly as it appears in the source. Empty for `Eof`.
    pub text: String,
    /// Position of the first character.
    pub pos: SourcePos,
    /// Whitespace between the previous token and this one.
    pub leading: Whitespace,
}

impl Token {
    /// Whether this token is the given punctuation.
    pub fn is_punct(&self, text: &str) -> bool {
        self.kind == TokenKind::Punct && self.text == text
    }

    /// Whether this token is the given keyword.
    pub fn is_keyword(&self, text: &str) -> bool {
        self.kind == TokenKind::Keyword && self.text == text
    }

    /// Whether this token is an identifier.
    pub fn is_identifier(&self) -> bool {
        self.kind == TokenKind::Identifier
    }

    /// Whether this token is a comment.
    pub fn is_comment(&self) -> bool {
        matches!(self.kind, TokenKind::Comment(_))
    }

    /// Whether this token is the first token on its line.
    pub fn starts_line(&self) -> bool {
        // Spaces and tabs are one byte each, so a first-of-file token sits
        // exactly after its own leading whitespace.
        self.leading.newlines > 0 || self.pos.offset == self.leading.spaces + self.leading.tabs
    }

    /// Line on which this token ends. Differs from `pos.line` only for
    /// block comments, raw strings, and continued directives.
    pub fn end_line(&self) -> usize {
        self.pos.line + self.text.matches('\n').count()
    }
}

/// Reserved words of C++20. Contextual keywords (`final`, `override`,
/// `import`, `module`) are deliberately absent and lex as identifiers.
pub const KEYWORDS: &[&str] = &[
    "alignas",
    "alignof",
    "and",
    "and_eq",
    "asm",
    "auto",
    "bitand",
    "bitor",
    "bool",
    "break",
    "case",
    "catch",
    "char",
    "char16_t",
    "char32_t",
    "char8_t",
    "class",
    "co_await",
    "co_return",
    "co_yield",
    "compl",
    "concept",
    "const",
    "const_cast",
    "consteval",
    "constexpr",
    "constinit",
    "continue",
    "decltype",
    "default",
    "delete",
    "do",
    "double",
    "dynamic_cast",
    "else",
    "enum",
    "explicit",
    "export",
    "extern",
    "false",
    "float",
    "for",
    "friend",
    "goto",
    "if",
    "inline",
    "int",
    "long",
    "mutable",
    "namespace",
    "new",
    "noexcept",
    "not",
    "not_eq",
    "nullptr",
    "operator",
    "or",
    "or_eq",
    "private",
    "protected",
    "public",
    "register",
    "reinterpret_cast",
    "requires",
    "return",
    "short",
    "signed",
    "sizeof",
    "static",
    "static_assert",
    "static_cast",
    "struct",
    "switch",
    "template",
    "this",
    "thread_local",
    "throw",
    "true",
    "try",
    "typedef",
    "typeid",
    "typename",
    "union",
    "unsigned",
    "using",
    "virtual",
    "void",
    "volatile",
    "wchar_t",
    "while",
    "xor",
    "xor_eq",
];

/// Whether `word` is a reserved C++ keyword.
pub fn is_reserved(word: &str) -> bool {
    KEYWORDS.binary_search(&word).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keywords_are_sorted_for_binary_search() {
        let mut sorted = KEYWORDS.to_vec();
        sorted.sort_unstable();
        assert_eq!(KEYWORDS, sorted.as_slice());
    }

    #[test]
    fn reserved_lookup() {
        assert!(is_reserved("namespace"));
        assert!(is_reserved("noexcept"));
        assert!(!is_reserved("final"));
        assert!(!is_reserved("override"));
        assert!(!is_reserved("vector"));
    }

    #[test]
    fn token_predicates() {
        let tok = Token {
            kind: TokenKind::Punct,
            text: "::".to_string(),
            pos: SourcePos::new(1, 1, 0),
            leading: Whitespace::default(),
        };
        assert!(tok.is_punct("::"));
        assert!(!tok.is_punct(":"));
        assert!(!tok.is_identifier());
        assert!(tok.starts_line());
    }

    #[test]
    fn end_line_spans_embedded_newlines() {
        let tok = Token {
            kind: TokenKind::Comment(CommentKind::Block),
            text: "/* a\nb\nc */".to_string(),
            pos: SourcePos::new(3, 1, 10),
            leading: Whitespace::default(),
        };
        assert_eq!(tok.end_line(), 5);
    }
}
