//! Builds the declaration tree from a token stream.
//!
//! This is a structural scanner, not a C++ frontend. It recognizes the
//! declaration shapes style rules care about and degrades everything else
//! to opaque nodes. Heuristics are deliberately conservative: when a
//! construct is ambiguous the builder prefers to model nothing over
//! modeling something wrong.

use crate::docs::{DocBlock, DocIndex};
use crate::lexer::tokenize;
use crate::model::{
    DeclDetail, DeclId, Declaration, DeclarationTree, ExceptionSpec, FunctionInfo, Param,
    Qualifiers, RecordKeyword, TemplateParamKind, TokenRange, TranslationUnit, VariableInfo,
    Visibility,
};
use crate::token::{CommentKind, LiteralKind, SourcePos, Token, TokenKind};
use tracing::debug;

/// Declaration specifiers folded into [`Qualifiers`].
const SPECIFIERS: &[&str] = &[
    "const",
    "consteval",
    "constexpr",
    "constinit",
    "explicit",
    "extern",
    "friend",
    "inline",
    "mutable",
    "register",
    "static",
    "thread_local",
    "virtual",
    "volatile",
];

/// Keywords that can begin a type in a declaration.
const TYPE_STARTERS: &[&str] = &[
    "auto", "bool", "char", "char16_t", "char32_t", "char8_t", "double", "float", "int", "long",
    "short", "signed", "unsigned", "void", "wchar_t",
];

/// Keywords that begin a statement which is definitely not a local
/// variable declaration.
const NON_DECL_STARTERS: &[&str] = &[
    "break",
    "case",
    "catch",
    "class",
    "co_await",
    "co_return",
    "co_yield",
    "continue",
    "default",
    "delete",
    "do",
    "else",
    "enum",
    "for",
    "goto",
    "if",
    "namespace",
    "new",
    "operator",
    "private",
    "protected",
    "public",
    "requires",
    "return",
    "sizeof",
    "static_assert",
    "struct",
    "switch",
    "template",
    "this",
    "throw",
    "try",
    "typedef",
    "union",
    "using",
    "while",
];

/// Lexes and models `source` into a [`TranslationUnit`].
pub(crate) fn build(source: &str) -> TranslationUnit {
    let tokens = tokenize(source);
    let (tree, docs) = Builder::new(&tokens).run();
    TranslationUnit { tokens, tree, docs }
}

/// Bracket-depth tracker with a heuristic for template angle brackets:
/// `<` opens a depth only after an identifier, a `>`, or a type keyword,
/// which keeps comparison operators out of the count in practice.
#[derive(Default, Clone, Copy)]
struct Depths {
    paren: usize,
    bracket: usize,
    brace: usize,
    angle: usize,
}

impl Depths {
    fn at_top(self) -> bool {
        self.paren == 0 && self.bracket == 0 && self.brace == 0 && self.angle == 0
    }

    fn step(&mut self, prev: Option<&Token>, tok: &Token) {
        if tok.kind != TokenKind::Punct {
            return;
        }
        match tok.text.as_str() {
            "(" => self.paren += 1,
            ")" => self.paren = self.paren.saturating_sub(1),
            "[" => self.bracket += 1,
            "]" => self.bracket = self.bracket.saturating_sub(1),
            "{" => self.brace += 1,
            "}" => self.brace = self.brace.saturating_sub(1),
            "<" if angle_opener(prev) => self.angle += 1,
            ">" => self.angle = self.angle.saturating_sub(1),
            ">>" if self.angle > 0 => self.angle = self.angle.saturating_sub(2),
            _ => {}
        }
    }
}

fn angle_opener(prev: Option<&Token>) -> bool {
    prev.is_some_and(|p| {
        p.is_identifier()
            || p.is_punct(">")
            || p.is_keyword("typename")
            || (p.kind == TokenKind::Keyword && TYPE_STARTERS.contains(&p.text.as_str()))
    })
}

/// How a parameter-list paren was introduced.
enum Callee {
    /// Ordinary function: relative index of the name identifier.
    Named(usize),
    /// Operator function: relative index of the `operator` keyword.
    Operator { kw: usize },
}

/// Shared context for classifying one statement.
struct StmtInfo<'s> {
    sig: &'s [usize],
    spec_end: usize,
    range: TokenRange,
    vis: Visibility,
    class_name: Option<&'s str>,
    quals: Qualifiers,
}

struct Builder<'t> {
    tokens: &'t [Token],
    pos: usize,
    next_id: usize,
    namespaces: Vec<String>,
    docs: DocIndex,
}

impl<'t> Builder<'t> {
    fn new(tokens: &'t [Token]) -> Self {
        Self {
            tokens,
            pos: 0,
            next_id: 0,
            namespaces: Vec::new(),
            docs: DocIndex::new(),
        }
    }

    fn run(mut self) -> (DeclarationTree, DocIndex) {
        let decls = self.parse_items(false, Visibility::Public, None);
        (DeclarationTree { decls }, self.docs)
    }

    // ------------------------------------------------------------------
    // Cursor primitives
    // ------------------------------------------------------------------

    fn tok(&self, idx: usize) -> &'t Token {
        &self.tokens[idx.min(self.tokens.len() - 1)]
    }

    fn peek(&self) -> &'t Token {
        self.tok(self.pos)
    }

    fn at_eof(&self) -> bool {
        self.peek().kind == TokenKind::Eof
    }

    fn bump(&mut self) {
        if self.pos + 1 < self.tokens.len() {
            self.pos += 1;
        } else {
            self.pos = self.tokens.len() - 1;
        }
    }

    fn goto(&mut self, idx: usize) {
        self.pos = idx.min(self.tokens.len() - 1);
    }

    fn skip_trivia(&mut self) {
        while matches!(
            self.peek().kind,
            TokenKind::Comment(_) | TokenKind::Directive
        ) && self.pos + 1 < self.tokens.len()
        {
            self.pos += 1;
        }
    }

    /// Index of the first significant token at or after `from`.
    fn next_significant(&self, from: usize) -> usize {
        let mut i = from.min(self.tokens.len() - 1);
        while i < self.tokens.len() - 1 && !self.tokens[i].kind.is_significant() {
            i += 1;
        }
        i
    }

    fn alloc_id(&mut self) -> DeclId {
        let id = DeclId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Significant token indices inside `range`.
    fn sig_indices(&self, range: TokenRange) -> Vec<usize> {
        (range.start..range.end.min(self.tokens.len()))
            .filter(|&i| self.tokens[i].kind.is_significant())
            .collect()
    }

    /// Index of the `}` matching the `{` at `open`, or the last token
    /// index when unbalanced.
    fn matching_brace(&self, open: usize) -> usize {
        let mut depth = 0usize;
        for i in open..self.tokens.len() {
            if self.tokens[i].is_punct("{") {
                depth += 1;
            } else if self.tokens[i].is_punct("}") {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    return i;
                }
            }
        }
        self.tokens.len() - 1
    }

    /// Index of the `)` matching the `(` at `open`.
    fn matching_paren(&self, open: usize) -> usize {
        let mut depth = 0usize;
        for i in open..self.tokens.len() {
            if self.tokens[i].is_punct("(") {
                depth += 1;
            } else if self.tokens[i].is_punct(")") {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    return i;
                }
            }
        }
        self.tokens.len() - 1
    }

    /// Index of the `>` closing the `<` at `open`, honoring `>>`.
    fn angle_close(&self, open: usize) -> usize {
        let mut depth = 0i64;
        let mut parens = 0usize;
        for i in open..self.tokens.len() {
            let t = &self.tokens[i];
            if t.is_punct("(") {
                parens += 1;
            } else if t.is_punct(")") {
                parens = parens.saturating_sub(1);
            }
            if parens > 0 {
                continue;
            }
            if t.is_punct("<") {
                depth += 1;
            } else if t.is_punct(">") {
                depth -= 1;
            } else if t.is_punct(">>") {
                depth -= 2;
            }
            if depth <= 0 && i > open {
                return i;
            }
        }
        self.tokens.len() - 1
    }

    /// Consumes tokens through the next `;` at top depth. Stops before a
    /// stray `}` so the enclosing body parse still sees it.
    fn consume_to_semicolon(&mut self) {
        let mut depths = Depths::default();
        let mut prev: Option<&Token> = None;
        while !self.at_eof() {
            let t = self.peek();
            if t.kind.is_significant() {
                if depths.at_top() && t.is_punct(";") {
                    self.bump();
                    return;
                }
                if depths.at_top() && t.is_punct("}") {
                    return;
                }
                depths.step(prev, t);
                prev = Some(t);
            }
            self.bump();
        }
    }

    // ------------------------------------------------------------------
    // Item loop
    // ------------------------------------------------------------------

    /// Parses declarations until end of input or, inside a body, the
    /// closing brace. `class_name` is set when parsing a record body.
    fn parse_items(
        &mut self,
        stop_at_rbrace: bool,
        default_vis: Visibility,
        class_name: Option<&str>,
    ) -> Vec<Declaration> {
        let mut out = Vec::new();
        let mut vis = default_vis;
        loop {
            self.skip_trivia();
            if self.at_eof() {
                break;
            }
            let t = self.peek();
            if t.is_punct("}") {
                if stop_at_rbrace {
                    self.bump();
                    break;
                }
                // Stray closing brace at file scope.
                let range = TokenRange::new(self.pos, self.pos + 1);
                out.push(self.opaque(range, vis));
                self.bump();
                continue;
            }
            if t.is_punct(";") {
                self.bump();
                continue;
            }
            if class_name.is_some() && self.at_access_specifier() {
                vis = match self.peek().text.as_str() {
                    "private" => Visibility::Private,
                    "protected" => Visibility::Protected,
                    _ => Visibility::Public,
                };
                self.bump();
                self.skip_trivia();
                self.bump();
                continue;
            }
            let before = self.pos;
            let items = self.parse_item(vis, class_name);
            out.extend(items);
            if self.pos == before {
                self.bump();
            }
        }
        out
    }

    fn at_access_specifier(&self) -> bool {
        let t = self.peek();
        if !(t.is_keyword("public") || t.is_keyword("private") || t.is_keyword("protected")) {
            return false;
        }
        self.tokens[self.next_significant(self.pos + 1)].is_punct(":")
    }

    fn parse_item(&mut self, vis: Visibility, class_name: Option<&str>) -> Vec<Declaration> {
        let t = self.peek();
        if t.is_keyword("template") {
            return self.parse_template(vis, class_name);
        }
        if t.is_keyword("namespace")
            || (t.is_keyword("inline")
                && self.tokens[self.next_significant(self.pos + 1)].is_keyword("namespace"))
        {
            return self.parse_namespace(vis);
        }
        if t.is_keyword("using") {
            return self.parse_using(vis);
        }
        if t.is_keyword("typedef") {
            return self.parse_typedef(vis);
        }
        if t.is_keyword("enum") {
            if let Some(decls) = self.try_parse_enum(vis) {
                return decls;
            }
        }
        if t.is_keyword("class") || t.is_keyword("struct") || t.is_keyword("union") {
            if let Some(decls) = self.try_parse_record(vis, class_name) {
                return decls;
            }
        }
        if t.is_keyword("extern") {
            if let Some(decls) = self.try_parse_linkage_block(vis) {
                return decls;
            }
        }
        if t.is_keyword("static_assert") || t.is_keyword("asm") {
            self.consume_to_semicolon();
            return Vec::new();
        }
        if t.is_punct("{") {
            // A bare block at item scope is not a declaration.
            let start = self.pos;
            let close = self.matching_brace(self.pos);
            self.goto(close + 1);
            return vec![self.opaque(TokenRange::new(start, close + 1), vis)];
        }
        self.parse_statement(vis, class_name)
    }

    // ------------------------------------------------------------------
    // Templates
    // ------------------------------------------------------------------

    fn parse_template(&mut self, vis: Visibility, class_name: Option<&str>) -> Vec<Declaration> {
        let start = self.pos;
        self.bump();
        self.skip_trivia();
        if !self.peek().is_punct("<") {
            return self.parse_statement(vis, class_name);
        }
        let open = self.pos;
        let close = self.angle_close(open);
        let params = self.parse_template_params(open + 1, close, vis);
        self.goto(close + 1);
        self.skip_trivia();
        self.skip_requires_clause();
        self.skip_trivia();

        let mut inner = self.parse_item(vis, class_name);
        let Some(first) = inner.first_mut() else {
            return vec![self.opaque(TokenRange::new(start, self.pos.max(start + 1)), vis)];
        };
        for param in params.into_iter().rev() {
            first.children.insert(0, param);
        }
        first.span.start = start;
        let id = first.id;
        self.attach_doc(id, start);
        inner
    }

    fn parse_template_params(&mut self, lo: usize, hi: usize, vis: Visibility) -> Vec<Declaration> {
        let sig = self.sig_indices(TokenRange::new(lo, hi));
        let mut out = Vec::new();
        for segment in self.split_commas(&sig) {
            let Some(&first) = segment.first() else {
                continue;
            };
            let first_tok = self.tok(first);
            let cut = self.top_level_punct(&segment, "=").unwrap_or(segment.len());
            let trimmed = &segment[..cut];
            let (kind, name_idx) = if first_tok.is_keyword("typename")
                || first_tok.is_keyword("class")
            {
                let name = trimmed
                    .iter()
                    .skip(1)
                    .find(|&&i| self.tokens[i].is_identifier())
                    .copied();
                (TemplateParamKind::Type, name)
            } else if first_tok.is_keyword("template") {
                let name = trimmed
                    .iter()
                    .rev()
                    .find(|&&i| self.tokens[i].is_identifier())
                    .copied();
                (TemplateParamKind::Template, name)
            } else {
                let name = trimmed
                    .iter()
                    .rev()
                    .find(|&&i| self.tokens[i].is_identifier())
                    .copied();
                (TemplateParamKind::NonType, name)
            };
            let Some(name_idx) = name_idx else {
                continue;
            };
            let id = self.alloc_id();
            out.push(Declaration {
                id,
                name: self.tokens[name_idx].text.clone(),
                namespace_path: self.namespaces.clone(),
                qualifiers: Qualifiers::default(),
                visibility: vis,
                pos: self.tokens[name_idx].pos,
                span: TokenRange::new(segment[0], segment.last().copied().unwrap_or(segment[0]) + 1),
                detail: DeclDetail::TemplateParameter { kind },
                children: Vec::new(),
            });
        }
        out
    }

    /// Skips a `requires` clause after a template header. Covers the
    /// common `requires Concept<T>` and `requires (expr)` shapes joined
    /// by `&&` or `||`.
    fn skip_requires_clause(&mut self) {
        if !self.peek().is_keyword("requires") {
            return;
        }
        self.bump();
        loop {
            self.skip_trivia();
            let t = self.peek();
            if t.is_punct("(") {
                let close = self.matching_paren(self.pos);
                self.goto(close + 1);
            } else if t.is_identifier() {
                self.bump();
                loop {
                    self.skip_trivia();
                    if self.peek().is_punct("::") {
                        self.bump();
                        self.skip_trivia();
                        self.bump();
                    } else if self.peek().is_punct("<") {
                        let close = self.angle_close(self.pos);
                        self.goto(close + 1);
                    } else {
                        break;
                    }
                }
            } else {
                return;
            }
            self.skip_trivia();
            if self.peek().is_punct("&&") || self.peek().is_punct("||") {
                self.bump();
            } else {
                return;
            }
        }
    }

    // ------------------------------------------------------------------
    // Namespaces
    // ------------------------------------------------------------------

    fn parse_namespace(&mut self, vis: Visibility) -> Vec<Declaration> {
        let start = self.pos;
        let mut is_inline = false;
        if self.peek().is_keyword("inline") {
            is_inline = true;
            self.bump();
            self.skip_trivia();
        }
        let keyword_pos = self.peek().pos;
        self.bump();
        self.skip_trivia();

        // Anonymous namespace.
        if self.peek().is_punct("{") {
            let id = self.alloc_id();
            self.bump();
            self.namespaces.push(String::new());
            let children = self.parse_items(true, Visibility::Public, None);
            self.namespaces.pop();
            let decl = Declaration {
                id,
                name: String::new(),
                namespace_path: self.namespaces.clone(),
                qualifiers: Qualifiers::default(),
                visibility: vis,
                pos: keyword_pos,
                span: TokenRange::new(start, self.pos),
                detail: DeclDetail::Namespace {
                    anonymous: true,
                    is_inline,
                    is_alias: false,
                },
                children,
            };
            self.attach_doc(decl.id, start);
            return vec![decl];
        }

        // Collect `a::b::c` segments.
        let mut segments: Vec<(String, SourcePos)> = Vec::new();
        while self.peek().is_identifier() {
            segments.push((self.peek().text.clone(), self.peek().pos));
            self.bump();
            self.skip_trivia();
            if self.peek().is_punct("::") {
                self.bump();
                self.skip_trivia();
            } else {
                break;
            }
        }
        if segments.is_empty() {
            self.consume_to_semicolon();
            return vec![self.opaque(TokenRange::new(start, self.pos.max(start + 1)), vis)];
        }

        // Namespace alias: `namespace io = boost::asio;`
        if self.peek().is_punct("=") {
            self.consume_to_semicolon();
            let (name, pos) = segments.swap_remove(0);
            let id = self.alloc_id();
            let decl = Declaration {
                id,
                name,
                namespace_path: self.namespaces.clone(),
                qualifiers: Qualifiers::default(),
                visibility: vis,
                pos,
                span: TokenRange::new(start, self.pos),
                detail: DeclDetail::Namespace {
                    anonymous: false,
                    is_inline: false,
                    is_alias: true,
                },
                children: Vec::new(),
            };
            self.attach_doc(decl.id, start);
            return vec![decl];
        }

        if !self.peek().is_punct("{") {
            self.consume_to_semicolon();
            return vec![self.opaque(TokenRange::new(start, self.pos.max(start + 1)), vis)];
        }
        self.bump();

        // Ids are allocated outermost-first so they stay in source order.
        let ids: Vec<DeclId> = segments.iter().map(|_| self.alloc_id()).collect();
        let names: Vec<String> = segments.iter().map(|(n, _)| n.clone()).collect();
        let base_path = self.namespaces.clone();
        for name in &names {
            self.namespaces.push(name.clone());
        }
        let mut children = self.parse_items(true, Visibility::Public, None);
        for _ in &names {
            self.namespaces.pop();
        }
        let span = TokenRange::new(start, self.pos);

        // Wrap inner namespaces into the outermost declaration.
        let mut node: Option<Declaration> = None;
        for depth in (0..segments.len()).rev() {
            let (name, pos) = segments[depth].clone();
            let mut path = base_path.clone();
            path.extend_from_slice(&names[..depth]);
            let kids = match node.take() {
                Some(inner) => vec![inner],
                None => std::mem::take(&mut children),
            };
            node = Some(Declaration {
                id: ids[depth],
                name,
                namespace_path: path,
                qualifiers: Qualifiers::default(),
                visibility: vis,
                pos,
                span,
                detail: DeclDetail::Namespace {
                    anonymous: false,
                    is_inline: is_inline && depth == 0,
                    is_alias: false,
                },
                children: kids,
            });
        }
        let Some(decl) = node else {
            return Vec::new();
        };
        self.attach_doc(decl.id, start);
        vec![decl]
    }

    // ------------------------------------------------------------------
    // Using declarations and typedefs
    // ------------------------------------------------------------------

    fn parse_using(&mut self, vis: Visibility) -> Vec<Declaration> {
        let start = self.pos;
        self.bump();
        self.skip_trivia();
        if self.peek().is_keyword("namespace") || self.peek().is_keyword("enum") {
            self.consume_to_semicolon();
            return Vec::new();
        }
        if self.peek().is_identifier() {
            let name_idx = self.pos;
            let after = self.next_significant(self.pos + 1);
            if self.tokens[after].is_punct("=") {
                self.consume_to_semicolon();
                let id = self.alloc_id();
                let decl = Declaration {
                    id,
                    name: self.tokens[name_idx].text.clone(),
                    namespace_path: self.namespaces.clone(),
                    qualifiers: Qualifiers::default(),
                    visibility: vis,
                    pos: self.tokens[name_idx].pos,
                    span: TokenRange::new(start, self.pos),
                    detail: DeclDetail::TypeAlias,
                    children: Vec::new(),
                };
                self.attach_doc(decl.id, start);
                return vec![decl];
            }
        }
        // Using-declaration (`using base::member;`): introduces no new name.
        self.consume_to_semicolon();
        Vec::new()
    }

    fn parse_typedef(&mut self, vis: Visibility) -> Vec<Declaration> {
        let start = self.pos;
        self.consume_to_semicolon();
        let range = TokenRange::new(start, self.pos);
        let sig = self.sig_indices(range);
        let name_idx = if sig.len() > 1 {
            self.declarator_name(&sig[1..])
        } else {
            None
        };
        let Some(name_idx) = name_idx else {
            return vec![self.opaque(range, vis)];
        };
        let id = self.alloc_id();
        let decl = Declaration {
            id,
            name: self.tokens[name_idx].text.clone(),
            namespace_path: self.namespaces.clone(),
            qualifiers: Qualifiers::default(),
            visibility: vis,
            pos: self.tokens[name_idx].pos,
            span: range,
            detail: DeclDetail::TypeAlias,
            children: Vec::new(),
        };
        self.attach_doc(decl.id, start);
        vec![decl]
    }

    // ------------------------------------------------------------------
    // Records and enums
    // ------------------------------------------------------------------

    /// Parses `class`/`struct`/`union` when it introduces a definition or
    /// forward declaration. Returns `None` for elaborated type specifiers
    /// (`struct tm value;`), which fall through to the statement parser.
    fn try_parse_record(
        &mut self,
        vis: Visibility,
        class_name: Option<&str>,
    ) -> Option<Vec<Declaration>> {
        let start = self.pos;
        let keyword = match self.peek().text.as_str() {
            "class" => RecordKeyword::Class,
            "struct" => RecordKeyword::Struct,
            _ => RecordKeyword::Union,
        };
        let mut k = self.next_significant(self.pos + 1);
        k = self.skip_attributes(k);
        let mut name_idx: Option<usize> = None;
        while self.tokens[k].is_identifier() {
            name_idx = Some(k);
            k = self.next_significant(k + 1);
            if self.tokens[k].is_punct("::") {
                k = self.next_significant(k + 1);
            } else if self.tokens[k].is_punct("<") {
                k = self.next_significant(self.angle_close(k) + 1);
                break;
            } else {
                break;
            }
        }
        if self.tokens[k].is_identifier() && self.tokens[k].text == "final" {
            k = self.next_significant(k + 1);
        }

        let body_open = if self.tokens[k].is_punct("{") {
            Some(k)
        } else if self.tokens[k].is_punct(":") {
            Some(self.find_body_open(k)?)
        } else if self.tokens[k].is_punct(";") {
            None
        } else {
            return None;
        };

        let name = name_idx.map_or_else(String::new, |i| self.tokens[i].text.clone());
        let pos = name_idx.map_or(self.peek().pos, |i| self.tokens[i].pos);
        let defined = body_open.is_some();
        let id = self.alloc_id();

        let (children, trailing) = if let Some(open) = body_open {
            self.goto(open);
            self.bump();
            let default_vis = if keyword == RecordKeyword::Class {
                Visibility::Private
            } else {
                Visibility::Public
            };
            let children = self.parse_items(true, default_vis, Some(name.as_str()));
            let trailing = self.finish_record_statement(vis, class_name);
            (children, trailing)
        } else {
            self.goto(k + 1);
            (Vec::new(), Vec::new())
        };

        let decl = Declaration {
            id,
            name,
            namespace_path: self.namespaces.clone(),
            qualifiers: Qualifiers::default(),
            visibility: vis,
            pos,
            span: TokenRange::new(start, self.pos),
            detail: DeclDetail::Record { keyword, defined },
            children,
        };
        self.attach_doc(decl.id, start);
        let mut out = vec![decl];
        out.extend(trailing);
        Some(out)
    }

    /// After a record body, consumes `} name, *other;` style trailing
    /// declarators up to the semicolon, modeling each as a variable.
    fn finish_record_statement(
        &mut self,
        vis: Visibility,
        class_name: Option<&str>,
    ) -> Vec<Declaration> {
        let tail_start = self.pos;
        self.consume_to_semicolon();
        let sig = self.sig_indices(TokenRange::new(tail_start, self.pos));
        let mut out = Vec::new();
        for segment in self.split_commas(&sig) {
            if let Some(name_idx) = self.declarator_name(&segment) {
                let id = self.alloc_id();
                out.push(Declaration {
                    id,
                    name: self.tokens[name_idx].text.clone(),
                    namespace_path: self.namespaces.clone(),
                    qualifiers: Qualifiers::default(),
                    visibility: vis,
                    pos: self.tokens[name_idx].pos,
                    span: TokenRange::new(tail_start, self.pos),
                    detail: DeclDetail::Variable(VariableInfo {
                        is_member: class_name.is_some(),
                        mutation_scope: None,
                    }),
                    children: Vec::new(),
                });
            }
        }
        out
    }

    /// Parses an enum definition. Returns `None` for elaborated uses.
    fn try_parse_enum(&mut self, vis: Visibility) -> Option<Vec<Declaration>> {
        let start = self.pos;
        let mut k = self.next_significant(self.pos + 1);
        if self.tokens[k].is_keyword("class") || self.tokens[k].is_keyword("struct") {
            k = self.next_significant(k + 1);
        }
        k = self.skip_attributes(k);
        let mut name_idx = None;
        if self.tokens[k].is_identifier() {
            name_idx = Some(k);
            k = self.next_significant(k + 1);
        }
        let body_open = if self.tokens[k].is_punct("{") {
            Some(k)
        } else if self.tokens[k].is_punct(":") {
            Some(self.find_body_open(k)?)
        } else if self.tokens[k].is_punct(";") {
            None
        } else {
            return None;
        };

        let name = name_idx.map_or_else(String::new, |i| self.tokens[i].text.clone());
        let pos = name_idx.map_or(self.peek().pos, |i| self.tokens[i].pos);
        let defined = body_open.is_some();
        let id = self.alloc_id();

        let mut children = Vec::new();
        if let Some(open) = body_open {
            let close = self.matching_brace(open);
            let sig = self.sig_indices(TokenRange::new(open + 1, close));
            for segment in self.split_commas(&sig) {
                let from = self.skip_leading_decorations(&segment, 0);
                let enumerator = segment[from.min(segment.len())..]
                    .iter()
                    .find(|&&i| self.tokens[i].is_identifier())
                    .copied();
                if let Some(e) = enumerator {
                    let id = self.alloc_id();
                    children.push(Declaration {
                        id,
                        name: self.tokens[e].text.clone(),
                        namespace_path: self.namespaces.clone(),
                        qualifiers: Qualifiers {
                            is_const: true,
                            ..Qualifiers::default()
                        },
                        visibility: vis,
                        pos: self.tokens[e].pos,
                        span: TokenRange::new(
                            segment[0],
                            segment.last().copied().unwrap_or(segment[0]) + 1,
                        ),
                        detail: DeclDetail::Variable(VariableInfo {
                            is_member: false,
                            mutation_scope: None,
                        }),
                        children: Vec::new(),
                    });
                }
            }
            self.goto(close + 1);
            self.consume_to_semicolon();
        } else {
            self.goto(k + 1);
        }

        let decl = Declaration {
            id,
            name,
            namespace_path: self.namespaces.clone(),
            qualifiers: Qualifiers::default(),
            visibility: vis,
            pos,
            span: TokenRange::new(start, self.pos),
            detail: DeclDetail::Record {
                keyword: RecordKeyword::Enum,
                defined,
            },
            children,
        };
        self.attach_doc(decl.id, start);
        Some(vec![decl])
    }

    /// From a `:` base-clause or underlying-type position, finds the `{`
    /// opening the body. `None` means the statement ends without a body.
    fn find_body_open(&self, from: usize) -> Option<usize> {
        let mut depths = Depths::default();
        let mut prev: Option<&Token> = None;
        let mut i = from;
        while i < self.tokens.len() - 1 {
            let t = &self.tokens[i];
            if t.kind.is_significant() {
                if depths.at_top() && t.is_punct("{") {
                    return Some(i);
                }
                if depths.at_top() && t.is_punct(";") {
                    return None;
                }
                depths.step(prev, t);
                prev = Some(t);
            }
            i += 1;
        }
        None
    }

    /// `extern "C" { ... }` linkage blocks are transparent: members are
    /// parsed in the current scope.
    fn try_parse_linkage_block(&mut self, vis: Visibility) -> Option<Vec<Declaration>> {
        let string_idx = self.next_significant(self.pos + 1);
        if !matches!(
            self.tokens[string_idx].kind,
            TokenKind::Literal(LiteralKind::Str)
        ) {
            return None;
        }
        let brace_idx = self.next_significant(string_idx + 1);
        if !self.tokens[brace_idx].is_punct("{") {
            return None;
        }
        self.goto(brace_idx);
        self.bump();
        Some(self.parse_items(true, vis, None))
    }

    // ------------------------------------------------------------------
    // Generic statements: functions and variables
    // ------------------------------------------------------------------

    fn parse_statement(&mut self, vis: Visibility, class_name: Option<&str>) -> Vec<Declaration> {
        let start = self.pos;
        let body = self.scan_statement();
        let range = TokenRange::new(start, self.pos.max(start + 1));
        let sig = self.sig_indices(range);
        if sig.is_empty() {
            return Vec::new();
        }

        let mut k = self.skip_leading_decorations(&sig, 0);
        let mut quals = Qualifiers::default();
        let mut saw_friend = false;
        while k < sig.len() {
            let t = self.tok(sig[k]);
            if t.kind == TokenKind::Keyword && SPECIFIERS.contains(&t.text.as_str()) {
                match t.text.as_str() {
                    "const" => quals.is_const = true,
                    "constexpr" | "consteval" | "constinit" => quals.is_constexpr = true,
                    "static" => quals.is_static = true,
                    "inline" => quals.is_inline = true,
                    "mutable" => quals.is_mutable = true,
                    "extern" => quals.is_extern = true,
                    "friend" => saw_friend = true,
                    _ => {}
                }
                k += 1;
                k = self.skip_leading_decorations(&sig, k);
            } else {
                break;
            }
        }
        if saw_friend || k >= sig.len() {
            return Vec::new();
        }

        let stmt = StmtInfo {
            sig: &sig,
            spec_end: k,
            range,
            vis,
            class_name,
            quals,
        };
        if let Some((params_open, callee)) = self.find_signature(&sig, k) {
            return vec![self.classify_function(&stmt, params_open, callee, body)];
        }
        self.classify_variables(&stmt)
    }

    /// Advances the cursor to the end of the current statement: past the
    /// `;`, or past a definition body. Returns the body brace pair when a
    /// body was consumed.
    fn scan_statement(&mut self) -> Option<(usize, usize)> {
        let mut parens = 0usize;
        let mut seen_call = false;
        let mut after_colon = false;
        let mut after_arrow = false;
        let mut prev_sig: Option<usize> = None;
        while !self.at_eof() {
            let idx = self.pos;
            let t = self.peek();
            if !t.kind.is_significant() {
                self.bump();
                continue;
            }
            if t.is_punct("(") {
                if parens == 0 {
                    seen_call = true;
                }
                parens += 1;
            } else if t.is_punct(")") {
                parens = parens.saturating_sub(1);
            } else if parens == 0 {
                if t.is_punct(";") {
                    self.bump();
                    return None;
                }
                if t.is_punct("}") {
                    return None;
                }
                if t.is_punct(":") {
                    after_colon = true;
                }
                if t.is_punct("->") {
                    after_arrow = true;
                }
                if t.is_punct("{") {
                    let prev = prev_sig.map(|i| &self.tokens[i]);
                    let is_init = match prev {
                        Some(p) => {
                            p.is_punct("=")
                                || p.is_punct(",")
                                || p.is_punct("[")
                                || p.is_keyword("return")
                                || (p.is_identifier()
                                    && !after_arrow
                                    && (!seen_call || after_colon))
                        }
                        None => false,
                    };
                    let close = self.matching_brace(idx);
                    self.goto(close + 1);
                    if is_init {
                        prev_sig = Some(close);
                        continue;
                    }
                    return Some((idx, close));
                }
            }
            prev_sig = Some(idx);
            self.bump();
        }
        None
    }

    /// Skips `[[...]]` attribute groups and `alignas(...)` at relative
    /// position `k` of `sig`.
    fn skip_leading_decorations(&self, sig: &[usize], mut k: usize) -> usize {
        loop {
            if k + 1 < sig.len()
                && self.tok(sig[k]).is_punct("[")
                && self.tok(sig[k + 1]).is_punct("[")
            {
                let mut depth = 0usize;
                while k < sig.len() {
                    let t = self.tok(sig[k]);
                    if t.is_punct("[") {
                        depth += 1;
                    } else if t.is_punct("]") {
                        depth = depth.saturating_sub(1);
                        if depth == 0 {
                            k += 1;
                            break;
                        }
                    }
                    k += 1;
                }
                continue;
            }
            if k + 1 < sig.len()
                && self.tok(sig[k]).is_keyword("alignas")
                && self.tok(sig[k + 1]).is_punct("(")
            {
                let close = self.close_within(sig, k + 1);
                k = close + 1;
                continue;
            }
            return k;
        }
    }

    /// Finds the parameter-list paren of a function declaration, if the
    /// statement is one. Stops at a top-level `=`, which always means a
    /// variable initializer.
    fn find_signature(&self, sig: &[usize], from: usize) -> Option<(usize, Callee)> {
        let mut depths = Depths::default();
        let mut prev: Option<usize> = None;
        let mut i = from;
        while i < sig.len() {
            let t = self.tok(sig[i]);
            if depths.at_top() {
                if t.is_punct("=") {
                    return None;
                }
                if t.is_keyword("operator") {
                    return self.operator_signature(sig, i);
                }
                if t.is_punct("(") && !self.paren_opens_declarator(sig, i) {
                    if let Some(p) = prev {
                        let pt = self.tok(sig[p]);
                        if pt.is_identifier() && pt.text != "final" && pt.text != "override" {
                            return Some((i, Callee::Named(p)));
                        }
                        if pt.is_punct(">") {
                            if let Some(name) = self.name_before_angles(sig, p) {
                                return Some((i, Callee::Named(name)));
                            }
                        }
                    }
                }
            }
            let prev_tok = prev.map(|p| self.tok(sig[p]));
            depths.step(prev_tok, t);
            prev = Some(i);
            i += 1;
        }
        None
    }

    /// Whether the paren at relative `open` starts a `(*name)` declarator
    /// group rather than a parameter list.
    fn paren_opens_declarator(&self, sig: &[usize], open: usize) -> bool {
        sig.get(open + 1).is_some_and(|&n| {
            let t = self.tok(n);
            t.is_punct("*") || t.is_punct("&") || t.is_punct("&&")
        })
    }

    /// For `foo<int>(`: walks back over the angle group ending at `gt`
    /// and returns the identifier before it.
    fn name_before_angles(&self, sig: &[usize], gt: usize) -> Option<usize> {
        let mut depth = 1i64;
        let mut q = gt;
        while q > 0 && depth > 0 {
            q -= 1;
            let t = self.tok(sig[q]);
            if t.is_punct(">") {
                depth += 1;
            } else if t.is_punct(">>") {
                depth += 2;
            } else if t.is_punct("<") {
                depth -= 1;
            }
        }
        if depth == 0 && q > 0 && self.tok(sig[q - 1]).is_identifier() {
            Some(q - 1)
        } else {
            None
        }
    }

    fn operator_signature(&self, sig: &[usize], kw: usize) -> Option<(usize, Callee)> {
        let mut i = kw + 1;
        // `operator()` names the call operator; its parameter list is the
        // group after the empty parens.
        if i + 1 < sig.len() && self.tok(sig[i]).is_punct("(") && self.tok(sig[i + 1]).is_punct(")")
        {
            i += 2;
        }
        while i < sig.len() && !self.tok(sig[i]).is_punct("(") {
            i += 1;
        }
        if i >= sig.len() {
            return None;
        }
        Some((i, Callee::Operator { kw }))
    }

    fn classify_function(
        &mut self,
        stmt: &StmtInfo<'_>,
        params_open: usize,
        callee: Callee,
        body: Option<(usize, usize)>,
    ) -> Declaration {
        let sig = stmt.sig;
        let params_close = self.close_within(sig, params_open);
        let mut info = FunctionInfo::default();

        let (name, pos, ret_end) = match callee {
            Callee::Named(name_sig) => {
                let name_tok = self.tok(sig[name_sig]);
                let mut name = name_tok.text.clone();
                let mut ret_end = name_sig;
                // Walk back over a `ns::cls::` qualifier chain.
                while ret_end >= 2
                    && self.tok(sig[ret_end - 1]).is_punct("::")
                    && self.tok(sig[ret_end - 2]).is_identifier()
                {
                    ret_end -= 2;
                }
                if ret_end >= 1 && self.tok(sig[ret_end - 1]).is_punct("~") {
                    info.is_destructor = true;
                    name = format!("~{name}");
                    ret_end -= 1;
                } else {
                    let qualified_self = name_sig >= 2
                        && self.tok(sig[name_sig - 1]).is_punct("::")
                        && self.tok(sig[name_sig - 2]).text == name_tok.text;
                    if stmt.class_name == Some(name_tok.text.as_str()) || qualified_self {
                        info.is_constructor = true;
                    }
                }
                (name, name_tok.pos, ret_end)
            }
            Callee::Operator { kw } => {
                info.is_operator = true;
                let mut name = String::from("operator");
                let empty_parens = params_open == kw + 3
                    && self.tok(sig[kw + 1]).is_punct("(")
                    && self.tok(sig[kw + 2]).is_punct(")");
                if empty_parens {
                    name.push_str("()");
                } else {
                    for &i in &sig[kw + 1..params_open] {
                        let text = self.tok(i).text.as_str();
                        let sep = name
                            .chars()
                            .last()
                            .is_some_and(|c| c.is_alphanumeric() || c == '_')
                            && text.chars().next().is_some_and(|c| c.is_alphanumeric());
                        if sep {
                            name.push(' ');
                        }
                        name.push_str(text);
                    }
                }
                (name, self.tok(sig[kw]).pos, kw)
            }
        };

        // Parameters.
        let interior: Vec<usize> = sig[params_open + 1..params_close].to_vec();
        for segment in self.split_commas(&interior) {
            if let Some(param) = self.parse_param(&segment) {
                info.params.push(param);
            }
        }

        // Post-signature tokens: noexcept, trailing return, defaults.
        let mut trailing_void = false;
        let mut has_trailing = false;
        let mut j = params_close + 1;
        while j < sig.len() {
            let t = self.tok(sig[j]);
            if t.is_keyword("noexcept") {
                if sig.get(j + 1).is_some_and(|&n| self.tok(n).is_punct("(")) {
                    let close = self.close_within(sig, j + 1);
                    let inner: Vec<&str> = sig[j + 2..close]
                        .iter()
                        .map(|&i| self.tok(i).text.as_str())
                        .collect();
                    info.exception = Some(match inner.as_slice() {
                        ["false"] => ExceptionSpec::NoexceptFalse,
                        ["true"] => ExceptionSpec::Noexcept,
                        _ => ExceptionSpec::Conditional,
                    });
                    j = close + 1;
                } else {
                    info.exception = Some(ExceptionSpec::Noexcept);
                    j += 1;
                }
                continue;
            }
            if t.is_punct("->") {
                has_trailing = true;
                trailing_void = sig
                    .get(j + 1)
                    .is_some_and(|&n| self.tok(n).is_keyword("void"))
                    && !sig.get(j + 2).is_some_and(|&n| self.tok(n).is_punct("*"));
                j += 1;
                continue;
            }
            if t.is_punct("=") {
                match sig.get(j + 1).map(|&n| self.tok(n).text.as_str()) {
                    Some("default") => info.is_defaulted = true,
                    Some("delete") => info.is_deleted = true,
                    _ => {}
                }
                break;
            }
            if t.is_punct(":") {
                // Constructor member-initializer list.
                break;
            }
            j += 1;
        }

        info.returns_value = if info.is_constructor || info.is_destructor {
            false
        } else if has_trailing {
            !trailing_void
        } else {
            self.returns_value(&sig[stmt.spec_end..ret_end])
        };

        if let Some((lb, rb)) = body {
            info.body = Some(TokenRange::new(lb + 1, rb));
        }

        let id = self.alloc_id();
        let children = match body {
            Some((lb, rb)) => {
                let mut locals = Vec::new();
                self.scan_block(lb + 1, rb, &mut locals);
                locals
            }
            None => Vec::new(),
        };
        let decl = Declaration {
            id,
            name,
            namespace_path: self.namespaces.clone(),
            qualifiers: stmt.quals,
            visibility: stmt.vis,
            pos,
            span: stmt.range,
            detail: DeclDetail::Function(info),
            children,
        };
        self.attach_doc(decl.id, stmt.range.start);
        decl
    }

    /// Whether a return-type token sequence denotes a value-returning
    /// function. Conservative on `auto` without a trailing return type.
    fn returns_value(&self, ret: &[usize]) -> bool {
        if ret.is_empty() {
            return false;
        }
        if ret.len() == 1 && self.tok(ret[0]).is_keyword("auto") {
            return false;
        }
        let mut depths = Depths::default();
        let mut prev: Option<&Token> = None;
        let mut saw_void = false;
        let mut saw_ptr = false;
        for &i in ret {
            let t = self.tok(i);
            if depths.at_top() {
                if t.is_keyword("void") {
                    saw_void = true;
                }
                if t.is_punct("*") {
                    saw_ptr = true;
                }
            }
            depths.step(prev, t);
            prev = Some(t);
        }
        !(saw_void && !saw_ptr)
    }

    fn parse_param(&self, segment: &[usize]) -> Option<Param> {
        if segment.is_empty() {
            return None;
        }
        if segment.len() == 1 {
            let t = self.tok(segment[0]);
            if t.is_keyword("void") || t.is_punct("...") {
                return None;
            }
        }
        let cut = self.top_level_punct(segment, "=").unwrap_or(segment.len());
        let trimmed = &segment[..cut];
        let name_idx = self.declarator_name(trimmed);
        let is_const = self.binds_const(trimmed);
        let pos = name_idx.map_or_else(|| self.tok(segment[0]).pos, |i| self.tokens[i].pos);
        Some(Param {
            name: name_idx.map(|i| self.tokens[i].text.clone()),
            is_const,
            pos,
        })
    }

    /// Whether the declared binding itself is const: a `const` (or
    /// `constexpr`) with no `*` after it qualifies the binding rather
    /// than a pointee.
    fn binds_const(&self, sig: &[usize]) -> bool {
        let mut last_const: Option<usize> = None;
        for (n, &i) in sig.iter().enumerate() {
            let t = self.tok(i);
            if t.is_keyword("const") || t.is_keyword("constexpr") {
                last_const = Some(n);
            }
        }
        let Some(c) = last_const else {
            return false;
        };
        !sig[c..].iter().any(|&i| self.tok(i).is_punct("*"))
    }

    /// Binding-const for one declarator segment, given whether a leading
    /// `const` was consumed with the specifiers.
    fn segment_const(&self, segment: &[usize], leading_const: bool) -> bool {
        let cut = self.top_level_punct(segment, "=").unwrap_or(segment.len());
        let trimmed = &segment[..cut];
        if leading_const && !trimmed.iter().any(|&i| self.tok(i).is_punct("*")) {
            return true;
        }
        self.binds_const(trimmed)
    }

    fn classify_variables(&mut self, stmt: &StmtInfo<'_>) -> Vec<Declaration> {
        let rest: Vec<usize> = stmt.sig[stmt.spec_end..].to_vec();
        let mut out = Vec::new();
        for segment in self.split_commas(&rest) {
            let Some(name_idx) = self.declarator_name(&segment) else {
                continue;
            };
            let mut seg_quals = stmt.quals;
            seg_quals.is_const = self.segment_const(&segment, stmt.quals.is_const);
            let is_member = stmt.class_name.is_some();
            let internal_linkage =
                stmt.quals.is_static || self.namespaces.iter().any(String::is_empty);
            let mutation_scope = if seg_quals.is_mutable {
                None
            } else if is_member {
                if stmt.vis == Visibility::Private {
                    Some(TokenRange::new(0, self.tokens.len()))
                } else {
                    None
                }
            } else if internal_linkage {
                Some(TokenRange::new(0, self.tokens.len()))
            } else {
                None
            };
            let id = self.alloc_id();
            let decl = Declaration {
                id,
                name: self.tokens[name_idx].text.clone(),
                namespace_path: self.namespaces.clone(),
                qualifiers: seg_quals,
                visibility: stmt.vis,
                pos: self.tokens[name_idx].pos,
                span: stmt.range,
                detail: DeclDetail::Variable(VariableInfo {
                    is_member,
                    mutation_scope,
                }),
                children: Vec::new(),
            };
            self.attach_doc(decl.id, stmt.range.start);
            out.push(decl);
        }
        if out.is_empty() {
            return vec![self.opaque(stmt.range, stmt.vis)];
        }
        out
    }

    // ------------------------------------------------------------------
    // Function bodies: local declarations
    // ------------------------------------------------------------------

    /// Scans a body token range for local variable declarations,
    /// including `for`-init declarations, appending them to `out`.
    fn scan_block(&mut self, lo: usize, hi: usize, out: &mut Vec<Declaration>) {
        let hi = hi.min(self.tokens.len());
        let mut idx = lo;
        while idx < hi {
            let t = &self.tokens[idx];
            if !t.kind.is_significant() || t.is_punct(";") || t.is_punct("}") {
                idx += 1;
                continue;
            }
            if t.is_punct("{") {
                let close = self.matching_brace(idx).min(hi);
                self.scan_block(idx + 1, close, out);
                idx = close + 1;
                continue;
            }
            if t.is_keyword("for") {
                let open = self.next_significant(idx + 1);
                if self.tokens[open].is_punct("(") {
                    let close = self.matching_paren(open).min(hi);
                    self.scan_for_init(open, close, hi, out);
                    idx = close + 1;
                    continue;
                }
                idx += 1;
                continue;
            }
            if t.is_keyword("if")
                || t.is_keyword("while")
                || t.is_keyword("switch")
                || t.is_keyword("catch")
            {
                let open = self.next_significant(idx + 1);
                if self.tokens[open].is_punct("(") {
                    idx = self.matching_paren(open).min(hi) + 1;
                } else {
                    idx += 1;
                }
                continue;
            }
            if t.is_keyword("do") || t.is_keyword("else") || t.is_keyword("try") {
                idx += 1;
                continue;
            }

            let end = self.statement_end(idx, hi);
            let sig = self.sig_indices(TokenRange::new(idx, end));
            self.collect_locals(&sig, end, hi, out);
            idx = end.max(idx + 1);
        }
    }

    /// End of the statement starting at `idx`: past the `;` at paren
    /// depth zero, with brace groups skipped whole.
    fn statement_end(&self, idx: usize, hi: usize) -> usize {
        let hi = hi.min(self.tokens.len());
        let mut i = idx;
        let mut parens = 0usize;
        while i < hi {
            let t = &self.tokens[i];
            if t.is_punct("(") {
                parens += 1;
            } else if t.is_punct(")") {
                parens = parens.saturating_sub(1);
            } else if parens == 0 {
                if t.is_punct(";") {
                    return i + 1;
                }
                if t.is_punct("{") {
                    i = self.matching_brace(i).min(hi);
                    let after = self.next_significant(i + 1);
                    if after < hi && self.tokens[after].is_punct(";") {
                        return after + 1;
                    }
                    return i + 1;
                }
                if t.is_punct("}") {
                    return i;
                }
            }
            i += 1;
        }
        hi
    }

    /// The init clause of a `for` statement may declare the loop
    /// variable. Its mutation scope starts after the init clause so the
    /// condition and increment count as write sites.
    fn scan_for_init(&mut self, open: usize, close: usize, hi: usize, out: &mut Vec<Declaration>) {
        let interior = self.sig_indices(TokenRange::new(open + 1, close));
        let mut init: Vec<usize> = Vec::new();
        let mut boundary = close;
        for &i in &interior {
            let t = &self.tokens[i];
            if t.is_punct(";") || t.is_punct(":") {
                boundary = i;
                break;
            }
            init.push(i);
        }
        self.collect_locals(&init, boundary, hi, out);
    }

    /// Models local declarations out of one statement's tokens, if the
    /// statement is unambiguously a declaration.
    fn collect_locals(
        &mut self,
        sig: &[usize],
        scope_start: usize,
        hi: usize,
        out: &mut Vec<Declaration>,
    ) {
        if sig.is_empty() {
            return;
        }
        let mut k = self.skip_leading_decorations(sig, 0);
        let mut quals = Qualifiers::default();
        while k < sig.len() {
            let t = self.tok(sig[k]);
            if t.kind == TokenKind::Keyword && SPECIFIERS.contains(&t.text.as_str()) {
                match t.text.as_str() {
                    "const" => quals.is_const = true,
                    "constexpr" => quals.is_constexpr = true,
                    "static" => quals.is_static = true,
                    _ => {}
                }
                k += 1;
            } else {
                break;
            }
        }
        if k >= sig.len() {
            return;
        }
        let first = self.tok(sig[k]);
        if first.kind == TokenKind::Keyword && NON_DECL_STARTERS.contains(&first.text.as_str()) {
            return;
        }

        // Require an unambiguous declaration head: a type keyword, or an
        // identifier path directly followed by another identifier.
        let head_ok = if first.kind == TokenKind::Keyword
            && TYPE_STARTERS.contains(&first.text.as_str())
        {
            true
        } else if first.is_identifier() {
            let mut i = k;
            loop {
                let next = i + 1;
                if next >= sig.len() {
                    break false;
                }
                let n = self.tok(sig[next]);
                if n.is_punct("::")
                    && next + 1 < sig.len()
                    && self.tok(sig[next + 1]).is_identifier()
                {
                    i = next + 1;
                } else if n.is_punct("<") {
                    let close = self.close_angle_within(sig, next);
                    break close + 1 < sig.len() && self.tok(sig[close + 1]).is_identifier();
                } else {
                    break n.is_identifier();
                }
            }
        } else {
            false
        };
        if !head_ok {
            return;
        }

        let head = sig[k];
        let rest: Vec<usize> = sig[k..].to_vec();
        for segment in self.split_commas(&rest) {
            let Some(name_idx) = self.local_declarator_name(&segment) else {
                continue;
            };
            // The head identifier is the type, never the declared name.
            if name_idx == head {
                continue;
            }
            let mut seg_quals = quals;
            seg_quals.is_const = self.segment_const(&segment, quals.is_const);
            let id = self.alloc_id();
            out.push(Declaration {
                id,
                name: self.tokens[name_idx].text.clone(),
                namespace_path: self.namespaces.clone(),
                qualifiers: seg_quals,
                visibility: Visibility::Public,
                pos: self.tokens[name_idx].pos,
                span: TokenRange::new(
                    segment[0],
                    segment.last().copied().unwrap_or(segment[0]) + 1,
                ),
                detail: DeclDetail::Variable(VariableInfo {
                    is_member: false,
                    mutation_scope: Some(TokenRange::new(scope_start, hi)),
                }),
                children: Vec::new(),
            });
        }
    }

    /// Declarator name for a local: like [`Self::declarator_name`] but
    /// also cut at a constructor-style `(` or a brace initializer.
    fn local_declarator_name(&self, segment: &[usize]) -> Option<usize> {
        if let Some(idx) = self.fn_ptr_name(segment) {
            return Some(idx);
        }
        let mut cut = segment.len();
        let mut depths = Depths::default();
        let mut prev: Option<&Token> = None;
        for (n, &i) in segment.iter().enumerate() {
            let t = self.tok(i);
            if depths.at_top() && (t.is_punct("=") || t.is_punct("(") || t.is_punct("{")) {
                cut = n;
                break;
            }
            depths.step(prev, t);
            prev = Some(t);
        }
        self.last_top_identifier(&segment[..cut])
    }

    // ------------------------------------------------------------------
    // Declarator helpers
    // ------------------------------------------------------------------

    /// Splits significant-token indices on commas at top bracket depth.
    fn split_commas(&self, sig: &[usize]) -> Vec<Vec<usize>> {
        let mut out = Vec::new();
        let mut current = Vec::new();
        let mut depths = Depths::default();
        let mut prev: Option<&Token> = None;
        for &i in sig {
            let t = self.tok(i);
            if depths.at_top() && t.is_punct(",") {
                out.push(std::mem::take(&mut current));
                prev = Some(t);
                continue;
            }
            depths.step(prev, t);
            prev = Some(t);
            current.push(i);
        }
        if !current.is_empty() {
            out.push(current);
        }
        out.retain(|s| !s.is_empty());
        out
    }

    /// Relative position of the first `text` punct at top depth.
    fn top_level_punct(&self, sig: &[usize], text: &str) -> Option<usize> {
        let mut depths = Depths::default();
        let mut prev: Option<&Token> = None;
        for (n, &i) in sig.iter().enumerate() {
            let t = self.tok(i);
            if depths.at_top() && t.is_punct(text) {
                return Some(n);
            }
            depths.step(prev, t);
            prev = Some(t);
        }
        None
    }

    /// Relative index of the `)` matching the `(` at relative `open`.
    fn close_within(&self, sig: &[usize], open: usize) -> usize {
        let mut depth = 0usize;
        for (n, &i) in sig.iter().enumerate().skip(open) {
            let t = self.tok(i);
            if t.is_punct("(") {
                depth += 1;
            } else if t.is_punct(")") {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    return n;
                }
            }
        }
        sig.len().saturating_sub(1)
    }

    /// Relative index of the `>` closing the `<` at relative `open`.
    fn close_angle_within(&self, sig: &[usize], open: usize) -> usize {
        let mut depth = 0i64;
        for (n, &i) in sig.iter().enumerate().skip(open) {
            let t = self.tok(i);
            if t.is_punct("<") {
                depth += 1;
            } else if t.is_punct(">") {
                depth -= 1;
            } else if t.is_punct(">>") {
                depth -= 2;
            }
            if depth <= 0 && n > open {
                return n;
            }
        }
        sig.len().saturating_sub(1)
    }

    /// Name token of a declarator: the last identifier at top depth, or
    /// the last identifier inside a `(*name)` function-pointer group.
    /// Truncates at a top-level `=` first.
    fn declarator_name(&self, sig: &[usize]) -> Option<usize> {
        let cut = self.top_level_punct(sig, "=").unwrap_or(sig.len());
        let trimmed = &sig[..cut];
        if let Some(idx) = self.fn_ptr_name(trimmed) {
            return Some(idx);
        }
        self.last_top_identifier(trimmed)
    }

    /// Looks for a `(*name)` or `(&name)` declarator group.
    fn fn_ptr_name(&self, sig: &[usize]) -> Option<usize> {
        let mut n = 0usize;
        while n + 1 < sig.len() {
            if self.tok(sig[n]).is_punct("(") {
                if self.paren_opens_declarator(sig, n) {
                    let close = self.close_within(sig, n);
                    return sig[n + 1..close]
                        .iter()
                        .rev()
                        .find(|&&i| self.tokens[i].is_identifier())
                        .copied();
                }
                n = self.close_within(sig, n);
            }
            n += 1;
        }
        None
    }

    fn last_top_identifier(&self, sig: &[usize]) -> Option<usize> {
        let mut depths = Depths::default();
        let mut prev: Option<&Token> = None;
        let mut last = None;
        for &i in sig {
            let t = self.tok(i);
            if depths.at_top() && t.is_identifier() && t.text != "final" && t.text != "override" {
                last = Some(i);
            }
            depths.step(prev, t);
            prev = Some(t);
        }
        last
    }

    // ------------------------------------------------------------------
    // Doc association and opaque nodes
    // ------------------------------------------------------------------

    /// Associates the doc comment ending directly above (or on the line
    /// of) the token at `start_idx` with `id`. A blank line, an ordinary
    /// comment, or a directive between the two breaks the association.
    fn attach_doc(&mut self, id: DeclId, start_idx: usize) {
        if start_idx == 0 || start_idx >= self.tokens.len() {
            return;
        }
        let decl_line = self.tokens[start_idx].pos.line;

        let prev = &self.tokens[start_idx - 1];
        if let TokenKind::Comment(CommentKind::DocBlock) = prev.kind {
            if !is_trailing_doc(&prev.text) && prev.end_line() + 1 >= decl_line {
                let block = DocBlock::parse(&prev.text, prev.pos.line);
                self.docs.insert(id, block);
            }
            return;
        }

        let mut run: Vec<usize> = Vec::new();
        let mut expect_line = decl_line;
        let mut j = start_idx;
        while j > 0 {
            j -= 1;
            let t = &self.tokens[j];
            let TokenKind::Comment(CommentKind::DocLine) = t.kind else {
                break;
            };
            if is_trailing_doc(&t.text) || t.pos.line + 1 != expect_line {
                break;
            }
            expect_line = t.pos.line;
            run.insert(0, j);
        }
        if run.is_empty() {
            return;
        }
        let texts: Vec<&str> = run.iter().map(|&i| self.tokens[i].text.as_str()).collect();
        let block = DocBlock::parse(&texts.join("\n"), self.tokens[run[0]].pos.line);
        self.docs.insert(id, block);
    }

    fn opaque(&mut self, range: TokenRange, vis: Visibility) -> Declaration {
        let id = self.alloc_id();
        let pos = self.tok(range.start).pos;
        debug!("Unmodeled region at {}:{}", pos.line, pos.column);
        Declaration {
            id,
            name: String::new(),
            namespace_path: self.namespaces.clone(),
            qualifiers: Qualifiers::default(),
            visibility: vis,
            pos,
            span: range,
            detail: DeclDetail::Opaque,
            children: Vec::new(),
        }
    }

    /// Skips `[[...]]` attribute groups in the raw token stream.
    fn skip_attributes(&self, mut k: usize) -> usize {
        while self.tokens[k].is_punct("[")
            && self.tokens[self.next_significant(k + 1)].is_punct("[")
        {
            let mut depth = 0usize;
            while k < self.tokens.len() - 1 {
                if self.tokens[k].is_punct("[") {
                    depth += 1;
                } else if self.tokens[k].is_punct("]") {
                    depth = depth.saturating_sub(1);
                    if depth == 0 {
                        break;
                    }
                }
                k += 1;
            }
            k = self.next_significant(k + 1);
        }
        k
    }
}

/// Trailing doc markers (`///<`, `//!<`, `/**<`, `/*!<`) document the
/// preceding declaration and must not attach forward.
fn is_trailing_doc(text: &str) -> bool {
    text.get(3..4) == Some("<")
}
