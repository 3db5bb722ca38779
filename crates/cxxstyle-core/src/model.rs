//! Declaration-tree model extracted from a token stream.
//!
//! The model is a forest of [`Declaration`] nodes, deliberately shallow:
//! it records what style rules need (names, kinds, visibility, qualifiers,
//! positions, token spans) and nothing a full C++ frontend would require.
//! Regions the builder cannot classify become [`DeclKind::Opaque`] nodes so
//! that a single unparseable construct never hides the rest of a file.

use crate::docs::DocIndex;
use crate::token::{SourcePos, Token};

/// Stable identifier of a declaration within one translation unit.
///
/// Ids are assigned in parse order, so they increase monotonically with
/// source position across a pre-order walk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DeclId(pub usize);

/// Access level of a member, or `Public` outside of class scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    /// Accessible everywhere.
    Public,
    /// Accessible to the class and derived classes.
    Protected,
    /// Accessible to the class only.
    Private,
}

/// Declaration-specifier flags observed on a declaration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Qualifiers {
    /// `const` applies to the declared entity itself.
    pub is_const: bool,
    /// Declared `constexpr`, `consteval`, or `constinit`.
    pub is_constexpr: bool,
    /// Declared `static`.
    pub is_static: bool,
    /// Declared `inline`.
    pub is_inline: bool,
    /// Declared `mutable`.
    pub is_mutable: bool,
    /// Declared `extern`.
    pub is_extern: bool,
}

/// Half-open range of token indices into the unit's token stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenRange {
    /// Index of the first token in the range.
    pub start: usize,
    /// Index one past the last token in the range.
    pub end: usize,
}

impl TokenRange {
    /// Creates a range. `start > end` is normalized to an empty range.
    pub fn new(start: usize, end: usize) -> Self {
        Self {
            start,
            end: end.max(start),
        }
    }

    /// Whether the range contains no tokens.
    pub fn is_empty(self) -> bool {
        self.start >= self.end
    }

    /// Whether `index` falls inside the range.
    pub fn contains(self, index: usize) -> bool {
        index >= self.start && index < self.end
    }
}

/// Which keyword introduced a record-like declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordKeyword {
    /// `class`
    Class,
    /// `struct`
    Struct,
    /// `union`
    Union,
    /// `enum`, `enum class`, or `enum struct`
    Enum,
}

/// Exception specification observed on a function.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExceptionSpec {
    /// Plain `noexcept` or `noexcept(true)`.
    Noexcept,
    /// `noexcept(false)`: explicitly declared potentially-throwing.
    NoexceptFalse,
    /// `noexcept(expr)` with a condition the model does not evaluate.
    Conditional,
}

/// Kind of a template parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemplateParamKind {
    /// `typename T` or `class T`.
    Type,
    /// A value parameter such as `int N`.
    NonType,
    /// A template-template parameter.
    Template,
}

/// A function parameter as far as the model can see it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Param {
    /// Declared name, if the parameter is named.
    pub name: Option<String>,
    /// Whether the binding itself is `const`-qualified.
    pub is_const: bool,
    /// Position of the parameter name, or of the parameter's first token
    /// for unnamed parameters.
    pub pos: SourcePos,
}

/// Function-specific model data.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FunctionInfo {
    /// Parameters in declaration order.
    pub params: Vec<Param>,
    /// Exception specification, if any was written.
    pub exception: Option<ExceptionSpec>,
    /// Whether the function returns a value. Conservative: `false` for
    /// `void`, constructors, destructors, conversion operators, and for
    /// `auto` without a trailing return type.
    pub returns_value: bool,
    /// Operator overload (`operator==`, `operator[]`, ...).
    pub is_operator: bool,
    /// Constructor of the enclosing class.
    pub is_constructor: bool,
    /// Destructor of the enclosing class.
    pub is_destructor: bool,
    /// Declared `= default`.
    pub is_defaulted: bool,
    /// Declared `= delete`.
    pub is_deleted: bool,
    /// Token range of the body between the braces, when defined here.
    pub body: Option<TokenRange>,
}

/// Variable-specific model data.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VariableInfo {
    /// Non-static or static data member of a class. Enumerators and
    /// locals are not members.
    pub is_member: bool,
    /// Token range in which every possible mutation of this variable must
    /// appear, when the model can bound it: the enclosing block for
    /// locals, the whole file for private members and internal-linkage
    /// globals. `None` when the variable may be mutated from code the
    /// model cannot see.
    pub mutation_scope: Option<TokenRange>,
}

/// Kind- and detail-carrying payload of a declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeclDetail {
    /// Namespace definition or namespace alias.
    Namespace {
        /// Anonymous namespace.
        anonymous: bool,
        /// `inline namespace`.
        is_inline: bool,
        /// Namespace alias (`namespace io = boost::asio;`). Aliases
        /// introduce a name but do not open a namespace.
        is_alias: bool,
    },
    /// Class, struct, union, or enum.
    Record {
        /// Introducing keyword.
        keyword: RecordKeyword,
        /// False for forward declarations without a body.
        defined: bool,
    },
    /// Function, method, constructor, destructor, or operator.
    Function(FunctionInfo),
    /// Variable, data member, enumerator, or local.
    Variable(VariableInfo),
    /// `using name = ...` or `typedef`.
    TypeAlias,
    /// A parameter of a template declaration.
    TemplateParameter {
        /// Parameter kind.
        kind: TemplateParamKind,
    },
    /// A region the builder skipped without modeling.
    Opaque,
}

/// Coarse declaration kind, derived from [`DeclDetail`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeclKind {
    /// Namespace.
    Namespace,
    /// Class, struct, union, or enum.
    Record,
    /// Function-like declaration.
    Function,
    /// Variable-like declaration.
    Variable,
    /// Type alias.
    TypeAlias,
    /// Template parameter.
    TemplateParameter,
    /// Unmodeled region.
    Opaque,
}

impl DeclKind {
    /// Human-readable kind word used in diagnostic messages.
    pub fn describe(self) -> &'static str {
        match self {
            Self::Namespace => "namespace",
            Self::Record => "type",
            Self::Function => "function",
            Self::Variable => "variable",
            Self::TypeAlias => "type alias",
            Self::TemplateParameter => "template parameter",
            Self::Opaque => "region",
        }
    }
}

/// A single node of the declaration tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declaration {
    /// Unique id within the unit.
    pub id: DeclId,
    /// Declared name. Empty for anonymous namespaces, unnamed records,
    /// and opaque regions.
    pub name: String,
    /// Names of the enclosing namespaces, outermost first. An empty
    /// string segment marks an anonymous namespace.
    pub namespace_path: Vec<String>,
    /// Specifier flags.
    pub qualifiers: Qualifiers,
    /// Access level at the declaration site.
    pub visibility: Visibility,
    /// Position of the declared name (or of the declaration's first
    /// token when there is no name).
    pub pos: SourcePos,
    /// Token span of the whole declaration including any body.
    pub span: TokenRange,
    /// Kind-specific payload.
    pub detail: DeclDetail,
    /// Nested declarations: members, enumerators, template parameters,
    /// locals of function bodies.
    pub children: Vec<Declaration>,
}

impl Declaration {
    /// Coarse kind of this declaration.
    pub fn kind(&self) -> DeclKind {
        match &self.detail {
            DeclDetail::Namespace { .. } => DeclKind::Namespace,
            DeclDetail::Record { .. } => DeclKind::Record,
            DeclDetail::Function(_) => DeclKind::Function,
            DeclDetail::Variable(_) => DeclKind::Variable,
            DeclDetail::TypeAlias => DeclKind::TypeAlias,
            DeclDetail::TemplateParameter { .. } => DeclKind::TemplateParameter,
            DeclDetail::Opaque => DeclKind::Opaque,
        }
    }

    /// Function payload, if this is a function.
    pub fn as_function(&self) -> Option<&FunctionInfo> {
        match &self.detail {
            DeclDetail::Function(info) => Some(info),
            _ => None,
        }
    }

    /// Variable payload, if this is a variable.
    pub fn as_variable(&self) -> Option<&VariableInfo> {
        match &self.detail {
            DeclDetail::Variable(info) => Some(info),
            _ => None,
        }
    }

    /// Whether this declaration sits inside an anonymous namespace.
    pub fn in_anonymous_namespace(&self) -> bool {
        self.namespace_path.iter().any(String::is_empty)
    }

    /// Template parameters attached to this declaration.
    pub fn template_params(&self) -> impl Iterator<Item = &Declaration> {
        self.children
            .iter()
            .filter(|c| matches!(c.detail, DeclDetail::TemplateParameter { .. }))
    }
}

/// The declaration forest of one translation unit.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeclarationTree {
    /// Top-level declarations in source order.
    pub decls: Vec<Declaration>,
}

impl DeclarationTree {
    /// Whether the tree has no declarations at all.
    pub fn is_empty(&self) -> bool {
        self.decls.is_empty()
    }

    /// Pre-order walk over every declaration, children after their parent.
    pub fn walk<'a>(&'a self, visit: &mut impl FnMut(&'a Declaration)) {
        fn go<'a>(decl: &'a Declaration, visit: &mut impl FnMut(&'a Declaration)) {
            visit(decl);
            for child in &decl.children {
                go(child, visit);
            }
        }
        for decl in &self.decls {
            go(decl, visit);
        }
    }

    /// Collects every declaration matching `filter`, in pre-order.
    pub fn collect<'a>(&'a self, filter: impl Fn(&Declaration) -> bool) -> Vec<&'a Declaration> {
        let mut out = Vec::new();
        self.walk(&mut |d| {
            if filter(d) {
                out.push(d);
            }
        });
        out
    }
}

/// Fully analyzed single file: tokens, declaration tree, and doc comments.
#[derive(Debug, Clone)]
pub struct TranslationUnit {
    /// Complete token stream, `Eof`-terminated.
    pub tokens: Vec<Token>,
    /// Declaration forest extracted from the tokens.
    pub tree: DeclarationTree,
    /// Doc comments keyed by the declaration they precede.
    pub docs: DocIndex,
}

impl TranslationUnit {
    /// Lexes and models `source`. Never fails: unreadable constructs
    /// degrade to opaque declarations.
    pub fn parse(source: &str) -> Self {
        crate::builder::build(source)
    }

    /// Opaque declarations, in source order.
    pub fn opaque_regions(&self) -> Vec<&Declaration> {
        self.tree.collect(|d| d.kind() == DeclKind::Opaque)
    }
}
