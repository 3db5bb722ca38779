//! # cxxstyle-rules
//!
//! Built-in style rules for cxxstyle.
//!
//! This crate provides the conformance rules of the C++ style guide the
//! checker enforces: naming casing, namespace hygiene, const and
//! noexcept correctness, brace formatting, and documentation tags.
//!
//! ## Available Rules
//!
//! | Code | Name | Description |
//! |------|------|-------------|
//! | CS101 | `identifier-case` | Requires `lower_snake_case` identifiers |
//! | CS102 | `type-alias-suffix` | Requires type aliases to end in `_t` |
//! | CS103 | `member-underscore` | Requires private data members to end in `_` |
//! | CS104 | `template-parameter-case` | Requires `PascalCase` template parameters |
//! | CS201 | `anonymous-namespace` | Forbids anonymous namespaces |
//! | CS202 | `namespace-word-repetition` | Forbids repeated words in a namespace path |
//! | CS301 | `missing-const` | Suggests `const` for never-modified bindings |
//! | CS302 | `missing-noexcept` | Requires an explicit exception specification |
//! | CS401 | `brace-placement` | Requires multi-statement scope braces on their own line |
//! | CS402 | `single-statement-braces` | Forbids braces around single-statement bodies |
//! | CS403 | `tab-indentation` | Forbids tab characters in whitespace |
//! | CS501 | `required-doc-tags` | Requires doc tags on public declarations |
//!
//! ## Usage
//!
//! ```ignore
//! use cxxstyle_core::Checker;
//! use cxxstyle_rules::{IdentifierCase, MissingNoexcept};
//!
//! let checker = Checker::builder()
//!     .rule(IdentifierCase::new())
//!     .rule(MissingNoexcept::new())
//!     .build()?;
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod anonymous_namespace;
mod brace_placement;
mod identifier_case;
mod member_underscore;
mod missing_const;
mod missing_noexcept;
mod namespace_repetition;
mod presets;
mod required_doc_tags;
mod single_statement_braces;
mod tab_indentation;
mod template_parameter_case;
mod type_alias_suffix;

pub use anonymous_namespace::AnonymousNamespace;
pub use brace_placement::BracePlacement;
pub use identifier_case::IdentifierCase;
pub use member_underscore::MemberUnderscore;
pub use missing_const::MissingConst;
pub use missing_noexcept::MissingNoexcept;
pub use namespace_repetition::NamespaceRepetition;
pub use presets::{
    all_rules, minimal_rules, project_rules, recommended_rules, strict_rules, Preset,
};
pub use required_doc_tags::RequiredDocTags;
pub use single_statement_braces::SingleStatementBraces;
pub use tab_indentation::TabIndentation;
pub use template_parameter_case::TemplateParameterCase;
pub use type_alias_suffix::TypeAliasSuffix;

/// Re-export core types for convenience.
pub use cxxstyle_core::{Diagnostic, ProjectRule, Rule, Severity};
