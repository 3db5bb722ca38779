//! # cxxstyle-core
//!
//! Core framework for C++ style conformance checking based on a
//! tolerant token-level analysis.
//!
//! This crate provides the foundational traits and types for building
//! style checkers. It includes:
//!
//! - [`Rule`] trait for per-file declaration-tree rules
//! - [`ProjectRule`] trait for cross-file rules
//! - [`Checker`] for orchestrating parallel rule execution
//! - [`Diagnostic`] for representing style findings
//!
//! Source files are never rejected: constructs the modeler cannot
//! classify degrade to opaque regions, and every readable file yields
//! a declaration tree.
//!
//! ## Example
//!
//! ```ignore
//! use cxxstyle_core::{Checker, SourceFile};
//!
//! let checker = Checker::builder()
//!     .rule(MyRule::new())
//!     .build()?;
//!
//! let result = checker.check_sources(&sources);
//! result.print_report();
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod aggregate;
mod builder;
mod config;
mod context;
mod docs;
mod engine;
mod lexer;
mod model;
mod rule;
mod token;
mod types;

/// Utility modules for rule implementations.
pub mod utils;

pub use aggregate::DiagnosticAggregator;
pub use config::{AllowList, Config, ConfigError};
pub use context::{FileContext, NamespaceTable, ProjectContext};
pub use docs::{DocBlock, DocIndex, DocTag};
pub use engine::{CancelFlag, Checker, CheckerBuilder, CheckerError};
pub use lexer::tokenize;
pub use model::{
    DeclDetail, DeclId, DeclKind, Declaration, DeclarationTree, ExceptionSpec, FunctionInfo,
    Param, Qualifiers, RecordKeyword, TemplateParamKind, TokenRange, TranslationUnit,
    VariableInfo, Visibility,
};
pub use rule::{ProjectRule, ProjectRuleBox, Rule, RuleBox};
pub use token::{CommentKind, LiteralKind, SourcePos, Token, TokenKind, Whitespace};
pub use types::{
    CheckResult, Diagnostic, DiagnosticReport, Label, Location, Replacement, Severity,
    SourceFile, Suggestion,
};
pub use utils::allowance::{AllowCheck, AllowState};
