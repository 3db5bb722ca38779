//! # cxxstyle
//!
//! Style conformance checker for C++ sources.
//!
//! This is the main facade crate that re-exports the core engine and
//! the built-in rules, plus a default pipeline that runs every rule.
//!
//! ## Quick Start
//!
//! ```ignore
//! use cxxstyle::SourceFile;
//!
//! let sources = vec![SourceFile::new(
//!     "geo.cpp",
//!     "namespace kmx::gis::gis_data {}\n",
//! )];
//! let result = cxxstyle::check_sources(&sources)?;
//! for diagnostic in &result.diagnostics {
//!     println!("{}", diagnostic.format());
//! }
//! ```
//!
//! ## Picking Rules
//!
//! ```ignore
//! use cxxstyle::{Checker, Config};
//! use cxxstyle::rules::{MissingNoexcept, Preset};
//!
//! // A preset plus configuration:
//! let checker = cxxstyle::checker(Preset::Strict, Config::default())?;
//!
//! // Or assemble by hand:
//! let checker = Checker::builder()
//!     .rule(MissingNoexcept::new())
//!     .build()?;
//! ```
//!
//! Inline suppression uses `// cxxstyle: allow(rule-name)` comments on
//! or above the flagged line; see the rule docs for the rule names.

#![forbid(unsafe_code)]

// Re-export core types and traits
pub use cxxstyle_core::*;

/// Built-in rules and presets.
pub mod rules {
    pub use cxxstyle_rules::*;
}

mod pipeline;

pub use pipeline::{check_paths, check_sources, checker};
