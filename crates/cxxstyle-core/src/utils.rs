//! Utility functions for rule implementations.

pub mod allowance;
pub mod identifiers;
pub mod scopes;

// Re-export commonly used utilities for rule implementations
#[doc(inline)]
pub use allowance::{check_allow_comment, AllowState};
#[doc(inline)]
pub use identifiers::{is_lower_snake, is_pascal_case, to_lower_snake, to_pascal_case};
#[doc(inline)]
pub use scopes::{matching_close, next_significant, statement_count};
