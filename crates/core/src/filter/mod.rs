//! User-configured release filtering.
//!
//! A filter expression is a comma-separated list of `[!]field=pattern`
//! clauses evaluated against parsed release metadata. See
//! [`FilterExpression`] for the grammar.

mod expression;
mod field;

pub use expression::{matches, FilterExpression};
pub use field::MetaField;

use thiserror::Error;

/// Errors raised when compiling a filter expression strictly.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FilterError {
    #[error("unknown filter field: {0}")]
    UnknownField(String),

    #[error("invalid filter pattern '{pattern}': {reason}")]
    InvalidPattern { pattern: String, reason: String },
}
