//! Filter expression parsing and evaluation.
//!
//! Grammar: a comma-separated list of clauses, each `[!]field[=pattern]`.
//! Without `=` the whole clause is a pattern tested against the `original`
//! field. Patterns are case-insensitive regular expressions with substring
//! semantics. A release matches when every clause holds.

use regex_lite::Regex;
use tracing::warn;

use crate::release::ReleaseMeta;

use super::{FilterError, MetaField};

#[derive(Debug, Clone)]
enum Test {
    Pattern(Regex),
    /// Clause that could not be compiled. Never matches.
    Broken,
}

#[derive(Debug, Clone)]
struct Clause {
    field: MetaField,
    negate: bool,
    test: Test,
}

impl Clause {
    fn matches(&self, meta: &ReleaseMeta) -> bool {
        match &self.test {
            Test::Pattern(regex) => regex.is_match(&self.field.value(meta)) != self.negate,
            Test::Broken => false,
        }
    }
}

/// A compiled filter expression.
#[derive(Debug, Clone)]
pub struct FilterExpression {
    source: String,
    clauses: Vec<Clause>,
}

impl FilterExpression {
    /// Compile strictly: an unknown field or malformed pattern is an error.
    ///
    /// Used to validate user configuration before any search runs.
    pub fn parse(expression: &str) -> Result<Self, FilterError> {
        let clauses = split_clauses(expression)
            .map(|raw| parse_clause(raw))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            source: expression.to_string(),
            clauses,
        })
    }

    /// Compile leniently: clauses that fail to compile are logged and kept
    /// as clauses that never match.
    pub fn compile(expression: &str) -> Self {
        let clauses = split_clauses(expression)
            .map(|raw| {
                parse_clause(raw).unwrap_or_else(|e| {
                    warn!(clause = raw, error = %e, "Filter clause degraded to non-match");
                    Clause {
                        field: MetaField::Original,
                        negate: false,
                        test: Test::Broken,
                    }
                })
            })
            .collect();

        Self {
            source: expression.to_string(),
            clauses,
        }
    }

    /// An expression with no clauses; matches everything.
    pub fn empty() -> Self {
        Self {
            source: String::new(),
            clauses: Vec::new(),
        }
    }

    /// The expression text this was compiled from.
    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }

    /// True iff every clause holds for `meta`.
    pub fn matches(&self, meta: &ReleaseMeta) -> bool {
        self.clauses.iter().all(|clause| clause.matches(meta))
    }
}

impl Default for FilterExpression {
    fn default() -> Self {
        Self::empty()
    }
}

/// Evaluate `expression` against `meta`, compiling leniently.
pub fn matches(expression: &str, meta: &ReleaseMeta) -> bool {
    FilterExpression::compile(expression).matches(meta)
}

/// Non-empty, trimmed clauses. Empty clauses always match, so they are
/// dropped here.
fn split_clauses(expression: &str) -> impl Iterator<Item = &str> {
    expression
        .split(',')
        .map(str::trim)
        .filter(|clause| !clause.is_empty())
}

fn parse_clause(raw: &str) -> Result<Clause, FilterError> {
    let (negate, body) = match raw.strip_prefix('!') {
        Some(rest) => (true, rest.trim_start()),
        None => (false, raw),
    };

    let (field, pattern) = match body.split_once('=') {
        Some((field, pattern)) => (field.parse::<MetaField>()?, pattern.trim()),
        None => (MetaField::Original, body),
    };

    let regex = Regex::new(&format!("(?i)(?:{})", pattern)).map_err(|e| {
        FilterError::InvalidPattern {
            pattern: pattern.to_string(),
            reason: e.to_string(),
        }
    })?;

    Ok(Clause {
        field,
        negate,
        test: Test::Pattern(regex),
    })
}
