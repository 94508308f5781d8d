//! Release title parsing.
//!
//! Turns free-text release names reported by indexers into structured
//! metadata (title, year, resolution, language, tags) used for scoring,
//! validation and filter expressions.

mod parser;
mod types;

pub use parser::{parse, ReleaseParser};
pub use types::{ParserDefaults, ReleaseMeta};
