//! Types produced by the release parser.

use serde::{Deserialize, Serialize};

/// Structured metadata extracted from a free-text release title.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReleaseMeta {
    /// The raw release title, untouched.
    pub original: String,
    /// Movie title portion of the release name, separators turned to spaces.
    pub title: String,
    /// Release year, `0` when unknown.
    pub year: i32,
    /// Resolution class (`SD`, `720P`, `1080P`, `2160P`).
    pub resolution: String,
    /// Audio language (`ENGLISH`, `FRENCH`, `MULTI`, ...).
    pub language: String,
    /// Release source (`BLURAY`, `WEB-DL`, ...).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    /// Video encoding (`x264`, `x265`, ...).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub encoding: Option<String>,
    /// Dubbing marker (`DUBBED`, `MD`, ...).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dub: Option<String>,
    /// Edition and scene flags (`PROPER`, `EXTENDED`, ...), in title order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub flags: Vec<String>,
    /// Scene group suffix.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
    /// Canonical release name built from the parsed fields.
    pub generated: String,
}

/// Fallback values for fields the parser could not recognise.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParserDefaults {
    #[serde(default = "default_language")]
    pub language: String,
    #[serde(default = "default_resolution")]
    pub resolution: String,
    #[serde(default)]
    pub year: i32,
}

fn default_language() -> String {
    "ENGLISH".to_string()
}

fn default_resolution() -> String {
    "SD".to_string()
}

impl Default for ParserDefaults {
    fn default() -> Self {
        Self {
            language: default_language(),
            resolution: default_resolution(),
            year: 0,
        }
    }
}
