//! Release metadata fields addressable from filter expressions.

use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::release::ReleaseMeta;

use super::FilterError;

/// A metadata field a filter clause can test.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetaField {
    /// The raw release title as reported by the backend.
    Original,
    Title,
    Resolution,
    Language,
    Year,
    Source,
    Encoding,
    Dub,
    Flags,
    Group,
    Generated,
}

impl MetaField {
    pub const ALL: [MetaField; 11] = [
        MetaField::Original,
        MetaField::Title,
        MetaField::Resolution,
        MetaField::Language,
        MetaField::Year,
        MetaField::Source,
        MetaField::Encoding,
        MetaField::Dub,
        MetaField::Flags,
        MetaField::Group,
        MetaField::Generated,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            MetaField::Original => "original",
            MetaField::Title => "title",
            MetaField::Resolution => "resolution",
            MetaField::Language => "language",
            MetaField::Year => "year",
            MetaField::Source => "source",
            MetaField::Encoding => "encoding",
            MetaField::Dub => "dub",
            MetaField::Flags => "flags",
            MetaField::Group => "group",
            MetaField::Generated => "generated",
        }
    }

    /// String value of this field for `meta`.
    ///
    /// Absent optional fields and an unknown year (`0`) read as the empty
    /// string. Flags are space-joined.
    pub fn value<'a>(self, meta: &'a ReleaseMeta) -> Cow<'a, str> {
        fn opt(value: &Option<String>) -> Cow<'_, str> {
            Cow::Borrowed(value.as_deref().unwrap_or(""))
        }

        match self {
            MetaField::Original => Cow::Borrowed(&meta.original),
            MetaField::Title => Cow::Borrowed(&meta.title),
            MetaField::Resolution => Cow::Borrowed(&meta.resolution),
            MetaField::Language => Cow::Borrowed(&meta.language),
            MetaField::Year if meta.year == 0 => Cow::Borrowed(""),
            MetaField::Year => Cow::Owned(meta.year.to_string()),
            MetaField::Source => opt(&meta.source),
            MetaField::Encoding => opt(&meta.encoding),
            MetaField::Dub => opt(&meta.dub),
            MetaField::Flags => Cow::Owned(meta.flags.join(" ")),
            MetaField::Group => opt(&meta.group),
            MetaField::Generated => Cow::Borrowed(&meta.generated),
        }
    }
}

impl fmt::Display for MetaField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MetaField {
    type Err = FilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        MetaField::ALL
            .into_iter()
            .find(|field| field.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| FilterError::UnknownField(wanted.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::release::parse;

    #[test]
    fn test_from_str_known_fields() {
        for field in MetaField::ALL {
            assert_eq!(field.as_str().parse::<MetaField>().unwrap(), field);
        }
        assert_eq!("LANGUAGE".parse::<MetaField>().unwrap(), MetaField::Language);
        assert_eq!(" year ".parse::<MetaField>().unwrap(), MetaField::Year);
    }

    #[test]
    fn test_from_str_unknown_field() {
        let err = "codec".parse::<MetaField>().unwrap_err();
        assert!(matches!(err, FilterError::UnknownField(ref f) if f == "codec"));
    }

    #[test]
    fn test_values() {
        let meta = parse("Inception.2010.1080p.BluRay.PROPER.x264-SPARKS");
        assert_eq!(MetaField::Original.value(&meta), "Inception.2010.1080p.BluRay.PROPER.x264-SPARKS");
        assert_eq!(MetaField::Title.value(&meta), "Inception");
        assert_eq!(MetaField::Year.value(&meta), "2010");
        assert_eq!(MetaField::Resolution.value(&meta), "1080P");
        assert_eq!(MetaField::Language.value(&meta), "ENGLISH");
        assert_eq!(MetaField::Source.value(&meta), "BLURAY");
        assert_eq!(MetaField::Flags.value(&meta), "PROPER");
        assert_eq!(MetaField::Group.value(&meta), "SPARKS");
    }

    #[test]
    fn test_missing_values_are_empty() {
        let meta = parse("Home Video");
        assert_eq!(MetaField::Year.value(&meta), "");
        assert_eq!(MetaField::Source.value(&meta), "");
        assert_eq!(MetaField::Dub.value(&meta), "");
        assert_eq!(MetaField::Flags.value(&meta), "");
    }
}
