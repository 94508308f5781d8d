//! Types for the search orchestrator.

use serde::{Deserialize, Serialize};

use crate::release::ReleaseMeta;
use crate::searcher::RawCandidate;

/// The movie being searched for.
///
/// Title variants keep their given order, blank and duplicate entries
/// removed. Years are deduplicated the same way.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "MovieTerms")]
pub struct Movie {
    id: String,
    titles: Vec<String>,
    years: Vec<i32>,
}

#[derive(Deserialize)]
struct MovieTerms {
    #[serde(default)]
    id: String,
    #[serde(default)]
    titles: Vec<String>,
    #[serde(default)]
    years: Vec<i32>,
}

impl From<MovieTerms> for Movie {
    fn from(terms: MovieTerms) -> Self {
        Movie::new(terms.id, terms.titles, terms.years)
    }
}

impl Movie {
    pub fn new<I, T>(id: impl Into<String>, titles: I, years: impl IntoIterator<Item = i32>) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        let mut unique_titles: Vec<String> = Vec::new();
        for title in titles {
            let title = title.into().trim().to_string();
            if !title.is_empty() && !unique_titles.contains(&title) {
                unique_titles.push(title);
            }
        }

        let mut unique_years: Vec<i32> = Vec::new();
        for year in years {
            if !unique_years.contains(&year) {
                unique_years.push(year);
            }
        }

        Self {
            id: id.into(),
            titles: unique_titles,
            years: unique_years,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn titles(&self) -> &[String] {
        &self.titles
    }

    pub fn years(&self) -> &[i32] {
        &self.years
    }

    /// Years joined for display in disqualification reasons.
    pub(crate) fn years_label(&self) -> String {
        self.years
            .iter()
            .map(i32::to_string)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Severity of a disqualification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum WarningLevel {
    /// Candidate is valid.
    #[default]
    None,
    /// Rejected only by the user-configured filter.
    Soft,
    /// Rejected by a built-in check.
    Hard,
}

impl From<WarningLevel> for u8 {
    fn from(level: WarningLevel) -> u8 {
        match level {
            WarningLevel::None => 0,
            WarningLevel::Soft => 1,
            WarningLevel::Hard => 2,
        }
    }
}

impl TryFrom<u8> for WarningLevel {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(WarningLevel::None),
            1 => Ok(WarningLevel::Soft),
            2 => Ok(WarningLevel::Hard),
            other => Err(format!("invalid warning level: {}", other)),
        }
    }
}

/// A raw candidate after parsing, scoring and validation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredCandidate {
    #[serde(flatten)]
    pub candidate: RawCandidate,
    pub meta: ReleaseMeta,
    /// Backend that returned this candidate.
    pub backend: String,
    /// Title variant the backend was queried with.
    pub query: String,
    /// Best similarity against any title variant, two decimals.
    pub score: f64,
    pub valid: bool,
    /// First disqualifying reason, `None` when valid.
    #[serde(default)]
    pub reason: Option<String>,
    #[serde(default)]
    pub warning: WarningLevel,
}

impl ScoredCandidate {
    pub fn guid(&self) -> &str {
        &self.candidate.guid
    }

    /// What a grab needs to fetch this release.
    pub fn grab_target(&self) -> GrabTarget {
        GrabTarget {
            link: self.candidate.link.clone(),
            guid: self.candidate.guid.clone(),
            title: self.candidate.title.clone(),
        }
    }
}

/// A release selected for download.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GrabTarget {
    pub link: String,
    pub guid: String,
    pub title: String,
}

/// Ordering applied to a result list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortKey {
    #[default]
    Seeders,
    Peers,
    Size,
}

impl SortKey {
    fn key(self, candidate: &ScoredCandidate) -> u64 {
        match self {
            SortKey::Seeders => u64::from(candidate.candidate.seeders),
            SortKey::Peers => u64::from(candidate.candidate.peers),
            SortKey::Size => candidate.candidate.size,
        }
    }
}

/// Stable sort of `candidates` by `key`.
pub fn sort_candidates(candidates: &mut [ScoredCandidate], key: SortKey, descending: bool) {
    if descending {
        candidates.sort_by(|a, b| key.key(b).cmp(&key.key(a)));
    } else {
        candidates.sort_by_key(|c| key.key(c));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::fixtures;

    #[test]
    fn test_movie_dedups_titles_and_years() {
        let movie = Movie::new("27205", ["Inception", " ", "Inception", "Origine"], [2010, 2010]);
        assert_eq!(movie.titles(), ["Inception", "Origine"]);
        assert_eq!(movie.years(), [2010]);
        assert_eq!(movie.id(), "27205");
    }

    #[test]
    fn test_movie_deserialize_normalizes() {
        let json = r#"{"id": "1", "titles": ["Up", "", "Up"], "years": [2009]}"#;
        let movie: Movie = serde_json::from_str(json).unwrap();
        assert_eq!(movie.titles(), ["Up"]);
    }

    #[test]
    fn test_years_label() {
        let movie = Movie::new("1", ["A"], [1999, 2000]);
        assert_eq!(movie.years_label(), "1999, 2000");
    }

    #[test]
    fn test_warning_level_serializes_as_number() {
        assert_eq!(serde_json::to_string(&WarningLevel::Hard).unwrap(), "2");
        assert_eq!(serde_json::to_string(&WarningLevel::None).unwrap(), "0");
        let level: WarningLevel = serde_json::from_str("1").unwrap();
        assert_eq!(level, WarningLevel::Soft);
        assert!(serde_json::from_str::<WarningLevel>("7").is_err());
    }

    #[test]
    fn test_scored_candidate_serialization_flattens_raw() {
        let scored = fixtures::scored_candidate("g1", "Inception.2010.1080p", 10, 0.9);
        let json = serde_json::to_value(&scored).unwrap();
        assert_eq!(json["guid"], "g1");
        assert_eq!(json["seeders"], 10);
        assert_eq!(json["meta"]["year"], 2010);
        assert_eq!(json["warning"], 0);
        assert!(json["reason"].is_null());
    }

    #[test]
    fn test_sort_candidates() {
        let mut list = vec![
            fixtures::scored_candidate("a", "A.2010", 5, 1.0),
            fixtures::scored_candidate("b", "B.2010", 50, 1.0),
            fixtures::scored_candidate("c", "C.2010", 5, 1.0),
            fixtures::scored_candidate("d", "D.2010", 1, 1.0),
        ];

        sort_candidates(&mut list, SortKey::Seeders, true);
        let order: Vec<&str> = list.iter().map(|c| c.guid()).collect();
        assert_eq!(order, ["b", "a", "c", "d"]);

        sort_candidates(&mut list, SortKey::Seeders, false);
        let order: Vec<&str> = list.iter().map(|c| c.guid()).collect();
        assert_eq!(order, ["d", "a", "c", "b"]);
    }

    #[test]
    fn test_sort_key_serde() {
        assert_eq!(serde_json::to_string(&SortKey::Size).unwrap(), "\"size\"");
        let key: SortKey = serde_json::from_str("\"peers\"").unwrap();
        assert_eq!(key, SortKey::Peers);
    }

    #[test]
    fn test_grab_target() {
        let scored = fixtures::scored_candidate("g1", "Inception.2010.1080p", 10, 0.9);
        let target = scored.grab_target();
        assert_eq!(target.guid, "g1");
        assert_eq!(target.title, "Inception.2010.1080p");
    }
}
