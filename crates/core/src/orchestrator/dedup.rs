//! Best-per-release aggregation.

use std::collections::HashMap;

use super::types::ScoredCandidate;

/// Candidates keyed by guid, keeping the highest score for each.
///
/// Ties keep the entry seen first. Iteration follows the order in which
/// guids were first seen.
#[derive(Debug, Default)]
pub struct ResultSet {
    index: HashMap<String, usize>,
    entries: Vec<ScoredCandidate>,
}

impl ResultSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Offer a candidate. Returns `true` if it is now the survivor for its guid.
    pub fn insert(&mut self, candidate: ScoredCandidate) -> bool {
        match self.index.get(candidate.guid()) {
            Some(&pos) => {
                if candidate.score > self.entries[pos].score {
                    self.entries[pos] = candidate;
                    true
                } else {
                    false
                }
            }
            None => {
                self.index
                    .insert(candidate.guid().to_string(), self.entries.len());
                self.entries.push(candidate);
                true
            }
        }
    }

    #[cfg(test)]
    fn get(&self, guid: &str) -> Option<&ScoredCandidate> {
        self.index.get(guid).map(|&pos| &self.entries[pos])
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.entries.len()
    }

    #[cfg(test)]
    fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[cfg(test)]
    fn iter(&self) -> impl Iterator<Item = &ScoredCandidate> {
        self.entries.iter()
    }

    pub fn into_vec(self) -> Vec<ScoredCandidate> {
        self.entries
    }
}

impl Extend<ScoredCandidate> for ResultSet {
    fn extend<I: IntoIterator<Item = ScoredCandidate>>(&mut self, iter: I) {
        for candidate in iter {
            self.insert(candidate);
        }
    }
}

impl FromIterator<ScoredCandidate> for ResultSet {
    fn from_iter<I: IntoIterator<Item = ScoredCandidate>>(iter: I) -> Self {
        let mut set = ResultSet::new();
        set.extend(iter);
        set
    }
}
