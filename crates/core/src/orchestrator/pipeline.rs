//! Candidate validity pipeline.
//!
//! Checks run in a fixed order. The first failing check disqualifies the
//! candidate and the rest are skipped, so a candidate's reason is always the
//! earliest one that applies.

use chrono::Datelike;

use crate::filter::FilterExpression;

use super::types::{Movie, ScoredCandidate, WarningLevel};

/// One validity check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Check {
    /// Candidate has at least one seeder.
    Seeders,
    /// Title similarity reaches the configured minimum.
    Score,
    /// Published no earlier than the movie's earliest year.
    MinimumYear,
    /// Parsed release year is unknown or one of the movie's years.
    YearMatch,
    /// User-configured filter expression matches.
    Filter,
}

impl Check {
    /// Built-in checks in evaluation order.
    pub const ORDER: [Check; 5] = [
        Check::Seeders,
        Check::Score,
        Check::MinimumYear,
        Check::YearMatch,
        Check::Filter,
    ];

    /// `Some((reason, level))` when `candidate` fails this check.
    fn evaluate(
        self,
        candidate: &ScoredCandidate,
        movie: &Movie,
        pipeline: &ValidityPipeline,
    ) -> Option<(String, WarningLevel)> {
        match self {
            Check::Seeders => (candidate.candidate.seeders == 0)
                .then(|| ("No seeders (0)".to_string(), WarningLevel::Hard)),
            Check::Score => (candidate.score < pipeline.min_score).then(|| {
                (
                    format!("Score too low : {:.2}", candidate.score),
                    WarningLevel::Hard,
                )
            }),
            Check::MinimumYear => {
                let published = candidate.candidate.publish_date?.year();
                let earliest = movie.years().iter().copied().min()?;
                (published < earliest).then(|| {
                    (
                        format!(
                            "Release published year ({}) prior to movie release years ({})",
                            published,
                            movie.years_label()
                        ),
                        WarningLevel::Hard,
                    )
                })
            }
            Check::YearMatch => {
                let year = candidate.meta.year;
                let matches =
                    year == 0 || movie.years().is_empty() || movie.years().contains(&year);
                (!matches).then(|| {
                    (
                        format!(
                            "Release year ({}) different from movie release years ({})",
                            year,
                            movie.years_label()
                        ),
                        WarningLevel::Hard,
                    )
                })
            }
            Check::Filter => (!pipeline.filter.matches(&candidate.meta)).then(|| {
                (
                    format!(
                        "Release doesn't pass configured filtering ({})",
                        pipeline.filter.source()
                    ),
                    WarningLevel::Soft,
                )
            }),
        }
    }
}

/// Ordered validity checks with their parameters.
#[derive(Debug, Clone)]
pub struct ValidityPipeline {
    checks: Vec<Check>,
    min_score: f64,
    filter: FilterExpression,
}

impl ValidityPipeline {
    pub fn new(min_score: f64, filter: FilterExpression) -> Self {
        Self {
            checks: Check::ORDER.to_vec(),
            min_score,
            filter,
        }
    }

    #[cfg(test)]
    fn checks(&self) -> &[Check] {
        &self.checks
    }

    pub fn filter(&self) -> &FilterExpression {
        &self.filter
    }

    /// Run every check against `candidate`, stopping at the first failure.
    ///
    /// Only ever turns a valid candidate invalid. A candidate that survives
    /// every check ends with no reason and no warning.
    pub fn apply(&self, candidate: &mut ScoredCandidate, movie: &Movie) {
        candidate.valid = true;
        candidate.reason = None;
        candidate.warning = WarningLevel::None;

        let failure = self
            .checks
            .iter()
            .find_map(|check| check.evaluate(candidate, movie, self));

        if let Some((reason, warning)) = failure {
            candidate.valid = false;
            candidate.reason = Some(reason);
            candidate.warning = warning;
        }
    }
}
