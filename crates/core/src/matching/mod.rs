//! Title matching primitives: normalization and bigram similarity.

mod normalize;
mod similarity;

pub use normalize::normalize;
pub use similarity::{round2, score};
