//! Comparison Metrics
//!
//! Selects the score a pair query compares by from a free-form mode string.

use regex::Regex;
use std::fmt;
use std::sync::LazyLock;

static EUCLIDEAN_MODE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^eucl(idean)?[ _-]?dist(ance)?$").expect("static pattern")
});

/// Score used to compare word pairs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Metric {
    #[default]
    Cosine,
    Euclidean,
}

impl Metric {
    /// Parse a mode string.
    ///
    /// Spellings of "Euclidean distance" (`eucldist`, `eucl_dist`,
    /// `Euclidean Distance`, `euclidean-dist`, ...) select
    /// [`Metric::Euclidean`]; anything else, including the empty string,
    /// selects [`Metric::Cosine`].
    pub fn from_mode(mode: &str) -> Self {
        if EUCLIDEAN_MODE.is_match(mode) {
            Metric::Euclidean
        } else {
            Metric::Cosine
        }
    }

    /// Score of two identical words
    pub fn self_score(&self) -> f64 {
        match self {
            Metric::Cosine => 1.0,
            Metric::Euclidean => 0.0,
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Metric::Cosine => write!(f, "cosine similarity"),
            Metric::Euclidean => write!(f, "Euclidean distance"),
        }
    }
}
