//! Store Configuration

use regex::Regex;
use std::fmt;
use std::sync::Arc;

/// Configuration of a [`VecStore`](crate::VecStore)
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// If false every word is lower-cased at insertion and at query time
    pub case_sensitive: bool,

    /// Fraction of the leading source entries to keep (clamped to 1)
    pub retention: f64,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            case_sensitive: true,
            retention: 1.0,
        }
    }
}

impl StoreConfig {
    pub fn with_case_sensitive(mut self, case_sensitive: bool) -> Self {
        self.case_sensitive = case_sensitive;
        self
    }

    pub fn with_retention(mut self, retention: f64) -> Self {
        self.retention = retention;
        self
    }

    /// Number of leading entries kept out of `total`
    pub fn retained(&self, total: usize) -> usize {
        retained_count(total, self.retention)
    }
}

/// Word predicate used to select table entries
pub type WordFilter = Arc<dyn Fn(&str) -> bool + Send + Sync>;

/// How a [`VecSimTable`](crate::VecSimTable) selects its entries
#[derive(Clone)]
pub enum Selection {
    /// Every entry whose word satisfies the predicate
    Filter(WordFilter),

    /// Every entry whose whole word matches the pattern
    Pattern(Regex),

    /// The leading fraction of the source
    Leading { case_sensitive: bool, retention: f64 },
}

impl fmt::Debug for Selection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Selection::Filter(_) => write!(f, "Filter(..)"),
            Selection::Pattern(re) => write!(f, "Pattern({:?})", re.as_str()),
            Selection::Leading {
                case_sensitive,
                retention,
            } => f
                .debug_struct("Leading")
                .field("case_sensitive", case_sensitive)
                .field("retention", retention)
                .finish(),
        }
    }
}

/// Configuration of a [`VecSimTable`](crate::VecSimTable)
#[derive(Debug, Clone)]
pub struct TableConfig {
    pub selection: Selection,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            selection: Selection::Leading {
                case_sensitive: true,
                retention: 0.1,
            },
        }
    }
}

impl TableConfig {
    /// Keep the leading `retention` fraction of the source
    pub fn leading(case_sensitive: bool, retention: f64) -> Self {
        Self {
            selection: Selection::Leading {
                case_sensitive,
                retention,
            },
        }
    }

    /// Keep every word matching `pattern` as a whole
    pub fn with_pattern(pattern: &str) -> Result<Self, regex::Error> {
        let anchored = Regex::new(&format!("^(?:{})$", pattern))?;
        Ok(Self {
            selection: Selection::Pattern(anchored),
        })
    }

    /// Keep every word accepted by `filter`
    pub fn with_filter<F>(filter: F) -> Self
    where
        F: Fn(&str) -> bool + Send + Sync + 'static,
    {
        Self {
            selection: Selection::Filter(Arc::new(filter)),
        }
    }

    pub fn case_sensitive(&self) -> bool {
        match &self.selection {
            Selection::Leading { case_sensitive, .. } => *case_sensitive,
            _ => true,
        }
    }
}

/// round(total * min(fraction, 1)); NaN or non-positive fractions keep nothing
pub(crate) fn retained_count(total: usize, fraction: f64) -> usize {
    if fraction.is_nan() || fraction <= 0.0 {
        return 0;
    }
    let fraction = fraction.min(1.0);
    ((total as f64 * fraction).round() as usize).min(total)
}
