//! Pairwise Similarity Table
//!
//! Word vectors sorted by word, with the cosine similarity and Euclidean
//! distance of every unordered pair computed once at construction and kept
//! in a flat triangular array.

use std::borrow::Cow;
use std::fmt;
use std::path::Path;
use std::time::Instant;
use tracing::{debug, error, info, warn};

use super::metric::Metric;
use super::triangle::Triangle;
use crate::config::{retained_count, Selection, TableConfig};
use crate::error::{QueryError, QueryResult};
use crate::loader::read_word_vectors;
use crate::vector::{cosine_unchecked, euclidean_unchecked, BoundedHeap, WordVec};

/// Both scores of one word pair
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Similarity {
    pub cosine: f64,
    pub euclidean: f64,
}

impl Similarity {
    fn between(a: &[f64], b: &[f64]) -> Self {
        Self {
            cosine: cosine_unchecked(a, b),
            euclidean: euclidean_unchecked(a, b),
        }
    }

    pub fn score(&self, metric: Metric) -> f64 {
        match metric {
            Metric::Cosine => self.cosine,
            Metric::Euclidean => self.euclidean,
        }
    }
}

/// A word pair with its score under the queried metric
#[derive(Debug, Clone, PartialEq)]
pub struct PairScore {
    pub first: String,
    pub second: String,
    pub score: f64,
}

impl fmt::Display for PairScore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "\"{}\" / \"{}\": {}", self.first, self.second, self.score)
    }
}

/// Precomputed similarity table over a selection of word vectors
#[derive(Debug, Clone)]
pub struct VecSimTable {
    /// Sorted by word; duplicates keep their source order
    entries: Vec<WordVec>,
    cells: Vec<Similarity>,
    triangle: Triangle,
    dimension: usize,
    case_sensitive: bool,
}

impl VecSimTable {
    /// Build a table from an ordered source and compute every pair score.
    pub fn build<I>(source: I, config: &TableConfig) -> Self
    where
        I: IntoIterator<Item = WordVec>,
    {
        let start = Instant::now();
        let source = source.into_iter();
        let case_sensitive = config.case_sensitive();

        let selected: Vec<WordVec> = match &config.selection {
            Selection::Filter(filter) => source.filter(|e| filter(e.word.as_str())).collect(),
            Selection::Pattern(pattern) => source.filter(|e| pattern.is_match(&e.word)).collect(),
            Selection::Leading { retention, .. } => {
                let source: Vec<WordVec> = source.collect();
                let retained = retained_count(source.len(), *retention);
                source
                    .into_iter()
                    .take(retained)
                    .map(|mut entry| {
                        if !case_sensitive {
                            entry.word = entry.word.to_lowercase();
                        }
                        entry
                    })
                    .collect()
            }
        };

        let dimension = selected.first().map(WordVec::dim).unwrap_or(0);
        let mut entries: Vec<WordVec> = selected
            .into_iter()
            .filter(|entry| {
                let keep = dimension > 0 && entry.dim() == dimension;
                if !keep {
                    warn!(
                        "Skipping \"{}\": expected {} values, got {}",
                        entry.word,
                        dimension,
                        entry.dim()
                    );
                }
                keep
            })
            .collect();
        entries.sort_by(|a, b| a.word.cmp(&b.word));

        let triangle = Triangle::new(entries.len());
        let mut cells = Vec::with_capacity(triangle.len());
        for (i, a) in entries.iter().enumerate() {
            for b in &entries[i + 1..] {
                cells.push(Similarity::between(&a.vector, &b.vector));
            }
        }

        let dimension = if entries.is_empty() { 0 } else { dimension };
        info!(
            "VecSimTable built: {} entries, dimension {}, {} pairs in {:?}",
            entries.len(),
            dimension,
            cells.len(),
            start.elapsed()
        );

        Self {
            entries,
            cells,
            triangle,
            dimension,
            case_sensitive,
        }
    }

    /// Build a table from a word vector file.
    ///
    /// An unreadable or empty file yields an empty, invalid table.
    pub fn from_file(path: impl AsRef<Path>, config: &TableConfig) -> Self {
        match read_word_vectors(path.as_ref()) {
            Ok(entries) => Self::build(entries, config),
            Err(e) => {
                error!("Creating VecSimTable from {} failed: {}", path.as_ref().display(), e);
                Self::build(Vec::new(), config)
            }
        }
    }

    /// False if the table holds no usable vectors
    pub fn is_valid(&self) -> bool {
        self.dimension >= 1 && !self.entries.is_empty()
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of stored pairs
    pub fn pair_count(&self) -> usize {
        self.cells.len()
    }

    pub fn case_sensitive(&self) -> bool {
        self.case_sensitive
    }

    /// Stored words in table order
    pub fn words(&self) -> impl Iterator<Item = &str> + '_ {
        self.entries.iter().map(|entry| entry.word.as_str())
    }

    fn normalize<'w>(&self, word: &'w str) -> Cow<'w, str> {
        if self.case_sensitive {
            Cow::Borrowed(word)
        } else {
            Cow::Owned(word.to_lowercase())
        }
    }

    /// Position of the first entry stored under `key`
    fn index_of(&self, key: &str) -> Option<usize> {
        let idx = self.entries.partition_point(|entry| entry.word.as_str() < key);
        (idx < self.entries.len() && self.entries[idx].word == key).then_some(idx)
    }

    fn resolve(&self, key: &str) -> QueryResult<usize> {
        self.index_of(key).ok_or_else(|| {
            warn!("\"{}\" couldn't be found in the VecSimTable", key);
            QueryError::not_found(key)
        })
    }

    /// Vector stored for a word
    pub fn get_vector(&self, word: &str) -> QueryResult<&[f64]> {
        let key = self.normalize(word);
        let idx = self.resolve(&key)?;
        Ok(&self.entries[idx].vector)
    }

    /// Score of a word pair; a word paired with itself gets the metric's
    /// self score without a lookup
    pub fn score(&self, word0: &str, word1: &str, metric: Metric) -> QueryResult<f64> {
        let (key0, key1) = (self.normalize(word0), self.normalize(word1));
        if key0 == key1 {
            return Ok(metric.self_score());
        }
        let (i, j) = (self.resolve(&key0)?, self.resolve(&key1)?);
        Ok(self.cell(i, j).map_or(metric.self_score(), |cell| cell.score(metric)))
    }

    /// Cosine similarity of two stored words
    pub fn cosine(&self, word0: &str, word1: &str) -> QueryResult<f64> {
        self.score(word0, word1, Metric::Cosine)
    }

    /// Euclidean distance between two stored words
    pub fn euclidean(&self, word0: &str, word1: &str) -> QueryResult<f64> {
        self.score(word0, word1, Metric::Euclidean)
    }

    fn cell(&self, i: usize, j: usize) -> Option<&Similarity> {
        self.triangle.index(i, j).map(|flat| &self.cells[flat])
    }

    /// Pair and scores stored at a flat triangular offset
    pub fn pair_at(&self, flat: usize) -> Option<(&str, &str, Similarity)> {
        let (i, j) = self.triangle.pair(flat)?;
        Some((
            self.entries[i].word.as_str(),
            self.entries[j].word.as_str(),
            self.cells[flat],
        ))
    }

    /// Flat offset of the pair two distinct words form
    fn anchor(&self, word0: &str, word1: &str) -> QueryResult<usize> {
        let (key0, key1) = (self.normalize(word0), self.normalize(word1));
        if key0 == key1 {
            warn!("No real word pair selected (both words were \"{}\")", key0);
            return Err(QueryError::DegenerateQuery(key0.into_owned()));
        }
        let (i, j) = (self.resolve(&key0)?, self.resolve(&key1)?);
        self.triangle
            .index(i, j)
            .ok_or_else(|| QueryError::DegenerateQuery(key0.into_owned()))
    }

    /// Every pair in flat order: offset, entry indices and scores
    fn scan(&self) -> impl Iterator<Item = (usize, (usize, usize), &Similarity)> + '_ {
        self.triangle
            .pairs()
            .zip(&self.cells)
            .enumerate()
            .map(|(flat, (pair, cell))| (flat, pair, cell))
    }

    fn pair_score(&self, (i, j): (usize, usize), score: f64) -> PairScore {
        PairScore {
            first: self.entries[i].word.clone(),
            second: self.entries[j].word.clone(),
            score,
        }
    }

    fn in_range(
        &self,
        anchor: f64,
        metric: Metric,
        range: f64,
        exclude: Option<usize>,
    ) -> Vec<PairScore> {
        let (low, high) = (anchor - range, anchor + range);
        self.scan()
            .filter(|&(flat, _, _)| Some(flat) != exclude)
            .map(|(_, pair, cell)| (pair, cell.score(metric)))
            .filter(|&(_, score)| score >= low && score <= high)
            .map(|(pair, score)| self.pair_score(pair, score))
            .collect()
    }

    fn nearest_to(
        &self,
        anchor: f64,
        metric: Metric,
        k: usize,
        exclude: Option<usize>,
    ) -> Vec<PairScore> {
        let start = Instant::now();
        let mut heap = BoundedHeap::new(k);
        for (flat, pair, cell) in self.scan() {
            if Some(flat) == exclude {
                continue;
            }
            let score = cell.score(metric);
            heap.try_insert((pair, score), (score - anchor).abs());
        }
        debug!(k, latency = ?start.elapsed(), "pair scan finished");
        heap.into_sorted_vec()
            .into_iter()
            .map(|((pair, score), _)| self.pair_score(pair, score))
            .collect()
    }

    /// Every pair scoring within `range` of the pair `(word0, word1)`,
    /// the pair itself left out, in table order
    pub fn similar_pairs(
        &self,
        word0: &str,
        word1: &str,
        metric: Metric,
        range: f64,
    ) -> QueryResult<Vec<PairScore>> {
        let flat = self.anchor(word0, word1)?;
        let anchor = self.cells[flat].score(metric);
        Ok(self.in_range(anchor, metric, range, Some(flat)))
    }

    /// Every pair scoring within `range` of `value`, in table order
    pub fn similar_pairs_to_value(
        &self,
        value: f64,
        metric: Metric,
        range: f64,
    ) -> Vec<PairScore> {
        self.in_range(value, metric, range, None)
    }

    /// The `k` pairs scoring closest to the pair `(word0, word1)`, closest
    /// first, the pair itself left out
    pub fn most_similar_pairs(
        &self,
        word0: &str,
        word1: &str,
        metric: Metric,
        k: usize,
    ) -> QueryResult<Vec<PairScore>> {
        let flat = self.anchor(word0, word1)?;
        let anchor = self.cells[flat].score(metric);
        Ok(self.nearest_to(anchor, metric, k, Some(flat)))
    }

    /// The `k` pairs scoring closest to `value`, closest first
    pub fn most_similar_pairs_to_value(
        &self,
        value: f64,
        metric: Metric,
        k: usize,
    ) -> Vec<PairScore> {
        self.nearest_to(value, metric, k, None)
    }

    pub fn info(&self) -> TableInfo {
        TableInfo {
            dimension: self.dimension,
            entries: self.entries.len(),
            pairs: self.cells.len(),
            case_sensitive: self.case_sensitive,
        }
    }
}

/// Read-only statistics of a [`VecSimTable`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableInfo {
    pub dimension: usize,
    pub entries: usize,
    pub pairs: usize,
    pub case_sensitive: bool,
}

impl fmt::Display for TableInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Basic information about the VecSimTable:")?;
        writeln!(f, "\tSize of vectors = {}", self.dimension)?;
        writeln!(f, "\tNumber of stored word vectors = {}", self.entries)?;
        writeln!(f, "\tNumber of stored word pairs = {}", self.pairs)?;
        write!(
            f,
            "\tThis VecSimTable works case {}.",
            if self.case_sensitive { "sensitive" } else { "insensitive" }
        )
    }
}
