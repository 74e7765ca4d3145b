//! Exact-Lookup Vector Store
//!
//! Hash table of chained word vectors with linear-scan neighbour search.
//! Entries live in an arena; each bucket is a list of arena indices kept in
//! insertion order, so lookup within a bucket returns the first inserted
//! match.

use hashbrown::HashSet;
use std::borrow::Cow;
use std::fmt;
use std::path::Path;
use std::time::Instant;
use tracing::{debug, error, info, warn};

use super::hasher::{bucket_count, bucket_index};
use crate::config::StoreConfig;
use crate::error::{QueryError, QueryResult};
use crate::loader::read_word_vectors;
use crate::table::Metric;
use crate::vector::{self, euclidean_unchecked, BoundedHeap, Neighbor, WordVec};

/// Word vector store with exact lookup and nearest-neighbour search
#[derive(Debug, Clone)]
pub struct VecStore {
    entries: Vec<WordVec>,
    /// False for later duplicates of an already stored word
    primary: Vec<bool>,
    buckets: Vec<Vec<usize>>,
    dimension: usize,
    case_sensitive: bool,
}

impl VecStore {
    /// Build a store from an ordered source.
    ///
    /// Only the leading `config.retention` fraction of the source is kept.
    /// The dimension is taken from the first kept entry; entries of any other
    /// dimension are skipped.
    pub fn build<I>(source: I, config: &StoreConfig) -> Self
    where
        I: IntoIterator<Item = WordVec>,
    {
        let source: Vec<WordVec> = source.into_iter().collect();
        let retained = config.retained(source.len());
        let dimension = source
            .iter()
            .take(retained)
            .next()
            .map(WordVec::dim)
            .unwrap_or(0);

        let mut store = Self {
            entries: Vec::with_capacity(retained),
            primary: Vec::with_capacity(retained),
            buckets: vec![Vec::new(); bucket_count(retained)],
            dimension,
            case_sensitive: config.case_sensitive,
        };

        let mut seen: HashSet<String> = HashSet::with_capacity(retained);
        for mut entry in source.into_iter().take(retained) {
            if dimension == 0 || entry.dim() != dimension {
                warn!(
                    "Skipping \"{}\": expected {} values, got {}",
                    entry.word,
                    dimension,
                    entry.dim()
                );
                continue;
            }
            if !store.case_sensitive {
                entry.word = entry.word.to_lowercase();
            }

            let idx = store.entries.len();
            let bucket = bucket_index(&entry.word, store.buckets.len());
            store.buckets[bucket].push(idx);
            store.primary.push(seen.insert(entry.word.clone()));
            store.entries.push(entry);
        }

        if store.entries.is_empty() {
            store.dimension = 0;
        }

        info!(
            "VecStore built: {} entries, dimension {}, {} buckets",
            store.entries.len(),
            store.dimension,
            store.buckets.len()
        );
        store
    }

    /// Build a store from a word vector file.
    ///
    /// An unreadable or empty file yields an empty, invalid store.
    pub fn from_file(path: impl AsRef<Path>, config: &StoreConfig) -> Self {
        match read_word_vectors(path.as_ref()) {
            Ok(entries) => Self::build(entries, config),
            Err(e) => {
                error!("Creating VecStore from {} failed: {}", path.as_ref().display(), e);
                Self::build(Vec::new(), config)
            }
        }
    }

    /// False if the store holds no usable vectors
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

    pub fn case_sensitive(&self) -> bool {
        self.case_sensitive
    }

    fn normalize<'w>(&self, word: &'w str) -> Cow<'w, str> {
        if self.case_sensitive {
            Cow::Borrowed(word)
        } else {
            Cow::Owned(word.to_lowercase())
        }
    }

    fn lookup(&self, key: &str) -> Option<&WordVec> {
        let bucket = bucket_index(key, self.buckets.len());
        self.buckets
            .get(bucket)?
            .iter()
            .map(|&idx| &self.entries[idx])
            .find(|entry| entry.word == key)
    }

    /// True if the word is stored
    pub fn contains(&self, word: &str) -> bool {
        self.lookup(&self.normalize(word)).is_some()
    }

    /// Entry stored for a word (the first inserted one for duplicates)
    pub fn entry(&self, word: &str) -> QueryResult<&WordVec> {
        let key = self.normalize(word);
        self.lookup(&key).ok_or_else(|| {
            warn!("\"{}\" couldn't be found in the VecStore", key);
            QueryError::not_found(key.into_owned())
        })
    }

    /// Vector stored for a word
    pub fn get(&self, word: &str) -> QueryResult<&[f64]> {
        self.entry(word).map(|entry| entry.vector.as_slice())
    }

    /// Cosine similarity or Euclidean distance of two stored words
    pub fn similarity(&self, word0: &str, word1: &str, metric: Metric) -> QueryResult<f64> {
        let (a, b) = (self.get(word0)?, self.get(word1)?);
        Ok(match metric {
            Metric::Cosine => vector::cosine_similarity(a, b)?,
            Metric::Euclidean => vector::euclidean_distance(a, b)?,
        })
    }

    /// Sum of the vectors of two stored words
    pub fn add_words(&self, word0: &str, word1: &str) -> QueryResult<Vec<f64>> {
        vector::add(self.get(word0)?, self.get(word1)?)
    }

    /// Vector of `minuend` minus vector of `subtrahend`
    pub fn subtract_words(&self, minuend: &str, subtrahend: &str) -> QueryResult<Vec<f64>> {
        vector::subtract(self.get(minuend)?, self.get(subtrahend)?)
    }

    /// Mean of the vectors of two stored words
    pub fn average_words(&self, word0: &str, word1: &str) -> QueryResult<Vec<f64>> {
        vector::average(self.get(word0)?, self.get(word1)?)
    }

    /// Entries taking part in searches, in scan order: bucket by bucket,
    /// chain order within a bucket, shadowed duplicates left out.
    fn candidates(&self) -> impl Iterator<Item = &WordVec> + '_ {
        self.buckets
            .iter()
            .flatten()
            .filter(move |&&idx| self.primary[idx])
            .map(move |&idx| &self.entries[idx])
    }

    fn check_query(&self, vector: &[f64]) -> QueryResult<()> {
        if !self.entries.is_empty() && vector.len() != self.dimension {
            return Err(QueryError::DimensionMismatch {
                expected: self.dimension,
                actual: vector.len(),
            });
        }
        Ok(())
    }

    fn extreme<F>(
        &self,
        vector: &[f64],
        exclude: Option<&str>,
        better: F,
    ) -> QueryResult<Neighbor<'_>>
    where
        F: Fn(f64, f64) -> bool,
    {
        self.check_query(vector)?;
        let exclude = exclude.map(|w| self.normalize(w));

        let mut best: Option<Neighbor<'_>> = None;
        for entry in self
            .candidates()
            .filter(|entry| Some(entry.word.as_str()) != exclude.as_deref())
        {
            let distance = euclidean_unchecked(vector, &entry.vector);
            if best.map_or(true, |b| better(distance, b.distance)) {
                best = Some(Neighbor::new(entry, distance));
            }
        }
        best.ok_or(QueryError::NoCandidates)
    }

    fn k_bounded<F>(
        &self,
        vector: &[f64],
        k: usize,
        exclude: Option<&str>,
        badness: F,
    ) -> QueryResult<Vec<Neighbor<'_>>>
    where
        F: Fn(f64) -> f64,
    {
        self.check_query(vector)?;
        let exclude = exclude.map(|w| self.normalize(w));
        let start = Instant::now();

        let mut heap = BoundedHeap::new(k);
        for entry in self
            .candidates()
            .filter(|entry| Some(entry.word.as_str()) != exclude.as_deref())
        {
            let distance = euclidean_unchecked(vector, &entry.vector);
            heap.try_insert(Neighbor::new(entry, distance), badness(distance));
        }

        debug!(k, latency = ?start.elapsed(), "k-bounded scan finished");
        Ok(heap.into_sorted_vec().into_iter().map(|(n, _)| n).collect())
    }

    /// Entry closest to `vector` by Euclidean distance, skipping `exclude`
    pub fn closest(&self, vector: &[f64], exclude: Option<&str>) -> QueryResult<Neighbor<'_>> {
        self.extreme(vector, exclude, |distance, best| distance < best)
    }

    /// Entry farthest from `vector` by Euclidean distance, skipping `exclude`
    pub fn farthest(&self, vector: &[f64], exclude: Option<&str>) -> QueryResult<Neighbor<'_>> {
        self.extreme(vector, exclude, |distance, best| distance > best)
    }

    /// The `k` entries closest to `vector`, closest first
    pub fn k_closest(
        &self,
        vector: &[f64],
        k: usize,
        exclude: Option<&str>,
    ) -> QueryResult<Vec<Neighbor<'_>>> {
        self.k_bounded(vector, k, exclude, |distance| distance)
    }

    /// The `k` entries farthest from `vector`, farthest first
    pub fn k_farthest(
        &self,
        vector: &[f64],
        k: usize,
        exclude: Option<&str>,
    ) -> QueryResult<Vec<Neighbor<'_>>> {
        self.k_bounded(vector, k, exclude, |distance| -distance)
    }

    /// Entry closest to a stored word, other than the word itself
    pub fn closest_to_word(&self, word: &str) -> QueryResult<Neighbor<'_>> {
        let entry = self.entry(word)?;
        self.closest(&entry.vector, Some(&entry.word))
    }

    /// Entry farthest from a stored word
    pub fn farthest_from_word(&self, word: &str) -> QueryResult<Neighbor<'_>> {
        let entry = self.entry(word)?;
        self.farthest(&entry.vector, Some(&entry.word))
    }

    /// The `k` entries closest to a stored word, other than the word itself
    pub fn k_closest_to_word(&self, word: &str, k: usize) -> QueryResult<Vec<Neighbor<'_>>> {
        let entry = self.entry(word)?;
        self.k_closest(&entry.vector, k, Some(&entry.word))
    }

    /// The `k` entries farthest from a stored word
    pub fn k_farthest_from_word(&self, word: &str, k: usize) -> QueryResult<Vec<Neighbor<'_>>> {
        let entry = self.entry(word)?;
        self.k_farthest(&entry.vector, k, Some(&entry.word))
    }

    /// Diagnostic summary of the hash table
    pub fn info(&self) -> StoreInfo {
        let sizes = self.buckets.iter().map(Vec::len);
        StoreInfo {
            dimension: self.dimension,
            entries: self.entries.len(),
            buckets: self.buckets.len(),
            empty_buckets: sizes.clone().filter(|&n| n == 0).count(),
            largest_bucket: sizes.max().unwrap_or(0),
            case_sensitive: self.case_sensitive,
        }
    }
}

/// Read-only statistics of a [`VecStore`]
#[derive(Debug, Clone, PartialEq)]
pub struct StoreInfo {
    pub dimension: usize,
    pub entries: usize,
    pub buckets: usize,
    pub empty_buckets: usize,
    pub largest_bucket: usize,
    pub case_sensitive: bool,
}

impl StoreInfo {
    /// Average number of entries per bucket
    pub fn load_factor(&self) -> f64 {
        if self.buckets == 0 {
            return 0.0;
        }
        self.entries as f64 / self.buckets as f64
    }

    /// Percentage of buckets holding no entry
    pub fn empty_bucket_percentage(&self) -> f64 {
        if self.buckets == 0 {
            return 0.0;
        }
        100.0 * self.empty_buckets as f64 / self.buckets as f64
    }

    /// Percentage of all entries stored in the fullest bucket
    pub fn largest_bucket_percentage(&self) -> f64 {
        if self.entries == 0 {
            return 0.0;
        }
        100.0 * self.largest_bucket as f64 / self.entries as f64
    }
}

impl fmt::Display for StoreInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Basic information about the VecStore:")?;
        writeln!(f, "\tSize of vectors = {}", self.dimension)?;
        writeln!(f, "\tNumber of stored word vectors = {}", self.entries)?;
        writeln!(f, "\tNumber of buckets = {}", self.buckets)?;
        writeln!(f, "\tLoad factor = {:.2}", self.load_factor())?;
        writeln!(f, "\tNumber of empty buckets = {}", self.empty_buckets)?;
        writeln!(
            f,
            "\tPercentage of empty buckets = {:.2} %",
            self.empty_bucket_percentage()
        )?;
        writeln!(
            f,
            "\tHighest number of word vectors in a bucket = {}",
            self.largest_bucket
        )?;
        writeln!(
            f,
            "\tShare of word vectors in the fullest bucket = {:.2} %",
            self.largest_bucket_percentage()
        )?;
        write!(
            f,
            "\tThis VecStore works case {}.",
            if self.case_sensitive { "sensitive" } else { "insensitive" }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn animals() -> Vec<WordVec> {
        vec![
            WordVec::new("cat", vec![1.0, 0.0]),
            WordVec::new("dog", vec![0.9, 0.1]),
            WordVec::new("car", vec![0.0, 1.0]),
        ]
    }

    fn store() -> VecStore {
        VecStore::build(animals(), &StoreConfig::default())
    }

    fn words(neighbors: &[Neighbor<'_>]) -> Vec<String> {
        neighbors.iter().map(|n| n.word().to_string()).collect()
    }

    #[test]
    fn test_get() {
        let store = store();
        assert_eq!(store.get("dog").unwrap(), &[0.9, 0.1]);
        assert_eq!(store.get("zzz"), Err(QueryError::not_found("zzz")));
        assert!(store.contains("car"));
        assert!(!store.contains("Car"));
    }

    #[test]
    fn test_closest_excludes_word() {
        let store = store();
        let closest = store.closest(&[1.0, 0.0], Some("cat")).unwrap();
        assert_eq!(closest.word(), "dog");
        let closest = store.closest(&[1.0, 0.0], None).unwrap();
        assert_eq!(closest.word(), "cat");
        assert_eq!(closest.distance, 0.0);
    }

    #[test]
    fn test_farthest() {
        let store = store();
        let farthest = store.farthest_from_word("cat").unwrap();
        assert_eq!(farthest.word(), "car");
        assert!((farthest.distance - 2f64.sqrt()).abs() < 1e-12);
    }

    #[test]
    fn test_k_closest_order() {
        let store = store();
        let result = store.k_closest(&[1.0, 0.0], 3, None).unwrap();
        assert_eq!(words(&result), vec!["cat", "dog", "car"]);
        let result = store.k_closest(&[1.0, 0.0], 1, Some("cat")).unwrap();
        assert_eq!(words(&result), vec!["dog"]);
    }

    #[test]
    fn test_k_farthest_order() {
        let store = store();
        let result = store.k_farthest(&[1.0, 0.0], 2, None).unwrap();
        assert_eq!(words(&result), vec!["car", "dog"]);
        let result = store.k_farthest_from_word("car", 5).unwrap();
        assert_eq!(words(&result), vec!["cat", "dog"]);
    }

    #[test]
    fn test_k_larger_than_store() {
        let store = store();
        assert_eq!(store.k_closest_to_word("dog", 10).unwrap().len(), 2);
        assert!(store.k_closest(&[0.0, 0.0], 0, None).unwrap().is_empty());
    }

    #[test]
    fn test_missing_word_variants() {
        let store = store();
        assert!(store.closest_to_word("zzz").unwrap_err().is_not_found());
        assert!(store.farthest_from_word("zzz").unwrap_err().is_not_found());
        assert!(store.k_closest_to_word("zzz", 2).unwrap_err().is_not_found());
        assert!(store.k_farthest_from_word("zzz", 2).unwrap_err().is_not_found());
        assert!(store.add_words("zzz", "cat").unwrap_err().is_not_found());
        assert!(store.subtract_words("cat", "zzz").unwrap_err().is_not_found());
        assert!(store.similarity("cat", "zzz", Metric::Cosine).unwrap_err().is_not_found());
    }

    #[test]
    fn test_wrong_query_dimension() {
        let store = store();
        assert_eq!(
            store.closest(&[1.0, 0.0, 0.0], None).unwrap_err(),
            QueryError::DimensionMismatch {
                expected: 2,
                actual: 3
            }
        );
        assert!(store.k_farthest(&[1.0], 2, None).is_err());
    }

    #[test]
    fn test_case_insensitive() {
        let source = vec![
            WordVec::new("Mann", vec![0.3, 0.4]),
            WordVec::new("Frau", vec![0.4, 0.3]),
        ];
        let store = VecStore::build(source, &StoreConfig::default().with_case_sensitive(false));
        assert_eq!(store.get("mann").unwrap(), &[0.3, 0.4]);
        assert_eq!(store.get("MANN").unwrap(), &[0.3, 0.4]);
        // the query word itself is excluded regardless of its spelling
        assert_eq!(store.closest_to_word("MaNn").unwrap().word(), "frau");
        assert!(store.closest(&[0.3, 0.4], Some("MANN")).unwrap().word() == "frau");
    }

    #[test]
    fn test_retention() {
        let store = VecStore::build(animals(), &StoreConfig::default().with_retention(0.5));
        assert_eq!(store.len(), 2);
        assert!(store.contains("dog"));
        assert!(!store.contains("car"));
    }

    #[test]
    fn test_duplicates() {
        let source = vec![
            WordVec::new("cat", vec![1.0, 0.0]),
            WordVec::new("cat", vec![0.0, 1.0]),
            WordVec::new("dog", vec![0.9, 0.1]),
        ];
        let store = VecStore::build(source, &StoreConfig::default());
        assert_eq!(store.len(), 3);
        assert_eq!(store.get("cat").unwrap(), &[1.0, 0.0]);
        let result = store.k_closest(&[0.0, 1.0], 3, None).unwrap();
        assert_eq!(words(&result), vec!["dog", "cat"]);
    }

    #[test]
    fn test_mismatched_entries_are_skipped() {
        let source = vec![
            WordVec::new("cat", vec![1.0, 0.0]),
            WordVec::new("odd", vec![1.0]),
        ];
        let store = VecStore::build(source, &StoreConfig::default());
        assert_eq!(store.len(), 1);
        assert!(!store.contains("odd"));
    }

    #[test]
    fn test_empty_store() {
        let store = VecStore::build(Vec::new(), &StoreConfig::default());
        assert!(!store.is_valid());
        assert_eq!(store.dimension(), 0);
        assert!(store.get("cat").unwrap_err().is_not_found());
        assert_eq!(store.closest(&[1.0], None), Err(QueryError::NoCandidates));
        assert!(store.k_closest(&[1.0], 3, None).unwrap().is_empty());
        assert_eq!(store.info().buckets, 1);
    }

    #[test]
    fn test_from_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let store = VecStore::from_file(dir.path().join("none.txt"), &StoreConfig::default());
        assert!(!store.is_valid());
        assert!(store.is_empty());
    }

    #[test]
    fn test_info() {
        let source: Vec<WordVec> = (0..45)
            .map(|i| WordVec::new(format!("w{}", i), vec![i as f64]))
            .collect();
        let store = VecStore::build(source, &StoreConfig::default());
        let info = store.info();
        assert_eq!(info.entries, 45);
        assert_eq!(info.buckets, 2);
        assert!((info.load_factor() - 22.5).abs() < 1e-12);
        assert!(info.largest_bucket >= 23);
        assert!(info.to_string().contains("case sensitive"));
    }

    #[test]
    fn test_info_percentages() {
        let info = StoreInfo {
            dimension: 2,
            entries: 40,
            buckets: 4,
            empty_buckets: 1,
            largest_bucket: 30,
            case_sensitive: false,
        };
        assert!((info.empty_bucket_percentage() - 25.0).abs() < 1e-12);
        assert!((info.largest_bucket_percentage() - 75.0).abs() < 1e-12);

        let report = info.to_string();
        assert!(report.contains("Percentage of empty buckets = 25.00 %"));
        assert!(report.contains("Share of word vectors in the fullest bucket = 75.00 %"));

        let empty = VecStore::build(Vec::new(), &StoreConfig::default()).info();
        assert_eq!(empty.largest_bucket_percentage(), 0.0);
        assert_eq!(empty.empty_bucket_percentage(), 100.0);
    }

    fn assert_send_sync<T: Send + Sync>() {}

    #[test]
    fn test_shared_read_only_queries() {
        assert_send_sync::<VecStore>();

        let store = store();
        std::thread::scope(|s| {
            for _ in 0..4 {
                s.spawn(|| {
                    assert_eq!(store.closest_to_word("cat").unwrap().word(), "dog");
                });
            }
        });
    }
}
