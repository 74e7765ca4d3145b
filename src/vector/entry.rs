//! Word Vector Entries

use std::fmt;

/// A word together with its vector
#[derive(Debug, Clone, PartialEq)]
pub struct WordVec {
    pub word: String,
    pub vector: Vec<f64>,
}

impl WordVec {
    pub fn new(word: impl Into<String>, vector: Vec<f64>) -> Self {
        Self {
            word: word.into(),
            vector,
        }
    }

    /// Get vector dimension
    pub fn dim(&self) -> usize {
        self.vector.len()
    }
}

impl<W: Into<String>> From<(W, Vec<f64>)> for WordVec {
    fn from((word, vector): (W, Vec<f64>)) -> Self {
        Self::new(word, vector)
    }
}

impl fmt::Display for WordVec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ", self.word)?;
        write_vector(f, &self.vector)
    }
}

/// Writes a vector as `[v1 v2 ... vn]`
pub(crate) fn write_vector(f: &mut fmt::Formatter<'_>, vector: &[f64]) -> fmt::Result {
    write!(f, "[")?;
    for (i, x) in vector.iter().enumerate() {
        if i > 0 {
            write!(f, " ")?;
        }
        write!(f, "{}", x)?;
    }
    write!(f, "]")
}

/// A stored entry found by a search, with its distance to the query
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Neighbor<'a> {
    pub entry: &'a WordVec,
    pub distance: f64,
}

impl<'a> Neighbor<'a> {
    pub fn new(entry: &'a WordVec, distance: f64) -> Self {
        Self { entry, distance }
    }

    pub fn word(&self) -> &'a str {
        &self.entry.word
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let wv = WordVec::new("cat", vec![1.0, 0.5]);
        assert_eq!(wv.dim(), 2);
        assert_eq!(wv.to_string(), "cat [1 0.5]");
    }

    #[test]
    fn test_from_tuple() {
        let wv: WordVec = ("dog", vec![0.9, 0.1]).into();
        assert_eq!(wv.word, "dog");
    }
}
