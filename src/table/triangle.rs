//! Triangular Index Arithmetic
//!
//! Maps unordered pairs `(i, j)`, `i != j`, of `n` entries onto flat offsets
//! `0 .. n(n-1)/2`. Row `i` holds the pairs `(i, i+1) .. (i, n-1)`, rows are
//! stored one after another.

/// Layout of the upper triangle of an `n x n` matrix without its diagonal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Triangle {
    n: usize,
}

impl Triangle {
    pub fn new(n: usize) -> Self {
        Self { n }
    }

    /// Number of entries the triangle is built over
    pub fn side(&self) -> usize {
        self.n
    }

    /// Number of cells, n(n-1)/2
    pub fn len(&self) -> usize {
        self.n * self.n.saturating_sub(1) / 2
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Flat offset of the first cell of row `i`
    #[inline]
    pub fn row_offset(&self, i: usize) -> usize {
        i * (2 * self.n - i - 1) / 2
    }

    /// Flat offset of the pair `(i, j)`; the order of `i` and `j` is irrelevant
    #[inline]
    pub fn index(&self, i: usize, j: usize) -> Option<usize> {
        if i == j || i >= self.n || j >= self.n {
            return None;
        }
        let (i, j) = if i < j { (i, j) } else { (j, i) };
        Some(self.row_offset(i) + (j - i - 1))
    }

    /// Pair `(i, j)`, `i < j`, stored at a flat offset
    pub fn pair(&self, flat: usize) -> Option<(usize, usize)> {
        if flat >= self.len() {
            return None;
        }
        // row_offset(lo) <= flat < row_offset(hi)
        let (mut lo, mut hi) = (0, self.n - 1);
        while hi - lo > 1 {
            let mid = (lo + hi) / 2;
            if self.row_offset(mid) <= flat {
                lo = mid;
            } else {
                hi = mid;
            }
        }
        Some((lo, flat - self.row_offset(lo) + lo + 1))
    }

    /// All pairs in flat order
    pub fn pairs(&self) -> impl Iterator<Item = (usize, usize)> {
        let n = self.n;
        (0..n).flat_map(move |i| (i + 1..n).map(move |j| (i, j)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_len() {
        assert_eq!(Triangle::new(0).len(), 0);
        assert_eq!(Triangle::new(1).len(), 0);
        assert_eq!(Triangle::new(2).len(), 1);
        assert_eq!(Triangle::new(5).len(), 10);
        assert!(Triangle::new(1).is_empty());
    }

    #[test]
    fn test_index_layout() {
        let t = Triangle::new(4);
        assert_eq!(t.index(0, 1), Some(0));
        assert_eq!(t.index(0, 3), Some(2));
        assert_eq!(t.index(1, 2), Some(3));
        assert_eq!(t.index(2, 3), Some(5));
        assert_eq!(t.index(3, 2), Some(5));
        assert_eq!(t.index(2, 2), None);
        assert_eq!(t.index(1, 4), None);
    }

    #[test]
    fn test_pairs_follow_flat_order() {
        let t = Triangle::new(6);
        for (flat, (i, j)) in t.pairs().enumerate() {
            assert_eq!(t.index(i, j), Some(flat));
            assert_eq!(t.pair(flat), Some((i, j)));
        }
        assert_eq!(t.pairs().count(), t.len());
        assert_eq!(t.pair(t.len()), None);
    }

    #[test]
    fn test_degenerate_sizes() {
        assert_eq!(Triangle::new(0).pair(0), None);
        assert_eq!(Triangle::new(1).pairs().count(), 0);
        assert_eq!(Triangle::new(2).pair(0), Some((0, 1)));
    }
}
