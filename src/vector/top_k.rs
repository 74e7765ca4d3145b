//! Bounded Top-K Accumulator
//!
//! Keeps the k best candidates seen during a single scan. Candidates are
//! ranked by a "badness" key (smaller is better); the worst kept candidate
//! sits at the top of a max-heap so it can be replaced in O(log k).

use std::cmp::Ordering;
use std::collections::BinaryHeap;

struct Candidate<T> {
    item: T,
    badness: f64,
    /// Insertion sequence; on equal badness the later candidate ranks worse
    seq: u64,
}

impl<T> PartialEq for Candidate<T> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl<T> Eq for Candidate<T> {}

impl<T> PartialOrd for Candidate<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T> Ord for Candidate<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.badness
            .total_cmp(&other.badness)
            .then_with(|| self.seq.cmp(&other.seq))
    }
}

/// Fixed-capacity collection of the best candidates seen so far
pub struct BoundedHeap<T> {
    heap: BinaryHeap<Candidate<T>>,
    capacity: usize,
    next_seq: u64,
}

impl<T> BoundedHeap<T> {
    pub fn new(capacity: usize) -> Self {
        Self {
            heap: BinaryHeap::with_capacity(capacity.min(4096)),
            capacity,
            next_seq: 0,
        }
    }

    /// Offer a candidate.
    ///
    /// Below capacity every candidate is kept. At capacity the current worst
    /// candidate is replaced only if `badness` is strictly smaller. Returns
    /// whether the candidate was kept.
    pub fn try_insert(&mut self, item: T, badness: f64) -> bool {
        if self.capacity == 0 {
            return false;
        }
        let seq = self.next_seq;
        self.next_seq += 1;

        if self.heap.len() < self.capacity {
            self.heap.push(Candidate { item, badness, seq });
            return true;
        }

        match self.heap.peek_mut() {
            Some(mut worst) if badness < worst.badness => {
                *worst = Candidate { item, badness, seq };
                true
            }
            _ => false,
        }
    }

    /// Badness of the worst kept candidate
    pub fn worst(&self) -> Option<f64> {
        self.heap.peek().map(|c| c.badness)
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Consume the heap, returning `(item, badness)` best first
    pub fn into_sorted_vec(self) -> Vec<(T, f64)> {
        self.heap
            .into_sorted_vec()
            .into_iter()
            .map(|c| (c.item, c.badness))
            .collect()
    }
}
