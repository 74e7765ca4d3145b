//! Bucket Hashing
//!
//! Order-sensitive word hash: every character's code point is multiplied by
//! a prime taken cyclically from a fixed table and the products are summed.

/// Multipliers applied to consecutive characters, reused cyclically
const PRIMES: [u64; 10] = [179, 181, 191, 193, 197, 199, 211, 223, 227, 229];

/// Average number of entries per bucket the table is sized for
pub const ENTRIES_PER_BUCKET: usize = 20;

/// Hash of a word
#[inline]
pub fn word_hash(word: &str) -> u64 {
    word.chars()
        .zip(PRIMES.iter().cycle())
        .fold(0u64, |hash, (c, &prime)| {
            hash.wrapping_add((c as u64).wrapping_mul(prime))
        })
}

/// Bucket a word belongs to
#[inline]
pub fn bucket_index(word: &str, bucket_count: usize) -> usize {
    if bucket_count == 0 {
        return 0;
    }
    (word_hash(word) % bucket_count as u64) as usize
}

/// Number of buckets for a store of `entries` entries (at least 1, never resized)
pub fn bucket_count(entries: usize) -> usize {
    (entries / ENTRIES_PER_BUCKET).max(1)
}
