//! Vector Module
//!
//! Word vector entries, similarity and arithmetic primitives, and the bounded
//! top-k accumulator shared by both stores.

mod arithmetic;
mod entry;
mod similarity;
mod top_k;

pub use arithmetic::{add, average, average_all, subtract, sum_all};
pub use entry::{Neighbor, WordVec};
pub use similarity::{cosine_similarity, dot_product, euclidean_distance, norm, Scalar};
pub use top_k::BoundedHeap;

pub(crate) use entry::write_vector;
pub(crate) use similarity::{cosine_unchecked, euclidean_unchecked};
