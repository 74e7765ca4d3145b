//! Storage Engine
//!
//! Hash-table word vector store with exact lookup and linear-scan
//! neighbour search.

mod hasher;
mod vec_store;

pub use hasher::{bucket_count, bucket_index, word_hash, ENTRIES_PER_BUCKET};
pub use vec_store::{StoreInfo, VecStore};
