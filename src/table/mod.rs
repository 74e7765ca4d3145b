//! Similarity Table
//!
//! Sorted word vectors with every pairwise score precomputed, queried by
//! word pair or by raw score.

mod metric;
mod sim_table;
mod triangle;

pub use metric::Metric;
pub use sim_table::{PairScore, Similarity, TableInfo, VecSimTable};
pub use triangle::Triangle;
