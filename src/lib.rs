//! wordvec - In-Memory Word Vector Store
//!
//! Exact word lookup and nearest-neighbour search over a hash-table store,
//! and a sorted table with every pairwise similarity precomputed.

pub mod config;
pub mod error;
pub mod loader;
pub mod metrics;
pub mod protocol;
pub mod session;
pub mod storage;
pub mod table;
pub mod vector;

pub use config::{Selection, StoreConfig, TableConfig, WordFilter};
pub use error::{CommandError, LoadError, QueryError, QueryResult};
pub use loader::{parse_word_vectors, read_word_vectors};
pub use metrics::QueryMetrics;
pub use protocol::{Command, Response};
pub use session::Session;
pub use storage::{StoreInfo, VecStore};
pub use table::{Metric, PairScore, Similarity, TableInfo, Triangle, VecSimTable};
pub use vector::{BoundedHeap, Neighbor, WordVec};
