//! Query Session
//!
//! Dispatches parsed commands against a store and an optional similarity
//! table, timing every command.

use std::sync::Arc;
use std::time::Instant;
use tracing::debug;

use crate::error::QueryResult;
use crate::metrics::QueryMetrics;
use crate::protocol::{Command, Response};
use crate::storage::VecStore;
use crate::table::{Metric, VecSimTable};

/// Query session over loaded word vectors
pub struct Session {
    store: VecStore,
    table: Option<VecSimTable>,
    metrics: Arc<QueryMetrics>,
}

impl Session {
    pub fn new(store: VecStore, table: Option<VecSimTable>) -> Self {
        Self::with_metrics(store, table, Arc::new(QueryMetrics::new()))
    }

    pub fn with_metrics(
        store: VecStore,
        table: Option<VecSimTable>,
        metrics: Arc<QueryMetrics>,
    ) -> Self {
        Self {
            store,
            table,
            metrics,
        }
    }

    pub fn store(&self) -> &VecStore {
        &self.store
    }

    pub fn table(&self) -> Option<&VecSimTable> {
        self.table.as_ref()
    }

    pub fn metrics(&self) -> &QueryMetrics {
        &self.metrics
    }

    /// Parse and execute one command line
    pub fn execute_line(&self, line: &str) -> Response {
        match Command::parse(line) {
            Ok(cmd) => self.execute(cmd),
            Err(e) => Response::Error(e.to_string()),
        }
    }

    /// Execute a command and return its response
    pub fn execute(&self, cmd: Command) -> Response {
        let start = Instant::now();
        let name = cmd.name();

        let response = self.dispatch(cmd);

        let elapsed = start.elapsed();
        self.metrics.record(name, elapsed, response.is_error());
        debug!(cmd = %name, latency = ?elapsed, "Command executed");
        response
    }

    fn dispatch(&self, cmd: Command) -> Response {
        let store = &self.store;
        match cmd {
            Command::Info => Response::Text(store.info().to_string()),
            Command::Stats => Response::Text(self.metrics.summary()),

            Command::Get { word } => respond(store.get(&word), |v| Response::Vector(v.to_vec())),
            Command::Sim {
                word0,
                word1,
                metric,
            } => respond(store.similarity(&word0, &word1, metric), Response::Number),
            Command::Add { word0, word1 } => {
                respond(store.add_words(&word0, &word1), Response::Vector)
            }
            Command::Sub { word0, word1 } => {
                respond(store.subtract_words(&word0, &word1), Response::Vector)
            }
            Command::Avg { word0, word1 } => {
                respond(store.average_words(&word0, &word1), Response::Vector)
            }

            Command::Closest { word } => {
                respond(store.closest_to_word(&word), |n| Response::neighbors([n]))
            }
            Command::Farthest { word } => {
                respond(store.farthest_from_word(&word), |n| Response::neighbors([n]))
            }
            Command::KClosest { word, k } => {
                respond(store.k_closest_to_word(&word, k), Response::neighbors)
            }
            Command::KFarthest { word, k } => {
                respond(store.k_farthest_from_word(&word, k), Response::neighbors)
            }
            Command::VClosest { vector, k } => {
                respond(store.k_closest(&vector, k, None), Response::neighbors)
            }
            Command::VFarthest { vector, k } => {
                respond(store.k_farthest(&vector, k, None), Response::neighbors)
            }

            table_cmd => match &self.table {
                Some(table) => dispatch_table(table, table_cmd),
                None => Response::Error("No VecSimTable loaded".to_string()),
            },
        }
    }
}

fn dispatch_table(table: &VecSimTable, cmd: Command) -> Response {
    match cmd {
        Command::TableInfo => Response::Text(table.info().to_string()),
        Command::TableGet { word } => {
            respond(table.get_vector(&word), |v| Response::Vector(v.to_vec()))
        }
        Command::TableCos { word0, word1 } => {
            respond(table.score(&word0, &word1, Metric::Cosine), Response::Number)
        }
        Command::TableEucl { word0, word1 } => {
            respond(table.score(&word0, &word1, Metric::Euclidean), Response::Number)
        }
        Command::Pairs {
            word0,
            word1,
            range,
            metric,
        } => respond(
            table.similar_pairs(&word0, &word1, metric, range),
            Response::Pairs,
        ),
        Command::PairsValue {
            value,
            range,
            metric,
        } => Response::Pairs(table.similar_pairs_to_value(value, metric, range)),
        Command::TopPairs {
            word0,
            word1,
            k,
            metric,
        } => respond(
            table.most_similar_pairs(&word0, &word1, metric, k),
            Response::Pairs,
        ),
        Command::TopPairsValue { value, k, metric } => {
            Response::Pairs(table.most_similar_pairs_to_value(value, metric, k))
        }
        other => Response::Error(format!("{} is not a table command", other.name())),
    }
}

fn respond<T, F>(result: QueryResult<T>, render: F) -> Response
where
    F: FnOnce(T) -> Response,
{
    result.map_or_else(Response::from, render)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{StoreConfig, TableConfig};
    use crate::vector::WordVec;

    fn animals() -> Vec<WordVec> {
        vec![
            WordVec::new("cat", vec![1.0, 0.0]),
            WordVec::new("dog", vec![0.9, 0.1]),
            WordVec::new("car", vec![0.0, 1.0]),
        ]
    }

    fn session(with_table: bool) -> Session {
        let store = VecStore::build(animals(), &StoreConfig::default());
        let table_config = TableConfig::leading(true, 1.0);
        let table = with_table.then(|| VecSimTable::build(animals(), &table_config));
        Session::new(store, table)
    }

    #[test]
    fn test_store_commands() {
        let session = session(false);
        assert_eq!(session.execute_line("GET dog"), Response::Vector(vec![0.9, 0.1]));
        assert_eq!(session.execute_line("GET zzz"), Response::Nil);
        match session.execute_line("CLOSEST cat") {
            Response::Neighbors(items) => {
                assert_eq!(items.len(), 1);
                assert_eq!(items[0].0, "dog");
                assert!((items[0].1 - 0.02f64.sqrt()).abs() < 1e-12);
            }
            other => panic!("unexpected response {:?}", other),
        }
        assert_eq!(session.execute_line("ADD cat car"), Response::Vector(vec![1.0, 1.0]));
        match session.execute_line("KCLOSEST cat 5") {
            Response::Neighbors(items) => {
                let words: Vec<&str> = items.iter().map(|(w, _)| w.as_str()).collect();
                assert_eq!(words, vec!["dog", "car"]);
            }
            other => panic!("unexpected response {:?}", other),
        }
    }

    #[test]
    fn test_errors_become_responses() {
        let session = session(false);
        assert!(session.execute_line("VCLOSEST 1 1 0 0").is_error());
        assert!(session.execute_line("BOGUS").is_error());
        assert!(session.execute_line("TCOS cat dog").is_error());
    }

    #[test]
    fn test_table_commands() {
        let session = session(true);
        assert_eq!(session.execute_line("TEUCL cat cat"), Response::Number(0.0));
        assert_eq!(session.execute_line("TCOS cat zzz"), Response::Nil);
        assert!(session.execute_line("PAIRS cat cat 0.1").is_error());
        match session.execute_line("TOPPAIRSV 0 1 eucldist") {
            Response::Pairs(pairs) => {
                assert_eq!(pairs.len(), 1);
                assert_eq!((pairs[0].first.as_str(), pairs[0].second.as_str()), ("cat", "dog"));
            }
            other => panic!("unexpected response {:?}", other),
        }
        assert!(session.execute_line("TINFO").to_string().contains("VecSimTable"));
    }

    #[test]
    fn test_metrics_recorded() {
        let session = session(false);
        session.execute_line("GET cat");
        session.execute_line("INFO");
        session.execute_line("SUB cat");
        assert_eq!(session.metrics().total_queries(), 2);
        assert_eq!(session.metrics().by_command().get("GET"), Some(&1));
        assert!(matches!(
            session.execute_line("STATS"),
            Response::Text(t) if t.starts_with("Queries: 2")
        ));
    }
}
