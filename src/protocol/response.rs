//! Query Responses
//!
//! Response variants for command execution results and their text rendering.

use std::fmt;

use crate::error::QueryError;
use crate::table::PairScore;
use crate::vector::{write_vector, Neighbor};

/// Response to a command
#[derive(Debug, Clone, PartialEq)]
pub enum Response {
    /// Nothing found
    Nil,

    /// Single score
    Number(f64),

    /// Vector value
    Vector(Vec<f64>),

    /// Words with their distance to the query, best first
    Neighbors(Vec<(String, f64)>),

    /// Word pairs with their scores
    Pairs(Vec<PairScore>),

    /// Multi-line report (INFO, TINFO, STATS)
    Text(String),

    /// Error response
    Error(String),
}

impl Response {
    pub fn is_error(&self) -> bool {
        matches!(self, Response::Error(_))
    }

    pub fn neighbors<'a, I>(neighbors: I) -> Self
    where
        I: IntoIterator<Item = Neighbor<'a>>,
    {
        Response::Neighbors(
            neighbors
                .into_iter()
                .map(|n| (n.word().to_string(), n.distance))
                .collect(),
        )
    }
}

impl From<QueryError> for Response {
    fn from(err: QueryError) -> Self {
        match err {
            QueryError::NotFound(_) | QueryError::NoCandidates => Response::Nil,
            other => Response::Error(other.to_string()),
        }
    }
}

impl fmt::Display for Response {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Response::Nil => write!(f, "(nil)"),
            Response::Number(x) => write!(f, "(number) {}", x),
            Response::Vector(v) => write_vector(f, v),
            Response::Neighbors(items) if items.is_empty() => write!(f, "(empty list)"),
            Response::Neighbors(items) => {
                for (i, (word, distance)) in items.iter().enumerate() {
                    if i > 0 {
                        writeln!(f)?;
                    }
                    write!(f, "{}) \"{}\" {}", i + 1, word, distance)?;
                }
                Ok(())
            }
            Response::Pairs(items) if items.is_empty() => write!(f, "(empty list)"),
            Response::Pairs(items) => {
                for (i, pair) in items.iter().enumerate() {
                    if i > 0 {
                        writeln!(f)?;
                    }
                    write!(f, "{}) {}", i + 1, pair)?;
                }
                Ok(())
            }
            Response::Text(text) => write!(f, "{}", text),
            Response::Error(msg) => write!(f, "(error) {}", msg),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(Response::Nil.to_string(), "(nil)");
        assert_eq!(Response::Number(0.5).to_string(), "(number) 0.5");
        assert_eq!(Response::Vector(vec![1.0, 0.5]).to_string(), "[1 0.5]");
        assert_eq!(Response::Error("boom".into()).to_string(), "(error) boom");
        assert_eq!(Response::Neighbors(vec![]).to_string(), "(empty list)");
    }

    #[test]
    fn test_list_display() {
        let response = Response::Neighbors(vec![("dog".into(), 0.25), ("car".into(), 1.5)]);
        assert_eq!(response.to_string(), "1) \"dog\" 0.25\n2) \"car\" 1.5");

        let response = Response::Pairs(vec![PairScore {
            first: "bus".into(),
            second: "car".into(),
            score: 0.75,
        }]);
        assert_eq!(response.to_string(), "1) \"bus\" / \"car\": 0.75");
    }

    #[test]
    fn test_from_query_error() {
        assert_eq!(Response::from(QueryError::not_found("zzz")), Response::Nil);
        assert_eq!(Response::from(QueryError::NoCandidates), Response::Nil);
        assert!(Response::from(QueryError::EmptyInput).is_error());
        assert_eq!(
            Response::from(QueryError::DimensionMismatch {
                expected: 2,
                actual: 3
            })
            .to_string(),
            "(error) Dimension mismatch: expected 2, got 3"
        );
    }
}
