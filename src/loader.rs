//! Word Vector File Loader
//!
//! Reads text files with one `word v1 v2 ... vn` entry per line. The
//! dimension is taken from the first non-blank line; every other line must
//! carry the same number of values.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use tracing::{debug, info};

use crate::error::LoadError;
use crate::vector::WordVec;

/// Read all word vectors of a file, in file order
pub fn read_word_vectors(path: impl AsRef<Path>) -> Result<Vec<WordVec>, LoadError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    info!("Loading word vectors from {}", path.display());
    let entries = parse_word_vectors(BufReader::new(file))?;
    info!(
        "Loaded {} word vectors of dimension {}",
        entries.len(),
        entries.first().map(WordVec::dim).unwrap_or(0)
    );
    Ok(entries)
}

/// Parse word vectors from any buffered reader
pub fn parse_word_vectors<R: BufRead>(reader: R) -> Result<Vec<WordVec>, LoadError> {
    let mut entries = Vec::new();
    let mut dimension: Option<usize> = None;

    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        let line_no = idx + 1;
        let mut tokens = line.split_whitespace();

        let Some(word) = tokens.next() else {
            debug!(line = line_no, "Skipping blank line");
            continue;
        };

        let vector = tokens
            .map(|t| {
                t.parse::<f64>().map_err(|_| LoadError::Malformed {
                    line: line_no,
                    reason: format!("\"{}\" is not a number", t),
                })
            })
            .collect::<Result<Vec<f64>, LoadError>>()?;

        match dimension {
            None => {
                if vector.is_empty() {
                    return Err(LoadError::Malformed {
                        line: line_no,
                        reason: format!("\"{}\" has no vector values", word),
                    });
                }
                dimension = Some(vector.len());
            }
            Some(dim) if dim != vector.len() => {
                return Err(LoadError::Malformed {
                    line: line_no,
                    reason: format!("expected {} values, got {}", dim, vector.len()),
                });
            }
            Some(_) => {}
        }

        entries.push(WordVec::new(word, vector));
    }

    if entries.is_empty() {
        return Err(LoadError::Empty);
    }
    Ok(entries)
}
