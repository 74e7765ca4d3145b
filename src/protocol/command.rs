//! Query Command Parsing
//!
//! Parses whitespace-separated text commands. Command names are
//! case-insensitive; words are passed through unchanged.

use std::str::FromStr;

use crate::error::CommandError;
use crate::table::Metric;

/// Parsed query command
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Store statistics
    Info,

    /// Vector of a word
    Get { word: String },

    /// Cosine similarity or Euclidean distance of two words
    Sim {
        word0: String,
        word1: String,
        metric: Metric,
    },

    /// Sum of two word vectors
    Add { word0: String, word1: String },

    /// Difference of two word vectors
    Sub { word0: String, word1: String },

    /// Mean of two word vectors
    Avg { word0: String, word1: String },

    /// Nearest other word
    Closest { word: String },

    /// Farthest other word
    Farthest { word: String },

    /// `k` nearest other words
    KClosest { word: String, k: usize },

    /// `k` farthest other words
    KFarthest { word: String, k: usize },

    /// `k` words nearest to a raw vector
    VClosest { vector: Vec<f64>, k: usize },

    /// `k` words farthest from a raw vector
    VFarthest { vector: Vec<f64>, k: usize },

    /// Similarity table statistics
    TableInfo,

    /// Vector of a word in the similarity table
    TableGet { word: String },

    /// Precomputed cosine similarity
    TableCos { word0: String, word1: String },

    /// Precomputed Euclidean distance
    TableEucl { word0: String, word1: String },

    /// Pairs scoring within `range` of a word pair
    Pairs {
        word0: String,
        word1: String,
        range: f64,
        metric: Metric,
    },

    /// Pairs scoring within `range` of a value
    PairsValue { value: f64, range: f64, metric: Metric },

    /// `k` pairs scoring closest to a word pair
    TopPairs {
        word0: String,
        word1: String,
        k: usize,
        metric: Metric,
    },

    /// `k` pairs scoring closest to a value
    TopPairsValue { value: f64, k: usize, metric: Metric },

    /// Session metrics
    Stats,
}

impl Command {
    /// Parse a command line
    pub fn parse(input: &str) -> Result<Self, CommandError> {
        let parts: Vec<&str> = input.split_whitespace().collect();
        let Some(name) = parts.first() else {
            return Err(CommandError::Empty);
        };
        let args = &parts[1..];
        let name = name.to_uppercase();

        match name.as_str() {
            "INFO" => Ok(Command::Info),
            "STATS" => Ok(Command::Stats),
            "TINFO" => Ok(Command::TableInfo),

            "GET" => {
                let [word] = args else {
                    return Err(CommandError::Usage("GET <word>"));
                };
                Ok(Command::Get { word: word.to_string() })
            }

            "SIM" => match args {
                [word0, word1, mode @ ..] => Ok(Command::Sim {
                    word0: word0.to_string(),
                    word1: word1.to_string(),
                    metric: Metric::from_mode(&mode.join(" ")),
                }),
                _ => Err(CommandError::Usage("SIM <word0> <word1> [mode]")),
            },

            "ADD" | "SUB" | "AVG" | "TCOS" | "TEUCL" => {
                let [word0, word1] = args else {
                    return Err(CommandError::Usage(match name.as_str() {
                        "ADD" => "ADD <word0> <word1>",
                        "SUB" => "SUB <minuend> <subtrahend>",
                        "AVG" => "AVG <word0> <word1>",
                        "TCOS" => "TCOS <word0> <word1>",
                        _ => "TEUCL <word0> <word1>",
                    }));
                };
                let (word0, word1) = (word0.to_string(), word1.to_string());
                Ok(match name.as_str() {
                    "ADD" => Command::Add { word0, word1 },
                    "SUB" => Command::Sub { word0, word1 },
                    "AVG" => Command::Avg { word0, word1 },
                    "TCOS" => Command::TableCos { word0, word1 },
                    _ => Command::TableEucl { word0, word1 },
                })
            }

            "CLOSEST" | "FARTHEST" | "TGET" => {
                let [word] = args else {
                    return Err(CommandError::Usage(match name.as_str() {
                        "CLOSEST" => "CLOSEST <word>",
                        "FARTHEST" => "FARTHEST <word>",
                        _ => "TGET <word>",
                    }));
                };
                let word = word.to_string();
                Ok(match name.as_str() {
                    "CLOSEST" => Command::Closest { word },
                    "FARTHEST" => Command::Farthest { word },
                    _ => Command::TableGet { word },
                })
            }

            "KCLOSEST" | "KFARTHEST" => {
                let [word, k] = args else {
                    return Err(CommandError::Usage(if name == "KCLOSEST" {
                        "KCLOSEST <word> <k>"
                    } else {
                        "KFARTHEST <word> <k>"
                    }));
                };
                let (word, k) = (word.to_string(), number(k)?);
                Ok(if name == "KCLOSEST" {
                    Command::KClosest { word, k }
                } else {
                    Command::KFarthest { word, k }
                })
            }

            "VCLOSEST" | "VFARTHEST" => {
                let [k, values @ ..] = args else {
                    return Err(CommandError::Usage("VCLOSEST|VFARTHEST <k> <v1> ... <vn>"));
                };
                if values.is_empty() {
                    return Err(CommandError::Usage("VCLOSEST|VFARTHEST <k> <v1> ... <vn>"));
                }
                let k = number(k)?;
                let vector = values
                    .iter()
                    .map(|v| number(v))
                    .collect::<Result<Vec<f64>, CommandError>>()?;
                Ok(if name == "VCLOSEST" {
                    Command::VClosest { vector, k }
                } else {
                    Command::VFarthest { vector, k }
                })
            }

            "PAIRS" | "TOPPAIRS" => match args {
                [word0, word1, n, mode @ ..] => {
                    let (word0, word1) = (word0.to_string(), word1.to_string());
                    let metric = Metric::from_mode(&mode.join(" "));
                    Ok(if name == "PAIRS" {
                        Command::Pairs {
                            word0,
                            word1,
                            range: number(n)?,
                            metric,
                        }
                    } else {
                        Command::TopPairs {
                            word0,
                            word1,
                            k: number(n)?,
                            metric,
                        }
                    })
                }
                _ if name == "PAIRS" => {
                    Err(CommandError::Usage("PAIRS <word0> <word1> <range> [mode]"))
                }
                _ => Err(CommandError::Usage("TOPPAIRS <word0> <word1> <k> [mode]")),
            },

            "PAIRSV" | "TOPPAIRSV" => match args {
                [value, n, mode @ ..] => {
                    let value = number(value)?;
                    let metric = Metric::from_mode(&mode.join(" "));
                    Ok(if name == "PAIRSV" {
                        Command::PairsValue {
                            value,
                            range: number(n)?,
                            metric,
                        }
                    } else {
                        Command::TopPairsValue {
                            value,
                            k: number(n)?,
                            metric,
                        }
                    })
                }
                _ if name == "PAIRSV" => Err(CommandError::Usage("PAIRSV <value> <range> [mode]")),
                _ => Err(CommandError::Usage("TOPPAIRSV <value> <k> [mode]")),
            },

            _ => Err(CommandError::Unknown(name)),
        }
    }

    /// Command name used for metrics and logging
    pub fn name(&self) -> &'static str {
        match self {
            Command::Info => "INFO",
            Command::Get { .. } => "GET",
            Command::Sim { .. } => "SIM",
            Command::Add { .. } => "ADD",
            Command::Sub { .. } => "SUB",
            Command::Avg { .. } => "AVG",
            Command::Closest { .. } => "CLOSEST",
            Command::Farthest { .. } => "FARTHEST",
            Command::KClosest { .. } => "KCLOSEST",
            Command::KFarthest { .. } => "KFARTHEST",
            Command::VClosest { .. } => "VCLOSEST",
            Command::VFarthest { .. } => "VFARTHEST",
            Command::TableInfo => "TINFO",
            Command::TableGet { .. } => "TGET",
            Command::TableCos { .. } => "TCOS",
            Command::TableEucl { .. } => "TEUCL",
            Command::Pairs { .. } => "PAIRS",
            Command::PairsValue { .. } => "PAIRSV",
            Command::TopPairs { .. } => "TOPPAIRS",
            Command::TopPairsValue { .. } => "TOPPAIRSV",
            Command::Stats => "STATS",
        }
    }
}

impl FromStr for Command {
    type Err = CommandError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Command::parse(s)
    }
}

fn number<T: FromStr>(token: &str) -> Result<T, CommandError> {
    token
        .parse()
        .map_err(|_| CommandError::InvalidNumber(token.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_commands() {
        assert_eq!(Command::parse("info").unwrap(), Command::Info);
        assert_eq!(Command::parse("  STATS ").unwrap(), Command::Stats);
        assert_eq!(
            Command::parse("get Haus").unwrap(),
            Command::Get {
                word: "Haus".to_string()
            }
        );
    }

    #[test]
    fn test_metric_argument() {
        let cmd = Command::parse("SIM cat dog eucl_dist").unwrap();
        assert!(matches!(cmd, Command::Sim { metric: Metric::Euclidean, .. }));
        let cmd = Command::parse("SIM cat dog").unwrap();
        assert!(matches!(cmd, Command::Sim { metric: Metric::Cosine, .. }));
    }

    #[test]
    fn test_k_and_vector_arguments() {
        assert_eq!(
            Command::parse("KCLOSEST cat 3").unwrap(),
            Command::KClosest {
                word: "cat".to_string(),
                k: 3
            }
        );
        assert_eq!(
            Command::parse("VCLOSEST 2 1 0.5").unwrap(),
            Command::VClosest {
                vector: vec![1.0, 0.5],
                k: 2
            }
        );
        assert_eq!(
            Command::parse("KCLOSEST cat three"),
            Err(CommandError::InvalidNumber("three".to_string()))
        );
        assert_eq!(
            Command::parse("KFARTHEST cat -1").unwrap_err(),
            CommandError::InvalidNumber("-1".to_string())
        );
    }

    #[test]
    fn test_mode_spanning_several_tokens() {
        let cmd = Command::parse("SIM Mann Frau Euclidean Distance").unwrap();
        assert!(matches!(cmd, Command::Sim { metric: Metric::Euclidean, .. }));
        let cmd = Command::parse("PAIRS Mann Frau 0.1 Euclidean Distance").unwrap();
        assert!(matches!(cmd, Command::Pairs { metric: Metric::Euclidean, .. }));
        let cmd = Command::parse("TOPPAIRSV 0.5 3 eucl dist").unwrap();
        assert!(matches!(cmd, Command::TopPairsValue { metric: Metric::Euclidean, k: 3, .. }));
        let cmd = Command::parse("SIM Mann Frau Euclidean Distance please").unwrap();
        assert!(matches!(cmd, Command::Sim { metric: Metric::Cosine, .. }));
    }

    #[test]
    fn test_pair_commands() {
        assert_eq!(
            Command::parse("PAIRS Mann Frau 0.05").unwrap(),
            Command::Pairs {
                word0: "Mann".to_string(),
                word1: "Frau".to_string(),
                range: 0.05,
                metric: Metric::Cosine,
            }
        );
        assert_eq!(
            Command::parse("toppairsv 0.5 4 EuclideanDistance").unwrap(),
            Command::TopPairsValue {
                value: 0.5,
                k: 4,
                metric: Metric::Euclidean,
            }
        );
    }

    #[test]
    fn test_errors() {
        assert_eq!(Command::parse("   "), Err(CommandError::Empty));
        assert_eq!(
            Command::parse("fly me"),
            Err(CommandError::Unknown("FLY".to_string()))
        );
        assert!(matches!(Command::parse("GET"), Err(CommandError::Usage(_))));
        assert!(matches!(Command::parse("ADD cat"), Err(CommandError::Usage(_))));
        assert!(matches!(Command::parse("VCLOSEST 3"), Err(CommandError::Usage(_))));
        assert!(matches!(Command::parse("PAIRSV 0.5"), Err(CommandError::Usage(_))));
    }

    #[test]
    fn test_name_round_trips() {
        for line in ["INFO", "TGET cat", "TCOS a b", "TOPPAIRS a b 2", "VFARTHEST 1 0"] {
            let cmd: Command = line.parse().unwrap();
            assert_eq!(cmd.name(), line.split_whitespace().next().unwrap());
        }
    }
}
