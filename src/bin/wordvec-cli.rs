//! wordvec CLI
//!
//! Loads a word vector file and answers queries interactively.

use clap::Parser;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};
use wordvec::{read_word_vectors, Session, StoreConfig, TableConfig, VecSimTable, VecStore};

/// wordvec CLI - Word Vector Query Shell
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Word vector file, one `word v1 ... vn` entry per line
    file: PathBuf,

    /// Lower-case every word at load and query time
    #[arg(short = 'i', long)]
    case_insensitive: bool,

    /// Fraction of the leading entries the store keeps
    #[arg(short, long, default_value_t = 1.0)]
    retention: f64,

    /// Build a similarity table over the words matching this pattern
    #[arg(long, conflicts_with = "table_retention")]
    table_pattern: Option<String>,

    /// Build a similarity table over this fraction of the leading entries
    #[arg(long)]
    table_retention: Option<f64>,

    /// Run a single command and exit
    #[arg(short, long)]
    exec: Option<String>,
}

fn main() -> anyhow::Result<()> {
    // logs go to stderr so query output stays clean
    fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("wordvec=info".parse()?))
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();
    let entries = read_word_vectors(&args.file)?;

    let store_config = StoreConfig::default()
        .with_case_sensitive(!args.case_insensitive)
        .with_retention(args.retention);
    let table_config = match (&args.table_pattern, args.table_retention) {
        (Some(pattern), _) => Some(TableConfig::with_pattern(pattern)?),
        (None, Some(retention)) => Some(TableConfig::leading(!args.case_insensitive, retention)),
        (None, None) => None,
    };

    let table = table_config.map(|config| VecSimTable::build(entries.clone(), &config));
    let store = VecStore::build(entries, &store_config);
    if !store.is_valid() {
        anyhow::bail!("{} holds no usable word vectors", args.file.display());
    }
    info!("Ready: {} word vectors of dimension {}", store.len(), store.dimension());

    let session = Session::new(store, table);

    if let Some(line) = &args.exec {
        println!("{}", session.execute_line(line));
        return Ok(());
    }

    println!("Type 'help' for available commands, 'quit' to exit.\n");

    let stdin = io::stdin();
    let mut input = String::new();
    loop {
        print!("wordvec> ");
        io::stdout().flush()?;

        input.clear();
        if stdin.lock().read_line(&mut input)? == 0 {
            break;
        }
        let line = input.trim();

        if line.is_empty() {
            continue;
        }

        if line.eq_ignore_ascii_case("quit") || line.eq_ignore_ascii_case("exit") {
            println!("Goodbye!");
            break;
        }

        if line.eq_ignore_ascii_case("help") {
            print_help();
            continue;
        }

        println!("{}", session.execute_line(line));
    }

    info!("{}", session.metrics().summary());
    Ok(())
}

fn print_help() {
    println!(
        r#"
Available commands:

  INFO                          - Store statistics
  GET <word>                    - Vector of a word
  SIM <w0> <w1> [mode]          - Cosine similarity (or Euclidean distance, mode "eucldist")
  ADD | SUB | AVG <w0> <w1>     - Vector arithmetic on two words
  CLOSEST | FARTHEST <word>     - Nearest / farthest other word
  KCLOSEST | KFARTHEST <word> <k>
                                - k nearest / farthest other words
  VCLOSEST | VFARTHEST <k> <v1> ... <vn>
                                - k words nearest to / farthest from a vector

  TINFO                         - Similarity table statistics
  TGET <word>                   - Vector of a word in the table
  TCOS | TEUCL <w0> <w1>        - Precomputed cosine similarity / Euclidean distance
  PAIRS <w0> <w1> <range> [mode]
                                - Pairs scoring within range of a pair
  PAIRSV <value> <range> [mode] - Pairs scoring within range of a value
  TOPPAIRS <w0> <w1> <k> [mode] - k pairs scoring closest to a pair
  TOPPAIRSV <value> <k> [mode]  - k pairs scoring closest to a value

  STATS                         - Session metrics
  help                          - Show this help
  quit / exit                   - Exit the CLI

Examples:
  KCLOSEST Haus 5
  SUB Koenig Mann
  PAIRS Mann Frau 0.05 eucldist
"#
    );
}
