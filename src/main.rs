use anyhow::{Context, Result};
use clap::Parser;
use generalized_suffix_array::{CorpusIndex, Thresholds};
use serde::Serialize;
use std::{fs, path::PathBuf};
use tracing::Level;

/// Report which corpus strings share a long common substring with each query
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the corpus, one string per line
    #[arg(short, long)]
    corpus: PathBuf,

    /// Query string; may be given more than once
    #[arg(short, long = "query", required = true)]
    queries: Vec<String>,

    /// Minimum overlap length in characters
    #[arg(long)]
    min_chars: Option<usize>,

    /// Minimum overlap as a fraction of the query length
    #[arg(long)]
    min_pct: Option<f64>,

    /// Log index construction and query details to stderr
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Serialize)]
struct Match<'a> {
    index: usize,
    overlap: usize,
    text: &'a str,
}

#[derive(Serialize)]
struct QueryResult<'a> {
    query: &'a str,
    matches: Vec<Match<'a>>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_max_level(if args.verbose { Level::DEBUG } else { Level::WARN })
        .with_writer(std::io::stderr)
        .init();

    let contents = fs::read_to_string(&args.corpus)
        .with_context(|| format!("reading corpus {}", args.corpus.display()))?;
    let lines = contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty());

    let index = CorpusIndex::new(lines).context("building index")?;
    let thresholds = Thresholds::new(args.min_chars, args.min_pct);
    let results = index.batch_similar(&args.queries, &thresholds)?;

    for (query, found) in args.queries.iter().zip(results) {
        let mut matches = found
            .into_iter()
            .map(|(i, overlap)| {
                anyhow::Ok(Match {
                    index: i,
                    overlap,
                    text: index.get(i)?,
                })
            })
            .collect::<Result<Vec<_>>>()?;
        matches.sort_by(|a, b| b.overlap.cmp(&a.overlap).then(a.index.cmp(&b.index)));

        println!("{}", serde_json::to_string(&QueryResult { query, matches })?);
    }
    Ok(())
}
