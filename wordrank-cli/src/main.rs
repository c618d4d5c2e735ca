use anyhow::{Context, Result};
use clap::Parser;
use serde::Deserialize;
use std::fs::{self, File};
use std::io::{BufRead, BufReader};
use tracing_subscriber::{fmt, EnvFilter};
use wordrank_core::{process_queries, remove_duplicates, DocumentStatus, SearchIndex};

#[derive(Parser)]
#[command(name = "wordrank")]
#[command(about = "Rank documents against queries with TF-IDF", long_about = None)]
struct Cli {
    /// File with whitespace-separated stop words
    #[arg(long)]
    stop_words: String,
    /// JSONL corpus: {"id": 0, "text": "...", "status": "ACTUAL", "ratings": [1, 2]}
    #[arg(long)]
    corpus: String,
    /// Remove duplicate documents before answering queries
    #[arg(long, default_value_t = false)]
    dedup: bool,
    /// Queries to answer
    #[arg(required = true)]
    queries: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct InputDoc {
    id: i32,
    text: String,
    status: DocumentStatus,
    #[serde(default)]
    ratings: Vec<i32>,
}

fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let args = Cli::parse();

    let stop_words = fs::read_to_string(&args.stop_words)
        .with_context(|| format!("reading stop words from {}", args.stop_words))?;
    let mut index = SearchIndex::from_stop_words_text(&stop_words)?;

    let corpus = File::open(&args.corpus).with_context(|| format!("opening corpus {}", args.corpus))?;
    let mut added = 0usize;
    let mut skipped = 0usize;
    for (line_no, line) in BufReader::new(corpus).lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let doc: InputDoc =
            serde_json::from_str(&line).with_context(|| format!("corpus line {}", line_no + 1))?;
        // Report-and-skip: one rejected document does not abort the batch.
        match index.add_document(doc.id, &doc.text, doc.status, &doc.ratings) {
            Ok(()) => added += 1,
            Err(err) => {
                tracing::warn!(document_id = doc.id, %err, "skipping document");
                skipped += 1;
            }
        }
    }
    tracing::info!(added, skipped, "corpus loaded");

    if args.dedup {
        let removed = remove_duplicates(&mut index);
        for id in &removed {
            println!("Found duplicate document id {id}");
        }
        tracing::info!(removed = removed.len(), "duplicate removal complete");
    }

    let results = process_queries(&index, &args.queries)?;
    for (query, documents) in args.queries.iter().zip(results) {
        println!("query: {query}");
        for document in documents {
            println!("{document}");
        }
    }
    Ok(())
}
