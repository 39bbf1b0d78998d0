//! Demonstration/benchmark CLI for the similarity index: build an index
//! over N random hashes, then report insert/query timings.

use clap::Parser;
use pdqsim::{BackendKind, Index};
use rand::Rng;
use std::time::Instant;

#[derive(Parser, Debug)]
#[command(author, version, about = "Benchmarks the PDQ similarity index.", long_about = None)]
struct Cli {
    /// Number of random hashes to insert.
    #[arg(long, default_value_t = 100_000)]
    count: usize,

    /// Backend to build: flat or multi-index.
    #[arg(long, default_value = "multi-index")]
    backend: String,

    /// Hamming distance threshold for queries.
    #[arg(long)]
    threshold: Option<u32>,

    /// How many of the inserted hashes to re-query afterward.
    #[arg(long, default_value_t = 1_000)]
    queries: usize,
}

fn main() {
    let args = Cli::parse();

    let backend_kind = match args.backend.as_str() {
        "flat" => BackendKind::Flat,
        "multi-index" | "mih" => BackendKind::MultiIndex,
        other => {
            eprintln!("unknown backend {other:?}, expected \"flat\" or \"multi-index\"");
            std::process::exit(1);
        }
    };
    let threshold = args.threshold.unwrap_or(match backend_kind {
        BackendKind::Flat => pdqsim::DEFAULT_FLAT_THRESHOLD,
        BackendKind::MultiIndex => pdqsim::DEFAULT_MULTI_INDEX_THRESHOLD,
    });

    let mut index: Index<u32> = Index::new(threshold, backend_kind).expect("valid threshold");
    let mut rng = rand::rng();

    println!("Inserting {} random hashes ({:?} backend, threshold {})...", args.count, backend_kind, threshold);
    let mut sample_hashes = Vec::with_capacity(args.queries);
    let insert_start = Instant::now();
    for i in 0..args.count as u32 {
        let bytes: [u8; 32] = rng.random();
        let hex = hex::encode(bytes);
        if sample_hashes.len() < args.queries {
            sample_hashes.push(hex.clone());
        }
        index.add(&hex, i).expect("randomly generated hashes are always well-formed");
    }
    println!("Insert took {:.2?} ({} distinct).", insert_start.elapsed(), index.len());

    let query_start = Instant::now();
    let mut self_hits = 0usize;
    for hash in &sample_hashes {
        let matches = index.query(hash).expect("sample hashes are well-formed");
        if matches.iter().any(|m| m.distance == 0) {
            self_hits += 1;
        }
    }
    println!(
        "Queried {} hashes in {:.2?} ({self_hits}/{} found themselves).",
        sample_hashes.len(),
        query_start.elapsed(),
        sample_hashes.len(),
    );
}
