//! Neardup CLI - near-duplicate scanning over text corpora.
//!
//! Reads `id<TAB>text` records, builds MinHash signatures, and reports
//! document pairs whose estimated Jaccard similarity meets a threshold.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use serde::Serialize;

use neardup_rs::io::{checkpoint, ingest};
use neardup_rs::{DocumentId, EngineConfig, NearDupEngine};

#[derive(Parser)]
#[command(name = "neardup", version, about = "MinHash near-duplicate detection")]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Scan a corpus and report all near-duplicate pairs
    Scan(ScanArgs),

    /// List documents similar to one document in a corpus
    Similar(SimilarArgs),
}

#[derive(Args)]
struct CorpusArgs {
    /// Corpus file with one `id<TAB>text` record per line
    #[arg(short, long)]
    input: PathBuf,

    /// Minimum Jaccard similarity to report
    #[arg(short, long, default_value_t = 0.5)]
    threshold: f64,

    /// Shingle window size in characters
    #[arg(long, default_value_t = 10)]
    window_size: usize,

    /// Disable the LSH bucket index and fall back to the full pairwise scan
    #[arg(long)]
    no_index: bool,

    /// Emit JSON instead of text
    #[arg(long)]
    json: bool,
}

#[derive(Args)]
struct ScanArgs {
    #[command(flatten)]
    corpus: CorpusArgs,

    /// Write the characteristic matrix to this JSON checkpoint after signing
    #[arg(long)]
    checkpoint: Option<PathBuf>,
}

#[derive(Args)]
struct SimilarArgs {
    #[command(flatten)]
    corpus: CorpusArgs,

    /// Document id to query
    #[arg(long)]
    id: String,
}

#[derive(Serialize)]
struct DuplicatePair {
    score: f64,
    id_a: String,
    id_b: String,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let log_level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };

    tracing_subscriber::fmt()
        .with_max_level(log_level)
        .with_target(false)
        .init();

    match cli.command {
        Commands::Scan(args) => scan_command(args)?,
        Commands::Similar(args) => similar_command(args)?,
    }

    Ok(())
}

fn build_engine(args: &CorpusArgs) -> anyhow::Result<NearDupEngine> {
    let config = EngineConfig::default()
        .with_window_size(args.window_size)
        .with_similarity_threshold(args.threshold)
        .with_bucket_index(!args.no_index);

    let mut engine = NearDupEngine::new(config)?;
    let records = ingest::read_corpus(&args.input)?;
    tracing::info!(documents = records.len(), "signing corpus");
    engine.add_batch(records);

    Ok(engine)
}

fn scan_command(args: ScanArgs) -> anyhow::Result<()> {
    let engine = build_engine(&args.corpus)?;

    if let Some(path) = &args.checkpoint {
        checkpoint::save_matrix(engine.matrix(), path)?;
        tracing::info!(path = %path.display(), "checkpoint written");
    }

    let clusters = engine.all_similar(args.corpus.threshold)?;

    // Each pair appears under both ids; keep the lexicographically ordered one.
    let mut pairs = Vec::new();
    for (id, matches) in &clusters {
        for m in matches {
            if id < &m.id {
                pairs.push(DuplicatePair {
                    score: m.score,
                    id_a: id.to_string(),
                    id_b: m.id.to_string(),
                });
            }
        }
    }

    if args.corpus.json {
        println!("{}", serde_json::to_string_pretty(&pairs)?);
    } else {
        for pair in &pairs {
            println!("{:.4}\t{}\t{}", pair.score, pair.id_a, pair.id_b);
        }
        tracing::info!(pairs = pairs.len(), "scan complete");
    }

    Ok(())
}

fn similar_command(args: SimilarArgs) -> anyhow::Result<()> {
    let engine = build_engine(&args.corpus)?;
    let id = DocumentId::from(args.id.as_str());
    let matches = engine.get_similar(&id, args.corpus.threshold)?;

    if args.corpus.json {
        println!("{}", serde_json::to_string_pretty(&matches)?);
    } else {
        for m in &matches {
            println!("{:.4}\t{}", m.score, m.id);
        }
    }

    Ok(())
}
