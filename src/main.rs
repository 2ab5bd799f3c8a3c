use anyhow::Context;
use clap::{Parser, Subcommand};
use medindex::{
    aggregate, read_raw_records, write_corpus, HashEmbedder, IngestConfig, RetrievalService,
    ServiceConfig, SourceEncoding, DEFAULT_EMBEDDING_DIM,
};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Medication lookup by symptom description over regulatory records
#[derive(Parser, Debug)]
#[command(name = "medindex")]
#[command(about = "Aggregate regulatory drug records and search them by symptoms", long_about = None)]
struct Args {
    /// Log level (trace, debug, info, warn, error); RUST_LOG overrides it
    #[arg(long, default_value = "info", global = true)]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Turn the raw regulatory dataset into the aggregated corpus file
    Aggregate {
        /// Raw dataset path
        #[arg(short, long)]
        input: PathBuf,

        /// Corpus file to write
        #[arg(short, long, default_value = "anvisa_medicamentos.csv")]
        output: PathBuf,

        /// Field separator of the raw dataset
        #[arg(long, default_value = ";", value_parser = parse_delimiter)]
        delimiter: u8,

        /// Character encoding of the raw dataset
        #[arg(long, default_value = "latin-1")]
        encoding: SourceEncoding,
    },

    /// Rank medications for a symptom description
    Search {
        /// Corpus file produced by `aggregate`
        #[arg(short, long, default_value = "anvisa_medicamentos.csv")]
        corpus: PathBuf,

        /// Number of results
        #[arg(short = 'k', long, default_value_t = 5)]
        top_k: usize,

        /// Embedding dimension
        #[arg(long, default_value_t = DEFAULT_EMBEDDING_DIM)]
        dim: usize,

        /// Symptom description
        query: String,
    },

    /// Show the first medication whose name contains the given text
    Details {
        /// Corpus file produced by `aggregate`
        #[arg(short, long, default_value = "anvisa_medicamentos.csv")]
        corpus: PathBuf,

        /// Embedding dimension
        #[arg(long, default_value_t = DEFAULT_EMBEDDING_DIM)]
        dim: usize,

        /// Medication name or fragment
        name: String,
    },
}

fn parse_delimiter(s: &str) -> Result<u8, String> {
    match s.as_bytes() {
        [b] => Ok(*b),
        _ if s == "\\t" => Ok(b'\t'),
        _ => Err(format!("delimiter must be a single ASCII character, got {s:?}")),
    }
}

fn init_tracing(level: &str) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(level))?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
    Ok(())
}

fn load_service(corpus: &Path, dim: usize) -> anyhow::Result<RetrievalService> {
    let embedder = HashEmbedder::new(dim).context("invalid embedding dimension")?;
    let service = RetrievalService::new(Arc::new(embedder), ServiceConfig::default());
    service
        .load_corpus(corpus)
        .with_context(|| format!("loading corpus {}", corpus.display()))?;
    Ok(service)
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_tracing(&args.log_level)?;

    match args.command {
        Command::Aggregate {
            input,
            output,
            delimiter,
            encoding,
        } => {
            let config = IngestConfig {
                delimiter,
                encoding,
                ..IngestConfig::default()
            };
            let rows = read_raw_records(&input, &config)
                .with_context(|| format!("reading {}", input.display()))?;
            let records = aggregate(&rows);
            write_corpus(&output, &records)?;
            info!(
                rows = rows.len(),
                medications = records.len(),
                output = %output.display(),
                "aggregation complete"
            );
        }
        Command::Search {
            corpus,
            top_k,
            dim,
            query,
        } => {
            let service = load_service(&corpus, dim)?;
            let results = service.search_medications(&query, top_k)?;
            for result in results {
                println!("{}", serde_json::to_string(&result)?);
            }
        }
        Command::Details { corpus, dim, name } => {
            let service = load_service(&corpus, dim)?;
            match service.get_details(&name)? {
                Some(view) => println!("{}", serde_json::to_string_pretty(&view)?),
                None => println!("Medication {name:?} not found"),
            }
        }
    }

    Ok(())
}
