//! Zoning ordinance batch runner
//!
//! Reads every ordinance text under a directory, runs the extraction batch and
//! writes the result records and the unresolved list as JSON.

mod discover;

use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use zoning_engine::{EngineConfig, KeywordDictionary, VocabularySet, ZoningEngine};
use zoning_types::{ResultRecord, Unresolved};

#[derive(Parser, Debug)]
#[command(name = "zoning-cli")]
#[command(version, about = "Extract land-use signals from zoning ordinance text")]
struct Args {
    /// Directory of ordinance text files
    input: PathBuf,

    /// Keyword weight table: JSON array of 27 keyword-to-weight objects
    #[arg(short, long)]
    keywords: PathBuf,

    /// Engine configuration (TOML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Vocabulary overrides (TOML)
    #[arg(long)]
    vocabulary: Option<PathBuf>,

    /// Output file; stdout when omitted
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// File extensions to read
    #[arg(long, value_delimiter = ',', default_value = "txt")]
    extensions: Vec<String>,
}

#[derive(Serialize)]
struct Report<'a> {
    records: &'a [ResultRecord],
    unresolved: &'a [Unresolved],
}

fn build_engine(args: &Args) -> Result<ZoningEngine> {
    let json = fs::read_to_string(&args.keywords)
        .with_context(|| format!("Failed to read keyword table: {}", args.keywords.display()))?;
    let dictionary = KeywordDictionary::from_json_str(&json).context("Invalid keyword table")?;

    let config = match &args.config {
        Some(path) => EngineConfig::from_file(path)?,
        None => EngineConfig::default(),
    };

    let mut vocab = VocabularySet::builtin()?;
    if let Some(path) = &args.vocabulary {
        let source = fs::read_to_string(path)
            .with_context(|| format!("Failed to read vocabulary overrides: {}", path.display()))?;
        vocab = vocab.with_overrides(&source).context("Invalid vocabulary overrides")?;
    }

    Ok(ZoningEngine::with_vocabularies(Arc::new(dictionary), config, Arc::new(vocab)))
}

fn main() -> Result<()> {
    let args = Args::parse();

    // stdout carries the JSON report
    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let engine = build_engine(&args)?;

    let files = discover::discover(&args.input, &args.extensions);
    tracing::info!("Found {} input files under {}", files.len(), args.input.display());
    let (documents, unreadable) = discover::load_all(&args.input, &files);

    let mut batch = engine.run_batch(documents);
    batch.unresolved.extend(unreadable);
    batch.unresolved.sort_by(|a, b| a.source_id.cmp(&b.source_id));
    let report = Report {
        records: &batch.records,
        unresolved: &batch.unresolved,
    };
    let json = serde_json::to_string_pretty(&report)?;

    match &args.output {
        Some(path) => fs::write(path, json).with_context(|| format!("Failed to write {}", path.display()))?,
        None => println!("{}", json),
    }
    Ok(())
}
