//! # jsonsearch
//!
//! Semantic search over a directory of JSON documents. Every string value
//! longer than the minimum becomes a chunk; chunks are embedded once, put in
//! an exact squared-L2 index, and the query's nearest chunks are printed as
//! a JSON array.
//!
//! ```bash
//! jsonsearch --query "how do I look up a tweet" --top_k 3
//! jsonsearch --root ./my-collections --query "rate limits" --fake-embeddings
//! ```

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use jsonsearch_core::config::Settings;
use jsonsearch_core::corpus::CorpusLoader;
use jsonsearch_core::error::Error;
use jsonsearch_core::types::QueryResult;
use jsonsearch_embed::get_default_embedder;
use jsonsearch_vector::{IndexBuilder, QueryEngine};

#[derive(Debug, Parser)]
#[command(name = "jsonsearch")]
#[command(about = "Semantic search over a directory of JSON documents")]
#[command(version)]
pub struct Cli {
    /// Free-text query
    #[arg(long)]
    pub query: String,

    /// Number of results to return [default: search.top_k, 5]
    #[arg(long = "top_k", visible_alias = "top-k", value_parser = clap::value_parser!(u32).range(1..))]
    pub top_k: Option<u32>,

    /// Directory scanned recursively for *.json documents
    #[arg(long)]
    pub root: Option<PathBuf>,

    /// Local directory holding the sentence-transformer weights
    #[arg(long)]
    pub model_dir: Option<PathBuf>,

    /// Use the deterministic hashing embedder instead of the model
    #[arg(long)]
    pub fake_embeddings: bool,

    /// Enable debug logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// Overlays command-line flags on the loaded settings and revalidates.
    pub fn apply(&self, mut settings: Settings) -> Result<Settings> {
        if let Some(k) = self.top_k {
            settings.search.top_k = k as usize;
        }
        if let Some(root) = &self.root {
            settings.corpus.root = root.display().to_string();
        }
        if let Some(dir) = &self.model_dir {
            settings.embed.model_dir = Some(dir.display().to_string());
        }
        if self.fake_embeddings {
            settings.embed.fake = true;
        }
        settings.validate()?;
        Ok(settings)
    }
}

/// Logs go to stderr so stdout carries only the JSON result.
pub fn init_tracing(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| level.into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

/// Load the corpus, build the index and answer `query`.
pub fn run(query: &str, settings: &Settings) -> Result<Vec<QueryResult>> {
    let root = settings.corpus_root();

    info!("Loading documentation...");
    let corpus = CorpusLoader::from_settings(&settings.corpus).load(&root);
    if corpus.is_empty() {
        return Err(anyhow::Error::new(Error::EmptyCorpus { root }).context("loading corpus"));
    }

    info!("Building embeddings + index...");
    let embedder = get_default_embedder(&settings.embed).context("loading embedding model")?;
    let index = IndexBuilder::new(embedder.as_ref()).build(&corpus).context("building index")?;

    info!("Searching...");
    let engine = QueryEngine::new(embedder.as_ref(), &index, &corpus).context("querying")?;
    engine.search(query, settings.search.top_k).context("querying")
}

/// Pretty-prints results with four-space indentation.
pub fn render_results(results: &[QueryResult]) -> Result<String> {
    let mut buf = Vec::new();
    let mut ser = Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(b"    "));
    results.serialize(&mut ser)?;
    Ok(String::from_utf8(buf)?)
}
