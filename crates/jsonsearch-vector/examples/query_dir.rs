use std::path::PathBuf;

use jsonsearch_core::corpus::CorpusLoader;
use jsonsearch_embed::FakeEmbedder;
use jsonsearch_vector::{IndexBuilder, QueryEngine};

/// cargo run -p jsonsearch-vector --example query_dir -- <dir> "<query>"
fn main() -> anyhow::Result<()> {
    let mut args = std::env::args().skip(1);
    let root = PathBuf::from(args.next().unwrap_or_else(|| ".".to_string()));
    let query = args.next().unwrap_or_default();

    let (corpus, report) = CorpusLoader::new().load_with_report(&root);
    println!("files={} skipped={} chunks={}", report.files_scanned, report.files_skipped, report.chunks);

    let embedder = FakeEmbedder::default();
    let index = IndexBuilder::new(&embedder).build(&corpus)?;
    for hit in QueryEngine::new(&embedder, &index, &corpus)?.search(&query, 5)? {
        println!("{:>2}. {:.4} [{}] {}", hit.rank, hit.score, hit.source, hit.text);
    }
    Ok(())
}
