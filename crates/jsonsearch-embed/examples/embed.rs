use jsonsearch_core::config::EmbedSettings;
use jsonsearch_core::traits::Embedder;
use jsonsearch_embed::BertEmbedder;

fn main() -> anyhow::Result<()> {
    let embedder = BertEmbedder::new(&EmbedSettings::default())?;
    let texts = vec!["hello world".to_string(), "rust embeddings".to_string()];
    let embs = embedder.embed_batch(&texts)?;
    println!("id={} B={} dim={}", embedder.id(), embs.len(), embedder.dim());
    Ok(())
}
