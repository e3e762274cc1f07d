use tracing::{debug, info};

use jsonsearch_core::error::{Error, Result, Stage};
use jsonsearch_core::traits::{Embedder, VectorIndex};
use jsonsearch_core::types::{ChunkId, Corpus};

use crate::flat::FlatL2Index;

/// A built, read-only vector index over one corpus.
///
/// `slots[i]` is the chunk id stored at index slot `i`; it is filled in the
/// same pass that hands texts to the embedder, so the two cannot drift.
pub struct SemanticIndex<I = FlatL2Index> {
    index: I,
    slots: Vec<ChunkId>,
    embedder_id: String,
}

impl<I: VectorIndex> SemanticIndex<I> {
    pub fn index(&self) -> &I { &self.index }
    pub fn dim(&self) -> usize { self.index.dim() }
    pub fn len(&self) -> usize { self.slots.len() }
    pub fn is_empty(&self) -> bool { self.slots.is_empty() }
    pub fn embedder_id(&self) -> &str { &self.embedder_id }
    pub fn chunk_id_at(&self, slot: usize) -> Option<ChunkId> { self.slots.get(slot).copied() }
}

pub struct IndexBuilder<'a> {
    embedder: &'a dyn Embedder,
}

impl<'a> IndexBuilder<'a> {
    pub fn new(embedder: &'a dyn Embedder) -> Self { Self { embedder } }

    /// Embeds the whole corpus in one call and loads it into a [`FlatL2Index`].
    pub fn build(&self, corpus: &Corpus) -> Result<SemanticIndex<FlatL2Index>> {
        self.build_with(corpus, |dim| FlatL2Index::with_capacity(dim, corpus.len()))
    }

    /// Like [`build`](Self::build), with `make_index(dim)` supplying the backend.
    pub fn build_with<I, F>(&self, corpus: &Corpus, make_index: F) -> Result<SemanticIndex<I>>
    where
        I: VectorIndex,
        F: FnOnce(usize) -> I,
    {
        if corpus.is_empty() {
            return Err(Error::EmptyCorpus { root: corpus.root().to_path_buf() });
        }

        let (texts, slots): (Vec<String>, Vec<ChunkId>) =
            corpus.chunks().iter().map(|c| (c.text.clone(), c.chunk_id)).unzip();

        info!(
            chunks = texts.len(),
            embedder = self.embedder.id(),
            max_len = self.embedder.max_len(),
            "embedding corpus"
        );
        let embeddings = self
            .embedder
            .embed_batch(&texts)
            .map_err(|e| Error::embedding(Stage::Build, format!("{e:#}")))?;
        let dim = matrix_dim(&embeddings, texts.len())?;

        let mut index = make_index(dim);
        if index.dim() != dim {
            return Err(Error::DimensionMismatch { expected: dim, actual: index.dim() });
        }
        index.add(&embeddings)?;
        if index.len() != slots.len() {
            return Err(Error::Index(format!("index holds {} vectors for {} chunks", index.len(), slots.len())));
        }
        debug!(dim, vectors = index.len(), metric = ?index.metric(), "index built");

        Ok(SemanticIndex { index, slots, embedder_id: self.embedder.id().to_string() })
    }
}

/// Validates the embedding matrix shape and returns its column count.
fn matrix_dim(embeddings: &[Vec<f32>], expected_rows: usize) -> Result<usize> {
    if embeddings.len() != expected_rows {
        return Err(Error::embedding(
            Stage::Build,
            format!("embedder returned {} vectors for {} texts", embeddings.len(), expected_rows),
        ));
    }
    let dim = embeddings.first().map_or(0, Vec::len);
    if dim == 0 {
        return Err(Error::embedding(Stage::Build, "embedder returned zero-dimensional vectors"));
    }
    if let Some(bad) = embeddings.iter().find(|row| row.len() != dim) {
        return Err(Error::DimensionMismatch { expected: dim, actual: bad.len() });
    }
    Ok(dim)
}
