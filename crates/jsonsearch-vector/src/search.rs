use tracing::{debug, info};

use jsonsearch_core::error::{Error, Result, Stage};
use jsonsearch_core::traits::{Embedder, VectorIndex};
use jsonsearch_core::types::{Corpus, QueryResult};

use crate::index_build::SemanticIndex;

/// Answers free-text queries against a [`SemanticIndex`] and its corpus.
pub struct QueryEngine<'a, I> {
    embedder: &'a dyn Embedder,
    index: &'a SemanticIndex<I>,
    corpus: &'a Corpus,
}

impl<'a, I: VectorIndex> QueryEngine<'a, I> {
    /// Fails unless `embedder` is the one the index was built with.
    pub fn new(embedder: &'a dyn Embedder, index: &'a SemanticIndex<I>, corpus: &'a Corpus) -> Result<Self> {
        if embedder.id() != index.embedder_id() {
            return Err(Error::EmbedderMismatch {
                index: index.embedder_id().to_string(),
                query: embedder.id().to_string(),
            });
        }
        Ok(Self { embedder, index, corpus })
    }

    /// Up to `k` chunks nearest to `query`, ranked from 1, scored by raw distance.
    ///
    /// Equal distances keep whatever order the index returned.
    pub fn search(&self, query: &str, k: usize) -> Result<Vec<QueryResult>> {
        if k == 0 {
            return Err(Error::InvalidArgument("k must be at least 1".into()));
        }
        info!(k, "searching");
        let query_vec = self
            .embedder
            .embed_batch(&[query.to_string()])
            .map_err(|e| Error::embedding(Stage::Query, format!("{e:#}")))?
            .into_iter()
            .next()
            .ok_or_else(|| Error::embedding(Stage::Query, "embedder returned no vector for the query"))?;
        if query_vec.len() != self.index.dim() {
            return Err(Error::DimensionMismatch { expected: self.index.dim(), actual: query_vec.len() });
        }

        let neighbors = self.index.index().search(&query_vec, k)?;
        debug!(hits = neighbors.len(), "index returned neighbors");

        neighbors
            .into_iter()
            .take(k)
            .enumerate()
            .map(|(pos, hit)| {
                let chunk_id = self
                    .index
                    .chunk_id_at(hit.slot)
                    .ok_or_else(|| Error::Index(format!("slot {} is out of range", hit.slot)))?;
                let chunk = self
                    .corpus
                    .get(chunk_id)
                    .ok_or_else(|| Error::Index(format!("chunk {} is not in the corpus", chunk_id)))?;
                Ok(QueryResult {
                    rank: pos + 1,
                    score: f64::from(hit.distance),
                    chunk_id,
                    source: chunk.source.clone(),
                    text: chunk.text.clone(),
                })
            })
            .collect()
    }
}
