use crate::error::Result;
use crate::types::{Metric, Neighbor};

/// Maps text to fixed-dimension vectors.
///
/// Calling `embed_batch` with one text must give the same vector that text
/// gets inside a larger batch.
pub trait Embedder: Send + Sync {
    /// Stable identifier for the model and its configuration (e.g. `bert:all-MiniLM-L6-v2:d384`).
    fn id(&self) -> &str;
    fn dim(&self) -> usize;
    fn max_len(&self) -> usize;
    /// One vector per input, in input order.
    fn embed_batch(&self, texts: &[String]) -> anyhow::Result<Vec<Vec<f32>>>;
}

/// A k-nearest-neighbor store over vectors of one fixed dimension.
///
/// Slots are assigned in insertion order starting at 0.
pub trait VectorIndex: Send + Sync {
    fn metric(&self) -> Metric;
    fn dim(&self) -> usize;
    fn len(&self) -> usize;
    fn is_empty(&self) -> bool { self.len() == 0 }
    /// Appends `vectors` in order.
    fn add(&mut self, vectors: &[Vec<f32>]) -> Result<()>;
    /// Up to `k` neighbors of `query`, nearest first.
    fn search(&self, query: &[f32], k: usize) -> Result<Vec<Neighbor>>;
}
