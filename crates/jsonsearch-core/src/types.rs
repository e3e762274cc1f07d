//! Domain types shared by the corpus loader, the index builder and the query engine.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

pub type ChunkId = u64;

/// A retrievable fragment of text extracted from one JSON document.
///
/// - `chunk_id`: dense id, assigned in load order starting at 0
/// - `source`: path of the originating document, as walked from the root
/// - `text`: the trimmed string value (always longer than the loader's minimum)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chunk {
    pub chunk_id: ChunkId,
    pub source: String,
    pub text: String,
}

/// All chunks produced by one load, in traversal order, plus an id lookup.
#[derive(Debug, Clone, Default)]
pub struct Corpus {
    root: PathBuf,
    chunks: Vec<Chunk>,
    by_id: HashMap<ChunkId, usize>,
}

impl Corpus {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into(), ..Self::default() }
    }

    /// Appends `text` under the next free id and returns that id.
    pub fn push(&mut self, source: impl Into<String>, text: impl Into<String>) -> ChunkId {
        let chunk_id = self.chunks.len() as ChunkId;
        self.by_id.insert(chunk_id, self.chunks.len());
        self.chunks.push(Chunk { chunk_id, source: source.into(), text: text.into() });
        chunk_id
    }

    pub fn root(&self) -> &Path { &self.root }
    pub fn chunks(&self) -> &[Chunk] { &self.chunks }
    pub fn len(&self) -> usize { self.chunks.len() }
    pub fn is_empty(&self) -> bool { self.chunks.is_empty() }

    pub fn get(&self, chunk_id: ChunkId) -> Option<&Chunk> {
        self.by_id.get(&chunk_id).map(|&pos| &self.chunks[pos])
    }

    /// Chunk texts in corpus order; row `i` of any embedding of this corpus is `texts()[i]`.
    pub fn texts(&self) -> Vec<String> {
        self.chunks.iter().map(|c| c.text.clone()).collect()
    }
}

/// Distance metric a vector index ranks by. Lower is always closer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Metric {
    L2Squared,
}

/// One hit from a vector index: the internal slot and its raw distance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Neighbor {
    pub slot: usize,
    pub distance: f32,
}

/// A ranked search result, serialized with keys in declaration order.
///
/// `score` is the raw distance reported by the index, not a similarity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryResult {
    pub rank: usize,
    pub score: f64,
    pub chunk_id: ChunkId,
    pub source: String,
    pub text: String,
}
