//! Vector side of the pipeline: an exact L2 index, the corpus index builder,
//! and the query engine that maps hits back to chunks.

pub mod flat;
pub mod index_build;
pub mod search;

pub use flat::FlatL2Index;
pub use index_build::{IndexBuilder, SemanticIndex};
pub use search::QueryEngine;
