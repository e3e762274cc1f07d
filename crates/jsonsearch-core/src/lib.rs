#![deny(warnings)]
#![deny(dead_code)]
#![deny(unused_variables)]
#![deny(unused_imports)]

pub mod config;
pub mod corpus;
pub mod error;
pub mod extract;
pub mod traits;
pub mod types;

pub use corpus::{CorpusLoader, FileOutcome, LoadReport, SkipReason};
pub use error::{Error, Result, Stage};
pub use extract::extract_strings;
pub use traits::{Embedder, VectorIndex};
pub use types::{Chunk, ChunkId, Corpus, Metric, Neighbor, QueryResult};
