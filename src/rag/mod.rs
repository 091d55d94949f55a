//! Knowledge-base retrieval.
//!
//! - `corpus`: the built-in knowledge chunks and the optional YAML override
//! - `index`: exact nearest-neighbour search with a cosine floor
//! - `retriever`: embeds queries and applies the configured search

pub mod corpus;
pub mod index;
pub mod retriever;

pub use corpus::{load_corpus, CorpusError, DEFAULT_CORPUS};
pub use index::{EmbeddingIndex, IndexError, KnowledgeChunk, Neighbor, RetrievedChunk};
pub use retriever::{RetrievalError, Retriever};
