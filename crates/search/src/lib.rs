//! Scoped in-memory document search
//!
//! This crate provides:
//! - Tokenizer shared by indexing and querying
//! - Posting lists, the inverted index and scope/type partitions
//! - IndexState: document store plus derived indexes, mutated atomically
//! - Scope resolution against a caller's accessible scopes
//! - Candidate retrieval with metadata filters
//! - Scorer trait with the KeywordScorer default
//! - Result building: ranking, facets, pagination, snippets, suggestions
//! - Synonym expansion for keyword-based "semantic" search
//! - SearchEngine: the thread-safe facade over all of the above
//!
//! # Usage
//!
//! ```
//! use sphere_core::{Document, DocumentType};
//! use sphere_search::SearchEngine;
//!
//! let engine = SearchEngine::new();
//! engine
//!     .index_document(Document::new("t1", DocumentType::Task, "mtl", "Call plumber", ""))
//!     .unwrap();
//!
//! let hits = engine.quick_search("plumber", "mtl", 10).unwrap();
//! assert_eq!(hits[0].id, "t1");
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod engine;
pub mod expand;
pub mod index;
pub mod indexer;
pub mod results;
pub mod retriever;
pub mod scope;
pub mod scorer;
pub mod tokenizer;

// Re-export commonly used types
pub use engine::{SearchEngine, SemanticOptions};
pub use expand::{expand_query, expand_tokens, StaticSynonyms, SynonymProvider, SynonymTable};
pub use index::{InvertedIndex, Partition, PostingList};
pub use indexer::{ConsistencyReport, IndexState, IndexedDocument};
pub use results::snippet;
pub use scope::resolve_scopes;
pub use scorer::{KeywordScorer, Scorer, ScorerContext};
pub use tokenizer::tokenize;
