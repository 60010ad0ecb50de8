//! Sphere - scoped in-memory document indexing and retrieval
//!
//! Sphere indexes documents (threads, notes, tasks, meetings, ...) that
//! belong to organizational scopes, and answers keyword queries restricted
//! to the scopes a caller may see.
//!
//! # Quick Start
//!
//! ```
//! use sphere::{Document, DocumentType, ScopeSelection, SearchEngine, SearchQuery};
//!
//! let engine = SearchEngine::new();
//! engine.index_document(Document::new(
//!     "d1",
//!     DocumentType::Note,
//!     "mtl",
//!     "Renovation budget",
//!     "discussing costs",
//! ))?;
//!
//! let query = SearchQuery::new("renovation").with_scope(ScopeSelection::current("mtl"));
//! let response = engine.search(&query, &["mtl".to_string()])?;
//! assert_eq!(response.total_count, 1);
//! # Ok::<(), sphere::Error>(())
//! ```
//!
//! # Architecture
//!
//! Data types, errors and configuration live in `sphere-core`; the index
//! and query pipeline live in `sphere-search`. Both are re-exported here.
//! Access control is not decided by the engine: callers pass the list of
//! scopes they are allowed to search with every query.

pub use sphere_core::*;
pub use sphere_search::*;
