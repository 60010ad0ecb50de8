//! Document store and index maintenance
//!
//! `IndexState` owns the four structures the engine searches:
//! - the document store (id -> IndexedDocument)
//! - the inverted index (token -> ids)
//! - the scope partition (scope id -> ids)
//! - the type partition (document type -> ids)
//!
//! Every mutation here takes `&mut self`. The engine only hands out `&mut`
//! under its write guard, so each call below is observed by readers as a
//! single step, including the remove-then-insert of an update.

use crate::index::{InvertedIndex, Partition};
use crate::tokenizer::tokenize;
use rustc_hash::{FxHashMap, FxHashSet};
use sphere_core::{Document, DocumentType, IndexStats, Result};
use std::collections::BTreeMap;

// ============================================================================
// IndexedDocument
// ============================================================================

/// A stored document together with its derived tokens
///
/// Tokens are always the tokenization of `title + " " + content` as of the
/// last time the document was indexed. There is no way to set them directly.
#[derive(Debug, Clone, PartialEq)]
pub struct IndexedDocument {
    document: Document,
    tokens: Vec<String>,
}

impl IndexedDocument {
    fn new(document: Document) -> Self {
        let tokens = tokenize(&document.indexable_text());
        IndexedDocument { document, tokens }
    }

    /// The caller-supplied document
    pub fn document(&self) -> &Document {
        &self.document
    }

    /// Derived tokens, ordered and unique
    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    /// Whether the document's token set contains `token`
    pub fn has_token(&self, token: &str) -> bool {
        self.tokens.iter().any(|t| t == token)
    }
}

// ============================================================================
// ConsistencyReport
// ============================================================================

/// Result of a full cross-check between the store and the partitions
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConsistencyReport {
    /// (token, id) postings whose id is not in the store
    pub orphan_postings: Vec<(String, String)>,
    /// (scope, id) entries whose id is not in the store
    pub orphan_scope_entries: Vec<(String, String)>,
    /// (type, id) entries whose id is not in the store
    pub orphan_type_entries: Vec<(DocumentType, String)>,
    /// (id, token) pairs where a stored document's token has no posting for it
    pub missing_postings: Vec<(String, String)>,
    /// Stored ids missing from their scope or type partition
    pub missing_partition_entries: Vec<String>,
}

impl ConsistencyReport {
    /// Whether every structure agrees with the store
    pub fn is_consistent(&self) -> bool {
        self.orphan_postings.is_empty()
            && self.orphan_scope_entries.is_empty()
            && self.orphan_type_entries.is_empty()
            && self.missing_postings.is_empty()
            && self.missing_partition_entries.is_empty()
    }
}

// ============================================================================
// IndexState
// ============================================================================

/// Document store plus the three derived indexes
#[derive(Debug, Default)]
pub struct IndexState {
    documents: FxHashMap<String, IndexedDocument>,
    inverted: InvertedIndex,
    scopes: Partition<String>,
    types: Partition<DocumentType>,
    version: u64,
}

impl IndexState {
    /// Create an empty state
    pub fn new() -> Self {
        IndexState::default()
    }

    // ========================================================================
    // Mutation
    // ========================================================================

    /// Insert a document, replacing any previous version with the same id
    ///
    /// Returns the number of tokens indexed.
    pub fn insert(&mut self, document: Document) -> Result<usize> {
        document.validate()?;
        self.purge(&document.id);

        let indexed = IndexedDocument::new(document);
        let id = indexed.document.id.clone();
        for token in &indexed.tokens {
            self.inverted.add(token, &id);
        }
        self.scopes.add(indexed.document.scope_id.clone(), &id);
        self.types.add(indexed.document.doc_type, &id);

        let token_count = indexed.tokens.len();
        self.documents.insert(id, indexed);
        self.version += 1;
        Ok(token_count)
    }

    /// Insert many documents; nothing is applied unless all of them validate
    ///
    /// Returns the number of distinct ids in the batch. A repeated id is
    /// applied in order, so the last copy wins and is counted once.
    pub fn insert_all(&mut self, documents: Vec<Document>) -> Result<usize> {
        for document in &documents {
            document.validate()?;
        }
        let count = documents
            .iter()
            .map(|d| d.id.as_str())
            .collect::<FxHashSet<_>>()
            .len();
        for document in documents {
            self.insert(document)?;
        }
        Ok(count)
    }

    /// Remove a document and every posting that references it
    ///
    /// Returns the removed document, or `None` if the id was unknown.
    pub fn remove(&mut self, id: &str) -> Option<IndexedDocument> {
        let removed = self.purge(id);
        if removed.is_some() {
            self.version += 1;
        }
        removed
    }

    fn purge(&mut self, id: &str) -> Option<IndexedDocument> {
        let existing = self.documents.remove(id)?;
        for token in &existing.tokens {
            self.inverted.remove(token, id);
        }
        self.scopes.remove(&existing.document.scope_id, id);
        self.types.remove(&existing.document.doc_type, id);
        Some(existing)
    }

    /// Empty every structure
    pub fn clear(&mut self) {
        self.documents.clear();
        self.inverted.clear();
        self.scopes.clear();
        self.types.clear();
        self.version += 1;
    }

    /// Drop empty sets and release spare capacity; returns sets dropped
    pub fn compact(&mut self) -> usize {
        let dropped = self.inverted.compact() + self.scopes.compact() + self.types.compact();
        self.documents.shrink_to_fit();
        self.version += 1;
        dropped
    }

    // ========================================================================
    // Read access
    // ========================================================================

    /// Stored document by id
    pub fn get(&self, id: &str) -> Option<&IndexedDocument> {
        self.documents.get(id)
    }

    /// Whether an id is stored
    pub fn contains(&self, id: &str) -> bool {
        self.documents.contains_key(id)
    }

    /// Number of stored documents
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    /// Whether the store is empty
    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// Mutation counter, bumped on every completed change
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Token -> ids
    pub fn inverted(&self) -> &InvertedIndex {
        &self.inverted
    }

    /// Scope -> ids
    pub fn scopes(&self) -> &Partition<String> {
        &self.scopes
    }

    /// Type -> ids
    pub fn types(&self) -> &Partition<DocumentType> {
        &self.types
    }

    /// Iterate over every stored document (unordered)
    pub fn documents(&self) -> impl Iterator<Item = &IndexedDocument> {
        self.documents.values()
    }

    /// Whole-index counters
    pub fn stats(&self) -> IndexStats {
        let documents_by_type = self
            .types
            .iter()
            .map(|(t, list)| (*t, list.len()))
            .collect();
        let documents_by_scope: BTreeMap<String, usize> = self
            .scopes
            .iter()
            .map(|(s, list)| (s.clone(), list.len()))
            .collect();
        IndexStats {
            total_documents: self.documents.len(),
            documents_by_type,
            documents_by_scope,
            unique_tokens: self.inverted.len(),
        }
    }

    /// Cross-check every structure against the store, in both directions
    pub fn check_consistency(&self) -> ConsistencyReport {
        let mut report = ConsistencyReport::default();

        for (token, list) in self.inverted.iter() {
            for id in list.iter() {
                if !self.documents.contains_key(id) {
                    report
                        .orphan_postings
                        .push((token.to_string(), id.to_string()));
                }
            }
        }
        for (scope, list) in self.scopes.iter() {
            for id in list.iter() {
                if !self.documents.contains_key(id) {
                    report
                        .orphan_scope_entries
                        .push((scope.clone(), id.to_string()));
                }
            }
        }
        for (doc_type, list) in self.types.iter() {
            for id in list.iter() {
                if !self.documents.contains_key(id) {
                    report.orphan_type_entries.push((*doc_type, id.to_string()));
                }
            }
        }

        for (id, indexed) in &self.documents {
            for token in &indexed.tokens {
                let present = self
                    .inverted
                    .lookup(token)
                    .is_some_and(|list| list.contains(id));
                if !present {
                    report.missing_postings.push((id.clone(), token.clone()));
                }
            }
            let doc = &indexed.document;
            if !self.scopes.contains(&doc.scope_id, id) || !self.types.contains(&doc.doc_type, id)
            {
                report.missing_partition_entries.push(id.clone());
            }
        }

        report.orphan_postings.sort();
        report.orphan_scope_entries.sort();
        report.orphan_type_entries.sort();
        report.missing_postings.sort();
        report.missing_partition_entries.sort();
        report
    }

    /// Plant a posting and a scope entry for an id that is not stored
    #[cfg(test)]
    pub(crate) fn inject_orphan(&mut self, token: &str, scope: &str, id: &str) {
        self.inverted.add(token, id);
        self.scopes.add(scope.to_string(), id);
    }
}
