//! Posting lists and partition indexes
//!
//! This module provides:
//! - PostingList: set of document ids sharing one key
//! - InvertedIndex: token -> PostingList, ordered for prefix completion
//! - Partition: scope/type -> PostingList
//!
//! # Invariant
//!
//! Empty posting lists are never retained. Removing the last id under a key
//! removes the key, so "indexed then removed" leaves no trace behind.

use rustc_hash::{FxHashMap, FxHashSet};
use std::collections::BTreeMap;
use std::hash::Hash;

// ============================================================================
// PostingList
// ============================================================================

/// Set of document ids associated with a single key
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostingList {
    ids: FxHashSet<String>,
}

impl PostingList {
    /// Create a new empty posting list
    pub fn new() -> Self {
        PostingList::default()
    }

    /// Add a document id; returns false if it was already present
    pub fn add(&mut self, id: &str) -> bool {
        if self.ids.contains(id) {
            return false;
        }
        self.ids.insert(id.to_string())
    }

    /// Remove a document id; returns true if it was present
    pub fn remove(&mut self, id: &str) -> bool {
        self.ids.remove(id)
    }

    /// Whether the id is present
    pub fn contains(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    /// Number of documents in this list
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Check if posting list is empty
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Iterate over ids (unordered)
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.ids.iter().map(String::as_str)
    }

    fn shrink_to_fit(&mut self) {
        self.ids.shrink_to_fit();
    }
}

// ============================================================================
// InvertedIndex
// ============================================================================

/// Token -> posting list mapping
///
/// Backed by a `BTreeMap` so that prefix completion is a range scan
/// rather than a walk over every token.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InvertedIndex {
    postings: BTreeMap<String, PostingList>,
}

impl InvertedIndex {
    /// Create a new empty index
    pub fn new() -> Self {
        InvertedIndex::default()
    }

    /// Add `id` to the posting list of `token`
    pub fn add(&mut self, token: &str, id: &str) {
        self.postings.entry(token.to_string()).or_default().add(id);
    }

    /// Remove `id` from the posting list of `token`, dropping the list if emptied
    pub fn remove(&mut self, token: &str, id: &str) -> bool {
        let Some(list) = self.postings.get_mut(token) else {
            return false;
        };
        let removed = list.remove(id);
        if list.is_empty() {
            self.postings.remove(token);
        }
        removed
    }

    /// Lookup documents containing a token
    pub fn lookup(&self, token: &str) -> Option<&PostingList> {
        self.postings.get(token)
    }

    /// Tokens that start with `prefix` (including `prefix` itself), in order
    pub fn tokens_with_prefix<'a>(
        &'a self,
        prefix: &'a str,
    ) -> impl Iterator<Item = (&'a str, &'a PostingList)> + 'a {
        self.postings
            .range::<str, _>((std::ops::Bound::Included(prefix), std::ops::Bound::Unbounded))
            .take_while(move |(token, _)| token.starts_with(prefix))
            .map(|(token, list)| (token.as_str(), list))
    }

    /// Iterate over every (token, posting list) pair, in token order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &PostingList)> {
        self.postings.iter().map(|(t, l)| (t.as_str(), l))
    }

    /// Number of distinct tokens
    pub fn len(&self) -> usize {
        self.postings.len()
    }

    /// Whether the index holds no tokens
    pub fn is_empty(&self) -> bool {
        self.postings.is_empty()
    }

    /// Drop every posting
    pub fn clear(&mut self) {
        self.postings.clear();
    }

    /// Drop empty lists and shrink the remaining ones; returns lists dropped
    pub fn compact(&mut self) -> usize {
        let before = self.postings.len();
        self.postings.retain(|_, list| !list.is_empty());
        for list in self.postings.values_mut() {
            list.shrink_to_fit();
        }
        before - self.postings.len()
    }
}

// ============================================================================
// Partition
// ============================================================================

/// Key -> posting list mapping for scope and type partitions
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Partition<K: Eq + Hash> {
    members: FxHashMap<K, PostingList>,
}

impl<K: Eq + Hash> Default for Partition<K> {
    fn default() -> Self {
        Partition {
            members: FxHashMap::default(),
        }
    }
}

impl<K: Eq + Hash + Clone> Partition<K> {
    /// Create a new empty partition
    pub fn new() -> Self {
        Partition::default()
    }

    /// Add `id` under `key`
    pub fn add(&mut self, key: K, id: &str) {
        self.members.entry(key).or_default().add(id);
    }

    /// Remove `id` from `key`, dropping the key if emptied
    pub fn remove(&mut self, key: &K, id: &str) -> bool {
        let Some(list) = self.members.get_mut(key) else {
            return false;
        };
        let removed = list.remove(id);
        if list.is_empty() {
            self.members.remove(key);
        }
        removed
    }

    /// Members under `key`
    pub fn get(&self, key: &K) -> Option<&PostingList> {
        self.members.get(key)
    }

    /// Whether `id` is filed under `key`
    pub fn contains(&self, key: &K, id: &str) -> bool {
        self.members.get(key).is_some_and(|list| list.contains(id))
    }

    /// Every key with at least one member
    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.members.keys()
    }

    /// Iterate over (key, members)
    pub fn iter(&self) -> impl Iterator<Item = (&K, &PostingList)> {
        self.members.iter()
    }

    /// Number of keys
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Whether the partition holds no keys
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Drop every key
    pub fn clear(&mut self) {
        self.members.clear();
    }

    /// Drop empty lists and release spare capacity; returns lists dropped
    pub fn compact(&mut self) -> usize {
        let before = self.members.len();
        self.members.retain(|_, list| !list.is_empty());
        for list in self.members.values_mut() {
            list.shrink_to_fit();
        }
        self.members.shrink_to_fit();
        before - self.members.len()
    }
}
