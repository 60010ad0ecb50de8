//! Synonym expansion for "semantic" search
//!
//! This is literal term expansion: each query token is looked up in a
//! synonym table and the synonyms are appended to the query. No embeddings,
//! no vector similarity. A document only matches if it contains one of the
//! literal words.
//!
//! The table is injectable through the `SynonymProvider` trait. The trait is
//! object-safe for use as `Arc<dyn SynonymProvider>`.

use crate::tokenizer::tokenize;
use once_cell::sync::Lazy;
use rustc_hash::{FxHashMap, FxHashSet};

/// Lookup from a single term to its synonyms
pub trait SynonymProvider: Send + Sync {
    /// Synonyms of `term` (lowercase). Unknown terms yield an empty list.
    fn synonyms(&self, term: &str) -> Vec<String>;

    /// Name for debugging and logging
    fn name(&self) -> &str;
}

// ============================================================================
// StaticSynonyms
// ============================================================================

static DEFAULT_SYNONYMS: Lazy<FxHashMap<&'static str, &'static [&'static str]>> =
    Lazy::new(|| {
        let entries: [(&'static str, &'static [&'static str]); 12] = [
            ("create", &["make", "build", "generate"]),
            ("find", &["search", "locate", "discover"]),
            ("delete", &["remove", "erase"]),
            ("update", &["modify", "change", "edit"]),
            ("meeting", &["call", "sync", "discussion"]),
            ("task", &["todo", "action", "assignment"]),
            ("document", &["doc", "file", "paper"]),
            ("note", &["memo", "annotation"]),
            ("project", &["initiative", "program"]),
            ("contact", &["person", "people"]),
            ("issue", &["problem", "bug"]),
            ("plan", &["roadmap", "strategy"]),
        ];
        entries.into_iter().collect()
    });

/// The built-in synonym table
#[derive(Debug, Clone, Copy, Default)]
pub struct StaticSynonyms;

impl SynonymProvider for StaticSynonyms {
    fn synonyms(&self, term: &str) -> Vec<String> {
        DEFAULT_SYNONYMS
            .get(term)
            .map(|syns| syns.iter().map(|s| s.to_string()).collect())
            .unwrap_or_default()
    }

    fn name(&self) -> &str {
        "static"
    }
}

// ============================================================================
// SynonymTable
// ============================================================================

/// A caller-supplied synonym table
///
/// Keys are stored lowercase so lookups match tokenized query terms.
#[derive(Debug, Clone, Default)]
pub struct SynonymTable {
    entries: FxHashMap<String, Vec<String>>,
}

impl SynonymTable {
    /// Create an empty table
    pub fn new() -> Self {
        SynonymTable::default()
    }

    /// Add synonyms for a term, appending to any already present
    pub fn insert<I, S>(&mut self, term: &str, synonyms: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.entries
            .entry(term.to_lowercase())
            .or_default()
            .extend(synonyms.into_iter().map(Into::into));
    }

    /// Builder form of `insert`
    pub fn with<I, S>(mut self, term: &str, synonyms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.insert(term, synonyms);
        self
    }

    /// Number of terms with synonyms
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the table is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl SynonymProvider for SynonymTable {
    fn synonyms(&self, term: &str) -> Vec<String> {
        self.entries.get(term).cloned().unwrap_or_default()
    }

    fn name(&self) -> &str {
        "table"
    }
}

// ============================================================================
// Expansion
// ============================================================================

/// Tokenize `text` and append the synonyms of every token
///
/// Synonyms go through the tokenizer too, so multi-word or short synonyms
/// behave exactly as they would in a document. Original tokens come first;
/// the result is deduplicated in first-occurrence order.
pub fn expand_tokens(text: &str, provider: &dyn SynonymProvider) -> Vec<String> {
    let original = tokenize(text);
    let mut seen: FxHashSet<String> = original.iter().cloned().collect();
    let mut expanded = original.clone();
    for token in &original {
        for synonym in provider.synonyms(token) {
            for t in tokenize(&synonym) {
                if seen.insert(t.clone()) {
                    expanded.push(t);
                }
            }
        }
    }
    expanded
}

/// Expanded query as text, for display or logging
pub fn expand_query(text: &str, provider: &dyn SynonymProvider) -> String {
    expand_tokens(text, provider).join(" ")
}
