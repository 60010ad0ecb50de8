//! Scoring infrastructure
//!
//! This module provides:
//! - Scorer trait for pluggable scoring algorithms
//! - ScorerContext for per-query signals (clock, recency windows)
//! - KeywordScorer default implementation

use crate::indexer::IndexedDocument;
use sphere_core::{RecencyConfig, Timestamp};

// ============================================================================
// ScorerContext
// ============================================================================

/// Per-query scoring context
#[derive(Debug, Clone, Copy)]
pub struct ScorerContext {
    /// Reference time for document age
    pub now: Timestamp,
    /// Recency multipliers
    pub recency: RecencyConfig,
}

impl ScorerContext {
    /// Context anchored at the current time
    pub fn new(recency: RecencyConfig) -> Self {
        ScorerContext {
            now: Timestamp::now(),
            recency,
        }
    }

    /// Builder: pin the reference time
    pub fn at(mut self, now: Timestamp) -> Self {
        self.now = now;
        self
    }
}

impl Default for ScorerContext {
    fn default() -> Self {
        Self::new(RecencyConfig::default())
    }
}

// ============================================================================
// Scorer Trait
// ============================================================================

/// Pluggable scoring interface
///
/// Scorers take a document and the deduplicated query tokens and return a
/// relevance score. Higher scores indicate more relevant documents.
///
/// Scorers must be Send + Sync: the engine shares one across concurrent readers.
pub trait Scorer: Send + Sync {
    /// Score a document against query tokens
    fn score(&self, doc: &IndexedDocument, query_tokens: &[String], ctx: &ScorerContext) -> f32;

    /// Name for debugging and logging
    fn name(&self) -> &str;
}

// ============================================================================
// KeywordScorer
// ============================================================================

/// Membership-based keyword scorer
///
/// For each query token t:
/// raw += (t in document tokens ? 1 : 0) + (title contains t ? 2 : 0)
///
/// score = raw / (|Q| * 3), then multiplied by the recency boost for the
/// document's age (measured from `updated_at`).
///
/// Membership, not frequency, is counted: repeating a word in the body
/// does not raise the score.
#[derive(Debug, Clone, Copy, Default)]
pub struct KeywordScorer;

/// Weight of a token present anywhere in the document
const TOKEN_WEIGHT: f32 = 1.0;
/// Extra weight of a token found in the title
const TITLE_WEIGHT: f32 = 2.0;

impl KeywordScorer {
    /// Create the scorer
    pub fn new() -> Self {
        KeywordScorer
    }

    /// Normalized score before the recency boost
    pub fn base_score(&self, doc: &IndexedDocument, query_tokens: &[String]) -> f32 {
        if query_tokens.is_empty() {
            return 0.0;
        }
        let title = doc.document().title.to_lowercase();
        let raw: f32 = query_tokens
            .iter()
            .map(|token| {
                let mut s = 0.0;
                if doc.has_token(token) {
                    s += TOKEN_WEIGHT;
                }
                if title.contains(token.as_str()) {
                    s += TITLE_WEIGHT;
                }
                s
            })
            .sum();
        raw / (query_tokens.len() as f32 * (TOKEN_WEIGHT + TITLE_WEIGHT))
    }
}

impl Scorer for KeywordScorer {
    fn score(&self, doc: &IndexedDocument, query_tokens: &[String], ctx: &ScorerContext) -> f32 {
        let base = self.base_score(doc, query_tokens);
        let age = doc.document().updated_at.age_hours(ctx.now);
        base * ctx.recency.multiplier(age)
    }

    fn name(&self) -> &str {
        "keyword"
    }
}

// ============================================================================
// Tests
// ============================================================================
