//! Search Comprehensive Test Suite
//!
//! Tests for the indexing and retrieval guarantees of the engine.
//!
//! ## Test Tier Structure
//!
//! - **Tier 1: Index Invariants** (no orphans, removal round-trip, update idempotence)
//! - **Tier 2: Search Correctness** (scope isolation, filters, match modes, validation)
//! - **Tier 3: Ranking & Pagination** (scoring, sort orders, facets, paging)
//! - **Tier 4: Helpers** (similar, semantic, recent/trending, stats, config)
//! - **Tier 5: Concurrency** (readers never observe half-applied updates)
//!
//! ## Running Tests
//!
//! ```bash
//! # Run the whole suite
//! cargo test --test search_comprehensive
//!
//! # Run one tier
//! cargo test --test search_comprehensive tier3
//!
//! # Run stress tests (slow, opt-in)
//! cargo test --test search_comprehensive stress -- --ignored
//! ```



// Tier 2: Search Correctness
mod tier2_search_correctness;

// Tier 3: Ranking & Pagination
mod tier3_ranking;
