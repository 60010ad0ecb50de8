//! Text tokenizer
//!
//! One tokenizer serves both indexing and querying, so a query token can
//! only ever match a posting produced by the same normalization.

use rustc_hash::FxHashSet;

/// Tokens of this many characters or fewer are dropped
const MAX_DROPPED_LEN: usize = 2;

/// Tokenize text into searchable terms
///
/// - Lowercase
/// - Treat every character outside `[a-z0-9_]` as a separator
/// - Drop tokens of 2 characters or fewer
/// - Deduplicate, keeping first-occurrence order
///
/// # Example
///
/// ```
/// use sphere_search::tokenizer::tokenize;
///
/// let tokens = tokenize("Renovation budget: the BUDGET is ok");
/// assert_eq!(tokens, vec!["renovation", "budget", "the"]);
/// ```
pub fn tokenize(text: &str) -> Vec<String> {
    let normalized: String = text
        .to_lowercase()
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '_' {
                c
            } else {
                ' '
            }
        })
        .collect();

    let mut seen = FxHashSet::default();
    normalized
        .split_whitespace()
        .filter(|s| s.len() > MAX_DROPPED_LEN)
        .filter(|s| seen.insert(*s))
        .map(String::from)
        .collect()
}
