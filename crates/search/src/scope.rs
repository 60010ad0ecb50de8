//! Scope resolution
//!
//! Turns a query's declared scope selection and the caller's accessible
//! scopes into the concrete list of scope ids to search. Authorization is
//! not decided here: accessible scopes arrive precomputed, and `Global`
//! is trusted to have been gated by the caller.

use rustc_hash::FxHashSet;
use sphere_core::{ScopeMode, ScopeSelection};

/// Resolve the concrete scopes a query searches
///
/// - `CurrentSphere`: the first declared scope, if the caller can access it
/// - `SpecifiedSpheres`: declared scopes narrowed to the accessible ones
/// - `AllAccessible`: exactly the accessible scopes
/// - `Global`: every scope known to the index
///
/// Order follows the input; duplicates are removed.
pub fn resolve_scopes<'a, I>(
    selection: &ScopeSelection,
    accessible: &[String],
    known_scopes: I,
) -> Vec<String>
where
    I: IntoIterator<Item = &'a String>,
{
    let is_accessible = |scope: &String| accessible.iter().any(|a| a == scope);

    let mut resolved: Vec<String> = match selection.mode {
        ScopeMode::CurrentSphere => selection
            .scopes
            .first()
            .filter(|s| is_accessible(s))
            .cloned()
            .into_iter()
            .collect(),
        ScopeMode::SpecifiedSpheres => selection
            .scopes
            .iter()
            .filter(|s| is_accessible(s))
            .cloned()
            .collect(),
        ScopeMode::AllAccessible => accessible.to_vec(),
        ScopeMode::Global => {
            let mut all: Vec<String> = known_scopes.into_iter().cloned().collect();
            all.sort();
            all
        }
    };

    let mut seen = FxHashSet::default();
    resolved.retain(|scope| seen.insert(scope.clone()));
    resolved
}
