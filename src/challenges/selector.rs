//! Non-repeating random challenge selection
//!
//! Draws uniformly among the catalog entries of the requested difficulty
//! that have not been completed yet. Selection never mutates the catalog
//! or the completed set; completion is recorded by the caller only after
//! the execution collaborator confirms success.

use std::collections::BTreeSet;

use crate::challenges::{ChallengeCatalogEntry, Difficulty};

/// Draw the next challenge, or `None` when every entry of this difficulty
/// has been completed (the "come back tomorrow" state, distinct from an
/// exhausted quota).
pub fn next<'a>(
    catalog: &'a [ChallengeCatalogEntry],
    difficulty: Difficulty,
    completed: &BTreeSet<String>,
) -> Option<&'a ChallengeCatalogEntry> {
    let eligible: Vec<&ChallengeCatalogEntry> = catalog
        .iter()
        .filter(|e| e.difficulty == difficulty && !completed.contains(&e.id))
        .collect();

    if eligible.is_empty() {
        return None;
    }
    Some(eligible[random_index(eligible.len())])
}

/// Uniform index from the OS RNG, with a clock-derived fallback when the
/// OS RNG is unavailable.
fn random_index(len: usize) -> usize {
    let mut bytes = [0u8; 8];
    if getrandom::getrandom(&mut bytes).is_ok() {
        return (u64::from_le_bytes(bytes) % len as u64) as usize;
    }

    let nanos = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.subsec_nanos())
        .unwrap_or(0);
    nanos as usize % len
}
