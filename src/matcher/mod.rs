//! The four name-matching strategies.
//!
//! Each strategy is a pure single-pass function over two [`NameColumn`]s:
//! the reference column drives the `common`/`missing_in_other` split and
//! the other column drives `extra_in_other`. Output ordering follows the
//! first-seen order of the input columns, so re-running a strategy on the
//! same inputs yields an identical result.

pub mod fuzzy;
pub mod normalize;

use std::collections::{HashMap, HashSet};

use crate::model::{MatchPair, MatchResult, NameColumn};

/// Matches names byte-for-byte. Case and whitespace differences always
/// produce misses.
pub fn compare_exact(reference: &NameColumn, other: &NameColumn) -> MatchResult {
    let other_set: HashSet<&str> = other.values().iter().map(String::as_str).collect();
    let reference_set: HashSet<&str> = reference.values().iter().map(String::as_str).collect();

    let mut result = MatchResult::default();
    for value in reference.values() {
        if other_set.contains(value.as_str()) {
            result.common.push(MatchPair::Pair {
                reference: value.clone(),
                other: value.clone(),
            });
        } else {
            result.missing_in_other.push(value.clone());
        }
    }
    for value in other.values() {
        if !reference_set.contains(value.as_str()) {
            result.extra_in_other.push(value.clone());
        }
    }
    result
}

/// Matches names on lower-cased equality. Common pairs report the
/// original-case spelling from each side.
pub fn compare_case_insensitive(reference: &NameColumn, other: &NameColumn) -> MatchResult {
    compare_folded(reference, other, |name| name.to_lowercase())
}

/// Matches names after accent, punctuation, and whitespace folding (see
/// [`normalize::normalize_name`]).
pub fn compare_normalized(reference: &NameColumn, other: &NameColumn) -> MatchResult {
    compare_folded(reference, other, normalize::normalize_name)
}

/// Matches each reference name against its best fuzzy candidate in the
/// other column, accepting the candidate when the token-order-insensitive
/// score reaches `threshold`. A candidate chosen by any reference name is
/// consumed and never reported as extra; several reference names may
/// claim the same candidate.
pub fn compare_fuzzy(reference: &NameColumn, other: &NameColumn, threshold: f64) -> MatchResult {
    let candidates = other.values();
    let mut consumed: HashSet<usize> = HashSet::new();

    let mut result = MatchResult::default();
    for value in reference.values() {
        match fuzzy::extract_best(value, candidates) {
            Some(best) if best.score >= threshold => {
                consumed.insert(best.index);
                result.common.push(MatchPair::ScoredPair {
                    reference: value.clone(),
                    other: candidates[best.index].clone(),
                    score: best.score,
                });
            }
            _ => result.missing_in_other.push(value.clone()),
        }
    }
    for (index, value) in candidates.iter().enumerate() {
        if !consumed.contains(&index) {
            result.extra_in_other.push(value.clone());
        }
    }
    result
}

/// A name column keyed by a fold of each value. Keys keep the first-seen
/// order; when two spellings fold to the same key the later one survives
/// as the representative.
struct FoldedColumn {
    keys: Vec<String>,
    originals: HashMap<String, String>,
}

impl FoldedColumn {
    fn new(column: &NameColumn, fold: impl Fn(&str) -> String) -> Self {
        let mut keys = Vec::new();
        let mut originals: HashMap<String, String> = HashMap::new();
        for value in column.values() {
            let key = fold(value);
            if !originals.contains_key(&key) {
                keys.push(key.clone());
            }
            originals.insert(key, value.clone());
        }
        Self { keys, originals }
    }
}

fn compare_folded(
    reference: &NameColumn,
    other: &NameColumn,
    fold: impl Fn(&str) -> String,
) -> MatchResult {
    let reference = FoldedColumn::new(reference, &fold);
    let other = FoldedColumn::new(other, &fold);

    let mut result = MatchResult::default();
    for key in &reference.keys {
        match other.originals.get(key) {
            Some(matched) => result.common.push(MatchPair::Pair {
                reference: reference.originals[key].clone(),
                other: matched.clone(),
            }),
            None => result
                .missing_in_other
                .push(reference.originals[key].clone()),
        }
    }
    for key in &other.keys {
        if !reference.originals.contains_key(key) {
            result.extra_in_other.push(other.originals[key].clone());
        }
    }
    result
}
