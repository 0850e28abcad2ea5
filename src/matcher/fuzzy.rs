use strsim::normalized_levenshtein;

/// Best fuzzy candidate for a query: index into the candidate slice plus
/// the similarity score in the 0-100 range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BestMatch {
    pub index: usize,
    pub score: f64,
}

/// Token-order-insensitive similarity between two names, scaled to 0-100.
/// Both sides are lower-cased, split on non-alphanumeric characters, and
/// their tokens sorted before the edit-distance ratio is taken, so
/// "Port au Prince" and "Prince, Port au" score as an exact match.
pub fn token_sort_ratio(left: &str, right: &str) -> f64 {
    normalized_levenshtein(&sorted_tokens(left), &sorted_tokens(right)) * 100.0
}

/// Picks the candidate with the highest [`token_sort_ratio`] against the
/// query. Ties keep the earliest candidate. Returns `None` only for an
/// empty candidate set.
pub fn extract_best(query: &str, candidates: &[String]) -> Option<BestMatch> {
    let mut best: Option<BestMatch> = None;
    for (index, candidate) in candidates.iter().enumerate() {
        let score = token_sort_ratio(query, candidate);
        if best.is_none_or(|current| score > current.score) {
            best = Some(BestMatch { index, score });
        }
    }
    best
}

fn sorted_tokens(name: &str) -> String {
    let lowered = name.to_lowercase();
    let spaced: String = lowered
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { ' ' })
        .collect();
    let mut tokens: Vec<&str> = spaced.split_whitespace().collect();
    tokens.sort_unstable();
    tokens.join(" ")
}
