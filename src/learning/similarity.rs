//! Jaccard similarity over token sets

use std::collections::HashSet;

use super::tokenizer::tokenize;

/// `|A ∩ B| / |A ∪ B|` over the token sets of two texts.
///
/// 0.0 when either side has no tokens.
pub fn similarity(a: &str, b: &str) -> f64 {
    let left: HashSet<String> = tokenize(a).into_iter().collect();
    let right: HashSet<String> = tokenize(b).into_iter().collect();
    token_similarity(&left, &right)
}

/// Jaccard similarity of two pre-tokenized sets
pub fn token_similarity(left: &HashSet<String>, right: &HashSet<String>) -> f64 {
    if left.is_empty() || right.is_empty() {
        return 0.0;
    }
    let intersection = left.intersection(right).count();
    let union = left.union(right).count();
    intersection as f64 / union as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identical_texts() {
        assert_eq!(similarity("what is gravity", "What is GRAVITY"), 1.0);
    }

    #[test]
    fn test_symmetric() {
        let a = "capital of France is Paris";
        let b = "what is the capital of France";
        assert_eq!(similarity(a, b), similarity(b, a));
        // {capital, france, paris} vs {what, the, capital, france}
        assert!((similarity(a, b) - 2.0 / 5.0).abs() < 1e-9);
    }

    #[test]
    fn test_empty_is_zero() {
        assert_eq!(similarity("", "gravity"), 0.0);
        assert_eq!(similarity("a b", "a b"), 0.0);
    }

    #[test]
    fn test_disjoint() {
        assert_eq!(similarity("gravity force", "poetry novel"), 0.0);
    }
}
