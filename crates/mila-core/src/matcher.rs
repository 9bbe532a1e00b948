//! Token-overlap matcher for spoken queries.

use std::collections::HashSet;

/// A candidate only matches when its overlap score is strictly above this.
pub const MATCH_THRESHOLD: f64 = 0.5;

fn token_set(text: &str) -> HashSet<&str> {
    text.split_whitespace().collect()
}

fn set_score(a: &HashSet<&str>, b: &HashSet<&str>) -> f64 {
    let denominator = a.len().max(b.len());
    if denominator == 0 {
        return 0.0;
    }
    let common = a.intersection(b).count();
    common as f64 / denominator as f64
}

/// Overlap score between two texts: `|intersection| / max(|a|, |b|)` over
/// whitespace-split token sets. Two empty texts score 0.
pub fn overlap_score(a: &str, b: &str) -> f64 {
    set_score(&token_set(a), &token_set(b))
}

/// The candidate with the highest overlap score against `query`, when that
/// score is strictly above [`MATCH_THRESHOLD`]. Ties keep the earliest
/// candidate; callers iterate stored questions in key order, so equal scores
/// resolve to the lexicographically smallest question.
pub fn find_best_match<'a, I>(query: &str, candidates: I) -> Option<&'a str>
where
    I: IntoIterator<Item = &'a str>,
{
    let query_tokens = token_set(query);
    let mut best: Option<(&str, f64)> = None;
    for candidate in candidates {
        let score = set_score(&query_tokens, &token_set(candidate));
        if best.map_or(true, |(_, high)| score > high) {
            best = Some((candidate, score));
        }
    }
    best.filter(|&(_, score)| score > MATCH_THRESHOLD)
        .map(|(candidate, _)| candidate)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_texts_score_one() {
        assert_eq!(overlap_score("what is your name", "what is your name"), 1.0);
    }

    #[test]
    fn partial_overlap_uses_larger_set() {
        // {"name"} vs {"what","is","your","name"}: 1/4
        assert_eq!(overlap_score("name", "what is your name"), 0.25);
    }

    #[test]
    fn duplicate_tokens_collapse() {
        assert_eq!(overlap_score("name name name", "name"), 1.0);
    }

    #[test]
    fn empty_texts_score_zero() {
        assert_eq!(overlap_score("", ""), 0.0);
        assert_eq!(overlap_score("", "what is your name"), 0.0);
    }

    #[test]
    fn exact_query_matches() {
        let stored = ["what is your name"];
        assert_eq!(
            find_best_match("what is your name", stored),
            Some("what is your name")
        );
    }

    #[test]
    fn below_threshold_is_no_match() {
        let stored = ["what is your name"];
        assert_eq!(find_best_match("name", stored), None);
    }

    #[test]
    fn threshold_is_strict() {
        // {"a","b"} vs {"a","c"} would be 1/2 = 0.5 exactly: not a match.
        assert_eq!(find_best_match("a b", ["a c"]), None);
    }

    #[test]
    fn no_candidates_is_no_match() {
        assert_eq!(find_best_match("anything", std::iter::empty()), None);
    }

    #[test]
    fn ties_resolve_to_first_candidate() {
        // Both candidates score 2/3 against the query; key-ordered input
        // makes the lexicographically smaller one win.
        let stored = ["open the door", "open the window"];
        assert_eq!(
            find_best_match("open the hatch", stored),
            Some("open the door")
        );
    }

    #[test]
    fn higher_score_beats_earlier_candidate() {
        let stored = ["what is the time", "what is your name"];
        assert_eq!(
            find_best_match("tell me what is your name", stored),
            Some("what is your name")
        );
    }
}
