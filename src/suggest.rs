//! Spelling suggestions for unrecognized command names.
//!
//! A deliberately cheap similarity heuristic, not edit distance: prefix
//! matches always outrank substring matches, which always outrank partial
//! character-position matches. Good enough for "Circl" → "Circle".

/// Rank `candidates` by similarity to `input`, highest first, ties in
/// candidate order. Zero-score candidates are excluded.
pub fn find_similar(input: &str, candidates: &[String], max_results: usize) -> Vec<String> {
    let needle = input.to_lowercase();

    let mut scored: Vec<(f64, &String)> = candidates
        .iter()
        .filter_map(|name| {
            let score = similarity(&needle, &name.to_lowercase());
            if score > 0.0 {
                Some((score, name))
            } else {
                None
            }
        })
        .collect();

    // Stable sort keeps catalog order for equal scores.
    scored.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(std::cmp::Ordering::Equal));

    scored
        .into_iter()
        .take(max_results)
        .map(|(_, name)| name.clone())
        .collect()
}

fn similarity(input: &str, candidate: &str) -> f64 {
    if candidate.starts_with(input) {
        return 100.0;
    }
    if candidate.contains(input) {
        return 50.0;
    }

    // Count positions where the two names agree, over the shorter length.
    let a: Vec<char> = input.chars().collect();
    let b: Vec<char> = candidate.chars().collect();
    let matches = a.iter().zip(b.iter()).filter(|(x, y)| x == y).count();
    let max_len = a.len().max(b.len());
    if max_len == 0 {
        return 0.0;
    }
    (matches as f64 / max_len as f64) * 30.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn names(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn prefix_match_ranks_first() {
        let known = names(&["Circle", "Line", "Segment"]);
        let result = find_similar("Cir", &known, 3);
        assert_eq!(result[0], "Circle");
    }

    #[test]
    fn prefix_beats_substring() {
        let known = names(&["Incircle", "Circle"]);
        let result = find_similar("circ", &known, 2);
        // "circle" starts with "circ" (100); "incircle" only contains it (50)
        assert_eq!(result, vec!["Circle", "Incircle"]);
    }

    #[test]
    fn positional_match_as_last_resort() {
        let known = names(&["Circle"]);
        // "cyrcle" is neither a prefix nor a substring of "circle" but
        // agrees on 5 of 6 character positions
        let result = find_similar("Cyrcle", &known, 3);
        assert_eq!(result, vec!["Circle"]);
    }

    #[test]
    fn zero_score_candidates_are_dropped() {
        let known = names(&["Line"]);
        assert!(find_similar("xyzw", &known, 3).is_empty());
    }

    #[test]
    fn respects_max_results() {
        let known = names(&["Circle", "Circumference", "CircularArc", "CircularSector"]);
        assert_eq!(find_similar("Circ", &known, 2).len(), 2);
    }

    #[test]
    fn ties_keep_candidate_order() {
        let known = names(&["Arc", "Area", "Angle"]);
        let result = find_similar("A", &known, 3);
        assert_eq!(result, vec!["Arc", "Area", "Angle"]);
    }
}
