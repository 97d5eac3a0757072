//! Token-set title similarity.
//!
//! Used by the reconciler to decide whether the upstream provider has
//! reassigned a movie identifier to an unrelated title. This is a heuristic
//! with fixed, behaviour-compatible thresholds, not a guaranteed-correct
//! classifier.

use std::collections::HashSet;

/// Jaccard similarity below this marks a title as changed significantly.
pub const TITLE_CHANGE_THRESHOLD: f64 = 0.5;

/// Release-year difference above this marks the year as changed.
pub const YEAR_CHANGE_THRESHOLD: i32 = 1;

fn tokens(title: &str) -> HashSet<String> {
    title
        .to_lowercase()
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || c == '_' || c.is_whitespace() {
                c
            } else {
                // Punctuation is stripped entirely, so "don't" tokenizes
                // as "dont" rather than splitting in two.
                '\u{0}'
            }
        })
        .filter(|c| *c != '\u{0}')
        .collect::<String>()
        .split_whitespace()
        .map(str::to_owned)
        .collect()
}

/// Word-level Jaccard similarity of two titles: the size of the token
/// intersection over the size of the token union, after lowercasing and
/// punctuation stripping. Two titles with no tokens at all compare as
/// identical.
pub fn title_jaccard(a: &str, b: &str) -> f64 {
    let ta = tokens(a);
    let tb = tokens(b);

    let union = ta.union(&tb).count();
    if union == 0 {
        return 1.0;
    }
    let intersection = ta.intersection(&tb).count();
    intersection as f64 / union as f64
}

/// Whether two titles share less than half their words.
pub fn titles_differ_significantly(old: &str, new: &str) -> bool {
    title_jaccard(old, new) < TITLE_CHANGE_THRESHOLD
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_titles_are_similar() {
        assert_eq!(title_jaccard("The Matrix", "The Matrix"), 1.0);
        assert!(!titles_differ_significantly("The Matrix", "The Matrix"));
    }

    #[test]
    fn case_and_punctuation_are_ignored() {
        assert_eq!(title_jaccard("Se7en!", "se7en"), 1.0);
        assert_eq!(
            title_jaccard("Spider-Man: No Way Home", "spider man no way home"),
            // "Spider-Man" collapses to "spiderman", which "spider man"
            // does not contain.
            3.0 / 6.0
        );
    }

    #[test]
    fn word_order_does_not_matter() {
        assert_eq!(title_jaccard("Kill Bill", "Bill Kill"), 1.0);
    }

    #[test]
    fn unrelated_titles_differ() {
        assert!(titles_differ_significantly(
            "Old Title",
            "Completely Different Film"
        ));
        assert_eq!(title_jaccard("Alien", "Heat"), 0.0);
    }

    #[test]
    fn empty_titles_compare_identical() {
        assert_eq!(title_jaccard("", ""), 1.0);
        assert_eq!(title_jaccard("...", "!!!"), 1.0);
        assert!(!titles_differ_significantly("", ""));
    }

    #[test]
    fn sequels_usually_stay_above_threshold() {
        // "Toy Story" vs "Toy Story 2": 2 shared / 3 total.
        assert!(title_jaccard("Toy Story", "Toy Story 2") >= TITLE_CHANGE_THRESHOLD);
    }
}
