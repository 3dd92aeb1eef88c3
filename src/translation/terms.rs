/*!
 * Lightweight term heuristics over chapter source text.
 *
 * Neither heuristic blocks the pipeline: the new-term estimate feeds the
 * stats report, and the capitalized-name candidates land in the suggestion
 * file for a human to curate into the real glossary.
 */

use std::collections::{BTreeSet, HashMap};

use once_cell::sync::Lazy;
use regex::Regex;

use crate::session::Glossary;

static WORD_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\w+").unwrap());

static CAPITALIZED_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\p{Lu}\p{Ll}+").unwrap());

/// Common sentence starters that the capitalized-name heuristic must not
/// mistake for names (English and Portuguese).
const STOP_WORDS: &[&str] = &[
    "The", "A", "An", "And", "But", "Or", "He", "She", "It", "They", "We", "You", "His", "Her",
    "Their", "Then", "There", "This", "That", "When", "Where", "What", "Why", "How", "If", "O",
    "Os", "As", "Um", "Uma", "Ele", "Ela", "Eles", "Elas", "Mas", "Se", "Quando", "Onde",
    "Depois", "Antes", "Chapter", "Volume",
];

/// Estimate how many distinct non-ASCII terms of the source text are not in
/// the glossary yet. Informational metric only.
pub fn count_new_terms(source_text: &str, glossary: &Glossary) -> usize {
    let mut seen = BTreeSet::new();

    for token in WORD_RE.find_iter(source_text) {
        let token = token.as_str();
        if token.chars().any(|c| !c.is_ascii()) && !glossary.contains(token) {
            seen.insert(token);
        }
    }

    seen.len()
}

/// Extract capitalized-word candidates for the glossary suggestion file.
///
/// A candidate must appear at least `min_occurrences` times, must not be in
/// the glossary or the stop-word list, and must never appear lowercased in
/// the text (a capitalized token that also shows up lowercase is ordinary
/// vocabulary at a sentence start, not a name). Returned most frequent
/// first, ties in alphabetical order.
pub fn suggest_terms(source_text: &str, glossary: &Glossary, min_occurrences: usize) -> Vec<String> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for token in CAPITALIZED_RE.find_iter(source_text) {
        *counts.entry(token.as_str()).or_insert(0) += 1;
    }

    let mut candidates: Vec<(&str, usize)> = counts
        .into_iter()
        .filter(|(token, count)| {
            *count >= min_occurrences
                && !STOP_WORDS.contains(token)
                && !glossary.contains(token)
                && !source_text.contains(&token.to_lowercase())
        })
        .collect();

    candidates.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
    candidates.into_iter().map(|(token, _)| token.to_string()).collect()
}
