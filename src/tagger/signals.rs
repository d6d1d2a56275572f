//! Shallow text signals: frequent words, date-like tokens, capitalized
//! entity guesses and known locations.
//!
//! All of these are heuristics with no correctness guarantee.

use crate::utils::normalize_text;
use itertools::Itertools;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::{HashMap, HashSet};

/// Cap on dates, entities and locations reported per article.
pub const MAX_ITEMS: usize = 15;

static TOKEN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\p{L}+").expect("valid regex"));

static DATE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(
        r"(?i)\b\d{1,2}[/-]\d{1,2}[/-]\d{2,4}\b",
        r"|\b\d{4}\b",
        r"|\b\d{1,2}\s+de\s+[a-z]+?\s+de\s+\d{4}\b",
        r"|\b(?:jan|feb|mar|apr|may|jun|jul|aug|sep|oct|nov|dec)[a-z]*\s+\d{1,2},\s+\d{4}\b",
    ))
    .expect("valid regex")
});

static CAPITALIZED_RUN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b\p{Lu}\p{Ll}+(?:\s+\p{Lu}\p{Ll}+){1,3}\b").expect("valid regex"));

static STOPWORDS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        // es
        "el", "la", "los", "las", "y", "en", "de", "del", "un", "una", "que", "por", "con", "a",
        "o", "se", "al", "como", "su", "sus", "para", "es", "son", "fue", "ser", "esta", "este",
        "estos",
        // en
        "the", "and", "of", "in", "to", "for", "on", "is", "are", "be", "as", "by", "it", "that",
        "at",
        // pt
        "os", "as", "do", "da", "e", "em", "com", "no", "na",
    ]
    .into_iter()
    .collect()
});

const ENTITY_STOP_TOKENS: &[&str] = &["El", "La", "Los", "Las", "Un", "Una", "De", "Del", "Y", "En", "Da", "Do", "A"];

const KNOWN_LOCATIONS: &[&str] = &[
    "costa rica", "estados unidos", "ee uu", "mexico", "españa", "argentina", "brasil",
    "colombia", "chile", "peru", "reino unido", "gran bretana", "francia", "alemania", "italia",
    "japon", "china", "lima", "bogota", "sao paulo", "rio de janeiro",
    "united states", "spain", "brazil", "united kingdom", "france", "germany", "italy", "japan",
    "london", "madrid", "paris", "berlin", "rome", "tokyo", "beijing", "lisbon", "porto",
    "portugal",
];

static LOCATIONS: Lazy<Vec<String>> =
    Lazy::new(|| KNOWN_LOCATIONS.iter().map(|p| normalize_text(p)).unique().collect());

/// Shallow textual signals of one article, each list capped at [`MAX_ITEMS`]
/// except `top_words`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Signals {
    pub top_words: Vec<String>,
    pub dates: Vec<String>,
    pub entities: Vec<String>,
    pub locations: Vec<String>,
}

/// Extract every signal from `text`.
///
/// # Arguments
/// * `text` - Raw article text
/// * `top_n` - How many frequent words to keep
///
/// # Returns
/// A [`Signals`] value; empty text yields empty lists.
pub fn extract(text: &str, top_n: usize) -> Signals {
    Signals {
        top_words: top_words(text, top_n),
        dates: dates(text),
        entities: entities(text),
        locations: locations(text),
    }
}

/// The `n` most frequent non-stopword tokens longer than two characters.
///
/// Tokens are lowercased and accent-stripped; ties keep first-occurrence order.
pub fn top_words(text: &str, n: usize) -> Vec<String> {
    let mut counts: HashMap<String, (usize, usize)> = HashMap::new();
    for (idx, m) in TOKEN.find_iter(text).enumerate() {
        let token = normalize_text(m.as_str());
        if token.chars().count() <= 2 || STOPWORDS.contains(token.as_str()) {
            continue;
        }
        counts.entry(token).or_insert((0, idx)).0 += 1;
    }

    counts
        .into_iter()
        .sorted_by(|(_, (ca, ia)), (_, (cb, ib))| cb.cmp(ca).then(ia.cmp(ib)))
        .take(n)
        .map(|(word, _)| word)
        .collect()
}

/// Date-like tokens (`5/3/2024`, `12 de marzo de 2024`, `Mar 5, 2024`, bare
/// years) in first-seen order, without repeats.
pub fn dates(text: &str) -> Vec<String> {
    DATE.find_iter(text)
        .map(|m| m.as_str().to_string())
        .unique()
        .take(MAX_ITEMS)
        .collect()
}

/// Runs of 2–4 capitalized words, skipping runs that contain an article or
/// preposition such as "El" or "De".
pub fn entities(text: &str) -> Vec<String> {
    CAPITALIZED_RUN
        .find_iter(text)
        .map(|m| m.as_str())
        .filter(|candidate| {
            candidate
                .split_whitespace()
                .all(|tok| !ENTITY_STOP_TOKENS.contains(&tok))
        })
        .map(|candidate| candidate.split_whitespace().join(" "))
        .unique()
        .take(MAX_ITEMS)
        .collect()
}

/// Known places occurring in the text, in list order.
pub fn locations(text: &str) -> Vec<String> {
    let normalized = normalize_text(text);
    LOCATIONS
        .iter()
        .filter(|place| normalized.contains(place.as_str()))
        .take(MAX_ITEMS)
        .cloned()
        .collect()
}
