//! Keyword-taxonomy classifier.
//!
//! Text and keywords are both normalized (accents stripped, lowercased) and a
//! keyword matches when it occurs as a substring. Each distinct keyword counts
//! once: ordinary keywords weigh 1, strong keywords weigh the acceptance
//! threshold so a single strong hit qualifies a category on its own.
//!
//! Every category reaching the threshold is assigned, in taxonomy declaration
//! order. The primary category is the best-scoring assigned one (earliest
//! declared on ties), or [`DEFAULT_CATEGORY`].

use crate::models::CategoryMatch;
use crate::taxonomy::{DEFAULT_CATEGORY, Taxonomy};
use crate::utils::normalize_text;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClassifyOptions {
    /// Minimum weighted score to accept a category. `0` behaves like `1`.
    pub min_matches: usize,
    /// Whether strong keywords get their extra weight.
    pub allow_strong: bool,
}

impl Default for ClassifyOptions {
    fn default() -> Self {
        Self {
            min_matches: 2,
            allow_strong: true,
        }
    }
}

impl ClassifyOptions {
    fn threshold(&self) -> usize {
        self.min_matches.max(1)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    /// Accepted categories in declaration order.
    pub categories: Vec<String>,
    pub primary: String,
    pub reason: String,
    /// Score of the primary category, or of the best rejected one.
    pub score: usize,
    /// Every category with a non-zero score, in declaration order.
    pub matches: Vec<CategoryMatch>,
}

/// Classify `text` against every category of `taxonomy`.
///
/// # Arguments
/// * `text` - Raw article text; normalized before matching
/// * `taxonomy` - Categories in declaration order
/// * `opts` - Acceptance threshold and strong-keyword switch
///
/// # Returns
/// The accepted categories, the primary category with its reason and score,
/// and the per-category hits. Empty text yields no categories.
pub fn classify(text: &str, taxonomy: &Taxonomy, opts: &ClassifyOptions) -> Classification {
    let normalized = normalize_text(text);
    let threshold = opts.threshold();

    let mut matches = Vec::new();
    for category in taxonomy.categories() {
        let hits: Vec<String> = category
            .keywords
            .iter()
            .filter(|k| normalized.contains(k.as_str()))
            .cloned()
            .collect();
        let strong_hits: Vec<String> = if opts.allow_strong {
            category
                .strong
                .iter()
                .filter(|k| normalized.contains(k.as_str()))
                .cloned()
                .collect()
        } else {
            Vec::new()
        };

        let ordinary_only = hits.iter().filter(|h| !strong_hits.contains(h)).count();
        // --min-matches is unbounded; saturate rather than wrap
        let score = strong_hits.len().saturating_mul(threshold).saturating_add(ordinary_only);
        if score > 0 {
            matches.push(CategoryMatch {
                category: category.name.clone(),
                score,
                hits,
                strong_hits,
            });
        }
    }

    let categories: Vec<String> = matches
        .iter()
        .filter(|m| m.score >= threshold)
        .map(|m| m.category.clone())
        .collect();

    // strictly-greater keeps the earliest declared category on ties
    let best = matches
        .iter()
        .fold(None::<&CategoryMatch>, |best, m| match best {
            Some(b) if b.score >= m.score => Some(b),
            _ => Some(m),
        });

    let (primary, reason, score) = match best {
        Some(m) if m.score >= threshold => {
            let reason = if m.hits.len() >= threshold {
                format!("score>={threshold} ({})", m.score)
            } else {
                format!("strong_keyword:{}", m.strong_hits.first().map(String::as_str).unwrap_or_default())
            };
            (m.category.clone(), reason, m.score)
        }
        Some(m) => (DEFAULT_CATEGORY.to_string(), format!("below_threshold ({})", m.score), m.score),
        None => (DEFAULT_CATEGORY.to_string(), "no_hits".to_string(), 0),
    };

    Classification {
        categories,
        primary,
        reason,
        score,
        matches,
    }
}
