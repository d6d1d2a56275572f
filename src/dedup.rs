//! Per-run article deduplication.
//!
//! An article is a duplicate when its link *or* its title was already seen in
//! the same run. Blank values and the `(no title)` / `(no link)` placeholders
//! never identify an article.

use crate::models::{NO_LINK, NO_TITLE};
use std::collections::HashSet;

#[derive(Debug, Default)]
pub struct SeenArticles {
    links: HashSet<String>,
    titles: HashSet<String>,
}

impl SeenArticles {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_duplicate(&self, link: &str, title: &str) -> bool {
        identity(link, NO_LINK).is_some_and(|l| self.links.contains(l))
            || identity(title, NO_TITLE).is_some_and(|t| self.titles.contains(t))
    }

    /// Record an article. Returns `false` (and records nothing) if it is a duplicate.
    pub fn insert(&mut self, link: &str, title: &str) -> bool {
        if self.is_duplicate(link, title) {
            return false;
        }
        if let Some(l) = identity(link, NO_LINK) {
            self.links.insert(l.to_string());
        }
        if let Some(t) = identity(title, NO_TITLE) {
            self.titles.insert(t.to_string());
        }
        true
    }
}

fn identity<'a>(value: &'a str, placeholder: &str) -> Option<&'a str> {
    let value = value.trim();
    (!value.is_empty() && value != placeholder).then_some(value)
}
