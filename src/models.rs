//! Data models for news articles and their tagged representations.
//!
//! This module defines the core data structures used throughout the application:
//! - [`NewsDataResponse`] / [`NewsDataItem`]: one page of the NewsData.io `news` endpoint
//! - [`NewsArticle`]: a sanitized article ready to be written to disk
//! - [`ArticleFile`]: an article file read back by the tagger
//! - [`ReportRow`], [`CategoryMatch`], [`SummaryRow`]: tagger output

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Title written when the API item has none.
pub const NO_TITLE: &str = "(no title)";
/// Link written when the API item has none.
pub const NO_LINK: &str = "(no link)";

/// One page of results from the NewsData.io `news` endpoint.
#[derive(Debug, Deserialize)]
pub struct NewsDataResponse {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(rename = "totalResults", default)]
    pub total_results: Option<u64>,
    #[serde(default)]
    pub results: Vec<NewsDataItem>,
    /// Cursor for the following page; absent on the last one.
    #[serde(rename = "nextPage", default)]
    pub next_page: Option<String>,
}

/// A single raw article as returned by the API. Every field is optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewsDataItem {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub link: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub full_description: Option<String>,
    #[serde(rename = "pubDate", default)]
    pub pub_date: Option<String>,
    #[serde(default)]
    pub source_id: Option<String>,
    /// Usually a list of strings, occasionally a bare string.
    #[serde(default)]
    pub category: Option<Value>,
}

impl NewsDataItem {
    /// The richest non-blank body: `content`, then `full_description`, then `description`.
    pub fn best_content(&self) -> Option<&str> {
        [&self.content, &self.full_description, &self.description]
            .into_iter()
            .filter_map(|field| field.as_deref())
            .find(|text| !text.trim().is_empty())
    }

    /// Category hints supplied by the API, lowercased.
    pub fn category_hints(&self) -> Vec<String> {
        match &self.category {
            Some(Value::Array(items)) => items
                .iter()
                .filter_map(Value::as_str)
                .map(|s| s.trim().to_lowercase())
                .filter(|s| !s.is_empty())
                .collect(),
            Some(Value::String(s)) if !s.trim().is_empty() => vec![s.trim().to_lowercase()],
            _ => Vec::new(),
        }
    }
}

/// A downloaded article, sanitized and ready to be written as a text file.
#[derive(Debug, Clone, PartialEq)]
pub struct NewsArticle {
    /// Lowercase ISO2 country code the article was requested for.
    pub country: String,
    pub language: String,
    pub title: String,
    pub link: String,
    /// Empty unless the API description differs from the body.
    pub description: String,
    pub pub_date: String,
    pub source_id: String,
    pub categories: Vec<String>,
    pub content: String,
}

/// An article text file as read back by the tagger.
///
/// Header fields missing from the file are empty strings.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ArticleFile {
    /// File name (no directory).
    pub file: String,
    pub title: String,
    pub description: String,
    pub date: String,
    pub source: String,
    pub country: String,
    pub language: String,
    pub category_hint: String,
    pub link: String,
    /// Text after the content marker, or the whole file when there is no header.
    pub body: String,
}

/// Matches found for one category in one article.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryMatch {
    pub category: String,
    /// Weighted match count (strong keywords weigh more than ordinary ones).
    pub score: usize,
    /// Matched ordinary keywords (normalized).
    pub hits: Vec<String>,
    /// Matched strong keywords (normalized); empty when strong keywords are disabled.
    pub strong_hits: Vec<String>,
}

/// One article's flattened classification and signal-extraction result.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportRow {
    pub file: String,
    pub title: String,
    pub date: String,
    pub source: String,
    pub country: String,
    pub language: String,
    pub link: String,
    /// Category hints the news API attached to the article.
    pub category_hint: String,
    /// Assigned categories, in taxonomy declaration order.
    pub categories: Vec<String>,
    pub primary_category: String,
    pub category_reason: String,
    pub category_score: usize,
    /// Every category with at least one hit, in declaration order.
    pub category_hits: Vec<CategoryMatch>,
    pub most_frequent_words: Vec<String>,
    pub entities: Vec<String>,
    pub gpe: Vec<String>,
    pub dates: Vec<String>,
}

/// Number of report rows carrying a category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SummaryRow {
    pub category: String,
    pub count: usize,
}
