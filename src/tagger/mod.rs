//! Article tagging: classification plus signal extraction over a directory of
//! article files.
//!
//! Files are processed one by one in sorted order. Unreadable files are logged
//! and skipped, duplicates (same link or same title as an earlier file) are
//! dropped, and empty files still produce a row with no categories.

pub mod classify;
pub mod signals;

use crate::article;
use crate::dedup::SeenArticles;
use crate::models::{ArticleFile, ReportRow};
use crate::taxonomy::Taxonomy;
use classify::{ClassifyOptions, classify};
use std::path::PathBuf;
use tracing::{debug, error, info, instrument};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagOptions {
    /// Number of frequent words reported per article.
    pub top_n: usize,
    pub classify: ClassifyOptions,
    /// Analyze only title and description instead of the whole article.
    pub title_only: bool,
    /// Only analyze articles whose `Language:` header matches (files without one are kept).
    pub language: Option<String>,
}

impl Default for TagOptions {
    fn default() -> Self {
        Self {
            top_n: 12,
            classify: ClassifyOptions::default(),
            title_only: false,
            language: None,
        }
    }
}

/// The text an article is classified on.
fn analysis_text(article: &ArticleFile, title_only: bool) -> String {
    let mut parts = vec![article.title.as_str(), article.description.as_str()];
    if !title_only {
        parts.push(article.body.as_str());
    }
    let text = parts
        .into_iter()
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .collect::<Vec<_>>()
        .join(" ");

    if text.is_empty() { article.body.clone() } else { text }
}

/// Classify one article and extract its signals.
pub fn analyze(article: &ArticleFile, taxonomy: &Taxonomy, opts: &TagOptions) -> ReportRow {
    let text = analysis_text(article, opts.title_only);
    let classification = classify(&text, taxonomy, &opts.classify);
    let signals = signals::extract(&text, opts.top_n);

    ReportRow {
        file: article.file.clone(),
        title: article.title.clone(),
        date: article.date.clone(),
        source: article.source.clone(),
        country: article.country.clone(),
        language: article.language.clone(),
        link: article.link.clone(),
        category_hint: article.category_hint.clone(),
        categories: classification.categories,
        primary_category: classification.primary,
        category_reason: classification.reason,
        category_score: classification.score,
        category_hits: classification.matches,
        most_frequent_words: signals.top_words,
        entities: signals.entities,
        gpe: signals.locations,
        dates: signals.dates,
    }
}

fn language_matches(article: &ArticleFile, wanted: Option<&str>) -> bool {
    match wanted {
        None => true,
        Some(_) if article.language.is_empty() => true,
        Some(lang) => article.language.eq_ignore_ascii_case(lang),
    }
}

/// Tag every file in `files`, returning one row per distinct article.
#[instrument(level = "info", skip_all, fields(files = files.len()))]
pub async fn tag_files(files: &[PathBuf], taxonomy: &Taxonomy, opts: &TagOptions) -> Vec<ReportRow> {
    let mut seen = SeenArticles::new();
    let mut rows = Vec::with_capacity(files.len());

    for path in files {
        let article = match article::read(path).await {
            Ok(a) => a,
            Err(e) => {
                error!(path = %path.display(), error = %e, "Failed processing file; skipping");
                continue;
            }
        };

        if !language_matches(&article, opts.language.as_deref()) {
            debug!(file = %article.file, language = %article.language, "Language filtered out");
            continue;
        }
        if !seen.insert(&article.link, &article.title) {
            info!(file = %article.file, title = %article.title, "Duplicate article; skipping");
            continue;
        }

        let row = analyze(&article, taxonomy, opts);
        debug!(
            file = %row.file,
            categories = ?row.categories,
            primary = %row.primary_category,
            reason = %row.category_reason,
            "Tagged article"
        );
        rows.push(row);
    }

    info!(rows = rows.len(), "Tagging complete");
    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::outputs::summarize;
    use std::path::Path;

    fn write(dir: &Path, name: &str, title: &str, link: &str, lang: &str, body: &str) -> PathBuf {
        let path = dir.join(name);
        let text = format!(
            "Title: {title}\nDate: 2025-05-06\nSource: test\nCountry: US\nLanguage: {lang}\nLink: {link}\n\n----- CONTENT -----\n\n{body}"
        );
        std::fs::write(&path, text).unwrap();
        path
    }

    fn corpus(dir: &Path) -> Vec<PathBuf> {
        let mut files = vec![
            write(dir, "US_001.txt", "Central bank raises interest rate", "https://n/1", "en", "Inflation keeps climbing in the United States."),
            write(dir, "US_002.txt", "Quiet Sunday", "https://n/2", "en", "Nothing notable happened."),
            write(dir, "US_003.txt", "Central bank raises interest rate", "https://n/3", "en", "Same story, other link."),
            write(dir, "US_004.txt", "Senate election runoff set", "https://n/1", "en", "Other title, same link."),
            write(dir, "MX_001.txt", "Senado aprueba reforma del gobierno", "https://n/5", "es", "El presidente celebró."),
        ];
        let empty = dir.join("ZZ_empty.txt");
        std::fs::write(&empty, "").unwrap();
        files.push(empty);
        files.sort();
        files
    }

    #[test]
    fn test_analysis_text_modes() {
        let article = ArticleFile {
            title: "Title".into(),
            description: "Desc".into(),
            body: "Body".into(),
            ..Default::default()
        };
        assert_eq!(analysis_text(&article, false), "Title Desc Body");
        assert_eq!(analysis_text(&article, true), "Title Desc");

        let headless = ArticleFile {
            body: "Only body".into(),
            ..Default::default()
        };
        assert_eq!(analysis_text(&headless, true), "Only body");
    }

    #[test]
    fn test_analyze_builds_row() {
        let article = ArticleFile {
            file: "US_001.txt".into(),
            title: "Central bank raises interest rate".into(),
            country: "US".into(),
            language: "en".into(),
            link: "https://n/1".into(),
            body: "Inflation keeps climbing in the United States.".into(),
            ..Default::default()
        };
        let row = analyze(&article, &Taxonomy::builtin(), &TagOptions::default());
        assert_eq!(row.file, "US_001.txt");
        assert!(row.categories.contains(&"Economy".to_string()));
        assert_eq!(row.primary_category, "Economy");
        assert!(row.gpe.contains(&"united states".to_string()));
        assert!(row.entities.contains(&"United States".to_string()));
    }

    #[test]
    fn test_language_filter() {
        let es = ArticleFile { language: "es".into(), ..Default::default() };
        let unknown = ArticleFile::default();
        assert!(language_matches(&es, None));
        assert!(language_matches(&es, Some("ES")));
        assert!(!language_matches(&es, Some("en")));
        assert!(language_matches(&unknown, Some("en")));
    }

    #[tokio::test]
    async fn test_tag_files_deduplicates_and_keeps_empty_files() {
        let dir = tempfile::tempdir().unwrap();
        let files = corpus(dir.path());
        let rows = tag_files(&files, &Taxonomy::builtin(), &TagOptions::default()).await;

        let names: Vec<&str> = rows.iter().map(|r| r.file.as_str()).collect();
        // US_003 repeats a title, US_004 repeats a link
        assert_eq!(names, vec!["MX_001.txt", "US_001.txt", "US_002.txt", "ZZ_empty.txt"]);

        let empty = rows.iter().find(|r| r.file == "ZZ_empty.txt").unwrap();
        assert!(empty.categories.is_empty());
        assert_eq!(empty.primary_category, "General");
    }

    #[tokio::test]
    async fn test_tag_files_skips_missing_files() {
        let dir = tempfile::tempdir().unwrap();
        let mut files = corpus(dir.path());
        files.insert(0, dir.path().join("missing.txt"));
        let rows = tag_files(&files, &Taxonomy::builtin(), &TagOptions::default()).await;
        assert_eq!(rows.len(), 4);
    }

    #[tokio::test]
    async fn test_tag_files_language_filter() {
        let dir = tempfile::tempdir().unwrap();
        let files = corpus(dir.path());
        let opts = TagOptions {
            language: Some("es".into()),
            ..Default::default()
        };
        let rows = tag_files(&files, &Taxonomy::builtin(), &opts).await;
        let names: Vec<&str> = rows.iter().map(|r| r.file.as_str()).collect();
        assert_eq!(names, vec!["MX_001.txt", "ZZ_empty.txt"]);
    }

    #[tokio::test]
    async fn test_tagging_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let files = corpus(dir.path());
        let taxonomy = Taxonomy::builtin();
        let first = tag_files(&files, &taxonomy, &TagOptions::default()).await;
        let second = tag_files(&files, &taxonomy, &TagOptions::default()).await;
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_summary_counts_match_rows() {
        let dir = tempfile::tempdir().unwrap();
        let files = corpus(dir.path());
        let taxonomy = Taxonomy::builtin();
        let opts = TagOptions {
            classify: ClassifyOptions { min_matches: 1, allow_strong: true },
            ..Default::default()
        };
        let rows = tag_files(&files, &taxonomy, &opts).await;
        let summary = summarize(&rows, &taxonomy);

        assert!(!summary.is_empty());
        for entry in &summary {
            let expected = rows.iter().filter(|r| r.categories.contains(&entry.category)).count();
            assert_eq!(entry.count, expected, "count mismatch for {}", entry.category);
        }
        for row in &rows {
            for category in &row.categories {
                assert!(summary.iter().any(|s| &s.category == category));
            }
        }
    }
}
