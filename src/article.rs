//! Plain-text article file format shared by the downloader and the tagger.
//!
//! ```text
//! Title: Inflation slows in March
//! Description: Prices rose 0.2%            (optional)
//! Date: 2025-04-10 12:00:00
//! Source: example_news
//! Country: US
//! Language: en
//! Category: business,top
//! Link: https://example.com/a
//!
//! ----- CONTENT -----
//!
//! Body text...
//! ```
//!
//! Header keys are case-insensitive. A file without the content marker is
//! treated as body text in its entirety, but any header lines it does carry
//! are still honoured.

use crate::error::Result;
use crate::models::{ArticleFile, NewsArticle};
use once_cell::sync::Lazy;
use regex::Regex;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, instrument};

pub const CONTENT_MARKER: &str = "----- CONTENT -----";

static HEADER_LINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?im)^(title|description|date|source|country|language|category|link):[ \t]*(.*)$")
        .expect("valid regex")
});

/// File name for the `idx`-th article of a country, e.g. `US_001.txt`.
pub fn file_name(country: &str, idx: usize) -> String {
    format!("{}_{:03}.txt", country.to_uppercase(), idx)
}

/// Render an article in the on-disk format.
pub fn render(article: &NewsArticle) -> String {
    let mut header = vec![format!("Title: {}", article.title)];
    if !article.description.is_empty() {
        header.push(format!("Description: {}", article.description));
    }
    header.extend([
        format!("Date: {}", article.pub_date),
        format!("Source: {}", article.source_id),
        format!("Country: {}", article.country.to_uppercase()),
        format!("Language: {}", article.language),
        format!("Category: {}", article.categories.join(",")),
        format!("Link: {}", article.link),
        String::new(),
        CONTENT_MARKER.to_string(),
        String::new(),
    ]);

    let mut out = header.join("\n");
    if !article.content.starts_with('\n') {
        out.push('\n');
    }
    out.push_str(&article.content);
    out
}

/// Write an article into `out_dir`, returning the path written.
#[instrument(level = "debug", skip_all, fields(out_dir = %out_dir.display(), idx = idx))]
pub async fn write(out_dir: &Path, idx: usize, article: &NewsArticle) -> Result<PathBuf> {
    fs::create_dir_all(out_dir).await?;
    let path = out_dir.join(file_name(&article.country, idx));
    fs::write(&path, render(article)).await?;
    debug!(path = %path.display(), "Wrote article file");
    Ok(path)
}

/// Parse an article file. Never fails: missing pieces come back empty.
pub fn parse(file: &str, text: &str) -> ArticleFile {
    let (head, body) = match text.find(CONTENT_MARKER) {
        Some(pos) => (&text[..pos], text[pos + CONTENT_MARKER.len()..].trim()),
        None => (text, text.trim()),
    };

    let mut article = ArticleFile {
        file: file.to_string(),
        body: body.to_string(),
        ..Default::default()
    };

    for caps in HEADER_LINE.captures_iter(head) {
        let value = caps[2].trim().to_string();
        let slot = match caps[1].to_ascii_lowercase().as_str() {
            "title" => &mut article.title,
            "description" => &mut article.description,
            "date" => &mut article.date,
            "source" => &mut article.source,
            "country" => &mut article.country,
            "language" => &mut article.language,
            "category" => &mut article.category_hint,
            _ => &mut article.link,
        };
        // first occurrence wins
        if slot.is_empty() {
            *slot = value;
        }
    }
    article
}

/// Read and parse an article file from disk.
///
/// Invalid UTF-8 is replaced rather than rejected.
#[instrument(level = "debug", skip_all, fields(path = %path.display()))]
pub async fn read(path: &Path) -> Result<ArticleFile> {
    let bytes = fs::read(path).await?;
    let text = String::from_utf8_lossy(&bytes);
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();
    Ok(parse(&name, &text))
}
