//! Article download: paginate a [`NewsSource`] per country and write each
//! article to a text file.
//!
//! Per country, collection stops when `per_country` articles are gathered,
//! when a page comes back empty, when there is no next page, or when the API
//! rejects a request (logged, the run moves on to the next country).
//! Transport errors abort the run.
//!
//! Deduplication spans the whole run: an item whose link or title was already
//! collected (for any country) is skipped.

use crate::api::{NewsQuery, NewsSource};
use crate::article;
use crate::dedup::SeenArticles;
use crate::error::{NewsError, Result};
use crate::models::{NO_LINK, NO_TITLE, NewsArticle, NewsDataItem};
use crate::utils::sanitize_text;
use std::path::Path;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, info, instrument, warn};

pub const DEFAULT_COUNTRIES: &str = "us,mx,es,ar,br,co,cl,pe,cr,gb";

/// Request language for a country: English for US/GB, Spanish otherwise.
pub fn choose_language(country: &str) -> &'static str {
    match country.to_lowercase().as_str() {
        "us" | "gb" => "en",
        _ => "es",
    }
}

/// What to download in one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadPlan {
    pub countries: Vec<String>,
    pub categories: Vec<String>,
    /// Overrides [`choose_language`] for every country.
    pub language_all: Option<String>,
    pub per_country: usize,
    /// Pause between consecutive pages of one country.
    pub page_delay: Duration,
}

impl DownloadPlan {
    pub fn query_for(&self, country: &str) -> NewsQuery {
        let country = country.to_lowercase();
        let language = self
            .language_all
            .clone()
            .unwrap_or_else(|| choose_language(&country).to_string());
        NewsQuery {
            country,
            language,
            categories: self.categories.clone(),
        }
    }
}

/// Turn an API item into an article, or `None` if it has no title and no link or no body.
fn to_article(item: &NewsDataItem, query: &NewsQuery) -> Option<NewsArticle> {
    let title = sanitize_text(item.title.as_deref());
    let link = sanitize_text(item.link.as_deref());
    if title.is_empty() && link.is_empty() {
        return None;
    }

    let content = sanitize_text(item.best_content());
    if content.is_empty() {
        return None;
    }

    let description = sanitize_text(item.description.as_deref());
    let description = if description == content { String::new() } else { description };

    Some(NewsArticle {
        country: query.country.clone(),
        language: query.language.clone(),
        title: if title.is_empty() { NO_TITLE.to_string() } else { title },
        link: if link.is_empty() { NO_LINK.to_string() } else { link },
        description,
        pub_date: sanitize_text(item.pub_date.as_deref()),
        source_id: sanitize_text(item.source_id.as_deref()),
        categories: item.category_hints(),
        content,
    })
}

/// Collect up to `per_country` new articles for one query.
#[instrument(level = "info", skip_all, fields(country = %query.country, language = %query.language))]
pub async fn collect_country<S: NewsSource>(
    source: &S,
    query: &NewsQuery,
    per_country: usize,
    page_delay: Duration,
    seen: &mut SeenArticles,
) -> Result<Vec<NewsArticle>> {
    let mut collected = Vec::new();
    let mut cursor: Option<String> = None;

    while collected.len() < per_country {
        let page = match source.fetch_page(query, cursor.as_deref()).await {
            Ok(page) => page,
            Err(NewsError::Api { status, body }) => {
                warn!(status, %body, "API request rejected; stopping this country");
                break;
            }
            Err(e) => return Err(e),
        };

        if page.results.is_empty() {
            info!("No more results");
            break;
        }

        for item in &page.results {
            if collected.len() >= per_country {
                break;
            }
            let Some(article) = to_article(item, query) else {
                debug!(title = ?item.title, "Skipping item without identity or content");
                continue;
            };
            if !seen.insert(&article.link, &article.title) {
                debug!(title = %article.title, link = %article.link, "Skipping duplicate");
                continue;
            }
            collected.push(article);
        }

        match page.next_page {
            Some(next) if !next.is_empty() => cursor = Some(next),
            _ => break,
        }
        if collected.len() < per_country && !page_delay.is_zero() {
            sleep(page_delay).await;
        }
    }

    info!(count = collected.len(), "Collected articles");
    Ok(collected)
}

/// Download every country in the plan into `out_dir`. Returns the number of files written.
#[instrument(level = "info", skip_all, fields(out_dir = %out_dir.display(), countries = plan.countries.len()))]
pub async fn download<S: NewsSource>(source: &S, plan: &DownloadPlan, out_dir: &Path) -> Result<usize> {
    let mut seen = SeenArticles::new();
    let mut total_written = 0;

    for country in &plan.countries {
        let query = plan.query_for(country);
        info!(country = %country.to_uppercase(), per_country = plan.per_country, "Fetching articles");

        let articles = collect_country(source, &query, plan.per_country, plan.page_delay, &mut seen).await?;
        if articles.is_empty() {
            warn!(country = %country.to_uppercase(), "No items saved");
            continue;
        }

        for (i, article) in articles.iter().enumerate() {
            let path = article::write(out_dir, i + 1, article).await?;
            info!(path = %path.display(), "Saved article");
            total_written += 1;
        }
    }

    info!(total_written, "Download complete");
    Ok(total_written)
}
