//! News API interaction.
//!
//! # Architecture
//!
//! The module uses a trait-based design so the paginating fetcher can run
//! against any backend:
//! - [`NewsSource`]: core trait returning one page of results
//! - [`NewsDataClient`]: implementation for the NewsData.io `news` endpoint
//!
//! No retries are attempted: a non-success HTTP status is reported as
//! [`NewsError::Api`] and transport failures as [`NewsError::Http`].

use crate::error::{NewsError, Result};
use crate::models::NewsDataResponse;
use crate::utils::truncate_for_log;
use std::fmt;
use std::time::{Duration, Instant};
use tracing::{info, instrument, warn};
use url::Url;

pub const DEFAULT_API_URL: &str = "https://newsdata.io/api/1/news";

/// Bytes of an error body kept for logs and error messages.
const ERROR_PREVIEW_BYTES: usize = 200;

/// Parameters for one country's article listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewsQuery {
    /// Lowercase ISO2 country code.
    pub country: String,
    pub language: String,
    /// Optional API category filters.
    pub categories: Vec<String>,
}

/// A paginated source of news articles.
pub trait NewsSource {
    /// Fetch one page. `page` is the cursor from the previous page's `nextPage`.
    async fn fetch_page(&self, query: &NewsQuery, page: Option<&str>) -> Result<NewsDataResponse>;
}

/// HTTP client for the NewsData.io `news` endpoint.
pub struct NewsDataClient {
    http: reqwest::Client,
    endpoint: Url,
    api_key: String,
}

impl NewsDataClient {
    /// Create a client. `timeout` applies to each request.
    pub fn new(endpoint: &str, api_key: &str, timeout: Duration) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            http,
            endpoint: Url::parse(endpoint)?,
            api_key: api_key.trim().to_string(),
        })
    }

    /// Full request URL for a query and optional page cursor.
    pub fn request_url(&self, query: &NewsQuery, page: Option<&str>) -> Url {
        let mut url = self.endpoint.clone();
        {
            let mut pairs = url.query_pairs_mut();
            pairs
                .append_pair("apikey", &self.api_key)
                .append_pair("country", &query.country.to_lowercase())
                .append_pair("language", &query.language);
            if !query.categories.is_empty() {
                pairs.append_pair("category", &query.categories.join(","));
            }
            if let Some(cursor) = page {
                pairs.append_pair("page", cursor);
            }
        }
        url
    }
}

impl fmt::Debug for NewsDataClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NewsDataClient")
            .field("endpoint", &self.endpoint.as_str())
            .field("api_key", &"<redacted>")
            .finish()
    }
}

impl NewsSource for NewsDataClient {
    #[instrument(level = "info", skip_all, fields(country = %query.country, page = ?page))]
    async fn fetch_page(&self, query: &NewsQuery, page: Option<&str>) -> Result<NewsDataResponse> {
        let t0 = Instant::now();
        let response = self.http.get(self.request_url(query, page)).send().await?;
        let status = response.status();
        let body = response.text().await?;
        let dt = t0.elapsed();

        if !status.is_success() {
            let preview = truncate_for_log(&body, ERROR_PREVIEW_BYTES);
            warn!(status = status.as_u16(), elapsed_ms = dt.as_millis(), body = %preview, "API request failed");
            return Err(NewsError::Api {
                status: status.as_u16(),
                body: preview,
            });
        }

        let parsed: NewsDataResponse = serde_json::from_str(&body)?;
        if let Some(api_status) = parsed.status.as_deref().filter(|s| *s != "success") {
            warn!(api_status, "API reported a non-success status");
            return Err(NewsError::Api {
                status: status.as_u16(),
                body: truncate_for_log(&body, ERROR_PREVIEW_BYTES),
            });
        }

        info!(
            elapsed_ms = dt.as_millis(),
            results = parsed.results.len(),
            total = ?parsed.total_results,
            has_next = parsed.next_page.is_some(),
            "Fetched page"
        );
        Ok(parsed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// Serve a single canned HTTP response on a local port, returning the endpoint URL.
    async fn serve_once(status_line: &'static str, body: String) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut request = Vec::new();
            let mut chunk = [0u8; 1024];
            while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                let n = socket.read(&mut chunk).await.unwrap();
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&chunk[..n]);
            }
            let response = format!(
                "HTTP/1.1 {status_line}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            let _ = socket.shutdown().await;
        });
        format!("http://{addr}/api/1/news")
    }

    fn local_client(endpoint: &str) -> NewsDataClient {
        NewsDataClient {
            http: reqwest::Client::builder()
                .no_proxy()
                .timeout(Duration::from_secs(5))
                .build()
                .unwrap(),
            endpoint: Url::parse(endpoint).unwrap(),
            api_key: "k".into(),
        }
    }

    fn client() -> NewsDataClient {
        NewsDataClient::new(DEFAULT_API_URL, " KEY123 ", Duration::from_secs(20)).unwrap()
    }

    fn query() -> NewsQuery {
        NewsQuery {
            country: "MX".into(),
            language: "es".into(),
            categories: vec![],
        }
    }

    #[test]
    fn test_request_url_first_page() {
        let url = client().request_url(&query(), None);
        assert_eq!(url.as_str(), "https://newsdata.io/api/1/news?apikey=KEY123&country=mx&language=es");
    }

    #[test]
    fn test_request_url_with_categories_and_cursor() {
        let mut q = query();
        q.categories = vec!["business".into(), "technology".into()];
        let url = client().request_url(&q, Some("cursor 2"));
        let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        assert_eq!(
            pairs,
            vec![
                ("apikey".into(), "KEY123".into()),
                ("country".into(), "mx".into()),
                ("language".into(), "es".into()),
                ("category".into(), "business,technology".into()),
                ("page".into(), "cursor 2".into()),
            ]
        );
    }

    #[test]
    fn test_invalid_endpoint_rejected() {
        let err = NewsDataClient::new("not a url", "k", Duration::from_secs(1)).unwrap_err();
        assert!(matches!(err, NewsError::Url(_)));
    }

    #[test]
    fn test_debug_redacts_api_key() {
        let debug = format!("{:?}", client());
        assert!(!debug.contains("KEY123"));
        assert!(debug.contains("<redacted>"));
    }

    #[tokio::test]
    async fn test_fetch_page_http_error_becomes_api_error_with_preview() {
        let endpoint = serve_once("429 Too Many Requests", "x".repeat(500)).await;
        let err = local_client(&endpoint).fetch_page(&query(), None).await.unwrap_err();
        match err {
            NewsError::Api { status, body } => {
                assert_eq!(status, 429);
                assert_eq!(body, format!("{}…(+300 bytes)", "x".repeat(ERROR_PREVIEW_BYTES)));
            }
            other => panic!("expected Api error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_fetch_page_non_success_payload_becomes_api_error() {
        let body = r#"{"status":"error","results":[]}"#.to_string();
        let endpoint = serve_once("200 OK", body.clone()).await;
        let err = local_client(&endpoint).fetch_page(&query(), None).await.unwrap_err();
        match err {
            NewsError::Api { status, body: preview } => {
                assert_eq!(status, 200);
                assert_eq!(preview, body);
            }
            other => panic!("expected Api error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_fetch_page_malformed_body_is_json_error() {
        let endpoint = serve_once("200 OK", "<html>not json</html>".to_string()).await;
        let err = local_client(&endpoint).fetch_page(&query(), None).await.unwrap_err();
        assert!(matches!(err, NewsError::Json(_)));
    }

    #[tokio::test]
    async fn test_fetch_page_success() {
        let body = r#"{"status":"success","totalResults":1,"results":[{"title":"A","link":"https://x/a"}],"nextPage":"p2"}"#;
        let endpoint = serve_once("200 OK", body.to_string()).await;
        let page = local_client(&endpoint).fetch_page(&query(), None).await.unwrap();
        assert_eq!(page.results.len(), 1);
        assert_eq!(page.next_page.as_deref(), Some("p2"));
    }
}
