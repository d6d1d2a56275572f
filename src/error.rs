//! Error type shared by the fetcher, tagger and reporter.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum NewsError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("API returned HTTP {status}: {body}")]
    Api { status: u16, body: String },

    #[error("Taxonomy error: {0}")]
    Taxonomy(String),
}

pub type Result<T> = std::result::Result<T, NewsError>;
