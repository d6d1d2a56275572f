//! Command-line interface definitions for news_tagger.
//!
//! Two subcommands share one binary:
//! - `download`: fetch articles from NewsData.io into plain text files
//! - `tag`: classify those files and write CSV/JSON reports

use crate::api::DEFAULT_API_URL;
use crate::fetcher::{DEFAULT_COUNTRIES, DownloadPlan};
use crate::tagger::TagOptions;
use crate::tagger::classify::ClassifyOptions;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::time::Duration;

/// Command-line arguments for the news_tagger application.
///
/// # Examples
///
/// ```sh
/// # Download one article per default country
/// news_tagger download --api-key YOUR_KEY
///
/// # Three business/technology articles from two countries, all in English
/// news_tagger download --api-key YOUR_KEY --countries us,gb --per-country 3 \
///     --categories business,technology --language-all en
///
/// # Tag everything under ./data
/// news_tagger tag --data ./data --out ./output --top 12 --min-matches 2
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Download a small multi-country news corpus as plain text files
    Download(DownloadArgs),
    /// Classify article files and write report/summary files
    Tag(TagArgs),
}

#[derive(Args, Debug)]
pub struct DownloadArgs {
    /// NewsData.io API key
    #[arg(long, env = "NEWSDATA_API_KEY", hide_env_values = true)]
    pub api_key: String,

    /// Comma-separated ISO2 country codes
    #[arg(long, default_value = DEFAULT_COUNTRIES)]
    pub countries: String,

    /// Optional comma-separated API categories (e.g. business,technology,top)
    #[arg(long)]
    pub categories: Option<String>,

    /// How many articles to save per country
    #[arg(long, default_value_t = 1)]
    pub per_country: usize,

    /// Output directory for the .txt files
    #[arg(long, default_value = "./data")]
    pub out: PathBuf,

    /// Force one language for every request (e.g. en); default is en for US/GB, es otherwise
    #[arg(long)]
    pub language_all: Option<String>,

    /// News endpoint URL
    #[arg(long, env = "NEWSDATA_API_URL", default_value = DEFAULT_API_URL)]
    pub api_url: String,

    /// Pause between pages of the same country, in milliseconds
    #[arg(long, default_value_t = 600)]
    pub page_delay_ms: u64,

    /// Per-request timeout, in seconds
    #[arg(long, default_value_t = 20)]
    pub timeout_secs: u64,
}

impl DownloadArgs {
    pub fn plan(&self) -> DownloadPlan {
        DownloadPlan {
            countries: split_list(&self.countries),
            categories: self.categories.as_deref().map(split_list).unwrap_or_default(),
            language_all: self
                .language_all
                .as_deref()
                .map(|l| l.trim().to_lowercase())
                .filter(|l| !l.is_empty()),
            per_country: self.per_country,
            page_delay: Duration::from_millis(self.page_delay_ms),
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Args, Debug)]
pub struct TagArgs {
    /// Folder containing .txt news files
    #[arg(long, default_value = "./data")]
    pub data: PathBuf,

    /// Output folder for JSON/CSV reports
    #[arg(long, default_value = "./output")]
    pub out: PathBuf,

    /// Top-N words to report per article
    #[arg(long, default_value_t = 12)]
    pub top: usize,

    /// Minimum weighted keyword hits to accept a category
    #[arg(long, default_value_t = 2)]
    pub min_matches: usize,

    /// Disable the extra weight of strong keywords
    #[arg(long)]
    pub disable_strong: bool,

    /// Only analyze articles whose Language header equals this code
    #[arg(long)]
    pub language_all: Option<String>,

    /// YAML taxonomy replacing the built-in one
    #[arg(long)]
    pub taxonomy: Option<PathBuf>,

    /// Classify on title and description only
    #[arg(long)]
    pub title_only: bool,
}

impl TagArgs {
    pub fn options(&self) -> TagOptions {
        TagOptions {
            top_n: self.top,
            classify: ClassifyOptions {
                min_matches: self.min_matches,
                allow_strong: !self.disable_strong,
            },
            title_only: self.title_only,
            language: self
                .language_all
                .as_deref()
                .map(str::trim)
                .filter(|l| !l.is_empty())
                .map(String::from),
        }
    }
}

/// Split a comma-separated list, trimming and lowercasing entries and dropping blanks.
fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_lowercase())
        .filter(|s| !s.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn download_args(extra: &[&str]) -> DownloadArgs {
        let mut argv = vec!["news_tagger", "download", "--api-key", "k"];
        argv.extend_from_slice(extra);
        match Cli::parse_from(argv).command {
            Command::Download(args) => args,
            other => panic!("unexpected command: {other:?}"),
        }
    }

    fn tag_args(extra: &[&str]) -> TagArgs {
        let mut argv = vec!["news_tagger", "tag"];
        argv.extend_from_slice(extra);
        match Cli::parse_from(argv).command {
            Command::Tag(args) => args,
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_download_defaults() {
        let args = download_args(&[]);
        assert_eq!(args.api_key, "k");
        assert_eq!(args.per_country, 1);
        assert_eq!(args.out, PathBuf::from("./data"));

        let plan = args.plan();
        assert_eq!(plan.countries, vec!["us", "mx", "es", "ar", "br", "co", "cl", "pe", "cr", "gb"]);
        assert!(plan.categories.is_empty());
        assert!(plan.language_all.is_none());
        assert_eq!(plan.page_delay, Duration::from_millis(600));
        assert_eq!(args.timeout(), Duration::from_secs(20));
    }

    #[test]
    fn test_download_flags() {
        let args = download_args(&[
            "--countries",
            " US, ,mx ",
            "--categories",
            "Business,technology",
            "--per-country",
            "3",
            "--out",
            "/tmp/news",
            "--language-all",
            " EN ",
        ]);
        let plan = args.plan();
        assert_eq!(plan.countries, vec!["us", "mx"]);
        assert_eq!(plan.categories, vec!["business", "technology"]);
        assert_eq!(plan.per_country, 3);
        assert_eq!(plan.language_all.as_deref(), Some("en"));
        assert_eq!(args.out, PathBuf::from("/tmp/news"));
    }

    #[test]
    fn test_tag_defaults() {
        let args = tag_args(&[]);
        assert_eq!(args.data, PathBuf::from("./data"));
        assert_eq!(args.out, PathBuf::from("./output"));
        assert_eq!(args.options(), TagOptions::default());
        assert!(args.taxonomy.is_none());
    }

    #[test]
    fn test_tag_flags() {
        let args = tag_args(&[
            "--data",
            "in",
            "--out",
            "out",
            "--top",
            "5",
            "--min-matches",
            "1",
            "--disable-strong",
            "--language-all",
            "es",
            "--title-only",
            "--taxonomy",
            "tax.yaml",
        ]);
        let opts = args.options();
        assert_eq!(opts.top_n, 5);
        assert_eq!(opts.classify.min_matches, 1);
        assert!(!opts.classify.allow_strong);
        assert!(opts.title_only);
        assert_eq!(opts.language.as_deref(), Some("es"));
        assert_eq!(args.taxonomy, Some(PathBuf::from("tax.yaml")));
    }

    #[test]
    fn test_split_list() {
        assert_eq!(split_list("a, B ,,c"), vec!["a", "b", "c"]);
        assert!(split_list("").is_empty());
    }
}
