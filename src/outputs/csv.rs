//! CSV exports: the flattened report table and the category summary.
//!
//! List fields are joined with `;`. Category hits are rendered as
//! `Category:kw1,kw2;Other:kw3`, strong keywords following ordinary ones.

use crate::error::Result;
use crate::models::{CategoryMatch, ReportRow, SummaryRow};
use itertools::Itertools;
use serde::Serialize;
use std::path::Path;
use tokio::fs;
use tracing::{info, instrument};

const REPORT_HEADERS: &[&str] = &[
    "file",
    "title",
    "date",
    "source",
    "country",
    "language",
    "link",
    "category_hint",
    "categories",
    "primary_category",
    "category_reason",
    "category_score",
    "category_hits",
    "most_frequent_words",
    "entities",
    "gpe",
    "dates",
];

const SUMMARY_HEADERS: &[&str] = &["category", "count"];

#[derive(Debug, Serialize)]
struct CsvReportRow<'a> {
    file: &'a str,
    title: &'a str,
    date: &'a str,
    source: &'a str,
    country: &'a str,
    language: &'a str,
    link: &'a str,
    category_hint: &'a str,
    categories: String,
    primary_category: &'a str,
    category_reason: &'a str,
    category_score: usize,
    category_hits: String,
    most_frequent_words: String,
    entities: String,
    gpe: String,
    dates: String,
}

impl<'a> From<&'a ReportRow> for CsvReportRow<'a> {
    fn from(row: &'a ReportRow) -> Self {
        Self {
            file: &row.file,
            title: &row.title,
            date: &row.date,
            source: &row.source,
            country: &row.country,
            language: &row.language,
            link: &row.link,
            category_hint: &row.category_hint,
            categories: row.categories.join(";"),
            primary_category: &row.primary_category,
            category_reason: &row.category_reason,
            category_score: row.category_score,
            category_hits: flatten_hits(&row.category_hits),
            most_frequent_words: row.most_frequent_words.join(";"),
            entities: row.entities.join(";"),
            gpe: row.gpe.join(";"),
            dates: row.dates.join(";"),
        }
    }
}

fn flatten_hits(matches: &[CategoryMatch]) -> String {
    matches
        .iter()
        .map(|m| {
            let keywords = m.hits.iter().chain(&m.strong_hits).unique().join(",");
            format!("{}:{}", m.category, keywords)
        })
        .join(";")
}

/// Serialize records to CSV bytes. The header row is always written, even with no records.
fn to_csv_bytes<T: Serialize>(headers: &[&str], records: impl IntoIterator<Item = T>) -> Result<Vec<u8>> {
    let mut writer = ::csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(Vec::new());
    writer.write_record(headers)?;
    for record in records {
        writer.serialize(record)?;
    }
    writer.into_inner().map_err(|e| e.into_error().into())
}

/// Write report rows as a flat CSV table.
///
/// # Arguments
/// * `rows` - Report rows in processing order
/// * `path` - Destination file, overwritten if present
///
/// # Errors
/// Returns an error if serialization or the file write fails.
#[instrument(level = "info", skip_all, fields(path = %path.display(), rows = rows.len()))]
pub async fn write_report(rows: &[ReportRow], path: &Path) -> Result<()> {
    let bytes = to_csv_bytes(REPORT_HEADERS, rows.iter().map(CsvReportRow::from))?;
    fs::write(path, bytes).await?;
    info!("Wrote CSV report");
    Ok(())
}

/// Write the `category,count` summary table.
#[instrument(level = "info", skip_all, fields(path = %path.display(), categories = summary.len()))]
pub async fn write_summary(summary: &[SummaryRow], path: &Path) -> Result<()> {
    let bytes = to_csv_bytes(SUMMARY_HEADERS, summary)?;
    fs::write(path, bytes).await?;
    info!("Wrote summary CSV");
    Ok(())
}
