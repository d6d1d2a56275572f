//! Report generation: JSON and CSV exports plus a per-category summary.
//!
//! # Submodules
//!
//! - [`json`]: writes the detailed report rows as pretty JSON
//! - [`csv`]: writes the flattened report table and the category summary
//!
//! # Output Structure
//!
//! Every run writes three new files, so earlier runs are never overwritten:
//!
//! ```text
//! out_dir/
//! ├── report-20250506-203000.json
//! ├── report-20250506-203000.csv
//! └── summary-20250506-203000.csv
//! ```

pub mod csv;
pub mod json;

use crate::error::Result;
use crate::models::{ReportRow, SummaryRow};
use crate::taxonomy::Taxonomy;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::{info, instrument};

/// Paths written by [`write_reports`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportPaths {
    pub json: PathBuf,
    pub csv: PathBuf,
    pub summary: PathBuf,
}

impl ReportPaths {
    pub fn new(out_dir: &Path, timestamp: &str) -> Self {
        Self {
            json: out_dir.join(format!("report-{timestamp}.json")),
            csv: out_dir.join(format!("report-{timestamp}.csv")),
            summary: out_dir.join(format!("summary-{timestamp}.csv")),
        }
    }
}

/// Count the rows carrying each category.
///
/// Only categories assigned at least once appear. Ordered by count
/// (descending), then by taxonomy declaration order.
pub fn summarize(rows: &[ReportRow], taxonomy: &Taxonomy) -> Vec<SummaryRow> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for row in rows {
        for category in &row.categories {
            *counts.entry(category.as_str()).or_default() += 1;
        }
    }

    let mut summary: Vec<SummaryRow> = counts
        .into_iter()
        .map(|(category, count)| SummaryRow {
            category: category.to_string(),
            count,
        })
        .collect();
    summary.sort_by(|a, b| {
        b.count
            .cmp(&a.count)
            .then_with(|| {
                let pa = taxonomy.position(&a.category).unwrap_or(usize::MAX);
                let pb = taxonomy.position(&b.category).unwrap_or(usize::MAX);
                pa.cmp(&pb)
            })
            .then_with(|| a.category.cmp(&b.category))
    });
    summary
}

/// Write the JSON report, the CSV report and the summary CSV.
#[instrument(level = "info", skip_all, fields(out_dir = %out_dir.display(), %timestamp, rows = rows.len()))]
pub async fn write_reports(
    rows: &[ReportRow],
    summary: &[SummaryRow],
    out_dir: &Path,
    timestamp: &str,
) -> Result<ReportPaths> {
    let paths = ReportPaths::new(out_dir, timestamp);

    json::write_report(rows, &paths.json).await?;
    csv::write_report(rows, &paths.csv).await?;
    csv::write_summary(summary, &paths.summary).await?;

    info!(
        json = %paths.json.display(),
        csv = %paths.csv.display(),
        summary = %paths.summary.display(),
        "Wrote reports"
    );
    Ok(paths)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::models::CategoryMatch;

    pub(crate) fn row(file: &str, categories: &[&str]) -> ReportRow {
        ReportRow {
            file: file.into(),
            title: format!("Title of {file}"),
            date: "2025-05-06".into(),
            source: "src".into(),
            country: "US".into(),
            language: "en".into(),
            link: format!("https://n/{file}"),
            category_hint: "top".into(),
            categories: categories.iter().map(|c| c.to_string()).collect(),
            primary_category: categories.first().copied().unwrap_or("General").into(),
            category_reason: "score>=2 (2)".into(),
            category_score: 2,
            category_hits: categories
                .iter()
                .map(|c| CategoryMatch {
                    category: c.to_string(),
                    score: 2,
                    hits: vec!["kw1".into(), "kw2".into()],
                    strong_hits: vec![],
                })
                .collect(),
            most_frequent_words: vec!["alpha".into(), "beta".into()],
            entities: vec!["Nueva York".into()],
            gpe: vec!["mexico".into()],
            dates: vec!["2025".into()],
        }
    }

    #[test]
    fn test_summarize_counts_and_order() {
        let taxonomy = Taxonomy::builtin();
        let rows = vec![
            row("a", &["Politics", "Economy"]),
            row("b", &["Economy"]),
            row("c", &[]),
            row("d", &["Sports", "Politics"]),
            row("e", &["Health"]),
        ];
        let summary = summarize(&rows, &taxonomy);
        let flat: Vec<(&str, usize)> = summary.iter().map(|s| (s.category.as_str(), s.count)).collect();
        assert_eq!(
            flat,
            vec![("Politics", 2), ("Economy", 2), ("Health", 1), ("Sports", 1)]
        );
    }

    #[test]
    fn test_summarize_empty() {
        assert!(summarize(&[], &Taxonomy::builtin()).is_empty());
        assert!(summarize(&[row("x", &[])], &Taxonomy::builtin()).is_empty());
    }

    #[test]
    fn test_report_paths() {
        let paths = ReportPaths::new(Path::new("out"), "20250506-203000");
        assert_eq!(paths.json, Path::new("out/report-20250506-203000.json"));
        assert_eq!(paths.csv, Path::new("out/report-20250506-203000.csv"));
        assert_eq!(paths.summary, Path::new("out/summary-20250506-203000.csv"));
    }

    #[tokio::test]
    async fn test_write_reports_creates_three_files() {
        let dir = tempfile::tempdir().unwrap();
        let rows = vec![row("a", &["Economy"])];
        let summary = summarize(&rows, &Taxonomy::builtin());
        let paths = write_reports(&rows, &summary, dir.path(), "20250101-000000").await.unwrap();
        assert!(paths.json.is_file());
        assert!(paths.csv.is_file());
        assert!(paths.summary.is_file());
    }
}
