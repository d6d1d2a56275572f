//! JSON export of the detailed report.
//!
//! The file holds an array of [`ReportRow`]s, pretty-printed with two-space
//! indentation and non-ASCII text left unescaped.

use crate::error::Result;
use crate::models::ReportRow;
use std::path::Path;
use tokio::fs;
use tracing::{error, info, instrument};

/// Write the report rows to `path` as a JSON array.
///
/// # Errors
///
/// Fails if serialization fails or the file cannot be written.
#[instrument(level = "info", skip_all, fields(path = %path.display(), rows = rows.len()))]
pub async fn write_report(rows: &[ReportRow], path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(rows)?;

    if let Err(e) = fs::write(path, json).await {
        error!(error = %e, "Failed to write JSON report");
        return Err(e.into());
    }
    info!("Wrote JSON report");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::outputs::tests::row;

    #[tokio::test]
    async fn test_write_report_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.json");
        let mut accented = row("b", &["Economy"]);
        accented.title = "Inflación en España".into();
        write_report(&[row("a", &["Politics"]), accented], &path).await.unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.contains("Inflación en España"));

        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        let items = value.as_array().unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0]["file"], "a");
        assert_eq!(items[0]["categories"][0], "Politics");
        assert_eq!(items[1]["category_hits"][0]["category"], "Economy");
    }

    #[tokio::test]
    async fn test_write_report_json_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.json");
        write_report(&[], &path).await.unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "[]");
    }

    #[tokio::test]
    async fn test_write_report_json_missing_dir_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nope/report.json");
        assert!(write_report(&[], &path).await.is_err());
    }
}
