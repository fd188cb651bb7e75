//! Bulk import: column checks and the per-row outcome summary.
//!
//! Rows are replayed one by one on a best-effort basis. A bad row is recorded
//! and skipped; it never aborts the rest of the import.

use serde::Serialize;

use crate::error::CoreError;

/// Maximum rows accepted in one import request.
pub const MAX_IMPORT_ROWS: usize = 5_000;

/// A failed row. Row numbers are 1-based over the data rows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RowError {
    pub row: usize,
    pub error: String,
}

/// Outcome of a bulk import.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ImportSummary {
    pub success: usize,
    pub failed: usize,
    pub errors: Vec<RowError>,
}

impl ImportSummary {
    pub fn record_success(&mut self) {
        self.success += 1;
    }

    pub fn record_failure(&mut self, row: usize, error: impl Into<String>) {
        self.failed += 1;
        self.errors.push(RowError {
            row,
            error: error.into(),
        });
    }

    pub fn total(&self) -> usize {
        self.success + self.failed
    }
}

/// Check that the declared columns include every required column and that no
/// column is declared twice.
pub fn validate_columns(columns: &[String], required: &[&str]) -> Result<(), CoreError> {
    let missing: Vec<&str> = required
        .iter()
        .copied()
        .filter(|req| !columns.iter().any(|c| c == req))
        .collect();
    if !missing.is_empty() {
        return Err(CoreError::Validation(format!(
            "Missing required columns: {}",
            missing.join(", ")
        )));
    }

    let mut seen = std::collections::HashSet::new();
    if let Some(dup) = columns.iter().find(|c| !seen.insert(c.as_str())) {
        return Err(CoreError::Validation(format!("Duplicate column: {dup}")));
    }
    Ok(())
}

/// Check the row count of an import request.
pub fn validate_row_count(count: usize) -> Result<(), CoreError> {
    if count == 0 {
        return Err(CoreError::Validation("Import contains no rows".to_string()));
    }
    if count > MAX_IMPORT_ROWS {
        return Err(CoreError::Validation(format!(
            "Import exceeds maximum of {MAX_IMPORT_ROWS} rows (got {count})"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cols(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn required_columns_present() {
        assert!(validate_columns(&cols(&["name", "slug", "city"]), &["name", "slug"]).is_ok());
    }

    #[test]
    fn missing_columns_listed() {
        let err = validate_columns(&cols(&["city"]), &["name", "slug"]).unwrap_err();
        assert!(err.to_string().contains("name, slug"));
    }

    #[test]
    fn duplicate_column_rejected() {
        let err = validate_columns(&cols(&["name", "slug", "name"]), &["name"]).unwrap_err();
        assert!(err.to_string().contains("Duplicate column: name"));
    }

    #[test]
    fn row_count_bounds() {
        assert!(validate_row_count(0).is_err());
        assert!(validate_row_count(1).is_ok());
        assert!(validate_row_count(MAX_IMPORT_ROWS + 1).is_err());
    }

    #[test]
    fn summary_aggregates_rows() {
        let mut summary = ImportSummary::default();
        summary.record_success();
        summary.record_failure(2, "slug taken");
        summary.record_success();
        assert_eq!(summary.success, 2);
        assert_eq!(summary.failed, 1);
        assert_eq!(summary.total(), 3);
        assert_eq!(
            summary.errors,
            vec![RowError {
                row: 2,
                error: "slug taken".into()
            }]
        );
    }
}
