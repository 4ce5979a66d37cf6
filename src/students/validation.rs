use std::collections::HashSet;

use super::types::{FEATURE_COLUMNS, ID_COLUMN};

/// Check a roster header against the full column contract.
/// Returns all missing columns at once (not just the first).
pub fn validate_roster_columns(headers: &csv::StringRecord) -> Result<(), Vec<String>> {
    let present: HashSet<&str> = headers.iter().map(str::trim).collect();
    let mut missing = Vec::new();

    if !present.contains(ID_COLUMN) {
        missing.push(ID_COLUMN.to_string());
    }
    for column in FEATURE_COLUMNS {
        if !present.contains(column) {
            missing.push(column.to_string());
        }
    }

    if missing.is_empty() {
        Ok(())
    } else {
        Err(missing)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header(columns: &[&str]) -> csv::StringRecord {
        csv::StringRecord::from(columns.to_vec())
    }

    fn full_header() -> Vec<&'static str> {
        let mut columns = vec![ID_COLUMN];
        columns.extend(FEATURE_COLUMNS);
        columns
    }

    #[test]
    fn test_complete_header_is_valid() {
        assert!(validate_roster_columns(&header(&full_header())).is_ok());
    }

    #[test]
    fn test_extra_columns_are_allowed() {
        let mut columns = full_header();
        columns.push("colegio");
        assert!(validate_roster_columns(&header(&columns)).is_ok());
    }

    #[test]
    fn test_collects_all_missing_columns() {
        let columns: Vec<&str> = full_header()
            .into_iter()
            .filter(|c| *c != "maths_08" && *c != "nwea_math_perc" && *c != ID_COLUMN)
            .collect();
        let missing = validate_roster_columns(&header(&columns)).unwrap_err();
        assert_eq!(missing, vec!["id", "maths_08", "nwea_math_perc"]);
    }

    #[test]
    fn test_padded_headers_are_trimmed() {
        let columns: Vec<String> = full_header().iter().map(|c| format!(" {c} ")).collect();
        let record = csv::StringRecord::from(columns);
        assert!(validate_roster_columns(&record).is_ok());
    }
}
