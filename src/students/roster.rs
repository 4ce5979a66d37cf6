use std::collections::HashMap;
use std::path::Path;

use anyhow::{bail, Context, Result};

use super::types::{Student, ID_COLUMN};
use super::validation::validate_roster_columns;

/// A parsed roster plus parse diagnostics.
#[derive(Debug)]
pub struct Roster {
    pub students: Vec<Student>,
    /// Column order of the source file, kept for export.
    pub columns: Vec<String>,
    /// Non-blank numeric cells that failed coercion. Each one scores as a
    /// skipped term; the count feeds verbose diagnostics, never an error.
    pub coercion_failures: usize,
}

/// Read a roster CSV: a header row carrying the full column contract,
/// then one row per student. Missing required columns are reported
/// together in a single error.
pub fn read_roster(path: &Path) -> Result<Roster> {
    let mut reader = csv::Reader::from_path(path)
        .with_context(|| format!("failed to open roster at {}", path.display()))?;

    let headers = reader
        .headers()
        .with_context(|| format!("failed to read roster header at {}", path.display()))?
        .clone();

    if let Err(missing) = validate_roster_columns(&headers) {
        bail!("roster is missing required columns: {}", missing.join(", "));
    }

    let columns: Vec<String> = headers.iter().map(|h| h.trim().to_string()).collect();
    let mut students = Vec::new();
    let mut coercion_failures = 0;

    for (index, record) in reader.records().enumerate() {
        // Header is line 1, data starts at line 2.
        let record =
            record.with_context(|| format!("failed to read roster row {}", index + 2))?;

        let mut id = String::new();
        let mut features = HashMap::new();
        for (column, cell) in columns.iter().zip(record.iter()) {
            let cell = cell.trim();
            if column == ID_COLUMN {
                id = cell.to_string();
                continue;
            }
            let value = match cell.parse::<f64>() {
                Ok(v) => v,
                Err(_) => {
                    if !cell.is_empty() {
                        coercion_failures += 1;
                    }
                    f64::NAN
                }
            };
            features.insert(column.clone(), value);
        }
        students.push(Student { id, features });
    }

    Ok(Roster {
        students,
        columns,
        coercion_failures,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::students::types::FEATURE_COLUMNS;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn roster_csv(rows: &[&str]) -> NamedTempFile {
        let mut header = vec![ID_COLUMN.to_string()];
        header.extend(FEATURE_COLUMNS.iter().map(|c| c.to_string()));

        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "{}", header.join(",")).unwrap();
        for row in rows {
            writeln!(file, "{row}").unwrap();
        }
        file
    }

    #[test]
    fn test_reads_students_with_features() {
        let file = roster_csv(&[
            "A-1,1,17,1,0,0,0,0,0,85,90,80,75,50,60",
            "A-2,0,16,0,1,0,0,0,2,70,65,72,68,40,45",
        ]);
        let roster = read_roster(file.path()).unwrap();
        assert_eq!(roster.students.len(), 2);
        assert_eq!(roster.coercion_failures, 0);

        let first = &roster.students[0];
        assert_eq!(first.id, "A-1");
        assert_eq!(first.features["estu_mujer"], 1.0);
        assert_eq!(first.features["maths_08"], 90.0);
        assert_eq!(first.features.len(), FEATURE_COLUMNS.len());
    }

    #[test]
    fn test_missing_columns_reported_together() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "id,estu_mujer,edad_grado").unwrap();
        writeln!(file, "A-1,1,17").unwrap();

        let err = read_roster(file.path()).unwrap_err().to_string();
        assert!(err.contains("missing required columns"));
        assert!(err.contains("maths_08"));
        assert!(err.contains("nwea_reading_perc"));
    }

    #[test]
    fn test_bad_cell_is_counted_and_skippable() {
        let file = roster_csv(&["A-1,1,17,1,0,0,0,0,0,85,oops,80,75,50,60"]);
        let roster = read_roster(file.path()).unwrap();
        assert_eq!(roster.coercion_failures, 1);
        assert!(roster.students[0].features["maths_08"].is_nan());
    }

    #[test]
    fn test_blank_cell_is_missing_not_a_failure() {
        let file = roster_csv(&["A-1,1,17,1,0,0,0,0,0,85,,80,75,50,60"]);
        let roster = read_roster(file.path()).unwrap();
        assert_eq!(roster.coercion_failures, 0);
        assert!(roster.students[0].features["maths_08"].is_nan());
    }

    #[test]
    fn test_column_order_is_preserved() {
        let file = roster_csv(&["A-1,1,17,1,0,0,0,0,0,85,90,80,75,50,60"]);
        let roster = read_roster(file.path()).unwrap();
        assert_eq!(roster.columns[0], "id");
        assert_eq!(roster.columns[1], "estu_mujer");
        assert_eq!(roster.columns.last().unwrap(), "nwea_reading_perc");
    }
}
