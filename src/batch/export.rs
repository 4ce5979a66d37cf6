use std::path::Path;

use anyhow::{Context, Result};
use atomic_write_file::AtomicWriteFile;

use crate::students::{Roster, Student, Subject, FEATURE_COLUMNS, ID_COLUMN};

use super::StudentPredictions;

/// Write the scored roster: original columns followed by one
/// `pred_<subject>` column per subject. Unavailable predictions become
/// empty cells. The write is atomic, so a failed run never leaves a torn
/// file behind.
pub fn write_scored_roster(
    path: &Path,
    roster: &Roster,
    predictions: &[StudentPredictions],
) -> Result<()> {
    let mut file = AtomicWriteFile::open(path)
        .with_context(|| format!("failed to open output file at {}", path.display()))?;

    {
        let mut writer = csv::Writer::from_writer(&mut file);

        let mut header = roster.columns.clone();
        header.extend(Subject::ALL.iter().map(|s| format!("pred_{}", s.key())));
        writer
            .write_record(&header)
            .context("failed to write output header")?;

        for (student, row) in roster.students.iter().zip(predictions) {
            let mut record = Vec::with_capacity(header.len());
            for column in &roster.columns {
                if column == ID_COLUMN {
                    record.push(student.id.clone());
                } else {
                    record.push(feature_cell(student, column));
                }
            }
            for prediction in &row.predictions {
                record.push(prediction_cell(*prediction));
            }
            writer
                .write_record(&record)
                .with_context(|| format!("failed to write output row for {}", student.id))?;
        }

        writer.flush().context("failed to flush output file")?;
    }

    file.commit().context("failed to save output file")?;
    Ok(())
}

/// Write one student's captured features plus predictions as a one-row
/// CSV: `id`, the contract feature columns, then `pred_<subject>`.
pub fn write_student_export(
    path: &Path,
    student: &Student,
    predictions: &[(Subject, Option<f64>)],
) -> Result<()> {
    let mut file = AtomicWriteFile::open(path)
        .with_context(|| format!("failed to open output file at {}", path.display()))?;

    {
        let mut writer = csv::Writer::from_writer(&mut file);

        let mut header = vec![ID_COLUMN.to_string()];
        header.extend(FEATURE_COLUMNS.iter().map(|c| c.to_string()));
        header.extend(
            predictions
                .iter()
                .map(|(subject, _)| format!("pred_{}", subject.key())),
        );
        writer
            .write_record(&header)
            .context("failed to write output header")?;

        let mut record = vec![student.id.clone()];
        for column in FEATURE_COLUMNS {
            record.push(feature_cell(student, column));
        }
        for (_, prediction) in predictions {
            record.push(prediction_cell(*prediction));
        }
        writer
            .write_record(&record)
            .context("failed to write output row")?;

        writer.flush().context("failed to flush output file")?;
    }

    file.commit().context("failed to save output file")?;
    Ok(())
}

fn feature_cell(student: &Student, column: &str) -> String {
    match student.features.get(column) {
        Some(value) if value.is_finite() => value.to_string(),
        _ => String::new(),
    }
}

fn prediction_cell(prediction: Option<f64>) -> String {
    match prediction {
        Some(p) => p.to_string(),
        None => String::new(),
    }
}
