use std::collections::HashMap;
use std::fs;
use std::path::Path;

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use serde_json::Value;

use super::types::Student;

/// Raw single-student input: an `id` plus whatever feature keys the file
/// carries. Unknown keys are kept; the engine ignores features no model
/// uses.
#[derive(Debug, Deserialize)]
struct StudentRecord {
    id: Value,
    #[serde(flatten)]
    features: HashMap<String, Value>,
}

/// Read a single student's features from a JSON object file.
///
/// Numeric entries (and numeric strings) become feature values; anything
/// unparseable becomes a non-finite value the engine skips at score time.
pub fn read_student_file(path: &Path) -> Result<Student> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("failed to read student file at {}", path.display()))?;
    let record: StudentRecord = serde_json::from_str(&content)
        .with_context(|| format!("failed to parse student file at {}", path.display()))?;
    record.into_student()
}

impl StudentRecord {
    fn into_student(self) -> Result<Student> {
        let id = match &self.id {
            Value::String(s) => s.trim().to_string(),
            Value::Number(n) => n.to_string(),
            _ => String::new(),
        };
        if id.is_empty() {
            bail!("student file has a blank or unusable \"id\"");
        }

        let features = self
            .features
            .into_iter()
            .map(|(name, value)| (name, numeric_value(&value)))
            .collect();

        Ok(Student { id, features })
    }
}

/// Feature-value coercion for JSON input. Mirrors the roster policy: a
/// value that is not a finite number becomes NaN, and the affected term is
/// skipped at scoring time.
fn numeric_value(value: &Value) -> f64 {
    match value {
        Value::Number(n) => n.as_f64().unwrap_or(f64::NAN),
        Value::String(s) => s.trim().parse().unwrap_or(f64::NAN),
        Value::Bool(b) => {
            if *b {
                1.0
            } else {
                0.0
            }
        }
        _ => f64::NAN,
    }
}
