pub mod export;
pub mod stats;

pub use export::{write_scored_roster, write_student_export};
pub use stats::{subject_stats, SubjectStats};

use indicatif::ProgressBar;

use crate::models::ModelCollection;
use crate::scoring;
use crate::students::{model_name, GradeBand, Student, Subject};

/// Predictions for one student, ordered as [`Subject::ALL`]. `None` marks
/// a subject whose model was unavailable.
#[derive(Debug, Clone)]
pub struct StudentPredictions {
    pub id: String,
    pub predictions: Vec<Option<f64>>,
}

impl StudentPredictions {
    pub fn get(&self, subject: Subject) -> Option<f64> {
        self.predictions.get(subject.index()).copied().flatten()
    }
}

/// Outcome of a batch run.
#[derive(Debug)]
pub struct BatchOutcome {
    pub predictions: Vec<StudentPredictions>,
    /// Model names that had no sheet, in subject order.
    pub missing_models: Vec<String>,
    /// True when not a single subject could be scored.
    pub nothing_scored: bool,
}

/// Score every student against every subject's model for the selected
/// grade band. A missing model marks its subject unavailable on every row
/// and the run continues; per-student scoring itself never fails.
pub fn run_batch(
    collection: &ModelCollection,
    students: &[Student],
    band: GradeBand,
    show_progress: bool,
) -> BatchOutcome {
    // Resolve each subject's model once; the collection never changes
    // mid-run.
    let models: Vec<_> = Subject::ALL
        .iter()
        .map(|&subject| (subject, collection.get(&model_name(subject, band))))
        .collect();

    let missing_models: Vec<String> = models
        .iter()
        .filter(|(_, model)| model.is_none())
        .map(|(subject, _)| model_name(*subject, band))
        .collect();

    let progress = if show_progress {
        ProgressBar::new(students.len() as u64)
    } else {
        ProgressBar::hidden()
    };

    let mut predictions = Vec::with_capacity(students.len());
    for student in students {
        let row = models
            .iter()
            .map(|(_, model)| model.map(|table| scoring::score(table, &student.features)))
            .collect();
        predictions.push(StudentPredictions {
            id: student.id.clone(),
            predictions: row,
        });
        progress.inc(1);
    }
    progress.finish_and_clear();

    let nothing_scored = missing_models.len() == Subject::ALL.len();
    BatchOutcome {
        predictions,
        missing_models,
        nothing_scored,
    }
}

/// Available predictions for one subject across a batch outcome.
pub fn subject_values(predictions: &[StudentPredictions], subject: Subject) -> Vec<f64> {
    predictions
        .iter()
        .filter_map(|row| row.get(subject))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CoefficientTable;
    use std::collections::HashMap;

    fn collection_with(names: &[&str]) -> ModelCollection {
        let mut collection = ModelCollection::new();
        for name in names {
            collection.insert(CoefficientTable::new(
                *name,
                vec![("_cons".to_string(), -1.2), ("maths_08".to_string(), 0.02)],
            ));
        }
        collection
    }

    fn students() -> Vec<Student> {
        let mut features = HashMap::new();
        features.insert("maths_08".to_string(), 85.0);
        vec![
            Student::new("A-1", features),
            Student::new("A-2", HashMap::new()),
        ]
    }

    #[test]
    fn test_missing_model_marks_subject_unavailable() {
        let collection = collection_with(&["s11_math_mod24"]);
        let outcome = run_batch(&collection, &students(), GradeBand::Upper, false);

        assert_eq!(outcome.predictions.len(), 2);
        assert!(!outcome.nothing_scored);

        let first = &outcome.predictions[0];
        assert!(first.get(Subject::Math).is_some());
        assert!(first.get(Subject::Lectura).is_none());

        // One entry per missing subject, math not among them.
        assert_eq!(outcome.missing_models.len(), Subject::ALL.len() - 1);
        assert!(!outcome.missing_models.contains(&"s11_math_mod24".to_string()));
        assert!(outcome.missing_models.contains(&"s11_lectura_mod24".to_string()));
    }

    #[test]
    fn test_predictions_match_engine() {
        let collection = collection_with(&["s11_math_mod24"]);
        let outcome = run_batch(&collection, &students(), GradeBand::Upper, false);

        let p = outcome.predictions[0].get(Subject::Math).unwrap();
        assert!((p - 0.6915).abs() < 1e-4);
        let p = outcome.predictions[1].get(Subject::Math).unwrap();
        assert!((p - 0.1151).abs() < 1e-4);
    }

    #[test]
    fn test_empty_collection_scores_nothing() {
        let collection = collection_with(&["s11_math_mod14"]);
        // Band mismatch: nothing resolvable for the upper band.
        let outcome = run_batch(&collection, &students(), GradeBand::Upper, false);
        assert!(outcome.nothing_scored);
        assert_eq!(outcome.missing_models.len(), Subject::ALL.len());
        assert!(outcome.predictions.iter().all(|row| row
            .predictions
            .iter()
            .all(|p| p.is_none())));
    }

    #[test]
    fn test_subject_values_filters_unavailable() {
        let collection = collection_with(&["s11_math_mod24"]);
        let outcome = run_batch(&collection, &students(), GradeBand::Upper, false);

        assert_eq!(subject_values(&outcome.predictions, Subject::Math).len(), 2);
        assert!(subject_values(&outcome.predictions, Subject::Soc).is_empty());
    }
}
