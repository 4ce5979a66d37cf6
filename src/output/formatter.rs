use std::io::IsTerminal;

use owo_colors::OwoColorize;

use crate::batch::SubjectStats;
use crate::scoring::ScoreDetail;
use crate::students::Subject;

/// Trace lines shown per subject before truncation.
const MAX_TRACE_LINES: usize = 10;

/// Interpretation band for a predicted probability.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Band {
    High,
    Moderate,
    Low,
    Support,
}

impl Band {
    /// Band thresholds: > 0.7 high, > 0.5 moderate, > 0.3 low, else
    /// needs support.
    pub fn for_probability(p: f64) -> Band {
        if p > 0.7 {
            Band::High
        } else if p > 0.5 {
            Band::Moderate
        } else if p > 0.3 {
            Band::Low
        } else {
            Band::Support
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Band::High => "Alto potencial",
            Band::Moderate => "Potencial moderado",
            Band::Low => "Potencial bajo",
            Band::Support => "Necesita apoyo",
        }
    }
}

/// Check if stdout is a TTY (for auto-detecting color support)
pub fn should_use_colors() -> bool {
    std::io::stdout().is_terminal()
}

/// Format the per-subject prediction table for one student.
/// Columns: subject label, probability (4 decimals), band label.
pub fn format_predictions(predictions: &[(Subject, Option<f64>)], use_colors: bool) -> String {
    predictions
        .iter()
        .map(|(subject, prediction)| format_prediction_line(*subject, *prediction, use_colors))
        .collect::<Vec<_>>()
        .join("\n")
}

fn format_prediction_line(subject: Subject, prediction: Option<f64>, use_colors: bool) -> String {
    match prediction {
        Some(p) => {
            let band = Band::for_probability(p);
            let line = format!("{:<8} {:>8.4}  {}", subject.label(), p, band.label());
            if use_colors {
                match band {
                    Band::High => line.green().to_string(),
                    Band::Moderate => line.yellow().to_string(),
                    Band::Low => line.magenta().to_string(),
                    Band::Support => line.red().to_string(),
                }
            } else {
                line
            }
        }
        None => {
            let line = format!("{:<8} {:>8}  modelo no disponible", subject.label(), "-");
            if use_colors {
                line.dimmed().to_string()
            } else {
                line
            }
        }
    }
}

/// Format a detailed contribution trace for one subject, capped at
/// [`MAX_TRACE_LINES`] with a summary line for the remainder.
pub fn format_trace(subject: Subject, detail: &ScoreDetail, use_colors: bool) -> String {
    let lines = detail.trace();
    let mut out = Vec::with_capacity(lines.len() + 2);

    let header = format!("{} (resultado: {:.6})", subject.label(), detail.probability);
    out.push(if use_colors {
        header.bold().to_string()
    } else {
        header
    });

    for line in lines.iter().take(MAX_TRACE_LINES) {
        out.push(format!("  {line}"));
    }
    if lines.len() > MAX_TRACE_LINES {
        let more = format!("  ... y {} términos adicionales", lines.len() - MAX_TRACE_LINES);
        out.push(if use_colors {
            more.dimmed().to_string()
        } else {
            more
        });
    }

    out.join("\n")
}

/// Format the aggregate statistics table for a batch run. One row per
/// subject; a subject with no available predictions is marked as such.
pub fn format_stats(stats: &[(Subject, Option<SubjectStats>)], use_colors: bool) -> String {
    let mut lines = Vec::with_capacity(stats.len() + 1);

    let header = format!(
        "{:<8} {:>5} {:>8} {:>8} {:>8} {:>8} {:>8} {:>7} {:>7}",
        "Materia", "N", "Media", "Mediana", "Desv", "Min", "Max", ">0.5", "<0.3"
    );
    lines.push(if use_colors {
        header.bold().to_string()
    } else {
        header
    });

    for (subject, stats) in stats {
        match stats {
            Some(s) => lines.push(format!(
                "{:<8} {:>5} {:>8.3} {:>8.3} {:>8.3} {:>8.3} {:>8.3} {:>6.1}% {:>6.1}%",
                subject.label(),
                s.count,
                s.mean,
                s.median,
                s.std_dev,
                s.min,
                s.max,
                s.high_share * 100.0,
                s.support_share * 100.0
            )),
            None => {
                let line = format!("{:<8} {:>5}  modelo no disponible", subject.label(), 0);
                lines.push(if use_colors {
                    line.dimmed().to_string()
                } else {
                    line
                });
            }
        }
    }

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::batch::subject_stats;
    use crate::models::CoefficientTable;
    use crate::scoring::score_with_trace;
    use std::collections::HashMap;

    #[test]
    fn test_band_thresholds_are_strict() {
        assert_eq!(Band::for_probability(0.75), Band::High);
        assert_eq!(Band::for_probability(0.7), Band::Moderate);
        assert_eq!(Band::for_probability(0.6), Band::Moderate);
        assert_eq!(Band::for_probability(0.5), Band::Low);
        assert_eq!(Band::for_probability(0.35), Band::Low);
        assert_eq!(Band::for_probability(0.3), Band::Support);
        assert_eq!(Band::for_probability(0.0), Band::Support);
    }

    #[test]
    fn test_predictions_table_rows() {
        let predictions = vec![
            (Subject::Lectura, Some(0.6915)),
            (Subject::Math, None),
        ];
        let table = format_predictions(&predictions, false);
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].contains("LECTURA"));
        assert!(lines[0].contains("0.6915"));
        assert!(lines[0].contains("Potencial moderado"));
        assert!(lines[1].contains("MATH"));
        assert!(lines[1].contains("modelo no disponible"));
    }

    #[test]
    fn test_trace_is_capped_at_ten_lines() {
        let mut entries = vec![("_cons".to_string(), 0.1)];
        for i in 0..12 {
            entries.push((format!("feature_{i}"), 0.5));
        }
        let table = CoefficientTable::new("t", entries);
        let features: HashMap<String, f64> =
            (0..12).map(|i| (format!("feature_{i}"), 1.0)).collect();

        let detail = score_with_trace(&table, &features);
        // Intercept line + 12 material terms = 13 trace lines.
        assert_eq!(detail.trace().len(), 13);

        let rendered = format_trace(Subject::Global, &detail, false);
        let lines: Vec<&str> = rendered.lines().collect();
        // Header + 10 trace lines + truncation summary.
        assert_eq!(lines.len(), 12);
        assert!(lines[0].starts_with("GLOBAL"));
        assert_eq!(lines[11].trim(), "... y 3 términos adicionales");
    }

    #[test]
    fn test_short_trace_is_not_truncated() {
        let table = CoefficientTable::new(
            "t",
            vec![("_cons".to_string(), -1.2), ("maths_08".to_string(), 0.02)],
        );
        let features: HashMap<String, f64> =
            [("maths_08".to_string(), 85.0)].into_iter().collect();

        let rendered = format_trace(Subject::Math, &score_with_trace(&table, &features), false);
        assert!(rendered.contains("Constante: -1.200000"));
        assert!(!rendered.contains("adicionales"));
    }

    #[test]
    fn test_stats_table_contains_aggregates() {
        let stats = vec![
            (
                Subject::Math,
                subject_stats(Subject::Math, &[0.2, 0.4, 0.6, 0.8]),
            ),
            (Subject::Soc, None),
        ];
        let table = format_stats(&stats, false);
        assert!(table.contains("Materia"));
        assert!(table.contains("MATH"));
        assert!(table.contains("0.500"));
        assert!(table.contains("50.0%"));
        assert!(table.contains("modelo no disponible"));
    }
}
