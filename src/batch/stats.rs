use crate::students::Subject;

/// Probability above which a prediction counts toward the high-potential
/// share.
const HIGH_THRESHOLD: f64 = 0.5;

/// Probability below which a prediction counts toward the needs-support
/// share.
const SUPPORT_THRESHOLD: f64 = 0.3;

/// Summary of one subject's predictions across a roster.
#[derive(Debug, Clone)]
pub struct SubjectStats {
    pub subject: Subject,
    pub count: usize,
    pub mean: f64,
    pub median: f64,
    /// Sample standard deviation (n - 1); `0.0` with fewer than two values.
    pub std_dev: f64,
    pub min: f64,
    pub max: f64,
    /// Fraction of predictions above [`HIGH_THRESHOLD`].
    pub high_share: f64,
    /// Fraction of predictions below [`SUPPORT_THRESHOLD`].
    pub support_share: f64,
}

/// Compute the summary over the available predictions for one subject.
/// `None` when no prediction was available (e.g. the model was missing).
pub fn subject_stats(subject: Subject, values: &[f64]) -> Option<SubjectStats> {
    if values.is_empty() {
        return None;
    }

    let count = values.len();
    let mean = values.iter().sum::<f64>() / count as f64;

    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    let median = if count % 2 == 1 {
        sorted[count / 2]
    } else {
        (sorted[count / 2 - 1] + sorted[count / 2]) / 2.0
    };

    let std_dev = if count < 2 {
        0.0
    } else {
        let variance =
            values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (count - 1) as f64;
        variance.sqrt()
    };

    let high = values.iter().filter(|v| **v > HIGH_THRESHOLD).count();
    let support = values.iter().filter(|v| **v < SUPPORT_THRESHOLD).count();

    Some(SubjectStats {
        subject,
        count,
        mean,
        median,
        std_dev,
        min: sorted[0],
        max: sorted[count - 1],
        high_share: high as f64 / count as f64,
        support_share: support as f64 / count as f64,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stats_on_known_values() {
        let stats = subject_stats(Subject::Math, &[0.2, 0.4, 0.6, 0.8]).unwrap();
        assert_eq!(stats.count, 4);
        assert!((stats.mean - 0.5).abs() < 1e-12);
        assert!((stats.median - 0.5).abs() < 1e-12);
        assert!((stats.std_dev - 0.258_198_889_747_161_3).abs() < 1e-12);
        assert_eq!(stats.min, 0.2);
        assert_eq!(stats.max, 0.8);
        assert!((stats.high_share - 0.5).abs() < 1e-12);
        assert!((stats.support_share - 0.25).abs() < 1e-12);
    }

    #[test]
    fn test_odd_count_median() {
        let stats = subject_stats(Subject::Soc, &[0.9, 0.1, 0.4]).unwrap();
        assert_eq!(stats.median, 0.4);
    }

    #[test]
    fn test_single_value_has_zero_std_dev() {
        let stats = subject_stats(Subject::Global, &[0.75]).unwrap();
        assert_eq!(stats.std_dev, 0.0);
        assert_eq!(stats.mean, 0.75);
        assert_eq!(stats.high_share, 1.0);
    }

    #[test]
    fn test_no_values_yields_none() {
        assert!(subject_stats(Subject::Ingles, &[]).is_none());
    }

    #[test]
    fn test_thresholds_are_strict() {
        let stats = subject_stats(Subject::Math, &[0.5, 0.3]).unwrap();
        assert_eq!(stats.high_share, 0.0);
        assert_eq!(stats.support_share, 0.0);
    }
}
