use std::collections::HashMap;

use crate::models::CoefficientTable;

use super::probit::normal_cdf;

/// Contributions at or below this absolute value stay out of the trace.
/// They still accumulate into the linear score.
pub const MATERIALITY_THRESHOLD: f64 = 0.001;

/// One material feature term of a detailed score.
#[derive(Debug, Clone, PartialEq)]
pub struct TermContribution {
    pub feature: String,
    pub coefficient: f64,
    pub value: f64,
    pub contribution: f64,
}

impl TermContribution {
    /// Render as `"<feature>: <coefficient> × <value> = <contribution>"`,
    /// coefficient and contribution to six decimal places.
    pub fn trace_line(&self) -> String {
        format!(
            "{}: {:.6} × {} = {:.6}",
            self.feature, self.coefficient, self.value, self.contribution
        )
    }
}

/// Detailed scoring result: probability plus the per-feature breakdown.
#[derive(Debug, Clone)]
pub struct ScoreDetail {
    pub probability: f64,
    pub linear: f64,
    pub intercept: f64,
    /// Material terms (|coefficient × value| > [`MATERIALITY_THRESHOLD`]),
    /// in the table's source order.
    pub terms: Vec<TermContribution>,
}

impl ScoreDetail {
    /// Human-readable trace: the intercept first, then material terms.
    pub fn trace(&self) -> Vec<String> {
        let mut lines = Vec::with_capacity(self.terms.len() + 1);
        lines.push(format!("Constante: {:.6}", self.intercept));
        lines.extend(self.terms.iter().map(TermContribution::trace_line));
        lines
    }
}

/// Raw linear score: intercept + Σ coefficient × value, no link applied.
///
/// Features absent from the input map count as 0. A non-finite coefficient
/// or value (the typed residue of an upstream cell that failed numeric
/// coercion) skips the whole term. Never panics; given finite inputs the
/// sum is finite.
pub fn linear_score(table: &CoefficientTable, features: &HashMap<String, f64>) -> f64 {
    let mut sum = seed_intercept(table);
    for (feature, coefficient) in table.terms() {
        if !coefficient.is_finite() {
            continue;
        }
        let value = features.get(feature).copied().unwrap_or(0.0);
        if !value.is_finite() {
            continue;
        }
        sum += coefficient * value;
    }
    sum
}

/// Probability that the modeled outcome occurs: Φ(linear score).
///
/// The link is applied exactly once, after the full sum, so this and
/// [`score_with_trace`] always agree on the same inputs.
pub fn score(table: &CoefficientTable, features: &HashMap<String, f64>) -> f64 {
    normal_cdf(linear_score(table, features))
}

/// Same accumulation as [`score`], also recording the intercept and every
/// material term contribution.
pub fn score_with_trace(table: &CoefficientTable, features: &HashMap<String, f64>) -> ScoreDetail {
    let intercept = seed_intercept(table);
    let mut sum = intercept;
    let mut terms = Vec::new();

    for (feature, coefficient) in table.terms() {
        if !coefficient.is_finite() {
            continue;
        }
        let value = features.get(feature).copied().unwrap_or(0.0);
        if !value.is_finite() {
            continue;
        }
        let contribution = coefficient * value;
        sum += contribution;
        if contribution.abs() > MATERIALITY_THRESHOLD {
            terms.push(TermContribution {
                feature: feature.to_string(),
                coefficient,
                value,
                contribution,
            });
        }
    }

    ScoreDetail {
        probability: normal_cdf(sum),
        linear: sum,
        intercept,
        terms,
    }
}

fn seed_intercept(table: &CoefficientTable) -> f64 {
    let intercept = table.intercept();
    if intercept.is_finite() {
        intercept
    } else {
        0.0
    }
}
