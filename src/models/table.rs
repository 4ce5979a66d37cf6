use std::collections::HashMap;

/// Reserved feature name holding a model's intercept.
pub const INTERCEPT_KEY: &str = "_cons";

/// One probit model: an ordered mapping from feature name to coefficient.
///
/// Iteration order is the insertion order of the source sheet. Trace output
/// depends on that order, so it is part of the contract, not an accident.
#[derive(Debug, Clone, PartialEq)]
pub struct CoefficientTable {
    name: String,
    entries: Vec<(String, f64)>,
}

impl CoefficientTable {
    pub fn new(name: impl Into<String>, entries: Vec<(String, f64)>) -> Self {
        Self {
            name: name.into(),
            entries,
        }
    }

    /// Model name, e.g. "s11_math_mod24".
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Intercept (`_cons`) coefficient, `0.0` when the sheet carries none.
    pub fn intercept(&self) -> f64 {
        self.get(INTERCEPT_KEY).unwrap_or(0.0)
    }

    /// Coefficient for a feature, `None` when the sheet has no such column.
    pub fn get(&self, feature: &str) -> Option<f64> {
        self.entries
            .iter()
            .find(|(name, _)| name == feature)
            .map(|(_, coefficient)| *coefficient)
    }

    /// Non-intercept (feature, coefficient) pairs in source order.
    pub fn terms(&self) -> impl Iterator<Item = (&str, f64)> {
        self.entries
            .iter()
            .filter(|(name, _)| name != INTERCEPT_KEY)
            .map(|(name, coefficient)| (name.as_str(), *coefficient))
    }

    /// Number of columns in the sheet, intercept included.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// All loaded models, keyed by model name.
///
/// Built once at startup and never mutated afterwards; scoring calls share
/// it by reference. A lookup miss is a recoverable condition: callers skip
/// the affected subject and keep going.
#[derive(Debug, Clone, Default)]
pub struct ModelCollection {
    models: HashMap<String, CoefficientTable>,
}

impl ModelCollection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, table: CoefficientTable) {
        self.models.insert(table.name().to_string(), table);
    }

    /// `None` when no sheet with that name was loaded.
    pub fn get(&self, name: &str) -> Option<&CoefficientTable> {
        self.models.get(name)
    }

    pub fn len(&self) -> usize {
        self.models.len()
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }

    /// Loaded model names, sorted for stable diagnostics.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.models.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}
