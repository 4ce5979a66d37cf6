use std::collections::HashMap;

/// The six scored subject areas, in fixed reporting order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Subject {
    Lectura,
    Math,
    Soc,
    Cnat,
    Ingles,
    Global,
}

impl Subject {
    pub const ALL: [Subject; 6] = [
        Subject::Lectura,
        Subject::Math,
        Subject::Soc,
        Subject::Cnat,
        Subject::Ingles,
        Subject::Global,
    ];

    /// Key used in model names and `pred_<key>` export columns.
    pub fn key(self) -> &'static str {
        match self {
            Subject::Lectura => "lectura",
            Subject::Math => "math",
            Subject::Soc => "soc",
            Subject::Cnat => "cnat",
            Subject::Ingles => "ingles",
            Subject::Global => "global",
        }
    }

    /// Uppercase display label.
    pub fn label(self) -> &'static str {
        match self {
            Subject::Lectura => "LECTURA",
            Subject::Math => "MATH",
            Subject::Soc => "SOC",
            Subject::Cnat => "CNAT",
            Subject::Ingles => "INGLES",
            Subject::Global => "GLOBAL",
        }
    }

    /// Position in [`Subject::ALL`].
    pub fn index(self) -> usize {
        match self {
            Subject::Lectura => 0,
            Subject::Math => 1,
            Subject::Soc => 2,
            Subject::Cnat => 3,
            Subject::Ingles => 4,
            Subject::Global => 5,
        }
    }
}

/// Grade-band tier a student is scored under. Selects which per-subject
/// model set applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GradeBand {
    /// Grades 8 and 9.
    Lower,
    /// Grades 10 and 11.
    Upper,
}

impl GradeBand {
    /// Numeric code used in model names: 14 for grades 8-9, 24 for 10-11.
    pub fn code(self) -> u32 {
        match self {
            GradeBand::Lower => 14,
            GradeBand::Upper => 24,
        }
    }

    pub fn from_code(code: u32) -> Option<Self> {
        match code {
            14 => Some(GradeBand::Lower),
            24 => Some(GradeBand::Upper),
            _ => None,
        }
    }
}

/// Model sheet name for a subject + grade band, e.g. "s11_math_mod24".
pub fn model_name(subject: Subject, band: GradeBand) -> String {
    format!("s11_{}_mod{}", subject.key(), band.code())
}

/// Roster column holding the student identifier.
pub const ID_COLUMN: &str = "id";

/// Numeric feature columns every roster must carry.
pub const FEATURE_COLUMNS: [&str; 14] = [
    "estu_mujer",
    "edad_grado",
    "educ_max_padremadre1",
    "educ_max_padremadre2",
    "educ_max_padremadre3",
    "educ_max_padremadre4",
    "educ_max_padremadre5",
    "total_faltas_disc",
    "human_langs_08",
    "maths_08",
    "nat_sc_08",
    "soc_sc_08",
    "nwea_math_perc",
    "nwea_reading_perc",
];

/// One student's observable attributes.
///
/// The feature map may be a subset or superset of any model's features;
/// the id is opaque and never used numerically.
#[derive(Debug, Clone)]
pub struct Student {
    pub id: String,
    pub features: HashMap<String, f64>,
}

impl Student {
    pub fn new(id: impl Into<String>, features: HashMap<String, f64>) -> Self {
        Self {
            id: id.into(),
            features,
        }
    }
}
