pub mod engine;
pub mod probit;

pub use engine::{
    linear_score, score, score_with_trace, ScoreDetail, TermContribution, MATERIALITY_THRESHOLD,
};
pub use probit::normal_cdf;
