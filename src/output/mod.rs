pub mod formatter;

pub use formatter::{
    format_predictions, format_stats, format_trace, should_use_colors, Band,
};
