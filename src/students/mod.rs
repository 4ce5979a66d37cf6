pub mod input;
pub mod roster;
pub mod types;
pub mod validation;

pub use input::read_student_file;
pub use roster::{read_roster, Roster};
pub use types::{model_name, GradeBand, Student, Subject, FEATURE_COLUMNS, ID_COLUMN};
pub use validation::validate_roster_columns;
