pub mod extractor;
pub mod jwt;
pub mod parameter_error_handler;
pub mod sql;
pub mod validate;

pub use extractor::{
    SafeClassIdI64, SafeExamIdI64, SafeIDI64, SafeRoutineIdI64, SafeStudentIdI64,
    SafeSubjectIdI64,
};
pub use parameter_error_handler::json_error_handler;
pub use parameter_error_handler::query_error_handler;
pub use sql::escape_like_pattern;
pub use validate::{
    compose_full_name, non_blank, parse_date, parse_hhmm, validate_email, validate_full_name,
};
