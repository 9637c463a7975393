//! Error macros for gradeflow

/// Macro for creating validation errors
#[macro_export]
macro_rules! bail_validation {
    ($($arg:tt)*) => {
        return Err($crate::error::GradeError::validation(format!($($arg)*)))
    };
}

/// Macro for creating usage errors
#[macro_export]
macro_rules! bail_usage {
    ($msg:expr) => {
        return Err($crate::error::GradeError::UsageError($msg.to_string()))
    };
}

/// Macro for creating rubric schema errors
#[macro_export]
macro_rules! bail_schema {
    ($source:expr, $($arg:tt)*) => {
        return Err($crate::error::GradeError::schema($source, format!($($arg)*)))
    };
}
