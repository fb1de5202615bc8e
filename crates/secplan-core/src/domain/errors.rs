use thiserror::Error;

#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Week start {0} is not a Monday")]
    NotMonday(chrono::NaiveDate),

    #[error("Invalid period: {0} (expected AM or PM)")]
    InvalidPeriod(String),

    #[error("Invalid date: {0}")]
    InvalidDate(String),

    #[error("Invalid preference value: {0}")]
    InvalidPreference(String),

    #[error("Department 'Administration' not found")]
    MissingAdminDepartment,
}
