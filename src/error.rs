//! Error types for catalog queries.

/// Errors surfaced by the catalog query functions and entity lookups.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("Subject is not a recognized catalog subject: {0}")]
    InvalidSubject(String),
    #[error("Term does not match the catalog term-code pattern: {0}")]
    InvalidTerm(String),
    #[error("Course number is longer than 4 characters: {0}")]
    InvalidCourseNumber(String),
    #[error("Course {subject} {number} is not present in the results")]
    CourseNotFound { subject: String, number: String },
    #[error("Catalog session is invalid: {0}")]
    InvalidSession(String),
    #[error("Results page does not match the expected shape: {0}")]
    MalformedDocument(String),
    #[error(transparent)]
    RequestFailed(#[from] reqwest::Error),
}

pub type Result<T> = std::result::Result<T, CatalogError>;
