//! Error types for the student registry

use thiserror::Error;

pub type Result<T> = std::result::Result<T, StudentError>;

#[derive(Error, Debug)]
pub enum StudentError {
    #[error("A student is already registered with email: {0}")]
    DuplicateEmail(String),

    #[error("Database error: {0}")]
    Database(String),
}

impl StudentError {
    pub fn is_duplicate_email(&self) -> bool {
        matches!(self, StudentError::DuplicateEmail(_))
    }
}
