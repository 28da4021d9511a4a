//! Storage traits for persistence

use crate::Result;
use async_trait::async_trait;
use student_types::{NewStudent, Student};

/// Student store
///
/// Performs no uniqueness checks of its own; callers that care about unique
/// emails must look them up first.
#[async_trait]
pub trait StudentStore: Send + Sync {
    /// Persist a new record and return it with its assigned id.
    async fn insert(&self, student: &NewStudent) -> Result<Student>;

    /// All records, in insertion order.
    async fn find_all(&self) -> Result<Vec<Student>>;

    async fn find_by_id(&self, id: i64) -> Result<Option<Student>>;

    async fn find_by_email(&self, email: &str) -> Result<Option<Student>>;

    /// Exact match on both names. The lowest id wins if several match.
    async fn find_by_name(&self, first_name: &str, last_name: &str) -> Result<Option<Student>>;

    /// Overwrite the full state stored under `student.id`.
    async fn update(&self, student: &Student) -> Result<Student>;

    /// Remove a record. Unknown ids are ignored.
    async fn delete_by_id(&self, id: i64) -> Result<()>;
}
