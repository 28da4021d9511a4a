//! Record service
//!
//! Business rules on top of a [`StudentStore`]. The only rule is that no two
//! students share an email; everything else passes straight through.

use crate::ports::StudentStore;
use crate::{Result, StudentError};
use async_trait::async_trait;
use std::sync::Arc;
use student_types::{NewStudent, Student};
use tracing::{debug, info, warn};

/// Operations the HTTP layer needs from the business layer
#[async_trait]
pub trait RecordService: Send + Sync {
    /// Persist a new student unless its email is already taken.
    async fn save(&self, student: NewStudent) -> Result<Student>;

    async fn list_all(&self) -> Result<Vec<Student>>;

    async fn get_by_id(&self, id: i64) -> Result<Option<Student>>;

    async fn find_by_email(&self, email: &str) -> Result<Option<Student>>;

    async fn find_by_name(&self, first_name: &str, last_name: &str) -> Result<Option<Student>>;

    /// Write back a record whose fields were already merged by the caller.
    /// Fails if another student already holds the record's email.
    async fn update(&self, student: Student) -> Result<Student>;

    async fn delete_by_id(&self, id: i64) -> Result<()>;
}

pub struct StudentService {
    store: Arc<dyn StudentStore>,
}

impl StudentService {
    pub fn new(store: Arc<dyn StudentStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl RecordService for StudentService {
    async fn save(&self, student: NewStudent) -> Result<Student> {
        // Check-then-insert: two concurrent saves of one email can both pass.
        if self.store.find_by_email(&student.email).await?.is_some() {
            warn!("Rejecting student with duplicate email: {}", student.email);
            return Err(StudentError::DuplicateEmail(student.email));
        }

        let saved = self.store.insert(&student).await?;
        info!("Saved student {} ({})", saved.id, saved.email);
        Ok(saved)
    }

    async fn list_all(&self) -> Result<Vec<Student>> {
        debug!("Listing all students");
        self.store.find_all().await
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<Student>> {
        debug!("Looking up student {}", id);
        self.store.find_by_id(id).await
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Student>> {
        debug!("Looking up student by email: {}", email);
        self.store.find_by_email(email).await
    }

    async fn find_by_name(&self, first_name: &str, last_name: &str) -> Result<Option<Student>> {
        debug!("Looking up student by name: {} {}", first_name, last_name);
        self.store.find_by_name(first_name, last_name).await
    }

    async fn update(&self, student: Student) -> Result<Student> {
        if let Some(holder) = self.store.find_by_email(&student.email).await? {
            if holder.id != student.id {
                warn!(
                    "Rejecting update of student {}: email {} belongs to student {}",
                    student.id, student.email, holder.id
                );
                return Err(StudentError::DuplicateEmail(student.email));
            }
        }

        let updated = self.store.update(&student).await?;
        info!("Updated student {}", updated.id);
        Ok(updated)
    }

    async fn delete_by_id(&self, id: i64) -> Result<()> {
        self.store.delete_by_id(id).await?;
        info!("Deleted student {}", id);
        Ok(())
    }
}
