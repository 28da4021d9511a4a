//! In-memory student store using DashMap (no persistence across restarts)

use async_trait::async_trait;
use dashmap::DashMap;
use std::sync::atomic::{AtomicI64, Ordering};
use student_core::{NewStudent, Result, Student, StudentStore};

pub struct MemoryStore {
    data: DashMap<i64, Student>,
    next_id: AtomicI64,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            data: DashMap::new(),
            next_id: AtomicI64::new(1),
        }
    }

    /// Lowest-id record matching the predicate
    fn first_match(&self, pred: impl Fn(&Student) -> bool) -> Option<Student> {
        self.data
            .iter()
            .filter(|entry| pred(entry.value()))
            .min_by_key(|entry| *entry.key())
            .map(|entry| entry.value().clone())
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl StudentStore for MemoryStore {
    async fn insert(&self, student: &NewStudent) -> Result<Student> {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let stored = student.clone().with_id(id);
        self.data.insert(id, stored.clone());
        Ok(stored)
    }

    async fn find_all(&self) -> Result<Vec<Student>> {
        let mut students: Vec<Student> = self.data.iter().map(|e| e.value().clone()).collect();
        students.sort_by_key(|s| s.id);
        Ok(students)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Student>> {
        Ok(self.data.get(&id).map(|e| e.value().clone()))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Student>> {
        Ok(self.first_match(|s| s.email == email))
    }

    async fn find_by_name(&self, first_name: &str, last_name: &str) -> Result<Option<Student>> {
        Ok(self.first_match(|s| s.first_name == first_name && s.last_name == last_name))
    }

    async fn update(&self, student: &Student) -> Result<Student> {
        self.data.insert(student.id, student.clone());
        // Keep generated ids ahead of any id written here
        self.next_id
            .fetch_max(student.id.saturating_add(1), Ordering::SeqCst);
        Ok(student.clone())
    }

    async fn delete_by_id(&self, id: i64) -> Result<()> {
        self.data.remove(&id);
        Ok(())
    }
}
