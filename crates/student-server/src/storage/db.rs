//! SQLite database layer (embedded, no external dependencies)

use anyhow::{Context, Result};
use async_trait::async_trait;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::sync::Arc;
use student_core::{NewStudent, Student, StudentError, StudentStore};

pub struct Database {
    pool: Arc<SqlitePool>,
}

impl Database {
    pub async fn new(database_path: &str) -> Result<Self> {
        tracing::info!("Opening SQLite database at: {}", database_path);

        // Create parent directory if needed
        if let Some(parent) = std::path::Path::new(database_path).parent() {
            if !parent.as_os_str().is_empty() {
                tracing::info!("Creating parent directory: {}", parent.display());
                tokio::fs::create_dir_all(parent).await.with_context(|| {
                    format!("Failed to create database directory: {}", parent.display())
                })?;
            }
        }

        let options = SqliteConnectOptions::new()
            .filename(database_path)
            .create_if_missing(true)
            .journal_mode(sqlx::sqlite::SqliteJournalMode::Wal)
            .synchronous(sqlx::sqlite::SqliteSynchronous::Normal);

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await
            .with_context(|| {
                format!("Failed to connect to SQLite database at: {}", database_path)
            })?;

        Self::from_pool(pool).await
    }

    /// Private in-memory database. The pool keeps exactly one connection
    /// alive, since every new `:memory:` connection would be a fresh database.
    #[cfg(test)]
    pub async fn in_memory() -> Result<Self> {
        let options = "sqlite::memory:"
            .parse::<SqliteConnectOptions>()
            .context("Invalid in-memory SQLite URL")?;

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await
            .context("Failed to open in-memory SQLite database")?;

        Self::from_pool(pool).await
    }

    async fn from_pool(pool: SqlitePool) -> Result<Self> {
        tracing::info!("SQLite connection established, creating schema...");

        Self::create_schema(&pool)
            .await
            .context("Failed to create database schema")?;

        tracing::info!("Database initialization complete");

        Ok(Self {
            pool: Arc::new(pool),
        })
    }

    async fn create_schema(pool: &SqlitePool) -> Result<()> {
        // Email uniqueness is enforced by the record service, not by an index.
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS students (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                first_name TEXT NOT NULL,
                last_name TEXT NOT NULL,
                email TEXT NOT NULL
            )
            "#,
        )
        .execute(pool)
        .await?;

        Ok(())
    }

    #[cfg(test)]
    pub async fn close(&self) {
        self.pool.close().await;
    }
}

fn db_error(e: sqlx::Error) -> StudentError {
    StudentError::Database(e.to_string())
}

#[async_trait]
impl StudentStore for Database {
    async fn insert(&self, student: &NewStudent) -> student_core::Result<Student> {
        let result = sqlx::query(
            r#"
            INSERT INTO students (first_name, last_name, email)
            VALUES (?1, ?2, ?3)
            "#,
        )
        .bind(&student.first_name)
        .bind(&student.last_name)
        .bind(&student.email)
        .execute(&*self.pool)
        .await
        .map_err(db_error)?;

        Ok(student.clone().with_id(result.last_insert_rowid()))
    }

    async fn find_all(&self) -> student_core::Result<Vec<Student>> {
        let rows: Vec<StudentRow> = sqlx::query_as(
            r#"
            SELECT id, first_name, last_name, email
            FROM students ORDER BY id
            "#,
        )
        .fetch_all(&*self.pool)
        .await
        .map_err(db_error)?;

        Ok(rows.into_iter().map(|r| r.into()).collect())
    }

    async fn find_by_id(&self, id: i64) -> student_core::Result<Option<Student>> {
        let row: Option<StudentRow> = sqlx::query_as(
            r#"
            SELECT id, first_name, last_name, email
            FROM students WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&*self.pool)
        .await
        .map_err(db_error)?;

        Ok(row.map(|r| r.into()))
    }

    async fn find_by_email(&self, email: &str) -> student_core::Result<Option<Student>> {
        let row: Option<StudentRow> = sqlx::query_as(
            r#"
            SELECT id, first_name, last_name, email
            FROM students WHERE email = ?1
            ORDER BY id LIMIT 1
            "#,
        )
        .bind(email)
        .fetch_optional(&*self.pool)
        .await
        .map_err(db_error)?;

        Ok(row.map(|r| r.into()))
    }

    async fn find_by_name(
        &self,
        first_name: &str,
        last_name: &str,
    ) -> student_core::Result<Option<Student>> {
        let row: Option<StudentRow> = sqlx::query_as(
            r#"
            SELECT id, first_name, last_name, email
            FROM students WHERE first_name = ?1 AND last_name = ?2
            ORDER BY id LIMIT 1
            "#,
        )
        .bind(first_name)
        .bind(last_name)
        .fetch_optional(&*self.pool)
        .await
        .map_err(db_error)?;

        Ok(row.map(|r| r.into()))
    }

    async fn update(&self, student: &Student) -> student_core::Result<Student> {
        sqlx::query(
            r#"
            INSERT INTO students (id, first_name, last_name, email)
            VALUES (?1, ?2, ?3, ?4)
            ON CONFLICT(id) DO UPDATE SET
                first_name = excluded.first_name,
                last_name = excluded.last_name,
                email = excluded.email
            "#,
        )
        .bind(student.id)
        .bind(&student.first_name)
        .bind(&student.last_name)
        .bind(&student.email)
        .execute(&*self.pool)
        .await
        .map_err(db_error)?;

        Ok(student.clone())
    }

    async fn delete_by_id(&self, id: i64) -> student_core::Result<()> {
        sqlx::query(
            r#"
            DELETE FROM students WHERE id = ?1
            "#,
        )
        .bind(id)
        .execute(&*self.pool)
        .await
        .map_err(db_error)?;

        Ok(())
    }
}

// Helper struct for sqlx query_as
#[derive(sqlx::FromRow)]
struct StudentRow {
    id: i64,
    first_name: String,
    last_name: String,
    email: String,
}

impl From<StudentRow> for Student {
    fn from(r: StudentRow) -> Self {
        Student {
            id: r.id,
            first_name: r.first_name,
            last_name: r.last_name,
            email: r.email,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{self, TestDatabase};

    #[tokio::test]
    async fn test_store_contract() {
        let fixture = TestDatabase::start().await.unwrap();
        testing::check_store_contract(fixture.db()).await;
        fixture.teardown().await;
    }

    #[tokio::test]
    async fn test_store_contract_on_disk() {
        let dir = std::env::temp_dir().join(format!("student-server-test-{}", std::process::id()));
        let path = dir.join("students.db");
        let _ = tokio::fs::remove_dir_all(&dir).await;

        let db = Database::new(path.to_str().unwrap()).await.unwrap();
        testing::check_store_contract(&db).await;
        db.close().await;

        // Records survive reopening the file
        let reopened = Database::new(path.to_str().unwrap()).await.unwrap();
        assert_eq!(reopened.find_all().await.unwrap().len(), 1);
        reopened.close().await;

        let _ = tokio::fs::remove_dir_all(&dir).await;
    }

    #[tokio::test]
    async fn test_update_unknown_id_writes_row() {
        let fixture = TestDatabase::start().await.unwrap();
        let db = fixture.db();

        let student = NewStudent::new("Ana", "Lima", "a@x.com").with_id(7);
        db.update(&student).await.unwrap();

        assert_eq!(db.find_by_id(7).await.unwrap(), Some(student));
        // New inserts continue after the highest id
        let next = db.insert(&NewStudent::new("Bia", "Lima", "b@x.com")).await.unwrap();
        assert!(next.id > 7);

        fixture.teardown().await;
    }

    #[tokio::test]
    async fn test_store_does_not_check_email_uniqueness() {
        let fixture = TestDatabase::start().await.unwrap();
        let db = fixture.db();

        let first = db.insert(&NewStudent::new("Ana", "Lima", "a@x.com")).await.unwrap();
        db.insert(&NewStudent::new("Bia", "Lima", "a@x.com")).await.unwrap();

        assert_eq!(db.find_all().await.unwrap().len(), 2);
        assert_eq!(db.find_by_email("a@x.com").await.unwrap(), Some(first));

        fixture.teardown().await;
    }
}
