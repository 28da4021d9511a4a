//! Test fixtures shared by the storage, handler and integration tests

use crate::storage::Database;
use anyhow::Result;
use axum::{
    body::{to_bytes, Body},
    http::{Method, Request, StatusCode},
    Router,
};
use serde_json::Value;
use std::sync::Arc;
use student_core::{NewStudent, StudentStore};
use tower::ServiceExt;

/// A private SQLite database for one test context.
///
/// Started explicitly and handed to whatever needs it; call
/// [`TestDatabase::teardown`] when the test is done with it.
pub struct TestDatabase {
    db: Arc<Database>,
}

impl TestDatabase {
    pub async fn start() -> Result<Self> {
        let db = Database::in_memory().await?;
        Ok(Self { db: Arc::new(db) })
    }

    pub fn db(&self) -> &Database {
        &self.db
    }

    /// Shared handle for wiring into a service
    pub fn store(&self) -> Arc<Database> {
        self.db.clone()
    }

    pub async fn teardown(self) {
        self.db.close().await;
    }
}

/// Exercise the full store contract against an empty store.
/// Leaves exactly one record behind.
pub async fn check_store_contract(store: &dyn StudentStore) {
    assert!(store.find_all().await.unwrap().is_empty());

    let julio = store
        .insert(&NewStudent::new("Julio", "Silva", "cms.julio1@gmail.com"))
        .await
        .unwrap();
    assert_eq!(julio.first_name, "Julio");
    assert_eq!(julio.last_name, "Silva");
    assert_eq!(julio.email, "cms.julio1@gmail.com");
    assert_eq!(store.find_by_id(julio.id).await.unwrap(), Some(julio.clone()));

    let juliana = store
        .insert(&NewStudent::new("Juliana", "Silva", "js@gmail.com"))
        .await
        .unwrap();
    assert_ne!(julio.id, juliana.id);
    assert_eq!(
        store.find_all().await.unwrap(),
        vec![julio.clone(), juliana.clone()]
    );

    // Lookups
    assert_eq!(store.find_by_email("nobody@gmail.com").await.unwrap(), None);
    assert_eq!(
        store.find_by_email("js@gmail.com").await.unwrap(),
        Some(juliana.clone())
    );
    assert_eq!(
        store.find_by_name("Juliana", "Silva").await.unwrap(),
        Some(juliana.clone())
    );
    assert_eq!(store.find_by_name("Juliana", "Souza").await.unwrap(), None);
    assert_eq!(store.find_by_name("Silva", "Juliana").await.unwrap(), None);
    assert_eq!(store.find_by_id(juliana.id + 100).await.unwrap(), None);

    // Overwrite
    let mut changed = julio.clone();
    changed.email = "julio@silva.com".to_string();
    let updated = store.update(&changed).await.unwrap();
    assert_eq!(updated, changed);
    assert_eq!(store.find_by_id(julio.id).await.unwrap(), Some(changed));
    assert_eq!(store.find_by_email("cms.julio1@gmail.com").await.unwrap(), None);
    assert_eq!(store.find_all().await.unwrap().len(), 2);

    // Delete is idempotent
    store.delete_by_id(juliana.id).await.unwrap();
    assert_eq!(store.find_by_id(juliana.id).await.unwrap(), None);
    store.delete_by_id(juliana.id).await.unwrap();
    assert_eq!(store.find_all().await.unwrap().len(), 1);
}

/// Send one request through the router and decode the JSON reply.
/// An empty body decodes to `Value::Null`.
pub async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    payload: Option<Value>,
) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match payload {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string())),
        None => builder.body(Body::empty()),
    }
    .expect("request should build");

    let response = app
        .clone()
        .oneshot(request)
        .await
        .expect("response expected");
    let status = response.status();
    let body = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("response body should be readable");

    if body.is_empty() {
        return (status, Value::Null);
    }

    // Rejections from axum extractors are plain text
    let json = serde_json::from_slice::<Value>(&body)
        .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&body).into_owned()));
    (status, json)
}
