//! Student handlers

use crate::AppState;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use student_core::{NewStudent, Student, StudentError, StudentUpdate};

pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

impl ApiError {
    fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    fn not_found(id: i64) -> Self {
        Self::new(StatusCode::NOT_FOUND, format!("Student not found: {}", id))
    }
}

impl From<StudentError> for ApiError {
    fn from(e: StudentError) -> Self {
        if e.is_duplicate_email() {
            return Self::new(StatusCode::CONFLICT, e.to_string());
        }

        tracing::error!("Request failed: {}", e);
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            self.status,
            Json(ErrorResponse {
                error: self.message,
            }),
        )
            .into_response()
    }
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    message: String,
}

pub async fn create(
    State(state): State<AppState>,
    Json(req): Json<NewStudent>,
) -> ApiResult<(StatusCode, Json<Student>)> {
    let student = state.service.save(req).await?;
    Ok((StatusCode::CREATED, Json(student)))
}

pub async fn list(State(state): State<AppState>) -> ApiResult<Json<Vec<Student>>> {
    let students = state.service.list_all().await?;
    Ok(Json(students))
}

pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<Student>> {
    match state.service.get_by_id(id).await? {
        Some(student) => Ok(Json(student)),
        None => Err(ApiError::not_found(id)),
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchQuery {
    email: Option<String>,
    first_name: Option<String>,
    last_name: Option<String>,
}

/// Look a student up by email, or by first and last name together
pub async fn search(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> ApiResult<Json<Student>> {
    let found = match query {
        SearchQuery {
            email: Some(email), ..
        } => state.service.find_by_email(&email).await?,
        SearchQuery {
            first_name: Some(first_name),
            last_name: Some(last_name),
            ..
        } => state.service.find_by_name(&first_name, &last_name).await?,
        _ => {
            return Err(ApiError::new(
                StatusCode::BAD_REQUEST,
                "Expected email, or firstName and lastName",
            ))
        }
    };

    found
        .map(Json)
        .ok_or_else(|| ApiError::new(StatusCode::NOT_FOUND, "No matching student"))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(req): Json<StudentUpdate>,
) -> ApiResult<Json<Student>> {
    let Some(mut student) = state.service.get_by_id(id).await? else {
        return Err(ApiError::not_found(id));
    };

    student.apply(req);
    let updated = state.service.update(student).await?;
    Ok(Json(updated))
}

pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<MessageResponse>> {
    if state.service.get_by_id(id).await?.is_none() {
        return Err(ApiError::not_found(id));
    }

    state.service.delete_by_id(id).await?;
    Ok(Json(MessageResponse {
        message: "Student deleted successfully".to_string(),
    }))
}
