use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use sea_orm::DatabaseConnection;
use serde_json::json;

use crate::auth::Claims;
use crate::models::NewBook;
use crate::services::book_service::{self, ServiceError};

fn error_response(e: ServiceError) -> axum::response::Response {
    match e {
        ServiceError::NotFound => (
            StatusCode::NOT_FOUND,
            Json(json!({ "error": "Book not found" })),
        )
            .into_response(),
        ServiceError::Conflict => (
            StatusCode::CONFLICT,
            Json(json!({ "error": "Book with this ol_key already exists" })),
        )
            .into_response(),
        ServiceError::Database(msg) => {
            tracing::error!("Database error: {}", msg);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": msg })),
            )
                .into_response()
        }
    }
}

pub async fn list_books(State(db): State<DatabaseConnection>) -> impl IntoResponse {
    match book_service::list_books(&db).await {
        Ok(books) => (StatusCode::OK, Json(books)).into_response(),
        Err(e) => error_response(e),
    }
}

pub async fn create_book(
    State(db): State<DatabaseConnection>,
    _claims: Claims,
    Json(book): Json<NewBook>,
) -> impl IntoResponse {
    if book.title.trim().is_empty() {
        return (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(json!({ "error": "Title is required" })),
        )
            .into_response();
    }

    match book_service::create_book(&db, book).await {
        Ok(created) => (StatusCode::CREATED, Json(created)).into_response(),
        Err(e) => error_response(e),
    }
}

pub async fn delete_book(
    State(db): State<DatabaseConnection>,
    _claims: Claims,
    Path(id): Path<String>,
) -> impl IntoResponse {
    if uuid::Uuid::parse_str(&id).is_err() {
        return (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(json!({ "error": "Invalid book id" })),
        )
            .into_response();
    }

    match book_service::delete_book(&db, &id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => error_response(e),
    }
}
