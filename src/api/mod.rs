pub mod auth;
pub mod books;
pub mod health;

use axum::{
    routing::{delete, get, post},
    Router,
};

use crate::infrastructure::AppState;

pub fn api_router(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(health::health_check))
        // Auth
        .route("/verify", post(auth::verify))
        // Books
        .route("/books", get(books::list_books).post(books::create_book))
        .route("/books/:id", delete(books::delete_book))
        .with_state(state)
}
