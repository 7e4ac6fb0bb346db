//! Book Service - catalog persistence without the HTTP layer

use sea_orm::{
    ActiveModelTrait, DatabaseConnection, EntityTrait, QueryOrder, Set, SqlErr,
};

use crate::models::book::{ActiveModel as BookActiveModel, Column, Entity as BookEntity};
use crate::models::{Book, NewBook};

/// Error type for service operations
#[derive(Debug)]
pub enum ServiceError {
    Database(String),
    NotFound,
    /// Another entry was already filed from the same source key.
    Conflict,
}

impl From<sea_orm::DbErr> for ServiceError {
    fn from(e: sea_orm::DbErr) -> Self {
        ServiceError::Database(e.to_string())
    }
}

/// All books, newest first
pub async fn list_books(db: &DatabaseConnection) -> Result<Vec<Book>, ServiceError> {
    let books = BookEntity::find()
        .order_by_desc(Column::AddedAt)
        .all(db)
        .await?;

    Ok(books.into_iter().map(Book::from).collect())
}

pub async fn create_book(db: &DatabaseConnection, book: NewBook) -> Result<Book, ServiceError> {
    let id = uuid::Uuid::new_v4().to_string();
    tracing::info!("Create book - title={:?}, ol_key={:?}", book.title, book.ol_key);

    let new_book = BookActiveModel {
        id: Set(id),
        title: Set(book.title),
        author: Set(book.author),
        cover_url: Set(book.cover_url),
        ol_key: Set(book.ol_key),
        year: Set(book.year),
        added_at: Set(chrono::Utc::now()),
    };

    match new_book.insert(db).await {
        Ok(model) => Ok(Book::from(model)),
        Err(e) => match e.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(_)) => Err(ServiceError::Conflict),
            _ => Err(e.into()),
        },
    }
}

pub async fn delete_book(db: &DatabaseConnection, id: &str) -> Result<(), ServiceError> {
    let result = BookEntity::delete_by_id(id.to_string()).exec(db).await?;
    if result.rows_affected == 0 {
        return Err(ServiceError::NotFound);
    }
    tracing::info!("Deleted book {}", id);
    Ok(())
}
