//! In-memory collaborators for view tests

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;

use super::api::CatalogApi;
use super::error::ClientError;
use crate::models::{Book, NewBook};
use crate::openlibrary::{BookSearch, SearchResult};

pub fn result(key: &str, title: &str) -> SearchResult {
    SearchResult {
        key: key.to_string(),
        title: title.to_string(),
        author_name: None,
        cover_edition_key: None,
        first_publish_year: None,
    }
}

pub fn book(id: &str, title: &str) -> Book {
    Book {
        id: id.to_string(),
        title: title.to_string(),
        author: Some("Anon".to_string()),
        cover_url: None,
        cover_edition_key: None,
        ol_key: None,
        year: None,
        added_at: chrono::Utc::now(),
    }
}

/// Backend double: one passcode, one token, books in a vec.
#[derive(Default)]
pub struct FakeBackend {
    passcode: Option<(String, String)>,
    books: Mutex<Vec<Book>>,
    added: Mutex<Vec<NewBook>>,
    next_id: AtomicUsize,
    pub fail_list: AtomicBool,
    pub fail_add: AtomicBool,
    pub fail_delete: AtomicBool,
    latency: Option<Duration>,
}

impl FakeBackend {
    pub fn with_passcode(passcode: &str, token: &str) -> Self {
        Self {
            passcode: Some((passcode.to_string(), token.to_string())),
            ..Default::default()
        }
    }

    pub fn with_books(self, books: Vec<Book>) -> Self {
        *self.books.lock().unwrap() = books;
        self
    }

    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    pub fn stored_ids(&self) -> Vec<String> {
        self.books.lock().unwrap().iter().map(|b| b.id.clone()).collect()
    }

    pub fn added(&self) -> Vec<NewBook> {
        self.added.lock().unwrap().clone()
    }

    async fn pause(&self) {
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
    }

    fn authorize(&self, token: &str) -> Result<(), ClientError> {
        match &self.passcode {
            Some((_, expected)) if expected == token => Ok(()),
            _ => Err(ClientError::Status {
                status: StatusCode::UNAUTHORIZED,
                context: "fake backend",
            }),
        }
    }

    fn failure() -> ClientError {
        ClientError::Status {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            context: "fake backend",
        }
    }
}

#[async_trait]
impl CatalogApi for FakeBackend {
    async fn list_books(&self) -> Result<Vec<Book>, ClientError> {
        self.pause().await;
        if self.fail_list.load(Ordering::SeqCst) {
            return Err(Self::failure());
        }
        Ok(self.books.lock().unwrap().clone())
    }

    async fn add_book(&self, token: &str, new_book: &NewBook) -> Result<Book, ClientError> {
        self.pause().await;
        self.authorize(token)?;
        if self.fail_add.load(Ordering::SeqCst) {
            return Err(Self::failure());
        }
        let id = format!("b{}", self.next_id.fetch_add(1, Ordering::SeqCst) + 1);
        let created = Book {
            id,
            title: new_book.title.clone(),
            author: new_book.author.clone(),
            cover_url: new_book.cover_url.clone(),
            cover_edition_key: None,
            ol_key: new_book.ol_key.clone(),
            year: new_book.year,
            added_at: chrono::Utc::now(),
        };
        self.added.lock().unwrap().push(new_book.clone());
        self.books.lock().unwrap().insert(0, created.clone());
        Ok(created)
    }

    async fn delete_book(&self, token: &str, book_id: &str) -> Result<(), ClientError> {
        self.pause().await;
        self.authorize(token)?;
        if self.fail_delete.load(Ordering::SeqCst) {
            return Err(Self::failure());
        }
        self.books.lock().unwrap().retain(|b| b.id != book_id);
        Ok(())
    }

    async fn verify_passcode(&self, passcode: &str) -> Result<String, ClientError> {
        self.pause().await;
        match &self.passcode {
            Some((expected, token)) if expected == passcode => Ok(token.clone()),
            _ => Err(ClientError::InvalidCredential),
        }
    }
}

/// Search double. Unknown queries fail like an unreachable service.
#[derive(Default)]
pub struct FakeSearch {
    responses: Mutex<HashMap<String, (Vec<SearchResult>, Duration)>>,
    queries: Mutex<Vec<String>>,
}

impl FakeSearch {
    pub fn respond(&self, query: &str, results: Vec<SearchResult>) {
        self.respond_after(query, results, Duration::ZERO);
    }

    pub fn respond_after(&self, query: &str, results: Vec<SearchResult>, delay: Duration) {
        self.responses
            .lock()
            .unwrap()
            .insert(query.to_string(), (results, delay));
    }

    pub fn queries(&self) -> Vec<String> {
        self.queries.lock().unwrap().clone()
    }
}

#[async_trait]
impl BookSearch for FakeSearch {
    async fn search(&self, query: &str, _limit: usize) -> Result<Vec<SearchResult>, ClientError> {
        self.queries.lock().unwrap().push(query.to_string());
        let response = self.responses.lock().unwrap().get(query).cloned();
        match response {
            Some((results, delay)) => {
                if !delay.is_zero() {
                    tokio::time::sleep(delay).await;
                }
                Ok(results)
            }
            None => Err(ClientError::Status {
                status: StatusCode::SERVICE_UNAVAILABLE,
                context: "fake search",
            }),
        }
    }
}
