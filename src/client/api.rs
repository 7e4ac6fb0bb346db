//! Typed client for the booklist backend

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};

use super::error::ClientError;
use crate::models::{Book, NewBook};

pub const DEFAULT_API_URL: &str = "http://localhost:8000";

/// The backend operations the views depend on.
#[async_trait]
pub trait CatalogApi: Send + Sync {
    async fn list_books(&self) -> Result<Vec<Book>, ClientError>;

    async fn add_book(&self, token: &str, book: &NewBook) -> Result<Book, ClientError>;

    async fn delete_book(&self, token: &str, book_id: &str) -> Result<(), ClientError>;

    /// Exchange a passcode for a bearer token.
    async fn verify_passcode(&self, passcode: &str) -> Result<String, ClientError>;
}

#[derive(Serialize)]
struct VerifyRequest<'a> {
    passcode: &'a str,
}

#[derive(Deserialize)]
struct VerifyResponse {
    token: String,
}

#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

fn ensure_success(status: StatusCode, context: &'static str) -> Result<(), ClientError> {
    if status.is_success() {
        Ok(())
    } else {
        Err(ClientError::Status { status, context })
    }
}

#[async_trait]
impl CatalogApi for ApiClient {
    async fn list_books(&self) -> Result<Vec<Book>, ClientError> {
        let resp = self.http.get(self.url("/api/books")).send().await?;
        ensure_success(resp.status(), "Failed to fetch books")?;

        let body = resp.text().await?;
        Ok(serde_json::from_str(&body)?)
    }

    async fn add_book(&self, token: &str, book: &NewBook) -> Result<Book, ClientError> {
        let resp = self
            .http
            .post(self.url("/api/books"))
            .bearer_auth(token)
            .json(book)
            .send()
            .await?;
        ensure_success(resp.status(), "Failed to add book")?;

        let body = resp.text().await?;
        Ok(serde_json::from_str(&body)?)
    }

    async fn delete_book(&self, token: &str, book_id: &str) -> Result<(), ClientError> {
        let path = format!("/api/books/{}", urlencoding::encode(book_id));
        let resp = self
            .http
            .delete(self.url(&path))
            .bearer_auth(token)
            .send()
            .await?;
        ensure_success(resp.status(), "Failed to delete book")
    }

    async fn verify_passcode(&self, passcode: &str) -> Result<String, ClientError> {
        let resp = self
            .http
            .post(self.url("/api/verify"))
            .json(&VerifyRequest { passcode })
            .send()
            .await?;

        match resp.status() {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                return Err(ClientError::InvalidCredential)
            }
            status => ensure_success(status, "Failed to verify passcode")?,
        }

        let body = resp.text().await?;
        let data: VerifyResponse = serde_json::from_str(&body)?;
        Ok(data.token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn book_json(id: &str, title: &str) -> serde_json::Value {
        serde_json::json!({
            "id": id,
            "title": title,
            "author": "Frank Herbert",
            "cover_url": null,
            "ol_key": "/works/OL893415W",
            "added_at": "2024-05-01T10:00:00Z"
        })
    }

    #[tokio::test]
    async fn test_list_books() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/books"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!([book_json("b2", "Emma"), book_json("b1", "Dune")])),
            )
            .mount(&server)
            .await;

        let api = ApiClient::new(server.uri());
        let books = api.list_books().await.unwrap();
        let ids: Vec<_> = books.iter().map(|b| b.id.as_str()).collect();
        assert_eq!(ids, vec!["b2", "b1"]);
        assert_eq!(books[1].author.as_deref(), Some("Frank Herbert"));
    }

    #[tokio::test]
    async fn test_list_books_error_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/books"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let api = ApiClient::new(server.uri());
        let err = api.list_books().await.unwrap_err();
        assert_eq!(err.status(), Some(StatusCode::INTERNAL_SERVER_ERROR));
    }

    #[tokio::test]
    async fn test_add_book_sends_bearer_and_payload() {
        let server = MockServer::start().await;
        let payload = NewBook {
            title: "Dune".to_string(),
            author: Some("Frank Herbert".to_string()),
            cover_url: Some("https://covers.openlibrary.org/b/olid/OL1M-M.jpg".to_string()),
            ol_key: Some("/works/OL893415W".to_string()),
            year: Some(1965),
        };
        Mock::given(method("POST"))
            .and(path("/api/books"))
            .and(header("authorization", "Bearer tok-1"))
            .and(body_json(&payload))
            .respond_with(ResponseTemplate::new(201).set_body_json(book_json("b1", "Dune")))
            .expect(1)
            .mount(&server)
            .await;

        let api = ApiClient::new(server.uri());
        let created = api.add_book("tok-1", &payload).await.unwrap();
        assert_eq!(created.id, "b1");
        assert_eq!(created.title, "Dune");
    }

    #[tokio::test]
    async fn test_add_book_conflict_is_status_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/books"))
            .respond_with(ResponseTemplate::new(409))
            .mount(&server)
            .await;

        let api = ApiClient::new(server.uri());
        let payload = NewBook {
            title: "Dune".to_string(),
            author: None,
            cover_url: None,
            ol_key: None,
            year: None,
        };
        let err = api.add_book("tok-1", &payload).await.unwrap_err();
        assert_eq!(err.status(), Some(StatusCode::CONFLICT));
    }

    #[tokio::test]
    async fn test_delete_book() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/api/books/b1"))
            .and(header("authorization", "Bearer tok-1"))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;

        let api = ApiClient::new(server.uri());
        api.delete_book("tok-1", "b1").await.unwrap();
    }

    #[tokio::test]
    async fn test_verify_passcode() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/verify"))
            .and(body_json(serde_json::json!({ "passcode": "letmein" })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({ "token": "tok-1" })))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/api/verify"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;

        let api = ApiClient::new(server.uri());
        assert_eq!(api.verify_passcode("letmein").await.unwrap(), "tok-1");
        assert!(matches!(
            api.verify_passcode("wrong").await,
            Err(ClientError::InvalidCredential)
        ));
    }
}
