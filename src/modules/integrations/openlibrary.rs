//! Open Library search and cover integration
//!
//! The add view queries the public search endpoint directly; results are
//! never stored, only turned into a [`NewBook`](crate::models::NewBook)
//! when the maintainer files one.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::client::error::ClientError;

pub const DEFAULT_BASE_URL: &str = "https://openlibrary.org";
pub const DEFAULT_COVERS_URL: &str = "https://covers.openlibrary.org";

/// Fields requested from `search.json`; anything else is dead weight.
pub const SEARCH_FIELDS: &str = "key,title,author_name,cover_edition_key,first_publish_year";

/// A candidate record from the search endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    /// Work key, e.g. `/works/OL45804W`. Used as the foreign key.
    pub key: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub author_name: Option<Vec<String>>,
    #[serde(default)]
    pub cover_edition_key: Option<String>,
    #[serde(default)]
    pub first_publish_year: Option<i32>,
}

impl SearchResult {
    pub fn primary_author(&self) -> Option<&str> {
        self.author_name
            .as_ref()
            .and_then(|names| names.first())
            .map(String::as_str)
    }
}

#[derive(Debug, Deserialize)]
struct OpenLibrarySearchResponse {
    #[serde(default)]
    docs: Vec<SearchResult>,
}

/// Size token accepted by the covers endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoverSize {
    Small,
    Medium,
    Large,
}

impl CoverSize {
    fn token(self) -> &'static str {
        match self {
            CoverSize::Small => "S",
            CoverSize::Medium => "M",
            CoverSize::Large => "L",
        }
    }
}

/// Builds cover image URLs from edition keys.
#[derive(Debug, Clone)]
pub struct Covers {
    base_url: String,
}

impl Covers {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn url(&self, edition_key: &str, size: CoverSize) -> String {
        format!("{}/b/olid/{}-{}.jpg", self.base_url, edition_key, size.token())
    }
}

impl Default for Covers {
    fn default() -> Self {
        Self::new(DEFAULT_COVERS_URL)
    }
}

/// Anything that can answer a free-text book search.
#[async_trait]
pub trait BookSearch: Send + Sync {
    async fn search(&self, query: &str, limit: usize) -> Result<Vec<SearchResult>, ClientError>;
}

#[derive(Debug, Clone)]
pub struct OpenLibraryClient {
    http: reqwest::Client,
    base_url: String,
}

impl OpenLibraryClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub async fn search_books(
        &self,
        query: &str,
        limit: usize,
    ) -> Result<Vec<SearchResult>, ClientError> {
        let url = format!(
            "{}/search.json?q={}&limit={}&fields={}",
            self.base_url,
            urlencoding::encode(query),
            limit,
            SEARCH_FIELDS
        );

        let resp = self.http.get(&url).send().await?;

        if !resp.status().is_success() {
            return Err(ClientError::Status {
                status: resp.status(),
                context: "Open Library search",
            });
        }

        let body = resp.text().await?;
        let parsed: OpenLibrarySearchResponse = serde_json::from_str(&body)?;

        let mut docs = parsed.docs;
        docs.truncate(limit);
        Ok(docs)
    }
}

impl Default for OpenLibraryClient {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

#[async_trait]
impl BookSearch for OpenLibraryClient {
    async fn search(&self, query: &str, limit: usize) -> Result<Vec<SearchResult>, ClientError> {
        self.search_books(query, limit).await
    }
}
