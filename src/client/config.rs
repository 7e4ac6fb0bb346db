use std::env;
use std::time::Duration;

use super::api::DEFAULT_API_URL;
use super::notice::DEFAULT_NOTICE_TTL;
use super::search::{DEFAULT_DEBOUNCE, MAX_RESULTS};
use crate::openlibrary::{DEFAULT_BASE_URL, DEFAULT_COVERS_URL};

#[derive(Clone, Debug)]
pub struct ClientConfig {
    pub api_url: String,
    pub openlibrary_url: String,
    pub covers_url: String,
    pub debounce: Duration,
    pub notice_ttl: Duration,
    pub max_results: usize,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            openlibrary_url: DEFAULT_BASE_URL.to_string(),
            covers_url: DEFAULT_COVERS_URL.to_string(),
            debounce: DEFAULT_DEBOUNCE,
            notice_ttl: DEFAULT_NOTICE_TTL,
            max_results: MAX_RESULTS,
        }
    }
}

impl ClientConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            api_url: env::var("BOOKLIST_API_URL").unwrap_or(defaults.api_url),
            openlibrary_url: env::var("OPENLIBRARY_URL").unwrap_or(defaults.openlibrary_url),
            covers_url: env::var("OPENLIBRARY_COVERS_URL").unwrap_or(defaults.covers_url),
            ..defaults
        }
    }

    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = api_url.into();
        self
    }
}
