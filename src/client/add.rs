//! Add view: passcode gate, debounced search and filing results
//!
//! The "filed" state is keyed by the Open Library work key, not by list
//! position, so every result carrying that key reads `FILED` once one of
//! them has been added.

use std::collections::HashSet;
use std::fmt::Write as _;
use std::sync::{Arc, Mutex};

use super::catalog::CatalogState;
use super::notice::Notice;
use super::search::SearchController;
use super::session::Session;
use super::MutationOutcome;
use crate::models::NewBook;
use crate::openlibrary::{CoverSize, Covers, SearchResult};

pub const ACCESS_DENIED: &str = "Access denied.";
pub const ADD_FAILED: &str = "Failed to catalog entry.";
pub const UNKNOWN_AUTHOR: &str = "Unknown";

/// State of the per-result "file" control.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileControl {
    Available,
    Pending,
    Filed,
}

impl FileControl {
    pub fn label(self) -> &'static str {
        match self {
            FileControl::Available => "FILE",
            FileControl::Pending => "...",
            FileControl::Filed => "FILED",
        }
    }

    pub fn is_enabled(self) -> bool {
        self == FileControl::Available
    }
}

#[derive(Default)]
struct AddState {
    auth_error: Option<String>,
    verifying: bool,
    added: HashSet<String>,
    adding: HashSet<String>,
}

#[derive(Clone)]
pub struct AddView {
    session: Session,
    search: SearchController,
    catalog: CatalogState,
    covers: Covers,
    notice: Notice,
    state: Arc<Mutex<AddState>>,
}

impl AddView {
    pub fn new(
        session: Session,
        search: SearchController,
        catalog: CatalogState,
        covers: Covers,
        notice: Notice,
    ) -> Self {
        Self {
            session,
            search,
            catalog,
            covers,
            notice,
            state: Arc::new(Mutex::new(AddState::default())),
        }
    }

    pub fn search(&self) -> &SearchController {
        &self.search
    }

    pub fn notice(&self) -> &Notice {
        &self.notice
    }

    pub fn is_unlocked(&self) -> bool {
        self.session.is_authenticated()
    }

    pub fn auth_error(&self) -> Option<String> {
        self.lock().auth_error.clone()
    }

    pub fn is_verifying(&self) -> bool {
        self.lock().verifying
    }

    /// Submit the passcode form. Returns whether the view is now unlocked.
    ///
    /// The submit control is disabled for an empty passcode or while a
    /// verification is already running, so those submissions do nothing.
    pub async fn authenticate(&self, passcode: &str) -> bool {
        {
            let mut state = self.lock();
            if passcode.is_empty() || state.verifying {
                return false;
            }
            state.auth_error = None;
            state.verifying = true;
        }

        let unlocked = match self.session.verify(passcode).await {
            Ok(_) => true,
            Err(_) => {
                self.lock().auth_error = Some(ACCESS_DENIED.to_string());
                false
            }
        };

        self.lock().verifying = false;
        unlocked
    }

    pub fn type_query(&self, value: &str) {
        self.search.set_query(value);
    }

    pub fn results(&self) -> Vec<SearchResult> {
        self.search.results()
    }

    pub fn control(&self, key: &str) -> FileControl {
        let state = self.lock();
        if state.added.contains(key) {
            FileControl::Filed
        } else if state.adding.contains(key) {
            FileControl::Pending
        } else {
            FileControl::Available
        }
    }

    /// Payload for filing `result`: first author or `Unknown`, medium cover.
    pub fn new_book(&self, result: &SearchResult) -> NewBook {
        NewBook {
            title: result.title.clone(),
            author: Some(
                result
                    .primary_author()
                    .unwrap_or(UNKNOWN_AUTHOR)
                    .to_string(),
            ),
            cover_url: result
                .cover_edition_key
                .as_deref()
                .map(|key| self.covers.url(key, CoverSize::Medium)),
            ol_key: Some(result.key.clone()),
            year: result.first_publish_year,
        }
    }

    /// File a search result into the catalog.
    pub async fn file(&self, result: &SearchResult) -> MutationOutcome {
        let Some(token) = self.session.token() else {
            return MutationOutcome::Skipped;
        };
        {
            let mut state = self.lock();
            if state.added.contains(&result.key) || !state.adding.insert(result.key.clone()) {
                return MutationOutcome::Skipped;
            }
        }
        self.notice.clear();

        let payload = self.new_book(result);
        let outcome = match self.session.api().add_book(&token, &payload).await {
            Ok(book) => {
                tracing::info!("Filed {:?} as {}", book.title, book.id);
                self.lock().added.insert(result.key.clone());
                self.catalog.insert(book);
                MutationOutcome::Applied
            }
            Err(e) => {
                tracing::warn!("Failed to file {}: {}", result.key, e);
                self.notice.show(ADD_FAILED);
                MutationOutcome::Failed
            }
        };

        self.lock().adding.remove(&result.key);
        outcome
    }

    pub fn render(&self) -> String {
        let mut out = String::new();

        if !self.is_unlocked() {
            let _ = writeln!(out, "STAFF ONLY");
            let _ = writeln!(out, "{}", "-".repeat(24));
            let _ = writeln!(out, "Enter passcode");
            if let Some(error) = self.auth_error() {
                let _ = writeln!(out, "{}", error);
            }
            if self.is_verifying() {
                let _ = writeln!(out, "Verifying...");
            }
            return out;
        }

        let _ = writeln!(out, "NEW ENTRY{:>39}", "[ CATALOG ]");
        let _ = writeln!(out, "{}", "=".repeat(48));

        if let Some(message) = self.notice.current() {
            let _ = writeln!(out, "! {}", message);
        }

        let query = self.search.query();
        let searching = self.search.is_searching();
        let _ = writeln!(
            out,
            "> {}{}",
            query,
            if searching { "  (searching)" } else { "" }
        );

        let results = self.results();
        for (index, result) in results.iter().enumerate() {
            let mut byline = result
                .primary_author()
                .unwrap_or("Unknown author")
                .to_string();
            if let Some(year) = result.first_publish_year {
                let _ = write!(byline, " · {}", year);
            }
            let _ = writeln!(out);
            let _ = writeln!(
                out,
                "{:>2}. {:<36} [{}]",
                index + 1,
                result.title,
                self.control(&result.key).label()
            );
            let _ = writeln!(out, "    {}", byline);
            if let Some(key) = result.cover_edition_key.as_deref() {
                let _ = writeln!(out, "    {}", self.covers.url(key, CoverSize::Small));
            }
        }

        if !query.is_empty() && !searching && results.is_empty() {
            let _ = writeln!(out);
            let _ = writeln!(out, "No results found.");
        }
        out
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, AddState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }
}
