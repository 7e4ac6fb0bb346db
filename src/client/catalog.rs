//! Public catalog view
//!
//! Loads the list once on mount and renders it. When the tab holds a session
//! token each entry can be removed; removal is applied locally on success and
//! the list is never re-fetched.

use std::collections::HashSet;
use std::fmt::Write as _;
use std::sync::{Arc, Mutex};

use super::notice::Notice;
use super::session::Session;
use super::MutationOutcome;
use crate::models::Book;
use crate::openlibrary::Covers;

pub const DELETE_FAILED: &str = "Failed to remove entry.";

struct CatalogInner {
    books: Vec<Book>,
    loading: bool,
}

/// The list of books as the views currently see it.
///
/// Shared between the catalog and add views so a filed book shows up without
/// a reload.
#[derive(Clone)]
pub struct CatalogState {
    inner: Arc<Mutex<CatalogInner>>,
}

impl Default for CatalogState {
    fn default() -> Self {
        Self {
            inner: Arc::new(Mutex::new(CatalogInner {
                books: Vec::new(),
                loading: true,
            })),
        }
    }
}

impl CatalogState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn books(&self) -> Vec<Book> {
        self.lock().books.clone()
    }

    pub fn len(&self) -> usize {
        self.lock().books.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().books.is_empty()
    }

    pub fn is_loading(&self) -> bool {
        self.lock().loading
    }

    /// Replace the list with a fetch result and end the loading state.
    pub fn load(&self, books: Vec<Book>) {
        let mut inner = self.lock();
        inner.books = books;
        inner.loading = false;
    }

    /// Newest first, matching the backend's ordering.
    pub fn insert(&self, book: Book) {
        let mut inner = self.lock();
        inner.books.retain(|b| b.id != book.id);
        inner.books.insert(0, book);
    }

    pub fn remove(&self, book_id: &str) -> bool {
        let mut inner = self.lock();
        let before = inner.books.len();
        inner.books.retain(|b| b.id != book_id);
        inner.books.len() != before
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, CatalogInner> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[derive(Clone)]
pub struct CatalogView {
    session: Session,
    catalog: CatalogState,
    covers: Covers,
    deleting: Arc<Mutex<HashSet<String>>>,
    notice: Notice,
}

impl CatalogView {
    pub fn new(session: Session, catalog: CatalogState, covers: Covers, notice: Notice) -> Self {
        Self {
            session,
            catalog,
            covers,
            deleting: Arc::new(Mutex::new(HashSet::new())),
            notice,
        }
    }

    pub fn catalog(&self) -> &CatalogState {
        &self.catalog
    }

    pub fn notice(&self) -> &Notice {
        &self.notice
    }

    /// Fetch the list once. A failed fetch shows the same empty catalog as
    /// a genuinely empty one.
    pub async fn mount(&self) {
        match self.session.api().list_books().await {
            Ok(books) => {
                tracing::debug!("Loaded {} books", books.len());
                self.catalog.load(books);
            }
            Err(e) => {
                tracing::warn!("Failed to load catalog: {}", e);
                self.catalog.load(Vec::new());
            }
        }
    }

    pub fn can_delete(&self) -> bool {
        self.session.is_authenticated()
    }

    pub fn is_deleting(&self, book_id: &str) -> bool {
        self.pending().contains(book_id)
    }

    pub async fn delete(&self, book_id: &str) -> MutationOutcome {
        let Some(token) = self.session.token() else {
            return MutationOutcome::Skipped;
        };
        if !self.pending().insert(book_id.to_string()) {
            return MutationOutcome::Skipped;
        }
        self.notice.clear();

        let outcome = match self.session.api().delete_book(&token, book_id).await {
            Ok(()) => {
                self.catalog.remove(book_id);
                tracing::info!("Removed book {}", book_id);
                MutationOutcome::Applied
            }
            Err(e) => {
                tracing::warn!("Failed to remove book {}: {}", book_id, e);
                self.notice.show(DELETE_FAILED);
                MutationOutcome::Failed
            }
        };

        self.pending().remove(book_id);
        outcome
    }

    pub fn render(&self) -> String {
        if self.catalog.is_loading() {
            return "Loading catalog...\n".to_string();
        }

        let books = self.catalog.books();
        let authed = self.can_delete();
        let mut out = String::new();

        let _ = writeln!(out, "BOOKLIST{:>40}", "[ + ADD ]");
        let _ = writeln!(out, "{}", "=".repeat(48));
        let noun = if books.len() == 1 { "volume" } else { "volumes" };
        let _ = writeln!(out, "{} {} cataloged", books.len(), noun);

        if let Some(message) = self.notice.current() {
            let _ = writeln!(out, "! {}", message);
        }

        if books.is_empty() {
            let _ = writeln!(out);
            let _ = writeln!(out, "The catalog is empty.");
            return out;
        }

        for (index, book) in books.iter().enumerate() {
            let _ = writeln!(out);
            let _ = writeln!(out, "{:03}  {}", index + 1, book.title);
            let author = book.author.as_deref().unwrap_or_default();
            if authed {
                let control = if self.is_deleting(&book.id) {
                    "..."
                } else {
                    "[ REMOVE ]"
                };
                let _ = writeln!(out, "     {:<30} {}", author, control);
            } else {
                let _ = writeln!(out, "     {}", author);
            }
            if let Some(cover) = book.cover_image(&self.covers) {
                let _ = writeln!(out, "     {}", cover);
            }
        }
        out
    }

    fn pending(&self) -> std::sync::MutexGuard<'_, HashSet<String>> {
        self.deleting.lock().unwrap_or_else(|e| e.into_inner())
    }
}
