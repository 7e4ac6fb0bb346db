//! Client layer - the views the maintainer and the public interact with
//!
//! This layer contains:
//! - Typed backend client (api)
//! - Session token and tab storage (session)
//! - Debounced Open Library search (search)
//! - Catalog and add views (catalog, add)
//! - Transient error notices (notice)

pub mod add;
pub mod api;
pub mod catalog;
pub mod config;
pub mod error;
pub mod notice;
pub mod search;
pub mod session;
pub mod shell;

#[cfg(test)]
pub(crate) mod testing;

use std::sync::Arc;

pub use add::{AddView, FileControl};
pub use api::{ApiClient, CatalogApi};
pub use catalog::{CatalogState, CatalogView};
pub use config::ClientConfig;
pub use error::ClientError;
pub use notice::Notice;
pub use search::SearchController;
pub use session::{Session, TabStorage};

use crate::openlibrary::{BookSearch, Covers, OpenLibraryClient};

/// What became of a requested add or delete.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationOutcome {
    /// The backend accepted it and local state was updated.
    Applied,
    /// Nothing was sent: no session token, or the item already has an
    /// operation pending (or is already filed).
    Skipped,
    /// The backend call failed; a notice is showing.
    Failed,
}

/// One browser-tab equivalent: a session plus both views over a shared
/// catalog state.
#[derive(Clone)]
pub struct Tab {
    pub session: Session,
    pub catalog: CatalogView,
    pub add: AddView,
}

impl Tab {
    pub fn new(api: Arc<dyn CatalogApi>, search: Arc<dyn BookSearch>, config: &ClientConfig) -> Self {
        let session = Session::new(api, TabStorage::new());
        let catalog_state = CatalogState::new();
        let catalog = CatalogView::new(
            session.clone(),
            catalog_state.clone(),
            Covers::new(config.covers_url.clone()),
            Notice::new(config.notice_ttl),
        );
        let add = AddView::new(
            session.clone(),
            SearchController::new(search, config.debounce, config.max_results),
            catalog_state,
            Covers::new(config.covers_url.clone()),
            Notice::new(config.notice_ttl),
        );
        Self {
            session,
            catalog,
            add,
        }
    }

    /// Tab wired to the HTTP backend and Open Library from `config`.
    pub fn from_config(config: &ClientConfig) -> Self {
        Self::new(
            Arc::new(ApiClient::new(config.api_url.clone())),
            Arc::new(OpenLibraryClient::new(config.openlibrary_url.clone())),
            config,
        )
    }
}
