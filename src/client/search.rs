//! Debounced, latest-input-wins search
//!
//! Every keystroke bumps a generation counter. A query only runs if its
//! generation is still current after the quiet period, and its results are
//! only applied if the generation is still current when they arrive. Stale
//! requests are never cancelled, their results are just dropped.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::openlibrary::{BookSearch, SearchResult};

pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(300);
pub const MAX_RESULTS: usize = 8;

#[derive(Default)]
struct SearchState {
    query: String,
    generation: u64,
    results: Vec<SearchResult>,
    searching: bool,
}

#[derive(Clone)]
pub struct SearchController {
    backend: Arc<dyn BookSearch>,
    state: Arc<Mutex<SearchState>>,
    debounce: Duration,
    limit: usize,
}

impl SearchController {
    pub fn new(backend: Arc<dyn BookSearch>, debounce: Duration, limit: usize) -> Self {
        Self {
            backend,
            state: Arc::new(Mutex::new(SearchState::default())),
            debounce,
            limit,
        }
    }

    pub fn debounce(&self) -> Duration {
        self.debounce
    }

    /// Record a new input value.
    ///
    /// Blank input clears the results on the spot. Anything else schedules a
    /// query for after the quiet period.
    pub fn set_query(&self, value: &str) {
        let generation = {
            let mut state = self.lock();
            state.query = value.to_string();
            state.generation += 1;

            if value.trim().is_empty() {
                state.results.clear();
                state.searching = false;
                return;
            }
            state.generation
        };

        let this = self.clone();
        let query = value.to_string();
        tokio::spawn(async move {
            tokio::time::sleep(this.debounce).await;
            this.run(generation, query).await;
        });
    }

    async fn run(&self, generation: u64, query: String) {
        {
            let mut state = self.lock();
            if state.generation != generation {
                return;
            }
            state.searching = true;
        }

        tracing::debug!("Searching Open Library for {:?}", query);
        let results = match self.backend.search(&query, self.limit).await {
            Ok(mut results) => {
                results.truncate(self.limit);
                results
            }
            Err(e) => {
                tracing::warn!("Search for {:?} failed: {}", query, e);
                Vec::new()
            }
        };

        let mut state = self.lock();
        if state.generation != generation {
            tracing::debug!("Discarding stale results for {:?}", query);
            return;
        }
        state.results = results;
        state.searching = false;
    }

    pub fn query(&self) -> String {
        self.lock().query.clone()
    }

    pub fn results(&self) -> Vec<SearchResult> {
        self.lock().results.clone()
    }

    pub fn is_searching(&self) -> bool {
        self.lock().searching
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, SearchState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::testing::{result, FakeSearch};

    fn controller(search: &Arc<FakeSearch>) -> SearchController {
        SearchController::new(search.clone(), DEFAULT_DEBOUNCE, MAX_RESULTS)
    }

    async fn settle() {
        tokio::time::sleep(DEFAULT_DEBOUNCE + Duration::from_millis(50)).await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_rapid_typing_issues_one_request() {
        let search = Arc::new(FakeSearch::default());
        search.respond("abc", vec![result("/works/OL1W", "Abc")]);
        let ctrl = controller(&search);

        for input in ["a", "ab", "abc"] {
            ctrl.set_query(input);
            tokio::time::sleep(Duration::from_millis(100)).await;
        }
        settle().await;

        assert_eq!(search.queries(), vec!["abc".to_string()]);
        assert_eq!(ctrl.results().len(), 1);
        assert!(!ctrl.is_searching());
    }

    #[tokio::test(start_paused = true)]
    async fn test_blank_input_clears_without_request() {
        let search = Arc::new(FakeSearch::default());
        search.respond("dune", vec![result("/works/OL1W", "Dune")]);
        let ctrl = controller(&search);

        ctrl.set_query("dune");
        settle().await;
        assert_eq!(ctrl.results().len(), 1);

        ctrl.set_query("   ");
        assert!(ctrl.results().is_empty());
        assert!(!ctrl.is_searching());

        settle().await;
        assert_eq!(search.queries(), vec!["dune".to_string()]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_stale_result_does_not_clobber_newer_query() {
        let search = Arc::new(FakeSearch::default());
        search.respond_after(
            "slow",
            vec![result("/works/OL1W", "Slow")],
            Duration::from_secs(2),
        );
        search.respond("fast", vec![result("/works/OL2W", "Fast")]);
        let ctrl = controller(&search);

        ctrl.set_query("slow");
        settle().await;
        assert!(ctrl.is_searching());

        ctrl.set_query("fast");
        settle().await;
        assert_eq!(ctrl.results()[0].title, "Fast");

        // let the slow request resolve
        tokio::time::sleep(Duration::from_secs(3)).await;
        assert_eq!(ctrl.results()[0].title, "Fast");
        assert_eq!(search.queries(), vec!["slow".to_string(), "fast".to_string()]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_clearing_input_discards_in_flight_result() {
        let search = Arc::new(FakeSearch::default());
        search.respond_after(
            "dune",
            vec![result("/works/OL1W", "Dune")],
            Duration::from_secs(1),
        );
        let ctrl = controller(&search);

        ctrl.set_query("dune");
        settle().await;
        ctrl.set_query("");
        tokio::time::sleep(Duration::from_secs(2)).await;

        assert!(ctrl.results().is_empty());
        assert!(!ctrl.is_searching());
    }

    #[tokio::test(start_paused = true)]
    async fn test_failure_yields_empty_results() {
        let search = Arc::new(FakeSearch::default());
        search.respond("dune", vec![result("/works/OL1W", "Dune")]);
        let ctrl = controller(&search);

        ctrl.set_query("dune");
        settle().await;
        assert_eq!(ctrl.results().len(), 1);

        ctrl.set_query("broken");
        settle().await;
        assert!(ctrl.results().is_empty());
        assert!(!ctrl.is_searching());
    }

    #[tokio::test(start_paused = true)]
    async fn test_results_are_capped() {
        let search = Arc::new(FakeSearch::default());
        let many = (0..20)
            .map(|i| result(&format!("/works/OL{}W", i), &format!("Book {}", i)))
            .collect();
        search.respond("book", many);
        let ctrl = controller(&search);

        ctrl.set_query("book");
        settle().await;
        assert_eq!(ctrl.results().len(), MAX_RESULTS);
    }
}
