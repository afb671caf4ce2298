//! Search session state and its transition rules.
//!
//! A [`SearchSession`] is the single read model the presentation layer renders.
//! Every mutation goes through one of the `begin_*` transitions, which start a
//! new request sequence number, or through [`SearchSession::apply`], which
//! commits a catalog outcome only if it belongs to the newest request.

use serde::Serialize;
use tracing::warn;

use crate::errors::ActionRejected;
use crate::pagination::total_pages;
use crate::types::{CatalogOutcome, MovieSummary, NOT_FOUND_FALLBACK, SearchFilters, SearchRequest};

/// Coarse state of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SessionStatus {
    /// Nothing submitted yet
    Idle,
    /// A fetch is outstanding
    Loading,
    /// Results are available
    Ready,
    /// The catalog matched nothing
    Empty,
    /// The last fetch failed
    Error,
}

/// A fetch the session just started, to be handed to a catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingFetch {
    /// Sequence number the outcome must carry to be committed
    pub seq: u64,
    /// Parameters captured when the fetch started
    pub request: SearchRequest,
}

/// What happened to an outcome handed to [`SearchSession::apply`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Commit {
    /// Outcome was committed and the session moved to `status`.
    Applied {
        /// Sequence number of the committed fetch
        seq: u64,
        /// Status after the commit
        status: SessionStatus,
    },
    /// Outcome belonged to a superseded or already committed fetch.
    Stale {
        /// Sequence number carried by the dropped outcome
        seq: u64,
    },
}

/// The mutable aggregate behind one user's search interaction.
#[derive(Debug, Clone)]
pub struct SearchSession {
    query: String,
    filters: SearchFilters,
    page: u32,
    total_pages: u32,
    // False between a query/filter change and its first resolution.
    page_count_known: bool,
    results: Vec<MovieSummary>,
    status: SessionStatus,
    error_message: Option<String>,
    request_seq: u64,
}

impl Default for SearchSession {
    fn default() -> Self {
        Self::new()
    }
}

impl SearchSession {
    /// Creates an idle session with nothing submitted.
    pub fn new() -> Self {
        Self {
            query: String::new(),
            filters: SearchFilters::any(),
            page: 1,
            total_pages: 1,
            page_count_known: false,
            results: Vec::new(),
            status: SessionStatus::Idle,
            error_message: None,
            request_seq: 0,
        }
    }

    /// Last submitted query text.
    pub fn query(&self) -> &str {
        &self.query
    }

    /// Last applied filters.
    pub fn filters(&self) -> SearchFilters {
        self.filters
    }

    /// Current 1-based page.
    pub fn page(&self) -> u32 {
        self.page
    }

    /// Page count of the current search, at least one.
    pub fn total_pages(&self) -> u32 {
        self.total_pages
    }

    /// Items of the current page in catalog order.
    pub fn results(&self) -> &[MovieSummary] {
        &self.results
    }

    /// Current status.
    pub fn status(&self) -> SessionStatus {
        self.status
    }

    /// Message for `Empty` and `Error` states.
    pub fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }

    /// Sequence number of the newest fetch.
    pub fn request_seq(&self) -> u64 {
        self.request_seq
    }

    /// Serializable snapshot for the presentation layer.
    pub fn view(&self) -> SessionView<'_> {
        SessionView {
            query: &self.query,
            filters: self.filters,
            page: self.page,
            total_pages: self.total_pages,
            results: &self.results,
            status: self.status,
            error_message: self.error_message.as_deref(),
        }
    }

    /// Starts a search for `text` from page one.
    ///
    /// # Errors
    ///
    /// - `ActionRejected::EmptyQuery` - `text` is blank after trimming
    pub fn begin_query(&mut self, text: &str) -> Result<PendingFetch, ActionRejected> {
        self.begin_search(text, self.filters)
    }

    /// Starts a search for `text` under `filters` from page one, in a single
    /// fetch.
    ///
    /// # Errors
    ///
    /// - `ActionRejected::EmptyQuery` - `text` is blank after trimming
    pub fn begin_search(
        &mut self,
        text: &str,
        filters: SearchFilters,
    ) -> Result<PendingFetch, ActionRejected> {
        let text = text.trim();
        if text.is_empty() {
            return Err(ActionRejected::EmptyQuery);
        }

        self.query = text.to_string();
        self.filters = filters;
        self.page = 1;
        self.total_pages = 1;
        self.page_count_known = false;
        Ok(self.begin_fetch())
    }

    /// Re-runs the current query with new filters from page one.
    ///
    /// # Errors
    ///
    /// - `ActionRejected::NoActiveQuery` - Nothing submitted yet
    pub fn begin_filters(&mut self, filters: SearchFilters) -> Result<PendingFetch, ActionRejected> {
        if self.query.is_empty() {
            return Err(ActionRejected::NoActiveQuery);
        }

        self.filters = filters;
        self.page = 1;
        self.total_pages = 1;
        self.page_count_known = false;
        Ok(self.begin_fetch())
    }

    /// Fetches another page of the current query and filters.
    ///
    /// The upper bound is only enforced once a page count is known for the
    /// current query and filters.
    ///
    /// # Errors
    ///
    /// - `ActionRejected::NoActiveQuery` - Nothing submitted yet
    /// - `ActionRejected::PageOutOfRange` - `page` is zero or past the last page
    pub fn begin_page(&mut self, page: u32) -> Result<PendingFetch, ActionRejected> {
        if self.query.is_empty() {
            return Err(ActionRejected::NoActiveQuery);
        }

        if page < 1 || (self.page_count_known && page > self.total_pages) {
            return Err(ActionRejected::PageOutOfRange {
                requested: page,
                total_pages: self.total_pages,
            });
        }

        self.page = page;
        Ok(self.begin_fetch())
    }

    fn begin_fetch(&mut self) -> PendingFetch {
        self.request_seq += 1;
        self.status = SessionStatus::Loading;
        self.results.clear();
        self.error_message = None;

        PendingFetch {
            seq: self.request_seq,
            request: SearchRequest {
                query: self.query.clone(),
                page: self.page,
                filters: self.filters,
            },
        }
    }

    /// Commits `outcome` if `seq` is the newest fetch and it is still pending.
    pub fn apply(&mut self, seq: u64, outcome: CatalogOutcome) -> Commit {
        if seq != self.request_seq || self.status != SessionStatus::Loading {
            return Commit::Stale { seq };
        }

        match outcome {
            CatalogOutcome::Found { items, .. } if items.is_empty() => {
                self.settle_empty(NOT_FOUND_FALLBACK.to_string());
            }
            CatalogOutcome::Found { items, total_count } => {
                let reported = total_pages(total_count);
                if self.page > reported {
                    warn!(
                        seq,
                        page = self.page,
                        reported,
                        total_count,
                        "Catalog answered a page past its own page count"
                    );
                }
                self.total_pages = reported.max(self.page);
                self.page_count_known = true;
                self.results = items;
                self.error_message = None;
                self.status = SessionStatus::Ready;
            }
            CatalogOutcome::NotFound { message } => self.settle_empty(message),
            CatalogOutcome::Failure { message } => {
                // Page and page count stay so the same page can be retried.
                self.results.clear();
                self.error_message = Some(message);
                self.status = SessionStatus::Error;
            }
        }

        Commit::Applied {
            seq,
            status: self.status,
        }
    }

    fn settle_empty(&mut self, message: String) {
        self.results.clear();
        self.total_pages = 1;
        self.page_count_known = true;
        self.error_message = Some(message);
        self.status = SessionStatus::Empty;
    }
}

/// Borrowed, serializable read model of a [`SearchSession`].
#[derive(Debug, Clone, Serialize)]
pub struct SessionView<'a> {
    /// Last submitted query text
    pub query: &'a str,
    /// Last applied filters
    pub filters: SearchFilters,
    /// Current page
    pub page: u32,
    /// Page count
    pub total_pages: u32,
    /// Items of the current page
    pub results: &'a [MovieSummary],
    /// Current status
    pub status: SessionStatus,
    /// Message for `Empty` and `Error` states
    pub error_message: Option<&'a str>,
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;
    use crate::types::{MediaKind, Poster};

    fn items(count: usize) -> Vec<MovieSummary> {
        (0..count)
            .map(|i| MovieSummary {
                external_id: format!("tt{i:07}"),
                title: format!("Title {i}"),
                year: "2001".to_string(),
                poster: Poster::Missing,
                kind: Some(MediaKind::Movie),
            })
            .collect()
    }

    fn found(count: usize, total_count: u32) -> CatalogOutcome {
        CatalogOutcome::Found {
            items: items(count),
            total_count,
        }
    }

    fn ready_session(total_count: u32) -> SearchSession {
        let mut session = SearchSession::new();
        let fetch = session.begin_query("batman").unwrap();
        session.apply(fetch.seq, found(10, total_count));
        session
    }

    #[test]
    fn test_new_session_is_idle() {
        let session = SearchSession::new();
        assert_eq!(session.status(), SessionStatus::Idle);
        assert_eq!(session.page(), 1);
        assert_eq!(session.total_pages(), 1);
        assert!(session.results().is_empty());
        assert!(session.query().is_empty());
        assert!(session.filters().is_unconstrained());
        assert_eq!(session.request_seq(), 0);
    }

    #[test]
    fn test_blank_query_is_rejected_without_change() {
        let mut session = ready_session(95);
        let before = session.request_seq();

        assert_eq!(session.begin_query("   "), Err(ActionRejected::EmptyQuery));
        assert_eq!(session.status(), SessionStatus::Ready);
        assert_eq!(session.request_seq(), before);
        assert_eq!(session.query(), "batman");
    }

    #[test]
    fn test_query_is_trimmed_and_captured() {
        let mut session = SearchSession::new();
        let fetch = session.begin_query("  the matrix ").unwrap();

        assert_eq!(fetch.seq, 1);
        assert_eq!(fetch.request.query, "the matrix");
        assert_eq!(fetch.request.page, 1);
        assert_eq!(session.status(), SessionStatus::Loading);
        assert!(session.error_message().is_none());
    }

    #[test]
    fn test_found_outcome_sets_ready_and_page_count() {
        let mut session = SearchSession::new();
        let fetch = session.begin_query("batman").unwrap();

        let commit = session.apply(fetch.seq, found(10, 95));

        assert_eq!(
            commit,
            Commit::Applied {
                seq: 1,
                status: SessionStatus::Ready
            }
        );
        assert_eq!(session.total_pages(), 10);
        assert_eq!(session.results().len(), 10);
        assert!(session.error_message().is_none());
    }

    #[test]
    fn test_found_without_items_is_empty() {
        let mut session = SearchSession::new();
        let fetch = session.begin_query("batman").unwrap();

        session.apply(fetch.seq, found(0, 0));

        assert_eq!(session.status(), SessionStatus::Empty);
        assert_eq!(session.error_message(), Some(NOT_FOUND_FALLBACK));
        assert!(session.results().is_empty());
    }

    #[test]
    fn test_not_found_sets_empty_with_message() {
        let mut session = ready_session(95);
        let fetch = session.begin_query("zzzzxnoresults").unwrap();

        session.apply(fetch.seq, CatalogOutcome::not_found(Some("Movie not found!".into())));

        assert_eq!(session.status(), SessionStatus::Empty);
        assert_eq!(session.error_message(), Some("Movie not found!"));
        assert!(session.results().is_empty());
        assert_eq!(session.total_pages(), 1);
    }

    #[test]
    fn test_failure_keeps_page_for_retry() {
        let mut session = ready_session(95);
        let fetch = session.begin_page(4).unwrap();

        session.apply(fetch.seq, CatalogOutcome::failure());

        assert_eq!(session.status(), SessionStatus::Error);
        assert!(session.results().is_empty());
        assert_eq!(session.page(), 4);
        assert_eq!(session.total_pages(), 10);

        let retry = session.begin_page(4).unwrap();
        assert_eq!(retry.request.page, 4);
    }

    #[test]
    fn test_new_query_drops_previous_page_count() {
        let mut session = ready_session(95);
        assert_eq!(session.total_pages(), 10);

        let fetch = session.begin_query("other").unwrap();
        assert_eq!(session.total_pages(), 1);

        session.apply(fetch.seq, CatalogOutcome::failure());

        assert_eq!(session.query(), "other");
        assert_eq!(session.status(), SessionStatus::Error);
        assert_eq!(session.total_pages(), 1);
    }

    #[test]
    fn test_filter_change_drops_previous_page_count() {
        let mut session = ready_session(95);

        let filters = SearchFilters::new(Some(MediaKind::Series), None);
        let fetch = session.begin_filters(filters).unwrap();
        assert_eq!(session.total_pages(), 1);

        session.apply(fetch.seq, CatalogOutcome::failure());
        assert_eq!(session.total_pages(), 1);
    }

    #[test]
    fn test_early_page_jump_past_reported_count() {
        let mut session = SearchSession::new();
        session.begin_query("batman").unwrap();
        let fetch = session.begin_page(7).unwrap();

        session.apply(fetch.seq, found(2, 12));

        assert_eq!(session.status(), SessionStatus::Ready);
        assert_eq!(session.page(), 7);
        assert_eq!(session.total_pages(), 7);
        assert!(session.begin_page(8).is_err());
    }

    #[test]
    fn test_search_with_filters_is_one_fetch() {
        let mut session = SearchSession::new();
        let filters = SearchFilters::new(Some(MediaKind::Movie), Some(2005));

        let fetch = session.begin_search(" batman ", filters).unwrap();

        assert_eq!(fetch.seq, 1);
        assert_eq!(fetch.request.query, "batman");
        assert_eq!(fetch.request.filters, filters);
        assert_eq!(session.filters(), filters);
        assert_eq!(
            session.begin_search("", SearchFilters::any()),
            Err(ActionRejected::EmptyQuery)
        );
        assert_eq!(session.filters(), filters);
    }

    #[test]
    fn test_filters_need_a_query() {
        let mut session = SearchSession::new();
        let filters = SearchFilters::new(Some(MediaKind::Series), None);

        assert_eq!(
            session.begin_filters(filters),
            Err(ActionRejected::NoActiveQuery)
        );
        assert!(session.filters().is_unconstrained());
        assert_eq!(session.status(), SessionStatus::Idle);
        assert_eq!(session.request_seq(), 0);
    }

    #[test]
    fn test_filter_change_resets_page() {
        let mut session = ready_session(95);
        let fetch = session.begin_page(3).unwrap();
        session.apply(fetch.seq, found(10, 95));
        assert_eq!(session.page(), 3);

        let filters = SearchFilters::new(Some(MediaKind::Movie), Some(2005));
        let fetch = session.begin_filters(filters).unwrap();

        assert_eq!(session.page(), 1);
        assert_eq!(fetch.request.filters, filters);
        assert_eq!(fetch.request.query, "batman");
    }

    #[test]
    fn test_page_change_keeps_query_and_filters() {
        let mut session = SearchSession::new();
        session.begin_query("batman").unwrap();
        let filters = SearchFilters::new(Some(MediaKind::Movie), None);
        let fetch = session.begin_filters(filters).unwrap();
        session.apply(fetch.seq, found(10, 42));

        let fetch = session.begin_page(5).unwrap();

        assert_eq!(fetch.request.query, "batman");
        assert_eq!(fetch.request.filters, filters);
        assert_eq!(fetch.request.page, 5);
    }

    #[test]
    fn test_page_out_of_range_is_rejected() {
        let mut session = ready_session(95);
        let before = session.request_seq();

        assert_eq!(
            session.begin_page(11),
            Err(ActionRejected::PageOutOfRange {
                requested: 11,
                total_pages: 10
            })
        );
        assert!(matches!(
            session.begin_page(0),
            Err(ActionRejected::PageOutOfRange { requested: 0, .. })
        ));
        assert_eq!(session.request_seq(), before);
        assert_eq!(session.status(), SessionStatus::Ready);
        assert_eq!(session.page(), 1);
    }

    #[test]
    fn test_page_without_query_is_rejected() {
        let mut session = SearchSession::new();
        assert_eq!(session.begin_page(1), Err(ActionRejected::NoActiveQuery));
    }

    #[test]
    fn test_page_change_allowed_before_first_count() {
        let mut session = SearchSession::new();
        session.begin_query("batman").unwrap();

        let fetch = session.begin_page(2).unwrap();

        assert_eq!(fetch.seq, 2);
        assert_eq!(fetch.request.page, 2);
    }

    #[test]
    fn test_stale_outcome_is_dropped() {
        let mut session = SearchSession::new();
        let first = session.begin_query("batman").unwrap();
        let second = session.begin_page(2).unwrap();

        let commit = session.apply(second.seq, found(10, 20));
        assert!(matches!(commit, Commit::Applied { seq: 2, .. }));
        let results = session.results().to_vec();

        assert_eq!(
            session.apply(first.seq, found(3, 3)),
            Commit::Stale { seq: 1 }
        );
        assert_eq!(session.results(), results.as_slice());
        assert_eq!(session.page(), 2);
        assert_eq!(session.total_pages(), 2);
    }

    #[test]
    fn test_outcome_commits_once_per_seq() {
        let mut session = SearchSession::new();
        let fetch = session.begin_query("batman").unwrap();

        session.apply(fetch.seq, found(10, 95));
        let second = session.apply(fetch.seq, CatalogOutcome::failure());

        assert_eq!(second, Commit::Stale { seq: 1 });
        assert_eq!(session.status(), SessionStatus::Ready);
    }

    #[test]
    fn test_view_serializes_read_model() {
        let session = ready_session(95);
        let json = serde_json::to_value(session.view()).unwrap();

        assert_eq!(json["query"], "batman");
        assert_eq!(json["status"], "Ready");
        assert_eq!(json["total_pages"], 10);
        assert_eq!(json["results"].as_array().unwrap().len(), 10);
        assert!(json["error_message"].is_null());
    }

    proptest! {
        #[test]
        fn submit_always_returns_to_first_page(
            query in "[a-z]{1,12}",
            page in 1u32..10,
        ) {
            let mut session = ready_session(95);
            let fetch = session.begin_page(page).unwrap();
            session.apply(fetch.seq, found(10, 95));

            let fetch = session.begin_query(&query).unwrap();

            prop_assert_eq!(session.page(), 1);
            prop_assert_eq!(fetch.request.page, 1);
            prop_assert!(session.results().is_empty());
        }

        #[test]
        fn ready_page_never_exceeds_page_count(total in 1u32..500, page in 1u32..60) {
            let mut session = SearchSession::new();
            session.begin_query("batman").unwrap();
            let fetch = session.begin_page(page).unwrap();

            session.apply(fetch.seq, found(1, total));

            prop_assert_eq!(session.status(), SessionStatus::Ready);
            prop_assert!(session.page() <= session.total_pages());
        }
    }
}
