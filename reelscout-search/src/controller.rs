//! Fetch orchestration for a search session.
//!
//! [`SearchController`] owns one [`SearchSession`] and is the only code that
//! mutates it. User actions start a fetch on a spawned task; the task reports
//! back over a channel tagged with the sequence number it was started with,
//! and the controller commits the outcome only if that number is still the
//! newest. Slow responses for superseded requests are therefore dropped no
//! matter in which order the catalog answers.

use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures::FutureExt;
use reelscout_core::{SearchConfig, YearBounds};
use tokio::sync::mpsc;
use tokio::task::AbortHandle;
use tracing::{debug, info, warn};

use crate::errors::ActionRejected;
use crate::providers::CatalogProvider;
use crate::session::{Commit, PendingFetch, SearchSession, SessionStatus};
use crate::types::{CatalogOutcome, SearchFilters};

/// Outcome of one fetch, tagged with the sequence number it started under.
#[derive(Debug)]
pub struct FetchCompletion {
    /// Sequence number captured when the fetch started
    pub seq: u64,
    /// What the catalog answered
    pub outcome: CatalogOutcome,
}

/// Owner of a search session and the fetches it triggers.
///
/// Actions must be called from within a Tokio runtime because they spawn the
/// catalog request.
#[derive(Debug)]
pub struct SearchController {
    session: SearchSession,
    catalog: Arc<dyn CatalogProvider>,
    year_bounds: YearBounds,
    cancel_superseded: bool,
    completions_tx: mpsc::UnboundedSender<FetchCompletion>,
    completions_rx: mpsc::UnboundedReceiver<FetchCompletion>,
    in_flight: Option<AbortHandle>,
}

impl SearchController {
    /// Creates a controller with an idle session.
    pub fn new(catalog: Arc<dyn CatalogProvider>, config: &SearchConfig) -> Self {
        let (completions_tx, completions_rx) = mpsc::unbounded_channel();

        Self {
            session: SearchSession::new(),
            catalog,
            year_bounds: config.year_bounds(),
            cancel_superseded: config.cancel_superseded,
            completions_tx,
            completions_rx,
            in_flight: None,
        }
    }

    /// Read-only view of the session.
    pub fn session(&self) -> &SearchSession {
        &self.session
    }

    /// Year range filters are clamped into.
    pub fn year_bounds(&self) -> YearBounds {
        self.year_bounds
    }

    /// Submits new search text and fetches its first page.
    ///
    /// Returns the sequence number of the started fetch.
    ///
    /// # Errors
    ///
    /// - `ActionRejected::EmptyQuery` - `text` is blank after trimming
    ///
    /// # Panics
    ///
    /// Panics when called outside a Tokio runtime.
    pub fn submit_query(&mut self, text: &str) -> Result<u64, ActionRejected> {
        let fetch = self.session.begin_query(text)?;
        Ok(self.run_fetch(fetch))
    }

    /// Submits search text together with filters (year clamped) as a single
    /// fetch of page one.
    ///
    /// # Errors
    ///
    /// - `ActionRejected::EmptyQuery` - `text` is blank after trimming
    ///
    /// # Panics
    ///
    /// Panics when called outside a Tokio runtime.
    pub fn submit_search(
        &mut self,
        text: &str,
        filters: SearchFilters,
    ) -> Result<u64, ActionRejected> {
        let fetch = self
            .session
            .begin_search(text, filters.clamped(self.year_bounds))?;
        Ok(self.run_fetch(fetch))
    }

    /// Applies new filters (year clamped) and fetches page one.
    ///
    /// # Errors
    ///
    /// - `ActionRejected::NoActiveQuery` - Nothing submitted yet
    ///
    /// # Panics
    ///
    /// Panics when called outside a Tokio runtime.
    pub fn change_filters(&mut self, filters: SearchFilters) -> Result<u64, ActionRejected> {
        let fetch = self.session.begin_filters(filters.clamped(self.year_bounds))?;
        Ok(self.run_fetch(fetch))
    }

    /// Fetches another page of the current search.
    ///
    /// # Errors
    ///
    /// - `ActionRejected::NoActiveQuery` - Nothing submitted yet
    /// - `ActionRejected::PageOutOfRange` - `page` is zero or past the last page
    ///
    /// # Panics
    ///
    /// Panics when called outside a Tokio runtime.
    pub fn change_page(&mut self, page: u32) -> Result<u64, ActionRejected> {
        let fetch = self.session.begin_page(page)?;
        Ok(self.run_fetch(fetch))
    }

    fn run_fetch(&mut self, fetch: PendingFetch) -> u64 {
        let PendingFetch { seq, request } = fetch;

        if self.cancel_superseded {
            if let Some(previous) = self.in_flight.take() {
                previous.abort();
            }
        }

        debug!(
            seq,
            query = %request.query,
            page = request.page,
            filters = %request.filters,
            catalog = self.catalog.name(),
            "Dispatching catalog fetch"
        );

        let catalog = Arc::clone(&self.catalog);
        let completions = self.completions_tx.clone();

        let handle = tokio::spawn(async move {
            let outcome = match AssertUnwindSafe(catalog.search(&request)).catch_unwind().await {
                Ok(outcome) => outcome,
                Err(_) => {
                    warn!(seq, query = %request.query, "Catalog fetch panicked");
                    CatalogOutcome::failure()
                }
            };

            // A closed channel means the controller is gone.
            let _ = completions.send(FetchCompletion { seq, outcome });
        });

        self.in_flight = Some(handle.abort_handle());
        seq
    }

    /// Commits a completion if it is still current.
    pub fn apply_completion(&mut self, completion: FetchCompletion) -> Commit {
        let FetchCompletion { seq, outcome } = completion;

        let commit = self.session.apply(seq, outcome);
        match commit {
            Commit::Applied { status, .. } => {
                self.in_flight = None;
                if let (SessionStatus::Error, Some(message)) =
                    (status, self.session.error_message())
                {
                    warn!(seq, %message, "Catalog fetch failed");
                }
                info!(
                    seq,
                    ?status,
                    page = self.session.page(),
                    total_pages = self.session.total_pages(),
                    results = self.session.results().len(),
                    "Committed catalog response"
                );
            }
            Commit::Stale { .. } => {
                debug!(
                    seq,
                    current = self.session.request_seq(),
                    "Discarding stale catalog response"
                );
            }
        }

        commit
    }

    /// Waits for the next fetch to finish and applies it.
    pub async fn next_completion(&mut self) -> Option<Commit> {
        let completion = self.completions_rx.recv().await?;
        Some(self.apply_completion(completion))
    }

    /// Applies every completion that has already arrived, without waiting.
    pub fn pump(&mut self) -> Vec<Commit> {
        let mut commits = Vec::new();
        while let Ok(completion) = self.completions_rx.try_recv() {
            commits.push(self.apply_completion(completion));
        }
        commits
    }

    /// Waits until the newest fetch has been committed.
    ///
    /// Returns immediately when nothing is loading.
    pub async fn settle(&mut self) -> &SearchSession {
        while self.session.status() == SessionStatus::Loading {
            if self.next_completion().await.is_none() {
                break;
            }
        }
        &self.session
    }
}

impl Drop for SearchController {
    fn drop(&mut self) {
        if let Some(handle) = self.in_flight.take() {
            handle.abort();
        }
    }
}
