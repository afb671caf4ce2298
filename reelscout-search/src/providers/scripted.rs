//! Scripted catalog for tests.
//!
//! Answers from canned outcomes keyed by query and page, optionally after a
//! delay, and records every request it receives. Delays make it possible to
//! resolve an older request after a newer one.

use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use super::CatalogProvider;
use crate::types::{CatalogOutcome, MediaKind, MovieSummary, Poster, SearchRequest};

#[derive(Debug, Clone)]
struct Rule {
    query: String,
    page: Option<u32>,
    delay: Duration,
    outcome: Option<CatalogOutcome>,
}

/// Catalog that replays scripted outcomes.
///
/// Unscripted requests resolve immediately as "Movie not found!". A rule
/// without an outcome panics inside the fetch, which exercises the
/// controller's panic containment.
#[derive(Debug, Default)]
pub struct ScriptedCatalog {
    rules: Mutex<Vec<Rule>>,
    requests: Mutex<Vec<SearchRequest>>,
}

impl ScriptedCatalog {
    /// Creates a catalog with no scripted answers.
    pub fn new() -> Self {
        Self::default()
    }

    /// Answers `query` (any page when `page` is `None`) immediately.
    pub fn respond(self, query: &str, page: Option<u32>, outcome: CatalogOutcome) -> Self {
        self.respond_after(query, page, Duration::ZERO, outcome)
    }

    /// Answers `query` after `delay`.
    pub fn respond_after(
        self,
        query: &str,
        page: Option<u32>,
        delay: Duration,
        outcome: CatalogOutcome,
    ) -> Self {
        self.push(Rule {
            query: query.to_lowercase(),
            page,
            delay,
            outcome: Some(outcome),
        })
    }

    /// Panics while serving `query`.
    pub fn panic_on(self, query: &str) -> Self {
        self.push(Rule {
            query: query.to_lowercase(),
            page: None,
            delay: Duration::ZERO,
            outcome: None,
        })
    }

    fn push(self, rule: Rule) -> Self {
        lock(&self.rules).push(rule);
        self
    }

    /// Every request received so far, in arrival order.
    pub fn requests(&self) -> Vec<SearchRequest> {
        lock(&self.requests).clone()
    }

    fn find_rule(&self, request: &SearchRequest) -> Option<Rule> {
        let query = request.query.to_lowercase();
        lock(&self.rules)
            .iter()
            .find(|rule| rule.query == query && rule.page.is_none_or(|p| p == request.page))
            .cloned()
    }
}

fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// A full `Found` outcome whose titles encode `label` and the page number.
pub fn page_of(label: &str, page: u32, count: usize, total_count: u32) -> CatalogOutcome {
    let items = (0..count)
        .map(|i| MovieSummary {
            external_id: format!("tt{page:03}{i:04}"),
            title: format!("{label} p{page} #{i}"),
            year: "2005".to_string(),
            poster: Poster::Missing,
            kind: Some(MediaKind::Movie),
        })
        .collect();

    CatalogOutcome::Found { items, total_count }
}

#[async_trait]
impl CatalogProvider for ScriptedCatalog {
    async fn search(&self, request: &SearchRequest) -> CatalogOutcome {
        lock(&self.requests).push(request.clone());

        let Some(rule) = self.find_rule(request) else {
            return CatalogOutcome::not_found(Some("Movie not found!".to_string()));
        };

        if !rule.delay.is_zero() {
            tokio::time::sleep(rule.delay).await;
        }

        match rule.outcome {
            Some(outcome) => outcome,
            None => panic!("scripted catalog panic for '{}'", request.query),
        }
    }

    fn name(&self) -> &'static str {
        "scripted"
    }
}
