//! Response ordering through the controller
//!
//! Every test here runs on paused time so catalog delays decide the order in
//! which fetches resolve, independent of scheduler timing.

use std::sync::Arc;
use std::time::Duration;

use reelscout_core::SearchConfig;
use reelscout_search::providers::ScriptedCatalog;
use reelscout_search::providers::scripted::page_of;
use reelscout_search::{
    CatalogOutcome, Commit, MediaKind, SearchController, SearchFilters, SessionStatus,
};

fn keep_superseded() -> SearchConfig {
    SearchConfig {
        max_year: Some(2024),
        cancel_superseded: false,
        ..Default::default()
    }
}

fn controller(
    catalog: ScriptedCatalog,
    config: &SearchConfig,
) -> (SearchController, Arc<ScriptedCatalog>) {
    let catalog = Arc::new(catalog);
    (SearchController::new(catalog.clone(), config), catalog)
}

#[tokio::test(start_paused = true)]
async fn test_slow_first_query_loses_to_fast_second() {
    let catalog = ScriptedCatalog::new()
        .respond_after(
            "alien",
            None,
            Duration::from_millis(800),
            page_of("alien", 1, 10, 40),
        )
        .respond_after(
            "blade",
            None,
            Duration::from_millis(100),
            page_of("blade", 1, 4, 4),
        );
    let (mut controller, _) = controller(catalog, &keep_superseded());

    controller.submit_query("alien").unwrap();
    controller.submit_query("blade").unwrap();

    assert_eq!(
        controller.next_completion().await,
        Some(Commit::Applied {
            seq: 2,
            status: SessionStatus::Ready
        })
    );
    assert_eq!(controller.next_completion().await, Some(Commit::Stale { seq: 1 }));

    let session = controller.session();
    assert_eq!(session.query(), "blade");
    assert_eq!(session.total_pages(), 1);
    assert_eq!(session.results().len(), 4);
    assert!(session.results().iter().all(|m| m.title.starts_with("blade")));
}

#[tokio::test(start_paused = true)]
async fn test_immediate_page_change_shows_only_requested_page() {
    let catalog = ScriptedCatalog::new()
        .respond_after(
            "batman",
            Some(1),
            Duration::from_millis(300),
            page_of("batman", 1, 10, 95),
        )
        .respond_after(
            "batman",
            Some(2),
            Duration::from_millis(300),
            page_of("batman", 2, 10, 95),
        );
    let (mut controller, catalog) = controller(catalog, &keep_superseded());

    controller.submit_query("batman").unwrap();
    controller.change_page(2).unwrap();
    tokio::time::sleep(Duration::from_secs(1)).await;

    let commits = controller.pump();
    assert_eq!(commits.len(), 2);
    assert!(commits.contains(&Commit::Stale { seq: 1 }));

    let session = controller.session();
    assert_eq!(session.status(), SessionStatus::Ready);
    assert_eq!(session.page(), 2);
    assert_eq!(session.total_pages(), 10);
    assert!(session.results().iter().all(|m| m.title.contains("p2")));
    assert_eq!(catalog.requests().len(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_filter_change_during_load_wins() {
    let catalog = ScriptedCatalog::new().respond_after(
        "batman",
        Some(1),
        Duration::from_millis(200),
        page_of("batman", 1, 10, 12),
    );
    let (mut controller, catalog) = controller(catalog, &SearchConfig::default());

    controller.submit_query("batman").unwrap();
    let filters = SearchFilters::new(Some(MediaKind::Series), Some(2008));
    let seq = controller.change_filters(filters).unwrap();
    let session = controller.settle().await;

    assert_eq!(seq, 2);
    assert_eq!(session.request_seq(), 2);
    assert_eq!(session.status(), SessionStatus::Ready);
    assert_eq!(session.filters(), filters);
    assert_eq!(session.page(), 1);

    let last = catalog.requests().pop().unwrap();
    assert_eq!(last.filters, filters);
    assert_eq!(last.page, 1);
}

#[tokio::test(start_paused = true)]
async fn test_error_then_retry_same_page() {
    let catalog = ScriptedCatalog::new()
        .respond("batman", Some(1), page_of("batman", 1, 10, 95))
        .respond_after(
            "batman",
            Some(3),
            Duration::from_millis(50),
            CatalogOutcome::failure(),
        );
    let (mut controller, _) = controller(catalog, &keep_superseded());

    controller.submit_query("batman").unwrap();
    controller.settle().await;
    controller.change_page(3).unwrap();
    let session = controller.settle().await;

    assert_eq!(session.status(), SessionStatus::Error);
    assert_eq!(session.page(), 3);
    assert_eq!(session.total_pages(), 10);
    assert_eq!(session.error_message(), Some("Error fetching movies. Try again."));

    assert!(controller.change_page(3).is_ok());
    assert_eq!(controller.session().status(), SessionStatus::Loading);
}

#[tokio::test(start_paused = true)]
async fn test_rejected_action_keeps_in_flight_fetch() {
    let catalog = ScriptedCatalog::new().respond_after(
        "batman",
        None,
        Duration::from_millis(100),
        page_of("batman", 1, 10, 95),
    );
    let (mut controller, catalog) = controller(catalog, &keep_superseded());

    controller.submit_query("batman").unwrap();
    assert!(controller.submit_query("   ").is_err());
    assert!(controller.change_page(0).is_err());

    let session = controller.settle().await;
    assert_eq!(session.request_seq(), 1);
    assert_eq!(session.status(), SessionStatus::Ready);
    assert_eq!(catalog.requests().len(), 1);
}
