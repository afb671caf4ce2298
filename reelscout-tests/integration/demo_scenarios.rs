//! User-visible scenarios against the built-in demo catalog

use reelscout_core::{CatalogConfig, RuntimeMode, SearchConfig};
use reelscout_search::{
    ActionRejected, MediaKind, PAGE_SIZE, SearchController, SearchFilters, SessionStatus,
    catalog_for_mode,
};

fn demo_controller() -> SearchController {
    let catalog = catalog_for_mode(RuntimeMode::Development, &CatalogConfig::default()).unwrap();
    SearchController::new(
        catalog,
        &SearchConfig {
            max_year: Some(2024),
            ..Default::default()
        },
    )
}

#[tokio::test]
async fn test_known_title_is_ready() {
    let mut controller = demo_controller();
    controller.submit_query("batman").unwrap();
    let session = controller.settle().await;

    assert_eq!(session.status(), SessionStatus::Ready);
    assert!(!session.results().is_empty());
    assert!(session.results().len() <= PAGE_SIZE as usize);
    assert!(session.total_pages() >= 1);
    assert!(session.error_message().is_none());
}

#[tokio::test]
async fn test_unknown_title_is_empty() {
    let mut controller = demo_controller();
    controller.submit_query("zzzzxnoresults").unwrap();
    let session = controller.settle().await;

    assert_eq!(session.status(), SessionStatus::Empty);
    assert!(session.results().is_empty());
    assert_eq!(session.total_pages(), 1);
    assert!(session.error_message().is_some());
}

#[tokio::test]
async fn test_walk_pages_then_bounds() {
    let mut controller = demo_controller();
    controller.submit_query("batman").unwrap();
    controller.settle().await;
    let total = controller.session().total_pages();

    controller.change_page(total).unwrap();
    let session = controller.settle().await;
    assert_eq!(session.status(), SessionStatus::Ready);
    assert_eq!(session.page(), total);

    assert_eq!(
        controller.change_page(total + 1),
        Err(ActionRejected::PageOutOfRange {
            requested: total + 1,
            total_pages: total
        })
    );
    assert_eq!(controller.session().page(), total);
}

#[tokio::test]
async fn test_filters_narrow_results() {
    let mut controller = demo_controller();
    controller.submit_query("batman").unwrap();
    controller.settle().await;

    controller
        .change_filters(SearchFilters::new(Some(MediaKind::Series), None))
        .unwrap();
    let session = controller.settle().await;

    assert_eq!(session.status(), SessionStatus::Ready);
    assert!(
        session
            .results()
            .iter()
            .all(|m| m.kind == Some(MediaKind::Series))
    );
}

#[tokio::test]
async fn test_future_year_is_clamped() {
    let mut controller = demo_controller();
    controller.submit_query("batman").unwrap();
    controller.settle().await;

    controller
        .change_filters(SearchFilters::new(None, Some(3000)))
        .unwrap();
    controller.settle().await;

    assert_eq!(controller.session().filters().year(), Some(2024));
}
