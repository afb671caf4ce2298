//! OMDb wire contract against a local HTTP stub
//!
//! The stub answers by search text: a hit, a miss, a server error and a
//! malformed body. Every query string it receives is recorded.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::Router;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use reelscout_core::{CatalogConfig, SearchConfig};
use reelscout_search::{
    CatalogOutcome, CatalogProvider, MediaKind, OmdbCatalog, Poster, SearchController,
    SearchFilters, SearchRequest, SessionStatus,
};
use serde_json::json;

type Seen = Arc<Mutex<Vec<HashMap<String, String>>>>;

async fn omdb_stub(
    State(seen): State<Seen>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    let text = params.get("s").cloned().unwrap_or_default();
    seen.lock().unwrap().push(params);

    match text.as_str() {
        "batman" => axum::Json(json!({
            "Search": [
                {
                    "Title": "Batman Begins",
                    "Year": "2005",
                    "imdbID": "tt0372784",
                    "Type": "movie",
                    "Poster": "https://m.media-amazon.com/images/M/begins.jpg"
                },
                {
                    "Title": "Batman: The Animated Series",
                    "Year": "1992–1995",
                    "imdbID": "tt0103359",
                    "Type": "series",
                    "Poster": "N/A"
                }
            ],
            "totalResults": "25",
            "Response": "True"
        }))
        .into_response(),
        "boom" => (StatusCode::INTERNAL_SERVER_ERROR, "upstream exploded").into_response(),
        "garbled" => "<html>definitely not json</html>".into_response(),
        _ => axum::Json(json!({
            "Response": "False",
            "Error": "Movie not found!"
        }))
        .into_response(),
    }
}

async fn spawn_stub() -> (CatalogConfig, Seen) {
    let seen = Seen::default();
    let app = Router::new()
        .route("/", get(omdb_stub))
        .with_state(seen.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    let config = CatalogConfig {
        base_url: format!("http://{addr}/"),
        api_key: Some("test-key".to_string()),
        request_timeout: Duration::from_secs(5),
        ..Default::default()
    };
    (config, seen)
}

fn request(query: &str, page: u32, filters: SearchFilters) -> SearchRequest {
    SearchRequest {
        query: query.to_string(),
        page,
        filters,
    }
}

#[tokio::test]
async fn test_hit_maps_items_and_count() {
    let (config, _) = spawn_stub().await;
    let catalog = OmdbCatalog::new(&config).unwrap();

    let outcome = catalog.search(&request("batman", 1, SearchFilters::any())).await;

    let CatalogOutcome::Found { items, total_count } = outcome else {
        panic!("expected Found");
    };
    assert_eq!(total_count, 25);
    assert_eq!(items.len(), 2);
    assert_eq!(items[0].external_id, "tt0372784");
    assert_eq!(items[0].kind, Some(MediaKind::Movie));
    assert!(matches!(items[0].poster, Poster::Url(_)));
    assert_eq!(items[1].year, "1992–1995");
    assert_eq!(items[1].kind, Some(MediaKind::Series));
    assert_eq!(items[1].poster, Poster::Missing);
}

#[tokio::test]
async fn test_miss_carries_catalog_message() {
    let (config, _) = spawn_stub().await;
    let catalog = OmdbCatalog::new(&config).unwrap();

    let outcome = catalog
        .search(&request("zzzzxnoresults", 1, SearchFilters::any()))
        .await;

    assert_eq!(
        outcome,
        CatalogOutcome::NotFound {
            message: "Movie not found!".to_string()
        }
    );
}

#[tokio::test]
async fn test_server_error_and_garbage_are_failures() {
    let (config, _) = spawn_stub().await;
    let catalog = OmdbCatalog::new(&config).unwrap();

    let status = catalog.search(&request("boom", 1, SearchFilters::any())).await;
    assert_eq!(status, CatalogOutcome::failure());

    let garbled = catalog
        .search(&request("garbled", 1, SearchFilters::any()))
        .await;
    assert_eq!(garbled, CatalogOutcome::failure());
}

#[tokio::test]
async fn test_parameters_are_forwarded() {
    let (config, seen) = spawn_stub().await;
    let catalog = OmdbCatalog::new(&config).unwrap();

    catalog
        .search(&request("the dark knight", 3, SearchFilters::any()))
        .await;
    catalog
        .search(&request(
            "batman",
            2,
            SearchFilters::new(Some(MediaKind::Series), Some(1992)),
        ))
        .await;

    let seen = seen.lock().unwrap().clone();
    assert_eq!(seen.len(), 2);

    let plain = &seen[0];
    assert_eq!(plain["s"], "the dark knight");
    assert_eq!(plain["page"], "3");
    assert_eq!(plain["apikey"], "test-key");
    assert!(!plain.contains_key("type"));
    assert!(!plain.contains_key("y"));

    let filtered = &seen[1];
    assert_eq!(filtered["type"], "series");
    assert_eq!(filtered["y"], "1992");
    assert_eq!(filtered["page"], "2");
}

#[tokio::test]
async fn test_controller_over_http() {
    let (config, _) = spawn_stub().await;
    let catalog = Arc::new(OmdbCatalog::new(&config).unwrap());
    let mut controller = SearchController::new(catalog, &SearchConfig::default());

    controller.submit_query("batman").unwrap();
    let session = controller.settle().await;
    assert_eq!(session.status(), SessionStatus::Ready);
    assert_eq!(session.total_pages(), 3);
    assert_eq!(session.results().len(), 2);

    controller.submit_query("boom").unwrap();
    let session = controller.settle().await;
    assert_eq!(session.status(), SessionStatus::Error);
    assert_eq!(session.error_message(), Some("Error fetching movies. Try again."));
    assert!(session.results().is_empty());
}
