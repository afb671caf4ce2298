//! Title search against the OMDb API.

use async_trait::async_trait;
use reelscout_core::CatalogConfig;
use serde::Deserialize;
use url::Url;

use super::CatalogProvider;
use crate::errors::CatalogError;
use crate::types::{CatalogOutcome, MediaKind, MovieSummary, Poster, SearchRequest};

/// OMDb-backed catalog.
#[derive(Debug, Clone)]
pub struct OmdbCatalog {
    client: reqwest::Client,
    base_url: Url,
    api_key: Option<String>,
}

/// Reply of the OMDb `?s=` search endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct OmdbSearchResponse {
    /// `"True"` when something matched
    #[serde(rename = "Response")]
    pub response: String,
    /// Items of the requested page
    #[serde(rename = "Search")]
    pub search: Option<Vec<OmdbSearchItem>>,
    /// Total match count as a decimal string
    #[serde(rename = "totalResults")]
    pub total_results: Option<String>,
    /// Reason when nothing matched
    #[serde(rename = "Error")]
    pub error: Option<String>,
}

/// One entry of [`OmdbSearchResponse::search`].
#[derive(Debug, Clone, Deserialize)]
pub struct OmdbSearchItem {
    /// Title of the media item
    #[serde(rename = "Title")]
    pub title: String,
    /// Release year or year range
    #[serde(rename = "Year")]
    pub year: String,
    /// IMDb identifier
    #[serde(rename = "imdbID")]
    pub imdb_id: String,
    /// Media type (movie, series, episode, game)
    #[serde(rename = "Type")]
    pub media_type: Option<String>,
    /// URL to poster image or `"N/A"`
    #[serde(rename = "Poster")]
    pub poster: Option<String>,
}

impl OmdbCatalog {
    /// Creates an OMDb catalog from connection settings.
    ///
    /// # Errors
    ///
    /// - `CatalogError::InvalidRequest` - `base_url` does not parse
    /// - `CatalogError::Network` - HTTP client could not be constructed
    pub fn new(config: &CatalogConfig) -> Result<Self, CatalogError> {
        let base_url =
            Url::parse(&config.base_url).map_err(|e| CatalogError::InvalidRequest {
                reason: format!("bad catalog URL '{}': {e}", config.base_url),
            })?;

        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .user_agent(config.user_agent)
            .build()
            .map_err(|e| CatalogError::Network {
                reason: format!("HTTP client setup failed: {e}"),
            })?;

        Ok(Self {
            client,
            base_url,
            api_key: config.api_key.clone(),
        })
    }

    /// Full request URL for a search, optional constraints only when set.
    pub fn request_url(&self, request: &SearchRequest) -> Url {
        let mut url = self.base_url.clone();
        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("s", &request.query);
            pairs.append_pair("page", &request.page.to_string());
            if let Some(ref api_key) = self.api_key {
                pairs.append_pair("apikey", api_key);
            }
            if let Some(kind) = request.filters.kind() {
                pairs.append_pair("type", kind.as_param());
            }
            if let Some(year) = request.filters.year() {
                pairs.append_pair("y", &year.to_string());
            }
        }
        url
    }

    /// Performs the HTTP call and interprets the reply.
    ///
    /// # Errors
    ///
    /// - `CatalogError::Network` - Request could not be sent or body not read
    /// - `CatalogError::HttpStatus` - Non-2xx reply
    /// - `CatalogError::Parse` - Body is not a search payload
    pub async fn try_search(&self, request: &SearchRequest) -> Result<CatalogOutcome, CatalogError> {
        let url = self.request_url(request);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| CatalogError::Network {
                reason: format!("HTTP request failed: {e}"),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(CatalogError::HttpStatus {
                status: status.as_u16(),
            });
        }

        let body = response.bytes().await.map_err(|e| CatalogError::Network {
            reason: format!("reading body failed: {e}"),
        })?;

        let payload: OmdbSearchResponse =
            serde_json::from_slice(&body).map_err(|e| CatalogError::Parse {
                reason: format!("JSON parsing failed: {e}"),
            })?;

        interpret_response(payload)
    }
}

/// Maps a decoded OMDb reply onto a catalog outcome.
///
/// # Errors
///
/// - `CatalogError::Parse` - Positive reply without items or count, or unknown flag
pub fn interpret_response(payload: OmdbSearchResponse) -> Result<CatalogOutcome, CatalogError> {
    match payload.response.as_str() {
        "True" => {
            let items = payload.search.ok_or_else(|| CatalogError::Parse {
                reason: "positive reply without Search list".to_string(),
            })?;
            let total_count = payload
                .total_results
                .as_deref()
                .and_then(|raw| raw.trim().parse::<u32>().ok())
                .ok_or_else(|| CatalogError::Parse {
                    reason: format!("bad totalResults: {:?}", payload.total_results),
                })?;

            if items.is_empty() {
                return Ok(CatalogOutcome::not_found(None));
            }

            Ok(CatalogOutcome::Found {
                items: items.into_iter().map(summarize).collect(),
                total_count,
            })
        }
        "False" => Ok(CatalogOutcome::not_found(payload.error)),
        other => Err(CatalogError::Parse {
            reason: format!("unexpected Response flag '{other}'"),
        }),
    }
}

fn summarize(item: OmdbSearchItem) -> MovieSummary {
    MovieSummary {
        external_id: item.imdb_id,
        title: item.title,
        year: item.year,
        poster: Poster::from_catalog(item.poster),
        kind: item.media_type.as_deref().and_then(MediaKind::from_catalog),
    }
}

#[async_trait]
impl CatalogProvider for OmdbCatalog {
    async fn search(&self, request: &SearchRequest) -> CatalogOutcome {
        match self.try_search(request).await {
            Ok(outcome) => outcome,
            Err(e) => {
                tracing::warn!(
                    query = %request.query,
                    page = request.page,
                    error = %e,
                    "OMDb search failed"
                );
                CatalogOutcome::from(e)
            }
        }
    }

    fn name(&self) -> &'static str {
        "omdb"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{FAILURE_MESSAGE, NOT_FOUND_FALLBACK, SearchFilters};

    fn parse(json: &str) -> Result<CatalogOutcome, CatalogError> {
        interpret_response(serde_json::from_str(json).unwrap())
    }

    fn request(filters: SearchFilters) -> SearchRequest {
        SearchRequest {
            query: "the dark knight".to_string(),
            page: 2,
            filters,
        }
    }

    #[test]
    fn test_request_url_without_optional_params() {
        let catalog = OmdbCatalog::new(&CatalogConfig::default()).unwrap();
        let url = catalog.request_url(&request(SearchFilters::any()));

        let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        assert_eq!(
            pairs,
            vec![
                ("s".to_string(), "the dark knight".to_string()),
                ("page".to_string(), "2".to_string()),
            ]
        );
        assert_eq!(url.host_str(), Some("www.omdbapi.com"));
    }

    #[test]
    fn test_request_url_with_key_and_filters() {
        let config = CatalogConfig {
            api_key: Some("k3y".to_string()),
            ..Default::default()
        };
        let catalog = OmdbCatalog::new(&config).unwrap();
        let filters = SearchFilters::new(Some(MediaKind::Series), Some(2008));

        let url = catalog.request_url(&request(filters));

        let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        assert!(pairs.contains(&("apikey".to_string(), "k3y".to_string())));
        assert!(pairs.contains(&("type".to_string(), "series".to_string())));
        assert!(pairs.contains(&("y".to_string(), "2008".to_string())));
    }

    #[test]
    fn test_positive_reply() {
        let outcome = parse(
            r#"{
                "Search": [
                    {"Title": "Batman Begins", "Year": "2005", "imdbID": "tt0372784",
                     "Type": "movie", "Poster": "https://m.media-amazon.com/bb.jpg"},
                    {"Title": "Batman: The Animated Series", "Year": "1992–1995",
                     "imdbID": "tt0103359", "Type": "series", "Poster": "N/A"},
                    {"Title": "Batman: Arkham City", "Year": "2011",
                     "imdbID": "tt1568322", "Type": "game", "Poster": "N/A"}
                ],
                "totalResults": "587",
                "Response": "True"
            }"#,
        )
        .unwrap();

        let (items, total_count) = match outcome {
            CatalogOutcome::Found { items, total_count } => (items, total_count),
            other => panic!("expected Found, got {other:?}"),
        };
        assert_eq!(total_count, 587);
        assert_eq!(items.len(), 3);
        assert_eq!(items[0].external_id, "tt0372784");
        assert_eq!(items[0].poster.url(), Some("https://m.media-amazon.com/bb.jpg"));
        assert_eq!(items[1].poster, Poster::Missing);
        assert_eq!(items[1].kind, Some(MediaKind::Series));
        assert_eq!(items[2].kind, None);
    }

    #[test]
    fn test_negative_reply_uses_catalog_message() {
        let outcome = parse(r#"{"Response": "False", "Error": "Movie not found!"}"#).unwrap();
        assert_eq!(
            outcome,
            CatalogOutcome::NotFound {
                message: "Movie not found!".to_string()
            }
        );

        let outcome = parse(r#"{"Response": "False"}"#).unwrap();
        assert_eq!(
            outcome,
            CatalogOutcome::NotFound {
                message: NOT_FOUND_FALLBACK.to_string()
            }
        );
    }

    #[test]
    fn test_positive_reply_with_empty_list_is_not_found() {
        let outcome = parse(r#"{"Response": "True", "Search": [], "totalResults": "0"}"#).unwrap();
        assert!(matches!(outcome, CatalogOutcome::NotFound { .. }));
    }

    #[test]
    fn test_malformed_positive_reply() {
        assert!(matches!(
            parse(r#"{"Response": "True", "totalResults": "12"}"#),
            Err(CatalogError::Parse { .. })
        ));
        assert!(matches!(
            parse(r#"{"Response": "True", "Search": [], "totalResults": "many"}"#),
            Err(CatalogError::Parse { .. })
        ));
        assert!(matches!(
            parse(r#"{"Response": "Maybe"}"#),
            Err(CatalogError::Parse { .. })
        ));
    }

    #[tokio::test]
    async fn test_unreachable_catalog_is_failure() {
        let config = CatalogConfig {
            base_url: "http://127.0.0.1:9/".to_string(),
            request_timeout: std::time::Duration::from_secs(2),
            ..Default::default()
        };
        let catalog = OmdbCatalog::new(&config).unwrap();

        let outcome = catalog.search(&request(SearchFilters::any())).await;

        assert_eq!(
            outcome,
            CatalogOutcome::Failure {
                message: FAILURE_MESSAGE.to_string()
            }
        );
    }
}
