//! Offline demo catalog for development.

use async_trait::async_trait;

use super::CatalogProvider;
use crate::pagination::PAGE_SIZE;
use crate::types::{CatalogOutcome, MediaKind, MovieSummary, Poster, SearchRequest};

/// (imdb id, title, year, kind, has poster)
const DEMO_TITLES: &[(&str, &str, &str, MediaKind, bool)] = &[
    ("tt0096895", "Batman", "1989", MediaKind::Movie, true),
    ("tt0103776", "Batman Returns", "1992", MediaKind::Movie, true),
    ("tt0112462", "Batman Forever", "1995", MediaKind::Movie, true),
    ("tt0118688", "Batman & Robin", "1997", MediaKind::Movie, true),
    ("tt0372784", "Batman Begins", "2005", MediaKind::Movie, true),
    ("tt2975590", "Batman v Superman: Dawn of Justice", "2016", MediaKind::Movie, true),
    ("tt1877830", "The Batman", "2022", MediaKind::Movie, true),
    ("tt4116284", "The Lego Batman Movie", "2017", MediaKind::Movie, true),
    ("tt0106364", "Batman: Mask of the Phantasm", "1993", MediaKind::Movie, false),
    ("tt4853102", "Batman: The Killing Joke", "2016", MediaKind::Movie, true),
    ("tt1569923", "Batman: Under the Red Hood", "2010", MediaKind::Movie, true),
    ("tt1672723", "Batman: Year One", "2011", MediaKind::Movie, false),
    ("tt2313197", "Batman: The Dark Knight Returns, Part 1", "2012", MediaKind::Movie, true),
    ("tt0059968", "Batman", "1966–1968", MediaKind::Series, false),
    ("tt0103359", "Batman: The Animated Series", "1992–1995", MediaKind::Series, true),
    ("tt0147746", "Batman Beyond", "1999–2001", MediaKind::Series, false),
    ("tt0468569", "The Dark Knight", "2008", MediaKind::Movie, true),
    ("tt0133093", "The Matrix", "1999", MediaKind::Movie, true),
    ("tt0234215", "The Matrix Reloaded", "2003", MediaKind::Movie, true),
    ("tt1375666", "Inception", "2010", MediaKind::Movie, true),
    ("tt0816692", "Interstellar", "2014", MediaKind::Movie, true),
    ("tt0903747", "Breaking Bad", "2008–2013", MediaKind::Series, true),
    ("tt1475582", "Sherlock", "2010–2017", MediaKind::Series, false),
];

/// In-memory catalog answering like OMDb without network access.
///
/// Matches titles case-insensitively by substring, honors type and year
/// filters and pages results by [`PAGE_SIZE`].
#[derive(Debug, Default)]
pub struct DemoCatalog;

impl DemoCatalog {
    /// Creates a demo catalog that answers immediately.
    pub fn new() -> Self {
        Self
    }

    fn matches(request: &SearchRequest) -> Vec<MovieSummary> {
        let needle = request.query.to_lowercase();

        DEMO_TITLES
            .iter()
            .filter(|(_, title, _, _, _)| title.to_lowercase().contains(&needle))
            .filter(|(_, _, _, kind, _)| request.filters.kind().is_none_or(|k| k == *kind))
            .filter(|(_, _, year, _, _)| {
                request
                    .filters
                    .year()
                    .is_none_or(|y| year.starts_with(&y.to_string()))
            })
            .map(|(id, title, year, kind, has_poster)| MovieSummary {
                external_id: (*id).to_string(),
                title: (*title).to_string(),
                year: (*year).to_string(),
                poster: if *has_poster {
                    Poster::Url(format!("https://posters.reelscout.invalid/{id}.jpg"))
                } else {
                    Poster::Missing
                },
                kind: Some(*kind),
            })
            .collect()
    }
}

#[async_trait]
impl CatalogProvider for DemoCatalog {
    async fn search(&self, request: &SearchRequest) -> CatalogOutcome {
        let all = Self::matches(request);
        let total_count = u32::try_from(all.len()).unwrap_or(u32::MAX);
        let skip = request.page.saturating_sub(1).saturating_mul(PAGE_SIZE) as usize;
        let items: Vec<MovieSummary> = all.into_iter().skip(skip).take(PAGE_SIZE as usize).collect();

        if items.is_empty() {
            // OMDb answers out-of-range pages the same way as a miss.
            return CatalogOutcome::not_found(Some("Movie not found!".to_string()));
        }

        CatalogOutcome::Found { items, total_count }
    }

    fn name(&self) -> &'static str {
        "demo"
    }
}
