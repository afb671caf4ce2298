//! Data types for catalog search.

use std::fmt;

use reelscout_core::YearBounds;
use serde::{Deserialize, Serialize, Serializer};

use crate::errors::CatalogError;

/// Message shown when the catalog matched nothing and supplied no reason.
pub const NOT_FOUND_FALLBACK: &str = "No movies found.";

/// Message shown for any transport or payload failure.
pub const FAILURE_MESSAGE: &str = "Error fetching movies. Try again.";

/// Catalog item type a search can be restricted to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    /// Feature films
    Movie,
    /// TV series
    Series,
}

impl MediaKind {
    /// Value sent as the catalog's `type` parameter.
    pub fn as_param(self) -> &'static str {
        match self {
            MediaKind::Movie => "movie",
            MediaKind::Series => "series",
        }
    }

    /// Maps a catalog `Type` field, ignoring kinds we cannot filter on.
    pub fn from_catalog(raw: &str) -> Option<Self> {
        match raw.trim().to_lowercase().as_str() {
            "movie" => Some(MediaKind::Movie),
            "series" => Some(MediaKind::Series),
            _ => None,
        }
    }
}

impl fmt::Display for MediaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_param())
    }
}

impl std::str::FromStr for MediaKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_catalog(s)
            .ok_or_else(|| format!("Invalid media type: '{s}'. Valid options are: movie, series"))
    }
}

/// Applied search constraints. Empty fields mean "unconstrained".
///
/// Value object: changing a filter produces a new instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct SearchFilters {
    kind: Option<MediaKind>,
    year: Option<u16>,
}

impl SearchFilters {
    /// Creates filters from optional type and year constraints.
    pub fn new(kind: Option<MediaKind>, year: Option<u16>) -> Self {
        Self { kind, year }
    }

    /// Filters with no constraint at all.
    pub fn any() -> Self {
        Self::default()
    }

    /// Type constraint, if any.
    pub fn kind(&self) -> Option<MediaKind> {
        self.kind
    }

    /// Year constraint, if any.
    pub fn year(&self) -> Option<u16> {
        self.year
    }

    /// Copy with the type constraint replaced.
    pub fn with_kind(self, kind: Option<MediaKind>) -> Self {
        Self { kind, ..self }
    }

    /// Copy with the year constraint replaced.
    pub fn with_year(self, year: Option<u16>) -> Self {
        Self { year, ..self }
    }

    /// True when neither type nor year is set.
    pub fn is_unconstrained(&self) -> bool {
        self.kind.is_none() && self.year.is_none()
    }

    /// Copy with the year pulled into `bounds`.
    pub fn clamped(self, bounds: YearBounds) -> Self {
        Self {
            year: self.year.map(|year| bounds.clamp(year)),
            ..self
        }
    }
}

impl fmt::Display for SearchFilters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = self.kind.map_or("any type", MediaKind::as_param);
        match self.year {
            Some(year) => write!(f, "{kind}, {year}"),
            None => write!(f, "{kind}, any year"),
        }
    }
}

/// Poster artwork reference for a catalog item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Poster {
    /// Remote image URL
    Url(String),
    /// Catalog has no artwork; render a placeholder
    Missing,
}

impl Poster {
    /// Rendering of [`Poster::Missing`].
    pub const NO_IMAGE: &'static str = "no-image";

    /// Maps the catalog's poster field, where `"N/A"` means no artwork.
    pub fn from_catalog(raw: Option<String>) -> Self {
        match raw {
            Some(url) if !url.trim().is_empty() && url.trim() != "N/A" => Poster::Url(url),
            _ => Poster::Missing,
        }
    }

    /// Image URL when artwork exists.
    pub fn url(&self) -> Option<&str> {
        match self {
            Poster::Url(url) => Some(url),
            Poster::Missing => None,
        }
    }
}

impl fmt::Display for Poster {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Poster::Url(url) => f.write_str(url),
            Poster::Missing => f.write_str(Self::NO_IMAGE),
        }
    }
}

impl Serialize for Poster {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// One catalog hit as shown in a result page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MovieSummary {
    /// Catalog identifier (IMDb id), unique within a result page
    pub external_id: String,
    /// Display title
    pub title: String,
    /// Release year as reported, e.g. `"1999"` or `"2008–2013"`
    pub year: String,
    /// Poster artwork
    pub poster: Poster,
    /// Item type when it is one we know how to filter on
    pub kind: Option<MediaKind>,
}

impl MovieSummary {
    /// Public detail page for this title.
    pub fn detail_url(&self) -> String {
        format!("https://www.imdb.com/title/{}", self.external_id)
    }
}

/// Parameters of a single paged catalog search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    /// Trimmed, non-empty search text
    pub query: String,
    /// 1-based page number
    pub page: u32,
    /// Applied constraints
    pub filters: SearchFilters,
}

/// Normalized result of one catalog search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogOutcome {
    /// The catalog matched items.
    Found {
        /// Items of the requested page, in catalog order
        items: Vec<MovieSummary>,
        /// Total number of matches across all pages
        total_count: u32,
    },
    /// The query ran but matched nothing (or the catalog rejected it).
    NotFound {
        /// Catalog-supplied reason or [`NOT_FOUND_FALLBACK`]
        message: String,
    },
    /// Transport or payload failure.
    Failure {
        /// User-facing message
        message: String,
    },
}

impl CatalogOutcome {
    /// Not-found outcome, falling back to the generic message.
    pub fn not_found(message: Option<String>) -> Self {
        let message = message
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| NOT_FOUND_FALLBACK.to_string());
        CatalogOutcome::NotFound { message }
    }

    /// Failure outcome with the generic user-facing message.
    pub fn failure() -> Self {
        CatalogOutcome::Failure {
            message: FAILURE_MESSAGE.to_string(),
        }
    }
}

impl From<CatalogError> for CatalogOutcome {
    fn from(_: CatalogError) -> Self {
        CatalogOutcome::failure()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_media_kind_parsing() {
        assert_eq!("movie".parse::<MediaKind>(), Ok(MediaKind::Movie));
        assert_eq!("Series".parse::<MediaKind>(), Ok(MediaKind::Series));
        assert!("episode".parse::<MediaKind>().is_err());
        assert_eq!(MediaKind::from_catalog("game"), None);
    }

    #[test]
    fn test_filters_replace_fields() {
        let filters = SearchFilters::any();
        assert!(filters.is_unconstrained());

        let narrowed = filters.with_kind(Some(MediaKind::Series)).with_year(Some(2008));
        assert_eq!(narrowed.kind(), Some(MediaKind::Series));
        assert_eq!(narrowed.year(), Some(2008));
        assert!(filters.is_unconstrained());
        assert_eq!(narrowed.to_string(), "series, 2008");
    }

    #[test]
    fn test_filters_clamp_year() {
        let bounds = YearBounds::new(1950, 2024);

        let early = SearchFilters::new(None, Some(1920)).clamped(bounds);
        assert_eq!(early.year(), Some(1950));

        let late = SearchFilters::new(Some(MediaKind::Movie), Some(2100)).clamped(bounds);
        assert_eq!(late.year(), Some(2024));
        assert_eq!(late.kind(), Some(MediaKind::Movie));

        assert_eq!(SearchFilters::any().clamped(bounds).year(), None);
    }

    #[test]
    fn test_poster_sentinel() {
        assert_eq!(Poster::from_catalog(Some("N/A".to_string())), Poster::Missing);
        assert_eq!(Poster::from_catalog(None), Poster::Missing);

        let poster = Poster::from_catalog(Some("https://img/1.jpg".to_string()));
        assert_eq!(poster.url(), Some("https://img/1.jpg"));
        assert_eq!(Poster::Missing.to_string(), "no-image");
        assert_eq!(
            serde_json::to_string(&Poster::Missing).unwrap(),
            "\"no-image\""
        );
    }

    #[test]
    fn test_detail_url() {
        let movie = MovieSummary {
            external_id: "tt0372784".to_string(),
            title: "Batman Begins".to_string(),
            year: "2005".to_string(),
            poster: Poster::Missing,
            kind: Some(MediaKind::Movie),
        };
        assert_eq!(movie.detail_url(), "https://www.imdb.com/title/tt0372784");
    }

    #[test]
    fn test_not_found_fallback() {
        assert_eq!(
            CatalogOutcome::not_found(None),
            CatalogOutcome::NotFound {
                message: NOT_FOUND_FALLBACK.to_string()
            }
        );
        assert_eq!(
            CatalogOutcome::not_found(Some("Too many results.".to_string())),
            CatalogOutcome::NotFound {
                message: "Too many results.".to_string()
            }
        );
    }
}
