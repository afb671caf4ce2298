//! Reelscout Search - Paged title search against a movie/series catalog

#![warn(missing_docs)]
#![deny(clippy::missing_errors_doc)]
#![deny(clippy::missing_panics_doc)]
#![warn(clippy::too_many_lines)]
//!
//! A [`SearchController`] owns the state of one search interaction (query,
//! filters, page, results, status) and drives a [`CatalogProvider`] in
//! response to user actions, committing only the newest response.

pub mod controller;
pub mod errors;
pub mod pagination;
pub mod providers;
pub mod session;
pub mod types;

// Re-export main types
pub use controller::{FetchCompletion, SearchController};
pub use errors::{ActionRejected, CatalogError};
pub use pagination::{PAGE_SIZE, total_pages};
pub use providers::{CatalogProvider, DemoCatalog, OmdbCatalog, catalog_for_mode};
pub use session::{Commit, SearchSession, SessionStatus, SessionView};
pub use types::{CatalogOutcome, MediaKind, MovieSummary, Poster, SearchFilters, SearchRequest};

/// Convenience type alias for Results with CatalogError.
pub type Result<T> = std::result::Result<T, CatalogError>;
