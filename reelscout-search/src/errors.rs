//! Error types for catalog search.

use thiserror::Error;

/// Errors a catalog provider can hit while executing one search request.
///
/// These never reach the session directly: the provider normalizes them into
/// a failure outcome and the detailed reason is only logged.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// Network communication failed before a reply arrived.
    #[error("Network error: {reason}")]
    Network {
        /// The reason for the network error
        reason: String,
    },

    /// The catalog answered with a non-success HTTP status.
    #[error("Catalog returned HTTP status {status}")]
    HttpStatus {
        /// HTTP status code of the reply
        status: u16,
    },

    /// Reply body was not a well-formed search payload.
    #[error("Parse error: {reason}")]
    Parse {
        /// The reason for the parse error
        reason: String,
    },

    /// The request could not be built (bad endpoint URL and similar).
    #[error("Invalid request: {reason}")]
    InvalidRequest {
        /// The reason the request is invalid
        reason: String,
    },
}

/// Why a session action was refused.
///
/// A refused action leaves the session untouched. The presentation layer
/// decides whether to show a notice.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ActionRejected {
    /// Submitted text was empty after trimming.
    #[error("Enter a title to search for")]
    EmptyQuery,

    /// Filters or page changed before any query was submitted.
    #[error("Submit a search before changing filters or pages")]
    NoActiveQuery,

    /// Requested page lies outside the known page range.
    #[error("Page {requested} is outside the available range 1..={total_pages}")]
    PageOutOfRange {
        /// Page the caller asked for
        requested: u32,
        /// Page count known for the current search
        total_pages: u32,
    },
}
