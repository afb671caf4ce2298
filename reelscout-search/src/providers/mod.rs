//! Catalog provider implementations.

use std::sync::Arc;

use async_trait::async_trait;
use reelscout_core::{CatalogConfig, RuntimeMode};

use crate::errors::CatalogError;
use crate::types::{CatalogOutcome, SearchRequest};

pub mod demo;
pub mod omdb;
#[cfg(any(test, feature = "test-utils"))]
pub mod scripted;

pub use demo::DemoCatalog;
pub use omdb::OmdbCatalog;
#[cfg(any(test, feature = "test-utils"))]
pub use scripted::ScriptedCatalog;

/// Trait for movie/series catalogs searchable by title.
///
/// Implementations never fail: transport and payload problems are folded into
/// [`CatalogOutcome::Failure`] so callers only deal with three outcomes.
#[async_trait]
pub trait CatalogProvider: Send + Sync + std::fmt::Debug {
    /// Runs one paged search.
    async fn search(&self, request: &SearchRequest) -> CatalogOutcome;

    /// Short provider name for logs.
    fn name(&self) -> &'static str;
}

/// Builds the catalog matching the runtime mode.
///
/// # Errors
///
/// - `CatalogError::InvalidRequest` - Configured endpoint URL does not parse
/// - `CatalogError::Network` - HTTP client could not be constructed
pub fn catalog_for_mode(
    mode: RuntimeMode,
    config: &CatalogConfig,
) -> Result<Arc<dyn CatalogProvider>, CatalogError> {
    match mode {
        RuntimeMode::Production => Ok(Arc::new(OmdbCatalog::new(config)?)),
        RuntimeMode::Development => Ok(Arc::new(DemoCatalog::new())),
    }
}
