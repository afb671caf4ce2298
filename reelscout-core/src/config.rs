//! Centralized configuration for Reelscout.
//!
//! All tunable parameters and settings are defined here to avoid
//! hard-coded values scattered throughout the codebase.

use std::time::Duration;

use chrono::Datelike;

use crate::{ReelscoutError, Result};

/// Oldest release year the year filter accepts unless overridden.
pub const DEFAULT_MIN_YEAR: u16 = 1950;

/// Central configuration for all Reelscout components.
///
/// Groups related configuration settings into logical sections.
/// Supports environment variable overrides for runtime customization.
#[derive(Debug, Clone, Default)]
pub struct ReelscoutConfig {
    pub catalog: CatalogConfig,
    pub search: SearchConfig,
}

/// External catalog (OMDb) connection settings.
#[derive(Debug, Clone)]
pub struct CatalogConfig {
    /// Endpoint receiving search requests
    pub base_url: String,
    /// API key sent as `apikey`, omitted when absent
    pub api_key: Option<String>,
    /// Transport timeout for a single search request
    pub request_timeout: Duration,
    /// User agent for HTTP requests
    pub user_agent: &'static str,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            base_url: "https://www.omdbapi.com/".to_string(),
            api_key: None,
            request_timeout: Duration::from_secs(10),
            user_agent: "reelscout/0.1.0",
        }
    }
}

/// Search session behaviour.
#[derive(Debug, Clone)]
pub struct SearchConfig {
    /// Lowest year a filter may carry
    pub min_year: u16,
    /// Highest year a filter may carry (None = current calendar year)
    pub max_year: Option<u16>,
    /// Abort the transport task of a fetch once a newer one starts
    pub cancel_superseded: bool,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            min_year: DEFAULT_MIN_YEAR,
            max_year: None,
            cancel_superseded: true,
        }
    }
}

impl SearchConfig {
    /// Resolves the inclusive year range used to clamp filters.
    pub fn year_bounds(&self) -> YearBounds {
        let max = self.max_year.unwrap_or_else(current_year);
        YearBounds::new(self.min_year, max)
    }
}

/// Inclusive range of release years accepted by the year filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct YearBounds {
    min: u16,
    max: u16,
}

impl YearBounds {
    /// Creates bounds, swapping the ends if given in reverse.
    pub fn new(min: u16, max: u16) -> Self {
        if min <= max {
            Self { min, max }
        } else {
            Self { min: max, max: min }
        }
    }

    pub fn min(&self) -> u16 {
        self.min
    }

    pub fn max(&self) -> u16 {
        self.max
    }

    /// Clamps a year into the bounds.
    pub fn clamp(&self, year: u16) -> u16 {
        year.clamp(self.min, self.max)
    }
}

fn current_year() -> u16 {
    u16::try_from(chrono::Utc::now().year()).unwrap_or(u16::MAX)
}

impl ReelscoutConfig {
    /// Creates configuration with environment variable overrides.
    ///
    /// Allows runtime configuration via environment variables while
    /// maintaining sensible defaults.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        // Catalog configuration overrides
        config.catalog.api_key = std::env::var("REELSCOUT_OMDB_API_KEY")
            .or_else(|_| std::env::var("OMDB_API_KEY"))
            .ok()
            .filter(|key| !key.trim().is_empty());

        if let Ok(url) = std::env::var("REELSCOUT_OMDB_URL") {
            if !url.trim().is_empty() {
                config.catalog.base_url = url;
            }
        }

        if let Ok(timeout) = std::env::var("REELSCOUT_REQUEST_TIMEOUT") {
            if let Ok(seconds) = timeout.parse::<u64>() {
                config.catalog.request_timeout = Duration::from_secs(seconds);
            }
        }

        // Search configuration overrides
        if let Ok(min_year) = std::env::var("REELSCOUT_MIN_YEAR") {
            if let Ok(year) = min_year.parse::<u16>() {
                config.search.min_year = year;
            }
        }

        if let Ok(cancel) = std::env::var("REELSCOUT_CANCEL_SUPERSEDED") {
            if let Ok(enabled) = cancel.parse::<bool>() {
                config.search.cancel_superseded = enabled;
            }
        }

        config
    }

    /// Creates a configuration optimized for testing.
    pub fn for_testing() -> Self {
        Self {
            catalog: CatalogConfig {
                base_url: "http://127.0.0.1:9/".to_string(),
                api_key: None,
                request_timeout: Duration::from_secs(2),
                ..Default::default()
            },
            search: SearchConfig {
                max_year: Some(2024),
                ..Default::default()
            },
        }
    }

    /// Checks cross-field consistency.
    ///
    /// # Errors
    ///
    /// - `ReelscoutError::Configuration` - Base URL empty or year range inverted
    pub fn validate(&self) -> Result<()> {
        if self.catalog.base_url.trim().is_empty() {
            return Err(ReelscoutError::Configuration {
                reason: "catalog base URL is empty".to_string(),
            });
        }

        let max_year = self.search.max_year.unwrap_or_else(current_year);
        if max_year < self.search.min_year {
            return Err(ReelscoutError::Configuration {
                reason: format!(
                    "max_year {max_year} is before min_year {}",
                    self.search.min_year
                ),
            });
        }

        Ok(())
    }
}
