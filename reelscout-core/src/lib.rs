//! Reelscout Core - Shared configuration and runtime plumbing
//!
//! This crate holds the pieces every Reelscout binary needs regardless of
//! which catalog backend is active: layered configuration, runtime mode
//! selection and tracing initialization.

pub mod config;
pub mod mode;
pub mod tracing_setup;

// Re-export main types for convenient access
pub use config::{CatalogConfig, ReelscoutConfig, SearchConfig, YearBounds};
pub use mode::RuntimeMode;

/// Core errors that can bubble up from Reelscout setup code.
#[derive(Debug, thiserror::Error)]
pub enum ReelscoutError {
    #[error("Configuration error: {reason}")]
    Configuration { reason: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Logging setup failed: {reason}")]
    Logging { reason: String },
}

impl ReelscoutError {
    /// Returns a user-friendly error message suitable for display.
    pub fn user_message(&self) -> String {
        match self {
            ReelscoutError::Configuration { reason } => format!("Invalid configuration: {reason}"),
            ReelscoutError::Io(_) => "File system error occurred".to_string(),
            ReelscoutError::Logging { .. } => "Could not initialize logging".to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ReelscoutError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_messages() {
        let err = ReelscoutError::Configuration {
            reason: "min_year after max_year".to_string(),
        };
        assert_eq!(
            err.user_message(),
            "Invalid configuration: min_year after max_year"
        );

        let io = ReelscoutError::from(std::io::Error::other("disk full"));
        assert_eq!(io.user_message(), "File system error occurred");
    }
}
