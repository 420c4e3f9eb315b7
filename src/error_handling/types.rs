//! Error type definitions.
//!
//! This module defines all error types used throughout the application.

use log::SetLoggerError;
use reqwest::Error as ReqwestError;
use thiserror::Error;

use crate::geolocation::ProviderKind;

/// Error types for initialization failures.
#[derive(Error, Debug)]
#[allow(clippy::enum_variant_names)] // All variants end with "Error" by convention
pub enum InitializationError {
    /// Error initializing the logger.
    #[error("Logger initialization error: {0}")]
    LoggerError(#[from] SetLoggerError),

    /// Error initializing the HTTP client.
    #[error("HTTP client initialization error: {0}")]
    HttpClientError(#[from] ReqwestError),
}

/// Error types for database operations.
#[derive(Error, Debug)]
pub enum DatabaseError {
    /// Error creating the database file.
    #[error("Database file creation error: {0}")]
    FileCreationError(String),

    /// SQL execution error.
    #[error("SQL error: {0}")]
    SqlError(#[from] sqlx::Error),

    /// A stored row could not be mapped back into a domain value.
    #[error("Corrupt row in {table}: {reason}")]
    CorruptRow {
        /// Table the row was read from
        table: &'static str,
        /// What could not be decoded
        reason: String,
    },
}

/// Error types for the location job queue.
#[derive(Error, Debug)]
pub enum QueueError {
    /// The job store rejected a read or write.
    #[error("Job store error: {0}")]
    Store(#[from] sqlx::Error),
}

/// Failure of a single geolocation provider.
///
/// Recovered by the resolver as a fallback to the next provider in the chain;
/// never surfaced past it. Configuration problems of the paid provider (missing
/// key, private address) are reported through the same type.
#[derive(Error, Debug)]
pub enum ProviderError {
    /// Transport-level failure (connect, timeout, body decode).
    #[error("{provider} request failed: {source}")]
    Http {
        /// Provider that failed
        provider: ProviderKind,
        /// Underlying client error
        #[source]
        source: ReqwestError,
    },

    /// The provider answered with a non-success HTTP status.
    #[error("{provider} returned HTTP {status}")]
    Status {
        /// Provider that failed
        provider: ProviderKind,
        /// HTTP status code
        status: u16,
    },

    /// The provider answered 2xx but flagged an error in its payload.
    #[error("{provider} reported an error: {message}")]
    Api {
        /// Provider that failed
        provider: ProviderKind,
        /// Provider-supplied reason
        message: String,
    },

    /// The provider needs an API key and none is configured.
    #[error("{provider} API key is not configured")]
    MissingApiKey {
        /// Provider that failed
        provider: ProviderKind,
    },

    /// The address is private/loopback and must not be sent upstream.
    #[error("{provider} refused private address {ip}")]
    PrivateAddress {
        /// Provider that failed
        provider: ProviderKind,
        /// Offending address
        ip: String,
    },

    /// Reverse geocoding produced no results.
    #[error("{provider} returned no results")]
    NoResults {
        /// Provider that failed
        provider: ProviderKind,
    },

    /// Coordinates were missing or not finite.
    #[error("{provider} returned missing or non-finite coordinates")]
    InvalidCoordinates {
        /// Provider that failed
        provider: ProviderKind,
    },
}

impl ProviderError {
    /// The provider this error originated from.
    pub fn provider(&self) -> ProviderKind {
        match self {
            ProviderError::Http { provider, .. }
            | ProviderError::Status { provider, .. }
            | ProviderError::Api { provider, .. }
            | ProviderError::MissingApiKey { provider }
            | ProviderError::PrivateAddress { provider, .. }
            | ProviderError::NoResults { provider }
            | ProviderError::InvalidCoordinates { provider } => *provider,
        }
    }

    /// Whether the provider was never contacted (local configuration or input problem).
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            ProviderError::MissingApiKey { .. } | ProviderError::PrivateAddress { .. }
        )
    }
}
