//! Error handling.
//!
//! Error types are split by the layer that produces them:
//! - **Provider errors**: one geolocation provider failed; recovered by the resolver
//! - **Queue/database errors**: the job store or location store failed
//! - **Initialization errors**: logger or HTTP client setup failed

mod types;

// Re-export public API
pub use types::{DatabaseError, InitializationError, ProviderError, QueueError};
