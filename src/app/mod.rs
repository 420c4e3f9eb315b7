//! Application helpers used by the runner: input parsing, progress logging
//! and shutdown.

pub mod input;
pub mod logging;
pub mod shutdown;

pub use input::parse_job_line;
pub use logging::log_progress;
pub use shutdown::shutdown_gracefully;
