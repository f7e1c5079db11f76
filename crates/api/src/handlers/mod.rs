//! Request handlers.
//!
//! Each submodule provides async handler functions for one slice of the
//! API. Handlers delegate to the repository / aggregator in `campus_db`
//! and map errors via [`crate::error::AppError`].

pub mod analyze;
pub mod health;
pub mod issues;
pub mod stats;
pub mod status_checks;
