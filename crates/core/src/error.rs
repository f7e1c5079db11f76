/// Domain-level error type shared across the repository and API layers.
///
/// The HTTP boundary translates these into response codes; internal code
/// returns them explicitly rather than surfacing driver errors.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// The requested entity does not exist.
    #[error("{entity} with id {id} not found")]
    NotFound {
        /// Human-readable entity name (e.g. `"Issue"`).
        entity: &'static str,
        /// The identifier that failed to match.
        id: String,
    },

    /// Input failed domain validation.
    #[error("{0}")]
    Validation(String),

    /// The document store is unreachable (transient infrastructure failure).
    #[error("{0}")]
    Unavailable(String),

    /// An unexpected internal failure. The message is logged server-side
    /// and never leaked verbatim to clients.
    #[error("{0}")]
    Internal(String),
}

impl CoreError {
    /// Standard unavailability condition for a down document store.
    pub fn database_unavailable() -> Self {
        CoreError::Unavailable("Database unavailable".to_string())
    }
}
