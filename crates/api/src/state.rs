use std::sync::Arc;

use campus_core::Classify;
use campus_db::{IssueRepository, IssueStore};

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via
/// `State<AppState>`. Cheaply cloneable (inner data is behind `Arc`).
#[derive(Clone)]
pub struct AppState {
    /// Issue repository (CRUD + invariants over the document store).
    pub repo: IssueRepository,
    /// Raw store handle for the stats aggregator and health endpoint.
    pub store: Arc<dyn IssueStore>,
    /// Classifier for the standalone `/analyze` endpoint.
    pub classifier: Arc<dyn Classify>,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
}
