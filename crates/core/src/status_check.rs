//! Liveness scratch entity used by the `/status` endpoints.

use serde::{Deserialize, Serialize};

use crate::issue::now_rfc3339;

/// One recorded status check (collection `status_checks`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusCheck {
    pub id: String,
    pub client_name: String,
    /// RFC 3339 UTC timestamp.
    pub timestamp: String,
}

impl StatusCheck {
    pub fn new(client_name: String) -> Self {
        StatusCheck {
            id: uuid::Uuid::new_v4().to_string(),
            client_name,
            timestamp: now_rfc3339(),
        }
    }
}

/// DTO for recording a status check.
#[derive(Debug, Deserialize)]
pub struct CreateStatusCheck {
    pub client_name: String,
}
