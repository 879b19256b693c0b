use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Health response returned by the `/healthcheck` route.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct HealthResponse {
    /// Health status, always "ok" while the process serves requests.
    pub status: String,
    /// Boards with a recent heartbeat.
    pub boards: usize,
    /// Live games.
    pub games: usize,
}

impl HealthResponse {
    /// Create a health response indicating the system is operational.
    pub fn ok(boards: usize, games: usize) -> Self {
        Self {
            status: "ok".to_string(),
            boards,
            games,
        }
    }
}
