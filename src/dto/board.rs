use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::{
    dto::{format_system_time, validation::validate_name},
    state::BoardStatus,
};

/// Heartbeat sent periodically by every board.
#[derive(Debug, Deserialize, Serialize, ToSchema, Validate)]
pub struct BoardHeartbeatRequest {
    #[validate(custom(function = "validate_name"))]
    pub name: String,
}

/// Reply to the heartbeat of an already known board.
#[derive(Debug, Serialize, ToSchema)]
pub struct PongResponse {
    pub status: String,
}

impl PongResponse {
    pub fn pong() -> Self {
        Self {
            status: "pong".to_string(),
        }
    }
}

/// Alive board as listed to clients.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct BoardSummary {
    pub name: String,
    /// RFC 3339 timestamp of the last heartbeat.
    pub last_seen: String,
}

impl From<BoardStatus> for BoardSummary {
    fn from(status: BoardStatus) -> Self {
        Self {
            name: status.name,
            last_seen: format_system_time(status.last_seen),
        }
    }
}
