use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::{dto::validation::validate_name, game::GameSnapshot};

/// A dart reported by a board.
#[derive(Debug, Deserialize, Serialize, ToSchema, Validate)]
pub struct DartRequest {
    /// Board the dart was thrown on.
    #[validate(custom(function = "validate_name"))]
    pub board: String,
    /// Sector value: 0 (miss), 1-20, or 25 (bull).
    pub sector: u8,
    /// Ring multiplier (1-3).
    pub multiplier: u8,
}

/// Game state after a dart has been applied.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct DartResponse {
    pub state: GameSnapshot,
}
