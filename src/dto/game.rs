use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::{
    dto::validation::validate_name,
    game::{GameSnapshot, styles::GameStyle},
    state::SessionId,
};

/// Payload used to start a new game.
#[derive(Debug, Deserialize, Serialize, ToSchema, Validate)]
pub struct CreateGameRequest {
    /// Style code, see `GET /api/styles`.
    #[validate(length(min = 1))]
    pub style: String,
}

/// Identifier and initial state of a freshly created game.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct GameCreatedResponse {
    pub id: SessionId,
    pub game: GameSnapshot,
}

/// Current state of a game.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct GameResponse {
    pub game: GameSnapshot,
}

/// Player joining a game on a given board.
#[derive(Debug, Deserialize, Serialize, ToSchema, Validate)]
pub struct AddPlayerRequest {
    #[validate(custom(function = "validate_name"))]
    pub board: String,
    #[validate(custom(function = "validate_name"))]
    pub name: String,
}

/// A style clients may pick when creating a game.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct StyleSummary {
    pub code: String,
    pub description: String,
}

impl From<&GameStyle> for StyleSummary {
    fn from(style: &GameStyle) -> Self {
        Self {
            code: style.code.to_string(),
            description: style.description.to_string(),
        }
    }
}

/// Every style the server can run.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct StylesResponse {
    pub styles: Vec<StyleSummary>,
}
