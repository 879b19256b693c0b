use tracing::debug;

use crate::{
    dto::game::{GameCreatedResponse, GameResponse, StyleSummary, StylesResponse},
    error::ServiceError,
    game::styles::STYLES,
    state::{SessionId, SharedState},
};

/// Drop every game that reached its end, releasing its boards and closing its hub.
///
/// Runs at the start of every entry point so ended games disappear without a dedicated task.
pub async fn collect_terminated(state: &SharedState) -> Vec<SessionId> {
    let removed = state.sessions().remove_terminated().await;
    if !removed.is_empty() {
        debug!(games = ?removed, "collected ended games");
    }
    removed
}

/// List the styles a game can be created with.
pub fn list_styles() -> StylesResponse {
    StylesResponse {
        styles: STYLES.iter().map(StyleSummary::from).collect(),
    }
}

/// Start a new game of the requested style.
pub async fn create_game(
    state: &SharedState,
    style: &str,
) -> Result<GameCreatedResponse, ServiceError> {
    collect_terminated(state).await;
    let (id, game) = state.sessions().create(style).await?;
    Ok(GameCreatedResponse { id, game })
}

/// Identifiers of every live game.
pub async fn list_games(state: &SharedState) -> Vec<SessionId> {
    collect_terminated(state).await;
    state.sessions().list().await
}

/// Current state of game `id`.
pub async fn get_game(state: &SharedState, id: SessionId) -> Result<GameResponse, ServiceError> {
    collect_terminated(state).await;
    let game = state.sessions().get(id).await?;
    Ok(GameResponse { game })
}

/// Add a player throwing on `board` to game `id`.
pub async fn add_player(
    state: &SharedState,
    id: SessionId,
    board: &str,
    name: &str,
) -> Result<(), ServiceError> {
    collect_terminated(state).await;
    state.sessions().bind_player(id, board, name).await
}
