use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    routing::{get, post},
};
use validator::Validate;

use crate::{
    dto::game::{
        AddPlayerRequest, CreateGameRequest, GameCreatedResponse, GameResponse, StylesResponse,
    },
    error::AppError,
    routes::extract::{JsonBody, PathParam},
    services::session_service,
    state::{SessionId, SharedState},
};

/// Game styles, game lifecycle and player binding endpoints.
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/styles", get(list_styles))
        .route("/games", get(list_games).post(create_game))
        .route("/games/{id}", get(get_game))
        .route("/games/{id}/players", post(add_player))
}

#[utoipa::path(
    get,
    path = "/api/styles",
    tag = "games",
    responses((status = 200, description = "Available game styles", body = StylesResponse))
)]
/// List the game styles a game can be created with.
pub async fn list_styles() -> Json<StylesResponse> {
    Json(session_service::list_styles())
}

#[utoipa::path(
    post,
    path = "/api/games",
    tag = "games",
    request_body = CreateGameRequest,
    responses(
        (status = 201, description = "Game created", body = GameCreatedResponse),
        (status = 400, description = "Unknown style")
    )
)]
/// Create a new game of the requested style.
pub async fn create_game(
    State(state): State<SharedState>,
    JsonBody(payload): JsonBody<CreateGameRequest>,
) -> Result<(StatusCode, Json<GameCreatedResponse>), AppError> {
    payload.validate()?;
    let created = session_service::create_game(&state, &payload.style).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

#[utoipa::path(
    get,
    path = "/api/games",
    tag = "games",
    responses((status = 200, description = "Identifiers of live games", body = [u64]))
)]
/// List the identifiers of live games.
pub async fn list_games(State(state): State<SharedState>) -> Json<Vec<SessionId>> {
    Json(session_service::list_games(&state).await)
}

#[utoipa::path(
    get,
    path = "/api/games/{id}",
    tag = "games",
    params(("id" = u64, Path, description = "Game identifier")),
    responses(
        (status = 200, description = "Current game state", body = GameResponse),
        (status = 404, description = "Unknown game")
    )
)]
/// Return the current state of a game.
pub async fn get_game(
    State(state): State<SharedState>,
    PathParam(id): PathParam<SessionId>,
) -> Result<Json<GameResponse>, AppError> {
    Ok(Json(session_service::get_game(&state, id).await?))
}

#[utoipa::path(
    post,
    path = "/api/games/{id}/players",
    tag = "games",
    params(("id" = u64, Path, description = "Game identifier")),
    request_body = AddPlayerRequest,
    responses(
        (status = 201, description = "Player added"),
        (status = 404, description = "Unknown game"),
        (status = 409, description = "Board already busy with another game"),
        (status = 412, description = "Board is not alive"),
        (status = 422, description = "Game refused the player")
    )
)]
/// Add a player throwing on a given board to a game.
pub async fn add_player(
    State(state): State<SharedState>,
    PathParam(id): PathParam<SessionId>,
    JsonBody(payload): JsonBody<AddPlayerRequest>,
) -> Result<StatusCode, AppError> {
    payload.validate()?;
    session_service::add_player(&state, id, &payload.board, &payload.name).await?;
    Ok(StatusCode::CREATED)
}
