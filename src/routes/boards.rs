use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use validator::Validate;

use crate::{
    dto::board::{BoardHeartbeatRequest, BoardSummary, PongResponse},
    error::AppError,
    routes::extract::JsonBody,
    services::board_service,
    state::{Heartbeat, SharedState},
};

/// Board registration and liveness endpoints.
pub fn router() -> Router<SharedState> {
    Router::new().route("/boards", get(list_boards).post(heartbeat))
}

#[utoipa::path(
    post,
    path = "/api/boards",
    tag = "boards",
    request_body = BoardHeartbeatRequest,
    responses(
        (status = 202, description = "Board registered"),
        (status = 200, description = "Board already known, last seen time refreshed", body = PongResponse),
        (status = 400, description = "Invalid board name")
    )
)]
/// Register a board or refresh its heartbeat.
pub async fn heartbeat(
    State(state): State<SharedState>,
    JsonBody(payload): JsonBody<BoardHeartbeatRequest>,
) -> Result<Response, AppError> {
    payload.validate()?;
    let response = match board_service::heartbeat(&state, &payload.name).await {
        Heartbeat::Registered => StatusCode::ACCEPTED.into_response(),
        Heartbeat::Refreshed => (StatusCode::OK, Json(PongResponse::pong())).into_response(),
    };
    Ok(response)
}

#[utoipa::path(
    get,
    path = "/api/boards",
    tag = "boards",
    responses((status = 200, description = "Boards with a recent heartbeat", body = [BoardSummary]))
)]
/// List boards with a recent heartbeat.
pub async fn list_boards(State(state): State<SharedState>) -> Json<Vec<BoardSummary>> {
    Json(board_service::list_boards(&state).await)
}
