use axum::{Json, Router, extract::State, routing::post};
use validator::Validate;

use crate::{
    dto::dart::{DartRequest, DartResponse},
    error::AppError,
    routes::extract::JsonBody,
    services::dart_service,
    state::SharedState,
};

/// Dart submission endpoint used by boards.
pub fn router() -> Router<SharedState> {
    Router::new().route("/darts", post(throw_dart))
}

#[utoipa::path(
    post,
    path = "/api/darts",
    tag = "darts",
    request_body = DartRequest,
    responses(
        (status = 200, description = "Dart applied", body = DartResponse),
        (status = 404, description = "No game is waiting for this board"),
        (status = 422, description = "Dart rejected by the game")
    )
)]
/// Apply a dart to the game whose turn belongs to the sending board.
pub async fn throw_dart(
    State(state): State<SharedState>,
    JsonBody(payload): JsonBody<DartRequest>,
) -> Result<Json<DartResponse>, AppError> {
    payload.validate()?;
    Ok(Json(dart_service::throw_dart(&state, &payload).await?))
}
