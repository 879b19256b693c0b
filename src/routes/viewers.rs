use std::convert::Infallible;

use axum::{
    Router,
    extract::{State, WebSocketUpgrade},
    response::{IntoResponse, sse::Sse},
    routing::get,
};
use futures::Stream;
use tracing::info;

use crate::{
    error::AppError,
    routes::extract::PathParam,
    services::viewer_service,
    state::{SessionId, SharedState},
};

#[utoipa::path(
    get,
    path = "/api/games/{id}/ws",
    tag = "viewers",
    params(("id" = u64, Path, description = "Game identifier")),
    responses(
        (status = 101, description = "Switching protocols to WebSocket"),
        (status = 404, description = "Unknown game")
    )
)]
/// Upgrade the HTTP connection into a live WebSocket stream of a game.
pub async fn ws_handler(
    State(state): State<SharedState>,
    PathParam(id): PathParam<SessionId>,
    ws: WebSocketUpgrade,
) -> Result<impl IntoResponse, AppError> {
    let subscription = viewer_service::attach(&state, id).await?;
    Ok(ws.on_upgrade(move |socket| viewer_service::handle_socket(subscription, socket)))
}

#[utoipa::path(
    get,
    path = "/api/games/{id}/sse",
    tag = "viewers",
    params(("id" = u64, Path, description = "Game identifier")),
    responses(
        (status = 200, description = "Live game SSE stream", content_type = "text/event-stream", body = String),
        (status = 404, description = "Unknown game")
    )
)]
/// Stream live snapshots of a game as server-sent events.
pub async fn sse_handler(
    State(state): State<SharedState>,
    PathParam(id): PathParam<SessionId>,
) -> Result<Sse<impl Stream<Item = Result<axum::response::sse::Event, Infallible>>>, AppError> {
    let subscription = viewer_service::attach(&state, id).await?;
    info!(game_id = id, "New SSE viewer connection");
    Ok(viewer_service::to_sse_stream(subscription))
}

/// Configure the live viewer endpoints.
pub fn router() -> Router<SharedState> {
    Router::<SharedState>::new()
        .route("/games/{id}/ws", get(ws_handler))
        .route("/games/{id}/sse", get(sse_handler))
}
