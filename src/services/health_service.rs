use crate::{dto::health::HealthResponse, services::session_service, state::SharedState};

/// Report liveness along with the number of alive boards and live games.
pub async fn health_status(state: &SharedState) -> HealthResponse {
    session_service::collect_terminated(state).await;
    HealthResponse::ok(state.boards().len(), state.sessions().len().await)
}
