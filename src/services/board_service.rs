use crate::{
    dto::board::BoardSummary,
    services::session_service::collect_terminated,
    state::{Heartbeat, SharedState},
};

/// Record a heartbeat from `name`, registering the board on first contact.
pub async fn heartbeat(state: &SharedState, name: &str) -> Heartbeat {
    collect_terminated(state).await;
    state.boards().heartbeat(name)
}

/// Every board with a recent heartbeat.
pub async fn list_boards(state: &SharedState) -> Vec<BoardSummary> {
    collect_terminated(state).await;
    state
        .boards()
        .list_alive()
        .into_iter()
        .map(BoardSummary::from)
        .collect()
}
