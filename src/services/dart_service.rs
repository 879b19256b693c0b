use tracing::info;

use crate::{
    dto::dart::{DartRequest, DartResponse},
    error::ServiceError,
    services::session_service::collect_terminated,
    state::SharedState,
};

/// Route a dart to the game waiting for its board and return the new game state.
pub async fn throw_dart(
    state: &SharedState,
    dart: &DartRequest,
) -> Result<DartResponse, ServiceError> {
    collect_terminated(state).await;
    info!(
        board = %dart.board,
        sector = dart.sector,
        multiplier = dart.multiplier,
        "received a dart"
    );
    let (_, snapshot) = state
        .sessions()
        .route_dart(&dart.board, dart.sector, dart.multiplier)
        .await?;
    Ok(DartResponse { state: snapshot })
}
