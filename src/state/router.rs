use tracing::{info, warn};

use crate::{
    error::ServiceError,
    game::{GameSnapshot, Sector},
    state::{SessionId, SessionRegistry},
};

impl SessionRegistry {
    /// Forward a dart thrown on `board` to the game whose turn it is.
    ///
    /// A rejected dart leaves the game untouched. Viewers are refreshed on success.
    pub async fn route_dart(
        &self,
        board: &str,
        value: u8,
        multiplier: u8,
    ) -> Result<(SessionId, GameSnapshot), ServiceError> {
        let mut table = self.table.write().await;

        let claimants: Vec<SessionId> = table
            .sessions
            .iter()
            .filter(|(_, session)| session.engine.is_turn_of(board))
            .map(|(id, _)| *id)
            .collect();

        let Some(&id) = claimants.first() else {
            return Err(ServiceError::NoActiveSession(board.to_string()));
        };
        if claimants.len() > 1 {
            // Board exclusivity should make this impossible.
            warn!(
                board = %board,
                games = ?claimants,
                selected = id,
                "several games claim the turn of the same board"
            );
        }

        let sector = Sector::new(value, multiplier).map_err(ServiceError::Routing)?;
        let session = table
            .sessions
            .get_mut(&id)
            .ok_or(ServiceError::NotFound(id))?;
        let snapshot = session
            .engine
            .handle_dart(sector)
            .map_err(ServiceError::Routing)?;

        info!(game_id = id, board = %board, value, multiplier, "dart scored");
        self.hubs.refresh(id, &snapshot);
        Ok((id, snapshot))
    }
}
