mod boards;
mod hub;
mod router;
mod sessions;

use std::sync::Arc;

use crate::config::AppConfig;

pub use self::boards::{BoardRegistry, BoardStatus, Heartbeat};
pub use self::hub::{EVENT_GAME_STATE, HubManager};
pub use self::sessions::SessionRegistry;

/// Identifier of a game session, assigned in increasing order from 1.
pub type SessionId = u64;

/// Shared handle on [`AppState`] passed to handlers and background tasks.
pub type SharedState = Arc<AppState>;

/// Central application state: board liveness, live games and their viewer hubs.
pub struct AppState {
    config: AppConfig,
    boards: Arc<BoardRegistry>,
    hubs: Arc<HubManager>,
    sessions: SessionRegistry,
}

impl AppState {
    /// Construct a new [`AppState`] wrapped in an [`Arc`] so it can be cloned cheaply.
    pub fn new(config: AppConfig) -> SharedState {
        let boards = Arc::new(BoardRegistry::new());
        let hubs = Arc::new(HubManager::new(config.hub_capacity()));
        let sessions = SessionRegistry::new(boards.clone(), hubs.clone());
        Arc::new(Self {
            config,
            boards,
            hubs,
            sessions,
        })
    }

    /// Runtime configuration.
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Registry of boards with a recent heartbeat.
    pub fn boards(&self) -> &BoardRegistry {
        &self.boards
    }

    /// Per-game viewer hubs.
    pub fn hubs(&self) -> &HubManager {
        &self.hubs
    }

    /// Live games and board exclusivity.
    pub fn sessions(&self) -> &SessionRegistry {
        &self.sessions
    }
}
