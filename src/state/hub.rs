use dashmap::DashMap;
use tokio::sync::broadcast;
use tracing::{debug, info, warn};

use crate::{dto::sse::ServerEvent, error::ServiceError, game::GameSnapshot, state::SessionId};

/// Event name carried by every snapshot pushed to viewers.
pub const EVENT_GAME_STATE: &str = "game.state";

/// Broadcast hub of a single game.
///
/// Backed by a bounded Tokio broadcast channel: sending never waits, and a viewer that
/// falls behind loses the oldest snapshots instead of slowing anybody down.
struct SessionHub {
    sender: broadcast::Sender<ServerEvent>,
}

impl SessionHub {
    fn new(capacity: usize) -> Self {
        let (sender, _receiver) = broadcast::channel(capacity);
        Self { sender }
    }
}

/// Owner of every per-game hub.
pub struct HubManager {
    hubs: DashMap<SessionId, SessionHub>,
    capacity: usize,
}

impl HubManager {
    /// Create a manager whose hubs buffer `capacity` snapshots per viewer.
    pub fn new(capacity: usize) -> Self {
        Self {
            hubs: DashMap::new(),
            capacity: capacity.max(1),
        }
    }

    /// Create the hub of a new game. An existing hub for `id` is kept as is.
    pub fn open(&self, id: SessionId) {
        self.hubs
            .entry(id)
            .or_insert_with(|| SessionHub::new(self.capacity));
        debug!(game_id = id, "hub opened");
    }

    /// Register a viewer that will receive every subsequent snapshot of game `id`.
    pub fn attach(&self, id: SessionId) -> Result<broadcast::Receiver<ServerEvent>, ServiceError> {
        self.hubs
            .get(&id)
            .map(|hub| hub.sender.subscribe())
            .ok_or(ServiceError::NotFound(id))
    }

    /// Push `snapshot` to every viewer of game `id`, returning how many were reached.
    pub fn refresh(&self, id: SessionId, snapshot: &GameSnapshot) -> usize {
        let Some(hub) = self.hubs.get(&id) else {
            warn!(game_id = id, "refresh requested for a game without hub");
            return 0;
        };
        match ServerEvent::json(Some(EVENT_GAME_STATE.to_string()), snapshot) {
            // No receiver is not an error: nobody is watching this game.
            Ok(event) => hub.sender.send(event).unwrap_or(0),
            Err(err) => {
                warn!(game_id = id, error = %err, "failed to serialize game snapshot");
                0
            }
        }
    }

    /// Disconnect every viewer of game `id` and drop its hub.
    ///
    /// Returns `true` only for the call that actually closed the hub.
    pub fn close(&self, id: SessionId) -> bool {
        match self.hubs.remove(&id) {
            Some((_, hub)) => {
                info!(
                    game_id = id,
                    viewers = hub.sender.receiver_count(),
                    "closing game hub"
                );
                true
            }
            None => false,
        }
    }

    /// Number of viewers currently attached to game `id`.
    pub fn viewer_count(&self, id: SessionId) -> usize {
        self.hubs
            .get(&id)
            .map(|hub| hub.sender.receiver_count())
            .unwrap_or(0)
    }

    /// Whether game `id` has an open hub.
    pub fn is_open(&self, id: SessionId) -> bool {
        self.hubs.contains_key(&id)
    }
}

#[cfg(test)]
mod tests {
    use tokio::sync::broadcast::error::{RecvError, TryRecvError};

    use super::*;
    use crate::game::{GameStatus, styles};

    fn snapshot() -> GameSnapshot {
        styles::find("301").unwrap().create().snapshot()
    }

    #[test]
    fn attach_requires_an_open_hub() {
        let hubs = HubManager::new(4);
        assert_eq!(hubs.attach(1).unwrap_err(), ServiceError::NotFound(1));
        hubs.open(1);
        assert!(hubs.attach(1).is_ok());
        assert_eq!(hubs.viewer_count(1), 1);
    }

    #[test]
    fn refresh_reaches_every_viewer() {
        let hubs = HubManager::new(4);
        hubs.open(7);
        let mut first = hubs.attach(7).unwrap();
        let mut second = hubs.attach(7).unwrap();

        assert_eq!(hubs.refresh(7, &snapshot()), 2);

        for receiver in [&mut first, &mut second] {
            let event = receiver.try_recv().unwrap();
            assert_eq!(event.event.as_deref(), Some(EVENT_GAME_STATE));
            let decoded: GameSnapshot = serde_json::from_str(&event.data).unwrap();
            assert_eq!(decoded.ongoing, GameStatus::Initializing);
        }
    }

    #[test]
    fn slow_viewer_drops_oldest_without_blocking() {
        let hubs = HubManager::new(2);
        hubs.open(1);
        let mut slow = hubs.attach(1).unwrap();
        for _ in 0..5 {
            hubs.refresh(1, &snapshot());
        }
        assert!(matches!(slow.try_recv(), Err(TryRecvError::Lagged(3))));
        assert!(slow.try_recv().is_ok());
        assert!(slow.try_recv().is_ok());
        assert!(matches!(slow.try_recv(), Err(TryRecvError::Empty)));
    }

    #[tokio::test]
    async fn close_happens_once_and_ends_streams() {
        let hubs = HubManager::new(4);
        hubs.open(3);
        let mut viewer = hubs.attach(3).unwrap();

        assert!(hubs.close(3));
        assert!(!hubs.close(3));
        assert!(!hubs.is_open(3));
        assert!(matches!(viewer.recv().await, Err(RecvError::Closed)));
        assert_eq!(hubs.refresh(3, &snapshot()), 0);
    }
}
