use std::{
    collections::{BTreeMap, BTreeSet, HashMap},
    sync::Arc,
};

use tokio::sync::RwLock;
use tracing::{info, warn};

use crate::{
    error::ServiceError,
    game::{Game, GameSnapshot, GameStatus, styles},
    state::{BoardRegistry, HubManager, SessionId},
};

/// A live game and the boards bound to it.
pub(super) struct Session {
    pub(super) engine: Box<dyn Game>,
    pub(super) boards: BTreeSet<String>,
}

/// Everything guarded by the registry lock: games, id counter and board exclusivity.
pub(super) struct SessionTable {
    next_id: SessionId,
    pub(super) sessions: BTreeMap<SessionId, Session>,
    /// Board name to the only game it may play in.
    pub(super) active_boards: HashMap<String, SessionId>,
}

impl SessionTable {
    fn new() -> Self {
        Self {
            next_id: 1,
            sessions: BTreeMap::new(),
            active_boards: HashMap::new(),
        }
    }

    fn allocate_id(&mut self) -> SessionId {
        let id = self.next_id;
        self.next_id = id
            .checked_add(1)
            .expect("game identifier space exhausted");
        id
    }
}

/// Owner of game sessions and of the board exclusivity relation.
pub struct SessionRegistry {
    pub(super) table: RwLock<SessionTable>,
    boards: Arc<BoardRegistry>,
    pub(super) hubs: Arc<HubManager>,
}

impl SessionRegistry {
    /// Create an empty registry checking liveness against `boards` and publishing to `hubs`.
    pub fn new(boards: Arc<BoardRegistry>, hubs: Arc<HubManager>) -> Self {
        Self {
            table: RwLock::new(SessionTable::new()),
            boards,
            hubs,
        }
    }

    /// Start a new game of the given style, opening its hub.
    pub async fn create(
        &self,
        style_code: &str,
    ) -> Result<(SessionId, GameSnapshot), ServiceError> {
        let style = styles::find(style_code)
            .ok_or_else(|| ServiceError::InvalidStyle(style_code.to_string()))?;
        let engine = style.create();
        let snapshot = engine.snapshot();

        let mut table = self.table.write().await;
        let id = table.allocate_id();
        self.hubs.open(id);
        table.sessions.insert(
            id,
            Session {
                engine,
                boards: BTreeSet::new(),
            },
        );
        info!(game_id = id, style = style.code, "game created");
        Ok((id, snapshot))
    }

    /// Current snapshot of game `id`.
    pub async fn get(&self, id: SessionId) -> Result<GameSnapshot, ServiceError> {
        let table = self.table.read().await;
        table
            .sessions
            .get(&id)
            .map(|session| session.engine.snapshot())
            .ok_or(ServiceError::NotFound(id))
    }

    /// Identifiers of every live game, ascending.
    pub async fn list(&self) -> Vec<SessionId> {
        self.table.read().await.sessions.keys().copied().collect()
    }

    /// Number of live games.
    pub async fn len(&self) -> usize {
        self.table.read().await.sessions.len()
    }

    /// Game `board` is exclusively bound to, if any.
    #[cfg(test)]
    pub(crate) async fn session_of(&self, board: &str) -> Option<SessionId> {
        self.table.read().await.active_boards.get(board).copied()
    }

    /// Boards bound to game `id`.
    #[cfg(test)]
    pub(crate) async fn boards_of(&self, id: SessionId) -> Result<Vec<String>, ServiceError> {
        let table = self.table.read().await;
        table
            .sessions
            .get(&id)
            .map(|session| session.boards.iter().cloned().collect())
            .ok_or(ServiceError::NotFound(id))
    }

    /// Install `engine` as game `id` owning `boards`, skipping every check.
    #[cfg(test)]
    pub(crate) async fn insert_unchecked(
        &self,
        id: SessionId,
        engine: Box<dyn Game>,
        boards: &[&str],
    ) {
        let mut table = self.table.write().await;
        for board in boards {
            table.active_boards.insert(board.to_string(), id);
        }
        let boards = boards.iter().map(|board| board.to_string()).collect();
        table.sessions.insert(id, Session { engine, boards });
        self.hubs.open(id);
    }

    /// Add `player` throwing on `board` to game `id`.
    ///
    /// The board must be alive and free of any other game. Nothing changes on failure.
    pub async fn bind_player(
        &self,
        id: SessionId,
        board: &str,
        player: &str,
    ) -> Result<(), ServiceError> {
        let mut table = self.table.write().await;
        let table = &mut *table;

        let session = table
            .sessions
            .get_mut(&id)
            .ok_or(ServiceError::NotFound(id))?;

        if !self.boards.is_alive(board) {
            return Err(ServiceError::BoardNotAlive(board.to_string()));
        }

        if let Some(&bound) = table.active_boards.get(board) {
            if bound != id {
                return Err(ServiceError::BoardBusy {
                    board: board.to_string(),
                    session: bound,
                });
            }
        }

        session.engine.add_player(board, player)?;
        session.boards.insert(board.to_string());
        table.active_boards.insert(board.to_string(), id);
        info!(game_id = id, board = %board, player = %player, "player joined");

        self.hubs.refresh(id, &session.engine.snapshot());
        Ok(())
    }

    /// Tell every game bound to `board` that it went away.
    ///
    /// Returns the games that can no longer continue; their viewers have been refreshed.
    pub async fn board_has_left(&self, board: &str) -> Vec<SessionId> {
        let mut table = self.table.write().await;
        let Some(&id) = table.active_boards.get(board) else {
            return Vec::new();
        };
        let Some(session) = table.sessions.get_mut(&id) else {
            warn!(board = %board, game_id = id, "board bound to a missing game");
            return Vec::new();
        };

        if session.engine.board_has_left(board) {
            return Vec::new();
        }

        warn!(board = %board, game_id = id, "game can no longer continue without board");
        self.hubs.refresh(id, &session.engine.snapshot());
        vec![id]
    }

    /// Remove every game whose engine reports it is over.
    ///
    /// Releases the boards of each removed game and closes its hub. Safe to call repeatedly.
    pub async fn remove_terminated(&self) -> Vec<SessionId> {
        {
            let table = self.table.read().await;
            if !table.sessions.values().any(is_over) {
                return Vec::new();
            }
        }

        let mut table = self.table.write().await;
        let ended: Vec<SessionId> = table
            .sessions
            .iter()
            .filter(|(_, session)| is_over(session))
            .map(|(id, _)| *id)
            .collect();

        for id in &ended {
            let Some(session) = table.sessions.remove(id) else {
                continue;
            };
            for board in &session.boards {
                if table.active_boards.get(board) == Some(id) {
                    table.active_boards.remove(board);
                }
            }
            self.hubs.close(*id);
            info!(game_id = id, "ended game removed");
        }

        ended
    }
}

fn is_over(session: &Session) -> bool {
    session.engine.status() == GameStatus::Over
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> (SessionRegistry, Arc<BoardRegistry>, Arc<HubManager>) {
        let boards = Arc::new(BoardRegistry::new());
        let hubs = Arc::new(HubManager::new(8));
        (
            SessionRegistry::new(boards.clone(), hubs.clone()),
            boards,
            hubs,
        )
    }

    #[tokio::test]
    async fn ids_are_monotonic_and_never_reused() {
        let (registry, _, hubs) = registry();
        let (first, _) = registry.create("301").await.unwrap();
        let (second, _) = registry.create("cricket").await.unwrap();
        assert_eq!((first, second), (1, 2));
        assert!(hubs.is_open(1) && hubs.is_open(2));

        registry.boards.heartbeat("A");
        registry.bind_player(2, "A", "Alice").await.unwrap();
        registry.board_has_left("A").await;
        assert_eq!(registry.remove_terminated().await, [2]);

        let (third, _) = registry.create("501").await.unwrap();
        assert_eq!(third, 3);
        assert_eq!(registry.list().await, [1, 3]);
    }

    #[tokio::test]
    async fn unknown_style_is_rejected() {
        let (registry, _, _) = registry();
        assert_eq!(
            registry.create("golf").await.unwrap_err(),
            ServiceError::InvalidStyle("golf".into())
        );
        assert!(registry.list().await.is_empty());
    }

    #[tokio::test]
    async fn dead_board_cannot_be_bound() {
        let (registry, _, _) = registry();
        let (id, _) = registry.create("301").await.unwrap();
        assert_eq!(
            registry.bind_player(id, "ghost", "Alice").await.unwrap_err(),
            ServiceError::BoardNotAlive("ghost".into())
        );
        assert_eq!(registry.session_of("ghost").await, None);
        assert!(registry.get(id).await.unwrap().players.is_empty());
    }

    #[tokio::test]
    async fn unknown_game_is_checked_first() {
        let (registry, _, _) = registry();
        assert_eq!(
            registry.bind_player(9, "ghost", "Alice").await.unwrap_err(),
            ServiceError::NotFound(9)
        );
    }

    #[tokio::test]
    async fn busy_board_keeps_original_binding() {
        let (registry, boards, _) = registry();
        boards.heartbeat("A");
        let (first, _) = registry.create("301").await.unwrap();
        let (second, _) = registry.create("301").await.unwrap();

        registry.bind_player(first, "A", "Alice").await.unwrap();
        assert_eq!(
            registry.bind_player(second, "A", "Bob").await.unwrap_err(),
            ServiceError::BoardBusy {
                board: "A".into(),
                session: first
            }
        );

        assert_eq!(registry.session_of("A").await, Some(first));
        assert_eq!(registry.get(first).await.unwrap().players.len(), 1);
        assert!(registry.get(second).await.unwrap().players.is_empty());
    }

    #[tokio::test]
    async fn several_players_may_share_a_board() {
        let (registry, boards, _) = registry();
        boards.heartbeat("A");
        let (id, _) = registry.create("cricket").await.unwrap();
        registry.bind_player(id, "A", "Alice").await.unwrap();
        registry.bind_player(id, "A", "Bob").await.unwrap();
        assert_eq!(registry.get(id).await.unwrap().players.len(), 2);
        assert_eq!(registry.boards_of(id).await.unwrap(), ["A"]);
    }

    #[tokio::test]
    async fn bind_refreshes_viewers() {
        let (registry, boards, hubs) = registry();
        boards.heartbeat("A");
        let (id, _) = registry.create("301").await.unwrap();
        let mut viewer = hubs.attach(id).unwrap();
        registry.bind_player(id, "A", "Alice").await.unwrap();
        let event = viewer.try_recv().unwrap();
        let snapshot: GameSnapshot = serde_json::from_str(&event.data).unwrap();
        assert_eq!(snapshot.players[0].name, "Alice");
    }

    #[tokio::test]
    async fn concurrent_binds_have_exactly_one_winner() {
        let (registry, boards, _) = registry();
        boards.heartbeat("A");
        let registry = Arc::new(registry);
        let mut ids = Vec::new();
        for _ in 0..8 {
            ids.push(registry.create("301").await.unwrap().0);
        }

        let tasks: Vec<_> = ids
            .iter()
            .map(|&id| {
                let registry = registry.clone();
                tokio::spawn(async move { registry.bind_player(id, "A", "Alice").await })
            })
            .collect();

        let mut winners = 0;
        for task in tasks {
            match task.await.unwrap() {
                Ok(()) => winners += 1,
                Err(err) => assert!(matches!(err, ServiceError::BoardBusy { .. })),
            }
        }
        assert_eq!(winners, 1);
    }

    #[tokio::test]
    async fn removing_terminated_games_is_idempotent() {
        let (registry, boards, hubs) = registry();
        boards.heartbeat("A");
        boards.heartbeat("B");
        let (ended, _) = registry.create("301").await.unwrap();
        let (alive, _) = registry.create("301").await.unwrap();
        registry.bind_player(ended, "A", "Alice").await.unwrap();
        registry.bind_player(alive, "B", "Bob").await.unwrap();

        assert!(registry.remove_terminated().await.is_empty());
        assert_eq!(registry.board_has_left("A").await, [ended]);
        assert_eq!(registry.remove_terminated().await, [ended]);
        assert!(registry.remove_terminated().await.is_empty());

        assert_eq!(registry.list().await, [alive]);
        assert!(!hubs.is_open(ended));
        assert!(hubs.is_open(alive));
        assert_eq!(registry.session_of("A").await, None);
        assert_eq!(registry.session_of("B").await, Some(alive));
        assert_eq!(
            registry.get(ended).await.unwrap_err(),
            ServiceError::NotFound(ended)
        );
    }

    #[tokio::test]
    async fn unused_board_leaving_keeps_games_alive() {
        let (registry, boards, _) = registry();
        boards.heartbeat("A");
        let (id, _) = registry.create("301").await.unwrap();
        registry.bind_player(id, "A", "Alice").await.unwrap();
        assert!(registry.board_has_left("Z").await.is_empty());
        assert!(registry.remove_terminated().await.is_empty());
        assert_eq!(registry.list().await, [id]);
    }
}
