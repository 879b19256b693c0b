use std::time::{Instant, SystemTime};

use dashmap::{DashMap, mapref::entry::Entry};
use tracing::{debug, info};

/// Outcome of a board heartbeat.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Heartbeat {
    /// The board was unknown and is now registered.
    Registered,
    /// The board was already known; its last-seen time moved forward.
    Refreshed,
}

/// Liveness information kept for a board.
#[derive(Debug, Clone)]
struct Board {
    last_seen: Instant,
    last_seen_at: SystemTime,
}

/// Public view of an alive board.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardStatus {
    /// Unique board name.
    pub name: String,
    /// Wall-clock time of the last heartbeat.
    pub last_seen: SystemTime,
}

/// Registry of boards that sent a recent heartbeat.
#[derive(Default)]
pub struct BoardRegistry {
    boards: DashMap<String, Board>,
}

impl BoardRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `name` or refresh its last-seen time.
    pub fn heartbeat(&self, name: &str) -> Heartbeat {
        self.heartbeat_at(name, Instant::now())
    }

    pub(crate) fn heartbeat_at(&self, name: &str, now: Instant) -> Heartbeat {
        let seen = Board {
            last_seen: now,
            last_seen_at: SystemTime::now(),
        };
        match self.boards.entry(name.to_string()) {
            Entry::Occupied(mut entry) => {
                entry.insert(seen);
                debug!(board = %name, "pong");
                Heartbeat::Refreshed
            }
            Entry::Vacant(entry) => {
                entry.insert(seen);
                info!(board = %name, "new board has been registered");
                Heartbeat::Registered
            }
        }
    }

    /// Whether `name` is currently registered.
    pub fn is_alive(&self, name: &str) -> bool {
        self.boards.contains_key(name)
    }

    /// Snapshot of every alive board, sorted by name.
    pub fn list_alive(&self) -> Vec<BoardStatus> {
        let mut boards: Vec<BoardStatus> = self
            .boards
            .iter()
            .map(|entry| BoardStatus {
                name: entry.key().clone(),
                last_seen: entry.value().last_seen_at,
            })
            .collect();
        boards.sort_by(|a, b| a.name.cmp(&b.name));
        boards
    }

    /// Number of alive boards.
    pub fn len(&self) -> usize {
        self.boards.len()
    }

    /// Whether no board is alive.
    pub fn is_empty(&self) -> bool {
        self.boards.is_empty()
    }

    /// Remove every board last seen strictly before `deadline`, returning their names.
    pub fn evict_stale(&self, deadline: Instant) -> Vec<String> {
        let mut evicted = Vec::new();
        self.boards.retain(|name, board| {
            if board.last_seen < deadline {
                evicted.push(name.clone());
                false
            } else {
                true
            }
        });
        evicted.sort();
        evicted
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[test]
    fn first_heartbeat_registers_then_refreshes() {
        let registry = BoardRegistry::new();
        assert_eq!(registry.heartbeat("A"), Heartbeat::Registered);
        assert_eq!(registry.heartbeat("A"), Heartbeat::Refreshed);
        assert_eq!(registry.len(), 1);
        assert!(registry.is_alive("A"));
        assert!(!registry.is_alive("B"));
    }

    #[test]
    fn list_is_sorted() {
        let registry = BoardRegistry::new();
        for name in ["c", "a", "b"] {
            registry.heartbeat(name);
        }
        let names: Vec<_> = registry
            .list_alive()
            .into_iter()
            .map(|board| board.name)
            .collect();
        assert_eq!(names, ["a", "b", "c"]);
    }

    #[test]
    fn eviction_is_strictly_before_deadline() {
        let registry = BoardRegistry::new();
        let start = Instant::now();
        registry.heartbeat_at("old", start);
        registry.heartbeat_at("edge", start + Duration::from_secs(5));
        registry.heartbeat_at("fresh", start + Duration::from_secs(9));

        let evicted = registry.evict_stale(start + Duration::from_secs(5));

        assert_eq!(evicted, ["old"]);
        assert!(registry.is_alive("edge"));
        assert!(registry.is_alive("fresh"));
    }

    #[test]
    fn refreshed_board_survives_eviction() {
        let registry = BoardRegistry::new();
        let start = Instant::now();
        registry.heartbeat_at("A", start);
        registry.heartbeat_at("A", start + Duration::from_secs(10));
        assert!(registry.evict_stale(start + Duration::from_secs(5)).is_empty());
        assert_eq!(registry.len(), 1);
    }
}
