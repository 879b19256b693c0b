//! Scoring engines for the supported darts game styles.
//!
//! Every engine is driven through the [`Game`] trait; the session registry never
//! looks past it. Styles are resolved to engine constructors by [`styles`].

mod count_up;
mod cricket;
mod highest;
mod roster;
pub mod styles;
mod x01;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

pub use self::count_up::{CountUp, CountUpOptions};
pub use self::cricket::{Cricket, CricketOptions};
pub use self::highest::{Highest, HighestOptions};
pub use self::x01::{X01, X01Options};

/// Number of darts thrown by a player before the turn passes.
pub const DARTS_PER_VISIT: u8 = 3;
/// Sector value of the bull's eye.
pub const BULL: u8 = 25;

/// A single dart as reported by a board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Sector {
    /// Sector value: 0 for a miss, 1-20, or 25 for the bull.
    pub value: u8,
    /// Ring multiplier: 1 (single), 2 (double) or 3 (triple).
    pub multiplier: u8,
}

impl Sector {
    /// Build a sector, rejecting impossible combinations.
    pub fn new(value: u8, multiplier: u8) -> Result<Self, DomainError> {
        let valid = match value {
            0 | 1..=20 => (1..=3).contains(&multiplier),
            BULL => (1..=2).contains(&multiplier),
            _ => false,
        };
        if !valid {
            return Err(DomainError::InvalidSector { value, multiplier });
        }
        Ok(Self { value, multiplier })
    }

    /// Points scored by this dart.
    pub fn points(&self) -> i32 {
        if self.value == 0 {
            return 0;
        }
        i32::from(self.value) * i32::from(self.multiplier)
    }

    /// Whether the dart landed in a double ring (double bull included).
    pub fn is_double(&self) -> bool {
        self.value != 0 && self.multiplier == 2
    }
}

/// Lifecycle of a game as reported to viewers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum GameStatus {
    /// No player has joined yet.
    Initializing,
    /// Players joined, no dart thrown yet.
    Ready,
    /// At least one dart has been thrown.
    Playing,
    /// The game has concluded and may be discarded.
    Over,
}

impl GameStatus {
    /// Whether players may still join.
    pub fn accepts_players(self) -> bool {
        matches!(self, Self::Initializing | Self::Ready)
    }
}

/// Per-player view inside a [`GameSnapshot`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct PlayerSnapshot {
    /// Display name.
    pub name: String,
    /// Board the player throws on.
    pub board: String,
    /// Current score, meaning depends on the style.
    pub score: i32,
    /// Final position once the player finished, 1 being the winner.
    pub rank: Option<u32>,
    /// Cricket marks per target, absent for other styles.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub marks: Option<BTreeMap<u8, u8>>,
}

/// Full state of a game, pushed to viewers after every change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct GameSnapshot {
    /// Style code the game was created with.
    pub style: String,
    /// Players in throwing order.
    pub players: Vec<PlayerSnapshot>,
    /// Index into `players` of whoever throws next.
    pub current_player: usize,
    /// Darts already thrown in the current visit.
    pub current_dart: u8,
    /// One-based round counter.
    pub round: u32,
    /// Lifecycle status.
    pub ongoing: GameStatus,
}

impl GameSnapshot {
    /// Board of the player whose turn it is, if the game accepts darts.
    pub fn current_board(&self) -> Option<&str> {
        if !matches!(self.ongoing, GameStatus::Ready | GameStatus::Playing) {
            return None;
        }
        self.players
            .get(self.current_player)
            .map(|player| player.board.as_str())
    }
}

/// Rejections raised by an engine. They never leave the game half-updated.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    /// Sector/multiplier combination does not exist on a dartboard.
    #[error("sector {value} with multiplier {multiplier} does not exist")]
    InvalidSector {
        /// Reported sector value.
        value: u8,
        /// Reported multiplier.
        multiplier: u8,
    },
    /// Players cannot join once darts have been thrown.
    #[error("game already started")]
    AlreadyStarted,
    /// A dart was thrown before anybody joined.
    #[error("game has no players")]
    NoPlayers,
    /// The game already concluded.
    #[error("game is over")]
    GameOver,
}

/// Capability every scoring engine exposes to the session registry.
pub trait Game: Send + Sync {
    /// Append a player throwing on `board`.
    fn add_player(&mut self, board: &str, name: &str) -> Result<(), DomainError>;

    /// Current state of the game.
    fn snapshot(&self) -> GameSnapshot;

    /// Apply a dart thrown by the current player and return the resulting state.
    fn handle_dart(&mut self, sector: Sector) -> Result<GameSnapshot, DomainError>;

    /// Record that `board` went away. Returns whether the game can continue.
    fn board_has_left(&mut self, board: &str) -> bool;

    /// Lifecycle status, cheaper than a full snapshot.
    fn status(&self) -> GameStatus;

    /// Whether the next dart is expected from `board`.
    fn is_turn_of(&self, board: &str) -> bool {
        self.snapshot().current_board() == Some(board)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sector_accepts_regular_darts() {
        assert_eq!(Sector::new(20, 3).unwrap().points(), 60);
        assert_eq!(Sector::new(BULL, 2).unwrap().points(), 50);
        assert_eq!(Sector::new(0, 3).unwrap().points(), 0);
    }

    #[test]
    fn sector_rejects_impossible_darts() {
        assert_eq!(
            Sector::new(21, 1),
            Err(DomainError::InvalidSector {
                value: 21,
                multiplier: 1
            })
        );
        assert!(Sector::new(BULL, 3).is_err());
        assert!(Sector::new(5, 0).is_err());
        assert!(Sector::new(5, 4).is_err());
    }

    #[test]
    fn miss_is_never_a_double() {
        assert!(!Sector::new(0, 2).unwrap().is_double());
        assert!(Sector::new(BULL, 2).unwrap().is_double());
    }
}
