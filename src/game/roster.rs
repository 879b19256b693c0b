use std::{cmp::Ordering, collections::BTreeMap};

use super::{DARTS_PER_VISIT, DomainError, GameSnapshot, GameStatus, PlayerSnapshot};

/// Player bookkeeping shared by every engine.
#[derive(Debug, Clone)]
pub(super) struct Player {
    pub name: String,
    pub board: String,
    pub score: i32,
    pub rank: Option<u32>,
    pub marks: Option<BTreeMap<u8, u8>>,
}

impl Player {
    pub fn is_finished(&self) -> bool {
        self.rank.is_some()
    }
}

/// Turn order, visit and round tracking common to all styles.
#[derive(Debug, Clone)]
pub(super) struct Roster {
    style: String,
    pub players: Vec<Player>,
    pub current_player: usize,
    pub current_dart: u8,
    pub round: u32,
    pub status: GameStatus,
    next_rank: u32,
}

impl Roster {
    pub fn new(style: impl Into<String>) -> Self {
        Self {
            style: style.into(),
            players: Vec::new(),
            current_player: 0,
            current_dart: 0,
            round: 1,
            status: GameStatus::Initializing,
            next_rank: 1,
        }
    }

    pub fn add_player(
        &mut self,
        board: &str,
        name: &str,
        score: i32,
        marks: Option<BTreeMap<u8, u8>>,
    ) -> Result<(), DomainError> {
        if !self.status.accepts_players() {
            return Err(DomainError::AlreadyStarted);
        }
        self.players.push(Player {
            name: name.to_string(),
            board: board.to_string(),
            score,
            rank: None,
            marks,
        });
        self.status = GameStatus::Ready;
        Ok(())
    }

    /// Fail unless a dart can be applied right now.
    pub fn ensure_accepts_dart(&self) -> Result<(), DomainError> {
        match self.status {
            GameStatus::Over => Err(DomainError::GameOver),
            _ if self.players.is_empty() => Err(DomainError::NoPlayers),
            _ => Ok(()),
        }
    }

    /// Mark the game as started once the first dart is accepted.
    pub fn begin_dart(&mut self) {
        if self.status == GameStatus::Ready {
            self.status = GameStatus::Playing;
        }
    }

    pub fn current(&self) -> &Player {
        &self.players[self.current_player]
    }

    pub fn current_mut(&mut self) -> &mut Player {
        &mut self.players[self.current_player]
    }

    /// Count the dart just thrown; passes the turn once the visit is complete.
    pub fn count_dart(&mut self) {
        self.current_dart += 1;
        if self.current_dart >= DARTS_PER_VISIT {
            self.advance();
        }
    }

    /// Whether the current visit is the last one before play wraps to a new round.
    pub fn is_last_visit_of_round(&self) -> bool {
        self.next_player_index() <= self.current_player
    }

    /// Pass the turn to the next unfinished player.
    pub fn advance(&mut self) {
        let next = self.next_player_index();
        if next <= self.current_player {
            self.round += 1;
        }
        self.current_player = next;
        self.current_dart = 0;
    }

    fn next_player_index(&self) -> usize {
        let count = self.players.len();
        (1..=count)
            .map(|offset| (self.current_player + offset) % count)
            .find(|&index| !self.players[index].is_finished())
            .unwrap_or(self.current_player)
    }

    /// Give the current player the next rank, then either end the game or pass the turn.
    pub fn finish_current(&mut self) {
        let rank = self.next_rank;
        self.next_rank += 1;
        self.current_mut().rank = Some(rank);

        let remaining: Vec<usize> = self
            .players
            .iter()
            .enumerate()
            .filter(|(_, player)| !player.is_finished())
            .map(|(index, _)| index)
            .collect();

        match remaining.as_slice() {
            [] => self.status = GameStatus::Over,
            [last] if self.players.len() > 1 => {
                let rank = self.next_rank;
                self.next_rank += 1;
                self.players[*last].rank = Some(rank);
                self.status = GameStatus::Over;
            }
            _ => self.advance(),
        }
    }

    /// End the game, ranking every player with `order` (best first, ties share a rank).
    pub fn rank_all_and_end<F>(&mut self, order: F)
    where
        F: Fn(&Player, &Player) -> Ordering,
    {
        let mut indexes: Vec<usize> = (0..self.players.len()).collect();
        indexes.sort_by(|&a, &b| order(&self.players[a], &self.players[b]));

        let mut previous: Option<usize> = None;
        for (position, &index) in indexes.iter().enumerate() {
            let rank = match previous {
                Some(prev)
                    if order(&self.players[prev], &self.players[index]) == Ordering::Equal =>
                {
                    self.players[prev].rank.unwrap_or(1)
                }
                _ => position as u32 + 1,
            };
            self.players[index].rank = Some(rank);
            previous = Some(index);
        }
        self.status = GameStatus::Over;
    }

    /// Abort the game if `board` hosts one of its players. Returns whether it can continue.
    pub fn board_has_left(&mut self, board: &str) -> bool {
        let hosts_player = self.players.iter().any(|player| player.board == board);
        if !hosts_player {
            return true;
        }
        self.status = GameStatus::Over;
        false
    }

    pub fn snapshot(&self) -> GameSnapshot {
        GameSnapshot {
            style: self.style.clone(),
            players: self
                .players
                .iter()
                .map(|player| PlayerSnapshot {
                    name: player.name.clone(),
                    board: player.board.clone(),
                    score: player.score,
                    rank: player.rank,
                    marks: player.marks.clone(),
                })
                .collect(),
            current_player: self.current_player,
            current_dart: self.current_dart,
            round: self.round,
            ongoing: self.status,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roster_with(names: &[&str]) -> Roster {
        let mut roster = Roster::new("test");
        for name in names {
            roster.add_player("board", name, 0, None).unwrap();
        }
        roster
    }

    #[test]
    fn turn_passes_after_three_darts_and_wraps_rounds() {
        let mut roster = roster_with(&["a", "b"]);
        for _ in 0..3 {
            roster.count_dart();
        }
        assert_eq!(roster.current_player, 1);
        assert_eq!(roster.round, 1);
        for _ in 0..3 {
            roster.count_dart();
        }
        assert_eq!(roster.current_player, 0);
        assert_eq!(roster.round, 2);
    }

    #[test]
    fn finished_players_are_skipped() {
        let mut roster = roster_with(&["a", "b", "c"]);
        roster.finish_current();
        assert_eq!(roster.current_player, 1);
        roster.advance();
        assert_eq!(roster.current_player, 2);
        roster.advance();
        assert_eq!(roster.current_player, 1);
    }

    #[test]
    fn last_unfinished_player_takes_last_rank() {
        let mut roster = roster_with(&["a", "b"]);
        roster.finish_current();
        assert_eq!(roster.status, GameStatus::Over);
        assert_eq!(roster.players[0].rank, Some(1));
        assert_eq!(roster.players[1].rank, Some(2));
    }

    #[test]
    fn ties_share_a_rank() {
        let mut roster = roster_with(&["a", "b", "c"]);
        roster.players[0].score = 10;
        roster.players[1].score = 30;
        roster.players[2].score = 10;
        roster.rank_all_and_end(|a, b| b.score.cmp(&a.score));
        assert_eq!(roster.players[1].rank, Some(1));
        assert_eq!(roster.players[0].rank, Some(2));
        assert_eq!(roster.players[2].rank, Some(2));
    }

    #[test]
    fn players_cannot_join_after_first_dart() {
        let mut roster = roster_with(&["a"]);
        roster.begin_dart();
        assert_eq!(
            roster.add_player("board", "late", 0, None),
            Err(DomainError::AlreadyStarted)
        );
    }
}
