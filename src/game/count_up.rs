use super::{DomainError, Game, GameSnapshot, GameStatus, Sector, roster::Roster};

/// Fixed options of a count-up game.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CountUpOptions {
    /// Score a player must reach to finish.
    pub target: i32,
}

/// Race from zero up to a target score.
#[derive(Debug, Clone)]
pub struct CountUp {
    options: CountUpOptions,
    roster: Roster,
}

impl CountUp {
    /// Create a game with no players.
    pub fn new(style: &str, options: CountUpOptions) -> Self {
        Self {
            options,
            roster: Roster::new(style),
        }
    }
}

impl Game for CountUp {
    fn add_player(&mut self, board: &str, name: &str) -> Result<(), DomainError> {
        self.roster.add_player(board, name, 0, None)
    }

    fn snapshot(&self) -> GameSnapshot {
        self.roster.snapshot()
    }

    fn handle_dart(&mut self, sector: Sector) -> Result<GameSnapshot, DomainError> {
        self.roster.ensure_accepts_dart()?;
        self.roster.begin_dart();

        let player = self.roster.current_mut();
        player.score += sector.points();
        if player.score >= self.options.target {
            self.roster.finish_current();
        } else {
            self.roster.count_dart();
        }

        Ok(self.roster.snapshot())
    }

    fn board_has_left(&mut self, board: &str) -> bool {
        self.roster.board_has_left(board)
    }

    fn status(&self) -> GameStatus {
        self.roster.status
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reaching_target_finishes_player() {
        let mut game = CountUp::new("countup-100", CountUpOptions { target: 100 });
        game.add_player("A", "Alice").unwrap();
        game.add_player("B", "Bob").unwrap();

        game.handle_dart(Sector::new(20, 3).unwrap()).unwrap();
        let snapshot = game.handle_dart(Sector::new(20, 2).unwrap()).unwrap();

        assert_eq!(snapshot.players[0].score, 100);
        assert_eq!(snapshot.players[0].rank, Some(1));
        assert_eq!(snapshot.players[1].rank, Some(2));
        assert_eq!(snapshot.ongoing, GameStatus::Over);
    }

    #[test]
    fn game_continues_while_several_players_remain() {
        let mut game = CountUp::new("countup-10", CountUpOptions { target: 10 });
        for name in ["a", "b", "c"] {
            game.add_player("A", name).unwrap();
        }
        let snapshot = game.handle_dart(Sector::new(10, 1).unwrap()).unwrap();
        assert_eq!(snapshot.ongoing, GameStatus::Playing);
        assert_eq!(snapshot.current_player, 1);
        assert_eq!(snapshot.current_dart, 0);
    }
}
