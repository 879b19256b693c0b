use super::{DomainError, Game, GameSnapshot, GameStatus, Sector, roster::Roster};

/// Fixed options of a countdown game.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct X01Options {
    /// Starting score of every player (301, 501, ...).
    pub score: i32,
    /// Whether the last dart must land in a double.
    pub double_out: bool,
}

/// Countdown game: players race from a starting score down to exactly zero.
#[derive(Debug, Clone)]
pub struct X01 {
    options: X01Options,
    roster: Roster,
    visit_start: i32,
}

impl X01 {
    /// Create a game with no players.
    pub fn new(style: &str, options: X01Options) -> Self {
        Self {
            options,
            roster: Roster::new(style),
            visit_start: options.score,
        }
    }

    fn is_bust(&self, remaining: i32, sector: &Sector) -> bool {
        if remaining < 0 {
            return true;
        }
        if self.options.double_out {
            return remaining == 1 || (remaining == 0 && !sector.is_double());
        }
        false
    }
}

impl Game for X01 {
    fn add_player(&mut self, board: &str, name: &str) -> Result<(), DomainError> {
        self.roster.add_player(board, name, self.options.score, None)
    }

    fn snapshot(&self) -> GameSnapshot {
        self.roster.snapshot()
    }

    fn handle_dart(&mut self, sector: Sector) -> Result<GameSnapshot, DomainError> {
        self.roster.ensure_accepts_dart()?;
        self.roster.begin_dart();

        if self.roster.current_dart == 0 {
            self.visit_start = self.roster.current().score;
        }

        let remaining = self.roster.current().score - sector.points();
        if self.is_bust(remaining, &sector) {
            self.roster.current_mut().score = self.visit_start;
            self.roster.advance();
        } else if remaining == 0 {
            self.roster.current_mut().score = 0;
            self.roster.finish_current();
        } else {
            self.roster.current_mut().score = remaining;
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
