use super::{DARTS_PER_VISIT, DomainError, Game, GameSnapshot, GameStatus, Sector, roster::Roster};

/// Fixed options of a highest-score game.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HighestOptions {
    /// Number of rounds played before the game ends.
    pub rounds: u32,
}

/// Fixed-round game won by the highest total.
#[derive(Debug, Clone)]
pub struct Highest {
    options: HighestOptions,
    roster: Roster,
}

impl Highest {
    /// Create a game with no players.
    pub fn new(style: &str, options: HighestOptions) -> Self {
        Self {
            options,
            roster: Roster::new(style),
        }
    }
}

impl Game for Highest {
    fn add_player(&mut self, board: &str, name: &str) -> Result<(), DomainError> {
        self.roster.add_player(board, name, 0, None)
    }

    fn snapshot(&self) -> GameSnapshot {
        self.roster.snapshot()
    }

    fn handle_dart(&mut self, sector: Sector) -> Result<GameSnapshot, DomainError> {
        self.roster.ensure_accepts_dart()?;
        self.roster.begin_dart();

        self.roster.current_mut().score += sector.points();

        let visit_complete = self.roster.current_dart + 1 >= DARTS_PER_VISIT;
        if visit_complete
            && self.roster.round >= self.options.rounds
            && self.roster.is_last_visit_of_round()
        {
            self.roster.current_dart += 1;
            self.roster.rank_all_and_end(|a, b| b.score.cmp(&a.score));
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
