use std::{cmp::Ordering, collections::BTreeMap};

use super::{
    BULL, DARTS_PER_VISIT, DomainError, Game, GameSnapshot, GameStatus, Sector,
    roster::{Player, Roster},
};

/// Sectors that count in cricket.
const TARGETS: [u8; 7] = [15, 16, 17, 18, 19, 20, BULL];
/// Marks needed to close a target.
const MARKS_TO_CLOSE: u8 = 3;
/// Hard limit after which the game ends on scores.
const MAX_ROUNDS: u32 = 20;

/// Fixed options of a cricket game.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CricketOptions {
    /// Extra marks score against opponents instead of the thrower.
    pub cut_throat: bool,
    /// Extra marks never score; closing every target wins.
    pub no_score: bool,
}

/// Cricket: close 15 to 20 and the bull before the others.
#[derive(Debug, Clone)]
pub struct Cricket {
    options: CricketOptions,
    roster: Roster,
}

impl Cricket {
    /// Create a game with no players.
    pub fn new(style: &str, options: CricketOptions) -> Self {
        Self {
            options,
            roster: Roster::new(style),
        }
    }

    fn is_target(value: u8) -> bool {
        TARGETS.contains(&value)
    }

    fn apply_hit(&mut self, sector: Sector) {
        let thrower = self.roster.current_player;
        let current_marks = marks_on(&self.roster.players[thrower], sector.value);
        let closing = sector.multiplier.min(MARKS_TO_CLOSE - current_marks);
        let extra = sector.multiplier - closing;

        if let Some(marks) = self.roster.players[thrower].marks.as_mut() {
            marks.insert(sector.value, current_marks + closing);
        }

        if extra == 0 || self.options.no_score {
            return;
        }

        let points = i32::from(sector.value) * i32::from(extra);
        let open_opponents: Vec<usize> = self
            .roster
            .players
            .iter()
            .enumerate()
            .filter(|(index, player)| {
                *index != thrower && marks_on(player, sector.value) < MARKS_TO_CLOSE
            })
            .map(|(index, _)| index)
            .collect();

        if open_opponents.is_empty() {
            return;
        }

        if self.options.cut_throat {
            for index in open_opponents {
                self.roster.players[index].score += points;
            }
        } else {
            self.roster.players[thrower].score += points;
        }
    }

    fn current_has_won(&self) -> bool {
        let thrower = self.roster.current();
        if closed_targets(thrower) < TARGETS.len() {
            return false;
        }
        if self.options.no_score {
            return true;
        }
        let mut opponents = self
            .roster
            .players
            .iter()
            .enumerate()
            .filter(|(index, _)| *index != self.roster.current_player)
            .map(|(_, player)| player.score);
        if self.options.cut_throat {
            opponents.all(|score| thrower.score <= score)
        } else {
            opponents.all(|score| thrower.score >= score)
        }
    }

    fn end_game(&mut self) {
        let cut_throat = self.options.cut_throat;
        self.roster.rank_all_and_end(|a, b| standing(a, b, cut_throat));
    }
}

fn marks_on(player: &Player, target: u8) -> u8 {
    player
        .marks
        .as_ref()
        .and_then(|marks| marks.get(&target).copied())
        .unwrap_or(0)
}

fn closed_targets(player: &Player) -> usize {
    TARGETS
        .iter()
        .filter(|&&target| marks_on(player, target) >= MARKS_TO_CLOSE)
        .count()
}

/// Best player first: most closed targets, then best score for the variant.
fn standing(a: &Player, b: &Player, cut_throat: bool) -> Ordering {
    let by_score = if cut_throat {
        a.score.cmp(&b.score)
    } else {
        b.score.cmp(&a.score)
    };
    closed_targets(b).cmp(&closed_targets(a)).then(by_score)
}

impl Game for Cricket {
    fn add_player(&mut self, board: &str, name: &str) -> Result<(), DomainError> {
        let marks: BTreeMap<u8, u8> = TARGETS.iter().map(|&target| (target, 0)).collect();
        self.roster.add_player(board, name, 0, Some(marks))
    }

    fn snapshot(&self) -> GameSnapshot {
        self.roster.snapshot()
    }

    fn handle_dart(&mut self, sector: Sector) -> Result<GameSnapshot, DomainError> {
        self.roster.ensure_accepts_dart()?;
        self.roster.begin_dart();

        if Self::is_target(sector.value) {
            self.apply_hit(sector);
        }

        if self.current_has_won() {
            self.end_game();
            return Ok(self.roster.snapshot());
        }

        let visit_complete = self.roster.current_dart + 1 >= DARTS_PER_VISIT;
        if visit_complete
            && self.roster.round >= MAX_ROUNDS
            && self.roster.is_last_visit_of_round()
        {
            self.roster.current_dart += 1;
            self.end_game();
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

    fn dart(value: u8, multiplier: u8) -> Sector {
        Sector::new(value, multiplier).unwrap()
    }

    fn two_players(options: CricketOptions) -> Cricket {
        let mut game = Cricket::new("cricket", options);
        game.add_player("A", "Alice").unwrap();
        game.add_player("B", "Bob").unwrap();
        game
    }

    #[test]
    fn triple_closes_target_without_scoring() {
        let mut game = two_players(CricketOptions::default());
        let snapshot = game.handle_dart(dart(20, 3)).unwrap();
        let marks = snapshot.players[0].marks.as_ref().unwrap();
        assert_eq!(marks.get(&20), Some(&3));
        assert_eq!(snapshot.players[0].score, 0);
    }

    #[test]
    fn extra_marks_score_for_thrower() {
        let mut game = two_players(CricketOptions::default());
        game.handle_dart(dart(20, 3)).unwrap();
        let snapshot = game.handle_dart(dart(20, 2)).unwrap();
        assert_eq!(snapshot.players[0].score, 40);
        assert_eq!(snapshot.players[1].score, 0);
    }

    #[test]
    fn cut_throat_scores_against_open_opponents() {
        let mut game = two_players(CricketOptions {
            cut_throat: true,
            no_score: false,
        });
        game.handle_dart(dart(19, 3)).unwrap();
        let snapshot = game.handle_dart(dart(19, 1)).unwrap();
        assert_eq!(snapshot.players[0].score, 0);
        assert_eq!(snapshot.players[1].score, 19);
    }

    #[test]
    fn no_score_variant_never_scores() {
        let mut game = two_players(CricketOptions {
            cut_throat: false,
            no_score: true,
        });
        game.handle_dart(dart(18, 3)).unwrap();
        let snapshot = game.handle_dart(dart(18, 3)).unwrap();
        assert_eq!(snapshot.players[0].score, 0);
    }

    #[test]
    fn non_targets_only_consume_darts() {
        let mut game = two_players(CricketOptions::default());
        let snapshot = game.handle_dart(dart(3, 3)).unwrap();
        assert_eq!(snapshot.players[0].score, 0);
        assert_eq!(snapshot.current_dart, 1);
    }

    #[test]
    fn closing_everything_with_best_score_wins() {
        let mut game = Cricket::new(
            "cricket-no-score",
            CricketOptions {
                cut_throat: false,
                no_score: true,
            },
        );
        game.add_player("A", "Alice").unwrap();
        let mut last = None;
        for target in [15, 16, 17, 18, 19, 20] {
            last = Some(game.handle_dart(dart(target, 3)).unwrap());
        }
        assert_eq!(last.unwrap().ongoing, GameStatus::Playing);
        game.handle_dart(dart(BULL, 2)).unwrap();
        let snapshot = game.handle_dart(dart(BULL, 1)).unwrap();
        assert_eq!(snapshot.ongoing, GameStatus::Over);
        assert_eq!(snapshot.players[0].rank, Some(1));
    }
}
