//! Registration table mapping style codes to engine constructors.

use super::{
    CountUp, CountUpOptions, Cricket, CricketOptions, Game, Highest, HighestOptions, X01,
    X01Options,
};

/// A selectable game style and the engine it builds.
pub struct GameStyle {
    /// Code clients send when creating a game.
    pub code: &'static str,
    /// Human-readable label.
    pub description: &'static str,
    build: fn(&str) -> Box<dyn Game>,
}

impl GameStyle {
    /// Build a fresh engine for this style.
    pub fn create(&self) -> Box<dyn Game> {
        (self.build)(self.code)
    }
}

impl std::fmt::Debug for GameStyle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GameStyle")
            .field("code", &self.code)
            .finish_non_exhaustive()
    }
}

/// Every style the server knows how to run.
pub static STYLES: &[GameStyle] = &[
    GameStyle {
        code: "301",
        description: "301",
        build: x01_301,
    },
    GameStyle {
        code: "301-double-out",
        description: "301 double out",
        build: x01_301_double_out,
    },
    GameStyle {
        code: "501",
        description: "501",
        build: x01_501,
    },
    GameStyle {
        code: "501-double-out",
        description: "501 double out",
        build: x01_501_double_out,
    },
    GameStyle {
        code: "highest-3",
        description: "Highest score in 3 rounds",
        build: highest_3,
    },
    GameStyle {
        code: "highest-5",
        description: "Highest score in 5 rounds",
        build: highest_5,
    },
    GameStyle {
        code: "countup-300",
        description: "Count up to 300",
        build: count_up_300,
    },
    GameStyle {
        code: "countup-500",
        description: "Count up to 500",
        build: count_up_500,
    },
    GameStyle {
        code: "countup-900",
        description: "Count up to 900",
        build: count_up_900,
    },
    GameStyle {
        code: "cricket",
        description: "Cricket",
        build: cricket,
    },
    GameStyle {
        code: "cricket-cut-throat",
        description: "Cut-throat cricket",
        build: cricket_cut_throat,
    },
    GameStyle {
        code: "cricket-no-score",
        description: "Cricket without score",
        build: cricket_no_score,
    },
];

/// Look a style up by its code.
pub fn find(code: &str) -> Option<&'static GameStyle> {
    STYLES.iter().find(|style| style.code == code)
}

fn x01(style: &str, score: i32, double_out: bool) -> Box<dyn Game> {
    Box::new(X01::new(style, X01Options { score, double_out }))
}

fn x01_301(style: &str) -> Box<dyn Game> {
    x01(style, 301, false)
}

fn x01_301_double_out(style: &str) -> Box<dyn Game> {
    x01(style, 301, true)
}

fn x01_501(style: &str) -> Box<dyn Game> {
    x01(style, 501, false)
}

fn x01_501_double_out(style: &str) -> Box<dyn Game> {
    x01(style, 501, true)
}

fn highest_3(style: &str) -> Box<dyn Game> {
    Box::new(Highest::new(style, HighestOptions { rounds: 3 }))
}

fn highest_5(style: &str) -> Box<dyn Game> {
    Box::new(Highest::new(style, HighestOptions { rounds: 5 }))
}

fn count_up(style: &str, target: i32) -> Box<dyn Game> {
    Box::new(CountUp::new(style, CountUpOptions { target }))
}

fn count_up_300(style: &str) -> Box<dyn Game> {
    count_up(style, 300)
}

fn count_up_500(style: &str) -> Box<dyn Game> {
    count_up(style, 500)
}

fn count_up_900(style: &str) -> Box<dyn Game> {
    count_up(style, 900)
}

fn cricket(style: &str) -> Box<dyn Game> {
    Box::new(Cricket::new(style, CricketOptions::default()))
}

fn cricket_cut_throat(style: &str) -> Box<dyn Game> {
    Box::new(Cricket::new(
        style,
        CricketOptions {
            cut_throat: true,
            no_score: false,
        },
    ))
}

fn cricket_no_score(style: &str) -> Box<dyn Game> {
    Box::new(Cricket::new(
        style,
        CricketOptions {
            cut_throat: false,
            no_score: true,
        },
    ))
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;
    use crate::game::GameStatus;

    #[test]
    fn codes_are_unique() {
        let codes: HashSet<_> = STYLES.iter().map(|style| style.code).collect();
        assert_eq!(codes.len(), STYLES.len());
    }

    #[test]
    fn every_style_builds_an_empty_game() {
        for style in STYLES {
            let snapshot = style.create().snapshot();
            assert_eq!(snapshot.style, style.code);
            assert_eq!(snapshot.ongoing, GameStatus::Initializing);
            assert!(snapshot.players.is_empty());
        }
    }

    #[test]
    fn unknown_code_is_not_found() {
        assert!(find("shanghai").is_none());
        assert_eq!(find("301-double-out").map(|style| style.code), Some("301-double-out"));
    }
}
