//! Area scoring (Chinese rules).
//!
//! A player's area is their stones on the board plus every empty region that
//! borders only their stones. Regions touching both colors (or neither, as on
//! an empty board) are neutral. Komi is added to White.

use serde::{Deserialize, Serialize};

use crate::board::{Board, Color, Point};
use crate::constants::PASSES_TO_END;
use crate::game::{MoveRecord, Play};

/// Empty points split by owner.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Territory {
    pub black: Vec<Point>,
    pub white: Vec<Point>,
    pub neutral: Vec<Point>,
}

/// Final area totals, komi included in `white`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Score {
    pub black: f64,
    pub white: f64,
}

impl Score {
    /// The color with strictly more area, or `None` on a tie.
    pub fn winner(&self) -> Option<Color> {
        if self.black > self.white {
            Some(Color::Black)
        } else if self.white > self.black {
            Some(Color::White)
        } else {
            None
        }
    }

    /// Winning margin; zero on a tie.
    pub fn margin(&self) -> f64 {
        (self.black - self.white).abs()
    }
}

impl std::fmt::Display for Score {
    /// Result in the usual `B+3.5` / `W+6.5` / `0` notation.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.winner() {
            Some(Color::Black) => write!(f, "B+{}", self.margin()),
            Some(Color::White) => write!(f, "W+{}", self.margin()),
            None => write!(f, "0"),
        }
    }
}

/// Flood-fill every maximal empty region and assign it an owner.
pub fn territory(board: &Board) -> Territory {
    let mut visited = vec![false; board.area()];
    let mut result = Territory::default();

    for start in board.empty_points() {
        if visited[board.index(start)] {
            continue;
        }

        let mut region = Vec::new();
        let mut touches_black = false;
        let mut touches_white = false;
        let mut stack = vec![start];
        visited[board.index(start)] = true;

        while let Some(pt) = stack.pop() {
            region.push(pt);
            for n in board.neighbors(pt) {
                match board.get(n) {
                    Some(Color::Black) => touches_black = true,
                    Some(Color::White) => touches_white = true,
                    None => {
                        let ni = board.index(n);
                        if !visited[ni] {
                            visited[ni] = true;
                            stack.push(n);
                        }
                    }
                }
            }
        }

        let owner = match (touches_black, touches_white) {
            (true, false) => &mut result.black,
            (false, true) => &mut result.white,
            _ => &mut result.neutral,
        };
        owner.extend(region);
    }

    result.black.sort();
    result.white.sort();
    result.neutral.sort();
    result
}

/// Area score of `board` with `komi` added to White.
pub fn score(board: &Board, komi: f64) -> Score {
    let t = territory(board);
    Score {
        black: (board.count(Color::Black) + t.black.len()) as f64,
        white: (board.count(Color::White) + t.white.len()) as f64 + komi,
    }
}

/// True once the last record is a resignation or the last two are passes.
///
/// An empty history is never terminal.
pub fn is_terminal(history: &[MoveRecord]) -> bool {
    match history.last() {
        None => false,
        Some(last) if last.play == Play::Resign => true,
        Some(_) => {
            let passes = PASSES_TO_END as usize;
            history.len() >= passes
                && history[history.len() - passes..]
                    .iter()
                    .all(|r| r.play == Play::Pass)
        }
    }
}
