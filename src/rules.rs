//! Move legality and capture resolution.
//!
//! A move is validated on a scratch copy of the board; callers only ever see
//! the finished board or an [`IllegalMove`] reason, never a partial update.
//!
//! Checks run in a fixed order and stop at the first failure:
//! bounds, occupancy, turn, captures, suicide, ko.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::board::{Board, Color, Point};
use crate::group::{find_group, has_liberty};

/// Why a stone cannot be placed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum IllegalMove {
    #[error("illegal move: point is off the board")]
    OutOfBounds,
    #[error("illegal move: point not empty")]
    Occupied,
    #[error("illegal move: not this color's turn")]
    WrongTurn,
    #[error("illegal move: suicide")]
    Suicide,
    #[error("illegal move: retakes ko")]
    KoViolation,
}

/// The parts of a game a move is checked against.
#[derive(Debug, Clone, Copy)]
pub struct Position<'a> {
    /// Current board.
    pub board: &'a Board,
    /// Color whose turn it is.
    pub to_move: Color,
    /// Board as it stood before the most recent move, if any. A single-stone
    /// capture that recreates it is a ko retake.
    pub ko_reference: Option<&'a Board>,
}

/// A legal move's effect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveOutcome {
    /// Board after placement and captures.
    pub board: Board,
    /// Removed opponent stones, sorted.
    pub captured: Vec<Point>,
}

/// Validate `color` playing at `pt` and compute the resulting board.
pub fn try_move(pos: &Position<'_>, pt: Point, color: Color) -> Result<MoveOutcome, IllegalMove> {
    let board = pos.board;
    if !board.contains(pt) {
        return Err(IllegalMove::OutOfBounds);
    }
    if board.get(pt).is_some() {
        return Err(IllegalMove::Occupied);
    }
    if color != pos.to_move {
        return Err(IllegalMove::WrongTurn);
    }

    let mut next = board.clone();
    next.place(pt, color);

    // Captures come before the suicide test: removing a group can free liberties.
    let opp = color.opponent();
    let mut captured = Vec::new();
    for n in board.neighbors(pt) {
        if next.get(n) == Some(opp) && !has_liberty(&next, n, opp) {
            for stone in find_group(&next, n, opp) {
                next.remove(stone);
                captured.push(stone);
            }
        }
    }

    if !has_liberty(&next, pt, color) {
        return Err(IllegalMove::Suicide);
    }

    if captured.len() == 1 && pos.ko_reference == Some(&next) {
        return Err(IllegalMove::KoViolation);
    }

    captured.sort();
    Ok(MoveOutcome {
        board: next,
        captured,
    })
}

/// Every point where `pos.to_move` may legally play.
pub fn legal_moves(pos: &Position<'_>) -> Vec<Point> {
    pos.board
        .empty_points()
        .filter(|&pt| try_move(pos, pt, pos.to_move).is_ok())
        .collect()
}
