//! Heuristic move evaluator.
//!
//! Every empty point gets a static score from three terms:
//! - star point bonus ([`STAR_POINT_BONUS`])
//! - edge penalty ([`EDGE_PENALTY`]) on the outermost ring
//! - local influence: +1 for each of the mover's stones among the eight
//!   surrounding points, -1 for each opponent stone
//!
//! Points are ranked by score and one is drawn uniformly from the top of the
//! ranking; a stronger level draws from a smaller pool. This is a single
//! O(board area) pass with no lookahead. It does not check legality: the
//! caller validates the returned point through [`crate::rules`].

use serde::{Deserialize, Serialize};

use crate::board::{Board, Color, Point};
use crate::constants::{
    AGGRESSIVE_THRESHOLD, BALANCED_THRESHOLD, EDGE_PENALTY, MAX_AI_LEVEL, MIN_AI_LEVEL,
    MIN_CANDIDATES, STAR_POINT_BONUS, STRENGTH_BASE, STRENGTH_PER_LEVEL,
};

/// An empty point and its heuristic score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoredPoint {
    pub point: Point,
    pub score: i32,
}

/// Coarse label for a chosen move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Assessment {
    /// Strong local presence.
    Aggressive,
    /// Sound opening or framework point.
    Balanced,
    /// Quiet move.
    Solid,
}

impl Assessment {
    pub fn from_score(score: i32) -> Self {
        if score > AGGRESSIVE_THRESHOLD {
            Assessment::Aggressive
        } else if score > BALANCED_THRESHOLD {
            Assessment::Balanced
        } else {
            Assessment::Solid
        }
    }
}

/// Strength in [0, 1] for an AI level; levels outside 1..=9 are clamped.
pub fn strength_for_level(level: u8) -> f64 {
    let level = level.clamp(MIN_AI_LEVEL, MAX_AI_LEVEL);
    STRENGTH_BASE + f64::from(level) * STRENGTH_PER_LEVEL
}

/// Lines carrying star points: 4-4 points and the center on large boards,
/// 3-3 points on small ones. Boards under 7x7 have none.
fn star_lines(size: usize) -> Option<[usize; 3]> {
    match size {
        s if s >= 13 => Some([3, s / 2, s - 4]),
        s if s >= 7 => Some([2, s / 2, s - 3]),
        _ => None,
    }
}

/// Is `pt` one of the nine star points of a `size` board?
pub fn is_star_point(size: usize, pt: Point) -> bool {
    star_lines(size).is_some_and(|lines| lines.contains(&pt.x) && lines.contains(&pt.y))
}

/// Net count of `color` stones minus opponent stones among the eight points around `pt`.
pub fn influence(board: &Board, pt: Point, color: Color) -> i32 {
    board
        .surrounding(pt)
        .filter_map(|n| board.get(n))
        .map(|c| if c == color { 1 } else { -1 })
        .sum()
}

/// Heuristic score of an empty point from `color`'s point of view.
pub fn evaluate_point(board: &Board, pt: Point, color: Color) -> i32 {
    let mut score = 0;
    if is_star_point(board.size(), pt) {
        score += STAR_POINT_BONUS;
    }
    if board.is_edge(pt) {
        score -= EDGE_PENALTY;
    }
    score + influence(board, pt, color)
}

/// All empty points, best first. Ties keep row-major order.
pub fn ranked_moves(board: &Board, color: Color) -> Vec<ScoredPoint> {
    let mut moves: Vec<ScoredPoint> = board
        .empty_points()
        .map(|point| ScoredPoint {
            point,
            score: evaluate_point(board, point, color),
        })
        .collect();
    moves.sort_by(|a, b| b.score.cmp(&a.score));
    moves
}

/// Number of top-ranked moves to draw from: `max(3, ceil(n * (1 - strength)))`,
/// never more than `n`.
pub fn candidate_pool_size(move_count: usize, strength: f64) -> usize {
    let strength = strength.clamp(0.0, 1.0);
    let scaled = (move_count as f64 * (1.0 - strength)).ceil() as usize;
    scaled.max(MIN_CANDIDATES).min(move_count)
}

/// Pick a move for `color`. `None` only when the board has no empty point.
pub fn propose_move(board: &Board, color: Color, strength: f64, rng: &mut fastrand::Rng) -> Option<Point> {
    choose(&ranked_moves(board, color), strength, rng).map(|m| m.point)
}

/// Draw uniformly from the top of an already ranked list.
pub(crate) fn choose(ranked: &[ScoredPoint], strength: f64, rng: &mut fastrand::Rng) -> Option<ScoredPoint> {
    let pool = candidate_pool_size(ranked.len(), strength);
    if pool == 0 {
        return None;
    }
    let pick = ranked[rng.usize(..pool)];
    tracing::trace!(pool, candidates = ranked.len(), score = pick.score, "ai pick");
    Some(pick)
}
