//! Connected groups and their liberties.
//!
//! Pure functions over a board snapshot. Visited sets are flat `Vec<bool>`
//! indexed like the board, so a flood-fill costs O(points visited).

use crate::board::{Board, Color, Point};

/// Collect the maximal orthogonally-connected group of `color` containing `origin`.
///
/// Returns an empty group if `origin` does not hold a `color` stone.
/// Points are returned in discovery order, each exactly once.
pub fn find_group(board: &Board, origin: Point, color: Color) -> Vec<Point> {
    if board.get(origin) != Some(color) {
        return Vec::new();
    }

    let mut visited = vec![false; board.area()];
    let mut stack = vec![origin];
    let mut group = Vec::new();
    visited[board.index(origin)] = true;

    while let Some(pt) = stack.pop() {
        group.push(pt);
        for n in board.neighbors(pt) {
            let ni = board.index(n);
            if !visited[ni] && board.get(n) == Some(color) {
                visited[ni] = true;
                stack.push(n);
            }
        }
    }
    group
}

/// Empty points orthogonally adjacent to any stone of `group`, each listed once.
pub fn liberties(board: &Board, group: &[Point]) -> Vec<Point> {
    let mut seen = vec![false; board.area()];
    let mut libs = Vec::new();

    for &pt in group {
        for n in board.neighbors(pt) {
            let ni = board.index(n);
            if !seen[ni] && board.get(n).is_none() {
                seen[ni] = true;
                libs.push(n);
            }
        }
    }
    libs
}

/// Does the group of `color` containing `origin` have at least one liberty?
///
/// Stops at the first liberty found, which makes it cheaper than
/// `liberties(..).is_empty()` for capture tests.
pub fn has_liberty(board: &Board, origin: Point, color: Color) -> bool {
    if board.get(origin) != Some(color) {
        return false;
    }

    let mut visited = vec![false; board.area()];
    let mut stack = vec![origin];
    visited[board.index(origin)] = true;

    while let Some(pt) = stack.pop() {
        for n in board.neighbors(pt) {
            match board.get(n) {
                None => return true,
                Some(c) if c == color => {
                    let ni = board.index(n);
                    if !visited[ni] {
                        visited[ni] = true;
                        stack.push(n);
                    }
                }
                _ => {}
            }
        }
    }
    false
}
