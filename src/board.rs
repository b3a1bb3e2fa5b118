//! Board geometry and stone storage.
//!
//! The board is a flat `Vec<Option<Color>>` indexed by `y * size + x`, so
//! occupancy checks inside flood-fills are O(1). A cell holds at most one
//! stone by construction.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::constants::{COLUMN_LETTERS, EMPTY, ORTHOGONAL, STONE_BLACK, STONE_WHITE, SURROUNDING};

/// Stone color. Black moves first.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Color {
    Black,
    White,
}

impl Color {
    /// The other color.
    #[inline]
    pub fn opponent(self) -> Color {
        match self {
            Color::Black => Color::White,
            Color::White => Color::Black,
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Color::Black => write!(f, "black"),
            Color::White => write!(f, "white"),
        }
    }
}

/// A board coordinate: `x` is the column, `y` the row (row 0 at the top).
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Point {
    pub x: usize,
    pub y: usize,
}

impl Point {
    pub const fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }

    /// Offset by `(dx, dy)`, or `None` if the result would be negative.
    fn offset(self, (dx, dy): (isize, isize)) -> Option<Point> {
        Some(Point {
            x: self.x.checked_add_signed(dx)?,
            y: self.y.checked_add_signed(dy)?,
        })
    }
}

/// An NxN Go board.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawBoard")]
pub struct Board {
    size: usize,
    cells: Vec<Option<Color>>,
}

/// Board fields as read from disk, before the shape is checked.
#[derive(Deserialize)]
struct RawBoard {
    size: usize,
    cells: Vec<Option<Color>>,
}

impl TryFrom<RawBoard> for Board {
    type Error = String;

    fn try_from(raw: RawBoard) -> Result<Self, Self::Error> {
        let expected = raw.size.checked_mul(raw.size).ok_or("board size overflows")?;
        if raw.cells.len() != expected {
            return Err(format!(
                "board of size {} needs {expected} cells, found {}",
                raw.size,
                raw.cells.len()
            ));
        }
        Ok(Board {
            size: raw.size,
            cells: raw.cells,
        })
    }
}

impl Board {
    pub fn new(size: usize) -> Self {
        Self {
            size,
            cells: vec![None; size * size],
        }
    }

    /// Build a board from diagram rows (`X` black, `O` white, `.` empty).
    ///
    /// Whitespace inside a row is ignored, so rows may be written spaced out.
    /// Returns `None` if the rows do not form a square or contain other characters.
    pub fn from_rows(rows: &[&str]) -> Option<Self> {
        let size = rows.len();
        let mut board = Board::new(size);
        for (y, row) in rows.iter().enumerate() {
            let cells: Vec<char> = row.chars().filter(|c| !c.is_whitespace()).collect();
            if cells.len() != size {
                return None;
            }
            for (x, ch) in cells.into_iter().enumerate() {
                let stone = match ch {
                    STONE_BLACK => Some(Color::Black),
                    STONE_WHITE => Some(Color::White),
                    EMPTY => None,
                    _ => return None,
                };
                board.cells[y * size + x] = stone;
            }
        }
        Some(board)
    }

    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    /// Total number of points on the board.
    #[inline]
    pub fn area(&self) -> usize {
        self.size * self.size
    }

    #[inline]
    pub fn contains(&self, pt: Point) -> bool {
        pt.x < self.size && pt.y < self.size
    }

    /// Flat index of an in-bounds point.
    #[inline]
    pub fn index(&self, pt: Point) -> usize {
        pt.y * self.size + pt.x
    }

    /// Point at a flat index.
    #[inline]
    pub fn point(&self, idx: usize) -> Point {
        Point::new(idx % self.size, idx / self.size)
    }

    /// Stone at `pt`; `None` for empty or out-of-bounds points.
    #[inline]
    pub fn get(&self, pt: Point) -> Option<Color> {
        if !self.contains(pt) {
            return None;
        }
        self.cells[self.index(pt)]
    }

    #[inline]
    pub fn is_empty_at(&self, pt: Point) -> bool {
        self.contains(pt) && self.cells[self.index(pt)].is_none()
    }

    /// Put a stone on `pt`, replacing whatever was there. Out-of-bounds is ignored.
    pub fn place(&mut self, pt: Point, color: Color) {
        if self.contains(pt) {
            let idx = self.index(pt);
            self.cells[idx] = Some(color);
        }
    }

    /// Clear `pt`. Out-of-bounds is ignored.
    pub fn remove(&mut self, pt: Point) {
        if self.contains(pt) {
            let idx = self.index(pt);
            self.cells[idx] = None;
        }
    }

    /// In-bounds orthogonal neighbors of `pt`.
    pub fn neighbors(&self, pt: Point) -> impl Iterator<Item = Point> + '_ {
        ORTHOGONAL
            .iter()
            .filter_map(move |&d| pt.offset(d))
            .filter(move |&n| self.contains(n))
    }

    /// In-bounds orthogonal and diagonal neighbors of `pt`.
    pub fn surrounding(&self, pt: Point) -> impl Iterator<Item = Point> + '_ {
        SURROUNDING
            .iter()
            .filter_map(move |&d| pt.offset(d))
            .filter(move |&n| self.contains(n))
    }

    /// Every point in row-major order.
    pub fn points(&self) -> impl Iterator<Item = Point> + '_ {
        (0..self.area()).map(move |i| self.point(i))
    }

    /// Every empty point in row-major order.
    pub fn empty_points(&self) -> impl Iterator<Item = Point> + '_ {
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, c)| c.is_none())
            .map(move |(i, _)| self.point(i))
    }

    /// Number of stones of `color` on the board.
    pub fn count(&self, color: Color) -> usize {
        self.cells.iter().filter(|&&c| c == Some(color)).count()
    }

    /// True if no stone is on the board.
    pub fn is_clear(&self) -> bool {
        self.cells.iter().all(Option::is_none)
    }

    /// True if the point lies on the outermost ring.
    #[inline]
    pub fn is_edge(&self, pt: Point) -> bool {
        pt.x == 0 || pt.y == 0 || pt.x + 1 == self.size || pt.y + 1 == self.size
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for y in 0..self.size {
            for x in 0..self.size {
                let ch = match self.get(Point::new(x, y)) {
                    Some(Color::Black) => STONE_BLACK,
                    Some(Color::White) => STONE_WHITE,
                    None => EMPTY,
                };
                write!(f, "{ch} ")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// Parse a text coordinate (e.g. `"D4"`) for a board of `size`.
///
/// Columns are letters A-Z skipping I, rows count up from 1 at the bottom.
/// Returns `None` for anything that is not a point on the board.
pub fn parse_coord(s: &str, size: usize) -> Option<Point> {
    let s = s.trim();
    let mut chars = s.chars();
    let col_char = chars.next()?.to_ascii_uppercase();
    let x = COLUMN_LETTERS.iter().position(|&c| c as char == col_char)?;
    let row: usize = chars.as_str().parse().ok()?;
    if x >= size || row == 0 || row > size {
        return None;
    }
    Some(Point::new(x, size - row))
}

/// Format a point as a text coordinate (e.g. `"D4"`) for a board of `size`.
pub fn str_coord(pt: Point, size: usize) -> String {
    let col = COLUMN_LETTERS.get(pt.x).map(|&c| c as char).unwrap_or('?');
    format!("{col}{}", size.saturating_sub(pt.y))
}
