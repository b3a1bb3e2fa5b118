//! Named defaults for board geometry, scoring and the move evaluator.
//!
//! Board size is chosen once per game at runtime (see [`crate::config`]);
//! these values are the defaults and the fixed weights of the heuristic.

// =============================================================================
// Board Geometry
// =============================================================================

/// Default board size (NxN).
pub const DEFAULT_BOARD_SIZE: usize = 19;

/// Smallest accepted board size.
pub const MIN_BOARD_SIZE: usize = 2;

/// Largest accepted board size, bounded by the vertex letters below.
pub const MAX_BOARD_SIZE: usize = 25;

/// Column letters used in text coordinates. `I` is skipped by Go convention.
pub const COLUMN_LETTERS: &[u8; 25] = b"ABCDEFGHJKLMNOPQRSTUVWXYZ";

// =============================================================================
// Scoring
// =============================================================================

/// Compensation added to White's area for moving second.
pub const DEFAULT_KOMI: f64 = 6.5;

/// Number of consecutive passes that ends the game.
pub const PASSES_TO_END: u8 = 2;

// =============================================================================
// Move Evaluator
// =============================================================================

/// Lowest selectable AI level.
pub const MIN_AI_LEVEL: u8 = 1;

/// Highest selectable AI level.
pub const MAX_AI_LEVEL: u8 = 9;

/// Base strength before the per-level increment.
pub const STRENGTH_BASE: f64 = 0.5;

/// Strength gained per AI level.
pub const STRENGTH_PER_LEVEL: f64 = 0.05;

/// Bonus for a star point (hoshi).
pub const STAR_POINT_BONUS: i32 = 3;

/// Penalty for a point on the outermost ring.
pub const EDGE_PENALTY: i32 = 2;

/// The candidate pool never shrinks below this many moves (unless fewer exist).
pub const MIN_CANDIDATES: usize = 3;

/// Heuristic score above which a move is labelled aggressive.
pub const AGGRESSIVE_THRESHOLD: i32 = 5;

/// Heuristic score above which a move is labelled balanced.
pub const BALANCED_THRESHOLD: i32 = 2;

// =============================================================================
// Neighbor Offsets
// =============================================================================

/// Orthogonal offsets (dx, dy). Order: North, East, South, West.
pub const ORTHOGONAL: [(isize, isize); 4] = [(0, -1), (1, 0), (0, 1), (-1, 0)];

/// All eight surrounding offsets (dx, dy), orthogonal first then diagonal.
pub const SURROUNDING: [(isize, isize); 8] = [
    (0, -1),
    (1, 0),
    (0, 1),
    (-1, 0),
    (1, -1),
    (1, 1),
    (-1, 1),
    (-1, -1),
];

// =============================================================================
// Text Representation
// =============================================================================

/// Black stone in board diagrams.
pub const STONE_BLACK: char = 'X';

/// White stone in board diagrams.
pub const STONE_WHITE: char = 'O';

/// Empty point in board diagrams.
pub const EMPTY: char = '.';
