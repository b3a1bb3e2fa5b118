//! Game state machine: turn order, pass/resign/undo, termination, and the
//! two-phase AI move protocol.
//!
//! A [`Game`] is the only owner of its board. Every command either commits a
//! complete transition or returns a [`GameError`] and leaves the game as it
//! was.
//!
//! ## AI moves
//!
//! An AI move runs in two phases so that evaluation can happen off the
//! sequencing thread:
//!
//! 1. [`Game::request_ai_move`] marks the game as thinking and hands out an
//!    [`AiTicket`] holding a board snapshot. [`AiTicket::evaluate`] is pure.
//! 2. [`Game::apply_ai_proposal`] commits the result, but only if nothing has
//!    changed since the ticket was issued. Stale proposals are dropped.
//!
//! While thinking, stone placement, pass and resign are refused with
//! [`GameError::WrongTurn`]. Undo and reset cancel the outstanding ticket.
//! Each committed mutation bumps [`Game::generation`], which hosts can also
//! poll to know when to redraw.
//!
//! ```
//! use tengen::board::{Color, Point};
//! use tengen::game::Game;
//!
//! let mut game = Game::default();
//! game.place_stone(Point::new(3, 3)).unwrap();
//! assert_eq!(game.to_move(), Color::White);
//!
//! let mut rng = fastrand::Rng::with_seed(5);
//! let ticket = game.request_ai_move().unwrap();
//! let proposal = ticket.evaluate(&mut rng);
//! game.apply_ai_proposal(proposal).unwrap();
//! assert_eq!(game.to_move(), Color::Black);
//! assert!(!game.is_thinking());
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

use crate::ai::{self, Assessment, ScoredPoint};
use crate::board::{Board, Color, Point};
use crate::config::{ConfigError, GameConfig};
use crate::constants::{MAX_AI_LEVEL, MIN_AI_LEVEL, PASSES_TO_END};
use crate::rules::{self, IllegalMove, MoveOutcome, Position};
use crate::scoring::{self, Score, Territory};

/// Why a game command was refused. The game is unchanged in every case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum GameError {
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
    #[error("game is already over")]
    GameAlreadyTerminal,
    #[error("no legal move available")]
    NoLegalMoves,
}

impl From<IllegalMove> for GameError {
    fn from(e: IllegalMove) -> Self {
        match e {
            IllegalMove::OutOfBounds => GameError::OutOfBounds,
            IllegalMove::Occupied => GameError::Occupied,
            IllegalMove::WrongTurn => GameError::WrongTurn,
            IllegalMove::Suicide => GameError::Suicide,
            IllegalMove::KoViolation => GameError::KoViolation,
        }
    }
}

/// What a player did on their turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Play {
    Place(Point),
    Pass,
    Resign,
}

/// One entry of the game history, with everything needed to undo it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveRecord {
    pub play: Play,
    pub color: Color,
    /// Opponent stones removed by this play, sorted.
    pub captured: Vec<Point>,
    /// Board immediately before this play.
    pub board_before: Board,
    /// Consecutive pass count immediately before this play.
    pub passes_before: u8,
}

/// How a finished game ended.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum EndReason {
    Resignation,
    Score(Score),
}

/// Outcome of a finished game. `winner` is `None` for a draw.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GameResult {
    pub winner: Option<Color>,
    pub reason: EndReason,
}

impl std::fmt::Display for GameResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match (self.reason, self.winner) {
            (EndReason::Resignation, Some(Color::Black)) => write!(f, "B+R"),
            (EndReason::Resignation, Some(Color::White)) => write!(f, "W+R"),
            (EndReason::Resignation, None) => write!(f, "0"),
            (EndReason::Score(score), _) => write!(f, "{score}"),
        }
    }
}

/// Coarse game phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameStatus {
    InProgress,
    Terminal { winner: Option<Color> },
}

/// Prisoners taken by each color.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Captures {
    pub black: u32,
    pub white: u32,
}

impl Captures {
    pub fn by(&self, color: Color) -> u32 {
        match color {
            Color::Black => self.black,
            Color::White => self.white,
        }
    }

    fn slot(&mut self, color: Color) -> &mut u32 {
        match color {
            Color::Black => &mut self.black,
            Color::White => &mut self.white,
        }
    }
}

/// Snapshot handed to the evaluator. Safe to move to another thread.
#[derive(Debug, Clone)]
pub struct AiTicket {
    generation: u64,
    board: Board,
    color: Color,
    strength: f64,
}

impl AiTicket {
    pub fn color(&self) -> Color {
        self.color
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn strength(&self) -> f64 {
        self.strength
    }

    /// Rank the snapshot and draw a move. Touches nothing but `rng`.
    pub fn evaluate(&self, rng: &mut fastrand::Rng) -> AiProposal {
        let ranked = ai::ranked_moves(&self.board, self.color);
        let choice = ai::choose(&ranked, self.strength, rng);
        AiProposal {
            generation: self.generation,
            choice,
            ranked,
        }
    }
}

/// Evaluator output, waiting to be applied.
#[derive(Debug, Clone)]
pub struct AiProposal {
    generation: u64,
    choice: Option<ScoredPoint>,
    ranked: Vec<ScoredPoint>,
}

impl AiProposal {
    /// The drawn point, if the snapshot had any empty point.
    pub fn choice(&self) -> Option<Point> {
        self.choice.map(|m| m.point)
    }

    pub fn assessment(&self) -> Option<Assessment> {
        self.choice.map(|m| Assessment::from_score(m.score))
    }

    /// The drawn point first, then every other point best first.
    fn candidates(&self) -> impl Iterator<Item = ScoredPoint> + '_ {
        let chosen = self.choice();
        self.choice
            .into_iter()
            .chain(self.ranked.iter().copied().filter(move |m| Some(m.point) != chosen))
    }
}

/// Result of applying an AI proposal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AiOutcome {
    Played {
        point: Point,
        captured: Vec<Point>,
        assessment: Assessment,
    },
    /// The game changed after the ticket was issued; nothing was applied.
    Discarded,
}

/// A single game of Go.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Game {
    config: GameConfig,
    board: Board,
    to_move: Color,
    captures: Captures,
    history: Vec<MoveRecord>,
    consecutive_passes: u8,
    result: Option<GameResult>,
    generation: u64,
    /// Generation at which the outstanding AI ticket was issued.
    #[serde(skip)]
    pending_ai: Option<u64>,
}

impl Default for Game {
    fn default() -> Self {
        Self::from_config(GameConfig::default())
    }
}

impl Game {
    /// Start a game with Black to move on an empty board.
    pub fn new(config: GameConfig) -> Result<Self, ConfigError> {
        Ok(Self::from_config(config.validated()?))
    }

    fn from_config(config: GameConfig) -> Self {
        Self {
            board: Board::new(config.board_size),
            config,
            to_move: Color::Black,
            captures: Captures::default(),
            history: Vec::new(),
            consecutive_passes: 0,
            result: None,
            generation: 0,
            pending_ai: None,
        }
    }

    // -------------------------------------------------------------------------
    // Queries
    // -------------------------------------------------------------------------

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn to_move(&self) -> Color {
        self.to_move
    }

    /// Stones captured by `color` so far.
    pub fn captures(&self, color: Color) -> u32 {
        self.captures.by(color)
    }

    pub fn history(&self) -> &[MoveRecord] {
        &self.history
    }

    pub fn consecutive_passes(&self) -> u8 {
        self.consecutive_passes
    }

    pub fn result(&self) -> Option<&GameResult> {
        self.result.as_ref()
    }

    pub fn winner(&self) -> Option<Color> {
        self.result.and_then(|r| r.winner)
    }

    pub fn is_terminal(&self) -> bool {
        scoring::is_terminal(&self.history)
    }

    pub fn status(&self) -> GameStatus {
        match self.result {
            Some(r) => GameStatus::Terminal { winner: r.winner },
            None => GameStatus::InProgress,
        }
    }

    /// True while an AI ticket is outstanding.
    pub fn is_thinking(&self) -> bool {
        self.pending_ai.is_some()
    }

    /// Incremented on every committed change.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn ai_level(&self) -> u8 {
        self.config.ai_level
    }

    /// Area score of the current board.
    pub fn score(&self) -> Score {
        scoring::score(&self.board, self.config.komi)
    }

    pub fn territory(&self) -> Territory {
        scoring::territory(&self.board)
    }

    /// Rule context for the next move.
    pub fn position(&self) -> Position<'_> {
        Position {
            board: &self.board,
            to_move: self.to_move,
            ko_reference: self.history.last().map(|r| &r.board_before),
        }
    }

    /// Check a move without applying it.
    pub fn try_move(&self, pt: Point, color: Color) -> Result<MoveOutcome, GameError> {
        if self.result.is_some() {
            return Err(GameError::GameAlreadyTerminal);
        }
        Ok(rules::try_move(&self.position(), pt, color)?)
    }

    // -------------------------------------------------------------------------
    // Commands
    // -------------------------------------------------------------------------

    /// Place a stone for the player to move. Returns the captured points.
    pub fn place_stone(&mut self, pt: Point) -> Result<Vec<Point>, GameError> {
        self.check_open()?;
        self.commit_place(pt, self.to_move)
    }

    /// Pass for the player to move. Returns the result if this ends the game.
    pub fn pass(&mut self) -> Result<Option<GameResult>, GameError> {
        self.check_open()?;
        Ok(self.commit_pass(self.to_move))
    }

    /// The player to move resigns.
    pub fn resign(&mut self) -> Result<GameResult, GameError> {
        self.check_open()?;
        Ok(self.commit_resign(self.to_move))
    }

    /// Apply `play` on behalf of `color`, which must be the player to move.
    ///
    /// Returns the captured points (empty for pass and resign).
    pub fn play_as(&mut self, color: Color, play: Play) -> Result<Vec<Point>, GameError> {
        self.check_open()?;
        match play {
            Play::Place(pt) => self.commit_place(pt, color),
            _ if color != self.to_move => Err(GameError::WrongTurn),
            Play::Pass => {
                self.commit_pass(color);
                Ok(Vec::new())
            }
            Play::Resign => {
                self.commit_resign(color);
                Ok(Vec::new())
            }
        }
    }

    /// Take back the last history entry. A no-op returning `None` on an empty history.
    pub fn undo(&mut self) -> Option<MoveRecord> {
        let record = self.history.pop()?;
        self.board = record.board_before.clone();
        self.to_move = record.color;
        let slot = self.captures.slot(record.color);
        *slot = slot.saturating_sub(record.captured.len() as u32);
        self.consecutive_passes = record.passes_before;
        self.result = None;
        self.bump();
        debug!(play = ?record.play, color = %record.color, "undo");
        Some(record)
    }

    /// Back to an empty board with Black to move. Settings are kept.
    pub fn reset(&mut self) {
        let generation = self.generation + 1;
        *self = Self::from_config(self.config.clone());
        self.generation = generation;
        debug!("reset");
    }

    /// Set the AI level, clamped to 1..=9.
    pub fn set_ai_level(&mut self, level: u8) {
        self.config.ai_level = level.clamp(MIN_AI_LEVEL, MAX_AI_LEVEL);
    }

    // -------------------------------------------------------------------------
    // AI protocol
    // -------------------------------------------------------------------------

    /// Start an AI move for the player to move. Replaces any outstanding ticket.
    pub fn request_ai_move(&mut self) -> Result<AiTicket, GameError> {
        if self.result.is_some() {
            return Err(GameError::GameAlreadyTerminal);
        }
        self.pending_ai = Some(self.generation);
        Ok(AiTicket {
            generation: self.generation,
            board: self.board.clone(),
            color: self.to_move,
            strength: ai::strength_for_level(self.config.ai_level),
        })
    }

    /// Commit an evaluated proposal if it still matches the game.
    ///
    /// The drawn point is tried first; if the rules refuse it, the remaining
    /// points are tried best first. Fails with [`GameError::NoLegalMoves`]
    /// when nothing is playable. The thinking flag is cleared on every path.
    pub fn apply_ai_proposal(&mut self, proposal: AiProposal) -> Result<AiOutcome, GameError> {
        if self.pending_ai != Some(proposal.generation) || self.generation != proposal.generation {
            debug!(
                proposal = proposal.generation,
                current = self.generation,
                "discarding stale ai proposal"
            );
            return Ok(AiOutcome::Discarded);
        }
        self.pending_ai = None;

        let color = self.to_move;
        for candidate in proposal.candidates() {
            let attempt = rules::try_move(&self.position(), candidate.point, color);
            match attempt {
                Ok(outcome) => {
                    let captured = outcome.captured.clone();
                    self.commit_outcome(candidate.point, color, outcome);
                    return Ok(AiOutcome::Played {
                        point: candidate.point,
                        captured,
                        assessment: Assessment::from_score(candidate.score),
                    });
                }
                Err(e) => debug!(point = ?candidate.point, reason = %e, "ai candidate refused"),
            }
        }
        debug!(%color, "ai found no legal move");
        Err(GameError::NoLegalMoves)
    }

    /// Both phases back to back on the calling thread.
    pub fn ai_move(&mut self, rng: &mut fastrand::Rng) -> Result<AiOutcome, GameError> {
        let proposal = self.request_ai_move()?.evaluate(rng);
        self.apply_ai_proposal(proposal)
    }

    // -------------------------------------------------------------------------
    // Persistence
    // -------------------------------------------------------------------------

    /// Serialize the whole game, history included, as JSON.
    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Load a game written by [`Game::to_json`]. A loaded game is never thinking.
    pub fn from_json(s: &str) -> Result<Self, ConfigError> {
        let mut game: Game = serde_json::from_str(s)?;
        game.config = game.config.validated()?;

        let size = game.config.board_size;
        let board_ok = |b: &Board| b.size() == size;
        if !board_ok(&game.board) || !game.history.iter().all(|r| board_ok(&r.board_before)) {
            return Err(ConfigError::CorruptSave("board does not match board size"));
        }
        if game.is_terminal() != game.result.is_some() {
            return Err(ConfigError::CorruptSave("result disagrees with history"));
        }
        Ok(game)
    }

    // -------------------------------------------------------------------------
    // Transitions
    // -------------------------------------------------------------------------

    fn check_open(&self) -> Result<(), GameError> {
        if self.result.is_some() {
            return Err(GameError::GameAlreadyTerminal);
        }
        if self.is_thinking() {
            return Err(GameError::WrongTurn);
        }
        Ok(())
    }

    fn bump(&mut self) {
        self.generation += 1;
        self.pending_ai = None;
    }

    fn commit_place(&mut self, pt: Point, color: Color) -> Result<Vec<Point>, GameError> {
        let outcome = rules::try_move(&self.position(), pt, color).map_err(|e| {
            debug!(point = ?pt, %color, reason = %e, "move rejected");
            GameError::from(e)
        })?;
        let captured = outcome.captured.clone();
        self.commit_outcome(pt, color, outcome);
        Ok(captured)
    }

    fn commit_outcome(&mut self, pt: Point, color: Color, outcome: MoveOutcome) {
        let MoveOutcome { board, captured } = outcome;
        *self.captures.slot(color) += captured.len() as u32;
        debug!(point = ?pt, %color, captured = captured.len(), "stone placed");

        let board_before = std::mem::replace(&mut self.board, board);
        self.history.push(MoveRecord {
            play: Play::Place(pt),
            color,
            captured,
            board_before,
            passes_before: self.consecutive_passes,
        });
        self.consecutive_passes = 0;
        self.to_move = color.opponent();
        self.bump();
    }

    fn commit_pass(&mut self, color: Color) -> Option<GameResult> {
        self.history.push(MoveRecord {
            play: Play::Pass,
            color,
            captured: Vec::new(),
            board_before: self.board.clone(),
            passes_before: self.consecutive_passes,
        });
        self.consecutive_passes += 1;
        self.to_move = color.opponent();
        debug!(%color, passes = self.consecutive_passes, "pass");

        if self.consecutive_passes >= PASSES_TO_END {
            let score = self.score();
            self.finish(GameResult {
                winner: score.winner(),
                reason: EndReason::Score(score),
            });
        }
        self.bump();
        self.result
    }

    fn commit_resign(&mut self, color: Color) -> GameResult {
        self.history.push(MoveRecord {
            play: Play::Resign,
            color,
            captured: Vec::new(),
            board_before: self.board.clone(),
            passes_before: self.consecutive_passes,
        });
        let result = GameResult {
            winner: Some(color.opponent()),
            reason: EndReason::Resignation,
        };
        self.finish(result);
        self.bump();
        result
    }

    fn finish(&mut self, result: GameResult) {
        info!(%result, winner = ?result.winner, moves = self.history.len(), "game over");
        self.result = Some(result);
    }
}
