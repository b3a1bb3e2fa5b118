//! Per-game settings.
//!
//! A [`GameConfig`] is fixed when a game is created. It can be built from
//! defaults, read from a JSON file, and then overridden by command-line flags.
//!
//! ```
//! use tengen::config::GameConfig;
//!
//! let config = GameConfig::from_json_str(r#"{ "board_size": 9 }"#).unwrap();
//! assert_eq!(config.board_size, 9);
//! assert_eq!(config.komi, 6.5);
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::{
    DEFAULT_BOARD_SIZE, DEFAULT_KOMI, MAX_AI_LEVEL, MAX_BOARD_SIZE, MIN_AI_LEVEL, MIN_BOARD_SIZE,
};

/// Errors from loading settings or saved games.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unacceptable board size {0} (must be {min}..={max})", min = MIN_BOARD_SIZE, max = MAX_BOARD_SIZE)]
    InvalidBoardSize(usize),

    #[error("komi must be a finite number, got {0}")]
    InvalidKomi(f64),

    #[error("saved game is inconsistent: {0}")]
    CorruptSave(&'static str),
}

/// Settings for one game.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Board is `board_size` x `board_size`.
    pub board_size: usize,
    /// Points added to White's area.
    pub komi: f64,
    /// AI level, 1..=9. Out-of-range values are clamped.
    pub ai_level: u8,
    /// Seed for the AI's random choice. `None` seeds from entropy.
    pub seed: Option<u64>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            board_size: DEFAULT_BOARD_SIZE,
            komi: DEFAULT_KOMI,
            ai_level: MIN_AI_LEVEL,
            seed: None,
        }
    }
}

impl GameConfig {
    /// Default settings on a board of `size`.
    pub fn with_size(size: usize) -> Self {
        Self {
            board_size: size,
            ..Self::default()
        }
    }

    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        let config: GameConfig = serde_json::from_str(s)?;
        config.validated()
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    /// Check ranges, clamping the AI level.
    pub fn validated(mut self) -> Result<Self, ConfigError> {
        if !(MIN_BOARD_SIZE..=MAX_BOARD_SIZE).contains(&self.board_size) {
            return Err(ConfigError::InvalidBoardSize(self.board_size));
        }
        if !self.komi.is_finite() {
            return Err(ConfigError::InvalidKomi(self.komi));
        }
        self.ai_level = self.ai_level.clamp(MIN_AI_LEVEL, MAX_AI_LEVEL);
        Ok(self)
    }

    /// Random generator for AI moves, seeded from `seed` when set.
    pub fn rng(&self) -> fastrand::Rng {
        match self.seed {
            Some(seed) => fastrand::Rng::with_seed(seed),
            None => fastrand::Rng::new(),
        }
    }
}
