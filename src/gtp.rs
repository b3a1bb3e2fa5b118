//! Go Text Protocol (GTP) host.
//!
//! GTP is a text-based protocol for communicating with Go-playing programs.
//! This module implements the subset of GTP version 2 needed to drive a
//! [`Game`] from graphical Go interfaces like Sabaki or GoGui.
//!
//! ## Supported Commands
//!
//! - `name`, `version`, `protocol_version`
//! - `list_commands`, `known_command <cmd>`
//! - `quit`
//! - `boardsize <size>` - Start a new game on a board of that size
//! - `clear_board` - Reset the board to empty
//! - `komi <value>` - Set komi (only before the first move)
//! - `play <color> <vertex>` - Play a move (`pass` and `resign` accepted)
//! - `genmove <color>` - Generate and play a move for the given color
//! - `undo` - Take back the last move
//! - `showboard` - Print the board
//! - `final_score` - Area score of the current board
//! - `level <1-9>` - Set the AI level (extension)
//!
//! ## Example
//!
//! ```ignore
//! use tengen::gtp::GtpEngine;
//! let mut engine = GtpEngine::new(GameConfig::default())?;
//! engine.run()?;
//! ```

use std::io::{self, BufRead, Write};

use anyhow::Result;
use tracing::{debug, warn};

use crate::board::{Color, parse_coord, str_coord};
use crate::config::GameConfig;
use crate::game::{AiOutcome, Game, GameError, Play};

/// The list of known GTP commands.
const KNOWN_COMMANDS: &[&str] = &[
    "boardsize",
    "clear_board",
    "final_score",
    "genmove",
    "known_command",
    "komi",
    "level",
    "list_commands",
    "name",
    "play",
    "protocol_version",
    "quit",
    "showboard",
    "undo",
    "version",
];

/// GTP engine state.
pub struct GtpEngine {
    /// Current game
    game: Game,
    /// Source of randomness for AI moves
    rng: fastrand::Rng,
}

impl GtpEngine {
    /// Create a new GTP engine for games with the given settings.
    pub fn new(config: GameConfig) -> Result<Self> {
        let rng = config.rng();
        let game = Game::new(config)?;
        Ok(Self { game, rng })
    }

    pub fn game(&self) -> &Game {
        &self.game
    }

    /// Run the GTP command loop, reading from stdin and writing to stdout.
    pub fn run(&mut self) -> Result<()> {
        let stdin = io::stdin();
        let mut stdout = io::stdout();

        for line in stdin.lock().lines() {
            let line = line?;

            // Skip empty lines and comments
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            // Parse optional command ID
            let (id, command_line) = Self::parse_id(line);

            // Parse command and arguments
            let parts: Vec<&str> = command_line.split_whitespace().collect();
            let Some((command, args)) = parts.split_first() else {
                continue;
            };
            let command = command.to_lowercase();

            let (success, message) = self.execute(&command, args);
            if !success {
                debug!(%command, %message, "gtp command failed");
            }

            let prefix = if success { '=' } else { '?' };
            let id_str = id.map(|i| i.to_string()).unwrap_or_default();
            writeln!(stdout, "{prefix}{id_str} {message}\n")?;
            stdout.flush()?;

            if command == "quit" {
                break;
            }
        }
        Ok(())
    }

    /// Parse an optional numeric command ID from the beginning of the line.
    fn parse_id(line: &str) -> (Option<u32>, &str) {
        let trimmed = line.trim();
        let end = trimmed
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(trimmed.len());

        match trimmed[..end].parse::<u32>() {
            Ok(id) => (Some(id), trimmed[end..].trim()),
            Err(_) => (None, trimmed),
        }
    }

    fn parse_color(s: &str) -> Option<Color> {
        match s.to_lowercase().as_str() {
            "b" | "black" => Some(Color::Black),
            "w" | "white" => Some(Color::White),
            _ => None,
        }
    }

    /// Execute a GTP command and return (success, response).
    fn execute(&mut self, command: &str, args: &[&str]) -> (bool, String) {
        match command {
            "name" => (true, env!("CARGO_PKG_NAME").to_string()),

            "version" => (true, env!("CARGO_PKG_VERSION").to_string()),

            "protocol_version" => (true, "2".to_string()),

            "list_commands" => (true, KNOWN_COMMANDS.join("\n")),

            "known_command" => {
                let Some(cmd) = args.first() else {
                    return (false, "missing argument".to_string());
                };
                let known = KNOWN_COMMANDS.contains(&cmd.to_lowercase().as_str());
                (true, known.to_string())
            }

            "quit" => (true, String::new()),

            "boardsize" => {
                let Some(arg) = args.first() else {
                    return (false, "missing argument".to_string());
                };
                let Ok(size) = arg.parse::<usize>() else {
                    return (false, "invalid size".to_string());
                };
                let config = GameConfig {
                    board_size: size,
                    ..self.game.config().clone()
                };
                match Game::new(config) {
                    Ok(game) => {
                        self.game = game;
                        (true, String::new())
                    }
                    Err(e) => {
                        warn!(size, "rejected board size");
                        (false, format!("unacceptable size: {e}"))
                    }
                }
            }

            "clear_board" => {
                self.game.reset();
                (true, String::new())
            }

            "komi" => {
                let Some(arg) = args.first() else {
                    return (false, "missing argument".to_string());
                };
                let Ok(komi) = arg.parse::<f64>() else {
                    return (false, "invalid komi".to_string());
                };
                if !self.game.history().is_empty() {
                    return (false, "cannot change komi during a game".to_string());
                }
                let config = GameConfig {
                    komi,
                    ..self.game.config().clone()
                };
                match Game::new(config) {
                    Ok(game) => {
                        self.game = game;
                        (true, String::new())
                    }
                    Err(e) => (false, e.to_string()),
                }
            }

            "level" => {
                match args.first().and_then(|a| a.parse::<u8>().ok()) {
                    Some(level) => {
                        self.game.set_ai_level(level);
                        (true, self.game.ai_level().to_string())
                    }
                    None => (false, "invalid level".to_string()),
                }
            }

            "play" => {
                if args.len() < 2 {
                    return (false, "missing arguments".to_string());
                }
                let Some(color) = Self::parse_color(args[0]) else {
                    return (false, "invalid color".to_string());
                };

                let size = self.game.board().size();
                let vertex = args[1].to_lowercase();
                let play = match vertex.as_str() {
                    "pass" => Play::Pass,
                    "resign" => Play::Resign,
                    v => match parse_coord(v, size) {
                        Some(pt) => Play::Place(pt),
                        None => return (false, "invalid vertex".to_string()),
                    },
                };

                match self.game.play_as(color, play) {
                    Ok(_) => (true, String::new()),
                    Err(e) => (false, e.to_string()),
                }
            }

            "genmove" => {
                let Some(color) = args.first().and_then(|a| Self::parse_color(a)) else {
                    return (false, "invalid color".to_string());
                };
                if color != self.game.to_move() {
                    return (false, GameError::WrongTurn.to_string());
                }
                self.genmove(color)
            }

            "undo" => match self.game.undo() {
                Some(_) => (true, String::new()),
                None => (false, "cannot undo".to_string()),
            },

            "showboard" => (true, format!("\n{}", self.game.board())),

            "final_score" => (true, self.game.score().to_string()),

            _ => (false, format!("unknown command: {command}")),
        }
    }

    /// Generate a move for `color`, who is to move.
    ///
    /// Passes back when the opponent has just passed (past the opening) and
    /// when no legal point is left.
    fn genmove(&mut self, color: Color) -> (bool, String) {
        let opponent_passed = self
            .game
            .history()
            .last()
            .is_some_and(|r| r.play == Play::Pass);
        if opponent_passed && self.game.history().len() > 2 {
            return match self.game.play_as(color, Play::Pass) {
                Ok(_) => (true, "pass".to_string()),
                Err(e) => (false, e.to_string()),
            };
        }

        match self.game.ai_move(&mut self.rng) {
            Ok(AiOutcome::Played { point, .. }) => (true, str_coord(point, self.game.board().size())),
            Ok(AiOutcome::Discarded) => (false, "move discarded".to_string()),
            Err(GameError::NoLegalMoves) => match self.game.play_as(color, Play::Pass) {
                Ok(_) => (true, "pass".to_string()),
                Err(e) => (false, e.to_string()),
            },
            Err(e) => (false, e.to_string()),
        }
    }
}
