//! Tengen: a Go rules engine.
//!
//! This crate decides, for a board position and a proposed move, whether the
//! move is legal, which stones it captures, when the game ends and who is
//! winning. A shallow heuristic evaluator supplies computer moves.
//!
//! ## Modules
//!
//! - [`constants`] - Default board size, komi and evaluator weights
//! - [`board`] - Board storage, geometry and text coordinates
//! - [`group`] - Connected groups and liberties
//! - [`rules`] - Move legality (suicide, ko) and capture resolution
//! - [`scoring`] - Area scoring and termination
//! - [`ai`] - Heuristic move evaluator
//! - [`game`] - Game state machine, history and undo
//! - [`config`] - Per-game settings
//! - [`gtp`] - Go Text Protocol front end
//!
//! ## Example
//!
//! ```
//! use tengen::board::{Color, Point};
//! use tengen::game::Game;
//!
//! // Create a new game
//! let mut game = Game::default();
//!
//! // Play a few moves
//! game.place_stone(Point::new(3, 3)).unwrap();
//! game.place_stone(Point::new(15, 15)).unwrap();
//!
//! // Both players pass: the game is scored
//! game.pass().unwrap();
//! let result = game.pass().unwrap().unwrap();
//! assert_eq!(result.winner, Some(Color::White));
//! ```

pub mod ai;
pub mod board;
pub mod config;
pub mod constants;
pub mod game;
pub mod gtp;
pub mod group;
pub mod rules;
pub mod scoring;
