//! Tengen: a Go rules engine with a heuristic AI.
//!
//! ## Usage
//!
//! - `tengen` - Show a demo
//! - `tengen gtp` - Start GTP server for GUI integration
//! - `tengen selfplay` - Let the AI play both sides
//!
//! Settings come from `--config <file.json>` and are overridden by flags.
//! Logging goes to stderr and is controlled by `RUST_LOG`.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use tengen::board::{Point, str_coord};
use tengen::config::GameConfig;
use tengen::game::{AiOutcome, Game, GameError};
use tengen::gtp::GtpEngine;

/// Tengen: a Go rules engine with a heuristic AI
#[derive(Parser)]
#[command(name = "tengen")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(flatten)]
    settings: Settings,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Args)]
struct Settings {
    /// JSON file with game settings
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Board size
    #[arg(long, global = true)]
    size: Option<usize>,

    /// Komi added to White's score
    #[arg(long, global = true)]
    komi: Option<f64>,

    /// AI level (1-9)
    #[arg(long, global = true)]
    level: Option<u8>,

    /// Seed for reproducible AI moves
    #[arg(long, global = true)]
    seed: Option<u64>,
}

impl Settings {
    fn resolve(&self) -> Result<GameConfig> {
        let mut config = match &self.config {
            Some(path) => GameConfig::from_json_file(path)?,
            None => GameConfig::default(),
        };
        if let Some(size) = self.size {
            config.board_size = size;
        }
        if let Some(komi) = self.komi {
            config.komi = komi;
        }
        if let Some(level) = self.level {
            config.ai_level = level;
        }
        if self.seed.is_some() {
            config.seed = self.seed;
        }
        Ok(config.validated()?)
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Start the GTP (Go Text Protocol) server for use with GUI applications
    Gtp,
    /// Let the AI play against itself and print the result
    Selfplay {
        /// Stop after this many moves (default: three times the board area)
        #[arg(long)]
        max_moves: Option<usize>,
    },
    /// Run a simple demo of the engine
    Demo,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = cli.settings.resolve()?;

    match cli.command {
        Some(Commands::Gtp) => GtpEngine::new(config)?.run(),
        Some(Commands::Selfplay { max_moves }) => run_selfplay(config, max_moves),
        Some(Commands::Demo) | None => run_demo(config),
    }
}

fn run_selfplay(config: GameConfig, max_moves: Option<usize>) -> Result<()> {
    let mut rng = config.rng();
    let mut game = Game::new(config)?;
    let size = game.board().size();
    let max_moves = max_moves.unwrap_or(size * size * 3);

    while !game.is_terminal() {
        if game.history().len() >= max_moves {
            game.pass()?;
            continue;
        }
        let color = game.to_move();

        // Evaluate off the game's thread, then apply on it.
        let ticket = game.request_ai_move()?;
        let mut worker_rng = rng.fork();
        let proposal = std::thread::spawn(move || ticket.evaluate(&mut worker_rng))
            .join()
            .map_err(|_| anyhow::anyhow!("ai evaluation thread panicked"))?;

        match game.apply_ai_proposal(proposal) {
            Ok(AiOutcome::Played { point, captured, .. }) => {
                let suffix = if captured.is_empty() {
                    String::new()
                } else {
                    format!(" (captures {})", captured.len())
                };
                println!("{:>4}. {color} {}{suffix}", game.history().len(), str_coord(point, size));
            }
            Ok(AiOutcome::Discarded) => {}
            Err(GameError::NoLegalMoves) => {
                println!("{:>4}. {color} pass", game.history().len() + 1);
                game.pass()?;
            }
            Err(e) => return Err(e.into()),
        }
    }

    println!("\n{}", game.board());
    if let Some(result) = game.result() {
        println!("Result: {result}");
    }
    Ok(())
}

fn run_demo(config: GameConfig) -> Result<()> {
    println!("Tengen: Go rules engine\n");
    let mut rng = config.rng();
    let mut game = Game::new(config)?;
    let size = game.board().size();
    let opening = Point::new(size / 2, size / 2);

    println!("=== Opening ===");
    game.place_stone(opening)?;
    match game.ai_move(&mut rng) {
        Ok(AiOutcome::Played { point, assessment, .. }) => {
            println!("AI answers at {} ({assessment:?})", str_coord(point, size));
        }
        Ok(AiOutcome::Discarded) => println!("AI move discarded"),
        Err(GameError::NoLegalMoves) => {
            println!("AI passes");
            game.pass()?;
        }
        Err(e) => return Err(e.into()),
    }
    println!("{}", game.board());

    println!("=== Illegal move ===");
    match game.place_stone(opening) {
        Ok(_) => println!("unexpectedly legal"),
        Err(e) => println!("Black at {}: {e}", str_coord(opening, size)),
    }

    println!("\n=== Score ===");
    let score = game.score();
    println!("Black {} - White {} ({score})", score.black, score.white);
    Ok(())
}
