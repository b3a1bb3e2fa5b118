//! Integration tests for tengen
//!
//! Whole-game scenarios driven through the public `Game` API: captures,
//! suicide, ko, undo, scoring, persistence and the two-phase AI protocol.

use tengen::ai::propose_move;
use tengen::board::{Board, Color, Point, parse_coord};
use tengen::config::{ConfigError, GameConfig};
use tengen::game::{AiOutcome, EndReason, Game, GameError, GameStatus, Play};
use tengen::group::{find_group, liberties};

// =============================================================================
// Helper functions for setting up test positions
// =============================================================================

/// Play a sequence of text moves ("D4", "pass") alternately from Black.
fn setup_game(size: usize, moves: &[&str]) -> Game {
    let mut game = Game::new(GameConfig::with_size(size)).unwrap();
    for mv in moves {
        if mv.eq_ignore_ascii_case("pass") {
            game.pass().unwrap();
        } else {
            let pt = parse_coord(mv, size).unwrap_or_else(|| panic!("bad vertex {mv}"));
            if let Err(e) = game.place_stone(pt) {
                panic!("Illegal move {mv} in setup: {e}");
            }
        }
    }
    game
}

/// Play a sequence of points alternately from Black.
fn play_points(game: &mut Game, points: &[(usize, usize)]) {
    for &(x, y) in points {
        if let Err(e) = game.place_stone(Point::new(x, y)) {
            panic!("Illegal move ({x},{y}) in setup: {e}");
        }
    }
}

/// Every group on the board has at least one liberty.
fn assert_no_dead_groups(board: &Board) {
    for pt in board.points() {
        if let Some(color) = board.get(pt) {
            let group = find_group(board, pt, color);
            assert!(!liberties(board, &group).is_empty(), "group at {pt:?} has no liberties\n{board}");
        }
    }
}

// =============================================================================
// Captures
// =============================================================================

#[test]
fn test_capture_single_stone() {
    // White D4 is surrounded on four sides.
    let game = setup_game(9, &["C4", "D4", "E4", "pass", "D5", "pass", "D3"]);
    assert_eq!(game.board().get(parse_coord("D4", 9).unwrap()), None);
    assert_eq!(game.captures(Color::Black), 1);
    assert_eq!(game.captures(Color::White), 0);

    let last = game.history().last().unwrap();
    assert_eq!(last.captured, vec![parse_coord("D4", 9).unwrap()]);
}

#[test]
fn test_capture_group_tally_matches_size() {
    let mut game = setup_game(9, &["C4", "D4", "C5", "D5", "E4", "pass", "E5", "pass", "D3"]);
    assert_eq!(game.captures(Color::Black), 0);
    game.pass().unwrap();
    let captured = game.place_stone(parse_coord("D6", 9).unwrap()).unwrap();

    assert_eq!(captured.len(), 2);
    assert_eq!(game.captures(Color::Black), 2);
    assert_eq!(game.board().count(Color::White), 0);
    assert_no_dead_groups(game.board());
}

// =============================================================================
// Suicide
// =============================================================================

#[test]
fn test_suicide_rejected_board_unchanged() {
    // White to play into the corner enclosed by Black.
    let mut game = setup_game(9, &["A2", "pass", "B1"]);
    let before = game.board().clone();
    let generation = game.generation();

    let result = game.place_stone(parse_coord("A1", 9).unwrap());
    assert_eq!(result, Err(GameError::Suicide));
    assert_eq!(game.board(), &before);
    assert_eq!(game.to_move(), Color::White);
    assert_eq!(game.generation(), generation);
    assert_eq!(game.history().len(), 3);
}

#[test]
fn test_filling_own_eye_last_liberty_is_suicide() {
    // Black's corner group has only the A1 eye left.
    let mut game = setup_game(9, &["B1", "C1", "A2", "C2", "B2", "B3", "pass", "A3"]);
    let result = game.place_stone(parse_coord("A1", 9).unwrap());
    assert_eq!(result, Err(GameError::Suicide));
}

#[test]
fn test_capture_is_not_suicide() {
    // White A1 captures the black stones it touches instead of dying.
    let mut game = setup_game(9, &["B1", "C1", "A2", "B2", "pass", "A3", "pass"]);
    let captured = game.place_stone(parse_coord("A1", 9).unwrap()).unwrap();
    assert_eq!(captured.len(), 2);
    assert_eq!(game.board().get(parse_coord("A1", 9).unwrap()), Some(Color::White));
    assert_no_dead_groups(game.board());
}

// =============================================================================
// Ko
// =============================================================================

/// Position where Black has just taken a ko at (1,1) by playing (2,1).
fn ko_game() -> Game {
    let mut game = Game::new(GameConfig::with_size(9)).unwrap();
    play_points(
        &mut game,
        &[(1, 0), (2, 0), (0, 1), (3, 1), (1, 2), (2, 2), (8, 8), (1, 1), (2, 1)],
    );
    game
}

#[test]
fn test_ko_immediate_retake_rejected() {
    let mut game = ko_game();
    assert_eq!(game.captures(Color::Black), 1);
    assert_eq!(game.board().get(Point::new(1, 1)), None);

    let before = game.board().clone();
    assert_eq!(game.place_stone(Point::new(1, 1)), Err(GameError::KoViolation));
    assert_eq!(game.board(), &before);
    assert_eq!(game.to_move(), Color::White);
}

#[test]
fn test_ko_retake_after_exchange_elsewhere() {
    let mut game = ko_game();
    play_points(&mut game, &[(8, 0), (7, 7)]);

    let captured = game.place_stone(Point::new(1, 1)).unwrap();
    assert_eq!(captured, vec![Point::new(2, 1)]);
    assert_eq!(game.captures(Color::White), 1);

    // Now Black may not retake straight back.
    assert_eq!(game.place_stone(Point::new(2, 1)), Err(GameError::KoViolation));
}

#[test]
fn test_ko_pass_counts_as_move_elsewhere() {
    let mut game = ko_game();
    game.pass().unwrap();
    game.place_stone(Point::new(7, 7)).unwrap();
    assert!(game.place_stone(Point::new(1, 1)).is_ok());
    assert_eq!(game.captures(Color::White), 1);
}

#[test]
fn test_multi_stone_capture_is_not_ko() {
    // Capturing two stones may immediately be answered at the same spot.
    let mut game = setup_game(9, &["C4", "D4", "C5", "D5", "E4", "pass", "E5", "pass", "D3", "pass", "D6"]);
    assert_eq!(game.captures(Color::Black), 2);
    let result = game.place_stone(parse_coord("D4", 9).unwrap());
    assert!(result.is_ok(), "re-entering a two-stone capture is legal: {result:?}");
}

// =============================================================================
// Undo
// =============================================================================

#[test]
fn test_undo_is_exact_inverse() {
    let mut game = setup_game(9, &["C4", "D4", "C5", "D5", "E4", "pass", "E5", "pass", "D3", "pass", "D6"]);
    let moves = game.history().len();
    assert_eq!(game.captures(Color::Black), 2);

    for _ in 0..moves {
        assert!(game.undo().is_some());
    }
    assert!(game.undo().is_none());
    assert!(game.board().is_clear());
    assert_eq!(game.captures(Color::Black), 0);
    assert_eq!(game.captures(Color::White), 0);
    assert_eq!(game.to_move(), Color::Black);
    assert_eq!(game.consecutive_passes(), 0);
}

#[test]
fn test_undo_restores_captured_stones() {
    let mut game = ko_game();
    let record = game.undo().unwrap();
    assert_eq!(record.play, Play::Place(Point::new(2, 1)));
    assert_eq!(record.captured, vec![Point::new(1, 1)]);
    assert_eq!(game.board().get(Point::new(1, 1)), Some(Color::White));
    assert_eq!(game.board().get(Point::new(2, 1)), None);
    assert_eq!(game.captures(Color::Black), 0);
    assert_eq!(game.to_move(), Color::Black);
}

// =============================================================================
// Scoring and termination
// =============================================================================

#[test]
fn test_two_stone_game_decided_by_komi() {
    let mut game = Game::default();
    game.place_stone(Point::new(3, 3)).unwrap();
    game.place_stone(Point::new(15, 15)).unwrap();
    assert_eq!(game.pass().unwrap(), None);
    let result = game.pass().unwrap().unwrap();

    let EndReason::Score(score) = result.reason else {
        panic!("expected a scored result, got {result:?}");
    };
    assert_eq!(score.black, 1.0);
    assert_eq!(score.white, 7.5);
    assert_eq!(result.winner, Some(Color::White));
    assert_eq!(game.status(), GameStatus::Terminal { winner: Some(Color::White) });
    assert_eq!(game.territory().neutral.len(), 361 - 2);
}

#[test]
fn test_black_wins_on_area() {
    let mut game = setup_game(9, &["E5", "pass", "pass"]);
    assert!(game.is_terminal());
    assert_eq!(game.winner(), Some(Color::Black));
    assert_eq!(game.score(), game.score());
    assert_eq!(game.result().unwrap().to_string(), "B+74.5");
    assert_eq!(game.place_stone(Point::new(0, 0)), Err(GameError::GameAlreadyTerminal));
}

#[test]
fn test_empty_board_not_terminal() {
    let game = Game::default();
    assert!(!game.is_terminal());
    assert_eq!(game.status(), GameStatus::InProgress);
}

#[test]
fn test_single_pass_not_terminal() {
    let game = setup_game(9, &["E5", "pass"]);
    assert!(!game.is_terminal());
    assert_eq!(game.consecutive_passes(), 1);
}

#[test]
fn test_resign_gives_win_to_opponent() {
    let mut game = setup_game(9, &["E5"]);
    let result = game.resign().unwrap();
    assert_eq!(result.winner, Some(Color::Black));
    assert_eq!(result.to_string(), "B+R");
    assert!(game.is_terminal());
}

// =============================================================================
// Move evaluator
// =============================================================================

#[test]
fn test_propose_move_last_empty_point() {
    let mut board = Board::new(5);
    let last = Point::new(4, 2);
    let fill: Vec<Point> = board.points().filter(|&p| p != last).collect();
    for (i, pt) in fill.into_iter().enumerate() {
        board.place(pt, if i % 2 == 0 { Color::Black } else { Color::White });
    }
    let mut rng = fastrand::Rng::with_seed(17);
    assert_eq!(propose_move(&board, Color::White, 1.0, &mut rng), Some(last));

    board.place(last, Color::White);
    assert_eq!(propose_move(&board, Color::White, 1.0, &mut rng), None);
}

#[test]
fn test_ai_evaluates_on_worker_thread() {
    let mut game = setup_game(9, &["E5"]);
    let ticket = game.request_ai_move().unwrap();
    assert!(game.is_thinking());

    let handle = std::thread::spawn(move || ticket.evaluate(&mut fastrand::Rng::with_seed(4)));
    let proposal = handle.join().unwrap();

    match game.apply_ai_proposal(proposal).unwrap() {
        AiOutcome::Played { point, .. } => {
            assert_eq!(game.board().get(point), Some(Color::White));
        }
        AiOutcome::Discarded => panic!("fresh proposal was discarded"),
    }
    assert!(!game.is_thinking());
}

#[test]
fn test_stale_proposal_after_undo_is_discarded() {
    let mut game = setup_game(9, &["E5"]);
    let ticket = game.request_ai_move().unwrap();
    let proposal = ticket.evaluate(&mut fastrand::Rng::with_seed(4));

    game.undo().unwrap();
    game.place_stone(Point::new(2, 2)).unwrap();
    let board = game.board().clone();

    assert_eq!(game.apply_ai_proposal(proposal).unwrap(), AiOutcome::Discarded);
    assert_eq!(game.board(), &board);
    assert_eq!(game.to_move(), Color::White);
}

#[test]
fn test_ai_game_keeps_invariants() {
    let config = GameConfig {
        ai_level: 9,
        ..GameConfig::with_size(7)
    };
    let mut game = Game::new(config).unwrap();
    let mut rng = fastrand::Rng::with_seed(2024);

    for _ in 0..150 {
        if game.is_terminal() {
            break;
        }
        match game.ai_move(&mut rng) {
            Ok(AiOutcome::Played { .. }) => {}
            Ok(AiOutcome::Discarded) => panic!("nothing changed, proposal must apply"),
            Err(GameError::NoLegalMoves) => {
                game.pass().unwrap();
            }
            Err(e) => panic!("unexpected error {e}"),
        }
        assert!(!game.is_thinking());
        assert_no_dead_groups(game.board());
    }

    let black: u32 = game.board().count(Color::Black) as u32 + game.captures(Color::White);
    let placed_black = game
        .history()
        .iter()
        .filter(|r| r.color == Color::Black && matches!(r.play, Play::Place(_)))
        .count() as u32;
    assert_eq!(black, placed_black, "every black stone is on the board or captured");
}

// =============================================================================
// Persistence
// =============================================================================

#[test]
fn test_save_and_load_preserves_undo() {
    let game = ko_game();
    let json = game.to_json().unwrap();
    let mut loaded = Game::from_json(&json).unwrap();

    assert_eq!(loaded.board(), game.board());
    assert_eq!(loaded.history(), game.history());
    assert_eq!(loaded.to_move(), game.to_move());
    assert_eq!(loaded.captures(Color::Black), 1);
    assert_eq!(loaded.generation(), game.generation());

    // Ko state survives the round trip because it is derived from history.
    assert_eq!(loaded.place_stone(Point::new(1, 1)), Err(GameError::KoViolation));

    loaded.undo().unwrap();
    assert_eq!(loaded.board().get(Point::new(1, 1)), Some(Color::White));
}

#[test]
fn test_saved_game_is_not_thinking() {
    let mut game = setup_game(9, &["E5"]);
    game.request_ai_move().unwrap();
    let loaded = Game::from_json(&game.to_json().unwrap()).unwrap();
    assert!(!loaded.is_thinking());
}

#[test]
fn test_load_rejects_mismatched_board() {
    let game = setup_game(9, &["E5"]);
    let mut value: serde_json::Value = serde_json::from_str(&game.to_json().unwrap()).unwrap();
    value["config"]["board_size"] = serde_json::json!(13);
    let err = Game::from_json(&value.to_string()).unwrap_err();
    assert!(matches!(err, ConfigError::CorruptSave(_)));
}

#[test]
fn test_load_rejects_result_missing_from_finished_game() {
    let game = setup_game(9, &["E5", "pass", "pass"]);
    assert!(game.is_terminal());
    let mut value: serde_json::Value = serde_json::from_str(&game.to_json().unwrap()).unwrap();
    value["result"] = serde_json::Value::Null;
    let err = Game::from_json(&value.to_string()).unwrap_err();
    assert!(matches!(err, ConfigError::CorruptSave(_)), "unexpected error: {err}");
}

#[test]
fn test_load_rejects_short_board() {
    let game = setup_game(5, &["C3"]);
    let mut value: serde_json::Value = serde_json::from_str(&game.to_json().unwrap()).unwrap();
    value["board"]["cells"] = serde_json::json!([null]);
    let err = Game::from_json(&value.to_string()).unwrap_err();
    assert!(matches!(err, ConfigError::Json(_)), "unexpected error: {err}");
}
