// Replay tests: debug log written by the bot, read back and re-planned

use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use tailchaser::board;
use tailchaser::config::Config;
use tailchaser::debug_logger::DebugLogger;
use tailchaser::planner::Planner;
use tailchaser::replay::{LogEntry, ReplayEngine};
use tailchaser::types::{Battlesnake, Board, Coord, Direction};

fn temp_log(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("tailchaser_{}_{}.jsonl", name, std::process::id()))
}

fn lone_snake_board() -> Board {
    let body = vec![Coord { x: 3, y: 3 }];
    Board {
        height: 7,
        width: 7,
        food: vec![Coord { x: 3, y: 6 }],
        snakes: vec![Battlesnake {
            id: "me".to_string(),
            name: "me".to_string(),
            health: 80,
            head: body[0],
            length: 1,
            body,
            latency: "0".to_string(),
            shout: None,
        }],
        hazards: vec![],
    }
}

fn entry(turn: i32, chosen_move: &str) -> LogEntry {
    LogEntry {
        turn,
        you: "me".to_string(),
        chosen_move: chosen_move.to_string(),
        board: lone_snake_board(),
        timestamp: String::new(),
    }
}

#[test]
fn test_replay_reports_matches_and_mismatches() {
    let path = temp_log("mixed");
    let lines: Vec<String> = vec![entry(1, "up"), entry(2, "down"), entry(3, "up")]
        .iter()
        .map(|e| serde_json::to_string(e).unwrap())
        .collect();
    fs::write(&path, lines.join("\n") + "\n").unwrap();

    let engine = ReplayEngine::new(Config::default_hardcoded(), false);
    let entries = engine.load_log_file(&path).unwrap();
    assert_eq!(entries.len(), 3);

    let results = engine.replay_all(&entries);
    assert_eq!(results.iter().map(|r| r.turn).collect::<Vec<_>>(), vec![1, 2, 3]);
    assert!(results.iter().all(|r| r.replayed_move == Direction::Up));

    let stats = engine.generate_stats(&results);
    assert_eq!(stats.matches, 2);
    assert_eq!(stats.mismatches, 1);

    fs::remove_file(&path).ok();
}

#[test]
fn test_replay_turns_rejects_unknown_turn() {
    let engine = ReplayEngine::new(Config::default_hardcoded(), false);
    let entries = vec![entry(1, "up")];

    assert_eq!(engine.replay_turns(&entries, &[1]).unwrap().len(), 1);
    assert!(engine.replay_turns(&entries, &[7]).is_err());
}

#[test]
fn test_replay_skips_bad_entries() {
    let engine = ReplayEngine::new(Config::default_hardcoded(), false);
    let mut bad = entry(2, "up");
    bad.you = "ghost".to_string();
    let results = engine.replay_all(&[entry(1, "up"), bad, entry(3, "sideways")]);

    assert_eq!(results.len(), 1);
    assert_eq!(results[0].turn, 1);
}

#[test]
fn test_load_rejects_malformed_line() {
    let path = temp_log("malformed");
    fs::write(&path, "{\"turn\": 1}\n").unwrap();

    let engine = ReplayEngine::new(Config::default_hardcoded(), false);
    let err = engine.load_log_file(&path).unwrap_err();
    assert!(err.contains("line 1"));

    fs::remove_file(&path).ok();
}

#[tokio::test]
async fn test_debug_log_round_trips_through_replay() {
    let path = temp_log("roundtrip");
    let logger = DebugLogger::new(true, path.to_str().unwrap()).await;
    assert!(logger.is_enabled());

    let api_board = lone_snake_board();
    let grid = board::Board::from_api(&api_board, "me").unwrap();
    let config = Config::default_hardcoded();
    let plan = Planner::new(&config).plan_turn(&grid);
    logger.log_move(4, "me", api_board, &plan);

    let mut contents = fs::read_to_string(&path).unwrap_or_default();
    for _ in 0..50 {
        if contents.ends_with('\n') {
            break;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
        contents = fs::read_to_string(&path).unwrap_or_default();
    }
    assert!(contents.contains("\"strategy\":\"disjoint\""));

    let engine = ReplayEngine::new(config, false);
    let entries = engine.load_log_file(&path).unwrap();
    let results = engine.replay_all(&entries);
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].turn, 4);
    assert!(results[0].matches);

    fs::remove_file(&path).ok();
}

#[test]
fn test_disabled_logger_is_noop() {
    let logger = DebugLogger::disabled();
    assert!(!logger.is_enabled());
}
