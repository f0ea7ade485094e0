// Replay module for checking planner decisions against a debug log
//
// This module provides functionality to:
// 1. Parse the JSONL debug log written by `DebugLogger`
// 2. Re-plan every logged board
// 3. Compare the logged and replayed moves and report the differences
//
// Turns are independent, so they are replayed in parallel.

use log::{info, warn};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::time::Instant;

use crate::board;
use crate::config::Config;
use crate::planner::{Planner, Strategy};
use crate::types::{Board, Direction};

/// Represents a single log entry from the debug JSONL file
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct LogEntry {
    pub turn: i32,
    pub you: String,
    pub chosen_move: String,
    pub board: Board,
    #[serde(default)]
    pub timestamp: String,
}

/// Result of replaying a single turn
#[derive(Debug, Clone)]
pub struct ReplayResult {
    pub turn: i32,
    pub original_move: Direction,
    pub replayed_move: Direction,
    pub strategy: Strategy,
    pub matches: bool,
    pub computation_time_ms: u128,
}

/// Statistics for a complete replay session
#[derive(Debug, Default)]
pub struct ReplayStats {
    pub total_turns: usize,
    pub matches: usize,
    pub mismatches: usize,
    pub match_rate: f64,
}

/// Replay engine for analyzing debug logs
pub struct ReplayEngine {
    config: Config,
    verbose: bool,
}

impl ReplayEngine {
    pub fn new(config: Config, verbose: bool) -> Self {
        ReplayEngine { config, verbose }
    }

    /// Loads all log entries from a JSONL file
    pub fn load_log_file<P: AsRef<Path>>(&self, log_path: P) -> Result<Vec<LogEntry>, String> {
        let file = File::open(log_path.as_ref())
            .map_err(|e| format!("Failed to open log file: {}", e))?;

        let reader = BufReader::new(file);
        let mut entries = Vec::new();

        for (line_num, line) in reader.lines().enumerate() {
            let line = line.map_err(|e| format!("Failed to read line {}: {}", line_num + 1, e))?;

            if line.trim().is_empty() {
                continue;
            }

            let entry: LogEntry = serde_json::from_str(&line)
                .map_err(|e| format!("Failed to parse JSON on line {}: {}", line_num + 1, e))?;

            entries.push(entry);
        }

        info!("Loaded {} log entries", entries.len());
        Ok(entries)
    }

    /// Re-plans one logged turn and compares it with the logged move
    pub fn replay_entry(&self, entry: &LogEntry) -> Result<ReplayResult, String> {
        let original_move = Direction::parse(&entry.chosen_move)?;
        let grid = board::Board::from_api(&entry.board, &entry.you)?;

        let start_time = Instant::now();
        let plan = Planner::new(&self.config).plan_turn(&grid);
        let computation_time_ms = start_time.elapsed().as_millis();

        let matches = original_move == plan.direction;
        if self.verbose {
            if matches {
                info!(
                    "Turn {}: MATCH {} via {} ({}ms)",
                    entry.turn,
                    plan.direction.as_str(),
                    plan.strategy.as_str(),
                    computation_time_ms
                );
            } else {
                warn!(
                    "Turn {}: MISMATCH logged {}, replayed {} via {} ({}ms)",
                    entry.turn,
                    original_move.as_str(),
                    plan.direction.as_str(),
                    plan.strategy.as_str(),
                    computation_time_ms
                );
            }
        }

        Ok(ReplayResult {
            turn: entry.turn,
            original_move,
            replayed_move: plan.direction,
            strategy: plan.strategy,
            matches,
            computation_time_ms,
        })
    }

    /// Replays every entry, skipping (and logging) the ones that fail.
    /// Results come back in log order.
    pub fn replay_all(&self, entries: &[LogEntry]) -> Vec<ReplayResult> {
        entries
            .par_iter()
            .filter_map(|entry| match self.replay_entry(entry) {
                Ok(result) => Some(result),
                Err(e) => {
                    warn!("Failed to replay turn {}: {}", entry.turn, e);
                    None
                }
            })
            .collect()
    }

    /// Replays specific turns from a log file
    pub fn replay_turns(
        &self,
        entries: &[LogEntry],
        turn_numbers: &[i32],
    ) -> Result<Vec<ReplayResult>, String> {
        let selected = turn_numbers
            .iter()
            .map(|turn| {
                entries
                    .iter()
                    .find(|e| e.turn == *turn)
                    .cloned()
                    .ok_or_else(|| format!("Turn {} not found in log file", turn))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(self.replay_all(&selected))
    }

    pub fn generate_stats(&self, results: &[ReplayResult]) -> ReplayStats {
        let total_turns = results.len();
        let matches = results.iter().filter(|r| r.matches).count();
        let mismatches = total_turns - matches;
        let match_rate = if total_turns > 0 {
            (matches as f64 / total_turns as f64) * 100.0
        } else {
            0.0
        };

        ReplayStats {
            total_turns,
            matches,
            mismatches,
            match_rate,
        }
    }

    /// Prints a detailed report of replay results
    pub fn print_report(&self, results: &[ReplayResult]) {
        let stats = self.generate_stats(results);

        println!("\n═══════════════════════════════════════════════════════════");
        println!("                    REPLAY REPORT");
        println!("═══════════════════════════════════════════════════════════");
        println!("Total Turns:    {}", stats.total_turns);
        println!("Matches:        {} ({:.1}%)", stats.matches, stats.match_rate);
        println!("Mismatches:     {}", stats.mismatches);
        println!("═══════════════════════════════════════════════════════════\n");

        if !results.is_empty() {
            let avg_time: f64 = results
                .iter()
                .map(|r| r.computation_time_ms as f64)
                .sum::<f64>()
                / results.len() as f64;
            println!("Average Planning Time:   {:.1}ms\n", avg_time);

            for strategy in [
                Strategy::Disjoint,
                Strategy::TailCut,
                Strategy::SpaceFill,
                Strategy::Escape,
            ] {
                let count = results.iter().filter(|r| r.strategy == strategy).count();
                println!("{:<12} {}", strategy.as_str(), count);
            }
            println!();
        }

        let mismatches: Vec<_> = results.iter().filter(|r| !r.matches).collect();
        if !mismatches.is_empty() {
            println!("═══════════════════════════════════════════════════════════");
            println!("                  DETAILED MISMATCHES");
            println!("═══════════════════════════════════════════════════════════");

            for result in mismatches {
                println!(
                    "Turn {}: {} → {} (via {}, {}ms)",
                    result.turn,
                    result.original_move.as_str(),
                    result.replayed_move.as_str(),
                    result.strategy.as_str(),
                    result.computation_time_ms
                );
            }
            println!();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(turn: i32, matches: bool) -> ReplayResult {
        ReplayResult {
            turn,
            original_move: Direction::Up,
            replayed_move: if matches { Direction::Up } else { Direction::Left },
            strategy: Strategy::Disjoint,
            matches,
            computation_time_ms: 1,
        }
    }

    #[test]
    fn test_generate_stats() {
        let engine = ReplayEngine::new(Config::default_hardcoded(), false);
        let stats = engine.generate_stats(&[result(1, true), result(2, false), result(3, true), result(4, true)]);
        assert_eq!(stats.total_turns, 4);
        assert_eq!(stats.matches, 3);
        assert_eq!(stats.mismatches, 1);
        assert!((stats.match_rate - 75.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_generate_stats_empty() {
        let engine = ReplayEngine::new(Config::default_hardcoded(), false);
        let stats = engine.generate_stats(&[]);
        assert_eq!(stats.total_turns, 0);
        assert_eq!(stats.match_rate, 0.0);
    }
}
