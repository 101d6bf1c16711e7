// Replays a JSONL decision log against the current autopilot
//
// Every logged snapshot is decided again by a fresh, uncached Bot and the
// answer is compared with the move that was written to the log.

use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::time::Instant;

use crate::bot::Bot;
use crate::config::Config;
use crate::game::Snapshot;
use crate::types::{Decision, Direction};

/// Represents a single log entry from the debug JSONL file
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct LogEntry {
    #[serde(default)]
    pub game: u64,
    pub turn: u32,
    pub chosen_move: String,
    pub snapshot: Snapshot,
    pub timestamp: String,
}

/// Result of replaying a single decision
#[derive(Debug, Clone)]
pub struct ReplayResult {
    pub game: u64,
    pub turn: u32,
    pub original_move: Decision,
    pub replayed_move: Decision,
    pub matches: bool,
    pub computation_time_us: u128,
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
    /// Creates a new replay engine with the given configuration
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

            let entry: LogEntry = serde_json::from_str(&line).map_err(|e| {
                format!("Failed to parse JSON on line {}: {}", line_num + 1, e)
            })?;

            entries.push(entry);
        }

        info!("Loaded {} log entries", entries.len());
        Ok(entries)
    }

    /// Runs a fresh autopilot on one snapshot
    ///
    /// Route caching is switched off so the decision depends only on the snapshot.
    pub fn replay_snapshot(&self, snapshot: &Snapshot) -> Decision {
        let mut config = self.config.clone();
        config.grid.width = snapshot.bounds.width;
        config.grid.height = snapshot.bounds.height;
        config.cache.enabled = false;

        let mut bot = Bot::new(config);
        bot.enable();
        bot.next_direction(&snapshot.snake, snapshot.food, snapshot.heading)
    }

    /// Replays a single log entry and compares the result
    pub fn replay_entry(&self, entry: &LogEntry) -> Result<ReplayResult, String> {
        let original_move = Self::parse_move(&entry.chosen_move)?;

        let start_time = Instant::now();
        let replayed_move = self.replay_snapshot(&entry.snapshot);
        let computation_time_us = start_time.elapsed().as_micros();

        let matches = original_move == replayed_move;

        if self.verbose {
            if matches {
                info!(
                    "game {} turn {}: {} again ({}us)",
                    entry.game,
                    entry.turn,
                    replayed_move.as_str(),
                    computation_time_us
                );
            } else {
                warn!(
                    "game {} turn {}: logged {}, now {} ({}us)",
                    entry.game,
                    entry.turn,
                    original_move.as_str(),
                    replayed_move.as_str(),
                    computation_time_us
                );
            }
        }

        Ok(ReplayResult {
            game: entry.game,
            turn: entry.turn,
            original_move,
            replayed_move,
            matches,
            computation_time_us,
        })
    }

    /// Replays all entries in a log file
    pub fn replay_all(&self, entries: &[LogEntry]) -> Vec<ReplayResult> {
        let mut results = Vec::new();

        for entry in entries {
            match self.replay_entry(entry) {
                Ok(result) => results.push(result),
                Err(e) => {
                    warn!("Failed to replay turn {}: {}", entry.turn, e);
                }
            }
        }

        results
    }

    /// Replays specific turns (of every game in the log)
    pub fn replay_turns(
        &self,
        entries: &[LogEntry],
        turn_numbers: &[u32],
    ) -> Result<Vec<ReplayResult>, String> {
        let mut results = Vec::new();

        for turn_num in turn_numbers {
            let selected: Vec<&LogEntry> = entries.iter().filter(|e| e.turn == *turn_num).collect();
            if selected.is_empty() {
                return Err(format!("Turn {} not found in log file", turn_num));
            }

            for entry in selected {
                match self.replay_entry(entry) {
                    Ok(result) => results.push(result),
                    Err(e) => {
                        warn!("Failed to replay turn {}: {}", turn_num, e);
                    }
                }
            }
        }

        Ok(results)
    }

    /// Generates statistics from replay results
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

    /// Prints match statistics followed by one line per disagreement
    pub fn print_report(&self, results: &[ReplayResult]) {
        let stats = self.generate_stats(results);

        println!();
        println!(
            "replayed {} decision(s): {} agree, {} differ ({:.1}% agreement)",
            stats.total_turns, stats.matches, stats.mismatches, stats.match_rate
        );

        if !results.is_empty() {
            let total_us: u128 = results.iter().map(|r| r.computation_time_us).sum();
            let slowest = results
                .iter()
                .max_by_key(|r| r.computation_time_us)
                .map(|r| r.computation_time_us)
                .unwrap_or(0);
            println!(
                "decision time: {:.1}us mean, {}us worst",
                total_us as f64 / results.len() as f64,
                slowest
            );
        }

        let differing: Vec<&ReplayResult> = results.iter().filter(|r| !r.matches).collect();
        if differing.is_empty() {
            println!();
            return;
        }

        println!();
        println!("{:>6} {:>6}  {:<8} {:<8}", "game", "turn", "logged", "now");
        for result in differing {
            println!(
                "{:>6} {:>6}  {:<8} {:<8}",
                result.game,
                result.turn,
                result.original_move.as_str(),
                result.replayed_move.as_str()
            );
        }
        println!();
    }

    /// Validates that specific expected moves were made
    pub fn validate_expected_moves(
        &self,
        entries: &[LogEntry],
        expected_moves: &[(u32, Vec<Decision>)], // (turn, acceptable_moves)
    ) -> Result<(), String> {
        for (turn, acceptable) in expected_moves {
            let entry = entries
                .iter()
                .find(|e| e.turn == *turn)
                .ok_or_else(|| format!("Turn {} not found in log", turn))?;

            let actual_move = Self::parse_move(&entry.chosen_move)?;

            if !acceptable.contains(&actual_move) {
                return Err(format!(
                    "Turn {}: Expected one of {:?}, but got {}",
                    turn,
                    acceptable.iter().map(|d| d.as_str()).collect::<Vec<_>>(),
                    actual_move.as_str()
                ));
            }
        }

        Ok(())
    }

    /// Parses a logged move: a direction name or "none"
    pub fn parse_move(s: &str) -> Result<Decision, String> {
        if s.eq_ignore_ascii_case("none") {
            return Ok(Decision::NoSafeMove);
        }
        Direction::parse(s).map(Decision::Move)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Coord, GridBounds};

    #[test]
    fn test_parse_move() {
        assert_eq!(
            ReplayEngine::parse_move("up").unwrap(),
            Decision::Move(Direction::Up)
        );
        assert_eq!(
            ReplayEngine::parse_move("Right").unwrap(),
            Decision::Move(Direction::Right)
        );
        assert_eq!(ReplayEngine::parse_move("none").unwrap(), Decision::NoSafeMove);
        assert!(ReplayEngine::parse_move("disabled").is_err());
        assert!(ReplayEngine::parse_move("invalid").is_err());
    }

    #[test]
    fn test_replay_snapshot_uses_snapshot_bounds() {
        let engine = ReplayEngine::new(Config::default_hardcoded(), false);
        let snapshot = Snapshot {
            bounds: GridBounds::new(5, 5),
            snake: vec![Coord::new(2, 2), Coord::new(1, 2), Coord::new(0, 2)],
            food: Coord::new(2, 0),
            heading: Direction::Right,
        };
        assert_eq!(
            engine.replay_snapshot(&snapshot),
            Decision::Move(Direction::Up)
        );
    }
}
