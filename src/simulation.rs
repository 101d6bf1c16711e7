// Drives the autopilot through complete headless games
//
// Each game owns its own Bot, so batches run in parallel on the rayon pool
// without sharing any decision state.

use log::info;
use rayon::prelude::*;
use serde::Serialize;
use std::time::Instant;

use crate::bot::Bot;
use crate::config::Config;
use crate::debug_logger::DebugLogger;
use crate::game::{Game, GameStatus};
use crate::types::Decision;

/// How a simulated game ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GameOutcome {
    /// Ran into a wall or itself
    Crashed,
    /// Autopilot reported no safe move
    Trapped,
    /// Grid filled
    Won,
    /// Still alive at the tick limit
    TickLimit,
}

/// Summary of one simulated game
#[derive(Debug, Clone, Serialize)]
pub struct GameSummary {
    pub game: u64,
    pub seed: u64,
    pub outcome: GameOutcome,
    pub score: u32,
    pub length: usize,
    pub ticks: u32,
    pub elapsed_ms: u128,
}

/// Plays one game to completion with the autopilot in control
pub fn run_game(config: &Config, game_id: u64, seed: u64, logger: &DebugLogger) -> GameSummary {
    let start_time = Instant::now();
    let mut game = Game::new(config.grid.bounds(), &config.game, seed);
    let mut bot = Bot::new(config.clone());
    bot.enable();

    let outcome = loop {
        if game.tick() >= config.game.max_ticks {
            break GameOutcome::TickLimit;
        }

        let decision = bot.next_direction(game.snake(), game.food(), game.heading());
        if logger.is_enabled() {
            logger.log_decision(game_id, game.tick(), &game.snapshot(), decision);
        }

        let heading = match decision {
            Decision::Move(dir) => dir,
            Decision::NoSafeMove => break GameOutcome::Trapped,
            // The bot is enabled for the whole game; keep going straight if it ever is not
            Decision::Disabled => game.heading(),
        };

        match game.step(heading) {
            GameStatus::Running => {}
            GameStatus::Lost => break GameOutcome::Crashed,
            GameStatus::Won => break GameOutcome::Won,
        }
    };

    let summary = GameSummary {
        game: game_id,
        seed,
        outcome,
        score: game.score(),
        length: game.snake().len(),
        ticks: game.tick(),
        elapsed_ms: start_time.elapsed().as_millis(),
    };

    info!(
        "Game {} (seed {}): {:?} after {} ticks, score {}, length {}",
        summary.game, summary.seed, summary.outcome, summary.ticks, summary.score, summary.length
    );

    summary
}

/// Plays `count` games in parallel with seeds `base_seed..base_seed + count`
pub fn run_games(config: &Config, count: u64, base_seed: u64, logger: &DebugLogger) -> Vec<GameSummary> {
    let mut summaries: Vec<GameSummary> = (0..count)
        .into_par_iter()
        .map(|i| run_game(config, i, base_seed.wrapping_add(i), logger))
        .collect();

    summaries.sort_by_key(|s| s.game);
    logger.flush();
    summaries
}
