// Headless simulator for the snake autopilot
//
// Usage:
//   cargo run -- [options]
//
// Options:
//   --games <N>        Number of games to simulate (default: 1)
//   --seed <S>         Seed of the first game (default: 0)
//   --max-ticks <T>    Override game.max_ticks
//   --log <path>       Write a JSONL decision log to this path
//   --config <path>    Path to Autopilot.toml (default: Autopilot.toml)

use log::info;
use std::env;
use std::process;

use snake_autopilot::config::Config;
use snake_autopilot::debug_logger::DebugLogger;
use snake_autopilot::simulation::{run_games, GameOutcome, GameSummary};

fn print_usage() {
    eprintln!("Snake Autopilot Simulator");
    eprintln!();
    eprintln!("USAGE:");
    eprintln!("  snake-autopilot [OPTIONS]");
    eprintln!();
    eprintln!("OPTIONS:");
    eprintln!("  --games <N>             Number of games to simulate (default: 1)");
    eprintln!("  --seed <S>              Seed of the first game (default: 0)");
    eprintln!("  --max-ticks <T>         Override game.max_ticks from the config");
    eprintln!("  --log <path>            Write a JSONL decision log to this path");
    eprintln!("  --config <path>         Path to Autopilot.toml (default: Autopilot.toml)");
    eprintln!("  --help                  Show this help message");
}

fn parse_number<T: std::str::FromStr>(flag: &str, value: Option<&String>) -> T
where
    T::Err: std::fmt::Display,
{
    let value = match value {
        Some(v) => v,
        None => {
            eprintln!("Error: {} requires an argument", flag);
            process::exit(1);
        }
    };
    match value.parse::<T>() {
        Ok(n) => n,
        Err(e) => {
            eprintln!("Error: invalid value '{}' for {}: {}", value, flag, e);
            process::exit(1);
        }
    }
}

fn print_summary(summaries: &[GameSummary]) {
    println!("\n═══════════════════════════════════════════════════════════");
    println!("                  SIMULATION SUMMARY");
    println!("═══════════════════════════════════════════════════════════");

    for s in summaries {
        println!(
            "Game {:>3} (seed {:>5}): {:<10} score {:>5}  length {:>4}  ticks {:>5}  {}ms",
            s.game,
            s.seed,
            format!("{:?}", s.outcome),
            s.score,
            s.length,
            s.ticks,
            s.elapsed_ms
        );
    }

    if summaries.is_empty() {
        println!();
        return;
    }

    let count = |outcome: GameOutcome| summaries.iter().filter(|s| s.outcome == outcome).count();
    let avg_score =
        summaries.iter().map(|s| s.score as f64).sum::<f64>() / summaries.len() as f64;
    let best = summaries.iter().map(|s| s.score).max().unwrap_or(0);

    println!("───────────────────────────────────────────────────────────");
    println!("Games:          {}", summaries.len());
    println!("Average Score:  {:.1}", avg_score);
    println!("Best Score:     {}", best);
    println!(
        "Outcomes:       {} crashed, {} trapped, {} won, {} hit tick limit",
        count(GameOutcome::Crashed),
        count(GameOutcome::Trapped),
        count(GameOutcome::Won),
        count(GameOutcome::TickLimit)
    );
    println!("═══════════════════════════════════════════════════════════\n");
}

fn main() {
    // We default to 'info' level logging. But if the `RUST_LOG` environment variable is set,
    // we keep that value instead.
    if env::var("RUST_LOG").is_err() {
        env::set_var("RUST_LOG", "info");
    }

    env_logger::init();

    let args: Vec<String> = env::args().collect();

    if args.contains(&"--help".to_string()) {
        print_usage();
        process::exit(0);
    }

    let mut config_path: Option<String> = None;
    let mut games: u64 = 1;
    let mut seed: u64 = 0;
    let mut max_ticks: Option<u32> = None;
    let mut log_path: Option<String> = None;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--games" => {
                games = parse_number("--games", args.get(i + 1));
                i += 1;
            }
            "--seed" => {
                seed = parse_number("--seed", args.get(i + 1));
                i += 1;
            }
            "--max-ticks" => {
                max_ticks = Some(parse_number("--max-ticks", args.get(i + 1)));
                i += 1;
            }
            "--log" => {
                match args.get(i + 1) {
                    Some(path) => log_path = Some(path.clone()),
                    None => {
                        eprintln!("Error: --log requires an argument");
                        process::exit(1);
                    }
                }
                i += 1;
            }
            "--config" => {
                match args.get(i + 1) {
                    Some(path) => config_path = Some(path.clone()),
                    None => {
                        eprintln!("Error: --config requires an argument");
                        process::exit(1);
                    }
                }
                i += 1;
            }
            other => {
                eprintln!("Error: unknown argument '{}'", other);
                print_usage();
                process::exit(1);
            }
        }
        i += 1;
    }

    let mut config = match config_path {
        Some(path) => Config::from_file(&path).unwrap_or_else(|e| {
            eprintln!("Error: {}", e);
            process::exit(1);
        }),
        None => Config::load_or_default(),
    };

    if let Some(ticks) = max_ticks {
        config.game.max_ticks = ticks;
    }

    let logger = match log_path {
        Some(path) => DebugLogger::new(true, &path),
        None => DebugLogger::new(config.debug.enabled, &config.debug.log_file_path),
    };

    info!(
        "Simulating {} game(s) on a {}x{} grid",
        games, config.grid.width, config.grid.height
    );

    let summaries = run_games(&config, games, seed, &logger);
    print_summary(&summaries);
}
