// Re-runs the autopilot on a JSONL decision log written by the simulator
//
//   replay <log_file> (--all | --turns 3,8 | --validate 3:up,8:left|down) [--game N]
//          [--verbose] [--config Autopilot.toml]

use std::env;
use std::process;

use snake_autopilot::config::Config;
use snake_autopilot::replay::{LogEntry, ReplayEngine};
use snake_autopilot::types::Decision;

enum Mode {
    All,
    Turns(Vec<u32>),
    Validate(Vec<(u32, Vec<Decision>)>),
}

struct Options {
    log_file: String,
    mode: Mode,
    game: Option<u64>,
    config_path: String,
    verbose: bool,
}

const USAGE: &str = "\
replay: compare logged autopilot decisions with what the current build decides

usage: replay <log_file> <mode> [flags]

modes (pick one):
  --all                     every entry in the log
  --turns 3,8,21            only these turn numbers
  --validate 3:up,8:left|down,40:none
                            check the logged move against the accepted ones;
                            'none' stands for \"no safe move\"

flags:
  --game <id>               restrict to one game of a multi-game log
  --config <path>           settings file (default: Autopilot.toml)
  --verbose                 print every replayed decision
  --help                    show this text";

fn fail(message: &str) -> ! {
    eprintln!("replay: {}", message);
    process::exit(1);
}

fn parse_turn_list(s: &str) -> Result<Vec<u32>, String> {
    s.split(',')
        .map(|t| t.trim())
        .filter(|t| !t.is_empty())
        .map(|t| t.parse::<u32>().map_err(|_| format!("'{}' is not a turn number", t)))
        .collect()
}

/// Parses `turn:move|move,...` into accepted decisions per turn
fn parse_expectations(s: &str) -> Result<Vec<(u32, Vec<Decision>)>, String> {
    let mut expectations = Vec::new();

    for item in s.split(',').map(|i| i.trim()).filter(|i| !i.is_empty()) {
        let (turn, moves) = match item.find(':') {
            Some(pos) => (&item[..pos], &item[pos + 1..]),
            None => return Err(format!("'{}' should look like turn:move", item)),
        };

        let turn = turn
            .parse::<u32>()
            .map_err(|_| format!("'{}' is not a turn number", turn))?;
        let accepted = moves
            .split('|')
            .map(|m| ReplayEngine::parse_move(m.trim()))
            .collect::<Result<Vec<_>, _>>()?;

        expectations.push((turn, accepted));
    }

    Ok(expectations)
}

fn flag_value<'a>(args: &'a [String], i: usize, flag: &str) -> Result<&'a str, String> {
    args.get(i + 1)
        .map(|v| v.as_str())
        .ok_or_else(|| format!("{} needs a value", flag))
}

fn parse_args(args: &[String]) -> Result<Options, String> {
    let log_file = match args.get(1) {
        Some(path) if !path.starts_with("--") => path.clone(),
        _ => return Err("missing log file".to_string()),
    };

    let mut mode = None;
    let mut game = None;
    let mut config_path = "Autopilot.toml".to_string();
    let mut verbose = false;

    let mut i = 2;
    while i < args.len() {
        let flag = args[i].as_str();
        match flag {
            "--all" => mode = Some(Mode::All),
            "--verbose" => verbose = true,
            "--turns" => {
                mode = Some(Mode::Turns(parse_turn_list(flag_value(args, i, flag)?)?));
                i += 1;
            }
            "--validate" => {
                mode = Some(Mode::Validate(parse_expectations(flag_value(args, i, flag)?)?));
                i += 1;
            }
            "--game" => {
                let value = flag_value(args, i, flag)?;
                game = Some(
                    value
                        .parse::<u64>()
                        .map_err(|_| format!("'{}' is not a game id", value))?,
                );
                i += 1;
            }
            "--config" => {
                config_path = flag_value(args, i, flag)?.to_string();
                i += 1;
            }
            other => return Err(format!("unknown flag '{}'", other)),
        }
        i += 1;
    }

    let mode = mode.ok_or_else(|| "choose --all, --turns or --validate".to_string())?;

    Ok(Options {
        log_file,
        mode,
        game,
        config_path,
        verbose,
    })
}

fn main() {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    if args.iter().any(|a| a == "--help") {
        println!("{}", USAGE);
        return;
    }

    let options = match parse_args(&args) {
        Ok(options) => options,
        Err(e) => {
            eprintln!("replay: {}\n\n{}", e, USAGE);
            process::exit(1);
        }
    };

    // A replay of someone else's log should still run without their settings file
    let config = Config::from_file(&options.config_path).unwrap_or_else(|e| {
        eprintln!("replay: {} (falling back to built-in settings)", e);
        Config::default_hardcoded()
    });

    let engine = ReplayEngine::new(config, options.verbose);
    let mut entries: Vec<LogEntry> = engine
        .load_log_file(&options.log_file)
        .unwrap_or_else(|e| fail(&e));

    if let Some(game) = options.game {
        entries.retain(|e| e.game == game);
    }
    if entries.is_empty() {
        fail(&format!("no decisions to replay in {}", options.log_file));
    }

    println!("{}: {} decision(s)", options.log_file, entries.len());

    match options.mode {
        Mode::All => {
            let results = engine.replay_all(&entries);
            engine.print_report(&results);
        }
        Mode::Turns(turns) => {
            let results = engine
                .replay_turns(&entries, &turns)
                .unwrap_or_else(|e| fail(&e));
            engine.print_report(&results);
        }
        Mode::Validate(expectations) => {
            match engine.validate_expected_moves(&entries, &expectations) {
                Ok(()) => println!("{} expectation(s) hold", expectations.len()),
                Err(e) => fail(&e),
            }
        }
    }
}
