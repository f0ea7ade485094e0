// Standalone replay tool for checking planner decisions against a debug log
//
// Usage:
//   cargo run --bin replay -- <log_file> [options]
//
// Options:
//   --turns <turn1,turn2>  Replay specific turns (comma-separated)
//   --verbose              Show detailed output for each turn
//   --config <path>        Path to Snake.toml (default: Snake.toml)

use std::env;
use std::process;

use tailchaser::config::Config;
use tailchaser::replay::ReplayEngine;

fn print_usage() {
    eprintln!("Tailchaser Replay Tool");
    eprintln!();
    eprintln!("USAGE:");
    eprintln!("  replay <log_file> [OPTIONS]");
    eprintln!();
    eprintln!("OPTIONS:");
    eprintln!("  --turns <T1,T2,...>     Replay specific turns (comma-separated)");
    eprintln!("  --verbose               Show detailed output for each turn");
    eprintln!("  --config <path>         Path to Snake.toml (default: Snake.toml)");
    eprintln!("  --help                  Show this help message");
    eprintln!();
    eprintln!("EXAMPLES:");
    eprintln!("  replay battlesnake_debug.jsonl");
    eprintln!("  replay battlesnake_debug.jsonl --turns 5,10,15 --verbose");
}

fn parse_turns(s: &str) -> Result<Vec<i32>, String> {
    s.split(',')
        .map(|t| {
            t.trim()
                .parse::<i32>()
                .map_err(|e| format!("Invalid turn number '{}': {}", t, e))
        })
        .collect()
}

fn run(args: &[String]) -> Result<(), String> {
    let log_file = &args[1];
    let mut config_path = "Snake.toml".to_string();
    let mut verbose = false;
    let mut turns = None;

    let mut i = 2;
    while i < args.len() {
        match args[i].as_str() {
            "--turns" => {
                let value = args.get(i + 1).ok_or("--turns requires a value")?;
                turns = Some(parse_turns(value)?);
                i += 1;
            }
            "--config" => {
                config_path = args.get(i + 1).ok_or("--config requires a value")?.clone();
                i += 1;
            }
            "--verbose" => verbose = true,
            other => return Err(format!("Unknown option: {}", other)),
        }
        i += 1;
    }

    let config = Config::from_file(&config_path).unwrap_or_else(|e| {
        eprintln!("Warning: {} ({}), using hardcoded defaults", e, config_path);
        Config::default_hardcoded()
    });

    let engine = ReplayEngine::new(config, verbose);
    let entries = engine.load_log_file(log_file)?;

    let results = match turns {
        Some(turns) => engine.replay_turns(&entries, &turns)?,
        None => engine.replay_all(&entries),
    };

    engine.print_report(&results);
    Ok(())
}

fn main() {
    env_logger::init();

    let args: Vec<String> = env::args().collect();

    if args.len() < 2 || args.iter().any(|a| a == "--help") {
        print_usage();
        process::exit(if args.iter().any(|a| a == "--help") { 0 } else { 1 });
    }

    if let Err(e) = run(&args) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}
