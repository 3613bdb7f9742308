//! Headless balance simulator CLI.
//!
//! Plays combat runs back to back and reports kills, deaths, income and
//! stage progress.
//!
//! Usage:
//!   cargo run --bin simulator -- [OPTIONS]
//!
//! Examples:
//!   cargo run --bin simulator                       # 20 runs on stage 1
//!   cargo run --bin simulator -- -n 50 --auto-buy   # Spend currency between runs
//!   cargo run --bin simulator -- --seed 42          # Reproducible run

use slime_breach::core::{ConfigError, ContentPack, GameConfig};
use slime_breach::simulator::{run_simulation, SimConfig};
use std::env;
use std::process;
use tracing::Level;

struct Args {
    sim: SimConfig,
    balance_path: Option<String>,
    content_path: Option<String>,
    json: bool,
}

fn main() {
    let args: Vec<String> = env::args().collect();
    let parsed = parse_args(&args);
    let config = &parsed.sim;

    let level = match config.verbosity {
        0 => Level::ERROR,
        1 => Level::WARN,
        2 => Level::INFO,
        _ => Level::DEBUG,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    let (game_config, content) = match load_data(&parsed) {
        Ok(data) => data,
        Err(e) => {
            eprintln!("Failed to load game data: {}", e);
            process::exit(1);
        }
    };

    println!("╔═══════════════════════════════════════════════════════════════╗");
    println!("║              SLIME BREACH BALANCE SIMULATOR                   ║");
    println!("╚═══════════════════════════════════════════════════════════════╝");
    println!();
    println!("Configuration:");
    println!("  Runs:           {}", config.num_runs);
    println!("  Start Stage:    {}", config.start_stage);
    println!("  Seconds/Run:    {}", config.max_seconds_per_run);
    println!("  Tick:           {}s", config.dt);
    println!("  Auto-buy:       {}", config.auto_buy);
    if let Some(seed) = config.seed {
        println!("  Seed:           {}", seed);
    }
    println!();
    println!("Running simulation...");
    println!();

    let report = match run_simulation(config, game_config, content) {
        Ok(report) => report,
        Err(e) => {
            eprintln!("Simulation aborted: {}", e);
            process::exit(1);
        }
    };

    println!("{}", report.to_text());

    if parsed.json {
        let filename = format!(
            "sim_report_{}.json",
            chrono::Utc::now().format("%Y%m%d_%H%M%S")
        );
        let written = report
            .to_json()
            .map_err(|e| e.to_string())
            .and_then(|json| std::fs::write(&filename, json).map_err(|e| e.to_string()));
        match written {
            Ok(()) => println!("JSON report saved to: {}", filename),
            Err(e) => eprintln!("Failed to write JSON report: {}", e),
        }
    }
}

fn load_data(args: &Args) -> Result<(GameConfig, ContentPack), ConfigError> {
    let game_config = match &args.balance_path {
        Some(path) => GameConfig::from_json_str(&std::fs::read_to_string(path).map_err(ConfigError::Io)?)?,
        None => GameConfig::default(),
    };
    let content = match &args.content_path {
        Some(path) => ContentPack::from_json_str(&std::fs::read_to_string(path).map_err(ConfigError::Io)?)?,
        None => ContentPack::default(),
    };
    Ok((game_config, content))
}

fn parse_args(args: &[String]) -> Args {
    let mut sim = SimConfig::default();
    let mut balance_path = None;
    let mut content_path = None;
    let mut json = false;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "-n" | "--runs" => {
                if i + 1 < args.len() {
                    sim.num_runs = args[i + 1].parse().unwrap_or(20);
                    i += 1;
                }
            }
            "--seconds" => {
                if i + 1 < args.len() {
                    sim.max_seconds_per_run = args[i + 1].parse().unwrap_or(300.0);
                    i += 1;
                }
            }
            "-s" | "--seed" => {
                if i + 1 < args.len() {
                    sim.seed = args[i + 1].parse().ok();
                    i += 1;
                }
            }
            "--dt" => {
                if i + 1 < args.len() {
                    if let Ok(dt) = args[i + 1].parse::<f64>() {
                        if dt > 0.0 {
                            sim.dt = dt;
                        }
                    }
                    i += 1;
                }
            }
            "--stage" => {
                if i + 1 < args.len() {
                    sim.start_stage = args[i + 1].parse().unwrap_or(1);
                    i += 1;
                }
            }
            "--balance" => {
                if i + 1 < args.len() {
                    balance_path = Some(args[i + 1].clone());
                    i += 1;
                }
            }
            "--content" => {
                if i + 1 < args.len() {
                    content_path = Some(args[i + 1].clone());
                    i += 1;
                }
            }
            "--auto-buy" => {
                sim.auto_buy = true;
            }
            "--json" => {
                json = true;
            }
            "-v" | "--verbose" => {
                sim.verbosity = sim.verbosity.saturating_add(1).max(2);
            }
            "-q" | "--quiet" => {
                sim.verbosity = 0;
            }
            "-h" | "--help" => {
                print_help();
                process::exit(0);
            }
            "--quick" => {
                sim = SimConfig::quick();
            }
            "--progression" => {
                sim = SimConfig::progression();
            }
            other => {
                eprintln!("Ignoring unknown argument: {}", other);
            }
        }
        i += 1;
    }

    Args {
        sim,
        balance_path,
        content_path,
        json,
    }
}

fn print_help() {
    println!("Slime Breach Balance Simulator");
    println!();
    println!("USAGE:");
    println!("    cargo run --bin simulator -- [OPTIONS]");
    println!();
    println!("OPTIONS:");
    println!("    -n, --runs <N>         Number of combat runs (default: 20)");
    println!("        --seconds <S>      Time limit per run in seconds (default: 300)");
    println!("    -s, --seed <S>         Random seed for reproducibility");
    println!("        --dt <S>           Tick length in seconds (default: 0.016)");
    println!("        --stage <N>        Starting stage (default: 1)");
    println!("        --balance <FILE>   Load balance constants from JSON");
    println!("        --content <FILE>   Load upgrades, enemies and stages from JSON");
    println!("        --auto-buy         Buy the cheapest affordable upgrade between runs");
    println!("        --json             Save a JSON report");
    println!("    -v, --verbose          Per-run output (repeat for debug logs)");
    println!("    -q, --quiet            Errors only");
    println!("        --quick            Preset: 5 short runs");
    println!("        --progression      Preset: 100 runs with auto-buy");
    println!("    -h, --help             Print this help");
}
