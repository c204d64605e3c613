//! Breakthrough balance simulator CLI.
//!
//! Run Monte Carlo simulations to see how long realms take and how often
//! tribulations kill.
//!
//! Usage:
//!   cargo run --bin simulate -- [OPTIONS]
//!
//! Examples:
//!   cargo run --bin simulate                         # 100 runs to Golden Core
//!   cargo run --bin simulate -- -n 20 -r nascent     # 20 runs to Nascent Soul
//!   cargo run --bin simulate -- --seed 42            # Reproducible run

use std::env;
use std::path::PathBuf;
use wasteland::character::realm::Realm;
use wasteland::simulator::{run_simulation_with, SimConfig};
use wasteland::tribulation::TribulationConfig;

fn main() {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let (config, tribulation_path) = parse_args(&args);

    let tribulation = match tribulation_path {
        Some(path) => match TribulationConfig::load_from_path(&path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("Failed to load {}: {}", path.display(), e);
                std::process::exit(1);
            }
        },
        None => TribulationConfig::default(),
    };

    println!("╔═══════════════════════════════════════════════════════════════╗");
    println!("║              WASTELAND BREAKTHROUGH SIMULATOR                 ║");
    println!("╚═══════════════════════════════════════════════════════════════╝");
    println!();
    println!("Configuration:");
    println!("  Runs:           {}", config.num_runs);
    println!("  Target Realm:   {}", config.target_realm);
    println!("  Max Ticks:      {}", config.max_ticks_per_run);
    if config.adventure_interval > 0 {
        println!("  Adventures:     every {} ticks", config.adventure_interval);
    } else {
        println!("  Adventures:     off");
    }
    println!("  Auto Refine:    {}", config.auto_refine);
    if let Some(seed) = config.seed {
        println!("  Seed:           {}", seed);
    }
    println!();
    println!("Running simulation...");
    println!();

    let report = run_simulation_with(&config, &tribulation);

    println!("{}", report.to_text());

    if args.iter().any(|a| a == "--json") {
        let json = report.to_json();
        let filename = format!(
            "sim_report_{}.json",
            chrono::Utc::now().format("%Y%m%d_%H%M%S")
        );
        match std::fs::write(&filename, json) {
            Ok(()) => println!("JSON report saved to: {}", filename),
            Err(e) => eprintln!("Failed to write JSON report: {}", e),
        }
    }
}

/// Accepts a realm number (1-9) or any unambiguous prefix of its name.
fn parse_realm(arg: &str) -> Option<Realm> {
    if let Ok(n) = arg.parse::<usize>() {
        return Realm::all().get(n.checked_sub(1)?).copied();
    }
    let wanted: String = arg
        .chars()
        .filter(|c| c.is_alphanumeric())
        .collect::<String>()
        .to_lowercase();
    if wanted.is_empty() {
        return None;
    }
    let mut matches = Realm::all().into_iter().filter(|realm| {
        let name: String = realm
            .name()
            .chars()
            .filter(|c| c.is_alphanumeric())
            .collect::<String>()
            .to_lowercase();
        name.starts_with(&wanted)
    });
    let first = matches.next()?;
    matches.next().is_none().then_some(first)
}

fn parse_args(args: &[String]) -> (SimConfig, Option<PathBuf>) {
    let mut config = SimConfig::default();
    let mut tribulation_path = None;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "-n" | "--runs" => {
                if i + 1 < args.len() {
                    config.num_runs = args[i + 1].parse().unwrap_or(100);
                    i += 1;
                }
            }
            "-r" | "--realm" => {
                if i + 1 < args.len() {
                    match parse_realm(&args[i + 1]) {
                        Some(realm) => config.target_realm = realm,
                        None => eprintln!("Unknown realm '{}', keeping default", args[i + 1]),
                    }
                    i += 1;
                }
            }
            "-s" | "--seed" => {
                if i + 1 < args.len() {
                    config.seed = args[i + 1].parse().ok();
                    i += 1;
                }
            }
            "-t" | "--ticks" => {
                if i + 1 < args.len() {
                    config.max_ticks_per_run = args[i + 1].parse().unwrap_or(2_000_000);
                    i += 1;
                }
            }
            "-a" | "--adventure-every" => {
                if i + 1 < args.len() {
                    config.adventure_interval = args[i + 1].parse().unwrap_or(600);
                    i += 1;
                }
            }
            "-c" | "--config" => {
                if i + 1 < args.len() {
                    tribulation_path = Some(PathBuf::from(&args[i + 1]));
                    i += 1;
                }
            }
            "--no-refine" => {
                config.auto_refine = false;
            }
            "-v" | "--verbose" => {
                config.verbosity = 2;
            }
            "-h" | "--help" => {
                print_help();
                std::process::exit(0);
            }
            "--quick" => {
                config = SimConfig::realm_balance_test(Realm::Foundation);
            }
            _ => {}
        }
        i += 1;
    }

    (config, tribulation_path)
}

fn print_help() {
    println!("Wasteland Breakthrough Simulator");
    println!();
    println!("USAGE:");
    println!("    cargo run --bin simulate -- [OPTIONS]");
    println!();
    println!("OPTIONS:");
    println!("    -n, --runs <N>             Number of simulation runs (default: 100)");
    println!("    -r, --realm <R>            Target realm, number or name (default: Golden Core)");
    println!("    -s, --seed <S>             Random seed for reproducibility");
    println!("    -t, --ticks <T>            Max ticks per run (default: 2,000,000)");
    println!("    -a, --adventure-every <T>  Ticks between adventures, 0 disables (default: 600)");
    println!("    -c, --config <PATH>        Tribulation tuning JSON");
    println!("    --no-refine                Never refine breakthrough materials");
    println!("    -v, --verbose              Verbose output");
    println!("    --json                     Save JSON report");
    println!("    --quick                    Quick test (20 runs to Foundation)");
    println!("    -h, --help                 Show this help");
    println!();
    println!("EXAMPLES:");
    println!("    cargo run --bin simulate                       # Default run");
    println!("    cargo run --bin simulate -- -n 20 -r nascent   # 20 runs to Nascent Soul");
    println!("    cargo run --bin simulate -- --seed 42 --json   # Reproducible, with JSON");
}
