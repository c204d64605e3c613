//! `wasteland` terminal host.
//!
//! A line-based front end over the library: meditate in real time, go on
//! adventures, refine materials and answer tribulation prompts. All game
//! rules live in the library; this file only reads commands and prints.

use chrono::Utc;
use rand::rngs::ThreadRng;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use wasteland::build_info;
use wasteland::character::death::ReviveWithPenalty;
use wasteland::core::collaborators::SaveSink;
use wasteland::core::constants::{TICKS_PER_SECOND, TICK_INTERVAL_MS};
use wasteland::core::game_logic::{process_offline_progression, use_healing_pill};
use wasteland::core::tick::{game_tick, TickEvent};
use wasteland::persistence::{DebouncedSaver, SaveManager};
use wasteland::quests::{local_date, DailyQuestBoard, QuestKind};
use wasteland::tribulation::{BreakthroughMachine, TribulationConfig, Transition};
use wasteland::{GameSession, PlayerState};

type Session = GameSession<DebouncedSaver<SaveManager>, ReviveWithPenalty, DailyQuestBoard>;

const DEFAULT_MEDITATION_SECONDS: u64 = 10;

struct Options {
    config_path: Option<PathBuf>,
    save_path: Option<PathBuf>,
    name: Option<String>,
}

fn print_help() {
    println!("Wasteland - Cultivation Idle Game\n");
    println!("Usage: wasteland [options]\n");
    println!("Options:");
    println!("  --config <PATH>  Tribulation tuning JSON");
    println!("  --save <PATH>    Use this save file instead of the default");
    println!("  --name <NAME>    Name for a new character");
    println!("  --version        Show version information");
    println!("  --help           Show this help message");
}

fn print_commands() {
    println!("Commands:");
    println!("  meditate [secs]  Meditate in real time (default {})", DEFAULT_MEDITATION_SECONDS);
    println!("  adventure        Venture into the wasteland");
    println!("  status           Show your character");
    println!("  inv              List your inventory");
    println!("  refine <id>      Spend spirit stones refining an item");
    println!("  equip <id>       Equip an item");
    println!("  pill             Swallow a healing pill");
    println!("  quests           Show today's quests");
    println!("  claim            Claim finished quest rewards");
    println!("  save             Save now");
    println!("  quit             Save and exit");
}

fn parse_args() -> Options {
    let args: Vec<String> = std::env::args().collect();
    let mut options = Options {
        config_path: None,
        save_path: None,
        name: None,
    };

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--version" | "-v" => {
                println!("{}", build_info::version_line());
                std::process::exit(0);
            }
            "--help" | "-h" => {
                print_help();
                std::process::exit(0);
            }
            "--config" | "--save" | "--name" if i + 1 < args.len() => {
                let value = args[i + 1].clone();
                match args[i].as_str() {
                    "--config" => options.config_path = Some(PathBuf::from(value)),
                    "--save" => options.save_path = Some(PathBuf::from(value)),
                    _ => options.name = Some(value),
                }
                i += 1;
            }
            other => {
                eprintln!("Unknown argument: {}", other);
                eprintln!("Run 'wasteland --help' for usage.");
                std::process::exit(1);
            }
        }
        i += 1;
    }
    options
}

fn prompt(input: &mut impl BufRead, message: &str) -> io::Result<Option<String>> {
    print!("{}", message);
    io::stdout().flush()?;
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_string()))
}

fn quests_path(save_path: &Path) -> PathBuf {
    save_path.with_file_name("quests.json")
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let options = parse_args();
    env_logger::init();

    let tribulation = match &options.config_path {
        Some(path) => TribulationConfig::load_from_path(path)?,
        None => TribulationConfig::default(),
    };

    let save_manager = match &options.save_path {
        Some(path) => SaveManager::with_path(path.clone())?,
        None => SaveManager::new()?,
    };
    let quests_file = quests_path(save_manager.save_path());

    let stdin = io::stdin();
    let mut input = stdin.lock();

    let now = Utc::now().timestamp();
    let player = if save_manager.save_exists() {
        let loaded = save_manager.load()?;
        println!("Welcome back, {}.", loaded.character_name);
        loaded
    } else {
        let name = match options.name.clone() {
            Some(name) => name,
            None => prompt(&mut input, "Name your survivor: ")?
                .filter(|n| !n.is_empty())
                .unwrap_or_else(|| "Wanderer".to_string()),
        };
        println!("{} opens their eyes in the wasteland.", name);
        PlayerState::new(name, now)
    };

    let (player, offline) = process_offline_progression(&player, now);
    if offline.exp_gained > 0 {
        println!(
            "While you were away ({}s) you gathered {} exp.",
            offline.elapsed_seconds, offline.exp_gained
        );
    }

    let mut quests = match DailyQuestBoard::load_from_path(&quests_file) {
        Ok(board) => board,
        Err(e) => {
            log::debug!("starting a fresh quest board: {}", e);
            DailyQuestBoard::today()
        }
    };
    if quests.roll_over(local_date()) {
        println!("A new day. Fresh quests await.");
    }

    let mut session: Session = GameSession::new(
        player,
        BreakthroughMachine::new(tribulation),
        DebouncedSaver::new(save_manager),
        ReviveWithPenalty::default(),
        quests,
    );
    let mut rng = rand::thread_rng();

    for transition in session.settle() {
        report_transition(&mut session, &transition, &mut input, &mut rng)?;
    }

    print_commands();
    loop {
        let Some(line) = prompt(&mut input, "\n> ")? else {
            break;
        };
        let mut parts = line.split_whitespace();
        let command = parts.next().unwrap_or("");
        let arg = parts.next();

        match command {
            "" => {}
            "meditate" | "m" => {
                let seconds = arg
                    .and_then(|a| a.parse().ok())
                    .unwrap_or(DEFAULT_MEDITATION_SECONDS);
                meditate(&mut session, seconds, &mut input, &mut rng)?;
            }
            "adventure" | "a" => {
                let (report, transition) = session.adventure(&mut rng);
                println!(
                    "You return with {} exp and {} spirit stones, {} hp lighter.",
                    report.exp_gained, report.stones_gained, report.damage_taken
                );
                if let Some(kind) = report.item_found {
                    println!("You found a {}.", kind.name());
                }
                if let Some(flag) = report.flag_earned {
                    println!("Trial completed: {}.", flag.name());
                }
                report_transition(&mut session, &transition, &mut input, &mut rng)?;
            }
            "status" | "s" => print_status(session.player()),
            "inv" | "inventory" | "i" => print_inventory(session.player()),
            "refine" | "equip" => {
                let Some(id) = arg.and_then(|a| a.parse::<u64>().ok()) else {
                    println!("Usage: {} <item id>", command);
                    continue;
                };
                let result = if command == "refine" {
                    session.refine(id)
                } else {
                    session.equip(id)
                };
                match result {
                    Ok(transition) => {
                        if let Some(item) = session.player().inventory.get(id) {
                            println!("{} ({}% refined)", item.name, item.refinement);
                        }
                        report_transition(&mut session, &transition, &mut input, &mut rng)?;
                    }
                    Err(e) => println!("{}", e),
                }
            }
            "pill" => match use_healing_pill(session.player()) {
                Ok(healed) => {
                    let transition = session.replace_player(healed);
                    println!("Warmth floods your meridians. Hp restored.");
                    report_transition(&mut session, &transition, &mut input, &mut rng)?;
                }
                Err(e) => println!("{}", e),
            },
            "quests" | "q" => print_quests(session.quests()),
            "claim" => {
                let mut stones = 0;
                for kind in QuestKind::all() {
                    stones += session.quests_mut().claim(kind).unwrap_or(0);
                }
                if stones == 0 {
                    println!("Nothing to claim.");
                } else {
                    let mut next = session.player().clone();
                    next.spirit_stones += stones;
                    let transition = session.replace_player(next);
                    println!("Claimed {} spirit stones.", stones);
                    report_transition(&mut session, &transition, &mut input, &mut rng)?;
                }
            }
            "save" => {
                save_all(&mut session, &quests_file);
                println!("Saved.");
            }
            "quit" | "exit" => break,
            "help" | "?" => print_commands(),
            other => println!("Unknown command '{}'. Type 'help'.", other),
        }

        session.saver_mut().flush_due(Instant::now());
    }

    save_all(&mut session, &quests_file);
    println!("Progress saved. Farewell, {}.", session.player().character_name);
    Ok(())
}

fn save_all(session: &mut Session, quests_file: &Path) {
    let player = session.player().clone();
    session.saver_mut().request_save(&player);
    session.saver_mut().flush();
    if let Err(e) = session.quests().save_to_path(quests_file) {
        log::warn!("could not save quests: {}", e);
    }
}

/// Runs real-time ticks until `seconds` pass or the machine needs an answer.
fn meditate(
    session: &mut Session,
    seconds: u64,
    input: &mut impl BufRead,
    rng: &mut ThreadRng,
) -> io::Result<()> {
    let ticks = seconds * TICKS_PER_SECOND;
    let mut gained = 0;
    println!("You sit and draw in the thin qi of the wasteland...");

    for _ in 0..ticks {
        std::thread::sleep(Duration::from_millis(TICK_INTERVAL_MS));
        let result = game_tick(session);
        gained += result.exp_gained;
        session.saver_mut().flush_due(Instant::now());

        let mut interrupted = false;
        for event in &result.events {
            print_event(event);
            if let TickEvent::TribulationPending {
                reveal_delay_ms, ..
            } = event
            {
                std::thread::sleep(Duration::from_millis(*reveal_delay_ms));
                answer_tribulation(session, input, rng)?;
                interrupted = true;
            }
        }
        if interrupted {
            break;
        }
    }

    let player = session.player();
    println!(
        "Meditation ends. +{} exp ({}/{}).",
        gained, player.exp, player.max_exp
    );
    Ok(())
}

fn print_event(event: &TickEvent) {
    match event {
        TickEvent::LevelUp { message, .. }
        | TickEvent::Breakthrough { message, .. }
        | TickEvent::BreakthroughBlocked { message }
        | TickEvent::TribulationPending { message, .. }
        | TickEvent::PeakReached { message }
        | TickEvent::Died { message, .. } => println!("{}", message),
    }
}

/// Prints a transition from a non-tick action and asks about tribulations.
fn report_transition(
    session: &mut Session,
    transition: &Transition,
    input: &mut impl BufRead,
    rng: &mut ThreadRng,
) -> io::Result<()> {
    if let Some(event) = TickEvent::from_transition(transition) {
        print_event(&event);
        if let TickEvent::TribulationPending {
            reveal_delay_ms, ..
        } = event
        {
            std::thread::sleep(Duration::from_millis(reveal_delay_ms));
            answer_tribulation(session, input, rng)?;
        }
    }
    Ok(())
}

fn answer_tribulation(
    session: &mut Session,
    input: &mut impl BufRead,
    rng: &mut ThreadRng,
) -> io::Result<()> {
    let answer = prompt(input, "Face the heavenly tribulation? [y/n] ")?;
    let confirmed = matches!(answer.as_deref(), Some("y") | Some("Y") | Some("yes"));

    if !confirmed {
        if let Err(e) = session.decline_tribulation() {
            log::warn!("{}", e);
        }
        println!("You suppress your cultivation. The clouds disperse.");
        return Ok(());
    }

    if let Err(e) = session.confirm_tribulation() {
        log::warn!("{}", e);
        return Ok(());
    }

    match session.run_tribulation(rng) {
        Ok((result, transition)) => {
            println!("{}", result.description());
            if let Some(event) = TickEvent::from_transition(&transition) {
                print_event(&event);
            }
            if matches!(transition, Transition::Died { .. }) {
                println!(
                    "You are dragged back from death's door. Exp: {}/{}.",
                    session.player().exp,
                    session.player().max_exp
                );
            }
        }
        Err(e) => log::warn!("{}", e),
    }
    Ok(())
}

fn print_status(player: &PlayerState) {
    let a = &player.attributes;
    println!("{} - {}", player.character_name, player.position());
    println!(
        "Exp {}/{} ({:.0}%)",
        player.exp,
        player.max_exp,
        player.exp_progress() * 100.0
    );
    println!(
        "Hp {}/{}  Atk {}  Def {}  Spi {}  Phy {}  Spd {}  Luck {}",
        a.hp, a.max_hp, a.attack, a.defense, a.spirit, a.physique, a.speed, a.luck
    );
    println!("Spirit stones: {}", player.spirit_stones);
    if !player.flags.is_empty() {
        let flags: Vec<&str> = player.flags.iter().map(|f| f.name()).collect();
        println!("Trials: {}", flags.join(", "));
    }
    println!(
        "Breakthroughs: {}  Deaths: {}  Played: {}s",
        player.total_breakthroughs, player.total_deaths, player.play_time_seconds
    );
}

fn print_inventory(player: &PlayerState) {
    if player.inventory.is_empty() {
        println!("Your pack is empty.");
        return;
    }
    for item in player.inventory.items() {
        let mut line = format!("[{}] {} x{}", item.id, item.name, item.quantity);
        if item.kind.is_refinable() {
            line.push_str(&format!("  {}% refined", item.refinement));
        }
        if item.equipped {
            line.push_str("  (equipped)");
        }
        println!("{}", line);
    }
}

fn print_quests(board: &DailyQuestBoard) {
    println!("Quests for {}:", board.date);
    for quest in &board.quests {
        let state = if quest.claimed {
            "claimed"
        } else if quest.is_complete() {
            "done"
        } else {
            ""
        };
        println!(
            "  {:<28} {:>4}/{:<4} {}",
            quest.kind.description(),
            quest.progress,
            quest.goal,
            state
        );
    }
}
