// src/main.rs

use focusbank_lib::accrual::multiplier_progress;
use focusbank_lib::clock::{Clock, SystemClock};
use focusbank_lib::config::AppConfig;
use focusbank_lib::format::{format_cents, format_duration, format_timestamp};
use focusbank_lib::errors::SessionError;
use focusbank_lib::models::{AmbientTrack, BankState, Difficulty, Preferences, Theme};
use focusbank_lib::persistence::{Ledger, StateStore};
use focusbank_lib::quotes;
use focusbank_lib::session::{ExitOutcome, FocusSession};
use focusbank_lib::settlement::{reset_bank, DepositReceipt};
use focusbank_lib::sound::TerminalSound;
use log::{error, info};
use std::fs;
use std::io::{self, BufRead, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

const DEFAULT_SESSION_SECONDS: u64 = 25 * 60;

const USAGE: &str = "\
Usage: focusbank <command>

Commands:
  run [seconds]                 Run a focus session (default 1500s)
  bank                          Show bank total, streaks and history
  tiers                         Show difficulty tiers
  set <key> <value>             theme | music | volume | quote-interval | auto-deposit | difficulty
  quote add|remove <text>       Manage custom quotes
  favorite add|remove <text>    Manage favorite quotes
  reset                         Clear all deposits, history and settings";

fn open_ledger(config: &AppConfig) -> Result<Ledger, String> {
    if let Some(dir) = config.db_path.parent().filter(|d| !d.as_os_str().is_empty()) {
        fs::create_dir_all(dir).map_err(|e| format!("failed to create data dir: {}", e))?;
    }
    info!("Database path: {:?}", config.db_path);
    let store = StateStore::open(&config.db_path).map_err(|e| e.to_string())?;
    Ledger::open(store).map_err(|e| e.to_string())
}

fn confirm(prompt: &str) -> bool {
    print!("{} [y/N] ", prompt);
    let _ = io::stdout().flush();
    let mut line = String::new();
    match io::stdin().lock().read_line(&mut line) {
        Ok(_) => matches!(line.trim().to_ascii_lowercase().as_str(), "y" | "yes"),
        Err(_) => false,
    }
}

fn print_receipt(receipt: &DepositReceipt) {
    println!();
    println!("{}", receipt.title());
    println!("{}", receipt.description());
    if let Some(message) = receipt.milestone_message() {
        println!("{}", message);
    }
    println!("Bank: {}", format_cents(receipt.new_bank_total_cents));
}

/// Forwards stdin lines so the tick loop can poll them without blocking.
fn spawn_input_reader() -> Receiver<String> {
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        for line in io::stdin().lock().lines() {
            let Ok(line) = line else { break };
            if tx.send(line.trim().to_ascii_lowercase()).is_err() {
                break;
            }
        }
    });
    rx
}

/// Like `confirm`, but reads from the run loop's input channel. A second
/// Ctrl-C or closed stdin counts as "no".
fn confirm_from(input: &Receiver<String>, interrupted: &AtomicBool, prompt: &str) -> bool {
    print!("{} [y/N] ", prompt);
    let _ = io::stdout().flush();
    interrupted.store(false, Ordering::SeqCst);
    loop {
        match input.recv_timeout(Duration::from_millis(200)) {
            Ok(line) => return matches!(line.as_str(), "y" | "yes"),
            Err(RecvTimeoutError::Timeout) if !interrupted.load(Ordering::SeqCst) => continue,
            Err(_) => return false,
        }
    }
}

fn report(result: Result<(), SessionError>, done: &str) {
    match result {
        Ok(()) => println!("\n{}", done),
        Err(e) => println!("\n{}", e),
    }
}

// --- Commands ---

fn run_session(config: &AppConfig, seconds: u64) -> Result<(), String> {
    let mut ledger = open_ledger(config)?;
    let clock = SystemClock;
    let prefs = ledger.state().preferences.clone();

    let interrupted = Arc::new(AtomicBool::new(false));
    let flag = Arc::clone(&interrupted);
    ctrlc::set_handler(move || flag.store(true, Ordering::SeqCst))
        .map_err(|e| format!("failed to install Ctrl-C handler: {}", e))?;
    let input = spawn_input_reader();

    let mut session = FocusSession::new(TerminalSound::new());
    session.start(&prefs).map_err(|e| e.to_string())?;

    let max = session
        .config()
        .map(|cfg| cfg.max_multiplier)
        .unwrap_or(1.0);
    println!(
        "Focusing for {} at {} difficulty ({} ambience).",
        format_duration(seconds),
        prefs.difficulty,
        prefs.music
    );
    println!("Type p + Enter to pause, r to resume, d to deposit now, q to stop. Ctrl-C also stops.");

    let mut deposit_now = false;
    'focus: while session.accrual().focused_seconds < seconds {
        if interrupted.load(Ordering::SeqCst) {
            info!("[Run] Interrupted at {}s", session.accrual().focused_seconds);
            break;
        }
        while let Ok(command) = input.try_recv() {
            match command.as_str() {
                "p" => report(session.pause(), "Paused."),
                "r" => report(session.resume(), "Resumed."),
                "d" => {
                    deposit_now = true;
                    break 'focus;
                }
                "q" => break 'focus,
                "" => {}
                other => println!("\nUnknown command {:?}", other),
            }
        }

        thread::sleep(config.tick_period);
        if !session.tick() {
            continue;
        }
        let acc = session.accrual();
        print!(
            "\r{:>10}  {:.2}x [{:<20}]  {}  ",
            format_cents(acc.session_cents),
            acc.current_multiplier,
            "#".repeat((multiplier_progress(acc.current_multiplier, max) * 20.0).round() as usize),
            quotes::quote_at(ledger.state(), acc.focused_seconds)
        );
        let _ = io::stdout().flush();
    }
    println!();

    if deposit_now {
        match session.deposit(&mut ledger, &clock) {
            Ok(receipt) => {
                print_receipt(&receipt);
                return Ok(());
            }
            Err(e) => println!("{}", e),
        }
    }

    match session.on_exit(&mut ledger, &clock) {
        ExitOutcome::Clean => println!("Nothing accrued this time."),
        ExitOutcome::AutoDeposited(receipt) => print_receipt(&receipt),
        ExitOutcome::NeedsConfirmation { message, .. } => {
            if confirm_from(&input, &interrupted, &message) {
                let receipt = session
                    .deposit(&mut ledger, &clock)
                    .map_err(|e| e.to_string())?;
                print_receipt(&receipt);
            } else {
                session.abandon();
                println!("Session discarded.");
            }
        }
    }
    Ok(())
}

fn show_bank(config: &AppConfig) -> Result<(), String> {
    let ledger = open_ledger(config)?;
    let state = ledger.state();
    let clock = SystemClock;

    println!("Total Manifested: {}", format_cents(state.bank_total_cents));
    println!(
        "Streak: {} day(s) (longest {})",
        state.current_streak, state.longest_streak
    );
    if state.history.is_empty() {
        println!("No deposits yet. Your focus is worth more than you think. Start one now.");
        return Ok(());
    }
    for entry in &state.history {
        println!(
            "  + {:>10}  {} · {} · {}",
            format_cents(entry.amount_cents),
            entry.label,
            format_duration(entry.duration_sec),
            format_timestamp(&clock, entry.timestamp)
        );
    }
    let n = state.history.len();
    println!("{} deposit{}", n, if n == 1 { "" } else { "s" });
    Ok(())
}

fn show_tiers(config: &AppConfig) -> Result<(), String> {
    let ledger = open_ledger(config)?;
    let current = ledger.state().preferences.difficulty;
    for tier in Difficulty::ALL {
        let cfg = tier.config();
        println!(
            "{} {:<12} {:.2}c/s  x{} every {}s  cap {:.1}x",
            if tier == current { "*" } else { " " },
            tier.as_str(),
            cfg.base_rate_cents_per_sec,
            cfg.growth_factor,
            cfg.growth_interval_sec,
            cfg.max_multiplier
        );
    }
    Ok(())
}

fn apply_preference(prefs: &mut Preferences, key: &str, value: &str) -> Result<(), String> {
    match key {
        "theme" => prefs.theme = value.parse::<Theme>()?,
        "music" => prefs.music = value.parse::<AmbientTrack>()?,
        "volume" => {
            let volume: u8 = value.parse().map_err(|_| format!("Invalid volume: {}", value))?;
            prefs.volume = volume.min(100);
        }
        "quote-interval" => {
            let secs: u32 = value
                .parse()
                .ok()
                .filter(|s| *s > 0)
                .ok_or_else(|| format!("Invalid quote interval: {}", value))?;
            prefs.quote_interval_sec = secs;
        }
        "auto-deposit" => {
            prefs.auto_deposit_on_exit = match value {
                "on" | "true" | "yes" => true,
                "off" | "false" | "no" => false,
                _ => return Err(format!("Expected on/off, got {}", value)),
            }
        }
        "difficulty" => prefs.difficulty = value.parse::<Difficulty>()?,
        _ => return Err(format!("Unknown setting: {}", key)),
    }
    Ok(())
}

fn set_preference(config: &AppConfig, key: &str, value: &str) -> Result<(), String> {
    let mut ledger = open_ledger(config)?;
    ledger.transact(|state| {
        let mut next = state.clone();
        apply_preference(&mut next.preferences, key, value)?;
        Ok::<_, String>((next, ()))
    })?;
    println!("Saved {} = {}", key, value);
    Ok(())
}

fn edit_list(
    config: &AppConfig,
    list: fn(&mut BankState) -> &mut Vec<String>,
    action: &str,
    text: &str,
) -> Result<(), String> {
    let mut ledger = open_ledger(config)?;
    ledger.transact(|state| {
        let mut next = state.clone();
        let target = list(&mut next);
        *target = match action {
            "add" => quotes::add_unique(target, text)?,
            "remove" => quotes::remove(target, text)?,
            _ => return Err(format!("Unknown action: {}", action)),
        };
        Ok((next, ()))
    })
}

fn reset(config: &AppConfig) -> Result<(), String> {
    let mut ledger = open_ledger(config)?;
    if !confirm("Reset your bank? This permanently deletes all deposits and history.") {
        println!("Cancelled.");
        return Ok(());
    }
    ledger.replace(reset_bank());
    println!("Bank reset complete. Time to start fresh.");
    Ok(())
}

fn dispatch(config: &AppConfig, args: &[String]) -> Result<(), String> {
    let args: Vec<&str> = args.iter().map(String::as_str).collect();
    match args.as_slice() {
        ["run"] => run_session(config, DEFAULT_SESSION_SECONDS),
        ["run", secs] => {
            let secs = secs
                .parse::<u64>()
                .map_err(|_| format!("Invalid duration: {}", secs))?;
            run_session(config, secs)
        }
        ["bank"] => show_bank(config),
        ["tiers"] => show_tiers(config),
        ["set", key, value @ ..] if !value.is_empty() => {
            set_preference(config, key, &value.join(" "))
        }
        ["quote", action, text @ ..] if !text.is_empty() => {
            edit_list(config, |s| &mut s.custom_quotes, action, &text.join(" "))
        }
        ["favorite", action, text @ ..] if !text.is_empty() => {
            edit_list(config, |s| &mut s.favorites, action, &text.join(" "))
        }
        ["reset"] => reset(config),
        _ => Err(USAGE.to_string()),
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = AppConfig::from_env();
    let args: Vec<String> = std::env::args().skip(1).collect();
    let now = SystemClock.now();
    info!("Starting focusbank at {}", now);

    if let Err(e) = dispatch(&config, &args) {
        error!("{}", e);
        std::process::exit(1);
    }
}
