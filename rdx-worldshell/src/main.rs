use anyhow::Result;
use colored::Colorize;
use rustyline::highlight::Highlighter;
use rustyline::Editor;
use rustyline_derive::{Completer, Helper, Hinter, Validator};
use std::borrow::Cow;
use std::env;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;
use worldclock::prelude::*;
use worldclock::{ENGINE_NAME, VERSION as LIB_VERSION};

const SHELL_VERSION: &str = env!("CARGO_PKG_VERSION");

/// A custom helper struct for rustyline that enables syntax highlighting.
#[derive(Completer, Helper, Hinter, Validator)]
struct CommandHighlighter;

impl Highlighter for CommandHighlighter {
    fn highlight<'l>(&self, line: &'l str, _pos: usize) -> Cow<'l, str> {
        if let Some((command, rest)) = line.split_once(' ') {
            Cow::Owned(format!("{} {}", command.yellow().bold(), rest.yellow()))
        } else {
            Cow::Owned(line.yellow().bold().to_string())
        }
    }
    fn highlight_char(&self, _line: &str, _pos: usize, _forced: bool) -> bool {
        true
    }
}

fn print_banner() {
    if env::var("QUIET_MODE").is_ok() {
        return;
    }
    const LOGO_TEXT: &str = include_str!("../logo.log");
    println!("{}", LOGO_TEXT.cyan());

    let version_string = format!(
        "          Shell   v{:<8} Library   v{:<8}",
        SHELL_VERSION, LIB_VERSION
    );
    println!("{}", "-".repeat(60).dimmed());
    println!("{}", version_string);
    println!("{}", "-".repeat(60).dimmed());
}

/// Splits `add` arguments into the name and the offset text.
///
/// The last argument is the offset when it looks numeric, so multi-word
/// names work: `add New York -5`.
fn split_add_args<'a>(args: &[&'a str]) -> (String, Option<&'a str>) {
    match args.split_last() {
        Some((last, rest)) if !rest.is_empty() && looks_numeric(last) => {
            (rest.join(" "), Some(*last))
        }
        _ => (args.join(" "), None),
    }
}

fn looks_numeric(token: &str) -> bool {
    let digits = token.strip_prefix(['+', '-']).unwrap_or(token);
    digits.chars().next().is_some_and(|c| c.is_ascii_digit())
}

/// Spawns the tick printer, gated by the shared `watch` flag.
fn spawn_tick_listener(engine: &WorldClockEngine, is_watching: Arc<AtomicBool>) {
    let mut tick_rx = engine.subscribe_tick_events();
    tokio::spawn(async move {
        while let Some(tick) = next_event(&mut tick_rx).await {
            if is_watching.load(Ordering::Relaxed) {
                println!(
                    "<-- [TICK] {:<16} {:02}:{:02}:{:02}  h {:>5.1}°  m {:>5.1}°  s {:>5.1}°",
                    tick.name,
                    tick.wall.hours,
                    tick.wall.minutes,
                    tick.wall.seconds,
                    tick.display.hour_angle_deg,
                    tick.display.minute_angle_deg,
                    tick.display.second_angle_deg,
                );
            }
        }
    });
}

async fn print_list(engine: &WorldClockEngine) {
    let clocks = engine.list_clocks().await;
    if clocks.is_empty() {
        println!("No clocks. Try 'add <NAME> [OFFSET]'.");
        return;
    }
    println!("Clocks:");
    for (position, (id, clock)) in clocks.iter().enumerate() {
        if let Some((wall, _)) = engine.display_time(*id).await {
            println!(
                "  #{:<3} {:<20} {:<7} {:02}:{:02}:{:02}",
                position,
                clock.name.bold(),
                clock.offset.to_string(),
                wall.hours,
                wall.minutes,
                wall.seconds
            );
        }
    }
}

async fn print_faces(engine: &WorldClockEngine) {
    let radius = engine.config().face_radius;
    for (position, (id, clock)) in engine.list_clocks().await.iter().enumerate() {
        let Some((wall, display)) = engine.display_time(*id).await else {
            continue;
        };
        println!(
            "#{} {} ({}) {:02}:{:02}:{:02}",
            position,
            clock.name.bold(),
            clock.offset,
            wall.hours,
            wall.minutes,
            wall.seconds
        );
        for line in render_face(&display, radius) {
            println!("  {}", line.cyan());
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    print_banner();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_target(false)
        .init();

    let path = env::args().nth(1).map(PathBuf::from);
    let config = WorldClockConfig::load(path.as_deref())?;
    let engine = WorldClockEngine::new(config);

    let is_watching = Arc::new(AtomicBool::new(false));
    spawn_tick_listener(&engine, is_watching.clone());

    let mounted = engine.mount_presets().await;
    info!("Mounted {} configured clock(s).", mounted);

    let mut form = ClockForm::new();
    let mut rl = Editor::new()?;
    rl.set_helper(Some(CommandHighlighter));

    println!(
        "{} is running. Type 'help' for commands or 'exit' to quit.",
        ENGINE_NAME.cyan()
    );

    loop {
        let prompt = format!("{}", ">> ".cyan().bold());
        match rl.readline(&prompt) {
            Ok(line) => {
                rl.add_history_entry(line.as_str())?;
                let args = line.split_whitespace().collect::<Vec<_>>();
                let Some(command) = args.first() else {
                    continue;
                };
                match *command {
                    "add" => {
                        let (name, offset) = split_add_args(&args[1..]);
                        form.set_name(name);
                        form.set_offset_input(offset.unwrap_or("0"));
                        match form.submit(&engine).await {
                            Ok(_) => print_list(&engine).await,
                            Err(RegistryError::EmptyName) => {}
                            Err(e) => println!("Error: {}", e),
                        }
                    }
                    "remove" => match args.get(1).map(|s| s.parse::<usize>()) {
                        Some(Ok(position)) => match engine.remove_clock(position).await {
                            Some((_, clock)) => println!("--> Removed '{}'.", clock.name),
                            None => {
                                println!("Error: no clock at position #{}. Use 'list'.", position)
                            }
                        },
                        Some(Err(_)) => {
                            println!("Error: position must be a number (e.g., '0', '1').")
                        }
                        None => println!("Usage: remove <POSITION>"),
                    },
                    "list" => print_list(&engine).await,
                    "show" => print_faces(&engine).await,
                    "watch" => match args.get(1) {
                        Some(&"on") => {
                            is_watching.store(true, Ordering::Relaxed);
                            println!("--> Printing ticks.");
                        }
                        Some(&"off") => {
                            is_watching.store(false, Ordering::Relaxed);
                            println!("--> Stopped printing ticks.");
                        }
                        _ => println!("Usage: watch on|off"),
                    },
                    "help" => {
                        println!("Available commands:");
                        println!("  add <NAME> [OFFSET]   - Adds a clock at UTC+OFFSET (-12..12).");
                        println!("  list                  - Shows clocks with their positions.");
                        println!("  remove <POSITION>     - Removes the clock at a position.");
                        println!("  show                  - Draws the analog face of every clock.");
                        println!("  watch on|off          - Starts or stops printing ticks.");
                        println!("  exit                  - Quits the shell.");
                    }
                    "exit" => break,
                    _ => println!("Unknown command: '{}'. Type 'help'.", line.trim()),
                }
            }
            Err(_) => {
                println!("Exiting worldshell...");
                break;
            }
        }
    }

    engine.shutdown().await;
    Ok(())
}
