mod ui;

use anyhow::{anyhow, bail, Context, Result};
use dragon_trials_core::battle::damage::{
    FIREBALL_MAX, FIREBALL_MIN, SLASH_MAX, SLASH_MIN, TONIC_HEAL,
};
use dragon_trials_core::battle::encounter::Encounter;
use dragon_trials_core::battle::policy::{
    drive, policy_named, CautiousPolicy, DriveLimits, DriveOutcome, ScriptedPolicy,
};
use dragon_trials_core::battle::script::{lookup_move, parse_script};
use dragon_trials_core::battle::state::MoveKind;
use dragon_trials_core::leaderboard::{format_clock, Entry, Leaderboard, BOARD_LIMIT};
use dragon_trials_core::maze::MazeGame;
use dragon_trials_core::memory::{MemoryGame, Performance};
use dragon_trials_core::quest::{Run, Stage};
use dragon_trials_core::runner::{Runner, RunnerStatus, PASS_SCORE};
use rand::rngs::SmallRng;
use rand::SeedableRng;
use serde_json::json;
use std::env;
use std::fs;
use std::path::Path;

const DEFAULT_SEED: u64 = 0xD2AC0;
const DEFAULT_BOARD: &str = "leaderboard.json";
const QUEST_DASH_FRAMES: u32 = 6_000;
const DASH_ATTEMPT_LIMIT: u64 = 50;

fn main() -> Result<()> {
    let mut args = env::args().skip(1);

    match args.next().as_deref() {
        Some("quest") => {
            let mut seed = DEFAULT_SEED;
            let mut name = String::from("Player");
            let mut portrait = None;
            let mut board = String::from(DEFAULT_BOARD);
            while let Some(arg) = args.next() {
                match arg.as_str() {
                    "--seed" => {
                        seed = args
                            .next()
                            .ok_or_else(|| anyhow!("--seed needs a value"))?
                            .parse()?;
                    }
                    "--name" => {
                        name = args.next().ok_or_else(|| anyhow!("--name needs a value"))?;
                    }
                    "--portrait" => {
                        portrait = Some(
                            args.next()
                                .ok_or_else(|| anyhow!("--portrait needs a value"))?,
                        );
                    }
                    "--board" => {
                        board = args
                            .next()
                            .ok_or_else(|| anyhow!("--board needs a value"))?;
                    }
                    other => return Err(anyhow!("Unknown arg '{}' for quest", other)),
                }
            }
            run_quest(seed, &name, portrait, &board)
        }
        Some("battle") => {
            let mut seed = DEFAULT_SEED;
            let mut policy = String::from("cautious");
            while let Some(arg) = args.next() {
                match arg.as_str() {
                    "--seed" => {
                        seed = args
                            .next()
                            .ok_or_else(|| anyhow!("--seed needs a value"))?
                            .parse()?;
                    }
                    "--policy" => {
                        policy = args
                            .next()
                            .ok_or_else(|| anyhow!("--policy needs a value"))?;
                    }
                    other => return Err(anyhow!("Unknown arg '{}' for battle", other)),
                }
            }
            run_battle(seed, &policy)
        }
        Some("maze") => run_maze(),
        Some("memory") => {
            let mut seed = DEFAULT_SEED;
            while let Some(arg) = args.next() {
                match arg.as_str() {
                    "--seed" => {
                        seed = args
                            .next()
                            .ok_or_else(|| anyhow!("--seed needs a value"))?
                            .parse()?;
                    }
                    other => return Err(anyhow!("Unknown arg '{}' for memory", other)),
                }
            }
            run_memory(seed)
        }
        Some("runner") => {
            let mut seed = DEFAULT_SEED;
            let mut frames = QUEST_DASH_FRAMES;
            while let Some(arg) = args.next() {
                match arg.as_str() {
                    "--seed" => {
                        seed = args
                            .next()
                            .ok_or_else(|| anyhow!("--seed needs a value"))?
                            .parse()?;
                    }
                    "--frames" => {
                        frames = args
                            .next()
                            .ok_or_else(|| anyhow!("--frames needs a value"))?
                            .parse()?;
                    }
                    other => return Err(anyhow!("Unknown arg '{}' for runner", other)),
                }
            }
            run_runner(seed, frames)
        }
        Some("replay") => {
            let mut script = None;
            let mut seed = DEFAULT_SEED;
            let mut log_out = None;
            while let Some(arg) = args.next() {
                match arg.as_str() {
                    "--script" => {
                        script = Some(
                            args.next()
                                .ok_or_else(|| anyhow!("--script needs a value"))?,
                        );
                    }
                    "--seed" => {
                        seed = args
                            .next()
                            .ok_or_else(|| anyhow!("--seed needs a value"))?
                            .parse()?;
                    }
                    "--log-json" => {
                        log_out = Some(
                            args.next()
                                .ok_or_else(|| anyhow!("--log-json needs a value"))?,
                        );
                    }
                    other => return Err(anyhow!("Unknown arg '{}' for replay", other)),
                }
            }
            let script = script.ok_or_else(|| {
                anyhow!("Usage: cargo run -- replay --script <path> [--seed N] [--log-json <path>]")
            })?;
            run_replay(&script, seed, log_out.as_deref())
        }
        Some("leaderboard") => {
            let mut board = String::from(DEFAULT_BOARD);
            while let Some(arg) = args.next() {
                match arg.as_str() {
                    "--board" => {
                        board = args
                            .next()
                            .ok_or_else(|| anyhow!("--board needs a value"))?;
                    }
                    other => return Err(anyhow!("Unknown arg '{}' for leaderboard", other)),
                }
            }
            show_board(&board)
        }
        Some("check-move") => {
            let name = args
                .next()
                .ok_or_else(|| anyhow!("Usage: cargo run -- check-move <move>"))?;
            check_move(&name)
        }
        Some(cmd) => Err(anyhow!("Unknown command '{}'", cmd)),
        None => run_quest(DEFAULT_SEED, "Player", None, DEFAULT_BOARD),
    }
}

/// Play the whole gauntlet with the demo pilots and post the time.
fn run_quest(seed: u64, name: &str, portrait: Option<String>, board_path: &str) -> Result<()> {
    let mut rng = SmallRng::seed_from_u64(seed);
    let mut run = Run::begin(name, portrait, &mut rng)?;
    println!("=== Dragon Trials ===");
    println!("--- {} ---", Stage::Register.title());
    println!("Challenger: {}", run.player_name());
    println!("Session: {}", run.session_id());
    run.complete_stage();

    println!("\n--- {} ---", Stage::Maze.title());
    let mut maze = MazeGame::default();
    let steps = ui::solve_maze(&mut maze)?;
    println!("{}", ui::render_maze(&maze));
    println!("Out of the cellar in {steps} steps.");
    run.complete_stage();

    println!("\n--- {} ---", Stage::Runner.title());
    let mut runner = Runner::new(seed);
    let mut attempt: u64 = 1;
    let score = loop {
        match ui::run_dash(&mut runner, QUEST_DASH_FRAMES) {
            RunnerStatus::Passed => break runner.score,
            _ => {
                println!(
                    "Crashed at {} points. Back to the start line...",
                    runner.score
                );
                if attempt >= DASH_ATTEMPT_LIMIT {
                    bail!("the dash pilot kept crashing short of {} points", PASS_SCORE);
                }
                attempt += 1;
                runner.reset();
            }
        }
    };
    println!("Cleared the dash with {score} points on attempt {attempt}.");
    run.complete_stage();

    println!("\n--- {} ---", Stage::Memory.title());
    let mut board_game = MemoryGame::new(seed);
    let moves = ui::solve_memory(&mut board_game);
    println!("{}", ui::render_memory(&board_game));
    let rank = Performance::for_moves(moves);
    println!("Cleared the board in {moves} moves.");
    println!("{} {}", rank.title, rank.remark);
    run.complete_stage();

    println!("\n--- {} ---", Stage::Battle.title());
    let mut encounter = Encounter::new(seed);
    let mut policy = CautiousPolicy::default();
    let report = drive(&mut encounter, &mut policy, DriveLimits::default());
    for line in encounter.transcript().lines() {
        println!("{line}");
    }
    println!("{}", encounter.state().message);
    if report.outcome != DriveOutcome::Victory {
        bail!("the knight never put the dragon down");
    }
    println!("Won in {} turns ({} falls).", report.turns, report.resets);
    run.complete_stage();

    let ms = run.finish();
    println!("\n--- {} ---", Stage::Done.title());
    println!("Time: {}", format_clock(ms));
    println!("If you are Xinyun, the password is: 8921");

    let path = Path::new(board_path);
    let mut board = Leaderboard::load(path)?;
    board.submit(Entry::new(
        run.player_name(),
        run.portrait().map(str::to_string),
        ms,
    ))?;
    board.save(path)?;
    println!("\nFastest runs ({board_path}):");
    for (i, entry) in board.top(BOARD_LIMIT).iter().enumerate() {
        println!("{:>2}. {:<16} {}", i + 1, entry.name, format_clock(entry.time_ms));
    }
    Ok(())
}

fn run_battle(seed: u64, policy_name: &str) -> Result<()> {
    let mut policy = policy_named(policy_name, seed.wrapping_add(1))?;
    let mut encounter = Encounter::new(seed);
    println!("{}", ui::battle_hud(encounter.state()));
    println!("{}", ui::move_panel(encounter.state()));
    println!();
    let report = drive(&mut encounter, policy.as_mut(), DriveLimits::default());
    for line in encounter.transcript().lines() {
        println!("{line}");
    }
    println!();
    println!("{}", ui::battle_hud(encounter.state()));
    match report.outcome {
        DriveOutcome::Victory => println!(
            "{} won in {} turns ({} falls, clock {}).",
            policy.name(),
            report.turns,
            report.resets,
            format_clock(report.clock_ms)
        ),
        DriveOutcome::OutOfActions => println!(
            "{} stalled out after {} actions.",
            policy.name(),
            report.actions
        ),
    }
    Ok(())
}

fn run_maze() -> Result<()> {
    let mut game = MazeGame::default();
    println!("{}", ui::render_maze(&game));
    let steps = ui::solve_maze(&mut game)?;
    println!("{}", ui::render_maze(&game));
    println!("Out of the cellar in {steps} steps.");
    Ok(())
}

fn run_memory(seed: u64) -> Result<()> {
    let mut game = MemoryGame::new(seed);
    let moves = ui::solve_memory(&mut game);
    println!("{}", ui::render_memory(&game));
    let rank = Performance::for_moves(moves);
    println!("Cleared the board in {moves} moves.");
    println!("{} {}", rank.title, rank.remark);
    Ok(())
}

fn run_runner(seed: u64, frames: u32) -> Result<()> {
    let mut runner = Runner::new(seed);
    match ui::run_dash(&mut runner, frames) {
        RunnerStatus::Passed => println!(
            "Passed at {} points (speed {:.1}).",
            runner.score, runner.speed
        ),
        RunnerStatus::Crashed => println!(
            "Crashed at {} points (speed {:.1}).",
            runner.score, runner.speed
        ),
        RunnerStatus::Running => println!(
            "Still on the track at {} points after {} frames.",
            runner.score, frames
        ),
    }
    Ok(())
}

fn run_replay(script_path: &str, seed: u64, log_out: Option<&str>) -> Result<()> {
    let text = fs::read_to_string(script_path)
        .with_context(|| format!("failed to read script '{}'", script_path))?;
    let commands = parse_script(&text)?;
    println!("Replaying {} commands from {script_path}.", commands.len());
    let mut policy = ScriptedPolicy::new(commands);
    let mut encounter = Encounter::new(seed);
    let report = drive(&mut encounter, &mut policy, DriveLimits::default());
    for line in encounter.transcript().lines() {
        println!("{line}");
    }
    let outcome = match report.outcome {
        DriveOutcome::Victory => "win",
        DriveOutcome::OutOfActions => "stalled",
    };
    println!(
        "Outcome: {} in {} turns, {} falls, clock {}.",
        outcome,
        report.turns,
        report.resets,
        format_clock(report.clock_ms)
    );
    if let Some(out) = log_out {
        let payload = json!({
            "seed": seed,
            "outcome": outcome,
            "turns": report.turns,
            "battle": encounter.transcript().to_json(),
        });
        fs::write(out, serde_json::to_string_pretty(&payload)? + "\n")
            .with_context(|| format!("failed to write log '{}'", out))?;
        println!("Wrote {out}");
    }
    Ok(())
}

fn show_board(board_path: &str) -> Result<()> {
    let board = Leaderboard::load(Path::new(board_path))?;
    if board.is_empty() {
        println!("No runs recorded in {board_path} yet.");
        return Ok(());
    }
    println!("Fastest runs ({board_path}):");
    for (i, entry) in board.top(BOARD_LIMIT).iter().enumerate() {
        println!("{:>2}. {:<16} {}", i + 1, entry.name, format_clock(entry.time_ms));
    }
    Ok(())
}

fn check_move(name: &str) -> Result<()> {
    let kind = lookup_move(name).ok_or_else(|| anyhow!("Move '{}' not found", name))?;
    println!("Found move: {} (pp: {})", kind.label(), kind.max_pp());
    match kind {
        MoveKind::Slash => println!("Deals {}-{} damage.", SLASH_MIN, SLASH_MAX),
        MoveKind::Fireball => println!("Deals {}-{} damage.", FIREBALL_MIN, FIREBALL_MAX),
        MoveKind::Guard => println!("Halves the dragon's next fire breath."),
        MoveKind::Heal => println!("Restores {} hp, up to the cap.", TONIC_HEAL),
    }
    Ok(())
}
