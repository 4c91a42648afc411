//! Terminal views and demo pilots for the four trials.

use anyhow::{bail, Result};
use dragon_trials_core::battle::state::{
    BattleState, MoveKind, ENEMY_LEVEL, ENEMY_MAX_HP, PLAYER_LEVEL, PLAYER_MAX_HP,
};
use dragon_trials_core::maze::{Direction, MazeGame, MazeStatus, StepOutcome, Tile};
use dragon_trials_core::memory::{CardArt, MemoryGame, FINISH_HANDOFF_MS, PAIR_LABELS};
use dragon_trials_core::runner::{Runner, RunnerInput, RunnerStatus};
use std::collections::VecDeque;

const HP_BAR_WIDTH: usize = 20;

/// How close an obstacle may get before the dash pilot thinks about jumping.
const DASH_TRIGGER_FRAMES: usize = 14;
/// Long enough to see a bad landing at the far end of a jump arc.
const DASH_HORIZON_FRAMES: usize = 60;

pub fn hp_bar(hp: u16, max: u16) -> String {
    let filled = if hp == 0 || max == 0 {
        0
    } else {
        ((hp as usize * HP_BAR_WIDTH + max as usize - 1) / max as usize).min(HP_BAR_WIDTH)
    };
    format!("{}{}", "#".repeat(filled), ".".repeat(HP_BAR_WIDTH - filled))
}

pub fn battle_hud(state: &BattleState) -> String {
    format!(
        "Dragon Lv.{}  HP {:>3}/{}  [{}]\nKnight Lv.{}  HP {:>3}/{}  [{}]\n> {}",
        ENEMY_LEVEL,
        state.enemy_hp,
        ENEMY_MAX_HP,
        hp_bar(state.enemy_hp, ENEMY_MAX_HP),
        PLAYER_LEVEL,
        state.player_hp,
        PLAYER_MAX_HP,
        hp_bar(state.player_hp, PLAYER_MAX_HP),
        state.message,
    )
}

pub fn move_panel(state: &BattleState) -> String {
    MoveKind::ALL
        .iter()
        .map(|kind| {
            format!(
                "{} {}/{}",
                kind.label(),
                state.pp.remaining(*kind),
                kind.max_pp()
            )
        })
        .collect::<Vec<_>>()
        .join("  ")
}

/// Draw the cellar. Traps print as plain floor so the map gives nothing away.
pub fn render_maze(game: &MazeGame) -> String {
    let width = game.width();
    let mut out = String::new();
    for (i, tile) in game.tiles().iter().enumerate() {
        out.push(if i == game.position() {
            '@'
        } else {
            match tile {
                Tile::Wall => '#',
                Tile::Floor | Tile::Trap => ' ',
                Tile::Start => 'S',
                Tile::Exit => 'E',
            }
        });
        if i % width == width - 1 {
            out.push('\n');
        }
    }
    out
}

pub fn render_memory(game: &MemoryGame) -> String {
    let mut out = String::new();
    for (i, card) in game.cards().iter().enumerate() {
        let shown = if card.face_up || card.matched {
            if card.art == CardArt::Portrait {
                format!("{}*", card.label)
            } else {
                card.label.to_string()
            }
        } else {
            "?".to_string()
        };
        out.push_str(&format!("[{shown:^8}]"));
        out.push(if i % 4 == 3 { '\n' } else { ' ' });
    }
    out
}

fn direction_between(from: usize, to: usize, width: usize) -> Direction {
    if to == from + 1 {
        Direction::Right
    } else if from == to + 1 {
        Direction::Left
    } else if to == from + width {
        Direction::Down
    } else {
        Direction::Up
    }
}

/// Breadth-first route from the current square to the exit.
fn maze_route(game: &MazeGame) -> Option<Vec<Direction>> {
    let width = game.width();
    let tiles = game.tiles();
    let exit = tiles.iter().position(|tile| *tile == Tile::Exit)?;
    let start = game.position();
    let mut prev = vec![usize::MAX; tiles.len()];
    prev[start] = start;
    let mut queue = VecDeque::from([start]);
    while let Some(pos) = queue.pop_front() {
        if pos == exit {
            break;
        }
        let mut next_squares = Vec::with_capacity(4);
        if pos % width != 0 {
            next_squares.push(pos - 1);
        }
        if pos % width != width - 1 {
            next_squares.push(pos + 1);
        }
        if pos >= width {
            next_squares.push(pos - width);
        }
        if pos + width < tiles.len() {
            next_squares.push(pos + width);
        }
        for next in next_squares {
            if prev[next] == usize::MAX && tiles[next] != Tile::Wall {
                prev[next] = pos;
                queue.push_back(next);
            }
        }
    }
    if prev[exit] == usize::MAX {
        return None;
    }
    let mut route = Vec::new();
    let mut pos = exit;
    while pos != start {
        let from = prev[pos];
        route.push(direction_between(from, pos, width));
        pos = from;
    }
    route.reverse();
    Some(route)
}

/// Walk the shortest route out, shrugging off any trap along the way.
pub fn solve_maze(game: &mut MazeGame) -> Result<u32> {
    let Some(route) = maze_route(game) else {
        bail!("no route to the cellar exit");
    };
    for direction in route {
        match game.step(direction) {
            StepOutcome::TrapSprung => game.dismiss_scare(),
            StepOutcome::Blocked => bail!("the planned route walked into a wall"),
            StepOutcome::Moved | StepOutcome::Cleared => {}
        }
    }
    match game.status() {
        MazeStatus::Cleared => Ok(game.steps()),
        MazeStatus::Exploring => bail!("the planned route ended short of the exit"),
    }
}

/// Flip every pair straight off the deal. Eight moves, every time.
pub fn solve_memory(game: &mut MemoryGame) -> u32 {
    let mut pairs = Vec::new();
    for label in PAIR_LABELS {
        let mut found = game
            .cards()
            .iter()
            .enumerate()
            .filter_map(|(i, card)| (card.label == label).then_some(i));
        if let (Some(a), Some(b)) = (found.next(), found.next()) {
            pairs.push((a, b));
        }
    }
    for (a, b) in pairs {
        game.flip(a);
        game.flip(b);
    }
    game.advance(FINISH_HANDOFF_MS);
    game.moves()
}

fn survival_frames(mut sim: Runner, first: RunnerInput, horizon: usize) -> usize {
    match sim.step(first) {
        RunnerStatus::Crashed => return 0,
        RunnerStatus::Passed => return horizon,
        RunnerStatus::Running => {}
    }
    for frame in 1..horizon {
        match sim.step(RunnerInput::COAST) {
            RunnerStatus::Crashed => return frame,
            RunnerStatus::Passed => break,
            RunnerStatus::Running => {}
        }
    }
    horizon
}

/// Pick this frame's input by rolling the sim forward. The track is
/// deterministic, so a cloned runner previews exactly what is coming.
pub fn plan_dash_input(runner: &Runner) -> RunnerInput {
    if runner.jumping {
        return RunnerInput::COAST;
    }
    let trigger = survival_frames(runner.clone(), RunnerInput::COAST, DASH_TRIGGER_FRAMES);
    if trigger == DASH_TRIGGER_FRAMES {
        return RunnerInput::COAST;
    }
    let coast = survival_frames(runner.clone(), RunnerInput::COAST, DASH_HORIZON_FRAMES);
    let jump = survival_frames(runner.clone(), RunnerInput::JUMP, DASH_HORIZON_FRAMES);
    if jump > coast {
        RunnerInput::JUMP
    } else {
        RunnerInput::COAST
    }
}

pub fn run_dash(runner: &mut Runner, max_frames: u32) -> RunnerStatus {
    for _ in 0..max_frames {
        let input = plan_dash_input(runner);
        let status = runner.step(input);
        if status != RunnerStatus::Running {
            return status;
        }
    }
    runner.status
}
