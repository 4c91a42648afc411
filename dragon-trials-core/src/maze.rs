//! The haunted-cellar maze stage.
//!
//! A flat grid walked one tile at a time. Traps are single-use jumpscares
//! that freeze movement until dismissed; reaching the exit clears the stage.

use anyhow::{bail, Result};
use once_cell::sync::Lazy;

/// The cellar shipped with the game, 28 tiles wide.
pub static DEFAULT_LAYOUT: Lazy<MazeLayout> = Lazy::new(|| {
    MazeLayout::parse(include_str!("../data/maze.txt"))
        .expect("failed to parse bundled maze layout")
});

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Tile {
    Wall,
    Floor,
    Start,
    Exit,
    Trap,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum StepOutcome {
    Moved,
    Blocked,
    TrapSprung,
    Cleared,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum MazeStatus {
    Exploring,
    Cleared,
}

/// A parsed grid: tiles in row-major order with a fixed width.
#[derive(Clone, Debug)]
pub struct MazeLayout {
    width: usize,
    tiles: Vec<Tile>,
    start: usize,
}

impl MazeLayout {
    /// Parse a digit grid, one row per line: `1` wall, `0` floor, `5` start,
    /// `6` exit, `7` trap. Rows must share a width; exactly one start and at
    /// least one exit are required.
    pub fn parse(text: &str) -> Result<Self> {
        let mut width = 0usize;
        let mut tiles = Vec::new();
        for (row, line) in text.lines().enumerate() {
            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }
            if width == 0 {
                width = trimmed.chars().count();
            } else if trimmed.chars().count() != width {
                bail!("row {} is {} tiles wide, expected {}", row + 1, trimmed.chars().count(), width);
            }
            for (col, c) in trimmed.chars().enumerate() {
                let tile = match c {
                    '0' => Tile::Floor,
                    '1' => Tile::Wall,
                    '5' => Tile::Start,
                    '6' => Tile::Exit,
                    '7' => Tile::Trap,
                    other => bail!("unsupported tile '{}' at row {}, column {}", other, row + 1, col + 1),
                };
                tiles.push(tile);
            }
        }
        if tiles.is_empty() {
            bail!("maze layout is empty");
        }
        let starts: Vec<usize> = tiles
            .iter()
            .enumerate()
            .filter(|(_, tile)| **tile == Tile::Start)
            .map(|(idx, _)| idx)
            .collect();
        if starts.len() != 1 {
            bail!("maze layout needs exactly one start, found {}", starts.len());
        }
        if !tiles.contains(&Tile::Exit) {
            bail!("maze layout has no exit");
        }
        Ok(Self {
            width,
            tiles,
            start: starts[0],
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.tiles.len() / self.width
    }

    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    pub fn start(&self) -> usize {
        self.start
    }
}

/// A maze being walked.
#[derive(Clone, Debug)]
pub struct MazeGame {
    layout: MazeLayout,
    tiles: Vec<Tile>,
    position: usize,
    steps: u32,
    status: MazeStatus,
    scare: bool,
}

impl MazeGame {
    pub fn new(layout: &MazeLayout) -> Self {
        Self {
            tiles: layout.tiles.clone(),
            position: layout.start,
            layout: layout.clone(),
            steps: 0,
            status: MazeStatus::Exploring,
            scare: false,
        }
    }

    pub fn width(&self) -> usize {
        self.layout.width
    }

    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn steps(&self) -> u32 {
        self.steps
    }

    pub fn status(&self) -> MazeStatus {
        self.status
    }

    /// True while a sprung trap is blocking movement.
    pub fn scare_active(&self) -> bool {
        self.scare
    }

    /// Attempt one move. Walls, grid edges, an active scare, and a cleared
    /// maze all refuse it.
    pub fn step(&mut self, direction: Direction) -> StepOutcome {
        if self.scare || self.status == MazeStatus::Cleared {
            return StepOutcome::Blocked;
        }
        let width = self.layout.width;
        let target = match direction {
            Direction::Left => {
                if self.position % width == 0 {
                    return StepOutcome::Blocked;
                }
                self.position - 1
            }
            Direction::Right => {
                if self.position % width == width - 1 {
                    return StepOutcome::Blocked;
                }
                self.position + 1
            }
            Direction::Up => {
                if self.position < width {
                    return StepOutcome::Blocked;
                }
                self.position - width
            }
            Direction::Down => {
                if self.position + width >= self.tiles.len() {
                    return StepOutcome::Blocked;
                }
                self.position + width
            }
        };
        if self.tiles[target] == Tile::Wall {
            return StepOutcome::Blocked;
        }
        self.position = target;
        self.steps += 1;
        match self.tiles[target] {
            Tile::Trap => {
                // one scare per trap
                self.tiles[target] = Tile::Floor;
                self.scare = true;
                StepOutcome::TrapSprung
            }
            Tile::Exit => {
                self.status = MazeStatus::Cleared;
                StepOutcome::Cleared
            }
            _ => StepOutcome::Moved,
        }
    }

    pub fn dismiss_scare(&mut self) {
        self.scare = false;
    }

    /// Back to the start with traps restocked and the counter zeroed.
    pub fn restart(&mut self) {
        self.tiles = self.layout.tiles.clone();
        self.position = self.layout.start;
        self.steps = 0;
        self.status = MazeStatus::Exploring;
        self.scare = false;
    }
}

impl Default for MazeGame {
    fn default() -> Self {
        Self::new(&DEFAULT_LAYOUT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_rejects_ragged_rows() {
        assert!(MazeLayout::parse("111\n1511\n161").is_err());
    }

    #[test]
    fn parse_requires_one_start_and_an_exit() {
        assert!(MazeLayout::parse("111\n101\n161").is_err());
        assert!(MazeLayout::parse("151\n151\n161").is_err());
        assert!(MazeLayout::parse("111\n151\n101").is_err());
        assert!(MazeLayout::parse("111\n151\n161").is_ok());
    }

    #[test]
    fn parse_rejects_unknown_tiles() {
        let err = MazeLayout::parse("151\n1x1\n161").unwrap_err();
        assert!(err.to_string().contains("'x'"));
    }

    #[test]
    fn edges_and_walls_block() {
        let layout = MazeLayout::parse("501\n111\n611").unwrap();
        let mut game = MazeGame::new(&layout);
        assert_eq!(game.position(), 0);
        assert_eq!(game.step(Direction::Left), StepOutcome::Blocked);
        assert_eq!(game.step(Direction::Up), StepOutcome::Blocked);
        assert_eq!(game.step(Direction::Down), StepOutcome::Blocked); // wall
        assert_eq!(game.step(Direction::Right), StepOutcome::Moved);
        assert_eq!(game.step(Direction::Right), StepOutcome::Blocked); // wall
        assert_eq!(game.steps(), 1);

        let far_right = MazeLayout::parse("105\n111\n611").unwrap();
        let mut game = MazeGame::new(&far_right);
        assert_eq!(game.step(Direction::Right), StepOutcome::Blocked);
    }

    #[test]
    fn bottom_edge_blocks() {
        let layout = MazeLayout::parse("161\n151\n101").unwrap();
        let mut game = MazeGame::new(&layout);
        assert_eq!(game.step(Direction::Down), StepOutcome::Moved);
        assert_eq!(game.step(Direction::Down), StepOutcome::Blocked);
    }

    #[test]
    fn traps_scare_once_and_are_consumed() {
        let layout = MazeLayout::parse("5071\n1116").unwrap();
        let mut game = MazeGame::new(&layout);
        assert_eq!(game.step(Direction::Right), StepOutcome::Moved);
        assert_eq!(game.step(Direction::Right), StepOutcome::TrapSprung);
        assert!(game.scare_active());
        // frozen until the scare is dismissed
        assert_eq!(game.step(Direction::Left), StepOutcome::Blocked);
        game.dismiss_scare();
        assert_eq!(game.step(Direction::Left), StepOutcome::Moved);
        // the trap tile is an ordinary floor now
        assert_eq!(game.step(Direction::Right), StepOutcome::Moved);
        assert!(!game.scare_active());
        assert_eq!(game.steps(), 4);
    }

    #[test]
    fn reaching_the_exit_clears_the_maze() {
        let layout = MazeLayout::parse("56").unwrap();
        let mut game = MazeGame::new(&layout);
        assert_eq!(game.step(Direction::Right), StepOutcome::Cleared);
        assert_eq!(game.status(), MazeStatus::Cleared);
        assert_eq!(game.step(Direction::Left), StepOutcome::Blocked);
        assert_eq!(game.steps(), 1);
    }

    #[test]
    fn restart_restocks_traps() {
        let layout = MazeLayout::parse("5071\n1116").unwrap();
        let mut game = MazeGame::new(&layout);
        game.step(Direction::Right);
        game.step(Direction::Right);
        game.dismiss_scare();
        game.restart();
        assert_eq!(game.position(), 0);
        assert_eq!(game.steps(), 0);
        assert_eq!(game.tiles()[2], Tile::Trap);
        assert_eq!(game.status(), MazeStatus::Exploring);
    }

    #[test]
    fn bundled_cellar_has_the_expected_shape() {
        let layout = &*DEFAULT_LAYOUT;
        assert_eq!(layout.width(), 28);
        assert_eq!(layout.height(), 29);
        assert_eq!(layout.start(), 29);
        let traps = layout.tiles().iter().filter(|t| **t == Tile::Trap).count();
        assert_eq!(traps, 5);
        let exits = layout.tiles().iter().filter(|t| **t == Tile::Exit).count();
        assert_eq!(exits, 1);
    }
}
