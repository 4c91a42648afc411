//! Engine crate for the dragon trials: four minigame stages, a session
//! clock, and the standings file, all headless and deterministic.
//!
//! The main entry point for the boss fight is [`battle::Encounter`]; the
//! other stages live in [`maze`], [`runner`], [`memory`], and [`quest`].

pub mod battle;
pub mod leaderboard;
pub mod maze;
pub mod memory;
pub mod quest;
pub mod runner;
pub mod schedule;
pub mod transcript;

/// Commonly used exports for external consumers.
pub mod prelude {
    pub use crate::battle::{
        BattleEvent, BattlePolicy, BattleState, Encounter, Menu, MoveKind, Outcome, Phase,
        PlayerChoice, RootAction,
    };
    pub use crate::leaderboard::{format_clock, Entry, Leaderboard};
    pub use crate::maze::{Direction, MazeGame, MazeStatus, StepOutcome};
    pub use crate::memory::{BoardStatus, FlipOutcome, MemoryGame, Performance};
    pub use crate::quest::{Run, Stage};
    pub use crate::runner::{Runner, RunnerInput, RunnerStatus};
}
