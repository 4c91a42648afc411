//! The knight-versus-dragon boss fight.

pub mod damage;
pub mod encounter;
pub mod policy;
pub mod script;
pub mod state;

pub use encounter::{BattleEvent, Encounter, Outcome};
pub use policy::{BattlePolicy, PlayerChoice};
pub use state::{BattleState, Menu, MoveKind, MovePoints, Phase, RootAction};
