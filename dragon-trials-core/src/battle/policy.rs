//! Automated players for simulation and replay.

use crate::battle::encounter::{BattleEvent, Encounter};
use crate::battle::state::{BattleState, Menu, MoveKind, RootAction};
use anyhow::{bail, Result};
use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use std::collections::VecDeque;

/// Built-in policies that can be named on a command line.
pub const POLICY_NAMES: [&str; 3] = ["random", "aggressive", "cautious"];

/// One decision at an open command panel. `Move` presses FIGHT first when
/// the root panel is showing.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum PlayerChoice {
    Move(MoveKind),
    Bag,
    Cry,
    Run,
}

pub trait BattlePolicy {
    fn name(&self) -> &'static str;
    fn choose(&mut self, state: &BattleState) -> PlayerChoice;
}

/// Every choice the panel would currently accept as a turn.
pub fn legal_choices(state: &BattleState) -> Vec<PlayerChoice> {
    let mut choices: Vec<PlayerChoice> = MoveKind::ALL
        .iter()
        .filter(|kind| state.pp.remaining(**kind) > 0)
        .map(|kind| PlayerChoice::Move(*kind))
        .collect();
    choices.push(PlayerChoice::Bag);
    choices
}

pub struct RandomPolicy {
    rng: SmallRng,
}

impl RandomPolicy {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: SmallRng::seed_from_u64(seed),
        }
    }
}

impl BattlePolicy for RandomPolicy {
    fn name(&self) -> &'static str {
        "random"
    }

    fn choose(&mut self, state: &BattleState) -> PlayerChoice {
        *legal_choices(state)
            .choose(&mut self.rng)
            .unwrap_or(&PlayerChoice::Bag)
    }
}

/// Leads with the heaviest attack that still has uses.
#[derive(Clone, Copy, Debug, Default)]
pub struct AggressivePolicy;

impl BattlePolicy for AggressivePolicy {
    fn name(&self) -> &'static str {
        "aggressive"
    }

    fn choose(&mut self, state: &BattleState) -> PlayerChoice {
        if state.pp.remaining(MoveKind::Fireball) > 0 {
            PlayerChoice::Move(MoveKind::Fireball)
        } else if state.pp.remaining(MoveKind::Slash) > 0 {
            PlayerChoice::Move(MoveKind::Slash)
        } else {
            PlayerChoice::Bag
        }
    }
}

/// Drinks a potion below the health threshold, otherwise attacks.
#[derive(Clone, Copy, Debug)]
pub struct CautiousPolicy {
    pub heal_below: u16,
}

impl Default for CautiousPolicy {
    fn default() -> Self {
        Self { heal_below: 40 }
    }
}

impl BattlePolicy for CautiousPolicy {
    fn name(&self) -> &'static str {
        "cautious"
    }

    fn choose(&mut self, state: &BattleState) -> PlayerChoice {
        if state.player_hp < self.heal_below {
            PlayerChoice::Bag
        } else if state.pp.remaining(MoveKind::Fireball) > 0 {
            PlayerChoice::Move(MoveKind::Fireball)
        } else if state.pp.remaining(MoveKind::Slash) > 0 {
            PlayerChoice::Move(MoveKind::Slash)
        } else if state.pp.remaining(MoveKind::Guard) > 0 {
            PlayerChoice::Move(MoveKind::Guard)
        } else {
            PlayerChoice::Bag
        }
    }
}

/// Replays a fixed command list, then falls back to aggressive play.
pub struct ScriptedPolicy {
    queue: VecDeque<PlayerChoice>,
    fallback: AggressivePolicy,
}

impl ScriptedPolicy {
    pub fn new(commands: Vec<PlayerChoice>) -> Self {
        Self {
            queue: commands.into(),
            fallback: AggressivePolicy,
        }
    }

    pub fn remaining(&self) -> usize {
        self.queue.len()
    }
}

impl BattlePolicy for ScriptedPolicy {
    fn name(&self) -> &'static str {
        "scripted"
    }

    fn choose(&mut self, state: &BattleState) -> PlayerChoice {
        match self.queue.pop_front() {
            Some(choice) => choice,
            None => self.fallback.choose(state),
        }
    }
}

/// Look up a built-in policy by its command-line name.
pub fn policy_named(name: &str, seed: u64) -> Result<Box<dyn BattlePolicy + Send>> {
    match name {
        "random" => Ok(Box::new(RandomPolicy::new(seed))),
        "aggressive" => Ok(Box::new(AggressivePolicy)),
        "cautious" => Ok(Box::new(CautiousPolicy::default())),
        other => bail!("unknown policy '{}'", other),
    }
}

/// Feed one choice into the encounter, pressing FIGHT on the way to a move.
pub fn apply_choice(encounter: &mut Encounter, choice: PlayerChoice) -> Vec<BattleEvent> {
    match choice {
        PlayerChoice::Move(kind) => {
            let mut events = Vec::new();
            if encounter.state().menu == Menu::Root {
                events.extend(encounter.select_root(RootAction::Fight));
            }
            events.extend(encounter.select_move(kind));
            events
        }
        PlayerChoice::Bag => encounter.select_root(RootAction::Bag),
        PlayerChoice::Cry => encounter.select_root(RootAction::Cry),
        PlayerChoice::Run => encounter.select_root(RootAction::Run),
    }
}

#[derive(Clone, Copy, Debug)]
pub struct DriveLimits {
    pub max_actions: usize,
}

impl Default for DriveLimits {
    fn default() -> Self {
        Self { max_actions: 1_000 }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum DriveOutcome {
    Victory,
    OutOfActions,
}

#[derive(Clone, Debug)]
pub struct EncounterReport {
    pub outcome: DriveOutcome,
    pub actions: usize,
    pub turns: usize,
    pub resets: u32,
    pub clock_ms: u64,
}

/// Play an encounter to the end: ask the policy whenever input is open,
/// otherwise fast-forward to the next pending resolution.
pub fn drive(
    encounter: &mut Encounter,
    policy: &mut dyn BattlePolicy,
    limits: DriveLimits,
) -> EncounterReport {
    let mut actions = 0usize;
    let mut resets = 0u32;
    let outcome = loop {
        if encounter.is_settled() {
            break DriveOutcome::Victory;
        }
        if !encounter.state().locked() {
            if actions >= limits.max_actions {
                break DriveOutcome::OutOfActions;
            }
            let choice = policy.choose(encounter.state());
            actions += 1;
            apply_choice(encounter, choice);
            continue;
        }
        match encounter.next_event_in() {
            Some(wait) => {
                for event in encounter.advance(wait) {
                    if matches!(event, BattleEvent::EncounterReset) {
                        resets += 1;
                    }
                }
            }
            None => break DriveOutcome::OutOfActions,
        }
    };
    EncounterReport {
        outcome,
        actions,
        turns: encounter.turn(),
        resets,
        clock_ms: encounter.clock_ms(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::battle::state::BattleState;

    #[test]
    fn random_only_picks_what_the_panel_accepts() {
        let mut state = BattleState::new();
        for _ in 0..5 {
            state.pp.spend(MoveKind::Slash);
            state.pp.spend(MoveKind::Fireball);
        }
        let legal = legal_choices(&state);
        let mut policy = RandomPolicy::new(17);
        for _ in 0..200 {
            let choice = policy.choose(&state);
            assert!(legal.contains(&choice));
            if let PlayerChoice::Move(kind) = choice {
                assert!(state.pp.remaining(kind) > 0);
            }
        }
    }

    #[test]
    fn aggressive_burns_fireballs_first() {
        let mut state = BattleState::new();
        let mut policy = AggressivePolicy;
        assert_eq!(policy.choose(&state), PlayerChoice::Move(MoveKind::Fireball));
        for _ in 0..5 {
            state.pp.spend(MoveKind::Fireball);
        }
        assert_eq!(policy.choose(&state), PlayerChoice::Move(MoveKind::Slash));
        for _ in 0..5 {
            state.pp.spend(MoveKind::Slash);
        }
        assert_eq!(policy.choose(&state), PlayerChoice::Bag);
    }

    #[test]
    fn cautious_drinks_when_hurt() {
        let mut state = BattleState::new();
        let mut policy = CautiousPolicy::default();
        state.player_hp = 39;
        assert_eq!(policy.choose(&state), PlayerChoice::Bag);
        state.player_hp = 80;
        assert_eq!(policy.choose(&state), PlayerChoice::Move(MoveKind::Fireball));
    }

    #[test]
    fn scripted_runs_dry_then_fights_on() {
        let state = BattleState::new();
        let mut policy = ScriptedPolicy::new(vec![PlayerChoice::Cry, PlayerChoice::Bag]);
        assert_eq!(policy.choose(&state), PlayerChoice::Cry);
        assert_eq!(policy.choose(&state), PlayerChoice::Bag);
        assert_eq!(policy.remaining(), 0);
        assert_eq!(policy.choose(&state), PlayerChoice::Move(MoveKind::Fireball));
    }

    #[test]
    fn drive_finishes_a_rigged_battle_in_one_swing() {
        let mut state = BattleState::new();
        state.enemy_hp = 10;
        let mut encounter = Encounter::from_state(state, 8);
        let mut policy = AggressivePolicy;
        let report = drive(&mut encounter, &mut policy, DriveLimits::default());
        assert_eq!(report.outcome, DriveOutcome::Victory);
        assert_eq!(report.actions, 1);
        assert_eq!(report.turns, 1);
        assert_eq!(report.resets, 0);
    }

    #[test]
    fn every_listed_policy_resolves_by_name() {
        for name in POLICY_NAMES {
            let policy = policy_named(name, 3).expect("listed policy should resolve");
            assert_eq!(policy.name(), name);
        }
        assert!(policy_named("psychic", 3).is_err());
    }

    #[test]
    fn drive_gives_up_after_the_action_limit() {
        struct Weeper;
        impl BattlePolicy for Weeper {
            fn name(&self) -> &'static str {
                "weeper"
            }
            fn choose(&mut self, _state: &BattleState) -> PlayerChoice {
                PlayerChoice::Cry
            }
        }
        let mut encounter = Encounter::new(9);
        let mut policy = Weeper;
        let report = drive(&mut encounter, &mut policy, DriveLimits { max_actions: 25 });
        assert_eq!(report.outcome, DriveOutcome::OutOfActions);
        assert_eq!(report.actions, 25);
        assert_eq!(report.turns, 0);
    }
}
