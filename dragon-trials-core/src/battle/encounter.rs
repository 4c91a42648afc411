//! Turn engine for the dragon encounter.
//!
//! All pacing is logical: selections queue their consequences on a
//! [`Schedule`] and the driver pumps [`Encounter::advance`] with elapsed
//! milliseconds. Identical seeds and inputs replay identical battles.

use crate::battle::damage::{
    guarded_damage, roll_fire_breath, roll_move_damage, POTION_HEAL, TONIC_HEAL,
};
use crate::battle::state::{
    BattleState, Menu, MoveKind, Phase, RootAction, ENEMY_MAX_HP, PLAYER_MAX_HP,
};
use crate::schedule::Schedule;
use crate::transcript::Transcript;
use rand::rngs::SmallRng;
use rand::SeedableRng;

/// Delay between choosing an attack and the blow landing.
pub const PLAYER_STRIKE_MS: u64 = 240;
/// Delay before the dragon answers a landed attack.
pub const ENEMY_REPLY_AFTER_STRIKE_MS: u64 = 450;
/// Delay before the dragon answers a brace.
pub const ENEMY_REPLY_AFTER_GUARD_MS: u64 = 420;
/// Delay before the dragon answers a bubble tea sip.
pub const ENEMY_REPLY_AFTER_TONIC_MS: u64 = 480;
/// Delay before the dragon answers a potion.
pub const ENEMY_REPLY_AFTER_POTION_MS: u64 = 600;
/// Flight time of the fire breath projectile.
pub const ENEMY_STRIKE_MS: u64 = 520;
/// Pause on the defeat screen before the encounter restarts itself.
pub const DEFEAT_RESET_MS: u64 = 2500;
/// Pause on the victory message before handing off to the results screen.
pub const VICTORY_EXIT_MS: u64 = 600;

/// Terminal-ish outcomes. Defeat is transient: the encounter schedules its
/// own restart, so only victory ends the battle for good.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Outcome {
    PlayerDefeated,
    PlayerVictorious,
}

/// Observations emitted as the battle unfolds.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum BattleEvent {
    MoveUsed { kind: MoveKind },
    PotionUsed { player_hp: u16 },
    PlayerHealed { amount: u16, player_hp: u16 },
    GuardRaised,
    PlayerStruck { damage: u16, enemy_hp: u16 },
    EnemyWindup { guarded: bool },
    EnemyStruck { damage: u16, guarded: bool, player_hp: u16 },
    PlayerFainted,
    EncounterReset,
    Victory,
}

#[derive(Clone, Copy, Debug)]
enum TurnEvent {
    PlayerStrike { damage: u16 },
    EnemyWindup { guarded: bool },
    EnemyStrike { damage: u16, guarded: bool },
    ResetEncounter,
}

/// The knight-versus-dragon battle engine.
pub struct Encounter {
    state: BattleState,
    schedule: Schedule<TurnEvent>,
    rng: SmallRng,
    transcript: Transcript,
    turn: usize,
}

impl Encounter {
    pub fn new(seed: u64) -> Self {
        Self::from_rng(SmallRng::seed_from_u64(seed))
    }

    pub fn from_rng(rng: SmallRng) -> Self {
        Self {
            state: BattleState::new(),
            schedule: Schedule::new(),
            rng,
            transcript: Transcript::new(),
            turn: 0,
        }
    }

    /// Resume from a state snapshot. The schedule starts empty, so the
    /// snapshot must not rely on an in-flight resolution.
    pub fn from_state(state: BattleState, seed: u64) -> Self {
        Self {
            state,
            schedule: Schedule::new(),
            rng: SmallRng::seed_from_u64(seed),
            transcript: Transcript::new(),
            turn: 0,
        }
    }

    pub fn state(&self) -> &BattleState {
        &self.state
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    /// Completed player/enemy exchanges so far.
    pub fn turn(&self) -> usize {
        self.turn
    }

    /// Position of the encounter's logical clock.
    pub fn clock_ms(&self) -> u64 {
        self.schedule.now_ms()
    }

    /// Milliseconds until the next pending resolution, if any.
    pub fn next_event_in(&self) -> Option<u64> {
        self.schedule.next_due_in()
    }

    pub fn outcome(&self) -> Option<Outcome> {
        match self.state.phase {
            Phase::Defeated => Some(Outcome::PlayerDefeated),
            Phase::Victorious => Some(Outcome::PlayerVictorious),
            _ => None,
        }
    }

    /// True once the battle has ended for good.
    pub fn is_settled(&self) -> bool {
        self.state.phase == Phase::Victorious
    }

    /// Handle a root-panel command. Ignored while the panel is locked or a
    /// different panel is showing.
    pub fn select_root(&mut self, action: RootAction) -> Vec<BattleEvent> {
        let mut events = Vec::new();
        if self.state.locked() || self.state.menu != Menu::Root {
            return events;
        }
        match action {
            RootAction::Fight => {
                self.state.menu = Menu::Moves;
                self.state.set_message("Choose a move!");
            }
            RootAction::Bag => {
                self.begin_turn();
                self.state.heal_player(POTION_HEAL);
                self.state
                    .set_message(format!("You used a potion! +{POTION_HEAL}"));
                self.transcript
                    .log_heal("potion", POTION_HEAL, self.state.player_hp);
                events.push(BattleEvent::PotionUsed {
                    player_hp: self.state.player_hp,
                });
                self.schedule.after(
                    ENEMY_REPLY_AFTER_POTION_MS,
                    TurnEvent::EnemyWindup { guarded: false },
                );
            }
            RootAction::Cry => {
                // pure theater, the dragon is unmoved
                self.state.set_message("Boo Hoo cry baby!");
            }
            RootAction::Run => {
                // there is no fleeing a boss fight
                self.state.set_message("Can't run from a boss!");
            }
        }
        events
    }

    /// Handle a move selection from the FIGHT panel. Ignored while locked,
    /// on the wrong panel, or when the move has no uses left.
    pub fn select_move(&mut self, kind: MoveKind) -> Vec<BattleEvent> {
        let mut events = Vec::new();
        if self.state.locked() || self.state.menu != Menu::Moves {
            return events;
        }
        if !self.state.pp.spend(kind) {
            return events;
        }
        self.begin_turn();
        self.transcript.log_move(kind.label());
        events.push(BattleEvent::MoveUsed { kind });

        match kind {
            MoveKind::Slash | MoveKind::Fireball => {
                self.state
                    .set_message(format!("You used {}!", kind.label()));
                let damage = roll_move_damage(kind, &mut self.rng).unwrap_or_default();
                self.schedule
                    .after(PLAYER_STRIKE_MS, TurnEvent::PlayerStrike { damage });
            }
            MoveKind::Guard => {
                self.state.set_message("You brace for impact!");
                self.transcript.log_guard();
                events.push(BattleEvent::GuardRaised);
                self.schedule.after(
                    ENEMY_REPLY_AFTER_GUARD_MS,
                    TurnEvent::EnemyWindup { guarded: true },
                );
            }
            MoveKind::Heal => {
                self.state.heal_player(TONIC_HEAL);
                self.state
                    .set_message(format!("You drank bubble tea! +{TONIC_HEAL}"));
                self.transcript
                    .log_heal("tonic", TONIC_HEAL, self.state.player_hp);
                events.push(BattleEvent::PlayerHealed {
                    amount: TONIC_HEAL,
                    player_hp: self.state.player_hp,
                });
                self.schedule.after(
                    ENEMY_REPLY_AFTER_TONIC_MS,
                    TurnEvent::EnemyWindup { guarded: false },
                );
            }
        }
        events
    }

    /// Advance the logical clock, resolving everything that falls due.
    pub fn advance(&mut self, dt_ms: u64) -> Vec<BattleEvent> {
        let target = self.schedule.now_ms().saturating_add(dt_ms);
        let mut events = Vec::new();
        while let Some(event) = self.schedule.pop_due_until(target) {
            self.resolve(event, &mut events);
        }
        self.schedule.settle_at(target);
        events
    }

    fn begin_turn(&mut self) {
        self.turn += 1;
        self.transcript.log_turn(self.turn);
        self.state.phase = Phase::ResolvingPlayerAction;
    }

    fn resolve(&mut self, event: TurnEvent, out: &mut Vec<BattleEvent>) {
        match event {
            TurnEvent::PlayerStrike { damage } => {
                self.state.damage_enemy(damage);
                self.transcript
                    .log_damage("dragon", self.state.enemy_hp, ENEMY_MAX_HP);
                out.push(BattleEvent::PlayerStruck {
                    damage,
                    enemy_hp: self.state.enemy_hp,
                });
                if self.state.enemy_hp == 0 {
                    self.settle_victory(out);
                } else {
                    self.state.menu = Menu::Root;
                    self.state.phase = Phase::ResolvingEnemyAction;
                    self.schedule.after(
                        ENEMY_REPLY_AFTER_STRIKE_MS,
                        TurnEvent::EnemyWindup { guarded: false },
                    );
                }
            }
            TurnEvent::EnemyWindup { guarded } => {
                self.state.phase = Phase::ResolvingEnemyAction;
                self.state.menu = Menu::Root;
                self.state.set_message("Dragon used FIRE BREATH!");
                self.transcript.log_enemy_move(guarded);
                let raw = roll_fire_breath(&mut self.rng);
                let damage = if guarded { guarded_damage(raw) } else { raw };
                out.push(BattleEvent::EnemyWindup { guarded });
                self.schedule
                    .after(ENEMY_STRIKE_MS, TurnEvent::EnemyStrike { damage, guarded });
            }
            TurnEvent::EnemyStrike { damage, guarded } => {
                self.state.damage_player(damage);
                self.transcript
                    .log_damage("player", self.state.player_hp, PLAYER_MAX_HP);
                out.push(BattleEvent::EnemyStruck {
                    damage,
                    guarded,
                    player_hp: self.state.player_hp,
                });
                if self.state.player_hp == 0 {
                    self.state.phase = Phase::Defeated;
                    self.state
                        .set_message("WTF so noob got rekt! Restarting...");
                    self.transcript.log_faint("player");
                    out.push(BattleEvent::PlayerFainted);
                    self.schedule
                        .after(DEFEAT_RESET_MS, TurnEvent::ResetEncounter);
                } else {
                    self.state.phase = Phase::AwaitingPlayerInput;
                    self.state.menu = Menu::Root;
                    self.state.set_message("What will you do?");
                }
            }
            TurnEvent::ResetEncounter => {
                self.state.reset();
                self.schedule.clear();
                self.transcript.log_reset();
                out.push(BattleEvent::EncounterReset);
            }
        }
    }

    fn settle_victory(&mut self, out: &mut Vec<BattleEvent>) {
        self.state.phase = Phase::Victorious;
        self.state.set_message("You defeated the dragon!");
        // nothing may fire after the dragon falls
        self.schedule.clear();
        self.transcript.log_win();
        out.push(BattleEvent::Victory);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drain(encounter: &mut Encounter) -> Vec<BattleEvent> {
        let mut events = Vec::new();
        while let Some(wait) = encounter.next_event_in() {
            events.extend(encounter.advance(wait));
        }
        events
    }

    #[test]
    fn fight_opens_the_move_panel() {
        let mut encounter = Encounter::new(1);
        let events = encounter.select_root(RootAction::Fight);
        assert!(events.is_empty());
        assert_eq!(encounter.state().menu, Menu::Moves);
        assert_eq!(encounter.state().message, "Choose a move!");
        assert!(!encounter.state().locked());
    }

    #[test]
    fn cry_and_run_leave_input_open() {
        let mut encounter = Encounter::new(1);
        encounter.select_root(RootAction::Cry);
        assert_eq!(encounter.state().message, "Boo Hoo cry baby!");
        assert!(!encounter.state().locked());
        encounter.select_root(RootAction::Run);
        assert_eq!(encounter.state().message, "Can't run from a boss!");
        assert!(!encounter.state().locked());
        assert!(encounter.next_event_in().is_none());
    }

    #[test]
    fn potion_heals_and_hands_the_turn_over() {
        let mut encounter = Encounter::new(2);
        encounter.state.player_hp = 60;
        let events = encounter.select_root(RootAction::Bag);
        assert_eq!(events, vec![BattleEvent::PotionUsed { player_hp: 95 }]);
        assert!(encounter.state().locked());

        let replies = drain(&mut encounter);
        assert!(matches!(replies[0], BattleEvent::EnemyWindup { guarded: false }));
        assert!(matches!(replies[1], BattleEvent::EnemyStruck { guarded: false, .. }));
        assert!(!encounter.state().locked());
        assert_eq!(encounter.state().message, "What will you do?");
    }

    #[test]
    fn potion_at_ninety_caps_at_full_health() {
        let mut encounter = Encounter::new(2);
        encounter.state.player_hp = 90;
        let events = encounter.select_root(RootAction::Bag);
        assert_eq!(events, vec![BattleEvent::PotionUsed { player_hp: 100 }]);
    }

    #[test]
    fn selections_are_ignored_while_locked() {
        let mut encounter = Encounter::new(3);
        encounter.select_root(RootAction::Fight);
        assert!(!encounter.select_move(MoveKind::Slash).is_empty());
        // mid-resolution now: every further selection must bounce
        assert!(encounter.select_move(MoveKind::Fireball).is_empty());
        assert!(encounter.select_root(RootAction::Bag).is_empty());
        assert_eq!(encounter.state().pp.remaining(MoveKind::Fireball), 5);
        assert_eq!(encounter.state().player_hp, 100);
    }

    #[test]
    fn root_commands_bounce_on_the_move_panel() {
        let mut encounter = Encounter::new(3);
        encounter.select_root(RootAction::Fight);
        assert!(encounter.select_root(RootAction::Bag).is_empty());
        assert_eq!(encounter.state().player_hp, 100);
        assert_eq!(encounter.state().menu, Menu::Moves);
    }

    #[test]
    fn moves_without_uses_are_rejected() {
        let mut encounter = Encounter::new(4);
        for _ in 0..5 {
            encounter.state.pp.spend(MoveKind::Slash);
        }
        encounter.select_root(RootAction::Fight);
        assert!(encounter.select_move(MoveKind::Slash).is_empty());
        assert!(!encounter.state().locked());
        assert_eq!(encounter.turn(), 0);
    }

    #[test]
    fn guard_halves_the_same_fire_breath_roll() {
        // both paths reach the dragon's roll with an untouched rng stream,
        // so the raw damage is identical and only the brace differs
        let mut open = Encounter::new(99);
        open.select_root(RootAction::Bag);
        let open_events = drain(&mut open);
        let raw = open_events
            .iter()
            .find_map(|event| match event {
                BattleEvent::EnemyStruck { damage, .. } => Some(*damage),
                _ => None,
            })
            .unwrap();

        let mut braced = Encounter::new(99);
        braced.select_root(RootAction::Fight);
        braced.select_move(MoveKind::Guard);
        let braced_events = drain(&mut braced);
        let halved = braced_events
            .iter()
            .find_map(|event| match event {
                BattleEvent::EnemyStruck { damage, guarded: true, .. } => Some(*damage),
                _ => None,
            })
            .unwrap();

        assert!((6..=18).contains(&raw));
        assert_eq!(halved, raw / 2);
    }

    #[test]
    fn attack_resolves_then_dragon_answers_once() {
        let mut encounter = Encounter::new(5);
        encounter.select_root(RootAction::Fight);
        encounter.select_move(MoveKind::Slash);
        let events = drain(&mut encounter);

        let strikes = events
            .iter()
            .filter(|event| matches!(event, BattleEvent::PlayerStruck { .. }))
            .count();
        let replies = events
            .iter()
            .filter(|event| matches!(event, BattleEvent::EnemyStruck { .. }))
            .count();
        assert_eq!(strikes, 1);
        assert_eq!(replies, 1);
        assert!(!encounter.state().locked());
        assert_eq!(encounter.state().menu, Menu::Root);
        assert_eq!(encounter.turn(), 1);
    }

    #[test]
    fn killing_blow_cancels_the_dragon_reply() {
        let mut state = BattleState::new();
        state.enemy_hp = 5;
        let mut encounter = Encounter::from_state(state, 6);
        encounter.select_root(RootAction::Fight);
        encounter.select_move(MoveKind::Slash);
        let events = drain(&mut encounter);

        assert!(events.contains(&BattleEvent::Victory));
        assert!(!events.iter().any(|event| matches!(event, BattleEvent::EnemyWindup { .. })));
        assert!(encounter.is_settled());
        assert_eq!(encounter.state().message, "You defeated the dragon!");

        // the clock may keep running but nothing more can happen
        assert!(encounter.advance(1_000_000).is_empty());
        assert!(encounter.select_root(RootAction::Fight).is_empty());
        assert!(encounter.select_move(MoveKind::Fireball).is_empty());
        assert_eq!(encounter.outcome(), Some(Outcome::PlayerVictorious));
    }

    #[test]
    fn defeat_restarts_the_encounter_in_full() {
        let mut state = BattleState::new();
        state.player_hp = 1;
        state.pp.spend(MoveKind::Fireball);
        let mut encounter = Encounter::from_state(state, 7);
        encounter.select_root(RootAction::Fight);
        encounter.select_move(MoveKind::Guard);

        // windup then strike; even a guarded breath kills at 1 hp
        let wait = encounter.next_event_in().unwrap();
        encounter.advance(wait);
        let wait = encounter.next_event_in().unwrap();
        let events = encounter.advance(wait);
        assert!(events.contains(&BattleEvent::PlayerFainted));
        assert_eq!(encounter.outcome(), Some(Outcome::PlayerDefeated));
        assert!(encounter.state().locked());

        assert!(encounter.advance(DEFEAT_RESET_MS - 1).is_empty());
        let reset_events = encounter.advance(1);
        assert_eq!(reset_events, vec![BattleEvent::EncounterReset]);
        assert_eq!(*encounter.state(), BattleState::new());
        assert!(!encounter.state().locked());
        assert_eq!(encounter.outcome(), None);
    }

    #[test]
    fn same_seed_replays_the_same_battle() {
        let script = |encounter: &mut Encounter| {
            encounter.select_root(RootAction::Fight);
            encounter.select_move(MoveKind::Fireball);
            drain(encounter);
            encounter.select_root(RootAction::Bag);
            drain(encounter);
            encounter.select_root(RootAction::Fight);
            encounter.select_move(MoveKind::Slash);
            drain(encounter)
        };
        let mut first = Encounter::new(1234);
        let mut second = Encounter::new(1234);
        let last_first = script(&mut first);
        let last_second = script(&mut second);
        assert_eq!(last_first, last_second);
        assert_eq!(first.state(), second.state());
        assert_eq!(first.transcript().lines(), second.transcript().lines());
        assert_eq!(first.clock_ms(), second.clock_ms());
    }
}
