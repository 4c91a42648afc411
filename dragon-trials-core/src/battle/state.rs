//! Battle state for the knight-versus-dragon encounter.

pub const PLAYER_MAX_HP: u16 = 100;
pub const ENEMY_MAX_HP: u16 = 150;
pub const PLAYER_LEVEL: u8 = 35;
pub const ENEMY_LEVEL: u8 = 50;

pub const INTRO_MESSAGE: &str = "The dragon appeared!";

/// Which command panel the player currently sees.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Menu {
    Root,
    Moves,
}

/// Where the encounter stands in its turn cycle.
///
/// Input is only accepted in `AwaitingPlayerInput`; every other phase keeps
/// the panel locked until the pending resolution lands.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Phase {
    AwaitingPlayerInput,
    ResolvingPlayerAction,
    ResolvingEnemyAction,
    Defeated,
    Victorious,
}

/// Top-level commands on the root panel.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum RootAction {
    Fight,
    Bag,
    Cry,
    Run,
}

impl RootAction {
    pub const ALL: [RootAction; 4] = [
        RootAction::Fight,
        RootAction::Bag,
        RootAction::Cry,
        RootAction::Run,
    ];

    pub fn label(self) -> &'static str {
        match self {
            RootAction::Fight => "FIGHT",
            RootAction::Bag => "BAG",
            RootAction::Cry => "CRY",
            RootAction::Run => "RUN",
        }
    }
}

/// The knight's four moves.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum MoveKind {
    Slash,
    Fireball,
    Guard,
    Heal,
}

impl MoveKind {
    pub const ALL: [MoveKind; 4] = [
        MoveKind::Slash,
        MoveKind::Fireball,
        MoveKind::Guard,
        MoveKind::Heal,
    ];

    pub fn label(self) -> &'static str {
        match self {
            MoveKind::Slash => "SLASH",
            MoveKind::Fireball => "FIREBALL",
            MoveKind::Guard => "GUARD",
            MoveKind::Heal => "BUBBLE TEA",
        }
    }

    pub fn max_pp(self) -> u8 {
        match self {
            MoveKind::Slash => 5,
            MoveKind::Fireball => 5,
            MoveKind::Guard => 8,
            MoveKind::Heal => 5,
        }
    }

    pub fn is_attack(self) -> bool {
        matches!(self, MoveKind::Slash | MoveKind::Fireball)
    }

    fn index(self) -> usize {
        match self {
            MoveKind::Slash => 0,
            MoveKind::Fireball => 1,
            MoveKind::Guard => 2,
            MoveKind::Heal => 3,
        }
    }
}

/// Remaining uses for each move.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct MovePoints {
    remaining: [u8; 4],
}

impl MovePoints {
    pub fn full() -> Self {
        let mut remaining = [0u8; 4];
        for kind in MoveKind::ALL {
            remaining[kind.index()] = kind.max_pp();
        }
        Self { remaining }
    }

    pub fn remaining(&self, kind: MoveKind) -> u8 {
        self.remaining[kind.index()]
    }

    /// Consume one use; false when the move is spent.
    pub fn spend(&mut self, kind: MoveKind) -> bool {
        let slot = &mut self.remaining[kind.index()];
        if *slot == 0 {
            return false;
        }
        *slot -= 1;
        true
    }

    pub fn refill(&mut self) {
        *self = Self::full();
    }

    pub fn any_attack_left(&self) -> bool {
        MoveKind::ALL
            .iter()
            .any(|kind| kind.is_attack() && self.remaining(*kind) > 0)
    }
}

impl Default for MovePoints {
    fn default() -> Self {
        Self::full()
    }
}

/// Observable encounter state.
#[derive(Clone, Debug, PartialEq)]
pub struct BattleState {
    pub player_hp: u16,
    pub enemy_hp: u16,
    pub menu: Menu,
    pub phase: Phase,
    pub message: String,
    pub pp: MovePoints,
}

impl BattleState {
    pub fn new() -> Self {
        Self {
            player_hp: PLAYER_MAX_HP,
            enemy_hp: ENEMY_MAX_HP,
            menu: Menu::Root,
            phase: Phase::AwaitingPlayerInput,
            message: INTRO_MESSAGE.to_string(),
            pp: MovePoints::full(),
        }
    }

    /// True whenever the command panel refuses input.
    pub fn locked(&self) -> bool {
        self.phase != Phase::AwaitingPlayerInput
    }

    pub fn damage_player(&mut self, amount: u16) {
        self.player_hp = self.player_hp.saturating_sub(amount);
    }

    pub fn damage_enemy(&mut self, amount: u16) {
        self.enemy_hp = self.enemy_hp.saturating_sub(amount);
    }

    pub fn heal_player(&mut self, amount: u16) {
        self.player_hp = self.player_hp.saturating_add(amount).min(PLAYER_MAX_HP);
    }

    pub fn set_message(&mut self, message: impl Into<String>) {
        self.message = message.into();
    }

    /// Restore the opening state of the encounter.
    pub fn reset(&mut self) {
        *self = Self::new();
    }
}

impl Default for BattleState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn move_points_start_full() {
        let pp = MovePoints::full();
        assert_eq!(pp.remaining(MoveKind::Slash), 5);
        assert_eq!(pp.remaining(MoveKind::Fireball), 5);
        assert_eq!(pp.remaining(MoveKind::Guard), 8);
        assert_eq!(pp.remaining(MoveKind::Heal), 5);
    }

    #[test]
    fn spend_stops_at_zero() {
        let mut pp = MovePoints::full();
        for _ in 0..5 {
            assert!(pp.spend(MoveKind::Slash));
        }
        assert_eq!(pp.remaining(MoveKind::Slash), 0);
        assert!(!pp.spend(MoveKind::Slash));
        assert_eq!(pp.remaining(MoveKind::Slash), 0);
    }

    #[test]
    fn refill_restores_every_move() {
        let mut pp = MovePoints::full();
        pp.spend(MoveKind::Guard);
        pp.spend(MoveKind::Heal);
        pp.refill();
        assert_eq!(pp, MovePoints::full());
    }

    #[test]
    fn hp_clamps_at_both_ends() {
        let mut state = BattleState::new();
        state.damage_player(250);
        assert_eq!(state.player_hp, 0);
        state.heal_player(35);
        state.heal_player(90);
        assert_eq!(state.player_hp, PLAYER_MAX_HP);
        state.damage_enemy(9_999);
        assert_eq!(state.enemy_hp, 0);
    }

    #[test]
    fn only_awaiting_input_is_unlocked() {
        let mut state = BattleState::new();
        assert!(!state.locked());
        for phase in [
            Phase::ResolvingPlayerAction,
            Phase::ResolvingEnemyAction,
            Phase::Defeated,
            Phase::Victorious,
        ] {
            state.phase = phase;
            assert!(state.locked());
        }
    }

    #[test]
    fn attack_moves_are_slash_and_fireball() {
        assert!(MoveKind::Slash.is_attack());
        assert!(MoveKind::Fireball.is_attack());
        assert!(!MoveKind::Guard.is_attack());
        assert!(!MoveKind::Heal.is_attack());
    }
}
