//! Damage and recovery rolls for the dragon encounter.

use crate::battle::state::MoveKind;
use rand::Rng;

pub const SLASH_MIN: u16 = 12;
pub const SLASH_MAX: u16 = 21;
pub const FIREBALL_MIN: u16 = 20;
pub const FIREBALL_MAX: u16 = 29;
pub const FIRE_BREATH_MIN: u16 = 6;
pub const FIRE_BREATH_MAX: u16 = 18;

pub const POTION_HEAL: u16 = 35;
pub const TONIC_HEAL: u16 = 18;

/// Roll the damage for an attacking move; `None` for moves that do not hit.
pub fn roll_move_damage(kind: MoveKind, rng: &mut impl Rng) -> Option<u16> {
    match kind {
        MoveKind::Slash => Some(rng.gen_range(SLASH_MIN..=SLASH_MAX)),
        MoveKind::Fireball => Some(rng.gen_range(FIREBALL_MIN..=FIREBALL_MAX)),
        MoveKind::Guard | MoveKind::Heal => None,
    }
}

/// Roll the dragon's fire breath damage.
pub fn roll_fire_breath(rng: &mut impl Rng) -> u16 {
    rng.gen_range(FIRE_BREATH_MIN..=FIRE_BREATH_MAX)
}

/// Halve an incoming hit while bracing, rounding down.
pub fn guarded_damage(raw: u16) -> u16 {
    raw / 2
}
