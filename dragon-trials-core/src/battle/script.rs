//! Text command scripts for deterministic replays.
//!
//! One command per line, `#` starts a comment. Commands name either a move
//! (`slash`, `fireball`, `guard`, `heal`/`bubbletea`) or a root action
//! (`bag`/`potion`, `cry`, `run`).

use crate::battle::policy::PlayerChoice;
use crate::battle::state::MoveKind;
use anyhow::{bail, Result};
use phf::phf_map;

static MOVE_ALIASES: phf::Map<&'static str, MoveKind> = phf_map! {
    "slash" => MoveKind::Slash,
    "fireball" => MoveKind::Fireball,
    "guard" => MoveKind::Guard,
    "heal" => MoveKind::Heal,
    "bubbletea" => MoveKind::Heal,
};

static COMMAND_ALIASES: phf::Map<&'static str, PlayerChoice> = phf_map! {
    "bag" => PlayerChoice::Bag,
    "potion" => PlayerChoice::Bag,
    "cry" => PlayerChoice::Cry,
    "run" => PlayerChoice::Run,
};

fn normalize(name: &str) -> String {
    name.to_ascii_lowercase()
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .collect()
}

/// Resolve a move by name or alias.
pub fn lookup_move(name: &str) -> Option<MoveKind> {
    MOVE_ALIASES.get(normalize(name).as_str()).copied()
}

/// Resolve a single script token.
pub fn parse_command(token: &str) -> Option<PlayerChoice> {
    let key = normalize(token);
    if let Some(choice) = COMMAND_ALIASES.get(key.as_str()) {
        return Some(*choice);
    }
    MOVE_ALIASES.get(key.as_str()).map(|kind| PlayerChoice::Move(*kind))
}

/// Parse a whole script into the command list a [`ScriptedPolicy`] replays.
///
/// [`ScriptedPolicy`]: crate::battle::policy::ScriptedPolicy
pub fn parse_script(text: &str) -> Result<Vec<PlayerChoice>> {
    let mut commands = Vec::new();
    for (idx, line) in text.lines().enumerate() {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        match parse_command(trimmed) {
            Some(choice) => commands.push(choice),
            None => bail!("line {}: unknown command '{}'", idx + 1, trimmed),
        }
    }
    Ok(commands)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_a_mixed_script() -> Result<()> {
        let text = "\
# opening: trade blows, then stall
slash
fireball

guard
bag
cry
bubbletea
";
        let commands = parse_script(text)?;
        assert_eq!(
            commands,
            vec![
                PlayerChoice::Move(MoveKind::Slash),
                PlayerChoice::Move(MoveKind::Fireball),
                PlayerChoice::Move(MoveKind::Guard),
                PlayerChoice::Bag,
                PlayerChoice::Cry,
                PlayerChoice::Move(MoveKind::Heal),
            ]
        );
        Ok(())
    }

    #[test]
    fn aliases_collapse_to_the_same_command() {
        assert_eq!(parse_command("potion"), Some(PlayerChoice::Bag));
        assert_eq!(parse_command("BUBBLE TEA"), Some(PlayerChoice::Move(MoveKind::Heal)));
        assert_eq!(parse_command("Bubble-Tea"), Some(PlayerChoice::Move(MoveKind::Heal)));
    }

    #[test]
    fn unknown_commands_fail_with_the_line_number() {
        let err = parse_script("slash\nsummon meteor\n").unwrap_err();
        assert!(err.to_string().contains("line 2"));
        assert!(err.to_string().contains("summon meteor"));
    }

    #[test]
    fn lookup_ignores_case_and_separators() {
        assert_eq!(lookup_move("Slash"), Some(MoveKind::Slash));
        assert_eq!(lookup_move("FIRE BALL"), Some(MoveKind::Fireball));
        assert_eq!(lookup_move("mend"), None);
    }
}
