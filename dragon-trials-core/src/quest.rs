//! One challenger's trip through the gauntlet.
//!
//! A run is created at registration and carries the challenger's name and
//! portrait plus the wall clock. The clock starts the moment the run is
//! created and the final time is whatever it reads when the dragon falls.

use std::time::{Instant, SystemTime, UNIX_EPOCH};

use anyhow::{bail, Result};
use rand::Rng;

const SESSION_SUFFIX_LEN: usize = 6;
const SESSION_CHARS: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// The four trials plus the bookend screens, in play order.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Stage {
    Register,
    Maze,
    Runner,
    Memory,
    Battle,
    Done,
}

impl Stage {
    pub const ORDER: [Stage; 6] = [
        Stage::Register,
        Stage::Maze,
        Stage::Runner,
        Stage::Memory,
        Stage::Battle,
        Stage::Done,
    ];

    pub fn next(self) -> Stage {
        match self {
            Stage::Register => Stage::Maze,
            Stage::Maze => Stage::Runner,
            Stage::Runner => Stage::Memory,
            Stage::Memory => Stage::Battle,
            Stage::Battle => Stage::Done,
            Stage::Done => Stage::Done,
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Stage::Register => "Registration",
            Stage::Maze => "MAZE: Find the Exit",
            Stage::Runner => "Score 4000 points to advance!",
            Stage::Memory => "Card Matcher",
            Stage::Battle => "Boss Battle",
            Stage::Done => "Quest Complete!",
        }
    }
}

/// A registered challenger mid-quest.
#[derive(Clone, Debug)]
pub struct Run {
    session_id: String,
    player_name: String,
    portrait: Option<String>,
    started_at_unix_ms: u64,
    started: Instant,
    stage: Stage,
    final_time_ms: Option<u64>,
}

impl Run {
    /// Register a challenger and start the clock. The name is trimmed and
    /// must not be blank; the portrait is carried as-is.
    pub fn begin(name: &str, portrait: Option<String>, rng: &mut impl Rng) -> Result<Self> {
        let player_name = name.trim();
        if player_name.is_empty() {
            bail!("player name is empty");
        }
        let started_at_unix_ms = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or_default();
        let suffix: String = (0..SESSION_SUFFIX_LEN)
            .map(|_| SESSION_CHARS[rng.gen_range(0..SESSION_CHARS.len())] as char)
            .collect();
        Ok(Self {
            session_id: format!("run_{started_at_unix_ms}_{suffix}"),
            player_name: player_name.to_string(),
            portrait,
            started_at_unix_ms,
            started: Instant::now(),
            stage: Stage::Register,
            final_time_ms: None,
        })
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    pub fn player_name(&self) -> &str {
        &self.player_name
    }

    pub fn portrait(&self) -> Option<&str> {
        self.portrait.as_deref()
    }

    pub fn started_at_unix_ms(&self) -> u64 {
        self.started_at_unix_ms
    }

    pub fn started(&self) -> Instant {
        self.started
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    /// Move on to the next stage and return it.
    pub fn complete_stage(&mut self) -> Stage {
        self.stage = self.stage.next();
        self.stage
    }

    pub fn elapsed_ms(&self) -> u64 {
        self.elapsed_at(Instant::now())
    }

    pub fn elapsed_at(&self, at: Instant) -> u64 {
        at.saturating_duration_since(self.started).as_millis() as u64
    }

    /// Stop the clock, mark the run done, and return the final time.
    pub fn finish(&mut self) -> u64 {
        let ms = self.elapsed_ms();
        self.final_time_ms = Some(ms);
        self.stage = Stage::Done;
        ms
    }

    pub fn final_time_ms(&self) -> Option<u64> {
        self.final_time_ms
    }
}
