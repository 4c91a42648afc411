//! Fastest-run standings, kept as a JSON file.
//!
//! Entries stay sorted by time, fastest first; ties keep submission order.

use std::fs;
use std::path::Path;

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

/// How many rows a board listing shows.
pub const BOARD_LIMIT: usize = 20;

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Entry {
    pub name: String,
    pub portrait: Option<String>,
    pub time_ms: u64,
    pub recorded_at_ms: u64,
}

impl Entry {
    pub fn new(name: impl Into<String>, portrait: Option<String>, time_ms: u64) -> Self {
        let recorded_at_ms = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or_default();
        Self {
            name: name.into(),
            portrait,
            time_ms,
            recorded_at_ms,
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct Leaderboard {
    entries: Vec<Entry>,
}

impl Leaderboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read a board from disk. A missing file is an empty board.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::new());
        }
        let raw = fs::read_to_string(path)
            .with_context(|| format!("failed to read leaderboard at {}", path.display()))?;
        let entries: Vec<Entry> = serde_json::from_str(&raw)
            .with_context(|| format!("leaderboard at {} is not valid JSON", path.display()))?;
        Ok(Self { entries })
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let raw = serde_json::to_string_pretty(&self.entries)?;
        fs::write(path, raw)
            .with_context(|| format!("failed to write leaderboard at {}", path.display()))
    }

    /// Insert an entry, keeping times ascending. Ties go behind existing
    /// entries with the same time.
    pub fn submit(&mut self, entry: Entry) -> Result<()> {
        if entry.name.trim().is_empty() {
            bail!("leaderboard entries need a name");
        }
        let pos = self
            .entries
            .iter()
            .position(|e| e.time_ms > entry.time_ms)
            .unwrap_or(self.entries.len());
        self.entries.insert(pos, entry);
        Ok(())
    }

    pub fn top(&self, n: usize) -> &[Entry] {
        &self.entries[..self.entries.len().min(n)]
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Render a time as `MM:SS.mmm`, the way the final screen shows it.
pub fn format_clock(ms: u64) -> String {
    let mins = ms / 60_000;
    let secs = (ms % 60_000) / 1_000;
    let millis = ms % 1_000;
    format!("{mins:02}:{secs:02}.{millis:03}")
}
