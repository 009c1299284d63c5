//! High-score persistence.
//!
//! Persistence must never interrupt play: `load` falls back to 0 and `save`
//! swallows failures after logging them.

use std::path::{Path, PathBuf};

use anyhow::Context;

pub trait HighScoreStore {
    /// Best stored score, or 0 when nothing valid is stored.
    fn load(&self) -> u64;

    /// Best-effort save of a rounded score.
    fn save(&mut self, score: u64);
}

/// Parse a stored value; anything negative, non-finite or garbled reads as 0.
pub fn parse_score(raw: &str) -> u64 {
    match raw.trim().parse::<f64>() {
        Ok(v) if v.is_finite() && v > 0.0 => v.round() as u64,
        _ => 0,
    }
}

// ── File-backed store ─────────────────────────────────────────────────────────

#[derive(Clone, Debug)]
pub struct FileScoreStore {
    path: PathBuf,
}

impl FileScoreStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `$HOME/.stillpoint_high_score`, or the working directory without `HOME`.
    pub fn default_location() -> Self {
        let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
        Self::new(PathBuf::from(home).join(".stillpoint_high_score"))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn try_load(&self) -> anyhow::Result<u64> {
        let raw = std::fs::read_to_string(&self.path)
            .with_context(|| format!("reading {}", self.path.display()))?;
        Ok(parse_score(&raw))
    }

    fn try_save(&self, score: u64) -> anyhow::Result<()> {
        std::fs::write(&self.path, score.to_string())
            .with_context(|| format!("writing {}", self.path.display()))
    }
}

impl HighScoreStore for FileScoreStore {
    fn load(&self) -> u64 {
        if !self.path.exists() {
            return 0;
        }
        self.try_load().unwrap_or_else(|err| {
            log::warn!("high score unavailable: {err:#}");
            0
        })
    }

    fn save(&mut self, score: u64) {
        match self.try_save(score) {
            Ok(()) => log::info!("saved high score {score}"),
            Err(err) => log::warn!("high score not saved: {err:#}"),
        }
    }
}

// ── In-memory store ───────────────────────────────────────────────────────────

/// Keeps the score for the lifetime of the process only.
#[derive(Clone, Debug, Default)]
pub struct MemoryScoreStore {
    pub best: u64,
    pub saves: u32,
}

impl HighScoreStore for MemoryScoreStore {
    fn load(&self) -> u64 {
        self.best
    }

    fn save(&mut self, score: u64) {
        self.best = score;
        self.saves += 1;
    }
}
