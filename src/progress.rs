//! Per-level progress: best points and completion flags
//!
//! Persisted as JSON next to the executable. A missing or corrupt file
//! degrades to a fresh profile with a log line; saving failures surface as
//! `io::Result` for the caller to report.

use std::io;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts;

/// Homepage medal tiers, best-points thresholds per level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Medal {
    Red,
    Orange,
    Green,
}

/// Everything that survives between sessions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Progress {
    /// Best points per level, kept only once the level is completed
    pub points: [f32; consts::LEVEL_COUNT],
    pub completed: [bool; consts::LEVEL_COUNT],
}

impl Progress {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads a profile, falling back to a fresh one on any failure.
    pub fn load(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(json) => match serde_json::from_str(&json) {
                Ok(progress) => {
                    log::info!("Loaded progress from {}", path.display());
                    progress
                }
                Err(err) => {
                    log::warn!("Ignoring corrupt progress file {}: {err}", path.display());
                    Self::new()
                }
            },
            Err(_) => {
                log::info!("No progress file at {}, starting fresh", path.display());
                Self::new()
            }
        }
    }

    pub fn save(&self, path: &Path) -> io::Result<()> {
        let json = serde_json::to_string_pretty(self).expect("progress serializes");
        std::fs::write(path, json)?;
        log::info!("Progress saved to {}", path.display());
        Ok(())
    }

    /// A level is playable once every earlier level is completed.
    pub fn unlocked(&self, level: usize) -> bool {
        self.completed[..level].iter().all(|done| *done)
    }

    /// Records a finished run, keeping the best points.
    pub fn record(&mut self, level: usize, points: f32) {
        self.completed[level] = true;
        if points > self.points[level] {
            self.points[level] = points;
        }
    }

    /// The homepage medal for a level, if it has been completed.
    pub fn medal(&self, level: usize) -> Option<Medal> {
        if !self.completed[level] {
            return None;
        }
        let points = self.points[level];
        if points >= consts::GREEN_THRESHOLD {
            Some(Medal::Green)
        } else if points >= consts::ORANGE_THRESHOLD {
            Some(Medal::Orange)
        } else if points >= consts::RED_THRESHOLD {
            Some(Medal::Red)
        } else {
            None
        }
    }
}
