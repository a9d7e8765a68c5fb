//! Data-driven game balance
//!
//! Every number that shapes a run lives here so it can be loaded from JSON.

use anyhow::{Context, Result, ensure};
use serde::{Deserialize, Serialize};

use crate::consts::*;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Health drained per second of play
    pub health_loss_per_second: f32,
    /// Health restored by each correct chop
    pub tap_health_gain: f32,
    /// Random pieces generated after the seeded [None, Right] start
    pub prefill_pieces: u32,
    /// Rolls below this become Left pieces
    pub left_threshold: f32,
    /// Rolls below this (and at or above `left_threshold`) become Right pieces
    pub right_threshold: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            health_loss_per_second: HEALTH_LOSS_PER_SECOND,
            tap_health_gain: TAP_HEALTH_GAIN,
            prefill_pieces: PREFILL_PIECES,
            left_threshold: LEFT_THRESHOLD,
            right_threshold: RIGHT_THRESHOLD,
        }
    }
}

impl Tuning {
    /// Parse and validate tuning from JSON (missing fields take defaults)
    pub fn from_json(json: &str) -> Result<Self> {
        let tuning: Tuning = serde_json::from_str(json).context("invalid tuning JSON")?;
        tuning.validate()?;
        Ok(tuning)
    }

    pub fn validate(&self) -> Result<()> {
        ensure!(
            self.health_loss_per_second.is_finite() && self.health_loss_per_second >= 0.0,
            "health_loss_per_second must be finite and non-negative, got {}",
            self.health_loss_per_second
        );
        ensure!(
            self.tap_health_gain.is_finite() && self.tap_health_gain >= 0.0,
            "tap_health_gain must be finite and non-negative, got {}",
            self.tap_health_gain
        );
        ensure!(
            (0.0..=1.0).contains(&self.left_threshold)
                && (0.0..=1.0).contains(&self.right_threshold),
            "thresholds must lie in [0, 1]"
        );
        ensure!(
            self.left_threshold <= self.right_threshold,
            "left_threshold ({}) must not exceed right_threshold ({})",
            self.left_threshold,
            self.right_threshold
        );
        Ok(())
    }

    /// Health lost over `dt` seconds
    pub fn health_loss(&self, dt: f32) -> f32 {
        self.health_loss_per_second * dt
    }
}
