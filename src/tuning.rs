//! Data-driven mechanic tuning
//!
//! Thresholds and rates for the per-level mechanics. Loaded from a JSON file
//! on native builds; missing fields fall back to the shipped defaults.

use std::path::Path;

use serde::{Deserialize, Serialize};

/// Mechanic thresholds and rates
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Name ===
    /// Fragments that must be absorbed to finish the Name level
    pub fragment_goal: u32,

    // === Chewing / Wind ===
    /// Hard ceiling on player scale
    pub max_player_scale: f32,

    // === Sun ===
    /// Rain level the ramp stops at
    pub max_rain: f32,
    /// Rain level that completes the Sun level
    pub rain_completion: f32,
    /// Rain level above which the sun is put out
    pub rain_extinguish: f32,
    /// Rain added per ramp interval
    pub rain_step: f32,
    /// Seconds between ramp steps
    pub rain_interval: f32,

    // === Connection ===
    /// Minimum distance between generated nodes
    pub min_node_separation: f32,
    /// Placement attempts per node before accepting an unchecked spot
    pub placement_attempts: u32,
    /// Chance that a node gets a supporting platform
    pub platform_chance: f64,

    // === Prologue ===
    /// Distance from the exit gate that counts as reaching it
    pub exit_radius: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            fragment_goal: 5,

            max_player_scale: 10.0,

            max_rain: 20.0,
            rain_completion: 15.0,
            rain_extinguish: 6.0,
            rain_step: 0.2,
            rain_interval: 0.1,

            min_node_separation: 4.0,
            placement_attempts: 20,
            platform_chance: 0.6,

            exit_radius: 4.0,
        }
    }
}

impl Tuning {
    /// Parse tuning from JSON (fields may be omitted). Out-of-range values
    /// are repaired, see [`Tuning::sanitized`].
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str::<Self>(json).map(Self::sanitized)
    }

    /// Serialize tuning to pretty JSON
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Repair values the mechanics cannot run with.
    ///
    /// `platform_chance` is clamped into [0, 1]. The rain thresholds must
    /// satisfy `extinguish < completion <= max` with a positive step and
    /// interval; otherwise all rain fields revert to their defaults.
    pub fn sanitized(mut self) -> Self {
        let defaults = Self::default();

        if self.platform_chance.is_nan() {
            log::warn!("platform_chance is NaN, using {}", defaults.platform_chance);
            self.platform_chance = defaults.platform_chance;
        } else if !(0.0..=1.0).contains(&self.platform_chance) {
            let clamped = self.platform_chance.clamp(0.0, 1.0);
            log::warn!("platform_chance {} out of range, using {}", self.platform_chance, clamped);
            self.platform_chance = clamped;
        }

        let rain_ordered = self.rain_extinguish < self.rain_completion
            && self.rain_completion <= self.max_rain
            && self.rain_step > 0.0
            && self.rain_interval > 0.0;
        if !rain_ordered {
            log::warn!(
                "Rain thresholds out of order (extinguish {}, completion {}, max {}, step {}, interval {}), using defaults",
                self.rain_extinguish,
                self.rain_completion,
                self.max_rain,
                self.rain_step,
                self.rain_interval
            );
            self.max_rain = defaults.max_rain;
            self.rain_completion = defaults.rain_completion;
            self.rain_extinguish = defaults.rain_extinguish;
            self.rain_step = defaults.rain_step;
            self.rain_interval = defaults.rain_interval;
        }

        self
    }

    /// Load tuning from a JSON file, falling back to defaults on any failure
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match std::fs::read_to_string(path) {
            Ok(json) => match Self::from_json(&json) {
                Ok(tuning) => {
                    log::info!("Loaded tuning from {}", path.display());
                    tuning
                }
                Err(e) => {
                    log::warn!("Invalid tuning file {}: {}", path.display(), e);
                    Self::default()
                }
            },
            Err(e) => {
                log::warn!("Could not read tuning file {}: {}", path.display(), e);
                Self::default()
            }
        }
    }
}
