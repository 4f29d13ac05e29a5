//! Data-driven game balance
//!
//! [`Tuning`] mirrors the balance constants in [`crate::consts`]. A run is
//! built from a `Tuning`, and `reset()` always returns to it. Loading from
//! JSON overrides only the keys present; everything else keeps the defaults.

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::SimError;

/// Balance knobs for a run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Player ===
    pub player_radius: f32,
    pub player_speed: f32,

    // === Projectiles ===
    pub projectile_radius: f32,
    pub projectile_damage: u32,
    pub projectile_speed: f32,
    pub volley_size: u32,
    pub pierce: i32,

    // === Burst fire ===
    pub burst_interval: f32,
    pub burst_duration: f32,

    // === Enemies ===
    pub descent_speed: f32,
    pub column_spawn_chance: f64,

    // === Spawn cadence ===
    pub spawn_base: f32,
    pub first_spawn_delay: f32,

    // === Progression ===
    pub first_threshold: u64,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            player_radius: PLAYER_RADIUS,
            player_speed: PLAYER_SPEED,

            projectile_radius: PROJECTILE_RADIUS,
            projectile_damage: PROJECTILE_DAMAGE,
            projectile_speed: PROJECTILE_SPEED,
            volley_size: VOLLEY_SIZE,
            pierce: PIERCE,

            burst_interval: BURST_INTERVAL,
            burst_duration: BURST_DURATION,

            descent_speed: DESCENT_SPEED,
            column_spawn_chance: COLUMN_SPAWN_CHANCE,

            spawn_base: SPAWN_BASE,
            first_spawn_delay: FIRST_SPAWN_DELAY,

            first_threshold: FIRST_THRESHOLD,
        }
    }
}

impl Tuning {
    /// Parse tuning from JSON and validate it
    pub fn from_json(json: &str) -> Result<Self, SimError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        log::info!("Loaded tuning overrides");
        Ok(tuning)
    }

    /// Reject values the simulation cannot run with
    pub fn validate(&self) -> Result<(), SimError> {
        let positive = [
            ("player_radius", self.player_radius),
            ("player_speed", self.player_speed),
            ("projectile_radius", self.projectile_radius),
            ("projectile_speed", self.projectile_speed),
            ("burst_interval", self.burst_interval),
            ("burst_duration", self.burst_duration),
            ("descent_speed", self.descent_speed),
            ("spawn_base", self.spawn_base),
        ];
        for (field, value) in positive {
            if !value.is_finite() || value <= 0.0 {
                return Err(SimError::InvalidTuning {
                    field,
                    value: value as f64,
                });
            }
        }

        if !self.first_spawn_delay.is_finite() || self.first_spawn_delay < 0.0 {
            return Err(SimError::InvalidTuning {
                field: "first_spawn_delay",
                value: self.first_spawn_delay as f64,
            });
        }
        if !(0.0..=1.0).contains(&self.column_spawn_chance) {
            return Err(SimError::InvalidTuning {
                field: "column_spawn_chance",
                value: self.column_spawn_chance,
            });
        }
        if self.projectile_damage == 0 {
            return Err(SimError::InvalidTuning {
                field: "projectile_damage",
                value: 0.0,
            });
        }
        if self.volley_size == 0 {
            return Err(SimError::InvalidTuning {
                field: "volley_size",
                value: 0.0,
            });
        }
        if self.pierce < 0 {
            return Err(SimError::InvalidTuning {
                field: "pierce",
                value: self.pierce as f64,
            });
        }
        if self.first_threshold == 0 {
            return Err(SimError::InvalidTuning {
                field: "first_threshold",
                value: 0.0,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let tuning = Tuning::default();
        assert!(tuning.validate().is_ok());
        assert_eq!(tuning.projectile_damage, 1);
        assert_eq!(tuning.projectile_speed, 360.0);
        assert_eq!(tuning.volley_size, 1);
        assert_eq!(tuning.pierce, 0);
        assert_eq!(tuning.burst_interval, 0.12);
        assert_eq!(tuning.burst_duration, 1.0);
        assert_eq!(tuning.descent_speed, 24.0);
        assert_eq!(tuning.first_threshold, 200);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let tuning = Tuning::from_json(r#"{ "descent_speed": 40.0, "pierce": 2 }"#).unwrap();
        assert_eq!(tuning.descent_speed, 40.0);
        assert_eq!(tuning.pierce, 2);
        assert_eq!(tuning.projectile_speed, PROJECTILE_SPEED);
    }

    #[test]
    fn test_rejects_bad_values() {
        let err = Tuning::from_json(r#"{ "burst_interval": 0.0 }"#).unwrap_err();
        assert!(matches!(
            err,
            SimError::InvalidTuning {
                field: "burst_interval",
                ..
            }
        ));

        let err = Tuning::from_json(r#"{ "column_spawn_chance": 1.5 }"#).unwrap_err();
        assert!(matches!(err, SimError::InvalidTuning { .. }));

        let err = Tuning::from_json(r#"{ "volley_size": 0 }"#).unwrap_err();
        assert!(matches!(err, SimError::InvalidTuning { .. }));
    }

    #[test]
    fn test_rejects_malformed_json() {
        let err = Tuning::from_json("{ not json").unwrap_err();
        assert!(matches!(err, SimError::TuningParse(_)));
    }
}
