//! Data-driven game balance
//!
//! Every value is per display frame unless its name says otherwise. Missing
//! fields in a JSON override fall back to the defaults below.

use serde::{Deserialize, Serialize};

use crate::error::TuningError;

/// Runner balance knobs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Run ===
    /// Base forward speed (distance units per frame)
    pub base_speed: f32,
    /// Lives at the start of a run
    pub starting_lives: u8,
    /// Distance that wins the run
    pub max_distance: f32,
    /// Distance units per displayed kilometre
    pub distance_scale: f32,

    // === Player ===
    pub gravity: f32,
    /// Vertical velocity set by a jump (negative is up)
    pub jump_velocity: f32,
    /// Fraction of the remaining lateral gap closed each frame
    pub lane_follow: f32,

    // === Obstacles ===
    /// Spawn chance per frame at speed multiplier 1.0
    pub obstacle_chance: f32,
    /// Upper bound on the spawn chance after multiplier scaling
    pub obstacle_chance_cap: f32,
    /// Scroll distance per frame relative to effective speed
    pub scroll_factor: f32,
    /// Roadside scenery spawn chance per frame
    pub scenery_chance: f32,
    /// Scenery drift relative to base speed
    pub scenery_drift: f32,

    // === Questions ===
    /// Distance between question events
    pub question_interval: f32,
    /// Split progress gained or lost per frame
    pub split_step: f32,
    /// Lateral offset of each road branch at full split
    pub split_offset: f32,
    /// Delay between a decision and the road merging back
    pub merge_delay_ms: f64,

    // === Rewards and penalties ===
    pub correct_bonus: u64,
    pub wrong_penalty: u64,
    pub speed_step: f32,
    pub speed_floor: f32,
    pub speed_cap: f32,
    pub size_step: f32,
    pub size_floor: f32,
    pub size_cap: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            base_speed: 5.0,
            starting_lives: 5,
            max_distance: 100_000.0,
            distance_scale: 100.0,

            gravity: 0.8,
            jump_velocity: -15.0,
            lane_follow: 0.15,

            obstacle_chance: 0.015,
            obstacle_chance_cap: 0.03,
            scroll_factor: 1.0,
            scenery_chance: 0.005,
            scenery_drift: 0.5,

            question_interval: 800.0,
            split_step: 0.02,
            split_offset: 100.0,
            merge_delay_ms: 2000.0,

            correct_bonus: 100,
            wrong_penalty: 50,
            speed_step: 0.1,
            speed_floor: 0.5,
            speed_cap: 2.0,
            size_step: 0.05,
            size_floor: 0.7,
            size_cap: 1.5,
        }
    }
}

impl Tuning {
    /// Parse a (possibly partial) JSON override
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Parse an override, logging and falling back to defaults on failure
    pub fn from_json_or_default(json: &str) -> Self {
        match Self::from_json(json) {
            Ok(tuning) => tuning,
            Err(err) => {
                log::warn!("Ignoring tuning override: {}", err);
                Self::default()
            }
        }
    }

    fn validate(&self) -> Result<(), TuningError> {
        let positive = [
            ("base_speed", self.base_speed),
            ("max_distance", self.max_distance),
            ("distance_scale", self.distance_scale),
            ("question_interval", self.question_interval),
            ("split_step", self.split_step),
        ];
        for (field, value) in positive {
            if !(value > 0.0) {
                return Err(TuningError::OutOfRange { field, value });
            }
        }
        if self.speed_floor > self.speed_cap {
            return Err(TuningError::OutOfRange {
                field: "speed_floor",
                value: self.speed_floor,
            });
        }
        if self.size_floor > self.size_cap {
            return Err(TuningError::OutOfRange {
                field: "size_floor",
                value: self.size_floor,
            });
        }
        if !(0.0..=1.0).contains(&self.obstacle_chance_cap) {
            return Err(TuningError::OutOfRange {
                field: "obstacle_chance_cap",
                value: self.obstacle_chance_cap,
            });
        }
        Ok(())
    }

    /// Obstacle spawn chance for the given speed multiplier
    pub fn spawn_chance(&self, speed_multiplier: f32) -> f32 {
        (self.obstacle_chance * speed_multiplier).min(self.obstacle_chance_cap)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_override_keeps_defaults() {
        let tuning = Tuning::from_json(r#"{ "question_interval": 200.0, "starting_lives": 3 }"#)
            .unwrap();
        assert_eq!(tuning.question_interval, 200.0);
        assert_eq!(tuning.starting_lives, 3);
        assert_eq!(tuning.base_speed, Tuning::default().base_speed);
    }

    #[test]
    fn test_invalid_override_falls_back() {
        let tuning = Tuning::from_json_or_default(r#"{ "split_step": 0.0 }"#);
        assert_eq!(tuning, Tuning::default());

        let tuning = Tuning::from_json_or_default("not json");
        assert_eq!(tuning, Tuning::default());
    }

    #[test]
    fn test_inverted_bounds_rejected() {
        let err = Tuning::from_json(r#"{ "speed_floor": 3.0 }"#).unwrap_err();
        assert!(matches!(err, TuningError::OutOfRange { field: "speed_floor", .. }));
    }

    #[test]
    fn test_spawn_chance_capped() {
        let tuning = Tuning::default();
        assert!((tuning.spawn_chance(1.0) - 0.015).abs() < 1e-6);
        assert!((tuning.spawn_chance(2.0) - 0.03).abs() < 1e-6);
        assert!((tuning.spawn_chance(5.0) - 0.03).abs() < 1e-6);
    }
}
