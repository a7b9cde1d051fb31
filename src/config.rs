// src/config.rs
//! Vehicle tuning parameters.
//!
//! A single validated-on-construction struct replaces the grab-bag of mutable
//! public fields a scene editor would expose. `Default` is a known-good
//! tuning; `validate` enforces the ranges an editor slider would impose, so
//! every downstream consumer can assume sane numbers.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Full tuning surface of a vehicle.
///
/// Drag vectors are per-axis damping rates in the vehicle's local frame
/// (x = lateral, y = vertical, z = forward); each axis of the local velocity
/// is scaled by `1 - drag_axis * dt` per tick. Lower the forward component of
/// `ground_drag` for higher top speed, raise the lateral component of
/// `air_drag` for sharper, less drifty airborne turns.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VehicleConfig {
    /// Acceleration force; top speed is a function of acceleration vs drag.
    pub max_acceleration: f32,
    /// Rate of turn, roughly degrees per second.
    pub steering: f32,
    /// Upwards velocity applied when jumping.
    pub jump_force: f32,
    /// Multiplier on simulated gravity to tune airtime.
    pub gravity_multiplier: f32,
    /// Per-axis drag while on ground.
    pub ground_drag: Vec3,
    /// Per-axis drag while near (but not on) the ground.
    pub near_ground_drag: Vec3,
    /// Per-axis drag while airborne. No vertical drag by default, so the
    /// vehicle drops freely.
    pub air_drag: Vec3,
    /// Rate at which the vehicle settles to rest when nearly stationary.
    pub stationary_damp: f32,
    /// Speed below which stationary damping may engage.
    pub stationary_speed: f32,
    /// Amount to lean into a corner, correlated to the steering value.
    pub tilt_factor: f32,
    /// Vertical offset of the vehicle model within the rigid-body sphere.
    pub sphere_offset: f32,
    /// Maximum height above ground considered "near ground".
    pub near_ground_threshold: f32,
    /// Maximum height above ground considered "on ground".
    pub on_ground_threshold: f32,
    /// Whether the action input triggers jumps at all.
    pub jump_ability: bool,
    /// Whether steering still turns the vehicle while airborne.
    pub steer_in_air: bool,
}

impl Default for VehicleConfig {
    fn default() -> Self {
        Self {
            max_acceleration: 30.0,
            steering: 80.0,
            jump_force: 15.0,
            gravity_multiplier: 1.0,
            ground_drag: Vec3::ONE,
            near_ground_drag: Vec3::ONE,
            air_drag: Vec3::new(1.0, 0.0, 1.0),
            stationary_damp: 4.0,
            stationary_speed: 4.0,
            tilt_factor: 0.75,
            sphere_offset: 0.0,
            near_ground_threshold: 2.0,
            on_ground_threshold: 1.0,
            jump_ability: false,
            steer_in_air: true,
        }
    }
}

impl VehicleConfig {
    /// Check every parameter against its tuning range.
    ///
    /// Returns the config by value so construction sites can write
    /// `VehicleConfig { .. }.validate()?`.
    pub fn validate(self) -> Result<Self> {
        range(self.max_acceleration, 5.0, 40.0, "max_acceleration")?;
        range(self.steering, 20.0, 160.0, "steering")?;
        range(self.jump_force, 10.0, 20.0, "jump_force")?;
        range(self.gravity_multiplier, 0.0, 10.0, "gravity_multiplier")?;
        range(self.tilt_factor, 0.0, 1.5, "tilt_factor")?;
        range(self.sphere_offset, -1.0, 1.0, "sphere_offset")?;
        range(self.near_ground_threshold, 0.0, 5.0, "near_ground_threshold")?;
        range(self.on_ground_threshold, 0.0, 5.0, "on_ground_threshold")?;
        if self.on_ground_threshold > self.near_ground_threshold {
            return Err(Error::config(format!(
                "on_ground_threshold ({}) must not exceed near_ground_threshold ({})",
                self.on_ground_threshold, self.near_ground_threshold
            )));
        }
        for (v, name) in [
            (self.ground_drag, "ground_drag"),
            (self.near_ground_drag, "near_ground_drag"),
            (self.air_drag, "air_drag"),
        ] {
            if v.min_element() < 0.0 {
                return Err(Error::config(format!("{name} axes must be non-negative, got {v}")));
            }
        }
        if self.stationary_damp < 0.0 || self.stationary_speed < 0.0 {
            return Err(Error::config("stationary_damp and stationary_speed must be non-negative"));
        }
        Ok(self)
    }

    /// Load a config from a JSON string and validate it.
    pub fn from_json(json: &str) -> Result<Self> {
        let cfg: Self = serde_json::from_str(json)?;
        cfg.validate()
    }
}

fn range(value: f32, min: f32, max: f32, name: &str) -> Result<()> {
    if value < min || value > max || !value.is_finite() {
        return Err(Error::config(format!("{name} = {value} outside [{min}, {max}]")));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(VehicleConfig::default().validate().is_ok());
    }

    #[test]
    fn thresholds_must_nest() {
        let cfg = VehicleConfig {
            on_ground_threshold: 3.0,
            near_ground_threshold: 2.0,
            ..Default::default()
        };
        let err = cfg.validate().unwrap_err();
        assert!(err.is_config());
    }

    #[test]
    fn rejects_out_of_range_steering() {
        let cfg = VehicleConfig { steering: 500.0, ..Default::default() };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn rejects_negative_drag_axis() {
        let cfg = VehicleConfig { air_drag: Vec3::new(-1.0, 0.0, 1.0), ..Default::default() };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn json_round_trip() {
        let cfg = VehicleConfig { jump_ability: true, ..Default::default() };
        let json = serde_json::to_string(&cfg).unwrap();
        let back = VehicleConfig::from_json(&json).unwrap();
        assert_eq!(back.jump_ability, true);
        assert_eq!(back.max_acceleration, cfg.max_acceleration);
    }

    #[test]
    fn partial_json_fills_defaults() {
        let cfg = VehicleConfig::from_json(r#"{ "steering": 120.0 }"#).unwrap();
        assert_eq!(cfg.steering, 120.0);
        assert_eq!(cfg.max_acceleration, 30.0);
    }
}
