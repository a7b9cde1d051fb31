// src/camera.rs
//! Chase camera for a vehicle.
//!
//! Exponential smoothing of a camera rig toward the vehicle transform plus
//! fixed offsets. Reads nothing but the target pose, so it can never perturb
//! the simulation.

use glam::{EulerRot, Quat, Vec3};

use crate::transform::Transform;

/// Follows a vehicle transform with exponential position/rotation smoothing.
pub struct VehicleCamera {
    rig: Transform,
    position_offset: Vec3,
    rotation_offset: Quat,
    /// Positional catch-up rate, per second.
    pub follow_speed: f32,
    /// Rotational catch-up rate, per second.
    pub rotation_speed: f32,
    /// Turn the rig with the vehicle, or keep a fixed world orientation.
    pub follow_rotation: bool,
}

impl VehicleCamera {
    /// `position_offset` is held in world axes relative to the vehicle;
    /// `rotation_offset_deg` is a (pitch, yaw, roll) offset in degrees,
    /// both captured once, the way a camera rig is posed in a scene.
    pub fn new(position_offset: Vec3, rotation_offset_deg: Vec3) -> Self {
        let rotation_offset = Quat::from_euler(
            EulerRot::YXZ,
            rotation_offset_deg.y.to_radians(),
            rotation_offset_deg.x.to_radians(),
            rotation_offset_deg.z.to_radians(),
        );
        Self {
            rig: Transform { position: position_offset, rotation: rotation_offset },
            position_offset,
            rotation_offset,
            follow_speed: 16.0,
            rotation_speed: 12.0,
            follow_rotation: true,
        }
    }

    /// Advance the follow smoothing by one fixed tick.
    pub fn fixed_step(&mut self, target: &Transform, dt: f32) {
        let desired = target.position + self.position_offset;
        self.rig.position = self.rig.position.lerp(desired, (dt * self.follow_speed).min(1.0));

        if self.follow_rotation {
            let desired = target.rotation * self.rotation_offset;
            self.rig.rotation = self
                .rig
                .rotation
                .lerp(desired, (dt * self.rotation_speed).min(1.0));
        }
    }

    /// Current rig pose for the renderer.
    pub fn rig(&self) -> &Transform {
        &self.rig
    }
}
