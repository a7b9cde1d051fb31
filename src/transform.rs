// src/transform.rs
//! Minimal pose type for the visual side of a vehicle.
//!
//! The physics proxy owns the true position; these transforms are what a
//! renderer consumes. Positions are world-space, rotations are quaternions,
//! +Z is forward and +Y is up.

use glam::{Quat, Vec3};

/// World-space position + rotation pair.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Quat,
}

impl Default for Transform {
    fn default() -> Self {
        Self { position: Vec3::ZERO, rotation: Quat::IDENTITY }
    }
}

impl Transform {
    pub fn from_position(position: Vec3) -> Self {
        Self { position, rotation: Quat::IDENTITY }
    }

    /// Local +Z expressed in world space.
    #[inline]
    pub fn forward(&self) -> Vec3 {
        self.rotation * Vec3::Z
    }

    /// Local +Y expressed in world space.
    #[inline]
    pub fn up(&self) -> Vec3 {
        self.rotation * Vec3::Y
    }

    /// Local +X expressed in world space.
    #[inline]
    pub fn right(&self) -> Vec3 {
        self.rotation * Vec3::X
    }

    /// Point the local up axis at `up`, discarding yaw. Callers that need a
    /// heading re-apply it with [`Transform::rotate_y`] afterwards.
    #[inline]
    pub fn set_up(&mut self, up: Vec3) {
        let up = up.try_normalize().unwrap_or(Vec3::Y);
        self.rotation = Quat::from_rotation_arc(Vec3::Y, up);
    }

    /// Rotate around the local Y axis by `angle` radians.
    #[inline]
    pub fn rotate_y(&mut self, angle: f32) {
        self.rotation *= Quat::from_rotation_y(angle);
    }

    /// World-space vector into this transform's local frame.
    #[inline]
    pub fn inverse_transform_vector(&self, v: Vec3) -> Vec3 {
        self.rotation.inverse() * v
    }

    /// Local-frame vector back into world space.
    #[inline]
    pub fn transform_vector(&self, v: Vec3) -> Vec3 {
        self.rotation * v
    }

    /// Yaw component (rotation about world Y) in radians.
    #[inline]
    pub fn yaw(&self) -> f32 {
        let (yaw, _, _) = self.rotation.to_euler(glam::EulerRot::YXZ);
        yaw
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn forward_tracks_yaw() {
        let mut t = Transform::default();
        t.rotate_y(std::f32::consts::FRAC_PI_2);
        let f = t.forward();
        assert_relative_eq!(f.x, 1.0, epsilon = 1e-6);
        assert_relative_eq!(f.z, 0.0, epsilon = 1e-6);
    }

    #[test]
    fn vector_round_trip() {
        let mut t = Transform::default();
        t.rotate_y(0.7);
        let v = Vec3::new(1.0, 2.0, 3.0);
        let back = t.transform_vector(t.inverse_transform_vector(v));
        assert_relative_eq!(back.x, v.x, epsilon = 1e-5);
        assert_relative_eq!(back.y, v.y, epsilon = 1e-5);
        assert_relative_eq!(back.z, v.z, epsilon = 1e-5);
    }

    #[test]
    fn set_up_aligns_up_axis() {
        let mut t = Transform::default();
        let n = Vec3::new(0.3, 1.0, -0.2).normalize();
        t.set_up(n);
        let up = t.up();
        assert_relative_eq!(up.dot(n), 1.0, epsilon = 1e-5);
    }

    #[test]
    fn set_up_degenerate_falls_back_to_world_up() {
        let mut t = Transform::default();
        t.set_up(Vec3::ZERO);
        assert_relative_eq!(t.up().y, 1.0, epsilon = 1e-6);
    }
}
