// src/ground.rs
//! Ground sensing.
//!
//! Two downward rays per tick: a short one decides "on ground", a longer one
//! decides "near ground" and supplies the surface normal used for model
//! alignment. Both rays missing is a valid state (fully airborne) and falls
//! back to world-up alignment.

use glam::Vec3;
use rapier3d::prelude::RigidBodyHandle;

use crate::physics::PhysicsWorld;

/// Per-tick ground sensing result.
#[derive(Debug, Clone, Copy)]
pub struct GroundState {
    /// Hit within the short threshold.
    pub on_ground: bool,
    /// Hit within the long threshold.
    pub near_ground: bool,
    /// Surface normal of the near-ground hit; world-up when airborne.
    pub normal: Vec3,
    /// Distance to the near-ground hit, if any.
    pub distance: Option<f32>,
}

impl GroundState {
    /// State with both rays missing.
    pub fn airborne() -> Self {
        Self { on_ground: false, near_ground: false, normal: Vec3::Y, distance: None }
    }
}

/// Casts the two ground rays for one vehicle.
#[derive(Debug, Clone, Copy)]
pub struct GroundSensor {
    pub on_ground_threshold: f32,
    pub near_ground_threshold: f32,
}

impl GroundSensor {
    pub fn new(on_ground_threshold: f32, near_ground_threshold: f32) -> Self {
        Self { on_ground_threshold, near_ground_threshold }
    }

    /// Sample the ground below `origin`, ignoring the vehicle's own proxy.
    pub fn sample(
        &self,
        world: &PhysicsWorld,
        origin: Vec3,
        exclude: Option<RigidBodyHandle>,
    ) -> GroundState {
        let hit_on = world.raycast_down(origin, self.on_ground_threshold, exclude);
        let hit_near = world.raycast_down(origin, self.near_ground_threshold, exclude);

        match hit_near {
            Some(hit) => GroundState {
                on_ground: hit_on.is_some(),
                near_ground: true,
                normal: hit.normal,
                distance: Some(hit.distance),
            },
            None => GroundState::airborne(),
        }
    }
}
