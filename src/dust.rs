// src/dust.rs
//! Dust trail emission.
//!
//! Watches a vehicle's speed and height over ground and toggles a particle
//! system through the [`ParticleSink`] seam. Purely cosmetic: reads the
//! physics world, writes only to the sink.

use glam::Vec3;

use crate::physics::PhysicsWorld;
use crate::vehicle::VehicleController;

/// Minimum angle between travel direction and vehicle forward axis for the
/// "drifting only" emission mode.
const DRIFT_ANGLE_DEG: f32 = 30.0;
/// Range of the fallback probe used to anchor the dust to distant ground.
const PROBE_RANGE: f32 = 100.0;

/// Particle-system seam: the engine-side emitter the dust logic drives.
/// Implementations decide what "emission" means (GPU particles, sprites, a
/// test recorder).
pub trait ParticleSink {
    fn set_enabled(&mut self, enabled: bool);
    fn set_position(&mut self, position: Vec3);
}

/// Toggles a dust particle system from rigid-body speed and ground proximity.
#[derive(Debug, Clone, Copy)]
pub struct DustEmitter {
    /// Maximum height above ground at which dust is produced.
    pub max_height: f32,
    /// Minimum speed at which dust is produced.
    pub min_speed: f32,
    /// Emit no matter the direction of travel, or only when drifting.
    pub always_emit: bool,
}

impl Default for DustEmitter {
    fn default() -> Self {
        Self { max_height: 1.5, min_speed: 8.0, always_emit: true }
    }
}

impl DustEmitter {
    /// Re-evaluate emission for one rendered frame.
    pub fn frame_step(
        &self,
        world: &PhysicsWorld,
        vehicle: &VehicleController,
        sink: &mut dyn ParticleSink,
    ) {
        let origin = vehicle.transform().position;
        let exclude = Some(vehicle.body_handle());

        let near = world.raycast_down(origin, self.max_height, exclude);
        if let Some(hit) = near {
            sink.set_position(hit.point);
        } else if let Some(hit) = world.raycast_down(origin, PROBE_RANGE, exclude) {
            sink.set_position(hit.point);
        } else {
            // Nothing below at all; park the emitter far out of sight.
            sink.set_position(origin - Vec3::Y * PROBE_RANGE);
        }

        let velocity = world.linear_velocity(vehicle.body_handle());
        let speed = velocity.length();
        let enabled = near.is_some()
            && speed > self.min_speed
            && (self.always_emit
                || velocity.angle_between(vehicle.transform().forward()).to_degrees()
                    > DRIFT_ANGLE_DEG);
        sink.set_enabled(enabled);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::VehicleConfig;
    use crate::input::SampledInput;
    use crate::transform::Transform;
    use crate::vehicle::VehicleRig;
    use approx::assert_relative_eq;

    #[derive(Default)]
    struct RecordingSink {
        enabled: bool,
        position: Vec3,
    }

    impl ParticleSink for RecordingSink {
        fn set_enabled(&mut self, enabled: bool) {
            self.enabled = enabled;
        }
        fn set_position(&mut self, position: Vec3) {
            self.position = position;
        }
    }

    fn setup(spawn_height: f32) -> (PhysicsWorld, VehicleController) {
        let mut world = PhysicsWorld::new(Vec3::new(0.0, -9.81, 0.0));
        world.spawn_fixed_cuboid(Vec3::new(0.0, -0.5, 0.0), Vec3::new(50.0, 0.5, 50.0));
        let sphere = world.spawn_vehicle_proxy(Vec3::new(0.0, spawn_height, 0.0), 0.5);
        world.update_queries();

        let rig = VehicleRig { container: Some(Transform::default()), ..Default::default() };
        let vehicle = VehicleController::new(
            VehicleConfig::default(),
            sphere,
            rig,
            SampledInput::new(),
            &mut world,
        )
        .unwrap();
        (world, vehicle)
    }

    #[test]
    fn emits_when_fast_and_low() {
        let (mut world, vehicle) = setup(0.5);
        world.set_linear_velocity(vehicle.body_handle(), Vec3::new(0.0, 0.0, 12.0));

        let mut sink = RecordingSink::default();
        DustEmitter::default().frame_step(&world, &vehicle, &mut sink);

        assert!(sink.enabled);
        // Dust anchors to the hit point on the slab surface.
        assert_relative_eq!(sink.position.y, 0.0, epsilon = 1e-3);
    }

    #[test]
    fn silent_when_slow() {
        let (mut world, vehicle) = setup(0.5);
        world.set_linear_velocity(vehicle.body_handle(), Vec3::new(0.0, 0.0, 2.0));

        let mut sink = RecordingSink::default();
        DustEmitter::default().frame_step(&world, &vehicle, &mut sink);
        assert!(!sink.enabled);
    }

    #[test]
    fn silent_when_high_but_still_anchored_to_ground() {
        let (mut world, vehicle) = setup(10.0);
        world.set_linear_velocity(vehicle.body_handle(), Vec3::new(0.0, 0.0, 20.0));

        let mut sink = RecordingSink::default();
        DustEmitter::default().frame_step(&world, &vehicle, &mut sink);

        assert!(!sink.enabled);
        // The long probe still finds the slab below.
        assert_relative_eq!(sink.position.y, 0.0, epsilon = 1e-3);
    }

    #[test]
    fn drift_mode_requires_sideways_travel() {
        let (mut world, vehicle) = setup(0.5);
        let emitter = DustEmitter { always_emit: false, ..Default::default() };

        // Straight ahead: no dust.
        world.set_linear_velocity(vehicle.body_handle(), Vec3::new(0.0, 0.0, 12.0));
        let mut sink = RecordingSink::default();
        emitter.frame_step(&world, &vehicle, &mut sink);
        assert!(!sink.enabled);

        // Sliding sideways: dust.
        world.set_linear_velocity(vehicle.body_handle(), Vec3::new(12.0, 0.0, 2.0));
        emitter.frame_step(&world, &vehicle, &mut sink);
        assert!(sink.enabled);
    }

    #[test]
    fn parks_out_of_sight_over_void() {
        let mut world = PhysicsWorld::new(Vec3::new(0.0, -9.81, 0.0));
        let sphere = world.spawn_vehicle_proxy(Vec3::new(0.0, 5.0, 0.0), 0.5);
        world.update_queries();
        let rig = VehicleRig { container: Some(Transform::default()), ..Default::default() };
        let vehicle = VehicleController::new(
            VehicleConfig::default(),
            sphere,
            rig,
            SampledInput::new(),
            &mut world,
        )
        .unwrap();

        let mut sink = RecordingSink::default();
        DustEmitter::default().frame_step(&world, &vehicle, &mut sink);

        assert!(!sink.enabled);
        assert_relative_eq!(sink.position.y, 5.0 - PROBE_RANGE, epsilon = 1e-3);
    }
}
