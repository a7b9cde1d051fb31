// src/main.rs
// Headless demo: a vehicle drives, corners and jumps across a flat slab for a
// few seconds of simulated time, with telemetry on stdout via the logger.
// Run with RUST_LOG=info (or debug for jump state transitions).

use drift_engine::{
    DustEmitter, ParticleSink, PhysicsWorld, SampledInput, Scheduler, Transform, VehicleCamera,
    VehicleConfig, VehicleController, VehicleRig,
};
use glam::Vec3;
use log::info;

const FIXED_DT: f32 = 1.0 / 50.0;
const FRAME_DT: f32 = 1.0 / 60.0;
const DEMO_SECONDS: f32 = 10.0;

/// Stand-in particle system: just remembers what the emitter asked for.
#[derive(Default)]
struct DustProbe {
    enabled: bool,
    position: Vec3,
}

impl ParticleSink for DustProbe {
    fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }
    fn set_position(&mut self, position: Vec3) {
        self.position = position;
    }
}

fn main() -> drift_engine::Result<()> {
    env_logger::init();

    let mut world = PhysicsWorld::new(Vec3::new(0.0, -9.81, 0.0));
    world.spawn_fixed_cuboid(Vec3::new(0.0, -0.5, 0.0), Vec3::new(200.0, 0.5, 200.0));
    let sphere = world.spawn_vehicle_proxy(Vec3::new(0.0, 0.75, 0.0), 0.75);
    world.update_queries();

    let pad = SampledInput::new();
    let rig = VehicleRig {
        container: Some(Transform::default()),
        body: Some(Transform::default()),
        wheel_front_left: Some(Transform::default()),
        wheel_front_right: Some(Transform::default()),
    };
    let config = VehicleConfig {
        jump_ability: true,
        // Low forward drag on the ground for top speed, high lateral drag so
        // the kart bites instead of sliding.
        ground_drag: Vec3::new(4.0, 1.0, 0.4),
        near_ground_drag: Vec3::new(2.0, 0.5, 0.4),
        ..Default::default()
    };
    let mut vehicle = VehicleController::new(config, sphere, rig, pad.clone(), &mut world)?;

    let mut camera = VehicleCamera::new(Vec3::new(0.0, 3.0, -8.0), Vec3::new(15.0, 0.0, 0.0));
    let dust = DustEmitter::default();
    let mut dust_probe = DustProbe::default();
    let mut scheduler = Scheduler::new(FIXED_DT);

    let frames = (DEMO_SECONDS / FRAME_DT) as u32;
    for frame in 0..frames {
        let t = frame as f32 * FRAME_DT;

        // Scripted driver: accelerate, carve a corner, then hop while turning.
        let steer = if t > 3.0 { 0.6 } else { 0.0 };
        pad.set_move(steer, 1.0);
        pad.set_action(t > 6.0 && t < 6.4);

        let ticks = scheduler.advance(&mut world, &mut [&mut vehicle], FRAME_DT);
        for _ in 0..ticks {
            camera.fixed_step(vehicle.transform(), FIXED_DT);
        }
        dust.frame_step(&world, &vehicle, &mut dust_probe);

        if frame % 30 == 0 {
            let position = vehicle.transform().position;
            let speed = world.linear_velocity(vehicle.body_handle()).length();
            info!(
                "t={t:5.2}s pos=({:6.2}, {:5.2}, {:6.2}) speed={speed:5.2} jump={:?} dust={}",
                position.x,
                position.y,
                position.z,
                vehicle.jump_state(),
                if dust_probe.enabled { "on" } else { "off" },
            );
        }
    }

    let final_position = vehicle.transform().position;
    info!(
        "demo finished at {final_position}, camera at {}, dust anchored at {}",
        camera.rig().position,
        dust_probe.position,
    );
    Ok(())
}
