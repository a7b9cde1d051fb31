// src/lib.rs
//! Arcade-style vehicle motion on top of a Rapier rigid-body world.
//!
//! The vehicle's physical representation is a sphere; a visual model follows
//! its movements. Forward force is applied to the sphere in the direction the
//! model faces, gravity and drag are simulated by the controller itself (the
//! engine's are disabled), and a held jump near the ground suppresses gravity
//! on the way up for a floaty, controllable arc.
//!
//! A typical assembly:
//!
//! ```ignore
//! let mut world = PhysicsWorld::new(Vec3::new(0.0, -9.81, 0.0));
//! world.spawn_fixed_cuboid(Vec3::new(0.0, -0.5, 0.0), Vec3::new(100.0, 0.5, 100.0));
//! let sphere = world.spawn_vehicle_proxy(Vec3::new(0.0, 0.75, 0.0), 0.75);
//!
//! let pad = SampledInput::new();
//! let rig = VehicleRig { container: Some(Transform::default()), ..Default::default() };
//! let mut vehicle = VehicleController::new(
//!     VehicleConfig { jump_ability: true, ..Default::default() },
//!     sphere,
//!     rig,
//!     pad.clone(),
//!     &mut world,
//! )?;
//!
//! let mut scheduler = Scheduler::new(1.0 / 50.0);
//! loop {
//!     scheduler.tick(&mut world, &mut [&mut vehicle]);
//! }
//! ```
//!
//! The three drag profiles (`ground_drag`, `near_ground_drag`, `air_drag`)
//! shape the feel: reduce the forward axis of `ground_drag` for a faster top
//! speed, or raise the lateral axis of `air_drag` for sharper, less drifty
//! airborne turns.

pub mod camera;
pub mod config;
pub mod dust;
pub mod error;
pub mod ground;
pub mod input;
pub mod physics;
pub mod scheduler;
pub mod time;
pub mod transform;
pub mod vehicle;

pub use camera::VehicleCamera;
pub use config::VehicleConfig;
pub use dust::{DustEmitter, ParticleSink};
pub use error::{Error, Result};
pub use ground::{GroundSensor, GroundState};
pub use input::{InputSource, KeyBindings, Keyboard, SampledInput};
pub use physics::{PhysicsWorld, RayHit};
pub use scheduler::{Scheduler, Stepped};
pub use time::{Clock, FrameTime};
pub use transform::Transform;
pub use vehicle::{JumpState, VehicleController, VehicleRig};
