// src/vehicle.rs
//! Arcade vehicle motion controller.
//!
//! The vehicle's physical representation is a plain sphere rigid body; the
//! visual transform chases it every fixed tick while heading, surface
//! alignment and all cosmetic tilt live entirely on the visual side. Forward
//! force is applied in the direction the model faces, gravity and drag are
//! simulated here (never by the engine), and a held jump input near the
//! ground suppresses gravity on the way up for a floatier arc.
//!
//! Fixed-tick order matters and is load-bearing: ground rays, input, motion
//! smoothing, heading, model alignment, forces (accel -> jump -> gravity),
//! transform sync, drag, stationary damping.

use std::sync::Arc;

use glam::{EulerRot, Quat, Vec3};
use log::{debug, info};
use rapier3d::prelude::RigidBodyHandle;

use crate::config::VehicleConfig;
use crate::ground::{GroundSensor, GroundState};
use crate::input::InputSource;
use crate::physics::PhysicsWorld;
use crate::scheduler::Stepped;
use crate::transform::Transform;
use crate::{Error, Result};

// Response rates, per second. These define the feel and are deliberately not
// part of the tuning surface.
const ACCEL_SMOOTH_RATE: f32 = 12.0;
const TURN_SMOOTH_RATE: f32 = 4.0;
const HEADING_RATE: f32 = 2.0;
const ALIGN_GROUND_RATE: f32 = 8.0;
const ALIGN_AIR_RATE: f32 = 2.0;
const BODY_LEAN_RATE: f32 = 4.0;
const CONTAINER_TILT_RATE: f32 = 10.0;
// The jump impulse is scaled by dt, so this keeps tuned jump_force values in a
// convenient 10..20 range at common tick rates.
const JUMP_IMPULSE_SCALE: f32 = 10.0;

/// Jump-assist state, advanced once per fixed tick after ground sensing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JumpState {
    #[default]
    Idle,
    /// Action held with jump enabled while still near the ground; gravity is
    /// suppressed in this state.
    IntendToJump,
    /// Airborne after a jump, waiting to land.
    CompletingJump,
}

/// Named sub-parts of the vehicle model, bound once at construction instead
/// of discovered by name in a scene graph.
///
/// All transforms are local to the vehicle model. `container` is required —
/// it is the tiltable mount of the 3D model; the rest are cosmetic extras.
#[derive(Debug, Default, Clone)]
pub struct VehicleRig {
    pub container: Option<Transform>,
    pub body: Option<Transform>,
    pub wheel_front_left: Option<Transform>,
    pub wheel_front_right: Option<Transform>,
}

/// Per-vehicle state machine and force model. One instance exclusively owns
/// its proxy handle and derived state; multiple vehicles run independently.
pub struct VehicleController {
    config: VehicleConfig,
    input: Arc<dyn InputSource>,
    sphere: RigidBodyHandle,
    sensor: GroundSensor,

    /// Vehicle root: position chases the sphere, rotation is the heading yaw.
    transform: Transform,
    /// Visual model root: up axis follows the terrain normal.
    model: Transform,
    container: Transform,
    container_base: Vec3,
    body: Option<Transform>,
    wheel_front_left: Option<Transform>,
    wheel_front_right: Option<Transform>,

    target_accel: f32,
    current_accel: f32,
    target_turn: f32,
    current_turn: f32,
    ground: GroundState,
    intend_to_jump: bool,
    jump: JumpState,
}

impl VehicleController {
    /// Wire a controller to its collision proxy and model parts.
    ///
    /// Fails on an invalid config, an unknown body handle, or a rig without a
    /// container. Takes ownership of the proxy's gravity and damping: both
    /// are forced off for the controller's lifetime.
    pub fn new(
        config: VehicleConfig,
        sphere: RigidBodyHandle,
        rig: VehicleRig,
        input: Arc<dyn InputSource>,
        world: &mut PhysicsWorld,
    ) -> Result<Self> {
        let config = config.validate()?;
        if !world.contains(sphere) {
            return Err(Error::MissingBody);
        }
        let container = rig.container.ok_or(Error::MissingPart("container"))?;

        // These parameters are controlled by this struct, so enforce that
        // here to avoid weirdness.
        world.disable_gravity_and_damping(sphere);

        let position = world.position(sphere) + Vec3::Y * config.sphere_offset;
        let sensor = GroundSensor::new(config.on_ground_threshold, config.near_ground_threshold);

        info!(
            "vehicle controller ready (accel {}, steering {} deg/s, jump {})",
            config.max_acceleration,
            config.steering,
            if config.jump_ability { "enabled" } else { "disabled" }
        );

        Ok(Self {
            config,
            input,
            sphere,
            sensor,
            transform: Transform::from_position(position),
            model: Transform::from_position(position),
            container_base: container.position,
            container,
            body: rig.body,
            wheel_front_left: rig.wheel_front_left,
            wheel_front_right: rig.wheel_front_right,
            target_accel: 0.0,
            current_accel: 0.0,
            target_turn: 0.0,
            current_turn: 0.0,
            ground: GroundState::airborne(),
            intend_to_jump: false,
            jump: JumpState::default(),
        })
    }

    /// Deterministic physics phase. Call once per fixed tick, before the
    /// world itself is stepped.
    pub fn fixed_step(&mut self, world: &mut PhysicsWorld, dt: f32) {
        self.ground = self.sensor.sample(world, self.transform.position, Some(self.sphere));
        self.process_input();

        self.current_accel = smooth_step(self.current_accel, self.target_accel, dt * ACCEL_SMOOTH_RATE);
        self.current_turn = lerp(self.current_turn, self.target_turn, dt * TURN_SMOOTH_RATE);

        // Heading. Frozen mid-air unless air steering is enabled, which keeps
        // momentum pointed where the vehicle last faced.
        if self.ground.near_ground || self.config.steer_in_air {
            let target = Quat::from_rotation_y(self.transform.yaw() + self.current_turn.to_radians());
            self.transform.rotation = self
                .transform
                .rotation
                .slerp(target, (dt * HEADING_RATE).min(1.0));
        }

        // Align the model to the ground surface, or gently bring it back to
        // level whilst in the air. Cosmetic only: the proxy never rotates.
        let (up_target, align_rate) = if self.ground.near_ground {
            (self.ground.normal, ALIGN_GROUND_RATE)
        } else {
            (Vec3::Y, ALIGN_AIR_RATE)
        };
        let up = self.model.up().lerp(up_target, (dt * align_rate).min(1.0));
        self.model.set_up(up);
        self.model.rotate_y(self.transform.yaw());
        self.model.position = self.transform.position;

        // Movement.
        world.apply_acceleration(self.sphere, self.transform.forward() * self.current_accel);

        // Jump action.
        self.step_jump(world, dt);

        // Simulated gravity, suppressed while the held jump is still being
        // assisted near the ground.
        if self.jump != JumpState::IntendToJump {
            let gravity = world.gravity() * self.config.gravity_multiplier;
            world.apply_acceleration(self.sphere, gravity);
        }

        // Move the vehicle to track the sphere position.
        self.transform.position = world.position(self.sphere) + Vec3::Y * self.config.sphere_offset;

        // Apply drag, depending on vehicle conditions.
        let drag = if self.ground.on_ground {
            self.config.ground_drag
        } else if self.ground.near_ground {
            self.config.near_ground_drag
        } else {
            self.config.air_drag
        };
        self.apply_drag(world, drag, dt);

        // Stops the vehicle from floating around when standing still.
        if self.ground.on_ground && self.target_accel == 0.0 {
            let velocity = world.linear_velocity(self.sphere);
            if velocity.length() < self.config.stationary_speed {
                let damped = velocity.lerp(Vec3::ZERO, (dt * self.config.stationary_damp).min(1.0));
                world.set_linear_velocity(self.sphere, damped);
            }
        }
    }

    /// Render-rate cosmetic phase: wheel steer, body lean, container banking.
    /// Never touches the physics proxy.
    pub fn frame_step(&mut self, dt: f32) {
        let steer = Quat::from_rotation_y((self.current_turn / 2.0).to_radians());
        if let Some(wheel) = self.wheel_front_left.as_mut() {
            wheel.rotation = steer;
        }
        if let Some(wheel) = self.wheel_front_right.as_mut() {
            wheel.rotation = steer;
        }

        if let Some(body) = self.body.as_mut() {
            let lean = Quat::from_euler(
                EulerRot::YXZ,
                0.0,
                (self.current_accel / 4.0).to_radians(),
                (self.current_turn / 6.0).to_radians(),
            );
            body.rotation = body.rotation.slerp(lean, (dt * BODY_LEAN_RATE).min(1.0));
        }

        // Lean into the corner, with an exaggerated counter-lift so the model
        // visibly rides up on the outside edge.
        let tilt = if self.config.tilt_factor > 0.0 {
            -self.current_turn * self.config.tilt_factor
        } else {
            0.0
        };
        self.container.position = self.container_base + Vec3::Y * (tilt.abs() / 2000.0);
        let target = Quat::from_euler(
            EulerRot::YXZ,
            (self.current_turn / 8.0).to_radians(),
            0.0,
            tilt.to_radians(),
        );
        self.container.rotation = self
            .container
            .rotation
            .slerp(target, (dt * CONTAINER_TILT_RATE).min(1.0));
    }

    /// Teleport entry point for respawn/checkpoint systems.
    ///
    /// Atomically stops the vehicle — targets, smoothed motion and proxy
    /// velocity all read zero afterwards — then moves proxy and visual
    /// transform to the given pose.
    pub fn teleport(&mut self, world: &mut PhysicsWorld, position: Vec3, rotation: Quat) {
        debug!("teleporting vehicle to {position}");
        self.target_accel = 0.0;
        self.target_turn = 0.0;
        self.current_accel = 0.0;
        self.current_turn = 0.0;
        world.set_linear_velocity(self.sphere, Vec3::ZERO);
        world.set_position(self.sphere, position);

        self.transform.position = position;
        self.transform.rotation = rotation;
        self.model.position = position;
    }

    fn process_input(&mut self) {
        let move_xy = self.input.move_xy();
        self.target_accel = move_xy.y * self.config.max_acceleration;
        self.target_turn = move_xy.x * self.config.steering;
        self.intend_to_jump = self.config.jump_ability && self.input.is_action();
    }

    fn step_jump(&mut self, world: &mut PhysicsWorld, dt: f32) {
        match self.jump {
            JumpState::CompletingJump => {
                if self.ground.on_ground {
                    debug!("jump complete");
                    self.jump = JumpState::Idle;
                }
            }
            _ if self.intend_to_jump => {
                if !self.ground.near_ground {
                    // Left the ground band; the jump is completing, don't
                    // re-trigger it.
                    self.jump = JumpState::CompletingJump;
                } else {
                    if self.ground.on_ground {
                        let impulse = self.config.jump_force * JUMP_IMPULSE_SCALE * dt;
                        world.apply_velocity_change(self.sphere, Vec3::Y * impulse);
                    }
                    self.jump = JumpState::IntendToJump;
                }
            }
            _ => self.jump = JumpState::Idle,
        }
    }

    fn apply_drag(&mut self, world: &mut PhysicsWorld, drag: Vec3, dt: f32) {
        let mut local = self.transform.inverse_transform_vector(world.linear_velocity(self.sphere));
        local.x *= 1.0 - dt * drag.x;
        local.y *= 1.0 - dt * drag.y;
        local.z *= 1.0 - dt * drag.z;
        world.set_linear_velocity(self.sphere, self.transform.transform_vector(local));
    }

    // === Read-only views for cameras, emitters, renderers, tests ===

    pub fn transform(&self) -> &Transform {
        &self.transform
    }

    pub fn model_transform(&self) -> &Transform {
        &self.model
    }

    pub fn container_transform(&self) -> &Transform {
        &self.container
    }

    pub fn body_transform(&self) -> Option<&Transform> {
        self.body.as_ref()
    }

    pub fn wheel_transforms(&self) -> (Option<&Transform>, Option<&Transform>) {
        (self.wheel_front_left.as_ref(), self.wheel_front_right.as_ref())
    }

    pub fn body_handle(&self) -> RigidBodyHandle {
        self.sphere
    }

    pub fn jump_state(&self) -> JumpState {
        self.jump
    }

    pub fn ground_state(&self) -> GroundState {
        self.ground
    }

    pub fn current_acceleration(&self) -> f32 {
        self.current_accel
    }

    pub fn current_turn_rate(&self) -> f32 {
        self.current_turn
    }

    pub fn config(&self) -> &VehicleConfig {
        &self.config
    }
}

impl std::fmt::Debug for VehicleController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VehicleController")
            .field("config", &self.config)
            .field("sphere", &self.sphere)
            .field("sensor", &self.sensor)
            .field("transform", &self.transform)
            .field("model", &self.model)
            .field("container", &self.container)
            .field("container_base", &self.container_base)
            .field("body", &self.body)
            .field("wheel_front_left", &self.wheel_front_left)
            .field("wheel_front_right", &self.wheel_front_right)
            .field("target_accel", &self.target_accel)
            .field("current_accel", &self.current_accel)
            .field("target_turn", &self.target_turn)
            .field("current_turn", &self.current_turn)
            .field("ground", &self.ground)
            .field("intend_to_jump", &self.intend_to_jump)
            .field("jump", &self.jump)
            .finish()
    }
}

impl Stepped for VehicleController {
    fn fixed_step(&mut self, world: &mut PhysicsWorld, dt: f32) {
        VehicleController::fixed_step(self, world, dt);
    }

    fn frame_step(&mut self, dt: f32) {
        VehicleController::frame_step(self, dt);
    }
}

#[inline]
fn lerp(from: f32, to: f32, t: f32) -> f32 {
    from + (to - from) * t.clamp(0.0, 1.0)
}

/// Ease-in/out interpolation between `from` and `to`.
#[inline]
fn smooth_step(from: f32, to: f32, t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    let t = t * t * (3.0 - 2.0 * t);
    from + (to - from) * t
}
