// src/scheduler.rs
//! Two-phase update scheduling.
//!
//! Engine lifecycle callbacks are replaced by an explicit scheduler invoking
//! two ordered phases on every active instance: a deterministic fixed-step
//! phase (vehicle logic, then the physics step) and a render-rate frame phase
//! (cosmetic interpolation only). Single-threaded and cooperative; actors are
//! visited in registration order.

use crate::physics::PhysicsWorld;
use crate::time::Clock;

/// The two lifecycle hooks an updatable instance exposes.
pub trait Stepped {
    /// Deterministic phase, once per fixed tick, before the world steps.
    fn fixed_step(&mut self, world: &mut PhysicsWorld, dt: f32);

    /// Render-rate phase for cosmetics. Must not touch the physics world.
    fn frame_step(&mut self, dt: f32) {
        let _ = dt;
    }
}

/// Drives [`Stepped`] actors: fixed catch-up first, then one frame phase.
pub struct Scheduler {
    clock: Clock,
    fixed_dt: f32,
}

impl Scheduler {
    pub fn new(fixed_dt: f32) -> Self {
        Self { clock: Clock::new(), fixed_dt }
    }

    pub fn fixed_dt(&self) -> f32 {
        self.fixed_dt
    }

    /// Advance the simulation by one rendered frame of `frame_delta` seconds.
    ///
    /// Runs zero or more fixed ticks (each: every actor's `fixed_step`, then
    /// the physics step), then every actor's `frame_step`. Returns the number
    /// of fixed ticks executed.
    pub fn advance(
        &mut self,
        world: &mut PhysicsWorld,
        actors: &mut [&mut dyn Stepped],
        frame_delta: f32,
    ) -> u32 {
        self.clock.advance(frame_delta);
        self.run_phases(world, actors, frame_delta)
    }

    /// Like [`Scheduler::advance`], but reads the frame delta from the wall
    /// clock. For real event loops.
    pub fn tick(&mut self, world: &mut PhysicsWorld, actors: &mut [&mut dyn Stepped]) -> u32 {
        let frame = self.clock.update();
        self.run_phases(world, actors, frame.delta)
    }

    fn run_phases(
        &mut self,
        world: &mut PhysicsWorld,
        actors: &mut [&mut dyn Stepped],
        frame_delta: f32,
    ) -> u32 {
        let mut ticks = 0;
        let fixed_dt = self.fixed_dt;
        for _ in self.clock.fixed_timestep(fixed_dt) {
            for actor in actors.iter_mut() {
                actor.fixed_step(world, fixed_dt);
            }
            world.step(fixed_dt);
            ticks += 1;
        }

        for actor in actors.iter_mut() {
            actor.frame_step(frame_delta);
        }
        ticks
    }
}
